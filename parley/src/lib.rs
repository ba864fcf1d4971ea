/*!
An argparse-style command-line engine. Arguments are declared at runtime as
[`Argument`] specifications and registered with an [`ArgumentParser`], which
turns them into [`Action`]s; parsing a command line produces a [`Namespace`]
of dynamically typed [`Value`]s.

```
use parley::{ActionKind, Argument, ArgumentParser, Converter, NArgs, Value};

let mut parser = ArgumentParser::builder().prog("PROG").width(78).build();
parser
    .add_argument(Argument::new(["-v", "--verbose"]).action(ActionKind::Count))
    .unwrap();
parser
    .add_argument(Argument::new(["size"]).converter(Converter::int()))
    .unwrap();

let namespace = parser.parse_args(["-vv", "12"]).unwrap();
assert_eq!(namespace.get("verbose"), Some(&Value::Int(2)));
assert_eq!(namespace.get("size"), Some(&Value::Int(12)));

assert_eq!(parser.format_usage(), "usage: PROG [-h] [-v] size\n");
```

The help renderer lives in [`help`]; it reproduces argparse's layout
closely, including usage wrapping, mutually exclusive groups, and
`{placeholder}` expansion in help strings. Sub-commands are declared with
[`ArgumentParser::add_subparsers`] and [`ArgumentParser::add_subparser`].
*/

pub mod action;
pub mod errors;
pub mod help;
mod matcher;
pub mod namespace;
pub mod nargs;
pub mod parser;
pub mod subcommand;
pub mod value;

pub use action::{Action, ActionKind, Argument, Help, Metavar};
pub use errors::{ArgumentError, ArgumentTypeError, ConfigError, Exit, ParseError};
pub use help::{HelpFormatter, HelpStyle, MetavarSource, TextLayout, Usage, UsageGroup};
pub use namespace::Namespace;
pub use nargs::NArgs;
pub use parser::{
    ArgumentGroup, ArgumentParser, Dispatcher, ExclusiveGroup, ExclusiveId, GroupId,
    ParserBuilder,
};
pub use subcommand::{SubCommands, Subcommand};
pub use value::{Converter, Value};

/// The marker that hides an action from usage and help, or keeps a value
/// out of the namespace.
pub const SUPPRESS: &str = "==SUPPRESS==";
