/*!
The argument parser: registration, argument groups, help rendering, and the
parse entry points.
*/

use std::{env, path::Path};

use indexmap::IndexMap;
use parley_parser::{Prefixes, is_negative_number};

use crate::{
    action::{Action, ActionKind, Argument, Help, Metavar},
    errors::{ArgumentError, ConfigError, ParseError},
    help::{HelpFormatter, HelpStyle, Usage, UsageGroup},
    matcher,
    namespace::Namespace,
    nargs::NArgs,
    subcommand::{SubCommands, Subcommand},
    value::Value,
};

const POSITIONALS: usize = 0;
const OPTIONALS: usize = 1;

/// Identifies an argument group within its parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(usize);

/// Identifies a mutually exclusive group within its parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ExclusiveId(usize);

/// A titled help section and the actions listed in it.
#[derive(Debug, Clone)]
struct ActionGroup {
    title: Option<String>,
    description: Option<String>,
    actions: Vec<usize>,
}

impl ActionGroup {
    fn new(title: Option<String>, description: Option<String>) -> Self {
        Self {
            title,
            description,
            actions: Vec::new(),
        }
    }
}

/// Members of a mutually exclusive group, as indexes into the parser's
/// actions. `container` is the argument group new members are listed under;
/// [`None`] sorts them into the default positional or option section.
#[derive(Debug, Clone)]
pub(crate) struct ExclusiveSet {
    pub(crate) required: bool,
    pub(crate) actions: Vec<usize>,
    container: Option<usize>,
}

/**
Builder for an [`ArgumentParser`].

```
use parley::{ArgumentParser, HelpStyle};

let parser = ArgumentParser::builder()
    .prog("PROG")
    .description("frobnicate the widgets")
    .style(HelpStyle::ARGUMENT_DEFAULTS)
    .build();

assert_eq!(parser.format_usage(), "usage: PROG [-h]\n");
```
*/
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct ParserBuilder {
    pub(crate) prog: Option<String>,
    usage: Usage,
    description: Option<String>,
    epilog: Option<String>,
    version: Option<String>,
    prefix_chars: Option<String>,
    add_help: Option<bool>,
    allow_abbrev: Option<bool>,
    style: HelpStyle,
    width: Option<usize>,
    argument_default: Option<Value>,
}

impl ParserBuilder {
    /// The program name. Defaults to the file name of `argv[0]`.
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = Some(prog.into());
        self
    }

    pub fn usage(mut self, usage: Usage) -> Self {
        self.usage = usage;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Self {
        self.epilog = Some(epilog.into());
        self
    }

    /// The version printed by [`ActionKind::Version`] actions that don't
    /// carry their own.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// The characters options may start with. Defaults to `-`.
    pub fn prefix_chars(mut self, prefix_chars: impl Into<String>) -> Self {
        self.prefix_chars = Some(prefix_chars.into());
        self
    }

    /// Whether to register `-h/--help`. Defaults to true.
    pub fn add_help(mut self, add_help: bool) -> Self {
        self.add_help = Some(add_help);
        self
    }

    /// Whether unambiguous prefixes of long options are accepted. Defaults
    /// to true.
    pub fn allow_abbrev(mut self, allow_abbrev: bool) -> Self {
        self.allow_abbrev = Some(allow_abbrev);
        self
    }

    pub fn style(mut self, style: HelpStyle) -> Self {
        self.style = style;
        self
    }

    /// Wrap help at a fixed width instead of the terminal width.
    pub fn width(mut self, width: usize) -> Self {
        self.width = Some(width);
        self
    }

    /// The default for every argument that doesn't set its own.
    pub fn argument_default(mut self, default: impl Into<Value>) -> Self {
        self.argument_default = Some(default.into());
        self
    }

    #[must_use]
    pub fn build(self) -> ArgumentParser {
        let prefix_chars = match self.prefix_chars {
            Some(chars) if !chars.is_empty() => chars,
            _ => Prefixes::DASH.as_str().to_owned(),
        };

        let mut parser = ArgumentParser {
            prog: self.prog.unwrap_or_else(default_prog),
            usage: self.usage,
            description: self.description,
            epilog: self.epilog,
            version: self.version,
            prefix_chars,
            allow_abbrev: self.allow_abbrev.unwrap_or(true),
            style: self.style,
            width: self.width,
            argument_default: self.argument_default,
            defaults: IndexMap::new(),
            actions: Vec::new(),
            option_index: IndexMap::new(),
            groups: vec![
                ActionGroup::new(Some("positional arguments".to_owned()), None),
                ActionGroup::new(Some("options".to_owned()), None),
            ],
            exclusive: Vec::new(),
            subparsers: None,
            negative_number_options: false,
        };

        if self.add_help.unwrap_or(true) {
            let prefix = parser.prefixes().primary();
            let help = Argument::new([format!("{prefix}h"), format!("{prefix}{prefix}help")])
                .action(ActionKind::Help)
                .help("show this help message and exit");

            // The parser is empty and both names start with a prefix
            // character, so registration can't be rejected.
            let registered = parser.add_argument(help).is_ok();
            debug_assert!(registered);
        }

        parser
    }
}

/**
Settings for the sub-command dispatcher created by
[`ArgumentParser::add_subparsers`].
*/
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Dispatcher {
    title: Option<String>,
    description: Option<String>,
    prog: Option<String>,
    dest: Option<String>,
    required: bool,
    help: Help,
    metavar: Option<String>,
}

impl Dispatcher {
    /// List the dispatcher in its own help section. Setting only a
    /// description titles the section `subcommands`.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The prefix of every child prog, instead of the parent's usage.
    pub fn prog(mut self, prog: impl Into<String>) -> Self {
        self.prog = Some(prog.into());
        self
    }

    /// Store the selected sub-command's name under `dest`.
    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Help::Text(help.into());
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }
}

/**
A command-line parser. Arguments are registered up front; afterwards the
parser is immutable and can be run any number of times.

```
use parley::{ActionKind, Argument, ArgumentParser, NArgs, Value};

let mut parser = ArgumentParser::new("PROG");
parser.add_argument(Argument::new(["--foo"]).action(ActionKind::StoreTrue)).unwrap();
parser.add_argument(Argument::new(["bar"]).nargs(NArgs::OneOrMore)).unwrap();

let namespace = parser.parse_args(["--foo", "a", "b"]).unwrap();
assert_eq!(namespace.get("foo"), Some(&Value::Bool(true)));
assert_eq!(namespace.get("bar"), Some(&Value::from(vec!["a", "b"])));
```
*/
#[derive(Debug, Clone)]
pub struct ArgumentParser {
    prog: String,
    usage: Usage,
    description: Option<String>,
    epilog: Option<String>,
    version: Option<String>,
    prefix_chars: String,
    pub(crate) allow_abbrev: bool,
    style: HelpStyle,
    width: Option<usize>,
    argument_default: Option<Value>,
    defaults: IndexMap<String, Value>,
    pub(crate) actions: Vec<Action>,
    pub(crate) option_index: IndexMap<String, usize>,
    groups: Vec<ActionGroup>,
    pub(crate) exclusive: Vec<ExclusiveSet>,
    subparsers: Option<usize>,
    pub(crate) negative_number_options: bool,
}

impl ArgumentParser {
    /// A parser with default settings and an automatic `-h/--help`.
    #[must_use]
    pub fn new(prog: impl Into<String>) -> Self {
        Self::builder().prog(prog).build()
    }

    pub fn builder() -> ParserBuilder {
        ParserBuilder::default()
    }

    #[inline]
    #[must_use]
    pub fn prog(&self) -> &str {
        &self.prog
    }

    #[inline]
    #[must_use]
    pub fn usage(&self) -> &Usage {
        &self.usage
    }

    #[inline]
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn epilog(&self) -> Option<&str> {
        self.epilog.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> HelpStyle {
        self.style
    }

    #[inline]
    #[must_use]
    pub(crate) fn prefixes(&self) -> Prefixes<'_> {
        Prefixes::new(&self.prefix_chars)
    }

    /// Every registered action, in registration order.
    #[inline]
    #[must_use]
    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// The action registered under an option string.
    #[must_use]
    pub fn option(&self, option_string: &str) -> Option<&Action> {
        self.option_index
            .get(option_string)
            .map(|&index| &self.actions[index])
    }

    /// Register an argument in the default positional or option section.
    pub fn add_argument(&mut self, argument: Argument) -> Result<&Action, ConfigError> {
        let index = self.register(argument, None, None)?;
        Ok(&self.actions[index])
    }

    /// Create a titled help section.
    pub fn add_argument_group(
        &mut self,
        title: impl Into<String>,
        description: Option<&str>,
    ) -> ArgumentGroup<'_> {
        let index = self.push_group(Some(title.into()), description.map(str::to_owned));
        ArgumentGroup {
            parser: self,
            index,
        }
    }

    /// Reopen a group created earlier.
    pub fn argument_group(&mut self, id: GroupId) -> Option<ArgumentGroup<'_>> {
        (id.0 < self.groups.len()).then_some(ArgumentGroup {
            parser: self,
            index: id.0,
        })
    }

    /// Create a mutually exclusive group whose members are listed in the
    /// default sections.
    pub fn add_mutually_exclusive_group(&mut self, required: bool) -> ExclusiveGroup<'_> {
        let index = self.push_exclusive(required, None);
        ExclusiveGroup {
            parser: self,
            index,
        }
    }

    /// Reopen a mutually exclusive group created earlier.
    pub fn mutually_exclusive_group(&mut self, id: ExclusiveId) -> Option<ExclusiveGroup<'_>> {
        (id.0 < self.exclusive.len()).then_some(ExclusiveGroup {
            parser: self,
            index: id.0,
        })
    }

    /**
    Set a parser-level default for `dest`. It seeds the namespace even when
    no argument writes to `dest`, and replaces the default of any action
    already registered with that dest.
    */
    pub fn set_defaults(&mut self, dest: impl Into<String>, value: impl Into<Value>) {
        let dest = dest.into();
        let value = value.into();

        self.actions
            .iter_mut()
            .filter(|action| action.dest() == Some(dest.as_str()))
            .for_each(|action| action.default = Some(value.clone()));

        self.defaults.insert(dest, value);
    }

    /// The default for `dest`: an action's own default if it has one that
    /// isn't [`Value::None`], otherwise the parser-level default.
    #[must_use]
    pub fn get_default(&self, dest: &str) -> Option<&Value> {
        self.actions
            .iter()
            .filter(|action| action.dest() == Some(dest))
            .find_map(|action| action.default().filter(|value| !value.is_none()))
            .or_else(|| self.defaults.get(dest))
    }

    /**
    Add the sub-command dispatcher. Its prog prefix, the start of every child
    parser's prog, is this parser's usage without the `usage: ` prefix and
    without any options.
    */
    pub fn add_subparsers(&mut self, config: Dispatcher) -> Result<&Action, ConfigError> {
        if self.subparsers.is_some() {
            return Err(ConfigError::MultipleSubparsers);
        }

        let prog_prefix = match config.prog {
            Some(prog) => prog,
            None => {
                let mut formatter = self.formatter();
                let positionals = self.actions.iter().filter(|action| action.is_positional());
                formatter.add_usage(&self.usage, positionals, self.usage_groups(), Some(""));
                formatter.format_help().trim().to_owned()
            }
        };

        let group = match (config.title, config.description) {
            (None, None) => None,
            (title, description) => Some(self.push_group(
                Some(title.unwrap_or_else(|| "subcommands".to_owned())),
                description,
            )),
        };

        let action = Action {
            option_strings: Vec::new(),
            default: config.dest.as_ref().map(|_| Value::None),
            dest: config.dest,
            nargs: NArgs::SubCommandAndRemainder,
            constant: None,
            converter: None,
            choices: Some(Vec::new()),
            required: config.required,
            help: config.help,
            metavar: config.metavar.map(Metavar::Name),
            deprecated: false,
            kind: ActionKind::Parsers,
            version: None,
            subcommands: Some(Box::new(SubCommands::new(prog_prefix))),
        };

        let index = self.insert(action, group, None)?;
        self.subparsers = Some(index);
        Ok(&self.actions[index])
    }

    /// Register a sub-command and return its parser, ready for arguments.
    pub fn add_subparser(&mut self, command: Subcommand) -> Result<&mut ArgumentParser, ConfigError> {
        let index = self.subparsers.ok_or(ConfigError::NoSubparsers)?;
        let action = &mut self.actions[index];
        let dispatcher = action.display_name();
        let name = command.name().to_owned();

        let subcommands = action
            .subcommands
            .as_deref_mut()
            .ok_or(ConfigError::NoSubparsers)?;

        subcommands.add(command, dispatcher)?;
        action.choices = Some(subcommands.names().map(Value::from).collect());

        subcommands.get_mut(&name).ok_or(ConfigError::NoSubparsers)
    }

    /// The sub-commands registered so far, if there is a dispatcher.
    #[must_use]
    pub fn subcommands(&self) -> Option<&SubCommands> {
        self.subparsers
            .and_then(|index| self.actions[index].subcommands())
    }

    /// Reopen a registered sub-command's parser by name or alias.
    pub fn subparser(&mut self, name: &str) -> Option<&mut ArgumentParser> {
        let index = self.subparsers?;
        self.actions[index].subcommands.as_deref_mut()?.get_mut(name)
    }

    /// A formatter for this parser's prog, style and width.
    #[must_use]
    pub fn formatter(&self) -> HelpFormatter<'_> {
        let width = self.width.unwrap_or_else(terminal_width);
        HelpFormatter::new(&self.prog, self.style, width)
    }

    #[must_use]
    pub fn format_usage(&self) -> String {
        let mut formatter = self.formatter();
        formatter.add_usage(&self.usage, &self.actions, self.usage_groups(), None);
        formatter.format_help()
    }

    /// The full help: usage, description, one section per argument group,
    /// and the epilog.
    #[must_use]
    pub fn format_help(&self) -> String {
        let mut formatter = self.formatter();
        formatter.add_usage(&self.usage, &self.actions, self.usage_groups(), None);
        formatter.add_text(self.description.as_deref());

        for group in &self.groups {
            formatter.start_section(group.title.as_deref());
            formatter.add_text(group.description.as_deref());
            formatter.add_arguments(group.actions.iter().map(|&index| &self.actions[index]));
            formatter.end_section();
        }

        formatter.add_text(self.epilog.as_deref());
        formatter.format_help()
    }

    /**
    Render a parse error the way it should be shown to a user: the usage
    followed by `PROG: error: MESSAGE` for argument errors, or the requested
    output for help and version exits.
    */
    #[must_use]
    pub fn format_error(&self, error: &ParseError) -> String {
        match error {
            ParseError::Exit(exit) => exit.output.clone(),
            ParseError::Argument(error) => {
                format!("{}{}: error: {error}\n", self.format_usage(), self.prog)
            }
        }
    }

    /**
    Parse `args` (excluding the program name). Tokens that no argument
    claims are returned alongside the namespace rather than rejected.
    */
    pub fn parse_known_args<I>(&self, args: I) -> Result<(Namespace, Vec<String>), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.parse_known_args_into(args, Namespace::new())
    }

    /// Like [`parse_known_args`][Self::parse_known_args], but values are
    /// added to an existing namespace. Keys already present are not
    /// overwritten by defaults.
    pub fn parse_known_args_into<I>(
        &self,
        args: I,
        mut namespace: Namespace,
    ) -> Result<(Namespace, Vec<String>), ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let args: Vec<String> = args
            .into_iter()
            .map(|arg| arg.as_ref().to_owned())
            .collect();

        for action in &self.actions {
            if let (Some(dest), Some(default)) = (action.dest(), action.default()) {
                if !namespace.contains(dest) {
                    namespace.set(dest, default.clone());
                }
            }
        }

        for (dest, value) in &self.defaults {
            if !namespace.contains(dest) {
                namespace.set(dest.as_str(), value.clone());
            }
        }

        let mut extras = matcher::parse(self, &args, &mut namespace)?;
        extras.extend(namespace.take_unrecognized());
        Ok((namespace, extras))
    }

    /// Parse `args`, rejecting any token no argument claims.
    pub fn parse_args<I>(&self, args: I) -> Result<Namespace, ParseError>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let (namespace, extras) = self.parse_known_args(args)?;

        if extras.is_empty() {
            Ok(namespace)
        } else {
            Err(ArgumentError::general(format!(
                "unrecognized arguments: {}",
                extras.join(" ")
            ))
            .into())
        }
    }

    fn usage_groups(&self) -> Vec<UsageGroup<'_>> {
        self.exclusive
            .iter()
            .map(|group| UsageGroup {
                actions: group.actions.iter().map(|&index| &self.actions[index]).collect(),
                required: group.required,
            })
            .collect()
    }

    fn push_group(&mut self, title: Option<String>, description: Option<String>) -> usize {
        self.groups.push(ActionGroup::new(title, description));
        self.groups.len() - 1
    }

    fn push_exclusive(&mut self, required: bool, container: Option<usize>) -> usize {
        self.exclusive.push(ExclusiveSet {
            required,
            actions: Vec::new(),
            container,
        });
        self.exclusive.len() - 1
    }

    fn register(
        &mut self,
        argument: Argument,
        group: Option<usize>,
        exclusive: Option<usize>,
    ) -> Result<usize, ConfigError> {
        let action = argument.into_action(self.prefixes(), |dest| {
            self.defaults
                .get(dest)
                .or(self.argument_default.as_ref())
                .cloned()
        })?;

        if exclusive.is_some() && action.is_required() {
            return Err(ConfigError::ExclusivePositional);
        }

        self.insert(action, group, exclusive)
    }

    fn insert(
        &mut self,
        action: Action,
        group: Option<usize>,
        exclusive: Option<usize>,
    ) -> Result<usize, ConfigError> {
        let conflicts: Vec<&str> = action
            .option_strings()
            .iter()
            .map(String::as_str)
            .filter(|option| self.option_index.contains_key(*option))
            .collect();

        if !conflicts.is_empty() {
            let plural = if conflicts.len() == 1 { "" } else { "s" };
            return Err(ArgumentError::new(
                action.display_name(),
                format!("conflicting option string{plural}: {}", conflicts.join(", ")),
            )
            .into());
        }

        if let Some(dest) = action.dest().filter(|_| action.is_positional()) {
            if self.actions.iter().any(|other| other.dest() == Some(dest)) {
                return Err(ConfigError::DuplicateDest(dest.to_owned()));
            }
        }

        let index = self.actions.len();

        for option in action.option_strings() {
            if is_negative_number(option) {
                self.negative_number_options = true;
            }
            self.option_index.insert(option.clone(), index);
        }

        let group = group.unwrap_or(if action.is_positional() {
            POSITIONALS
        } else {
            OPTIONALS
        });

        self.groups[group].actions.push(index);
        if let Some(exclusive) = exclusive {
            self.exclusive[exclusive].actions.push(index);
        }

        self.actions.push(action);
        Ok(index)
    }
}

/// A handle for adding arguments to one help section.
#[derive(Debug)]
pub struct ArgumentGroup<'p> {
    parser: &'p mut ArgumentParser,
    index: usize,
}

impl ArgumentGroup<'_> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> GroupId {
        GroupId(self.index)
    }

    pub fn add_argument(&mut self, argument: Argument) -> Result<&Action, ConfigError> {
        let index = self.parser.register(argument, Some(self.index), None)?;
        Ok(&self.parser.actions[index])
    }

    /// Create a mutually exclusive group whose members are listed in this
    /// section.
    pub fn add_mutually_exclusive_group(&mut self, required: bool) -> ExclusiveGroup<'_> {
        let index = self.parser.push_exclusive(required, Some(self.index));
        ExclusiveGroup {
            parser: &mut *self.parser,
            index,
        }
    }
}

/// A handle for adding arguments to a mutually exclusive group.
#[derive(Debug)]
pub struct ExclusiveGroup<'p> {
    parser: &'p mut ArgumentParser,
    index: usize,
}

impl ExclusiveGroup<'_> {
    #[inline]
    #[must_use]
    pub fn id(&self) -> ExclusiveId {
        ExclusiveId(self.index)
    }

    /// Register a member. Members must be optional: a required option or a
    /// positional that always consumes a value is rejected.
    pub fn add_argument(&mut self, argument: Argument) -> Result<&Action, ConfigError> {
        let container = self.parser.exclusive[self.index].container;
        let index = self.parser.register(argument, container, Some(self.index))?;
        Ok(&self.parser.actions[index])
    }
}

fn default_prog() -> String {
    env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "prog".to_owned())
}

/// The help width: the `COLUMNS` environment variable (80 if unset or
/// invalid), less two.
fn terminal_width() -> usize {
    env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .unwrap_or(80)
        .saturating_sub(2)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> ArgumentParser {
        ArgumentParser::builder().prog("PROG").width(78).build()
    }

    #[test]
    fn test_auto_help_uses_primary_prefix() {
        let parser = ArgumentParser::builder()
            .prog("PROG")
            .prefix_chars("+:")
            .build();
        assert!(parser.option("+h").is_some());
        assert!(parser.option("++help").is_some());

        let parser = ArgumentParser::builder()
            .prog("PROG")
            .prefix_chars("+-")
            .build();
        assert!(parser.option("-h").is_some());
    }

    #[test]
    fn test_conflicting_option_string() {
        let mut parser = parser();
        parser.add_argument(Argument::new(["--foo"])).unwrap();

        let error = parser
            .add_argument(Argument::new(["-f", "--foo"]))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "argument -f/--foo: conflicting option string: --foo"
        );
    }

    #[test]
    fn test_duplicate_positional_dest() {
        let mut parser = parser();
        parser.add_argument(Argument::new(["spam"])).unwrap();
        assert_eq!(
            parser.add_argument(Argument::new(["spam"])).unwrap_err(),
            ConfigError::DuplicateDest("spam".to_owned())
        );
    }

    #[test]
    fn test_exclusive_members_must_be_optional() {
        let mut parser = parser();
        let mut group = parser.add_mutually_exclusive_group(false);
        assert_eq!(
            group.add_argument(Argument::new(["spam"])).unwrap_err(),
            ConfigError::ExclusivePositional
        );
        assert_eq!(
            group
                .add_argument(Argument::new(["--foo"]).required(true))
                .unwrap_err(),
            ConfigError::ExclusivePositional
        );
        group
            .add_argument(Argument::new(["spam"]).nargs(NArgs::Optional))
            .unwrap();
    }

    #[test]
    fn test_set_defaults_updates_actions() {
        let mut parser = parser();
        parser.add_argument(Argument::new(["--foo"])).unwrap();
        parser.set_defaults("foo", 1);
        parser.set_defaults("bar", "x");

        assert_eq!(parser.get_default("foo"), Some(&Value::Int(1)));
        assert_eq!(parser.get_default("bar"), Some(&Value::from("x")));

        parser.add_argument(Argument::new(["--bar"])).unwrap();
        assert_eq!(
            parser.option("--bar").and_then(Action::default),
            Some(&Value::from("x"))
        );
    }

    #[test]
    fn test_subparser_registration() {
        let mut parser = parser();
        assert_eq!(
            parser.add_subparser(Subcommand::new("a")).unwrap_err(),
            ConfigError::NoSubparsers
        );

        parser.add_argument(Argument::new(["--foo"])).unwrap();
        parser.add_argument(Argument::new(["spam"])).unwrap();
        parser.add_subparsers(Dispatcher::default()).unwrap();
        assert_eq!(
            parser.add_subparsers(Dispatcher::default()).unwrap_err(),
            ConfigError::MultipleSubparsers
        );

        let child = parser.add_subparser(Subcommand::new("a")).unwrap();
        assert_eq!(child.prog(), "PROG spam a");

        let error = parser
            .add_subparser(Subcommand::new("b").alias("a"))
            .unwrap_err();
        assert_eq!(
            error.to_string(),
            "argument {a}: conflicting subparser alias: a"
        );

        let error = parser.add_subparser(Subcommand::new("a")).unwrap_err();
        assert_eq!(error.to_string(), "argument {a}: conflicting subparser: a");

        assert!(parser.subparser("a").is_some());
        assert_eq!(
            parser.subcommands().map(|s| s.names().collect::<Vec<_>>()),
            Some(vec!["a"])
        );
    }
}
