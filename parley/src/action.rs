/*!
The action model: what a registered argument is, and what it does to a
[`Namespace`] when the matcher hands it values.
*/

use core::{fmt, iter};
use std::sync::Arc;

use joinery::JoinableIterator;
use parley_parser::Prefixes;

use crate::{
    ArgumentParser,
    errors::{ConfigError, Exit, ParseError},
    namespace::Namespace,
    nargs::NArgs,
    subcommand::SubCommands,
    value::{Converter, Value},
};

/// The behavior of an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[non_exhaustive]
pub enum ActionKind {
    /// Set dest to the value, or to the list of values.
    #[default]
    Store,

    /// Set dest to `const`.
    StoreConst,

    /// Set dest to `true`. Defaults to `false`.
    StoreTrue,

    /// Set dest to `false`. Defaults to `true`.
    StoreFalse,

    /// Add one to dest, starting from 0.
    Count,

    /// Append the value to the list at dest.
    Append,

    /// Append `const` to the list at dest.
    AppendConst,

    /// Append every value to the list at dest.
    Extend,

    /// `--foo` sets dest to `true`; the generated `--no-foo` sets it to
    /// `false`.
    BooleanOptional,

    /// Render the full help and exit.
    Help,

    /// Render the version and exit.
    Version,

    /// Dispatch to a sub-command parser. Created by
    /// [`add_subparsers`][ArgumentParser::add_subparsers].
    Parsers,

    /// A help-only entry describing one sub-command.
    Choice,
}

impl ActionKind {
    fn is_valueless(self) -> bool {
        matches!(
            self,
            Self::StoreConst
                | Self::StoreTrue
                | Self::StoreFalse
                | Self::Count
                | Self::AppendConst
                | Self::BooleanOptional
                | Self::Help
                | Self::Version
        )
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Store => "store",
            Self::StoreConst => "store_const",
            Self::StoreTrue => "store_true",
            Self::StoreFalse => "store_false",
            Self::Count => "count",
            Self::Append => "append",
            Self::AppendConst => "append_const",
            Self::Extend => "extend",
            Self::BooleanOptional => "boolean_optional",
            Self::Help => "help",
            Self::Version => "version",
            Self::Parsers => "parsers",
            Self::Choice => "choice",
        })
    }
}

/// The help text of an action.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Help {
    /// Listed in help, but with no description.
    #[default]
    Absent,
    Text(String),
    /// Hidden from both usage and help.
    Suppressed,
}

impl Help {
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            Help::Text(text) => Some(text),
            _ => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_suppressed(&self) -> bool {
        matches!(self, Help::Suppressed)
    }
}

/// The placeholder shown for an action's values in usage and help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metavar {
    Name(String),
    /// One name per value, such as `("KEY", "VALUE")` for `Exact(2)`.
    Tuple(Vec<String>),
}

impl From<&str> for Metavar {
    fn from(name: &str) -> Self {
        Metavar::Name(name.to_owned())
    }
}

impl From<String> for Metavar {
    fn from(name: String) -> Self {
        Metavar::Name(name)
    }
}

impl<const N: usize> From<[&str; N]> for Metavar {
    fn from(names: [&str; N]) -> Self {
        Metavar::Tuple(names.into_iter().map(str::to_owned).collect())
    }
}

impl fmt::Display for Metavar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Metavar::Name(name) => f.write_str(name),
            Metavar::Tuple(names) => write!(
                f,
                "({})",
                names.iter().map(|name| format!("'{name}'")).join_with(", ")
            ),
        }
    }
}

/**
A declarative argument specification, registered with
[`ArgumentParser::add_argument`].

```
use parley::{ActionKind, Argument, NArgs};

let verbose = Argument::new(["-v", "--verbose"])
    .action(ActionKind::Count)
    .help("more output");

let inputs = Argument::new(["input"]).nargs(NArgs::OneOrMore);
```
*/
#[derive(Debug, Clone, Default)]
#[must_use]
pub struct Argument {
    names: Vec<String>,
    kind: ActionKind,
    nargs: Option<NArgs>,
    constant: Option<Value>,
    default: Option<Option<Value>>,
    converter: Option<Converter>,
    choices: Option<Vec<Value>>,
    required: Option<bool>,
    help: Help,
    metavar: Option<Metavar>,
    dest: Option<String>,
    deprecated: bool,
    version: Option<String>,
}

impl Argument {
    /**
    Create an argument from its names. A single name that doesn't start with
    a prefix character is a positional; otherwise every name is an option
    string.
    */
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..<Self as Default>::default()
        }
    }

    pub fn action(mut self, kind: ActionKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn nargs(mut self, nargs: NArgs) -> Self {
        self.nargs = Some(nargs);
        self
    }

    pub fn constant(mut self, constant: impl Into<Value>) -> Self {
        self.constant = Some(constant.into());
        self
    }

    pub fn default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(Some(default.into()));
        self
    }

    /// Don't seed the namespace with this argument's dest unless it's used.
    pub fn suppress_default(mut self) -> Self {
        self.default = Some(None);
        self
    }

    pub fn converter(mut self, converter: Converter) -> Self {
        self.converter = Some(converter);
        self
    }

    pub fn choices<V: Into<Value>>(mut self, choices: impl IntoIterator<Item = V>) -> Self {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = Some(required);
        self
    }

    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Help::Text(help.into());
        self
    }

    pub fn suppress_help(mut self) -> Self {
        self.help = Help::Suppressed;
        self
    }

    pub fn metavar(mut self, metavar: impl Into<Metavar>) -> Self {
        self.metavar = Some(metavar.into());
        self
    }

    pub fn dest(mut self, dest: impl Into<String>) -> Self {
        self.dest = Some(dest.into());
        self
    }

    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// The version string printed by a [`ActionKind::Version`] action.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /**
    Validate this specification and turn it into an [`Action`]. `inherited`
    supplies a parser-level default for a dest when none was given here.
    */
    pub(crate) fn into_action(
        self,
        prefixes: Prefixes<'_>,
        inherited: impl FnOnce(&str) -> Option<Value>,
    ) -> Result<Action, ConfigError> {
        let kind = self.kind;

        if matches!(kind, ActionKind::Parsers | ActionKind::Choice) {
            return Err(ConfigError::InvalidSetting {
                kind,
                setting: "action",
            });
        }

        let positional = match self.names.as_slice() {
            [] => true,
            [name] => !prefixes.starts(name),
            _ => false,
        };

        let (option_strings, dest) = if positional {
            let dest = match (self.names.into_iter().next(), self.dest) {
                (Some(_), Some(_)) => return Err(ConfigError::PositionalDestTwice),
                (Some(name), None) | (None, Some(name)) => name,
                (None, None) => return Err(ConfigError::UnnamedPositional),
            };

            if self.required.is_some() {
                return Err(ConfigError::RequiredPositional);
            }

            if kind.is_valueless() {
                return Err(ConfigError::ValuelessPositional(kind));
            }

            (Vec::new(), dest)
        } else {
            if let Some(option) = self.names.iter().find(|name| !prefixes.starts(name)) {
                return Err(ConfigError::InvalidPrefix {
                    option: option.clone(),
                    prefixes: prefixes.as_str().to_owned(),
                });
            }

            let dest = match self.dest {
                Some(dest) => dest,
                None => option_dest(&self.names, prefixes)?,
            };

            (self.names, dest)
        };

        let mut option_strings = option_strings;
        let mut constant = self.constant;
        let mut kind_default = None;

        let nargs = if kind.is_valueless() {
            let reject = |setting: &'static str, present: bool| {
                if present {
                    Err(ConfigError::InvalidSetting { kind, setting })
                } else {
                    Ok(())
                }
            };

            reject("nargs", self.nargs.is_some())?;

            if kind != ActionKind::BooleanOptional {
                reject("type", self.converter.is_some())?;
                reject("choices", self.choices.is_some())?;
            }

            match kind {
                ActionKind::StoreConst if constant.is_none() => {
                    return Err(ConfigError::MissingConst { kind });
                }
                ActionKind::StoreTrue
                | ActionKind::StoreFalse
                | ActionKind::Count
                | ActionKind::BooleanOptional
                | ActionKind::Help
                | ActionKind::Version => reject("const", constant.is_some())?,
                _ => {}
            }

            match kind {
                ActionKind::StoreTrue => {
                    constant = Some(Value::Bool(true));
                    kind_default = Some(Some(Value::Bool(false)));
                }
                ActionKind::StoreFalse => {
                    constant = Some(Value::Bool(false));
                    kind_default = Some(Some(Value::Bool(true)));
                }
                ActionKind::Help | ActionKind::Version => kind_default = Some(None),
                ActionKind::BooleanOptional => {
                    option_strings = option_strings
                        .into_iter()
                        .flat_map(|option| {
                            let negative = option
                                .strip_prefix("--")
                                .map(|name| format!("--no-{name}"));
                            iter::once(option).chain(negative)
                        })
                        .collect();
                }
                _ => {}
            }

            NArgs::Exact(0)
        } else {
            let nargs = self.nargs.unwrap_or_default();

            if nargs.is_valueless() {
                return Err(match kind {
                    ActionKind::Store => ConfigError::StoreNothing,
                    _ if positional => ConfigError::PositionalNothing,
                    _ => ConfigError::AppendNothing,
                });
            }

            if constant.is_some() && nargs != NArgs::Optional {
                return Err(ConfigError::ConstWithoutOptional);
            }

            nargs
        };

        if let Some(Metavar::Tuple(ref names)) = self.metavar {
            let (low, high) = nargs.metavar_arity();
            if names.len() < low || names.len() > high {
                return Err(ConfigError::MetavarArity);
            }
        }

        let default = match (self.default, kind_default) {
            (Some(default), _) => default,
            (None, Some(None)) => None,
            (None, kind_default) => inherited(&dest)
                .or(kind_default.flatten())
                .or(Some(Value::None)),
        };

        let help = match (kind, self.help) {
            (ActionKind::Version, Help::Absent) => {
                Help::Text("show program's version number and exit".to_owned())
            }
            (_, help) => help,
        };

        let required = if positional {
            !nargs.allows_absent()
        } else {
            self.required.unwrap_or(false)
        };

        Ok(Action {
            option_strings,
            dest: Some(dest),
            nargs,
            constant,
            default,
            converter: self.converter,
            choices: self.choices,
            required,
            help,
            metavar: self.metavar,
            deprecated: self.deprecated,
            kind,
            version: self.version,
            subcommands: None,
        })
    }
}

/// Derive the dest of an option: the first long option string, or else the
/// first short one, with prefixes stripped and dashes turned into
/// underscores.
fn option_dest(names: &[String], prefixes: Prefixes<'_>) -> Result<String, ConfigError> {
    let first = names.first().map(String::as_str).unwrap_or_default();

    let long = names.iter().find(|name| {
        let mut chars = name.chars();
        chars.next().is_some_and(|c| prefixes.contains(c))
            && chars.next().is_some_and(|c| prefixes.contains(c))
    });

    let dest = prefixes.trim(long.map(String::as_str).unwrap_or(first));

    match dest {
        "" => Err(ConfigError::MissingDest(first.to_owned())),
        dest => Ok(dest.replace('-', "_")),
    }
}

/**
A registered argument. Actions are created once, at registration time, and
are immutable afterwards, except that a sub-command dispatcher keeps growing
its set of parsers.
*/
#[derive(Debug, Clone)]
pub struct Action {
    pub(crate) option_strings: Vec<String>,
    pub(crate) dest: Option<String>,
    pub(crate) nargs: NArgs,
    pub(crate) constant: Option<Value>,
    pub(crate) default: Option<Value>,
    pub(crate) converter: Option<Converter>,
    pub(crate) choices: Option<Vec<Value>>,
    pub(crate) required: bool,
    pub(crate) help: Help,
    pub(crate) metavar: Option<Metavar>,
    pub(crate) deprecated: bool,
    pub(crate) kind: ActionKind,
    pub(crate) version: Option<String>,
    pub(crate) subcommands: Option<Box<SubCommands>>,
}

impl Action {
    /// A help-only entry for one sub-command, listed beneath the dispatcher.
    pub(crate) fn choice(name: &str, aliases: &[String], help: String) -> Self {
        let metavar = match aliases {
            [] => name.to_owned(),
            aliases => format!("{name} ({})", aliases.iter().join_with(", ")),
        };

        Self {
            option_strings: Vec::new(),
            dest: Some(name.to_owned()),
            nargs: NArgs::Single,
            constant: None,
            default: None,
            converter: None,
            choices: None,
            required: false,
            help: Help::Text(help),
            metavar: Some(Metavar::Name(metavar)),
            deprecated: false,
            kind: ActionKind::Choice,
            version: None,
            subcommands: None,
        }
    }

    #[inline]
    #[must_use]
    pub fn option_strings(&self) -> &[String] {
        &self.option_strings
    }

    #[inline]
    #[must_use]
    pub fn is_positional(&self) -> bool {
        self.option_strings.is_empty()
    }

    /// The namespace key, or [`None`] if it is suppressed.
    #[inline]
    #[must_use]
    pub fn dest(&self) -> Option<&str> {
        self.dest.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn nargs(&self) -> NArgs {
        self.nargs
    }

    #[inline]
    #[must_use]
    pub fn constant(&self) -> Option<&Value> {
        self.constant.as_ref()
    }

    /// The default, or [`None`] if it is suppressed.
    #[inline]
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn converter(&self) -> Option<&Converter> {
        self.converter.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn choices(&self) -> Option<&[Value]> {
        self.choices.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn is_required(&self) -> bool {
        self.required
    }

    #[inline]
    #[must_use]
    pub fn help(&self) -> &Help {
        &self.help
    }

    #[inline]
    #[must_use]
    pub fn metavar(&self) -> Option<&Metavar> {
        self.metavar.as_ref()
    }

    #[inline]
    #[must_use]
    pub fn is_deprecated(&self) -> bool {
        self.deprecated
    }

    #[inline]
    #[must_use]
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Help-only entries listed beneath this action, one per sub-command.
    #[must_use]
    pub fn subactions(&self) -> &[Action] {
        match self.subcommands {
            Some(ref subcommands) => subcommands.choice_actions(),
            None => &[],
        }
    }

    #[must_use]
    pub fn subcommands(&self) -> Option<&SubCommands> {
        self.subcommands.as_deref()
    }

    /**
    The name used to identify this action in error messages: the joined
    option strings, or else the metavar, the dest, or the set of choices as
    `{a,b,c}`.
    */
    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        if !self.option_strings.is_empty() {
            Some(self.option_strings.iter().join_with("/").to_string())
        } else if let Some(ref metavar) = self.metavar {
            Some(match metavar {
                Metavar::Name(name) => name.clone(),
                Metavar::Tuple(names) => names.join(" "),
            })
        } else if let Some(ref dest) = self.dest {
            Some(dest.clone())
        } else {
            self.choices.as_ref().map(|choices| choice_set(choices))
        }
    }

    /// How a value-less option shows up in usage: `--foo`, or
    /// `--foo | --no-foo` for a boolean toggle.
    #[must_use]
    pub fn format_usage(&self) -> String {
        match self.kind {
            ActionKind::BooleanOptional => self.option_strings.join(" | "),
            _ => self.option_strings.first().cloned().unwrap_or_default(),
        }
    }

    /**
    Apply this action to `namespace`, given the already converted `values`
    and the option string that triggered it, if any. Help and version
    requests come back as [`ParseError::Exit`].
    */
    pub fn apply(
        &self,
        parser: &ArgumentParser,
        namespace: &mut Namespace,
        values: Value,
        option_string: Option<&str>,
    ) -> Result<(), ParseError> {
        match self.kind {
            ActionKind::Store => self.store(namespace, values),
            ActionKind::StoreConst | ActionKind::StoreTrue | ActionKind::StoreFalse => {
                self.store(namespace, self.constant.clone().unwrap_or_default())
            }
            ActionKind::Count => {
                let count = match self.dest().and_then(|dest| namespace.get(dest)) {
                    Some(&Value::Int(count)) => count + 1,
                    _ => 1,
                };
                self.store(namespace, Value::Int(count))
            }
            ActionKind::Append => self.append(namespace, iter::once(values)),
            ActionKind::AppendConst => {
                self.append(namespace, iter::once(self.constant.clone().unwrap_or_default()))
            }
            ActionKind::Extend => match values {
                Value::List(items) => self.append(namespace, items.iter().cloned()),
                value => self.append(namespace, iter::once(value)),
            },
            ActionKind::BooleanOptional => {
                let negated = option_string.is_some_and(|option| option.starts_with("--no-"));
                self.store(namespace, Value::Bool(!negated))
            }
            ActionKind::Help => {
                return Err(ParseError::Exit(Exit {
                    status: 0,
                    output: parser.format_help(),
                }));
            }
            ActionKind::Version => {
                let version = self.version.as_deref().or(parser.version());
                let mut formatter = parser.formatter();
                formatter.add_text(version);

                return Err(ParseError::Exit(Exit {
                    status: 0,
                    output: formatter.format_help(),
                }));
            }
            ActionKind::Parsers => {
                if let Some(ref subcommands) = self.subcommands {
                    subcommands.dispatch(self, namespace, values)?;
                }
            }
            ActionKind::Choice => {}
        }

        Ok(())
    }

    fn store(&self, namespace: &mut Namespace, value: Value) {
        if let Some(ref dest) = self.dest {
            namespace.set(dest.as_str(), value);
        }
    }

    /// Copy-on-write append: a list still shared with a default or with an
    /// earlier clone of the namespace is copied before it is extended.
    fn append(&self, namespace: &mut Namespace, items: impl IntoIterator<Item = Value>) {
        let Some(ref dest) = self.dest else { return };

        let mut list = match namespace.take(dest) {
            Some(Value::List(list)) => list,
            None | Some(Value::None) => Arc::new(Vec::new()),
            Some(other) => Arc::new(vec![other]),
        };

        Arc::make_mut(&mut list).extend(items);
        namespace.set(dest.as_str(), Value::List(list));
    }
}

/// Render choices as `{a,b,c}`.
pub(crate) fn choice_set(choices: &[Value]) -> String {
    format!("{{{}}}", choices.iter().join_with(","))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(argument: Argument) -> Result<Action, ConfigError> {
        argument.into_action(Prefixes::DASH, |_| None)
    }

    #[test]
    fn test_option_dest() {
        let action = build(Argument::new(["-f", "--foo-bar", "--baz"])).unwrap();
        assert_eq!(action.dest(), Some("foo_bar"));

        let action = build(Argument::new(["-x"])).unwrap();
        assert_eq!(action.dest(), Some("x"));

        assert_eq!(
            build(Argument::new(["--"])).unwrap_err(),
            ConfigError::MissingDest("--".to_owned())
        );
        assert_eq!(
            build(Argument::new(["---"])).unwrap_err(),
            ConfigError::MissingDest("---".to_owned())
        );
    }

    #[test]
    fn test_store_rejects_zero_nargs() {
        assert_eq!(
            build(Argument::new(["--foo"]).nargs(NArgs::Exact(0))).unwrap_err(),
            ConfigError::StoreNothing
        );
        assert_eq!(
            build(
                Argument::new(["--foo"])
                    .action(ActionKind::Append)
                    .nargs(NArgs::Exact(0))
            )
            .unwrap_err(),
            ConfigError::AppendNothing
        );
    }

    #[test]
    fn test_const_requires_optional_nargs() {
        for nargs in [NArgs::Single, NArgs::OneOrMore, NArgs::Exact(1)] {
            assert_eq!(
                build(Argument::new(["--foo"]).nargs(nargs).constant("x")).unwrap_err(),
                ConfigError::ConstWithoutOptional
            );
        }

        let action = build(
            Argument::new(["--foo"])
                .nargs(NArgs::Optional)
                .constant("x"),
        )
        .unwrap();
        assert_eq!(action.constant(), Some(&Value::from("x")));
    }

    #[test]
    fn test_valueless_actions_reject_value_settings() {
        for kind in [
            ActionKind::StoreConst,
            ActionKind::StoreTrue,
            ActionKind::StoreFalse,
            ActionKind::AppendConst,
            ActionKind::Count,
        ] {
            let base = Argument::new(["-x"]).action(kind).constant(1);
            assert!(build(base.clone().converter(Converter::int())).is_err());
            assert!(build(base.clone().nargs(NArgs::Optional)).is_err());
            assert!(build(base.clone().choices(["a"])).is_err());
        }

        for kind in [ActionKind::StoreTrue, ActionKind::StoreFalse, ActionKind::Count] {
            assert_eq!(
                build(Argument::new(["-x"]).action(kind).constant(1)).unwrap_err(),
                ConfigError::InvalidSetting {
                    kind,
                    setting: "const"
                }
            );
        }
    }

    #[test]
    fn test_positional_rules() {
        assert_eq!(
            build(Argument::new(["foo"]).dest("bar")).unwrap_err(),
            ConfigError::PositionalDestTwice
        );
        assert_eq!(
            build(Argument::new(["foo"]).required(true)).unwrap_err(),
            ConfigError::RequiredPositional
        );
        assert_eq!(
            build(Argument::new(["foo"]).action(ActionKind::StoreTrue)).unwrap_err(),
            ConfigError::ValuelessPositional(ActionKind::StoreTrue)
        );

        let error = build(Argument::new(Vec::<String>::new())).unwrap_err();
        assert_eq!(error, ConfigError::UnnamedPositional);
        assert_eq!(
            error.to_string(),
            "positional arguments need a name or an explicit dest"
        );

        let action = build(Argument::new(Vec::<String>::new()).dest("foo")).unwrap();
        assert!(action.is_positional());
        assert!(action.is_required());

        let action = build(Argument::new(["foo"]).nargs(NArgs::Optional)).unwrap();
        assert!(!action.is_required());
    }

    #[test]
    fn test_invalid_prefix() {
        assert_eq!(
            build(Argument::new(["-x", "foo"])).unwrap_err(),
            ConfigError::InvalidPrefix {
                option: "foo".to_owned(),
                prefixes: "-".to_owned()
            }
        );
    }

    #[test]
    fn test_boolean_optional_adds_negative() {
        let action = build(Argument::new(["--foo"]).action(ActionKind::BooleanOptional)).unwrap();
        assert_eq!(action.option_strings(), ["--foo", "--no-foo"]);
        assert_eq!(action.format_usage(), "--foo | --no-foo");

        let action = build(
            Argument::new(["-f", "--foobar", "--barfoo"]).action(ActionKind::BooleanOptional),
        )
        .unwrap();
        assert_eq!(
            action.option_strings(),
            ["-f", "--foobar", "--no-foobar", "--barfoo", "--no-barfoo"]
        );
    }

    #[test]
    fn test_metavar_arity() {
        assert_eq!(
            build(Argument::new(["-z"]).nargs(NArgs::Exact(3)).metavar(["A", "B"])).unwrap_err(),
            ConfigError::MetavarArity
        );
        assert!(build(Argument::new(["-z"]).nargs(NArgs::ZeroOrMore).metavar(["A", "B"])).is_ok());
        assert!(build(Argument::new(["-z"]).nargs(NArgs::OneOrMore).metavar(["A"])).is_err());
    }

    #[test]
    fn test_display_name() {
        let option = build(Argument::new(["-x", "--foo"])).unwrap();
        assert_eq!(option.display_name().as_deref(), Some("-x/--foo"));

        let positional = build(Argument::new(["spam"]).metavar("SPAM")).unwrap();
        assert_eq!(positional.display_name().as_deref(), Some("SPAM"));

        let mut dispatcher = build(Argument::new(["cmd"])).unwrap();
        dispatcher.dest = None;
        dispatcher.choices = Some(vec!["a".into(), "b".into()]);
        assert_eq!(dispatcher.display_name().as_deref(), Some("{a,b}"));

        dispatcher.choices = None;
        assert_eq!(dispatcher.display_name(), None);
    }

    #[test]
    fn test_defaults() {
        let flag = build(Argument::new(["--flag"]).action(ActionKind::StoreTrue)).unwrap();
        assert_eq!(flag.default(), Some(&Value::Bool(false)));

        let inverse = build(Argument::new(["--no-flag"]).action(ActionKind::StoreFalse)).unwrap();
        assert_eq!(inverse.default(), Some(&Value::Bool(true)));

        let help = build(Argument::new(["-h"]).action(ActionKind::Help)).unwrap();
        assert_eq!(help.default(), None);

        let inherited = Argument::new(["--level"])
            .into_action(Prefixes::DASH, |dest| (dest == "level").then(|| Value::Int(3)))
            .unwrap();
        assert_eq!(inherited.default(), Some(&Value::Int(3)));

        let suppressed = build(Argument::new(["--quiet"]).suppress_default()).unwrap();
        assert_eq!(suppressed.default(), None);
    }
}
