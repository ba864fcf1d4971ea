/*!
Error types for [`parley`][crate].

Registration problems are reported eagerly as [`ConfigError`]. Parsing
reports [`ParseError`], which is either a usage error tied to an action
([`ArgumentError`]) or a request to exit early, such as after `--help`.
*/

use core::fmt;

use crate::action::ActionKind;

/**
A usage error attributed to a specific argument. The argument is identified
by its display name: its joined option strings, its metavar, its dest, or
its choices, in that order of preference.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentError {
    argument_name: Option<String>,
    message: String,
}

impl ArgumentError {
    pub fn new(argument_name: Option<String>, message: impl Into<String>) -> Self {
        Self {
            argument_name,
            message: message.into(),
        }
    }

    /// An error that isn't attributed to any particular argument.
    pub fn general(message: impl Into<String>) -> Self {
        Self::new(None, message)
    }

    #[inline]
    #[must_use]
    pub fn argument_name(&self) -> Option<&str> {
        self.argument_name.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ArgumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.argument_name {
            Some(ref name) => write!(f, "argument {name}: {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl core::error::Error for ArgumentError {}

/**
Returned by a [`Converter`][crate::Converter] that couldn't convert a token.
Without a message, the parser reports `invalid <type> value: '<token>'`.
*/
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ArgumentTypeError {
    message: Option<String>,
}

impl ArgumentTypeError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
        }
    }

    #[must_use]
    pub fn invalid() -> Self {
        Self { message: None }
    }

    #[inline]
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for ArgumentTypeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message().unwrap_or("invalid value"))
    }
}

impl core::error::Error for ArgumentTypeError {}

/// Errors raised while registering arguments, groups, or sub-commands.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    #[error(
        "nargs for store actions must be != 0; if you have nothing to store, \
        actions such as store true or store const may be more appropriate"
    )]
    StoreNothing,

    #[error(
        "nargs for append actions must be != 0; if arg strings are not supplying \
        the value to append, the append const action may be more appropriate"
    )]
    AppendNothing,

    #[error("nargs must be '?' to supply const")]
    ConstWithoutOptional,

    #[error("{kind} actions require a const")]
    MissingConst { kind: ActionKind },

    #[error("'{setting}' is an invalid argument for {kind} actions")]
    InvalidSetting {
        kind: ActionKind,
        setting: &'static str,
    },

    #[error("invalid option string {option:?}: must start with a character {prefixes:?}")]
    InvalidPrefix { option: String, prefixes: String },

    #[error("dest= is required for options like {0:?}")]
    MissingDest(String),

    #[error("positional arguments need a name or an explicit dest")]
    UnnamedPositional,

    #[error("dest supplied twice for positional argument")]
    PositionalDestTwice,

    #[error("'required' is an invalid argument for positionals")]
    RequiredPositional,

    #[error("action '{0}' is not valid for positional arguments")]
    ValuelessPositional(ActionKind),

    #[error("nargs for positionals must be != 0")]
    PositionalNothing,

    #[error("length of metavar tuple does not match nargs")]
    MetavarArity,

    #[error("dest {0:?} is already used by another argument")]
    DuplicateDest(String),

    #[error("mutually exclusive arguments must be optional")]
    ExclusivePositional,

    #[error("cannot have multiple subparser arguments")]
    MultipleSubparsers,

    #[error("sub-commands can only be added after add_subparsers")]
    NoSubparsers,

    /// A conflict attributed to a specific argument, such as a reused option
    /// string or sub-command name.
    #[error(transparent)]
    Argument(#[from] ArgumentError),
}

/**
A successful early termination, such as after `--help` or `--version`. The
caller is expected to print `output` and exit the process with `status`.
*/
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exit {
    pub status: i32,
    pub output: String,
}

/// Errors that occur while parsing a command line.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ParseError {
    /// A usage error. Typically reported along with the usage line.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Parsing stopped early because help or version output was requested.
    #[error("exit requested with status {}", .0.status)]
    Exit(Exit),
}

impl ParseError {
    pub fn exit(&self) -> Option<&Exit> {
        match self {
            Self::Exit(exit) => Some(exit),
            Self::Argument(_) => None,
        }
    }

    /// The process exit status this error should translate into.
    #[must_use]
    pub fn status(&self) -> i32 {
        match self {
            Self::Exit(exit) => exit.status,
            Self::Argument(_) => 2,
        }
    }
}
