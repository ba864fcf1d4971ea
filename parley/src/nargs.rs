/*!
How many command-line tokens an action consumes.
*/

use core::{fmt, str::FromStr};

use crate::SUPPRESS;

/**
The token-count policy of an action.

[`NArgs::Single`] is the policy of an ordinary value-taking action: exactly
one token, stored as a bare value. [`NArgs::Exact`] always produces a list,
even for `Exact(1)`; `Exact(0)` is the implicit policy of value-less actions
like store-true or count.
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NArgs {
    #[default]
    Single,
    Exact(usize),
    Optional,
    ZeroOrMore,
    OneOrMore,
    Remainder,
    SubCommandAndRemainder,
    Suppressed,
}

impl NArgs {
    /// True if this policy never consumes a token.
    #[inline]
    #[must_use]
    pub fn is_valueless(self) -> bool {
        self == NArgs::Exact(0)
    }

    /// True for positionals that may legitimately match nothing.
    #[must_use]
    pub fn allows_absent(self) -> bool {
        matches!(
            self,
            NArgs::Optional | NArgs::ZeroOrMore | NArgs::Remainder | NArgs::Suppressed
        )
    }

    /// The number of metavar names a tuple metavar needs for this policy, as
    /// an inclusive range.
    pub(crate) fn metavar_arity(self) -> (usize, usize) {
        match self {
            NArgs::Single | NArgs::Optional | NArgs::SubCommandAndRemainder => (1, 1),
            NArgs::ZeroOrMore => (1, 2),
            NArgs::OneOrMore => (2, 2),
            NArgs::Exact(n) => (n, n),
            NArgs::Remainder | NArgs::Suppressed => (0, usize::MAX),
        }
    }

    /**
    The regex fragment matching this policy against a pattern string made of
    `O` (option), `A` (argument) and `-` (the `--` terminator). Options
    never consume across a terminator.
    */
    pub(crate) fn pattern(self, is_option: bool) -> String {
        let pattern = match self {
            NArgs::Single => "(-*A-*)".to_owned(),
            NArgs::Optional => "(-*A?-*)".to_owned(),
            NArgs::ZeroOrMore => "(-*[A-]*)".to_owned(),
            NArgs::OneOrMore => "(-*A[A-]*)".to_owned(),
            NArgs::Remainder => "([-AO]*)".to_owned(),
            NArgs::SubCommandAndRemainder => "(-*A[-AO]*)".to_owned(),
            NArgs::Suppressed => "(-*-*)".to_owned(),
            NArgs::Exact(n) => {
                let body = vec!["A"; n].join("-*");
                format!("(-*{body}-*)")
            }
        };

        if is_option {
            pattern.replace("-*", "").replace('-', "")
        } else {
            pattern
        }
    }
}

impl fmt::Display for NArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            NArgs::Single => f.write_str("None"),
            NArgs::Exact(n) => write!(f, "{n}"),
            NArgs::Optional => f.write_str("?"),
            NArgs::ZeroOrMore => f.write_str("*"),
            NArgs::OneOrMore => f.write_str("+"),
            NArgs::Remainder => f.write_str("..."),
            NArgs::SubCommandAndRemainder => f.write_str("A..."),
            NArgs::Suppressed => f.write_str(SUPPRESS),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid nargs value: {0:?}")]
pub struct InvalidNArgs(String);

impl FromStr for NArgs {
    type Err = InvalidNArgs;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "?" => NArgs::Optional,
            "*" => NArgs::ZeroOrMore,
            "+" => NArgs::OneOrMore,
            "..." => NArgs::Remainder,
            "A..." => NArgs::SubCommandAndRemainder,
            SUPPRESS => NArgs::Suppressed,
            count => count
                .parse()
                .map(NArgs::Exact)
                .map_err(|_| InvalidNArgs(count.to_owned()))?,
        })
    }
}
