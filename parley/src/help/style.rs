/*!
Help style policies: how free text is wrapped, where default metavars come
from, and whether defaults are appended to help text.
*/

use std::{borrow::Cow, sync::LazyLock};

use regex::Regex;
use textwrap::{Options, WordSeparator, WrapAlgorithm};

use crate::{action::Action, nargs::NArgs};

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?-u:\s)+").expect("static regex must compile"));

/// How descriptions, epilogs, and help strings are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextLayout {
    /// Collapse whitespace and re-wrap everything.
    #[default]
    Filled,

    /// Keep the line breaks of descriptions, epilogs, and group
    /// descriptions; argument help is still re-wrapped.
    RawDescription,

    /// Keep the line breaks of all text, argument help included.
    RawText,
}

/// Where an action's metavar comes from when it doesn't set one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MetavarSource {
    /// The dest, upper-cased for options.
    #[default]
    Dest,

    /// The name of the action's converter, such as `int`.
    TypeName,
}

/**
A help style. The named constants mirror the usual formatter flavors; they
combine with the `with_*` methods.

```
use parley::HelpStyle;

let style = HelpStyle::RAW_TEXT.with_defaults();
assert!(style.show_defaults);
```
*/
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HelpStyle {
    pub text: TextLayout,
    pub metavar: MetavarSource,
    pub show_defaults: bool,
}

impl HelpStyle {
    pub const DEFAULT: Self = Self {
        text: TextLayout::Filled,
        metavar: MetavarSource::Dest,
        show_defaults: false,
    };

    pub const RAW_DESCRIPTION: Self = Self {
        text: TextLayout::RawDescription,
        ..Self::DEFAULT
    };

    pub const RAW_TEXT: Self = Self {
        text: TextLayout::RawText,
        ..Self::DEFAULT
    };

    pub const ARGUMENT_DEFAULTS: Self = Self {
        show_defaults: true,
        ..Self::DEFAULT
    };

    pub const METAVAR_TYPE: Self = Self {
        metavar: MetavarSource::TypeName,
        ..Self::DEFAULT
    };

    #[must_use]
    pub const fn with_defaults(self) -> Self {
        Self {
            show_defaults: true,
            ..self
        }
    }

    #[must_use]
    pub const fn with_metavar(self, metavar: MetavarSource) -> Self {
        Self { metavar, ..self }
    }

    /// Break argument help into lines no wider than `width`.
    pub(crate) fn split_lines(&self, text: &str, width: usize) -> Vec<String> {
        match self.text {
            TextLayout::RawText => text.lines().map(str::to_owned).collect(),
            TextLayout::Filled | TextLayout::RawDescription => {
                let text = WHITESPACE.replace_all(text, " ");
                textwrap::wrap(text.trim(), wrap_options(width))
                    .into_iter()
                    .map(Cow::into_owned)
                    .collect()
            }
        }
    }

    /// Lay out a description or epilog, indenting every line by `indent`.
    pub(crate) fn fill_text(&self, text: &str, width: usize, indent: usize) -> String {
        let indent = " ".repeat(indent);

        match self.text {
            TextLayout::RawDescription | TextLayout::RawText => text
                .split_inclusive('\n')
                .map(|line| format!("{indent}{line}"))
                .collect(),
            TextLayout::Filled => {
                let text = WHITESPACE.replace_all(text, " ");
                let options = wrap_options(width)
                    .initial_indent(&indent)
                    .subsequent_indent(&indent);
                textwrap::fill(text.trim(), options)
            }
        }
    }

    /// The help template of `action`, with ` (default: {default})` appended
    /// when this style shows defaults and the action has a visible one.
    pub(crate) fn help_template<'a>(&self, action: &'a Action) -> Option<Cow<'a, str>> {
        let help = action.help().text()?;

        let wants_default = self.show_defaults
            && !help.contains("{default}")
            && action.default().is_some()
            && (!action.is_positional()
                || matches!(action.nargs(), NArgs::Optional | NArgs::ZeroOrMore));

        Some(if wants_default {
            Cow::Owned(format!("{help} (default: {{default}})"))
        } else {
            Cow::Borrowed(help)
        })
    }

    /// The metavar of an action that doesn't set one explicitly.
    pub(crate) fn default_metavar(&self, action: &Action) -> String {
        let dest = action.dest().unwrap_or_default();

        match (self.metavar, action.converter()) {
            (MetavarSource::TypeName, Some(converter)) => converter.name().to_owned(),
            _ if action.is_positional() => dest.to_owned(),
            _ => dest.to_uppercase(),
        }
    }
}

fn wrap_options<'a>(width: usize) -> Options<'a> {
    Options::new(width)
        .word_separator(WordSeparator::AsciiSpace)
        .wrap_algorithm(WrapAlgorithm::FirstFit)
}
