/*!
Usage and help rendering.

A [`HelpFormatter`] accumulates a tree of sections whose leaves are pieces
of text, usage blocks, and actions. Nothing is laid out until
[`format_help`][HelpFormatter::format_help]: the help column depends on the
widest action label across the whole document, so it's computed while items
are added and then passed explicitly into every render call.
*/

mod style;
mod usage;

use core::{cmp, fmt::Write as _};
use std::sync::LazyLock;

use indent_write::fmt::IndentWriter;
use joinery::JoinableIterator;
use regex::Regex;

use crate::{
    SUPPRESS,
    action::{Action, Metavar, choice_set},
    nargs::NArgs,
    value::Value,
};

pub use style::{HelpStyle, MetavarSource, TextLayout};

static LONG_BREAK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\n\n+").expect("static regex must compile"));

/// How the usage line of a parser is produced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Usage {
    /// Synthesized from the registered actions.
    #[default]
    Generated,

    /// Caller-supplied text; `{prog}` is replaced by the program name.
    Custom(String),

    /// No usage line at all.
    Suppressed,
}

/// A mutually exclusive group, as seen by the usage renderer.
#[derive(Debug, Clone)]
pub struct UsageGroup<'a> {
    pub actions: Vec<&'a Action>,
    pub required: bool,
}

#[derive(Debug)]
enum Item<'a> {
    Text(&'a str),
    Usage {
        custom: Option<&'a str>,
        actions: Vec<&'a Action>,
        groups: Vec<UsageGroup<'a>>,
        prefix: Option<&'a str>,
    },
    Action(&'a Action),
    Section(Section<'a>),
}

/// A node in the help document. Its heading is only printed if at least one
/// of its items renders to something.
#[derive(Debug, Default)]
struct Section<'a> {
    heading: Option<&'a str>,
    items: Vec<Item<'a>>,
}

/**
Lays out usage and help text.

```
use parley::{HelpFormatter, HelpStyle};

let mut formatter = HelpFormatter::new("PROG", HelpStyle::DEFAULT, 78);
formatter.add_text(Some("{prog} does things"));
assert_eq!(formatter.format_help(), "PROG does things\n");
```
*/
#[derive(Debug)]
pub struct HelpFormatter<'a> {
    prog: &'a str,
    style: HelpStyle,
    width: usize,
    indent_increment: usize,
    max_help_position: usize,
    current_indent: usize,
    action_max_length: usize,
    root: Section<'a>,
    open: Vec<Section<'a>>,
}

impl<'a> HelpFormatter<'a> {
    /// Create a formatter that wraps text at `width` columns.
    #[must_use]
    pub fn new(prog: &'a str, style: HelpStyle, width: usize) -> Self {
        Self {
            prog,
            style,
            width,
            indent_increment: 2,
            max_help_position: help_position_limit(width, 2, 24),
            current_indent: 0,
            action_max_length: 0,
            root: Section::default(),
            open: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_indent_increment(mut self, indent_increment: usize) -> Self {
        self.indent_increment = indent_increment;
        self
    }

    /// Cap the column where help text starts. The cap never exceeds
    /// `width - 20`, unless that would be narrower than two indents.
    #[must_use]
    pub fn with_max_help_position(mut self, max_help_position: usize) -> Self {
        self.max_help_position =
            help_position_limit(self.width, self.indent_increment, max_help_position);
        self
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    fn current(&mut self) -> &mut Section<'a> {
        self.open.last_mut().unwrap_or(&mut self.root)
    }

    pub fn start_section(&mut self, heading: Option<&'a str>) {
        self.current_indent += self.indent_increment;
        self.open.push(Section {
            heading,
            items: Vec::new(),
        });
    }

    pub fn end_section(&mut self) {
        if let Some(section) = self.open.pop() {
            self.current_indent = self.current_indent.saturating_sub(self.indent_increment);
            self.current().items.push(Item::Section(section));
        }
    }

    /// Add a paragraph, such as a description or epilog. `{prog}` is
    /// replaced by the program name.
    pub fn add_text(&mut self, text: Option<&'a str>) {
        if let Some(text) = text.filter(|&text| text != SUPPRESS) {
            self.current().items.push(Item::Text(text));
        }
    }

    pub fn add_usage(
        &mut self,
        usage: &'a Usage,
        actions: impl IntoIterator<Item = &'a Action>,
        groups: Vec<UsageGroup<'a>>,
        prefix: Option<&'a str>,
    ) {
        let custom = match usage {
            Usage::Suppressed => return,
            Usage::Generated => None,
            Usage::Custom(text) => Some(text.as_str()),
        };

        let actions = actions.into_iter().collect();
        self.current().items.push(Item::Usage {
            custom,
            actions,
            groups,
            prefix,
        });
    }

    pub fn add_argument(&mut self, action: &'a Action) {
        if action.help().is_suppressed() {
            return;
        }

        let own = text_width(&self.format_action_invocation(action)) + self.current_indent;
        let nested = action
            .subactions()
            .iter()
            .map(|subaction| {
                text_width(&self.format_action_invocation(subaction))
                    + self.current_indent
                    + self.indent_increment
            })
            .max()
            .unwrap_or(0);

        self.action_max_length = cmp::max(self.action_max_length, cmp::max(own, nested));

        self.current().items.push(Item::Action(action));
    }

    pub fn add_arguments(&mut self, actions: impl IntoIterator<Item = &'a Action>) {
        actions
            .into_iter()
            .for_each(|action| self.add_argument(action));
    }

    /**
    Render the document. Runs of three or more newlines collapse into one
    blank line, and the result is trimmed of blank lines at both ends and
    ends with exactly one newline (or is empty).
    */
    #[must_use]
    pub fn format_help(mut self) -> String {
        while !self.open.is_empty() {
            self.end_section();
        }

        let help_position = cmp::min(self.action_max_length + 2, self.max_help_position);
        let body = self.render_items(&self.root.items, 0, help_position);

        if body.is_empty() {
            return String::new();
        }

        let help = LONG_BREAK.replace_all(&body, "\n\n");
        format!("{}\n", help.trim_matches('\n'))
    }

    fn render_items(&self, items: &[Item<'a>], indent: usize, help_position: usize) -> String {
        items
            .iter()
            .map(|item| match item {
                Item::Text(text) => self.format_text(text, indent),
                Item::Usage {
                    custom,
                    actions,
                    groups,
                    prefix,
                } => self.format_usage(*custom, actions, groups, *prefix, indent),
                Item::Action(action) => self.format_action(action, indent, help_position),
                Item::Section(section) => self.render_section(section, indent, help_position),
            })
            .collect()
    }

    /// Items are indented one step past the heading. A section whose items
    /// all render empty renders empty itself, heading included.
    fn render_section(&self, section: &Section<'a>, indent: usize, help_position: usize) -> String {
        let items = self.render_items(
            &section.items,
            indent + self.indent_increment,
            help_position,
        );

        if items.is_empty() {
            return String::new();
        }

        match section.heading {
            Some(heading) if heading != SUPPRESS => format!("\n{:indent$}{heading}:\n{items}\n", ""),
            _ => format!("\n{items}\n"),
        }
    }

    fn format_text(&self, text: &str, indent: usize) -> String {
        let text = text.replace("{prog}", self.prog);
        let width = cmp::max(self.width.saturating_sub(indent), 11);
        format!("{}\n\n", self.style.fill_text(&text, width, indent))
    }

    /**
    One action's help entry. The label starts at `indent`; help text starts
    at `help_position`, on the same line if the label fits before it and on
    the next line otherwise. Sub-actions follow, one indent step deeper.
    */
    fn format_action(&self, action: &Action, indent: usize, help_position: usize) -> String {
        let help_width = cmp::max(self.width.saturating_sub(help_position), 11);
        let action_width = help_position as isize - indent as isize - 2;
        let header = self.format_action_invocation(action);

        let help = action.help().text().filter(|help| !help.is_empty());

        let (mut out, indent_first) = match help {
            None => (indented(&format!("{header}\n"), indent), 0),
            Some(_) if text_width(&header) as isize <= action_width => {
                let action_width = action_width as usize;
                (format!("{:indent$}{header:<action_width$}  ", ""), 0)
            }
            Some(_) => (indented(&format!("{header}\n"), indent), help_position),
        };

        match help {
            Some(help) if !help.trim().is_empty() => {
                let help = self.expand_help(action);
                let lines = self.style.split_lines(&help, help_width);

                if let Some((first, rest)) = lines.split_first() {
                    let _ = writeln!(out, "{:indent_first$}{first}", "");
                    rest.iter().for_each(|line| {
                        let _ = writeln!(out, "{:help_position$}{line}", "");
                    });
                }
            }
            _ if !out.ends_with('\n') => out.push('\n'),
            _ => {}
        }

        for subaction in action.subactions() {
            out += &self.format_action(subaction, indent + self.indent_increment, help_position);
        }

        out
    }

    /// The label of an action in the help listing: `-f, --foo FOO`, or the
    /// metavar of a positional.
    fn format_action_invocation(&self, action: &Action) -> String {
        let default = self.style.default_metavar(action);

        if action.is_positional() {
            self.metavar_names(action, &default, 1)
                .into_iter()
                .next()
                .unwrap_or_default()
        } else if action.nargs().is_valueless() {
            action.option_strings().join(", ")
        } else {
            format!(
                "{} {}",
                action.option_strings().join(", "),
                self.format_args(action, &default)
            )
        }
    }

    fn metavar_names(&self, action: &Action, default: &str, size: usize) -> Vec<String> {
        let name = match (action.metavar(), action.choices()) {
            (Some(Metavar::Tuple(names)), _) => return names.clone(),
            (Some(Metavar::Name(name)), _) => name.clone(),
            (None, Some(choices)) => choice_set(choices),
            (None, None) => default.to_owned(),
        };

        vec![name; size]
    }

    /// Render the value placeholders of an action according to its nargs.
    pub(crate) fn format_args(&self, action: &Action, default: &str) -> String {
        let names = |size| self.metavar_names(action, default, size);
        let nth = |names: &[String], i: usize| names.get(i).cloned().unwrap_or_default();

        match action.nargs() {
            NArgs::Single => nth(&names(1), 0),
            NArgs::Optional => format!("[{}]", nth(&names(1), 0)),
            NArgs::ZeroOrMore => match names(1).as_slice() {
                [first, second] => format!("[{first} [{second} ...]]"),
                names => format!("[{} ...]", nth(names, 0)),
            },
            NArgs::OneOrMore => {
                let names = names(2);
                format!("{} [{} ...]", nth(&names, 0), nth(&names, 1))
            }
            NArgs::Remainder => "...".to_owned(),
            NArgs::SubCommandAndRemainder => format!("{} ...", nth(&names(1), 0)),
            NArgs::Suppressed => String::new(),
            NArgs::Exact(n) => names(n).iter().take(n).join_with(" ").to_string(),
        }
    }

    fn expand_help(&self, action: &Action) -> String {
        match self.style.help_template(action) {
            Some(template) => expand_placeholders(&template, |name| self.help_param(action, name)),
            None => String::new(),
        }
    }

    /// The value substituted for `{name}` in an action's help. Suppressed
    /// attributes and unknown names are left as they are.
    fn help_param(&self, action: &Action, name: &str) -> Option<String> {
        let or_none = |value: Option<String>| value.unwrap_or_else(|| "None".to_owned());

        Some(match name {
            "prog" => self.prog.to_owned(),
            "option_strings" => format!(
                "[{}]",
                action
                    .option_strings()
                    .iter()
                    .map(|option| format!("'{option}'"))
                    .join_with(", ")
            ),
            "dest" => action.dest()?.to_owned(),
            "nargs" => action.nargs().to_string(),
            "const" => or_none(action.constant().map(Value::to_string)),
            "default" => action.default()?.to_string(),
            "type" => or_none(action.converter().map(|converter| converter.name().to_owned())),
            "choices" => or_none(
                action
                    .choices()
                    .map(|choices| choices.iter().join_with(", ").to_string()),
            ),
            "required" => Value::Bool(action.is_required()).to_string(),
            "help" => action.help().text()?.to_owned(),
            "metavar" => or_none(action.metavar().map(Metavar::to_string)),
            "deprecated" => Value::Bool(action.is_deprecated()).to_string(),
            _ => return None,
        })
    }
}

fn help_position_limit(width: usize, indent_increment: usize, max_help_position: usize) -> usize {
    cmp::min(
        max_help_position,
        cmp::max(width.saturating_sub(20), indent_increment * 2),
    )
}

/// Width of `text` in columns, counted in characters.
pub(crate) fn text_width(text: &str) -> usize {
    text.chars().count()
}

/// Indent each non-empty line of `text` by `indent` spaces.
fn indented(text: &str, indent: usize) -> String {
    let prefix = " ".repeat(indent);
    let mut out = String::with_capacity(text.len() + indent);
    // Writing into a String can't fail.
    let _ = IndentWriter::new(&prefix, &mut out).write_str(text);
    out
}

/// Replace `{name}` placeholders using `lookup`; `{{` and `}}` are literal
/// braces. Placeholders `lookup` doesn't know are kept verbatim.
fn expand_placeholders(template: &str, lookup: impl Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(index) = rest.find(['{', '}']) {
        out.push_str(&rest[..index]);
        let tail = &rest[index..];

        if let Some(tail) = tail.strip_prefix("{{") {
            out.push('{');
            rest = tail;
        } else if let Some(tail) = tail.strip_prefix("}}") {
            out.push('}');
            rest = tail;
        } else if let Some(inner) = tail.strip_prefix('{') {
            match inner.find('}') {
                Some(end) => {
                    let name = &inner[..end];
                    match lookup(name) {
                        Some(value) => out.push_str(&value),
                        None => out.push_str(&tail[..end + 2]),
                    }
                    rest = &inner[end + 1..];
                }
                None => {
                    out.push_str(tail);
                    rest = "";
                }
            }
        } else {
            out.push('}');
            rest = &tail[1..];
        }
    }

    out.push_str(rest);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_section_renders_nothing() {
        let mut formatter = HelpFormatter::new("PROG", HelpStyle::DEFAULT, 78);
        formatter.start_section(Some("empty"));
        formatter.add_text(None);
        formatter.start_section(Some("nested"));
        formatter.end_section();
        formatter.end_section();

        assert_eq!(formatter.format_help(), "");
    }

    #[test]
    fn test_sections_indent_and_collapse_blank_lines() {
        let mut formatter = HelpFormatter::new("PROG", HelpStyle::DEFAULT, 78);
        formatter.add_text(Some("DESCRIPTION"));
        formatter.start_section(Some("title"));
        formatter.add_text(Some("group   description"));
        formatter.end_section();
        formatter.add_text(Some("EPILOG"));

        assert_eq!(
            formatter.format_help(),
            "DESCRIPTION\n\ntitle:\n  group description\n\nEPILOG\n"
        );
    }

    #[test]
    fn test_placeholders() {
        let lookup = |name: &str| (name == "prog").then(|| "PROG".to_owned());

        assert_eq!(
            expand_placeholders("{prog} {{literal}} {unknown} 100%", lookup),
            "PROG {literal} {unknown} 100%"
        );
        assert_eq!(expand_placeholders("open {prog", lookup), "open {prog");
    }

    #[test]
    fn test_help_position_limit() {
        assert_eq!(help_position_limit(78, 2, 24), 24);
        assert_eq!(help_position_limit(13, 2, 24), 4);
    }
}
