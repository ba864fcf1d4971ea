/*!
Usage line synthesis: bracketing, mutually exclusive groups, and wrapping.
*/

use std::{collections::BTreeMap, ptr, sync::LazyLock};

use regex::Regex;

use super::{HelpFormatter, UsageGroup, text_width};
use crate::action::Action;

static OPEN_SPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([\[(]) ").expect("static regex must compile"));
static SPACE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r" ([\])])").expect("static regex must compile"));
static EMPTY_PAIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\[(] *[\])]").expect("static regex must compile"));

impl HelpFormatter<'_> {
    /**
    Render a usage block, `usage: PROG [-h] ...` followed by a blank line.
    If the line is too wide it is wrapped with a hanging indent: under the
    end of the program name when that is short, otherwise on lines of their
    own beneath it.
    */
    pub(super) fn format_usage(
        &self,
        custom: Option<&str>,
        actions: &[&Action],
        groups: &[UsageGroup<'_>],
        prefix: Option<&str>,
        indent: usize,
    ) -> String {
        let prefix = prefix.unwrap_or("usage: ");
        let prog = self.prog;

        let usage = match custom {
            Some(custom) => custom.replace("{prog}", prog),
            None if actions.is_empty() => prog.to_owned(),
            None => {
                let (optionals, positionals): (Vec<&Action>, Vec<&Action>) =
                    actions.iter().copied().partition(|action| !action.is_positional());

                let combined: Vec<&Action> =
                    optionals.iter().chain(&positionals).copied().collect();
                let action_usage = self.format_actions_usage(&combined, groups);

                let usage = match action_usage.as_str() {
                    "" => prog.to_owned(),
                    action_usage => format!("{prog} {action_usage}"),
                };

                let width = self.width.saturating_sub(indent);

                if text_width(prefix) + text_width(&usage) > width {
                    let optionals = self.format_actions_usage(&optionals, groups);
                    let positionals = self.format_actions_usage(&positionals, groups);

                    wrap_usage(
                        prog,
                        prefix,
                        &usage_parts(&optionals),
                        &usage_parts(&positionals),
                        width,
                    )
                } else {
                    usage
                }
            }
        };

        format!("{prefix}{usage}\n\n")
    }

    /// The usage fragments of `actions`, with mutually exclusive groups that
    /// appear as contiguous runs bracketed and separated by `|`.
    pub(crate) fn format_actions_usage(
        &self,
        actions: &[&Action],
        groups: &[UsageGroup<'_>],
    ) -> String {
        let mut grouped = vec![false; actions.len()];
        let mut inserts: BTreeMap<usize, String> = BTreeMap::new();

        for group in groups {
            let Some(&first) = group.actions.first() else {
                continue;
            };

            let Some(start) = actions.iter().position(|&action| ptr::eq(action, first)) else {
                continue;
            };

            let end = start + group.actions.len();

            // Groups that aren't a contiguous run here are rendered as if
            // ungrouped.
            let contiguous = actions.get(start..end).is_some_and(|run| {
                run.iter()
                    .zip(&group.actions)
                    .all(|(&a, &b)| ptr::eq(a, b))
            });

            if !contiguous {
                continue;
            }

            grouped[start..end].fill(true);

            let suppressed = group
                .actions
                .iter()
                .filter(|action| action.help().is_suppressed())
                .count();

            let brackets = match (group.required, group.actions.len() - suppressed) {
                (false, _) => Some(('[', ']')),
                (true, exposed) if exposed > 1 => Some(('(', ')')),
                (true, _) => None,
            };

            if let Some((open, close)) = brackets {
                inserts
                    .entry(start)
                    .and_modify(|insert| {
                        insert.push(' ');
                        insert.push(open);
                    })
                    .or_insert_with(|| open.to_string());

                inserts
                    .entry(end)
                    .and_modify(|insert| insert.push(close))
                    .or_insert_with(|| close.to_string());
            }

            for i in start + 1..end {
                inserts.insert(i, "|".to_owned());
            }
        }

        let mut parts: Vec<Option<String>> = Vec::with_capacity(actions.len());

        for (i, &action) in actions.iter().enumerate() {
            if action.help().is_suppressed() {
                parts.push(None);

                if inserts.get(&i).is_some_and(|insert| insert == "|") {
                    inserts.remove(&i);
                } else if inserts.get(&(i + 1)).is_some_and(|insert| insert == "|") {
                    inserts.remove(&(i + 1));
                }
            } else if action.is_positional() {
                let default = self.style.default_metavar(action);
                let part = self.format_args(action, &default);

                // Group brackets replace the optional brackets of a member.
                let stripped = part
                    .strip_prefix('[')
                    .and_then(|inner| inner.strip_suffix(']'))
                    .filter(|_| grouped[i])
                    .map(str::to_owned);
                let part = stripped.unwrap_or(part);

                parts.push(Some(part));
            } else {
                let part = if action.nargs().is_valueless() {
                    action.format_usage()
                } else {
                    let default = self.style.default_metavar(action);
                    let option_string = action.option_strings().first().map_or("", String::as_str);
                    format!("{option_string} {}", self.format_args(action, &default))
                };

                if action.is_required() || grouped[i] {
                    parts.push(Some(part));
                } else {
                    parts.push(Some(format!("[{part}]")));
                }
            }
        }

        for (&i, insert) in inserts.iter().rev() {
            parts.insert(i.min(parts.len()), Some(insert.clone()));
        }

        let text = parts.into_iter().flatten().collect::<Vec<_>>().join(" ");

        let text = OPEN_SPACE.replace_all(&text, "$1");
        let text = SPACE_CLOSE.replace_all(&text, "$1");
        let text = EMPTY_PAIR.replace_all(&text, "");
        text.trim().to_owned()
    }
}

/**
Split a usage string into atomic parts. A run starting with `(` or `[` is
kept whole up to the first closing bracket run that is followed by
whitespace or the end of the text; anything else splits on whitespace.
*/
fn usage_parts(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut rest = text.trim_start();

    while !rest.is_empty() {
        let end = bracketed_len(rest)
            .unwrap_or_else(|| rest.find(char::is_whitespace).unwrap_or(rest.len()));

        let (part, tail) = rest.split_at(end);
        parts.push(part);
        rest = tail.trim_start();
    }

    parts
}

fn bracketed_len(text: &str) -> Option<usize> {
    let close = match text.chars().next()? {
        '(' => ')',
        '[' => ']',
        _ => return None,
    };

    let bytes = text.as_bytes();
    let close = close as u8;
    let mut i = 1;

    while i < bytes.len() {
        // `.` doesn't cross lines
        if bytes[i] == b'\n' {
            return None;
        }

        if bytes[i] == close {
            let mut run_end = i;
            while run_end < bytes.len() && bytes[run_end] == close {
                run_end += 1;
            }

            if run_end == bytes.len() || bytes[run_end].is_ascii_whitespace() {
                return Some(run_end);
            }
        }

        i += 1;
    }

    None
}

/// Greedily pack `parts` into lines no wider than `width`. Lines are
/// indented by `indent`, except that a `prefix` takes the place of the
/// indent on the first line.
fn pack_lines(parts: &[&str], indent: usize, prefix: Option<&str>, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line: Vec<&str> = Vec::new();
    let pad = " ".repeat(indent);

    let mut line_len = match prefix {
        Some(prefix) => text_width(prefix) as isize - 1,
        None => indent as isize - 1,
    };

    for &part in parts {
        let part_len = text_width(part) as isize;

        if line_len + 1 + part_len > width as isize && !line.is_empty() {
            lines.push(format!("{pad}{}", line.join(" ")));
            line.clear();
            line_len = indent as isize - 1;
        }

        line.push(part);
        line_len += part_len + 1;
    }

    if !line.is_empty() {
        lines.push(format!("{pad}{}", line.join(" ")));
    }

    if prefix.is_some() {
        if let Some(first) = lines.first_mut() {
            first.replace_range(..indent.min(first.len()), "");
        }
    }

    lines
}

fn wrap_usage(
    prog: &str,
    prefix: &str,
    optionals: &[&str],
    positionals: &[&str],
    width: usize,
) -> String {
    let lines = if 4 * (text_width(prefix) + text_width(prog)) <= 3 * width {
        let indent = text_width(prefix) + text_width(prog) + 1;

        if !optionals.is_empty() {
            let first: Vec<&str> = core::iter::once(prog).chain(optionals.iter().copied()).collect();
            let mut lines = pack_lines(&first, indent, Some(prefix), width);
            lines.extend(pack_lines(positionals, indent, None, width));
            lines
        } else if !positionals.is_empty() {
            let first: Vec<&str> = core::iter::once(prog).chain(positionals.iter().copied()).collect();
            pack_lines(&first, indent, Some(prefix), width)
        } else {
            vec![prog.to_owned()]
        }
    } else {
        let indent = text_width(prefix);
        let all: Vec<&str> = optionals.iter().chain(positionals).copied().collect();
        let mut lines = pack_lines(&all, indent, None, width);

        if lines.len() > 1 {
            lines = pack_lines(optionals, indent, None, width);
            lines.extend(pack_lines(positionals, indent, None, width));
        }

        core::iter::once(prog.to_owned()).chain(lines).collect()
    };

    lines.join("\n")
}
