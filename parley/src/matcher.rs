/*!
The matching loop. Every token is first classified as an option (`O`), an
argument (`A`), or the `--` terminator (`-`); the resulting pattern string
is then matched against each action's nargs pattern to decide how many
tokens it consumes.
*/

use std::collections::{HashMap, HashSet};

use joinery::JoinableIterator;
use parley_parser::{RawOption, Token, Tokenizer, is_negative_number};
use regex::Regex;
use tracing::{trace, warn};

use crate::{
    ArgumentParser,
    action::Action,
    errors::{ArgumentError, ParseError},
    namespace::Namespace,
    nargs::NArgs,
    value::Value,
};

/// A token resolved to an option. `action` is [`None`] for option-looking
/// tokens that no registered option claims.
#[derive(Debug, Clone, Copy)]
struct OptionMatch<'a> {
    action: Option<usize>,
    option_string: &'a str,
    explicit: Option<&'a str>,
    /// True if `explicit` followed an `=`.
    separator: bool,
}

/// Run the matcher over `args`, applying actions to `namespace`. Returns
/// the tokens nothing claimed.
pub(crate) fn parse(
    parser: &ArgumentParser,
    args: &[String],
    namespace: &mut Namespace,
) -> Result<Vec<String>, ParseError> {
    let mut matcher = Matcher::new(parser, args)?;
    matcher.run(namespace)?;
    matcher.finish(namespace)?;
    Ok(matcher.extras)
}

struct Matcher<'a> {
    parser: &'a ArgumentParser,
    args: &'a [String],
    pattern: String,
    options: Vec<Option<OptionMatch<'a>>>,
    positionals: Vec<usize>,
    conflicts: HashMap<usize, Vec<usize>>,
    seen: HashSet<usize>,
    seen_non_default: HashSet<usize>,
    warned: HashSet<String>,
    extras: Vec<String>,
}

impl<'a> Matcher<'a> {
    fn new(parser: &'a ArgumentParser, args: &'a [String]) -> Result<Self, ArgumentError> {
        let mut pattern = String::with_capacity(args.len());
        let mut options = Vec::with_capacity(args.len());

        let tokens = Tokenizer::new(parser.prefixes(), args.iter().map(String::as_str));

        for token in tokens {
            let option = match token {
                Token::Positional(_) => None,
                Token::Terminator => {
                    pattern.push('-');
                    options.push(None);
                    continue;
                }
                Token::Option(raw) => resolve_option(parser, raw)?,
            };

            pattern.push(if option.is_some() { 'O' } else { 'A' });
            options.push(option);
        }

        let mut conflicts: HashMap<usize, Vec<usize>> = HashMap::new();
        for group in &parser.exclusive {
            for &member in &group.actions {
                conflicts.entry(member).or_default().extend(
                    group
                        .actions
                        .iter()
                        .copied()
                        .filter(|&other| other != member),
                );
            }
        }

        let positionals = parser
            .actions
            .iter()
            .enumerate()
            .filter(|(_, action)| action.is_positional())
            .map(|(index, _)| index)
            .collect();

        Ok(Self {
            parser,
            args,
            pattern,
            options,
            positionals,
            conflicts,
            seen: HashSet::new(),
            seen_non_default: HashSet::new(),
            warned: HashSet::new(),
            extras: Vec::new(),
        })
    }

    fn action(&self, index: usize) -> &'a Action {
        &self.parser.actions[index]
    }

    /// Alternate between runs of positionals and single options until every
    /// option token has been consumed, then give the trailing tokens to the
    /// remaining positionals.
    fn run(&mut self, namespace: &mut Namespace) -> Result<(), ParseError> {
        let Some(last_option) = self.options.iter().rposition(Option::is_some) else {
            let stop = self.consume_positionals(0, namespace)?;
            self.extras.extend(self.args[stop..].iter().cloned());
            return Ok(());
        };

        let mut start = 0;

        while start <= last_option {
            let next_option = (start..=last_option)
                .find(|&index| self.options[index].is_some())
                .unwrap_or(last_option);

            if start != next_option {
                let stop = self.consume_positionals(start, namespace)?;
                if stop > start {
                    start = stop;
                    continue;
                }
            }

            if self.options[start].is_none() {
                self.extras
                    .extend(self.args[start..next_option].iter().cloned());
                start = next_option;
            }

            start = self.consume_optional(start, namespace)?;
        }

        let stop = self.consume_positionals(start, namespace)?;
        self.extras.extend(self.args[stop..].iter().cloned());
        Ok(())
    }

    /// Consume the option at `start` along with its arguments, expanding
    /// short flag clusters like `-xyz`. Returns the index after the last
    /// consumed token.
    fn consume_optional(&mut self, start: usize, namespace: &mut Namespace) -> Result<usize, ParseError> {
        let Some(mut current) = self.options[start] else {
            return Ok(start + 1);
        };

        let args = self.args;
        let prefixes = self.parser.prefixes();
        let mut pending: Vec<(usize, Vec<&'a str>, &'a str)> = Vec::new();

        let stop = loop {
            let Some(index) = current.action else {
                self.extras.push(self.args[start].clone());
                return Ok(start + 1);
            };

            let action = self.action(index);

            let Some(explicit) = current.explicit else {
                let begin = start + 1;
                let count = match_argument(action, &self.pattern[begin..])?;
                let stop = begin + count;
                let values = args[begin..stop].iter().map(String::as_str).collect();
                pending.push((index, values, current.option_string));
                break stop;
            };

            let count = match_argument(action, "A")?;
            let mut chars = current.option_string.chars();
            let (Some(prefix), Some(flag)) = (chars.next(), chars.next()) else {
                return Err(ignored_explicit(action, explicit).into());
            };

            let mut rest = explicit.chars();
            match (count, rest.next()) {
                (0, Some(next)) if !prefixes.contains(flag) => {
                    if current.separator || prefixes.contains(next) {
                        return Err(ignored_explicit(action, explicit).into());
                    }

                    pending.push((index, Vec::new(), current.option_string));

                    let option = format!("{prefix}{next}");
                    let Some((option_string, &next_index)) =
                        self.parser.option_index.get_key_value(option.as_str())
                    else {
                        self.extras.push(format!("{prefix}{explicit}"));
                        break start + 1;
                    };

                    let remainder = rest.as_str();
                    current = OptionMatch {
                        action: Some(next_index),
                        option_string,
                        explicit: (!remainder.is_empty())
                            .then(|| remainder.strip_prefix('=').unwrap_or(remainder)),
                        separator: remainder.starts_with('='),
                    };
                }
                (1, _) => {
                    pending.push((index, vec![explicit], current.option_string));
                    break start + 1;
                }
                _ => return Err(ignored_explicit(action, explicit).into()),
            }
        };

        for (index, values, option_string) in pending {
            let action = self.action(index);

            if action.is_deprecated() && self.warned.insert(option_string.to_owned()) {
                let message = format!("option '{option_string}' is deprecated");
                warn!(prog = self.parser.prog(), "{message}");
                namespace.warn(message);
            }

            trace!(option = option_string, values = values.len(), "consumed option");
            self.take_action(index, values, Some(option_string), namespace)?;
        }

        Ok(stop)
    }

    /// Match as many of the remaining positionals as possible against the
    /// tokens starting at `start`. Returns the index after the last consumed
    /// token.
    fn consume_positionals(&mut self, start: usize, namespace: &mut Namespace) -> Result<usize, ParseError> {
        let args = self.args;
        let counts = self.match_partial(&self.pattern[start..]);
        let positionals: Vec<usize> = self.positionals.drain(..counts.len()).collect();
        let mut start = start;

        for (index, count) in positionals.into_iter().zip(counts) {
            let values: Vec<&'a str> = args[start..start + count]
                .iter()
                .map(String::as_str)
                .collect();
            start += count;

            let action = self.action(index);
            if !values.is_empty() && action.is_deprecated() {
                let name = action.dest().unwrap_or_default();
                if self.warned.insert(name.to_owned()) {
                    let message = format!("argument '{name}' is deprecated");
                    warn!(prog = self.parser.prog(), "{message}");
                    namespace.warn(message);
                }
            }

            self.take_action(index, values, None, namespace)?;
        }

        Ok(start)
    }

    /**
    The per-action token counts for the longest prefix of the remaining
    positionals that matches `pattern`. Empty if not even the first
    positional matches.
    */
    fn match_partial(&self, pattern: &str) -> Vec<usize> {
        (1..=self.positionals.len())
            .rev()
            .find_map(|len| {
                let joined: String = self.positionals[..len]
                    .iter()
                    .map(|&index| self.action(index).nargs().pattern(false))
                    .collect();

                let regex = anchored(&joined)?;
                let captures = regex.captures(pattern)?;

                Some(
                    captures
                        .iter()
                        .skip(1)
                        .map(|group| group.map_or(0, |group| group.len()))
                        .collect(),
                )
            })
            .unwrap_or_default()
    }

    fn take_action(
        &mut self,
        index: usize,
        strings: Vec<&str>,
        option_string: Option<&str>,
        namespace: &mut Namespace,
    ) -> Result<(), ParseError> {
        let action = self.action(index);
        self.seen.insert(index);

        let Some((values, from_default)) = values(action, strings)? else {
            return Ok(());
        };

        if !from_default {
            self.seen_non_default.insert(index);

            let conflict = self
                .conflicts
                .get(&index)
                .into_iter()
                .flatten()
                .find(|&&other| self.seen_non_default.contains(&other));

            if let Some(&other) = conflict {
                let name = self.action(other).display_name();
                return Err(ArgumentError::new(
                    action.display_name(),
                    format!(
                        "not allowed with argument {}",
                        name.as_deref().unwrap_or("None")
                    ),
                )
                .into());
            }
        }

        action.apply(self.parser, namespace, values, option_string)
    }

    /// Check requiredness, then convert string defaults of actions that were
    /// never seen.
    fn finish(&self, namespace: &mut Namespace) -> Result<(), ParseError> {
        let mut missing = Vec::new();

        for (index, action) in self.parser.actions.iter().enumerate() {
            if self.seen.contains(&index) {
                continue;
            }

            if action.is_required() {
                missing.extend(action.display_name());
                continue;
            }

            let (Some(dest), Some(Value::Str(default)), Some(_)) =
                (action.dest(), action.default(), action.converter())
            else {
                continue;
            };

            if namespace.get(dest).and_then(Value::as_str) == Some(default.as_str()) {
                let value = convert(action, default)?;
                namespace.set(dest, value);
            }
        }

        if !missing.is_empty() {
            return Err(ArgumentError::general(format!(
                "the following arguments are required: {}",
                missing.join(", ")
            ))
            .into());
        }

        for group in self.parser.exclusive.iter().filter(|group| group.required) {
            if group
                .actions
                .iter()
                .any(|index| self.seen_non_default.contains(index))
            {
                continue;
            }

            let names = group
                .actions
                .iter()
                .map(|&index| self.action(index))
                .filter(|action| !action.help().is_suppressed())
                .filter_map(Action::display_name);

            return Err(ArgumentError::general(format!(
                "one of the arguments {} is required",
                names.join_with(" ")
            ))
            .into());
        }

        Ok(())
    }
}

/**
Decide whether an option-looking token is an option, and which one.
Returns [`None`] for tokens that should be treated as positional values,
such as negative numbers or strings containing spaces.
*/
fn resolve_option<'a>(
    parser: &'a ArgumentParser,
    raw: RawOption<'a>,
) -> Result<Option<OptionMatch<'a>>, ArgumentError> {
    let text = raw.text();

    if let Some(&index) = parser.option_index.get(text) {
        return Ok(Some(OptionMatch {
            action: Some(index),
            option_string: text,
            explicit: None,
            separator: false,
        }));
    }

    if let Some((option, value)) = raw.split_value() {
        if let Some(&index) = parser.option_index.get(option) {
            return Ok(Some(OptionMatch {
                action: Some(index),
                option_string: option,
                explicit: Some(value),
                separator: true,
            }));
        }
    }

    match option_prefix_matches(parser, raw).as_slice() {
        [] => {}
        [single] => return Ok(Some(*single)),
        matches => {
            return Err(ArgumentError::general(format!(
                "ambiguous option: {text} could match {}",
                matches.iter().map(|m| m.option_string).join_with(", ")
            )));
        }
    }

    if is_negative_number(text) && !parser.negative_number_options {
        return Ok(None);
    }

    if text.contains(' ') {
        return Ok(None);
    }

    Ok(Some(OptionMatch {
        action: None,
        option_string: text,
        explicit: None,
        separator: false,
    }))
}

/// Registered options that `raw` could be an abbreviation of, or, for a
/// short option, the option it starts with.
fn option_prefix_matches<'a>(parser: &'a ArgumentParser, raw: RawOption<'a>) -> Vec<OptionMatch<'a>> {
    let text = raw.text();
    let options = parser.option_index.iter();

    if raw.is_long() {
        if !parser.allow_abbrev {
            return Vec::new();
        }

        let (prefix, explicit) = match raw.split_value() {
            Some((prefix, value)) => (prefix, Some(value)),
            None => (text, None),
        };

        options
            .filter(|(option, _)| option.starts_with(prefix))
            .map(|(option, &index)| OptionMatch {
                action: Some(index),
                option_string: option,
                explicit,
                separator: explicit.is_some(),
            })
            .collect()
    } else {
        let Some((short, rest)) = raw.split_short() else {
            return Vec::new();
        };

        options
            .filter_map(|(option, &index)| {
                if option == short {
                    Some(OptionMatch {
                        action: Some(index),
                        option_string: option,
                        explicit: Some(rest),
                        separator: false,
                    })
                } else if parser.allow_abbrev && option.starts_with(text) {
                    Some(OptionMatch {
                        action: Some(index),
                        option_string: option,
                        explicit: None,
                        separator: false,
                    })
                } else {
                    None
                }
            })
            .collect()
    }
}

fn anchored(pattern: &str) -> Option<Regex> {
    Regex::new(&format!("^(?:{pattern})")).ok()
}

/// The number of tokens `action` consumes at the start of `pattern`.
fn match_argument(action: &Action, pattern: &str) -> Result<usize, ArgumentError> {
    let nargs = action.nargs();

    anchored(&nargs.pattern(!action.is_positional()))
        .and_then(|regex| regex.captures(pattern))
        .and_then(|captures| captures.get(1))
        .map(|group| group.len())
        .ok_or_else(|| {
            let message = match nargs {
                NArgs::Single => "expected one argument".to_owned(),
                NArgs::Optional => "expected at most one argument".to_owned(),
                NArgs::OneOrMore => "expected at least one argument".to_owned(),
                NArgs::Exact(1) => "expected 1 argument".to_owned(),
                nargs => format!("expected {nargs} arguments"),
            };
            ArgumentError::new(action.display_name(), message)
        })
}

fn ignored_explicit(action: &Action, explicit: &str) -> ArgumentError {
    ArgumentError::new(
        action.display_name(),
        format!("ignored explicit argument {}", Value::from(explicit).repr()),
    )
}

/**
Turn the tokens an action consumed into the value it's applied with. The
flag is true when the value is the action's own default, which doesn't
count as "seen" for mutual exclusion. Returns [`None`] if nothing should be
applied at all.
*/
fn values(action: &Action, mut strings: Vec<&str>) -> Result<Option<(Value, bool)>, ArgumentError> {
    let nargs = action.nargs();

    if action.is_positional()
        && !matches!(nargs, NArgs::Remainder | NArgs::SubCommandAndRemainder)
    {
        if let Some(terminator) = strings.iter().position(|&s| s == "--") {
            strings.remove(terminator);
        }
    }

    let value = match (nargs, strings.as_slice()) {
        (NArgs::Optional, []) => {
            let value = if action.is_positional() {
                match action.default() {
                    Some(default) => default.clone(),
                    None => return Ok(None),
                }
            } else {
                action.constant().cloned().unwrap_or_default()
            };

            let value = match value {
                Value::Str(ref token) if action.converter().is_some() => convert(action, token)?,
                value => value,
            };

            let from_default = action.default() == Some(&value);
            return Ok(Some((value, from_default)));
        }
        (NArgs::ZeroOrMore, []) if action.is_positional() => {
            return Ok(match action.default() {
                None => None,
                Some(Value::None) => Some((Value::list([]), false)),
                Some(default) => Some((default.clone(), true)),
            });
        }
        (NArgs::Single | NArgs::Optional, [token]) => {
            let value = convert(action, token)?;
            check_choice(action, &value)?;
            value
        }
        (NArgs::Remainder, strings) => Value::list(
            strings
                .iter()
                .map(|token| convert(action, token))
                .collect::<Result<Vec<_>, _>>()?,
        ),
        (NArgs::SubCommandAndRemainder, strings) => {
            let values = strings
                .iter()
                .map(|token| convert(action, token))
                .collect::<Result<Vec<_>, _>>()?;

            if let Some(first) = values.first() {
                check_choice(action, first)?;
            }

            Value::list(values)
        }
        (NArgs::Suppressed, _) => return Ok(None),
        (_, strings) => {
            let values = strings
                .iter()
                .map(|token| convert(action, token))
                .collect::<Result<Vec<_>, _>>()?;

            for value in &values {
                check_choice(action, value)?;
            }

            Value::list(values)
        }
    };

    Ok(Some((value, false)))
}

fn convert(action: &Action, token: &str) -> Result<Value, ArgumentError> {
    let Some(converter) = action.converter() else {
        return Ok(Value::from(token));
    };

    converter.convert(token).map_err(|error| {
        let message = match error.message() {
            Some(message) => message.to_owned(),
            None => format!(
                "invalid {} value: {}",
                converter.name(),
                Value::from(token).repr()
            ),
        };
        ArgumentError::new(action.display_name(), message)
    })
}

fn check_choice(action: &Action, value: &Value) -> Result<(), ArgumentError> {
    match action.choices() {
        Some(choices) if !choices.contains(value) => Err(ArgumentError::new(
            action.display_name(),
            format!(
                "invalid choice: {} (choose from {})",
                value.repr(),
                choices.iter().map(Value::repr).join_with(", ")
            ),
        )),
        _ => Ok(()),
    }
}
