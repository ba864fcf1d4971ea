/*!
Sub-command dispatch. A dispatcher is a positional action whose first value
selects a child [`ArgumentParser`]; the remaining values are parsed by that
child and merged back into the parent namespace.
*/

use std::collections::HashSet;

use indexmap::IndexMap;
use joinery::JoinableIterator;
use tracing::{debug, warn};

use crate::{
    action::Action,
    errors::{ArgumentError, ParseError},
    namespace::Namespace,
    parser::{ArgumentParser, ParserBuilder},
    value::Value,
};

/**
The declaration of one sub-command, registered with
[`ArgumentParser::add_subparser`].

```
use parley::{ArgumentParser, Subcommand};

let mut parser = ArgumentParser::new("git");
parser.add_subparsers(Default::default()).unwrap();

let checkout = parser
    .add_subparser(Subcommand::new("checkout").alias("co").help("switch branches"))
    .unwrap();
assert_eq!(checkout.prog(), "git checkout");
```
*/
#[derive(Debug, Clone)]
#[must_use]
pub struct Subcommand {
    name: String,
    aliases: Vec<String>,
    help: Option<String>,
    deprecated: bool,
    parser: ParserBuilder,
}

impl Subcommand {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            help: None,
            deprecated: false,
            parser: ParserBuilder::default(),
        }
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Help text for the sub-command's entry in the parent's help. Without
    /// it, the sub-command is only listed in the `{a,b,c}` choice set.
    pub fn help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Using this sub-command, or any of its aliases, records a warning.
    pub fn deprecated(mut self, deprecated: bool) -> Self {
        self.deprecated = deprecated;
        self
    }

    /// Configure the child parser. Its prog defaults to the parent's usage
    /// prefix followed by the sub-command name.
    pub fn parser(mut self, parser: ParserBuilder) -> Self {
        self.parser = parser;
        self
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// The set of sub-commands attached to a dispatcher action.
#[derive(Debug, Clone)]
pub struct SubCommands {
    prog_prefix: String,
    parsers: IndexMap<String, ArgumentParser>,
    aliases: IndexMap<String, String>,
    deprecated: HashSet<String>,
    names: Vec<String>,
    choice_actions: Vec<Action>,
}

impl SubCommands {
    pub(crate) fn new(prog_prefix: String) -> Self {
        Self {
            prog_prefix,
            parsers: IndexMap::new(),
            aliases: IndexMap::new(),
            deprecated: HashSet::new(),
            names: Vec::new(),
            choice_actions: Vec::new(),
        }
    }

    /// The prefix every child prog starts with, such as `git` or
    /// `PROG --foo FOO spam`.
    #[inline]
    #[must_use]
    pub fn prog_prefix(&self) -> &str {
        &self.prog_prefix
    }

    /// Every accepted name, aliases included, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.parsers.contains_key(name) || self.aliases.contains_key(name)
    }

    /// Look up a child parser by name or alias.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ArgumentParser> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.parsers.get(name)
    }

    pub(crate) fn get_mut(&mut self, name: &str) -> Option<&mut ArgumentParser> {
        let name = self.aliases.get(name).map_or(name, String::as_str);
        self.parsers.get_mut(name)
    }

    pub(crate) fn choice_actions(&self) -> &[Action] {
        &self.choice_actions
    }

    /// Register a child parser. `dispatcher` is the display name of the
    /// owning action, used to attribute conflicts.
    pub(crate) fn add(
        &mut self,
        command: Subcommand,
        dispatcher: Option<String>,
    ) -> Result<(), ArgumentError> {
        let Subcommand {
            name,
            aliases,
            help,
            deprecated,
            mut parser,
        } = command;

        if self.contains(&name) {
            return Err(ArgumentError::new(
                dispatcher,
                format!("conflicting subparser: {name}"),
            ));
        }

        for (i, alias) in aliases.iter().enumerate() {
            if alias == &name || self.contains(alias) || aliases[..i].contains(alias) {
                return Err(ArgumentError::new(
                    dispatcher,
                    format!("conflicting subparser alias: {alias}"),
                ));
            }
        }

        if parser.prog.is_none() {
            parser.prog = Some(format!("{} {name}", self.prog_prefix));
        }

        if let Some(help) = help {
            self.choice_actions
                .push(Action::choice(&name, &aliases, help));
        }

        if deprecated {
            self.deprecated.insert(name.clone());
            self.deprecated.extend(aliases.iter().cloned());
        }

        self.names.push(name.clone());
        for alias in aliases {
            self.names.push(alias.clone());
            self.aliases.insert(alias, name.clone());
        }

        self.parsers.insert(name, parser.build());
        Ok(())
    }

    /**
    Run the sub-command selected by the first of `values`. The dispatcher's
    dest, if any, receives the name as typed; everything the child parser
    sets is merged into `namespace`, and whatever it didn't recognize joins
    the parent's unrecognized tokens.
    */
    pub(crate) fn dispatch(
        &self,
        action: &Action,
        namespace: &mut Namespace,
        values: Value,
    ) -> Result<(), ParseError> {
        let tokens: Vec<String> = match values {
            Value::List(items) => items.iter().map(ToString::to_string).collect(),
            value => vec![value.to_string()],
        };

        let Some((name, rest)) = tokens.split_first() else {
            return Ok(());
        };

        if let Some(dest) = action.dest() {
            namespace.set(dest, name.as_str());
        }

        let Some(parser) = self.get(name) else {
            return Err(ArgumentError::new(
                action.display_name(),
                format!(
                    "unknown parser {} (choices: {})",
                    Value::from(name.as_str()).repr(),
                    self.names.iter().join_with(", ")
                ),
            )
            .into());
        };

        if self.deprecated.contains(name) {
            let message = format!("command '{name}' is deprecated");
            warn!(prog = parser.prog(), "{message}");
            namespace.warn(message);
        }

        debug!(command = %name, prog = parser.prog(), args = rest.len(), "dispatching to sub-command");

        let (child, leftovers) = parser.parse_known_args(rest)?;
        namespace.merge(child, leftovers);
        Ok(())
    }
}
