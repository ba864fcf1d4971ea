/*!
The result of a parse.
*/

use indexmap::IndexMap;

use crate::value::Value;

/**
An insertion-ordered mapping from dest to [`Value`], seeded with defaults
and then mutated by actions as the command line is consumed.

Besides the values themselves, a namespace carries the tokens a sub-command
could not attribute to any of its arguments (drained into the leftovers of
[`parse_known_args`][crate::ArgumentParser::parse_known_args]) and the
deprecation warnings raised while parsing.
*/
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Namespace {
    values: IndexMap<String, Value>,
    unrecognized: Vec<String>,
    warnings: Vec<String>,
}

impl Namespace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, dest: &str) -> Option<&Value> {
        self.values.get(dest)
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, dest: &str) -> bool {
        self.values.contains_key(dest)
    }

    /// Set `dest`, keeping its original position if it was already present.
    pub fn set(&mut self, dest: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(dest.into(), value.into());
    }

    pub fn remove(&mut self, dest: &str) -> Option<Value> {
        self.values.shift_remove(dest)
    }

    /// Take the value at `dest` out of the namespace without disturbing key
    /// order, leaving [`Value::None`] in its place.
    pub(crate) fn take(&mut self, dest: &str) -> Option<Value> {
        self.values.get_mut(dest).map(core::mem::take)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(dest, value)| (dest.as_str(), value))
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Tokens a sub-command parser couldn't attribute to any argument.
    #[inline]
    #[must_use]
    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }

    pub(crate) fn take_unrecognized(&mut self) -> Vec<String> {
        core::mem::take(&mut self.unrecognized)
    }

    /// Deprecation warnings raised while this namespace was populated.
    #[inline]
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn warn(&mut self, message: String) {
        self.warnings.push(message);
    }

    /**
    Fold a sub-command's namespace into this one. Every key is copied, with
    the child winning on collisions; unrecognized tokens and warnings are
    appended.
    */
    pub(crate) fn merge(&mut self, child: Namespace, leftovers: Vec<String>) {
        self.values.extend(child.values);
        self.unrecognized.extend(leftovers);
        self.warnings.extend(child.warnings);
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Namespace {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(dest, value)| (dest.into(), value.into()))
                .collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_child_wins_and_extends_leftovers() {
        let mut parent: Namespace = [("foo", Value::from(1)), ("command", "a".into())]
            .into_iter()
            .collect();
        parent.unrecognized.push("--early".to_owned());

        let child: Namespace = [("foo", Value::from(2)), ("bar", "x".into())]
            .into_iter()
            .collect();

        parent.merge(child, vec!["--x".to_owned()]);

        assert_eq!(parent.get("foo"), Some(&Value::Int(2)));
        assert_eq!(parent.get("bar"), Some(&Value::from("x")));
        assert_eq!(parent.unrecognized(), ["--early", "--x"]);

        let keys: Vec<_> = parent.iter().map(|(dest, _)| dest).collect();
        assert_eq!(keys, ["foo", "command", "bar"]);
    }

    #[test]
    fn test_take_keeps_order() {
        let mut ns: Namespace = [("a", 1), ("b", 2)].into_iter().collect();
        assert_eq!(ns.take("a"), Some(Value::Int(1)));
        ns.set("a", 3);

        let keys: Vec<_> = ns.iter().map(|(dest, _)| dest).collect();
        assert_eq!(keys, ["a", "b"]);
    }
}
