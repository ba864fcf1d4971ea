use parley::{Namespace, Value};

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("no value for {0:?} in the parsed arguments")]
    Missing(&'static str),

    #[error("expected {expected} for {dest:?}, got {}", .found.repr())]
    WrongType {
        dest: &'static str,
        expected: &'static str,
        found: Value,
    },
}

fn lookup<'a, T>(
    namespace: &'a Namespace,
    dest: &'static str,
    expected: &'static str,
    extract: impl FnOnce(&'a Value) -> Option<T>,
) -> Result<T, LookupError> {
    let value = namespace.get(dest).ok_or(LookupError::Missing(dest))?;

    extract(value).ok_or_else(|| LookupError::WrongType {
        dest,
        expected,
        found: value.clone(),
    })
}

pub fn string<'a>(namespace: &'a Namespace, dest: &'static str) -> Result<&'a str, LookupError> {
    lookup(namespace, dest, "a string", Value::as_str)
}

pub fn int(namespace: &Namespace, dest: &'static str) -> Result<i64, LookupError> {
    lookup(namespace, dest, "an integer", Value::as_int)
}

pub fn flag(namespace: &Namespace, dest: &'static str) -> Result<bool, LookupError> {
    lookup(namespace, dest, "a flag", Value::as_bool)
}

/// A list of strings; an unset list is empty.
pub fn strings<'a>(
    namespace: &'a Namespace,
    dest: &'static str,
) -> Result<Vec<&'a str>, LookupError> {
    lookup(namespace, dest, "a list of strings", |value| match value {
        Value::None => Some(Vec::new()),
        value => value
            .as_list()?
            .iter()
            .map(Value::as_str)
            .collect::<Option<Vec<_>>>(),
    })
}
