use serde_json::Map;

use crate::Value;

/// Arguments handed to an invoked method, either by position or by name.
#[derive(Debug, Clone, PartialEq)]
pub enum Args {
    Positional(Vec<Value>),
    Named(Map<String, Value>),
}

impl Default for Args {
    fn default() -> Self {
        Self::none()
    }
}

impl Args {
    pub fn none() -> Self {
        Self::Positional(Vec::new())
    }

    pub fn positional(values: impl IntoIterator<Item = impl Into<Value>>) -> Self {
        Self::Positional(values.into_iter().map(Into::into).collect())
    }

    pub fn named<K: Into<String>>(values: impl IntoIterator<Item = (K, impl Into<Value>)>) -> Self {
        Self::Named(
            values
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    /// Look up a parameter by its position or by its name, whichever way the args were given.
    pub fn get(&self, index: usize, name: &str) -> Option<&Value> {
        match self {
            Args::Positional(values) => values.get(index),
            Args::Named(values) => values.get(name),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Args::Positional(values) => values.len(),
            Args::Named(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn lookup_follows_the_calling_convention() {
        let positional = Args::positional([json!(1), json!("two")]);
        assert_eq!(positional.get(1, "second"), Some(&json!("two")));
        assert_eq!(positional.get(2, "third"), None);

        let named = Args::named([("second", "two")]);
        assert_eq!(named.get(1, "second"), Some(&json!("two")));
        assert_eq!(named.get(0, "first"), None);

        assert!(Args::default().is_empty());
    }
}
