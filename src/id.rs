use std::{borrow::Cow, cell::Cell, fmt::Display, rc::Rc};

use serde::Serialize;

/// Identity of a run, either chosen by the caller or handed out by a [`RunIdSequence`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RunId {
    Int(i64),
    Str(Cow<'static, str>),
}

impl Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RunId::Int(id) => write!(f, "{id}"),
            RunId::Str(id) => f.write_str(id),
        }
    }
}

impl From<i64> for RunId {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<i32> for RunId {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<&'static str> for RunId {
    fn from(value: &'static str) -> Self {
        Self::Str(value.into())
    }
}

impl From<String> for RunId {
    fn from(value: String) -> Self {
        Self::Str(value.into())
    }
}

/// The counter behind unlabelled runs.
///
/// Cloning a sequence shares it, so every [`Pilot`](crate::Pilot) built from clones of the
/// same root keeps handing out unique ids.
#[derive(Debug, Clone, Default)]
pub struct RunIdSequence(Rc<Cell<i64>>);

impl RunIdSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> RunId {
        let id = self.0.get();
        self.0.set(id + 1);
        RunId::Int(id)
    }

    /// The id the next call to [`next_id`](Self::next_id) would return.
    pub fn peek(&self) -> RunId {
        RunId::Int(self.0.get())
    }
}
