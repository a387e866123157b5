use std::{
    any::type_name,
    error::Error as StdError,
    fmt::{Debug, Display},
};

use serde::{Serialize, Serializer, ser::SerializeStruct};

use crate::Value;

/// What a test body left behind.
#[derive(Debug)]
pub enum Outcome {
    /// The body returned normally.
    Value(Value),
    /// The body returned an error of the expected-failure category.
    Error(CaughtError),
}

impl Outcome {
    pub fn value(&self) -> Option<&Value> {
        match self {
            Outcome::Value(value) => Some(value),
            Outcome::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&CaughtError> {
        match self {
            Outcome::Value(_) => None,
            Outcome::Error(err) => Some(err),
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Outcome::Error(_))
    }
}

impl From<TestResult> for Outcome {
    fn from(value: TestResult) -> Self {
        match value.0 {
            Ok(value) => Outcome::Value(value),
            Err(err) => Outcome::Error(err),
        }
    }
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Outcome::Value(value) => {
                let mut s = serializer.serialize_struct("Outcome", 1)?;
                s.serialize_field("value", value)?;
                s.end()
            }
            Outcome::Error(err) => {
                let mut s = serializer.serialize_struct("Outcome", 1)?;
                s.serialize_field("error", err)?;
                s.end()
            }
        }
    }
}

/// An error a test body returned instead of a value.
///
/// Anything implementing [`std::error::Error`] converts into it, so `?` works inside test
/// bodies returning `Result<_, CaughtError>`. The concrete type is remembered to allow
/// "was an error of type X raised" checks after the fact.
///
/// Panics are not caught errors. They unwind straight through the pilot.
pub struct CaughtError {
    inner: Box<dyn StdError + Send + Sync + 'static>,
    type_name: &'static str,
}

impl CaughtError {
    pub fn new<E: StdError + Send + Sync + 'static>(err: E) -> Self {
        Self {
            inner: Box::new(err),
            type_name: type_name::<E>(),
        }
    }

    /// Wrap a plain message, for bodies that have no dedicated error type at hand.
    pub fn msg(message: impl Into<String>) -> Self {
        Self::new(Message(message.into()))
    }

    /// Wrap an already boxed error. The concrete type name is lost in the process.
    pub fn from_boxed(err: Box<dyn StdError + Send + Sync + 'static>) -> Self {
        Self {
            inner: err,
            type_name: type_name::<Box<dyn StdError + Send + Sync>>(),
        }
    }

    pub fn is<E: StdError + 'static>(&self) -> bool {
        self.inner.is::<E>()
    }

    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Full type path of the wrapped error, e.g. `std::num::ParseIntError`.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Last path segment of the type name, generics stripped, e.g. `ParseIntError`.
    pub fn kind(&self) -> &'static str {
        let path = self.type_name.split('<').next().unwrap_or(self.type_name);
        path.rsplit("::").next().unwrap_or(path)
    }

    /// Whether `name` designates this error, either by full path or by [`kind`](Self::kind).
    pub fn matches_kind(&self, name: &str) -> bool {
        name == self.type_name || name == self.kind()
    }

    pub fn message(&self) -> String {
        self.inner.to_string()
    }

    pub fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

impl<E: StdError + Send + Sync + 'static> From<E> for CaughtError {
    fn from(err: E) -> Self {
        Self::new(err)
    }
}

impl Debug for CaughtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CaughtError")
            .field("type_name", &self.type_name)
            .field("inner", &self.inner)
            .finish()
    }
}

impl Display for CaughtError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.inner, f)
    }
}

impl Serialize for CaughtError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("CaughtError", 2)?;
        s.serialize_field("type", self.type_name)?;
        s.serialize_field("message", &self.message())?;
        s.end()
    }
}

#[derive(Debug)]
struct Message(String);

impl Display for Message {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl StdError for Message {}

/// The normalized return of a test body.
#[derive(Debug)]
pub struct TestResult(pub Result<Value, CaughtError>);

impl From<()> for TestResult {
    fn from(_: ()) -> Self {
        Self(Ok(Value::Null))
    }
}

impl<T: Into<Value>, E: Into<CaughtError>> From<Result<T, E>> for TestResult {
    fn from(v: Result<T, E>) -> Self {
        TestResult(v.map(Into::into).map_err(Into::into))
    }
}

macro_rules! value_results {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for TestResult {
                fn from(value: $ty) -> Self {
                    TestResult(Ok(value.into()))
                }
            }
        )*
    };
}

value_results!(
    Value,
    bool,
    i32,
    i64,
    u32,
    u64,
    usize,
    f64,
    String,
    &'static str,
    Vec<Value>,
    serde_json::Map<String, Value>,
);
