//! The standard assertion vocabulary.

use std::error::Error as StdError;

use crate::{
    Pilot, Value,
    error::{Error, Result},
    helper::{Check, CheckHelper, Helper},
};

/// Names and helpers installed by [`Pilot::inject_standard_helpers`].
pub fn standard_helpers() -> impl Iterator<Item = (&'static str, CheckHelper)> {
    [
        ("assertEqual", Check::Equal),
        ("assertNotEqual", Check::NotEqual),
        ("assertIsBool", Check::IsBool),
        ("assertIsInt", Check::IsInt),
        ("assertIsFloat", Check::IsFloat),
        ("assertIsArray", Check::IsArray),
        ("assertIsString", Check::IsString),
        ("assertIsScalar", Check::IsScalar),
        ("assertIsObject", Check::IsObject),
        ("assertIsNull", Check::IsNull),
        ("assertIn", Check::In),
        ("assertInStrict", Check::InStrict),
        ("assertNotIn", Check::NotIn),
        ("assertNotInStrict", Check::NotInStrict),
        ("assertCount", Check::Count),
        ("assertException", Check::Error),
        ("assertNotException", Check::NotError),
    ]
    .into_iter()
    .map(|(name, check)| (name, CheckHelper::new(check)))
}

/// `assertIsInstanceOf` and `assertIsNotInstanceOf`, also installed by
/// [`Pilot::inject_standard_helpers`].
pub fn instance_helpers() -> [(&'static str, InstanceOfHelper); 2] {
    [
        ("assertIsInstanceOf", InstanceOfHelper { negated: false }),
        ("assertIsNotInstanceOf", InstanceOfHelper { negated: true }),
    ]
}

/// Checks the kind of error a record captured, under a caller chosen label.
///
/// Arguments: the error kind (type name), then an optional label. Only caught errors carry
/// a type, so a plain value is never an instance of anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceOfHelper {
    negated: bool,
}

impl InstanceOfHelper {
    fn default_label(self) -> &'static str {
        match self.negated {
            false => "instanceOf",
            true => "notInstanceOf",
        }
    }
}

impl Helper for InstanceOfHelper {
    fn call(&self, pilot: &Pilot, args: &[Value]) -> Result<()> {
        let invalid = |reason: &str| Error::InvalidHelperArgs {
            helper: self.default_label().to_string(),
            reason: reason.to_string(),
        };
        let kind = match args.first() {
            Some(Value::String(kind)) => kind.as_str(),
            _ => return Err(invalid("expected an error type name")),
        };
        let label = match args.get(1) {
            None | Some(Value::Null) => self.default_label(),
            Some(Value::String(label)) => label.as_str(),
            Some(_) => return Err(invalid("expected a string label")),
        };

        let record = pilot.current()?;
        let matched = record
            .outcome()
            .error()
            .is_some_and(|err| err.matches_kind(kind));
        match matched != self.negated {
            true => pilot.record_success(Some(label)),
            false => pilot.record_failure(format!("{label}: {kind}"), Some(label)),
        }
    }
}

/// Typed shorthands for the standard helpers.
///
/// Each one dispatches by name, so overriding e.g. `assertEqual` changes what
/// [`assert_equal`](Pilot::assert_equal) does as well.
impl Pilot {
    pub fn assert_equal(&self, to: impl Into<Value>) -> Result<()> {
        self.call("assertEqual", &[to.into()])
    }

    pub fn assert_not_equal(&self, to: impl Into<Value>) -> Result<()> {
        self.call("assertNotEqual", &[to.into()])
    }

    pub fn assert_is_bool(&self) -> Result<()> {
        self.call("assertIsBool", &[])
    }

    pub fn assert_is_int(&self) -> Result<()> {
        self.call("assertIsInt", &[])
    }

    pub fn assert_is_float(&self) -> Result<()> {
        self.call("assertIsFloat", &[])
    }

    pub fn assert_is_array(&self) -> Result<()> {
        self.call("assertIsArray", &[])
    }

    pub fn assert_is_string(&self) -> Result<()> {
        self.call("assertIsString", &[])
    }

    pub fn assert_is_scalar(&self) -> Result<()> {
        self.call("assertIsScalar", &[])
    }

    pub fn assert_is_object(&self) -> Result<()> {
        self.call("assertIsObject", &[])
    }

    pub fn assert_is_null(&self) -> Result<()> {
        self.call("assertIsNull", &[])
    }

    pub fn assert_in(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Result<()> {
        self.call("assertIn", &[list(values)])
    }

    pub fn assert_in_strict(
        &self,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<()> {
        self.call("assertInStrict", &[list(values)])
    }

    pub fn assert_not_in(&self, values: impl IntoIterator<Item = impl Into<Value>>) -> Result<()> {
        self.call("assertNotIn", &[list(values)])
    }

    pub fn assert_not_in_strict(
        &self,
        values: impl IntoIterator<Item = impl Into<Value>>,
    ) -> Result<()> {
        self.call("assertNotInStrict", &[list(values)])
    }

    pub fn assert_count(&self, count: u64) -> Result<()> {
        self.call("assertCount", &[count.into()])
    }

    /// Assert the current record captured an error, optionally of the named kind.
    pub fn assert_exception(&self, kind: Option<&str>) -> Result<()> {
        self.call("assertException", &[kind.map_or(Value::Null, Value::from)])
    }

    pub fn assert_not_exception(&self, kind: Option<&str>) -> Result<()> {
        self.call("assertNotException", &[kind.map_or(Value::Null, Value::from)])
    }

    pub fn assert_is_instance_of(&self, kind: &str, label: Option<&str>) -> Result<()> {
        self.call(
            "assertIsInstanceOf",
            &[kind.into(), label.map_or(Value::Null, Value::from)],
        )
    }

    pub fn assert_is_not_instance_of(&self, kind: &str, label: Option<&str>) -> Result<()> {
        self.call(
            "assertIsNotInstanceOf",
            &[kind.into(), label.map_or(Value::Null, Value::from)],
        )
    }

    /// Assert the current record captured an error of the concrete type `E`.
    pub fn assert_error<E: StdError + 'static>(&self) -> Result<()> {
        let record = self.current()?;
        match record.outcome().error().is_some_and(|err| err.is::<E>()) {
            true => self.record_success(Some("exception")),
            false => self.record_failure(
                format!("exception: {}", std::any::type_name::<E>()),
                Some("exception"),
            ),
        }
    }
}

fn list(values: impl IntoIterator<Item = impl Into<Value>>) -> Value {
    Value::Array(values.into_iter().map(Into::into).collect())
}
