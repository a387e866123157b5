//! Named assertion helpers.
//!
//! A helper is looked up by name at call time and handed the [`Pilot`] it was called on, so
//! it can read the current record's outcome and record a judgment against it. Registering a
//! helper under an existing name replaces the previous one, which is how the standard
//! vocabulary is meant to be overridden.
//!
//! Most helpers are a [`Check`] paired with a label: see [`CheckHelper`]. Arbitrary closures
//! with the signature `Fn(&Pilot, &[Value]) -> Result<()>` are helpers too.

use std::{collections::HashMap, fmt::Debug, rc::Rc};

use serde::Deserialize;

use crate::{
    Pilot, Value,
    error::{Error, Result},
    outcome::Outcome,
};

pub mod catalog;
pub mod standard;

pub trait Helper {
    fn call(&self, pilot: &Pilot, args: &[Value]) -> Result<()>;
}

impl<F> Helper for F
where
    F: Fn(&Pilot, &[Value]) -> Result<()>,
{
    fn call(&self, pilot: &Pilot, args: &[Value]) -> Result<()> {
        (self)(pilot, args)
    }
}

#[derive(Default)]
pub struct HelperRegistry(HashMap<String, Rc<dyn Helper>>);

impl HelperRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `helper` under `name`, returning whether an older helper got replaced.
    pub fn register(&mut self, name: impl Into<String>, helper: impl Helper + 'static) -> bool {
        self.0.insert(name.into(), Rc::new(helper)).is_some()
    }

    pub fn get(&self, name: &str) -> Result<Rc<dyn Helper>> {
        self.0
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownHelper(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Debug for HelperRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<_> = self.names().collect();
        names.sort_unstable();
        f.debug_tuple("HelperRegistry").field(&names).finish()
    }
}

/// The predicates a [`CheckHelper`] can evaluate against an [`Outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Check {
    IsBool,
    IsInt,
    IsFloat,
    IsString,
    IsArray,
    IsObject,
    IsScalar,
    IsNull,
    Equal,
    NotEqual,
    In,
    InStrict,
    NotIn,
    NotInStrict,
    Count,
    Error,
    NotError,
}

/// Result of evaluating a [`Check`].
#[derive(Debug, Clone, PartialEq)]
pub struct Verdict {
    pub passed: bool,
    pub expected: String,
}

impl Check {
    /// Label recorded with judgments when none was configured.
    pub fn default_label(self) -> &'static str {
        match self {
            Check::IsBool => "isBoolean",
            Check::IsInt => "isInteger",
            Check::IsFloat => "isFloat",
            Check::IsString => "isString",
            Check::IsArray => "isArray",
            Check::IsObject => "isObject",
            Check::IsScalar => "isScalar",
            Check::IsNull => "isNull",
            Check::Equal => "equal",
            Check::NotEqual => "notEqual",
            Check::In => "inArray",
            Check::InStrict => "inArrayStrict",
            Check::NotIn => "notInArray",
            Check::NotInStrict => "notInArrayStrict",
            Check::Count => "count",
            Check::Error => "exception",
            Check::NotError => "notException",
        }
    }

    /// Evaluate the check. `Err` carries the reason why `operand` is unusable.
    pub fn evaluate(
        self,
        outcome: &Outcome,
        operand: Option<&Value>,
    ) -> std::result::Result<Verdict, String> {
        let value = outcome.value();
        let kind = |passed: bool, expected: &str| Verdict {
            passed,
            expected: expected.to_string(),
        };

        Ok(match self {
            Check::IsBool => kind(value.is_some_and(Value::is_boolean), "Boolean"),
            Check::IsInt => kind(value.is_some_and(|v| v.is_i64() || v.is_u64()), "Integer"),
            Check::IsFloat => kind(value.is_some_and(Value::is_f64), "Float"),
            Check::IsString => kind(value.is_some_and(Value::is_string), "String"),
            Check::IsArray => kind(value.is_some_and(Value::is_array), "Array"),
            Check::IsObject => kind(value.is_some_and(Value::is_object), "Object"),
            Check::IsScalar => kind(value.is_some_and(is_scalar), "Scalar"),
            Check::IsNull => kind(value.is_some_and(Value::is_null), "Null"),
            Check::Equal => {
                let to = required(operand)?;
                Verdict {
                    passed: value == Some(to),
                    expected: format!("Equal to: {}", display_value(to)),
                }
            }
            Check::NotEqual => {
                let to = required(operand)?;
                Verdict {
                    passed: value != Some(to),
                    expected: format!("Not equal to: {}", display_value(to)),
                }
            }
            Check::In | Check::InStrict | Check::NotIn | Check::NotInStrict => {
                let values = required(operand)?
                    .as_array()
                    .ok_or_else(|| String::from("expected an array of values"))?;
                let strict = matches!(self, Check::InStrict | Check::NotInStrict);
                let found = value.is_some_and(|value| {
                    values.iter().any(|candidate| match strict {
                        true => candidate == value,
                        false => loosely_equal(candidate, value),
                    })
                });
                let list = display_value(&Value::Array(values.clone()));
                match self {
                    Check::In | Check::InStrict => Verdict {
                        passed: found,
                        expected: format!("To be {} one of: {list}", strictness(strict)),
                    },
                    _ => Verdict {
                        passed: !found,
                        expected: format!("Not to be {} one of: {list}", strictness(strict)),
                    },
                }
            }
            Check::Count => {
                let expected = required(operand)?
                    .as_u64()
                    .ok_or_else(|| String::from("expected a non-negative integer"))?;
                let len = match value {
                    Some(Value::Array(values)) => Some(values.len()),
                    Some(Value::Object(values)) => Some(values.len()),
                    _ => None,
                };
                Verdict {
                    passed: len.is_some_and(|len| len as u64 == expected),
                    expected: format!("Countable and number of elements: {expected}"),
                }
            }
            Check::Error | Check::NotError => {
                let wanted = match operand {
                    None | Some(Value::Null) => None,
                    Some(Value::String(name)) => Some(name.as_str()),
                    Some(_) => return Err(String::from("expected an error type name")),
                };
                let raised = outcome
                    .error()
                    .is_some_and(|err| wanted.is_none_or(|name| err.matches_kind(name)));
                let label = self.default_label();
                let expected = format!("{label}: {}", wanted.unwrap_or("any error"));
                match self {
                    Check::Error => Verdict {
                        passed: raised,
                        expected,
                    },
                    _ => Verdict {
                        passed: !raised,
                        expected,
                    },
                }
            }
        })
    }
}

fn required(operand: Option<&Value>) -> std::result::Result<&Value, String> {
    operand.ok_or_else(|| String::from("missing operand"))
}

fn strictness(strict: bool) -> &'static str {
    match strict {
        true => "strictly",
        false => "weakly",
    }
}

fn is_scalar(value: &Value) -> bool {
    matches!(value, Value::Bool(_) | Value::Number(_) | Value::String(_))
}

/// Compare two values the lenient way: scalars match when they read the same, so `2021`
/// and `"2021"` are loosely equal. Arrays and objects still need strict equality.
pub fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }

    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Number(n), Value::String(s)) | (Value::String(s), Value::Number(n)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        (Value::Bool(b), Value::String(s)) | (Value::String(s), Value::Bool(b)) => {
            s.as_str() == if *b { "true" } else { "false" }
        }
        _ => false,
    }
}

/// Human readable rendering of a value: strings as-is, everything else as JSON.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// A [`Check`] bound to a label and, optionally, a fixed operand.
///
/// Without a fixed operand the first call argument is used.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckHelper {
    pub check: Check,
    pub label: Option<String>,
    pub operand: Option<Value>,
}

impl CheckHelper {
    pub fn new(check: Check) -> Self {
        Self {
            check,
            label: None,
            operand: None,
        }
    }

    pub fn with_label(self, label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..self
        }
    }

    pub fn with_operand(self, operand: impl Into<Value>) -> Self {
        Self {
            operand: Some(operand.into()),
            ..self
        }
    }

    pub fn label(&self) -> &str {
        self.label
            .as_deref()
            .unwrap_or_else(|| self.check.default_label())
    }
}

impl Helper for CheckHelper {
    fn call(&self, pilot: &Pilot, args: &[Value]) -> Result<()> {
        let operand = self.operand.as_ref().or(args.first());
        let record = pilot.current()?;
        let verdict = self
            .check
            .evaluate(record.outcome(), operand)
            .map_err(|reason| Error::InvalidHelperArgs {
                helper: self.label().to_string(),
                reason,
            })?;

        match verdict.passed {
            true => pilot.record_success(Some(self.label())),
            false => pilot.record_failure(verdict.expected, Some(self.label())),
        }
    }
}
