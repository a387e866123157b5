//! Reports over what a [`Pilot`](crate::Pilot) recorded.
//!
//! A report only sees [`ReportData`]: the project title, a statistics snapshot and the
//! records in the order they ran. Formatters never reach back into the pilot.

use std::{borrow::Cow, io, rc::Rc};

use chrono::{DateTime, Utc};

use crate::{Value, helper::display_value, outcome::Outcome, stats::Stats, test::TestRecord};

mod color;
pub use color::*;

mod html;
pub use html::HtmlReport;

mod json;
pub use json::JsonReport;

mod pretty;
pub use pretty::PrettyReport;

/// Values rendered into a report are cut after this many characters by default.
pub const DEFAULT_MAX_STR_LENGTH: usize = 500;

pub trait ReportFormatter {
    fn render(&self, report: &ReportData<'_>, out: &mut dyn io::Write) -> io::Result<()>;
}

impl<F: ReportFormatter + ?Sized> ReportFormatter for Box<F> {
    fn render(&self, report: &ReportData<'_>, out: &mut dyn io::Write) -> io::Result<()> {
        (**self).render(report, out)
    }
}

#[derive(Debug)]
pub struct ReportData<'r> {
    pub title: &'r str,
    pub stats: Stats,
    pub records: &'r [Rc<TestRecord>],
    pub generated: DateTime<Utc>,
}

impl<'r> ReportData<'r> {
    pub fn new(title: &'r str, stats: Stats, records: &'r [Rc<TestRecord>]) -> Self {
        Self {
            title,
            stats,
            records,
            generated: Utc::now(),
        }
    }

    pub fn with_generated(self, generated: DateTime<Utc>) -> Self {
        Self { generated, ..self }
    }
}

/// Describe what a body produced, as shown next to a failed judgment.
pub fn given(outcome: &Outcome) -> String {
    match outcome {
        Outcome::Value(Value::Null) => String::from("null"),
        Outcome::Value(Value::Bool(b)) => format!("boolean: {b}"),
        Outcome::Value(Value::Number(n)) if n.is_f64() => format!("float: {n}"),
        Outcome::Value(Value::Number(n)) => format!("integer: {n}"),
        Outcome::Value(Value::String(s)) => format!("string: {s}"),
        Outcome::Value(value @ Value::Array(_)) => format!("array\n{}", pretty_json(value)),
        Outcome::Value(value @ Value::Object(_)) => format!("object\n{}", pretty_json(value)),
        Outcome::Error(err) => format!(
            "Error: {}\nType: {}\nMessage: {}",
            err.kind(),
            err.type_name(),
            err.message()
        ),
    }
}

/// Describe the expectation of a failed judgment.
pub fn expected(expected: Option<&Value>) -> String {
    expected.map(display_value).unwrap_or_default()
}

fn pretty_json(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

/// Render a percentage with at most two decimals and no trailing zeros.
pub fn percent(value: f64) -> String {
    let text = format!("{value:.2}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Cut `text` after `max` characters, marking the cut with `...`.
pub fn truncate(text: &str, max: usize) -> Cow<'_, str> {
    match text.char_indices().nth(max) {
        Some((end, _)) => Cow::Owned(format!("{}...", &text[..end])),
        None => Cow::Borrowed(text),
    }
}
