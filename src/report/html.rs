//! HTML report output.

use std::{borrow::Cow, io};

use crate::{
    report::{
        DEFAULT_MAX_STR_LENGTH, ReportData, ReportFormatter, expected, given, percent, truncate,
    },
    stats::Tally,
    test::TestRecord,
};

/// Standalone HTML page with one table row per record.
///
/// Passed records get a single summary row. Failed records also list every judgment, with
/// the expectation and the captured outcome next to each failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlReport {
    pub max_str_length: usize,
}

impl Default for HtmlReport {
    fn default() -> Self {
        Self {
            max_str_length: DEFAULT_MAX_STR_LENGTH,
        }
    }
}

impl HtmlReport {
    pub fn with_max_str_length(self, max_str_length: usize) -> Self {
        Self { max_str_length }
    }

    /// Escape, cut and keep line breaks of a rendered value.
    fn value(&self, text: &str) -> String {
        escape(&truncate(text, self.max_str_length)).replace('\n', "<br>")
    }
}

const CSS: &str = r#"* {
  font-family: "Courier New", monospace;
}
table, th, td {
  border: 1px solid black;
  border-collapse: collapse;
  padding: 4px;
}
.failed {
  background-color: yellow;
}
.badge {
  color: white;
  padding: 0 0.5em;
}
.badge.passed { background-color: green; }
.badge.failed { background-color: red; }"#;

fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }

    let mut escaped = String::with_capacity(text.len() + 16);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            c => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

fn plural(count: usize) -> &'static str {
    match count {
        0 | 1 => "",
        _ => "s",
    }
}

fn write_tally(out: &mut dyn io::Write, noun: &str, tally: &Tally) -> io::Result<()> {
    writeln!(
        out,
        "      <br>{} {noun} &rArr; {} passed + {} failed &hArr; {} % passed + {} % failed",
        tally.total,
        tally.passed,
        tally.failed,
        percent(tally.passed_percent),
        percent(tally.failed_percent)
    )
}

impl HtmlReport {
    fn write_record(&self, out: &mut dyn io::Write, record: &TestRecord) -> io::Result<()> {
        let id = record.id().map(ToString::to_string).unwrap_or_default();
        let count = record.assertion_count();
        let description = escape(record.description());

        if record.passed() {
            return writeln!(
                out,
                r#"      <tr><td colspan="4">Run: {} - PASSED - {} ms - {count} assertion{}<br>{description}</td></tr>"#,
                escape(&id),
                record.millis(),
                plural(count),
            );
        }

        let passed = record.passed_count() as u64;
        let tally = Tally::new(passed, count as u64 - passed);
        writeln!(
            out,
            r#"      <tr class="failed"><td colspan="4">Run: {} - FAILED - {} ms - {count} assertion{} &rArr; {} passed + {} failed &hArr; {} % passed + {} % failed<br>{description}</td></tr>"#,
            escape(&id),
            record.millis(),
            plural(count),
            tally.passed,
            tally.failed,
            percent(tally.passed_percent),
            percent(tally.failed_percent),
        )?;

        let given = self.value(&given(record.outcome()));
        for judgment in record.judgments().iter() {
            let label = escape(judgment.label.as_deref().unwrap_or_default());
            match judgment.passed {
                true => writeln!(
                    out,
                    r#"      <tr><td>&nbsp;</td><td colspan="3">PASSED: {label}</td></tr>"#
                )?,
                false => write!(
                    out,
                    r#"      <tr>
        <td rowspan="2">&nbsp;</td>
        <td class="failed" rowspan="2">FAILED: {label}</td>
        <td class="failed">Expected</td>
        <td class="failed">{}</td>
      </tr>
      <tr>
        <td class="failed">Given</td>
        <td class="failed">{given}</td>
      </tr>
"#,
                    self.value(&expected(judgment.expected.as_ref())),
                )?,
            }
        }
        Ok(())
    }
}

impl ReportFormatter for HtmlReport {
    fn render(&self, report: &ReportData<'_>, out: &mut dyn io::Write) -> io::Result<()> {
        let stats = &report.stats;
        let badge = match stats.all_passed() {
            true => r#"<span class="badge passed">PASSED</span>"#,
            false => r#"<span class="badge failed">FAILED</span>"#,
        };

        write!(
            out,
            r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>KIPILOT REPORT</title>
  <style>
{CSS}
  </style>
</head>
<body>
  <h2>KIPILOT REPORT<br>{} GMT/UTC/ZULU
      <br>---
      <br>Project: {}
      <br>---
"#,
            report.generated.format("%Y-%m-%d %H:%M:%S"),
            escape(report.title),
        )?;
        write_tally(out, "runs", &stats.runs)?;
        write_tally(out, "assertions", &stats.assertions)?;
        write!(
            out,
            r#"      <br>---
      <br>Global test code evaluation: <strong>{badge}</strong><br>in {} ms &hArr; {}
  </h2>
  <table>
    <tbody>
"#,
            stats.millis, stats.hms,
        )?;

        for record in report.records {
            self.write_record(out, record)?;
        }

        write!(
            out,
            r#"    </tbody>
  </table>
</body>
</html>
"#
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::Pilot;

    fn render(pilot: &Pilot, report: &HtmlReport) -> String {
        let mut out = Vec::new();
        pilot.create_report(report, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn escapes_user_strings() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(
            escape(r#"<a href="x">'&'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;&#039;&amp;&#039;&lt;/a&gt;"
        );

        let pilot = Pilot::new("<script>");
        pilot.run("<b>", || "<i>", "<u>").unwrap();
        pilot.record_failure("<em>", Some("<s>")).unwrap();

        let html = render(&pilot, &HtmlReport::default());
        assert!(html.contains("Project: &lt;script&gt;"));
        assert!(html.contains("Run: &lt;b&gt; - FAILED"));
        assert!(html.contains("<br>&lt;u&gt;</td>"));
        assert!(html.contains("FAILED: &lt;s&gt;"));
        assert!(html.contains("string: &lt;i&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn passed_runs_only_get_a_header() {
        let pilot = Pilot::new("passing");
        pilot.run("ok", || 1, "fine").unwrap();
        pilot.record_success(Some("one")).unwrap();

        let html = render(&pilot, &HtmlReport::default());
        assert!(html.contains("Run: ok - PASSED"));
        assert!(html.contains("1 assertion<br>"));
        assert!(!html.contains("PASSED: one"));
        assert!(html.contains(r#"<span class="badge passed">PASSED</span>"#));
    }

    #[test]
    fn long_values_are_cut() {
        let pilot = Pilot::new("long");
        pilot.run("long", || "x".repeat(20), "").unwrap();
        pilot.record_failure(json!("y".repeat(20)), Some("eq")).unwrap();

        let html = render(&pilot, &HtmlReport::default().with_max_str_length(10));
        assert!(html.contains(&format!("<td class=\"failed\">{}...</td>", "y".repeat(10))));
        assert!(html.contains("string: xx..."));
        assert!(html.contains(r#"<span class="badge failed">FAILED</span>"#));
    }

    #[test]
    fn percentages_are_rounded_for_display() {
        let pilot = Pilot::new("sevenths");
        for id in ["1", "2", "3", "4", "5", "6", "7"] {
            pilot.run(id, || (), "").unwrap();
            match id {
                "1" => pilot.record_success(None).unwrap(),
                _ => pilot.record_failure("never", None).unwrap(),
            }
        }

        let html = render(&pilot, &HtmlReport::default());
        assert!(html.contains(
            "7 runs &rArr; 1 passed + 6 failed &hArr; 14.29 % passed + 85.71 % failed"
        ));
        assert!(html.contains(
            "7 assertions &rArr; 1 passed + 6 failed &hArr; 14.29 % passed + 85.71 % failed"
        ));
        assert!(!html.contains("85.71000"));
    }
}
