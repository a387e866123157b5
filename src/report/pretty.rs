use std::io;

use crate::{
    report::{
        ColorSetting, DEFAULT_MAX_STR_LENGTH, ReportData, ReportFormatter, color::colors::*,
        expected, given, percent, truncate,
    },
    test::TestRecord,
};

/// Terminal summary in the style of `cargo test`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrettyReport {
    color_setting: ColorSetting,
    max_str_length: usize,
}

impl Default for PrettyReport {
    fn default() -> Self {
        Self {
            color_setting: ColorSetting::default(),
            max_str_length: DEFAULT_MAX_STR_LENGTH,
        }
    }
}

impl PrettyReport {
    pub fn with_color_setting(self, color_setting: impl Into<ColorSetting>) -> Self {
        Self {
            color_setting: color_setting.into(),
            ..self
        }
    }

    pub fn with_max_str_length(self, max_str_length: usize) -> Self {
        Self {
            max_str_length,
            ..self
        }
    }

    /// Return whether this report will currently emit colored output.
    pub fn use_color(&self) -> bool {
        self.color_setting.use_color()
    }

    fn write_failure(&self, out: &mut dyn io::Write, record: &TestRecord) -> io::Result<()> {
        let id = record.id().map(ToString::to_string).unwrap_or_default();
        writeln!(out, "---- {id} ----")?;
        if !record.description().is_empty() {
            writeln!(out, "{}", record.description())?;
        }

        let judgments = record.judgments();
        if judgments.is_empty() {
            return writeln!(out, "no assertions were made");
        }

        let given = given(record.outcome());
        for judgment in judgments.iter() {
            let label = judgment.label.as_deref().unwrap_or("assertion");
            match judgment.passed {
                true => writeln!(out, "  passed: {label}")?,
                false => {
                    writeln!(out, "  FAILED: {label}")?;
                    writeln!(
                        out,
                        "    expected: {}",
                        indent(&truncate(
                            &expected(judgment.expected.as_ref()),
                            self.max_str_length
                        ))
                    )?;
                    writeln!(
                        out,
                        "       given: {}",
                        indent(&truncate(&given, self.max_str_length))
                    )?;
                }
            }
        }
        Ok(())
    }
}

fn indent(text: &str) -> String {
    text.replace('\n', "\n              ")
}

impl ReportFormatter for PrettyReport {
    fn render(&self, report: &ReportData<'_>, out: &mut dyn io::Write) -> io::Result<()> {
        let color = self.use_color();
        let records = report.records;

        match records.len() {
            1 => writeln!(out, "\n{}: running 1 test", report.title)?,
            count => writeln!(out, "\n{}: running {count} tests", report.title)?,
        }

        for record in records {
            let id = record.id().map(ToString::to_string).unwrap_or_default();
            write!(out, "test {id} ... ")?;
            match (record.passed(), color) {
                (true, false) => writeln!(out, "ok")?,
                (true, true) => writeln!(out, "{GREEN}ok{RESET}")?,
                (false, false) => writeln!(out, "FAILED")?,
                (false, true) => writeln!(out, "{RED}FAILED{RESET}")?,
            }
        }

        let failures: Vec<_> = records.iter().filter(|record| record.failed()).collect();
        if !failures.is_empty() {
            writeln!(out)?;
            writeln!(out, "failures:")?;
            writeln!(out)?;
            for failure in failures.iter() {
                self.write_failure(out, failure)?;
                writeln!(out)?;
            }
            writeln!(out, "failures:")?;
            for failure in failures.iter() {
                let id = failure.id().map(ToString::to_string).unwrap_or_default();
                writeln!(out, "    {id}")?;
            }
        }

        let stats = &report.stats;
        writeln!(out)?;
        write!(out, "test result: ")?;
        match (stats.all_passed(), color) {
            (true, false) => write!(out, "ok. ")?,
            (true, true) => write!(out, "{GREEN}ok{RESET}. ")?,
            (false, false) => write!(out, "FAILED. ")?,
            (false, true) => write!(out, "{RED}FAILED{RESET}. ")?,
        }
        writeln!(
            out,
            "{} passed; {} failed; {} assertions ({} passed, {} failed); finished in {}ms ({})",
            stats.runs.passed,
            stats.runs.failed,
            stats.assertions.total,
            stats.assertions.passed,
            stats.assertions.failed,
            stats.millis,
            stats.hms,
        )?;
        match color {
            true => writeln!(
                out,
                "{CYAN}{} % of runs passed, {} % of assertions passed{RESET}",
                percent(stats.runs.passed_percent),
                percent(stats.assertions.passed_percent)
            )?,
            false => writeln!(
                out,
                "{} % of runs passed, {} % of assertions passed",
                percent(stats.runs.passed_percent),
                percent(stats.assertions.passed_percent)
            )?,
        }
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use regex::Regex;

    use super::*;
    use crate::Pilot;

    #[test]
    fn summary_lists_failures() {
        let pilot = Pilot::new("pretty");
        pilot.run("good", || 1, "").unwrap();
        pilot.record_success(Some("one")).unwrap();
        pilot.run("bad", || 2021, "year check").unwrap();
        pilot.record_failure("Equal to: 2000", Some("equal")).unwrap();
        pilot.run("empty", || (), "").unwrap();

        let mut out = Vec::new();
        let report = PrettyReport::default().with_color_setting(ColorSetting::Never);
        pilot.create_report(&report, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains("pretty: running 3 tests"));
        assert!(out.contains("test good ... ok\n"));
        assert!(out.contains("test bad ... FAILED\n"));
        assert!(out.contains(
            "---- bad ----\nyear check\n  FAILED: equal\n    expected: Equal to: 2000\n       given: integer: 2021\n"
        ));
        assert!(out.contains("---- empty ----\nno assertions were made\n"));
        assert!(out.contains("failures:\n    bad\n    empty\n"));

        let summary = Regex::new(
            r"test result: FAILED\. 1 passed; 2 failed; 2 assertions \(1 passed, 1 failed\); finished in \d+ms \(\d{2}:\d{2}:\d{2}\)",
        )
        .unwrap();
        assert!(summary.is_match(&out), "{out}");
        assert!(out.contains("33.33 % of runs passed, 50 % of assertions passed"));
        assert!(!out.contains('\x1b'));
    }

    #[test]
    fn always_colors() {
        let pilot = Pilot::new("color");
        pilot.run("good", || 1, "").unwrap();
        pilot.record_success(None).unwrap();

        let mut out = Vec::new();
        let report = PrettyReport::default().with_color_setting(ColorSetting::Always);
        pilot.create_report(&report, &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();

        assert!(out.contains(&format!("test good ... {GREEN}ok{RESET}")));
        assert!(out.contains(&format!("test result: {GREEN}ok{RESET}. ")));
    }
}
