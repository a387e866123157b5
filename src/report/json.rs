//! JSON report output.

use std::io;

use serde_json::json;

use crate::report::{ReportData, ReportFormatter};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct JsonReport;

impl ReportFormatter for JsonReport {
    fn render(&self, report: &ReportData<'_>, out: &mut dyn io::Write) -> io::Result<()> {
        let records: Vec<_> = report.records.iter().map(|record| &**record).collect();
        let output = json!({
            "title": report.title,
            "generated": report.generated.to_rfc3339(),
            "stats": report.stats,
            "records": records,
        });

        serde_json::to_writer_pretty(&mut *out, &output)?;
        writeln!(out)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::{Value, json};

    use super::*;
    use crate::{Pilot, outcome::CaughtError};

    #[test]
    fn records_keep_their_order_and_shape() {
        let pilot = Pilot::new("json");
        pilot.run("year", || 2021, "a year").unwrap();
        pilot.record_failure("Equal to: 2000", Some("equal")).unwrap();
        pilot
            .run_unlabelled(|| Err::<(), _>(CaughtError::msg("nope")), "")
            .unwrap();

        let mut out = Vec::new();
        pilot.create_report(&JsonReport, &mut out).unwrap();
        let report: Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(report["title"], json!("json"));
        assert_eq!(report["stats"]["runs"]["failed"], json!(2));
        assert_eq!(
            report["records"][0],
            json!({
                "id": "year",
                "description": "a year",
                "status": "failed",
                "millis": report["records"][0]["millis"],
                "outcome": { "value": 2021 },
                "judgments": [
                    { "passed": false, "expected": "Equal to: 2000", "label": "equal" }
                ],
            })
        );
        assert_eq!(report["records"][1]["id"], json!(0));
        assert_eq!(report["records"][1]["outcome"]["error"]["message"], json!("nope"));
    }
}
