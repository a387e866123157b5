use std::fs;

use chrono::{TimeZone, Utc};
use kipilot::{
    Pilot,
    config::Config,
    report::{HtmlReport, ReportData, ReportFormatter},
};
use regex::Regex;

fn session() -> Pilot {
    let pilot = Pilot::new("Exacodis & friends");
    pilot.inject_standard_helpers();
    pilot.add_resource("year", 2021).unwrap();
    pilot
        .add_resource("dummy_array_data", serde_json::json!([2021, false, "september"]))
        .unwrap();

    pilot
        .run("001", || pilot.resource("year"), "Resource extractor (integer)")
        .unwrap();
    pilot.assert_is_int().unwrap();
    pilot.assert_equal(2021).unwrap();

    pilot
        .run("002", || pilot.resource("dummy_array_data"), "<array>")
        .unwrap();
    pilot.assert_is_array().unwrap();
    pilot.assert_count(2).unwrap();
    pilot
}

#[test]
fn html_report_layout() {
    let pilot = session();
    let records = pilot.records();
    let data = ReportData::new(pilot.project_title(), pilot.stats(), &records)
        .with_generated(Utc.with_ymd_and_hms(2021, 9, 1, 12, 30, 0).unwrap());

    let mut out = Vec::new();
    HtmlReport::default().render(&data, &mut out).unwrap();
    let html = String::from_utf8(out).unwrap();

    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("2021-09-01 12:30:00 GMT/UTC/ZULU"));
    assert!(html.contains("Project: Exacodis &amp; friends"));

    let runs = Regex::new(r"2 runs &rArr; 1 passed \+ 1 failed &hArr; 50 % passed \+ 50 % failed").unwrap();
    assert!(runs.is_match(&html), "{html}");
    let assertions =
        Regex::new(r"4 assertions &rArr; 3 passed \+ 1 failed &hArr; 75 % passed \+ 25 % failed")
            .unwrap();
    assert!(assertions.is_match(&html), "{html}");

    let passed = Regex::new(r"Run: 001 - PASSED - \d+ ms - 2 assertions<br>Resource extractor \(integer\)").unwrap();
    assert!(passed.is_match(&html), "{html}");
    let failed = Regex::new(r#"<tr class="failed"><td colspan="4">Run: 002 - FAILED - \d+ ms - 2 assertions &rArr; 1 passed \+ 1 failed"#).unwrap();
    assert!(failed.is_match(&html), "{html}");

    assert!(html.contains("<br>&lt;array&gt;</td>"));
    assert!(html.contains("PASSED: isArray"));
    assert!(html.contains("FAILED: count"));
    assert!(html.contains("Countable and number of elements: 2"));
    assert!(html.contains("<td class=\"failed\">array<br>["));
    assert!(html.contains(r#"<span class="badge failed">FAILED</span>"#));
    assert!(html.trim_end().ends_with("</html>"));
}

#[test]
fn configured_sessions_write_reports() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join("dates.toml"),
        r#"
        [helpers.assertIsCurrentYear]
        check = "equal"
        value = 2021
        label = "currentYear"
        "#,
    )
    .unwrap();
    let output = dir.path().join("report.json");
    fs::write(
        dir.path().join("kipilot.toml"),
        format!(
            r#"
            [project]
            title = "configured"

            [helpers]
            catalogs = ["dates.toml"]

            [report]
            format = "json"
            output = {:?}
            "#,
            output.display().to_string()
        ),
    )
    .unwrap();

    let config = Config::load(dir.path().join("kipilot.toml")).unwrap();
    let pilot = Pilot::from_config(&config).unwrap();
    assert_eq!(pilot.project_title(), "configured");
    assert!(pilot.has_helper("assertEqual"));

    pilot.run("year", || 2021, "").unwrap();
    pilot.call("assertIsCurrentYear", &[]).unwrap();

    let path = config.report.output.as_ref().unwrap();
    pilot.save_report(&config.formatter(), path).unwrap();

    let report: serde_json::Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert_eq!(report["title"], "configured");
    assert_eq!(report["records"][0]["judgments"][0]["label"], "currentYear");
    assert_eq!(report["stats"]["runs"]["passed"], 1);
}

#[test]
fn missing_catalogs_stop_configuration() {
    let config: Config = "[helpers]\ncatalogs = [\"/nowhere/helpers.toml\"]"
        .parse()
        .unwrap();
    assert!(matches!(
        Pilot::from_config(&config),
        Err(kipilot::Error::HelperSourceNotFound(_))
    ));
}
