//! The pilot testing itself.
//!
//! Usage: `cargo run --example selftest [-- path/to/kipilot.toml]`
//!
//! Without a configuration file the HTML report is printed to stdout.

use std::io;

use kipilot::{Pilot, config::Config};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("invalid argument")]
struct InvalidArgument;

fn main() -> kipilot::Result<()> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .try_init();

    let config = match std::env::args().nth(1) {
        Some(path) => Config::load(path)?,
        None => {
            let mut config = Config::default();
            config.project.title = String::from("kipilot - a minimalist test pilot");
            config
        }
    };
    let pilot = Pilot::from_config(&config)?;

    // resources
    pilot.add_resource("year", 2021)?;
    pilot.add_resource("years", json!([2020, 2021]))?;
    pilot.add_resource("is_leap", false)?;
    pilot.add_resource("current_month", "september")?;
    pilot.add_resource(
        "dummy_array_data",
        json!([
            pilot.resource("year")?,
            pilot.resource("is_leap")?,
            pilot.resource("current_month")?
        ]),
    )?;

    pilot.run(
        "001",
        || pilot.resource("year"),
        "Resource extractor (integer) - assertIsInt assertEqual assertNotEqual assertIn assertInStrict assertNotIn assertNotInStrict",
    )?;
    pilot.assert_is_int()?;
    pilot.assert_equal(2021)?;
    pilot.assert_not_equal(2000)?;
    pilot.assert_in(["2021"])?;
    pilot.assert_in_strict([2021])?;
    pilot.assert_not_in(["2025"])?;
    pilot.assert_not_in_strict(["2021"])?;

    pilot.run(
        "002",
        || pilot.resource("years"),
        "Resource extractor (array) - assertIsArray + assertEqual",
    )?;
    pilot.assert_is_array()?;
    pilot.assert_equal(json!([2020, 2021]))?;

    pilot.run(
        "003",
        || pilot.resource("dummy_array_data"),
        "Resource extractor (composed resource from other already defined resources) - assertIsArray + assertEqual",
    )?;
    pilot.assert_is_array()?;
    pilot.assert_equal(json!([2021, false, "september"]))?;

    pilot.run(
        "004",
        || pilot.resource("dummy_array_data").map(|data| data[2].clone()),
        "Resource extractor (string) - Dereference array - assertIsString + assertEqual",
    )?;
    pilot.assert_is_string()?;
    pilot.assert_equal("september")?;

    pilot.run("005", || true, "assertIsBool + assertEqual + assertNotEqual")?;
    pilot.assert_is_bool()?;
    pilot.assert_equal(true)?;
    pilot.assert_not_equal(false)?;

    pilot.run(
        "006",
        || Err::<(), _>(InvalidArgument),
        "Error interceptor - assertException (any) + assertException (by name) + assert_error (by type)",
    )?;
    pilot.assert_exception(None)?;
    pilot.assert_exception(Some("InvalidArgument"))?;
    pilot.assert_error::<InvalidArgument>()?;

    pilot.run(
        "007",
        || pilot.resource("dummy_array_data"),
        "Count the values: assertCount()",
    )?;
    pilot.assert_is_array()?;
    pilot.assert_count(3)?;

    pilot.assert_that(
        |_| {
            pilot
                .resource("dummy_array_data")
                .ok()
                .and_then(|data| data.as_array().map(Vec::len))
                == Some(3)
        },
        Some("Dynamic assertion using manual count"),
        3,
    )?;

    let stats = pilot.stats();
    pilot.run(
        "008",
        || serde_json::to_value([stats.runs, stats.assertions]),
        "check the count",
    )?;
    pilot.assert_is_array()?;
    pilot.assert_equal(json!([
        { "total": 7, "passed": 7, "failed": 0, "passed_percent": 100.0, "failed_percent": 0.0 },
        { "total": 22, "passed": 22, "failed": 0, "passed_percent": 100.0, "failed_percent": 0.0 },
    ]))?;

    let formatter = config.formatter();
    match &config.report.output {
        Some(path) => pilot.save_report(&formatter, path)?,
        None => pilot.create_report(&formatter, &mut io::stdout().lock())?,
    }

    let stats = pilot.stats();
    tracing::info!(
        "{} runs, {} failed, {} assertions in {}",
        stats.runs.total,
        stats.runs.failed,
        stats.assertions.total,
        stats.hms
    );
    Ok(())
}
