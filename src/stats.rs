//! Run and assertion statistics.
//!
//! Everything here is derived on demand from the stored records and the two raw assertion
//! counters kept by the [`Pilot`](crate::Pilot). Nothing is cached.

use serde::Serialize;

use crate::test::TestRecord;

/// Passed/failed tallies for one kind of thing (runs or assertions).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Tally {
    pub total: u64,
    pub passed: u64,
    pub failed: u64,
    pub passed_percent: f64,
    pub failed_percent: f64,
}

impl Tally {
    /// Build a tally from the number of passed and failed items.
    ///
    /// The passed percentage is rounded to two decimals and the failed percentage is taken
    /// as its complement to 100, never rounded on its own. With nothing counted both are 0.
    pub fn new(passed: u64, failed: u64) -> Self {
        let total = passed + failed;
        let (passed_percent, failed_percent) = match total {
            0 => (0.0, 0.0),
            total => {
                let passed_percent = round2(passed as f64 / total as f64 * 100.0);
                (passed_percent, 100.0 - passed_percent)
            }
        };

        Self {
            total,
            passed,
            failed,
            passed_percent,
            failed_percent,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// A point-in-time snapshot of a pilot's statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Stats {
    pub runs: Tally,
    pub assertions: Tally,
    pub millis: u64,
    pub hms: String,
}

impl Stats {
    pub fn collect<'r>(
        records: impl IntoIterator<Item = &'r TestRecord>,
        passed_assertions: u64,
        failed_assertions: u64,
    ) -> Self {
        let (mut passed, mut failed, mut millis) = (0, 0, 0u64);
        for record in records {
            match record.passed() {
                true => passed += 1,
                false => failed += 1,
            }
            millis = millis.saturating_add(record.millis());
        }

        Self {
            runs: Tally::new(passed, failed),
            assertions: Tally::new(passed_assertions, failed_assertions),
            millis,
            hms: hms(millis),
        }
    }

    /// Whether every run passed. An empty pilot counts as passed.
    pub fn all_passed(&self) -> bool {
        self.runs.failed == 0
    }
}

/// Render milliseconds as `HH:MM:SS`, dropping the sub-second part.
///
/// Hours are not wrapped into days, they just keep growing past two digits.
pub fn hms(millis: u64) -> String {
    let seconds = millis / 1000;
    let (sec, minutes) = (seconds % 60, seconds / 60);
    let (min, hours) = (minutes % 60, minutes / 60);
    format!("{hours:02}:{min:02}:{sec:02}")
}
