//! A small test pilot.
//!
//! A [`Pilot`] runs test bodies right away, remembers what each of them returned and lets
//! named assertion helpers judge the most recent result. Statistics and reports are derived
//! from the recorded runs.
//!
//! ```
//! use kipilot::Pilot;
//!
//! let pilot = Pilot::new("years");
//! pilot.inject_standard_helpers();
//! pilot.add_resource("year", 2021)?;
//!
//! pilot.run("001", || pilot.resource("year"), "the year resource")?;
//! pilot.assert_is_int()?;
//! pilot.assert_equal(2021)?;
//!
//! assert!(pilot.stats().all_passed());
//! # Ok::<(), kipilot::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod helper;
pub mod id;
pub mod invoke;
pub mod outcome;
pub mod report;
pub mod resource;
pub mod stats;

mod pilot;
pub use pilot::*;

#[cfg(test)]
mod test_support;

pub use error::{Error, Result};
pub use id::{RunId, RunIdSequence};
pub use serde_json::Value;
