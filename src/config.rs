//! TOML configuration for a pilot session.
//!
//! ```toml
//! [project]
//! title = "kipilot self test"
//!
//! [helpers]
//! standard = true
//! catalogs = ["helpers/dates.toml"]
//!
//! [report]
//! format = "html"
//! max_str_length = 500
//! color = "auto"
//! output = "report.html"
//! ```
//!
//! Every section and key is optional.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    report::{
        ColorSetting, DEFAULT_MAX_STR_LENGTH, HtmlReport, JsonReport, PrettyReport,
        ReportFormatter,
    },
};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub project: ProjectConfig,
    pub helpers: HelpersConfig,
    pub report: ReportConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ProjectConfig {
    pub title: String,
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            title: String::from("untitled"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HelpersConfig {
    /// Install the standard assertion helpers.
    pub standard: bool,
    /// Helper catalog files, loaded in order after the standard helpers.
    pub catalogs: Vec<PathBuf>,
}

impl Default for HelpersConfig {
    fn default() -> Self {
        Self {
            standard: true,
            catalogs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Html,
    Pretty,
    Json,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub format: ReportFormat,
    pub max_str_length: usize,
    pub color: ColorSetting,
    /// Where to write the report. Unset means stdout.
    pub output: Option<PathBuf>,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: ReportFormat::default(),
            max_str_length: DEFAULT_MAX_STR_LENGTH,
            color: ColorSetting::default(),
            output: None,
        }
    }
}

impl Config {
    /// Read the configuration file at `path`.
    ///
    /// Relative catalog paths are resolved against the directory of `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path)?;
        let mut config: Config = text.parse()?;

        if let Some(dir) = path.parent() {
            for catalog in config.helpers.catalogs.iter_mut() {
                if catalog.is_relative() {
                    *catalog = dir.join(&*catalog);
                }
            }
        }

        tracing::debug!("loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Build the report formatter this configuration asks for.
    pub fn formatter(&self) -> Box<dyn ReportFormatter> {
        let report = &self.report;
        match report.format {
            ReportFormat::Html => {
                Box::new(HtmlReport::default().with_max_str_length(report.max_str_length))
            }
            ReportFormat::Pretty => Box::new(
                PrettyReport::default()
                    .with_color_setting(report.color)
                    .with_max_str_length(report.max_str_length),
            ),
            ReportFormat::Json => Box::new(JsonReport),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }
}
