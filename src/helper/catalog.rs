//! File based helper catalogs.
//!
//! A catalog is a TOML document with a `[helpers]` table. Every entry that is a table with
//! a known `check` becomes a [`CheckHelper`]; everything else is skipped.
//!
//! ```toml
//! [helpers.assertIsYear]
//! check = "is_int"
//! label = "isYear"
//!
//! [helpers.assertIsCurrentYear]
//! check = "equal"
//! value = 2021
//! ```

use std::{fs, path::Path};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    helper::{Check, CheckHelper},
};

#[derive(Debug, Deserialize)]
struct Entry {
    check: Check,
    label: Option<String>,
    value: Option<toml::Value>,
}

/// Read the catalog at `path`.
pub fn load(path: impl AsRef<Path>) -> Result<Vec<(String, CheckHelper)>> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(Error::HelperSourceNotFound(path.to_path_buf()));
    }

    let text = fs::read_to_string(path)?;
    parse(&text).map_err(|source| Error::HelperSource {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse catalog text. Entries that do not describe a helper are dropped silently.
pub fn parse(text: &str) -> std::result::Result<Vec<(String, CheckHelper)>, toml::de::Error> {
    let mut document: toml::Table = toml::from_str(text)?;
    let Some(toml::Value::Table(entries)) = document.remove("helpers") else {
        return Ok(Vec::new());
    };

    let helpers = entries
        .into_iter()
        .filter_map(|(name, raw)| match raw.try_into::<Entry>() {
            Ok(entry) => Some((name, entry)),
            Err(err) => {
                tracing::debug!("skipping catalog entry {name}: {err}");
                None
            }
        })
        .filter_map(|(name, entry)| {
            let operand = match entry.value.map(serde_json::to_value).transpose() {
                Ok(operand) => operand,
                Err(err) => {
                    tracing::debug!("skipping catalog entry {name}: {err}");
                    return None;
                }
            };
            Some((
                name,
                CheckHelper {
                    check: entry.check,
                    label: entry.label,
                    operand,
                },
            ))
        })
        .collect();

    Ok(helpers)
}
