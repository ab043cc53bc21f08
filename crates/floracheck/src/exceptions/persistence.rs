//! Loading exceptions from JSON.
//!
//! The file is a nested map of taxon, section and rule:
//!
//! ```json
//! {
//!   "Hesperoyucca whipplei": {
//!     "comment": "Listed under the old genus",
//!     "calflora": {
//!       "translation": "Yucca whipplei",
//!       "id": { "value": "8836", "note": "Older record id" }
//!     },
//!     "rpi": { "presence:SBD": true }
//!   }
//! }
//! ```
//!
//! A section is a source id; the `comment` section is ignored. A rule is
//! `<category>` or `<category>:<subcategory>`.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::{FloracheckError, Result};
use crate::names::ParsedName;

use super::category::{Exception, ExceptionCategory, ExceptionKey, ExceptionScope, ExceptionValue};
use super::store::ExceptionStore;

/// Section name carrying free text for humans.
pub const COMMENT_SECTION: &str = "comment";

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawValue {
    Plain(ExceptionValue),
    Detailed {
        value: ExceptionValue,
        #[serde(default)]
        global: bool,
        #[serde(default)]
        note: Option<String>,
    },
}

type RawFile = IndexMap<String, IndexMap<String, serde_json::Value>>;

impl ExceptionStore {
    /// Load exceptions from a JSON file.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # use floracheck::exceptions::ExceptionStore;
    /// let store = ExceptionStore::load("data/exceptions.json").unwrap();
    /// println!("{} exceptions", store.len());
    /// ```
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| FloracheckError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        let mut contents = String::new();
        BufReader::new(file)
            .read_to_string(&mut contents)
            .map_err(|e| FloracheckError::Io {
                path: path.to_path_buf(),
                source: e,
            })?;
        let store = Self::from_json_str(&contents)?;
        debug!(path = %path.display(), exceptions = store.len(), "loaded exceptions");
        Ok(store)
    }

    /// Parse exceptions from a JSON string.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let raw: RawFile = serde_json::from_str(json)?;
        let mut store = ExceptionStore::new();

        for (taxon, sections) in raw {
            let taxon = ParsedName::parse(&taxon)
                .map(|p| p.to_string())
                .unwrap_or_else(|| taxon.trim().to_string());

            for (section, rules) in sections {
                if section == COMMENT_SECTION {
                    continue;
                }
                let rules: IndexMap<String, RawValue> =
                    serde_json::from_value(rules).map_err(|e| {
                        FloracheckError::Config(format!(
                            "taxon '{}', section '{}': {}",
                            taxon, section, e
                        ))
                    })?;

                for (rule, value) in rules {
                    store.insert(build_exception(&taxon, &section, &rule, value))?;
                }
            }
        }
        Ok(store)
    }
}

fn build_exception(taxon: &str, section: &str, rule: &str, value: RawValue) -> Exception {
    let (token, subcategory) = match rule.split_once(':') {
        Some((token, sub)) => (token, Some(sub.trim().to_string())),
        None => (rule, None),
    };
    let key = ExceptionKey {
        taxon: taxon.to_string(),
        source: section.to_string(),
        category: ExceptionCategory::parse_token(token),
        subcategory,
    };
    match value {
        RawValue::Plain(value) => Exception::new(key, value),
        RawValue::Detailed {
            value,
            global,
            note,
        } => Exception {
            key,
            value,
            scope: if global {
                ExceptionScope::Global
            } else {
                ExceptionScope::Local
            },
            note,
        },
    }
}
