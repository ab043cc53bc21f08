//! Genus and family grouping.

use serde::{Deserialize, Serialize};

/// A genus and the taxa registered under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genus {
    pub name: String,
    /// Family name; `None` until the genus is assigned to one.
    pub family: Option<String>,
    /// Member taxon names in registration order.
    pub taxa: Vec<String>,
}

impl Genus {
    pub(crate) fn new(name: impl Into<String>, family: Option<String>) -> Self {
        Self {
            name: name.into(),
            family,
            taxa: Vec::new(),
        }
    }
}

/// A family and its classification section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Family {
    pub name: String,
    /// Section such as "Eudicots", "Monocots" or "Ferns".
    pub section: String,
    pub genera: Vec<String>,
}

impl Family {
    pub(crate) fn new(name: impl Into<String>, section: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            section: section.into(),
            genera: Vec::new(),
        }
    }
}
