//! Destination name → terminal row mapping, fixed before any transfer starts.

use std::collections::HashMap;

use crate::url_model::destination_name;

/// Immutable row assignment for progress lines.
///
/// Rows follow input order. Names are not disambiguated: when two URLs share
/// a destination name, both render on the row of the later one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowLayout {
    rows: HashMap<String, u16>,
    height: u16,
}

impl RowLayout {
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut rows = HashMap::new();
        let mut height: u16 = 0;
        for name in names {
            rows.insert(name.into(), height);
            height = height.saturating_add(1);
        }
        Self { rows, height }
    }

    pub fn from_urls<S: AsRef<str>>(urls: &[S]) -> Self {
        Self::from_names(urls.iter().map(|u| destination_name(u.as_ref())))
    }

    pub fn row_of(&self, name: &str) -> Option<u16> {
        self.rows.get(name).copied()
    }

    /// Number of rows reserved (one per URL, duplicates included).
    pub fn height(&self) -> u16 {
        self.height
    }
}
