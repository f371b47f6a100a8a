// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// A single positional column of an input CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Column {
    pub name: &'static str,
    /// Template placeholder fed verbatim by this column, if any.
    pub placeholder: Option<&'static str>,
}

impl Column {
    pub const fn new(name: &'static str, placeholder: &'static str) -> Self {
        Self {
            name,
            placeholder: Some(placeholder),
        }
    }

    /// A column only consumed by derived fields.
    pub const fn derived_only(name: &'static str) -> Self {
        Self {
            name,
            placeholder: None,
        }
    }
}

/// Which metadata product a table describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dataset {
    Range,
    Habitat,
}

impl Dataset {
    pub const ALL: [Dataset; 2] = [Dataset::Range, Dataset::Habitat];

    pub fn as_str(&self) -> &str {
        match self {
            Dataset::Range => "range",
            Dataset::Habitat => "habitat",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "range" | "rng" => Some(Dataset::Range),
            "habitat" | "hab" => Some(Dataset::Habitat),
            _ => None,
        }
    }

    pub fn schema(&self) -> &'static TableSchema {
        match self {
            Dataset::Range => &super::range::RANGE,
            Dataset::Habitat => &super::habitat::HABITAT,
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placeholders filled from derived fields rather than straight from a column.
pub mod derived {
    pub const PUB_YEAR: &str = "pub_Year";
    pub const TAXA_TITLE: &str = "str_Taxa1";
    pub const TAXA_LOWER: &str = "str_Taxa2";
    pub const RUN_DATE: &str = "str_Date";
    pub const EDITORS: &str = "edit_Txt";
}

/// Fixed positional layout of one input table.
#[derive(Debug)]
pub struct TableSchema {
    pub dataset: Dataset,
    pub columns: &'static [Column],
    /// Column holding the header sentinel.
    pub sentinel_index: usize,
    pub sentinel: &'static str,
    pub unique_code_index: usize,
    pub pub_date_index: usize,
    /// Editor list rendered as prose into `edit_Txt`.
    pub editors_index: Option<usize>,
    pub default_subdir: &'static str,
    pub default_suffix: &'static str,
}

impl TableSchema {
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Every placeholder this table can fill, column-fed ones first.
    pub fn placeholders(&self) -> Vec<&'static str> {
        let mut keys: Vec<&'static str> =
            self.columns.iter().filter_map(|c| c.placeholder).collect();
        if self.editors_index.is_some() {
            keys.push(derived::EDITORS);
        }
        keys.extend([
            derived::PUB_YEAR,
            derived::TAXA_TITLE,
            derived::TAXA_LOWER,
            derived::RUN_DATE,
        ]);
        keys
    }

    pub fn is_header(&self, sentinel_field: Option<&str>) -> bool {
        sentinel_field.map(str::trim) == Some(self.sentinel)
    }
}
