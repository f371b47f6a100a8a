// src/process/derive.rs

use chrono::NaiveDate;
use tracing::warn;

use super::{date_parser, editors, reader::Row, taxon::Taxon};
use crate::error::FieldError;
use crate::schema::{derived, TableSchema};
use crate::template::PlaceholderMap;

/// Values computed from a row rather than copied from it.
///
/// Always built fresh for each row; nothing carries over between rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerivedFields {
    pub unique_code: String,
    pub pub_year: String,
    pub taxon: Taxon,
    pub run_date: String,
    /// Editors prose, for tables that carry an editor list.
    pub editors: Option<String>,
}

fn check_unique_code(code: &str) -> Result<(), FieldError> {
    let bad = code.is_empty()
        || code == "."
        || code == ".."
        || code.contains(['/', '\\'])
        || code.chars().any(char::is_control);
    if bad {
        return Err(FieldError::InvalidUniqueCode {
            code: code.to_string(),
        });
    }
    Ok(())
}

/// Validate `row` against `schema` and compute its derived fields.
pub fn derive_fields(
    row: &Row,
    schema: &TableSchema,
    run_date: NaiveDate,
) -> Result<DerivedFields, FieldError> {
    let found = row.fields.len();
    if found < schema.width() {
        return Err(FieldError::MalformedRow {
            expected: schema.width(),
            found,
        });
    }
    if found > schema.width() {
        warn!(
            row = row.number,
            expected = schema.width(),
            found,
            "ignoring trailing fields"
        );
    }

    if let Some(&idx) = row.invalid_utf8.iter().find(|&&idx| idx < schema.width()) {
        return Err(FieldError::InvalidEncoding {
            column: schema.columns[idx].name.to_string(),
        });
    }

    let field = move |idx: usize| row.fields[idx].as_str();

    let unique_code = field(schema.unique_code_index).trim();
    let taxon = Taxon::from_code(unique_code)?;
    check_unique_code(unique_code)?;

    let pub_date = field(schema.pub_date_index);
    let pub_year = date_parser::publication_year(pub_date).ok_or_else(|| {
        FieldError::InvalidPublicationDate {
            value: pub_date.to_string(),
        }
    })?;

    let editors = schema
        .editors_index
        .map(|idx| editors::editors_prose(field(idx)))
        .transpose()?;

    Ok(DerivedFields {
        unique_code: unique_code.to_string(),
        pub_year: pub_year.to_string(),
        taxon,
        run_date: date_parser::format_run_date(run_date),
        editors,
    })
}

/// Placeholder map for one row: column-fed keys in column order, then derived keys.
pub fn placeholder_map(row: &Row, schema: &TableSchema, fields: &DerivedFields) -> PlaceholderMap {
    let mut map = PlaceholderMap::new();
    for (column, value) in schema.columns.iter().zip(&row.fields) {
        if let Some(key) = column.placeholder {
            map.insert(key, value.as_str());
        }
    }
    // the trimmed code is what names the output file
    if let Some(key) = schema.columns[schema.unique_code_index].placeholder {
        map.insert(key, fields.unique_code.as_str());
    }
    if let Some(prose) = &fields.editors {
        map.insert(derived::EDITORS, prose.as_str());
    }
    map.insert(derived::PUB_YEAR, fields.pub_year.as_str());
    map.insert(derived::TAXA_TITLE, fields.taxon.title());
    map.insert(derived::TAXA_LOWER, fields.taxon.lower());
    map.insert(derived::RUN_DATE, fields.run_date.as_str());
    map
}
