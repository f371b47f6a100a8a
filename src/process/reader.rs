// src/process/reader.rs

use anyhow::{Context, Result};
use csv::{ByteRecordsIntoIter, ReaderBuilder, Trim};
use std::{fs::File, io::Read, path::Path, str};
use tracing::trace;

use crate::schema::TableSchema;

/// One data record, positional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// 1-based record number in the source file, header included.
    pub number: usize,
    /// Field text; bytes that are not UTF-8 are replaced with U+FFFD.
    pub fields: Vec<String>,
    /// Indices of fields that were not valid UTF-8.
    pub invalid_utf8: Vec<usize>,
}

impl Row {
    pub fn new(number: usize, fields: Vec<String>) -> Self {
        Self {
            number,
            fields,
            invalid_utf8: Vec::new(),
        }
    }

    pub fn get(&self, idx: usize) -> Option<&str> {
        self.fields.get(idx).map(String::as_str)
    }
}

/// Lazy iterator over the data rows of one table, header rows skipped.
pub struct Rows<R: Read> {
    records: ByteRecordsIntoIter<R>,
    schema: &'static TableSchema,
    number: usize,
    headers_skipped: usize,
}

impl<R: Read> Rows<R> {
    pub fn headers_skipped(&self) -> usize {
        self.headers_skipped
    }
}

impl<R: Read> Iterator for Rows<R> {
    type Item = Result<Row>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let result = self.records.next()?;
            self.number += 1;
            let record = match result.with_context(|| format!("record {}", self.number)) {
                Ok(r) => r,
                Err(e) => return Some(Err(e)),
            };

            let sentinel = record
                .get(self.schema.sentinel_index)
                .and_then(|b| str::from_utf8(b).ok());
            if self.schema.is_header(sentinel) {
                trace!(record = self.number, "skipping header row");
                self.headers_skipped += 1;
                continue;
            }

            // undecodable fields are rejected per row during derivation
            let mut invalid_utf8 = Vec::new();
            let fields = record
                .iter()
                .enumerate()
                .map(|(idx, bytes)| match str::from_utf8(bytes) {
                    Ok(s) => s.to_string(),
                    Err(_) => {
                        invalid_utf8.push(idx);
                        String::from_utf8_lossy(bytes).into_owned()
                    }
                })
                .collect();

            return Some(Ok(Row {
                number: self.number,
                fields,
                invalid_utf8,
            }));
        }
    }
}

/// Read rows for `schema` from any byte source.
pub fn rows_from_reader<R: Read>(reader: R, schema: &'static TableSchema) -> Rows<R> {
    let rdr = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true) // field count is checked per row during derivation
        .trim(Trim::None)
        .from_reader(reader);
    Rows {
        records: rdr.into_byte_records(),
        schema,
        number: 0,
        headers_skipped: 0,
    }
}

/// Open `path` and read its rows for `schema`.
pub fn read_rows<P: AsRef<Path>>(path: P, schema: &'static TableSchema) -> Result<Rows<File>> {
    let path = path.as_ref();
    let file =
        File::open(path).with_context(|| format!("Failed to open CSV file: {}", path.display()))?;
    Ok(rows_from_reader(file, schema))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{HABITAT, RANGE};
    use std::io::Cursor;

    #[test]
    fn skips_range_header_and_keeps_numbers() -> Result<()> {
        let data = "sbItem,strUC,comName\n\
                    item1,aSNAK,\"American Snake, Banded\"\n\
                    \n\
                    item2,bROBI,Robin\n";
        let mut rows = rows_from_reader(Cursor::new(data), &RANGE);
        let first = rows.next().unwrap()?;
        assert_eq!(first.number, 2);
        assert_eq!(first.get(2), Some("American Snake, Banded"));
        let second = rows.next().unwrap()?;
        assert_eq!(second.get(1), Some("bROBI"));
        assert!(rows.next().is_none());
        assert_eq!(rows.headers_skipped(), 1);
        Ok(())
    }

    #[test]
    fn habitat_sentinel_is_first_column() -> Result<()> {
        let data = "GAP_code,comName\nmBEAR,Bear\n";
        let rows: Vec<Row> = rows_from_reader(Cursor::new(data), &HABITAT).collect::<Result<_>>()?;
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].fields, vec!["mBEAR", "Bear"]);
        Ok(())
    }

    #[test]
    fn short_rows_pass_through_for_validation() -> Result<()> {
        let rows: Vec<Row> =
            rows_from_reader(Cursor::new("only\n"), &RANGE).collect::<Result<_>>()?;
        assert_eq!(rows[0].fields.len(), 1);
        Ok(())
    }

    #[test]
    fn undecodable_fields_are_flagged_not_fatal() -> Result<()> {
        let mut data = b"item1,aFROG,Pe".to_vec();
        data.push(0xf1);
        data.extend_from_slice(b"a Frog\nitem2,bROBI,Robin\n");
        let rows: Vec<Row> =
            rows_from_reader(Cursor::new(data), &RANGE).collect::<Result<_>>()?;
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].invalid_utf8, vec![2]);
        assert_eq!(rows[0].get(2), Some("Pe\u{FFFD}a Frog"));
        assert!(rows[1].invalid_utf8.is_empty());
        Ok(())
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(read_rows("/definitely/not/here.csv", &RANGE).is_err());
    }
}
