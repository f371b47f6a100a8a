// src/process/mod.rs
pub mod date_parser;
pub mod derive;
pub mod editors;
pub mod reader;
pub mod taxon;
pub mod writer;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use std::{
    io::Read,
    path::{Path, PathBuf},
};
use tracing::{debug, info, instrument, warn};

use crate::config::{Config, ResolvedDataset, RowErrorPolicy};
use crate::error::{FieldError, RowError};
use crate::report::{RowFailure, RunReport};
use crate::schema::TableSchema;
use crate::template::{PlaceholderStyle, Substituter, Template};
use derive::DerivedFields;
use reader::{Row, Rows};

/// Everything a pipeline needs besides its table layout and template.
#[derive(Debug, Clone)]
pub struct PipelineSettings {
    pub output_dir: PathBuf,
    pub suffix: String,
    pub style: PlaceholderStyle,
    pub policy: RowErrorPolicy,
    pub run_date: NaiveDate,
}

/// Read → derive → substitute → write, one document per CSV row.
pub struct Pipeline {
    schema: &'static TableSchema,
    template: Template,
    substituter: Substituter,
    settings: PipelineSettings,
}

impl Pipeline {
    pub fn new(
        schema: &'static TableSchema,
        template: Template,
        settings: PipelineSettings,
    ) -> Result<Self> {
        let keys = schema.placeholders();
        let substituter = Substituter::new(&keys, settings.style)?;

        let missing = template.missing_placeholders(&keys, settings.style);
        if !missing.is_empty() {
            debug!(dataset = %schema.dataset, ?missing, "template does not use every placeholder");
        }
        if settings.style == PlaceholderStyle::Braces {
            let unknown = template.unknown_brace_tokens(&keys);
            if !unknown.is_empty() {
                warn!(
                    dataset = %schema.dataset,
                    template = %template.path.display(),
                    ?unknown,
                    "template has placeholders no column fills"
                );
            }
        }

        Ok(Self {
            schema,
            template,
            substituter,
            settings,
        })
    }

    /// Build the pipeline for `resolved`, reading its template from disk.
    pub fn from_config(resolved: &ResolvedDataset, config: &Config, run_date: NaiveDate) -> Result<Self> {
        let template = Template::load(&resolved.template)?;
        Self::new(
            resolved.dataset.schema(),
            template,
            PipelineSettings {
                output_dir: resolved.output_dir.clone(),
                suffix: resolved.suffix.clone(),
                style: config.placeholder_style,
                policy: config.on_row_error,
                run_date,
            },
        )
    }

    pub fn schema(&self) -> &'static TableSchema {
        self.schema
    }

    /// Derive one row's fields and render its document.
    pub fn render_row(&self, row: &Row) -> Result<(DerivedFields, String), FieldError> {
        let fields = derive::derive_fields(row, self.schema, self.settings.run_date)?;
        let map = derive::placeholder_map(row, self.schema, &fields);
        let doc = self.substituter.render(&self.template, &map);
        Ok((fields, doc))
    }

    /// Process every data row of `csv_path`.
    #[instrument(level = "info", skip(self, csv_path), fields(dataset = %self.schema.dataset, csv = %csv_path.display()))]
    pub fn run(&self, csv_path: &Path) -> Result<RunReport> {
        let rows = reader::read_rows(csv_path, self.schema)?;
        self.run_rows(csv_path, rows)
    }

    /// Process rows from any source; `source` names it in errors and the report.
    pub fn run_rows<R: Read>(&self, source: &Path, mut rows: Rows<R>) -> Result<RunReport> {
        let mut report = RunReport::new(self.schema.dataset, source);
        info!(output_dir = %self.settings.output_dir.display(), "starting pipeline");

        for next in rows.by_ref() {
            let row = next.with_context(|| format!("reading {}", source.display()))?;
            report.rows_read += 1;

            match self.render_row(&row) {
                Ok((fields, doc)) => {
                    let path = writer::output_path(
                        &self.settings.output_dir,
                        &fields.unique_code,
                        &self.settings.suffix,
                    );
                    writer::write_document(&path, &doc)?;
                    debug!(row = row.number, code = %fields.unique_code, path = %path.display(), "wrote document");
                    if report.written.contains(&path) {
                        warn!(
                            row = row.number,
                            code = %fields.unique_code,
                            path = %path.display(),
                            "unique code repeated, earlier document overwritten"
                        );
                        report.duplicate_codes.push(fields.unique_code);
                    } else {
                        report.written.push(path);
                    }
                }
                Err(kind) => {
                    let err = RowError::new(source, row.number, kind);
                    match self.settings.policy {
                        RowErrorPolicy::Abort => return Err(err.into()),
                        RowErrorPolicy::Skip => {
                            warn!(error = %err, "skipping row");
                            report.failures.push(RowFailure {
                                row: err.row,
                                message: err.kind.to_string(),
                            });
                        }
                    }
                }
            }
        }

        report.headers_skipped = rows.headers_skipped() as u64;
        report.finished = Utc::now();
        Ok(report)
    }
}

/// Run every enabled dataset in `config`, or only `only` when given.
pub fn run_all(
    config: &Config,
    only: Option<crate::schema::Dataset>,
    run_date: NaiveDate,
) -> Result<Vec<RunReport>> {
    let mut reports = Vec::new();
    for dataset in config.enabled() {
        if only.is_some_and(|d| d != dataset) {
            continue;
        }
        let resolved = config.resolve(dataset);
        let pipeline = Pipeline::from_config(&resolved, config, run_date)
            .with_context(|| format!("preparing {} pipeline", dataset))?;
        let report = pipeline
            .run(&resolved.csv)
            .with_context(|| format!("{} pipeline failed", dataset))?;
        report.log_summary();
        reports.push(report);
    }
    Ok(reports)
}
