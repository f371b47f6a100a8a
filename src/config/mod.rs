// src/config/mod.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::{
    fs::File,
    path::{Path, PathBuf},
};

use crate::schema::Dataset;
use crate::template::PlaceholderStyle;

/// What to do with a row whose fields cannot be derived.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowErrorPolicy {
    /// Log the row, record it in the report and carry on.
    #[default]
    Skip,
    /// Fail the whole run on the first bad row.
    Abort,
}

/// Per-dataset overrides; unset fields fall back to the 2001v1 layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatasetConfig {
    pub enabled: bool,
    pub csv: Option<PathBuf>,
    pub template: Option<PathBuf>,
    pub output_subdir: Option<PathBuf>,
    pub suffix: Option<String>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            csv: None,
            template: None,
            output_subdir: None,
            suffix: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Directory relative input paths resolve against.
    pub base_dir: PathBuf,
    /// Root for `rng/` and `hab/`; defaults to `base_dir`.
    pub output_dir: Option<PathBuf>,
    pub placeholder_style: PlaceholderStyle,
    pub on_row_error: RowErrorPolicy,
    /// Fixed date for the `str_Date` placeholder; today when unset.
    pub run_date: Option<NaiveDate>,
    pub range: DatasetConfig,
    pub habitat: DatasetConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_dir: PathBuf::from("."),
            output_dir: None,
            placeholder_style: PlaceholderStyle::default(),
            on_row_error: RowErrorPolicy::default(),
            run_date: None,
            range: DatasetConfig::default(),
            habitat: DatasetConfig::default(),
        }
    }
}

/// Concrete paths for one dataset after defaults and `base_dir` are applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedDataset {
    pub dataset: Dataset,
    pub csv: PathBuf,
    pub template: PathBuf,
    pub output_dir: PathBuf,
    pub suffix: String,
}

fn default_inputs(dataset: Dataset) -> (&'static str, &'static str) {
    match dataset {
        Dataset::Range => (
            "ScienceBaseRangeMapCSV_20180713.csv",
            "CONUS 2001v1 Range Map TEMPLATE 13jul2018.xml",
        ),
        Dataset::Habitat => (
            "ScienceBaseHabMapCSV_20180713.csv",
            "CONUS 2001v1 Habitat Map TEMPLATE 13jul2018.xml",
        ),
    }
}

impl Config {
    /// Load a YAML config. A relative `base_dir` is taken relative to the file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("opening config {}", path.display()))?;
        let mut config: Config = serde_yaml::from_reader(file)
            .with_context(|| format!("parsing config {}", path.display()))?;
        if config.base_dir.is_relative() {
            if let Some(parent) = path.parent() {
                config.base_dir = parent.join(&config.base_dir);
            }
        }
        Ok(config)
    }

    pub fn dataset(&self, dataset: Dataset) -> &DatasetConfig {
        match dataset {
            Dataset::Range => &self.range,
            Dataset::Habitat => &self.habitat,
        }
    }

    pub fn dataset_mut(&mut self, dataset: Dataset) -> &mut DatasetConfig {
        match dataset {
            Dataset::Range => &mut self.range,
            Dataset::Habitat => &mut self.habitat,
        }
    }

    fn under_base(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    pub fn resolve(&self, dataset: Dataset) -> ResolvedDataset {
        let cfg = self.dataset(dataset);
        let schema = dataset.schema();
        let (csv, template) = default_inputs(dataset);

        let output_root = match &self.output_dir {
            Some(dir) => self.under_base(dir),
            None => self.base_dir.clone(),
        };
        let subdir = cfg
            .output_subdir
            .clone()
            .unwrap_or_else(|| PathBuf::from(schema.default_subdir));

        ResolvedDataset {
            dataset,
            csv: self.under_base(cfg.csv.as_deref().unwrap_or(Path::new(csv))),
            template: self.under_base(cfg.template.as_deref().unwrap_or(Path::new(template))),
            output_dir: output_root.join(subdir),
            suffix: cfg
                .suffix
                .clone()
                .unwrap_or_else(|| schema.default_suffix.to_string()),
        }
    }

    /// Enabled datasets in processing order (range, then habitat).
    pub fn enabled(&self) -> Vec<Dataset> {
        Dataset::ALL
            .into_iter()
            .filter(|d| self.dataset(*d).enabled)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn defaults_reproduce_original_layout() {
        let cfg = Config {
            base_dir: PathBuf::from("/data/final_xml"),
            ..Config::default()
        };
        let rng = cfg.resolve(Dataset::Range);
        assert_eq!(
            rng.csv,
            PathBuf::from("/data/final_xml/ScienceBaseRangeMapCSV_20180713.csv")
        );
        assert_eq!(rng.output_dir, PathBuf::from("/data/final_xml/rng"));
        assert_eq!(rng.suffix, "_CONUS_Range_2001v1.xml");

        let hab = cfg.resolve(Dataset::Habitat);
        assert_eq!(
            hab.template,
            PathBuf::from("/data/final_xml/CONUS 2001v1 Habitat Map TEMPLATE 13jul2018.xml")
        );
        assert_eq!(hab.output_dir, PathBuf::from("/data/final_xml/hab"));
        assert_eq!(cfg.enabled(), vec![Dataset::Range, Dataset::Habitat]);
    }

    #[test]
    fn loads_partial_yaml() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("vertmeta.yaml");
        fs::write(
            &path,
            "base_dir: xml\n\
             output_dir: /out\n\
             placeholder_style: braces\n\
             on_row_error: abort\n\
             run_date: 2018-07-13\n\
             habitat:\n  enabled: false\n\
             range:\n  csv: rng.csv\n  suffix: _R.xml\n",
        )?;
        let cfg = Config::load(&path)?;
        assert_eq!(cfg.base_dir, dir.path().join("xml"));
        assert_eq!(cfg.placeholder_style, PlaceholderStyle::Braces);
        assert_eq!(cfg.on_row_error, RowErrorPolicy::Abort);
        assert_eq!(cfg.run_date, NaiveDate::from_ymd_opt(2018, 7, 13));
        assert_eq!(cfg.enabled(), vec![Dataset::Range]);

        let rng = cfg.resolve(Dataset::Range);
        assert_eq!(rng.csv, dir.path().join("xml").join("rng.csv"));
        assert_eq!(rng.output_dir, PathBuf::from("/out/rng"));
        assert_eq!(rng.suffix, "_R.xml");
        Ok(())
    }

    #[test]
    fn unknown_keys_are_rejected() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("bad.yaml");
        fs::write(&path, "range:\n  cvs: typo.csv\n")?;
        assert!(Config::load(&path).is_err());
        Ok(())
    }
}
