use anyhow::{Context, Result};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// `<dir>/<unique_code><suffix>`
pub fn output_path(dir: &Path, unique_code: &str, suffix: &str) -> PathBuf {
    dir.join(format!("{}{}", unique_code, suffix))
}

/// Write `contents` to `path` through a temp file renamed over the target.
/// An existing document at `path` is replaced.
pub fn write_document(path: &Path, contents: &str) -> Result<()> {
    let dir = path
        .parent()
        .with_context(|| format!("output path {:?} has no parent directory", path))?;
    fs::create_dir_all(dir).with_context(|| format!("creating output directory {:?}", dir))?;

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("output path {:?} has no file name", path))?;
    let tmp_path = dir.join(format!(".{}.tmp", file_name));

    let mut tmp =
        fs::File::create(&tmp_path).with_context(|| format!("creating {:?}", tmp_path))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing {:?}", tmp_path))?;
    tmp.sync_all().with_context(|| format!("flushing {:?}", tmp_path))?;
    drop(tmp);

    fs::rename(&tmp_path, path)
        .with_context(|| format!("renaming {:?} -> {:?}", tmp_path, path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn names_file_after_code_and_suffix() {
        let p = output_path(Path::new("out/rng"), "aSNAK", "_CONUS_Range_2001v1.xml");
        assert_eq!(p, PathBuf::from("out/rng/aSNAK_CONUS_Range_2001v1.xml"));
    }

    #[test]
    fn creates_directory_and_replaces_existing() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("hab").join("mBEAR.xml");
        write_document(&path, "first")?;
        write_document(&path, "second")?;
        assert_eq!(fs::read_to_string(&path)?, "second");
        let leftovers: Vec<_> = fs::read_dir(dir.path().join("hab"))?
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
        Ok(())
    }
}
