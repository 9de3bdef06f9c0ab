use std::{fs, path::Path};

use anyhow::{bail, Context, Result};

/// Create the directory if it doesn’t exist; error if a non-directory exists there.
pub(crate) fn ensure_dir_exists(path: &Path) -> Result<()> {
    if path.exists() {
        if !path.is_dir() {
            bail!("Path exists but is not a directory: {}", path.display());
        }
    } else {
        fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory {}", path.display()))?;
    }
    Ok(())
}

/// Error unless the file already exists.
pub(crate) fn require_file_exists(path: &Path) -> Result<()> {
    if !path.exists() {
        bail!("File does not exist: {}", path.display());
    }
    if !path.is_file() {
        bail!("Path exists but is not a file: {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn creates_nested_directories() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a/b");
        ensure_dir_exists(&nested).unwrap();
        assert!(nested.is_dir());
        ensure_dir_exists(&nested).unwrap();
    }

    #[test]
    fn file_checks() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("areas.geojson");
        assert!(require_file_exists(&file).is_err());
        fs::write(&file, "{}").unwrap();
        require_file_exists(&file).unwrap();
        assert!(require_file_exists(dir.path()).is_err());
        assert!(ensure_dir_exists(&file).is_err());
    }
}
