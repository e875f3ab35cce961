//! Data directory resolution and file discovery.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{LoadError, Result};

/// Environment variable that points the loaders at a data directory.
pub const DATA_DIR_ENV_VAR: &str = "PCE_DATA_DIR";

/// Subdirectory holding codelist definitions (`*.json`).
pub const CODELISTS_DIR: &str = "codelists";
/// Subdirectory holding translation overlays (`<lang>.csv`).
pub const I18N_DIR: &str = "i18n";
/// Subdirectory holding cascade rule sets (`*.json`).
pub const CASCADE_RULES_DIR: &str = "cascade_rules";

/// Data directory from `PCE_DATA_DIR`, if set and non-empty.
pub fn data_dir_override() -> Option<PathBuf> {
    std::env::var_os(DATA_DIR_ENV_VAR)
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

pub fn codelists_dir(root: &Path) -> PathBuf {
    root.join(CODELISTS_DIR)
}

pub fn i18n_dir(root: &Path) -> PathBuf {
    root.join(I18N_DIR)
}

pub fn cascade_rules_dir(root: &Path) -> PathBuf {
    root.join(CASCADE_RULES_DIR)
}

/// Read every file with the given extension in `dir`, sorted by file name.
///
/// Returns `(file name, contents)` pairs. A missing directory yields no files
/// when `required` is false.
pub fn read_sorted(dir: &Path, extension: &str, required: bool) -> Result<Vec<(String, String)>> {
    if !dir.is_dir() {
        if required {
            return Err(LoadError::Io {
                path: dir.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "directory not found"),
            });
        }
        return Ok(Vec::new());
    }

    let io_err = |source| LoadError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let path = entry.map_err(io_err)?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == extension) {
            paths.push(path);
        }
    }
    paths.sort();

    paths
        .into_iter()
        .map(|path| {
            let content = fs::read_to_string(&path).map_err(|source| LoadError::Io {
                path: path.clone(),
                source,
            })?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok((name, content))
        })
        .collect()
}

/// File name without its extension.
pub fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stems() {
        assert_eq!(file_stem("fr.csv"), "fr");
        assert_eq!(file_stem("data-categories.json"), "data-categories");
        assert_eq!(file_stem("noext"), "noext");
    }

    #[test]
    fn missing_optional_directory_is_empty() {
        let dir = std::env::temp_dir().join("pce-paths-test-does-not-exist");
        let files = read_sorted(&dir, "csv", false).expect("optional dir");
        assert!(files.is_empty());
        assert!(read_sorted(&dir, "csv", true).is_err());
    }
}
