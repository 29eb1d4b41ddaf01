//! Shared helpers for the validation handlers

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Expand command-line paths into a concrete file list
///
/// Files are taken as given; directories are searched recursively for
/// `.json` files. Entries within a directory are visited in name order so
/// the batch is stable across runs.
pub fn collect_documents(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for path in paths {
        if path.is_dir() {
            collect_dir(path, &mut files)?;
        } else if path.is_file() {
            files.push(path.clone());
        } else {
            return Err(Error::FileNotFound { path: path.clone() });
        }
    }
    Ok(files)
}

fn collect_dir(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<std::io::Result<_>>()?;
    entries.sort();

    for entry in entries {
        if entry.is_dir() {
            collect_dir(&entry, files)?;
        } else if entry.extension().and_then(|ext| ext.to_str()) == Some("json") {
            files.push(entry);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn missing_path_is_reported() {
        let err = collect_documents(&[PathBuf::from("/nonexistent/book.json")]).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn directories_expand_to_sorted_json_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "skip me").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested/c.json"), "{}").unwrap();

        let files = collect_documents(&[dir.path().to_path_buf()]).unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.strip_prefix(dir.path()).unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json", "nested/c.json"]);
    }

    #[test]
    fn explicit_files_keep_argument_order() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("z.json");
        let second = dir.path().join("a.json");
        fs::write(&first, "{}").unwrap();
        fs::write(&second, "{}").unwrap();

        let files = collect_documents(&[first.clone(), second.clone()]).unwrap();
        assert_eq!(files, vec![first, second]);
    }
}
