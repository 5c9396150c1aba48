//! Listing the files of a library folder.

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use subseek_core::error::{Error, Result};

/// A regular file directly inside a library folder.
#[derive(Debug, Clone)]
pub struct LibraryFile {
    pub name: String,
    pub path: PathBuf,
}

/// Files directly inside `folder` (no recursion), sorted by name.
///
/// Fails with [`Error::FolderNotFound`] when `folder` is missing or is not a
/// directory.
pub fn list_files(folder: &Path) -> Result<Vec<LibraryFile>> {
    if !folder.is_dir() {
        return Err(Error::FolderNotFound(folder.to_path_buf()));
    }

    let walker = WalkDir::new(folder)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    let mut files = Vec::new();
    for entry in walker {
        let entry = entry.map_err(std::io::Error::from)?;
        if !entry.file_type().is_file() {
            continue;
        }
        files.push(LibraryFile {
            name: entry.file_name().to_string_lossy().to_string(),
            path: entry.path().to_path_buf(),
        });
    }

    Ok(files)
}

/// Files in `folder` whose name starts with `prefix`.
pub fn list_candidates(folder: &Path, prefix: &str) -> Result<Vec<LibraryFile>> {
    Ok(list_files(folder)?
        .into_iter()
        .filter(|f| f.name.starts_with(prefix))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_lists_files_sorted_without_recursing() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("b.srt"), "").unwrap();
        fs::write(tmp.path().join("a.srt"), "").unwrap();
        fs::create_dir(tmp.path().join("nested")).unwrap();
        fs::write(tmp.path().join("nested").join("c.srt"), "").unwrap();

        let names: Vec<String> = list_files(tmp.path())
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(names, vec!["a.srt", "b.srt"]);
    }

    #[test]
    fn test_prefix_filter() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("Curb S01E01.srt"), "").unwrap();
        fs::write(tmp.path().join("Seinfeld S01E01.srt"), "").unwrap();

        let found = list_candidates(tmp.path(), "Curb").unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Curb S01E01.srt");
    }

    #[test]
    fn test_missing_folder() {
        let tmp = TempDir::new().unwrap();
        let missing = tmp.path().join("nope");
        assert!(matches!(
            list_files(&missing),
            Err(Error::FolderNotFound(p)) if p == missing
        ));

        let file = tmp.path().join("file.srt");
        fs::write(&file, "").unwrap();
        assert!(matches!(list_files(&file), Err(Error::FolderNotFound(_))));
    }
}
