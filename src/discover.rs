//! Input discovery: expand files and folders into a sorted, deduplicated
//! list of supported images plus their common root directory.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use walkdir::WalkDir;

/// File extensions accepted as input, matched case-insensitively.
pub const SUPPORTED_INPUT_EXTS: &[&str] = &["jpg", "jpeg", "png", "bmp", "tif", "tiff"];

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_input(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => {
            let ext = ext.to_lowercase();
            SUPPORTED_INPUT_EXTS.contains(&ext.as_str())
        }
        None => false,
    }
}

/// Discovered input files and their common root directory.
///
/// Produced once by [`discover_inputs`] and read-only thereafter.
#[derive(Debug, Clone)]
pub struct ImportResult {
    /// Unique canonical paths, sorted by path components.
    pub files: Vec<PathBuf>,
    /// Longest common ancestor of all input roots, or the current working
    /// directory when nothing resolved.
    pub common_root: PathBuf,
}

/// Longest common ancestor of two absolute paths.
fn common_ancestor(a: &Path, b: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for (ca, cb) in a.components().zip(b.components()) {
        if ca == cb {
            out.push(ca.as_os_str());
        } else {
            break;
        }
    }
    // Never collapse below the filesystem root.
    if out.components().next().is_none() {
        if let Some(root @ Component::RootDir) = a.components().next() {
            out.push(root.as_os_str());
        }
    }
    out
}

/// Discover image inputs given a mix of file and folder paths.
///
/// Folders are walked recursively and their supported images collected;
/// plain files are kept when supported. Each existing input contributes a
/// root (the folder itself, or a file's parent). Paths are canonicalized up
/// front, deduplicated, and sorted; inputs that do not exist are skipped
/// silently so callers may pass stale paths.
#[must_use]
pub fn discover_inputs<I, P>(paths: I) -> ImportResult
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let mut unique: BTreeSet<PathBuf> = BTreeSet::new();
    let mut roots: Vec<PathBuf> = Vec::new();

    for raw in paths {
        // Canonicalization also filters out paths that no longer exist.
        let Ok(path) = std::fs::canonicalize(raw.as_ref()) else {
            continue;
        };

        if path.is_dir() {
            roots.push(path.clone());
            for entry in WalkDir::new(&path)
                .into_iter()
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().is_file())
            {
                if is_supported_input(entry.path()) {
                    unique.insert(entry.into_path());
                }
            }
        } else if path.is_file() {
            if let Some(parent) = path.parent() {
                roots.push(parent.to_path_buf());
            }
            if is_supported_input(&path) {
                unique.insert(path);
            }
        }
    }

    let common_root = roots
        .iter()
        .skip(1)
        .fold(roots.first().cloned(), |acc, root| {
            acc.map(|a| common_ancestor(&a, root))
        })
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

    ImportResult {
        files: unique.into_iter().collect(),
        common_root,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::write(path, b"x").unwrap();
    }

    #[test]
    fn supported_extensions_are_case_insensitive() {
        assert!(is_supported_input(Path::new("a.jpg")));
        assert!(is_supported_input(Path::new("a.JPEG")));
        assert!(is_supported_input(Path::new("a.Png")));
        assert!(is_supported_input(Path::new("a.bmp")));
        assert!(is_supported_input(Path::new("a.TIF")));
        assert!(is_supported_input(Path::new("a.tiff")));
    }

    #[test]
    fn unsupported_extensions_are_rejected() {
        assert!(!is_supported_input(Path::new("a.gif")));
        assert!(!is_supported_input(Path::new("a.txt")));
        assert!(!is_supported_input(Path::new("a")));
        assert!(!is_supported_input(Path::new("a.webp")));
    }

    #[test]
    fn folder_discovery_filters_sorts_and_sets_root() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("b.jpg"));
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("notes.txt"));

        let result = discover_inputs([dir.path()]);
        let names: Vec<_> = result
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.png", "b.jpg"]);
        assert_eq!(result.common_root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn nested_folders_are_walked_recursively() {
        let dir = tempfile::tempdir().unwrap();
        let sub = dir.path().join("nested/deeper");
        std::fs::create_dir_all(&sub).unwrap();
        touch(&dir.path().join("top.jpg"));
        touch(&sub.join("deep.tif"));

        let result = discover_inputs([dir.path()]);
        assert_eq!(result.files.len(), 2);
    }

    #[test]
    fn duplicate_references_collapse_to_one_entry() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.jpg");
        touch(&file);

        let result = discover_inputs([dir.path().to_path_buf(), file.clone(), file]);
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn missing_paths_are_skipped_silently() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.jpg"));

        let stale = dir.path().join("does-not-exist.png");
        let result = discover_inputs([dir.path().to_path_buf(), stale]);
        assert_eq!(result.files.len(), 1);
    }

    #[test]
    fn unsupported_single_file_contributes_root_but_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("readme.txt");
        touch(&txt);

        let result = discover_inputs([txt]);
        assert!(result.files.is_empty());
        assert_eq!(result.common_root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn empty_input_falls_back_to_current_dir() {
        let result = discover_inputs(Vec::<PathBuf>::new());
        assert!(result.files.is_empty());
        assert_eq!(result.common_root, std::env::current_dir().unwrap());
    }

    #[test]
    fn common_root_spans_sibling_folders() {
        let dir = tempfile::tempdir().unwrap();
        let left = dir.path().join("left");
        let right = dir.path().join("right");
        std::fs::create_dir_all(&left).unwrap();
        std::fs::create_dir_all(&right).unwrap();
        touch(&left.join("a.jpg"));
        touch(&right.join("b.jpg"));

        let result = discover_inputs([left, right]);
        assert_eq!(result.files.len(), 2);
        assert_eq!(result.common_root, dir.path().canonicalize().unwrap());
    }

    #[test]
    fn common_ancestor_of_unrelated_paths_is_the_fs_root() {
        let a = Path::new("/alpha/one");
        let b = Path::new("/beta/two");
        assert_eq!(common_ancestor(a, b), PathBuf::from("/"));
    }
}
