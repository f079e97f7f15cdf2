//! Package locators: map an import path to the source files of that package.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::services::PackageLocator;
use super::source::normalize_file_name;
use crate::errors::LocateError;

/// Looks for `<root>/<package>` under each search root in order; the first existing directory
/// wins.
///
/// Member files are the regular files with the configured extension, excluding `_test` files,
/// sorted by name.
#[derive(Debug, Clone)]
pub struct DirLocator {
    roots: Vec<PathBuf>,
    extension: String,
}

impl DirLocator {
    pub fn new(roots: Vec<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            roots,
            extension: extension.into(),
        }
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    fn is_member(&self, path: &Path) -> bool {
        let matches_ext = path.extension().and_then(|e| e.to_str()) == Some(self.extension.as_str());
        let is_test = path
            .file_stem()
            .and_then(|s| s.to_str())
            .is_some_and(|s| s.ends_with("_test"));
        matches_ext && !is_test && path.is_file()
    }

    fn members(&self, dir: &Path) -> Result<Vec<String>, LocateError> {
        let io_err = |e: std::io::Error| LocateError::Io {
            path: dir.to_path_buf(),
            message: e.to_string(),
        };
        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(io_err)? {
            let path = entry.map_err(io_err)?.path();
            if self.is_member(&path) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files.iter().map(|p| normalize_file_name(&p.to_string_lossy())).collect())
    }
}

impl PackageLocator for DirLocator {
    #[tracing::instrument(level = "debug", skip(self), fields(roots = self.roots.len()))]
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError> {
        validate_package_name(package)?;

        let mut searched = Vec::with_capacity(self.roots.len());
        for root in &self.roots {
            let dir = root.join(package);
            if dir.is_dir() {
                let files = self.members(&dir)?;
                tracing::debug!(dir = %dir.display(), files = files.len(), "located package");
                return Ok(files);
            }
            searched.push(dir);
        }

        Err(LocateError::NotFound {
            package: package.to_string(),
            searched,
        })
    }
}

/// Import paths are relative, slash-separated and may not escape their root.
fn validate_package_name(package: &str) -> Result<(), LocateError> {
    let invalid = |reason: &str| LocateError::InvalidName {
        package: package.to_string(),
        reason: reason.to_string(),
    };
    if package.is_empty() {
        return Err(invalid("empty import path"));
    }
    let path = Path::new(package);
    if path.is_absolute() || package.starts_with('/') {
        return Err(invalid("import path must be relative"));
    }
    if package.split('/').any(|seg| seg.is_empty() || seg == "." || seg == "..") {
        return Err(invalid("import path may not contain empty, '.' or '..' elements"));
    }
    Ok(())
}

/// A fixed package table, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct StaticLocator {
    packages: HashMap<String, Vec<String>>,
}

impl StaticLocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a package and its member files
    pub fn with_package<I, S>(mut self, package: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.packages
            .insert(package.into(), files.into_iter().map(Into::into).collect());
        self
    }
}

impl PackageLocator for StaticLocator {
    fn locate(&self, package: &str) -> Result<Vec<String>, LocateError> {
        self.packages
            .get(package)
            .cloned()
            .ok_or_else(|| LocateError::NotFound {
                package: package.to_string(),
                searched: Vec::new(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "package x\n").unwrap();
    }

    #[test]
    fn test_members_are_filtered_and_sorted() {
        let dir = tempfile::tempdir().unwrap();
        let pkg = dir.path().join("geo");
        touch(&pkg.join("b.go"));
        touch(&pkg.join("a.go"));
        touch(&pkg.join("a_test.go"));
        touch(&pkg.join("notes.txt"));
        fs::create_dir_all(pkg.join("nested.go")).unwrap();

        let locator = DirLocator::new(vec![dir.path().to_path_buf()], "go");
        let files = locator.locate("geo").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|f| Path::new(f).file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.go", "b.go"]);
    }

    #[test]
    fn test_first_root_wins() {
        let first = tempfile::tempdir().unwrap();
        let second = tempfile::tempdir().unwrap();
        touch(&first.path().join("util/one.go"));
        touch(&second.path().join("util/two.go"));
        touch(&second.path().join("only/three.go"));

        let locator = DirLocator::new(vec![first.path().into(), second.path().into()], "go");
        assert_eq!(locator.locate("util").unwrap().len(), 1);
        assert!(locator.locate("util").unwrap()[0].ends_with("one.go"));
        assert!(locator.locate("only").unwrap()[0].ends_with("three.go"));
    }

    #[test]
    fn test_member_names_are_normalized() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a/a.go"));
        let root = dir.path().join(".");
        let locator = DirLocator::new(vec![root], "go");
        let expected = dir.path().join("a").join("a.go");
        assert_eq!(locator.locate("a").unwrap(), vec![expected.to_string_lossy().into_owned()]);
    }

    #[test]
    fn test_empty_package_directory_has_no_members() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("fmt")).unwrap();
        let locator = DirLocator::new(vec![dir.path().into()], "go");
        assert_eq!(locator.locate("fmt").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_not_found_lists_searched_directories() {
        let dir = tempfile::tempdir().unwrap();
        let locator = DirLocator::new(vec![dir.path().into()], "go");
        match locator.locate("missing") {
            Err(LocateError::NotFound { package, searched }) => {
                assert_eq!(package, "missing");
                assert_eq!(searched, vec![dir.path().join("missing")]);
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_names() {
        let locator = DirLocator::new(vec![PathBuf::from(".")], "go");
        for name in ["", "/abs", "../up", "a/./b", "a//b", "a/"] {
            assert!(
                matches!(locator.locate(name), Err(LocateError::InvalidName { .. })),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_static_locator() {
        let locator = StaticLocator::new().with_package("fmt", Vec::<String>::new()).with_package("util", ["u.go"]);
        assert!(locator.locate("fmt").unwrap().is_empty());
        assert_eq!(locator.locate("util").unwrap(), vec!["u.go".to_string()]);
        assert!(matches!(locator.locate("nope"), Err(LocateError::NotFound { .. })));
    }
}
