//! [`TestRepo`] builder for apply and source-loading scenarios.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use pack_fs::NormalizedPath;
use tempfile::TempDir;

/// A temporary directory with helper methods for test setup and assertion.
///
/// Used both as an apply target and as a pack source tree.
///
/// # Example
///
/// ```rust,no_run
/// use pack_test_utils::repo::TestRepo;
///
/// let repo = TestRepo::new();
/// repo.write_file("docs/notes.md", "hand written");
/// repo.assert_file_contains("docs/notes.md", "hand written");
/// ```
pub struct TestRepo {
    temp_dir: TempDir,
}

impl Default for TestRepo {
    fn default() -> Self {
        Self::new()
    }
}

impl TestRepo {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Return the root path of the temporary directory.
    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    /// The root as a [`NormalizedPath`], as the library APIs take it.
    pub fn path(&self) -> NormalizedPath {
        NormalizedPath::new(self.root())
    }

    /// Write `content` to `path` (relative to the root), creating parents.
    pub fn write_file(&self, path: &str, content: &str) {
        let full_path = self.root().join(path);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("TestRepo::write_file: failed to write {path}: {e}"));
    }

    /// Read `path` (relative to the root) as UTF-8.
    ///
    /// # Panics
    /// Panics if the file does not exist or is not valid UTF-8.
    pub fn read_file(&self, path: &str) -> String {
        fs::read_to_string(self.root().join(path))
            .unwrap_or_else(|e| panic!("TestRepo::read_file: failed to read {path}: {e}"))
    }

    /// Every file under the root, keyed by forward-slash relative path.
    ///
    /// Used to prove that a run left the tree untouched.
    pub fn snapshot(&self) -> BTreeMap<String, Vec<u8>> {
        let mut files = BTreeMap::new();
        collect(self.root(), self.root(), &mut files);
        files
    }

    /// Assert that `path` (relative to the repo root) exists.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path does not exist.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}\nFull path: {}",
            path,
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the repo root) does **not** exist.
    ///
    /// # Panics
    /// Panics with a descriptive message if the path exists.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}\nFull path: {}",
            path,
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `expected` as a substring.
    ///
    /// # Panics
    /// Panics if the file cannot be read or does not contain `expected`.
    pub fn assert_file_contains(&self, path: &str, expected: &str) {
        let content = self.read_file(path);
        assert!(
            content.contains(expected),
            "File {} does not contain expected content.\nExpected to find: {}\nActual content:\n{}",
            path,
            expected,
            content
        );
    }
}

fn collect(root: &Path, dir: &Path, files: &mut BTreeMap<String, Vec<u8>>) {
    for entry in fs::read_dir(dir).unwrap() {
        let path = entry.unwrap().path();
        if path.is_dir() {
            collect(root, &path, files);
        } else {
            let relative = path.strip_prefix(root).unwrap();
            let key = relative.to_string_lossy().replace('\\', "/");
            files.insert(key, fs::read(&path).unwrap());
        }
    }
}
