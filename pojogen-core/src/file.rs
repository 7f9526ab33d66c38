use std::path::{Path, PathBuf};

use eyre::Result;

/// Write `content` to `path`, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

/// Result of a write operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteResult {
    /// File was written to the given absolute path
    Written(PathBuf),
    /// Write was not attempted (dry run)
    Skipped,
}

/// A rendered unit waiting to be written below an output directory.
#[derive(Debug, Clone)]
pub struct OutputFile {
    relative_path: PathBuf,
    content: String,
}

impl OutputFile {
    /// Create a new output file with a path relative to the destination directory
    pub fn new(relative_path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            relative_path: relative_path.into(),
            content: content.into(),
        }
    }

    /// Get the path relative to the destination directory
    pub fn relative_path(&self) -> &Path {
        &self.relative_path
    }

    /// Get the rendered content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Get the full path below `base`
    pub fn full_path(&self, base: &Path) -> PathBuf {
        base.join(&self.relative_path)
    }

    /// Write the file below `base`
    pub fn write(&self, base: &Path) -> Result<WriteResult> {
        let path = self.full_path(base);
        write_file(&path, &self.content)?;
        Ok(WriteResult::Written(path))
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_write_file_creates_parent_dirs() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("org").join("example").join("Order.java");

        write_file(&path, "class Order {}").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "class Order {}");
    }

    #[test]
    fn test_write_file_overwrites_existing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Order.java");

        write_file(&path, "first").unwrap();
        write_file(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
    }

    #[test]
    fn test_output_file_write() {
        let temp = TempDir::new().unwrap();
        let file = OutputFile::new("generated/BaseHelloWorld.java", "interface BaseHelloWorld {}");

        let result = file.write(temp.path()).unwrap();

        let expected = temp.path().join("generated/BaseHelloWorld.java");
        assert_eq!(result, WriteResult::Written(expected.clone()));
        assert!(expected.exists());
    }

    #[test]
    fn test_output_file_write_into_file_fails() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("blocker"), "").unwrap();

        let file = OutputFile::new("blocker/Order.java", "");
        assert!(file.write(temp.path()).is_err());
    }
}
