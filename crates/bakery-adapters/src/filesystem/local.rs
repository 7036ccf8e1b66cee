//! Local filesystem adapter using std::fs.

use std::io;
use std::path::Path;

use bakery_core::{
    application::{ApplicationError, ports::Filesystem},
    error::{BakeryError, BakeryResult},
};
use tracing::trace;

/// Filesystem adapter backed by `std::fs`.
#[derive(Debug, Clone, Copy)]
pub struct LocalFilesystem;

impl LocalFilesystem {
    pub fn new() -> Self {
        Self
    }
}

impl Default for LocalFilesystem {
    fn default() -> Self {
        Self::new()
    }
}

impl Filesystem for LocalFilesystem {
    fn create_dir_all(&self, path: &Path) -> BakeryResult<()> {
        std::fs::create_dir_all(path).map_err(|e| map_io_error(path, e, "create directory"))
    }

    fn write_file(&self, path: &Path, content: &str) -> BakeryResult<()> {
        trace!(path = %path.display(), bytes = content.len(), "writing file");
        std::fs::write(path, content).map_err(|e| map_io_error(path, e, "write file"))
    }

    fn set_permissions(&self, path: &Path, executable: bool) -> BakeryResult<()> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            if executable {
                let metadata =
                    std::fs::metadata(path).map_err(|e| map_io_error(path, e, "read metadata"))?;
                let mut perms = metadata.permissions();
                perms.set_mode(perms.mode() | 0o111);
                std::fs::set_permissions(path, perms)
                    .map_err(|e| map_io_error(path, e, "set permissions"))?;
            }
        }
        #[cfg(not(unix))]
        {
            let _ = (path, executable);
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn remove_dir_all(&self, path: &Path) -> BakeryResult<()> {
        std::fs::remove_dir_all(path).map_err(|e| map_io_error(path, e, "remove directory"))
    }
}

fn map_io_error(path: &Path, e: io::Error, operation: &str) -> BakeryError {
    ApplicationError::FilesystemError {
        path: path.to_path_buf(),
        reason: format!("failed to {operation}: {e}"),
    }
    .into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_reports_existence() {
        let dir = TempDir::new().unwrap();
        let fs = LocalFilesystem::new();
        let nested = dir.path().join("a/b");

        fs.create_dir_all(&nested).unwrap();
        fs.write_file(&nested.join("x.txt"), "hello").unwrap();

        assert!(fs.exists(&nested.join("x.txt")));
        assert_eq!(std::fs::read_to_string(nested.join("x.txt")).unwrap(), "hello");
    }

    #[test]
    fn write_into_missing_directory_is_a_filesystem_error() {
        let dir = TempDir::new().unwrap();
        let err = LocalFilesystem::new()
            .write_file(&dir.path().join("missing/x.txt"), "x")
            .unwrap_err();
        assert!(matches!(
            err,
            BakeryError::Application(ApplicationError::FilesystemError { .. })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn set_permissions_adds_execute_bits() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let file = dir.path().join("run.sh");
        let fs = LocalFilesystem::new();
        fs.write_file(&file, "#!/bin/sh\n").unwrap();
        fs.set_permissions(&file, true).unwrap();

        let mode = std::fs::metadata(&file).unwrap().permissions().mode();
        assert_eq!(mode & 0o111, 0o111);
    }

    #[test]
    fn remove_dir_all_deletes_tree() {
        let dir = TempDir::new().unwrap();
        let root = dir.path().join("proj");
        let fs = LocalFilesystem::new();
        fs.create_dir_all(&root.join("src")).unwrap();
        fs.write_file(&root.join("src/a.py"), "").unwrap();

        fs.remove_dir_all(&root).unwrap();
        assert!(!fs.exists(&root));
    }
}
