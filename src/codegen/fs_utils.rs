//! Filesystem utilities for code generation

use std::fs;
use std::path::Path;

use crate::error::{GenerateError, Result};

/// Write content to a file, creating parent directories if needed
pub fn write_file<P: AsRef<Path>, C: AsRef<[u8]>>(path: P, contents: C) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    fs::write(path, contents).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Create a directory and all of its parents
pub fn create_dir_all<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|source| GenerateError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_file_creates_parents() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("Models/DTOs/VehicleDto.cs");

        write_file(&target, "class VehicleDto {}").unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "class VehicleDto {}");
    }

    #[test]
    fn test_write_file_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("Data");
        fs::write(&blocker, "not a directory").unwrap();

        let err = write_file(blocker.join("AppDbContext.cs"), "x").unwrap_err();
        match err {
            GenerateError::Io { path, .. } => assert!(path.starts_with(&blocker)),
            other => panic!("unexpected error: {}", other),
        }
    }
}
