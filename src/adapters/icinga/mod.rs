mod parser;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub use parser::{extract, sanitize, NamePolicy};

use crate::domain::ParsedFile;

/// Source of Icinga-style config files: one flat directory, regular files
/// only, no recursion.
#[derive(Debug, Clone)]
pub struct CfgDirectorySource {
    dir: PathBuf,
    policy: NamePolicy,
}

impl CfgDirectorySource {
    pub fn new(dir: impl Into<PathBuf>, policy: NamePolicy) -> Self {
        Self {
            dir: dir.into(),
            policy,
        }
    }

    /// List the regular files of the source directory in listing order
    pub fn list_files(&self) -> io::Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.path());
            }
        }
        Ok(files)
    }

    /// Read and parse one config file
    pub fn load(&self, path: &Path) -> io::Result<ParsedFile> {
        let contents = fs::read_to_string(path)?;
        Ok(extract(&contents, self.policy))
    }
}
