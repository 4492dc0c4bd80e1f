//! Metadata about the last successful build of a configuration file

use std::path::Path;

use chrono::{DateTime, Utc};
use color_eyre::eyre::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::compiler::Artifact;
use crate::project_model::compiler::CppCompiler;
use crate::utils;

/// Dumped under `<output_dir>/nativext/build.json` once every extension has been built
///
/// ```rust
/// use std::path::PathBuf;
/// use nativext::compiler::{record::BuildRecord, Artifact};
/// use nativext::project_model::compiler::CppCompiler;
///
/// let record = BuildRecord::new(
///     CppCompiler::GCC,
///     vec![Artifact { name: "example".into(), path: PathBuf::from("build/lib/example.so") }],
/// );
/// assert_eq!(record.artifacts.len(), 1);
/// assert!(record.last_build <= chrono::Utc::now());
/// ```
#[derive(Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct BuildRecord {
    pub last_build: DateTime<Utc>,
    pub compiler: CppCompiler,
    pub artifacts: Vec<Artifact>,
}

impl BuildRecord {
    pub fn new(compiler: CppCompiler, artifacts: Vec<Artifact>) -> Self {
        Self {
            last_build: Utc::now(),
            compiler,
            artifacts,
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            utils::fs::create_directory(parent)?;
        }
        utils::fs::save_file(path, self).with_context(|| format!("Error saving the build record {path:?}"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        utils::fs::load_and_deserialize(path)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use color_eyre::Result;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_saved_record_is_loaded_back() -> Result<()> {
        let temp = tempdir()?;
        let path = temp.path().join("build").join("nativext").join("build.json");
        let record = BuildRecord::new(
            CppCompiler::CLANG,
            vec![Artifact {
                name: "example".into(),
                path: PathBuf::from("build/lib/example.so"),
            }],
        );

        record.save(&path)?;
        assert_eq!(BuildRecord::load(&path)?, record);

        Ok(())
    }
}
