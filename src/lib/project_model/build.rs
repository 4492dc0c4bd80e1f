use std::path::PathBuf;

use serde::Serialize;

use crate::utils::constants::{dir_names, BUILD_RECORD_FILENAME};

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct BuildModel {
    pub output_dir: PathBuf,
    pub python: Option<PathBuf>,
}

impl BuildModel {
    /// Where the object files of every extension are dumped
    pub fn temp_dir(&self) -> PathBuf {
        self.output_dir.join(dir_names::TEMP)
    }

    /// Where the artifacts live when they aren't built in place
    pub fn lib_dir(&self) -> PathBuf {
        self.output_dir.join(dir_names::LIB)
    }

    pub fn record_path(&self) -> PathBuf {
        self.output_dir
            .join(dir_names::NATIVEXT)
            .join(BUILD_RECORD_FILENAME)
    }
}
