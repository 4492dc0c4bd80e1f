use std::path::PathBuf;

use serde::Serialize;

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ProjectModel {
    pub name: String,
    pub compilation_db: bool,
    /// The directory where the configuration file lives. Every relative
    /// path of the configuration is resolved against it
    pub project_root: PathBuf,
}
