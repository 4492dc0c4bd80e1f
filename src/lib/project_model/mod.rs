//! The read only data of a build invocation, already validated and owned,
//! mapped from a [`crate::config_file::NativextConfigFile`]
pub mod build;
pub mod compiler;
pub mod extension;
pub mod project;

use serde::Serialize;

use self::{
    build::BuildModel, compiler::CompilerModel, extension::ExtensionTarget, project::ProjectModel,
};

#[derive(Debug, PartialEq, Eq, Serialize)]
pub struct NativextModel {
    pub project: ProjectModel,
    pub compiler: CompilerModel,
    pub build: BuildModel,
    pub extensions: Vec<ExtensionTarget>,
}
