//! The command lines generated for an extension, kept apart from their execution

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::cli::output::arguments::{Argument, Arguments};

/// Type for representing the command line that compiles (but doesn't link) one
/// translation unit of an extension
///
/// * `directory`: the path where the translation unit lives
/// * `filename`: the translation unit name on the fs, with its extension
/// * `args`: every argument passed to the compiler driver
/// * `byproduct`: where the object file will be dumped
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SourceCommandLine {
    pub directory: PathBuf,
    pub filename: String,
    pub args: Arguments,
    pub byproduct: PathBuf,
}

impl SourceCommandLine {
    pub fn path(&self) -> PathBuf {
        self.directory.join(Path::new(&self.filename))
    }
}

/// The final step, that takes every object file of an extension and produces
/// the shared library that the runtime loads
#[derive(Debug, Default, Clone, Serialize, PartialEq, Eq)]
pub struct LinkerCommandLine {
    pub args: Arguments,
    pub target: PathBuf,
}

/// Every command line of a single extension, in execution order
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExtensionCommands {
    pub driver: Argument,
    pub sources: Vec<SourceCommandLine>,
    pub linker: LinkerCommandLine,
}

impl ExtensionCommands {
    /// The directories that must exist before running the commands
    pub fn output_dirs(&self) -> impl Iterator<Item = &Path> {
        self.sources
            .iter()
            .filter_map(|scl| scl.byproduct.parent())
            .chain(self.linker.target.parent())
    }
}
