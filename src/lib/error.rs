//! The kinds of failure that can abort a build invocation.
//!
//! Neither of them is recovered locally. Callers attach context with
//! [`color_eyre::eyre::WrapErr`] and the report travels up to `main`.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

use crate::project_model::compiler::CppCompiler;

/// Problems in the static description of an extension. They are always detected
/// while assembling the [`ExtensionTarget`](crate::project_model::extension::ExtensionTarget),
/// so the toolchain is never invoked and nothing is written to the filesystem
#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("Extension `{target}` does not declare any source file")]
    EmptySources { target: String },

    #[error("Source file {path:?} of extension `{target}` does not exist")]
    MissingSource { target: String, path: PathBuf },

    #[error("Include directory {path:?} of extension `{target}` does not exist")]
    MissingIncludeDir { target: String, path: PathBuf },

    #[error("Language `{language}` of extension `{target}` is not supported. Expected one of: c, c++")]
    UnsupportedLanguage { target: String, language: String },

    #[error("Unable to infer the language of extension `{target}` from its source files")]
    UndeterminedLanguage { target: String },

    #[error("`{name}` is not a valid module name")]
    InvalidModuleName { name: String },

    #[error("Extension `{name}` is declared more than once")]
    DuplicateTarget { name: String },

    #[error("Extension `{target}` requests the unknown include provider `{provider}`")]
    UnknownIncludeProvider { target: String, provider: String },

    #[error("Include provider `{provider}` failed: {reason}")]
    IncludeProvider { provider: String, reason: String },

    #[error("Invalid source pattern `{pattern}`: {reason}")]
    InvalidSourcePattern { pattern: String, reason: String },
}

/// Failures reported while running the compiler toolchain
#[derive(Debug, Error)]
pub enum ToolchainError {
    #[error("[{compiler}] - Unable to launch the compiler driver `{driver}`")]
    Spawn {
        compiler: CppCompiler,
        driver: String,
        #[source]
        source: std::io::Error,
    },

    #[error("[{compiler}] - Building extension `{target}` failed on `{step}` ({status})")]
    CommandFailed {
        compiler: CppCompiler,
        target: String,
        step: String,
        status: ExitStatus,
    },

    #[error("Unable to prepare the output location {path:?}")]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Any of the failures of [`describe_and_build`](crate::worker::describe_and_build)
#[derive(Debug, Error)]
pub enum ExtensionError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Toolchain(#[from] ToolchainError),
}
