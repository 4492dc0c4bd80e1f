//! Queries against the host interpreter that will load the built extensions

use std::path::{Path, PathBuf};
use std::process::Command;

use serde::Serialize;

use crate::error::ConfigurationError;
use crate::utils::constants::{env_vars, DEFAULT_PYTHON};

const HOST_RUNTIME_QUERY: &str = "import sysconfig; \
    print(sysconfig.get_path('include')); \
    print(sysconfig.get_config_var('EXT_SUFFIX'))";

/// What the build needs to know about the interpreter: where its headers live
/// and which filename suffix makes an extension importable by it
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct HostRuntime {
    pub executable: PathBuf,
    pub include_dir: PathBuf,
    pub ext_suffix: String,
}

impl HostRuntime {
    /// Asks `python` about itself. A missing interpreter, or a header directory
    /// that isn't present on the filesystem, is a configuration problem
    pub fn query(python: &Path) -> Result<Self, ConfigurationError> {
        log::debug!("Querying the host runtime through {python:?}");
        let stdout = run_python(python, HOST_RUNTIME_QUERY)?;
        let host = parse_host_runtime(python, &stdout)?;

        if !host.include_dir.is_dir() {
            return Err(ConfigurationError::IncludeProvider {
                provider: "python".to_string(),
                reason: format!(
                    "the interpreter headers directory {:?} does not exist. Are the development headers installed?",
                    host.include_dir
                ),
            });
        }

        Ok(host)
    }
}

fn parse_host_runtime(python: &Path, stdout: &str) -> Result<HostRuntime, ConfigurationError> {
    let mut lines = stdout.lines().map(str::trim).filter(|line| !line.is_empty());
    match (lines.next(), lines.next()) {
        (Some(include_dir), Some(ext_suffix)) if ext_suffix != "None" => Ok(HostRuntime {
            executable: python.to_path_buf(),
            include_dir: PathBuf::from(include_dir),
            ext_suffix: ext_suffix.to_string(),
        }),
        _ => Err(ConfigurationError::IncludeProvider {
            provider: "python".to_string(),
            reason: format!("unexpected answer from {python:?}: {stdout:?}"),
        }),
    }
}

/// Picks the interpreter: the command line wins over the configuration file,
/// which wins over the `PYTHON` environment variable
pub fn resolve_interpreter(
    from_cli: Option<&str>,
    from_cfg: Option<&Path>,
    from_env: Option<String>,
) -> PathBuf {
    from_cli
        .map(PathBuf::from)
        .or_else(|| from_cfg.map(Path::to_path_buf))
        .or_else(|| from_env.filter(|env| !env.is_empty()).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PYTHON))
}

/// Reads the `PYTHON` environment variable
pub fn interpreter_from_env() -> Option<String> {
    std::env::var(env_vars::PYTHON).ok()
}

/// Runs `code` with `python -c` and returns its trimmed standard output
pub(crate) fn run_python(python: &Path, code: &str) -> Result<String, ConfigurationError> {
    let output = Command::new(python)
        .args(["-c", code])
        .output()
        .map_err(|e| ConfigurationError::IncludeProvider {
            provider: "python".to_string(),
            reason: format!("unable to run {python:?}: {e}"),
        })?;

    if !output.status.success() {
        return Err(ConfigurationError::IncludeProvider {
            provider: "python".to_string(),
            reason: format!(
                "{python:?} exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            ),
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpreter_resolution_priority() {
        let cfg = PathBuf::from("/usr/bin/python3.11");

        assert_eq!(
            resolve_interpreter(Some("pypy3"), Some(&cfg), Some("python3.12".into())),
            PathBuf::from("pypy3")
        );
        assert_eq!(
            resolve_interpreter(None, Some(&cfg), Some("python3.12".into())),
            cfg
        );
        assert_eq!(
            resolve_interpreter(None, None, Some("python3.12".into())),
            PathBuf::from("python3.12")
        );
        assert_eq!(
            resolve_interpreter(None, None, Some(String::new())),
            PathBuf::from(DEFAULT_PYTHON)
        );
        assert_eq!(resolve_interpreter(None, None, None), PathBuf::from(DEFAULT_PYTHON));
    }

    #[test]
    fn test_parse_host_runtime_answer() {
        let python = Path::new("python3");
        let host = parse_host_runtime(
            python,
            "/usr/include/python3.11\n.cpython-311-x86_64-linux-gnu.so\n",
        )
        .expect("A well formed answer must be parsed");

        assert_eq!(host.include_dir, PathBuf::from("/usr/include/python3.11"));
        assert_eq!(host.ext_suffix, ".cpython-311-x86_64-linux-gnu.so");
        assert_eq!(host.executable, PathBuf::from("python3"));
    }

    #[test]
    fn test_parse_host_runtime_without_suffix() {
        let result = parse_host_runtime(Path::new("python3"), "/usr/include/python3.11\nNone\n");
        assert!(matches!(
            result,
            Err(ConfigurationError::IncludeProvider { ref provider, .. }) if provider == "python"
        ));
    }

    #[test]
    fn test_missing_interpreter_is_a_configuration_error() {
        let result = run_python(Path::new("/definitely/not/a/python"), "print(1)");
        assert!(matches!(result, Err(ConfigurationError::IncludeProvider { .. })));
    }
}
