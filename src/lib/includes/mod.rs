//! Include directory providers.
//!
//! Header-only binding libraries, like `pybind11`, only contribute a directory
//! to the compiler search path. They are modeled as an injected capability, so
//! the assembly of an extension doesn't depend on the interpreter being around

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::ConfigurationError;
use crate::python::run_python;

/// Something able to tell where a set of headers lives
pub trait IncludeDirProvider {
    /// The name by which extensions request this provider
    fn name(&self) -> &str;

    fn include_dirs(&self) -> Result<Vec<PathBuf>, ConfigurationError>;
}

/// Asks an interpreter module for its headers, through its `get_include()` function.
/// This is the convention followed by `pybind11` and `numpy`
#[derive(Debug, Clone)]
pub struct PythonModuleIncludes {
    python: PathBuf,
    module: String,
}

impl PythonModuleIncludes {
    pub fn new(python: &Path, module: impl Into<String>) -> Self {
        Self {
            python: python.to_path_buf(),
            module: module.into(),
        }
    }
}

impl IncludeDirProvider for PythonModuleIncludes {
    fn name(&self) -> &str {
        &self.module
    }

    fn include_dirs(&self) -> Result<Vec<PathBuf>, ConfigurationError> {
        let code = format!("import {0}; print({0}.get_include())", self.module);
        let stdout = run_python(&self.python, &code).map_err(|e| {
            ConfigurationError::IncludeProvider {
                provider: self.module.clone(),
                reason: e.to_string(),
            }
        })?;

        log::debug!("Include provider `{}` resolved to {stdout:?}", self.module);
        Ok(vec![PathBuf::from(stdout)])
    }
}

/// A fixed set of directories
#[derive(Debug, Clone)]
pub struct StaticIncludes {
    name: String,
    dirs: Vec<PathBuf>,
}

impl StaticIncludes {
    pub fn new(name: impl Into<String>, dirs: Vec<PathBuf>) -> Self {
        Self {
            name: name.into(),
            dirs,
        }
    }
}

impl IncludeDirProvider for StaticIncludes {
    fn name(&self) -> &str {
        &self.name
    }

    fn include_dirs(&self) -> Result<Vec<PathBuf>, ConfigurationError> {
        Ok(self.dirs.clone())
    }
}

/// The providers available for a build invocation, by name
#[derive(Default)]
pub struct IncludeProviders {
    providers: IndexMap<String, Box<dyn IncludeDirProvider>>,
}

impl IncludeProviders {
    pub fn new() -> Self {
        Self::default()
    }

    /// The binding libraries known out of the box, queried through `python`
    pub fn with_defaults(python: &Path) -> Self {
        let mut providers = Self::new();
        providers.register(Box::new(PythonModuleIncludes::new(python, "pybind11")));
        providers.register(Box::new(PythonModuleIncludes::new(python, "numpy")));
        providers
    }

    /// Adds a provider, replacing any previous one registered under the same name
    pub fn register(&mut self, provider: Box<dyn IncludeDirProvider>) {
        self.providers.insert(provider.name().to_string(), provider);
    }

    pub fn resolve(&self, target: &str, name: &str) -> Result<Vec<PathBuf>, ConfigurationError> {
        let Some(provider) = self.providers.get(name) else {
            log::debug!("Known include providers: {:?}", self.names().collect::<Vec<_>>());
            return Err(ConfigurationError::UnknownIncludeProvider {
                target: target.to_string(),
                provider: name.to_string(),
            });
        };
        provider.include_dirs()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_provider_replaces_the_default() {
        let mut providers = IncludeProviders::with_defaults(Path::new("python3"));
        providers.register(Box::new(StaticIncludes::new(
            "pybind11",
            vec![PathBuf::from("/opt/pybind11/include")],
        )));

        assert_eq!(providers.names().collect::<Vec<_>>(), vec!["pybind11", "numpy"]);
        assert_eq!(
            providers.resolve("example", "pybind11").unwrap(),
            vec![PathBuf::from("/opt/pybind11/include")]
        );
    }

    #[test]
    fn test_unknown_provider() {
        let providers = IncludeProviders::new();
        assert!(matches!(
            providers.resolve("example", "eigen"),
            Err(ConfigurationError::UnknownIncludeProvider { ref target, ref provider })
                if target == "example" && provider == "eigen"
        ));
    }

    #[test]
    fn test_python_module_provider_failure_names_the_module() {
        let provider = PythonModuleIncludes::new(Path::new("/definitely/not/a/python"), "pybind11");
        assert!(matches!(
            provider.include_dirs(),
            Err(ConfigurationError::IncludeProvider { ref provider, .. }) if provider == "pybind11"
        ));
    }
}
