pub mod resources;

use crate::error::ConfigurationError;
use crate::project_model::compiler::CppCompiler;
use crate::project_model::extension::ModuleName;
use crate::utils;
use color_eyre::eyre::{bail, Context};
use color_eyre::{Report, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Generates a new extension project, ready to be built with `nativext`.
///
/// Base template for the project files:
///    - ./<project_name>.cpp
///         a `pybind11` module named after the project, exposing `add`,
///         `multiply`, `greet` and `sum_list`
///    - ./nativext.toml
///         the configuration file that declares the extension above
///
/// The project name becomes the module name of the extension, so it must be a
/// plain identifier. Returns the root of the new project
pub fn create_templated_project(
    base_path: &Path,
    project_name: &str,
    git: bool,
    compiler: CppCompiler,
) -> std::result::Result<PathBuf, Report> {
    let module = ModuleName::parse(project_name)?;
    if module.module() != module.as_str() {
        return Err(ConfigurationError::InvalidModuleName {
            name: project_name.to_string(),
        })
        .with_context(|| "The name of a new project can't be a dotted path");
    }

    let project_root = base_path.join(project_name);
    check_project_root_available(&project_root)?;
    utils::fs::create_directory(&project_root)?;

    utils::fs::create_file(
        &project_root,
        &format!("{project_name}.cpp"),
        resources::EXTENSION_SOURCE
            .replace("<module_name>", project_name)
            .as_bytes(),
    )?;

    let std_flag = if compiler.is_msvc() {
        "/std:c++14"
    } else {
        "-std=c++11"
    };
    let config = resources::CONFIG_FILE
        .replace("<project_name>", project_name)
        .replace("<compiler>", compiler.as_ref())
        .replace("<std_flag>", std_flag);

    utils::fs::create_file(
        &project_root,
        &format!(
            "{}.{}",
            utils::constants::CONFIG_FILE_NAME,
            utils::constants::CONFIG_FILE_EXT
        ),
        config.as_bytes(),
    )?;

    if git {
        initialize_git_repository(&project_root)?
    }

    log::info!("Created the `{project_name}` extension project at {project_root:?}");
    Ok(project_root)
}

fn check_project_root_available(project_root: &Path) -> Result<()> {
    if !project_root.exists() {
        // if it doesn't exist, there is nothing that would be overwritten
        return Ok(());
    }

    if !is_empty_directory(project_root)? {
        bail!("Directory {project_root:?} is not empty")
    }

    Ok(())
}

fn is_empty_directory(path: &Path) -> Result<bool> {
    if !path.is_dir() {
        return Ok(false);
    }

    let is_empty = path
        .read_dir()
        .with_context(|| format!("Directory {path:?} is not readable"))?
        .next()
        .is_none();

    Ok(is_empty)
}

fn initialize_git_repository(project_root: &Path) -> Result<()> {
    let exit_status = Command::new("git")
        .current_dir(project_root)
        .arg("init")
        .spawn()
        .with_context(|| "Could not run \"git init\"")?
        .wait()
        .with_context(|| "An error occurred while waiting for \"git init\" to finish")?;

    match exit_status.code() {
        Some(0) => {}
        None => bail!("Process \"git init\" was terminated by external signal"),
        Some(error_code) => bail!("Process \"git init\" returned {}", error_code),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use color_eyre::Result;
    use tempfile::tempdir;

    use super::*;
    use crate::config_file;

    #[test]
    fn test_create_if_root_not_empty() -> Result<()> {
        let temp = tempdir()?;

        const PROJECT_NAME: &str = "example";

        let project_path = temp.path().join(PROJECT_NAME);
        let dummy_path = project_path.join("dummy.txt");

        std::fs::create_dir(project_path)?;
        std::fs::File::create(dummy_path)?;

        let result = create_templated_project(temp.path(), PROJECT_NAME, false, CppCompiler::CLANG);
        assert!(
            result.is_err(),
            "The project was created, even though the project root is not empty"
        );

        Ok(())
    }

    #[test]
    fn test_generated_config_file_declares_the_extension() -> Result<()> {
        let temp = tempdir()?;

        let root = create_templated_project(temp.path(), "example", false, CppCompiler::GCC)?;
        let source = std::fs::read_to_string(root.join("example.cpp"))?;
        assert!(source.contains("PYBIND11_MODULE(example, m)"));
        assert!(source.contains("double sum_list(const std::vector<double>& numbers)"));

        let raw_cfg = std::fs::read_to_string(root.join("nativext.toml"))?;
        let config = config_file::nativext_cfg_from_file(&raw_cfg)?;
        assert_eq!(config.project.name, "example");
        assert_eq!(config.compiler.cpp_compiler, config_file::compiler::CppCompiler::GCC);

        let extension = config
            .extensions
            .get("example")
            .expect("The template must declare the `example` extension");
        assert_eq!(extension.sources, vec!["example.cpp"]);
        assert_eq!(extension.include_providers, Some(vec!["pybind11"]));
        assert_eq!(extension.extra_compile_args, Some(vec!["-std=c++11"]));
        assert_eq!(extension.language, Some("c++"));

        Ok(())
    }

    #[test]
    fn test_project_names_must_be_identifiers() -> Result<()> {
        let temp = tempdir()?;

        assert!(create_templated_project(temp.path(), "1example", false, CppCompiler::GCC).is_err());
        assert!(create_templated_project(temp.path(), "pkg.example", false, CppCompiler::GCC).is_err());
        assert!(!temp.path().join("pkg.example").exists());

        Ok(())
    }
}
