use crate::cli::input::CliArgs;
use crate::cli::output::arguments::Argument;
use crate::config_file::{
    build::BuildAttribute, compiler::CompilerAttribute, project::ProjectAttribute,
    NativextConfigFile,
};
use crate::error::ConfigurationError;
use crate::includes::IncludeProviders;
use crate::project_model::{
    build::BuildModel, compiler::CompilerModel, extension::ExtensionTarget,
    project::ProjectModel, NativextModel,
};
use crate::utils::constants::{dir_names, error_messages, CONFIG_FILE_EXT, CONFIG_FILE_NAME};
use color_eyre::eyre::{eyre, Context};
use color_eyre::Result;
use indexmap::IndexSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Details about a found configuration file on the project
///
/// This is just a configuration file with a valid name found
/// at a valid path in some subdirectory
#[derive(Debug)]
pub struct ConfigFile {
    pub path: PathBuf,
}

impl ConfigFile {
    /// The directory that holds the configuration file, against which its
    /// relative paths are resolved
    pub fn project_root(&self) -> &Path {
        self.path.parent().unwrap_or(Path::new("."))
    }
}

/// Checks for the existence of the `nativext_<any>.toml` configuration files
/// present in the base path, or up to two levels below it, and returns a
/// collection of the ones found, sorted by path.
///
/// *filename_match* - When present, only the files whose name contains it
/// are considered
///
/// This function fails if there's no configuration file
/// (or isn't present in any directory of the project)
pub fn find_config_files(
    base_path: &Path,
    filename_match: &Option<String>,
) -> Result<Vec<ConfigFile>> {
    log::debug!("Searching for nativext configuration files...");
    let mut files = vec![];

    for e in WalkDir::new(base_path)
        .max_depth(2)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let Some(filename) = e.file_name().to_str() else {
            continue;
        };
        let file_match = filename_match.as_deref().unwrap_or(filename);
        if filename.starts_with(CONFIG_FILE_NAME)
            && filename.ends_with(&format!(".{CONFIG_FILE_EXT}"))
            && filename.contains(file_match)
        {
            files.push(ConfigFile {
                path: e.path().to_path_buf(),
            })
        }
    }

    if files.is_empty() {
        Err(eyre!("No configuration files found for the project"))
    } else {
        Ok(files)
    }
}

/// Maps a [`NativextConfigFile`] into the [`NativextModel`]. Every selected extension is
/// assembled here, so any [`ConfigurationError`] is reported before a single
/// command is spawned
pub fn build_model(
    config: NativextConfigFile<'_>,
    cli_args: &CliArgs,
    project_root: &Path,
    providers: &IncludeProviders,
) -> Result<NativextModel> {
    let project = assemble_project_model(config.project, project_root);
    let compiler = assemble_compiler_model(config.compiler, cli_args);
    let build = assemble_build_model(config.build, project_root);

    let descriptors = config
        .extensions
        .iter()
        .map(|(key, attribute)| (*key, attribute.to_descriptor(key)))
        .collect::<Vec<_>>();

    // Names are unique among every declared extension, filtered out or not
    let mut names: IndexSet<&str> = IndexSet::with_capacity(descriptors.len());
    for (_, descriptor) in &descriptors {
        if !names.insert(descriptor.name.as_str()) {
            return Err(ConfigurationError::DuplicateTarget {
                name: descriptor.name.clone(),
            })
            .with_context(|| error_messages::INVALID_EXTENSION);
        }
    }

    let mut extensions = Vec::with_capacity(descriptors.len());
    for (key, descriptor) in descriptors.iter().cloned() {
        if !is_selected(cli_args, key, &descriptor.name) {
            log::debug!("Extension `{}` is disabled from the CLI", descriptor.name);
            continue;
        }

        let name = descriptor.name.clone();
        let target = ExtensionTarget::assemble(descriptor, project_root, providers)
            .with_context(|| format!("{}: `{name}`", error_messages::INVALID_EXTENSION))?;
        extensions.push(target);
    }

    if let Some(selected) = cli_args.extensions.as_ref() {
        selected
            .iter()
            .filter(|requested| {
                !names.contains(requested.as_str())
                    && !descriptors.iter().any(|(key, _)| *key == requested.as_str())
            })
            .for_each(|requested| {
                log::warn!("The extension `{requested}` requested from the CLI isn't declared")
            });
    }

    Ok(NativextModel {
        project,
        compiler,
        build,
        extensions,
    })
}

/// An extension is selected when there's no filter, or when the filter names
/// either its table key or its module name
fn is_selected(cli_args: &CliArgs, key: &str, name: &str) -> bool {
    cli_args
        .extensions
        .as_ref()
        .map_or(true, |selected| selected.iter().any(|s| s == key || s == name))
}

fn assemble_project_model(config: ProjectAttribute, project_root: &Path) -> ProjectModel {
    ProjectModel {
        name: config.name.to_string(),
        compilation_db: config.compilation_db.unwrap_or_default(),
        project_root: project_root.to_path_buf(),
    }
}

fn assemble_compiler_model(config: CompilerAttribute, cli_args: &CliArgs) -> CompilerModel {
    let extra_args = config
        .extra_args
        .map(|args| args.into_iter().map(Argument::from).collect())
        .unwrap_or_default();

    CompilerModel {
        cpp_compiler: config.cpp_compiler.into(),
        driver_path: cli_args
            .driver_path
            .as_deref()
            .or(config.driver_path)
            .map(PathBuf::from),
        extra_args,
    }
}

fn assemble_build_model(config: Option<BuildAttribute>, project_root: &Path) -> BuildModel {
    let output_dir = config
        .as_ref()
        .and_then(|build| build.output_dir)
        .map(|out_dir| out_dir.strip_prefix("./").unwrap_or(out_dir))
        .unwrap_or(dir_names::DEFAULT_OUTPUT_DIR);

    BuildModel {
        output_dir: project_root.join(output_dir),
        python: config.and_then(|build| build.python).map(PathBuf::from),
    }
}
