extern crate core;

pub mod cli;
pub mod compiler;
pub mod config_file;
pub mod error;
pub mod includes;
pub mod project_model;
pub mod python;
pub mod utils;

/// The entry point for the execution of the program.
///
/// This module existence is motivated to let us run
/// integration tests for the whole operations of the program
/// without having to do fancy work about checking the
/// data sent to stdout/stderr
pub mod worker {
    use std::{fs, path::Path, path::PathBuf, time::Instant};

    use crate::compiler::compile_commands::map_generated_commands_to_compilation_db;
    use crate::compiler::record::BuildRecord;
    use crate::compiler::{self, Artifact, BuildContext, BuildDriver, CompilerDriver};
    use crate::config_file::{self, NativextConfigFile};
    use crate::error::{ConfigurationError, ExtensionError};
    use crate::includes::IncludeProviders;
    use crate::project_model::extension::{ExtensionDescriptor, ExtensionTarget};
    use crate::project_model::NativextModel;
    use crate::python::{self, HostRuntime};
    use crate::utils::constants::error_messages;
    use crate::{
        cli::input::{CliArgs, Command},
        utils::{
            self,
            reader::{find_config_files, ConfigFile},
            template::create_templated_project,
        },
    };
    use color_eyre::{eyre::Context, Report, Result};
    use indexmap::IndexSet;

    /// The main work of the project. Runs the tasks
    /// inputted in the CLI
    pub fn run_nativext(cli_args: &CliArgs, path: &Path) -> std::result::Result<(), Report> {
        let abs_project_root = determine_absolute_path_of_the_project_root(cli_args, path)?;

        // If this run is just for create a new extension project by template, create it and exit
        if it_is_template_creation_then_create(cli_args, &abs_project_root)? {
            return Ok(());
        };

        let config_files: Vec<ConfigFile> =
            find_config_files(&abs_project_root, &cli_args.match_files)?;

        // Every configuration file is mapped and validated before anything is built
        let mut loaded: Vec<(PathBuf, NativextModel, PathBuf)> =
            Vec::with_capacity(config_files.len());
        for config_file in config_files {
            let cfg_path = &config_file.path;
            log::debug!(
                "Loading the nativext configuration file: {:?}",
                cfg_path,
            );
            let raw_file = fs::read_to_string(cfg_path)
                .with_context(|| format!("{}: {:?}", error_messages::READ_CFG_FILE, cfg_path))?;

            let config: NativextConfigFile<'_> = config_file::nativext_cfg_from_file(&raw_file)
                .with_context(|| format!("{}: {:?}", error_messages::PARSE_CFG_FILE, cfg_path))?;

            let interpreter = python::resolve_interpreter(
                cli_args.python.as_deref(),
                config
                    .build
                    .as_ref()
                    .and_then(|build| build.python)
                    .map(Path::new),
                python::interpreter_from_env(),
            );
            let providers = IncludeProviders::with_defaults(&interpreter);

            let program_data: NativextModel = utils::reader::build_model(
                config,
                cli_args,
                config_file.project_root(),
                &providers,
            )
            .with_context(|| {
                format!("{}: {:?}", error_messages::PROJECT_MODEL_MAPPING, cfg_path)
            })?;

            loaded.push((config_file.path, program_data, interpreter));
        }

        ensure_unique_artifacts(cli_args, loaded.iter().map(|(_, model, _)| model))
            .with_context(|| error_messages::INVALID_EXTENSION)?;

        for (cfg_path, program_data, interpreter) in &loaded {
            log::debug!(
                "Launching a nativext work event for the configuration file: {:?}",
                cfg_path,
            );
            perform_main_work(cli_args, program_data, interpreter).with_context(|| {
                format!(
                    "{}: {:?}",
                    error_messages::FAILED_BUILD_FOR_CFG_FILE,
                    cfg_path
                )
            })?;
        }

        Ok(())
    }

    /// Validates a single extension description and hands it to the given [`BuildDriver`].
    ///
    /// Any [`ConfigurationError`](crate::error::ConfigurationError) is raised before the
    /// driver is invoked, so an invalid description never produces output
    ///
    /// ```rust,no_run
    /// use std::path::Path;
    /// use nativext::compiler::{BuildContext, CompilerDriver};
    /// use nativext::includes::IncludeProviders;
    /// use nativext::project_model::compiler::{CompilerModel, CppCompiler};
    /// use nativext::project_model::extension::ExtensionDescriptor;
    /// use nativext::python::HostRuntime;
    /// use nativext::worker::describe_and_build;
    ///
    /// let python = Path::new("python3");
    /// let host = HostRuntime::query(python).unwrap();
    /// let compiler = CompilerModel { cpp_compiler: CppCompiler::GCC, ..Default::default() };
    /// let ctx = BuildContext {
    ///     compiler: &compiler,
    ///     host: &host,
    ///     temp_dir: "build/temp".into(),
    ///     artifact_dir: "build/lib".into(),
    /// };
    ///
    /// let descriptor = ExtensionDescriptor::new("example")
    ///     .source("example.cpp")
    ///     .include_provider("pybind11")
    ///     .flag("-std=c++11")
    ///     .language("c++");
    ///
    /// let artifact = describe_and_build(
    ///     descriptor,
    ///     Path::new("."),
    ///     &IncludeProviders::with_defaults(python),
    ///     &CompilerDriver,
    ///     &ctx,
    /// ).unwrap();
    /// assert_eq!(artifact.name, "example");
    /// ```
    pub fn describe_and_build(
        descriptor: ExtensionDescriptor,
        project_root: &Path,
        providers: &IncludeProviders,
        driver: &dyn BuildDriver,
        ctx: &BuildContext<'_>,
    ) -> std::result::Result<Artifact, ExtensionError> {
        let target = ExtensionTarget::assemble(descriptor, project_root, providers)?;
        Ok(driver.build(&target, ctx)?)
    }

    /// Two extensions of the same invocation can't share a module name when their
    /// artifacts land under the same directory, even if they come from different
    /// configuration files
    fn ensure_unique_artifacts<'a>(
        cli_args: &CliArgs,
        models: impl Iterator<Item = &'a NativextModel>,
    ) -> std::result::Result<(), ConfigurationError> {
        let inplace = matches!(cli_args.command, Command::Build { inplace: true });
        let mut declared: IndexSet<(&Path, &str)> = IndexSet::new();

        for model in models {
            let artifacts_root = if inplace {
                model.project.project_root.as_path()
            } else {
                model.build.output_dir.as_path()
            };
            for target in &model.extensions {
                if !declared.insert((artifacts_root, target.name().as_str())) {
                    return Err(ConfigurationError::DuplicateTarget {
                        name: target.name().to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    /// Inspects the [`CliArgs`] main passed argument, and if it's [`Command::New`] just creates a
    /// new extension project at the *abs_project_root* and exits
    fn it_is_template_creation_then_create(
        cli_args: &CliArgs,
        abs_project_root: &Path,
    ) -> Result<bool> {
        if let Command::New {
            ref name,
            git,
            compiler,
        } = cli_args.command
        {
            create_templated_project(abs_project_root, name, git, compiler.into())?;
            return Ok(true);
        };
        Ok(false)
    }

    fn perform_main_work(
        cli_args: &CliArgs,
        program_data: &NativextModel,
        interpreter: &Path,
    ) -> Result<()> {
        match cli_args.command {
            Command::Describe => describe(program_data),
            Command::Build { inplace } => {
                build_extensions(program_data, interpreter, inplace, &CompilerDriver).map(|_| ())
            }
            // Already handled before any configuration file is read
            Command::New { .. } => Ok(()),
        }
    }

    /// Prints the validated model as JSON. The toolchain is never invoked
    fn describe(program_data: &NativextModel) -> Result<()> {
        let json = serde_json::to_string_pretty(program_data)
            .with_context(|| error_messages::FAILURE_SERIALIZING_MODEL)?;
        println!("{json}");
        Ok(())
    }

    /// Builds every extension of the model, one after another. The first failure
    /// stops the whole build
    pub fn build_extensions(
        program_data: &NativextModel,
        interpreter: &Path,
        inplace: bool,
        driver: &dyn BuildDriver,
    ) -> Result<Vec<Artifact>> {
        if program_data.extensions.is_empty() {
            log::warn!(
                "There's no extension to build for the project `{}`",
                program_data.project.name
            );
            return Ok(vec![]);
        }

        let host = HostRuntime::query(interpreter)
            .with_context(|| error_messages::FAILURE_QUERYING_HOST_RUNTIME)?;
        log::debug!(
            "Building against {:?} with the extension suffix `{}`",
            host.include_dir,
            host.ext_suffix
        );
        let ctx = BuildContext::new(program_data, &host, inplace);

        if program_data.project.compilation_db {
            let generated_commands = program_data
                .extensions
                .iter()
                .map(|target| compiler::generate_commands(target, &ctx))
                .collect::<Vec<_>>();
            let db_path = map_generated_commands_to_compilation_db(
                &program_data.project.project_root,
                &generated_commands,
            )?;
            log::debug!("Compilation database generated at {db_path:?}");
        }

        let build_ts = Instant::now();
        let artifacts = program_data
            .extensions
            .iter()
            .map(|target| {
                driver.build(target, &ctx).with_context(|| {
                    format!("{}: `{}`", error_messages::FAILED_EXTENSION_BUILD, target.name())
                })
            })
            .collect::<Result<Vec<Artifact>>>()?;

        log::info!(
            "[{}] - Built {} extension(s) in {:?} ms",
            program_data.compiler.cpp_compiler,
            artifacts.len(),
            build_ts.elapsed().as_millis()
        );
        for artifact in &artifacts {
            log::info!("Generated {:?}", artifact.path);
        }

        BuildRecord::new(program_data.compiler.cpp_compiler, artifacts.clone())
            .save(&program_data.build.record_path())?;

        Ok(artifacts)
    }

    /// Resolves the full path of the location of the project's root on the fs. If the `--root`
    /// [`CliArgs`] arg is present, it will be used as the project root path, otherwise, the
    /// given *path* is taken as the project root
    fn determine_absolute_path_of_the_project_root(
        cli_args: &CliArgs,
        path: &Path,
    ) -> Result<PathBuf> {
        let project_root = cli_args.root.as_deref().map(Path::new).unwrap_or(path);

        utils::fs::get_project_root_absolute_path(project_root)
            .with_context(|| error_messages::FAILURE_GATHERING_PROJECT_ROOT_ABS_PATH)
    }

    #[cfg(test)]
    mod tests {
        use std::cell::RefCell;

        use color_eyre::Result;
        use tempfile::tempdir;

        use super::*;
        use crate::error::{ConfigurationError, ToolchainError};
        use crate::includes::StaticIncludes;
        use crate::project_model::compiler::{CompilerModel, CppCompiler};

        /// Never spawns anything, just remembers the targets it has been handed
        #[derive(Default)]
        struct RecordingDriver {
            built: RefCell<Vec<ExtensionTarget>>,
        }

        impl BuildDriver for RecordingDriver {
            fn build(
                &self,
                target: &ExtensionTarget,
                ctx: &BuildContext<'_>,
            ) -> std::result::Result<Artifact, ToolchainError> {
                self.built.borrow_mut().push(target.clone());
                Ok(Artifact {
                    name: target.name().to_string(),
                    path: ctx.artifact_path(target),
                })
            }
        }

        fn host(root: &Path) -> HostRuntime {
            HostRuntime {
                executable: PathBuf::from("python3"),
                include_dir: root.join("python").join("include"),
                ext_suffix: String::from(".cpython-312-x86_64-linux-gnu.so"),
            }
        }

        fn example_descriptor() -> ExtensionDescriptor {
            ExtensionDescriptor::new("example")
                .source("example.cpp")
                .include_provider("pybind11")
                .flag("-std=c++11")
                .language("c++")
        }

        fn pybind11(root: &Path) -> IncludeProviders {
            let mut providers = IncludeProviders::new();
            providers.register(Box::new(StaticIncludes::new(
                "pybind11",
                vec![root.join("pybind11").join("include")],
            )));
            providers
        }

        #[test]
        fn test_describe_and_build_the_example() -> Result<()> {
            let temp = tempdir()?;
            let root = temp.path();
            fs::write(root.join("example.cpp"), "")?;
            fs::create_dir_all(root.join("pybind11").join("include"))?;

            let compiler = CompilerModel {
                cpp_compiler: CppCompiler::GCC,
                ..Default::default()
            };
            let host = host(root);
            let ctx = BuildContext {
                compiler: &compiler,
                host: &host,
                temp_dir: root.join("build").join("temp"),
                artifact_dir: root.join("build").join("lib"),
            };
            let driver = RecordingDriver::default();

            let artifact =
                describe_and_build(example_descriptor(), root, &pybind11(root), &driver, &ctx)?;

            assert_eq!(artifact.name, "example");
            assert_eq!(
                artifact.path,
                root.join("build")
                    .join("lib")
                    .join("example.cpython-312-x86_64-linux-gnu.so")
            );

            let built = driver.built.borrow();
            assert_eq!(built.len(), 1);
            assert_eq!(built[0].sources(), &[root.join("example.cpp")]);
            assert_eq!(built[0].extra_flags()[0].as_str(), "-std=c++11");

            Ok(())
        }

        #[test]
        fn test_missing_include_dir_never_reaches_the_driver() -> Result<()> {
            let temp = tempdir()?;
            let root = temp.path();
            fs::write(root.join("example.cpp"), "")?;

            let compiler = CompilerModel::default();
            let host = host(root);
            let ctx = BuildContext {
                compiler: &compiler,
                host: &host,
                temp_dir: root.join("build").join("temp"),
                artifact_dir: root.join("build").join("lib"),
            };
            let driver = RecordingDriver::default();

            let result =
                describe_and_build(example_descriptor(), root, &pybind11(root), &driver, &ctx);

            assert!(matches!(
                result,
                Err(ExtensionError::Configuration(
                    ConfigurationError::MissingIncludeDir { .. }
                ))
            ));
            assert!(driver.built.borrow().is_empty());
            assert!(!root.join("build").exists());

            Ok(())
        }

        #[test]
        fn test_empty_sources_never_reach_the_driver() -> Result<()> {
            let temp = tempdir()?;
            let root = temp.path();

            let compiler = CompilerModel::default();
            let host = host(root);
            let ctx = BuildContext {
                compiler: &compiler,
                host: &host,
                temp_dir: root.join("temp"),
                artifact_dir: root.join("lib"),
            };
            let driver = RecordingDriver::default();

            let result = describe_and_build(
                ExtensionDescriptor::new("example").language("c++"),
                root,
                &IncludeProviders::new(),
                &driver,
                &ctx,
            );

            assert!(matches!(
                result,
                Err(ExtensionError::Configuration(
                    ConfigurationError::EmptySources { .. }
                ))
            ));
            assert!(driver.built.borrow().is_empty());

            Ok(())
        }

        #[test]
        fn test_models_without_extensions_build_nothing() -> Result<()> {
            let temp = tempdir()?;
            let program_data = utils::reader::build_model(
                config_file::nativext_cfg_from_file("[project]\nname = 'empty'")?,
                &CliArgs::default(),
                temp.path(),
                &IncludeProviders::new(),
            )?;

            let artifacts = build_extensions(
                &program_data,
                Path::new("python-that-does-not-exist"),
                false,
                &RecordingDriver::default(),
            )?;

            assert!(artifacts.is_empty());
            assert!(!program_data.build.record_path().exists());

            Ok(())
        }
    }
}
