//! The build driver of `nativext`.
//!
//! Turns a validated [`ExtensionTarget`] into the command lines of the chosen
//! compiler, one per translation unit plus the final link, and runs them
//! against the driver executable of the current operating system
pub mod commands;
pub mod compile_commands;
pub mod record;

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use self::commands::{ExtensionCommands, LinkerCommandLine, SourceCommandLine};
use crate::cli::output::arguments::{Argument, Arguments};
use crate::cli::output::executors;
use crate::error::ToolchainError;
use crate::project_model::compiler::{CompilerModel, CppCompiler};
use crate::project_model::extension::ExtensionTarget;
use crate::project_model::NativextModel;
use crate::python::HostRuntime;

/// Everything a [`BuildDriver`] needs besides the target itself
#[derive(Debug, Clone)]
pub struct BuildContext<'a> {
    pub compiler: &'a CompilerModel,
    pub host: &'a HostRuntime,
    /// Root of the object files, one subdirectory per extension
    pub temp_dir: PathBuf,
    /// Root of the artifacts, where package components become subdirectories
    pub artifact_dir: PathBuf,
}

impl<'a> BuildContext<'a> {
    /// With `inplace`, the artifacts are dumped at the project root, next to the
    /// sources, instead of under the output directory
    pub fn new(model: &'a NativextModel, host: &'a HostRuntime, inplace: bool) -> Self {
        Self {
            compiler: &model.compiler,
            host,
            temp_dir: model.build.temp_dir(),
            artifact_dir: if inplace {
                model.project.project_root.clone()
            } else {
                model.build.lib_dir()
            },
        }
    }

    pub fn artifact_path(&self, target: &ExtensionTarget) -> PathBuf {
        self.artifact_dir
            .join(target.name().artifact_path(&self.host.ext_suffix))
    }
}

/// A loadable module produced by a build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Artifact {
    pub name: String,
    pub path: PathBuf,
}

/// The entity that turns extension targets into compiled artifacts
pub trait BuildDriver {
    fn build(
        &self,
        target: &ExtensionTarget,
        ctx: &BuildContext<'_>,
    ) -> Result<Artifact, ToolchainError>;
}

/// The [`BuildDriver`] that spawns the compiler toolchain
#[derive(Debug, Default, Clone, Copy)]
pub struct CompilerDriver;

impl BuildDriver for CompilerDriver {
    fn build(
        &self,
        target: &ExtensionTarget,
        ctx: &BuildContext<'_>,
    ) -> Result<Artifact, ToolchainError> {
        let commands = generate_commands(target, ctx);

        for dir in commands.output_dirs() {
            std::fs::create_dir_all(dir).map_err(|source| ToolchainError::Output {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        executors::run_extension_commands(
            ctx.compiler.cpp_compiler,
            target.name().as_str(),
            &commands,
        )?;

        Ok(Artifact {
            name: target.name().to_string(),
            path: commands.linker.target,
        })
    }
}

/// Generates every command line of `target`. The output only depends on its inputs,
/// so an unchanged target always yields the same commands
pub fn generate_commands(target: &ExtensionTarget, ctx: &BuildContext<'_>) -> ExtensionCommands {
    let compiler = ctx.compiler.cpp_compiler;
    let objects_dir = ctx.temp_dir.join(target.name().as_str());
    let mut object_names: HashSet<String> = HashSet::with_capacity(target.sources().len());

    let sources = target
        .sources()
        .iter()
        .map(|source| {
            let object = helpers::unique_object_name(source, compiler, &mut object_names);
            let byproduct = objects_dir.join(object);
            SourceCommandLine {
                directory: source.parent().map(Path::to_path_buf).unwrap_or_default(),
                filename: source
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                args: helpers::compile_args(ctx, target, source, &byproduct),
                byproduct,
            }
        })
        .collect::<Vec<SourceCommandLine>>();

    let artifact = ctx.artifact_path(target);
    let objects = sources.iter().map(|scl| scl.byproduct.as_path());
    let linker = LinkerCommandLine {
        args: helpers::link_args(ctx, target, objects, &artifact),
        target: artifact,
    };

    ExtensionCommands {
        driver: Argument::from(ctx.compiler.driver(target.language()).into_owned()),
        sources,
        linker,
    }
}

mod helpers {
    use super::*;
    use crate::project_model::extension::Language;

    /// Two sources with the same file stem in different directories would overwrite
    /// each other's object file, so the later ones get a numeric suffix
    pub(crate) fn unique_object_name(
        source: &Path,
        compiler: CppCompiler,
        used: &mut HashSet<String>,
    ) -> String {
        let stem = source
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let extension = compiler.get_obj_file_extension();

        let mut candidate = format!("{stem}.{extension}");
        let mut counter = 1;
        while !used.insert(candidate.clone()) {
            candidate = format!("{stem}-{counter}.{extension}");
            counter += 1;
        }
        candidate
    }

    pub(crate) fn compile_args(
        ctx: &BuildContext<'_>,
        target: &ExtensionTarget,
        source: &Path,
        byproduct: &Path,
    ) -> Arguments {
        let compiler = ctx.compiler.cpp_compiler;
        let include_dirs = std::iter::once(&ctx.host.include_dir).chain(target.include_dirs());
        let mut args = Arguments::with_capacity(8 + target.extra_flags().len());

        match compiler {
            CppCompiler::CLANG | CppCompiler::GCC => {
                args.create_and_push("-c");
                if cfg!(not(target_os = "windows")) {
                    args.create_and_push("-fPIC");
                }
                args.extend(include_dirs.map(|dir| Argument::from(format!("-I{}", dir.display()))));
                args.extend_from_slice(&ctx.compiler.extra_args);
                args.create_and_push(source);
                args.create_and_push("-o");
                args.create_and_push(byproduct);
            }
            CppCompiler::MSVC => {
                args.create_and_push("/nologo");
                args.create_and_push("/c");
                match target.language() {
                    Language::Cpp => {
                        args.create_and_push("/EHsc");
                        args.create_and_push("/TP");
                    }
                    Language::C => args.create_and_push("/TC"),
                }
                args.extend(include_dirs.map(|dir| Argument::from(format!("/I{}", dir.display()))));
                args.extend_from_slice(&ctx.compiler.extra_args);
                args.create_and_push(source);
                args.create_and_push(format!("/Fo{}", byproduct.display()));
            }
        }

        // The user flags go last, so they are able to override anything above
        args.extend_from_slice(target.extra_flags());
        args
    }

    pub(crate) fn link_args<'a>(
        ctx: &BuildContext<'_>,
        target: &ExtensionTarget,
        objects: impl Iterator<Item = &'a Path>,
        artifact: &Path,
    ) -> Arguments {
        let mut args = Arguments::with_capacity(8 + target.extra_link_args().len());

        match ctx.compiler.cpp_compiler {
            CppCompiler::CLANG | CppCompiler::GCC => {
                args.create_and_push("-shared");
                args.extend(objects.map(Argument::from));
                args.extend_from_slice(target.extra_link_args());
                if cfg!(target_os = "macos") {
                    // Symbols of the interpreter are resolved when the module is loaded
                    args.create_and_push("-undefined");
                    args.create_and_push("dynamic_lookup");
                }
                args.create_and_push("-o");
                args.create_and_push(artifact);
            }
            CppCompiler::MSVC => {
                args.create_and_push("/nologo");
                args.create_and_push("/LD");
                args.extend(objects.map(Argument::from));
                args.create_and_push(format!("/Fe{}", artifact.display()));
                if !target.extra_link_args().is_empty() {
                    args.create_and_push("/link");
                    args.extend_from_slice(target.extra_link_args());
                }
            }
        }

        args
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use color_eyre::Result;
    use tempfile::tempdir;

    use super::*;
    use crate::includes::{IncludeProviders, StaticIncludes};
    use crate::project_model::extension::ExtensionDescriptor;

    fn host() -> HostRuntime {
        HostRuntime {
            executable: PathBuf::from("python3"),
            include_dir: PathBuf::from("/usr/include/python3.11"),
            ext_suffix: String::from(".cpython-311-x86_64-linux-gnu.so"),
        }
    }

    fn example_target(root: &Path, name: &str) -> Result<ExtensionTarget> {
        let pybind_include = root.join("pybind11");
        fs::create_dir_all(&pybind_include)?;
        fs::write(root.join("example.cpp"), "")?;

        let mut providers = IncludeProviders::new();
        providers.register(Box::new(StaticIncludes::new("pybind11", vec![pybind_include])));

        Ok(ExtensionTarget::assemble(
            ExtensionDescriptor::new(name)
                .source("example.cpp")
                .include_provider("pybind11")
                .flag("-std=c++11")
                .link_arg("-lm")
                .language("c++"),
            root,
            &providers,
        )?)
    }

    fn context<'a>(compiler: &'a CompilerModel, host: &'a HostRuntime, root: &Path) -> BuildContext<'a> {
        BuildContext {
            compiler,
            host,
            temp_dir: root.join("build").join("temp"),
            artifact_dir: root.join("build").join("lib"),
        }
    }

    #[test]
    fn test_gcc_command_lines_for_the_example() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        let target = example_target(root, "example")?;
        let compiler = CompilerModel {
            cpp_compiler: CppCompiler::GCC,
            ..Default::default()
        };
        let host = host();
        let ctx = context(&compiler, &host, root);

        let commands = generate_commands(&target, &ctx);
        assert_eq!(commands.driver, Argument::from("g++"));
        assert_eq!(commands.sources.len(), 1);

        let source_cmd = &commands.sources[0];
        let object = root.join("build/temp/example/example.o");
        assert_eq!(source_cmd.filename, "example.cpp");
        assert_eq!(source_cmd.path(), root.join("example.cpp"));
        assert_eq!(source_cmd.byproduct, object);

        let args = source_cmd.args.iter().map(|arg| arg.as_str()).collect::<Vec<_>>();
        assert_eq!(args.first(), Some(&"-c"));
        assert!(args.contains(&"-I/usr/include/python3.11"));
        assert!(args.contains(&format!("-I{}", root.join("pybind11").display()).as_str()));
        assert_eq!(args.last(), Some(&"-std=c++11"));
        let host_include = args.iter().position(|a| *a == "-I/usr/include/python3.11");
        let pybind_include = args.iter().position(|a| a.ends_with("pybind11"));
        assert!(host_include < pybind_include);

        let artifact = root.join("build/lib/example.cpython-311-x86_64-linux-gnu.so");
        assert_eq!(commands.linker.target, artifact);
        let object_arg = object.display().to_string();
        let artifact_arg = artifact.display().to_string();
        let link_args = commands.linker.args.iter().map(|arg| arg.as_str()).collect::<Vec<_>>();
        assert_eq!(link_args.first(), Some(&"-shared"));
        assert!(link_args.contains(&object_arg.as_str()));
        assert!(link_args.contains(&"-lm"));
        assert_eq!(&link_args[link_args.len() - 2..], &["-o", artifact_arg.as_str()]);

        Ok(())
    }

    #[test]
    fn test_msvc_command_lines() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        let target = example_target(root, "example")?;
        let compiler = CompilerModel {
            cpp_compiler: CppCompiler::MSVC,
            ..Default::default()
        };
        let host = host();
        let ctx = context(&compiler, &host, root);

        let commands = generate_commands(&target, &ctx);
        assert_eq!(commands.driver, Argument::from("cl"));

        let args = &commands.sources[0].args;
        assert!(args.iter().any(|arg| arg.as_str() == "/EHsc"));
        assert!(args.iter().any(|arg| arg.as_str() == "/I/usr/include/python3.11"));
        assert!(commands.sources[0].byproduct.ends_with("example.obj"));

        let link_args = commands.linker.args.iter().map(|arg| arg.as_str()).collect::<Vec<_>>();
        assert_eq!(&link_args[..2], &["/nologo", "/LD"]);
        assert_eq!(&link_args[link_args.len() - 2..], &["/link", "-lm"]);

        Ok(())
    }

    #[test]
    fn test_generation_is_deterministic() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        let target = example_target(root, "example")?;
        let compiler = CompilerModel::default();
        let host = host();
        let ctx = context(&compiler, &host, root);

        assert_eq!(generate_commands(&target, &ctx), generate_commands(&target, &ctx));
        Ok(())
    }

    #[test]
    fn test_dotted_names_nest_the_artifact() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        let target = example_target(root, "pkg._example")?;
        let compiler = CompilerModel::default();
        let host = host();
        let ctx = context(&compiler, &host, root);

        assert_eq!(
            ctx.artifact_path(&target),
            root.join("build/lib/pkg/_example.cpython-311-x86_64-linux-gnu.so")
        );
        assert!(generate_commands(&target, &ctx).sources[0]
            .byproduct
            .starts_with(root.join("build/temp/pkg._example")));
        Ok(())
    }

    #[test]
    fn test_object_names_do_not_collide() {
        let mut used = HashSet::new();
        let first = helpers::unique_object_name(Path::new("a/util.cpp"), CppCompiler::GCC, &mut used);
        let second = helpers::unique_object_name(Path::new("b/util.cpp"), CppCompiler::GCC, &mut used);
        let third = helpers::unique_object_name(Path::new("c/util.c"), CppCompiler::GCC, &mut used);

        assert_eq!(first, "util.o");
        assert_eq!(second, "util-1.o");
        assert_eq!(third, "util-2.o");
    }

    #[test]
    fn test_unlaunchable_driver_is_a_toolchain_error() -> Result<()> {
        let temp = tempdir()?;
        let root = temp.path();
        let target = example_target(root, "example")?;
        let compiler = CompilerModel {
            cpp_compiler: CppCompiler::GCC,
            driver_path: Some(root.join("no-such-compiler")),
            extra_args: vec![],
        };
        let host = host();
        let ctx = context(&compiler, &host, root);

        let result = CompilerDriver.build(&target, &ctx);
        assert!(matches!(result, Err(ToolchainError::Spawn { .. })));
        assert!(!ctx.artifact_path(&target).exists());
        Ok(())
    }
}
