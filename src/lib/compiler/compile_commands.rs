use std::path::{Path, PathBuf};

use color_eyre::eyre::{Context, Result};
use serde::Serialize;

use crate::cli::output::arguments::Argument;
use crate::compiler::commands::ExtensionCommands;
use crate::utils;
use crate::utils::constants::COMPILATION_DATABASE;

/// Generates the `compile_commands.json` file at the project root, that acts as a
/// compilation database for external tools, like `clangd` or `clang-tidy`, and
/// populates it with the compile command of every translation unit
pub fn map_generated_commands_to_compilation_db(
    project_root: &Path,
    generated_commands: &[ExtensionCommands],
) -> Result<PathBuf> {
    log::debug!("Generating the compilation database...");

    let compilation_db_entries = generated_commands
        .iter()
        .flat_map(|commands| {
            commands.sources.iter().map(move |scl| CompileCommand {
                directory: &scl.directory,
                file: scl.path(),
                arguments: std::iter::once(&commands.driver)
                    .chain(scl.args.iter())
                    .collect(),
            })
        })
        .collect::<Vec<CompileCommand>>();

    let compile_commands_path = project_root.join(COMPILATION_DATABASE);
    utils::fs::save_file(&compile_commands_path, &compilation_db_entries)
        .with_context(|| "Error saving the compilation database")?;

    Ok(compile_commands_path)
}

/// Data model for serialize the data that will be outputted
/// to the `compile_commands.json` compilation database file
#[derive(Serialize, Debug)]
pub struct CompileCommand<'a> {
    pub directory: &'a PathBuf,
    pub file: PathBuf,
    pub arguments: Vec<&'a Argument>,
}
