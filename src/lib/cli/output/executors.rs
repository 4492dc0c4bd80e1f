//! Runs the commands generated for an extension against the compiler driver

use std::process::ExitStatus;

use crate::cli::output::arguments::{Argument, Arguments};
use crate::compiler::commands::ExtensionCommands;
use crate::error::ToolchainError;
use crate::project_model::compiler::CppCompiler;

/// Compiles every translation unit of an extension and then links them.
///
/// The first failing command ends the build. When the link step fails, whatever
/// the linker left at the artifact location is removed
pub fn run_extension_commands(
    compiler: CppCompiler,
    target: &str,
    commands: &ExtensionCommands,
) -> Result<(), ToolchainError> {
    log::info!("[{compiler}] - Building the extension `{target}`...");

    for source_cmd in &commands.sources {
        log::debug!("[{compiler}] - Compiling {:?}", source_cmd.path());
        let status = execute_command(compiler, &commands.driver, &source_cmd.args)?;
        if !status.success() {
            return Err(ToolchainError::CommandFailed {
                compiler,
                target: target.to_string(),
                step: source_cmd.filename.clone(),
                status,
            });
        }
    }

    log::debug!("[{compiler}] - Linking {:?}", commands.linker.target);
    let linked = execute_command(compiler, &commands.driver, &commands.linker.args).and_then(
        |status| {
            if status.success() {
                Ok(())
            } else {
                Err(ToolchainError::CommandFailed {
                    compiler,
                    target: target.to_string(),
                    step: String::from("link"),
                    status,
                })
            }
        },
    );

    if linked.is_err() && commands.linker.target.exists() {
        if let Err(e) = std::fs::remove_file(&commands.linker.target) {
            log::warn!(
                "Unable to remove the partial artifact {:?}: {e}",
                commands.linker.target
            );
        }
    }

    linked
}

/// Executes a new [`std::process::Command`] for the given driver, waiting
/// until the child process finishes
fn execute_command(
    compiler: CppCompiler,
    driver: &Argument,
    arguments: &Arguments,
) -> Result<ExitStatus, ToolchainError> {
    log::trace!("[{compiler}] - Executing command => {driver} {arguments}");

    let spawn_error = |source: std::io::Error| ToolchainError::Spawn {
        compiler,
        driver: driver.to_string(),
        source,
    };

    std::process::Command::new(driver)
        .args(arguments)
        .spawn()
        .map_err(spawn_error)?
        .wait()
        .map_err(spawn_error)
}
