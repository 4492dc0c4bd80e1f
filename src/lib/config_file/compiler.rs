//! file for represent the available configuration properties within nativext
//! for setting up the target compiler
use serde::*;

use crate::project_model;

/// [`CompilerAttribute`] - Configuration properties for
/// targeting one of the available compilers within nativext
///
/// * `cpp_compiler` - One of the available compilers within nativext
/// See [`CppCompiler`] declaration for a complete relation of the available ones
///
/// * `driver_path` - The specific command line terminal identifier that will
/// call the compiler's binary. ie: /usr/bin/clang++-15 will replace the default
/// `clang++` or `clang`
///
/// * `extra_args` - Arguments appended to the compile command line of every
/// translation unit of every extension
///
/// ### Tests
///
/// ```rust
/// use nativext::config_file::compiler::{CompilerAttribute, CppCompiler};
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[compiler]
///     cpp_compiler = 'clang'
///     driver_path = '/usr/bin/clang++-15'
///     extra_args = ['-O2', '-Wall']
///"#;
///
/// let config: CompilerAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the nativext toml file");
///
/// assert_eq!(config.cpp_compiler, CppCompiler::CLANG);
/// assert_eq!(config.driver_path, Some("/usr/bin/clang++-15"));
/// assert_eq!(config.extra_args, Some(vec!["-O2", "-Wall"]));
/// ```
///
/// > Note: TOML table are toml commented (#) to allow us to parse
/// the inner attributes as the direct type that they belongs to.
/// That commented tables aren't the real TOML, they are just there
/// for testing and exemplification purposes of the inner attributes
/// of the configuration file.
///
/// For a test over a real example, please look at the
/// [`nativext::config_file::NativextConfigFile`] doc-test
#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct CompilerAttribute<'a> {
    #[serde(default)]
    pub cpp_compiler: CppCompiler,
    #[serde(borrow)]
    pub driver_path: Option<&'a str>,
    #[serde(borrow)]
    pub extra_args: Option<Vec<&'a str>>,
}

/// The C/C++ compilers available within nativext
#[derive(Deserialize, Debug, PartialEq, Eq, Default, Clone, Copy)]
pub enum CppCompiler {
    #[serde(alias = "clang", alias = "Clang")]
    #[default]
    CLANG,
    #[serde(alias = "msvc", alias = "Msvc")]
    MSVC,
    #[serde(alias = "gcc", alias = "Gcc")]
    GCC,
}

impl From<CppCompiler> for project_model::compiler::CppCompiler {
    fn from(value: CppCompiler) -> Self {
        match value {
            CppCompiler::CLANG => project_model::compiler::CppCompiler::CLANG,
            CppCompiler::MSVC => project_model::compiler::CppCompiler::MSVC,
            CppCompiler::GCC => project_model::compiler::CppCompiler::GCC,
        }
    }
}
