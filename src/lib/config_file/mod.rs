//! root file for the crate where the datastructures that holds the TOML
//! parsed data lives.
pub mod build;
pub mod compiler;
pub mod extension;
pub mod project;

use std::fmt::Debug;

use indexmap::IndexMap;
use serde::Deserialize;

use self::{
    build::BuildAttribute, compiler::CompilerAttribute, extension::ExtensionAttribute,
    project::ProjectAttribute,
};

/// ```rust
/// use nativext::config_file::{
///     NativextConfigFile,
///     compiler::CppCompiler,
///     extension::ExtensionAttribute,
/// };
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     [project]
///     name = 'example'
///
///     [compiler]
///     cpp_compiler = 'gcc'
///
///     [extensions.example]
///     sources = [ 'example.cpp' ]
///     include_providers = [ 'pybind11' ]
///     extra_compile_args = [ '-std=c++11' ]
///     language = 'c++'
///
///     [extensions.fast_math]
///     name = 'example._fast_math'
///     sources = [ 'src/*.c' ]
/// "#;
///
/// let config: NativextConfigFile = toml::from_str(CONFIG_FILE_MOCK)
///     .expect("A failure happened parsing the nativext toml file");
///
/// assert_eq!(config.project.name, "example");
/// assert_eq!(config.compiler.cpp_compiler, CppCompiler::GCC);
/// assert!(config.build.is_none());
///
/// let names = config.extensions.keys().copied().collect::<Vec<_>>();
/// assert_eq!(names, vec!["example", "fast_math"]);
///
/// let example: &ExtensionAttribute<'_> = config.extensions.get("example")
///     .expect("Extension named 'example' not found on the configuration");
/// assert_eq!(example.sources, vec!["example.cpp"]);
/// assert_eq!(example.extra_compile_args, Some(vec!["-std=c++11"]));
///
/// let fast_math = config.extensions.get("fast_math").unwrap();
/// assert_eq!(fast_math.name, Some("example._fast_math"));
/// assert!(fast_math.language.is_none());
/// ```
/// The [`NativextConfigFile`] is the type that holds
/// the whole hierarchy of nativext config file attributes
/// and properties
#[derive(Deserialize, Debug, Default)]
pub struct NativextConfigFile<'a> {
    #[serde(borrow)]
    pub project: ProjectAttribute<'a>,
    #[serde(borrow, default)]
    pub compiler: CompilerAttribute<'a>,
    #[serde(borrow)]
    pub build: Option<BuildAttribute<'a>>,
    #[serde(borrow, default)]
    pub extensions: IndexMap<&'a str, ExtensionAttribute<'a>>,
}

pub fn nativext_cfg_from_file(cfg: &'_ str) -> Result<NativextConfigFile<'_>, toml::de::Error> {
    <NativextConfigFile>::deserialize(&mut toml::Deserializer::new(cfg))
}
