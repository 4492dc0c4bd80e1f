//! Type for holding the declaration of a native extension module

use serde::Deserialize;

use crate::project_model::extension::ExtensionDescriptor;

/// [`ExtensionAttribute`] - The type for holding the build details of every
/// user defined extension, under the `[extensions.<name>]` tables
///
/// * `name` - The importable module name, when it differs from the table key.
/// Dotted names place the module inside a package (`pkg._native`)
/// * `sources` - The sources to be compiled. Entries with a `*` are glob patterns
/// * `include_dirs` - Extra directories for the compiler search path
/// * `include_providers` - Binding libraries whose headers must be found, like `pybind11`
/// * `extra_compile_args` - Flags passed verbatim to every compile command line
/// * `extra_link_args` - Flags passed verbatim to the link command line
/// * `language` - `c` or `c++`. Inferred from the sources when absent
///
/// ### Tests
///
/// ```rust
/// use nativext::config_file::extension::ExtensionAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[extensions.example]
///     sources = [ 'example.cpp' ]
///     include_providers = [ 'pybind11' ]
///     extra_compile_args = [ '-std=c++11' ]
///     language = 'c++'
/// "#;
///
/// let config: ExtensionAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the nativext toml file");
///
/// assert_eq!(config.name, None);
/// assert_eq!(config.sources, vec!["example.cpp"]);
/// assert_eq!(config.include_dirs, None);
/// assert_eq!(config.include_providers, Some(vec!["pybind11"]));
/// assert_eq!(config.extra_compile_args, Some(vec!["-std=c++11"]));
/// assert_eq!(config.language, Some("c++"));
/// ```
/// > Note: TOML table are toml commented (#) to allow us to parse
/// the inner attributes as the direct type that they belongs to.
/// That commented tables aren't the real TOML, they are just there
/// for testing and exemplification purposes of the inner attributes
/// of the configuration file.
///
/// For a test over a real example, please look at the
/// [`nativext::config_file::NativextConfigFile`] doc-test
#[derive(Debug, PartialEq, Eq, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct ExtensionAttribute<'a> {
    #[serde(borrow)]
    pub name: Option<&'a str>,
    #[serde(borrow, default)]
    pub sources: Vec<&'a str>,
    #[serde(borrow)]
    pub include_dirs: Option<Vec<&'a str>>,
    #[serde(borrow)]
    pub include_providers: Option<Vec<&'a str>>,
    #[serde(borrow)]
    pub extra_compile_args: Option<Vec<&'a str>>,
    #[serde(borrow)]
    pub extra_link_args: Option<Vec<&'a str>>,
    #[serde(borrow)]
    pub language: Option<&'a str>,
}

impl<'a> ExtensionAttribute<'a> {
    /// Maps the declaration under the `[extensions.<key>]` table to an
    /// [`ExtensionDescriptor`]
    pub fn to_descriptor(&self, key: &str) -> ExtensionDescriptor {
        let owned = |values: &Option<Vec<&'a str>>| -> Vec<String> {
            values
                .as_deref()
                .unwrap_or_default()
                .iter()
                .map(|value| value.to_string())
                .collect()
        };

        ExtensionDescriptor {
            name: self.name.unwrap_or(key).to_string(),
            sources: self.sources.iter().map(|src| src.to_string()).collect(),
            include_dirs: owned(&self.include_dirs)
                .into_iter()
                .map(Into::into)
                .collect(),
            include_providers: owned(&self.include_providers),
            extra_flags: owned(&self.extra_compile_args),
            extra_link_args: owned(&self.extra_link_args),
            language: self.language.map(str::to_string),
        }
    }
}
