//! file that contains the configuration options available
//! to configure where and how the build process dumps its byproducts
use serde::*;

/// [`BuildAttribute`] - Stores build process specific configuration
///
/// * `output_dir` - An string representing a relative to the root path
/// where the object files and the artifacts will be dumped.
/// If isn't specified, `nativext` will generate a `./build/...` folder
/// by default
/// * `python` - The interpreter that the extensions are built for
///
/// ```rust
/// use nativext::config_file::build::BuildAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[build]
///     output_dir = 'out'
///     python = 'python3.11'
///"#;
///
/// let config: BuildAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the nativext toml file");
///
/// assert_eq!(config.output_dir, Some("out"));
/// assert_eq!(config.python, Some("python3.11"));
/// ```
#[derive(Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct BuildAttribute<'a> {
    #[serde(borrow)]
    pub output_dir: Option<&'a str>,
    #[serde(borrow)]
    pub python: Option<&'a str>,
}
