//! Metadata about the user's project
use serde::*;

/// [`ProjectAttribute`] - Metadata about the user's project
/// * `name` - The project's name
/// * `compilation_db` - Whether a `compile_commands.json` must be generated
/// at the project root on every build
///
/// ### Tests
///
/// ```rust
/// use nativext::config_file::project::ProjectAttribute;
///
/// const CONFIG_FILE_MOCK: &str = r#"
///     #[project]
///     name = 'calculator'
///     compilation_db = true
///"#;
///
/// let config: ProjectAttribute = toml::from_str(CONFIG_FILE_MOCK)
///    .expect("A failure happened parsing the nativext toml file");
///
/// assert_eq!(config.name, "calculator");
/// assert_eq!(config.compilation_db, Some(true));
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
pub struct ProjectAttribute<'a> {
    pub name: &'a str,
    pub compilation_db: Option<bool>,
}
