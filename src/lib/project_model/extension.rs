//! The description of a native extension module, from its raw declaration
//! to the validated [`ExtensionTarget`] that a build driver consumes

use core::fmt;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use indexmap::IndexSet;
use regex::Regex;
use serde::Serialize;

use crate::cli::output::arguments::Argument;
use crate::error::ConfigurationError;
use crate::includes::IncludeProviders;

/// Selects which toolchain is invoked for the sources of an extension
#[derive(Debug, PartialEq, Eq, Clone, Copy, Serialize)]
pub enum Language {
    #[serde(rename = "c")]
    C,
    #[serde(rename = "c++")]
    Cpp,
}

impl Language {
    /// Maps a user provided tag to a [`Language`]
    ///
    /// ```rust
    /// use nativext::project_model::extension::Language;
    ///
    /// assert_eq!(Language::from_tag("c++"), Some(Language::Cpp));
    /// assert_eq!(Language::from_tag("CPP"), Some(Language::Cpp));
    /// assert_eq!(Language::from_tag("c"), Some(Language::C));
    /// assert_eq!(Language::from_tag("fortran"), None);
    /// ```
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.trim().to_ascii_lowercase().as_str() {
            "c" => Some(Language::C),
            "c++" | "cpp" | "cxx" => Some(Language::Cpp),
            _ => None,
        }
    }

    /// A single C++ translation unit turns the whole extension into a C++ one,
    /// since the final product must be linked by the C++ driver
    pub fn infer<P: AsRef<Path>>(sources: &[P]) -> Option<Self> {
        let mut language = None;
        for source in sources {
            match source.as_ref().extension().and_then(|ext| ext.to_str()) {
                Some("cpp" | "cc" | "cxx" | "c++" | "C") => return Some(Language::Cpp),
                Some("c") => language = Some(Language::C),
                _ => {}
            }
        }
        language
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Language::C => write!(f, "c"),
            Language::Cpp => write!(f, "c++"),
        }
    }
}

fn identifier() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("The identifier pattern is ill-formed")
    })
}

/// Identifiers that the runtime reserves, so a module named after them can't be imported
const RESERVED_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

fn is_identifier(component: &str) -> bool {
    identifier().is_match(component) && !RESERVED_KEYWORDS.contains(&component)
}

/// The importable name of an extension. Dotted names place the module inside
/// a package, and every dot separated component must be an identifier
#[derive(Debug, PartialEq, Eq, Clone, Hash, Serialize)]
#[serde(transparent)]
pub struct ModuleName(String);

impl ModuleName {
    /// ```rust
    /// use nativext::project_model::extension::ModuleName;
    ///
    /// assert!(ModuleName::parse("example").is_ok());
    /// assert!(ModuleName::parse("pkg._speedups").is_ok());
    /// assert!(ModuleName::parse("1example").is_err());
    /// assert!(ModuleName::parse("pkg..example").is_err());
    /// assert!(ModuleName::parse("my-module").is_err());
    /// assert!(ModuleName::parse("pkg.class").is_err());
    /// ```
    pub fn parse(name: &str) -> Result<Self, ConfigurationError> {
        if name.split('.').all(is_identifier) {
            Ok(Self(name.to_string()))
        } else {
            Err(ConfigurationError::InvalidModuleName {
                name: name.to_string(),
            })
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The name under which the runtime loads the artifact
    pub fn module(&self) -> &str {
        self.0.rsplit('.').next().unwrap_or(&self.0)
    }

    /// Relative location of the artifact, with the package components as directories
    ///
    /// ```rust
    /// use std::path::PathBuf;
    /// use nativext::project_model::extension::ModuleName;
    ///
    /// let name = ModuleName::parse("pkg.sub._native").unwrap();
    /// assert_eq!(name.artifact_path(".so"), PathBuf::from("pkg/sub/_native.so"));
    /// ```
    pub fn artifact_path(&self, ext_suffix: &str) -> PathBuf {
        let mut path: PathBuf = self.0.split('.').collect();
        path.set_file_name(format!("{}{ext_suffix}", self.module()));
        path
    }
}

impl fmt::Display for ModuleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The raw declaration of an extension, as written by the user, before any
/// check against the filesystem or the include providers took place.
///
/// Source entries containing a `*` are treated as glob patterns. Relative paths
/// are resolved against the project root during [`ExtensionTarget::assemble`]
///
/// ```rust
/// use nativext::project_model::extension::ExtensionDescriptor;
///
/// let descriptor = ExtensionDescriptor::new("example")
///     .source("example.cpp")
///     .include_provider("pybind11")
///     .flag("-std=c++11")
///     .language("c++");
///
/// assert_eq!(descriptor.sources, vec!["example.cpp"]);
/// assert_eq!(descriptor.extra_flags, vec!["-std=c++11"]);
/// assert_eq!(descriptor.language.as_deref(), Some("c++"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionDescriptor {
    pub name: String,
    pub sources: Vec<String>,
    pub include_dirs: Vec<PathBuf>,
    pub include_providers: Vec<String>,
    pub extra_flags: Vec<String>,
    pub extra_link_args: Vec<String>,
    pub language: Option<String>,
}

impl ExtensionDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn source(mut self, source: impl Into<String>) -> Self {
        self.sources.push(source.into());
        self
    }

    pub fn include_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.include_dirs.push(dir.into());
        self
    }

    pub fn include_provider(mut self, provider: impl Into<String>) -> Self {
        self.include_providers.push(provider.into());
        self
    }

    pub fn flag(mut self, flag: impl Into<String>) -> Self {
        self.extra_flags.push(flag.into());
        self
    }

    pub fn link_arg(mut self, arg: impl Into<String>) -> Self {
        self.extra_link_args.push(arg.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }
}

/// A validated, immutable native compilation target.
///
/// The only way of obtaining one is [`ExtensionTarget::assemble`], so holding an
/// [`ExtensionTarget`] means that its sources and include directories existed at
/// assembly time and that its language is known
#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct ExtensionTarget {
    name: ModuleName,
    sources: Vec<PathBuf>,
    include_dirs: IndexSet<PathBuf>,
    extra_flags: Vec<Argument>,
    extra_link_args: Vec<Argument>,
    language: Language,
}

impl ExtensionTarget {
    /// Validates a [`ExtensionDescriptor`] and resolves the include directories of the
    /// requested providers. Every check happens here, before anything is handed to a
    /// build driver
    pub fn assemble(
        descriptor: ExtensionDescriptor,
        project_root: &Path,
        providers: &IncludeProviders,
    ) -> Result<Self, ConfigurationError> {
        let name = ModuleName::parse(&descriptor.name)?;
        let target = name.as_str();

        if descriptor.sources.is_empty() {
            return Err(ConfigurationError::EmptySources {
                target: target.to_string(),
            });
        }

        let sources = expand_sources(target, &descriptor.sources, project_root)?;
        if sources.is_empty() {
            return Err(ConfigurationError::EmptySources {
                target: target.to_string(),
            });
        }
        if let Some(missing) = sources.iter().find(|source| !source.is_file()) {
            return Err(ConfigurationError::MissingSource {
                target: target.to_string(),
                path: missing.clone(),
            });
        }

        let mut include_dirs: IndexSet<PathBuf> = descriptor
            .include_dirs
            .iter()
            .map(|dir| project_root.join(dir))
            .collect();
        for provider in &descriptor.include_providers {
            include_dirs.extend(providers.resolve(target, provider)?);
        }
        if let Some(missing) = include_dirs.iter().find(|dir| !dir.is_dir()) {
            return Err(ConfigurationError::MissingIncludeDir {
                target: target.to_string(),
                path: missing.clone(),
            });
        }

        let language = match descriptor.language.as_deref() {
            Some(tag) => {
                Language::from_tag(tag).ok_or_else(|| ConfigurationError::UnsupportedLanguage {
                    target: target.to_string(),
                    language: tag.to_string(),
                })?
            }
            None => {
                Language::infer(&sources).ok_or_else(|| ConfigurationError::UndeterminedLanguage {
                    target: target.to_string(),
                })?
            }
        };

        log::debug!(
            "Extension `{target}` assembled with {} source(s) and {} include directories",
            sources.len(),
            include_dirs.len()
        );

        Ok(Self {
            name,
            sources,
            include_dirs,
            extra_flags: descriptor.extra_flags.into_iter().map(Argument::from).collect(),
            extra_link_args: descriptor
                .extra_link_args
                .into_iter()
                .map(Argument::from)
                .collect(),
            language,
        })
    }

    pub fn name(&self) -> &ModuleName {
        &self.name
    }

    pub fn sources(&self) -> &[PathBuf] {
        &self.sources
    }

    pub fn include_dirs(&self) -> impl Iterator<Item = &PathBuf> {
        self.include_dirs.iter()
    }

    pub fn extra_flags(&self) -> &[Argument] {
        &self.extra_flags
    }

    pub fn extra_link_args(&self) -> &[Argument] {
        &self.extra_link_args
    }

    pub fn language(&self) -> Language {
        self.language
    }
}

/// Joins every declared source with the project root, expanding the glob patterns.
/// The matches of a pattern are sorted, so the same tree always yields the same order
fn expand_sources(
    target: &str,
    declared: &[String],
    project_root: &Path,
) -> Result<Vec<PathBuf>, ConfigurationError> {
    let mut sources: IndexSet<PathBuf> = IndexSet::with_capacity(declared.len());

    for src in declared {
        let path = project_root.join(src);
        if !src.contains('*') {
            sources.insert(path);
            continue;
        }

        // Only the declared part is a pattern, the root is matched literally
        let pattern = Path::new(&glob::Pattern::escape(&project_root.to_string_lossy())).join(src);
        let mut matches = glob::glob(&pattern.to_string_lossy())
            .map_err(|e| ConfigurationError::InvalidSourcePattern {
                pattern: src.clone(),
                reason: e.to_string(),
            })?
            .filter_map(|entry| entry.ok())
            .filter(|path| path.is_file())
            .collect::<Vec<PathBuf>>();
        matches.sort();

        if matches.is_empty() {
            log::warn!("The source pattern `{src}` of extension `{target}` matches no files");
        }
        sources.extend(matches);
    }

    Ok(sources.into_iter().collect())
}
