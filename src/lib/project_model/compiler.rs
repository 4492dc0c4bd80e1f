use core::fmt;
use std::borrow::Cow;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::cli::output::arguments::Argument;
use crate::project_model::extension::Language;

#[derive(Debug, PartialEq, Eq, Clone, Default, Serialize)]
pub struct CompilerModel {
    pub cpp_compiler: CppCompiler,
    pub driver_path: Option<PathBuf>,
    pub extra_args: Vec<Argument>,
}

impl CompilerModel {
    /// The executable that will be spawned for the given [`Language`]. An user provided
    /// driver path always wins over the vendor defaults
    pub fn driver(&self, language: Language) -> Cow<'_, str> {
        match self.driver_path.as_ref() {
            Some(path) => path.to_string_lossy(),
            None => Cow::Borrowed(self.cpp_compiler.get_driver(language)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, Default)]
pub enum CppCompiler {
    #[default]
    CLANG,
    MSVC,
    GCC,
}

impl fmt::Display for CppCompiler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_ref())
    }
}

impl AsRef<str> for CppCompiler {
    fn as_ref(&self) -> &str {
        match *self {
            CppCompiler::CLANG => "clang",
            CppCompiler::MSVC => "msvc",
            CppCompiler::GCC => "gcc",
        }
    }
}

impl CppCompiler {
    /// Returns an &str representing the compiler driver that will be called
    /// in the command line to generate the build events
    pub fn get_driver(&self, language: Language) -> &'static str {
        match (*self, language) {
            (CppCompiler::CLANG, Language::Cpp) => "clang++",
            (CppCompiler::CLANG, Language::C) => "clang",
            (CppCompiler::GCC, Language::Cpp) => "g++",
            (CppCompiler::GCC, Language::C) => "gcc",
            (CppCompiler::MSVC, _) => "cl",
        }
    }

    pub fn get_obj_file_extension(&self) -> &'static str {
        match *self {
            CppCompiler::MSVC => "obj",
            CppCompiler::CLANG | CppCompiler::GCC => "o",
        }
    }

    pub fn is_msvc(&self) -> bool {
        self.eq(&CppCompiler::MSVC)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_driver_selection_by_language() {
        let model = CompilerModel {
            cpp_compiler: CppCompiler::GCC,
            ..Default::default()
        };
        assert_eq!(model.driver(Language::Cpp), "g++");
        assert_eq!(model.driver(Language::C), "gcc");

        let model = CompilerModel {
            cpp_compiler: CppCompiler::CLANG,
            driver_path: Some(PathBuf::from("/opt/llvm/bin/clang++")),
            extra_args: vec![],
        };
        assert_eq!(model.driver(Language::C), "/opt/llvm/bin/clang++");
    }

    #[test]
    fn test_msvc_uses_the_same_driver_for_both_languages() {
        assert_eq!(CppCompiler::MSVC.get_driver(Language::C), "cl");
        assert_eq!(CppCompiler::MSVC.get_driver(Language::Cpp), "cl");
        assert_eq!(CppCompiler::MSVC.get_obj_file_extension(), "obj");
    }
}
