//! Constant value definitions to use across the whole program

pub const NATIVEXT: &str = "nativext";

/// The names of the `nativext` specific directories, not their paths
pub mod dir_names {
    pub const DEFAULT_OUTPUT_DIR: &str = "build";
    pub const TEMP: &str = "temp";
    pub const LIB: &str = "lib";
    pub const NATIVEXT: &str = "nativext";
}

pub mod env_vars {
    pub const PYTHON: &str = "PYTHON";
}

pub mod error_messages {
    pub const READ_CFG_FILE: &str = "Could not read the configuration file";
    pub const PARSE_CFG_FILE: &str = "Could not parse the configuration file";
    pub const FAILURE_GATHERING_PROJECT_ROOT_ABS_PATH: &str =
        "Unable to get the absolute path for the project root";
    pub const PROJECT_MODEL_MAPPING: &str = "Error building the project model";
    pub const INVALID_EXTENSION: &str = "Invalid extension declaration";
    pub const FAILURE_QUERYING_HOST_RUNTIME: &str =
        "Unable to gather the interpreter details needed to build the extensions";
    pub const FAILED_BUILD_FOR_CFG_FILE: &str = "Failed to build the project for the config file";
    pub const FAILED_EXTENSION_BUILD: &str = "Failed to build the extension";
    pub const FAILURE_SERIALIZING_MODEL: &str = "Unable to serialize the project model";
}

pub const CONFIG_FILE_NAME: &str = "nativext";
pub const CONFIG_FILE_EXT: &str = "toml";

pub const DEFAULT_PYTHON: &str = if cfg!(target_os = "windows") {
    "python"
} else {
    "python3"
};

pub const BUILD_RECORD_FILENAME: &str = "build.json";
pub const COMPILATION_DATABASE: &str = "compile_commands.json";

pub const CONFIG_FILE_MOCK: &str = r#"
[project]
name = "calculator"
compilation_db = true

[compiler]
cpp_compiler = "gcc"
extra_args = [ "-O2" ]

[build]
output_dir = "out"
python = "python3.11"

[extensions.example]
sources = [ "example.cpp" ]
include_providers = [ "pybind11" ]
extra_compile_args = [ "-std=c++11" ]
language = "c++"

[extensions.speedups]
name = "calculator._speedups"
sources = [ "src/*.c" ]
include_dirs = [ "include" ]
extra_link_args = [ "-lm" ]
"#;
