use std::fmt::Display;

use crate::project_model::compiler;
use clap::{Parser, Subcommand, ValueEnum};

/// [`CliArgs`] is the command line arguments parser
///
/// #Test
/// ```rust
/// use clap::Parser;
/// use nativext::cli::input::{CliArgs, Command, CppCompiler};
///
/// let parser = CliArgs::parse_from(["", "-vv", "describe"]);
/// assert_eq!(2, parser.verbose);
/// assert_eq!(parser.command, Command::Describe);
///
/// let parser = CliArgs::parse_from(["", "--extensions", "example,fast_math", "build", "--inplace"]);
/// assert_eq!(parser.command, Command::Build { inplace: true });
/// assert_eq!(
///     parser.extensions,
///     Some(vec![String::from("example"), String::from("fast_math")])
/// );
///
// Create Template Project
/// let parser = CliArgs::parse_from(["", "new", "calculator", "--git", "--compiler", "clang"]);
/// assert_eq!(
///     parser.command,
///     Command::New {
///         name: String::from("calculator"),
///         git: true,
///         compiler: CppCompiler::CLANG
///     }
/// );
/// ```
#[derive(Parser, Debug, Default)]
#[command(name = "nativext")]
#[command(author = "Zero Day Code")]
#[command(version = "0.3.0")]
#[command(
    about = "nativext builds native Python extension modules written in C and C++",
    long_about = "nativext is a project of Zero Day Code. Find us: https://github.com/zerodaycode"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short, long, action = clap::ArgAction::Count, help="nativext maximum allowed verbosity level is: '-vv'")]
    pub verbose: u8,

    #[arg(short, long, help = "Allows the user to specify the project's root")]
    pub root: Option<String>,

    #[arg(
        short,
        long,
        help = "Allows the user to specify the configuration files to take in consideration"
    )]
    pub match_files: Option<String>,

    #[arg(
        long,
        help = "The Python interpreter whose headers and extension suffix are used"
    )]
    pub python: Option<String>,

    #[arg(short, long, help = "Overrides the configured compiler driver")]
    pub driver_path: Option<String>,

    #[arg(
        short,
        long,
        value_delimiter = ',',
        help = "Restricts the run to the given extensions, by table key or module name"
    )]
    pub extensions: Option<Vec<String>>,
}

/// [`Command`] -  The core enum commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Command {
    /// Compiles and links every declared extension
    Build {
        #[arg(long, help = "Places the artifacts next to the sources of the project")]
        inplace: bool,
    },
    /// Validates the declared extensions and prints the resolved model as JSON
    Describe,
    /// Creates a new extension project from a template
    New {
        #[arg(help = "The name of the project, used as the module name of its extension")]
        name: String,
        #[arg(long, help = "Initialize a new local git repo")]
        git: bool,
        #[arg(long, default_value_t = CppCompiler::GCC, help = "Which compiler to use")]
        compiler: CppCompiler,
    },
}

impl Default for Command {
    fn default() -> Self {
        Command::Build { inplace: false }
    }
}

/// [`CppCompiler`] The C++ compilers available within nativext as a command line argument for the `new` argument
#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum CppCompiler {
    CLANG,
    MSVC,
    GCC,
}

impl Display for CppCompiler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            CppCompiler::CLANG => write!(f, "clang"),
            CppCompiler::MSVC => write!(f, "msvc"),
            CppCompiler::GCC => write!(f, "gcc"),
        }
    }
}

impl From<CppCompiler> for compiler::CppCompiler {
    fn from(value: CppCompiler) -> Self {
        match value {
            CppCompiler::CLANG => compiler::CppCompiler::CLANG,
            CppCompiler::MSVC => compiler::CppCompiler::MSVC,
            CppCompiler::GCC => compiler::CppCompiler::GCC,
        }
    }
}
