//! Benchmarks tests for measuring the performance of the code

use std::fs;
use std::path::Path;

use clap::Parser;
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use nativext::{
    cli::input::CliArgs,
    compiler::{self, BuildContext},
    config_file::{self, NativextConfigFile},
    includes::{IncludeProviders, StaticIncludes},
    python::HostRuntime,
    utils::{constants::CONFIG_FILE_MOCK, reader::build_model},
};

/// Lays out the sources and include directories that the mocked configuration declares
fn mock_project(root: &Path) -> IncludeProviders {
    fs::write(root.join("example.cpp"), "").expect("Unable to create the mocked source");
    fs::create_dir_all(root.join("src")).expect("Unable to create the sources directory");
    for name in ["vector.c", "matrix.c", "stats.c"] {
        fs::write(root.join("src").join(name), "").expect("Unable to create the mocked source");
    }
    fs::create_dir_all(root.join("include")).expect("Unable to create the include directory");
    fs::create_dir_all(root.join("pybind11")).expect("Unable to create the include directory");

    let mut providers = IncludeProviders::new();
    providers.register(Box::new(StaticIncludes::new(
        "pybind11",
        vec![root.join("pybind11")],
    )));
    providers
}

pub fn build_project_benchmark(c: &mut Criterion) {
    let temp = tempfile::tempdir().expect("Unable to create the benchmark's project root");
    let root = temp.path();
    let providers = mock_project(root);
    let cli_args = CliArgs::parse_from(["", "build"]);

    c.bench_function("Parse the configuration file and map it to the model", |b| {
        b.iter(|| {
            let config: NativextConfigFile =
                config_file::nativext_cfg_from_file(black_box(CONFIG_FILE_MOCK))
                    .expect("The mocked configuration must be valid");
            build_model(config, &cli_args, root, &providers)
        })
    });

    let config = config_file::nativext_cfg_from_file(CONFIG_FILE_MOCK)
        .expect("The mocked configuration must be valid");
    let program_data = build_model(config, &cli_args, root, &providers)
        .expect("The mocked project must be valid");
    let host = HostRuntime {
        executable: "python3".into(),
        include_dir: root.join("python"),
        ext_suffix: String::from(".cpython-312-x86_64-linux-gnu.so"),
    };
    let ctx = BuildContext::new(&program_data, &host, false);

    c.bench_function("Generate the command lines of every extension", |b| {
        b.iter(|| {
            program_data
                .extensions
                .iter()
                .map(|target| compiler::generate_commands(black_box(target), &ctx))
                .collect::<Vec<_>>()
        })
    });
}

criterion_group!(benches, build_project_benchmark);
criterion_main!(benches);
