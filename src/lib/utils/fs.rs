use std::{
    fs::{DirBuilder, File},
    io::{BufReader, Write},
    path::{Path, PathBuf},
};

use color_eyre::{eyre::Context, Result};
use serde::{de::DeserializeOwned, Serialize};

pub fn create_file<'a>(path: &Path, filename: &'a str, buff_write: &'a [u8]) -> Result<()> {
    let file_path = path.join(filename);

    File::create(&file_path)
        .with_context(|| format!("Could not create file {file_path:?}"))?
        .write_all(buff_write)
        .with_context(|| format!("Could not write to file {file_path:?}"))
}

pub fn create_directory(path_create: &Path) -> Result<()> {
    DirBuilder::new()
        .recursive(true)
        .create(path_create)
        .with_context(|| format!("Could not create directory {path_create:?}"))
}

/// Gets the absolute route for an element in the system given a path P,
/// without the extension is P belongs to a file
pub fn get_project_root_absolute_path(project_root: &Path) -> Result<PathBuf> {
    let canonical = project_root
        .canonicalize()
        .with_context(|| format!("Unable to canonicalize {project_root:?}"))?;

    // Windows verbatim paths (\\?\C:\...) aren't understood by every compiler driver
    if cfg!(target_os = "windows") {
        let raw = canonical.to_string_lossy();
        if let Some(stripped) = raw.strip_prefix(r"\\?\") {
            return Ok(PathBuf::from(stripped));
        }
    }

    Ok(canonical)
}

/// Serializes `data` as pretty printed JSON, replacing any previous content of `path`
pub fn save_file<T>(path: &Path, data: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    serde_json::to_writer_pretty(
        File::create(path).with_context(|| format!("Error opening the file {path:?}"))?,
        data,
    )
    .with_context(|| format!("Error serializing data to {path:?}"))
}

pub fn load_and_deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let buffer =
        BufReader::new(File::open(path).with_context(|| format!("Error opening {path:?}"))?);

    serde_json::from_reader(buffer).with_context(|| format!("Unable to parse file: {path:?}"))
}
