use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{CliError, CliResult};

/// Replace `path` with `data` so readers never see a half-written table or
/// settings file. The parent directory is created when missing.
pub fn replace_file(path: &Path, data: &[u8]) -> CliResult<()> {
    if path.is_dir() {
        return Err(CliError::InvalidOutput(format!(
            "{} is a directory",
            path.display()
        )));
    }
    let staging = staging_path(path)?;
    let parent = path.parent().filter(|parent| !parent.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent)?;
    }

    let result = stage_and_rename(&staging, path, data);
    if result.is_err() {
        // The staging file may not exist yet.
        let _ = fs::remove_file(&staging);
        return result;
    }
    if let Some(parent) = parent {
        OpenOptions::new().read(true).open(parent)?.sync_all()?;
    }
    tracing::debug!(path = %path.display(), bytes = data.len(), "file replaced");
    Ok(())
}

fn stage_and_rename(staging: &Path, path: &Path, data: &[u8]) -> CliResult<()> {
    let mut file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(staging)?;
    file.write_all(data)?;
    file.sync_all()?;
    fs::rename(staging, path)?;
    Ok(())
}

/// Hidden sibling named after the target and this process, so concurrent
/// runs writing the same `--out` never share a staging file.
fn staging_path(path: &Path) -> CliResult<PathBuf> {
    let file_name = path.file_name().ok_or_else(|| {
        CliError::InvalidOutput(format!("{} does not name a file", path.display()))
    })?;
    Ok(path.with_file_name(format!(
        ".{}.{}.partial",
        file_name.to_string_lossy(),
        std::process::id()
    )))
}
