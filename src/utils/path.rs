//! Transcoder tool path resolution

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::error::{HighlightError, HighlightResult};

const FFMPEG: &str = "ffmpeg";
const FFPROBE: &str = "ffprobe";

/// Resolved location of the ffmpeg tool family
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolLocation {
    /// Directory holding the executables; handed to the downloader
    pub bin_dir: PathBuf,
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
}

impl ToolLocation {
    /// Resolve a user-supplied path, which may name either the ffmpeg
    /// executable itself or the directory that contains it.
    pub fn resolve(path: &Path) -> HighlightResult<Self> {
        if path.as_os_str().is_empty() {
            return Err(HighlightError::configuration("ffmpeg path is empty"));
        }
        if !path.exists() {
            return Err(HighlightError::configuration(format!(
                "ffmpeg path does not exist: {}",
                path.display()
            )));
        }

        if path.is_dir() {
            return Ok(Self::in_dir(path));
        }

        let is_ffmpeg = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().eq_ignore_ascii_case(FFMPEG))
            .unwrap_or(false);
        if !is_ffmpeg {
            return Err(HighlightError::configuration(format!(
                "Expected the ffmpeg executable or its directory, got: {}",
                path.display()
            )));
        }

        let bin_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Ok(Self {
            ffprobe: bin_dir.join(executable_name(FFPROBE)),
            ffmpeg: path.to_path_buf(),
            bin_dir,
        })
    }

    /// Search `PATH` for an ffmpeg executable
    pub fn discover() -> Option<Self> {
        let path_var = env::var_os("PATH")?;
        Self::discover_in(&path_var)
    }

    fn discover_in(path_var: &OsString) -> Option<Self> {
        env::split_paths(path_var)
            .find(|dir| dir.join(executable_name(FFMPEG)).is_file())
            .map(|dir| Self::in_dir(&dir))
    }

    fn in_dir(dir: &Path) -> Self {
        Self {
            bin_dir: dir.to_path_buf(),
            ffmpeg: dir.join(executable_name(FFMPEG)),
            ffprobe: dir.join(executable_name(FFPROBE)),
        }
    }
}

fn executable_name(tool: &str) -> String {
    format!("{}{}", tool, env::consts::EXE_SUFFIX)
}
