use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub const ROOT_ENV_VAR: &str = "ISO_SANDBOX_ROOT";

/// Project root and the asset directory sprites are loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppPaths {
    pub root: PathBuf,
    pub assets_dir: PathBuf,
}

impl AppPaths {
    fn under(root: PathBuf) -> Self {
        let assets_dir = root.join("assets");
        Self { root, assets_dir }
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("cannot locate the running executable: {0}")]
    CurrentExe(#[source] std::io::Error),
    #[error("ISO_SANDBOX_ROOT={path} is not a project root (needs Cargo.toml plus crates/ or assets/)")]
    InvalidEnvRoot { path: PathBuf },
    #[error(
        "no project root above {start_dir} (needs Cargo.toml plus crates/ or assets/); \
set ISO_SANDBOX_ROOT to the checkout directory"
    )]
    RootNotFound { start_dir: PathBuf },
}

/// Uses `ISO_SANDBOX_ROOT` when set, otherwise searches upward from the executable.
pub fn resolve_app_paths() -> Result<AppPaths, StartupError> {
    let override_root = env::var_os(ROOT_ENV_VAR).map(PathBuf::from);
    let exe = env::current_exe().map_err(StartupError::CurrentExe)?;
    resolve_from(override_root, &exe).map(AppPaths::under)
}

fn resolve_from(override_root: Option<PathBuf>, exe: &Path) -> Result<PathBuf, StartupError> {
    if let Some(path) = override_root {
        let path = canonical(&path);
        return if looks_like_root(&path) {
            Ok(path)
        } else {
            Err(StartupError::InvalidEnvRoot { path })
        };
    }

    let start_dir = exe.parent().unwrap_or(exe);
    start_dir
        .ancestors()
        .find(|dir| looks_like_root(dir))
        .map(canonical)
        .ok_or_else(|| StartupError::RootNotFound {
            start_dir: canonical(start_dir),
        })
}

fn looks_like_root(dir: &Path) -> bool {
    dir.join("Cargo.toml").is_file()
        && (dir.join("crates").is_dir() || dir.join("assets").is_dir())
}

fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap_or_else(|_| path.to_path_buf())
}
