//! Runtime configuration
//!
//! Data directory: `--data-dir`, then `WORDUP_DATA_DIR`, then the platform
//! data directory. The database and the live session file both live there.

use std::path::PathBuf;

use anyhow::Context;
use directories::ProjectDirs;
use wordup_core::{Storage, DEFAULT_SESSION_CARDS, MAX_SESSION_CARDS};

use crate::session_file::SessionFile;

pub const DATA_DIR_ENV: &str = "WORDUP_DATA_DIR";
pub const SESSION_LIMIT_ENV: &str = "WORDUP_SESSION_LIMIT";

const DB_FILE: &str = "wordup.db";
const SESSION_FILE: &str = "session.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    /// Default number of cards per session, already clamped
    pub session_limit: usize,
}

impl Config {
    /// Resolve from the command line and the process environment
    pub fn resolve(data_dir_flag: Option<PathBuf>) -> anyhow::Result<Self> {
        Self::from_sources(
            data_dir_flag,
            std::env::var(DATA_DIR_ENV).ok(),
            std::env::var(SESSION_LIMIT_ENV).ok(),
        )
    }

    pub fn from_sources(
        data_dir_flag: Option<PathBuf>,
        data_dir_env: Option<String>,
        session_limit_env: Option<String>,
    ) -> anyhow::Result<Self> {
        let data_dir = match (data_dir_flag, data_dir_env.filter(|s| !s.trim().is_empty())) {
            (Some(dir), _) => dir,
            (None, Some(dir)) => PathBuf::from(dir),
            (None, None) => platform_data_dir()?,
        };

        Ok(Self {
            data_dir,
            session_limit: parse_session_limit(session_limit_env.as_deref()),
        })
    }

    pub fn db_path(&self) -> PathBuf {
        self.data_dir.join(DB_FILE)
    }

    pub fn session_path(&self) -> PathBuf {
        self.data_dir.join(SESSION_FILE)
    }

    /// Create the data directory and open the database
    pub fn open_storage(&self) -> anyhow::Result<Storage> {
        Storage::ensure_private_dir(&self.data_dir)
            .with_context(|| format!("Could not create data directory {}", self.data_dir.display()))?;
        let storage = Storage::new(Some(self.db_path()))
            .with_context(|| format!("Could not open database {}", self.db_path().display()))?;
        Ok(storage)
    }

    pub fn session_file(&self) -> SessionFile {
        SessionFile::new(self.session_path())
    }
}

fn platform_data_dir() -> anyhow::Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "wordup", "wordup")
        .ok_or_else(|| anyhow::anyhow!("Could not determine project directories"))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}

fn parse_session_limit(raw: Option<&str>) -> usize {
    let Some(raw) = raw else {
        return DEFAULT_SESSION_CARDS;
    };

    match raw.trim().parse::<usize>() {
        Ok(0) | Err(_) => {
            tracing::warn!(value = raw, "Ignoring invalid {}", SESSION_LIMIT_ENV);
            DEFAULT_SESSION_CARDS
        }
        Ok(n) => n.min(MAX_SESSION_CARDS),
    }
}
