//! The learner's live session, kept as JSON between invocations

use std::path::{Path, PathBuf};

use anyhow::Context;
use wordup_core::SessionState;

/// One session slot on disk
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
}

impl SessionFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored session, if any
    pub fn load(&self) -> anyhow::Result<Option<SessionState>> {
        let text = match std::fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(e).with_context(|| format!("Could not read {}", self.path.display()));
            }
        };

        let session = serde_json::from_str(&text).with_context(|| {
            format!(
                "Session file {} is corrupt; run `wordup session end` to discard it",
                self.path.display()
            )
        })?;
        Ok(Some(session))
    }

    /// Replace the stored session
    pub fn save(&self, session: &SessionState) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent()
            && !parent.exists()
        {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(session)?)
            .with_context(|| format!("Could not write {}", tmp.display()))?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Could not replace {}", self.path.display()))?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let _ = std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600));
        }

        Ok(())
    }

    pub fn clear(&self) -> anyhow::Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("Could not remove {}", self.path.display())),
        }
    }

    /// Store `session` if given, otherwise clear the slot
    pub fn store(&self, session: Option<&SessionState>) -> anyhow::Result<()> {
        match session {
            Some(session) => self.save(session),
            None => self.clear(),
        }
    }
}
