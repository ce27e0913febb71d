//! Logged-in identity persisted between runs.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::types::LoginResponse;

/// Who is logged in. Stored as `{"userId", "username", "isAdmin"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
}

impl SessionUser {
    /// Identity from a successful login reply.
    pub fn from_login(response: &LoginResponse) -> Result<Self, ApiError> {
        match (response.success, response.user_id, &response.username) {
            (true, Some(user_id), Some(username)) => Ok(Self {
                user_id,
                username: username.clone(),
                is_admin: response.admin,
            }),
            (false, _, _) => Err(ApiError::Rejected(response.message.clone())),
            _ => Err(ApiError::Session(
                "login reply is missing userId or username".into(),
            )),
        }
    }
}

/// JSON file holding at most one [`SessionUser`].
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/tripdesk/session.json`.
    pub fn default_path() -> Result<PathBuf, ApiError> {
        dirs::data_dir()
            .map(|dir| dir.join("tripdesk").join("session.json"))
            .ok_or_else(|| ApiError::Session("could not determine data directory".into()))
    }

    /// Store at `path`, or at the platform default when `None`.
    pub fn open(path: Option<PathBuf>) -> Result<Self, ApiError> {
        match path {
            Some(path) => Ok(Self::new(path)),
            None => Ok(Self::new(Self::default_path()?)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored identity, if any. A corrupt file is removed.
    pub fn load(&self) -> Option<SessionUser> {
        let content = match std::fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Failed to read session file");
                return None;
            }
        };
        match serde_json::from_str(&content) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discarding corrupt session file");
                let _ = std::fs::remove_file(&self.path);
                None
            }
        }
    }

    pub fn save(&self, user: &SessionUser) -> Result<(), ApiError> {
        let json = serde_json::to_string_pretty(user)
            .map_err(|e| ApiError::Session(format!("failed to serialize session: {e}")))?;

        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                let err = ApiError::Session(format!(
                    "failed to create session directory {}: {e}",
                    parent.display()
                ));
                warn!(error = %err, "Session not saved");
                err
            })?;
        }

        let tmp_path = self.path.with_extension("json.tmp");
        let written = std::fs::write(&tmp_path, &json).and_then(|()| {
            std::fs::rename(&tmp_path, &self.path).or_else(|_| {
                let _ = std::fs::remove_file(&tmp_path);
                std::fs::write(&self.path, &json)
            })
        });
        written.map_err(|e| {
            let err = ApiError::Session(format!(
                "failed to write session to {}: {e}",
                self.path.display()
            ));
            warn!(error = %err, "Session not saved");
            err
        })?;

        info!(username = %user.username, admin = user.is_admin, "Session saved");
        Ok(())
    }

    /// Forget the stored identity. A missing file is not an error.
    pub fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => {
                debug!(path = %self.path.display(), "Session cleared");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::Session(format!(
                "failed to remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}
