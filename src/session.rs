use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Persisted client session, mirroring the browser storage keys: auth
/// token, user record, app-version marker and language preference.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// File-backed session store under the platform cache directory.
#[derive(Debug)]
pub struct SessionStore {
    path: PathBuf,
    data: SessionData,
}

impl SessionStore {
    /// Opens the default store at `<cache dir>/mgdr/session.json`. A
    /// missing or unreadable file starts an empty session.
    pub fn open_default() -> Result<Self> {
        let base = std::env::var_os("XDG_CACHE_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cache")))
            .context("no cache directory available")?;
        Self::open(base.join("mgdr").join("session.json"))
    }

    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let data = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_default(),
            Err(_) => SessionData::default(),
        };
        Ok(SessionStore { path, data })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut SessionData {
        &mut self.data
    }

    /// Writes the session atomically: serialize to a sibling temp file,
    /// then rename over the target.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        let raw = serde_json::to_string_pretty(&self.data)?;
        fs::write(&tmp, raw).with_context(|| format!("writing {}", tmp.display()))?;
        fs::rename(&tmp, &self.path)
            .with_context(|| format!("replacing {}", self.path.display()))?;
        Ok(())
    }

    /// Cache-busting on version change: when the stored app-version marker
    /// differs from `current`, the auth token and user record are cleared.
    /// The language preference always survives. Returns whether a bust
    /// happened.
    pub fn ensure_version(&mut self, current: &str) -> Result<bool> {
        let busted = match self.data.app_version.as_deref() {
            Some(stored) if stored == current => false,
            _ => {
                self.data.auth_token = None;
                self.data.user = None;
                true
            }
        };
        self.data.app_version = Some(current.to_string());
        if busted {
            self.save()?;
        }
        Ok(busted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mgdr-session-{name}-{}.json", std::process::id()))
    }

    #[test]
    fn save_and_reload_round_trip() {
        let path = temp_path("roundtrip");
        let mut store = SessionStore::open(&path).unwrap();
        store.data_mut().auth_token = Some("tok-123".to_string());
        store.data_mut().language = Some("en".to_string());
        store.save().unwrap();

        let reloaded = SessionStore::open(&path).unwrap();
        assert_eq!(reloaded.data().auth_token.as_deref(), Some("tok-123"));
        assert_eq!(reloaded.data().language.as_deref(), Some("en"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn version_bump_clears_auth_but_keeps_language() {
        let path = temp_path("bump");
        let mut store = SessionStore::open(&path).unwrap();
        store.data_mut().auth_token = Some("tok".to_string());
        store.data_mut().user = Some(json!({"name": "Ada"}));
        store.data_mut().language = Some("zh".to_string());
        store.data_mut().app_version = Some("1.0.0".to_string());

        assert!(store.ensure_version("1.1.0").unwrap());
        assert!(store.data().auth_token.is_none());
        assert!(store.data().user.is_none());
        assert_eq!(store.data().language.as_deref(), Some("zh"));
        assert_eq!(store.data().app_version.as_deref(), Some("1.1.0"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn matching_version_is_a_no_op() {
        let path = temp_path("noop");
        let mut store = SessionStore::open(&path).unwrap();
        store.data_mut().auth_token = Some("tok".to_string());
        store.data_mut().app_version = Some("2.0.0".to_string());
        assert!(!store.ensure_version("2.0.0").unwrap());
        assert_eq!(store.data().auth_token.as_deref(), Some("tok"));
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let path = temp_path("corrupt");
        fs::write(&path, "not json at all").unwrap();
        let store = SessionStore::open(&path).unwrap();
        assert_eq!(store.data(), &SessionData::default());
        let _ = fs::remove_file(&path);
    }
}
