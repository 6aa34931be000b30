use std::path::PathBuf;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::api::UserProfile;

/// The authenticated user context. Read by every page; replaced only by
/// the sign-in flow or a profile refresh.
#[derive(Clone, Serialize, Deserialize)]
pub struct Session {
    token: Zeroizing<String>,
    user: UserProfile,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("user_name", &self.user.user_name)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(token: Zeroizing<String>, user: UserProfile) -> Self {
        Self { token, user }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn user(&self) -> &UserProfile {
        &self.user
    }

    pub fn user_name(&self) -> &str {
        &self.user.user_name
    }

    pub fn wallet_balance(&self) -> Decimal {
        self.user.balance
    }

    /// Same token, fresh profile from the server.
    pub fn with_user(&self, user: UserProfile) -> Self {
        Self {
            token: self.token.clone(),
            user,
        }
    }
}

/// "Remember me" storage: the session as owner-only JSON.
///
/// Path: `data_dir()/session.json`
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn open() -> Result<Self> {
        let path = crate::data_dir()?.join("session.json");
        Ok(Self::open_at(path))
    }

    pub fn open_at(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    /// Load a remembered session. A missing or unreadable file means none.
    pub fn load(&self) -> Option<Session> {
        let data = Zeroizing::new(std::fs::read_to_string(&self.path).ok()?);
        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), "ignoring corrupt session file: {e}");
                None
            }
        }
    }

    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create data directory")?;
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                std::fs::set_permissions(parent, std::fs::Permissions::from_mode(0o700))?;
            }
        }
        let json = Zeroizing::new(
            serde_json::to_string_pretty(session).context("Failed to serialize session")?,
        );
        #[cfg(unix)]
        {
            use std::io::Write;
            use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.path)
                .context("Failed to write session.json")?;
            // `mode` only applies on create; tighten a file left by an older run.
            file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
            file.write_all(json.as_bytes())
                .context("Failed to write session.json")?;
            file.sync_all()?;
        }
        #[cfg(not(unix))]
        std::fs::write(&self.path, json.as_bytes()).context("Failed to write session.json")?;
        Ok(())
    }

    /// Persist the session when `remember` is set, otherwise forget any
    /// previously remembered one so the next start does not resume it.
    pub fn remember(&self, session: &Session, remember: bool) -> Result<()> {
        if remember {
            self.save(session)
        } else {
            self.clear()
        }
    }

    /// Forget the remembered session. No-op if there is none.
    pub fn clear(&self) -> Result<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).context("Failed to remove session.json"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> Session {
        Session::new(
            Zeroizing::new("tok-123".into()),
            UserProfile {
                user_name: "ada".into(),
                balance: Decimal::new(150_075, 2),
            },
        )
    }

    fn temp_store() -> (tempfile::TempDir, SessionStore) {
        let dir = tempfile::tempdir().unwrap();
        let store = SessionStore::open_at(dir.path().join("nested").join("session.json"));
        (dir, store)
    }

    #[test]
    fn accessors() {
        let s = session();
        assert_eq!(s.token(), "tok-123");
        assert_eq!(s.user_name(), "ada");
        assert_eq!(s.wallet_balance().to_string(), "1500.75");
    }

    #[test]
    fn with_user_keeps_token() {
        let s = session().with_user(UserProfile {
            user_name: "ada".into(),
            balance: Decimal::ZERO,
        });
        assert_eq!(s.token(), "tok-123");
        assert_eq!(s.wallet_balance(), Decimal::ZERO);
    }

    #[test]
    fn debug_hides_token() {
        let dbg = format!("{:?}", session());
        assert!(dbg.contains("ada"));
        assert!(!dbg.contains("tok-123"));
    }

    #[test]
    fn save_load_clear() {
        let (_dir, store) = temp_store();
        assert!(store.load().is_none());

        store.save(&session()).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.token(), "tok-123");
        assert_eq!(loaded.user(), session().user());

        store.clear().unwrap();
        assert!(store.load().is_none());
        store.clear().unwrap();
    }

    #[cfg(unix)]
    #[test]
    fn saved_file_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store.save(&session()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn existing_readable_file_is_tightened() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "{}").unwrap();
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644)).unwrap();

        store.save(&session()).unwrap();
        let mode = std::fs::metadata(store.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().unwrap().token(), "tok-123");
    }

    #[test]
    fn remember_false_forgets_previous_user() {
        let (_dir, store) = temp_store();
        store.remember(&session(), true).unwrap();
        assert!(store.load().is_some());

        let other = Session::new(
            Zeroizing::new("tok-bob".into()),
            UserProfile {
                user_name: "bob".into(),
                balance: Decimal::ZERO,
            },
        );
        store.remember(&other, false).unwrap();
        assert!(store.load().is_none());
    }

    #[test]
    fn corrupt_file_is_ignored() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().unwrap()).unwrap();
        std::fs::write(store.path(), "not json").unwrap();
        assert!(store.load().is_none());
    }
}
