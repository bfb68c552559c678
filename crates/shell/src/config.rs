//! Shell configuration from environment variables

use std::path::PathBuf;

use tally_client::ClientConfig;
use tally_core::session::Session;
use uuid::Uuid;

const DEFAULT_DATA_DIR: &str = ".tally-data";

/// Paths checked when none are given on the command line
pub const DEFAULT_PATHS: [&str; 5] = ["/", "/expenses", "/dashboard", "/onboarding", "/login"];

#[derive(Debug, Clone)]
pub struct ShellConfig {
    pub api: ClientConfig,
    pub data_dir: PathBuf,
    /// Session the auth provider would restore at startup
    pub session: Option<Session>,
}

impl ShellConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(ClientConfig::from_env(), |name| std::env::var(name).ok())
    }

    fn from_lookup(api: ClientConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let non_empty = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let data_dir = non_empty("TALLY_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR));

        let session = non_empty("TALLY_SESSION_EMAIL").map(|email| {
            let user_id = non_empty("TALLY_SESSION_USER_ID")
                .and_then(|raw| Uuid::parse_str(&raw).ok())
                .unwrap_or_else(|| Uuid::new_v5(&Uuid::NAMESPACE_OID, email.as_bytes()));
            let session = Session::new(user_id, email);
            match non_empty("TALLY_SESSION_NAME") {
                Some(name) => session.with_full_name(name),
                None => session,
            }
        });

        Self {
            api,
            data_dir,
            session,
        }
    }

    pub fn local_storage_path(&self) -> PathBuf {
        self.data_dir.join("local_storage.json")
    }
}
