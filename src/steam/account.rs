use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Game server account as reported by `IGameServersService`.
/// Every field is optional on the wire; absent fields take their zero value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Account {
    #[serde(rename = "steamid")]
    pub steam_id: String,
    #[serde(rename = "appid")]
    pub app_id: u32,
    pub login_token: String,
    pub memo: String,
    pub is_deleted: bool,
    pub is_expired: bool,
    #[serde(rename = "rt_last_logon")]
    pub last_logon: i64,
}

impl Account {
    /// Empty steam id means the account has not been created upstream.
    pub fn exists(&self) -> bool {
        !self.steam_id.is_empty()
    }

    pub fn matches(&self, app_id: u32, memo: &str) -> bool {
        self.app_id == app_id && self.memo == memo
    }

    pub fn last_logon_at(&self) -> Option<DateTime<Utc>> {
        match self.last_logon {
            0 => None,
            ts => DateTime::from_timestamp(ts, 0),
        }
    }
}

/// `GetAccountList` payload inside the `response` wrapper.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct ServersResponse {
    #[serde(default)]
    pub servers: Vec<Account>,
}
