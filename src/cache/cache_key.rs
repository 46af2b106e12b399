use std::fmt;

/// Identifies one cached login token: application id plus the caller's memo.
/// Kept as a structured pair so memos containing any separator stay unambiguous.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub app_id: u32,
    pub memo: String,
}

impl CacheKey {
    pub fn new(app_id: u32, memo: impl Into<String>) -> Self {
        Self {
            app_id,
            memo: memo.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{:?}", self.app_id, self.memo)
    }
}
