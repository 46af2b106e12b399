use tracing::{error, info};

use crate::error::UpstreamError;
use crate::steam::account::Account;

/// Upstream account management capability consumed by the resolver and reconciler.
pub trait AccountService: Send + Sync {
    fn list_accounts(
        &self,
    ) -> impl std::future::Future<Output = Result<Vec<Account>, UpstreamError>> + Send;

    fn create_account(
        &self,
        app_id: u32,
        memo: &str,
    ) -> impl std::future::Future<Output = Result<Account, UpstreamError>> + Send;

    /// Issue a fresh login token for an existing account.
    fn reset_login_token(
        &self,
        steam_id: &str,
    ) -> impl std::future::Future<Output = Result<Account, UpstreamError>> + Send;

    fn delete_account(
        &self,
        steam_id: &str,
    ) -> impl std::future::Future<Output = Result<(), UpstreamError>> + Send;
}

/// Delete every account the service lists. Failures for single accounts are
/// logged and skipped; returns how many accounts were deleted.
pub async fn delete_all_accounts<S: AccountService>(service: &S) -> Result<usize, UpstreamError> {
    let accounts = service.list_accounts().await?;
    let mut deleted = 0;
    for account in accounts.iter() {
        match service.delete_account(&account.steam_id).await {
            Ok(()) => {
                info!("deleted account {} (appid {}, memo '{}')", account.steam_id, account.app_id, account.memo);
                deleted += 1;
            }
            Err(err) => error!("deleting account {} failed: {}", account.steam_id, err),
        }
    }
    Ok(deleted)
}
