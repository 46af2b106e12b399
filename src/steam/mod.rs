/// Steam module
///
/// Account model, the `AccountService` capability the core depends on,
/// and its Steam Web API implementation.
pub mod account;
pub mod client;
pub mod service;

pub use account::Account;
pub use client::SteamClient;
pub use service::{delete_all_accounts, AccountService};
