// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use reqwest::Client;

use crate::error::UpstreamError;
use crate::steam::account::Account;
use crate::steam::service::AccountService;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

#[derive(Default)]
struct Failures {
    list: Option<String>,
    create: Option<String>,
    reset: Vec<(String, String)>,
}

#[derive(Default)]
struct Calls {
    list: usize,
    create: Vec<(u32, String)>,
    reset: Vec<String>,
    delete: Vec<String>,
}

/// In-memory upstream that records every call and behaves like the account service:
/// created and reset accounts get fresh tokens and show up in later listings.
#[derive(Default)]
pub struct MockAccountService {
    accounts: Mutex<Vec<Account>>,
    calls: Mutex<Calls>,
    failures: Mutex<Failures>,
    sequence: AtomicUsize,
}

impl MockAccountService {
    pub fn new(accounts: Vec<Account>) -> Self {
        Self {
            accounts: Mutex::new(accounts),
            ..Default::default()
        }
    }

    pub fn list_calls(&self) -> usize {
        self.calls.lock().unwrap().list
    }

    pub fn create_calls(&self) -> Vec<(u32, String)> {
        self.calls.lock().unwrap().create.clone()
    }

    pub fn reset_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().reset.clone()
    }

    pub fn delete_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().delete.clone()
    }

    pub fn total_calls(&self) -> usize {
        let calls = self.calls.lock().unwrap();
        calls.list + calls.create.len() + calls.reset.len() + calls.delete.len()
    }

    pub fn token_of(&self, steam_id: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|account| account.steam_id == steam_id)
            .map(|account| account.login_token.clone())
    }

    pub fn fail_list(&self, message: &str) {
        self.failures.lock().unwrap().list = Some(message.to_owned());
    }

    pub fn fail_create(&self, message: &str) {
        self.failures.lock().unwrap().create = Some(message.to_owned());
    }

    pub fn fail_reset_for(&self, steam_id: &str, message: &str) {
        self.failures
            .lock()
            .unwrap()
            .reset
            .push((steam_id.to_owned(), message.to_owned()));
    }

    pub fn clear_failures(&self) {
        *self.failures.lock().unwrap() = Failures::default();
    }

    fn next(&self) -> usize {
        self.sequence.fetch_add(1, Ordering::SeqCst) + 1
    }
}

fn signaled(operation: &'static str, message: &str) -> UpstreamError {
    UpstreamError::Signaled {
        operation,
        message: message.to_owned(),
    }
}

impl AccountService for MockAccountService {
    async fn list_accounts(&self) -> Result<Vec<Account>, UpstreamError> {
        self.calls.lock().unwrap().list += 1;
        if let Some(message) = &self.failures.lock().unwrap().list {
            return Err(signaled("GetAccountList", message));
        }
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn create_account(&self, app_id: u32, memo: &str) -> Result<Account, UpstreamError> {
        self.calls.lock().unwrap().create.push((app_id, memo.to_owned()));
        if let Some(message) = &self.failures.lock().unwrap().create {
            return Err(signaled("CreateAccount", message));
        }
        let n = self.next();
        let account = Account {
            steam_id: format!("9000{}", n),
            app_id,
            memo: memo.to_owned(),
            login_token: format!("created-token-{}", n),
            ..Default::default()
        };
        self.accounts.lock().unwrap().push(account.clone());
        Ok(account)
    }

    async fn reset_login_token(&self, steam_id: &str) -> Result<Account, UpstreamError> {
        self.calls.lock().unwrap().reset.push(steam_id.to_owned());
        if let Some((_, message)) = self
            .failures
            .lock()
            .unwrap()
            .reset
            .iter()
            .find(|(id, _)| id == steam_id)
        {
            return Err(signaled("ResetLoginToken", message));
        }
        let n = self.next();
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .iter_mut()
            .find(|account| account.steam_id == steam_id)
            .ok_or_else(|| signaled("ResetLoginToken", "No such account"))?;
        account.login_token = format!("renewed-token-{}", n);
        account.is_expired = false;
        Ok(Account {
            steam_id: account.steam_id.clone(),
            login_token: account.login_token.clone(),
            ..Default::default()
        })
    }

    async fn delete_account(&self, steam_id: &str) -> Result<(), UpstreamError> {
        self.calls.lock().unwrap().delete.push(steam_id.to_owned());
        self.accounts.lock().unwrap().retain(|account| account.steam_id != steam_id);
        Ok(())
    }
}
