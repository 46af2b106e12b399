// Wire contract of the Steam Web API client against a mocked IGameServersService.

#[cfg(test)]
mod test {

    use std::time::Duration;

    use httpmock::Method::{GET, POST};
    use httpmock::MockServer;
    use serde_json::json;

    use crate::config::settings::SteamConfig;
    use crate::error::{ServiceError, UpstreamError};
    use crate::steam::{AccountService, SteamClient};

    fn client(server: &MockServer, timeout_ms: u64) -> SteamClient {
        SteamClient::new(&SteamConfig {
            api_key: "test-key".to_owned(),
            base_url: server.base_url(),
            timeout_ms,
        })
        .expect("steam client")
    }

    #[tokio::test]
    async fn lists_accounts_with_api_key() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/GetAccountList/v1")
                    .query_param("key", "test-key");
                then.status(200).json_body(json!({
                    "response": {
                        "servers": [
                            {"steamid": "1", "appid": 730, "login_token": "A", "memo": "server1", "is_deleted": false, "is_expired": false, "rt_last_logon": 1700000000},
                            {"steamid": "2", "appid": 730, "login_token": "B", "memo": "server2", "is_expired": true}
                        ],
                        "is_banned": false,
                        "expires": 0,
                        "actor": "76561197960287930",
                        "last_action_time": 0
                    }
                }));
            })
            .await;

        let accounts = client(&server, 5000).list_accounts().await.unwrap();

        mock.assert_async().await;
        assert_eq!(accounts.len(), 2);
        assert_eq!(accounts[0].login_token, "A");
        assert!(accounts[1].is_expired);
    }

    #[tokio::test]
    async fn empty_account_list_has_no_servers_field() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/GetAccountList/v1");
                then.status(200).json_body(json!({"response": {"is_banned": false}}));
            })
            .await;

        assert!(client(&server, 5000).list_accounts().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn creates_and_resets_accounts_with_post() {
        let server = MockServer::start_async().await;
        let create = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/CreateAccount/v1")
                    .query_param("key", "test-key")
                    .query_param("appid", "730")
                    .query_param("memo", "eu west #1");
                then.status(200)
                    .json_body(json!({"response": {"steamid": "85568392920040000", "login_token": "NEW"}}));
            })
            .await;
        let reset = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/ResetLoginToken/v1")
                    .query_param("steamid", "85568392920040000");
                then.status(200)
                    .json_body(json!({"response": {"login_token": "RENEWED"}}));
            })
            .await;
        let steam = client(&server, 5000);

        let created = steam.create_account(730, "eu west #1").await.unwrap();
        assert_eq!(created.steam_id, "85568392920040000");
        assert_eq!(created.login_token, "NEW");

        let renewed = steam.reset_login_token(&created.steam_id).await.unwrap();
        assert_eq!(renewed.login_token, "RENEWED");

        create.assert_async().await;
        reset.assert_async().await;
    }

    #[tokio::test]
    async fn deletes_account() {
        let server = MockServer::start_async().await;
        let delete = server
            .mock_async(|when, then| {
                when.method(POST).path("/DeleteAccount/v1").query_param("steamid", "42");
                then.status(200).json_body(json!({"response": {}}));
            })
            .await;

        client(&server, 5000).delete_account("42").await.unwrap();
        delete.assert_async().await;
    }

    #[tokio::test]
    async fn error_header_is_a_failure_even_with_200() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/CreateAccount/v1");
                then.status(200)
                    .header("X-error_message", "Too many game server accounts")
                    .json_body(json!({"response": {}}));
            })
            .await;

        let err = client(&server, 5000).create_account(730, "x").await.unwrap_err();

        match err {
            UpstreamError::Signaled { operation, message } => {
                assert_eq!(operation, "CreateAccount");
                assert_eq!(message, "Too many game server accounts");
            }
            other => panic!("unexpected error {:?}", other),
        }
    }

    #[tokio::test]
    async fn non_success_status_is_a_failure() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/GetAccountList/v1");
                then.status(403).body("<html>Forbidden</html>");
            })
            .await;

        let err = client(&server, 5000).list_accounts().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Status { status, .. } if status.as_u16() == 403));
    }

    #[tokio::test]
    async fn malformed_body_is_a_failure_not_an_empty_list() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/GetAccountList/v1");
                then.status(200).body("{\"servers\": []}");
            })
            .await;

        let err = client(&server, 5000).list_accounts().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Decode(_)));
    }

    #[tokio::test]
    async fn slow_upstream_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/GetAccountList/v1");
                then.status(200)
                    .delay(Duration::from_millis(500))
                    .json_body(json!({"response": {"servers": []}}));
            })
            .await;

        let err = client(&server, 50).list_accounts().await.unwrap_err();
        assert!(matches!(err, UpstreamError::Transport(ref e) if e.is_timeout()));
    }

    #[test]
    fn missing_api_key_fails_fast() {
        let err = SteamClient::new(&SteamConfig::default()).unwrap_err();
        assert!(matches!(err, ServiceError::StartupConfiguration(_)));
    }
}
