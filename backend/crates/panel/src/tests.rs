//! Router-level tests for the panel crate
//!
//! Every port is replaced by an in-memory fake; requests go through the full
//! router with `tower::ServiceExt::oneshot`.

#[cfg(test)]
mod support {
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use axum::Router;
    use axum::body::Body;
    use axum::http::{HeaderMap, Request, Response, StatusCode, header};
    use tokio::sync::{Notify, mpsc};
    use tower::ServiceExt;

    use crate::domain::client_id::ClientId;
    use crate::domain::repository::{BackupNotifier, ClientExpiryRepository, SessionOracle};
    use crate::error::{PanelError, PanelResult};
    use crate::presentation::router::{ProtectedRoutes, panel_router_generic};

    pub const SESSION_COOKIE: &str = "3x-ui=valid";

    /// In-memory expiry resolver
    #[derive(Default)]
    pub struct FakeExpiryRepo {
        pub entries: HashMap<String, i64>,
        pub fail: bool,
        pub calls: Arc<AtomicUsize>,
        pub last_query: Arc<std::sync::Mutex<Option<String>>>,
    }

    impl FakeExpiryRepo {
        pub fn with(entries: &[(&str, i64)]) -> Self {
            Self {
                entries: entries
                    .iter()
                    .map(|(id, expiry)| (id.to_string(), *expiry))
                    .collect(),
                ..Self::default()
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }
    }

    impl ClientExpiryRepository for FakeExpiryRepo {
        async fn find_expiry(&self, client_id: &ClientId) -> PanelResult<Option<i64>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_query.lock().unwrap() = Some(client_id.to_string());
            if self.fail {
                return Err(PanelError::Internal(
                    "connection to 10.0.0.7:5432 refused".to_string(),
                ));
            }
            Ok(self.entries.get(client_id.as_str()).copied())
        }
    }

    /// Notifier reporting each call on a channel, optionally blocking first
    pub struct FakeNotifier {
        pub sent: mpsc::UnboundedSender<()>,
        pub release: Option<Arc<Notify>>,
    }

    impl BackupNotifier for FakeNotifier {
        async fn send_backup_to_admins(&self) -> PanelResult<()> {
            if let Some(release) = &self.release {
                release.notified().await;
            }
            let _ = self.sent.send(());
            Ok(())
        }
    }

    /// Accepts exactly the cookie `3x-ui=valid`
    pub struct FakeOracle;

    impl SessionOracle for FakeOracle {
        async fn is_authenticated(&self, headers: &HeaderMap) -> bool {
            platform::cookie::extract_cookie(headers, "3x-ui").as_deref() == Some("valid")
        }
    }

    pub struct TestApp {
        pub router: Router,
        pub backups: mpsc::UnboundedReceiver<()>,
        pub resolver_calls: Arc<AtomicUsize>,
        pub last_query: Arc<std::sync::Mutex<Option<String>>>,
    }

    pub struct TestAppBuilder {
        repo: FakeExpiryRepo,
        release: Option<Arc<Notify>>,
        base_path: String,
        protected: ProtectedRoutes,
    }

    impl TestAppBuilder {
        pub fn new(repo: FakeExpiryRepo) -> Self {
            Self {
                repo,
                release: None,
                base_path: "/".to_string(),
                protected: ProtectedRoutes::default(),
            }
        }

        pub fn blocking_backup(mut self, release: Arc<Notify>) -> Self {
            self.release = Some(release);
            self
        }

        pub fn base_path(mut self, base_path: &str) -> Self {
            self.base_path = base_path.to_string();
            self
        }

        pub fn protected(mut self, protected: ProtectedRoutes) -> Self {
            self.protected = protected;
            self
        }

        pub fn build(self) -> TestApp {
            let (tx, rx) = mpsc::unbounded_channel();
            let resolver_calls = self.repo.calls.clone();
            let last_query = self.repo.last_query.clone();
            let notifier = FakeNotifier {
                sent: tx,
                release: self.release,
            };

            TestApp {
                router: panel_router_generic(
                    self.repo,
                    notifier,
                    FakeOracle,
                    &self.base_path,
                    self.protected,
                ),
                backups: rx,
                resolver_calls,
                last_query,
            }
        }
    }

    impl TestApp {
        pub fn resolver_calls(&self) -> usize {
            self.resolver_calls.load(Ordering::SeqCst)
        }

        pub async fn get(&self, uri: &str) -> Response<Body> {
            self.send(uri, None).await
        }

        pub async fn get_with_session(&self, uri: &str) -> Response<Body> {
            self.send(uri, Some(SESSION_COOKIE)).await
        }

        pub async fn get_with_cookie(&self, uri: &str, cookie: &str) -> Response<Body> {
            self.send(uri, Some(cookie)).await
        }

        async fn send(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
            let mut request = Request::builder().method("GET").uri(uri);
            if let Some(cookie) = cookie {
                request = request.header(header::COOKIE, cookie);
            }
            self.router
                .clone()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap()
        }
    }

    pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    pub async fn json_body(response: Response<Body>) -> serde_json::Value {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    pub fn now_ms() -> i64 {
        chrono::Utc::now().timestamp_millis()
    }

    pub fn assert_status(response: &Response<Body>, status: StatusCode) {
        assert_eq!(response.status(), status, "unexpected status for response");
    }
}

#[cfg(test)]
mod auth_gate_tests {
    use super::support::*;
    use axum::Router;
    use axum::http::StatusCode;
    use axum::routing::get;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::presentation::router::ProtectedRoutes;

    fn counting_inbounds(hits: Arc<AtomicUsize>) -> Router {
        Router::new().route(
            "/list",
            get(move || {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    "inbound list"
                }
            }),
        )
    }

    #[tokio::test]
    async fn test_backup_without_session_is_hidden() {
        let mut app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        let response = app.get("/panel/api/backuptotgbot").await;

        assert_status(&response, StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
        assert!(
            tokio::time::timeout(Duration::from_millis(50), app.backups.recv())
                .await
                .is_err(),
            "backup must not be triggered without a session"
        );
    }

    #[tokio::test]
    async fn test_invalid_session_is_hidden() {
        let app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        let response = app
            .get_with_cookie("/panel/api/backuptotgbot", "3x-ui=forged")
            .await;

        assert_status(&response, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gated_subrouter_without_session_never_runs() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = TestAppBuilder::new(FakeExpiryRepo::default())
            .protected(ProtectedRoutes {
                inbounds: counting_inbounds(hits.clone()),
                ..ProtectedRoutes::default()
            })
            .build();

        let response = app.get("/panel/api/inbounds/list").await;

        assert_status(&response, StatusCode::NOT_FOUND);
        assert!(body_bytes(response).await.is_empty());
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_gated_subrouter_with_session_passes_through() {
        let hits = Arc::new(AtomicUsize::new(0));
        let app = TestAppBuilder::new(FakeExpiryRepo::default())
            .protected(ProtectedRoutes {
                inbounds: counting_inbounds(hits.clone()),
                ..ProtectedRoutes::default()
            })
            .build();

        let response = app.get_with_session("/panel/api/inbounds/list").await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"inbound list");
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_unknown_and_protected_paths_look_the_same() {
        let app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        let existing = app.get("/panel/api/backuptotgbot").await;
        let missing = app.get("/panel/api/does-not-exist").await;
        let missing_server = app.get("/panel/api/server/status").await;

        assert_eq!(existing.status(), missing.status());
        assert_eq!(existing.status(), missing_server.status());
        assert_status(&existing, StatusCode::NOT_FOUND);

        let missing_with_session = app.get_with_session("/panel/api/does-not-exist").await;
        assert_status(&missing_with_session, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_gate_never_answers_401_or_403() {
        let app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        for uri in [
            "/panel/api/backuptotgbot",
            "/panel/api/inbounds/list",
            "/panel/api/server/status",
        ] {
            let status = app.get(uri).await.status();
            assert_ne!(status, StatusCode::UNAUTHORIZED, "{uri}");
            assert_ne!(status, StatusCode::FORBIDDEN, "{uri}");
        }
    }
}

#[cfg(test)]
mod backup_relay_tests {
    use super::support::*;
    use axum::http::StatusCode;
    use std::sync::Arc;
    use std::time::Duration;
    use tokio::sync::Notify;

    #[tokio::test]
    async fn test_backup_with_session_triggers_notifier() {
        let mut app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        let response = app.get_with_session("/panel/api/backuptotgbot").await;

        assert_status(&response, StatusCode::OK);
        assert!(body_bytes(response).await.is_empty());

        tokio::time::timeout(Duration::from_secs(2), app.backups.recv())
            .await
            .expect("notifier should run")
            .expect("channel open");
    }

    #[tokio::test]
    async fn test_backup_responds_before_delivery_finishes() {
        let release = Arc::new(Notify::new());
        let mut app = TestAppBuilder::new(FakeExpiryRepo::default())
            .blocking_backup(release.clone())
            .build();

        let response = tokio::time::timeout(
            Duration::from_secs(2),
            app.get_with_session("/panel/api/backuptotgbot"),
        )
        .await
        .expect("handler must not wait for delivery");
        assert_status(&response, StatusCode::OK);

        // delivery is still parked
        assert!(app.backups.try_recv().is_err());

        release.notify_one();
        tokio::time::timeout(Duration::from_secs(2), app.backups.recv())
            .await
            .expect("delivery should complete after release")
            .expect("channel open");
    }
}

#[cfg(test)]
mod client_expiry_tests {
    use super::support::*;
    use crate::domain::expiry::MILLIS_PER_DAY;
    use axum::http::StatusCode;

    const CLIENT: &str = "9a1f3c2e-5b6d-4e7f-8a9b-0c1d2e3f4a5b";

    #[tokio::test]
    async fn test_missing_uuid_is_bad_request() {
        let app = TestAppBuilder::new(FakeExpiryRepo::default()).build();

        for uri in [
            "/panel/api/public/client-expiry",
            "/panel/api/public/client-expiry?uuid=",
            "/panel/api/public/client-expiry?uuid=%20%20",
            "/panel/api/public/client-expiry/%20?uuid=%09",
        ] {
            let response = app.get(uri).await;
            assert_status(&response, StatusCode::BAD_REQUEST);

            let body = json_body(response).await;
            assert_eq!(body["success"], false, "{uri}");
            assert_eq!(body["msg"], "uuid is required", "{uri}");
        }

        assert_eq!(app.resolver_calls(), 0);
    }

    #[tokio::test]
    async fn test_unknown_uuid_is_not_found() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, 0)])).build();

        let response = app
            .get("/panel/api/public/client-expiry/00000000-0000-0000-0000-000000000000")
            .await;

        assert_status(&response, StatusCode::NOT_FOUND);
        let body = json_body(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["msg"], "uuid not found");
    }

    #[tokio::test]
    async fn test_resolver_failure_is_generic_500() {
        let app = TestAppBuilder::new(FakeExpiryRepo::failing()).build();

        let response = app
            .get(&format!("/panel/api/public/client-expiry?uuid={CLIENT}"))
            .await;

        assert_status(&response, StatusCode::INTERNAL_SERVER_ERROR);
        let raw = body_bytes(response).await;
        let body: serde_json::Value = serde_json::from_slice(&raw).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["msg"], "failed to query expiry time");
        assert!(body["obj"].is_null());
        assert!(!String::from_utf8_lossy(&raw).contains("10.0.0.7"));
        assert_eq!(app.resolver_calls(), 1);
    }

    #[tokio::test]
    async fn test_no_expiry_configured() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, 0)])).build();

        let response = app
            .get(&format!("/panel/api/public/client-expiry/{CLIENT}"))
            .await;

        assert_status(&response, StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["success"], true);

        let obj = body["obj"].as_object().unwrap();
        assert_eq!(obj["uuid"], CLIENT);
        assert_eq!(obj["expiryTime"], 0);
        assert_eq!(obj["expired"], false);
        assert!(!obj.contains_key("expiryDate"));
        assert!(!obj.contains_key("daysRemaining"));
    }

    #[tokio::test]
    async fn test_future_expiry() {
        let expiry = now_ms() + 10 * MILLIS_PER_DAY + 3_600_000;
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, expiry)])).build();

        let response = app
            .get(&format!("/panel/api/public/client-expiry?uuid={CLIENT}"))
            .await;

        assert_status(&response, StatusCode::OK);
        let obj = json_body(response).await["obj"].clone();
        let expected_date = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(expiry)
            .unwrap()
            .format("%Y-%m-%d")
            .to_string();

        assert_eq!(obj["expiryTime"], expiry);
        assert_eq!(obj["expiryDate"], expected_date);
        assert_eq!(obj["daysRemaining"], 11);
        assert_eq!(obj["expired"], false);
    }

    #[tokio::test]
    async fn test_past_expiry() {
        let expiry = now_ms() - 2 * MILLIS_PER_DAY - 3_600_000;
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, expiry)])).build();

        let response = app
            .get(&format!("/panel/api/public/client-expiry/{CLIENT}"))
            .await;

        assert_status(&response, StatusCode::OK);
        let obj = json_body(response).await["obj"].clone();
        assert_eq!(obj["daysRemaining"], -2);
        assert_eq!(obj["expired"], true);
    }

    #[tokio::test]
    async fn test_path_identifier_wins_over_query() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("from-path", 0), ("from-query", 0)]))
            .build();

        let response = app
            .get("/panel/api/public/client-expiry/from-path?uuid=from-query")
            .await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(json_body(response).await["obj"]["uuid"], "from-path");
    }

    #[tokio::test]
    async fn test_blank_path_falls_back_to_trimmed_query() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("from-query", 0)])).build();

        let response = app
            .get("/panel/api/public/client-expiry/%20%20?uuid=%20from-query%20")
            .await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(json_body(response).await["obj"]["uuid"], "from-query");
        assert_eq!(
            app.last_query.lock().unwrap().as_deref(),
            Some("from-query")
        );
    }

    #[tokio::test]
    async fn test_repeated_query_uuid_does_not_reject_path_lookup() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("p", 0), ("a", 0)])).build();

        let response = app
            .get("/panel/api/public/client-expiry/p?uuid=a&uuid=b")
            .await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(json_body(response).await["obj"]["uuid"], "p");
    }

    #[tokio::test]
    async fn test_repeated_query_uuid_first_value_wins() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("a", 0), ("b", 0)])).build();

        let response = app
            .get("/panel/api/public/client-expiry?uuid=a&uuid=b")
            .await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(json_body(response).await["obj"]["uuid"], "a");
    }

    #[tokio::test]
    async fn test_malformed_query_does_not_reject_path_lookup() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("p", 0)])).build();

        let response = app
            .get("/panel/api/public/client-expiry/p?x=%FF%FE&%zz")
            .await;

        assert_status(&response, StatusCode::OK);
        assert_eq!(json_body(response).await["obj"]["uuid"], "p");
    }

    #[tokio::test]
    async fn test_undecodable_path_uses_query_or_enveloped_400() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[("from-query", 0)])).build();

        let fallback = app
            .get("/panel/api/public/client-expiry/%FF?uuid=from-query")
            .await;
        assert_status(&fallback, StatusCode::OK);
        assert_eq!(json_body(fallback).await["obj"]["uuid"], "from-query");

        let missing = app.get("/panel/api/public/client-expiry/%FF").await;
        assert_status(&missing, StatusCode::BAD_REQUEST);
        let body = json_body(missing).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["msg"], "uuid is required");
        assert!(body["obj"].is_null());
    }

    #[tokio::test]
    async fn test_trailing_slash_behaves_like_query_form() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, 0)])).build();

        let found = app
            .get(&format!("/panel/api/public/client-expiry/?uuid={CLIENT}"))
            .await;
        assert_status(&found, StatusCode::OK);
        assert_eq!(json_body(found).await["obj"]["uuid"], CLIENT);

        let missing = app.get("/panel/api/public/client-expiry/").await;
        assert_status(&missing, StatusCode::BAD_REQUEST);
        assert_eq!(json_body(missing).await["msg"], "uuid is required");
    }

    #[tokio::test]
    async fn test_public_endpoint_ignores_session() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, 0)])).build();

        let anonymous = app
            .get(&format!("/panel/api/public/client-expiry/{CLIENT}"))
            .await;
        let logged_in = app
            .get_with_session(&format!("/panel/api/public/client-expiry/{CLIENT}"))
            .await;

        assert_status(&anonymous, StatusCode::OK);
        assert_status(&logged_in, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_routes_mounted_under_base_path() {
        let app = TestAppBuilder::new(FakeExpiryRepo::with(&[(CLIENT, 0)]))
            .base_path("/xui/")
            .build();

        let mounted = app
            .get(&format!("/xui/panel/api/public/client-expiry/{CLIENT}"))
            .await;
        let unmounted = app
            .get(&format!("/panel/api/public/client-expiry/{CLIENT}"))
            .await;
        let gated = app.get("/xui/panel/api/backuptotgbot").await;
        let gated_ok = app.get_with_session("/xui/panel/api/backuptotgbot").await;

        assert_status(&mounted, StatusCode::OK);
        assert_status(&unmounted, StatusCode::NOT_FOUND);
        assert_status(&gated, StatusCode::NOT_FOUND);
        assert_status(&gated_ok, StatusCode::OK);
    }
}

#[cfg(test)]
mod error_tests {
    use crate::error::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use kernel::error::app_error::AppError;

    #[test]
    fn test_error_into_response_status_codes() {
        let test_cases: Vec<(PanelError, StatusCode)> = vec![
            (PanelError::ClientIdRequired, StatusCode::BAD_REQUEST),
            (PanelError::ClientNotFound, StatusCode::NOT_FOUND),
            (
                PanelError::ExpiryQueryFailed(Box::new(PanelError::Internal("x".into()))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PanelError::Internal("test".into()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                PanelError::Io(std::io::Error::other("disk")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected_status) in test_cases {
            assert_eq!(error.status_code(), expected_status);
            let response = error.into_response();
            assert_eq!(
                response.status(),
                expected_status,
                "Error should return correct status code"
            );
        }
    }

    #[test]
    fn test_public_messages_do_not_leak_detail() {
        let err = PanelError::Internal("password=hunter2".into());
        assert_eq!(err.public_message(), "Internal Server Error");

        let err = PanelError::ExpiryQueryFailed(Box::new(PanelError::Internal(
            "password=hunter2".into(),
        )));
        assert_eq!(err.public_message(), "failed to query expiry time");
    }

    #[test]
    fn test_conversion_to_app_error_keeps_source() {
        let app_error: AppError = PanelError::ClientNotFound.into();
        assert_eq!(app_error.status_code(), 404);
        assert_eq!(app_error.message(), "uuid not found");
        assert!(std::error::Error::source(&app_error).is_some());
    }
}
