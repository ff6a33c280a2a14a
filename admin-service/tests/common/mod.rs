use std::net::SocketAddr;
use std::sync::Arc;

use admin_service::domain::admin::models::Username;
use admin_service::domain::admin::service::AdminService;
use admin_service::inbound::http::router::create_router;
use admin_service::outbound::InMemoryCredentialStore;
use auth::AuditSink;
use auth::Authenticator;
use auth::HashingCost;
use auth::LoginThrottle;
use auth::PasswordHasher;
use auth::SigningSecret;
use auth::TokenSettings;
use auth::TracingAuditSink;
use serde_json::json;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "Secur3!Pass";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub authenticator: Arc<Authenticator>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with_proxy_trust(false).await
    }

    /// Spawn an application that identifies clients by proxy headers
    pub async fn spawn_behind_proxy() -> Self {
        Self::spawn_with_proxy_trust(true).await
    }

    async fn spawn_with_proxy_trust(trust_proxy: bool) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = SigningSecret::new(TEST_SECRET).expect("Test secret rejected");

        // Minimum-cost hashing keeps the suite fast
        let hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Failed to build password hasher");

        let authenticator = Arc::new(
            Authenticator::new(&secret, TokenSettings::default()).with_password_hasher(hasher),
        );

        let admin_service = Arc::new(AdminService::new(
            Arc::new(InMemoryCredentialStore::new(
                Username::new(ADMIN_USERNAME.to_string()).unwrap(),
            )),
            Arc::clone(&authenticator),
            Arc::new(LoginThrottle::new()),
            Arc::new(TracingAuditSink::new()) as Arc<dyn AuditSink>,
        ));

        let router = create_router(admin_service, false, trust_proxy);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(
                listener,
                router.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            authenticator,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Complete first-time setup with the default credentials
    pub async fn setup_admin(&self) {
        let response = self
            .post("/api/auth/setup")
            .json(&json!({ "password": ADMIN_PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
    }

    /// Attempt a login and return the raw response
    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&json!({ "username": username, "password": password }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Log in with the default credentials and return the issued token
    pub async fn login_token(&self) -> String {
        let response = self.login(ADMIN_USERNAME, ADMIN_PASSWORD).await;
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: serde_json::Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("Missing token")
            .to_string()
    }
}
