use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::Client;
use serde_json::{Value, json};

use blogcollab_server::config::{
    AppConfig, AuthConfig, CorsConfig, DatabaseConfig, MailConfig, ServerConfig,
};
use blogcollab_server::mailer::{Email, MemoryMailer};
use blogcollab_server::state::AppState;
use blogcollab_server::store::{ContentStore, MemoryStore};

pub mod routes {
    pub const REGISTER: &str = "/api/v1/auth/register";
    pub const LOGIN: &str = "/api/v1/auth/login";
    pub const ME: &str = "/api/v1/auth/me";
    pub const FORGOT_PASSWORD: &str = "/api/v1/auth/forgot-password";
    pub const RESET_PASSWORD: &str = "/api/v1/auth/reset-password";
    pub const BLOGS: &str = "/api/v1/blogs";
    pub const SUGGESTIONS: &str = "/api/v1/suggestions";
    pub const MY_SUGGESTIONS: &str = "/api/v1/suggestions/mine";
    pub const PENDING_EDITS: &str = "/api/v1/pending-edits";
    pub const NOTIFICATIONS: &str = "/api/v1/notifications";
    pub const NOTIFICATION_COUNT: &str = "/api/v1/notifications/count";
    pub const NOTIFICATIONS_READ_ALL: &str = "/api/v1/notifications/read-all";
    pub const COMMENTS: &str = "/api/v1/comments";

    pub fn verify_email(token: &str) -> String {
        format!("/api/v1/auth/verify-email/{token}")
    }

    pub fn blog(id: i32) -> String {
        format!("/api/v1/blogs/{id}")
    }

    pub fn blog_suggestions(id: i32) -> String {
        format!("/api/v1/blogs/{id}/suggestions")
    }

    pub fn suggestion(id: i32) -> String {
        format!("/api/v1/suggestions/{id}")
    }

    pub fn notification_read(id: i32) -> String {
        format!("/api/v1/notifications/{id}/read")
    }

    pub fn comments_for(blog_id: i32) -> String {
        format!("/api/v1/comments?blog_id={blog_id}")
    }

    pub fn comment(id: i32) -> String {
        format!("/api/v1/comments/{id}")
    }
}

pub struct TestApp {
    pub addr: SocketAddr,
    pub client: Client,
    pub store: Arc<MemoryStore>,
    pub mailer: Arc<MemoryMailer>,
}

/// Parsed HTTP response for test assertions.
pub struct TestResponse {
    pub status: u16,
    /// Raw response body as text.
    pub text: String,
    /// Parsed JSON body, or `Null` if the response is not valid JSON.
    pub body: Value,
}

/// A registered, logged-in account.
pub struct TestUser {
    pub id: i32,
    pub token: String,
}

pub fn test_config(require_verified_email: bool) -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors: CorsConfig {
                allow_origins: vec![],
                max_age: 3600,
            },
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
        },
        auth: AuthConfig {
            jwt_secret: "test-secret-for-integration-tests".to_string(),
            token_ttl_days: 1,
            require_verified_email,
            reset_token_ttl_minutes: 60,
        },
        mail: MailConfig {
            app_url: "http://blogcollab.test".to_string(),
        },
    }
}

impl TestApp {
    /// Spawn with email verification switched off, so fresh accounts can log in.
    pub async fn spawn() -> Self {
        Self::spawn_with(test_config(false)).await
    }

    pub async fn spawn_with(config: AppConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let mailer = Arc::new(MemoryMailer::new());
        let state = AppState {
            store: store.clone() as Arc<dyn ContentStore>,
            mailer: mailer.clone(),
            config,
        };
        let app = blogcollab_server::build_router(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            addr,
            client: Client::new(),
            store,
            mailer,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub async fn post_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn post_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send POST request");

        TestResponse::from_response(res).await
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn get_without_token(&self, path: &str) -> TestResponse {
        let res = self
            .client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to send GET request");

        TestResponse::from_response(res).await
    }

    pub async fn put_with_token(&self, path: &str, body: &Value, token: &str) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn put_without_token(&self, path: &str, body: &Value) -> TestResponse {
        let res = self
            .client
            .put(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to send PUT request");

        TestResponse::from_response(res).await
    }

    pub async fn delete_with_token(&self, path: &str, token: &str) -> TestResponse {
        let res = self
            .client
            .delete(self.url(path))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("Failed to send DELETE request");

        TestResponse::from_response(res).await
    }

    /// Register `username` (email `<username>@example.com`, password
    /// `securepass`) and log in.
    pub async fn create_user(&self, username: &str) -> TestUser {
        let reg = self
            .post_without_token(
                routes::REGISTER,
                &json!({
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "full_name": format!("{username} Example"),
                    "password": "securepass",
                }),
            )
            .await;
        assert_eq!(reg.status, 201, "Registration failed: {}", reg.text);

        TestUser {
            id: reg.id(),
            token: self.login(&format!("{username}@example.com"), "securepass").await,
        }
    }

    pub async fn login(&self, email: &str, password: &str) -> String {
        let res = self
            .post_without_token(
                routes::LOGIN,
                &json!({"email": email, "password": password}),
            )
            .await;
        assert_eq!(res.status, 200, "Login failed: {}", res.text);

        res.body["token"]
            .as_str()
            .expect("Login response should contain a token")
            .to_string()
    }

    /// Create a published blog titled "A" with content "x" and return its id.
    pub async fn create_published_blog(&self, token: &str) -> i32 {
        self.create_blog(token, "published").await
    }

    pub async fn create_blog(&self, token: &str, status: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::BLOGS,
                &json!({
                    "title": "A",
                    "content": "x",
                    "excerpt": "short",
                    "category": "general",
                    "status": status,
                }),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "create_blog failed: {}", res.text);
        res.id()
    }

    /// Propose title "B" / content "y" on `blog_id` and return the suggestion id.
    pub async fn propose(&self, blog_id: i32, token: &str) -> i32 {
        let res = self
            .post_with_token(
                routes::SUGGESTIONS,
                &json!({"blog_id": blog_id, "title": "B", "content": "y"}),
                token,
            )
            .await;
        assert_eq!(res.status, 201, "propose failed: {}", res.text);
        res.id()
    }

    /// Messages the app has sent to `to`, oldest first.
    pub fn emails_to(&self, to: &str) -> Vec<Email> {
        self.mailer
            .sent()
            .into_iter()
            .filter(|e| e.to == to)
            .collect()
    }
}

impl TestResponse {
    pub async fn from_response(res: reqwest::Response) -> Self {
        let status = res.status().as_u16();
        let text = res.text().await.unwrap_or_default();
        let body = serde_json::from_str(&text).unwrap_or(Value::Null);
        Self { status, text, body }
    }

    pub fn id(&self) -> i32 {
        self.body["id"]
            .as_i64()
            .expect("response body should contain 'id'") as i32
    }
}

/// Pull the token out of the first link in an email body.
pub fn token_from_link(email: &Email) -> String {
    email
        .body
        .split_whitespace()
        .find(|w| w.starts_with("http"))
        .and_then(|link| link.rsplit('/').next())
        .expect("email should contain a link")
        .to_string()
}
