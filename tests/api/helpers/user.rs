use crate::helpers::{TestApp, TestUser};
use reqwest::Response;
use serde_json::Value;
use uuid::Uuid;

impl TestApp {
    pub async fn register_user(&self, payload: &Value) -> Response {
        self.send_post("v1/user/register", payload).await
    }

    pub async fn login(&self) {
        let payload = serde_json::json!({
            "username": self.test_user.username,
            "password": self.test_user.password,
        });
        let response = self.login_with(&payload).await;
        assert_eq!(response.status().as_u16(), 200, "Failed to log in");
    }

    pub async fn login_with(&self, payload: &Value) -> Response {
        self.send_post("v1/user/login", payload).await
    }

    pub async fn logout(&self) {
        let response = self.send_post_empty("v1/user/me/logout").await;
        assert_eq!(response.status().as_u16(), 200, "Failed to log out");
    }

    /// Register a second user through the API and return the credentials
    /// payload `login_with` expects, plus the new user's id.
    pub async fn create_other_user(&self) -> (Value, Uuid) {
        let other = TestUser::generate();
        let response = self
            .register_user(&serde_json::json!({
                "username": other.username,
                "email": other.email,
                "password": other.password,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201, "Failed to register user");
        let body: Value = response.json().await.unwrap();
        let id = Uuid::parse_str(body["id"].as_str().unwrap()).unwrap();

        let payload = serde_json::json!({
            "username": other.username,
            "password": other.password,
        });
        (payload, id)
    }

    pub async fn follow_user(&self, user_id: &Uuid) -> Response {
        self.send_post_empty(&format!("v1/user/me/follow/{user_id}"))
            .await
    }
}
