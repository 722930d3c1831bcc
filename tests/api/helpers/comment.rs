use crate::helpers::TestApp;
use reqwest::Response;
use serde_json::Value;

impl TestApp {
    pub async fn create_comment(&self, payload: &Value) -> Response {
        self.send_post("v1/comment/me/create", payload).await
    }

    /// Create a comment and return its id, panicking on failure.
    pub async fn create_comment_ok(&self, review_id: i64, parent_id: Option<i64>, content: &str) -> i64 {
        let response = self
            .create_comment(&serde_json::json!({
                "review_id": review_id,
                "parent_id": parent_id,
                "content": content,
            }))
            .await;
        assert_eq!(response.status().as_u16(), 201, "Failed to create comment");
        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }

    pub async fn get_comments(&self, review_id: i64) -> Response {
        self.send_get(&format!("v1/comment/get/review/{review_id}"))
            .await
    }

    pub async fn delete_comment(&self, review_id: i64, comment_id: i64) -> Response {
        self.send_delete(&format!("v1/comment/me/delete/{review_id}/{comment_id}"))
            .await
    }

    pub async fn like_comment(&self, review_id: i64, comment_id: i64) -> Response {
        self.send_post_empty(&format!("v1/comment/me/like/{review_id}/{comment_id}"))
            .await
    }
}
