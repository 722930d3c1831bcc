use crate::helpers::TestApp;
use reqwest::Response;
use serde_json::Value;

impl TestApp {
    /// Insert a catalog entry directly; the API exposes the catalog
    /// read-only.
    pub async fn seed_car(&self) -> i64 {
        let (id,): (i64,) = sqlx::query_as(
            r#"
            INSERT INTO cars (make, model, year, generation)
            VALUES ('Mazda', 'MX-5', 2019, 'ND2')
            RETURNING id
            "#,
        )
        .fetch_one(&self.db_pool)
        .await
        .expect("Failed to seed catalog car");
        id
    }

    pub fn sample_review_payload(car_id: i64, title: &str) -> Value {
        serde_json::json!({
            "car_id": car_id,
            "title": title,
            "content": "The clutch take-up is light and the shifter is precise. ".repeat(5),
            "rating": 8,
            "pros": "steering feel",
            "cons": "road noise",
        })
    }

    pub async fn create_review(&self, payload: &Value) -> Response {
        self.send_post("v1/review/me/create", payload).await
    }

    /// Create a published review against a fresh catalog car and return its
    /// id.
    pub async fn create_sample_review(&self, title: &str) -> i64 {
        let car_id = self.seed_car().await;
        let response = self
            .create_review(&Self::sample_review_payload(car_id, title))
            .await;
        assert_eq!(response.status().as_u16(), 201, "Failed to create review");
        let body: Value = response.json().await.unwrap();
        body["review_id"].as_i64().unwrap()
    }

    pub async fn get_review(&self, id: i64) -> Response {
        self.send_get(&format!("v1/review/get/{id}")).await
    }

    pub async fn like_review(&self, id: i64) -> Response {
        self.send_post_empty(&format!("v1/review/me/like/{id}"))
            .await
    }

    pub async fn bookmark_review(&self, id: i64) -> Response {
        self.send_post_empty(&format!("v1/review/me/bookmark/{id}"))
            .await
    }
}
