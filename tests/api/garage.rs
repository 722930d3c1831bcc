use crate::helpers;
use serde_json::Value;

impl helpers::TestApp {
    async fn add_garage_car(&self, car_id: i64, nickname: &str) -> i64 {
        let response = self
            .send_post(
                "v1/garage/me/create",
                &serde_json::json!({
                    "car_id": car_id,
                    "nickname": nickname,
                    "mileage": 42_000,
                }),
            )
            .await;
        assert_eq!(response.status().as_u16(), 201, "Failed to add garage car");
        let body: Value = response.json().await.unwrap();
        body["id"].as_i64().unwrap()
    }
}

#[tokio::test]
async fn adding_a_car_returns_201_with_the_catalog_entry_embedded() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let car_id = app.seed_car().await;
    let response = app
        .send_post(
            "v1/garage/me/create",
            &serde_json::json!({
                "car_id": car_id,
                "nickname": "weekend toy",
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nickname"], "weekend toy");
    assert_eq!(body["is_active"], false);
    assert_eq!(body["car"]["make"], "Mazda");
    assert_eq!(body["car"]["id"], car_id);
}

#[tokio::test]
async fn adding_a_car_outside_the_catalog_returns_400() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let response = app
        .send_post(
            "v1/garage/me/create",
            &serde_json::json!({ "car_id": 999_999 }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn the_garage_requires_a_session() {
    let app = helpers::spawn_app().await;

    let response = app.send_get("v1/garage/me").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn activating_a_car_deactivates_the_previous_one() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let car_id = app.seed_car().await;
    let first = app.add_garage_car(car_id, "first car").await;
    let second = app.add_garage_car(car_id, "second car").await;

    let response = app
        .send_post_empty(&format!("v1/garage/me/activate/{first}"))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let response = app
        .send_post_empty(&format!("v1/garage/me/activate/{second}"))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = app.send_get("v1/garage/me").await.json().await.unwrap();
    let cars = body["cars"].as_array().unwrap();
    assert_eq!(cars.len(), 2);

    // The active car sorts first and is the only active one
    assert_eq!(cars[0]["id"], second);
    assert_eq!(cars[0]["is_active"], true);
    assert_eq!(cars[1]["is_active"], false);
}

#[tokio::test]
async fn updating_replaces_the_editable_fields() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let car_id = app.seed_car().await;
    let garage_car_id = app.add_garage_car(car_id, "before rename").await;

    let response = app
        .send_patch(
            &format!("v1/garage/me/update/{garage_car_id}"),
            &serde_json::json!({ "nickname": "after rename" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["nickname"], "after rename");
    // Omitted fields clear
    assert!(body["mileage"].is_null());
}

#[tokio::test]
async fn touching_someone_elses_garage_car_returns_403() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let car_id = app.seed_car().await;
    let garage_car_id = app.add_garage_car(car_id, "mine").await;

    let (other_login, _) = app.create_other_user().await;
    app.logout().await;
    app.login_with(&other_login).await;

    let response = app
        .send_delete(&format!("v1/garage/me/delete/{garage_car_id}"))
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

#[tokio::test]
async fn removing_a_car_empties_the_garage() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let car_id = app.seed_car().await;
    let garage_car_id = app.add_garage_car(car_id, "short-lived").await;

    let response = app
        .send_delete(&format!("v1/garage/me/delete/{garage_car_id}"))
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = app.send_get("v1/garage/me").await.json().await.unwrap();
    assert!(body["cars"].as_array().unwrap().is_empty());
}
