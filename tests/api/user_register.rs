use crate::helpers;
use crate::helpers::TestUser;
use serde_json::Value;

#[tokio::test]
async fn register_returns_201_for_valid_input() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app
        .register_user(&serde_json::json!({
            "username": user.username,
            "email": user.email,
            "password": user.password,
            "display_name": "Weekend Wrencher",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 201);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["username"], user.username);
    assert_eq!(body["email"], user.email);
}

#[tokio::test]
async fn register_returns_400_for_a_malformed_email() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app
        .register_user(&serde_json::json!({
            "username": user.username,
            "email": "definitely-not-an-email",
            "password": user.password,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn register_returns_400_for_an_invalid_username() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    for bad_username in ["ab", "has space", "has:colon", &"x".repeat(31)] {
        let response = app
            .register_user(&serde_json::json!({
                "username": bad_username,
                "email": user.email,
                "password": user.password,
            }))
            .await;

        assert_eq!(
            response.status().as_u16(),
            400,
            "Expected 400 for username {bad_username:?}"
        );
    }
}

#[tokio::test]
async fn register_returns_409_when_the_email_is_taken() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app
        .register_user(&serde_json::json!({
            "username": user.username,
            "email": app.test_user.email,
            "password": user.password,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}

#[tokio::test]
async fn register_returns_409_when_the_username_is_taken() {
    let app = helpers::spawn_app().await;
    let user = TestUser::generate();

    let response = app
        .register_user(&serde_json::json!({
            "username": app.test_user.username,
            "email": user.email,
            "password": user.password,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 409);
}
