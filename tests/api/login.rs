use crate::helpers;

#[tokio::test]
async fn login_succeeds_with_valid_credentials() {
    let app = helpers::spawn_app().await;

    let response = app
        .login_with(&serde_json::json!({
            "username": app.test_user.username,
            "password": app.test_user.password,
        }))
        .await;

    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn login_returns_401_for_a_wrong_password() {
    let app = helpers::spawn_app().await;

    let response = app
        .login_with(&serde_json::json!({
            "username": app.test_user.username,
            "password": "definitely-wrong-password",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn login_returns_401_for_an_unknown_username() {
    let app = helpers::spawn_app().await;

    let response = app
        .login_with(&serde_json::json!({
            "username": "nobody_here_by_that_name",
            "password": "irrelevant-password",
        }))
        .await;

    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn protected_routes_reject_requests_after_logout() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let response = app.send_get("v1/review/me/bookmarked").await;
    assert_eq!(response.status().as_u16(), 200);

    app.logout().await;

    let response = app.send_get("v1/review/me/bookmarked").await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn the_password_can_be_changed_and_used_on_the_next_login() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let new_password = "a-brand-new-password";
    let response = app
        .send_post(
            "v1/user/me/reset-password",
            &serde_json::json!({
                "current_password": app.test_user.password,
                "new_password": new_password,
            }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    app.logout().await;

    let response = app
        .login_with(&serde_json::json!({
            "username": app.test_user.username,
            "password": app.test_user.password,
        }))
        .await;
    assert_eq!(response.status().as_u16(), 401, "Old password must stop working");

    let response = app
        .login_with(&serde_json::json!({
            "username": app.test_user.username,
            "password": new_password,
        }))
        .await;
    assert_eq!(response.status().as_u16(), 200);
}

#[tokio::test]
async fn changing_the_password_requires_the_current_one() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let response = app
        .send_post(
            "v1/user/me/reset-password",
            &serde_json::json!({
                "current_password": "not-the-current-password",
                "new_password": "whatever-comes-next-1",
            }),
        )
        .await;

    assert_eq!(response.status().as_u16(), 401);
}
