use crate::helpers;
use serde_json::Value;

#[tokio::test]
async fn following_toggles_on_and_off() {
    let app = helpers::spawn_app().await;
    let (_, other_id) = app.create_other_user().await;
    app.login().await;

    let body: Value = app.follow_user(&other_id).await.json().await.unwrap();
    assert_eq!(body["following"], true);

    let body: Value = app.follow_user(&other_id).await.json().await.unwrap();
    assert_eq!(body["following"], false);
}

#[tokio::test]
async fn following_yourself_returns_400() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let response = app.follow_user(&app.test_user.user_id).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn following_a_missing_user_returns_404() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let response = app.follow_user(&uuid::Uuid::new_v4()).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn follow_requires_a_session() {
    let app = helpers::spawn_app().await;
    let (_, other_id) = app.create_other_user().await;

    let response = app.follow_user(&other_id).await;
    assert_eq!(response.status().as_u16(), 401);
}

#[tokio::test]
async fn follow_status_reflects_the_current_edge() {
    let app = helpers::spawn_app().await;
    let (_, other_id) = app.create_other_user().await;

    // Anonymous callers never follow anyone
    let body: Value = app
        .send_get(&format!("v1/user/{other_id}/follow-status"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["following"], false);

    app.login().await;
    app.follow_user(&other_id).await;

    let body: Value = app
        .send_get(&format!("v1/user/{other_id}/follow-status"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["following"], true);
}

#[tokio::test]
async fn follower_and_following_listings_see_the_new_edge() {
    let app = helpers::spawn_app().await;
    let (_, other_id) = app.create_other_user().await;
    app.login().await;
    app.follow_user(&other_id).await;

    let my_id = app.test_user.user_id;

    let body: Value = app
        .send_get(&format!("v1/user/{other_id}/followers"))
        .await
        .json()
        .await
        .unwrap();
    let followers = body["items"].as_array().unwrap();
    assert_eq!(followers.len(), 1);
    assert_eq!(followers[0]["username"], app.test_user.username);

    let body: Value = app
        .send_get(&format!("v1/user/{my_id}/following"))
        .await
        .json()
        .await
        .unwrap();
    let following = body["items"].as_array().unwrap();
    assert_eq!(following.len(), 1);
    assert_eq!(following[0]["id"], other_id.to_string());
}

#[tokio::test]
async fn profile_counts_track_follow_edges() {
    let app = helpers::spawn_app().await;
    let (other_login, other_id) = app.create_other_user().await;
    app.login().await;
    app.follow_user(&other_id).await;

    let my_profile: Value = app
        .send_get(&format!("v1/user/profile/{}", app.test_user.username))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(my_profile["follower_count"], 0);
    assert_eq!(my_profile["following_count"], 1);

    let other_username = other_login["username"].as_str().unwrap();
    let other_profile: Value = app
        .send_get(&format!("v1/user/profile/{other_username}"))
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(other_profile["follower_count"], 1);
    assert_eq!(other_profile["following_count"], 0);
}

#[tokio::test]
async fn followers_listing_pages_with_cursors() {
    let app = helpers::spawn_app().await;

    // Three different users follow the test user
    let mut follower_usernames = Vec::new();
    for _ in 0..3 {
        let (login, _) = app.create_other_user().await;
        app.login_with(&login).await;
        app.follow_user(&app.test_user.user_id).await;
        follower_usernames.push(login["username"].as_str().unwrap().to_string());
        app.logout().await;
    }

    let target = app.test_user.user_id;
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let endpoint = match &cursor {
            Some(c) => format!("v1/user/{target}/followers?limit=2&cursor={c}"),
            None => format!("v1/user/{target}/followers?limit=2"),
        };
        let body: Value = app.send_get(&endpoint).await.json().await.unwrap();

        for item in body["items"].as_array().unwrap() {
            seen.push(item["username"].as_str().unwrap().to_string());
        }

        match body["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    // Newest follower first, each exactly once
    follower_usernames.reverse();
    assert_eq!(seen, follower_usernames);
}
