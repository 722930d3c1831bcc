use crate::helpers;
use serde_json::Value;

async fn walk_feed(app: &helpers::TestApp, base: &str, limit: i64) -> Vec<i64> {
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let endpoint = match &cursor {
            Some(c) => format!("{base}?limit={limit}&cursor={c}"),
            None => format!("{base}?limit={limit}"),
        };
        let response = app.send_get(&endpoint).await;
        assert_eq!(response.status().as_u16(), 200);
        let body: Value = response.json().await.unwrap();

        for item in body["items"].as_array().unwrap() {
            seen.push(item["id"].as_i64().unwrap());
        }

        match body["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    seen
}

#[tokio::test]
async fn the_latest_feed_pages_through_every_review_exactly_once() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let mut review_ids = Vec::new();
    for n in 0..5 {
        review_ids.push(app.create_sample_review(&format!("Feed review {n}")).await);
    }
    app.logout().await;

    let seen = walk_feed(&app, "v1/feed/latest", 2).await;

    // Newest first, no duplicates, no gaps
    review_ids.reverse();
    assert_eq!(seen, review_ids);
}

#[tokio::test]
async fn a_corrupted_cursor_falls_back_to_the_first_page() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Cursor-proof review").await;
    app.logout().await;

    let response = app
        .send_get("v1/feed/latest?cursor=not-valid-base64!!!")
        .await;
    assert_eq!(
        response.status().as_u16(),
        200,
        "A bad cursor must not fail the request"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["items"][0]["id"], review_id);
}

#[tokio::test]
async fn the_trending_feed_orders_by_like_count() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let quiet = app.create_sample_review("Quiet review").await;
    let popular = app.create_sample_review("Popular review").await;
    app.like_review(popular).await;

    let body: Value = app
        .send_get("v1/feed/trending?limit=10")
        .await
        .json()
        .await
        .unwrap();

    let items = body["items"].as_array().unwrap();
    assert_eq!(items[0]["id"], popular);
    assert_eq!(items[1]["id"], quiet);
}

#[tokio::test]
async fn drafts_never_show_up_in_the_feeds() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let published = app.create_sample_review("Published review").await;
    let drafted = app.create_sample_review("Drafted review").await;
    app.send_post(
        &format!("v1/review/me/status/{drafted}"),
        &serde_json::json!({ "status": "draft" }),
    )
    .await;
    app.logout().await;

    let seen = walk_feed(&app, "v1/feed/latest", 10).await;
    assert_eq!(seen, vec![published]);
}

#[tokio::test]
async fn the_personalized_feed_only_shows_followed_authors() {
    let app = helpers::spawn_app().await;

    // Another user writes a review
    let (other_login, other_id) = app.create_other_user().await;
    app.login_with(&other_login).await;
    let followed_review = app.create_sample_review("Followed author review").await;
    app.logout().await;

    // The test user writes one too and follows the other user
    app.login().await;
    let _own_review = app.create_sample_review("Own review").await;

    let body: Value = app
        .send_get("v1/feed/me/personalized")
        .await
        .json()
        .await
        .unwrap();
    assert!(
        body["items"].as_array().unwrap().is_empty(),
        "Nothing followed yet, the personalized feed should be empty"
    );

    let response = app.follow_user(&other_id).await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = app
        .send_get("v1/feed/me/personalized")
        .await
        .json()
        .await
        .unwrap();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], followed_review);
}

#[tokio::test]
async fn the_personalized_feed_requires_a_session() {
    let app = helpers::spawn_app().await;
    let response = app.send_get("v1/feed/me/personalized").await;
    assert_eq!(response.status().as_u16(), 401);
}
