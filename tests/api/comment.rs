use crate::helpers;
use serde_json::Value;

// ============================================================================
// Create Comment
// ============================================================================

#[tokio::test]
async fn create_comment_returns_201_for_valid_input() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Comment target review").await;

    let payload = serde_json::json!({
        "review_id": review_id,
        "content": "Did the rev hang ever bother you?"
    });

    let response = app.create_comment(&payload).await;
    assert_eq!(
        response.status().as_u16(),
        201,
        "Expected 201 Created for valid comment creation"
    );

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["review_id"], review_id);
    assert_eq!(body["content"], "Did the rev hang ever bother you?");
    assert_eq!(body["parent_id"], Value::Null);
    assert!(body["replies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn create_comment_increments_the_review_comment_count() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Counted review").await;
    app.create_comment_ok(review_id, None, "first").await;
    app.create_comment_ok(review_id, None, "second").await;

    let body: Value = app.get_review(review_id).await.json().await.unwrap();
    assert_eq!(body["stats"]["comment_count"], 2);
}

#[tokio::test]
async fn replying_to_a_comment_from_another_review_returns_400() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_a = app.create_sample_review("Review A").await;
    let review_b = app.create_sample_review("Review B").await;
    let foreign_parent = app.create_comment_ok(review_a, None, "on review A").await;

    let payload = serde_json::json!({
        "review_id": review_b,
        "parent_id": foreign_parent,
        "content": "reply across reviews"
    });

    let response = app.create_comment(&payload).await;
    assert_eq!(
        response.status().as_u16(),
        400,
        "Expected 400 when the parent belongs to a different review"
    );
}

#[tokio::test]
async fn commenting_on_a_missing_review_returns_404() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let payload = serde_json::json!({
        "review_id": 999_999,
        "content": "shouting into the void"
    });

    let response = app.create_comment(&payload).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn create_comment_returns_400_for_empty_text() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Empty comment review").await;

    let payload = serde_json::json!({
        "review_id": review_id,
        "content": ""
    });

    let response = app.create_comment(&payload).await;
    assert_eq!(response.status().as_u16(), 400);
}

#[tokio::test]
async fn create_comment_returns_401_if_unauthenticated() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Anon comment review").await;
    app.logout().await;

    let payload = serde_json::json!({
        "review_id": review_id,
        "content": "comment without login"
    });

    let response = app.create_comment(&payload).await;
    assert_eq!(response.status().as_u16(), 401);
}

// ============================================================================
// Thread Listing
// ============================================================================

#[tokio::test]
async fn the_thread_is_returned_as_a_nested_tree() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Threaded review").await;

    let root_a = app.create_comment_ok(review_id, None, "root a").await;
    let root_b = app.create_comment_ok(review_id, None, "root b").await;
    let child = app.create_comment_ok(review_id, Some(root_a), "reply").await;
    let grandchild = app
        .create_comment_ok(review_id, Some(child), "nested reply")
        .await;

    app.logout().await;
    let body: Value = app.get_comments(review_id).await.json().await.unwrap();
    let comments = body["comments"].as_array().unwrap();

    // Two roots in posting order, replies nested underneath
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0]["id"], root_a);
    assert_eq!(comments[1]["id"], root_b);

    let replies = comments[0]["replies"].as_array().unwrap();
    assert_eq!(replies.len(), 1);
    assert_eq!(replies[0]["id"], child);
    assert_eq!(replies[0]["replies"][0]["id"], grandchild);
    assert!(comments[1]["replies"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn the_thread_is_empty_for_a_review_without_comments() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Quiet review").await;
    app.logout().await;

    let response = app.get_comments(review_id).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert!(body["comments"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn like_annotation_is_set_for_the_requesting_user_only() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Annotated review").await;
    let comment_id = app.create_comment_ok(review_id, None, "like me").await;

    let response = app.like_comment(review_id, comment_id).await;
    assert_eq!(response.status().as_u16(), 200);

    // Logged in: annotated
    let body: Value = app.get_comments(review_id).await.json().await.unwrap();
    assert_eq!(body["comments"][0]["liked_by_current_user"], true);
    assert_eq!(body["comments"][0]["like_count"], 1);

    // Anonymous: same tree, no annotation
    app.logout().await;
    let body: Value = app.get_comments(review_id).await.json().await.unwrap();
    assert_eq!(body["comments"][0]["liked_by_current_user"], false);
    assert_eq!(body["comments"][0]["like_count"], 1);
}

// ============================================================================
// Update Comment
// ============================================================================

#[tokio::test]
async fn the_author_can_edit_a_comment_and_it_is_marked_edited() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Edited review").await;
    let comment_id = app.create_comment_ok(review_id, None, "original text").await;

    let response = app
        .send_patch(
            &format!("v1/comment/me/update/{review_id}/{comment_id}"),
            &serde_json::json!({ "content": "corrected text" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["content"], "corrected text");
    assert_eq!(body["is_edited"], true);
}

#[tokio::test]
async fn editing_someone_elses_comment_returns_403() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Foreign edit review").await;
    let comment_id = app.create_comment_ok(review_id, None, "mine").await;

    let (other_login, _) = app.create_other_user().await;
    app.logout().await;
    app.login_with(&other_login).await;

    let response = app
        .send_patch(
            &format!("v1/comment/me/update/{review_id}/{comment_id}"),
            &serde_json::json!({ "content": "hijacked" }),
        )
        .await;
    assert_eq!(response.status().as_u16(), 403);
}

// ============================================================================
// Delete Comment (cascade)
// ============================================================================

#[tokio::test]
async fn deleting_a_comment_removes_its_whole_subtree() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Cascade review").await;

    let root = app.create_comment_ok(review_id, None, "root").await;
    let child_a = app.create_comment_ok(review_id, Some(root), "child a").await;
    let _grandchild = app
        .create_comment_ok(review_id, Some(child_a), "grandchild")
        .await;
    let _child_b = app.create_comment_ok(review_id, Some(root), "child b").await;
    let survivor = app.create_comment_ok(review_id, None, "unrelated root").await;

    let response = app.delete_comment(review_id, root).await;
    assert_eq!(response.status().as_u16(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["removed"], 4, "root + 3 descendants should be removed");

    let body: Value = app.get_comments(review_id).await.json().await.unwrap();
    let comments = body["comments"].as_array().unwrap();
    assert_eq!(comments.len(), 1);
    assert_eq!(comments[0]["id"], survivor);

    // The counter drops by exactly the removed amount
    let body: Value = app.get_review(review_id).await.json().await.unwrap();
    assert_eq!(body["stats"]["comment_count"], 1);
}

#[tokio::test]
async fn deleting_through_the_wrong_review_returns_404() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_a = app.create_sample_review("Review A").await;
    let review_b = app.create_sample_review("Review B").await;
    let comment_id = app.create_comment_ok(review_a, None, "on A").await;

    let response = app.delete_comment(review_b, comment_id).await;
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
async fn deleting_someone_elses_comment_returns_403() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Protected review").await;
    let comment_id = app.create_comment_ok(review_id, None, "mine").await;

    let (other_login, _) = app.create_other_user().await;
    app.logout().await;
    app.login_with(&other_login).await;

    let response = app.delete_comment(review_id, comment_id).await;
    assert_eq!(response.status().as_u16(), 403);
}

// ============================================================================
// Comment Likes
// ============================================================================

#[tokio::test]
async fn liking_twice_toggles_the_like_off() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Toggled review").await;
    let comment_id = app.create_comment_ok(review_id, None, "toggle me").await;

    let body: Value = app
        .like_comment(review_id, comment_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["liked"], true);
    assert_eq!(body["like_count"], 1);

    let body: Value = app
        .like_comment(review_id, comment_id)
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(body["liked"], false);
    assert_eq!(body["like_count"], 0);
}

#[tokio::test]
async fn liked_comments_listing_pages_through_with_cursors() {
    let app = helpers::spawn_app().await;
    app.login().await;

    let review_id = app.create_sample_review("Liked listing review").await;
    let mut liked_ids = Vec::new();
    for n in 0..5 {
        let id = app
            .create_comment_ok(review_id, None, &format!("comment {n}"))
            .await;
        app.like_comment(review_id, id).await;
        liked_ids.push(id);
    }

    let user_id = app.test_user.user_id;
    let mut seen = Vec::new();
    let mut cursor: Option<String> = None;

    loop {
        let endpoint = match &cursor {
            Some(c) => format!("v1/comment/liked/{user_id}?limit=2&cursor={c}"),
            None => format!("v1/comment/liked/{user_id}?limit=2"),
        };
        let body: Value = app.send_get(&endpoint).await.json().await.unwrap();

        for item in body["items"].as_array().unwrap() {
            seen.push(item["id"].as_i64().unwrap());
        }

        match body["next_cursor"].as_str() {
            Some(next) => cursor = Some(next.to_string()),
            None => break,
        }
    }

    // Newest like first, every liked comment exactly once
    liked_ids.reverse();
    assert_eq!(seen, liked_ids);
}
