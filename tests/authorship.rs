mod common;

use common::{post_body, TestApp};
use reqwest::{header::LOCATION, Method, StatusCode};
use serde_json::{json, Value};

#[tokio::test]
async fn only_the_author_edits_a_post_others_are_sent_to_the_post() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let stranger = app.register("stranger").await;
    let travel = app.create_category(&token, "travel", true).await;
    let id = app.create_post(&token, post_body("Trip", Some(travel))).await;
    let path = format!("/posts/{id}");
    let edit = json!({ "post": post_body("Hijacked", Some(travel)) });

    for viewer in [Some(stranger.as_str()), None] {
        let response = app.send_json(Method::PUT, &path, viewer, edit.clone()).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[LOCATION], path.as_str());
    }
    let body: Value = app.get(&path, None).await.json().await.unwrap();
    assert_eq!(body["post"]["title"], "Trip");

    let response = app.send_json(Method::PUT, &path, Some(&token), edit).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["post"]["title"], "Hijacked");

    let response = app
        .send_json(Method::PUT, "/posts/9999", Some(&token), json!({ "post": post_body("X", None) }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn only_the_author_deletes_a_post() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let stranger = app.register("stranger").await;
    let travel = app.create_category(&token, "travel", true).await;
    let id = app.create_post(&token, post_body("Trip", Some(travel))).await;
    let path = format!("/posts/{id}");

    assert_eq!(app.delete(&path, Some(&stranger)).await.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&path, None).await.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.delete(&path, Some(&token)).await.status(), StatusCode::NO_CONTENT);
    assert_eq!(app.get(&path, Some(&token)).await.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.delete(&path, Some(&token)).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn comment_edits_by_others_are_forbidden() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let stranger = app.register("stranger").await;
    let travel = app.create_category(&token, "travel", true).await;
    let post = app.create_post(&token, post_body("Trip", Some(travel))).await;
    let comment = app.add_comment(&stranger, post, "Nice").await;
    let edit_path = format!("/posts/{post}/edit_comment/{comment}");
    let delete_path = format!("/posts/{post}/delete_comment/{comment}");
    let edit = json!({ "comment": { "text": "Edited" } });

    let response = app.send_json(Method::PUT, &edit_path, Some(&token), edit.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(app.delete(&delete_path, Some(&token)).await.status(), StatusCode::FORBIDDEN);

    let response = app.send_json(Method::PUT, &edit_path, Some(&stranger), edit).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["comment"]["text"], "Edited");

    assert_eq!(
        app.delete(&delete_path, Some(&stranger)).await.status(),
        StatusCode::NO_CONTENT
    );
    assert_eq!(
        app.delete(&delete_path, Some(&stranger)).await.status(),
        StatusCode::NOT_FOUND
    );
}

#[tokio::test]
async fn commenting_requires_an_existing_post_and_a_login() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let body = json!({ "comment": { "text": "Hello" } });

    let response = app
        .send_json(Method::POST, "/posts/9999/comment", Some(&token), body.clone())
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let travel = app.create_category(&token, "travel", true).await;
    let post = app.create_post(&token, post_body("Trip", Some(travel))).await;
    let response = app
        .send_json(Method::POST, &format!("/posts/{post}/comment"), None, body)
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleting_a_post_deletes_its_comments() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let commenter = app.register("commenter").await;
    let travel = app.create_category(&token, "travel", true).await;
    let post = app.create_post(&token, post_body("Trip", Some(travel))).await;
    let comment = app.add_comment(&commenter, post, "Nice").await;

    assert_eq!(
        app.delete(&format!("/posts/{post}"), Some(&token)).await.status(),
        StatusCode::NO_CONTENT
    );
    let response = app
        .send_json(
            Method::PUT,
            &format!("/posts/{post}/edit_comment/{comment}"),
            Some(&commenter),
            json!({ "comment": { "text": "Still here?" } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_an_account_removes_its_comments_from_counts() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let commenter = app.register("commenter").await;
    let travel = app.create_category(&token, "travel", true).await;
    let post = app.create_post(&token, post_body("Trip", Some(travel))).await;
    app.add_comment(&commenter, post, "Nice").await;

    let body: Value = app.get("/", None).await.json().await.unwrap();
    assert_eq!(body["posts"][0]["commentCount"].as_i64().unwrap(), 1);

    assert_eq!(app.delete("/user", Some(&commenter)).await.status(), StatusCode::NO_CONTENT);

    let body: Value = app.get("/", None).await.json().await.unwrap();
    assert_eq!(body["posts"][0]["commentCount"].as_i64().unwrap(), 0);
    assert_eq!(app.get("/profile/commenter", None).await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tokens_of_deleted_accounts_cannot_write() {
    let app = TestApp::spawn().await;
    let token = app.register("author").await;
    let travel = app.create_category(&token, "travel", true).await;
    let post = app.create_post(&token, post_body("Trip", Some(travel))).await;

    let ghost = app.register("ghost").await;
    assert_eq!(app.delete("/user", Some(&ghost)).await.status(), StatusCode::NO_CONTENT);

    let response = app
        .send_json(Method::POST, "/posts", Some(&ghost), json!({ "post": post_body("Boo", Some(travel)) }))
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["errors"]["body"][0], "User no longer exists");

    let response = app
        .send_json(
            Method::POST,
            &format!("/posts/{post}/comment"),
            Some(&ghost),
            json!({ "comment": { "text": "Boo" } }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    assert_eq!(app.feed_ids("/", None).await, vec![post]);
    let body: Value = app.get(&format!("/posts/{post}"), None).await.json().await.unwrap();
    assert!(body["comments"].as_array().unwrap().is_empty());
}
