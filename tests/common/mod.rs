#![allow(dead_code)]

use std::net::SocketAddr;

use blogicum::{get_random_free_port, spawn_app, Config};
use chrono::{DateTime, Duration, Utc};
use reqwest::{redirect::Policy, Client, Response, StatusCode};
use serde_json::{json, Value};

pub struct TestApp {
    pub address: SocketAddr,
    pub client: Client,
}

impl TestApp {
    /// Starts a server on a random port backed by a fresh SQLite file.
    pub async fn spawn() -> TestApp {
        let db_path = std::env::temp_dir().join(format!(
            "blogicum-test-{}.db",
            rand::random::<u64>()
        ));
        let listener = get_random_free_port().unwrap();
        let port = listener.local_addr().unwrap().port();
        let config = Config {
            host: "127.0.0.1".to_string(),
            port,
            database_url: format!("sqlite://{}", db_path.display()),
            jwt_secret: "test-secret".to_string(),
            log_level: "warn".to_string(),
        };
        let address = spawn_app(config, listener).await.unwrap();
        let client = Client::builder().redirect(Policy::none()).build().unwrap();
        TestApp { address, client }
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.get(self.url(path));
        if let Some(token) = token {
            request = request.header("Authorization", format!("Token {token}"));
        }
        request.send().await.unwrap()
    }

    pub async fn send_json(
        &self,
        method: reqwest::Method,
        path: &str,
        token: Option<&str>,
        body: Value,
    ) -> Response {
        let mut request = self.client.request(method, self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.header("Authorization", format!("Token {token}"));
        }
        request.send().await.unwrap()
    }

    pub async fn delete(&self, path: &str, token: Option<&str>) -> Response {
        let mut request = self.client.delete(self.url(path));
        if let Some(token) = token {
            request = request.header("Authorization", format!("Token {token}"));
        }
        request.send().await.unwrap()
    }

    /// Registers `username` and returns its token.
    pub async fn register(&self, username: &str) -> String {
        let response = self
            .send_json(
                reqwest::Method::POST,
                "/users",
                None,
                json!({ "user": {
                    "username": username,
                    "email": format!("{username}@example.com"),
                    "password": "password123",
                    "firstName": "Test",
                    "lastName": "User",
                }}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body: Value = response.json().await.unwrap();
        body["user"]["token"].as_str().unwrap().to_string()
    }

    pub async fn create_category(&self, token: &str, slug: &str, is_published: bool) -> i64 {
        let response = self
            .send_json(
                reqwest::Method::POST,
                "/categories",
                Some(token),
                json!({ "category": {
                    "title": slug,
                    "description": "About things",
                    "slug": slug,
                    "isPublished": is_published,
                }}),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["category"]["id"].as_i64().unwrap()
    }

    pub async fn create_location(&self, token: &str, name: &str) -> i64 {
        let response = self
            .send_json(
                reqwest::Method::POST,
                "/locations",
                Some(token),
                json!({ "location": { "name": name } }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["location"]["id"].as_i64().unwrap()
    }

    pub async fn create_post(&self, token: &str, post: Value) -> i64 {
        let response = self
            .send_json(reqwest::Method::POST, "/posts", Some(token), json!({ "post": post }))
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["post"]["id"].as_i64().unwrap()
    }

    pub async fn add_comment(&self, token: &str, post_id: i64, text: &str) -> i64 {
        let response = self
            .send_json(
                reqwest::Method::POST,
                &format!("/posts/{post_id}/comment"),
                Some(token),
                json!({ "comment": { "text": text } }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body: Value = response.json().await.unwrap();
        body["comment"]["id"].as_i64().unwrap()
    }

    /// Ids of the posts on one feed page, in order.
    pub async fn feed_ids(&self, path: &str, token: Option<&str>) -> Vec<i64> {
        let response = self.get(path, token).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {path}");
        let body: Value = response.json().await.unwrap();
        body["posts"]
            .as_array()
            .unwrap()
            .iter()
            .map(|post| post["id"].as_i64().unwrap())
            .collect()
    }
}

pub fn days_from_now(days: i64) -> DateTime<Utc> {
    Utc::now() + Duration::days(days)
}

/// A published post dated yesterday in `category_id`.
pub fn post_body(title: &str, category_id: Option<i64>) -> Value {
    json!({
        "title": title,
        "text": "Some text",
        "pubDate": days_from_now(-1),
        "categoryId": category_id,
    })
}
