#![allow(dead_code)]

use chirp::{app, db, AppState, Config};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const PASSWORD: &str = "hunter22";

/// Serves a fresh app backed by its own in-memory database.
pub async fn spawn_app() -> String {
    let config = Config {
        database_url: "sqlite::memory:".to_owned(),
        db_max_connections: 1,
        ..Config::default()
    };

    let db_pool = db::connect(&config).await.unwrap();
    db::migrate(&db_pool).await.unwrap();
    let router = app(AppState { db_pool }, &config);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let address = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    format!("http://{address}")
}

/// A browser-like client: keeps the session cookie between requests.
pub struct User {
    pub client: Client,
    pub base: String,
    pub id: String,
    pub username: String,
}

impl User {
    pub async fn signup(base: &str, username: &str) -> User {
        let client = Client::builder().cookie_store(true).build().unwrap();
        let response = client
            .post(format!("{base}/api/auth/signup"))
            .json(&json!({
                "fullName": format!("{username} Test"),
                "username": username,
                "email": format!("{username}@example.com"),
                "password": PASSWORD,
            }))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body: Value = response.json().await.unwrap();
        User {
            client,
            base: base.to_owned(),
            id: body["_id"].as_str().unwrap().to_owned(),
            username: username.to_owned(),
        }
    }

    pub async fn get(&self, path: &str) -> Response {
        self.client.get(format!("{}{path}", self.base)).send().await.unwrap()
    }

    pub async fn post(&self, path: &str, body: Value) -> Response {
        self.client.post(format!("{}{path}", self.base)).json(&body).send().await.unwrap()
    }

    /// Posts `body` verbatim, labelled as JSON whether or not it is.
    pub async fn post_raw(&self, path: &str, body: &'static str) -> Response {
        self.client
            .post(format!("{}{path}", self.base))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn put(&self, path: &str) -> Response {
        self.client.put(format!("{}{path}", self.base)).send().await.unwrap()
    }

    pub async fn delete(&self, path: &str) -> Response {
        self.client.delete(format!("{}{path}", self.base)).send().await.unwrap()
    }

    pub async fn send(&self, to: &User, content: &str) -> Value {
        let response = self.post(&format!("/api/messages/send/{}", to.id), json!({ "content": content })).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        response.json().await.unwrap()
    }

    pub async fn inbox(&self) -> Vec<Value> {
        let response = self.get("/api/messages/chats").await;
        assert_eq!(response.status(), StatusCode::OK);
        response.json().await.unwrap()
    }
}

pub async fn error_of(response: Response) -> String {
    let body: Value = response.json().await.unwrap();
    body["error"].as_str().unwrap().to_owned()
}
