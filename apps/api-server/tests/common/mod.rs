//! Test harness: one real server and one store per test case.
//!
//! `spawn_seeded` seeds the store before the test body runs and
//! `teardown` drops every post and stops the server afterwards.
//! A test that panics before `teardown` still stops its server when the
//! `TestApp` is dropped; its store is private to the test and goes with it.

#![allow(dead_code)]

use std::net::TcpListener;
use std::sync::Arc;

use actix_web::dev::ServerHandle;
use blog_core::domain::{Author, NewPost, Post};
use blog_core::ports::PostStore;
use blog_infra::InMemoryPostStore;
use reqwest::{Client, Response};
use serde_json::Value;

use api_server::AppState;
use api_server::telemetry::init_test_telemetry;

pub struct TestApp {
    pub address: String,
    pub client: Client,
    pub store: Arc<dyn PostStore>,
    server: ServerHandle,
}

impl TestApp {
    /// Start a server on a random local port over an empty in-memory store.
    pub async fn spawn() -> Self {
        Self::spawn_with_store(Arc::new(InMemoryPostStore::new())).await
    }

    /// Start a server over `store`.
    pub async fn spawn_with_store(store: Arc<dyn PostStore>) -> Self {
        init_test_telemetry();

        let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();

        let server = api_server::run(listener, AppState::with_store(store.clone()))
            .expect("Failed to build server");
        let handle = server.handle();
        actix_rt::spawn(server);

        Self {
            address: format!("http://127.0.0.1:{}", port),
            client: Client::new(),
            store,
            server: handle,
        }
    }

    /// `spawn` followed by `seed`.
    pub async fn spawn_seeded() -> Self {
        let app = Self::spawn().await;
        app.seed().await;
        app
    }

    /// Bulk insert the fixture posts. Returns how many were inserted.
    pub async fn seed(&self) -> usize {
        self.store
            .insert_many(seed_posts())
            .await
            .expect("Failed to seed posts")
    }

    /// Drop every post and stop the server.
    pub async fn teardown(self) {
        self.store.drop_all().await.expect("Failed to drop posts");
        self.server.stop(true).await;
    }

    /// Stop accepting connections without waiting, for use from `Drop`.
    fn stop_now(&self) {
        // The stop command is sent before the returned future is polled.
        drop(self.server.stop(false));
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn list_posts(&self) -> Response {
        self.client
            .get(self.url("/posts"))
            .send()
            .await
            .expect("GET /posts failed")
    }

    pub async fn get_post(&self, id: &str) -> Response {
        self.client
            .get(self.url(&format!("/posts/{}", id)))
            .send()
            .await
            .expect("GET /posts/{id} failed")
    }

    pub async fn create_post(&self, body: &Value) -> Response {
        self.client
            .post(self.url("/posts"))
            .json(body)
            .send()
            .await
            .expect("POST /posts failed")
    }

    pub async fn update_post(&self, id: &str, body: &Value) -> Response {
        self.client
            .put(self.url(&format!("/posts/{}", id)))
            .json(body)
            .send()
            .await
            .expect("PUT /posts/{id} failed")
    }

    pub async fn delete_post(&self, id: &str) -> Response {
        self.client
            .delete(self.url(&format!("/posts/{}", id)))
            .send()
            .await
            .expect("DELETE /posts/{id} failed")
    }

    /// The post update and delete tests operate on: the lowest id.
    pub async fn any_post(&self) -> Post {
        self.store
            .find_one()
            .await
            .expect("find_one failed")
            .expect("store is empty")
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        self.stop_now();
    }
}

/// Body used by the create tests.
pub fn generate_post_data() -> Value {
    serde_json::json!({
        "title": "New Blog Post",
        "author": {"firstName": "Jason", "lastName": "Vance"},
        "content": "New Post Content"
    })
}

/// Fixture posts inserted before each seeded test.
pub fn seed_posts() -> Vec<Post> {
    [
        ("Ada", "Lovelace", "Notes on the Analytical Engine", "Numbers all the way down."),
        ("Grace", "Hopper", "Debugging", "There was a moth in the relay."),
        ("Alan", "Turing", "Computing Machinery", "Can machines think?"),
        ("Edsger", "Dijkstra", "Go To Considered Harmful", ""),
        ("Barbara", "Liskov", "Data Abstraction", "Substitutability matters."),
    ]
    .into_iter()
    .map(|(first, last, title, content)| {
        let author = Author::new(first, last).expect("valid fixture author");
        Post::new(NewPost::new(&author, title, content).expect("valid fixture post"))
    })
    .collect()
}
