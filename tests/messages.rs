mod common;

use common::{error_of, spawn_app, User};
use reqwest::StatusCode;
use serde_json::{json, Value};

#[tokio::test]
async fn first_message_opens_a_chat() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    assert!(ada.inbox().await.is_empty());

    let message = ada.send(&bob, "  hello bob  ").await;
    assert_eq!(message["content"], "hello bob");
    assert_eq!(message["isRead"], false);
    assert_eq!(message["senderId"]["_id"], ada.id.as_str());
    assert_eq!(message["senderId"]["username"], "ada");

    let inbox = bob.inbox().await;
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0]["_id"], message["chatId"]);
    assert_eq!(inbox[0]["participant"]["username"], "ada");
    assert_eq!(inbox[0]["lastMessage"]["_id"], message["_id"]);
    assert_eq!(inbox[0]["unreadCount"], 1);

    // the sender has nothing unread in the same chat
    let inbox = ada.inbox().await;
    assert_eq!(inbox[0]["participant"]["username"], "bob");
    assert_eq!(inbox[0]["unreadCount"], 0);
}

#[tokio::test]
async fn replies_reuse_the_chat() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let first = ada.send(&bob, "one").await;
    let second = bob.send(&ada, "two").await;
    let third = ada.send(&bob, "three").await;
    assert_eq!(first["chatId"], second["chatId"]);
    assert_eq!(second["chatId"], third["chatId"]);

    let chat_id = first["chatId"].as_str().unwrap();
    let thread: Vec<Value> = ada.get(&format!("/api/messages/{chat_id}")).await.json().await.unwrap();
    let contents: Vec<&str> = thread.iter().map(|m| m["content"].as_str().unwrap()).collect();
    assert_eq!(contents, vec!["one", "two", "three"]);
    assert_eq!(thread[1]["senderId"]["username"], "bob");

    assert_eq!(ada.inbox().await.len(), 1);
    assert_eq!(bob.inbox().await[0]["lastMessage"]["content"], "three");
}

#[tokio::test]
async fn inbox_sorts_by_recency() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;
    let cy = User::signup(&base, "cy").await;

    ada.send(&bob, "to bob").await;
    ada.send(&cy, "to cy").await;
    let names: Vec<String> = ada.inbox().await.iter().map(|c| c["participant"]["username"].as_str().unwrap().to_owned()).collect();
    assert_eq!(names, vec!["cy", "bob"]);

    bob.send(&ada, "bump").await;
    let names: Vec<String> = ada.inbox().await.iter().map(|c| c["participant"]["username"].as_str().unwrap().to_owned()).collect();
    assert_eq!(names, vec!["bob", "cy"]);
}

#[tokio::test]
async fn send_rejects_bad_input() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let response = ada.post(&format!("/api/messages/send/{}", bob.id), json!({ "content": "   " })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_of(response).await, "Message content is required");

    let response = ada.post(&format!("/api/messages/send/{}", bob.id), json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ada.post(&format!("/api/messages/send/{}", ada.id), json!({ "content": "me" })).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = ada
        .post("/api/messages/send/0190f0e8-0000-7000-8000-000000000000", json!({ "content": "anyone?" }))
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    assert!(ada.inbox().await.is_empty());
}

#[tokio::test]
async fn outsiders_cannot_read_or_mark() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;
    let eve = User::signup(&base, "eve").await;

    let message = ada.send(&bob, "secret").await;
    let chat_id = message["chatId"].as_str().unwrap();

    let response = eve.get(&format!("/api/messages/{chat_id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_of(response).await, "Not authorized to view this chat");

    let response = eve.put(&format!("/api/messages/read/{chat_id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = eve.get("/api/messages/0190f0e8-0000-7000-8000-000000000000").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn mark_as_read_only_touches_incoming() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    ada.send(&bob, "one").await;
    ada.send(&bob, "two").await;
    let reply = bob.send(&ada, "three").await;
    let chat_id = reply["chatId"].as_str().unwrap();

    assert_eq!(bob.inbox().await[0]["unreadCount"], 2);

    let response = bob.put(&format!("/api/messages/read/{chat_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    assert_eq!(bob.inbox().await[0]["unreadCount"], 0);
    assert_eq!(ada.inbox().await[0]["unreadCount"], 1);

    let thread: Vec<Value> = bob.get(&format!("/api/messages/{chat_id}")).await.json().await.unwrap();
    let flags: Vec<bool> = thread.iter().map(|m| m["isRead"].as_bool().unwrap()).collect();
    assert_eq!(flags, vec![true, true, false]);

    // marking again is a no-op, never un-reads anything
    bob.put(&format!("/api/messages/read/{chat_id}")).await;
    assert_eq!(bob.inbox().await[0]["unreadCount"], 0);
}

#[tokio::test]
async fn only_the_sender_deletes() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let first = ada.send(&bob, "first").await;
    let last = ada.send(&bob, "oops").await;
    let last_id = last["_id"].as_str().unwrap();

    let response = bob.delete(&format!("/api/messages/{last_id}")).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_of(response).await, "Not authorized to delete this message");

    let response = ada.delete(&format!("/api/messages/{last_id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = ada.delete(&format!("/api/messages/{last_id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "Message not found");

    // the inbox falls back to the previous message
    let inbox = bob.inbox().await;
    assert_eq!(inbox[0]["lastMessage"]["_id"], first["_id"]);

    ada.delete(&format!("/api/messages/{}", first["_id"].as_str().unwrap())).await;
    let inbox = bob.inbox().await;
    assert_eq!(inbox.len(), 1);
    assert!(inbox[0]["lastMessage"].is_null());
    assert_eq!(inbox[0]["unreadCount"], 0);
}

#[tokio::test]
async fn deleting_an_older_message_keeps_the_last_one() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let first = ada.send(&bob, "first").await;
    let last = bob.send(&ada, "last").await;

    let response = ada.delete(&format!("/api/messages/{}", first["_id"].as_str().unwrap())).await;
    assert_eq!(response.status(), StatusCode::OK);

    let inbox = ada.inbox().await;
    assert_eq!(inbox[0]["lastMessage"]["_id"], last["_id"]);
    assert_eq!(inbox[0]["lastMessage"]["content"], "last");

    let chat_id = last["chatId"].as_str().unwrap();
    let thread: Vec<Value> = ada.get(&format!("/api/messages/{chat_id}")).await.json().await.unwrap();
    assert_eq!(thread.len(), 1);
}

#[tokio::test]
async fn malformed_ids_and_bodies_answer_in_json() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let response = ada.get("/api/messages/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(error_of(response).await, "Not authorized to view this chat");

    let response = ada.put("/api/messages/read/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = ada.delete("/api/messages/not-a-uuid").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "Message not found");

    let response = ada.post("/api/messages/send/not-a-uuid", json!({ "content": "hi" })).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(error_of(response).await, "User not found");

    let response = ada.post_raw(&format!("/api/messages/send/{}", bob.id), "{bad").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("application/json"));
    assert!(!error_of(response).await.is_empty());

    let response = ada.post_raw(&format!("/api/messages/send/{}", bob.id), r#"{"content": 5}"#).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!error_of(response).await.is_empty());

    assert!(ada.inbox().await.is_empty());
}
