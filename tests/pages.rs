mod common;

use common::{spawn_app, User};
use reqwest::{Client, StatusCode};

#[tokio::test]
async fn inbox_page_lists_chats() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let page = ada.get("/messages").await.text().await.unwrap();
    assert!(page.contains("No messages yet"));

    bob.send(&ada, "<b>hi</b> ada").await;

    let response = ada.get("/messages").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()["content-type"].to_str().unwrap().starts_with("text/html"));

    let page = response.text().await.unwrap();
    assert!(page.contains(r#"href="/messages/bob""#));
    assert!(page.contains("bob Test"));
    assert!(page.contains("&lt;b&gt;hi"));
    assert!(!page.contains("<b>hi</b>"));
    assert!(page.contains(r#"<span class="unread">1</span>"#));
}

#[tokio::test]
async fn chat_page_renders_the_thread() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;
    let bob = User::signup(&base, "bob").await;

    let page = ada.get("/messages/bob").await.text().await.unwrap();
    assert!(page.contains(r#"data-chat-id="""#));
    assert!(page.contains(&format!(r#"data-receiver-id="{}""#, bob.id)));

    let first = ada.send(&bob, "first").await;
    bob.send(&ada, "second").await;

    let response = ada.get("/messages/bob").await;
    assert_eq!(response.status(), StatusCode::OK);
    let page = response.text().await.unwrap();

    let chat_id = first["chatId"].as_str().unwrap();
    assert!(page.contains(&format!(r#"data-chat-id="{chat_id}""#)));
    assert!(page.contains(&format!(r#"data-me="{}""#, ada.id)));
    assert!(page.contains("setInterval(refresh, 2000)"));

    let first_at = page.find("first").unwrap();
    let second_at = page.find("second").unwrap();
    assert!(first_at < second_at);
    assert!(page.contains(r#"class="message mine""#));
    assert!(page.contains(r#"class="message theirs""#));
}

#[tokio::test]
async fn chat_page_edge_cases() {
    let base = spawn_app().await;
    let ada = User::signup(&base, "ada").await;

    let response = ada.get("/messages/ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(response.text().await.unwrap().contains("User not found"));

    let response = ada.get("/messages/ada").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response.text().await.unwrap().contains("message yourself"));

    let response = Client::new().get(format!("{base}/messages")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
