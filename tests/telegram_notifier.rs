use mockito::{Matcher, Server};
use rsibot::config::TelegramConfig;
use rsibot::notify::TelegramNotifier;
use rsibot::{Notifier, TradeError};

fn notifier_for(server: &Server, bot_token: Option<&str>, chat_id: Option<&str>) -> TelegramNotifier {
    TelegramNotifier::new(&TelegramConfig {
        api_base: server.url(),
        bot_token: bot_token.map(str::to_string),
        chat_id: chat_id.map(str::to_string),
    })
    .unwrap()
}

#[tokio::test]
async fn test_send_posts_form() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/bot123:abc/sendMessage")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("chat_id".into(), "-100200".into()),
            Matcher::UrlEncoded("text".into(), "📊 RSI (1D): 25.00".into()),
        ]))
        .with_status(200)
        .with_body(r#"{"ok": true, "result": {"message_id": 1}}"#)
        .create_async()
        .await;

    let notifier = notifier_for(&server, Some("123:abc"), Some("-100200"));
    assert!(notifier.is_enabled());
    assert!(notifier.send("📊 RSI (1D): 25.00").await);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_missing_destination_makes_no_request() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let notifier = notifier_for(&server, Some("123:abc"), None);
    assert!(!notifier.send("hello").await);

    let notifier = notifier_for(&server, None, Some("-100200"));
    assert!(!notifier.send("hello").await);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_message_is_swallowed() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/bot123:abc/sendMessage")
        .with_status(400)
        .with_body(r#"{"ok": false, "error_code": 400, "description": "Bad Request: chat not found"}"#)
        .expect(2)
        .create_async()
        .await;

    let notifier = notifier_for(&server, Some("123:abc"), Some("-1"));

    // send() reports failure through its return value only
    assert!(!notifier.send("hello").await);

    match notifier.try_send("hello").await {
        Err(TradeError::NotificationFailure(msg)) => assert!(msg.contains("chat not found")),
        other => panic!("expected NotificationFailure, got {:?}", other),
    }
}
