//! HTTP API integration tests.
//!
//! Tests for the REST endpoints (health check, room lifecycle, membership,
//! message send and history).

mod fixtures;
use fixtures::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_health_endpoint() {
    // テスト項目: /api/health エンドポイントが正常に動作する
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_create_room() {
    // テスト項目: ルームを作成すると roomId と成功ステータスが返る
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(server.rooms_url())
        .json(&json!({"roomName": "lobby"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["roomId"], "lobby");
    assert_eq!(body["status"], "success");
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn test_create_room_conflict_and_validation() {
    // テスト項目: 同名ルームの再作成は 409、不正なルーム名は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &[]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let duplicate = client
        .post(server.rooms_url())
        .json(&json!({"roomName": "lobby"}))
        .send()
        .await
        .expect("Failed to send request");
    let invalid = client
        .post(server.rooms_url())
        .json(&json!({"roomName": "no spaces allowed"}))
        .send()
        .await
        .expect("Failed to send request");
    let missing = client
        .post(server.rooms_url())
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(duplicate.status(), 409);
    let body: Value = duplicate.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], 409);
    assert_eq!(body["message"], "Chat room 'lobby' already exists");
    assert_eq!(invalid.status(), 400);
    assert_eq!(missing.status(), 400);
}

#[tokio::test]
async fn test_room_detail() {
    // テスト項目: ルーム詳細にメタデータ・参加者・メッセージ件数が含まれる
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &["bob", "alice"]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/lobby", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["roomName"], "lobby");
    assert_eq!(body["participantCount"], 2);
    assert_eq!(body["participants"], json!(["alice", "bob"]));
    assert_eq!(body["messageCount"], 0);
    assert!(body["createdAt"].is_string());
}

#[tokio::test]
async fn test_room_detail_not_found() {
    // テスト項目: 存在しないルームの詳細は 404 を返す
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/nonexistent", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_join_twice_and_leave() {
    // テスト項目: 2 回目の参加は 409、退出は removed の真偽を返す
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &["alice"]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let again = client
        .post(format!("{}/lobby/join", server.rooms_url()))
        .json(&json!({"participant": "alice"}))
        .send()
        .await
        .expect("Failed to send request");
    let leave = client
        .delete(format!("{}/lobby/participants/alice", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");
    let leave_again = client
        .delete(format!("{}/lobby/participants/alice", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(again.status(), 409);
    let leave: Value = leave.json().await.expect("Failed to parse JSON");
    assert_eq!(leave["removed"], true);
    let leave_again: Value = leave_again.json().await.expect("Failed to parse JSON");
    assert_eq!(leave_again["removed"], false);
}

#[tokio::test]
async fn test_send_message_and_read_history() {
    // テスト項目: lobby に alice が "hi" を送ると、履歴の先頭 1 件として読み出せる
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &["alice"]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let sent = client
        .post(format!("{}/lobby/messages", server.rooms_url()))
        .json(&json!({"participant": "alice", "message": "hi"}))
        .send()
        .await
        .expect("Failed to send request");
    let history = client
        .get(format!("{}/lobby/messages?limit=1&offset=0", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(sent.status(), 200);
    assert_eq!(history.status(), 200);
    let body: Value = history.json().await.expect("Failed to parse JSON");
    let messages = body.as_array().expect("history should be an array");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["participant"], "alice");
    assert_eq!(messages[0]["message"], "hi");
    assert!(messages[0]["timestamp"].as_i64().unwrap() > 0);
}

#[tokio::test]
async fn test_send_message_from_non_member() {
    // テスト項目: 参加していない参加者からのメッセージは 403 になり、履歴に残らない
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &["alice"]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .post(format!("{}/lobby/messages", server.rooms_url()))
        .json(&json!({"participant": "mallory", "message": "hi"}))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 403);
    let history: Value = client
        .get(format!("{}/lobby/messages", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request")
        .json()
        .await
        .expect("Failed to parse JSON");
    assert_eq!(history, json!([]));
}

#[tokio::test]
async fn test_history_query_validation() {
    // テスト項目: limit は 1〜100、offset は 0 以上でなければ 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &[]).await;
    let client = reqwest::Client::new();

    for query in ["limit=0", "limit=101", "offset=-1", "limit=abc"] {
        // when (操作):
        let response = client
            .get(format!("{}/lobby/messages?{query}", server.rooms_url()))
            .send()
            .await
            .expect("Failed to send request");

        // then (期待する結果):
        assert_eq!(response.status(), 400, "{query}");
    }
}

#[tokio::test]
async fn test_history_of_missing_room() {
    // テスト項目: 存在しないルームの履歴は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .get(format!("{}/ghost/messages", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 404);
}

#[tokio::test]
async fn test_delete_room() {
    // テスト項目: ルームを削除するとストアに何も残らず、再削除は 404 になる
    // given (前提条件):
    let server = TestServer::start().await;
    server.room_with("lobby", &["alice"]).await;
    let client = reqwest::Client::new();

    // when (操作):
    let deleted = client
        .delete(format!("{}/lobby", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");
    let again = client
        .delete(format!("{}/lobby", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(deleted.status(), 200);
    assert_eq!(again.status(), 404);
    assert!(server.store.keys().await.is_empty());
}

#[tokio::test]
async fn test_delete_without_room_id() {
    // テスト項目: ルーム名なしの DELETE は 400 になる
    // given (前提条件):
    let server = TestServer::start().await;
    let client = reqwest::Client::new();

    // when (操作):
    let response = client
        .delete(format!("{}/", server.rooms_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then (期待する結果):
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["message"], "Room ID is required for deletion");
    assert_eq!(body["status"], "Error");
}
