/// JSON-RPC round trips through the MCP server
use std::sync::{Arc, Mutex};

use chrono::{Duration, NaiveDate, NaiveDateTime};
use habit_streak_tracker::mcp::protocol::error_codes;
use habit_streak_tracker::*;
use serde_json::{json, Value};
use tempfile::NamedTempFile;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 5, 12)
        .unwrap()
        .and_hms_opt(20, 15, 0)
        .unwrap()
}

/// Server over a temp database plus a handle to move its clock
async fn server(temp_file: &NamedTempFile) -> (McpServer, Arc<Mutex<NaiveDateTime>>) {
    let tracker = HabitTrackerServer::new(temp_file.path().to_path_buf())
        .await
        .expect("Failed to create server");
    let now = Arc::new(Mutex::new(start()));
    let clock = Arc::clone(&now);
    let mcp = McpServer::new(tracker).with_clock(move || *clock.lock().unwrap());
    (mcp, now)
}

async fn call(server: &mut McpServer, id: u64, tool: &str, arguments: Value) -> Value {
    let line = json!({
        "jsonrpc": "2.0",
        "id": id,
        "method": "tools/call",
        "params": { "name": tool, "arguments": arguments }
    })
    .to_string();
    let response = server.handle_line(&line).await.expect("Expected a response");
    serde_json::to_value(response).unwrap()
}

fn text(response: &Value) -> &str {
    response["result"]["content"][0]["text"].as_str().unwrap()
}

#[tokio::test]
async fn test_initialize_and_list_tools() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let (mut server, _) = server(&temp_file).await;

    let init = server
        .handle_line(r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#)
        .await
        .unwrap();
    let init = serde_json::to_value(init).unwrap();
    assert_eq!(init["result"]["protocolVersion"], json!("2024-11-05"));
    assert!(init["result"]["serverInfo"]["name"].is_string());

    let notification = server
        .handle_line(r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#)
        .await;
    assert!(notification.is_none());
    assert!(server.is_initialized());

    let tools = server
        .handle_line(r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#)
        .await
        .unwrap();
    let tools = serde_json::to_value(tools).unwrap();
    let tools = tools["result"]["tools"].as_array().unwrap();
    assert_eq!(tools.len(), 9);

    let create = tools.iter().find(|t| t["name"] == "habit_create").unwrap();
    let required = create["inputSchema"]["required"].as_array().unwrap();
    assert!(required.contains(&json!("period")));
}

#[tokio::test]
async fn test_streak_over_days() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let (mut server, now) = server(&temp_file).await;

    let created = call(
        &mut server,
        1,
        "habit_create",
        json!({ "name": "Read a book", "period": "daily", "habit_type": "positive" }),
    )
    .await;
    assert_eq!(created["result"]["isError"], json!(false));
    assert!(text(&created).contains("Habit ID: 1"));

    for day in 0..3 {
        *now.lock().unwrap() = start() + Duration::days(day);
        let done = call(&mut server, 10 + day as u64, "habit_complete", json!({ "habit_id": 1 })).await;
        assert_eq!(done["result"]["isError"], json!(false));
    }

    let again = call(&mut server, 20, "habit_complete", json!({ "habit_id": 1 })).await;
    assert_eq!(again["result"]["isError"], json!(true));
    assert!(text(&again).contains("already completed"));

    *now.lock().unwrap() = start() + Duration::days(6);
    let listed = call(&mut server, 21, "habit_list", json!({})).await;
    assert!(text(&listed).contains("Missed by 4 day(s)"));

    let status = call(&mut server, 22, "habit_status", json!({ "habit_id": 1 })).await;
    assert!(text(&status).contains("Current Streak: 0"));
    assert!(text(&status).contains("Longest Streak: 3"));
}

#[tokio::test]
async fn test_tool_errors_are_results() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let (mut server, _) = server(&temp_file).await;

    let bad_period = call(
        &mut server,
        1,
        "habit_create",
        json!({ "name": "Swim", "period": "monthly", "habit_type": "positive" }),
    )
    .await;
    assert_eq!(bad_period["result"]["isError"], json!(true));

    let missing = call(&mut server, 2, "habit_complete", json!({ "habit_id": 42 })).await;
    assert!(text(&missing).contains("Habit not found"));

    let unknown = call(&mut server, 3, "habit_fly", json!({})).await;
    assert!(text(&unknown).contains("Unknown tool"));

    let analyze = call(&mut server, 4, "habit_analyze", json!({ "query": "by_type" })).await;
    assert_eq!(analyze["result"]["isError"], json!(false));
    assert!(text(&analyze).contains("No habits found"));
}

#[tokio::test]
async fn test_protocol_errors() {
    let temp_file = NamedTempFile::new().expect("Failed to create temp file");
    let (mut server, _) = server(&temp_file).await;

    let garbage = serde_json::to_value(server.handle_line("{not json").await.unwrap()).unwrap();
    assert_eq!(garbage["error"]["code"], json!(error_codes::PARSE_ERROR));

    let unknown = server
        .handle_line(r#"{"jsonrpc":"2.0","id":7,"method":"resources/list"}"#)
        .await
        .unwrap();
    let unknown = serde_json::to_value(unknown).unwrap();
    assert_eq!(unknown["id"], json!(7));
    assert_eq!(unknown["error"]["code"], json!(error_codes::METHOD_NOT_FOUND));

    assert!(server.handle_line("   ").await.is_none());

    let null_id = server
        .handle_line(r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#)
        .await
        .expect("A null id still gets a reply");
    let null_id = serde_json::to_value(null_id).unwrap();
    assert_eq!(null_id["id"], Value::Null);
    assert!(null_id["result"].is_object());
}
