/// MCP server implementation that handles JSON-RPC communication
///
/// This module implements the actual MCP server that:
/// 1. Reads JSON-RPC requests from stdin, one per line
/// 2. Routes tool calls to the habit tools
/// 3. Sends JSON-RPC responses to stdout

use chrono::NaiveDateTime;
use schemars::JsonSchema;
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, error, info, warn};

use crate::mcp::protocol::*;
use crate::tools::{self, ToolError};
use crate::{HabitTrackerServer, ServerError};

type Clock = Box<dyn Fn() -> NaiveDateTime + Send>;

/// MCP server that handles communication with the client
pub struct McpServer {
    /// The underlying habit tracker server
    habit_tracker: HabitTrackerServer,
    /// Source of "now" for every tool call
    clock: Clock,
    /// Whether the client has sent its initialized notification
    initialized: bool,
}

fn local_now() -> NaiveDateTime {
    chrono::Local::now().naive_local()
}

impl McpServer {
    /// Create a new MCP server reading the local wall clock
    pub fn new(habit_tracker: HabitTrackerServer) -> Self {
        Self {
            habit_tracker,
            clock: Box::new(local_now),
            initialized: false,
        }
    }

    /// Replace the clock, so callers can pin or advance time
    pub fn with_clock(mut self, clock: impl Fn() -> NaiveDateTime + Send + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Run the MCP server, handling JSON-RPC over stdin/stdout
    pub async fn run(&mut self) -> Result<(), ServerError> {
        info!("Starting MCP server, waiting for JSON-RPC requests...");

        let stdin = tokio::io::stdin();
        let mut reader = BufReader::new(stdin);
        let mut stdout = tokio::io::stdout();

        let mut line = String::new();

        loop {
            line.clear();

            match reader.read_line(&mut line).await {
                Ok(0) => {
                    info!("MCP server shutting down (stdin closed)");
                    break;
                }
                Ok(_) => {
                    if let Some(response) = self.handle_line(&line).await {
                        let response_str = serde_json::to_string(&response)?;

                        stdout.write_all(response_str.as_bytes()).await?;
                        stdout.write_all(b"\n").await?;
                        stdout.flush().await?;

                        debug!("Sent response: {}", response_str);
                    }
                }
                Err(e) => {
                    error!("Failed to read from stdin: {}", e);
                    break;
                }
            }
        }

        Ok(())
    }

    /// Process a single line of JSON-RPC input
    ///
    /// Returns `None` for blank lines and notifications.
    pub async fn handle_line(&mut self, line: &str) -> Option<JsonRpcResponse> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }

        debug!("Processing request: {}", line);

        let request: JsonRpcRequest = match serde_json::from_str(line) {
            Ok(req) => req,
            Err(e) => {
                error!("Failed to parse JSON-RPC request: {}", e);
                return Some(JsonRpcResponse::error(
                    Value::Null,
                    error_codes::PARSE_ERROR,
                    format!("Invalid JSON: {}", e),
                ));
            }
        };

        let id = request.id.clone();
        let response = self.handle_request(request).await;
        // Notifications get no reply
        id.map(|_| response)
    }

    async fn handle_request(&mut self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone().unwrap_or(Value::Null);
        match request.method.as_str() {
            "initialize" => self.handle_initialize(id),
            "initialized" | "notifications/initialized" => {
                self.initialized = true;
                JsonRpcResponse::success(id, Value::Null)
            }
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => JsonRpcResponse::success(id, json!({ "tools": tool_definitions() })),
            "tools/call" => self.handle_tools_call(id, request.params),
            _ => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method '{}' not found", request.method),
            ),
        }
    }

    fn handle_initialize(&self, id: Value) -> JsonRpcResponse {
        info!("MCP client connected");

        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: ServerCapabilities {
                tools: Some(ToolsCapability { list_changed: false }),
            },
            server_info: ServerInfo {
                name: "Habit Streak Tracker".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };

        respond(id, &result)
    }

    fn handle_tools_call(&self, id: Value, params: Option<Value>) -> JsonRpcResponse {
        let Some(params) = params else {
            return JsonRpcResponse::error(id, error_codes::INVALID_PARAMS, "Missing parameters".to_string());
        };

        let tool_params: ToolCallParams = match serde_json::from_value(params) {
            Ok(p) => p,
            Err(e) => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    format!("Invalid parameters: {}", e),
                );
            }
        };

        let result = self.call_tool(&tool_params.name, tool_params.arguments);
        respond(id, &result)
    }

    /// Run one tool against the store, with `now` read once from the clock
    fn call_tool(&self, name: &str, arguments: Map<String, Value>) -> ToolCallResult {
        let now = (self.clock)();
        let storage = self.habit_tracker.storage();
        let args = Value::Object(arguments);

        let outcome = match name {
            "habit_create" => parse(args).and_then(|p| tools::create_habit(storage, p, now)).map(|r| r.message),
            "habit_complete" => parse(args).and_then(|p| tools::complete_habit(storage, p, now)).map(|r| r.message),
            "habit_list" => parse(args).and_then(|p| tools::list_habits(storage, p, now)).map(|r| r.message),
            "habit_status" => parse(args).and_then(|p| tools::get_habit_status(storage, p, now)).map(|r| r.message),
            "habit_update" => parse(args).and_then(|p| tools::update_habit(storage, p)).map(|r| r.message),
            "habit_archive" => parse(args).and_then(|p| tools::archive_habit(storage, p)).map(|r| r.message),
            "habit_reactivate" => parse(args).and_then(|p| tools::reactivate_habit(storage, p)).map(|r| r.message),
            "habit_delete" => parse(args).and_then(|p| tools::delete_habit(storage, p)).map(|r| r.message),
            "habit_analyze" => parse(args).and_then(|p| tools::analyze_habits(storage, p)).map(|r| r.message),
            _ => return ToolCallResult::error(format!("Unknown tool: {}", name)),
        };

        match outcome {
            Ok(text) => ToolCallResult::success(text),
            Err(e) => {
                warn!("Tool {} failed: {}", name, e);
                ToolCallResult::error(e.to_string())
            }
        }
    }
}

fn parse<P: DeserializeOwned>(args: Value) -> Result<P, ToolError> {
    serde_json::from_value(args).map_err(|e| ToolError::InvalidParams(e.to_string()))
}

fn respond<T: serde::Serialize>(id: Value, result: &T) -> JsonRpcResponse {
    match serde_json::to_value(result) {
        Ok(value) => JsonRpcResponse::success(id, value),
        Err(e) => JsonRpcResponse::error(id, error_codes::INTERNAL_ERROR, e.to_string()),
    }
}

fn tool<P: JsonSchema>(name: &str, description: &str) -> ToolDefinition {
    let schema = schemars::schema_for!(P);
    ToolDefinition {
        name: name.to_string(),
        description: description.to_string(),
        input_schema: serde_json::to_value(schema).unwrap_or_else(|_| json!({ "type": "object" })),
    }
}

/// Every tool this server exposes
pub fn tool_definitions() -> Vec<ToolDefinition> {
    vec![
        tool::<tools::CreateHabitParams>("habit_create", "Create a new daily or weekly habit"),
        tool::<tools::HabitIdParams>(
            "habit_complete",
            "Mark a habit as completed now and update its streak",
        ),
        tool::<tools::ListHabitsParams>(
            "habit_list",
            "List habits with their streaks; lapsed streaks are reset and reported",
        ),
        tool::<tools::HabitIdParams>("habit_status", "Show streak details and completion history of a habit"),
        tool::<tools::UpdateHabitParams>("habit_update", "Change the name, period and type of a habit"),
        tool::<tools::HabitIdParams>("habit_archive", "Archive a habit, keeping its history"),
        tool::<tools::HabitIdParams>("habit_reactivate", "Reactivate an archived habit"),
        tool::<tools::HabitIdParams>("habit_delete", "Delete a habit and all of its completions"),
        tool::<tools::AnalyzeParams>(
            "habit_analyze",
            "Analyse habits: by_period, by_type, longest_streak, current_streaks or habit_streak",
        ),
    ]
}
