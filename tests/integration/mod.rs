/// Integration tests against a real SQLite file and the MCP server
mod store_workflow;
mod mcp_server;
