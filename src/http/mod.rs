//! HTTP endpoints for the Model Context Protocol
//!
//! Routes `/mcp` onto the shared JSON-RPC engine and serves health and discovery metadata.

pub mod handlers;
