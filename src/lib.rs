//! cytoscape-mcp — Cytoscape Desktop tools for MCP clients.
//!
//! Tool calls arrive over stdio, are validated against a fixed catalogue,
//! and are forwarded to a running Cytoscape through its CyREST API.

pub mod config;
pub mod cyrest;
pub mod error;
pub mod server;
pub mod tools;
pub mod types;
