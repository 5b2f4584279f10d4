//! Child Growth Monitor (CGM) Library
//!
//! Child nutrition and growth evaluation: a pure evaluation engine plus
//! SQLite-backed records exposed as MCP tools.

pub mod build_info;
pub mod config;
pub mod db;
pub mod evaluation;
pub mod mcp;
pub mod models;
pub mod tools;
