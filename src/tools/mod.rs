//! CGM Tools module
//!
//! MCP tool implementations for the Child Growth Monitor. Each function
//! returns `Result<_, String>`; the server wraps errors for the client.

pub mod children;
pub mod intake;
pub mod opd;
pub mod recommend;
pub mod screening;
pub mod status;

use chrono::NaiveDate;

/// Parse a `YYYY-MM-DD` tool argument
pub(crate) fn parse_date(value: &str, field: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| format!("Invalid {} '{}': expected YYYY-MM-DD", field, value))
}
