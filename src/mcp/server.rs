//! CGM MCP Server Implementation
//!
//! Implements the MCP server with all CGM tools.

use std::path::PathBuf;
use std::sync::Arc;

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::{
    CallToolResult, Content, Implementation, ProtocolVersion, ServerCapabilities, ServerInfo,
};
use rmcp::{schemars, tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::db::Database;
use crate::evaluation::{Clock, EvaluationConfig, SystemClock};
use crate::tools::status::StatusTracker;
use crate::tools::{children, intake, opd, recommend, screening};

/// CGM MCP Service
#[derive(Clone)]
pub struct CgmService {
    status_tracker: Arc<Mutex<StatusTracker>>,
    database: Database,
    config: Arc<EvaluationConfig>,
    clock: Arc<dyn Clock>,
    tool_router: ToolRouter<CgmService>,
}

impl CgmService {
    pub fn new(database_path: PathBuf, database: Database, config: EvaluationConfig) -> Self {
        Self::with_clock(database_path, database, config, Arc::new(SystemClock))
    }

    pub fn with_clock(
        database_path: PathBuf,
        database: Database,
        config: EvaluationConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            status_tracker: Arc::new(Mutex::new(StatusTracker::new(database_path))),
            database,
            config: Arc::new(config),
            clock,
            tool_router: Self::tool_router(),
        }
    }
}

fn json_result<T: Serialize>(value: &T) -> Result<CallToolResult, McpError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Serialization error: {}", e), None))?;
    Ok(CallToolResult::success(vec![Content::text(json)]))
}

// ============================================================================
// Child Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct CreateChildParams {
    pub name: String,
    /// Birth date, YYYY-MM-DD
    pub date_of_birth: String,
    /// male, female or unknown (default)
    pub sex: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ChildIdParams {
    pub child_id: i64,
}

// ============================================================================
// Record Parameter Structs
// ============================================================================

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct LogIntakeParams {
    pub child_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    #[serde(default)]
    pub meal_items: Vec<String>,
    /// kcal for the whole day
    pub total_calories: f64,
    /// grams for the whole day
    pub total_protein: f64,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct AddOpdReportParams {
    pub child_id: i64,
    /// YYYY-MM-DD
    pub date: String,
    pub weight_kg: f64,
    pub height_cm: f64,
    /// Mid-upper arm circumference
    pub muac_cm: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct ImportScreeningCsvParams {
    pub file_path: String,
}

// ============================================================================
// Tool Router
// ============================================================================

#[tool_router]
impl CgmService {
    // --- Status ---

    #[tool(description = "Get the current status of the CGM service including build info, database status, evaluation settings, and process information")]
    async fn cgm_status(&self) -> Result<CallToolResult, McpError> {
        let tracker = self.status_tracker.lock().await;
        let status = tracker.get_status(&self.config);
        json_result(&status)
    }

    #[tool(description = "Get step-by-step instructions for tracking a child and reading recommendations. Call this when starting a session or when unsure how to use the CGM tools.")]
    fn evaluation_instructions(&self) -> Result<CallToolResult, McpError> {
        use crate::tools::status::EVALUATION_INSTRUCTIONS;
        Ok(CallToolResult::success(vec![Content::text(EVALUATION_INSTRUCTIONS)]))
    }

    // --- Children ---

    #[tool(description = "Register a child with name, date of birth (YYYY-MM-DD) and optional sex")]
    fn create_child(&self, Parameters(p): Parameters<CreateChildParams>) -> Result<CallToolResult, McpError> {
        let result = children::create_child(&self.database, self.clock.today(), &p.name, &p.date_of_birth, p.sex.as_deref())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Get a child with current age in months and record counts")]
    fn get_child(&self, Parameters(p): Parameters<ChildIdParams>) -> Result<CallToolResult, McpError> {
        let result = children::get_child(&self.database, self.clock.today(), p.child_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        match result {
            Some(child) => json_result(&child),
            None => Ok(CallToolResult::success(vec![Content::text(format!(
                r#"{{"error": "Child not found", "id": {}}}"#,
                p.child_id
            ))])),
        }
    }

    #[tool(description = "List all registered children")]
    fn list_children(&self) -> Result<CallToolResult, McpError> {
        let result = children::list_children(&self.database, self.clock.today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Intake ---

    #[tool(description = "Log one day of food intake for a child (meal items, total calories in kcal, total protein in g). Returns the stored record and a fresh recommendation.")]
    fn log_intake(&self, Parameters(p): Parameters<LogIntakeParams>) -> Result<CallToolResult, McpError> {
        let result = intake::log_intake(
            &self.database,
            &self.config,
            self.clock.today(),
            p.child_id,
            &p.date,
            p.meal_items,
            p.total_calories,
            p.total_protein,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List all intake records for a child, oldest first")]
    fn list_intakes(&self, Parameters(p): Parameters<ChildIdParams>) -> Result<CallToolResult, McpError> {
        let result = intake::list_intakes(&self.database, p.child_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- OPD Reports ---

    #[tool(description = "Record an OPD visit for a child (weight_kg and height_cm required, optional muac_cm and notes). Returns the stored report and a fresh recommendation.")]
    fn add_opd_report(&self, Parameters(p): Parameters<AddOpdReportParams>) -> Result<CallToolResult, McpError> {
        let result = opd::add_opd_report(
            &self.database,
            &self.config,
            self.clock.today(),
            p.child_id,
            &p.date,
            p.weight_kg,
            p.height_cm,
            p.muac_cm,
            p.notes,
        )
        .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "List all OPD reports for a child, oldest first")]
    fn list_opd_reports(&self, Parameters(p): Parameters<ChildIdParams>) -> Result<CallToolResult, McpError> {
        let result = opd::list_opd_reports(&self.database, p.child_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Evaluation ---

    #[tool(description = "Evaluate a child's recent intake and growth. Returns status, score (calorie ratio), ordered suggestions and the findings behind them.")]
    fn recommend(&self, Parameters(p): Parameters<ChildIdParams>) -> Result<CallToolResult, McpError> {
        let result = recommend::recommend(&self.database, &self.config, self.clock.today(), p.child_id)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    // --- Screening ---

    #[tool(description = "Import a population screening CSV (child_id, age_months, sex, weight_kg, height_cm, district, state, record_date). Computes wasting, underweight and stunting flags per row.")]
    fn import_screening_csv(&self, Parameters(p): Parameters<ImportScreeningCsvParams>) -> Result<CallToolResult, McpError> {
        let result = screening::import_screening_csv(&self.database, &self.config, &p.file_path, self.clock.today())
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }

    #[tool(description = "Wasting, underweight and stunting rates per state from imported screening data, highest wasting rate first")]
    fn screening_summary(&self) -> Result<CallToolResult, McpError> {
        let result = screening::screening_summary(&self.database)
            .map_err(|e| McpError::internal_error(e, None))?;
        json_result(&result)
    }
}

// ============================================================================
// Server Handler
// ============================================================================

#[tool_handler]
impl ServerHandler for CgmService {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::LATEST,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "cgm".into(),
                version: crate::build_info::VERSION.into(),
                title: Some("Child Growth Monitor".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Child Growth Monitor (CGM) - Child nutrition and growth evaluation. \
                 IMPORTANT: Call evaluation_instructions first. \
                 Children: create_child/get_child/list_children. \
                 Intake: log_intake/list_intakes (one record per day, kcal and protein totals). \
                 OPD: add_opd_report/list_opd_reports (weight, height, optional MUAC). \
                 Evaluation: recommend returns status, score and ordered suggestions; \
                 log_intake and add_opd_report also return a fresh recommendation. \
                 Screening: import_screening_csv/screening_summary. \
                 Status: cgm_status."
                    .into(),
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::FixedClock;
    use crate::tools::test_support::{date, test_db};

    fn service() -> (tempfile::TempDir, CgmService) {
        let (dir, db) = test_db();
        let path = dir.path().join("cgm.db");
        let service = CgmService::with_clock(
            path,
            db,
            EvaluationConfig::default(),
            Arc::new(FixedClock(date("2026-06-15"))),
        );
        (dir, service)
    }

    #[test]
    fn test_server_info() {
        let (_dir, service) = service();
        let info = service.get_info();
        assert_eq!(info.server_info.name, "cgm");
        assert!(info.instructions.unwrap().contains("evaluation_instructions"));
    }

    #[test]
    fn test_router_exposes_tools() {
        let (_dir, service) = service();
        let names: Vec<String> = service
            .tool_router
            .list_all()
            .into_iter()
            .map(|tool| tool.name.to_string())
            .collect();
        for expected in [
            "cgm_status",
            "evaluation_instructions",
            "create_child",
            "get_child",
            "list_children",
            "log_intake",
            "list_intakes",
            "add_opd_report",
            "list_opd_reports",
            "recommend",
            "import_screening_csv",
            "screening_summary",
        ] {
            assert!(names.iter().any(|n| n == expected), "missing tool {}", expected);
        }
    }

    #[test]
    fn test_tools_use_injected_clock() {
        let (_dir, service) = service();
        // born after the fixed date
        let created = service.create_child(Parameters(CreateChildParams {
            name: "Asha".to_string(),
            date_of_birth: "2026-07-01".to_string(),
            sex: None,
        }));
        assert!(created.is_err());

        let created = service.create_child(Parameters(CreateChildParams {
            name: "Asha".to_string(),
            date_of_birth: "2024-06-15".to_string(),
            sex: None,
        }));
        assert!(created.is_ok());
    }
}
