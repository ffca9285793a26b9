use serde::{Deserialize, Serialize};
use serde_json;

use crate::engine::{MatchContext, PeriodSummary, ToggleDecision};
use crate::error::PlanError;
use crate::models::MatchSettings;
use crate::save::{migrate_snapshot, PlanSnapshot};

/// Stable error codes carried in front of every error message.
pub mod error_codes {
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const UNKNOWN_PLAYER: &str = "UNKNOWN_PLAYER";
    pub const UNKNOWN_PERIOD: &str = "UNKNOWN_PERIOD";
    pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
    pub const INCONSISTENT_STATE: &str = "INCONSISTENT_STATE";
    pub const SERIALIZE_FAILED: &str = "SERIALIZE_FAILED";
}

fn err_code(code: &str, message: impl std::fmt::Display) -> String {
    format!("{code}: {message}")
}

fn plan_error_code(err: &PlanError) -> &'static str {
    match err {
        PlanError::UnknownPlayer(_) => error_codes::UNKNOWN_PLAYER,
        PlanError::UnknownPeriod(_) => error_codes::UNKNOWN_PERIOD,
        PlanError::InvalidDuration(_) | PlanError::InvalidCapacity(_) => error_codes::INVALID_CONFIG,
        PlanError::InconsistentState(_) => error_codes::INCONSISTENT_STATE,
        PlanError::Serialization(_) => error_codes::SERIALIZE_FAILED,
        _ => error_codes::BAD_REQUEST,
    }
}

fn to_api_error(err: PlanError) -> String {
    err_code(plan_error_code(&err), err)
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub player: String,
    pub period: String,
    /// Desired on-field state; absent means take the player off.
    #[serde(default)]
    pub on: bool,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    /// "allowed" or "denied".
    pub decision: &'static str,
    /// Denial reason ("capacity_exceeded" / "player_unavailable"), if any.
    pub reason: Option<&'static str>,
    /// Labels of follow-on periods the change was carried into.
    pub propagated: Vec<String>,
    /// Label of the full period that cut propagation short, if any.
    pub stopped_at: Option<String>,
    /// Position the player covers, echoed when they were put on.
    pub active_position: Option<String>,
}

/// Applies one on/off request and reports what happened.
pub fn toggle_assignment_json(
    ctx: &mut MatchContext,
    request_json: &str,
) -> Result<String, String> {
    let request: ToggleRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("Invalid JSON request: {e}")))?;

    let outcome = ctx
        .toggle(&request.player, &request.period, request.on)
        .map_err(to_api_error)?;

    let response = match outcome.decision {
        ToggleDecision::Allowed => {
            let propagation = outcome.propagation.unwrap_or_default();
            ToggleResponse {
                decision: "allowed",
                reason: None,
                propagated: propagation.applied.iter().map(|p| p.to_string()).collect(),
                stopped_at: propagation.stopped_at.map(|p| p.to_string()),
                active_position: outcome.active_position,
            }
        }
        ToggleDecision::Denied(reason) => ToggleResponse {
            decision: "denied",
            reason: Some(match reason {
                crate::engine::DenyReason::CapacityExceeded => "capacity_exceeded",
                crate::engine::DenyReason::PlayerUnavailable => "player_unavailable",
            }),
            propagated: Vec::new(),
            stopped_at: None,
            active_position: None,
        },
    };

    serde_json::to_string(&response)
        .map_err(PlanError::from)
        .map_err(to_api_error)
}

#[derive(Debug, Deserialize)]
pub struct AvailabilityRequest {
    pub player: String,
    pub available: bool,
}

pub fn set_availability_json(
    ctx: &mut MatchContext,
    request_json: &str,
) -> Result<String, String> {
    let request: AvailabilityRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("Invalid JSON request: {e}")))?;

    ctx.set_available(&request.player, request.available)
        .map_err(to_api_error)?;

    plan_overview_json(ctx)
}

#[derive(Debug, Deserialize)]
pub struct ConfigureRequest {
    #[serde(default)]
    pub total_minutes: Option<u32>,
    #[serde(default)]
    pub on_field_count: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ConfigureResponse {
    pub settings: MatchSettings,
    pub periods: Vec<String>,
}

/// Applies duration and field-size changes in one request. The values are
/// validated together, so a rejected request changes nothing.
pub fn configure_plan_json(ctx: &mut MatchContext, request_json: &str) -> Result<String, String> {
    let request: ConfigureRequest = serde_json::from_str(request_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("Invalid JSON request: {e}")))?;

    ctx.configure(request.total_minutes, request.on_field_count)
        .map_err(to_api_error)?;

    let response = ConfigureResponse {
        settings: ctx.settings(),
        periods: ctx.periods().iter().map(|p| p.to_string()).collect(),
    };
    serde_json::to_string(&response)
        .map_err(PlanError::from)
        .map_err(to_api_error)
}

#[derive(Debug, Serialize)]
pub struct PlanReportResponse {
    pub settings: MatchSettings,
    pub used_minutes: u64,
    pub capacity_minutes: u64,
    pub summaries: Vec<PeriodSummary>,
}

/// Full per-period report plus capacity totals.
pub fn plan_report_json(ctx: &MatchContext) -> Result<String, String> {
    let totals = ctx.plan_totals();
    let response = PlanReportResponse {
        settings: ctx.settings(),
        used_minutes: totals.used_minutes,
        capacity_minutes: totals.capacity_minutes,
        summaries: ctx.summarize(),
    };
    serde_json::to_string(&response)
        .map_err(PlanError::from)
        .map_err(to_api_error)
}

#[derive(Debug, Serialize)]
pub struct PlayerOverview {
    pub name: String,
    pub position: String,
    pub available: bool,
    pub total_minutes: u32,
    pub target_minutes: u32,
    pub difference: i64,
}

#[derive(Debug, Serialize)]
pub struct PlanOverviewResponse {
    pub settings: MatchSettings,
    pub players: Vec<PlayerOverview>,
}

/// Per-player playtime table for roster screens.
pub fn plan_overview_json(ctx: &MatchContext) -> Result<String, String> {
    let players = ctx
        .roster()
        .players()
        .iter()
        .map(|p| PlayerOverview {
            name: p.name.clone(),
            position: p.active_position.clone(),
            available: p.available,
            total_minutes: p.metrics.total_minutes,
            target_minutes: p.metrics.target_minutes,
            difference: p.metrics.difference,
        })
        .collect();
    let response = PlanOverviewResponse {
        settings: ctx.settings(),
        players,
    };
    serde_json::to_string(&response)
        .map_err(PlanError::from)
        .map_err(to_api_error)
}

/// The whole plan as interchange JSON, period labels as map keys.
pub fn export_plan_json(ctx: &MatchContext) -> Result<String, String> {
    let snapshot = PlanSnapshot::from_context(ctx);
    serde_json::to_string(&snapshot)
        .map_err(PlanError::from)
        .map_err(to_api_error)
}

/// Rebuilds a live context from interchange JSON. Older snapshot versions
/// pass through the same migration as disk loads; newer ones are refused.
pub fn import_plan_json(plan_json: &str) -> Result<MatchContext, String> {
    let snapshot: PlanSnapshot = serde_json::from_str(plan_json)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, format!("Invalid JSON plan: {e}")))?;
    let snapshot = migrate_snapshot(snapshot)
        .map_err(|e| err_code(error_codes::BAD_REQUEST, e))?;
    snapshot
        .validate()
        .map_err(|e| err_code(error_codes::BAD_REQUEST, e))?;
    snapshot
        .into_context()
        .map_err(|e| err_code(error_codes::INCONSISTENT_STATE, e))
}
