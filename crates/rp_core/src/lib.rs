//! # rp_core - Substitution Planning Engine
//!
//! This library plans playing-time rotations for small-sided football
//! matches: it splits the match into substitution-friendly periods, tracks
//! who is on the field when, and keeps every change inside the field-size
//! limit while pushing playtime toward an even split.
//!
//! ## Features
//! - Half-aware periods (15-minute opener, 10-minute windows)
//! - Forward propagation of toggles with capacity-based early stop
//! - Per-player playtime totals, targets, and differences
//! - Per-period report with substitutions, formation, and bench
//! - Compressed, checksummed snapshots with versioned migration
//! - JSON API for easy integration

pub mod api;
pub mod engine;
pub mod error;
pub mod models;
pub mod save;

// Re-export main API functions
pub use api::{
    configure_plan_json, export_plan_json, import_plan_json, plan_overview_json, plan_report_json,
    set_availability_json, toggle_assignment_json, AvailabilityRequest, ConfigureRequest,
    ToggleRequest,
};
pub use error::{PlanError, Result};

// Re-export the engine surface
pub use engine::{
    half_boundary_index, plan_totals, recompute_metrics, summarize, validate_toggle, DenyReason,
    MatchContext, PeriodSummary, PlanTotals, PropagationReport, ToggleDecision, ToggleOutcome,
};

// Re-export model types
pub use models::{
    generate_periods, position_capacity, MatchSettings, Period, PlayerEntry, PlayerMetrics,
    PositionGroup, Roster,
};

// Re-export snapshot persistence
pub use save::{PlanSnapshot, SnapshotError, SnapshotInfo, SnapshotManager};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use sha2::{Digest, Sha256};

    fn sha256_hex(bytes: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(bytes);
        format!("{:x}", hasher.finalize())
    }

    #[test]
    fn test_basic_planning_flow() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();

        let labels: Vec<String> = ctx.periods().iter().map(|p| p.to_string()).collect();
        assert_eq!(
            labels,
            vec!["0-15", "15-25", "25-35", "35-40", "40-50", "50-60", "60-70", "70-80"]
        );

        let outcome = ctx.toggle("Karen", "0-15", true).unwrap();
        assert!(outcome.decision.is_allowed());

        let karen = ctx.roster().player("Karen").unwrap();
        assert_eq!(karen.metrics.total_minutes, 40);
        assert_eq!(karen.metrics.target_minutes, 55);
        assert_eq!(karen.metrics.difference, -15);

        let summaries = ctx.summarize();
        assert_eq!(summaries[0].came_on, vec!["Karen"]);
        assert_eq!(summaries[0].attack, vec!["Karen"]);
    }

    #[test]
    fn test_snapshot_bytes_are_deterministic() {
        let mut ctx = MatchContext::with_starter_roster(MatchSettings::default()).unwrap();
        ctx.toggle("Karen", "0-15", true).unwrap();
        ctx.toggle("Susanne", "40-50", true).unwrap();

        let mut a = PlanSnapshot::from_context(&ctx);
        let mut b = PlanSnapshot::from_context(&ctx);
        // Pin the only field that varies between captures.
        a.timestamp = 0;
        b.timestamp = 0;

        let bytes_a = save::serialize_and_compress(&a).unwrap();
        let bytes_b = save::serialize_and_compress(&b).unwrap();
        assert_eq!(sha256_hex(&bytes_a), sha256_hex(&bytes_b));
    }

    #[test]
    fn test_version_is_exposed() {
        assert!(!VERSION.is_empty());
    }
}
