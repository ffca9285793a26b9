//! Planning engine: toggle validation, forward propagation, playtime
//! metrics and the per-period report.

pub mod context;
pub mod metrics;
pub mod propagate;
pub mod report;
pub mod validate;


pub use context::{MatchContext, ToggleOutcome};
pub use metrics::{plan_totals, recompute_metrics, PlanTotals};
pub use propagate::{half_boundary_index, propagate_from, PropagationReport};
pub use report::{summarize, PeriodSummary};
pub use validate::{validate_toggle, DenyReason, ToggleDecision};
