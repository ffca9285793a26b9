pub mod json_api;

pub use json_api::{
    configure_plan_json, export_plan_json, import_plan_json, plan_overview_json, plan_report_json,
    set_availability_json, toggle_assignment_json, AvailabilityRequest, ConfigureRequest,
    ToggleRequest,
};
