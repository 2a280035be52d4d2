//! Shared application service layer for airframe.
//!
//! Loads studies into runtime geometry, attaches cached airfoil polars, runs
//! the solver comparison and exports CAD scripts. The CLI is a thin shell
//! over these functions.

pub mod compare_service;
pub mod demo;
pub mod error;
pub mod export_service;
pub mod polar_service;
pub mod project_service;

pub use compare_service::{
    ComparisonOptions, ComparisonRow, ComparisonTable, build_rows, format_g, render_table,
    run_comparison,
};
pub use demo::{demo_airplane, demo_study};
pub use error::{AppError, AppResult};
pub use export_service::export_vspscript;
pub use polar_service::{PolarOptions, attach_polars};
pub use project_service::{
    StudySummary, build_airplane, build_operating_point, load_study, save_study, summarize,
    validate_study,
};
