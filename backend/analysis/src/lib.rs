//! `snapsight-analysis` — the analysis core.
//!
//! Three stateless components: the multi-feature orchestrator (fan-out
//! with per-feature error isolation), the face comparator (one atomic
//! remote call), and the report builder (pure construction of the audit
//! document). Every call is independent; nothing here holds state between
//! invocations.

pub mod comparator;
pub mod orchestrator;
pub mod report;

pub use comparator::compare_faces;
pub use orchestrator::run_analyses;
pub use report::{build_analysis_report, build_comparison_report, report_filename_hint};
