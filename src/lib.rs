//! End-to-end API test harness for the pet-store REST service.
//!
//! The library wraps `reqwest` in one client per resource family (pets, the
//! store, users), owns a per-test [`World`] that opens and disposes the HTTP
//! context around every scenario or spec case, and drives two independent
//! runners: one executing narrative feature files through a table-driven
//! step registry, and one executing code-style spec suites. Both runners
//! attach request and response evidence to their own reports.

pub mod config;
pub mod evidence;
pub mod expect;
pub mod generate;
pub mod harness;
pub mod petstore;
pub mod scenario;
pub mod session;
pub mod specs;
pub mod steps;
pub mod telemetry;

mod error;
mod report;

pub use config::{HarnessConfig, RunnerMode};
pub use error::HarnessError;
pub use evidence::{Evidence, EvidenceSink, JsonlEvidenceSink, NoopEvidenceSink};
pub use harness::RunOutcome;
pub use report::{ReportPaths, Summary};
pub use petstore::{
    ApiError, ApiResponse, CapturedResponse, ContextSettings, HttpContext, PetClient,
    ResponseBody, StoreClient, UserClient,
};
pub use scenario::{ScenarioReport, ScenarioRunner, TagFilter};
pub use specs::{SpecReport, SpecRunner};
pub use steps::StepRegistry;
pub use session::{StepError, World};
