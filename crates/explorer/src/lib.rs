//! Covary Explorer
//!
//! Interactive bivariate relationship exploration: two bounded controls
//! drive dataset regeneration, correlation/least-squares analysis, and
//! report rendering over the covary-runtime cell graph.

pub mod dataset;
pub mod params;
pub mod report;
pub mod session;
pub mod stats;

pub use dataset::{Dataset, GenerateError, generate};
pub use params::{ControlState, OutOfRangeError, ParamId, Parameter};
pub use report::{Report, RenderError, Summary, render};
pub use session::{CellValue, ReportView, Session, SessionError};
pub use stats::{AnalyzeError, FitResult, analyze};
