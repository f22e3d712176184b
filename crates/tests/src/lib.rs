//! Integration test harness for Covary.
//!
//! Drives the full session pipeline: controls → dataset → fit → report.

use covary_explorer::session::cells;
use covary_explorer::{
    ControlState, Dataset, FitResult, Report, ReportView, Session, SessionError,
};
use covary_runtime::{CellState, SettleReport};

/// Test harness wrapping a live session.
pub struct TestHarness {
    session: Session,
}

impl TestHarness {
    /// Harness over a session with the documented control ranges.
    ///
    /// # Panics
    ///
    /// Panics if session construction fails.
    pub fn new() -> Self {
        Self {
            session: Session::new().expect("session construction failed"),
        }
    }

    /// Harness over a session with caller-supplied controls.
    ///
    /// # Panics
    ///
    /// Panics if session construction fails.
    pub fn with_controls(controls: ControlState) -> Self {
        Self {
            session: Session::with_controls(controls).expect("session construction failed"),
        }
    }

    /// Set the sample size, panicking on rejection.
    pub fn set_n(&mut self, value: f64) -> SettleReport {
        self.session
            .set_sample_size(value)
            .expect("set_sample_size failed")
    }

    /// Set the noise sigma, panicking on rejection.
    pub fn set_sigma(&mut self, value: f64) -> SettleReport {
        self.session
            .set_noise_sigma(value)
            .expect("set_noise_sigma failed")
    }

    pub fn try_set_n(&mut self, value: f64) -> Result<SettleReport, SessionError> {
        self.session.set_sample_size(value)
    }

    pub fn try_set_sigma(&mut self, value: f64) -> Result<SettleReport, SessionError> {
        self.session.set_noise_sigma(value)
    }

    /// Current fit.
    ///
    /// # Panics
    ///
    /// Panics if the fit cell is not fresh.
    pub fn fit(&self) -> FitResult {
        *self.session.fit().expect("fit cell is not fresh")
    }

    pub fn correlation(&self) -> f64 {
        self.fit().correlation
    }

    /// Current dataset.
    ///
    /// # Panics
    ///
    /// Panics if the dataset cell is not fresh.
    pub fn dataset(&self) -> &Dataset {
        self.session.dataset().expect("dataset cell is not fresh")
    }

    /// Current report artifact.
    ///
    /// # Panics
    ///
    /// Panics if the report view is not ready.
    pub fn report(&self) -> Report {
        match self.session.report() {
            ReportView::Ready(report) => report.clone(),
            other => panic!("report view not ready: {}", other.to_text()),
        }
    }

    /// Report view rendered to text, degraded or not.
    pub fn report_text(&self) -> String {
        self.session.report().to_text()
    }

    pub fn report_ready(&self) -> bool {
        self.session.report().is_ready()
    }

    pub fn state(&self, cell: &str) -> CellState {
        self.session
            .cell_state(cell)
            .unwrap_or_else(|| panic!("unknown cell {cell}"))
    }

    pub fn runs(&self, cell: &str) -> u64 {
        self.session.cell_runs(cell)
    }

    /// Recompute counts for all cells, in dependency order.
    pub fn all_runs(&self) -> Vec<(&'static str, u64)> {
        cells::ALL.iter().map(|c| (*c, self.runs(c))).collect()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
