//! Session wiring
//!
//! Builds the explorer's cell graph — controls feeding dataset generation,
//! analysis, and report rendering — over a [`covary_runtime::Engine`], and
//! routes parameter mutations through validation, invalidation, and settle.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use thiserror::Error;
use tracing::info;

use covary_runtime::engine::{ComputeFn, Engine, EvalContext};
use covary_runtime::graph::{CellNode, GraphBuilder};
use covary_runtime::{CellId, CellState, ComputeError, SettleReport};

use crate::dataset::{self, DEFAULT_SEED, Dataset};
use crate::params::{ControlState, OutOfRangeError, ParamId};
use crate::report::{self, Report};
use crate::stats::{self, FitResult};

/// Cell ids in the session graph
pub mod cells {
    pub const SAMPLE_SIZE: &str = "control.n";
    pub const NOISE_SIGMA: &str = "control.sigma";
    pub const DATASET: &str = "data.points";
    pub const FIT: &str = "stats.fit";
    pub const REPORT: &str = "view.report";

    /// All cells in dependency order
    pub const ALL: [&str; 5] = [SAMPLE_SIZE, NOISE_SIGMA, DATASET, FIT, REPORT];
}

/// Stable error kinds recorded against Errored cells
pub mod error_kind {
    pub const INVALID_PARAMETER: &str = "invalid-parameter";
    pub const INSUFFICIENT_DATA: &str = "insufficient-data";
    pub const RENDER: &str = "render";
    pub const TYPE_MISMATCH: &str = "type-mismatch";
}

/// Value carried by a session cell
#[derive(Debug, Clone)]
pub enum CellValue {
    Scalar(f64),
    Data(Dataset),
    Fit(FitResult),
    View(Report),
}

impl CellValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            CellValue::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_data(&self) -> Option<&Dataset> {
        match self {
            CellValue::Data(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_fit(&self) -> Option<&FitResult> {
        match self {
            CellValue::Fit(f) => Some(f),
            _ => None,
        }
    }

    pub fn as_view(&self) -> Option<&Report> {
        match self {
            CellValue::View(r) => Some(r),
            _ => None,
        }
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    OutOfRange(#[from] OutOfRangeError),

    #[error(transparent)]
    Runtime(#[from] covary_runtime::Error),
}

/// What the session can currently display
#[derive(Debug, Clone, PartialEq)]
pub enum ReportView<'a> {
    /// The report cell is fresh
    Ready(&'a Report),
    /// An upstream cell failed; the report shows the failure instead
    Degraded {
        cell: CellId,
        error: &'a ComputeError,
    },
    /// No value yet (settle has not run)
    Pending,
}

impl ReportView<'_> {
    /// Plain-text rendering for the harness binaries
    pub fn to_text(&self) -> String {
        match self {
            ReportView::Ready(report) => report.summary.clone(),
            ReportView::Degraded { cell, error } => {
                format!("report unavailable: cell {cell} failed: {error}")
            }
            ReportView::Pending => "report not yet computed".to_string(),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, ReportView::Ready(_))
    }
}

fn scalar_input(ctx: &EvalContext<'_, CellValue>, id: &CellId) -> Result<f64, ComputeError> {
    ctx.require(id)?.as_scalar().ok_or_else(|| {
        ComputeError::new(error_kind::TYPE_MISMATCH, format!("cell {id} is not a scalar"))
    })
}

fn data_input<'a>(
    ctx: &EvalContext<'a, CellValue>,
    id: &CellId,
) -> Result<&'a Dataset, ComputeError> {
    ctx.require(id)?.as_data().ok_or_else(|| {
        ComputeError::new(error_kind::TYPE_MISMATCH, format!("cell {id} is not a dataset"))
    })
}

fn fit_input<'a>(
    ctx: &EvalContext<'a, CellValue>,
    id: &CellId,
) -> Result<&'a FitResult, ComputeError> {
    ctx.require(id)?.as_fit().ok_or_else(|| {
        ComputeError::new(error_kind::TYPE_MISMATCH, format!("cell {id} is not a fit"))
    })
}

/// A live explorer session: control state plus the settled cell graph
pub struct Session {
    engine: Engine<CellValue>,
    controls: Rc<RefCell<ControlState>>,
}

impl Session {
    /// Session with the documented control ranges and defaults
    pub fn new() -> Result<Self, covary_runtime::Error> {
        Self::with_controls(ControlState::new())
    }

    /// Session with caller-supplied controls.
    ///
    /// The graph is settled once before returning, so every cell starts
    /// Fresh for in-bounds defaults.
    pub fn with_controls(controls: ControlState) -> Result<Self, covary_runtime::Error> {
        let controls = Rc::new(RefCell::new(controls));

        let n_id: CellId = cells::SAMPLE_SIZE.into();
        let sigma_id: CellId = cells::NOISE_SIGMA.into();
        let data_id: CellId = cells::DATASET.into();
        let fit_id: CellId = cells::FIT.into();
        let report_id: CellId = cells::REPORT.into();

        let mut builder = GraphBuilder::new();
        let mut computes: Vec<ComputeFn<CellValue>> = Vec::new();

        // Roots read the injected control state
        let ctl = Rc::clone(&controls);
        builder.add_cell(CellNode {
            id: n_id.clone(),
            reads: HashSet::new(),
            compute_idx: computes.len(),
        });
        computes.push(Box::new(move |_ctx| {
            Ok(CellValue::Scalar(ctl.borrow().get(ParamId::SampleSize).value()))
        }));

        let ctl = Rc::clone(&controls);
        builder.add_cell(CellNode {
            id: sigma_id.clone(),
            reads: HashSet::new(),
            compute_idx: computes.len(),
        });
        computes.push(Box::new(move |_ctx| {
            Ok(CellValue::Scalar(ctl.borrow().get(ParamId::NoiseSigma).value()))
        }));

        // data.points <- (n, sigma)
        builder.add_cell(CellNode {
            id: data_id.clone(),
            reads: [n_id.clone(), sigma_id.clone()].into_iter().collect(),
            compute_idx: computes.len(),
        });
        let (n_dep, sigma_dep) = (n_id.clone(), sigma_id.clone());
        computes.push(Box::new(move |ctx| {
            let n = scalar_input(ctx, &n_dep)? as i64;
            let sigma = scalar_input(ctx, &sigma_dep)?;
            let data = dataset::generate(n, sigma, DEFAULT_SEED)
                .map_err(|e| ComputeError::new(error_kind::INVALID_PARAMETER, e.to_string()))?;
            Ok(CellValue::Data(data))
        }));

        // stats.fit <- data.points
        builder.add_cell(CellNode {
            id: fit_id.clone(),
            reads: [data_id.clone()].into_iter().collect(),
            compute_idx: computes.len(),
        });
        let data_dep = data_id.clone();
        computes.push(Box::new(move |ctx| {
            let fit = stats::analyze(data_input(ctx, &data_dep)?)
                .map_err(|e| ComputeError::new(error_kind::INSUFFICIENT_DATA, e.to_string()))?;
            Ok(CellValue::Fit(fit))
        }));

        // view.report <- (n, sigma, data.points, stats.fit)
        builder.add_cell(CellNode {
            id: report_id,
            reads: [n_id.clone(), sigma_id.clone(), data_id.clone(), fit_id.clone()]
                .into_iter()
                .collect(),
            compute_idx: computes.len(),
        });
        let (n_dep, sigma_dep, data_dep, fit_dep) = (n_id, sigma_id, data_id, fit_id);
        computes.push(Box::new(move |ctx| {
            let n = scalar_input(ctx, &n_dep)? as i64;
            let sigma = scalar_input(ctx, &sigma_dep)?;
            let data = data_input(ctx, &data_dep)?;
            let fit = fit_input(ctx, &fit_dep)?;
            let report = report::render(data, fit, n, sigma)
                .map_err(|e| ComputeError::new(error_kind::RENDER, e.to_string()))?;
            Ok(CellValue::View(report))
        }));

        let engine = Engine::new(builder.build()?, computes)?;
        let mut session = Self { engine, controls };

        let settled = session.engine.settle();
        info!(
            recomputed = settled.recomputed.len(),
            clean = settled.is_clean(),
            "session initialized"
        );
        Ok(session)
    }

    /// Mutate a control parameter and settle the affected cells.
    ///
    /// An out-of-range value is rejected before the graph is touched: the
    /// prior value is retained and nothing recomputes.
    pub fn set(&mut self, param: ParamId, value: f64) -> Result<SettleReport, SessionError> {
        self.controls.borrow_mut().set(param, value)?;

        let cell: CellId = match param {
            ParamId::SampleSize => cells::SAMPLE_SIZE.into(),
            ParamId::NoiseSigma => cells::NOISE_SIGMA.into(),
        };
        self.engine.invalidate(&cell)?;
        Ok(self.engine.settle())
    }

    pub fn set_sample_size(&mut self, value: f64) -> Result<SettleReport, SessionError> {
        self.set(ParamId::SampleSize, value)
    }

    pub fn set_noise_sigma(&mut self, value: f64) -> Result<SettleReport, SessionError> {
        self.set(ParamId::NoiseSigma, value)
    }

    /// Current displayable state of the report cell
    pub fn report(&self) -> ReportView<'_> {
        let report_id: CellId = cells::REPORT.into();
        if self.engine.state(&report_id) == Some(CellState::Fresh) {
            if let Some(report) = self.engine.value(&report_id).and_then(CellValue::as_view) {
                return ReportView::Ready(report);
            }
        }

        // Surface the deepest upstream failure
        for cell in cells::ALL {
            let id: CellId = cell.into();
            if let Some(error) = self.engine.error(&id) {
                return ReportView::Degraded { cell: id, error };
            }
        }
        ReportView::Pending
    }

    /// Last computed fit, if the fit cell is fresh
    pub fn fit(&self) -> Option<&FitResult> {
        let id: CellId = cells::FIT.into();
        if self.engine.state(&id) != Some(CellState::Fresh) {
            return None;
        }
        self.engine.value(&id).and_then(CellValue::as_fit)
    }

    /// Last generated dataset, if the dataset cell is fresh
    pub fn dataset(&self) -> Option<&Dataset> {
        let id: CellId = cells::DATASET.into();
        if self.engine.state(&id) != Some(CellState::Fresh) {
            return None;
        }
        self.engine.value(&id).and_then(CellValue::as_data)
    }

    pub fn sample_size(&self) -> i64 {
        self.controls.borrow().sample_size()
    }

    pub fn noise_sigma(&self) -> f64 {
        self.controls.borrow().noise_sigma()
    }

    pub fn cell_state(&self, cell: &str) -> Option<CellState> {
        self.engine.state(&cell.into())
    }

    pub fn cell_runs(&self, cell: &str) -> u64 {
        self.engine.runs(&cell.into())
    }
}
