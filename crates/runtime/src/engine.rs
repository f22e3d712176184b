//! Settle engine
//!
//! Owns the cell graph, the compute function table, and per-cell cached
//! state. Performs invalidation (dirty propagation to descendants) and
//! settling (topological recomputation of exactly the stale cells).

use indexmap::IndexMap;
use tracing::{debug, error, instrument, trace};

use crate::error::{ComputeError, Error, Result};
use crate::graph::CellGraph;
use crate::storage::{CellValues, RunCounters};
use crate::types::{CellId, CellState, SettleReport};

/// Function that computes a cell's value from its dependencies.
///
/// The graph is mutated only on the single control thread, so compute
/// functions carry no `Send`/`Sync` bounds.
pub type ComputeFn<V> = Box<dyn Fn(&EvalContext<'_, V>) -> std::result::Result<V, ComputeError>>;

/// Dependency access handed to compute functions
pub struct EvalContext<'a, V> {
    values: &'a CellValues<V>,
}

impl<'a, V> EvalContext<'a, V> {
    /// Get a dependency's cached value
    pub fn get(&self, id: &CellId) -> Option<&'a V> {
        self.values.get(id)
    }

    /// Get a dependency's cached value, failing the computation if absent
    pub fn require(&self, id: &CellId) -> std::result::Result<&'a V, ComputeError> {
        self.values.get(id).ok_or_else(|| {
            ComputeError::new("missing-input", format!("cell {id} has no cached value"))
        })
    }
}

/// Runtime state for a cell graph
pub struct Engine<V> {
    graph: CellGraph,
    /// Compute functions indexed by `compute_idx`
    computes: Vec<ComputeFn<V>>,
    values: CellValues<V>,
    states: IndexMap<CellId, CellState>,
    errors: IndexMap<CellId, ComputeError>,
    runs: RunCounters,
}

impl<V> Engine<V> {
    /// Create an engine over a validated graph.
    ///
    /// Every cell starts Stale with no cached value; call [`settle`] to
    /// bring the graph fresh.
    ///
    /// [`settle`]: Engine::settle
    pub fn new(graph: CellGraph, computes: Vec<ComputeFn<V>>) -> Result<Self> {
        for id in graph.cell_ids() {
            let node = graph.node(id).ok_or_else(|| Error::CellNotFound(id.clone()))?;
            if node.compute_idx >= computes.len() {
                return Err(Error::InvalidComputeIndex {
                    cell: id.clone(),
                    index: node.compute_idx,
                    registered: computes.len(),
                });
            }
        }

        let states: IndexMap<CellId, CellState> = graph
            .cell_ids()
            .map(|id| (id.clone(), CellState::Stale))
            .collect();

        debug!(cells = graph.cell_count(), "engine created");
        Ok(Self {
            graph,
            computes,
            values: CellValues::default(),
            states,
            errors: IndexMap::new(),
            runs: RunCounters::default(),
        })
    }

    /// Mark a cell and all of its transitive descendants Stale.
    ///
    /// Cached values are retained (untouched cells stay memoized); recorded
    /// errors on the affected cells are cleared so they may recompute.
    pub fn invalidate(&mut self, id: &CellId) -> Result<()> {
        if !self.graph.contains(id) {
            return Err(Error::CellNotFound(id.clone()));
        }

        let mut affected = self.graph.descendants(id);
        affected.insert(0, id.clone());

        for cell in &affected {
            self.states.insert(cell.clone(), CellState::Stale);
            self.errors.shift_remove(cell);
        }

        debug!(cell = %id, stale = affected.len(), "invalidated");
        Ok(())
    }

    /// Recompute stale cells in topological order, each at most once.
    ///
    /// A cell is recomputed only when all of its direct dependencies are
    /// Fresh. A failing compute parks its cell in Errored and leaves that
    /// cell's descendants Stale; independent branches are unaffected. The
    /// engine itself never fails here.
    #[instrument(skip(self), name = "settle")]
    pub fn settle(&mut self) -> SettleReport {
        let mut report = SettleReport::default();

        let order: Vec<CellId> = self
            .graph
            .levels()
            .iter()
            .flat_map(|level| level.cells.iter().cloned())
            .collect();

        for cell_id in order {
            if self.states.get(&cell_id) != Some(&CellState::Stale) {
                continue;
            }
            let Some(node) = self.graph.node(&cell_id) else {
                continue;
            };

            let blocked = node
                .reads
                .iter()
                .any(|dep| self.states.get(dep) != Some(&CellState::Fresh));
            if blocked {
                trace!(cell = %cell_id, "blocked by unfresh dependency");
                report.blocked.push(cell_id);
                continue;
            }

            self.states.insert(cell_id.clone(), CellState::Computing);
            let compute = &self.computes[node.compute_idx];
            let ctx = EvalContext {
                values: &self.values,
            };
            match compute(&ctx) {
                Ok(value) => {
                    self.values.set(cell_id.clone(), value);
                    self.states.insert(cell_id.clone(), CellState::Fresh);
                    self.runs.bump(&cell_id);
                    trace!(cell = %cell_id, "cell fresh");
                    report.recomputed.push(cell_id);
                }
                Err(err) => {
                    error!(cell = %cell_id, %err, "cell computation failed");
                    self.states.insert(cell_id.clone(), CellState::Errored);
                    self.errors.insert(cell_id.clone(), err);
                    report.errored.push(cell_id);
                }
            }
        }

        debug!(
            recomputed = report.recomputed.len(),
            errored = report.errored.len(),
            blocked = report.blocked.len(),
            "settle complete"
        );
        report
    }

    /// Last successfully computed value for a cell
    pub fn value(&self, id: &CellId) -> Option<&V> {
        self.values.get(id)
    }

    /// Current lifecycle state of a cell
    pub fn state(&self, id: &CellId) -> Option<CellState> {
        self.states.get(id).copied()
    }

    /// Recorded error for a cell in the Errored state
    pub fn error(&self, id: &CellId) -> Option<&ComputeError> {
        self.errors.get(id)
    }

    /// Number of times a cell has been recomputed
    pub fn runs(&self, id: &CellId) -> u64 {
        self.runs.get(id)
    }

    pub fn graph(&self) -> &CellGraph {
        &self.graph
    }
}
