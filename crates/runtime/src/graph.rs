//! Cell dependency graph
//!
//! Represents the dependency DAG over named cells, with topological levels
//! for ordered recomputation and reverse edges for dirty propagation.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::error::Error;
use crate::types::CellId;

/// A node in the cell graph
#[derive(Debug, Clone)]
pub struct CellNode {
    /// Unique cell identifier
    pub id: CellId,
    /// Cells this node reads
    pub reads: HashSet<CellId>,
    /// Index into the engine's compute function table
    pub compute_idx: usize,
}

/// A topological level: cells with no dependencies among them
#[derive(Debug, Clone)]
pub struct Level {
    /// Cells in this level
    pub cells: Vec<CellId>,
}

/// A validated, immutable cell graph
#[derive(Debug, Clone)]
pub struct CellGraph {
    nodes: IndexMap<CellId, CellNode>,
    /// Execution levels in dependency order
    levels: Vec<Level>,
    /// Direct dependents per cell (reverse edges)
    dependents: IndexMap<CellId, Vec<CellId>>,
}

impl CellGraph {
    /// Look up a node by id
    pub fn node(&self, id: &CellId) -> Option<&CellNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.nodes.contains_key(id)
    }

    /// Execution levels in dependency order
    pub fn levels(&self) -> &[Level] {
        &self.levels
    }

    /// Total number of cells
    pub fn cell_count(&self) -> usize {
        self.nodes.len()
    }

    /// All cell ids, in insertion order
    pub fn cell_ids(&self) -> impl Iterator<Item = &CellId> {
        self.nodes.keys()
    }

    /// Direct dependents of a cell
    pub fn dependents(&self, id: &CellId) -> &[CellId] {
        self.dependents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All cells reachable downstream of `id`, excluding `id` itself
    pub fn descendants(&self, id: &CellId) -> Vec<CellId> {
        let mut seen: HashSet<&CellId> = HashSet::new();
        let mut queue: Vec<&CellId> = self.dependents(id).iter().collect();
        let mut out = Vec::new();

        while let Some(next) = queue.pop() {
            if !seen.insert(next) {
                continue;
            }
            out.push(next.clone());
            queue.extend(self.dependents(next));
        }

        // Stable order regardless of traversal: sort by id
        out.sort();
        out
    }
}

/// Builder for assembling a cell graph
#[derive(Default)]
pub struct GraphBuilder {
    nodes: Vec<CellNode>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    /// Add a cell to the graph
    pub fn add_cell(&mut self, node: CellNode) {
        self.nodes.push(node);
    }

    /// Validate the graph and compute topological levels
    pub fn build(self) -> Result<CellGraph, Error> {
        let mut nodes: IndexMap<CellId, CellNode> = IndexMap::new();
        for node in self.nodes {
            if nodes.contains_key(&node.id) {
                return Err(Error::DuplicateCell(node.id));
            }
            nodes.insert(node.id.clone(), node);
        }

        // Every read must name a declared cell; the graph is closed
        for node in nodes.values() {
            for dep in &node.reads {
                if !nodes.contains_key(dep) {
                    return Err(Error::UnknownDependency {
                        cell: node.id.clone(),
                        dependency: dep.clone(),
                    });
                }
            }
        }

        let mut dependents: IndexMap<CellId, Vec<CellId>> = IndexMap::new();
        for node in nodes.values() {
            for dep in &node.reads {
                dependents.entry(dep.clone()).or_default().push(node.id.clone());
            }
        }
        for readers in dependents.values_mut() {
            readers.sort();
        }

        let levels = topological_levels(&nodes)?;

        Ok(CellGraph {
            nodes,
            levels,
            dependents,
        })
    }
}

/// Compute topological levels using Kahn's algorithm
fn topological_levels(nodes: &IndexMap<CellId, CellNode>) -> Result<Vec<Level>, Error> {
    if nodes.is_empty() {
        return Ok(Vec::new());
    }

    let mut in_degree: IndexMap<&CellId, usize> = IndexMap::new();
    let mut dependents: IndexMap<&CellId, Vec<&CellId>> = IndexMap::new();

    for node in nodes.values() {
        in_degree.insert(&node.id, node.reads.len());
        for dep in &node.reads {
            dependents.entry(dep).or_default().push(&node.id);
        }
    }

    let mut levels = Vec::new();
    let mut current_level: Vec<&CellId> = nodes
        .values()
        .filter(|n| in_degree[&n.id] == 0)
        .map(|n| &n.id)
        .collect();

    let mut processed = 0;

    while !current_level.is_empty() {
        // Sort for determinism
        current_level.sort();

        let level = Level {
            cells: current_level.iter().map(|id| (*id).clone()).collect(),
        };
        processed += level.cells.len();

        let mut next_level = Vec::new();
        for id in &current_level {
            if let Some(readers) = dependents.get(*id) {
                for reader in readers {
                    let degree = in_degree
                        .get_mut(*reader)
                        .ok_or_else(|| Error::CellNotFound((*reader).clone()))?;
                    *degree -= 1;
                    if *degree == 0 {
                        next_level.push(*reader);
                    }
                }
            }
        }

        levels.push(level);
        current_level = next_level;
    }

    if processed != nodes.len() {
        let cells: Vec<CellId> = nodes
            .values()
            .filter(|n| in_degree[&n.id] > 0)
            .map(|n| n.id.clone())
            .collect();
        return Err(Error::CycleDetected { cells });
    }

    Ok(levels)
}
