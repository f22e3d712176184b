//! Cell value storage
//!
//! Caches per cell: last successfully computed value and recompute counts.

use indexmap::IndexMap;

use crate::types::CellId;

/// Cached values per cell
#[derive(Debug)]
pub struct CellValues<V> {
    values: IndexMap<CellId, V>,
}

impl<V> Default for CellValues<V> {
    fn default() -> Self {
        Self {
            values: IndexMap::new(),
        }
    }
}

impl<V> CellValues<V> {
    pub fn get(&self, id: &CellId) -> Option<&V> {
        self.values.get(id)
    }

    pub fn set(&mut self, id: CellId, value: V) {
        self.values.insert(id, value);
    }

    pub fn contains(&self, id: &CellId) -> bool {
        self.values.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Per-cell recompute counters
#[derive(Debug, Default)]
pub struct RunCounters {
    counts: IndexMap<CellId, u64>,
}

impl RunCounters {
    pub fn bump(&mut self, id: &CellId) {
        *self.counts.entry(id.clone()).or_default() += 1;
    }

    pub fn get(&self, id: &CellId) -> u64 {
        self.counts.get(id).copied().unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_values_overwrite() {
        let mut values: CellValues<f64> = CellValues::default();
        let id: CellId = "cell.a".into();

        assert!(values.is_empty());
        values.set(id.clone(), 1.0);
        assert_eq!(values.get(&id), Some(&1.0));

        values.set(id.clone(), 2.0);
        assert_eq!(values.get(&id), Some(&2.0));
        assert_eq!(values.len(), 1);
    }

    #[test]
    fn test_run_counters_bump() {
        let mut runs = RunCounters::default();
        let id: CellId = "cell.a".into();

        assert_eq!(runs.get(&id), 0);
        runs.bump(&id);
        runs.bump(&id);
        assert_eq!(runs.get(&id), 2);
        assert_eq!(runs.get(&"cell.b".into()), 0);
    }
}
