//! Grouping accumulators
//!
//! Buckets are created on the first row for a key, updated on every later
//! row for that key, and never removed. Iteration follows first-seen key order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::Hash;

/// Insertion-ordered map of group key -> accumulator.
#[derive(Debug, Clone)]
pub struct GroupedAccumulator<K, A> {
    index: HashMap<K, usize>,
    buckets: Vec<(K, A)>,
}

impl<K, A> Default for GroupedAccumulator<K, A> {
    fn default() -> Self {
        Self {
            index: HashMap::new(),
            buckets: Vec::new(),
        }
    }
}

impl<K, A> GroupedAccumulator<K, A>
where
    K: Eq + Hash + Clone,
    A: Default,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulator for `key`, created empty on first use.
    pub fn bucket(&mut self, key: K) -> &mut A {
        let pos = match self.index.get(&key) {
            Some(&pos) => pos,
            None => {
                let pos = self.buckets.len();
                self.index.insert(key.clone(), pos);
                self.buckets.push((key, A::default()));
                pos
            }
        };
        &mut self.buckets[pos].1
    }

    pub fn get(&self, key: &K) -> Option<&A> {
        self.index.get(key).map(|&pos| &self.buckets[pos].1)
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Finalize into (key, accumulator) pairs in first-seen order.
    pub fn into_buckets(self) -> Vec<(K, A)> {
        self.buckets
    }
}

/// Running sum of sale amounts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesTotal {
    pub total: f64,
}

impl SalesTotal {
    pub fn add(&mut self, amount: f64) {
        self.total += amount;
    }
}

/// Number of matching rows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCount {
    pub count: u64,
}

impl RowCount {
    pub fn increment(&mut self) {
        self.count += 1;
    }
}

/// Transactions, quantity and revenue for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionTotals {
    pub transactions: u64,
    pub quantities: f64,
    pub revenue: f64,
}

impl TransactionTotals {
    pub fn record(&mut self, quantity: f64, revenue: f64) {
        self.transactions += 1;
        self.quantities += quantity;
        self.revenue += revenue;
    }
}
