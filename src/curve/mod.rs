//! Scaling curves: piecewise functions from an attribute value to a scaling coefficient.
//!
//! A curve has five break points. Between two break points the coefficient grows
//! from one stage's value to the next, linearly or along a power-law blend.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Curve used for physical damage on most weapons.
pub const DEFAULT_DAMAGE_CURVE_ID: u32 = 0;

/// Curve used for status buildup scaling (arcane) when a weapon names none.
pub const STATUS_CURVE_ID: u32 = 6;

/// One curve variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalcCorrectGraph {
    /// Attribute value at each break point, ascending.
    pub stage_max_val: [f64; 5],
    /// Coefficient at each break point, in percent.
    pub stage_max_grow_val: [f64; 5],
    /// Exponent per segment. Positive: `ratio^e`; negative: `1 - (1 - ratio)^-e`.
    pub adj_pt_max_grow_val: [f64; 4],
}

impl CalcCorrectGraph {
    pub const fn new(
        stage_max_val: [f64; 5],
        stage_max_grow_val: [f64; 5],
        adj_pt_max_grow_val: [f64; 4],
    ) -> Self {
        Self {
            stage_max_val,
            stage_max_grow_val,
            adj_pt_max_grow_val,
        }
    }

    /// Scaling coefficient at `attribute_value` (1.0 means 100%).
    /// Values below the first break point are evaluated on the first segment.
    pub fn evaluate(&self, attribute_value: f64) -> f64 {
        let segment = (1..5)
            .find(|&i| attribute_value <= self.stage_max_val[i])
            .unwrap_or(4);
        let lo = self.stage_max_val[segment - 1];
        let hi = self.stage_max_val[segment];
        let grow_lo = self.stage_max_grow_val[segment - 1];
        let grow_hi = self.stage_max_grow_val[segment];
        let exponent = self.adj_pt_max_grow_val[segment - 1];

        let ratio = if hi > lo {
            ((attribute_value - lo) / (hi - lo)).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let growth = if exponent > 0.0 {
            ratio.powf(exponent)
        } else if exponent < 0.0 {
            1.0 - (1.0 - ratio).powf(-exponent)
        } else {
            ratio
        };
        (grow_lo + (grow_hi - grow_lo) * growth) / 100.0
    }
}

/// Read-only set of curve variants keyed by id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurveTable {
    graphs: BTreeMap<u32, CalcCorrectGraph>,
}

impl CurveTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The variants shipped with the game's base regulation.
    pub fn builtin() -> Self {
        let mut t = Self::new();
        for (id, graph) in BUILTIN_GRAPHS {
            t.insert(*id, graph.clone());
        }
        t
    }

    pub fn insert(&mut self, id: u32, graph: CalcCorrectGraph) {
        self.graphs.insert(id, graph);
    }

    pub fn get(&self, id: u32) -> Option<&CalcCorrectGraph> {
        self.graphs.get(&id)
    }

    pub fn contains(&self, id: u32) -> bool {
        self.graphs.contains_key(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.graphs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.graphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graphs.is_empty()
    }

    /// Coefficient for `variant_id` at `attribute_value`. Unknown variants contribute nothing.
    pub fn curve(&self, variant_id: u32, attribute_value: u32) -> f64 {
        match self.graphs.get(&variant_id) {
            Some(g) => g.evaluate(attribute_value as f64),
            None => 0.0,
        }
    }
}

const BUILTIN_GRAPHS: &[(u32, CalcCorrectGraph)] = &[
    (
        0,
        CalcCorrectGraph::new(
            [1.0, 18.0, 60.0, 80.0, 150.0],
            [0.0, 25.0, 75.0, 90.0, 110.0],
            [1.2, -1.2, 1.0, 1.0],
        ),
    ),
    (
        1,
        CalcCorrectGraph::new(
            [1.0, 20.0, 60.0, 80.0, 150.0],
            [0.0, 35.0, 75.0, 90.0, 110.0],
            [1.2, -1.2, 1.0, 1.0],
        ),
    ),
    (
        2,
        CalcCorrectGraph::new(
            [1.0, 20.0, 60.0, 80.0, 150.0],
            [0.0, 35.0, 75.0, 90.0, 110.0],
            [1.2, -1.2, 1.0, 1.0],
        ),
    ),
    (
        4,
        CalcCorrectGraph::new(
            [1.0, 20.0, 50.0, 80.0, 99.0],
            [0.0, 40.0, 80.0, 95.0, 100.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
    (
        6,
        CalcCorrectGraph::new(
            [1.0, 25.0, 45.0, 60.0, 99.0],
            [0.0, 10.0, 75.0, 90.0, 100.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
    (
        7,
        CalcCorrectGraph::new(
            [1.0, 20.0, 60.0, 80.0, 150.0],
            [0.0, 35.0, 75.0, 90.0, 110.0],
            [1.2, -1.2, 1.0, 1.0],
        ),
    ),
    (
        8,
        CalcCorrectGraph::new(
            [1.0, 16.0, 60.0, 80.0, 150.0],
            [0.0, 25.0, 65.0, 90.0, 110.0],
            [1.2, -1.2, 1.0, 1.0],
        ),
    ),
    (
        12,
        CalcCorrectGraph::new(
            [1.0, 45.0, 60.0, 90.0, 99.0],
            [0.0, 75.0, 80.0, 95.0, 100.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
    (
        14,
        CalcCorrectGraph::new(
            [1.0, 20.0, 80.0, 99.0, 150.0],
            [0.0, 40.0, 85.0, 100.0, 115.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
    (
        15,
        CalcCorrectGraph::new(
            [1.0, 10.0, 30.0, 60.0, 99.0],
            [0.0, 10.0, 50.0, 85.0, 100.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
    (
        16,
        CalcCorrectGraph::new(
            [1.0, 25.0, 45.0, 60.0, 99.0],
            [0.0, 20.0, 75.0, 85.0, 100.0],
            [1.0, 1.0, 1.0, 1.0],
        ),
    ),
];
