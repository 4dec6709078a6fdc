//! Weighted probabilistic routing between stations
//!
//! Edges are kept sorted by descending probability; equal probabilities
//! keep their registration order. Selection draws `u` from `[0, 1)`, walks
//! the edges accumulating probability mass and returns the first edge whose
//! cumulative mass is strictly greater than `u`.
//!
//! ```text
//! edges {A: 0.3, B: 0.7}  →  walk order B (0.7), A (1.0)
//! u = 0.0        → B
//! u = 0.3000001  → B
//! u = 0.7        → A   (0.7 is not > 0.7)
//! u = 0.9999     → A
//! ```

use crate::events::StationId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Absolute tolerance when checking that edge probabilities sum to 1.0
pub const ROUTING_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum RoutingError {
    #[error("Routing probability must lie in (0, 1], got {0}")]
    InvalidProbability(f64),

    #[error("No output edges registered")]
    NoEdges,

    #[error("Output probabilities sum to {total}, expected 1.0")]
    ProbabilitySum { total: f64 },

    #[error("Draw {draw} is not covered by any output edge; ensure probabilities sum to unity")]
    Exhausted { draw: f64 },
}

/// One routing edge
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OutputEdge {
    pub station: StationId,
    pub probability: f64,
}

/// Ordered set of routing edges for one station
#[derive(Debug, Clone, Default)]
pub struct RoutingTable {
    edges: Vec<OutputEdge>,
    validated: bool,
}

impl RoutingTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an edge
    ///
    /// The edge is placed after every edge with a probability greater than
    /// or equal to its own, which keeps ties in registration order.
    pub fn add(&mut self, station: StationId, probability: f64) -> Result<(), RoutingError> {
        if !(probability > 0.0 && probability <= 1.0) {
            return Err(RoutingError::InvalidProbability(probability));
        }
        let position = self
            .edges
            .iter()
            .position(|edge| edge.probability < probability)
            .unwrap_or(self.edges.len());
        self.edges.insert(position, OutputEdge { station, probability });
        self.validated = false;
        Ok(())
    }

    /// Edges in walk order
    pub fn edges(&self) -> &[OutputEdge] {
        &self.edges
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn total_probability(&self) -> f64 {
        self.edges.iter().map(|edge| edge.probability).sum()
    }

    /// Check the sum once; later calls are free until another edge is added
    pub fn validate(&mut self) -> Result<(), RoutingError> {
        if self.validated {
            return Ok(());
        }
        if self.edges.is_empty() {
            return Err(RoutingError::NoEdges);
        }
        let total = self.total_probability();
        if (total - 1.0).abs() > ROUTING_TOLERANCE {
            return Err(RoutingError::ProbabilitySum { total });
        }
        self.validated = true;
        Ok(())
    }

    /// Pick the destination for a uniform draw in `[0, 1)`
    ///
    /// Does not validate; an edge set summing below the draw is exhausted.
    pub fn select(&self, draw: f64) -> Result<StationId, RoutingError> {
        let mut cumulative = 0.0;
        for edge in &self.edges {
            cumulative += edge.probability;
            if cumulative > draw {
                return Ok(edge.station);
            }
        }

        // a sum within tolerance below 1.0 can leave the very top of
        // [0, 1) uncovered; it belongs to the last edge
        match self.edges.last() {
            Some(last) if self.validated && draw < 1.0 => Ok(last.station),
            _ => Err(RoutingError::Exhausted { draw }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: StationId = StationId(1);
    const B: StationId = StationId(2);
    const C: StationId = StationId(3);

    fn two_way() -> RoutingTable {
        let mut table = RoutingTable::new();
        table.add(A, 0.3).unwrap();
        table.add(B, 0.7).unwrap();
        table.validate().unwrap();
        table
    }

    #[test]
    fn test_edges_sorted_descending() {
        let table = two_way();
        let order: Vec<StationId> = table.edges().iter().map(|e| e.station).collect();
        assert_eq!(order, vec![B, A]);
    }

    #[test]
    fn test_ties_keep_registration_order() {
        let mut table = RoutingTable::new();
        table.add(A, 0.25).unwrap();
        table.add(B, 0.5).unwrap();
        table.add(C, 0.25).unwrap();

        let order: Vec<StationId> = table.edges().iter().map(|e| e.station).collect();
        assert_eq!(order, vec![B, A, C]);
    }

    #[test]
    fn test_boundary_convention() {
        let table = two_way();
        assert_eq!(table.select(0.0), Ok(B));
        assert_eq!(table.select(0.3000001), Ok(B));
        assert_eq!(table.select(0.6999999), Ok(B));
        assert_eq!(table.select(0.7), Ok(A));
        assert_eq!(table.select(0.9999999), Ok(A));
    }

    #[test]
    fn test_rejects_out_of_range_probability() {
        let mut table = RoutingTable::new();
        assert_eq!(table.add(A, 0.0), Err(RoutingError::InvalidProbability(0.0)));
        assert_eq!(table.add(A, 1.5), Err(RoutingError::InvalidProbability(1.5)));
        assert!(table.add(A, f64::NAN).is_err());
        assert!(table.is_empty());
    }

    #[test]
    fn test_validate_rejects_bad_sum() {
        let mut table = RoutingTable::new();
        table.add(A, 0.3).unwrap();
        table.add(B, 0.3).unwrap();
        assert!(matches!(
            table.validate(),
            Err(RoutingError::ProbabilitySum { .. })
        ));
    }

    #[test]
    fn test_unvalidated_short_sum_is_exhausted() {
        let mut table = RoutingTable::new();
        table.add(A, 0.4).unwrap();
        assert_eq!(table.select(0.2), Ok(A));
        assert_eq!(table.select(0.5), Err(RoutingError::Exhausted { draw: 0.5 }));
    }

    #[test]
    fn test_empty_table_fails_validation() {
        let mut table = RoutingTable::new();
        assert_eq!(table.validate(), Err(RoutingError::NoEdges));
    }

    #[test]
    fn test_adding_edge_requires_revalidation() {
        let mut table = RoutingTable::new();
        table.add(A, 1.0).unwrap();
        table.validate().unwrap();
        table.add(B, 0.5).unwrap();
        assert!(table.validate().is_err());
    }
}
