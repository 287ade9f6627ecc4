//! Layout measurement: the height oracle the pagination engine depends on.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::pagination::document::NodeId;

/// Returns the rendered height of a node in layout pixels, vertical margins included.
///
/// Implementations must reflect settled geometry (fonts loaded, styles applied).
pub trait LayoutMeasurement {
    fn height(&self, node: NodeId) -> f32;
}

impl<F> LayoutMeasurement for F
where
    F: Fn(NodeId) -> f32,
{
    fn height(&self, node: NodeId) -> f32 {
        self(node)
    }
}

/// Heights reported by a renderer, keyed by node id.
///
/// Unknown nodes measure as zero, like an element that is not mounted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MeasuredHeights(HashMap<NodeId, f32>);

impl MeasuredHeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, height: f32) {
        self.0.insert(node, height);
    }

    pub fn get(&self, node: NodeId) -> Option<f32> {
        self.0.get(&node).copied()
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl LayoutMeasurement for MeasuredHeights {
    fn height(&self, node: NodeId) -> f32 {
        self.get(node).unwrap_or(0.0)
    }
}

impl FromIterator<(NodeId, f32)> for MeasuredHeights {
    fn from_iter<I: IntoIterator<Item = (NodeId, f32)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Clamps a raw measurement: NaN, infinities and negatives count as zero.
pub(crate) fn sanitized(measure: &dyn LayoutMeasurement, node: NodeId) -> f32 {
    let height = measure.height(node);
    if height.is_finite() && height > 0.0 {
        height
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_node_measures_zero() {
        let heights = MeasuredHeights::new();
        assert_eq!(heights.height(NodeId(7)), 0.0);
    }

    #[test]
    fn test_heights_round_trip_through_json_object() {
        let heights: MeasuredHeights = serde_json::from_str(r#"{"1": 42.5, "2": 10}"#).unwrap();
        assert_eq!(heights.height(NodeId(1)), 42.5);
        assert_eq!(heights.height(NodeId(2)), 10.0);
        assert_eq!(heights.len(), 2);
    }

    #[test]
    fn test_closure_is_a_measurement() {
        let measure = |id: NodeId| id.0 as f32 * 2.0;
        assert_eq!(sanitized(&measure, NodeId(4)), 8.0);
    }

    #[test]
    fn test_sanitized_drops_negative_and_nan() {
        let negative = |_: NodeId| -3.0;
        let nan = |_: NodeId| f32::NAN;
        assert_eq!(sanitized(&negative, NodeId(0)), 0.0);
        assert_eq!(sanitized(&nan, NodeId(0)), 0.0);
    }
}
