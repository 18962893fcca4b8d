//! Distance index
//!
//! Ordered distance -> sample index map for nearest-neighbour lookups.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

/// Sorted map from distance to the first sample at that distance
#[derive(Debug, Clone, Default)]
pub struct DistanceIndex {
    map: BTreeMap<OrderedFloat<f64>, usize>,
}

impl DistanceIndex {
    /// Build from distances in sample order; duplicate keys keep the first-seen index
    pub fn build<I>(distances: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let mut map = BTreeMap::new();
        for (i, distance) in distances.into_iter().enumerate() {
            map.entry(OrderedFloat(distance)).or_insert(i);
        }
        Self { map }
    }

    /// Number of distinct distances
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Exact lookup
    pub fn get(&self, distance: f64) -> Option<usize> {
        self.map.get(&OrderedFloat(distance)).copied()
    }

    /// Sample index whose distance is closest to `query`.
    ///
    /// With `p` the first key not below `query`, the keys at `p`, `p + 1` and `p - 1`
    /// are compared in that order; the first closest one wins.
    pub fn nearest(&self, query: f64) -> Option<usize> {
        let key = OrderedFloat(query);
        let above = self.map.range(key..).take(2);
        let below = self.map.range(..key).next_back();

        above
            .chain(below)
            .min_by(|(a, _), (b, _)| (a.0 - query).abs().total_cmp(&(b.0 - query).abs()))
            .map(|(_, &index)| index)
    }
}
