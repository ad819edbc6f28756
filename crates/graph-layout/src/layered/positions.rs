use crate::sizes::{size_of, SizeMap};
use crate::{Point, PositionMap, Size, Vec2};
use petgraph::graphmap::DiGraphMap;
use sprawl_graph::VertexId;
use std::cmp::Ordering;

/// Assigns coordinates to layered vertices, one refinement step at a time
pub(crate) struct Placement<'a> {
    layers: &'a [Vec<VertexId>],
    graph: &'a DiGraphMap<VertexId, ()>,
    sizes: Option<&'a SizeMap>,
    margin: Vec2,
}

impl<'a> Placement<'a> {
    pub(crate) fn new(
        layers: &'a [Vec<VertexId>],
        graph: &'a DiGraphMap<VertexId, ()>,
        sizes: Option<&'a SizeMap>,
        margin: Vec2,
    ) -> Self {
        Self {
            layers,
            graph,
            sizes,
            margin,
        }
    }

    fn size(&self, vertex: VertexId) -> Size {
        size_of(self.sizes, vertex)
    }

    /// Layers side by side from left to right, vertices stacked with uniform
    /// spacing inside each layer
    pub(crate) fn initial_positions(&self) -> PositionMap {
        let mut positions = PositionMap::new();

        let mut x = 0.0;
        for layer in self.layers {
            let layer_width = layer
                .iter()
                .map(|&vertex| self.size(vertex))
                .fold(Size::zero(), Size::max)
                .width;

            let mut y = 0.0;
            for &vertex in layer {
                let size = self.size(vertex);
                positions.insert(vertex, Point::new(x + (layer_width - size.width) / 2.0, y));
                y += self.margin.y + size.height;
            }
            x += layer_width + self.margin.x;
        }

        positions
    }

    /// One barycenter sweep from the last layer to the first
    ///
    /// Returns whether any vertex moved.
    pub(crate) fn refine(&self, positions: &mut PositionMap) -> bool {
        let mut changed = false;

        for layer_idx in (0..self.layers.len().saturating_sub(1)).rev() {
            let layer = &self.layers[layer_idx];
            let before: Vec<_> = layer
                .iter()
                .map(|vertex| positions.get(vertex).map(|pos| pos.y))
                .collect();

            for &vertex in layer {
                let Some(new_y) = self.barycenter(vertex, &self.layers[layer_idx + 1], positions)
                else {
                    continue;
                };

                let Some(pos) = positions.get_mut(&vertex) else {
                    continue;
                };

                pos.y = new_y;
            }

            // Enforce minimum vertical distance between vertices
            let mut sorted: Vec<_> = layer
                .iter()
                .filter_map(|&vertex| positions.get(&vertex).map(|pos| (vertex, pos.y)))
                .collect();
            sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(Ordering::Equal));

            for pair in sorted.windows(2) {
                let (prev, curr) = (pair[0].0, pair[1].0);
                let Some(prev_bottom) = positions
                    .get(&prev)
                    .map(|pos| pos.y + self.size(prev).height)
                else {
                    continue;
                };
                let Some(curr_pos) = positions.get_mut(&curr) else {
                    continue;
                };

                if curr_pos.y < prev_bottom + self.margin.y {
                    curr_pos.y = prev_bottom + self.margin.y;
                }
            }

            let moved = layer.iter().zip(&before).any(|(vertex, old_y)| {
                match (positions.get(vertex), old_y) {
                    (Some(pos), Some(old_y)) => (pos.y - old_y).abs() > 0.1,
                    _ => false,
                }
            });
            changed |= moved;
        }

        changed
    }

    /// Average center of the successors in the next layer
    fn barycenter(
        &self,
        vertex: VertexId,
        next_layer: &[VertexId],
        positions: &PositionMap,
    ) -> Option<f64> {
        let mut sum_y = 0.0;
        let mut count = 0;

        for &next in next_layer {
            if self.graph.contains_edge(vertex, next) {
                if let Some(pos) = positions.get(&next) {
                    sum_y += pos.y + self.size(next).height / 2.0;
                    count += 1;
                }
            }
        }

        (count > 0).then(|| sum_y / count as f64 - self.size(vertex).height / 2.0)
    }
}

/// Shift positions so that the topmost vertex sits at y = 0
pub(crate) fn normalize_vertical_positions(positions: &mut PositionMap) {
    let min_y = positions
        .values()
        .map(|pos| pos.y)
        .min_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal))
        .unwrap_or(0.0);

    for pos in positions.values_mut() {
        pos.y -= min_y;
    }
}
