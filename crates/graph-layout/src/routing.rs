use crate::sizes::{size_of, SizeMap};
use crate::{Point, PositionMap, Rect};
use sprawl_graph::{EdgeId, MutableGraph, VertexId};
use std::collections::HashMap;

/// Polyline of each routed edge; a missing entry means a straight line
/// between the endpoint positions
pub type EdgeRouteMap = HashMap<EdgeId, Vec<Point>>;

/// A routing stage computing edge geometry from final vertex positions
pub trait EdgeRouter {
    /// Route every non-skipped edge whose endpoints both have a position
    fn route<G: MutableGraph>(
        &self,
        graph: &G,
        positions: &PositionMap,
        sizes: Option<&SizeMap>,
    ) -> EdgeRouteMap;
}

/// Routes edges with axis-aligned segments
///
/// Edges leave their source on the middle of its right side and enter their
/// target on the middle of its left side, turning at the horizontal midpoint.
/// Self loops go around the bottom-right corner of their vertex.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrthogonalRouter {
    /// Distance between a self loop and its vertex
    pub loop_offset: f64,
}

impl Default for OrthogonalRouter {
    fn default() -> Self {
        Self { loop_offset: 10.0 }
    }
}

impl OrthogonalRouter {
    pub fn new(loop_offset: f64) -> Self {
        Self { loop_offset }
    }

    pub fn route_between(&self, source: Rect, target: Rect) -> Vec<Point> {
        let start = Point::new(source.right(), source.center().y);
        let end = Point::new(target.left(), target.center().y);
        let mid_x = (start.x + end.x) / 2.0;

        let mut points = vec![start];
        if start.y != end.y {
            points.push(Point::new(mid_x, start.y));
            points.push(Point::new(mid_x, end.y));
        }
        points.push(end);
        points
    }

    pub fn route_loop(&self, rect: Rect) -> Vec<Point> {
        let center = rect.center();
        let outer_x = rect.right() + self.loop_offset;
        let outer_y = rect.bottom() + self.loop_offset;
        vec![
            Point::new(rect.right(), center.y),
            Point::new(outer_x, center.y),
            Point::new(outer_x, outer_y),
            Point::new(center.x, outer_y),
            Point::new(center.x, rect.bottom()),
        ]
    }
}

impl EdgeRouter for OrthogonalRouter {
    fn route<G: MutableGraph>(
        &self,
        graph: &G,
        positions: &PositionMap,
        sizes: Option<&SizeMap>,
    ) -> EdgeRouteMap {
        let rect = |vertex: VertexId| {
            positions
                .get(&vertex)
                .map(|&origin| Rect::from_origin_size(origin, size_of(sizes, vertex)))
        };

        graph
            .edges()
            .filter(|edge| !edge.is_skipped())
            .filter_map(|edge| {
                let source = rect(edge.source)?;
                let target = rect(edge.target)?;
                let points = if edge.is_self_loop() {
                    self.route_loop(source)
                } else {
                    self.route_between(source, target)
                };
                Some((edge.id, points))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Size;
    use sprawl_graph::{Edge, LayoutGraph, ProcessingFlag, Vertex};
    use test_log::test;

    #[test]
    fn bends_at_the_midpoint() {
        let router = OrthogonalRouter::default();
        let points = router.route_between(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(30.0, 20.0, 10.0, 10.0),
        );
        assert_eq!(
            points,
            vec![
                Point::new(10.0, 5.0),
                Point::new(20.0, 5.0),
                Point::new(20.0, 25.0),
                Point::new(30.0, 25.0),
            ]
        );
    }

    #[test]
    fn aligned_vertices_get_a_straight_segment() {
        let router = OrthogonalRouter::default();
        let points = router.route_between(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(30.0, 0.0, 10.0, 10.0),
        );
        assert_eq!(points, vec![Point::new(10.0, 5.0), Point::new(30.0, 5.0)]);
    }

    #[test]
    fn omits_skipped_and_unplaced_edges() {
        let graph = LayoutGraph::from_parts(
            (1..=3).map(|i| Vertex::new(VertexId(i))),
            [
                Edge::new(EdgeId(1), VertexId(1), VertexId(2)),
                Edge::new(EdgeId(2), VertexId(2), VertexId(3)),
                Edge::new(EdgeId(3), VertexId(1), VertexId(2)).with_flag(ProcessingFlag::Skip),
                Edge::new(EdgeId(4), VertexId(1), VertexId(1)),
            ],
        )
        .unwrap();
        let positions = PositionMap::from([
            (VertexId(1), Point::new(0.0, 0.0)),
            (VertexId(2), Point::new(50.0, 0.0)),
        ]);
        let sizes = SizeMap::from([
            (VertexId(1), Size::new(10.0, 10.0)),
            (VertexId(2), Size::new(10.0, 10.0)),
        ]);

        let routes = OrthogonalRouter::default().route(&graph, &positions, Some(&sizes));

        let mut routed: Vec<_> = routes.keys().copied().collect();
        routed.sort();
        assert_eq!(routed, vec![EdgeId(1), EdgeId(4)]);
        assert_eq!(routes[&EdgeId(4)].len(), 5);
    }
}
