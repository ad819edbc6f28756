use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sprawl_graph::{Edge, EdgeId, GraphError, LayoutGraph, MutableGraph, Vertex, VertexId};
use sprawl_layout::{LayoutInput, Size, SizeMap};
use tracing::debug;

/// A synthetic graph to lay out, with the footprint of every vertex
#[derive(Debug, Clone)]
pub struct Scene {
    pub graph: LayoutGraph,
    pub sizes: SizeMap,
}

impl Scene {
    /// Random acyclic graph: edges always go from a lower to a higher vertex
    /// id, each vertex having at most `fan_out` outgoing edges
    pub fn generate(seed: u64, vertices: usize, fan_out: usize) -> Result<Self, GraphError> {
        let mut rng = StdRng::seed_from_u64(seed);
        let count = vertices as i64;

        let mut graph = LayoutGraph::new();
        let mut sizes = SizeMap::new();
        for id in 1..=count {
            graph.add_vertex(Vertex::new(VertexId(id)))?;
            let size = Size::new(
                rng.gen_range(20..=80) as f64,
                rng.gen_range(10..=40) as f64,
            );
            sizes.insert(VertexId(id), size);
        }

        let mut next_edge = 1;
        for source in 1..count {
            let mut targets: Vec<i64> = (0..rng.gen_range(0..=fan_out))
                .map(|_| rng.gen_range(source + 1..=count))
                .collect();
            targets.sort_unstable();
            targets.dedup();

            for target in targets {
                let edge = Edge::new(EdgeId(next_edge), VertexId(source), VertexId(target));
                graph.add_edge(edge)?;
                next_edge += 1;
            }
        }

        debug!(
            "Generated scene with {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(Self { graph, sizes })
    }

    pub fn input<V, E>(&self) -> LayoutInput<LayoutGraph, V, E> {
        LayoutInput::new(self.graph.clone()).with_sizes(self.sizes.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    #[test]
    fn same_seed_same_scene() {
        let first = Scene::generate(9, 20, 3).unwrap();
        let second = Scene::generate(9, 20, 3).unwrap();

        let edges = |scene: &Scene| {
            let mut edges: Vec<_> = scene
                .graph
                .edges()
                .map(|e| (e.id, e.source, e.target))
                .collect();
            edges.sort();
            edges
        };
        assert_eq!(edges(&first), edges(&second));
        assert_eq!(first.sizes, second.sizes);
    }

    #[test]
    fn edges_point_forward() {
        let scene = Scene::generate(4, 30, 4).unwrap();
        assert_eq!(scene.graph.vertex_count(), 30);
        assert_eq!(scene.sizes.len(), 30);
        for edge in scene.graph.edges() {
            assert!(edge.source < edge.target, "{edge:?}");
        }
    }

    #[test]
    fn empty_scene() {
        let scene = Scene::generate(1, 0, 2).unwrap();
        assert_eq!(scene.graph.vertex_count(), 0);
        assert_eq!(scene.graph.edge_count(), 0);
    }
}
