use crate::{Edge, EdgeId, GraphError, Vertex, VertexId};
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableDiGraph};
use std::collections::HashMap;
use tracing::debug;

/// A graph layout algorithms can bind to and rebuild
///
/// Algorithms only read vertices and edges while computing; the mutating
/// operations are used to repopulate their working copy of the graph.
pub trait MutableGraph {
    fn vertices(&self) -> impl Iterator<Item = &Vertex>;

    fn edges(&self) -> impl Iterator<Item = &Edge>;

    /// # Errors
    /// Returns [`GraphError::VertexNotFound`] if the vertex isn't in the graph
    fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError>;

    /// # Errors
    /// Returns [`GraphError::EdgeNotFound`] if the edge isn't in the graph
    fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError>;

    /// # Errors
    /// Fails if the vertex has no id or if the id is already used
    fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError>;

    /// # Errors
    /// Fails if the edge id is missing or taken, if an endpoint is unknown or
    /// if the weight isn't finite
    fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError>;

    /// Remove every vertex and edge
    fn clear(&mut self);

    fn vertex_count(&self) -> usize;

    fn edge_count(&self) -> usize;

    fn contains_vertex(&self, id: VertexId) -> bool {
        self.vertex(id).is_ok()
    }

    fn contains_edge(&self, id: EdgeId) -> bool {
        self.edge(id).is_ok()
    }
}

/// Directed multigraph backed by a petgraph [`StableDiGraph`]
///
/// Vertex and edge ids are mapped to stable petgraph indices, so removing or
/// rebinding an edge never invalidates the other handles.
#[derive(Debug, Clone, Default)]
pub struct LayoutGraph {
    graph: StableDiGraph<Vertex, Edge>,
    vertex_index: HashMap<VertexId, NodeIndex>,
    edge_index: HashMap<EdgeId, EdgeIndex>,
}

impl LayoutGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from vertex and edge lists
    ///
    /// # Errors
    /// Fails on the first vertex or edge [`MutableGraph::add_vertex`] or
    /// [`MutableGraph::add_edge`] would reject.
    pub fn from_parts(
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<Self, GraphError> {
        let mut graph = Self::new();
        for vertex in vertices {
            graph.add_vertex(vertex)?;
        }
        for edge in edges {
            graph.add_edge(edge)?;
        }
        Ok(graph)
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> Result<&mut Vertex, GraphError> {
        let index = *self
            .vertex_index
            .get(&id)
            .ok_or(GraphError::VertexNotFound(id))?;
        Ok(&mut self.graph[index])
    }

    /// Change the weight of an edge in place
    ///
    /// Endpoints are changed with
    /// [`LayoutGraph::rebind_edge`] instead.
    pub fn set_edge_weight(&mut self, id: EdgeId, weight: f64) -> Result<(), GraphError> {
        if !weight.is_finite() {
            return Err(GraphError::NonFiniteWeight { edge: id, weight });
        }
        let index = self.edge_handle(id)?;
        self.graph[index].weight = weight;
        Ok(())
    }

    /// Point an existing edge at new endpoints, keeping its id, weight and flag
    pub fn rebind_edge(
        &mut self,
        id: EdgeId,
        source: VertexId,
        target: VertexId,
    ) -> Result<(), GraphError> {
        let index = self.edge_handle(id)?;
        let from = self.node_handle(id, source)?;
        let to = self.node_handle(id, target)?;

        let Some(mut edge) = self.graph.remove_edge(index) else {
            return Err(GraphError::EdgeNotFound(id));
        };
        edge.rebind(source, target);
        let new_index = self.graph.add_edge(from, to, edge);
        self.edge_index.insert(id, new_index);
        Ok(())
    }

    fn edge_handle(&self, id: EdgeId) -> Result<EdgeIndex, GraphError> {
        self.edge_index
            .get(&id)
            .copied()
            .ok_or(GraphError::EdgeNotFound(id))
    }

    fn node_handle(&self, edge: EdgeId, vertex: VertexId) -> Result<NodeIndex, GraphError> {
        self.vertex_index
            .get(&vertex)
            .copied()
            .ok_or(GraphError::DanglingEdge { edge, vertex })
    }
}

impl MutableGraph for LayoutGraph {
    fn vertices(&self) -> impl Iterator<Item = &Vertex> {
        self.graph.node_indices().map(|index| &self.graph[index])
    }

    fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.graph.edge_indices().map(|index| &self.graph[index])
    }

    fn vertex(&self, id: VertexId) -> Result<&Vertex, GraphError> {
        self.vertex_index
            .get(&id)
            .map(|&index| &self.graph[index])
            .ok_or(GraphError::VertexNotFound(id))
    }

    fn edge(&self, id: EdgeId) -> Result<&Edge, GraphError> {
        let index = self.edge_handle(id)?;
        Ok(&self.graph[index])
    }

    fn add_vertex(&mut self, vertex: Vertex) -> Result<(), GraphError> {
        let id = vertex.id();
        if !id.is_assigned() {
            return Err(GraphError::UnassignedVertex);
        }
        if self.vertex_index.contains_key(&id) {
            return Err(GraphError::DuplicateVertex(id));
        }
        let index = self.graph.add_node(vertex);
        self.vertex_index.insert(id, index);
        Ok(())
    }

    fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if !edge.id.is_assigned() {
            return Err(GraphError::UnassignedEdge);
        }
        if self.edge_index.contains_key(&edge.id) {
            return Err(GraphError::DuplicateEdge(edge.id));
        }
        if !edge.weight.is_finite() {
            return Err(GraphError::NonFiniteWeight {
                edge: edge.id,
                weight: edge.weight,
            });
        }
        let from = self.node_handle(edge.id, edge.source)?;
        let to = self.node_handle(edge.id, edge.target)?;
        let id = edge.id;
        let index = self.graph.add_edge(from, to, edge);
        self.edge_index.insert(id, index);
        Ok(())
    }

    fn clear(&mut self) {
        debug!(
            "Clearing graph with {} vertices and {} edges",
            self.vertex_index.len(),
            self.edge_index.len()
        );
        self.graph.clear();
        self.vertex_index.clear();
        self.edge_index.clear();
    }

    fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ProcessingFlag;
    use test_log::test;

    fn chain() -> LayoutGraph {
        LayoutGraph::from_parts(
            (1..=3).map(|i| Vertex::new(VertexId(i))),
            [
                Edge::new(EdgeId(10), VertexId(1), VertexId(2)),
                Edge::new(EdgeId(11), VertexId(2), VertexId(3)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn rejects_duplicate_and_unassigned_vertices() {
        let mut graph = chain();
        assert_eq!(
            graph.add_vertex(Vertex::new(VertexId(1))),
            Err(GraphError::DuplicateVertex(VertexId(1)))
        );
        assert_eq!(
            graph.add_vertex(Vertex::unassigned()),
            Err(GraphError::UnassignedVertex)
        );
        assert_eq!(graph.vertex_count(), 3);
    }

    #[test]
    fn rejects_dangling_and_non_finite_edges() {
        let mut graph = chain();
        assert_eq!(
            graph.add_edge(Edge::new(EdgeId(12), VertexId(3), VertexId(9))),
            Err(GraphError::DanglingEdge {
                edge: EdgeId(12),
                vertex: VertexId(9)
            })
        );
        assert!(matches!(
            graph.add_edge(Edge::new(EdgeId(13), VertexId(1), VertexId(3)).with_weight(f64::NAN)),
            Err(GraphError::NonFiniteWeight { .. })
        ));
        assert_eq!(
            graph.add_edge(Edge::new(EdgeId(10), VertexId(1), VertexId(3))),
            Err(GraphError::DuplicateEdge(EdgeId(10)))
        );
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn negative_weights_are_accepted() {
        let mut graph = chain();
        graph
            .add_edge(Edge::new(EdgeId(12), VertexId(3), VertexId(1)).with_weight(-2.5))
            .unwrap();
        assert_eq!(graph.edge(EdgeId(12)).unwrap().weight, -2.5);
    }

    #[test]
    fn lookup_of_missing_objects() {
        let graph = chain();
        assert_eq!(
            graph.vertex(VertexId(42)),
            Err(GraphError::VertexNotFound(VertexId(42)))
        );
        assert_eq!(
            graph.edge(EdgeId(42)),
            Err(GraphError::EdgeNotFound(EdgeId(42)))
        );
        assert!(graph.contains_vertex(VertexId(2)));
        assert!(!graph.contains_edge(EdgeId(42)));
    }

    #[test]
    fn rebind_edge_keeps_identity() {
        let mut graph = chain();
        graph.set_edge_weight(EdgeId(10), 3.0).unwrap();
        graph
            .rebind_edge(EdgeId(10), VertexId(3), VertexId(1))
            .unwrap();

        let edge = graph.edge(EdgeId(10)).unwrap();
        assert_eq!((edge.source, edge.target), (VertexId(3), VertexId(1)));
        assert_eq!(edge.weight, 3.0);
        assert_eq!(graph.edge_count(), 2);

        let from_3: Vec<_> = graph
            .edges()
            .filter(|e| e.source == VertexId(3))
            .map(|e| e.id)
            .collect();
        assert_eq!(from_3, vec![EdgeId(10)]);
    }

    #[test]
    fn vertex_flags_are_mutable() {
        let mut graph = chain();
        graph.vertex_mut(VertexId(2)).unwrap().flag = ProcessingFlag::Skip;
        assert!(graph.vertex(VertexId(2)).unwrap().is_skipped());
    }

    #[test]
    fn clear_removes_everything() {
        let mut graph = chain();
        graph.clear();
        assert_eq!(graph.vertex_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(!graph.contains_vertex(VertexId(1)));
        graph.add_vertex(Vertex::new(VertexId(1))).unwrap();
    }
}
