//! Graph model shared by the sprawl layout algorithms
//!
//! Vertices and edges carry an identity, an optional group and a
//! [`ProcessingFlag`] telling algorithms whether to place, skip or freeze
//! them. The model owns no layout logic: algorithms bind to anything that
//! implements [`MutableGraph`], and [`LayoutGraph`] is the provided
//! petgraph-backed implementation.
//!
//! # Example
//!
//! ```
//! use sprawl_graph::{Edge, EdgeId, LayoutGraph, MutableGraph, Vertex, VertexId};
//!
//! let mut graph = LayoutGraph::new();
//! graph.add_vertex(Vertex::new(VertexId(1))).unwrap();
//! graph.add_vertex(Vertex::new(VertexId(2))).unwrap();
//! graph
//!     .add_edge(Edge::new(EdgeId(1), VertexId(1), VertexId(2)))
//!     .unwrap();
//!
//! assert_eq!(graph.vertex_count(), 2);
//! assert_eq!(graph.edge_count(), 1);
//! ```

mod error;
mod graph;
mod model;

pub use error::GraphError;
pub use graph::{LayoutGraph, MutableGraph};
pub use model::{Edge, EdgeId, GroupId, ProcessingFlag, Vertex, VertexId};
