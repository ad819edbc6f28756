use crate::{EdgeId, VertexId};
use thiserror::Error;

/// Errors raised while building or querying a graph
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GraphError {
    #[error("vertex {0} is not part of the graph")]
    VertexNotFound(VertexId),

    #[error("edge {0} is not part of the graph")]
    EdgeNotFound(EdgeId),

    #[error("vertex {0} is already part of the graph")]
    DuplicateVertex(VertexId),

    #[error("edge {0} is already part of the graph")]
    DuplicateEdge(EdgeId),

    #[error("vertex has no id assigned")]
    UnassignedVertex,

    #[error("edge has no id assigned")]
    UnassignedEdge,

    #[error("vertex id is already assigned to {0}")]
    IdAlreadyAssigned(VertexId),

    /// One of the endpoints of the edge is not a vertex of the graph
    #[error("edge {edge} references missing vertex {vertex}")]
    DanglingEdge { edge: EdgeId, vertex: VertexId },

    #[error("edge {edge} has a non-finite weight ({weight})")]
    NonFiniteWeight { edge: EdgeId, weight: f64 },
}
