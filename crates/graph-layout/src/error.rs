use crate::overlap::OverlapError;
use sprawl_graph::{GraphError, VertexId};
use thiserror::Error;

/// Broad category of a [`LayoutError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The algorithm was set up in a way that can't work
    Configuration,
    /// An operation was called with inputs it can't accept
    Precondition,
    /// A vertex or edge was queried that the bound graph doesn't contain
    Lookup,
    /// The algorithm itself can't lay out the graph
    Algorithm,
}

/// Errors that can occur while binding or computing a layout
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LayoutError {
    /// `reset_graph` was called with no graph bound and no factory to
    /// build one
    #[error("no graph is bound and no graph factory was configured")]
    MissingGraphFactory,

    #[error("the algorithm needs vertex sizes but none were supplied")]
    MissingVertexSizes,

    #[error("the algorithm needs vertex sizes but vertex {0} has none")]
    MissingVertexSize(VertexId),

    #[error("vertex {vertex} has an invalid size ({width} x {height})")]
    InvalidVertexSize {
        vertex: VertexId,
        width: f64,
        height: f64,
    },

    #[error("the algorithm has not been initialized with a graph")]
    NotInitialized,

    /// The graph contains a cycle at the given vertex
    #[error("graph contains a cycle at vertex {0}")]
    GraphHasCycle(VertexId),

    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    Overlap(#[from] OverlapError),
}

impl LayoutError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LayoutError::MissingGraphFactory => ErrorKind::Configuration,
            LayoutError::MissingVertexSizes
            | LayoutError::MissingVertexSize(_)
            | LayoutError::InvalidVertexSize { .. }
            | LayoutError::NotInitialized => ErrorKind::Precondition,
            LayoutError::GraphHasCycle(_) => ErrorKind::Algorithm,
            LayoutError::Graph(GraphError::VertexNotFound(_) | GraphError::EdgeNotFound(_)) => {
                ErrorKind::Lookup
            }
            LayoutError::Graph(_) | LayoutError::Overlap(_) => ErrorKind::Precondition,
        }
    }
}
