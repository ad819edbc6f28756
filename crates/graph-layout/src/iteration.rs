use crate::PositionMap;
use sprawl_graph::{EdgeId, VertexId};
use std::collections::HashMap;

/// Where an iterative computation stands when it reports an event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IterationStatus {
    Running,
    /// The last step: the algorithm converged or ran out of iterations
    Finished,
}

/// Progress snapshot emitted by iterative algorithms after each step
///
/// `V` and `E` are the per-vertex and per-edge auxiliary data of the
/// concrete algorithm, `()` when it has none. Listeners may call
/// [`IterationEvent::abort`] to stop the computation at the next safe point;
/// the result is then the same as a cancelled computation.
#[derive(Debug, Clone)]
pub struct IterationEvent<V = (), E = ()> {
    pub iteration: usize,
    pub status: IterationStatus,
    pub status_in_percent: f64,
    pub message: String,
    pub positions: PositionMap,
    pub vertex_info: HashMap<VertexId, V>,
    pub edge_info: HashMap<EdgeId, E>,
    abort: bool,
}

impl<V, E> IterationEvent<V, E> {
    pub fn new(iteration: usize, status_in_percent: f64, positions: PositionMap) -> Self {
        Self {
            iteration,
            status: IterationStatus::Running,
            status_in_percent: status_in_percent.clamp(0.0, 100.0),
            message: String::new(),
            positions,
            vertex_info: HashMap::new(),
            edge_info: HashMap::new(),
            abort: false,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    pub fn with_status(mut self, status: IterationStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_vertex_info(mut self, vertex_info: HashMap<VertexId, V>) -> Self {
        self.vertex_info = vertex_info;
        self
    }

    pub fn with_edge_info(mut self, edge_info: HashMap<EdgeId, E>) -> Self {
        self.edge_info = edge_info;
        self
    }

    /// Ask the algorithm to stop after this step
    pub fn abort(&mut self) {
        self.abort = true;
    }

    pub fn abort_requested(&self) -> bool {
        self.abort
    }
}

/// Receives the iteration events of a computation, on the computing thread
pub type IterationListener<V = (), E = ()> = Box<dyn FnMut(&mut IterationEvent<V, E>) + Send>;
