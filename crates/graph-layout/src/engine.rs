use crate::iteration::{IterationEvent, IterationListener};
use crate::parameters::LayoutParameters;
use crate::routing::EdgeRouteMap;
use crate::sizes::{check_coverage, SizeMap};
use crate::{CancellationToken, LayoutError, Point};
use serde::{Deserialize, Serialize};
use sprawl_graph::{Edge, EdgeId, LayoutGraph, MutableGraph, Vertex, VertexId};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Position of each placed vertex
pub type PositionMap = HashMap<VertexId, Point>;

/// Builds an empty graph when an algorithm has to rebuild one from scratch
pub type GraphFactory<G> = Box<dyn Fn() -> G + Send>;

/// How a computation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayoutStatus {
    Completed,
    /// Stopped by the cancellation token or by a listener abort; the
    /// positions computed so far are kept
    Cancelled,
}

/// Everything a layout algorithm binds to in [`LayoutAlgorithm::initialize`]
pub struct LayoutInput<G, V = (), E = ()> {
    pub graph: G,
    /// Known positions, possibly only for some of the vertices
    pub positions: PositionMap,
    pub sizes: Option<SizeMap>,
    pub listener: Option<IterationListener<V, E>>,
}

impl<G, V, E> LayoutInput<G, V, E> {
    pub fn new(graph: G) -> Self {
        Self {
            graph,
            positions: PositionMap::new(),
            sizes: None,
            listener: None,
        }
    }

    pub fn with_positions(mut self, positions: PositionMap) -> Self {
        self.positions = positions;
        self
    }

    pub fn with_sizes(mut self, sizes: SizeMap) -> Self {
        self.sizes = Some(sizes);
        self
    }

    pub fn with_listener(
        mut self,
        listener: impl FnMut(&mut IterationEvent<V, E>) + Send + 'static,
    ) -> Self {
        self.listener = Some(Box::new(listener));
        self
    }
}

/// Edge geometry computed by a layout algorithm itself
pub trait EdgeRouting {
    /// Route of every non-skipped edge whose endpoints are both placed
    fn edge_routes(&self) -> &EdgeRouteMap;
}

/// A layout algorithm computing vertex positions for a bound graph
///
/// The capability queries ([`LayoutAlgorithm::needs_vertex_sizes`],
/// [`LayoutAlgorithm::supports_object_freeze`],
/// [`LayoutAlgorithm::supports_edge_routing`]) can be asked before the
/// algorithm is initialized, so that callers know what to provide.
pub trait LayoutAlgorithm {
    type Graph: MutableGraph;
    type Parameters: LayoutParameters;
    /// Per-vertex data attached to iteration events
    type VertexInfo;
    /// Per-edge data attached to iteration events
    type EdgeInfo;

    fn needs_vertex_sizes(&self) -> bool;

    /// Whether vertices flagged `Freeze` keep their position
    fn supports_object_freeze(&self) -> bool;

    fn parameters(&self) -> &Self::Parameters;

    fn set_parameters(&mut self, parameters: Self::Parameters);

    /// Bind the algorithm to a graph and its current positions
    ///
    /// # Errors
    /// If the algorithm needs sizes and `input` doesn't cover every
    /// non-skipped vertex, this fails without touching the algorithm state.
    fn initialize(
        &mut self,
        input: LayoutInput<Self::Graph, Self::VertexInfo, Self::EdgeInfo>,
    ) -> Result<(), LayoutError>;

    /// Run the algorithm until it completes or until `token` is cancelled
    ///
    /// Cancellation isn't an error: it returns [`LayoutStatus::Cancelled`]
    /// and leaves the positions computed so far.
    ///
    /// # Errors
    /// Fails before moving any vertex if the algorithm isn't initialized or
    /// lacks vertex sizes; algorithm specific failures are reported as well.
    fn compute(&mut self, token: &CancellationToken) -> Result<LayoutStatus, LayoutError>;

    /// Clear the working graph and fill it with the given vertices and edges
    ///
    /// # Errors
    /// Returns [`LayoutError::MissingGraphFactory`] if no graph is bound and
    /// the algorithm was built without a factory, or the graph error for the
    /// first rejected vertex or edge, in which case the bound graph and
    /// positions are left as they were.
    fn reset_graph(
        &mut self,
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<(), LayoutError>;

    /// The bound graph
    ///
    /// # Errors
    /// Returns [`LayoutError::NotInitialized`] when no graph is bound.
    fn graph(&self) -> Result<&Self::Graph, LayoutError>;

    fn positions(&self) -> &PositionMap;

    fn vertex_sizes(&self) -> Option<&SizeMap>;

    /// The edge routing capability, when the algorithm routes edges itself
    fn edge_routing(&self) -> Option<&dyn EdgeRouting> {
        None
    }

    fn supports_edge_routing(&self) -> bool {
        self.edge_routing().is_some()
    }

    /// Position of a vertex of the bound graph, `None` if it isn't placed
    ///
    /// # Errors
    /// Returns a lookup error if the vertex isn't part of the bound graph.
    fn position_of(&self, vertex: VertexId) -> Result<Option<Point>, LayoutError> {
        self.graph()?.vertex(vertex)?;
        Ok(self.positions().get(&vertex).copied())
    }

    /// Route of an edge of the bound graph, `None` for a straight line
    ///
    /// # Errors
    /// Returns a lookup error if the edge isn't part of the bound graph.
    fn route_of(&self, edge: EdgeId) -> Result<Option<&[Point]>, LayoutError> {
        self.graph()?.edge(edge)?;
        Ok(self
            .edge_routing()
            .and_then(|routing| routing.edge_routes().get(&edge))
            .map(Vec::as_slice))
    }
}

/// State every layout algorithm keeps: the bound graph, positions, sizes and
/// progress listener
pub struct LayoutState<G, V = (), E = ()> {
    graph: Option<G>,
    factory: Option<GraphFactory<G>>,
    pub(crate) positions: PositionMap,
    pub(crate) sizes: Option<SizeMap>,
    listener: Option<IterationListener<V, E>>,
}

impl<G: MutableGraph, V, E> LayoutState<G, V, E> {
    pub fn new() -> Self {
        Self {
            graph: None,
            factory: None,
            positions: PositionMap::new(),
            sizes: None,
            listener: None,
        }
    }

    pub fn with_factory(factory: impl Fn() -> G + Send + 'static) -> Self {
        Self {
            factory: Some(Box::new(factory)),
            ..Self::new()
        }
    }

    /// Validate and bind the input, see [`LayoutAlgorithm::initialize`]
    pub fn bind(
        &mut self,
        input: LayoutInput<G, V, E>,
        needs_sizes: bool,
    ) -> Result<(), LayoutError> {
        let LayoutInput {
            graph,
            mut positions,
            sizes,
            listener,
        } = input;

        if needs_sizes {
            let sizes = sizes.as_ref().ok_or(LayoutError::MissingVertexSizes)?;
            check_coverage(&graph, sizes)?;
        }

        let before = positions.len();
        positions.retain(|id, _| graph.vertex(*id).is_ok_and(|v| !v.is_skipped()));
        if positions.len() != before {
            debug!(
                "Dropped {} positions of skipped or unknown vertices",
                before - positions.len()
            );
        }

        debug!(
            "Binding graph with {} vertices, {} edges and {} known positions",
            graph.vertex_count(),
            graph.edge_count(),
            positions.len()
        );

        self.graph = Some(graph);
        self.positions = positions;
        self.sizes = sizes;
        self.listener = listener;
        Ok(())
    }

    /// Check what [`LayoutAlgorithm::compute`] needs before anything moves
    pub fn ready(&self, needs_sizes: bool) -> Result<&G, LayoutError> {
        let graph = self.graph.as_ref().ok_or(LayoutError::NotInitialized)?;
        if needs_sizes {
            let sizes = self.sizes.as_ref().ok_or(LayoutError::MissingVertexSizes)?;
            check_coverage(graph, sizes)?;
        }
        Ok(graph)
    }

    pub fn graph(&self) -> Result<&G, LayoutError> {
        self.graph.as_ref().ok_or(LayoutError::NotInitialized)
    }

    pub fn positions(&self) -> &PositionMap {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut PositionMap {
        &mut self.positions
    }

    pub fn sizes(&self) -> Option<&SizeMap> {
        self.sizes.as_ref()
    }

    /// See [`LayoutAlgorithm::reset_graph`]
    ///
    /// The parts are checked against the [`LayoutGraph`] rules before the
    /// bound graph is touched, so the usual rejections leave the state as it
    /// was. If the bound graph still refuses a part, it is left empty. Either
    /// way positions never outlive their vertex.
    pub fn reset_graph(
        &mut self,
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<(), LayoutError> {
        let vertices: Vec<Vertex> = vertices.into_iter().collect();
        let edges: Vec<Edge> = edges.into_iter().collect();
        LayoutGraph::from_parts(vertices.iter().cloned(), edges.iter().cloned())?;

        let graph = match self.graph.take() {
            Some(mut graph) => {
                graph.clear();
                graph
            }
            None => {
                let factory = self
                    .factory
                    .as_ref()
                    .ok_or(LayoutError::MissingGraphFactory)?;
                debug!("No graph bound, building one from the factory");
                factory()
            }
        };
        let graph = self.graph.insert(graph);

        let filled = vertices
            .into_iter()
            .try_for_each(|vertex| graph.add_vertex(vertex))
            .and_then(|()| edges.into_iter().try_for_each(|edge| graph.add_edge(edge)));
        if let Err(error) = &filled {
            warn!("Graph rejected a part while resetting, leaving it empty: {error}");
            graph.clear();
        }

        self.positions
            .retain(|id, _| graph.vertex(*id).is_ok_and(|v| !v.is_skipped()));
        filled?;

        debug!(
            "Reset graph to {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );
        Ok(())
    }

    /// Deliver an event to the listener
    ///
    /// Returns true if the listener asked to abort the computation.
    pub fn report(&mut self, mut event: IterationEvent<V, E>) -> bool {
        let Some(listener) = self.listener.as_mut() else {
            return false;
        };
        listener(&mut event);
        if event.abort_requested() {
            debug!("Iteration listener aborted at iteration {}", event.iteration);
        }
        event.abort_requested()
    }

    pub fn has_listener(&self) -> bool {
        self.listener.is_some()
    }
}

impl<G: MutableGraph, V, E> Default for LayoutState<G, V, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: fmt::Debug, V, E> fmt::Debug for LayoutState<G, V, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutState")
            .field("graph", &self.graph)
            .field("has_factory", &self.factory.is_some())
            .field("positions", &self.positions)
            .field("sizes", &self.sizes)
            .field("has_listener", &self.listener.is_some())
            .finish()
    }
}
