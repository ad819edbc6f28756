mod crossings;
mod layers;
mod positions;

use crate::engine::{EdgeRouting, LayoutInput, LayoutState};
use crate::iteration::{IterationEvent, IterationStatus};
use crate::parameters::{assign, random_seed, LayoutParameters, Parameters};
use crate::routing::{EdgeRouteMap, EdgeRouter, OrthogonalRouter};
use crate::sizes::SizeMap;
use crate::{CancellationToken, LayoutAlgorithm, LayoutError, LayoutStatus, PositionMap, Vec2};
use petgraph::graphmap::DiGraphMap;
use serde::{Deserialize, Serialize};
use sprawl_graph::{Edge, LayoutGraph, MutableGraph, Vertex, VertexId};
use std::collections::HashMap;
use tracing::debug;

use crossings::minimize_crossings;
use layers::assign_layers;
use positions::{normalize_vertical_positions, Placement};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayeredLayoutField {
    Seed,
    Margin,
    MaxCrossingIterations,
    MaxPositionIterations,
}

/// Configuration for the layered (Sugiyama-style) DAG layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredLayoutParameters {
    /// The layout is deterministic, the seed is only carried along
    seed: u64,

    /// Horizontal and vertical margins between vertices
    margin: Vec2,

    /// Maximum iterations for crossing minimization
    max_crossing_iterations: usize,

    /// Maximum iterations for vertical position optimization
    max_position_iterations: usize,
}

impl Default for LayeredLayoutParameters {
    fn default() -> Self {
        Self {
            seed: random_seed(),
            margin: Vec2::new(20.0, 20.0),
            max_crossing_iterations: 10,
            max_position_iterations: 50,
        }
    }
}

impl LayeredLayoutParameters {
    /// Default parameters with the given margin
    pub fn new(margin: Vec2) -> Self {
        Self {
            margin,
            ..Default::default()
        }
    }

    pub fn margin(&self) -> Vec2 {
        self.margin
    }

    pub fn set_margin(&mut self, margin: Vec2) -> Option<LayeredLayoutField> {
        assign(&mut self.margin, margin, LayeredLayoutField::Margin)
    }

    pub fn max_crossing_iterations(&self) -> usize {
        self.max_crossing_iterations
    }

    pub fn set_max_crossing_iterations(&mut self, iterations: usize) -> Option<LayeredLayoutField> {
        assign(
            &mut self.max_crossing_iterations,
            iterations,
            LayeredLayoutField::MaxCrossingIterations,
        )
    }

    pub fn max_position_iterations(&self) -> usize {
        self.max_position_iterations
    }

    pub fn set_max_position_iterations(&mut self, iterations: usize) -> Option<LayeredLayoutField> {
        assign(
            &mut self.max_position_iterations,
            iterations,
            LayeredLayoutField::MaxPositionIterations,
        )
    }
}

impl Parameters for LayeredLayoutParameters {
    type Field = LayeredLayoutField;
}

impl LayoutParameters for LayeredLayoutParameters {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) -> Option<LayeredLayoutField> {
        assign(&mut self.seed, seed, LayeredLayoutField::Seed)
    }
}

/// Layer structure of the non-skipped part of a graph
#[derive(Debug, Clone)]
pub struct Layers {
    /// Internal graph representation for efficient edge lookups
    pub(crate) graph: DiGraphMap<VertexId, ()>,

    /// Vertices organized into topological layers
    pub vertices: Vec<Vec<VertexId>>,

    /// Number of edge crossings (quality metric)
    pub crossings: usize,
}

impl Layers {
    pub fn layer_of(&self) -> HashMap<VertexId, usize> {
        self.vertices
            .iter()
            .enumerate()
            .flat_map(|(index, layer)| layer.iter().map(move |&vertex| (vertex, index)))
            .collect()
    }
}

/// Layered layout for directed acyclic graphs
///
/// Layers are laid out from left to right and vertices are moved towards the
/// barycenter of their successors, one [`IterationEvent`] being reported per
/// refinement sweep with the layer of each vertex as auxiliary data.
///
/// Skipped vertices and edges are ignored, self loops don't take part in the
/// layering, and edge weights have no influence. Freezing isn't supported:
/// frozen vertices are laid out like the others.
#[derive(Debug)]
pub struct LayeredLayout<G = LayoutGraph> {
    state: LayoutState<G, usize>,
    parameters: LayeredLayoutParameters,
    router: OrthogonalRouter,
    routes: EdgeRouteMap,
}

impl<G: MutableGraph> LayeredLayout<G> {
    pub fn new(parameters: LayeredLayoutParameters) -> Self {
        Self {
            state: LayoutState::new(),
            parameters,
            router: OrthogonalRouter::default(),
            routes: EdgeRouteMap::new(),
        }
    }

    /// Like [`LayeredLayout::new`], with a factory used by
    /// [`LayoutAlgorithm::reset_graph`] when no graph is bound
    pub fn with_factory(
        parameters: LayeredLayoutParameters,
        factory: impl Fn() -> G + Send + 'static,
    ) -> Self {
        Self {
            state: LayoutState::with_factory(factory),
            ..Self::new(parameters)
        }
    }

    /// Compute layer structure of the bound graph
    ///
    /// # Errors
    /// Returns an error if the algorithm isn't initialized or if the
    /// non-skipped part of the graph contains cycles
    pub fn compute_layers(&self, token: &CancellationToken) -> Result<Layers, LayoutError> {
        let graph = self.state.graph()?;

        let mut internal_graph = DiGraphMap::new();
        for vertex in graph.vertices().filter(|v| !v.is_skipped()) {
            internal_graph.add_node(vertex.id());
        }
        for edge in graph.edges() {
            if edge.is_skipped()
                || edge.is_self_loop()
                || !internal_graph.contains_node(edge.source)
                || !internal_graph.contains_node(edge.target)
            {
                continue;
            }
            internal_graph.add_edge(edge.source, edge.target, ());
        }

        let layers = assign_layers(&internal_graph)?;
        let (layers, crossings) = minimize_crossings(
            &internal_graph,
            layers,
            self.parameters.max_crossing_iterations,
            token,
        );

        debug!("{} layers with {crossings} crossings", layers.len());

        Ok(Layers {
            graph: internal_graph,
            vertices: layers,
            crossings,
        })
    }

    fn finish(&mut self, positions: PositionMap, status: LayoutStatus) -> LayoutStatus {
        self.state.positions.extend(positions);
        if let Ok(graph) = self.state.graph() {
            self.routes = self
                .router
                .route(graph, &self.state.positions, self.state.sizes.as_ref());
        }
        status
    }
}

impl<G: MutableGraph + Default + 'static> Default for LayeredLayout<G> {
    fn default() -> Self {
        Self::with_factory(LayeredLayoutParameters::default(), G::default)
    }
}

impl<G: MutableGraph> LayoutAlgorithm for LayeredLayout<G> {
    type Graph = G;
    type Parameters = LayeredLayoutParameters;
    type VertexInfo = usize;
    type EdgeInfo = ();

    fn needs_vertex_sizes(&self) -> bool {
        true
    }

    fn supports_object_freeze(&self) -> bool {
        false
    }

    fn parameters(&self) -> &LayeredLayoutParameters {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: LayeredLayoutParameters) {
        self.parameters = parameters;
    }

    fn initialize(&mut self, input: LayoutInput<G, usize>) -> Result<(), LayoutError> {
        self.state.bind(input, self.needs_vertex_sizes())?;
        self.routes.clear();
        Ok(())
    }

    fn compute(&mut self, token: &CancellationToken) -> Result<LayoutStatus, LayoutError> {
        self.state.ready(self.needs_vertex_sizes())?;

        let layers = self.compute_layers(token)?;
        if token.is_cancelled() {
            debug!("Layered layout cancelled while ordering layers");
            return Ok(self.finish(PositionMap::new(), LayoutStatus::Cancelled));
        }

        let sizes = self.state.sizes.clone();
        let placement = Placement::new(
            &layers.vertices,
            &layers.graph,
            sizes.as_ref(),
            self.parameters.margin,
        );
        let mut positions = placement.initial_positions();
        let max_iterations = self.parameters.max_position_iterations;
        let layer_of = self.state.has_listener().then(|| layers.layer_of());

        for iteration in 0..max_iterations {
            if token.is_cancelled() {
                debug!("Layered layout cancelled at iteration {iteration}");
                return Ok(self.finish(positions, LayoutStatus::Cancelled));
            }

            let changed = placement.refine(&mut positions);
            let finished = !changed || iteration + 1 == max_iterations;

            if let Some(layer_of) = &layer_of {
                let percent = (iteration + 1) as f64 * 100.0 / max_iterations as f64;
                let event = IterationEvent::new(iteration, percent, positions.clone())
                    .with_message(format!("Refining positions ({} layers)", layers.vertices.len()))
                    .with_status(if finished {
                        IterationStatus::Finished
                    } else {
                        IterationStatus::Running
                    })
                    .with_vertex_info(layer_of.clone());
                if self.state.report(event) {
                    return Ok(self.finish(positions, LayoutStatus::Cancelled));
                }
            }

            if finished {
                break;
            }
        }

        normalize_vertical_positions(&mut positions);
        Ok(self.finish(positions, LayoutStatus::Completed))
    }

    fn reset_graph(
        &mut self,
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<(), LayoutError> {
        let reset = self.state.reset_graph(vertices, edges);
        match (&reset, self.state.graph()) {
            (Ok(()), _) => self.routes.clear(),
            (Err(_), Ok(graph)) => self.routes.retain(|edge, _| graph.contains_edge(*edge)),
            (Err(_), Err(_)) => {}
        }
        reset
    }

    fn graph(&self) -> Result<&G, LayoutError> {
        self.state.graph()
    }

    fn positions(&self) -> &PositionMap {
        &self.state.positions
    }

    fn vertex_sizes(&self) -> Option<&SizeMap> {
        self.state.sizes.as_ref()
    }

    fn edge_routing(&self) -> Option<&dyn EdgeRouting> {
        Some(self)
    }
}

impl<G> EdgeRouting for LayeredLayout<G> {
    fn edge_routes(&self) -> &EdgeRouteMap {
        &self.routes
    }
}
