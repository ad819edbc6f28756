use crate::engine::{LayoutInput, LayoutState};
use crate::parameters::{assign, random_seed, LayoutParameters, Parameters};
use crate::sizes::{size_of, SizeMap};
use crate::{
    CancellationToken, LayoutAlgorithm, LayoutError, LayoutStatus, Point, PositionMap, Rect,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sprawl_graph::{Edge, LayoutGraph, MutableGraph, Vertex};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RandomLayoutField {
    Seed,
    Bounds,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomLayoutParameters {
    seed: u64,
    /// Region the vertex footprints are scattered in
    bounds: Rect,
}

impl Default for RandomLayoutParameters {
    fn default() -> Self {
        Self::with_seed(random_seed())
    }
}

impl RandomLayoutParameters {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            seed,
            bounds: Rect::new(0.0, 0.0, 800.0, 600.0),
        }
    }

    pub fn bounds(&self) -> Rect {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Rect) -> Option<RandomLayoutField> {
        assign(&mut self.bounds, bounds, RandomLayoutField::Bounds)
    }
}

impl Parameters for RandomLayoutParameters {
    type Field = RandomLayoutField;
}

impl LayoutParameters for RandomLayoutParameters {
    fn seed(&self) -> u64 {
        self.seed
    }

    fn set_seed(&mut self, seed: u64) -> Option<RandomLayoutField> {
        assign(&mut self.seed, seed, RandomLayoutField::Seed)
    }
}

/// Scatters vertices uniformly inside the parameter bounds
///
/// Each placed vertex gets integer coordinates drawn so that its whole
/// footprint stays inside the bounds. The same seed, graph and bounds always
/// give the same positions.
///
/// Freeze policy: a frozen vertex keeps its position, unless no vertex has a
/// position yet, in which case it is placed like any other vertex.
#[derive(Debug)]
pub struct RandomLayout<G = LayoutGraph> {
    state: LayoutState<G>,
    parameters: RandomLayoutParameters,
}

impl<G: MutableGraph> RandomLayout<G> {
    pub fn new(parameters: RandomLayoutParameters) -> Self {
        Self {
            state: LayoutState::new(),
            parameters,
        }
    }

    /// Like [`RandomLayout::new`], with a factory used by
    /// [`LayoutAlgorithm::reset_graph`] when no graph is bound
    pub fn with_factory(
        parameters: RandomLayoutParameters,
        factory: impl Fn() -> G + Send + 'static,
    ) -> Self {
        Self {
            state: LayoutState::with_factory(factory),
            parameters,
        }
    }
}

impl<G: MutableGraph + Default + 'static> Default for RandomLayout<G> {
    fn default() -> Self {
        Self::with_factory(RandomLayoutParameters::default(), G::default)
    }
}

/// Integer coordinate in `[start, start + extent - footprint)`
///
/// When the footprint doesn't fit, the vertex is pinned to the start of the
/// range.
fn draw(rng: &mut StdRng, start: f64, extent: f64, footprint: f64) -> Option<f64> {
    let low = start.ceil() as i64;
    let high = (start + extent - footprint).floor() as i64;
    if high > low {
        Some(rng.gen_range(low..high) as f64)
    } else if high == low {
        Some(low as f64)
    } else {
        None
    }
}

impl<G: MutableGraph> LayoutAlgorithm for RandomLayout<G> {
    type Graph = G;
    type Parameters = RandomLayoutParameters;
    type VertexInfo = ();
    type EdgeInfo = ();

    fn needs_vertex_sizes(&self) -> bool {
        true
    }

    fn supports_object_freeze(&self) -> bool {
        true
    }

    fn parameters(&self) -> &RandomLayoutParameters {
        &self.parameters
    }

    fn set_parameters(&mut self, parameters: RandomLayoutParameters) {
        self.parameters = parameters;
    }

    fn initialize(&mut self, input: LayoutInput<G>) -> Result<(), LayoutError> {
        self.state.bind(input, self.needs_vertex_sizes())
    }

    fn compute(&mut self, token: &CancellationToken) -> Result<LayoutStatus, LayoutError> {
        let graph = self.state.ready(self.needs_vertex_sizes())?;
        let bounds = self.parameters.bounds;
        let bootstrap = self.state.positions.is_empty();

        let mut vertices: Vec<_> = graph
            .vertices()
            .filter(|v| !v.is_skipped() && !(v.is_frozen() && !bootstrap))
            .map(|v| v.id())
            .collect();
        vertices.sort();

        debug!(
            "Placing {} vertices in {bounds:?} with seed {}",
            vertices.len(),
            self.parameters.seed
        );

        let mut rng = StdRng::seed_from_u64(self.parameters.seed);
        for vertex in vertices {
            if token.is_cancelled() {
                debug!("Random layout cancelled");
                return Ok(LayoutStatus::Cancelled);
            }

            let size = size_of(self.state.sizes.as_ref(), vertex);
            let x = draw(&mut rng, bounds.x, bounds.width, size.width).unwrap_or_else(|| {
                warn!("Vertex {vertex} is wider than the layout bounds");
                bounds.x
            });
            let y = draw(&mut rng, bounds.y, bounds.height, size.height).unwrap_or_else(|| {
                warn!("Vertex {vertex} is taller than the layout bounds");
                bounds.y
            });
            self.state.positions.insert(vertex, Point::new(x, y));
        }

        Ok(LayoutStatus::Completed)
    }

    fn reset_graph(
        &mut self,
        vertices: impl IntoIterator<Item = Vertex>,
        edges: impl IntoIterator<Item = Edge>,
    ) -> Result<(), LayoutError> {
        self.state.reset_graph(vertices, edges)
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
}
