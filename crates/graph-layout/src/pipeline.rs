use crate::overlap::{OverlapParameters, OverlapRemovalAlgorithm};
use crate::parameters::LayoutParameters;
use crate::routing::{EdgeRouteMap, EdgeRouter, OrthogonalRouter};
use crate::sizes::size_of;
use crate::{CancellationToken, LayoutAlgorithm, LayoutError, LayoutStatus, PositionMap, Rect};
use sprawl_graph::VertexId;
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// Result of a [`LayoutPipeline`] run
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOutcome {
    pub status: LayoutStatus,
    pub positions: PositionMap,
    /// `None` when no stage routed edges
    ///
    /// Routes computed by the algorithm are not recomputed after overlap
    /// removal, see [`LayoutOutcome::routes_stale`].
    pub routes: Option<EdgeRouteMap>,
    /// Whether the routes come from the layout algorithm itself
    pub routed_by_algorithm: bool,
    /// Set when overlap removal moved vertices after the algorithm routed
    /// its edges: routes touching moved vertices no longer reach them
    pub routes_stale: bool,
}

type OverlapStage = (
    Box<dyn OverlapRemovalAlgorithm<VertexId> + Send>,
    OverlapParameters,
);

/// Chains a layout algorithm with overlap removal and edge routing
///
/// The routing stage only runs for algorithms that don't route edges
/// themselves. Routes an algorithm computed are kept as they are, even if
/// overlap removal moved vertices afterwards; the outcome then has
/// `routes_stale` set. Nothing runs after a cancelled layout.
pub struct LayoutPipeline<R = OrthogonalRouter> {
    overlap: Option<OverlapStage>,
    router: Option<R>,
}

impl Default for LayoutPipeline<OrthogonalRouter> {
    fn default() -> Self {
        Self {
            overlap: None,
            router: None,
        }
    }
}

impl LayoutPipeline<OrthogonalRouter> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<R: EdgeRouter> LayoutPipeline<R> {
    pub fn with_overlap_removal(
        mut self,
        algorithm: impl OverlapRemovalAlgorithm<VertexId> + Send + 'static,
        parameters: OverlapParameters,
    ) -> Self {
        self.overlap = Some((Box::new(algorithm), parameters));
        self
    }

    pub fn with_router<T: EdgeRouter>(self, router: T) -> LayoutPipeline<T> {
        LayoutPipeline {
            overlap: self.overlap,
            router: Some(router),
        }
    }

    /// Compute the layout then run the post-processing stages
    ///
    /// The algorithm must be initialized. Its positions are left untouched,
    /// the post-processed ones are returned in the outcome.
    ///
    /// # Errors
    /// Forwards the errors of the algorithm and of the overlap removal.
    pub fn run<A: LayoutAlgorithm>(
        &mut self,
        algorithm: &mut A,
        token: &CancellationToken,
    ) -> Result<LayoutOutcome, LayoutError> {
        info!(
            "Running layout with seed {}",
            algorithm.parameters().seed()
        );
        let status = algorithm.compute(token)?;
        let mut positions = algorithm.positions().clone();
        let routed_by_algorithm = algorithm.supports_edge_routing();

        if status == LayoutStatus::Cancelled {
            info!("Layout cancelled with {} vertices placed", positions.len());
            let routes = algorithm
                .edge_routing()
                .map(|routing| routing.edge_routes().clone());
            return Ok(LayoutOutcome {
                status,
                positions,
                routes,
                routed_by_algorithm,
                routes_stale: false,
            });
        }

        let mut moved = false;
        if let Some((overlap, parameters)) = self.overlap.as_mut() {
            let sizes = algorithm.vertex_sizes();
            let rectangles: HashMap<VertexId, Rect> = positions
                .iter()
                .map(|(&vertex, &origin)| {
                    (vertex, Rect::from_origin_size(origin, size_of(sizes, vertex)))
                })
                .collect();

            overlap.initialize(rectangles, parameters.clone())?;
            overlap.compute()?;
            for (vertex, rect) in overlap.rectangles() {
                if let Some(previous) = positions.insert(*vertex, rect.origin()) {
                    moved |= previous != rect.origin();
                }
            }
            debug!("Overlap removal done, vertices moved: {moved}");
        }

        let routes = match (algorithm.edge_routing(), self.router.as_ref()) {
            (Some(routing), _) => Some(routing.edge_routes().clone()),
            (None, Some(router)) => {
                let graph = algorithm.graph()?;
                Some(router.route(graph, &positions, algorithm.vertex_sizes()))
            }
            (None, None) => None,
        };

        info!(
            "Layout completed with {} vertices placed and {} routed edges",
            positions.len(),
            routes.as_ref().map_or(0, |routes| routes.len())
        );

        let routes_stale = routed_by_algorithm && moved;
        if routes_stale {
            warn!("Overlap removal moved vertices after the layout routed its edges");
        }

        Ok(LayoutOutcome {
            status,
            positions,
            routes,
            routed_by_algorithm,
            routes_stale,
        })
    }
}
