//! Pluggable graph layout algorithms
//!
//! Every algorithm implements [`LayoutAlgorithm`]: it is bound to a graph,
//! its known positions and the vertex sizes with
//! [`LayoutAlgorithm::initialize`], then [`LayoutAlgorithm::compute`] places
//! the vertices. Computations can be stopped with a [`CancellationToken`] or
//! by a progress listener aborting an [`IterationEvent`]; either way the
//! positions computed so far are kept and the status is
//! [`LayoutStatus::Cancelled`].
//!
//! Overlap removal ([`overlap`]) and edge routing ([`EdgeRouter`]) are
//! separate passes, chained after the layout by [`LayoutPipeline`].
//!
//! # Layout Algorithms
//!
//! - [`RandomLayout`]: seeded uniform scattering inside bounds
//! - [`LayeredLayout`]: Sugiyama-style layered layout for DAGs, routing its
//!   own edges
//!
//! # Example
//!
//! ```
//! use sprawl_graph::{Edge, EdgeId, LayoutGraph, Vertex, VertexId};
//! use sprawl_layout::{
//!     CancellationToken, LayoutAlgorithm, LayoutInput, LayoutStatus, RandomLayout,
//!     RandomLayoutParameters, Rect, Size, SizeMap,
//! };
//!
//! let graph = LayoutGraph::from_parts(
//!     (1..=3).map(|i| Vertex::new(VertexId(i))),
//!     [Edge::new(EdgeId(1), VertexId(1), VertexId(2))],
//! )
//! .unwrap();
//! let sizes: SizeMap = (1..=3).map(|i| (VertexId(i), Size::new(10.0, 10.0))).collect();
//!
//! let mut parameters = RandomLayoutParameters::with_seed(42);
//! parameters.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
//!
//! let mut layout = RandomLayout::new(parameters);
//! layout
//!     .initialize(LayoutInput::new(graph).with_sizes(sizes))
//!     .unwrap();
//! let status = layout.compute(&CancellationToken::new()).unwrap();
//!
//! assert_eq!(status, LayoutStatus::Completed);
//! assert_eq!(layout.positions().len(), 3);
//! ```

mod cancellation;
mod engine;
mod error;
mod geometry;
mod iteration;
mod pipeline;
mod random;
mod routing;
mod sizes;

pub mod layered;
pub mod overlap;
pub mod parameters;

pub use cancellation::CancellationToken;
pub use engine::{
    EdgeRouting, GraphFactory, LayoutAlgorithm, LayoutInput, LayoutState, LayoutStatus,
    PositionMap,
};
pub use error::{ErrorKind, LayoutError};
pub use geometry::{Point, Rect, Size, Vec2};
pub use iteration::{IterationEvent, IterationListener, IterationStatus};
pub use parameters::{LayoutParameters, Observed, Parameters};
pub use pipeline::{LayoutOutcome, LayoutPipeline};
pub use random::{RandomLayout, RandomLayoutField, RandomLayoutParameters};
pub use routing::{EdgeRouteMap, EdgeRouter, OrthogonalRouter};
pub use sizes::SizeMap;

pub use layered::{LayeredLayout, LayeredLayoutField, LayeredLayoutParameters, Layers};
pub use overlap::{
    OverlapAxis, OverlapError, OverlapParameters, OverlapRemovalAlgorithm, ScanOverlapRemoval,
};
