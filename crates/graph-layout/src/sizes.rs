use crate::{LayoutError, Size};
use sprawl_graph::{MutableGraph, VertexId};
use std::collections::HashMap;

/// Size of each vertex footprint, supplied by whoever measures the vertices
pub type SizeMap = HashMap<VertexId, Size>;

/// Check that every non-skipped vertex of the graph has a usable size
///
/// # Errors
/// Returns the first vertex (by id) that has no size, or whose size is
/// negative or not finite.
pub(crate) fn check_coverage<G: MutableGraph>(graph: &G, sizes: &SizeMap) -> Result<(), LayoutError> {
    let mut vertices: Vec<_> = graph
        .vertices()
        .filter(|v| !v.is_skipped())
        .map(|v| v.id())
        .collect();
    vertices.sort();

    for vertex in vertices {
        let Some(size) = sizes.get(&vertex) else {
            return Err(LayoutError::MissingVertexSize(vertex));
        };
        if !size.is_finite() || size.width < 0.0 || size.height < 0.0 {
            return Err(LayoutError::InvalidVertexSize {
                vertex,
                width: size.width,
                height: size.height,
            });
        }
    }
    Ok(())
}

/// Size of a vertex, zero when unknown
pub(crate) fn size_of(sizes: Option<&SizeMap>, vertex: VertexId) -> Size {
    sizes
        .and_then(|sizes| sizes.get(&vertex))
        .copied()
        .unwrap_or(Size::zero())
}
