use crate::LayoutError;
use petgraph::algo::toposort;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use sprawl_graph::VertexId;
use std::collections::HashMap;

/// Assign layers to vertices based on topological order
///
/// Uses a two-pass approach to minimize edge lengths:
/// - First pass: assign each vertex to the layer after its predecessors
/// - Second pass: move vertices closer to their successors when possible
pub(crate) fn assign_layers(
    graph: &DiGraphMap<VertexId, ()>,
) -> Result<Vec<Vec<VertexId>>, LayoutError> {
    let topo_order = toposort(graph, None)
        .map_err(|cycle| LayoutError::GraphHasCycle(cycle.node_id()))?;
    let mut layer_map: HashMap<VertexId, usize> = HashMap::new();

    for &vertex in &topo_order {
        let layer = graph
            .neighbors_directed(vertex, Direction::Incoming)
            .map(|pred| layer_map.get(&pred).map_or(0, |layer| layer + 1))
            .max()
            .unwrap_or(0);
        layer_map.insert(vertex, layer);
    }

    for &vertex in topo_order.iter().rev() {
        let layer = layer_map.get(&vertex).copied().unwrap_or(0);
        let Some(min_succ_layer) = graph
            .neighbors_directed(vertex, Direction::Outgoing)
            .filter_map(|succ| layer_map.get(&succ).copied())
            .min()
        else {
            continue;
        };

        if min_succ_layer > layer + 1 {
            layer_map.insert(vertex, min_succ_layer - 1);
        }
    }

    let layer_count = layer_map.values().max().map_or(0, |max| max + 1);
    let mut layers = vec![Vec::new(); layer_count];
    for (vertex, layer) in layer_map {
        layers[layer].push(vertex);
    }
    for layer in &mut layers {
        layer.sort();
    }

    Ok(layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layers_follow_edges() {
        let graph = DiGraphMap::from_edges([
            (VertexId(1), VertexId(2)),
            (VertexId(2), VertexId(3)),
            (VertexId(1), VertexId(3)),
        ]);
        let layers = assign_layers(&graph).unwrap();
        assert_eq!(
            layers,
            vec![vec![VertexId(1)], vec![VertexId(2)], vec![VertexId(3)]]
        );
    }

    #[test]
    fn sources_are_pulled_towards_their_successors() {
        let graph = DiGraphMap::from_edges([
            (VertexId(1), VertexId(2)),
            (VertexId(2), VertexId(3)),
            (VertexId(4), VertexId(3)),
        ]);
        let layers = assign_layers(&graph).unwrap();
        assert_eq!(layers[1], vec![VertexId(2), VertexId(4)]);
    }

    #[test]
    fn cycles_are_rejected() {
        let graph = DiGraphMap::<VertexId, ()>::from_edges([
            (VertexId(1), VertexId(2)),
            (VertexId(2), VertexId(1)),
        ]);
        assert!(matches!(
            assign_layers(&graph),
            Err(LayoutError::GraphHasCycle(_))
        ));
    }
}
