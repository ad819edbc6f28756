use crate::CancellationToken;
use petgraph::graphmap::DiGraphMap;
use petgraph::Direction;
use sprawl_graph::VertexId;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Reorder the layers with the barycenter heuristic
///
/// Each round sweeps down, ordering every layer by the mean rank of its
/// predecessors, then up, ordering by the mean rank of its successors. The
/// best ordering seen is returned along with its crossing count. Stops after
/// `max_iterations` rounds, on a round without strict improvement, or when
/// `token` is cancelled.
pub(crate) fn minimize_crossings(
    graph: &DiGraphMap<VertexId, ()>,
    mut layers: Vec<Vec<VertexId>>,
    max_iterations: usize,
    token: &CancellationToken,
) -> (Vec<Vec<VertexId>>, usize) {
    let mut best = count_crossings(graph, &layers);
    let mut best_layers = layers.clone();

    for _ in 0..max_iterations {
        if best == 0 || token.is_cancelled() {
            break;
        }

        for index in 1..layers.len() {
            reorder(graph, &mut layers, index, index - 1, Direction::Incoming);
        }
        for index in (0..layers.len().saturating_sub(1)).rev() {
            reorder(graph, &mut layers, index, index + 1, Direction::Outgoing);
        }

        let crossings = count_crossings(graph, &layers);
        if crossings >= best {
            break;
        }
        best = crossings;
        best_layers.clone_from(&layers);
    }

    (best_layers, best)
}

fn ranks(layer: &[VertexId]) -> HashMap<VertexId, usize> {
    layer
        .iter()
        .enumerate()
        .map(|(rank, &vertex)| (vertex, rank))
        .collect()
}

/// Sort `layers[index]` by the mean rank of the neighbors found in
/// `layers[reference]`; vertices without such neighbors keep their rank
fn reorder(
    graph: &DiGraphMap<VertexId, ()>,
    layers: &mut [Vec<VertexId>],
    index: usize,
    reference: usize,
    direction: Direction,
) {
    let reference_ranks = ranks(&layers[reference]);

    let mut keyed: Vec<(f64, usize, VertexId)> = layers[index]
        .iter()
        .enumerate()
        .map(|(rank, &vertex)| {
            let (sum, count) = graph
                .neighbors_directed(vertex, direction)
                .filter_map(|neighbor| reference_ranks.get(&neighbor))
                .fold((0, 0), |(sum, count), &rank| (sum + rank, count + 1));
            let key = if count == 0 {
                rank as f64
            } else {
                sum as f64 / count as f64
            };
            (key, rank, vertex)
        })
        .collect();

    keyed.sort_by(|a, b| {
        a.0.partial_cmp(&b.0)
            .unwrap_or(Ordering::Equal)
            .then(a.1.cmp(&b.1))
    });
    layers[index] = keyed.into_iter().map(|(_, _, vertex)| vertex).collect();
}

/// Number of pairwise crossings of the edges joining consecutive layers
fn count_crossings(graph: &DiGraphMap<VertexId, ()>, layers: &[Vec<VertexId>]) -> usize {
    layers
        .windows(2)
        .map(|pair| {
            let lower = ranks(&pair[1]);
            let lower = &lower;
            let segments: Vec<(usize, usize)> = pair[0]
                .iter()
                .enumerate()
                .flat_map(move |(upper, &vertex)| {
                    graph
                        .neighbors_directed(vertex, Direction::Outgoing)
                        .filter_map(move |target| lower.get(&target).map(|&rank| (upper, rank)))
                })
                .collect();

            segments
                .iter()
                .enumerate()
                .map(|(i, &(u1, l1))| {
                    segments[i + 1..]
                        .iter()
                        .filter(|&&(u2, l2)| (u1 < u2 && l1 > l2) || (u1 > u2 && l1 < l2))
                        .count()
                })
                .sum::<usize>()
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    fn cross() -> (DiGraphMap<VertexId, ()>, Vec<Vec<VertexId>>) {
        let graph = DiGraphMap::from_edges([
            (VertexId(1), VertexId(4)),
            (VertexId(2), VertexId(3)),
        ]);
        let layers = vec![
            vec![VertexId(1), VertexId(2)],
            vec![VertexId(3), VertexId(4)],
        ];
        (graph, layers)
    }

    #[test]
    fn untangles_a_cross() {
        let (graph, layers) = cross();
        assert_eq!(count_crossings(&graph, &layers), 1);

        let (layers, crossings) =
            minimize_crossings(&graph, layers, 10, &CancellationToken::new());
        assert_eq!(crossings, 0);
        assert_eq!(count_crossings(&graph, &layers), 0);
    }

    #[test]
    fn shared_endpoints_do_not_cross() {
        let graph = DiGraphMap::from_edges([
            (VertexId(1), VertexId(3)),
            (VertexId(1), VertexId(4)),
            (VertexId(2), VertexId(4)),
        ]);
        let layers = vec![
            vec![VertexId(1), VertexId(2)],
            vec![VertexId(3), VertexId(4)],
        ];
        assert_eq!(count_crossings(&graph, &layers), 0);
    }

    #[test]
    fn cancelled_token_keeps_the_order() {
        let (graph, layers) = cross();
        let token = CancellationToken::new();
        token.cancel();

        let (result, crossings) = minimize_crossings(&graph, layers.clone(), 10, &token);
        assert_eq!(result, layers);
        assert_eq!(crossings, 1);
    }
}
