use sprawl_graph::{Edge, EdgeId, LayoutGraph, ProcessingFlag, Vertex, VertexId};
use sprawl_layout::overlap::separated;
use sprawl_layout::{
    CancellationToken, LayeredLayout, LayeredLayoutParameters, LayoutAlgorithm, LayoutInput,
    LayoutPipeline, LayoutStatus, OrthogonalRouter, OverlapParameters, RandomLayout,
    RandomLayoutParameters, Rect, ScanOverlapRemoval, Size, SizeMap,
};
use test_log::test;

fn star(count: i64) -> LayoutGraph {
    LayoutGraph::from_parts(
        (1..=count).map(|i| Vertex::new(VertexId(i))),
        (2..=count).map(|i| Edge::new(EdgeId(i), VertexId(1), VertexId(i))),
    )
    .unwrap()
}

fn sizes(count: i64) -> SizeMap {
    (1..=count)
        .map(|i| (VertexId(i), Size::new(30.0, 20.0)))
        .collect()
}

fn crowded_random(count: i64) -> RandomLayout {
    let mut parameters = RandomLayoutParameters::with_seed(5);
    parameters.set_bounds(Rect::new(0.0, 0.0, 120.0, 120.0));
    let mut algorithm = RandomLayout::new(parameters);
    algorithm
        .initialize(LayoutInput::new(star(count)).with_sizes(sizes(count)))
        .unwrap();
    algorithm
}

#[test]
fn overlap_removal_separates_every_vertex() {
    let mut algorithm = crowded_random(30);
    let mut pipeline = LayoutPipeline::new().with_overlap_removal(
        ScanOverlapRemoval::new(),
        OverlapParameters::new(6.0, 4.0).unwrap(),
    );

    let outcome = pipeline.run(&mut algorithm, &CancellationToken::new()).unwrap();

    assert_eq!(outcome.status, LayoutStatus::Completed);
    assert_eq!(outcome.positions.len(), 30);
    assert!(outcome.routes.is_none());

    let rects: Vec<Rect> = outcome
        .positions
        .values()
        .map(|&origin| Rect::from_origin_size(origin, Size::new(30.0, 20.0)))
        .collect();
    for (i, a) in rects.iter().enumerate() {
        for b in &rects[i + 1..] {
            assert!(separated(a, b, 6.0, 4.0), "{a:?} and {b:?} overlap");
        }
    }

    // The algorithm keeps its own result
    assert_ne!(algorithm.positions(), &outcome.positions);
}

#[test]
fn router_covers_placed_edges() {
    let mut graph = star(4);
    graph.vertex_mut(VertexId(4)).unwrap().flag = ProcessingFlag::Skip;
    let mut vertex_sizes = sizes(4);
    vertex_sizes.remove(&VertexId(4));

    let mut algorithm = RandomLayout::new(RandomLayoutParameters::with_seed(8));
    algorithm
        .initialize(LayoutInput::new(graph).with_sizes(vertex_sizes))
        .unwrap();

    let mut pipeline = LayoutPipeline::new().with_router(OrthogonalRouter::default());
    let outcome = pipeline.run(&mut algorithm, &CancellationToken::new()).unwrap();

    assert!(!outcome.routed_by_algorithm);
    let routes = outcome.routes.unwrap();
    let mut routed: Vec<_> = routes.keys().copied().collect();
    routed.sort();
    assert_eq!(routed, vec![EdgeId(2), EdgeId(3)]);
}

#[test]
fn algorithm_routes_take_precedence() {
    let mut algorithm = LayeredLayout::new(LayeredLayoutParameters::default());
    algorithm
        .initialize(LayoutInput::new(star(5)).with_sizes(sizes(5)))
        .unwrap();

    let mut pipeline = LayoutPipeline::new().with_router(OrthogonalRouter::new(50.0));
    let outcome = pipeline.run(&mut algorithm, &CancellationToken::new()).unwrap();

    assert!(outcome.routed_by_algorithm);
    assert!(!outcome.routes_stale);
    let routes = outcome.routes.unwrap();
    assert_eq!(routes.len(), 4);
    assert_eq!(
        &routes,
        algorithm.edge_routing().unwrap().edge_routes()
    );
}

#[test]
fn moving_routed_vertices_marks_routes_stale() {
    let mut algorithm = LayeredLayout::new(LayeredLayoutParameters::default());
    algorithm
        .initialize(LayoutInput::new(star(5)).with_sizes(sizes(5)))
        .unwrap();

    // Siblings sit one margin apart, far closer than the requested gap
    let mut pipeline = LayoutPipeline::new().with_overlap_removal(
        ScanOverlapRemoval::new(),
        OverlapParameters::new(100.0, 100.0).unwrap(),
    );
    let outcome = pipeline.run(&mut algorithm, &CancellationToken::new()).unwrap();

    assert_eq!(outcome.status, LayoutStatus::Completed);
    assert!(outcome.routed_by_algorithm);
    assert!(outcome.routes_stale);
    assert_ne!(algorithm.positions(), &outcome.positions);
    assert_eq!(
        outcome.routes.as_ref(),
        Some(algorithm.edge_routing().unwrap().edge_routes())
    );
}

#[test]
fn cancelled_runs_skip_post_processing() {
    let mut algorithm = crowded_random(10);
    let mut pipeline = LayoutPipeline::new()
        .with_overlap_removal(ScanOverlapRemoval::new(), OverlapParameters::default())
        .with_router(OrthogonalRouter::default());

    let token = CancellationToken::new();
    token.cancel();
    let outcome = pipeline.run(&mut algorithm, &token).unwrap();

    assert_eq!(outcome.status, LayoutStatus::Cancelled);
    assert!(outcome.positions.is_empty());
    assert!(outcome.routes.is_none());
    assert!(!outcome.routes_stale);
}
