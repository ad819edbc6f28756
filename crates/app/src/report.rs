use serde::Serialize;
use sprawl_layout::{LayoutOutcome, LayoutStatus, Point};
use std::collections::BTreeMap;
use std::fmt;

/// Printable result of a layout run, ordered by vertex and edge id
#[derive(Debug, Serialize)]
pub struct Report {
    pub seed: u64,
    pub status: LayoutStatus,
    pub positions: BTreeMap<i64, Point>,
    pub routes: Option<BTreeMap<i64, Vec<Point>>>,
}

impl Report {
    pub fn new(seed: u64, outcome: &LayoutOutcome) -> Self {
        Self {
            seed,
            status: outcome.status,
            positions: outcome
                .positions
                .iter()
                .map(|(vertex, point)| (vertex.0, *point))
                .collect(),
            routes: outcome.routes.as_ref().map(|routes| {
                routes
                    .iter()
                    .map(|(edge, points)| (edge.0, points.clone()))
                    .collect()
            }),
        }
    }

    pub fn to_ron(&self) -> Result<String, ron::Error> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:?} with seed {}", self.status, self.seed)?;
        for (vertex, point) in &self.positions {
            writeln!(f, "vertex {vertex}: ({}, {})", point.x, point.y)?;
        }
        for (edge, points) in self.routes.iter().flatten() {
            write!(f, "edge {edge}:")?;
            for point in points {
                write!(f, " ({}, {})", point.x, point.y)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sprawl_graph::{EdgeId, VertexId};
    use sprawl_layout::PositionMap;
    use std::collections::HashMap;
    use test_log::test;

    fn outcome() -> LayoutOutcome {
        LayoutOutcome {
            status: LayoutStatus::Completed,
            positions: PositionMap::from([
                (VertexId(2), Point::new(40.0, 0.0)),
                (VertexId(1), Point::new(0.0, 12.5)),
            ]),
            routes: Some(HashMap::from([(
                EdgeId(1),
                vec![Point::new(10.0, 17.5), Point::new(40.0, 5.0)],
            )])),
            routed_by_algorithm: false,
            routes_stale: false,
        }
    }

    #[test]
    fn text_lists_vertices_in_id_order() {
        let text = Report::new(7, &outcome()).to_string();
        assert_eq!(
            text,
            "Completed with seed 7\n\
             vertex 1: (0, 12.5)\n\
             vertex 2: (40, 0)\n\
             edge 1: (10, 17.5) (40, 5)\n"
        );
    }

    #[test]
    fn ron_output() {
        let ron = Report::new(7, &outcome()).to_ron().unwrap();
        assert!(ron.contains("seed: 7"), "{ron}");
        assert!(ron.contains("status: Completed"), "{ron}");
    }
}
