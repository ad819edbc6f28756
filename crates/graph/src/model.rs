use crate::GraphError;
use derive_more::{Display, From};
use serde::{Deserialize, Serialize};

/// Identifier of a vertex, unique within a graph
///
/// `-1` ([`VertexId::UNASSIGNED`]) marks a vertex that has not been given an
/// identity yet.
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From,
)]
pub struct VertexId(pub i64);

impl VertexId {
    pub const UNASSIGNED: VertexId = VertexId(-1);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

/// Identifier of an edge, unique within a graph
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From,
)]
pub struct EdgeId(pub i64);

impl EdgeId {
    pub const UNASSIGNED: EdgeId = EdgeId(-1);

    pub fn is_assigned(self) -> bool {
        self != Self::UNASSIGNED
    }
}

/// Cluster identifier for grouping-aware algorithms
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, From,
)]
pub struct GroupId(pub i32);

/// How layout algorithms treat a graph object
#[derive(Debug, PartialEq, Eq, Copy, Clone, Serialize, Deserialize, Default)]
pub enum ProcessingFlag {
    #[default]
    Normal,
    /// Excluded from both the computation and the output
    Skip,
    /// Keeps its current position, for algorithms that honor freezing
    Freeze,
}

#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Vertex {
    id: VertexId,
    pub group: Option<GroupId>,
    /// Custom rotation, in degrees
    pub angle: f64,
    pub flag: ProcessingFlag,
}

impl Vertex {
    pub fn new(id: VertexId) -> Self {
        Self {
            id,
            group: None,
            angle: 0.0,
            flag: ProcessingFlag::Normal,
        }
    }

    /// A vertex waiting for an id, see [`Vertex::assign_id`]
    pub fn unassigned() -> Self {
        Self::new(VertexId::UNASSIGNED)
    }

    pub fn with_group(mut self, group: GroupId) -> Self {
        self.group = Some(group);
        self
    }

    pub fn with_flag(mut self, flag: ProcessingFlag) -> Self {
        self.flag = flag;
        self
    }

    pub fn with_angle(mut self, angle: f64) -> Self {
        self.angle = angle;
        self
    }

    pub fn id(&self) -> VertexId {
        self.id
    }

    /// Give an identity to an unassigned vertex
    ///
    /// # Errors
    /// Identities are immutable: fails if the vertex already has one.
    pub fn assign_id(&mut self, id: VertexId) -> Result<(), GraphError> {
        if self.id.is_assigned() {
            return Err(GraphError::IdAlreadyAssigned(self.id));
        }
        self.id = id;
        Ok(())
    }

    pub fn is_skipped(&self) -> bool {
        self.flag == ProcessingFlag::Skip
    }

    pub fn is_frozen(&self) -> bool {
        self.flag == ProcessingFlag::Freeze
    }
}

/// Directed, weighted edge between two vertices
///
/// Negative weights are accepted; each algorithm documents what it does with
/// them.
#[derive(Debug, PartialEq, Clone, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: VertexId,
    pub target: VertexId,
    pub weight: f64,
    pub flag: ProcessingFlag,
}

impl Edge {
    pub fn new(id: EdgeId, source: VertexId, target: VertexId) -> Self {
        Self {
            id,
            source,
            target,
            weight: 1.0,
            flag: ProcessingFlag::Normal,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_flag(mut self, flag: ProcessingFlag) -> Self {
        self.flag = flag;
        self
    }

    /// Point the edge at new endpoints, e.g. once deserialized vertices have
    /// been resolved
    pub fn rebind(&mut self, source: VertexId, target: VertexId) {
        self.source = source;
        self.target = target;
    }

    pub fn is_skipped(&self) -> bool {
        self.flag == ProcessingFlag::Skip
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}
