//! Entity Paths
//!
//! Chains of sketch entities connected end to end. A path is the unit the
//! profile builder discretizes, unions and reconstructs.

use glam::{DAffine2, DVec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Curve, Entity, Sketch, SketchResult};

/// Default distance under which two endpoints are treated as one node
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-6;

/// One of the two logical endpoints of an entity ("1" or "2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EndPoint {
    /// The entity's start (`from`, `p1`)
    First,
    /// The entity's end (`to`, `p2`)
    Second,
}

impl EndPoint {
    /// The opposite endpoint
    pub fn other(self) -> Self {
        match self {
            EndPoint::First => EndPoint::Second,
            EndPoint::Second => EndPoint::First,
        }
    }
}

/// An entity as it appears in a path, with its placement transform
#[derive(Debug, Clone, Copy)]
pub struct Edge<'a> {
    /// The referenced entity
    pub entity: &'a Entity,
    /// Transform from entity coordinates to sketch coordinates
    pub transform: DAffine2,
}

impl<'a> Edge<'a> {
    /// Create an edge with identity placement
    pub fn new(entity: &'a Entity) -> Self {
        Self {
            entity,
            transform: DAffine2::IDENTITY,
        }
    }

    /// Set the placement transform
    pub fn with_transform(mut self, transform: DAffine2) -> Self {
        self.transform = transform;
        self
    }

    /// Geometry of the referenced entity
    pub fn curve(&self) -> &'a Curve {
        &self.entity.curve
    }

    /// Apply the placement transform to a point in entity coordinates
    pub fn transform_point(&self, p: DVec2) -> DVec2 {
        self.transform.transform_point2(p)
    }

    /// Placed position of an endpoint
    pub fn point(&self, end: EndPoint) -> DVec2 {
        self.transform_point(self.entity.curve.endpoint(end))
    }
}

/// A junction between edges of a path
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    /// Placed position of the junction
    pub position: DVec2,
    /// Entity endpoints meeting at this node
    pub ends: Vec<(Uuid, EndPoint)>,
}

impl Node {
    /// Create a node with no endpoints attached
    pub fn new(position: DVec2) -> Self {
        Self {
            position,
            ends: Vec::new(),
        }
    }

    /// Attach an entity endpoint
    pub fn with_end(mut self, entity: Uuid, end: EndPoint) -> Self {
        self.ends.push((entity, end));
        self
    }

    /// Which endpoint of `edge` lies on this node.
    ///
    /// # Panics
    /// If the edge does not touch the node; paths are built by the extractor
    /// and a mismatch means the path data is malformed.
    pub fn endpoint_for(&self, edge: &Edge<'_>) -> EndPoint {
        self.ends
            .iter()
            .find(|(id, _)| *id == edge.entity.id)
            .map(|(_, end)| *end)
            .unwrap_or_else(|| {
                panic!(
                    "node at {:?} is not an endpoint of entity {}",
                    self.position, edge.entity.id
                )
            })
    }
}

/// An ordered chain of (node, edge) pairs; node `i` is where edge `i` starts
#[derive(Debug, Clone)]
pub struct Path<'a> {
    elements: Vec<(Node, Edge<'a>)>,
    closed: bool,
}

impl<'a> Path<'a> {
    /// Build a path from edges and the endpoint each one starts at.
    ///
    /// Nodes are derived from the edges: node `i` records where edge `i`
    /// starts and where edge `i - 1` ends (wrapping around for closed paths).
    pub fn from_chain(chain: Vec<(Edge<'a>, EndPoint)>, closed: bool) -> Self {
        let n = chain.len();
        let elements = (0..n)
            .map(|i| {
                let (edge, start) = chain[i];
                let mut node = Node::new(edge.point(start)).with_end(edge.entity.id, start);
                if n > 1 && (i > 0 || closed) {
                    let (prev, prev_start) = chain[(i + n - 1) % n];
                    node = node.with_end(prev.entity.id, prev_start.other());
                }
                (node, edge)
            })
            .collect();
        Self { elements, closed }
    }

    /// Number of elements
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the path has no elements
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Whether the last edge ends where the first one starts
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Get the element at a position
    pub fn get(&self, index: usize) -> Option<&(Node, Edge<'a>)> {
        self.elements.get(index)
    }

    /// Iterate over the elements in order
    pub fn iter(&self) -> impl Iterator<Item = &(Node, Edge<'a>)> {
        self.elements.iter()
    }

    /// Iterate over the edges in order
    pub fn edges(&self) -> impl Iterator<Item = &Edge<'a>> {
        self.elements.iter().map(|(_, edge)| edge)
    }
}

/// The paths found in one workplane/group of a sketch
#[derive(Debug, Clone, Default)]
pub struct Paths<'a> {
    /// Extracted paths, in a deterministic order
    pub paths: Vec<Path<'a>>,
}

impl<'a> Paths<'a> {
    /// Extract paths with the default snap tolerance
    pub fn from_sketch(sketch: &'a Sketch, workplane: Uuid, group: Uuid) -> SketchResult<Self> {
        Self::from_sketch_with_tolerance(sketch, workplane, group, DEFAULT_SNAP_TOLERANCE)
    }

    /// Extract paths, merging endpoints closer than `tolerance`.
    ///
    /// Circles become one-element paths. Everything else is chained through
    /// shared endpoints: chains start at nodes that do not join exactly two
    /// endpoints and become open paths; leftover entities form closed loops.
    pub fn from_sketch_with_tolerance(
        sketch: &'a Sketch,
        workplane: Uuid,
        group: Uuid,
        tolerance: f64,
    ) -> SketchResult<Self> {
        sketch.workplane(workplane)?;

        let entities: Vec<&Entity> = sketch
            .entities()
            .filter(|e| e.workplane == workplane && e.group == group && !e.construction)
            .collect();

        let mut paths = Vec::new();
        let mut graph = EndpointGraph::new(entities.len(), tolerance);

        for (i, &entity) in entities.iter().enumerate() {
            if matches!(entity.curve, Curve::Circle { .. }) {
                paths.push(Path::from_chain(
                    vec![(Edge::new(entity), EndPoint::First)],
                    true,
                ));
            } else {
                graph.insert(i, &entity.curve);
            }
        }

        // Open chains first, starting from dead ends and branch points
        for node in 0..graph.nodes.len() {
            if graph.incident[node].len() == 2 {
                continue;
            }
            let starts = graph.incident[node].clone();
            for (entity, end) in starts {
                if graph.used[entity] {
                    continue;
                }
                let (chain, closed) = graph.walk(node, entity, end);
                paths.push(Self::chain_to_path(&entities, chain, closed));
            }
        }

        // Whatever remains lies on loops through degree-two nodes only
        for entity in 0..entities.len() {
            if graph.used[entity] {
                continue;
            }
            if let Some([start, _]) = graph.ends[entity] {
                let (chain, closed) = graph.walk(start, entity, EndPoint::First);
                paths.push(Self::chain_to_path(&entities, chain, closed));
            }
        }

        tracing::debug!(
            "Extracted {} paths from {} entities",
            paths.len(),
            entities.len()
        );

        Ok(Self { paths })
    }

    fn chain_to_path(
        entities: &[&'a Entity],
        chain: Vec<(usize, EndPoint)>,
        closed: bool,
    ) -> Path<'a> {
        Path::from_chain(
            chain
                .into_iter()
                .map(|(i, end)| (Edge::new(entities[i]), end))
                .collect(),
            closed,
        )
    }

    /// Number of paths
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether no paths were found
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Iterate over the paths
    pub fn iter(&self) -> impl Iterator<Item = &Path<'a>> {
        self.paths.iter()
    }
}

/// Endpoint connectivity used while chaining entities
struct EndpointGraph {
    tolerance: f64,
    nodes: Vec<DVec2>,
    incident: Vec<Vec<(usize, EndPoint)>>,
    ends: Vec<Option<[usize; 2]>>,
    used: Vec<bool>,
}

impl EndpointGraph {
    fn new(entity_count: usize, tolerance: f64) -> Self {
        Self {
            tolerance,
            nodes: Vec::new(),
            incident: Vec::new(),
            ends: vec![None; entity_count],
            used: vec![false; entity_count],
        }
    }

    fn node_at(&mut self, p: DVec2) -> usize {
        if let Some(i) = self
            .nodes
            .iter()
            .position(|n| n.distance(p) <= self.tolerance)
        {
            return i;
        }
        self.nodes.push(p);
        self.incident.push(Vec::new());
        self.nodes.len() - 1
    }

    fn insert(&mut self, entity: usize, curve: &Curve) {
        let a = self.node_at(curve.endpoint(EndPoint::First));
        let b = self.node_at(curve.endpoint(EndPoint::Second));
        self.incident[a].push((entity, EndPoint::First));
        self.incident[b].push((entity, EndPoint::Second));
        self.ends[entity] = Some([a, b]);
    }

    fn far_node(&self, entity: usize, start: EndPoint) -> usize {
        let [a, b] = self.ends[entity].expect("chained entity has endpoints");
        match start {
            EndPoint::First => b,
            EndPoint::Second => a,
        }
    }

    /// Follow the chain leaving `start` through `entity`
    fn walk(
        &mut self,
        start: usize,
        mut entity: usize,
        mut end: EndPoint,
    ) -> (Vec<(usize, EndPoint)>, bool) {
        let mut chain = Vec::new();
        loop {
            self.used[entity] = true;
            chain.push((entity, end));
            let next = self.far_node(entity, end);
            if next == start {
                return (chain, true);
            }
            if self.incident[next].len() != 2 {
                return (chain, false);
            }
            match self.incident[next].iter().find(|(j, _)| !self.used[*j]) {
                Some(&(j, e)) => {
                    entity = j;
                    end = e;
                }
                None => return (chain, false),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sketch::Workplane;

    fn setup() -> (Sketch, Uuid, Uuid) {
        let mut sketch = Sketch::new("paths");
        let wp = sketch.add_workplane(Workplane::xy());
        (sketch, wp, Uuid::new_v4())
    }

    #[test]
    fn test_rectangle_is_one_closed_path() {
        let (mut sketch, wp, group) = setup();
        sketch.add_polygon(
            wp,
            group,
            &[
                DVec2::new(0.0, 0.0),
                DVec2::new(4.0, 0.0),
                DVec2::new(4.0, 2.0),
                DVec2::new(0.0, 2.0),
            ],
        );

        let paths = Paths::from_sketch(&sketch, wp, group).unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths.paths[0];
        assert_eq!(path.len(), 4);
        assert!(path.is_closed());

        // Every node is where its edge starts and where the previous one ends
        for i in 0..path.len() {
            let (node, edge) = path.get(i).unwrap();
            let (_, prev) = path.get((i + 3) % 4).unwrap();
            assert_eq!(edge.point(node.endpoint_for(edge)), node.position);
            assert_eq!(prev.point(node.endpoint_for(prev)), node.position);
        }
    }

    #[test]
    fn test_reversed_entities_are_chained() {
        let (mut sketch, wp, group) = setup();
        sketch.add_line(wp, group, DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));
        // Drawn against the loop direction
        sketch.add_line(wp, group, DVec2::new(1.0, 1.0), DVec2::new(1.0, 0.0));
        sketch.add_line(wp, group, DVec2::new(1.0, 1.0), DVec2::new(0.0, 0.0));

        let paths = Paths::from_sketch(&sketch, wp, group).unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths.paths[0];
        assert!(path.is_closed());
        let (node, edge) = path.get(1).unwrap();
        assert_eq!(node.endpoint_for(edge), EndPoint::Second);
    }

    #[test]
    fn test_circle_is_its_own_path() {
        let (mut sketch, wp, group) = setup();
        sketch.add_circle(wp, group, DVec2::new(1.0, 1.0), 0.5);
        sketch.add_circle(wp, group, DVec2::new(5.0, 1.0), 0.5);

        let paths = Paths::from_sketch(&sketch, wp, group).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.len() == 1 && p.is_closed()));
    }

    #[test]
    fn test_open_chain_starts_at_dead_end() {
        let (mut sketch, wp, group) = setup();
        let a = sketch.add_line(wp, group, DVec2::new(1.0, 0.0), DVec2::new(2.0, 0.0));
        let b = sketch.add_line(wp, group, DVec2::new(0.0, 0.0), DVec2::new(1.0, 0.0));

        let paths = Paths::from_sketch(&sketch, wp, group).unwrap();
        assert_eq!(paths.len(), 1);
        let path = &paths.paths[0];
        assert!(!path.is_closed());
        assert_eq!(path.len(), 2);
        // Walked from the dead end at (2,0), the first one discovered
        let ids: Vec<Uuid> = path.edges().map(|e| e.entity.id).collect();
        assert_eq!(ids, vec![a, b]);
        let (node, edge) = path.get(0).unwrap();
        assert_eq!(node.endpoint_for(edge), EndPoint::Second);
    }

    #[test]
    fn test_filters_group_and_construction() {
        let (mut sketch, wp, group) = setup();
        let other_group = Uuid::new_v4();
        sketch.add_circle(wp, other_group, DVec2::ZERO, 1.0);
        let construction = sketch.add_circle(wp, group, DVec2::ZERO, 2.0);
        sketch.set_construction(construction, true).unwrap();
        sketch.add_circle(wp, group, DVec2::ZERO, 3.0);

        let paths = Paths::from_sketch(&sketch, wp, group).unwrap();
        assert_eq!(paths.len(), 1);
        assert_eq!(paths.paths[0].get(0).unwrap().1.curve().radius(), Some(3.0));
    }

    #[test]
    fn test_unknown_workplane_is_an_error() {
        let (sketch, _, group) = setup();
        assert!(Paths::from_sketch(&sketch, Uuid::new_v4(), group).is_err());
    }

    #[test]
    #[should_panic(expected = "is not an endpoint")]
    fn test_foreign_edge_panics() {
        let (mut sketch, wp, group) = setup();
        let a = sketch.add_line(wp, group, DVec2::ZERO, DVec2::X);
        let b = sketch.add_line(wp, group, DVec2::Y, DVec2::X);
        let node = Node::new(DVec2::ZERO).with_end(a, EndPoint::First);
        node.endpoint_for(&Edge::new(sketch.entity(b).unwrap()));
    }
}
