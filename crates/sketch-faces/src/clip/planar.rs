//! Planar-graph union engine
//!
//! Even-odd union of tagged polygons:
//! 1. Split every input segment where it meets another one
//! 2. Snap split points into a shared vertex pool
//! 3. Cancel coincident pieces in pairs and prune dangling pieces
//! 4. Trace face cycles of the resulting planar graph
//! 5. Propagate even-odd parity from the unbounded face
//! 6. Split boundary cycles that touch themselves into simple loops and
//!    nest the filled faces' loops into a contour tree

use glam::DVec2;
use std::collections::{HashMap, VecDeque};

use super::{ClipEngine, ContourNode, ContourTree, Intersection, TaggedPath, TaggedPoint};

/// Sine of the angle below which two segments are treated as parallel
const PARALLEL_EPSILON: f64 = 1e-12;

/// Built-in even-odd union over a planar half-edge graph
#[derive(Debug, Clone)]
pub struct PlanarClipper {
    /// Snap distance, relative to the input extent
    tolerance: f64,
}

impl Default for PlanarClipper {
    fn default() -> Self {
        Self::new()
    }
}

impl PlanarClipper {
    /// Create an engine with default tolerance
    pub fn new() -> Self {
        Self { tolerance: 1e-9 }
    }

    /// Set the snap tolerance (relative to the input extent)
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance.max(f64::EPSILON);
        self
    }
}

impl ClipEngine for PlanarClipper {
    fn name(&self) -> &str {
        "planar"
    }

    fn union(
        &self,
        subjects: &[TaggedPath],
        on_intersection: &mut dyn FnMut(&Intersection) -> i64,
    ) -> ContourTree {
        let segments = collect_segments(subjects);
        if segments.is_empty() {
            return ContourTree::default();
        }

        let eps = self.tolerance * extent(&segments).max(1.0);
        let splits = split_segments(&segments, eps, on_intersection);

        let mut pool = VertexPool::new(eps);
        let pieces = build_pieces(&segments, splits, &mut pool);
        let pieces = cancel_even(pieces);
        let pieces = prune_dangling(pieces, pool.points.len());

        tracing::trace!(
            "Planar union: {} segments, {} vertices, {} boundary pieces",
            segments.len(),
            pool.points.len(),
            pieces.len()
        );

        if pieces.is_empty() {
            return ContourTree::default();
        }

        HalfEdgeGraph::new(&pool.points, &pieces).contour_tree()
    }
}

/// An input polygon edge
#[derive(Debug, Clone, Copy)]
struct Segment {
    a: TaggedPoint,
    b: TaggedPoint,
}

impl Segment {
    fn as_pair(&self) -> [TaggedPoint; 2] {
        [self.a, self.b]
    }
}

/// A point where a segment is cut
#[derive(Debug, Clone, Copy)]
struct Split {
    t: f64,
    pos: DVec2,
    z: i64,
}

/// A piece of a segment between consecutive cuts.
///
/// `from_z` is the tag seen leaving `from` along the piece, `to_z` the tag
/// seen leaving `to` against it.
#[derive(Debug, Clone, Copy)]
struct Piece {
    segment: usize,
    from: usize,
    to: usize,
    from_z: i64,
    to_z: i64,
}

fn collect_segments(subjects: &[TaggedPath]) -> Vec<Segment> {
    let mut segments = Vec::new();
    for ring in subjects.iter().filter(|r| r.len() >= 2) {
        for i in 0..ring.len() {
            segments.push(Segment {
                a: ring[i],
                b: ring[(i + 1) % ring.len()],
            });
        }
    }
    segments
}

fn extent(segments: &[Segment]) -> f64 {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for s in segments {
        min = min.min(s.a.pos).min(s.b.pos);
        max = max.max(s.a.pos).max(s.b.pos);
    }
    (max - min).max_element()
}

enum Hit {
    None,
    /// Parameters along the first and second segment
    Point(f64, f64),
    Collinear,
}

fn intersect(a0: DVec2, a1: DVec2, b0: DVec2, b1: DVec2, eps: f64) -> Hit {
    let da = a1 - a0;
    let db = b1 - b0;
    let la = da.length();
    let lb = db.length();
    if la <= eps || lb <= eps {
        return Hit::None;
    }

    let w = b0 - a0;
    let denom = da.perp_dot(db);
    if denom.abs() <= PARALLEL_EPSILON * la * lb {
        let d0 = w.perp_dot(da).abs() / la;
        let d1 = (b1 - a0).perp_dot(da).abs() / la;
        return if d0 <= eps && d1 <= eps {
            Hit::Collinear
        } else {
            Hit::None
        };
    }

    let t = w.perp_dot(db) / denom;
    let u = w.perp_dot(da) / denom;
    let ta = eps / la;
    let tb = eps / lb;
    if t < -ta || t > 1.0 + ta || u < -tb || u > 1.0 + tb {
        return Hit::None;
    }
    Hit::Point(t, u)
}

fn bounds_overlap(a: &Segment, b: &Segment, eps: f64) -> bool {
    let amin = a.a.pos.min(a.b.pos) - DVec2::splat(eps);
    let amax = a.a.pos.max(a.b.pos) + DVec2::splat(eps);
    let bmin = b.a.pos.min(b.b.pos);
    let bmax = b.a.pos.max(b.b.pos);
    amin.x <= bmax.x && bmin.x <= amax.x && amin.y <= bmax.y && bmin.y <= amax.y
}

/// Whether parameter `t` lies strictly inside a segment of length `len`
fn is_inner(t: f64, len: f64, eps: f64) -> bool {
    let margin = eps / len;
    t > margin && t < 1.0 - margin
}

/// Parameter of `p` projected onto segment `s`
fn project(s: &Segment, p: DVec2) -> f64 {
    let d = s.b.pos - s.a.pos;
    (p - s.a.pos).dot(d) / d.length_squared()
}

fn split_segments(
    segments: &[Segment],
    eps: f64,
    on_intersection: &mut dyn FnMut(&Intersection) -> i64,
) -> Vec<Vec<Split>> {
    let mut splits: Vec<Vec<Split>> = vec![Vec::new(); segments.len()];

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (sa, sb) = (&segments[i], &segments[j]);
            if !bounds_overlap(sa, sb, eps) {
                continue;
            }
            let la = (sa.b.pos - sa.a.pos).length();
            let lb = (sb.b.pos - sb.a.pos).length();

            match intersect(sa.a.pos, sa.b.pos, sb.a.pos, sb.b.pos, eps) {
                Hit::None => {}
                Hit::Point(t, u) => {
                    let a_inner = is_inner(t, la, eps);
                    let b_inner = is_inner(u, lb, eps);
                    // A vertex resting on the other segment keeps its own tag
                    let (pos, z) = match (a_inner, b_inner) {
                        (false, false) => continue,
                        (true, true) => {
                            let pos = sa.a.pos + (sa.b.pos - sa.a.pos) * t;
                            let z = on_intersection(&Intersection {
                                e1: sa.as_pair(),
                                e2: sb.as_pair(),
                                point: pos,
                            });
                            (pos, z)
                        }
                        (true, false) if u < 0.5 => (sb.a.pos, sb.a.z),
                        (true, false) => (sb.b.pos, sb.b.z),
                        (false, true) if t < 0.5 => (sa.a.pos, sa.a.z),
                        (false, true) => (sa.b.pos, sa.b.z),
                    };
                    if a_inner {
                        splits[i].push(Split { t, pos, z });
                    }
                    if b_inner {
                        splits[j].push(Split { t: u, pos, z });
                    }
                }
                Hit::Collinear => {
                    for (target, other, len, index) in [(sa, sb, la, i), (sb, sa, lb, j)] {
                        for p in other.as_pair() {
                            let t = project(target, p.pos);
                            if is_inner(t, len, eps) {
                                splits[index].push(Split { t, pos: p.pos, z: p.z });
                            }
                        }
                    }
                }
            }
        }
    }

    splits
}

/// Vertex positions merged within a snap distance
struct VertexPool {
    eps: f64,
    cell: f64,
    points: Vec<DVec2>,
    grid: HashMap<(i64, i64), Vec<usize>>,
}

impl VertexPool {
    fn new(eps: f64) -> Self {
        Self {
            eps,
            cell: eps * 4.0,
            points: Vec::new(),
            grid: HashMap::new(),
        }
    }

    fn key(&self, p: DVec2) -> (i64, i64) {
        (
            (p.x / self.cell).floor() as i64,
            (p.y / self.cell).floor() as i64,
        )
    }

    fn insert(&mut self, p: DVec2) -> usize {
        let (kx, ky) = self.key(p);
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(ids) = self.grid.get(&(kx + dx, ky + dy))
                    && let Some(&id) = ids
                        .iter()
                        .find(|&&id| self.points[id].distance(p) <= self.eps)
                {
                    return id;
                }
            }
        }
        let id = self.points.len();
        self.points.push(p);
        self.grid.entry((kx, ky)).or_default().push(id);
        id
    }
}

fn build_pieces(segments: &[Segment], splits: Vec<Vec<Split>>, pool: &mut VertexPool) -> Vec<Piece> {
    let mut pieces = Vec::new();

    for (index, (segment, mut cuts)) in segments.iter().zip(splits).enumerate() {
        cuts.sort_by(|a, b| a.t.total_cmp(&b.t));

        let mut stops = Vec::with_capacity(cuts.len() + 2);
        stops.push((pool.insert(segment.a.pos), segment.a.z));
        for cut in cuts {
            stops.push((pool.insert(cut.pos), cut.z));
        }
        stops.push((pool.insert(segment.b.pos), segment.b.z));

        for pair in stops.windows(2) {
            let ((from, from_z), (to, to_z)) = (pair[0], pair[1]);
            if from != to {
                pieces.push(Piece {
                    segment: index,
                    from,
                    to,
                    from_z,
                    to_z,
                });
            }
        }
    }

    pieces
}

/// Coincident pieces cancel in pairs under even-odd fill
fn cancel_even(pieces: Vec<Piece>) -> Vec<Piece> {
    let mut groups: HashMap<(usize, usize), Vec<usize>> = HashMap::new();
    for (i, p) in pieces.iter().enumerate() {
        groups
            .entry((p.from.min(p.to), p.from.max(p.to)))
            .or_default()
            .push(i);
    }

    pieces
        .iter()
        .enumerate()
        .filter(|(i, p)| {
            let group = &groups[&(p.from.min(p.to), p.from.max(p.to))];
            group.len() % 2 == 1 && group[0] == *i
        })
        .map(|(_, p)| *p)
        .collect()
}

/// Drop pieces hanging off vertices of degree one until none remain
fn prune_dangling(pieces: Vec<Piece>, vertex_count: usize) -> Vec<Piece> {
    let mut incident: Vec<Vec<usize>> = vec![Vec::new(); vertex_count];
    for (i, p) in pieces.iter().enumerate() {
        incident[p.from].push(i);
        incident[p.to].push(i);
    }

    let mut alive = vec![true; pieces.len()];
    let mut degree: Vec<usize> = incident.iter().map(Vec::len).collect();
    let mut queue: VecDeque<usize> = (0..vertex_count).filter(|&v| degree[v] == 1).collect();

    while let Some(v) = queue.pop_front() {
        if degree[v] != 1 {
            continue;
        }
        let Some(&piece) = incident[v].iter().find(|&&i| alive[i]) else {
            continue;
        };
        alive[piece] = false;
        for end in [pieces[piece].from, pieces[piece].to] {
            degree[end] -= 1;
            if degree[end] == 1 {
                queue.push_back(end);
            }
        }
    }

    pieces
        .into_iter()
        .zip(alive)
        .filter_map(|(p, keep)| keep.then_some(p))
        .collect()
}

#[derive(Debug, Clone, Copy)]
struct HalfEdge {
    segment: usize,
    from: usize,
    to: usize,
    z: i64,
    twin: usize,
}

struct HalfEdgeGraph<'a> {
    points: &'a [DVec2],
    half_edges: Vec<HalfEdge>,
    /// Outgoing half-edges per vertex, counter-clockwise by angle
    outgoing: Vec<Vec<usize>>,
    /// Slot of each half-edge in its origin's outgoing list
    slot: Vec<usize>,
}

/// A closed walk around one face
struct Cycle {
    half_edges: Vec<usize>,
    area: f64,
    component: usize,
}

/// A piece of a cycle that visits each vertex once
struct Loop {
    half_edges: Vec<usize>,
    area: f64,
    /// Face on the left
    face: usize,
}

impl Loop {
    fn is_hole(&self) -> bool {
        self.area <= 0.0
    }
}

struct Loops {
    loops: Vec<Loop>,
    /// Loop of every half-edge
    loop_of: Vec<usize>,
    /// Outer loop of every bounded face
    outer_of_face: Vec<Option<usize>>,
}

impl<'a> HalfEdgeGraph<'a> {
    fn new(points: &'a [DVec2], pieces: &[Piece]) -> Self {
        let mut half_edges = Vec::with_capacity(pieces.len() * 2);
        for p in pieces {
            let h = half_edges.len();
            half_edges.push(HalfEdge {
                segment: p.segment,
                from: p.from,
                to: p.to,
                z: p.from_z,
                twin: h + 1,
            });
            half_edges.push(HalfEdge {
                segment: p.segment,
                from: p.to,
                to: p.from,
                z: p.to_z,
                twin: h,
            });
        }

        let angle = |h: &HalfEdge| {
            let d = points[h.to] - points[h.from];
            d.y.atan2(d.x)
        };

        let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); points.len()];
        for (i, h) in half_edges.iter().enumerate() {
            outgoing[h.from].push(i);
        }
        let mut slot = vec![0; half_edges.len()];
        for list in &mut outgoing {
            list.sort_by(|&a, &b| angle(&half_edges[a]).total_cmp(&angle(&half_edges[b])));
            for (k, &h) in list.iter().enumerate() {
                slot[h] = k;
            }
        }

        Self {
            points,
            half_edges,
            outgoing,
            slot,
        }
    }

    /// Next half-edge around the face on the left of `h`
    fn next(&self, h: usize) -> usize {
        let twin = self.half_edges[h].twin;
        let list = &self.outgoing[self.half_edges[h].to];
        list[(self.slot[twin] + list.len() - 1) % list.len()]
    }

    fn polygon(&self, half_edges: &[usize]) -> Vec<DVec2> {
        half_edges
            .iter()
            .map(|&h| self.points[self.half_edges[h].from])
            .collect()
    }

    fn trace_cycles(&self) -> (Vec<Cycle>, Vec<usize>) {
        let components = self.components();
        let mut cycle_of = vec![usize::MAX; self.half_edges.len()];
        let mut cycles = Vec::new();

        for start in 0..self.half_edges.len() {
            if cycle_of[start] != usize::MAX {
                continue;
            }
            let index = cycles.len();
            let mut walk = Vec::new();
            let mut h = start;
            loop {
                cycle_of[h] = index;
                walk.push(h);
                h = self.next(h);
                if h == start || cycle_of[h] != usize::MAX {
                    break;
                }
            }

            let area = signed_area(&self.polygon(&walk));
            cycles.push(Cycle {
                component: components[self.half_edges[start].from],
                half_edges: walk,
                area,
            });
        }

        (cycles, cycle_of)
    }

    /// Connected component of every vertex
    fn components(&self) -> Vec<usize> {
        let mut parent: Vec<usize> = (0..self.points.len()).collect();
        fn find(parent: &mut [usize], mut v: usize) -> usize {
            while parent[v] != v {
                parent[v] = parent[parent[v]];
                v = parent[v];
            }
            v
        }
        for h in &self.half_edges {
            let (a, b) = (find(&mut parent, h.from), find(&mut parent, h.to));
            if a != b {
                parent[a] = b;
            }
        }
        (0..self.points.len())
            .map(|v| find(&mut parent, v))
            .collect()
    }

    fn contour_tree(&self) -> ContourTree {
        let (cycles, cycle_of) = self.trace_cycles();
        let polygons: Vec<Vec<DVec2>> = cycles.iter().map(|c| self.polygon(&c.half_edges)).collect();

        // Face 0 is unbounded; every counter-clockwise cycle bounds a face
        let mut face_of_cycle = vec![0; cycles.len()];
        let mut faces = 1;
        for (i, c) in cycles.iter().enumerate() {
            if c.area > 0.0 {
                face_of_cycle[i] = faces;
                faces += 1;
            }
        }

        // A clockwise cycle bounds its component from outside and belongs to
        // the smallest face of another component that encloses it
        for (i, c) in cycles.iter().enumerate() {
            if c.area > 0.0 {
                continue;
            }
            let probe = polygons[i][0];
            let enclosing = cycles
                .iter()
                .enumerate()
                .filter(|(j, other)| {
                    other.area > 0.0
                        && other.component != c.component
                        && point_in_polygon(probe, &polygons[*j])
                })
                .min_by(|(_, a), (_, b)| a.area.total_cmp(&b.area))
                .map(|(j, _)| j);
            face_of_cycle[i] = enclosing.map_or(0, |j| face_of_cycle[j]);
        }

        let filled = self.face_parity(&cycle_of, &face_of_cycle, faces);
        let loops = self.loops(&cycles, &face_of_cycle, faces);

        // Holes hang off the outer loop of their face; an outer loop hangs off
        // the hole that bounds the face around it
        let emitted: Vec<usize> = (0..loops.loops.len())
            .filter(|&l| filled[loops.loops[l].face])
            .collect();
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); loops.loops.len()];
        let mut roots = Vec::new();
        for &l in &emitted {
            let current = &loops.loops[l];
            let parent = if current.is_hole() {
                loops.outer_of_face[current.face]
            } else {
                self.enclosing_hole(&loops, current)
                    .filter(|&h| filled[loops.loops[h].face])
            };
            match parent {
                Some(p) => children[p].push(l),
                None => roots.push(l),
            }
        }

        ContourTree {
            roots: roots
                .into_iter()
                .map(|l| self.node(l, &loops.loops, &children))
                .collect(),
        }
    }

    /// Split every cycle into simple loops wherever it revisits a vertex
    fn loops(&self, cycles: &[Cycle], face_of_cycle: &[usize], faces: usize) -> Loops {
        let mut loops = Vec::new();
        let mut loop_of = vec![0; self.half_edges.len()];
        for (i, c) in cycles.iter().enumerate() {
            for half_edges in self.split_at_repeats(&c.half_edges) {
                for &h in &half_edges {
                    loop_of[h] = loops.len();
                }
                loops.push(Loop {
                    area: signed_area(&self.polygon(&half_edges)),
                    face: face_of_cycle[i],
                    half_edges,
                });
            }
        }

        // A bounded face's outer loop is its largest counter-clockwise one
        let mut outer_of_face: Vec<Option<usize>> = vec![None; faces];
        for (l, current) in loops.iter().enumerate() {
            if current.is_hole() || current.face == 0 {
                continue;
            }
            let best = &mut outer_of_face[current.face];
            if best.is_none_or(|b| loops[b].area < current.area) {
                *best = Some(l);
            }
        }

        Loops {
            loops,
            loop_of,
            outer_of_face,
        }
    }

    fn split_at_repeats(&self, walk: &[usize]) -> Vec<Vec<usize>> {
        let mut loops = Vec::new();
        let mut stack: Vec<usize> = Vec::with_capacity(walk.len());
        let mut open: HashMap<usize, usize> = HashMap::new();
        for &h in walk {
            let v = self.half_edges[h].from;
            if let Some(&k) = open.get(&v) {
                let closed: Vec<usize> = stack.drain(k..).collect();
                for &c in &closed {
                    open.remove(&self.half_edges[c].from);
                }
                loops.push(closed);
            }
            open.insert(v, stack.len());
            stack.push(h);
        }
        if !stack.is_empty() {
            loops.push(stack);
        }
        loops
    }

    /// Hole loop around the face that surrounds an outer loop
    fn enclosing_hole(&self, loops: &Loops, outer: &Loop) -> Option<usize> {
        let &h = outer.half_edges.first()?;
        let around = loops.loops[loops.loop_of[self.half_edges[h].twin]].face;
        let boundary = loops.outer_of_face[around]?;
        let &e = loops.loops[boundary].half_edges.first()?;
        let hole = loops.loop_of[self.half_edges[e].twin];
        loops.loops[hole].is_hole().then_some(hole)
    }

    /// Even-odd fill state of every face, from the unbounded face outwards
    fn face_parity(&self, cycle_of: &[usize], face_of_cycle: &[usize], faces: usize) -> Vec<bool> {
        let mut adjacent: Vec<Vec<usize>> = vec![Vec::new(); faces];
        for (h, half) in self.half_edges.iter().enumerate() {
            let a = face_of_cycle[cycle_of[h]];
            let b = face_of_cycle[cycle_of[half.twin]];
            if a != b {
                adjacent[a].push(b);
            }
        }

        let mut parity: Vec<Option<bool>> = vec![None; faces];
        parity[0] = Some(false);
        let mut queue = VecDeque::from([0]);
        while let Some(f) = queue.pop_front() {
            let Some(filled) = parity[f] else { continue };
            for &g in &adjacent[f] {
                if parity[g].is_none() {
                    parity[g] = Some(!filled);
                    queue.push_back(g);
                }
            }
        }
        parity.into_iter().map(|p| p.unwrap_or(false)).collect()
    }

    fn node(&self, l: usize, loops: &[Loop], children: &[Vec<usize>]) -> ContourNode {
        let current = &loops[l];
        let n = current.half_edges.len();
        ContourNode {
            // Split points the boundary runs straight through are dropped
            contour: (0..n)
                .filter_map(|k| {
                    let half = &self.half_edges[current.half_edges[k]];
                    let prev = &self.half_edges[current.half_edges[(k + n - 1) % n]];
                    (prev.segment != half.segment)
                        .then(|| TaggedPoint::new(self.points[half.from], half.z))
                })
                .collect(),
            is_hole: current.is_hole(),
            children: children[l]
                .iter()
                .map(|&i| self.node(i, loops, children))
                .collect(),
        }
    }
}

fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum::<f64>()
        * 0.5
}

fn point_in_polygon(p: DVec2, polygon: &[DVec2]) -> bool {
    let n = polygon.len();
    let mut inside = false;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if (a.y > p.y) != (b.y > p.y) {
            let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
            if p.x < x {
                inside = !inside;
            }
        }
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const SYNTHESIZED: i64 = -1;

    fn ring(points: &[(f64, f64)], first_z: i64) -> TaggedPath {
        points
            .iter()
            .enumerate()
            .map(|(i, &(x, y))| TaggedPoint::new(DVec2::new(x, y), first_z + i as i64))
            .collect()
    }

    fn square(min: f64, max: f64, first_z: i64) -> TaggedPath {
        ring(&[(min, min), (max, min), (max, max), (min, max)], first_z)
    }

    fn union(subjects: &[TaggedPath]) -> (ContourTree, usize) {
        let mut calls = 0;
        let tree = PlanarClipper::new().union(subjects, &mut |_| {
            calls += 1;
            SYNTHESIZED
        });
        (tree, calls)
    }

    fn area(contour: &TaggedPath) -> f64 {
        signed_area(&contour.iter().map(|p| p.pos).collect::<Vec<_>>())
    }

    #[test]
    fn test_single_square_keeps_tags() {
        // Clockwise input comes back counter-clockwise
        let input = ring(&[(0.0, 0.0), (0.0, 2.0), (2.0, 2.0), (2.0, 0.0)], 10);
        let (tree, calls) = union(&[input.clone()]);

        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 1);
        let root = &tree.roots[0];
        assert!(!root.is_hole);
        assert!(root.children.is_empty());
        assert_abs_diff_eq!(area(&root.contour), 4.0);

        let mut zs: Vec<i64> = root.contour.iter().map(|p| p.z).collect();
        zs.sort();
        assert_eq!(zs, vec![10, 11, 12, 13]);
        for p in &root.contour {
            let original = input.iter().find(|q| q.z == p.z).unwrap();
            assert_eq!(original.pos, p.pos);
        }
    }

    #[test]
    fn test_disjoint_squares() {
        let (tree, _) = union(&[square(0.0, 1.0, 0), square(3.0, 4.0, 100)]);
        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.len(), 2);
    }

    #[test]
    fn test_nested_square_becomes_hole() {
        let (tree, calls) = union(&[square(0.0, 10.0, 0), square(2.0, 8.0, 100)]);

        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 1);
        let outer = &tree.roots[0];
        assert_abs_diff_eq!(area(&outer.contour), 100.0);
        assert_eq!(outer.children.len(), 1);

        let hole = &outer.children[0];
        assert!(hole.is_hole);
        assert_abs_diff_eq!(area(&hole.contour), -36.0);
        assert!(hole.contour.iter().all(|p| (100..104).contains(&p.z)));
    }

    #[test]
    fn test_island_inside_hole() {
        let (tree, _) = union(&[
            square(0.0, 10.0, 0),
            square(2.0, 8.0, 100),
            square(4.0, 6.0, 200),
        ]);

        assert_eq!(tree.roots.len(), 1);
        let hole = &tree.roots[0].children[0];
        assert_eq!(hole.children.len(), 1);
        let island = &hole.children[0];
        assert!(!island.is_hole);
        assert_abs_diff_eq!(area(&island.contour), 4.0);
        assert!(island.contour.iter().all(|p| (200..204).contains(&p.z)));
    }

    #[test]
    fn test_overlap_synthesizes_vertices() {
        let (tree, calls) = union(&[square(0.0, 10.0, 0), square(5.0, 15.0, 100)]);

        // Boundaries cross twice
        assert_eq!(calls, 2);
        // Even-odd: the shared lens is empty, two L-shaped regions remain
        assert_eq!(tree.roots.len(), 2);
        for root in &tree.roots {
            assert_abs_diff_eq!(area(&root.contour), 75.0);
            assert!(root.contour.iter().any(|p| p.z == SYNTHESIZED));
        }
    }

    #[test]
    fn test_identical_rings_cancel() {
        let (tree, _) = union(&[square(0.0, 1.0, 0), square(0.0, 1.0, 100)]);
        assert!(tree.is_empty());
    }

    #[test]
    fn test_shared_edge_splits_collinear_overlap() {
        // Two rectangles sharing part of an edge merge into one region; the
        // split points are vertices of the second rectangle and keep its tags
        let a = ring(&[(0.0, 0.0), (4.0, 0.0), (4.0, 4.0), (0.0, 4.0)], 0);
        let b = ring(&[(4.0, 1.0), (6.0, 1.0), (6.0, 3.0), (4.0, 3.0)], 100);
        let (tree, calls) = union(&[a, b]);

        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 1);
        let contour = &tree.roots[0].contour;
        assert_abs_diff_eq!(area(contour), 20.0);
        assert_eq!(contour.len(), 8);
        assert!(contour.iter().any(|p| p.z < 100));
        assert!(contour.iter().any(|p| p.z >= 100));
        assert!(contour.iter().all(|p| p.z != SYNTHESIZED));
    }

    #[test]
    fn test_hole_touching_outer_stays_a_hole() {
        // The diamond's right corner rests on the square's right edge
        let diamond = ring(&[(10.0, 5.0), (8.0, 7.0), (6.0, 5.0), (8.0, 3.0)], 100);
        let (tree, calls) = union(&[square(0.0, 10.0, 0), diamond]);

        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 1);
        let outer = &tree.roots[0];
        assert!(!outer.is_hole);
        let mut zs: Vec<i64> = outer.contour.iter().map(|p| p.z).collect();
        zs.sort();
        assert_eq!(zs, vec![0, 1, 2, 3]);
        assert_abs_diff_eq!(area(&outer.contour), 100.0);

        assert_eq!(outer.children.len(), 1);
        let hole = &outer.children[0];
        assert!(hole.is_hole);
        assert!(hole.children.is_empty());
        let mut zs: Vec<i64> = hole.contour.iter().map(|p| p.z).collect();
        zs.sort();
        assert_eq!(zs, vec![100, 101, 102, 103]);
        assert_abs_diff_eq!(area(&hole.contour), -8.0);
    }

    #[test]
    fn test_island_touching_hole_nests_inside_it() {
        // The island's left corner rests on the hole's left edge
        let island = ring(&[(2.0, 5.0), (4.0, 4.0), (5.0, 5.0), (4.0, 6.0)], 200);
        let (tree, calls) = union(&[square(0.0, 10.0, 0), square(2.0, 8.0, 100), island]);

        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 1);
        let hole = &tree.roots[0].children[0];
        assert!(hole.is_hole);
        assert!(hole.contour.iter().all(|p| (100..104).contains(&p.z)));
        assert_eq!(hole.children.len(), 1);
        let island = &hole.children[0];
        assert!(!island.is_hole);
        assert!(island.contour.iter().all(|p| (200..204).contains(&p.z)));
        assert_abs_diff_eq!(area(&island.contour), 3.0);
    }

    #[test]
    fn test_squares_touching_at_a_corner_stay_apart() {
        let (tree, calls) = union(&[square(0.0, 1.0, 0), square(1.0, 2.0, 100)]);
        assert_eq!(calls, 0);
        assert_eq!(tree.roots.len(), 2);
        for root in &tree.roots {
            assert!(root.children.is_empty());
            assert_abs_diff_eq!(area(&root.contour), 1.0);
        }
    }

    #[test]
    fn test_empty_input() {
        let (tree, _) = union(&[]);
        assert!(tree.is_empty());
        assert_eq!(PlanarClipper::default().name(), "planar");
    }

    #[test]
    fn test_point_in_polygon() {
        let poly = [
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        assert!(point_in_polygon(DVec2::new(1.0, 1.0), &poly));
        assert!(!point_in_polygon(DVec2::new(3.0, 1.0), &poly));
    }
}
