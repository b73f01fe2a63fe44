//! Polygon BSP trees and solid difference.
//!
//! Each node splits space by the plane of its first polygon; polygons lying
//! in that plane stay on the node. Difference is done by inverting and
//! clipping the two trees against each other, the classic approach from
//! csg.js. Split fragments keep their parent's plane, so repeated splits do
//! not drift.

use tablewright_math::{Plane, Point3};

/// Distance within which a vertex counts as lying on a plane.
pub const PLANE_EPSILON: f64 = 1e-5;

const COPLANAR: u8 = 0;
const FRONT: u8 = 1;
const BACK: u8 = 2;
const SPANNING: u8 = 3;

/// Convex polygon, counter-clockwise seen from the front of its plane.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    /// Corner positions.
    pub vertices: Vec<Point3>,
    /// Supporting plane, outward.
    pub plane: Plane,
}

impl Polygon {
    /// Polygon through `vertices`, or `None` when the first three are
    /// collinear.
    pub fn new(vertices: Vec<Point3>) -> Option<Self> {
        if vertices.len() < 3 {
            return None;
        }
        let plane = Plane::from_points(&vertices[0], &vertices[1], &vertices[2])?;
        Some(Self { vertices, plane })
    }

    fn flip(&mut self) {
        self.vertices.reverse();
        self.plane = self.plane.flipped();
    }
}

/// Where the pieces of a split polygon go.
#[derive(Default)]
struct Split {
    coplanar_front: Vec<Polygon>,
    coplanar_back: Vec<Polygon>,
    front: Vec<Polygon>,
    back: Vec<Polygon>,
}

fn split_polygon(plane: &Plane, polygon: Polygon, out: &mut Split) {
    let kinds: Vec<u8> = polygon
        .vertices
        .iter()
        .map(|v| {
            let t = plane.signed_distance(v);
            if t < -PLANE_EPSILON {
                BACK
            } else if t > PLANE_EPSILON {
                FRONT
            } else {
                COPLANAR
            }
        })
        .collect();

    match kinds.iter().fold(COPLANAR, |acc, k| acc | k) {
        COPLANAR => {
            if plane.normal.dot(&polygon.plane.normal) > 0.0 {
                out.coplanar_front.push(polygon);
            } else {
                out.coplanar_back.push(polygon);
            }
        }
        FRONT => out.front.push(polygon),
        BACK => out.back.push(polygon),
        _ => {
            let n = polygon.vertices.len();
            let mut f = Vec::with_capacity(n + 1);
            let mut b = Vec::with_capacity(n + 1);
            for i in 0..n {
                let j = (i + 1) % n;
                let (ki, kj) = (kinds[i], kinds[j]);
                let (vi, vj) = (polygon.vertices[i], polygon.vertices[j]);
                if ki != BACK {
                    f.push(vi);
                }
                if ki != FRONT {
                    b.push(vi);
                }
                if ki | kj == SPANNING {
                    let t = (plane.offset - plane.normal.dot(&vi.coords))
                        / plane.normal.dot(&(vj - vi));
                    let v = vi + (vj - vi) * t;
                    f.push(v);
                    b.push(v);
                }
            }
            if f.len() >= 3 {
                out.front.push(Polygon {
                    vertices: f,
                    plane: polygon.plane,
                });
            }
            if b.len() >= 3 {
                out.back.push(Polygon {
                    vertices: b,
                    plane: polygon.plane,
                });
            }
        }
    }
}

/// A node of a BSP tree.
#[derive(Debug, Clone, Default)]
pub struct Node {
    plane: Option<Plane>,
    front: Option<Box<Node>>,
    back: Option<Box<Node>>,
    polygons: Vec<Polygon>,
}

impl Node {
    /// Tree holding `polygons`.
    pub fn new(polygons: Vec<Polygon>) -> Self {
        let mut node = Self::default();
        node.build(polygons);
        node
    }

    /// Swap solid and empty space.
    pub fn invert(&mut self) {
        for p in &mut self.polygons {
            p.flip();
        }
        self.plane = self.plane.map(|p| p.flipped());
        if let Some(front) = &mut self.front {
            front.invert();
        }
        if let Some(back) = &mut self.back {
            back.invert();
        }
        std::mem::swap(&mut self.front, &mut self.back);
    }

    /// Remove the parts of `polygons` inside this tree.
    pub fn clip_polygons(&self, polygons: Vec<Polygon>) -> Vec<Polygon> {
        let Some(plane) = &self.plane else {
            return polygons;
        };
        let mut split = Split::default();
        for p in polygons {
            split_polygon(plane, p, &mut split);
        }
        let mut front = split.front;
        front.append(&mut split.coplanar_front);
        let mut back = split.back;
        back.append(&mut split.coplanar_back);

        let mut kept = match &self.front {
            Some(node) => node.clip_polygons(front),
            None => front,
        };
        if let Some(node) = &self.back {
            kept.extend(node.clip_polygons(back));
        }
        kept
    }

    /// Remove the parts of this tree's polygons inside `other`.
    pub fn clip_to(&mut self, other: &Node) {
        self.polygons = other.clip_polygons(std::mem::take(&mut self.polygons));
        if let Some(front) = &mut self.front {
            front.clip_to(other);
        }
        if let Some(back) = &mut self.back {
            back.clip_to(other);
        }
    }

    /// Every polygon in the tree.
    pub fn all_polygons(&self) -> Vec<Polygon> {
        let mut out = Vec::new();
        self.collect_into(&mut out);
        out
    }

    fn collect_into(&self, out: &mut Vec<Polygon>) {
        out.extend(self.polygons.iter().cloned());
        if let Some(front) = &self.front {
            front.collect_into(out);
        }
        if let Some(back) = &self.back {
            back.collect_into(out);
        }
    }

    /// Insert `polygons`, splitting them down the tree.
    pub fn build(&mut self, polygons: Vec<Polygon>) {
        let Some(first) = polygons.first() else {
            return;
        };
        let plane = *self.plane.get_or_insert(first.plane);
        let mut split = Split::default();
        for p in polygons {
            split_polygon(&plane, p, &mut split);
        }
        self.polygons.append(&mut split.coplanar_front);
        self.polygons.append(&mut split.coplanar_back);
        if !split.front.is_empty() {
            self.front
                .get_or_insert_with(Default::default)
                .build(split.front);
        }
        if !split.back.is_empty() {
            self.back
                .get_or_insert_with(Default::default)
                .build(split.back);
        }
    }
}

/// Polygons of `a` with the volume of `b` removed.
pub fn difference(a: Vec<Polygon>, b: Vec<Polygon>) -> Vec<Polygon> {
    let mut a = Node::new(a);
    let mut b = Node::new(b);
    a.invert();
    a.clip_to(&b);
    b.clip_to(&a);
    b.invert();
    b.clip_to(&a);
    b.invert();
    a.build(b.all_polygons());
    a.invert();
    a.all_polygons()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(z: f64) -> Polygon {
        Polygon::new(vec![
            Point3::new(-1.0, -1.0, z),
            Point3::new(1.0, -1.0, z),
            Point3::new(1.0, 1.0, z),
            Point3::new(-1.0, 1.0, z),
        ])
        .unwrap()
    }

    #[test]
    fn test_split_spanning_square() {
        let plane = Plane::from_point_normal(&Point3::origin(), &tablewright_math::Vec3::x());
        let mut split = Split::default();
        split_polygon(&plane, square(0.0), &mut split);
        assert_eq!(split.front.len(), 1);
        assert_eq!(split.back.len(), 1);
        assert_eq!(split.front[0].vertices.len(), 4);
        assert!(split.front[0].vertices.iter().all(|v| v.x >= -1e-12));
        // Fragments keep the parent plane.
        assert_eq!(split.back[0].plane, square(0.0).plane);
    }

    #[test]
    fn test_coplanar_goes_by_facing() {
        let plane = square(0.0).plane;
        let mut split = Split::default();
        split_polygon(&plane, square(0.0), &mut split);
        let mut flipped = square(0.0);
        flipped.flip();
        split_polygon(&plane, flipped, &mut split);
        assert_eq!(split.coplanar_front.len(), 1);
        assert_eq!(split.coplanar_back.len(), 1);
    }

    #[test]
    fn test_invert_twice_is_identity() {
        let mut node = Node::new(vec![square(0.0), square(1.0)]);
        let before = node.all_polygons();
        node.invert();
        node.invert();
        assert_eq!(node.all_polygons(), before);
    }

    #[test]
    fn test_collinear_polygon_is_rejected() {
        assert!(Polygon::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .is_none());
    }
}
