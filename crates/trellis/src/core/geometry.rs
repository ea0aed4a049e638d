//! Geometric primitives shared by the force and constraint models
//!
//! All coordinates are screen-oriented: x grows east, y grows south.
//! Node boxes are axis-aligned and stored as center plus extent.

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point (or displacement)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance_to(&self, other: Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An axis-aligned box stored as center plus extent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Point,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(center: Point, width: f64, height: f64) -> Self {
        Self {
            center,
            width,
            height,
        }
    }

    /// Build a rect from edge coordinates
    pub fn from_bounds(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            center: Point::new((left + right) / 2.0, (top + bottom) / 2.0),
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn left(&self) -> f64 {
        self.center.x - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center.x + self.width / 2.0
    }

    pub fn top(&self) -> f64 {
        self.center.y - self.height / 2.0
    }

    pub fn bottom(&self) -> f64 {
        self.center.y + self.height / 2.0
    }

    /// True if the interiors of the two rects intersect
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }

    /// True if `other` lies fully inside this rect, `margin` in from every edge
    pub fn contains_rect(&self, other: &Rect, margin: f64) -> bool {
        other.left() >= self.left() + margin
            && other.right() <= self.right() - margin
            && other.top() >= self.top() + margin
            && other.bottom() <= self.bottom() - margin
    }

    /// Smallest rect covering both
    pub fn union(&self, other: &Rect) -> Rect {
        Rect::from_bounds(
            self.left().min(other.left()),
            self.top().min(other.top()),
            self.right().max(other.right()),
            self.bottom().max(other.bottom()),
        )
    }

    /// Half-extent of the box along a unit direction
    ///
    /// For an axis-aligned box this is the support distance from the center
    /// to the boundary in direction `(ux, uy)`.
    pub fn extent_along(&self, ux: f64, uy: f64) -> f64 {
        ux.abs() * self.width / 2.0 + uy.abs() * self.height / 2.0
    }

    /// Gap between the boundaries of two boxes, measured along the line
    /// joining their centers. Zero when the centers coincide or the boxes
    /// overlap along that line.
    pub fn boundary_gap(&self, other: &Rect) -> f64 {
        let dx = other.center.x - self.center.x;
        let dy = other.center.y - self.center.y;
        let dist = (dx * dx + dy * dy).sqrt();
        if dist == 0.0 {
            return 0.0;
        }
        let ux = dx / dist;
        let uy = dy / dist;
        (dist - self.extent_along(ux, uy) - other.extent_along(ux, uy)).max(0.0)
    }

    /// Point where the segment from this rect's center toward `target`
    /// crosses the boundary. Returns the center itself when `target`
    /// coincides with it.
    pub fn boundary_point_toward(&self, target: Point) -> Point {
        let dx = target.x - self.center.x;
        let dy = target.y - self.center.y;
        if dx == 0.0 && dy == 0.0 {
            return self.center;
        }
        let tx = if dx != 0.0 {
            (self.width / 2.0) / dx.abs()
        } else {
            f64::INFINITY
        };
        let ty = if dy != 0.0 {
            (self.height / 2.0) / dy.abs()
        } else {
            f64::INFINITY
        };
        let t = tx.min(ty);
        Point::new(self.center.x + dx * t, self.center.y + dy * t)
    }
}

/// A compass side of a node box
///
/// Doubles as a flow direction: connected nodes are encouraged to separate
/// toward this side (south = target below source, east = target right).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    North,
    #[default]
    South,
    East,
    West,
}

impl Side {
    /// Parse from a compass name
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" => Some(Side::North),
            "south" | "s" => Some(Side::South),
            "east" | "e" => Some(Side::East),
            "west" | "w" => Some(Side::West),
            _ => None,
        }
    }

    /// Unit vector pointing out of this side
    pub fn unit(&self) -> (f64, f64) {
        match self {
            Side::North => (0.0, -1.0),
            Side::South => (0.0, 1.0),
            Side::East => (1.0, 0.0),
            Side::West => (-1.0, 0.0),
        }
    }

    /// The coordinate axis this side varies along
    pub fn axis(&self) -> Axis {
        match self {
            Side::North | Side::South => Axis::Y,
            Side::East | Side::West => Axis::X,
        }
    }

    pub fn is_vertical(&self) -> bool {
        matches!(self, Side::North | Side::South)
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::North => write!(f, "north"),
            Side::South => write!(f, "south"),
            Side::East => write!(f, "east"),
            Side::West => write!(f, "west"),
        }
    }
}

/// A coordinate axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::X => write!(f, "x"),
            Axis::Y => write!(f, "y"),
        }
    }
}

/// Where an alignment group converges on its axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Justify {
    /// The smallest current coordinate among members
    Start,
    /// The midpoint of the current extremes
    #[default]
    Center,
    /// The largest current coordinate among members
    End,
}

/// Implicit alignment applied to a compound node's direct children
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildAlignment {
    pub axis: Axis,
    pub justify: Justify,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_edges() {
        let r = Rect::new(Point::new(10.0, 20.0), 4.0, 6.0);
        assert_eq!(r.left(), 8.0);
        assert_eq!(r.right(), 12.0);
        assert_eq!(r.top(), 17.0);
        assert_eq!(r.bottom(), 23.0);
    }

    #[test]
    fn test_rect_overlap() {
        let a = Rect::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rect::new(Point::new(8.0, 0.0), 10.0, 10.0);
        let c = Rect::new(Point::new(20.0, 0.0), 10.0, 10.0);
        assert!(a.overlaps(&b));
        assert!(!a.overlaps(&c));
        // Touching edges do not count as overlap
        let d = Rect::new(Point::new(10.0, 0.0), 10.0, 10.0);
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_rect_union() {
        let a = Rect::from_bounds(0.0, 0.0, 10.0, 10.0);
        let b = Rect::from_bounds(5.0, -5.0, 20.0, 8.0);
        let u = a.union(&b);
        assert_eq!(u.left(), 0.0);
        assert_eq!(u.top(), -5.0);
        assert_eq!(u.right(), 20.0);
        assert_eq!(u.bottom(), 10.0);
    }

    #[test]
    fn test_boundary_gap_horizontal() {
        let a = Rect::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rect::new(Point::new(30.0, 0.0), 10.0, 10.0);
        assert_eq!(a.boundary_gap(&b), 20.0);
    }

    #[test]
    fn test_boundary_gap_overlapping_is_zero() {
        let a = Rect::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let b = Rect::new(Point::new(4.0, 0.0), 10.0, 10.0);
        assert_eq!(a.boundary_gap(&b), 0.0);
        assert_eq!(a.boundary_gap(&a), 0.0);
    }

    #[test]
    fn test_boundary_point_toward() {
        let r = Rect::new(Point::new(0.0, 0.0), 10.0, 10.0);
        let p = r.boundary_point_toward(Point::new(20.0, 0.0));
        assert_eq!(p, Point::new(5.0, 0.0));
        let q = r.boundary_point_toward(Point::new(0.0, -20.0));
        assert_eq!(q, Point::new(0.0, -5.0));
    }

    #[test]
    fn test_contains_rect_with_margin() {
        let outer = Rect::from_bounds(0.0, 0.0, 100.0, 100.0);
        let inner = Rect::from_bounds(10.0, 10.0, 90.0, 90.0);
        assert!(outer.contains_rect(&inner, 5.0));
        assert!(outer.contains_rect(&inner, 10.0));
        assert!(!outer.contains_rect(&inner, 11.0));
    }

    #[test]
    fn test_side_properties() {
        assert_eq!(Side::from_str("north"), Some(Side::North));
        assert_eq!(Side::from_str("E"), Some(Side::East));
        assert_eq!(Side::from_str("bogus"), None);
        assert_eq!(Side::South.unit(), (0.0, 1.0));
        assert_eq!(Side::West.unit(), (-1.0, 0.0));
        assert!(Side::North.is_vertical());
        assert!(!Side::East.is_vertical());
        assert_eq!(Side::East.axis(), Axis::X);
        assert_eq!(Side::South.axis(), Axis::Y);
    }

    #[test]
    fn test_side_display() {
        assert_eq!(Side::North.to_string(), "north");
        assert_eq!(Side::South.to_string(), "south");
        assert_eq!(Side::East.to_string(), "east");
        assert_eq!(Side::West.to_string(), "west");
    }
}
