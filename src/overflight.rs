//! Planar point-in-polygon tests against monitored airspace.
//!
//! Latitude and longitude are treated as flat y/x coordinates. Accuracy suffers near the poles and
//! across the antimeridian.

use itertools::Itertools;

use crate::boundary::Boundary;
use crate::geo::LatLon;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl Bounds {
    fn of(vertices: &[LatLon]) -> Option<Bounds> {
        let (min_lat, max_lat) = vertices.iter().map(|v| v.lat()).minmax().into_option()?;
        let (min_lon, max_lon) = vertices.iter().map(|v| v.lon()).minmax().into_option()?;
        Some(Bounds {
            min_lat,
            max_lat,
            min_lon,
            max_lon,
        })
    }

    pub fn contains(&self, point: LatLon) -> bool {
        (self.min_lat..=self.max_lat).contains(&point.lat())
            && (self.min_lon..=self.max_lon).contains(&point.lon())
    }
}

/// A closed ring of vertices. The last vertex connects back to the first.
#[derive(Clone, Debug)]
pub struct Ring {
    vertices: Vec<LatLon>,
    bounds: Option<Bounds>,
}

impl Ring {
    pub fn new(vertices: Vec<LatLon>) -> Ring {
        let bounds = Bounds::of(&vertices);
        Ring { vertices, bounds }
    }

    pub fn vertices(&self) -> &[LatLon] {
        &self.vertices
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Even-odd test with a probe running due west past the ring's westernmost vertex. Points on
    /// an edge are inside.
    pub fn contains(&self, point: LatLon) -> bool {
        if self.vertices.len() < 3 {
            return false;
        }

        let bounds = match self.bounds {
            Some(bounds) if bounds.contains(point) => bounds,
            _ => return false,
        };

        let edges = || self.vertices.iter().copied().circular_tuple_windows::<(_, _)>();
        if edges().any(|(a, b)| on_segment(point, a, b)) {
            return true;
        }

        // Half-open in latitude: a vertex on the probe line belongs to the edge leaving it northward.
        let north = |v: LatLon| v.lat() > point.lat();
        let probe_end = LatLon::new(point.lat(), bounds.min_lon - 1.0);
        let crossings = edges()
            .filter(|&(a, b)| north(a) != north(b))
            .filter(|&(a, b)| segments_intersect(point, probe_end, a, b))
            .count();

        crossings % 2 == 1
    }
}

/// Where `p` falls relative to the line through `a` and `b`: positive on one side, negative on the
/// other, zero on the line.
fn side(a: LatLon, b: LatLon, p: LatLon) -> f64 {
    (b.lon() - a.lon()) * (p.lat() - a.lat()) - (b.lat() - a.lat()) * (p.lon() - a.lon())
}

fn on_segment(p: LatLon, a: LatLon, b: LatLon) -> bool {
    side(a, b, p) == 0.0
        && p.lat() >= a.lat().min(b.lat())
        && p.lat() <= a.lat().max(b.lat())
        && p.lon() >= a.lon().min(b.lon())
        && p.lon() <= a.lon().max(b.lon())
}

/// Touching and collinear segments count as intersecting.
fn segments_intersect(p1: LatLon, p2: LatLon, q1: LatLon, q2: LatLon) -> bool {
    fn apart(d1: f64, d2: f64) -> bool {
        (d1 > 0.0 && d2 > 0.0) || (d1 < 0.0 && d2 < 0.0)
    }

    !apart(side(p1, p2, q1), side(p1, p2, q2)) && !apart(side(q1, q2, p1), side(q1, q2, p2))
}

/// True when `point` lies inside any ring of any boundary.
pub fn is_overflight(point: LatLon, boundaries: &[Boundary]) -> bool {
    boundaries.iter().any(|b| b.contains(point))
}
