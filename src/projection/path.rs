//! Projection of GeoJSON geometry into [`BezPath`]s.
//!
//! Lines are resampled adaptively on the sphere so that long edges follow the
//! projected great circle. Geometry crossing the seam (the short arc of the
//! local equator joining the antipodes of the two foci) is cut there; polygon
//! pieces are closed again along the map outline.

use geo::{Coord, LineString, Polygon};
use kurbo::{Circle, Ellipse, Shape};

use crate::foundation::core::{BezPath, Coordinate, Point, Rect};
use crate::foundation::math::Vec3;
use crate::projection::builder::{Projection, SEAM_EPSILON_DEGREES};
use crate::projection::raw::FocalFrame;
use crate::spatial::geojson::{Feature, Geometry, LayerData};

const MAX_RESAMPLE_DEPTH: u32 = 16;
const NUDGE: f64 = 1e-9;
const OUTLINE_STEP: f64 = std::f64::consts::PI / 180.0;

impl Projection {
    /// Project a whole layer into a single path. Point geometries are skipped;
    /// use [`Projection::point_path`] for those.
    pub fn layer_path(&self, data: &LayerData) -> BezPath {
        let mut path = BezPath::new();
        match data {
            LayerData::Sphere => self.append_sphere(&mut path),
            LayerData::Feature(f) => self.append_feature(&mut path, f),
            LayerData::FeatureCollection(features) => {
                for f in features {
                    self.append_feature(&mut path, f);
                }
            }
        }
        path
    }

    /// Circles of `radius` (output units) around every projected point of the layer.
    pub fn point_path(&self, data: &LayerData, radius: f64) -> BezPath {
        let mut path = BezPath::new();
        let mut push = |c: Coordinate| {
            if let Some(p) = self.project(c) {
                if self.extent_contains(p) {
                    path.extend(Circle::new(p, radius).path_elements(self.precision()));
                }
            }
        };
        let mut visit = |g: &Geometry| visit_points(g, &mut push);
        match data {
            LayerData::Sphere => {}
            LayerData::Feature(f) => {
                if let Some(g) = &f.geometry {
                    visit(g);
                }
            }
            LayerData::FeatureCollection(features) => {
                for g in features.iter().filter_map(|f| f.geometry.as_ref()) {
                    visit(g);
                }
            }
        }
        path
    }

    /// Path of a single geometry.
    pub fn geometry_path(&self, geometry: &Geometry) -> BezPath {
        let mut path = BezPath::new();
        self.append_geometry(&mut path, geometry);
        path
    }

    fn append_feature(&self, path: &mut BezPath, feature: &Feature) {
        if let Some(g) = &feature.geometry {
            self.append_geometry(path, g);
        }
    }

    fn append_sphere(&self, path: &mut BezPath) {
        let (a, b) = self.frame.outline_radii();
        let outline = Ellipse::new(Point::ORIGIN, (a, b), 0.0);
        let affine = self.affine();
        // Tolerance is in raw units, so divide the output precision by the scale.
        let tolerance = (self.precision() / self.scale().abs().max(f64::EPSILON)).max(1e-9);
        path.extend(outline.path_elements(tolerance).map(|el| affine * el));
    }

    fn append_geometry(&self, path: &mut BezPath, geometry: &Geometry) {
        match geometry {
            Geometry::Point(_) | Geometry::MultiPoint(_) => {}
            Geometry::Line(l) => self.append_line(path, &[l.start, l.end]),
            Geometry::LineString(ls) => self.append_line(path, &ls.0),
            Geometry::MultiLineString(mls) => {
                for line in mls {
                    self.append_line(path, &line.0);
                }
            }
            Geometry::Polygon(p) => self.append_polygon(path, p),
            Geometry::Rect(r) => self.append_polygon(path, &r.to_polygon()),
            Geometry::Triangle(t) => self.append_polygon(path, &t.to_polygon()),
            Geometry::MultiPolygon(mp) => {
                for p in mp {
                    self.append_polygon(path, p);
                }
            }
            Geometry::GeometryCollection(gc) => {
                for g in gc {
                    self.append_geometry(path, g);
                }
            }
        }
    }

    fn append_polygon(&self, path: &mut BezPath, polygon: &Polygon<f64>) {
        for ring in std::iter::once(polygon.exterior()).chain(polygon.interiors()) {
            self.append_ring(path, ring);
        }
    }

    fn local_points(&self, coords: &[Coord<f64>]) -> Vec<Vec3> {
        coords
            .iter()
            .map(|&c| Coordinate::from(c))
            .filter(|c| c.is_finite())
            .map(|c| self.frame.to_local(Vec3::from_coordinate(c)))
            .collect()
    }

    fn append_line(&self, path: &mut BezPath, coords: &[Coord<f64>]) {
        let pts = self.local_points(coords);
        for part in self.cut_at_seam(&pts, false) {
            self.emit(path, &part.points, false);
        }
    }

    fn append_ring(&self, path: &mut BezPath, ring: &LineString<f64>) {
        let mut pts = self.local_points(&ring.0);
        if pts.len() > 1 && pts.first() == pts.last() {
            pts.pop();
        }
        if pts.len() < 3 {
            return;
        }

        let pieces = self.cut_at_seam(&pts, true);
        if pieces.len() == 1 && pieces[0].entry.is_none() {
            self.emit(path, &pieces[0].points, true);
            return;
        }

        for piece in pieces {
            let mut points = piece.points;
            if let (Some(entry), Some(exit)) = (piece.entry, piece.exit) {
                points.extend(self.outline_walk(exit, entry));
            }
            self.emit(path, &points, true);
        }
    }

    /// Split a sequence of local points wherever a segment crosses the seam.
    ///
    /// For closed rings the last point connects back to the first, and the
    /// returned pieces start and end on the seam.
    fn cut_at_seam(&self, pts: &[Vec3], closed: bool) -> Vec<Piece> {
        let seam_start = std::f64::consts::PI - self.frame.separation() / 2.0
            - SEAM_EPSILON_DEGREES.to_radians();

        let n = pts.len();
        let segments = if closed { n } else { n.saturating_sub(1) };
        let mut crossings: Vec<(usize, SeamCrossing)> = Vec::new();
        for i in 0..segments {
            let (p, q) = (pts[i], pts[(i + 1) % n]);
            if let Some(c) = seam_crossing(p, q, seam_start) {
                crossings.push((i, c));
            }
        }

        if crossings.is_empty() {
            return vec![Piece {
                points: pts.to_vec(),
                entry: None,
                exit: None,
            }];
        }

        if !closed {
            let mut pieces = Vec::with_capacity(crossings.len() + 1);
            let mut current = Vec::new();
            let mut next = 0;
            for (i, &p) in pts.iter().enumerate() {
                current.push(p);
                while next < crossings.len() && crossings[next].0 == i {
                    let c = crossings[next].1;
                    current.push(c.before);
                    pieces.push(Piece {
                        points: std::mem::take(&mut current),
                        entry: None,
                        exit: None,
                    });
                    current.push(c.after);
                    next += 1;
                }
            }
            pieces.push(Piece {
                points: current,
                entry: None,
                exit: None,
            });
            pieces.retain(|p| p.points.len() >= 2);
            return pieces;
        }

        // Walk the ring from the first crossing so every piece is bounded by two crossings.
        let mut pieces = Vec::with_capacity(crossings.len());
        for (k, &(start, entry)) in crossings.iter().enumerate() {
            let (end, exit) = crossings[(k + 1) % crossings.len()];
            let mut points = vec![entry.after];
            let mut i = (start + 1) % n;
            loop {
                points.push(pts[i]);
                if i == end {
                    break;
                }
                i = (i + 1) % n;
            }
            points.push(exit.before);
            pieces.push(Piece {
                points,
                entry: Some(entry.after_side()),
                exit: Some(exit.before_side()),
            });
        }
        pieces
    }

    /// Outline points from `from` back to `to` along the seam, passing around
    /// the nearer seam end when the two sides differ.
    fn outline_walk(&self, from: SeamPoint, to: SeamPoint) -> Vec<Vec3> {
        let h = self.frame.separation() / 2.0 + SEAM_EPSILON_DEGREES.to_radians();
        let (lo, hi) = (std::f64::consts::PI - h, std::f64::consts::PI + h);

        let mut out = Vec::new();
        if from.north == to.north {
            walk_seam(&mut out, from.u, to.u, from.north);
        } else {
            let end = if (from.u - lo).abs() + (to.u - lo).abs() <= (from.u - hi).abs() + (to.u - hi).abs() {
                lo
            } else {
                hi
            };
            walk_seam(&mut out, from.u, end, from.north);
            walk_seam(&mut out, end, to.u, to.north);
        }
        out
    }

    fn emit(&self, path: &mut BezPath, pts: &[Vec3], closed: bool) {
        let Some((&first, rest)) = pts.split_first() else {
            return;
        };
        let mut sub = BezPath::new();
        let mut prev = first;
        let mut prev_p = self.project_local(first);
        sub.move_to(prev_p);
        for &cur in rest {
            let cur_p = self.project_local(cur);
            self.resample(&mut sub, prev, prev_p, cur, cur_p, MAX_RESAMPLE_DEPTH);
            sub.line_to(cur_p);
            prev = cur;
            prev_p = cur_p;
        }
        if closed {
            self.resample(&mut sub, prev, prev_p, first, self.project_local(first), MAX_RESAMPLE_DEPTH);
            sub.close_path();
        }

        if let Some(extent) = self.clip_extent() {
            if !touches(sub.bounding_box(), extent) {
                return;
            }
        }
        path.extend(sub.elements().iter().copied());
    }

    /// d3-style adaptive subdivision between two projected points.
    fn resample(&self, path: &mut BezPath, a: Vec3, pa: Point, b: Vec3, pb: Point, depth: u32) {
        let d = pb - pa;
        let d2 = d.hypot2();
        let delta2 = self.precision() * self.precision();
        if depth == 0 || d2 <= 4.0 * delta2 {
            return;
        }
        let Some(mid) = a.add(b).normalized() else {
            return;
        };
        let pm = self.project_local(mid);
        if !(pm.x.is_finite() && pm.y.is_finite()) {
            return;
        }
        let dm = pm - pa;
        let cross = d.y * dm.x - d.x * dm.y;
        let along = (d.x * dm.x + d.y * dm.y) / d2;
        if cross * cross / d2 > delta2
            || (along - 0.5).abs() > 0.3
            || a.dot(b) < COS_MIN_DISTANCE
        {
            self.resample(path, a, pa, mid, pm, depth - 1);
            path.line_to(pm);
            self.resample(path, mid, pm, b, pb, depth - 1);
        }
    }

    fn extent_contains(&self, p: Point) -> bool {
        self.clip_extent().is_none_or(|e| e.contains(p))
    }
}

/// cos(30°): segments longer than this on the sphere are always subdivided.
const COS_MIN_DISTANCE: f64 = 0.866_025_403_784_438_6;

fn touches(a: Rect, b: Rect) -> bool {
    a.x0 <= b.x1 && a.x1 >= b.x0 && a.y0 <= b.y1 && a.y1 >= b.y0
}

struct Piece {
    points: Vec<Vec3>,
    entry: Option<SeamPoint>,
    exit: Option<SeamPoint>,
}

/// Position on the seam: `u` is the local longitude in `[0, 2π)` and `north`
/// the side of the local equator.
#[derive(Clone, Copy, Debug)]
struct SeamPoint {
    u: f64,
    north: bool,
}

#[derive(Clone, Copy, Debug)]
struct SeamCrossing {
    before: Vec3,
    after: Vec3,
    u: f64,
    before_north: bool,
}

impl SeamCrossing {
    fn before_side(self) -> SeamPoint {
        SeamPoint {
            u: self.u,
            north: self.before_north,
        }
    }

    fn after_side(self) -> SeamPoint {
        SeamPoint {
            u: self.u,
            north: !self.before_north,
        }
    }
}

fn seam_crossing(p: Vec3, q: Vec3, seam_start: f64) -> Option<SeamCrossing> {
    let p_north = p.z >= 0.0;
    let q_north = q.z >= 0.0;
    if p_north == q_north {
        return None;
    }
    let hit = q.scale(p.z.abs()).add(p.scale(q.z.abs())).normalized()?;
    let lambda = hit.y.atan2(hit.x);
    if lambda.abs() <= seam_start {
        return None;
    }
    let u = lambda.rem_euclid(std::f64::consts::TAU);
    let side = |north: bool| {
        let phi = if north { NUDGE } else { -NUDGE };
        FocalFrame::local_from_angles(lambda, phi)
    };
    Some(SeamCrossing {
        before: side(p_north),
        after: side(q_north),
        u,
        before_north: p_north,
    })
}

fn walk_seam(out: &mut Vec<Vec3>, from: f64, to: f64, north: bool) {
    let phi = if north { NUDGE } else { -NUDGE };
    let span = to - from;
    let steps = (span.abs() / OUTLINE_STEP).ceil().max(1.0) as usize;
    for i in 1..=steps {
        let u = from + span * i as f64 / steps as f64;
        out.push(FocalFrame::local_from_angles(u, phi));
    }
}

fn visit_points(g: &Geometry, f: &mut impl FnMut(Coordinate)) {
    match g {
        Geometry::Point(p) => f((*p).into()),
        Geometry::MultiPoint(mp) => mp.iter().for_each(|&p| f(p.into())),
        Geometry::GeometryCollection(gc) => {
            for g in gc {
                visit_points(g, f);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
#[path = "../../tests/unit/projection/path.rs"]
mod tests;
