use std::f64::consts::TAU;

use crate::error::Result;
use crate::geometry::curve::{Arc, Curve, CurveDomain, InterpolatedCurve, Line, Pcurve};
use crate::math::{Point3, Vector3};

use super::face::FaceId;
use super::vertex::VertexId;

slotmap::new_key_type! {
    /// Unique identifier for an edge in the topology store.
    pub struct EdgeId;
}

/// Segments used when sampling an arc.
pub const ARC_SEGMENTS: usize = 32;

/// The geometric curve associated with an edge.
#[derive(Debug, Clone)]
pub enum EdgeCurve {
    /// A line segment.
    Line(Line),
    /// A circular arc.
    Arc(Arc),
    /// A parameter-space segment mapped through its surface.
    Polyline(InterpolatedCurve),
    /// A marched intersection of two surfaces.
    DualSurface(InterpolatedCurve),
}

impl EdgeCurve {
    fn as_curve(&self) -> &dyn Curve {
        match self {
            Self::Line(c) => c,
            Self::Arc(c) => c,
            Self::Polyline(c) | Self::DualSurface(c) => c,
        }
    }

    /// Returns the curve moved by `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        match self {
            Self::Line(c) => Self::Line(c.translated(offset)),
            Self::Arc(c) => Self::Arc(c.translated(offset)),
            Self::Polyline(c) => Self::Polyline(c.translated(offset)),
            Self::DualSurface(c) => Self::DualSurface(c.translated(offset)),
        }
    }
}

impl Curve for EdgeCurve {
    fn evaluate(&self, t: f64) -> Result<Point3> {
        self.as_curve().evaluate(t)
    }

    fn tangent(&self, t: f64) -> Result<Vector3> {
        self.as_curve().tangent(t)
    }

    fn domain(&self) -> CurveDomain {
        self.as_curve().domain()
    }

    fn is_closed(&self) -> bool {
        self.as_curve().is_closed()
    }

    fn project(&self, point: &Point3, near: f64) -> f64 {
        self.as_curve().project(point, near)
    }
}

/// An edge curve together with the parameter range the edge uses.
#[derive(Debug, Clone)]
pub struct TrimmedCurve {
    /// The underlying curve.
    pub curve: EdgeCurve,
    /// Parameter of the start vertex.
    pub t_start: f64,
    /// Parameter of the end vertex.
    pub t_end: f64,
}

impl TrimmedCurve {
    /// Creates a trimmed curve.
    #[must_use]
    pub fn new(curve: EdgeCurve, t_start: f64, t_end: f64) -> Self {
        Self {
            curve,
            t_start,
            t_end,
        }
    }

    /// Uses the curve's whole natural domain.
    #[must_use]
    pub fn whole(curve: EdgeCurve) -> Self {
        let d = curve.domain();
        Self::new(curve, d.t_min, d.t_max)
    }

    /// Straight segment from `a` to `b`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points coincide.
    pub fn segment(a: Point3, b: Point3) -> Result<Self> {
        let len = (b - a).norm();
        Ok(Self::new(EdgeCurve::Line(Line::through(a, b)?), 0.0, len))
    }

    /// Point at curve parameter `t`.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn point_at(&self, t: f64) -> Result<Point3> {
        self.curve.evaluate(t)
    }

    /// Point at the start parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn start_point(&self) -> Result<Point3> {
        self.curve.evaluate(self.t_start)
    }

    /// Point at the end parameter.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn end_point(&self) -> Result<Point3> {
        self.curve.evaluate(self.t_end)
    }

    /// Point at fraction `s` of the parameter range.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn point_at_fraction(&self, s: f64) -> Result<Point3> {
        self.curve.evaluate(self.t_start + (self.t_end - self.t_start) * s)
    }

    /// Unit tangent at the start, pointing along the trimmed direction.
    ///
    /// # Errors
    ///
    /// Returns an error if the tangent is degenerate.
    pub fn start_direction(&self) -> Result<Vector3> {
        let t = self.curve.tangent(self.t_start)?;
        Ok(if self.t_end >= self.t_start { t } else { -t })
    }

    /// Points along the trimmed curve, from start to end.
    ///
    /// Lines give their two end points, arcs [`ARC_SEGMENTS`] uniform
    /// segments, polylines their own interior points.
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    #[allow(clippy::cast_precision_loss)]
    pub fn samples(&self) -> Result<Vec<Point3>> {
        match &self.curve {
            EdgeCurve::Line(_) => Ok(vec![self.start_point()?, self.end_point()?]),
            EdgeCurve::Arc(_) => (0..=ARC_SEGMENTS)
                .map(|i| self.point_at_fraction(i as f64 / ARC_SEGMENTS as f64))
                .collect(),
            EdgeCurve::Polyline(c) | EdgeCurve::DualSurface(c) => {
                let (lo, hi) = if self.t_start <= self.t_end {
                    (self.t_start, self.t_end)
                } else {
                    (self.t_end, self.t_start)
                };
                let mut interior: Vec<Point3> = c
                    .points()
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| {
                        let t = *i as f64;
                        t > lo + 1e-9 && t < hi - 1e-9
                    })
                    .map(|(_, p)| *p)
                    .collect();
                if self.t_start > self.t_end {
                    interior.reverse();
                }
                let mut out = Vec::with_capacity(interior.len() + 2);
                out.push(self.start_point()?);
                out.extend(interior);
                out.push(self.end_point()?);
                Ok(out)
            }
        }
    }

    /// Chord length of [`TrimmedCurve::samples`].
    ///
    /// # Errors
    ///
    /// Returns an error if curve evaluation fails.
    pub fn length(&self) -> Result<f64> {
        let pts = self.samples()?;
        Ok(pts.windows(2).map(|w| (w[1] - w[0]).norm()).sum())
    }

    /// Returns the curve moved by `offset`, with the same parameter range.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        Self::new(self.curve.translated(offset), self.t_start, self.t_end)
    }

    /// The same point set traversed from end to start.
    #[must_use]
    pub fn reversed(&self) -> Self {
        match &self.curve {
            EdgeCurve::Line(c) => {
                Self::new(EdgeCurve::Line(c.reversed()), -self.t_end, -self.t_start)
            }
            EdgeCurve::Arc(c) => {
                Self::new(EdgeCurve::Arc(c.reversed()), -self.t_end, -self.t_start)
            }
            EdgeCurve::Polyline(c) | EdgeCurve::DualSurface(c) => {
                let last = c.domain().t_max;
                let rev = c.reversed();
                let curve = if matches!(self.curve, EdgeCurve::Polyline(_)) {
                    EdgeCurve::Polyline(rev)
                } else {
                    EdgeCurve::DualSurface(rev)
                };
                Self::new(curve, last - self.t_end, last - self.t_start)
            }
        }
    }

    /// Whether the curve is a marched two-surface intersection.
    #[must_use]
    pub fn is_dual_surface(&self) -> bool {
        matches!(self.curve, EdgeCurve::DualSurface(_))
    }

    /// Re-trims the curve so it runs exactly from `start` to `end`.
    ///
    /// Lines and arcs get new parameters from projecting the points, arcs
    /// keeping their sweep direction. Polylines are cut and get the points
    /// as their new end points.
    #[must_use]
    pub fn clamped_to(&self, start: &Point3, end: &Point3) -> Self {
        let t0 = self.curve.project(start, self.t_start);
        let mut t1 = self.curve.project(end, self.t_end);
        match &self.curve {
            EdgeCurve::Line(_) => Self::new(self.curve.clone(), t0, t1),
            EdgeCurve::Arc(_) => {
                if self.t_end >= self.t_start {
                    while t1 <= t0 {
                        t1 += TAU;
                    }
                } else {
                    while t1 >= t0 {
                        t1 -= TAU;
                    }
                }
                Self::new(self.curve.clone(), t0, t1)
            }
            EdgeCurve::Polyline(c) | EdgeCurve::DualSurface(c) => {
                let cut = if t0 <= t1 {
                    c.trimmed(t0, t1, *start, *end)
                } else {
                    let last = c.domain().t_max;
                    c.reversed().trimmed(last - t0, last - t1, *start, *end)
                };
                let curve = if matches!(self.curve, EdgeCurve::Polyline(_)) {
                    EdgeCurve::Polyline(cut)
                } else {
                    EdgeCurve::DualSurface(cut)
                };
                Self::whole(curve)
            }
        }
    }
}

/// Data associated with a topological edge.
///
/// An edge connects two vertices and carries a geometric curve
/// that defines the shape of the edge between them. It bounds one face
/// (open shells) or two.
#[derive(Debug, Clone)]
pub struct EdgeData {
    /// Start vertex of the edge.
    pub start: VertexId,
    /// End vertex of the edge.
    pub end: VertexId,
    /// The trimmed curve running from `start` to `end`.
    pub curve: TrimmedCurve,
    /// The first face using this edge.
    pub primary_face: Option<FaceId>,
    /// The second face using this edge, if any.
    pub secondary_face: Option<FaceId>,
    /// The curve in the primary face's parameter space, in that face's loop direction.
    pub primary_pcurve: Option<Pcurve>,
    /// The curve in the secondary face's parameter space, in that face's loop direction.
    pub secondary_pcurve: Option<Pcurve>,
}

impl EdgeData {
    /// An edge whose face links are filled in later.
    #[must_use]
    pub fn new(start: VertexId, end: VertexId, curve: TrimmedCurve) -> Self {
        Self {
            start,
            end,
            curve,
            primary_face: None,
            secondary_face: None,
            primary_pcurve: None,
            secondary_pcurve: None,
        }
    }

    /// The adjacent faces, primary first.
    pub fn faces(&self) -> impl Iterator<Item = FaceId> + '_ {
        self.primary_face.into_iter().chain(self.secondary_face)
    }

    /// The pcurve stored for `face`.
    #[must_use]
    pub fn pcurve_for(&self, face: FaceId) -> Option<&Pcurve> {
        if self.primary_face == Some(face) {
            self.primary_pcurve.as_ref()
        } else if self.secondary_face == Some(face) {
            self.secondary_pcurve.as_ref()
        } else {
            None
        }
    }

    /// Stores `pcurve` for `face`. Returns `false` if the face is not adjacent.
    pub fn set_pcurve(&mut self, face: FaceId, pcurve: Pcurve) -> bool {
        if self.primary_face == Some(face) {
            self.primary_pcurve = Some(pcurve);
            true
        } else if self.secondary_face == Some(face) {
            self.secondary_pcurve = Some(pcurve);
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn quarter_arc() -> TrimmedCurve {
        let arc =
            Arc::new(Point3::origin(), 1.0, Vector3::z(), Vector3::x(), 0.0, FRAC_PI_2).unwrap();
        TrimmedCurve::new(EdgeCurve::Arc(arc), 0.0, FRAC_PI_2)
    }

    #[test]
    fn segment_endpoints_and_length() {
        let seg = TrimmedCurve::segment(Point3::origin(), Point3::new(0.0, 3.0, 4.0)).unwrap();
        assert!((seg.end_point().unwrap() - Point3::new(0.0, 3.0, 4.0)).norm() < 1e-12);
        assert!((seg.length().unwrap() - 5.0).abs() < 1e-12);
        assert_eq!(seg.samples().unwrap().len(), 2);
        assert!((seg.point_at(2.5).unwrap() - Point3::new(0.0, 1.5, 2.0)).norm() < 1e-12);
    }

    #[test]
    fn reversed_swaps_endpoints() {
        for c in [
            quarter_arc(),
            TrimmedCurve::segment(Point3::origin(), Point3::new(1.0, 2.0, 0.0)).unwrap(),
        ] {
            let r = c.reversed();
            assert!((r.start_point().unwrap() - c.end_point().unwrap()).norm() < 1e-12);
            assert!((r.end_point().unwrap() - c.start_point().unwrap()).norm() < 1e-12);
        }
    }

    #[test]
    fn arc_length_close_to_quarter_circle() {
        let len = quarter_arc().length().unwrap();
        assert!((len - FRAC_PI_2).abs() < 1e-3);
    }

    #[test]
    fn arc_clamp_keeps_sweep_direction() {
        let c = quarter_arc();
        let clamped = c.clamped_to(&Point3::new(0.0, 1.0, 0.0), &Point3::new(-1.0, 0.0, 0.0));
        assert!((clamped.t_start - FRAC_PI_2).abs() < 1e-12);
        assert!((clamped.t_end - PI).abs() < 1e-12);
    }

    #[test]
    fn polyline_clamp_replaces_ends() {
        let poly = InterpolatedCurve::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ])
        .unwrap();
        let c = TrimmedCurve::whole(EdgeCurve::Polyline(poly));
        let clamped = c.clamped_to(&Point3::new(0.1, 0.01, 0.0), &Point3::new(1.9, 0.0, 0.0));
        assert_eq!(clamped.start_point().unwrap(), Point3::new(0.1, 0.01, 0.0));
        assert_eq!(clamped.end_point().unwrap(), Point3::new(1.9, 0.0, 0.0));
        assert_eq!(clamped.samples().unwrap().len(), 3);
    }
}
