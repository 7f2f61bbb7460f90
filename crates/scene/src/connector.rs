use foundation::Rgb;
use foundation::math::Vec3;

/// Number of segments along a connector; the curve carries one more point.
pub const CONNECTOR_SEGMENTS: usize = 100;

/// How far the control point is lifted above the surface, as a fraction of
/// the chord length.
pub const CONNECTOR_LIFT: f64 = 0.4;

pub const CONNECTOR_CENTER_COLOR: u32 = 0xffffff;
pub const CONNECTOR_END_COLOR: u32 = 0x330066;

/// Quadratic Bézier arc between a parent node and its child, sampled once.
#[derive(Debug, Clone, PartialEq)]
pub struct Connector {
    control: Vec3,
    points: Vec<Vec3>,
    colors: Vec<Rgb>,
}

impl Connector {
    pub fn between(from: Vec3, to: Vec3, globe_radius: f64) -> Self {
        let chord = from.distance(to);
        let lift = globe_radius + chord * CONNECTOR_LIFT;
        let control = ((from + to) * 0.5).normalize_or_zero() * lift;

        let count = CONNECTOR_SEGMENTS + 1;
        let points = (0..count)
            .map(|i| quadratic_bezier(from, control, to, i as f64 / CONNECTOR_SEGMENTS as f64))
            .collect();

        let center = Rgb::from_hex(CONNECTOR_CENTER_COLOR);
        let end = Rgb::from_hex(CONNECTOR_END_COLOR);
        let colors = (0..count)
            .map(|i| {
                let edge = ((i as f64 / count as f64 - 0.5).abs() * 2.0).powf(1.5);
                center.lerp(end, edge as f32)
            })
            .collect();

        Self {
            control,
            points,
            colors,
        }
    }

    pub fn control_point(&self) -> Vec3 {
        self.control
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }
}

fn quadratic_bezier(p0: Vec3, p1: Vec3, p2: Vec3, t: f64) -> Vec3 {
    let u = 1.0 - t;
    p0 * (u * u) + p1 * (2.0 * u * t) + p2 * (t * t)
}

#[cfg(test)]
mod tests {
    use super::*;
    use foundation::math::spherical::to_cartesian;

    #[test]
    fn endpoints_match_nodes() {
        let a = to_cartesian(60.0, 0.0, 15.0);
        let b = to_cartesian(0.0, 0.0, 15.0);
        let c = Connector::between(a, b, 15.0);

        assert_eq!(c.points().len(), CONNECTOR_SEGMENTS + 1);
        assert!((c.points()[0] - a).length() < 1e-12);
        assert!((c.points()[CONNECTOR_SEGMENTS] - b).length() < 1e-12);
    }

    #[test]
    fn control_point_is_lifted_above_surface() {
        let a = to_cartesian(0.0, -20.0, 15.0);
        let b = to_cartesian(0.0, 20.0, 15.0);
        let c = Connector::between(a, b, 15.0);

        let expected = 15.0 + a.distance(b) * CONNECTOR_LIFT;
        assert!((c.control_point().length() - expected).abs() < 1e-9);
        // Arc midpoint bulges outwards.
        assert!(c.points()[CONNECTOR_SEGMENTS / 2].length() > 15.0);
    }

    #[test]
    fn colors_fade_towards_the_ends() {
        let c = Connector::between(
            Vec3::new(0.0, 0.0, 15.0),
            Vec3::new(15.0, 0.0, 0.0),
            15.0,
        );
        let colors = c.colors();
        assert_eq!(colors.len(), CONNECTOR_SEGMENTS + 1);

        let mid = colors[50];
        let first = colors[0];
        assert!(mid.r > 0.99 && mid.g > 0.99);
        // i = 0 sits at the full end color.
        let end = Rgb::from_hex(CONNECTOR_END_COLOR);
        assert!((first.r - end.r).abs() < 1e-6 && (first.b - end.b).abs() < 1e-6);
        assert!(colors[10].g > first.g && colors[10].g < mid.g);
    }
}
