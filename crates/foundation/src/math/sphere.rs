use super::Vec3;

/// Radius of the rendered globe surface.
pub const GLOBE_RADIUS: f64 = 1.0;
/// Lift used for connection arcs, heatmap points and region outlines.
pub const OVERLAY_RADIUS: f64 = 1.01;
/// Lift used for server markers and region labels.
pub const MARKER_RADIUS: f64 = 1.02;

/// Geographic coordinates in degrees. No range validation is applied.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat_deg: f64,
    pub lon_deg: f64,
}

impl LatLon {
    pub fn new(lat_deg: f64, lon_deg: f64) -> Self {
        Self { lat_deg, lon_deg }
    }

    pub fn is_finite(&self) -> bool {
        self.lat_deg.is_finite() && self.lon_deg.is_finite()
    }

    pub fn to_vec3(self, radius: f64) -> Vec3 {
        lat_lon_to_vec3(self.lat_deg, self.lon_deg, radius)
    }
}

/// Projects latitude/longitude onto a sphere of `radius`, Y up.
///
/// Longitude is offset by 180 degrees so the seam lines up with an
/// equirectangular globe texture: `(0, 0)` lands on `-X`, `(0, 90)` on `-Z`.
pub fn lat_lon_to_vec3(lat_deg: f64, lon_deg: f64, radius: f64) -> Vec3 {
    let phi = (90.0 - lat_deg).to_radians();
    let theta = (lon_deg + 180.0).to_radians();

    let x = -radius * phi.sin() * theta.cos();
    let y = radius * phi.cos();
    let z = radius * phi.sin() * theta.sin();

    Vec3::new(x, y, z)
}

#[cfg(test)]
mod tests {
    use super::{LatLon, lat_lon_to_vec3};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn equator_prime_meridian() {
        let p = lat_lon_to_vec3(0.0, 0.0, 1.0);
        assert_close(p.x, 1.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, 0.0, 1e-12);
    }

    #[test]
    fn equator_90e() {
        let p = lat_lon_to_vec3(0.0, 90.0, 1.0);
        assert_close(p.x, 0.0, 1e-12);
        assert_close(p.y, 0.0, 1e-12);
        assert_close(p.z, -1.0, 1e-12);
    }

    #[test]
    fn north_pole_ignores_longitude() {
        for lon in [-180.0, -45.0, 0.0, 77.7, 180.0] {
            let p = lat_lon_to_vec3(90.0, lon, 2.5);
            assert_close(p.x, 0.0, 1e-12);
            assert_close(p.y, 2.5, 1e-12);
            assert_close(p.z, 0.0, 1e-12);
        }
    }

    #[test]
    fn radius_scales_length() {
        let p = LatLon::new(37.5, -122.3).to_vec3(1.01);
        assert_close(p.length(), 1.01, 1e-12);
    }

    #[test]
    fn out_of_range_input_does_not_panic() {
        let p = lat_lon_to_vec3(400.0, -900.0, 1.0);
        assert!(p.length().is_finite());
        assert!(!LatLon::new(f64::NAN, 0.0).is_finite());
    }
}
