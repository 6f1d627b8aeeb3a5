use crate::math::LatLon;

/// Axis-aligned latitude/longitude extent, in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeoBounds {
    pub min: LatLon,
    pub max: LatLon,
}

impl GeoBounds {
    pub fn new(min: LatLon, max: LatLon) -> Self {
        GeoBounds { min, max }
    }

    /// Smallest extent containing every point. `None` for an empty input.
    pub fn from_points(points: impl IntoIterator<Item = LatLon>) -> Option<Self> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let mut out = GeoBounds::new(first, first);
        for p in iter {
            out.min.lat_deg = out.min.lat_deg.min(p.lat_deg);
            out.min.lon_deg = out.min.lon_deg.min(p.lon_deg);
            out.max.lat_deg = out.max.lat_deg.max(p.lat_deg);
            out.max.lon_deg = out.max.lon_deg.max(p.lon_deg);
        }
        Some(out)
    }

    pub fn center(&self) -> LatLon {
        LatLon::new(
            (self.min.lat_deg + self.max.lat_deg) / 2.0,
            (self.min.lon_deg + self.max.lon_deg) / 2.0,
        )
    }

    pub fn height_deg(&self) -> f64 {
        (self.max.lat_deg - self.min.lat_deg).abs()
    }

    pub fn width_deg(&self) -> f64 {
        (self.max.lon_deg - self.min.lon_deg).abs()
    }

    /// Corners rebuilt around the center, clockwise from north-west, closed.
    pub fn closed_ring(&self) -> [LatLon; 5] {
        let c = self.center();
        let half_h = self.height_deg() / 2.0;
        let half_w = self.width_deg() / 2.0;
        let nw = LatLon::new(c.lat_deg + half_h, c.lon_deg - half_w);
        [
            nw,
            LatLon::new(c.lat_deg + half_h, c.lon_deg + half_w),
            LatLon::new(c.lat_deg - half_h, c.lon_deg + half_w),
            LatLon::new(c.lat_deg - half_h, c.lon_deg - half_w),
            nw,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::GeoBounds;
    use crate::math::LatLon;

    #[test]
    fn extent_from_unordered_corners() {
        let b = GeoBounds::from_points([
            LatLon::new(40.0, -80.0),
            LatLon::new(36.0, -80.0),
            LatLon::new(36.0, -74.0),
            LatLon::new(40.0, -74.0),
        ])
        .expect("bounds");

        assert_eq!(b.min, LatLon::new(36.0, -80.0));
        assert_eq!(b.max, LatLon::new(40.0, -74.0));
        assert_eq!(b.center(), LatLon::new(38.0, -77.0));
        assert_eq!(b.height_deg(), 4.0);
        assert_eq!(b.width_deg(), 6.0);
    }

    #[test]
    fn closed_ring_starts_and_ends_at_north_west() {
        let b = GeoBounds::new(LatLon::new(0.0, 0.0), LatLon::new(10.0, 20.0));
        let ring = b.closed_ring();
        assert_eq!(ring[0], LatLon::new(10.0, 0.0));
        assert_eq!(ring[2], LatLon::new(0.0, 20.0));
        assert_eq!(ring[0], ring[4]);
    }

    #[test]
    fn empty_input_has_no_bounds() {
        assert!(GeoBounds::from_points(Vec::new()).is_none());
    }
}
