use super::Vec3;

/// Midpoint lift for ordinary server-to-server links.
pub const LINK_ELEVATION: f64 = 0.2;
/// Midpoint lift for emphasized server-to-region links.
pub const REGION_LINK_ELEVATION: f64 = 0.5;

/// Three-point line strip approximating a great-circle hop.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Arc {
    pub points: [Vec3; 3],
}

impl Arc {
    pub fn start(&self) -> Vec3 {
        self.points[0]
    }

    pub fn mid(&self) -> Vec3 {
        self.points[1]
    }

    pub fn end(&self) -> Vec3 {
        self.points[2]
    }
}

/// Builds `[start, mid, end]` with `mid` pushed outward by `elevation`.
///
/// The midpoint is the chord midpoint displaced along its own direction from
/// the origin. When the chord passes through the origin the midpoint has no
/// direction and stays where it is.
pub fn build_arc(start: Vec3, end: Vec3, elevation: f64) -> Arc {
    let mid = start.lerp(end, 0.5);
    let normal = mid.normalize();
    Arc {
        points: [start, mid + normal.scale(elevation), end],
    }
}
