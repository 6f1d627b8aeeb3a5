use catalog::Provider;

/// Linear RGBA color, components in `[0, 1]`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0, 1.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0, 1.0);
    pub const RED: Self = Self::new(1.0, 0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque color from `0xRRGGBB`.
    pub const fn from_hex(rgb: u32) -> Self {
        Self::new(
            ((rgb >> 16) & 0xff) as f32 / 255.0,
            ((rgb >> 8) & 0xff) as f32 / 255.0,
            (rgb & 0xff) as f32 / 255.0,
            1.0,
        )
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self::new(self.r, self.g, self.b, a)
    }

    /// Component-wise interpolation, alpha included.
    pub fn lerp(self, other: Self, t: f32) -> Self {
        Self::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// `#rrggbb`, alpha dropped.
    pub fn to_hex(self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("#{:02x}{:02x}{:02x}", c(self.r), c(self.g), c(self.b))
    }
}

/// Server-to-server latency band.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LatencyBand {
    Low,
    Medium,
    High,
}

impl LatencyBand {
    pub const LOW_MAX_MS: f64 = 50.0;
    pub const MEDIUM_MAX_MS: f64 = 100.0;

    /// `< 50` low, `< 100` medium, everything else high.
    pub fn classify(latency_ms: f64) -> Self {
        if latency_ms < Self::LOW_MAX_MS {
            LatencyBand::Low
        } else if latency_ms < Self::MEDIUM_MAX_MS {
            LatencyBand::Medium
        } else {
            LatencyBand::High
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LatencyBand::Low => "low",
            LatencyBand::Medium => "medium",
            LatencyBand::High => "high",
        }
    }
}

const LINK_LOW: Rgba = Rgba::from_hex(0x10b981);
const LINK_MEDIUM: Rgba = Rgba::from_hex(0xf59e0b);
const LINK_HIGH: Rgba = Rgba::from_hex(0xef4444);
const DIMMED_ALPHA: f32 = 0.6;

/// Link color by band; full strength only when highlighted.
pub fn connection_color(band: LatencyBand, highlighted: bool) -> Rgba {
    let base = match band {
        LatencyBand::Low => LINK_LOW,
        LatencyBand::Medium => LINK_MEDIUM,
        LatencyBand::High => LINK_HIGH,
    };
    if highlighted {
        base
    } else {
        base.with_alpha(DIMMED_ALPHA)
    }
}

/// Region outline and region link color.
pub fn provider_color(provider: Provider) -> Rgba {
    match provider {
        Provider::Aws => Rgba::from_hex(0xFF9900),
        Provider::Gcp => Rgba::from_hex(0x4285F4),
        Provider::Azure => Rgba::from_hex(0x0089D6),
    }
}

/// Server marker color (CSS orange / lightblue / lightgreen).
pub fn marker_color(provider: Provider) -> Rgba {
    match provider {
        Provider::Aws => Rgba::from_hex(0xFFA500),
        Provider::Gcp => Rgba::from_hex(0xADD8E6),
        Provider::Azure => Rgba::from_hex(0x90EE90),
    }
}

/// Five-step palette used by the server list latency badge.
pub fn latency_badge_color(latency_ms: f64) -> Rgba {
    if latency_ms < 50.0 {
        Rgba::from_hex(0x10B981)
    } else if latency_ms < 100.0 {
        Rgba::from_hex(0x3B82F6)
    } else if latency_ms < 200.0 {
        Rgba::from_hex(0xF59E0B)
    } else if latency_ms < 300.0 {
        Rgba::from_hex(0xF97316)
    } else {
        Rgba::from_hex(0xEF4444)
    }
}

/// Wide translucent pass drawn under a highlighted link.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct GlowPass {
    pub line_width: f32,
    pub opacity: f32,
}

/// Dashed, animated line appearance.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LinkStyle {
    pub dash_size: f32,
    pub dash_gap: f32,
    /// Dash offset advance per second.
    pub speed: f32,
    pub line_width: f32,
    pub opacity: f32,
    pub render_order: i32,
    pub depth_test: bool,
    pub glow: Option<GlowPass>,
}

impl LinkStyle {
    const GLOW_WIDTH_FACTOR: f32 = 3.0;
    const GLOW_OPACITY: f32 = 0.2;

    const fn plain(
        dash_size: f32,
        dash_gap: f32,
        speed: f32,
        line_width: f32,
        opacity: f32,
    ) -> Self {
        Self {
            dash_size,
            dash_gap,
            speed,
            line_width,
            opacity,
            render_order: 0,
            depth_test: true,
            glow: None,
        }
    }

    fn highlighted() -> Self {
        let line_width = 2.0;
        Self {
            render_order: 1,
            depth_test: false,
            glow: Some(GlowPass {
                line_width: line_width * Self::GLOW_WIDTH_FACTOR,
                opacity: Self::GLOW_OPACITY,
            }),
            ..Self::plain(0.15, 0.03, 0.8, line_width, 0.9)
        }
    }

    /// Server-to-server link. Low-latency links get the more prominent
    /// non-highlighted style.
    pub fn for_link(band: LatencyBand, highlighted: bool) -> Self {
        if highlighted {
            return Self::highlighted();
        }
        match band {
            LatencyBand::Low => Self::plain(0.12, 0.04, 0.7, 1.5, 0.7),
            LatencyBand::Medium | LatencyBand::High => Self::plain(0.1, 0.05, 0.5, 1.0, 0.5),
        }
    }

    /// Server-to-region link, always emphasized.
    pub fn for_region_link(highlighted: bool) -> Self {
        if highlighted {
            return Self::highlighted();
        }
        Self {
            render_order: 1,
            ..Self::plain(0.12, 0.04, 0.7, 1.5, 0.8)
        }
    }

    /// Dash pattern period.
    pub fn dash_scale(&self) -> f32 {
        self.dash_size + self.dash_gap
    }

    /// Dash offset at `time_s`; negative so dashes travel from start to end.
    pub fn dash_offset(&self, time_s: f64) -> f32 {
        -(time_s * self.speed as f64) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::{LatencyBand, LinkStyle, Rgba, connection_color, latency_badge_color};

    fn assert_close(a: f32, b: f32, eps: f32) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(LatencyBand::classify(0.0), LatencyBand::Low);
        assert_eq!(LatencyBand::classify(49.0), LatencyBand::Low);
        assert_eq!(LatencyBand::classify(49.999), LatencyBand::Low);
        assert_eq!(LatencyBand::classify(50.0), LatencyBand::Medium);
        assert_eq!(LatencyBand::classify(99.0), LatencyBand::Medium);
        assert_eq!(LatencyBand::classify(100.0), LatencyBand::High);
        assert_eq!(LatencyBand::classify(2500.0), LatencyBand::High);
    }

    #[test]
    fn hex_round_trip() {
        let c = Rgba::from_hex(0x10b981);
        assert_eq!(c.to_hex(), "#10b981");
        assert_eq!(c.a, 1.0);
        assert_eq!(Rgba::WHITE.to_hex(), "#ffffff");
    }

    #[test]
    fn dimmed_links_keep_hue() {
        let bright = connection_color(LatencyBand::Medium, true);
        let dim = connection_color(LatencyBand::Medium, false);
        assert_eq!(bright.to_hex(), "#f59e0b");
        assert_eq!(dim.to_hex(), bright.to_hex());
        assert_close(dim.a, 0.6, 1e-6);
    }

    #[test]
    fn lerp_green_to_red() {
        let mid = Rgba::GREEN.lerp(Rgba::RED, 0.5);
        assert_close(mid.r, 0.5, 1e-6);
        assert_close(mid.g, 0.5, 1e-6);
        assert_eq!(mid.b, 0.0);
    }

    #[test]
    fn highlighted_style_has_glow() {
        let s = LinkStyle::for_link(LatencyBand::High, true);
        let glow = s.glow.expect("glow");
        assert_eq!(s.line_width, 2.0);
        assert_eq!(glow.line_width, 6.0);
        assert_close(glow.opacity, 0.2, 1e-6);
        assert!(!s.depth_test);
        assert_eq!(s.render_order, 1);

        let plain = LinkStyle::for_link(LatencyBand::High, false);
        assert!(plain.glow.is_none());
        assert_eq!(plain.line_width, 1.0);
        assert_close(plain.dash_scale(), 0.15, 1e-6);

        let low = LinkStyle::for_link(LatencyBand::Low, false);
        assert_eq!(low.line_width, 1.5);
        assert_close(low.opacity, 0.7, 1e-6);
    }

    #[test]
    fn dash_offset_moves_backwards() {
        let s = LinkStyle::for_link(LatencyBand::Medium, false);
        assert_eq!(s.dash_offset(0.0), 0.0);
        assert_close(s.dash_offset(2.0), -1.0, 1e-6);
    }

    #[test]
    fn badge_palette_steps() {
        assert_eq!(latency_badge_color(10.0).to_hex(), "#10b981");
        assert_eq!(latency_badge_color(50.0).to_hex(), "#3b82f6");
        assert_eq!(latency_badge_color(150.0).to_hex(), "#f59e0b");
        assert_eq!(latency_badge_color(299.0).to_hex(), "#f97316");
        assert_eq!(latency_badge_color(300.0).to_hex(), "#ef4444");
    }
}
