/// Background colour for a score cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

pub const LOW: Rgb = Rgb::new(255, 200, 200);
pub const MID: Rgb = Rgb::new(255, 245, 200);
pub const HIGH: Rgb = Rgb::new(200, 255, 200);

/// Neutral background for "no data" cells
pub const NO_DATA: Rgb = Rgb::new(0xf5, 0xf5, 0xf5);

/// Text colour drawn over any gradient cell
pub const TEXT: Rgb = Rgb::new(0x33, 0x33, 0x33);

/// Map a 0..=10 value to light red (0), light yellow (5), light green (10).
/// Out-of-range values are clamped; channels are truncated, not rounded.
pub fn score_color(value: f64) -> Rgb {
    let v = if value.is_nan() { 0.0 } else { value.clamp(0.0, 10.0) };

    if v <= 5.0 {
        let ratio = v / 5.0;
        Rgb::new(LOW.r, lerp(LOW.g, MID.g, ratio), lerp(LOW.b, MID.b, ratio))
    } else {
        let ratio = (v - 5.0) / 5.0;
        Rgb::new(
            lerp(MID.r, HIGH.r, ratio),
            lerp(MID.g, HIGH.g, ratio),
            lerp(MID.b, HIGH.b, ratio),
        )
    }
}

fn lerp(from: u8, to: u8, ratio: f64) -> u8 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * ratio) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        assert_eq!(score_color(0.0), LOW);
        assert_eq!(score_color(5.0), MID);
        assert_eq!(score_color(10.0), HIGH);
    }

    #[test]
    fn test_gradient_midpoints_truncate() {
        // 200 + 45 * 0.5 = 222.5
        assert_eq!(score_color(2.5), Rgb::new(255, 222, 200));
        // 255 - 55 * 0.5 = 227.5, 245 + 10 * 0.5 = 250
        assert_eq!(score_color(7.5), Rgb::new(227, 250, 200));
    }

    #[test]
    fn test_gradient_clamps() {
        assert_eq!(score_color(-3.0), LOW);
        assert_eq!(score_color(42.0), HIGH);
        assert_eq!(score_color(f64::NAN), LOW);
    }
}
