/*!
 # HSL to RGB color conversion

 Smart-home hubs express color as hue and saturation; the strip only
 understands RGB bytes. This module derives the RGB channels from an HSL
 triple with the standard piecewise conversion.
*/

/// Fixed lightness used by the bridge's HSL model.
///
/// The strip has no independent lightness channel; brightness is a separate
/// command. Color is always derived at mid lightness.
pub const LIGHTNESS: f64 = 0.5;

/// Piecewise hue-to-channel function of the HSL model.
///
/// `t` is the hue offset for one channel (+1/3, 0, -1/3 around the base hue),
/// wrapped into [0,1). `p` and `q` are the lightness/saturation pivots.
fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

/// Converts an HSL color to RGB channel bytes.
///
/// # Arguments
///
/// * `h` - Hue as a fraction of a full turn (0.0-1.0)
/// * `s` - Saturation (0.0-1.0)
/// * `l` - Lightness (0.0-1.0)
///
/// Channels are rounded to the nearest integer in 0-255. With in-range
/// inputs no explicit clamp is needed.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let (r, g, b) = if s == 0.0 {
        // Achromatic: every channel is the lightness
        (l, l, l)
    } else {
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        (
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    };

    (
        (r * 255.0).round() as u8,
        (g * 255.0).round() as u8,
        (b * 255.0).round() as u8,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn achromatic_gray_at_mid_lightness() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.5), (128, 128, 128));
    }

    #[test]
    fn achromatic_extremes() {
        assert_eq!(hsl_to_rgb(0.0, 0.0, 0.0), (0, 0, 0));
        assert_eq!(hsl_to_rgb(0.0, 0.0, 1.0), (255, 255, 255));
    }

    #[test]
    fn primary_colors_fully_saturated() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (255, 0, 0));
        assert_eq!(hsl_to_rgb(120.0 / 360.0, 1.0, 0.5), (0, 255, 0));
        assert_eq!(hsl_to_rgb(240.0 / 360.0, 1.0, 0.5), (0, 0, 255));
    }

    #[test]
    fn secondary_colors_fully_saturated() {
        assert_eq!(hsl_to_rgb(60.0 / 360.0, 1.0, 0.5), (255, 255, 0));
        assert_eq!(hsl_to_rgb(180.0 / 360.0, 1.0, 0.5), (0, 255, 255));
        assert_eq!(hsl_to_rgb(300.0 / 360.0, 1.0, 0.5), (255, 0, 255));
    }

    #[test]
    fn partial_saturation() {
        // HSL(0, 50%, 50%): q = 0.75, p = 0.25
        assert_eq!(hsl_to_rgb(0.0, 0.5, 0.5), (191, 64, 64));
    }

    #[test]
    fn hue_wraps_at_channel_offsets() {
        // Hue near the red end: blue channel offset goes negative and wraps
        let (r, _g, b) = hsl_to_rgb(350.0 / 360.0, 1.0, 0.5);
        assert_eq!(r, 255);
        assert!(b > 0);
    }
}
