/*!
 # BLEDOM command frame encoding

 Every command the strip understands is a fixed-layout frame written to its
 control characteristic, framed by a `7e` header and an `ef` trailer. The
 vendor app builds frames as hex strings and decodes them pairwise; this
 module reproduces that encoding exactly, including its one quirk (see
 [`effect`]).
*/

/// Decodes a hex string into bytes, two digits per byte.
///
/// A trailing lone nibble is dropped, matching the decoder in the vendor
/// protocol this was reverse engineered from.
fn decode_hex(s: &str) -> Vec<u8> {
    s.as_bytes()
        .chunks_exact(2)
        .map(|pair| {
            let hi = char::from(pair[0]).to_digit(16).unwrap_or(0) as u8;
            let lo = char::from(pair[1]).to_digit(16).unwrap_or(0) as u8;
            (hi << 4) | lo
        })
        .collect()
}

/// Encodes the power command frame.
pub fn power(on: bool) -> Vec<u8> {
    let flag = if on { "f00001" } else { "000000" };
    decode_hex(&format!("7e0404{flag}ff00ef"))
}

/// Encodes the brightness command frame. `level` is a percentage, zero-padded
/// to two hex digits.
pub fn brightness(level: u8) -> Vec<u8> {
    decode_hex(&format!("7e0401{level:02x}01ffff00ef"))
}

/// Encodes the static RGB color command frame.
pub fn rgb(r: u8, g: u8, b: u8) -> Vec<u8> {
    decode_hex(&format!("7e070503{r:02x}{g:02x}{b:02x}10ef"))
}

/// Encodes the effect command frame.
///
/// The effect code is NOT zero-padded, unlike every other field in the
/// protocol. A code below `0x10` therefore shifts the remaining nibbles and
/// loses the trailing one, producing a truncated 8-byte frame. All known
/// effect codes are `0x87` and above, so well-formed frames in practice; the
/// quirk is kept to stay byte-compatible with the vendor app.
pub fn effect(code: u8) -> Vec<u8> {
    decode_hex(&format!("7e000303{code:x}030000ef"))
}

/// Encodes the effect speed command frame. `speed` is a percentage,
/// zero-padded to two hex digits.
pub fn effect_speed(speed: u8) -> Vec<u8> {
    decode_hex(&format!("7e000202{speed:02x}000000ef"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn power_frames_differ_only_in_flag_bytes() {
        let on = power(true);
        let off = power(false);
        assert_eq!(on, [0x7e, 0x04, 0x04, 0xf0, 0x00, 0x01, 0xff, 0x00, 0xef]);
        assert_eq!(off, [0x7e, 0x04, 0x04, 0x00, 0x00, 0x00, 0xff, 0x00, 0xef]);
        assert_eq!(on.len(), 9);
        assert_eq!(off.len(), 9);
        assert_eq!(on[..3], off[..3]);
        assert_eq!(on[6..], off[6..]);
    }

    #[test]
    fn brightness_level_is_two_hex_digits_for_whole_range() {
        for level in 0..=100u8 {
            let frame = brightness(level);
            assert_eq!(frame.len(), 9, "level {level}");
            assert_eq!(frame[..3], [0x7e, 0x04, 0x01]);
            assert_eq!(frame[3], level);
            assert_eq!(frame[4..], [0x01, 0xff, 0xff, 0x00, 0xef]);
        }
    }

    #[test]
    fn rgb_channels_are_zero_padded() {
        assert_eq!(
            rgb(0x01, 0xab, 0x00),
            [0x7e, 0x07, 0x05, 0x03, 0x01, 0xab, 0x00, 0x10, 0xef]
        );
        assert_eq!(
            rgb(255, 0, 0),
            [0x7e, 0x07, 0x05, 0x03, 0xff, 0x00, 0x00, 0x10, 0xef]
        );
    }

    #[test]
    fn effect_frame_for_known_codes() {
        assert_eq!(
            effect(0x87),
            [0x7e, 0x00, 0x03, 0x03, 0x87, 0x03, 0x00, 0x00, 0xef]
        );
        assert_eq!(
            effect(0x95),
            [0x7e, 0x00, 0x03, 0x03, 0x95, 0x03, 0x00, 0x00, 0xef]
        );
    }

    #[test]
    fn effect_code_below_0x10_truncates_frame() {
        // "7e000303" + "7" + "030000ef" has 17 digits; the last nibble is lost
        assert_eq!(
            effect(0x07),
            [0x7e, 0x00, 0x03, 0x03, 0x70, 0x30, 0x00, 0x0e]
        );
    }

    #[test]
    fn effect_speed_is_zero_padded() {
        assert_eq!(
            effect_speed(5),
            [0x7e, 0x00, 0x02, 0x02, 0x05, 0x00, 0x00, 0x00, 0xef]
        );
        assert_eq!(
            effect_speed(100),
            [0x7e, 0x00, 0x02, 0x02, 0x64, 0x00, 0x00, 0x00, 0xef]
        );
    }
}
