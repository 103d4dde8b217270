//! Conversion between register contents, counts and volts
//!
//! The ADS1015 reports its 12-bit results left-aligned in the same 16-bit
//! registers the ADS1115 uses, so every conversion is parameterized by the
//! profile's resolution shift.
use crate::Gain;

/// Decode a raw conversion register value into a signed count.
///
/// The value is right-aligned by `resolution_shift` and sign-extended from
/// the reduced width. `resolution_shift` must be below 16.
/// ```
/// use ads1x15::conversion::decode;
/// assert_eq!(decode(0xFFF0, 4), -1);
/// assert_eq!(decode(0x8000, 0), -32768);
/// ```
pub fn decode(raw: u16, resolution_shift: u8) -> i16 {
    let res = raw >> resolution_shift;
    if resolution_shift == 0 {
        return res as i16;
    }
    if res > 0x7FFFu16 >> resolution_shift {
        // negative, extend the sign into the padding bits
        (res | !(0xFFFFu16 >> resolution_shift)) as i16
    } else {
        res as i16
    }
}

/// Counts per full-scale range at the given resolution
fn full_scale_counts(resolution_shift: u8) -> f32 {
    (32768u32 >> resolution_shift) as f32
}

/// Convert a count into volts for the given gain.
///
/// # Panics
///
/// If `resolution_shift` is 16 or more.
pub fn to_volts(count: i16, gain: Gain, resolution_shift: u8) -> f32 {
    count as f32 * (gain.full_scale_range() / full_scale_counts(resolution_shift))
}

/// Convert volts into a count for the given gain.
///
/// The result is clamped to the `i16` range and rounded to the nearest count,
/// so the full-scale voltage itself saturates at `i16::MAX` instead of
/// wrapping, and `to_volts` output converts back to the count it came from.
///
/// # Panics
///
/// If `resolution_shift` is 16 or more.
pub fn to_count(volts: f32, gain: Gain, resolution_shift: u8) -> i16 {
    let raw = volts * full_scale_counts(resolution_shift) / gain.full_scale_range();
    if raw > i16::MAX as f32 {
        return i16::MAX;
    }
    if raw < i16::MIN as f32 {
        return i16::MIN;
    }
    // half away from zero, the cast saturates
    if raw < 0.0 {
        (raw - 0.5) as i16
    } else {
        (raw + 0.5) as i16
    }
}

/// Encode a comparator threshold for the high/low threshold registers.
///
/// The threshold is clamped to the range the device can report before it is
/// left-aligned, an unclamped shift would flip the sign bit.
///
/// # Panics
///
/// If `resolution_shift` is 16 or more.
pub fn threshold_register(threshold: i16, resolution_shift: u8) -> u16 {
    let max = i16::MAX >> resolution_shift;
    let min = i16::MIN >> resolution_shift;
    (threshold.clamp(min, max) as u16) << resolution_shift
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADS1015: u8 = 4;
    const ADS1115: u8 = 0;

    fn assert_close(actual: f32, expected: f32) {
        assert!(
            (actual - expected).abs() < 0.001,
            "{actual} is not close to {expected}"
        );
    }

    #[test]
    fn decode_12bit() {
        assert_eq!(decode(0x7FF0, ADS1015), 2047);
        assert_eq!(decode(0x0000, ADS1015), 0);
        assert_eq!(decode(0xFFF0, ADS1015), -1);
        assert_eq!(decode(0x8000, ADS1015), -2048);
        assert_eq!(decode(0x8010, ADS1015), -2047);
        // padding bits are ignored
        assert_eq!(decode(0x001F, ADS1015), 1);
    }

    #[test]
    fn decode_16bit() {
        assert_eq!(decode(0x7FFF, ADS1115), 32767);
        assert_eq!(decode(0x8000, ADS1115), -32768);
        assert_eq!(decode(0xFFFF, ADS1115), -1);
        assert_eq!(decode(0x0001, ADS1115), 1);
    }

    #[test]
    fn decode_stays_in_device_range() {
        for raw in (0..=u16::MAX).step_by(7) {
            let count = decode(raw, ADS1015);
            assert!((-2048..=2047).contains(&count), "0x{raw:04X} -> {count}");
        }
    }

    #[test]
    fn volts_12bit() {
        assert_eq!(to_volts(0, Gain::TwoThirds, ADS1015), 0.0);
        assert_close(to_volts(2047, Gain::TwoThirds, ADS1015), 6.141);
        assert_eq!(to_volts(-2048, Gain::TwoThirds, ADS1015), -6.144);
        assert_eq!(to_volts(1024, Gain::One, ADS1015), 2.048);
    }

    #[test]
    fn volts_16bit() {
        assert_close(to_volts(32767, Gain::TwoThirds, ADS1115), 6.1438);
        assert_eq!(to_volts(-32768, Gain::TwoThirds, ADS1115), -6.144);
        assert_eq!(to_volts(16384, Gain::Sixteen, ADS1115), 0.128);
    }

    #[test]
    fn count_12bit() {
        assert_eq!(to_count(0.0, Gain::TwoThirds, ADS1015), 0);
        assert_eq!(to_count(3.072, Gain::TwoThirds, ADS1015), 1024);
    }

    #[test]
    fn count_saturates_at_full_scale() {
        assert_eq!(to_count(6.144, Gain::TwoThirds, ADS1115), 32767);
        assert_eq!(to_count(100.0, Gain::TwoThirds, ADS1115), 32767);
        assert_eq!(to_count(-100.0, Gain::Sixteen, ADS1115), -32768);
        assert_eq!(to_count(-6.144, Gain::TwoThirds, ADS1115), -32768);
    }

    #[test]
    fn count_rounds_to_nearest() {
        // 3mV per count
        assert_eq!(to_count(0.0014, Gain::TwoThirds, ADS1015), 0);
        assert_eq!(to_count(0.0016, Gain::TwoThirds, ADS1015), 1);
        assert_eq!(to_count(-0.0016, Gain::TwoThirds, ADS1015), -1);
        // converts back to 32760.998 counts
        let volts = to_volts(32761, Gain::TwoThirds, ADS1115);
        assert_eq!(to_count(volts, Gain::TwoThirds, ADS1115), 32761);
    }

    #[test]
    fn count_volts_round_trip() {
        for count in [1000, -500, 0] {
            let volts = to_volts(count, Gain::TwoThirds, ADS1015);
            assert_eq!(to_count(volts, Gain::TwoThirds, ADS1015), count);
        }
        let gains = [
            Gain::TwoThirds,
            Gain::One,
            Gain::Two,
            Gain::Four,
            Gain::Eight,
            Gain::Sixteen,
        ];
        for gain in gains {
            for shift in [ADS1015, ADS1115] {
                let (min, max) = (i16::MIN >> shift, i16::MAX >> shift);
                for count in min..=max {
                    let volts = to_volts(count, gain, shift);
                    let back = to_count(volts, gain, shift);
                    assert_eq!(back, count, "{gain:?} shift {shift}");
                    assert_eq!(to_volts(back, gain, shift), volts);
                }
            }
        }
    }

    #[test]
    fn threshold_is_left_aligned() {
        assert_eq!(threshold_register(100, ADS1015), 0x0640);
        assert_eq!(threshold_register(1000, ADS1115), 0x03E8);
        assert_eq!(threshold_register(-1, ADS1015), 0xFFF0);
    }

    #[test]
    fn threshold_is_clamped_before_shift() {
        assert_eq!(threshold_register(2048, ADS1015), 0x7FF0);
        assert_eq!(threshold_register(i16::MAX, ADS1015), 0x7FF0);
        assert_eq!(threshold_register(-2049, ADS1015), 0x8000);
        assert_eq!(threshold_register(i16::MIN, ADS1115), 0x8000);
        assert_eq!(threshold_register(i16::MAX, ADS1115), 0x7FFF);
    }
}
