//! Coordinate mapping applied before lookup and sampling

/// Round half up and saturate to the `i32` range.
///
/// `2.5 -> 3`, `-2.5 -> -2`, infinities clamp to the bounds, NaN maps to 0.
#[inline]
pub fn saturate_to_int(v: f64) -> i32 {
    let floor = v.floor();
    // v - floor(v) is exact for every finite double
    let rounded = if v - floor >= 0.5 { floor + 1.0 } else { floor };
    // `as` saturates and maps NaN to 0
    rounded as i32
}

/// Truncate toward zero, saturating. Used only to derive float-key slot indices.
#[inline]
pub fn truncate_to_int(v: f64) -> i32 {
    v as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_up() {
        assert_eq!(saturate_to_int(3.6), 4);
        assert_eq!(saturate_to_int(-3.4), -3);
        assert_eq!(saturate_to_int(2.5), 3);
        assert_eq!(saturate_to_int(-2.5), -2);
        assert_eq!(saturate_to_int(-2.6), -3);
        assert_eq!(saturate_to_int(0.49999999999999994), 0);
        assert_eq!(saturate_to_int(-0.0), 0);
    }

    #[test]
    fn test_saturation() {
        assert_eq!(saturate_to_int(1e30), i32::MAX);
        assert_eq!(saturate_to_int(-1e30), i32::MIN);
        assert_eq!(saturate_to_int(f64::INFINITY), i32::MAX);
        assert_eq!(saturate_to_int(f64::NEG_INFINITY), i32::MIN);
        assert_eq!(saturate_to_int(2147483646.7), i32::MAX);
        assert_eq!(saturate_to_int(f64::NAN), 0);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_int(3.9), 3);
        assert_eq!(truncate_to_int(-3.9), -3);
        assert_eq!(truncate_to_int(1e12), i32::MAX);
        assert_eq!(truncate_to_int(f64::NAN), 0);
    }
}
