//! Advisory estimate of how many recursion levels stay visible.

/// Upper bound on the estimate. Angles close to 0° give a shrink factor that
/// rounds to 1.0 and would otherwise never terminate.
pub const MAX_ESTIMATED_DEPTH: usize = 256;

/// Estimate how many levels can be drawn before shapes drop below
/// `min_visible_pixels`.
///
/// Each level is modeled as shrinking the side length by `cos(angle)`.
/// Starting at `base_length`, the size is multiplied by that factor until it
/// falls below `min_visible_pixels`; the number of multiplications is the
/// estimate. The result is capped at [`MAX_ESTIMATED_DEPTH`], and a
/// non-positive or non-finite `min_visible_pixels` also yields the cap.
///
/// ```
/// use pythagoras_core::estimate_depth;
///
/// // The reference setup: 100 px trunk, 45°, one-pixel leaves.
/// assert_eq!(estimate_depth(100.0, 45.0, 1.0), 14);
/// ```
pub fn estimate_depth(base_length: f64, angle_degrees: f64, min_visible_pixels: f64) -> usize {
    if min_visible_pixels <= 0.0 || !min_visible_pixels.is_finite() {
        return MAX_ESTIMATED_DEPTH;
    }

    let scale = angle_degrees.to_radians().cos();
    let mut size = base_length;
    let mut depth = 0;

    while size >= min_visible_pixels && depth < MAX_ESTIMATED_DEPTH {
        size *= scale;
        depth += 1;
    }

    depth
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_value() {
        // 100 * 0.7071^n >= 1 for n = 0..=13
        assert_eq!(estimate_depth(100.0, 45.0, 1.0), 14);
    }

    #[test]
    fn below_threshold_from_the_start() {
        assert_eq!(estimate_depth(0.5, 45.0, 1.0), 0);
    }

    #[test]
    fn non_increasing_in_min_pixels() {
        for angle in [5.0, 30.0, 45.0, 60.0, 85.0] {
            let mut last = usize::MAX;
            for min in [0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 50.0, 100.0, 500.0] {
                let depth = estimate_depth(100.0, angle, min);
                assert!(depth <= last, "angle {}: min {} gave {} after {}", angle, min, depth, last);
                last = depth;
            }
        }
    }

    #[test]
    fn non_increasing_in_angle() {
        let mut last = usize::MAX;
        for angle in [1.0, 10.0, 20.0, 45.0, 60.0, 75.0, 89.0] {
            let depth = estimate_depth(100.0, angle, 1.0);
            assert!(depth <= last, "angle {} gave {} after {}", angle, depth, last);
            last = depth;
        }
    }

    #[test]
    fn extremes() {
        // Near 90° one step already drops below a pixel.
        assert_eq!(estimate_depth(100.0, 89.9, 1.0), 1);
        // Near 0° the estimate grows until it hits the cap.
        assert!(estimate_depth(100.0, 1.0, 1.0) > 100);
        assert_eq!(estimate_depth(100.0, 1e-9, 1.0), MAX_ESTIMATED_DEPTH);
    }

    #[test]
    fn invalid_threshold_is_capped() {
        assert_eq!(estimate_depth(100.0, 45.0, 0.0), MAX_ESTIMATED_DEPTH);
        assert_eq!(estimate_depth(100.0, 45.0, f64::NAN), MAX_ESTIMATED_DEPTH);
    }
}
