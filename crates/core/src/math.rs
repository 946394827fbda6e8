//! Small numeric helpers shared by the noise and direction code.

/// Affine remap of `x` from `[in_min, in_max]` to `[out_min, out_max]`.
///
/// Evaluated as `(x - in_min) / (in_max - in_min) * (out_max - out_min) + out_min`
/// with no clamping, so values outside the input range extrapolate. The
/// caller guarantees `in_min != in_max`.
#[inline]
pub fn map_range(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) / (in_max - in_min) * (out_max - out_min) + out_min
}

/// Clamps `x` into the interval spanned by `a` and `b`, in either order.
#[inline]
pub fn clamp(x: f64, a: f64, b: f64) -> f64 {
    x.clamp(a.min(b), a.max(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn map_range_hits_both_endpoints() {
        assert_eq!(map_range(-1.0, -1.0, 1.0, 0.0, TAU), 0.0);
        assert_eq!(map_range(1.0, -1.0, 1.0, 0.0, TAU), TAU);
    }

    #[test]
    fn map_range_midpoint() {
        let mid = map_range(0.0, -1.0, 1.0, 0.0, 10.0);
        assert!((mid - 5.0).abs() < 1e-12, "got {mid}");
    }

    #[test]
    fn map_range_extrapolates_without_clamping() {
        let v = map_range(2.0, -1.0, 1.0, 0.0, 10.0);
        assert!((v - 15.0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn map_range_handles_inverted_output() {
        let v = map_range(0.25, 0.0, 1.0, 8.0, 0.0);
        assert!((v - 6.0).abs() < 1e-12, "got {v}");
    }

    #[test]
    fn clamp_accepts_bounds_in_either_order() {
        assert_eq!(clamp(5.0, 0.0, 1.0), 1.0);
        assert_eq!(clamp(5.0, 1.0, 0.0), 1.0);
        assert_eq!(clamp(-3.0, 2.0, -2.0), -2.0);
        assert_eq!(clamp(0.5, 0.0, 1.0), 0.5);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn map_range_input_min_maps_to_output_min(
                in_min in -1e6_f64..1e6,
                span in 1e-3_f64..1e6,
                out_min in -1e6_f64..1e6,
                out_max in -1e6_f64..1e6,
            ) {
                let in_max = in_min + span;
                prop_assert_eq!(map_range(in_min, in_min, in_max, out_min, out_max), out_min);
            }

            #[test]
            fn map_range_input_max_maps_to_output_max(
                in_min in -1e6_f64..1e6,
                span in 1e-3_f64..1e6,
                out_min in -1e6_f64..1e6,
                out_max in -1e6_f64..1e6,
            ) {
                let in_max = in_min + span;
                let got = map_range(in_max, in_min, in_max, out_min, out_max);
                let tol = 1e-9 * (1.0 + out_min.abs() + out_max.abs());
                prop_assert!(
                    (got - out_max).abs() <= tol,
                    "map_range({in_max}) = {got}, expected {out_max}"
                );
            }
        }
    }
}
