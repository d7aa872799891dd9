//! Linear value mapping.
//!
//! Pure and stateless: mapping never adds damping. Smooth the input (or the
//! output) with a spring when lag is wanted.

/// Map `value` from the `input` range onto the `output` range.
///
/// The input start maps exactly to the output start and the input end
/// exactly to the output end. With `clamp`, inputs outside the range pin to
/// the nearest end and the result never leaves the output range. A
/// degenerate input range or a NaN value maps to the output start.
pub fn remap(value: f64, input: (f64, f64), output: (f64, f64), clamp: bool) -> f64 {
    let (in_start, in_end) = input;
    let (out_start, out_end) = output;

    let span = in_end - in_start;
    if span == 0.0 || !span.is_finite() || value.is_nan() {
        return out_start;
    }

    let mut t = (value - in_start) / span;
    if clamp {
        t = t.clamp(0.0, 1.0);
    }
    if t == 0.0 {
        return out_start;
    }
    if t == 1.0 {
        return out_end;
    }

    let mapped = out_start + (out_end - out_start) * t;
    if clamp {
        mapped.clamp(out_start.min(out_end), out_start.max(out_end))
    } else {
        mapped
    }
}

/// Parallax travel for a scroll progress in `[0, 1]`.
pub fn parallax(progress: f64, distance: f64) -> f64 {
    remap(progress, (0.0, 1.0), (0.0, distance), true)
}
