//! Tick placement for the horizontal position axis.

/// Snaps a raw step to the nearest "round" value (1, 2 or 5 times a power
/// of ten) so tick labels stay readable at any zoom.
pub fn nice_step(raw: f64) -> f64 {
    if raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

/// Tick positions covering `[start, end]`, spaced to put roughly one tick
/// per 80 pixels of `width`, clamped to between 2 and 8 intervals.
pub fn ticks(start: f64, end: f64, width: f32) -> Vec<f64> {
    if end <= start {
        return vec![];
    }
    let target = ((width / 80.0).floor() as f64).clamp(2.0, 8.0);
    let step = nice_step((end - start) / target);
    let first = (start / step).ceil() * step;
    let mut out = Vec::new();
    let mut tick = first;
    // Guard against float drift at the upper bound.
    while tick <= end + step * 1e-9 {
        out.push(tick);
        tick += step;
    }
    out
}

/// Integer label for a tick; positions are sequence coordinates.
pub fn tick_label(value: f64) -> String {
    format!("{}", value.round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn test_nice_step_rounds_up_to_1_2_5() {
        assert_approx_eq!(nice_step(1.3), 2.0);
        assert_approx_eq!(nice_step(2.7), 5.0);
        assert_approx_eq!(nice_step(7.0), 10.0);
        assert_approx_eq!(nice_step(34.0), 50.0);
        assert_approx_eq!(nice_step(0.0), 1.0);
    }

    #[test]
    fn test_ticks_cover_domain() {
        let t = ticks(1.0, 300.0, 800.0);
        assert!(!t.is_empty());
        assert!(t.first().copied().unwrap() >= 1.0);
        assert!(t.last().copied().unwrap() <= 300.0);
        // Step for 299/8 ≈ 37 snaps to 50.
        assert_approx_eq!(t[1] - t[0], 50.0);
    }

    #[test]
    fn test_ticks_zoomed_extent() {
        let t = ticks(40.0, 90.0, 800.0);
        assert_approx_eq!(t[0], 40.0);
        assert!(t.contains(&50.0));
        assert!(t.last().copied().unwrap() <= 90.0);
    }

    #[test]
    fn test_ticks_empty_on_degenerate_extent() {
        assert!(ticks(10.0, 10.0, 800.0).is_empty());
    }
}
