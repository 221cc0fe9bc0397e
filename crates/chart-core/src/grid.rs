// File: crates/chart-core/src/grid.rs
// Summary: Grid/tick layout helpers (even spacing for time, "nice" steps for values).

use crate::types::Timestamp;

pub fn linspace(start: f64, end: f64, steps: usize) -> Vec<f64> {
    if steps < 2 { return vec![start, end]; }
    let step = (end - start) / (steps as f64 - 1.0);
    (0..steps).map(|i| start + step * i as f64).collect()
}

/// Evenly spaced timestamps across `[lo, hi]`, endpoints included.
pub fn time_ticks(lo: Timestamp, hi: Timestamp, count: usize) -> Vec<Timestamp> {
    if hi <= lo { return vec![lo]; }
    linspace(lo as f64, hi as f64, count).into_iter().map(|t| t.round() as Timestamp).collect()
}

/// Round tick values inside `[lo, hi]` using 1/2/5 x 10^k steps, aiming for `count` ticks.
pub fn nice_ticks(lo: f64, hi: f64, count: usize) -> Vec<f64> {
    if !lo.is_finite() || !hi.is_finite() || count == 0 || hi <= lo {
        return vec![lo];
    }
    let step = nice_step((hi - lo) / count as f64);
    let start = (lo / step).ceil() as i64;
    let end = (hi / step).floor() as i64;
    (start..=end).map(|i| i as f64 * step).collect()
}

fn nice_step(raw: f64) -> f64 {
    let magnitude = 10f64.powf(raw.log10().floor());
    let err = raw / magnitude;
    let factor = if err >= 50f64.sqrt() {
        10.0
    } else if err >= 10f64.sqrt() {
        5.0
    } else if err >= 2f64.sqrt() {
        2.0
    } else {
        1.0
    };
    factor * magnitude
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nice_ticks_for_rsi_domain() {
        assert_eq!(nice_ticks(0.0, 100.0, 5), vec![0.0, 20.0, 40.0, 60.0, 80.0, 100.0]);
    }

    #[test]
    fn nice_ticks_stay_inside_domain() {
        let t = nice_ticks(7.84, 12.24, 10);
        assert!(t.iter().all(|v| *v >= 7.84 && *v <= 12.24));
        assert_eq!(t.first().copied(), Some(8.0));
    }

    #[test]
    fn time_ticks_hit_both_ends() {
        let t = time_ticks(0, 1_000, 5);
        assert_eq!(t, vec![0, 250, 500, 750, 1_000]);
    }
}
