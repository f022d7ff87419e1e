//! Series utilities: returns, crossings, edge detection, rolling windows.
//!
//! Every function here is pure and NaN-aware: an undefined input at a
//! position makes the derived value undefined (NaN) or the derived flag
//! false, never true. Outputs are aligned 1:1 with their inputs except
//! `returns`, which drops the first element.

/// Period-over-period percentage change, first element dropped.
///
/// `returns[i] = (prices[i+1] - prices[i]) / prices[i]`. A zero previous
/// price yields NaN.
pub fn returns(prices: &[f64]) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| {
            let (prev, cur) = (w[0], w[1]);
            if prev == 0.0 || prev.is_nan() || cur.is_nan() {
                f64::NAN
            } else {
                (cur - prev) / prev
            }
        })
        .collect()
}

/// Golden and death cross detection between two equal-length series.
///
/// - golden[i] = fast[i] > slow[i] && fast[i-1] <= slow[i-1]
/// - death[i]  = fast[i] < slow[i] && fast[i-1] >= slow[i-1]
///
/// Index 0 is always false. Any NaN among the four operands makes both false.
pub fn detect_crossing(fast: &[f64], slow: &[f64]) -> (Vec<bool>, Vec<bool>) {
    assert_eq!(
        fast.len(),
        slow.len(),
        "crossing detection requires equal-length series"
    );
    let n = fast.len();
    let mut golden = vec![false; n];
    let mut death = vec![false; n];

    for i in 1..n {
        let (f, s, fp, sp) = (fast[i], slow[i], fast[i - 1], slow[i - 1]);
        if f.is_nan() || s.is_nan() || fp.is_nan() || sp.is_nan() {
            continue;
        }
        golden[i] = f > s && fp <= sp;
        death[i] = f < s && fp >= sp;
    }

    (golden, death)
}

/// Crossing of a series against a constant level.
///
/// Returns `(up, down)` where `up[i] = v[i] > level && v[i-1] <= level` and
/// `down[i] = v[i] < level && v[i-1] >= level`.
pub fn cross_level(values: &[f64], level: f64) -> (Vec<bool>, Vec<bool>) {
    let flat = vec![level; values.len()];
    detect_crossing(values, &flat)
}

/// Total count of true entries.
pub fn count_true(signal: &[bool]) -> usize {
    signal.iter().filter(|&&s| s).count()
}

/// Indices where the signal is true.
pub fn true_indices(signal: &[bool]) -> Vec<usize> {
    signal
        .iter()
        .enumerate()
        .filter_map(|(i, &s)| s.then_some(i))
        .collect()
}

/// Edge trigger: true where the level is newly true (previous bar false).
///
/// Index 0 has no previous bar and is never an edge.
pub fn rising_edges(level: &[bool]) -> Vec<bool> {
    let mut edges = vec![false; level.len()];
    for i in 1..level.len() {
        edges[i] = level[i] && !level[i - 1];
    }
    edges
}

/// Elementwise `a > b`; NaN on either side yields false.
pub fn greater_than(a: &[f64], b: &[f64]) -> Vec<bool> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| !x.is_nan() && !y.is_nan() && x > y)
        .collect()
}

/// Elementwise `a < b`; NaN on either side yields false.
pub fn less_than(a: &[f64], b: &[f64]) -> Vec<bool> {
    a.iter()
        .zip(b)
        .map(|(&x, &y)| !x.is_nan() && !y.is_nan() && x < y)
        .collect()
}

/// Elementwise `v > level`; NaN yields false.
pub fn above(values: &[f64], level: f64) -> Vec<bool> {
    values.iter().map(|&v| !v.is_nan() && v > level).collect()
}

/// Elementwise `v < level`; NaN yields false.
pub fn below(values: &[f64], level: f64) -> Vec<bool> {
    values.iter().map(|&v| !v.is_nan() && v < level).collect()
}

/// Elementwise logical AND of two flag series.
pub fn and(a: &[bool], b: &[bool]) -> Vec<bool> {
    a.iter().zip(b).map(|(&x, &y)| x && y).collect()
}

/// Rolling arithmetic mean over a trailing window.
///
/// Positions before `window - 1`, and windows containing NaN, are NaN.
/// Each window is summed relative to its first value, so a window of equal
/// values returns that value exactly.
pub fn rolling_mean(values: &[f64], window: usize) -> Vec<f64> {
    rolling_moments(values, window, 0)
        .into_iter()
        .map(|m| m.map_or(f64::NAN, |(mean, _)| mean))
        .collect()
}

/// Rolling standard deviation over a trailing window.
///
/// `ddof` is the delta degrees of freedom: 0 for population, 1 for sample.
/// Windows that contain NaN, or have `window <= ddof`, are NaN. A window of
/// equal values has a standard deviation of exactly 0.
pub fn rolling_std(values: &[f64], window: usize, ddof: usize) -> Vec<f64> {
    if window <= ddof {
        return vec![f64::NAN; values.len()];
    }
    rolling_moments(values, window, ddof)
        .into_iter()
        .map(|m| m.map_or(f64::NAN, |(_, var)| var.sqrt()))
        .collect()
}

/// Relative variance below which a window is treated as constant.
const FLAT_VARIANCE_EPS: f64 = 1e-24;

/// Mean and variance of every full, NaN-free trailing window.
///
/// Deviations are taken from the window's first value (shifted data), so
/// constant windows produce an exact mean and zero variance. Variance below
/// `FLAT_VARIANCE_EPS * mean²` is clamped to zero.
fn rolling_moments(values: &[f64], window: usize, ddof: usize) -> Vec<Option<(f64, f64)>> {
    let n = values.len();
    let mut result = vec![None; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        let shift = slice[0];
        let (sum, sum_sq) = slice.iter().fold((0.0, 0.0), |(s, sq), &v| {
            let d = v - shift;
            (s + d, sq + d * d)
        });
        let w = window as f64;
        let mean = shift + sum / w;
        let mut var = ((sum_sq - sum * sum / w) / (window - ddof) as f64).max(0.0);
        if var <= FLAT_VARIANCE_EPS * mean * mean {
            var = 0.0;
        }
        result[i] = Some((mean, var));
    }

    result
}

/// Rolling maximum over a trailing window (NaN in window → NaN).
pub fn rolling_max(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::max)
}

/// Rolling minimum over a trailing window (NaN in window → NaN).
pub fn rolling_min(values: &[f64], window: usize) -> Vec<f64> {
    rolling_extreme(values, window, f64::min)
}

fn rolling_extreme(values: &[f64], window: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    if window == 0 || n < window {
        return result;
    }

    for i in (window - 1)..n {
        let slice = &values[(i + 1 - window)..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = slice.iter().copied().fold(slice[0], pick);
    }

    result
}

/// Last value of a series if it is defined.
pub fn last_defined(values: &[f64]) -> Option<f64> {
    values.last().copied().filter(|v| !v.is_nan())
}
