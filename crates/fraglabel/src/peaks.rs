//! Peak detection over a 1-D intensity trace
//!
//! Equivalent to a ridge-line search run at a single, minimal wavelet scale:
//! at that resolution the transform is the trace itself, ridge lines collapse
//! to single points, and a peak is a sample that is strictly higher than its
//! immediate neighbours. Candidates are then filtered by a local
//! signal-to-noise ratio, where the noise floor is a low percentile of the
//! intensities surrounding the candidate.

use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct PeakDetector {
    /// Minimum ratio of peak intensity to the local noise floor
    pub min_snr: f64,
    /// Percentile (0-100) of the surrounding window used as the noise floor
    pub noise_percentile: f64,
    /// Width of the noise window, as a fraction of the trace length
    pub window_fraction: f64,
}

impl Default for PeakDetector {
    fn default() -> Self {
        Self {
            min_snr: 1.0,
            noise_percentile: 10.0,
            window_fraction: 0.05,
        }
    }
}

impl PeakDetector {
    /// Return the ascending indices of all peaks in `trace`.
    ///
    /// # Invariants
    /// * `trace` is in acquisition order, it is never re-sorted
    /// * The first and last samples are never reported as peaks
    pub fn detect(&self, trace: &[f64]) -> Vec<usize> {
        let window = ((trace.len() as f64 * self.window_fraction).ceil() as usize).max(1);
        local_maxima(trace)
            .into_iter()
            .filter(|&idx| {
                let noise = self.noise_floor(trace, idx, window);
                noise > 0.0 && trace[idx] / noise >= self.min_snr
            })
            .collect()
    }

    fn noise_floor(&self, trace: &[f64], idx: usize, window: usize) -> f64 {
        let half = window / 2;
        let lo = idx.saturating_sub(half);
        let hi = (idx + half + window % 2).min(trace.len());
        let mut slice = trace[lo..hi].iter().map(|x| x.abs()).collect::<Vec<_>>();
        percentile(&mut slice, self.noise_percentile)
    }
}

/// Indices strictly greater than both neighbours. A flat top bounded by lower
/// samples on both sides yields a single index at its (left) middle
pub fn local_maxima(trace: &[f64]) -> Vec<usize> {
    let mut peaks = Vec::new();
    if trace.len() < 3 {
        return peaks;
    }

    let mut i = 1;
    while i < trace.len() - 1 {
        if trace[i - 1] < trace[i] {
            // Walk across a potential plateau
            let mut right = i;
            while right + 1 < trace.len() && trace[right + 1] == trace[i] {
                right += 1;
            }
            if right + 1 < trace.len() && trace[right + 1] < trace[i] {
                peaks.push((i + right) / 2);
            }
            i = right + 1;
        } else {
            i += 1;
        }
    }
    peaks
}

/// Linear-interpolated percentile, `q` in [0, 100]. Sorts `values` in place
pub fn percentile(values: &mut [f64], q: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_unstable_by(|a, b| a.total_cmp(b));
    let rank = (q.clamp(0.0, 100.0) / 100.0) * (values.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    values[lo] + (values[hi] - values[lo]) * (rank - lo as f64)
}
