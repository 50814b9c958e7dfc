//! Unit-width time bins accumulated over samples.
//!
//! Bin `b` (1-based, `b ≤ t_max`) is recorded once per sample, by the first
//! event whose time reaches `b`. It stores the infected fraction right after
//! that event and the event time itself. Final averages divide the time sum
//! by the number of samples that reached the bin and the ρ sum by either the
//! completed sample count or the survivor count of the bin.

use crate::params::Normalization;

#[derive(Clone, Debug)]
pub struct TimeSeries {
    rho:       Vec<f64>,
    time:      Vec<f64>,
    samples:   Vec<u64>,
    survivors: Vec<u64>,
    completed: u64,
    /// Highest bin recorded with a non-zero infected set (dt_pos_max).
    last_bin:  usize,
}

/// Next unrecorded bin of the sample in progress.
#[derive(Clone, Copy, Debug)]
pub struct BinCursor {
    next: usize,
}

impl BinCursor {
    pub fn new() -> Self { Self { next: 1 } }

    /// First bin this sample has not recorded yet.
    #[inline] pub fn next_bin(&self) -> usize { self.next }
}

impl Default for BinCursor {
    fn default() -> Self { Self::new() }
}

impl TimeSeries {
    pub fn new(t_max: usize) -> Self {
        Self {
            rho:       vec![0.0; t_max],
            time:      vec![0.0; t_max],
            samples:   vec![0; t_max],
            survivors: vec![0; t_max],
            completed: 0,
            last_bin:  0,
        }
    }

    #[inline] pub fn t_max(&self) -> usize     { self.rho.len() }
    #[inline] pub fn completed(&self) -> u64   { self.completed }
    #[inline] pub fn last_bin(&self) -> usize  { self.last_bin }

    /// Samples that recorded bin `b`.
    #[inline] pub fn samples_at(&self, b: usize) -> u64   { self.samples[b - 1] }
    /// Samples still active when they recorded bin `b`.
    #[inline] pub fn survivors_at(&self, b: usize) -> u64 { self.survivors[b - 1] }

    /// Catch up every bin boundary passed by `t`. Returns how many bins
    /// were recorded (several when one Δt spans more than a unit).
    pub fn record(&mut self, cursor: &mut BinCursor, t: f64, infected: usize, n: usize) -> usize {
        let rho = infected as f64 / n as f64;
        let mut recorded = 0;
        while cursor.next <= self.t_max() && t >= cursor.next as f64 {
            let i = cursor.next - 1;
            self.rho[i] += rho;
            self.time[i] += t;
            self.samples[i] += 1;
            if infected > 0 {
                self.survivors[i] += 1;
                self.last_bin = self.last_bin.max(cursor.next);
            }
            cursor.next += 1;
            recorded += 1;
        }
        recorded
    }

    /// Count one more finished sample.
    #[inline] pub fn finish_sample(&mut self) { self.completed += 1; }

    /// Add another aggregate over the same horizon bin by bin.
    pub fn merge(&mut self, other: &TimeSeries) {
        assert_eq!(self.t_max(), other.t_max(), "merging series with different horizons");
        for i in 0..self.t_max() {
            self.rho[i] += other.rho[i];
            self.time[i] += other.time[i];
            self.samples[i] += other.samples[i];
            self.survivors[i] += other.survivors[i];
        }
        self.completed += other.completed;
        self.last_bin = self.last_bin.max(other.last_bin);
    }

    /// Averaged `(t, ρ)` for bins `1..=last_bin`.
    pub fn rows(&self, norm: Normalization) -> Vec<(f64, f64)> {
        (0..self.last_bin)
            .map(|i| {
                let t = ratio(self.time[i], self.samples[i]);
                let rho = match norm {
                    Normalization::Population => ratio(self.rho[i], self.completed),
                    Normalization::QuasiStationary => ratio(self.rho[i], self.survivors[i]),
                };
                (t, rho)
            })
            .collect()
    }
}

#[inline]
fn ratio(sum: f64, count: u64) -> f64 {
    if count == 0 { 0.0 } else { sum / count as f64 }
}

/*────────────────── tests ──────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn catch_up_records_each_bin_once() {
        let mut s = TimeSeries::new(10);
        let mut c = BinCursor::new();

        assert_eq!(s.record(&mut c, 0.4, 3, 4), 0);
        // jump over bins 1, 2 and 3 in one step
        assert_eq!(s.record(&mut c, 3.2, 2, 4), 3);
        assert_eq!(c.next_bin(), 4);
        // still inside bin 3..4: nothing new
        assert_eq!(s.record(&mut c, 3.9, 1, 4), 0);
        assert_eq!(s.record(&mut c, 4.0, 1, 4), 1);

        for b in 1..=4 {
            assert_eq!(s.samples_at(b), 1);
        }
        assert_eq!(s.samples_at(5), 0);
        assert_eq!(s.last_bin(), 4);
    }

    #[test]
    fn horizon_caps_bins() {
        let mut s = TimeSeries::new(3);
        let mut c = BinCursor::new();
        assert_eq!(s.record(&mut c, 7.5, 1, 2), 3);
        assert_eq!(c.next_bin(), 4);
        assert_eq!(s.record(&mut c, 9.0, 1, 2), 0);
    }

    #[test]
    fn dead_samples_do_not_extend_output() {
        let mut s = TimeSeries::new(5);
        let mut c = BinCursor::new();
        s.record(&mut c, 1.5, 1, 2);
        s.record(&mut c, 2.5, 0, 2);
        s.finish_sample();
        assert_eq!(s.last_bin(), 1);
        assert_eq!(s.samples_at(2), 1);
        assert_eq!(s.survivors_at(2), 0);
    }

    #[test]
    fn population_vs_quasi_stationary() {
        let mut s = TimeSeries::new(2);

        // sample A: alive at both bins with ρ = 1/2
        let mut c = BinCursor::new();
        s.record(&mut c, 1.0, 1, 2);
        s.record(&mut c, 2.0, 1, 2);
        s.finish_sample();

        // sample B: dies before the first bin
        s.finish_sample();

        let pop = s.rows(Normalization::Population);
        assert_eq!(pop.len(), 2);
        assert_relative_eq!(pop[0].0, 1.0);
        assert_relative_eq!(pop[0].1, 0.25);
        assert_relative_eq!(pop[1].0, 2.0);

        let qs = s.rows(Normalization::QuasiStationary);
        assert_relative_eq!(qs[0].1, 0.5);
        assert_relative_eq!(qs[1].1, 0.5);
    }

    #[test]
    fn merge_adds_binwise() {
        let mut a = TimeSeries::new(3);
        let mut b = TimeSeries::new(3);
        let mut ca = BinCursor::new();
        let mut cb = BinCursor::new();
        a.record(&mut ca, 1.2, 2, 4);
        a.finish_sample();
        b.record(&mut cb, 2.4, 4, 4);
        b.finish_sample();

        a.merge(&b);
        assert_eq!(a.completed(), 2);
        assert_eq!(a.samples_at(1), 2);
        assert_eq!(a.samples_at(2), 1);
        assert_eq!(a.last_bin(), 2);
        let rows = a.rows(Normalization::Population);
        assert_relative_eq!(rows[0].0, (1.2 + 2.4) / 2.0);
        assert_relative_eq!(rows[0].1, (0.5 + 1.0) / 2.0);
    }
}
