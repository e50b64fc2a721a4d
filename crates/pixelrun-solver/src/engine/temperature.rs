// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use crate::config::{AnnealingConfig, CalibrationConfig};

/// Geometric cooling: `T <- max(T_min, alpha * T)` once per iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureSchedule {
    initial: f64,
    current: f64,
    cooling_rate: f64,
    min_temperature: f64,
    iteration: u64,
}

impl TemperatureSchedule {
    pub fn new(initial: f64, cooling_rate: f64, min_temperature: f64) -> Self {
        Self {
            initial,
            current: initial.max(min_temperature),
            cooling_rate,
            min_temperature,
            iteration: 0,
        }
    }

    pub fn from_config(cfg: &AnnealingConfig) -> Self {
        Self::new(cfg.initial_temperature, cfg.cooling_rate, cfg.min_temperature)
    }

    /// Same cooling, start temperature scaled by `ratio`.
    pub fn scaled(cfg: &AnnealingConfig, ratio: f64) -> Self {
        Self::new(
            cfg.initial_temperature * ratio,
            cfg.cooling_rate,
            cfg.min_temperature,
        )
    }

    #[inline]
    pub fn current(&self) -> f64 {
        self.current
    }

    #[inline]
    pub fn initial(&self) -> f64 {
        self.initial
    }

    #[inline]
    pub fn min_temperature(&self) -> f64 {
        self.min_temperature
    }

    #[inline]
    pub fn cooling_rate(&self) -> f64 {
        self.cooling_rate
    }

    /// `T / T0` in `[0, 1]`.
    #[inline]
    pub fn ratio(&self) -> f64 {
        if self.initial > 0.0 {
            (self.current / self.initial).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    #[inline]
    pub fn iteration(&self) -> u64 {
        self.iteration
    }

    #[inline]
    pub fn advance(&mut self) -> f64 {
        self.current = (self.current * self.cooling_rate).max(self.min_temperature);
        self.iteration += 1;
        self.current
    }

    #[inline]
    pub fn is_frozen(&self) -> bool {
        self.current <= self.min_temperature
    }

    pub fn reset(&mut self, initial: f64) {
        self.initial = initial;
        self.current = initial.max(self.min_temperature);
        self.iteration = 0;
    }
}

/// Start and floor temperatures from sampled move energies.
///
/// Solves `exp(-e / T) = p` for `T`: the mean magnitude against
/// `initial_acceptance` gives the start, the smallest magnitude against
/// `final_acceptance` gives the floor. Zero and non-finite samples are
/// ignored; `None` when nothing is left.
pub fn calibrate(energies: &[f64], cfg: &CalibrationConfig) -> Option<(f64, f64)> {
    let magnitudes: Vec<f64> = energies
        .iter()
        .map(|e| e.abs())
        .filter(|e| e.is_finite() && *e > 0.0)
        .collect();
    if magnitudes.is_empty() {
        return None;
    }
    let mean = magnitudes.iter().sum::<f64>() / magnitudes.len() as f64;
    let smallest = magnitudes.iter().copied().fold(f64::INFINITY, f64::min);
    let start = -mean / cfg.initial_acceptance.ln();
    let floor = -smallest / cfg.final_acceptance.ln();
    Some((start, floor.min(start)))
}

impl std::fmt::Display for TemperatureSchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "TemperatureSchedule(T: {:.6}, iteration: {})",
            self.current, self.iteration
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_advance_cools_geometrically() {
        let mut s = TemperatureSchedule::new(1.0, 0.5, 0.0);
        assert_eq!(s.advance(), 0.5);
        assert_eq!(s.advance(), 0.25);
        assert_eq!(s.iteration(), 2);
        assert!(!s.is_frozen());
    }

    #[test]
    fn test_never_drops_below_minimum() {
        let mut s = TemperatureSchedule::new(1.0, 0.1, 0.05);
        for _ in 0..10 {
            s.advance();
        }
        assert_eq!(s.current(), 0.05);
        assert!(s.is_frozen());
    }

    #[test]
    fn test_reset_restarts() {
        let mut s = TemperatureSchedule::from_config(&AnnealingConfig::default());
        s.advance();
        s.reset(3.0);
        assert_eq!(s.current(), 3.0);
        assert_eq!(s.iteration(), 0);
    }

    #[test]
    fn test_ratio_tracks_cooling() {
        let mut s = TemperatureSchedule::new(4.0, 0.5, 0.0);
        assert_eq!(s.ratio(), 1.0);
        s.advance();
        assert_eq!(s.ratio(), 0.5);
        assert_eq!(s.cooling_rate(), 0.5);
    }

    #[test]
    fn test_calibrate_hits_acceptance_targets() {
        let cfg = CalibrationConfig::default();
        let (start, floor) = calibrate(&[1.0, -3.0, 0.0, 2.0], &cfg).unwrap();
        assert!(((-2.0 / start).exp() - cfg.initial_acceptance).abs() < 1e-12);
        assert!(((-1.0 / floor).exp() - cfg.final_acceptance).abs() < 1e-12);
        assert!(floor < start);

        assert_eq!(calibrate(&[0.0, f64::NAN], &cfg), None);
        assert_eq!(calibrate(&[], &cfg), None);
    }

    #[test]
    fn test_scaled_start() {
        let cfg = AnnealingConfig::default();
        let s = TemperatureSchedule::scaled(&cfg, 0.25);
        assert_eq!(s.current(), cfg.initial_temperature * 0.25);
    }
}
