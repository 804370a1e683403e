//! Keyframe curves
//!
//! Authored effects animate alpha/scale/spin with keyframe tracks: ordered
//! (time, value) pairs over normalized progress, conventionally [0, 1].
//! Evaluation clamps outside the keyed range and blends linearly inside it.
//! An empty track means "leave the attribute alone", which evaluation
//! signals with `None`.

use serde::{Deserialize, Serialize};

/// A single (time, value) pair. Time is normalized progress, not seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub time: f32,
    pub value: f32,
}

/// Interpolation between bracketing keyframes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CurveMode {
    #[default]
    Linear,
}

/// An ordered keyframe track.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Curve {
    keys: Vec<Keyframe>,
    mode: CurveMode,
}

impl Curve {
    /// Build a curve. Keys must be time-ordered for the bracketing scan, so
    /// they are sorted on construction.
    pub fn new(mut keys: Vec<Keyframe>) -> Self {
        keys.sort_by(|a, b| a.time.total_cmp(&b.time));
        Self {
            keys,
            mode: CurveMode::Linear,
        }
    }

    /// Convenience constructor from (time, value) tuples.
    pub fn from_pairs(pairs: &[(f32, f32)]) -> Self {
        Self::new(
            pairs
                .iter()
                .map(|&(time, value)| Keyframe { time, value })
                .collect(),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Time of the last key, if any. Progress past this point means the
    /// track has completed.
    pub fn last_key_time(&self) -> Option<f32> {
        self.keys.last().map(|k| k.time)
    }

    /// Evaluate at normalized progress `t`. Returns `None` when the track
    /// is empty (caller keeps the current attribute value). Clamps to the
    /// first/last key's value outside the keyed range; never fails.
    pub fn evaluate(&self, t: f32) -> Option<f32> {
        let first = self.keys.first()?;
        if t <= first.time {
            return Some(first.value);
        }
        let last = self.keys.last()?;
        if t >= last.time {
            return Some(last.value);
        }
        for pair in self.keys.windows(2) {
            let (a, b) = (pair[0], pair[1]);
            if t >= a.time && t <= b.time {
                let span = b.time - a.time;
                if span <= f32::EPSILON {
                    return Some(b.value);
                }
                let local = (t - a.time) / span;
                return match self.mode {
                    CurveMode::Linear => Some(a.value + (b.value - a.value) * local),
                };
            }
        }
        Some(last.value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn empty_curve_is_a_no_op() {
        let curve = Curve::default();
        assert_eq!(curve.evaluate(0.0), None);
        assert_eq!(curve.evaluate(0.5), None);
        assert_eq!(curve.last_key_time(), None);
    }

    #[test]
    fn single_key_is_constant() {
        let curve = Curve::from_pairs(&[(0.3, 2.0)]);
        assert_eq!(curve.evaluate(0.0), Some(2.0));
        assert_eq!(curve.evaluate(0.3), Some(2.0));
        assert_eq!(curve.evaluate(1.0), Some(2.0));
    }

    #[test]
    fn linear_interpolation_between_keys() {
        let curve = Curve::from_pairs(&[(0.0, 0.0), (1.0, 10.0)]);
        assert_eq!(curve.evaluate(0.5), Some(5.0));
        assert_eq!(curve.evaluate(0.25), Some(2.5));
    }

    #[test]
    fn multi_segment_bracketing() {
        let curve = Curve::from_pairs(&[(0.0, 1.0), (0.5, 0.0), (1.0, 3.0)]);
        assert_eq!(curve.evaluate(0.25), Some(0.5));
        assert_eq!(curve.evaluate(0.75), Some(1.5));
        assert_eq!(curve.evaluate(0.5), Some(0.0));
    }

    #[test]
    fn unsorted_keys_are_sorted_on_construction() {
        let curve = Curve::from_pairs(&[(1.0, 10.0), (0.0, 0.0)]);
        assert_eq!(curve.evaluate(0.5), Some(5.0));
    }

    #[test]
    fn duplicate_key_times_take_the_later_value() {
        let curve = Curve::from_pairs(&[(0.0, 0.0), (0.5, 1.0), (0.5, 2.0), (1.0, 2.0)]);
        // Exactly at the shared time, either side of the step is defensible;
        // past it the later value must win.
        assert_eq!(curve.evaluate(0.6), Some(2.0));
    }

    proptest! {
        // Evaluating at or before the first key always returns the first
        // value, at or after the last key always the last value, and doing
        // so repeatedly never drifts.
        #[test]
        fn clamp_is_idempotent(t in -2.0f32..0.0, keys in proptest::collection::vec((0.0f32..1.0, -10.0f32..10.0), 1..6)) {
            let curve = Curve::from_pairs(&keys);
            let sorted = {
                let mut k = keys.clone();
                k.sort_by(|a, b| a.0.total_cmp(&b.0));
                k
            };
            let below = curve.evaluate(sorted[0].0 + t);
            prop_assert_eq!(below, Some(sorted[0].1));
            prop_assert_eq!(curve.evaluate(sorted[0].0 + t), below);

            let last = sorted[sorted.len() - 1];
            let above = curve.evaluate(last.0 - t);
            prop_assert_eq!(above, Some(last.1));
            prop_assert_eq!(curve.evaluate(last.0 - t), above);
        }

        // Interior evaluation stays within the value envelope of its
        // bracketing keys.
        #[test]
        fn linear_blend_is_bounded(t in 0.0f32..1.0) {
            let curve = Curve::from_pairs(&[(0.0, -1.0), (1.0, 1.0)]);
            let v = curve.evaluate(t).unwrap();
            prop_assert!((-1.0..=1.0).contains(&v));
        }
    }
}
