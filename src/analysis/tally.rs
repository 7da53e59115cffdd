//! Vote tallies and per-pass aggregation
//!
//! Bins are keyed by the BPM rounded half-up to an integer and scanned in
//! ascending key order. A bin only takes the lead with a strictly greater
//! weight, so on a tie the lowest BPM wins.

use super::collector::Reading;
use std::collections::BTreeMap;
use std::ops::AddAssign;

/// Round a positive BPM half-up to the nearest integer
pub fn round_half_up(bpm: f32) -> i32 {
    (bpm + 0.5).floor() as i32
}

/// Integer BPM bins with accumulated weight
#[derive(Debug, Clone, Default)]
pub struct VoteTally<W> {
    bins: BTreeMap<i32, W>,
}

impl<W> VoteTally<W>
where
    W: Copy + Default + PartialOrd + AddAssign,
{
    pub fn new() -> Self {
        Self {
            bins: BTreeMap::new(),
        }
    }

    pub fn add(&mut self, bpm: f32, weight: W) {
        *self.bins.entry(round_half_up(bpm)).or_default() += weight;
    }

    pub fn weight(&self, bin: i32) -> W {
        self.bins.get(&bin).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Bin with the strictly greatest weight; None if nothing outweighs zero
    pub fn winner(&self) -> Option<i32> {
        let mut best = None;
        let mut best_weight = W::default();
        for (&bin, &weight) in &self.bins {
            if weight > best_weight {
                best_weight = weight;
                best = Some(bin);
            }
        }
        best
    }
}

/// Confidence-weighted histogram vote over one pass
pub fn weighted_histogram(readings: &[Reading]) -> Option<i32> {
    let mut tally = VoteTally::<f32>::new();
    for reading in readings {
        tally.add(reading.bpm, reading.confidence);
    }
    tally.winner()
}

/// Plain majority vote over per-pass results
pub fn majority_vote(results: &[f32]) -> Option<i32> {
    let mut tally = VoteTally::<u32>::new();
    for &bpm in results {
        tally.add(bpm, 1);
    }
    tally.winner()
}

/// Median; the mean of the two central values for an even count
pub fn median(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));

    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        Some(sorted[mid])
    } else {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reading(bpm: f32, confidence: f32) -> Reading {
        Reading { bpm, confidence }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(117.5), 118);
        assert_eq!(round_half_up(117.49), 117);
        assert_eq!(round_half_up(66.0), 66);
    }

    #[test]
    fn test_weighted_histogram_prefers_heavier_bin() {
        let readings = [reading(118.0, 0.9), reading(118.0, 0.9), reading(130.0, 0.2)];
        assert_eq!(weighted_histogram(&readings), Some(118));
    }

    #[test]
    fn test_weighted_histogram_merges_nearby_readings() {
        let readings = [
            reading(129.6, 0.3),
            reading(130.4, 0.3),
            reading(118.0, 0.5),
        ];
        assert_eq!(weighted_histogram(&readings), Some(130));
    }

    #[test]
    fn test_weighted_histogram_empty() {
        assert_eq!(weighted_histogram(&[]), None);
    }

    #[test]
    fn test_ties_go_to_lowest_bpm() {
        let readings = [reading(140.0, 0.5), reading(70.0, 0.5)];
        assert_eq!(weighted_histogram(&readings), Some(70));
        assert_eq!(majority_vote(&[128.0, 64.0, 128.0, 64.0]), Some(64));
    }

    #[test]
    fn test_majority_vote() {
        assert_eq!(majority_vote(&[66.2, 120.0, 65.9, 131.0, 66.0]), Some(66));
        assert_eq!(majority_vote(&[]), None);
    }

    #[test]
    fn test_tally_weights() {
        let mut tally = VoteTally::<u32>::new();
        assert!(tally.is_empty());
        tally.add(99.6, 1);
        tally.add(100.4, 2);
        assert_eq!(tally.weight(100), 3);
        assert_eq!(tally.weight(101), 0);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[120.0, 100.0, 110.0]), Some(110.0));
        assert_eq!(median(&[130.0, 100.0, 120.0, 110.0]), Some(115.0));
        assert_eq!(median(&[97.5]), Some(97.5));
        assert_eq!(median(&[]), None);
    }
}
