//! Octave and ratio correction
//!
//! Tempo trackers regularly lock onto a harmonic of the real tempo (half
//! time, double time, a triplet feel). Instead of trusting the raw value we
//! score a fixed set of rational multiples of it against where tempos tend
//! to sit musically, plus a few corrections for failure modes seen in
//! practice, and keep the best.

/// An inclusive BPM interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BpmRange {
    pub min: f32,
    pub max: f32,
}

impl BpmRange {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, bpm: f32) -> bool {
        bpm >= self.min && bpm <= self.max
    }
}

/// How a candidate is derived from the raw BPM
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ratio {
    /// The raw value itself, untouched
    Identity,
    Times(f32),
    Over(f32),
}

impl Ratio {
    pub fn apply(self, bpm: f32) -> f32 {
        match self {
            Ratio::Identity => bpm,
            Ratio::Times(factor) => bpm * factor,
            Ratio::Over(divisor) => bpm / divisor,
        }
    }
}

/// Candidate multipliers, in scoring order
pub const CANDIDATE_RATIOS: [Ratio; 15] = [
    Ratio::Identity,
    Ratio::Times(2.0),
    Ratio::Over(2.0),
    Ratio::Times(1.5),
    Ratio::Over(1.5),
    Ratio::Times(4.0),
    Ratio::Over(4.0),
    Ratio::Times(3.0),
    Ratio::Over(3.0),
    Ratio::Times(1.25),
    Ratio::Over(1.25),
    Ratio::Times(1.33),
    Ratio::Over(1.33),
    // ~117 -> ~50
    Ratio::Over(2.3),
    // ~117 -> ~130
    Ratio::Times(1.11),
];

/// Candidates outside this range are never considered
pub const PLAUSIBLE_RANGE: BpmRange = BpmRange::new(40.0, 200.0);

/// Raw detections in these ranges are usually right
pub const GOOD_RANGES: [BpmRange; 2] = [BpmRange::new(100.0, 140.0), BpmRange::new(45.0, 55.0)];

const KEEP_GOOD_BONUS: u32 = 25;
const KEEP_BONUS: u32 = 10;

/// First matching range wins
pub const RANGE_BONUSES: [(BpmRange, u32); 6] = [
    (BpmRange::new(100.0, 140.0), 15),
    (BpmRange::new(45.0, 55.0), 15),
    (BpmRange::new(90.0, 100.0), 12),
    (BpmRange::new(140.0, 160.0), 12),
    (BpmRange::new(60.0, 90.0), 8),
    (BpmRange::new(160.0, 180.0), 8),
];

const OTHER_RANGE_BONUS: u32 = 2;

/// Known tracker mistake: a raw value in `raw` usually means the tempo is in `candidate`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrectionRule {
    pub raw: BpmRange,
    pub candidate: BpmRange,
    pub bonus: u32,
}

/// First matching rule wins
pub const CORRECTION_RULES: [CorrectionRule; 5] = [
    CorrectionRule {
        raw: BpmRange::new(60.0, 85.0),
        candidate: BpmRange::new(45.0, 55.0),
        bonus: 10,
    },
    CorrectionRule {
        raw: BpmRange::new(60.0, 70.0),
        candidate: BpmRange::new(125.0, 135.0),
        bonus: 10,
    },
    CorrectionRule {
        raw: BpmRange::new(115.0, 120.0),
        candidate: BpmRange::new(125.0, 135.0),
        bonus: 8,
    },
    CorrectionRule {
        raw: BpmRange::new(115.0, 120.0),
        candidate: BpmRange::new(45.0, 55.0),
        bonus: 8,
    },
    CorrectionRule {
        raw: BpmRange::new(130.0, 135.0),
        candidate: BpmRange::new(105.0, 110.0),
        bonus: 8,
    },
];

/// All candidates derived from `raw`, before range filtering
pub fn candidates(raw: f32) -> impl Iterator<Item = f32> {
    CANDIDATE_RATIOS.iter().map(move |ratio| ratio.apply(raw))
}

/// Musical plausibility score of `candidate` as a correction of `raw`
pub fn score_candidate(raw: f32, candidate: f32) -> u32 {
    let mut score = 0;

    // Exact comparison: the identity candidate is `raw` itself
    if candidate == raw {
        score += if GOOD_RANGES.iter().any(|range| range.contains(raw)) {
            KEEP_GOOD_BONUS
        } else {
            KEEP_BONUS
        };
    }

    score += RANGE_BONUSES
        .iter()
        .find(|(range, _)| range.contains(candidate))
        .map_or(OTHER_RANGE_BONUS, |&(_, bonus)| bonus);

    score += CORRECTION_RULES
        .iter()
        .find(|rule| rule.raw.contains(raw) && rule.candidate.contains(candidate))
        .map_or(0, |rule| rule.bonus);

    score
}

/// Pick the most plausible tempo among the multiples of `raw`.
/// Returns `raw` unchanged when no candidate is plausible.
pub fn correct_bpm(raw: f32) -> f32 {
    let mut best_bpm = raw;
    let mut best_score = 0;

    for candidate in candidates(raw) {
        if !PLAUSIBLE_RANGE.contains(candidate) {
            continue;
        }
        let score = score_candidate(raw, candidate);
        if score > best_score {
            best_score = score;
            best_bpm = candidate;
        }
    }

    if best_bpm != raw {
        log::debug!(
            "Corrected raw BPM {:.1} to {:.1} (score {})",
            raw,
            best_bpm,
            best_score
        );
    }
    best_bpm
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_good_detections_are_kept() {
        for raw in [100.0, 117.0, 120.0, 128.0, 132.0, 140.0, 45.0, 50.0, 55.0] {
            assert_eq!(correct_bpm(raw), raw, "raw {}", raw);
        }
    }

    #[test]
    fn test_66_corrects_to_132() {
        // 132 (15 + 10) ties 52.8 and 49.6 but is seen first
        assert_eq!(score_candidate(66.0, 66.0), 18);
        assert_eq!(score_candidate(66.0, 132.0), 25);
        assert_eq!(score_candidate(66.0, 66.0 / 1.25), 25);
        assert_eq!(correct_bpm(66.0), 132.0);
    }

    #[test]
    fn test_78_corrects_to_52() {
        assert_eq!(correct_bpm(78.0), 52.0);
    }

    #[test]
    fn test_every_correction_rule_fires() {
        let cases = [
            (70.0, 50.0, 10),
            (65.0, 130.0, 10),
            (118.0, 130.0, 8),
            (118.0, 50.0, 8),
            (132.0, 108.0, 8),
        ];
        for (i, (raw, candidate, bonus)) in cases.into_iter().enumerate() {
            let rule = CORRECTION_RULES[i];
            assert!(rule.raw.contains(raw) && rule.candidate.contains(candidate));
            assert_eq!(rule.bonus, bonus);

            let range_bonus = RANGE_BONUSES
                .iter()
                .find(|(range, _)| range.contains(candidate))
                .map_or(OTHER_RANGE_BONUS, |&(_, b)| b);
            assert_eq!(score_candidate(raw, candidate), range_bonus + bonus);
        }
    }

    #[test]
    fn test_range_bonuses_are_first_match() {
        assert_eq!(score_candidate(1.0, 100.0), 15);
        assert_eq!(score_candidate(1.0, 95.0), 12);
        assert_eq!(score_candidate(1.0, 140.0), 15);
        assert_eq!(score_candidate(1.0, 150.0), 12);
        assert_eq!(score_candidate(1.0, 90.0), 12);
        assert_eq!(score_candidate(1.0, 75.0), 8);
        assert_eq!(score_candidate(1.0, 170.0), 8);
        assert_eq!(score_candidate(1.0, 58.0), 2);
        assert_eq!(score_candidate(1.0, 190.0), 2);
    }

    #[test]
    fn test_no_plausible_candidate_returns_raw() {
        assert_eq!(correct_bpm(1000.0), 1000.0);
        assert_eq!(correct_bpm(5.0), 5.0);
    }

    #[test]
    fn test_implausible_raw_is_pulled_into_range() {
        assert_eq!(correct_bpm(10.0), 40.0);
        assert_eq!(correct_bpm(400.0), 100.0);
    }

    #[test]
    fn test_result_is_plausible_whenever_a_candidate_is() {
        for raw in 1..=1200 {
            let raw = raw as f32 * 0.5;
            let any_plausible = candidates(raw).any(|c| PLAUSIBLE_RANGE.contains(c));
            let corrected = correct_bpm(raw);
            if any_plausible {
                assert!(PLAUSIBLE_RANGE.contains(corrected), "raw {} -> {}", raw, corrected);
            } else {
                assert_eq!(corrected, raw);
            }
        }
    }

    #[test]
    fn test_candidate_order() {
        let all: Vec<f32> = candidates(120.0).collect();
        assert_eq!(all.len(), 15);
        assert_eq!(all[0], 120.0);
        assert_eq!(all[1], 240.0);
        assert_eq!(all[2], 60.0);
        assert_eq!(all[13], 120.0 / 2.3);
    }
}
