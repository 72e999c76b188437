/// Result of one side of a match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Loss,
    Tie,
}

impl Outcome {
    /// Compare `score` against `opponent_score`; ties are exact equality
    #[inline]
    pub fn from_scores(score: f64, opponent_score: f64) -> Self {
        if score > opponent_score {
            Outcome::Win
        } else if score == opponent_score {
            Outcome::Tie
        } else {
            Outcome::Loss
        }
    }

    /// Numeric value: 1.0 win, 0.5 tie, 0.0 loss
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Tie => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// Round to two decimal places, halves to even (`0.125 -> 0.12`, `0.375 -> 0.38`)
#[inline]
pub fn round_rate(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_from_scores() {
        assert_eq!(Outcome::from_scores(10.0, 8.0), Outcome::Win);
        assert_eq!(Outcome::from_scores(8.0, 10.0), Outcome::Loss);
        assert_eq!(Outcome::from_scores(5.0, 5.0), Outcome::Tie);
    }

    #[test]
    fn test_outcomes_are_complementary() {
        for (a, b) in [(3.0, 1.0), (1.0, 3.0), (2.0, 2.0), (0.0, 0.5)] {
            let total = Outcome::from_scores(a, b).value() + Outcome::from_scores(b, a).value();
            assert_eq!(total, 1.0);
        }
    }

    #[test]
    fn test_round_rate_half_to_even() {
        assert_eq!(round_rate(0.125), 0.12);
        assert_eq!(round_rate(0.375), 0.38);
        assert_eq!(round_rate(2.0 / 3.0), 0.67);
        assert_eq!(round_rate(1.0 / 3.0), 0.33);
        assert_eq!(round_rate(0.5), 0.5);
    }
}
