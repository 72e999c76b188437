use crate::core::matrix::PairwiseMatrix;
use crate::core::outcome::Outcome;
use crate::models::CanonicalMatch;

/// Sum outcomes per (team, opponent) over the canonical match list
///
/// `W[a][b]` is the number of wins (ties count half) of `a` over `b`. Pairs
/// that never met stay undefined.
pub fn aggregate_outcomes(matches: &[CanonicalMatch]) -> PairwiseMatrix {
    let mut wins = PairwiseMatrix::new();

    for m in matches {
        let outcome = Outcome::from_scores(m.score_a, m.score_b);
        wins.add(&m.team_a, &m.team_b, outcome.value());
    }

    tracing::debug!(
        "Outcome matrix built: rows={}, cols={}",
        wins.rows().len(),
        wins.columns().len()
    );

    wins
}
