use log::{debug, info};
use std::cmp::Ordering;

use crate::config::*;
use crate::pairwise::{pairwise_matrix, PairwiseMatrix};

/// Copeland's rule: +1 for every pairwise victory, -1 for every pairwise defeat.
///
/// Requires full rankings. In a Condorcet cycle several alternatives share the
/// top score and are all returned.
pub fn copeland(profile: &[Ballot], n_alts: usize) -> VotingResult<RuleOutcome> {
    info!(
        "copeland: {} ballots, {} alternatives",
        profile.len(),
        n_alts
    );
    let matrix = pairwise_matrix(profile, n_alts)?;
    let scores = copeland_scores(&matrix);
    debug!("copeland: scores: {:?}", scores);
    Ok(RuleOutcome::from_scores(scores))
}

/// Net pairwise wins of every alternative. Pairwise ties count for nothing.
pub fn copeland_scores(matrix: &PairwiseMatrix) -> ScoreVector {
    let n_alts = matrix.n_alts();
    (0..n_alts)
        .map(|i| {
            (0..n_alts)
                .map(|j| match matrix.get(i, j).cmp(&matrix.get(j, i)) {
                    Ordering::Greater => 1,
                    Ordering::Less => -1,
                    Ordering::Equal => 0,
                })
                .sum()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn condorcet_cycle() {
        let profile = vec![vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]];
        let res = copeland(&profile, 3).unwrap();
        assert_eq!(res.scores, vec![0, 0, 0]);
        assert_eq!(res.winners.as_slice(), &[0, 1, 2]);
    }

    #[test]
    fn condorcet_winner_wins() {
        let profile = vec![
            vec![0, 1, 2, 3],
            vec![1, 0, 3, 2],
            vec![0, 3, 2, 1],
            vec![2, 0, 1, 3],
        ];
        let res = copeland(&profile, 4).unwrap();
        assert_eq!(res.winners.single(), Some(0));
        assert_eq!(res.scores[0], 3);
    }

    #[test]
    fn pairwise_ties_count_zero() {
        let profile = vec![vec![0, 1], vec![1, 0]];
        let res = copeland(&profile, 2).unwrap();
        assert_eq!(res.scores, vec![0, 0]);
        assert_eq!(res.winners.as_slice(), &[0, 1]);
    }

    #[test]
    fn rejects_duplicate() {
        let profile = vec![vec![0, 1, 2], vec![2, 2, 1]];
        assert!(matches!(
            copeland(&profile, 3),
            Err(VotingErrors::InvalidBallot {
                position: 1,
                defect: BallotDefect::Duplicate(2),
                ..
            })
        ));
    }
}
