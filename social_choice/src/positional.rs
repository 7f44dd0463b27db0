//! Single-pass scoring rules: plurality and Borda count.

use log::{debug, info};

use crate::config::*;
use crate::validate::{validate_full_rankings, validate_partial_rankings};

fn check_ballots(profile: &[Ballot], n_alts: usize, options: PositionalOptions) -> VotingResult<()> {
    if options.require_full_ranking {
        validate_full_rankings(profile, n_alts)
    } else {
        validate_partial_rankings(profile, n_alts)
    }
}

/// Plurality vote: each ballot gives one point to its first choice.
///
/// Empty ballots give no point. All the alternatives with the largest number of
/// first choices are winners.
pub fn plurality(
    profile: &[Ballot],
    n_alts: usize,
    options: PositionalOptions,
) -> VotingResult<RuleOutcome> {
    info!(
        "plurality: {} ballots, {} alternatives, options: {:?}",
        profile.len(),
        n_alts,
        options
    );
    check_ballots(profile, n_alts, options)?;

    let mut scores: ScoreVector = vec![0; n_alts];
    for first in profile.iter().filter_map(|ballot| ballot.first()) {
        scores[*first] += 1;
    }
    debug!("plurality: scores: {:?}", scores);
    Ok(RuleOutcome::from_scores(scores))
}

/// Borda count: the alternative at rank `r` (0 for the first choice) earns
/// `n_alts - r - 1` points.
///
/// A partial ballot only awards the ranks it fills, starting from the top.
pub fn borda(
    profile: &[Ballot],
    n_alts: usize,
    options: PositionalOptions,
) -> VotingResult<RuleOutcome> {
    info!(
        "borda: {} ballots, {} alternatives, options: {:?}",
        profile.len(),
        n_alts,
        options
    );
    check_ballots(profile, n_alts, options)?;

    let mut scores: ScoreVector = vec![0; n_alts];
    for ballot in profile.iter() {
        for (rank, alt) in ballot.iter().enumerate() {
            scores[*alt] += (n_alts - rank - 1) as Score;
        }
    }
    debug!("borda: scores: {:?}", scores);
    Ok(RuleOutcome::from_scores(scores))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plurality_three_way_tie() {
        let profile = vec![vec![0, 1, 2, 3], vec![1, 2, 0, 3], vec![3, 1, 0, 2]];
        let res = plurality(&profile, 4, PositionalOptions::default()).unwrap();
        assert_eq!(res.winners.as_slice(), &[0, 1, 3]);
        assert_eq!(res.scores, vec![1, 1, 0, 1]);
    }

    #[test]
    fn plurality_skips_empty_ballots() {
        let profile = vec![vec![], vec![2], vec![2, 0], vec![1]];
        let res = plurality(&profile, 3, PositionalOptions::PERMISSIVE).unwrap();
        assert_eq!(res.winners.single(), Some(2));
        assert_eq!(res.scores, vec![0, 1, 2]);
    }

    #[test]
    fn plurality_all_empty_ballots() {
        let profile = vec![vec![], vec![]];
        let res = plurality(&profile, 2, PositionalOptions::PERMISSIVE).unwrap();
        assert_eq!(res.winners.as_slice(), &[0, 1]);
    }

    #[test]
    fn plurality_strict_mode_rejects_partial() {
        let profile = vec![vec![0, 1], vec![1]];
        assert!(matches!(
            plurality(&profile, 2, PositionalOptions::STRICT),
            Err(VotingErrors::InvalidBallot {
                position: 1,
                defect: BallotDefect::Missing(0),
                ..
            })
        ));
    }

    #[test]
    fn plurality_bad_input() {
        assert!(matches!(
            plurality(&[], 2, PositionalOptions::PERMISSIVE),
            Err(VotingErrors::InvalidInput { .. })
        ));
        assert!(matches!(
            plurality(&[vec![0]], 0, PositionalOptions::PERMISSIVE),
            Err(VotingErrors::InvalidInput { .. })
        ));
    }

    #[test]
    fn borda_scores() {
        let profile = vec![vec![0, 1, 2], vec![1, 0, 2], vec![1, 2, 0]];
        let res = borda(&profile, 3, PositionalOptions::STRICT).unwrap();
        assert_eq!(res.scores, vec![3, 5, 1]);
        assert_eq!(res.winners.single(), Some(1));
    }

    #[test]
    fn borda_tie() {
        let profile = vec![vec![0, 1, 2], vec![1, 0, 2]];
        let res = borda(&profile, 3, PositionalOptions::default()).unwrap();
        assert_eq!(res.winners.as_slice(), &[0, 1]);
    }

    #[test]
    fn borda_partial_ballots() {
        // Only the filled ranks earn points.
        let profile = vec![vec![2], vec![0, 2]];
        let res = borda(&profile, 3, PositionalOptions::PERMISSIVE).unwrap();
        assert_eq!(res.scores, vec![2, 0, 3]);
        assert_eq!(res.winners.single(), Some(2));
    }

    #[test]
    fn borda_strict_mode() {
        let profile = vec![vec![2], vec![0, 2, 1]];
        assert!(matches!(
            borda(&profile, 3, PositionalOptions::STRICT),
            Err(VotingErrors::InvalidBallot { position: 0, .. })
        ));
    }

    #[test]
    fn borda_rejects_duplicates_even_when_permissive() {
        let profile = vec![vec![1, 1]];
        assert!(matches!(
            borda(&profile, 3, PositionalOptions::PERMISSIVE),
            Err(VotingErrors::InvalidBallot {
                defect: BallotDefect::Duplicate(1),
                ..
            })
        ));
    }
}
