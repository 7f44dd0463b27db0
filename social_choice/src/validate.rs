use log::debug;
use snafu::ensure;

use crate::config::*;

/// Checks the parameters shared by all the rules.
pub fn check_input(profile: &[Ballot], n_alts: usize) -> VotingResult<()> {
    ensure!(
        n_alts > 0,
        InvalidInputSnafu {
            reason: "the number of alternatives must be positive",
        }
    );
    ensure!(
        !profile.is_empty(),
        InvalidInputSnafu {
            reason: "the profile contains no ballot",
        }
    );
    Ok(())
}

/// Checks that every ballot ranks each alternative of `[0, n_alts)` exactly once.
///
/// The first offending ballot is reported, with its position in the profile.
pub fn validate_full_rankings(profile: &[Ballot], n_alts: usize) -> VotingResult<()> {
    check_input(profile, n_alts)?;
    let mut seen: Vec<bool> = vec![false; n_alts];
    for (position, ballot) in profile.iter().enumerate() {
        seen.iter_mut().for_each(|s| *s = false);
        scan_ballot(position, ballot, &mut seen)?;
        if let Some(missing) = seen.iter().position(|s| !s) {
            debug!(
                "validate_full_rankings: ballot {} misses alternative {}",
                position, missing
            );
            return InvalidBallotSnafu {
                position,
                ballot: ballot.clone(),
                defect: BallotDefect::Missing(missing),
            }
            .fail();
        }
    }
    Ok(())
}

/// Checks that the ballots only hold distinct alternatives of `[0, n_alts)`.
///
/// Ballots may be partial or even empty.
pub fn validate_partial_rankings(profile: &[Ballot], n_alts: usize) -> VotingResult<()> {
    check_input(profile, n_alts)?;
    let mut seen: Vec<bool> = vec![false; n_alts];
    for (position, ballot) in profile.iter().enumerate() {
        seen.iter_mut().for_each(|s| *s = false);
        scan_ballot(position, ballot, &mut seen)?;
    }
    Ok(())
}

// Marks the alternatives of the ballot in `seen`, failing on the first
// out-of-range or repeated entry.
fn scan_ballot(position: usize, ballot: &Ballot, seen: &mut [bool]) -> VotingResult<()> {
    for &alt in ballot.iter() {
        let defect = match seen.get_mut(alt) {
            None => Some(BallotDefect::OutOfRange(alt)),
            Some(true) => Some(BallotDefect::Duplicate(alt)),
            Some(s) => {
                *s = true;
                None
            }
        };
        if let Some(defect) = defect {
            debug!("scan_ballot: ballot {}: {}", position, defect);
            return InvalidBallotSnafu {
                position,
                ballot: ballot.clone(),
                defect,
            }
            .fail();
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_rankings_accepted() {
        let profile = vec![vec![0, 1, 2], vec![2, 0, 1]];
        assert_eq!(validate_full_rankings(&profile, 3), Ok(()));
    }

    #[test]
    fn missing_alternative() {
        let profile = vec![vec![0, 1, 2], vec![2, 0]];
        assert_eq!(
            validate_full_rankings(&profile, 3),
            Err(VotingErrors::InvalidBallot {
                position: 1,
                ballot: vec![2, 0],
                defect: BallotDefect::Missing(1),
            })
        );
    }

    #[test]
    fn duplicate_alternative() {
        let profile = vec![vec![0, 1, 1]];
        assert_eq!(
            validate_full_rankings(&profile, 3),
            Err(VotingErrors::InvalidBallot {
                position: 0,
                ballot: vec![0, 1, 1],
                defect: BallotDefect::Duplicate(1),
            })
        );
    }

    #[test]
    fn too_long_ballot() {
        let profile = vec![vec![1, 0], vec![0, 1, 0]];
        assert!(matches!(
            validate_full_rankings(&profile, 2),
            Err(VotingErrors::InvalidBallot {
                position: 1,
                defect: BallotDefect::Duplicate(0),
                ..
            })
        ));
    }

    #[test]
    fn out_of_range() {
        let profile = vec![vec![0, 3, 1]];
        assert!(matches!(
            validate_full_rankings(&profile, 3),
            Err(VotingErrors::InvalidBallot {
                defect: BallotDefect::OutOfRange(3),
                ..
            })
        ));
        assert!(matches!(
            validate_partial_rankings(&profile, 3),
            Err(VotingErrors::InvalidBallot {
                defect: BallotDefect::OutOfRange(3),
                ..
            })
        ));
    }

    #[test]
    fn partial_rankings() {
        let profile = vec![vec![0], vec![], vec![2, 1]];
        assert_eq!(validate_partial_rankings(&profile, 3), Ok(()));
        assert!(validate_full_rankings(&profile, 3).is_err());
    }

    #[test]
    fn bad_input() {
        assert!(matches!(
            check_input(&[], 3),
            Err(VotingErrors::InvalidInput { .. })
        ));
        assert!(matches!(
            check_input(&[vec![]], 0),
            Err(VotingErrors::InvalidInput { .. })
        ));
    }
}
