use log::{debug, info};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use snafu::{ensure, OptionExt};

use crate::config::*;
use crate::validate::check_input;

// How to pick the alternative to eliminate among the tied ones.
enum Eliminator<'a, R: Rng + ?Sized> {
    Ordering(&'a [AltIndex]),
    Random(&'a mut R),
}

/// Runs instant-runoff voting.
///
/// With `TieBreakMode::Random(seed)`, the ties are broken with a ChaCha generator
/// seeded from `seed`: the same seed always gives the same outcome.
///
/// ```
/// use social_choice::{instant_runoff, TieBreakMode};
///
/// let profile = vec![vec![0, 1, 2], vec![1, 0, 2], vec![2, 1, 0]];
/// let outcome = instant_runoff(&profile, 3, &TieBreakMode::UseOrdering(vec![0, 1, 2]))?;
/// assert_eq!(outcome.winners.single(), Some(1));
/// # Ok::<(), social_choice::VotingErrors>(())
/// ```
pub fn instant_runoff(
    profile: &[Ballot],
    n_alts: usize,
    tiebreak: &TieBreakMode,
) -> VotingResult<IrvOutcome> {
    match tiebreak {
        TieBreakMode::UseOrdering(ordering) => {
            run_rounds::<ChaCha8Rng>(profile, n_alts, Eliminator::Ordering(ordering))
        }
        TieBreakMode::Random(seed) => {
            let mut rng = ChaCha8Rng::seed_from_u64(*seed);
            run_rounds(profile, n_alts, Eliminator::Random(&mut rng))
        }
    }
}

/// Runs instant-runoff voting with an explicit source of randomness.
///
/// If `ordering` is provided, it takes precedence and `rng` is never used.
pub fn instant_runoff_with_rng<R: Rng + ?Sized>(
    profile: &[Ballot],
    n_alts: usize,
    ordering: Option<&[AltIndex]>,
    rng: &mut R,
) -> VotingResult<IrvOutcome> {
    match ordering {
        Some(ordering) => run_rounds::<R>(profile, n_alts, Eliminator::Ordering(ordering)),
        None => run_rounds(profile, n_alts, Eliminator::Random(rng)),
    }
}

fn check_ordering(ordering: &[AltIndex], n_alts: usize) -> VotingResult<()> {
    let mut seen = vec![false; n_alts];
    for &alt in ordering.iter() {
        ensure!(
            alt < n_alts && !seen[alt],
            InvalidInputSnafu {
                reason: format!(
                    "tie-break ordering {:?} is not a permutation of the {} alternatives",
                    ordering, n_alts
                ),
            }
        );
        seen[alt] = true;
    }
    ensure!(
        ordering.len() == n_alts,
        InvalidInputSnafu {
            reason: format!(
                "tie-break ordering {:?} does not rank all the {} alternatives",
                ordering, n_alts
            ),
        }
    );
    Ok(())
}

fn run_rounds<R: Rng + ?Sized>(
    profile: &[Ballot],
    n_alts: usize,
    mut eliminator: Eliminator<'_, R>,
) -> VotingResult<IrvOutcome> {
    info!(
        "instant_runoff: {} ballots, {} alternatives",
        profile.len(),
        n_alts
    );
    check_input(profile, n_alts)?;
    if let Eliminator::Ordering(ordering) = &eliminator {
        check_ordering(ordering, n_alts)?;
    }

    // The alternatives still running. Never empty.
    let mut remaining: Vec<bool> = vec![true; n_alts];
    let mut num_remaining = n_alts;
    let mut rounds: Vec<IrvRound> = Vec::new();

    loop {
        let round_id = (rounds.len() + 1) as u32;
        let (tally, exhausted) = compute_tally(profile, &remaining);
        debug!(
            "instant_runoff: round {}: tally: {:?} exhausted: {}",
            round_id, tally, exhausted
        );

        // A strict majority of all the ballots, exhausted ones included.
        let majority: Vec<AltIndex> = tally
            .iter()
            .filter(|(_, count)| 2 * count > profile.len() as u64)
            .map(|(alt, _)| *alt)
            .collect();
        if !majority.is_empty() || num_remaining == 1 {
            let winners = if majority.is_empty() {
                tally.iter().map(|(alt, _)| *alt).collect()
            } else {
                majority
            };
            info!(
                "instant_runoff: round {}: winners: {:?}",
                round_id, winners
            );
            rounds.push(IrvRound {
                round: round_id,
                tally,
                exhausted,
                eliminated: None,
                tie_broken: false,
            });
            return Ok(IrvOutcome {
                winners: WinnerSet::from_unsorted(winners),
                rounds,
            });
        }

        let (loser, tie_broken) = find_eliminated_alternative(&tally, &mut eliminator)?;
        info!(
            "instant_runoff: round {}: eliminating {} (tie broken: {})",
            round_id, loser, tie_broken
        );
        remaining[loser] = false;
        num_remaining -= 1;
        rounds.push(IrvRound {
            round: round_id,
            tally,
            exhausted,
            eliminated: Some(loser),
            tie_broken,
        });
    }
}

/// The votes of the remaining alternatives, in increasing order of alternative,
/// and the number of exhausted ballots.
///
/// A ballot goes to its first alternative that is still running. Entries that
/// are not valid alternatives are skipped like eliminated ones.
fn compute_tally(profile: &[Ballot], remaining: &[bool]) -> (Vec<(AltIndex, u64)>, u64) {
    let mut counts: Vec<u64> = vec![0; remaining.len()];
    let mut exhausted: u64 = 0;
    for ballot in profile.iter() {
        match ballot
            .iter()
            .find(|alt| remaining.get(**alt).copied().unwrap_or(false))
        {
            Some(alt) => counts[*alt] += 1,
            None => exhausted += 1,
        }
    }
    let tally = counts
        .into_iter()
        .enumerate()
        .filter(|(alt, _)| remaining[*alt])
        .collect();
    (tally, exhausted)
}

// Returns the alternative to eliminate, and whether a tie had to be broken.
fn find_eliminated_alternative<R: Rng + ?Sized>(
    tally: &[(AltIndex, u64)],
    eliminator: &mut Eliminator<'_, R>,
) -> VotingResult<(AltIndex, bool)> {
    let min_count = tally
        .iter()
        .map(|(_, count)| *count)
        .min()
        .context(InvalidInputSnafu {
            reason: "no alternative left to eliminate",
        })?;
    let all_smallest: Vec<AltIndex> = tally
        .iter()
        .filter(|(_, count)| *count == min_count)
        .map(|(alt, _)| *alt)
        .collect();
    debug!(
        "find_eliminated_alternative: all_smallest: {:?}",
        all_smallest
    );

    // No tiebreak, the logic below is not relevant.
    if let [single] = all_smallest.as_slice() {
        return Ok((*single, false));
    }

    let loser = match eliminator {
        // The ordering lists the alternatives by priority to survive: the tied
        // alternative coming last is eliminated.
        Eliminator::Ordering(ordering) => ordering
            .iter()
            .rev()
            .find(|alt| all_smallest.contains(alt))
            .copied(),
        Eliminator::Random(rng) => all_smallest.choose(&mut **rng).copied(),
    }
    .context(InvalidInputSnafu {
        reason: format!("could not break the tie between {:?}", all_smallest),
    })?;
    debug!(
        "find_eliminated_alternative: tie between {:?} broken against {}",
        all_smallest, loser
    );
    Ok((loser, true))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn by_order(ordering: &[AltIndex]) -> TieBreakMode {
        TieBreakMode::UseOrdering(ordering.to_vec())
    }

    #[test]
    fn majority_in_first_round() {
        let profile = vec![vec![1, 0, 2], vec![1, 2, 0], vec![0, 1, 2]];
        let res = instant_runoff(&profile, 3, &by_order(&[0, 1, 2])).unwrap();
        assert_eq!(res.winners.single(), Some(1));
        assert_eq!(res.rounds.len(), 1);
        assert_eq!(res.rounds[0].tally, vec![(0, 1), (1, 2), (2, 0)]);
        assert_eq!(res.rounds[0].eliminated, None);
    }

    #[test]
    fn tiebreak_ordering_trace() {
        init();
        let profile = vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 2, 3],
            vec![3, 1, 0, 2],
            vec![3, 1, 2, 0],
        ];
        let res = instant_runoff(&profile, 4, &by_order(&[0, 1, 2, 3])).unwrap();
        let eliminated: Vec<Option<AltIndex>> = res.rounds.iter().map(|r| r.eliminated).collect();
        assert_eq!(eliminated, vec![Some(2), Some(1), Some(3), None]);
        assert_eq!(
            res.rounds[0].tally,
            vec![(0, 2), (1, 0), (2, 0), (3, 2)]
        );
        assert!(res.rounds[0].tie_broken);
        assert!(!res.rounds[1].tie_broken);
        assert_eq!(res.rounds[1].tally, vec![(0, 2), (1, 0), (3, 2)]);
        assert_eq!(res.rounds[2].tally, vec![(0, 2), (3, 2)]);
        assert!(res.rounds[2].tie_broken);
        assert_eq!(res.rounds[3].tally, vec![(0, 4)]);
        assert_eq!(res.winners.single(), Some(0));
    }

    #[test]
    fn reversed_ordering_changes_winner() {
        init();
        let profile = vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 2, 3],
            vec![3, 1, 0, 2],
            vec![3, 1, 2, 0],
        ];
        let res = instant_runoff(&profile, 4, &by_order(&[3, 2, 1, 0])).unwrap();
        assert_eq!(res.winners.single(), Some(3));
        assert_eq!(res.rounds[0].eliminated, Some(1));
    }

    #[test]
    fn exhausted_ballots_count_against_majority() {
        init();
        // 2 of 5 ballots are exhausted once 2 is out: 0 never reaches 3 votes
        // until it is the last alternative.
        let profile = vec![vec![0], vec![0], vec![1], vec![2], vec![2, 1]];
        let res = instant_runoff(&profile, 3, &by_order(&[0, 1, 2])).unwrap();
        assert_eq!(res.rounds[0].eliminated, Some(1));
        assert_eq!(res.rounds[1].exhausted, 1);
        assert_eq!(res.rounds[1].tally, vec![(0, 2), (2, 2)]);
        assert_eq!(res.rounds[1].eliminated, Some(2));
        assert_eq!(res.rounds[2].exhausted, 3);
        assert_eq!(res.winners.single(), Some(0));
    }

    #[test]
    fn all_ballots_empty() {
        let profile = vec![vec![], vec![]];
        let res = instant_runoff(&profile, 2, &by_order(&[1, 0])).unwrap();
        assert_eq!(res.rounds[0].exhausted, 2);
        assert_eq!(res.rounds[0].eliminated, Some(0));
        assert_eq!(res.winners.single(), Some(1));
    }

    #[test]
    fn single_alternative() {
        let res = instant_runoff(&[vec![]], 1, &TieBreakMode::Random(3)).unwrap();
        assert_eq!(res.winners.single(), Some(0));
        assert_eq!(res.rounds.len(), 1);
    }

    #[test]
    fn out_of_range_entries_are_skipped() {
        let profile = vec![vec![7, 1], vec![1], vec![0]];
        let res = instant_runoff(&profile, 2, &by_order(&[0, 1])).unwrap();
        assert_eq!(res.rounds[0].tally, vec![(0, 1), (1, 2)]);
        assert_eq!(res.winners.single(), Some(1));
    }

    #[test]
    fn random_is_reproducible() {
        init();
        let profile = vec![vec![0, 1], vec![1, 0], vec![2, 0], vec![3, 1]];
        let first = instant_runoff(&profile, 4, &TieBreakMode::Random(42)).unwrap();
        for _ in 0..5 {
            let again = instant_runoff(&profile, 4, &TieBreakMode::Random(42)).unwrap();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn explicit_rng() {
        init();
        let profile = vec![vec![0], vec![1]];
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let res = instant_runoff_with_rng(&profile, 2, None, &mut rng).unwrap();
        assert!(res.winners.is_unique());
        assert!(res.rounds[0].tie_broken);

        // The ordering wins over the generator.
        let res = instant_runoff_with_rng(&profile, 2, Some(&[1, 0]), &mut rng).unwrap();
        assert_eq!(res.winners.single(), Some(1));
    }

    #[test]
    fn bad_ordering() {
        let profile = vec![vec![0, 1, 2]];
        for ordering in [vec![0, 1], vec![0, 1, 1], vec![0, 1, 3]] {
            assert!(matches!(
                instant_runoff(&profile, 3, &TieBreakMode::UseOrdering(ordering)),
                Err(VotingErrors::InvalidInput { .. })
            ));
        }
    }

    #[test]
    fn bad_input() {
        assert!(matches!(
            instant_runoff(&[], 3, &TieBreakMode::Random(0)),
            Err(VotingErrors::InvalidInput { .. })
        ));
        assert!(matches!(
            instant_runoff(&[vec![0]], 0, &TieBreakMode::Random(0)),
            Err(VotingErrors::InvalidInput { .. })
        ));
    }
}
