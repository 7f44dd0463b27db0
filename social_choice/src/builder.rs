pub use crate::config::*;
use crate::run_rule;

use log::debug;
use snafu::ensure;
use std::collections::HashMap;

/// A builder for turning ballots of candidate names into a profile.
///
/// ```
/// pub use social_choice::builder::Builder;
/// pub use social_choice::{Rule, RunOptions};
/// # use social_choice::VotingErrors;
///
/// let mut builder = Builder::new()
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot(&["Bob".to_string(), "".to_string(), "Anna".to_string()])?;
/// builder.add_ballot_weighted(&["Anna".to_string()], 2)?;
///
/// let election = builder.build();
/// assert_eq!(election.profile, vec![vec![1, 0], vec![0], vec![0]]);
///
/// let res = election.run(Rule::Plurality, &RunOptions::DEFAULT_OPTIONS)?;
/// assert_eq!(res.winners().single(), Some(0));
/// # Ok::<(), VotingErrors>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct Builder {
    _candidates: Vec<String>,
    _index: HashMap<String, AltIndex>,
    // If false, unknown names become new candidates.
    _declared: bool,
    _ballots: Profile,
}

impl Builder {
    pub fn new() -> Builder {
        Builder::default()
    }

    /// Declares the candidates. The position of a name in this list is its index.
    ///
    /// Ballots added before this call are discarded.
    pub fn candidates(self, cands: &[String]) -> VotingResult<Builder> {
        let mut index: HashMap<String, AltIndex> = HashMap::new();
        for (idx, name) in cands.iter().enumerate() {
            ensure!(
                index.insert(name.clone(), idx).is_none(),
                DuplicateCandidateSnafu { name: name.clone() }
            );
        }
        Ok(Builder {
            _candidates: cands.to_vec(),
            _index: index,
            _declared: true,
            _ballots: Vec::new(),
        })
    }

    /// Adds the ranking of one voter, most preferred first.
    ///
    /// Empty names are unranked positions and are skipped.
    pub fn add_ballot(&mut self, ranking: &[String]) -> VotingResult<()> {
        self.add_ballot_weighted(ranking, 1)
    }

    /// Adds `count` identical ballots.
    pub fn add_ballot_weighted(&mut self, ranking: &[String], count: u64) -> VotingResult<()> {
        let mut ballot: Ballot = Vec::with_capacity(ranking.len());
        for name in ranking.iter().filter(|n| !n.is_empty()) {
            let known = self._index.get(name).copied();
            let alt = match known {
                Some(alt) => alt,
                None if !self._declared => {
                    let alt = self._candidates.len();
                    debug!("add_ballot: new candidate {:?} -> {}", name, alt);
                    self._candidates.push(name.clone());
                    self._index.insert(name.clone(), alt);
                    alt
                }
                None => {
                    return UnknownCandidateSnafu { name: name.clone() }.fail();
                }
            };
            ballot.push(alt);
        }
        for _ in 0..count {
            self._ballots.push(ballot.clone());
        }
        Ok(())
    }

    pub fn build(self) -> Election {
        Election {
            candidates: self._candidates,
            profile: self._ballots,
        }
    }
}

/// A profile along with the names of its alternatives.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Election {
    pub candidates: Vec<String>,
    pub profile: Profile,
}

impl Election {
    pub fn n_alts(&self) -> usize {
        self.candidates.len()
    }

    pub fn name(&self, alt: AltIndex) -> Option<&str> {
        self.candidates.get(alt).map(|s| s.as_str())
    }

    pub fn run(&self, rule: Rule, options: &RunOptions) -> VotingResult<ElectionResult> {
        run_rule(&self.profile, self.n_alts(), rule, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn infers_candidates() {
        let mut b = Builder::new();
        b.add_ballot(&names(&["C", "A"])).unwrap();
        b.add_ballot(&names(&["A", "B", "C"])).unwrap();
        let e = b.build();
        assert_eq!(e.candidates, names(&["C", "A", "B"]));
        assert_eq!(e.profile, vec![vec![0, 1], vec![1, 2, 0]]);
        assert_eq!(e.name(2), Some("B"));
    }

    #[test]
    fn unknown_candidate() {
        let mut b = Builder::new().candidates(&names(&["A", "B"])).unwrap();
        assert_eq!(
            b.add_ballot(&names(&["A", "Z"])),
            Err(VotingErrors::UnknownCandidate {
                name: "Z".to_string()
            })
        );
    }

    #[test]
    fn duplicate_candidate() {
        assert!(matches!(
            Builder::new().candidates(&names(&["A", "B", "A"])),
            Err(VotingErrors::DuplicateCandidate { .. })
        ));
    }

    #[test]
    fn weighted_ballots() {
        let mut b = Builder::new().candidates(&names(&["A", "B"])).unwrap();
        b.add_ballot_weighted(&names(&["B", "A"]), 3).unwrap();
        b.add_ballot_weighted(&names(&["A"]), 0).unwrap();
        let e = b.build();
        assert_eq!(e.profile.len(), 3);
        let res = e.run(Rule::Copeland, &RunOptions::DEFAULT_OPTIONS).unwrap();
        assert_eq!(res.winners().single(), Some(1));
    }
}
