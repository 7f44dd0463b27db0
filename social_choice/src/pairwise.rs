use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::config::*;
use crate::validate::validate_full_rankings;

/// Counts, for every ordered pair `(i, j)`, the ballots ranking `i` above `j`.
///
/// Invariants for a profile of full rankings:
/// * `get(i, i) == 0`
/// * `get(i, j) + get(j, i)` is the number of ballots for `i != j`
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseMatrix {
    n_alts: usize,
    // Row-major
    counts: Vec<u64>,
}

impl PairwiseMatrix {
    pub fn n_alts(&self) -> usize {
        self.n_alts
    }

    /// The number of ballots preferring `i` over `j`.
    ///
    /// Panics if `i` or `j` is not an alternative of the matrix.
    pub fn get(&self, i: AltIndex, j: AltIndex) -> u64 {
        assert!(
            i < self.n_alts && j < self.n_alts,
            "pair ({}, {}) out of range for {} alternatives",
            i,
            j,
            self.n_alts
        );
        self.counts[i * self.n_alts + j]
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u64]> {
        self.counts.chunks(self.n_alts)
    }

    /// True if a strict majority of the compared ballots prefer `i` over `j`.
    pub fn beats(&self, i: AltIndex, j: AltIndex) -> bool {
        self.get(i, j) > self.get(j, i)
    }

    /// The alternative beating every other one head to head, if any.
    ///
    /// There is none when the pairwise preferences form a cycle or when a pairwise
    /// comparison is tied.
    pub fn condorcet_winner(&self) -> Option<AltIndex> {
        (0..self.n_alts).find(|&i| (0..self.n_alts).all(|j| i == j || self.beats(i, j)))
    }
}

/// Builds the pairwise majority matrix of a profile of full rankings.
///
/// Fails with `InvalidBallot` if a ballot does not rank every alternative exactly once.
pub fn pairwise_matrix(profile: &[Ballot], n_alts: usize) -> VotingResult<PairwiseMatrix> {
    info!(
        "pairwise_matrix: {} ballots, {} alternatives",
        profile.len(),
        n_alts
    );
    validate_full_rankings(profile, n_alts)?;

    let mut counts: Vec<u64> = vec![0; n_alts * n_alts];
    // position[alt] is the rank of alt in the current ballot.
    let mut position: Vec<usize> = vec![0; n_alts];
    for ballot in profile.iter() {
        for (rank, alt) in ballot.iter().enumerate() {
            position[*alt] = rank;
        }
        for i in 0..n_alts {
            let row = &mut counts[i * n_alts..(i + 1) * n_alts];
            for (j, count) in row.iter_mut().enumerate() {
                if position[i] < position[j] {
                    *count += 1;
                }
            }
        }
    }
    let matrix = PairwiseMatrix { n_alts, counts };
    debug!("pairwise_matrix: {:?}", matrix);
    Ok(matrix)
}
