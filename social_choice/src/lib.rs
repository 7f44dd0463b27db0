/*!
Computes the winners of an election from a profile of ranked ballots.

Alternatives are identified by their index in `[0, n_alts)` and a ballot lists
them from the most preferred to the least preferred. The following rules are
implemented, each as an independent function:

* [`plurality`]: most first choices
* [`borda`]: positional points, `n_alts - rank - 1` per ballot
* [`instant_runoff`]: repeated elimination of the alternative with the fewest
  first choices until one holds a strict majority
* [`copeland`]: pairwise victories minus pairwise defeats, computed from the
  [`pairwise_matrix`]

Ties are never collapsed: every rule returns a [`WinnerSet`].

```
use social_choice::*;

let profile = vec![vec![0, 1, 2], vec![1, 2, 0], vec![2, 0, 1]];
// A Condorcet cycle: everyone is tied.
let res = copeland(&profile, 3)?;
assert_eq!(res.scores, vec![0, 0, 0]);
assert_eq!(res.winners.len(), 3);
# Ok::<(), VotingErrors>(())
```

See the [`manual`] for the command line program.
*/

mod config;
mod copeland;
mod irv;
mod pairwise;
mod positional;
mod validate;

pub mod builder;
pub mod manual;

use log::info;

pub use crate::config::*;
pub use crate::copeland::{copeland, copeland_scores};
pub use crate::irv::{instant_runoff, instant_runoff_with_rng};
pub use crate::pairwise::{pairwise_matrix, PairwiseMatrix};
pub use crate::positional::{borda, plurality};
pub use crate::validate::{check_input, validate_full_rankings, validate_partial_rankings};

/// Runs one of the rules on a profile.
///
/// The rules do not depend on each other: this is only a convenience to run
/// several of them on the same profile.
pub fn run_rule(
    profile: &[Ballot],
    n_alts: usize,
    rule: Rule,
    options: &RunOptions,
) -> VotingResult<ElectionResult> {
    info!("run_rule: {} with options {:?}", rule, options);
    let res = match rule {
        Rule::Plurality => ElectionResult::Scored(plurality(profile, n_alts, options.positional)?),
        Rule::Borda => ElectionResult::Scored(borda(profile, n_alts, options.positional)?),
        Rule::InstantRunoff => {
            ElectionResult::Runoff(instant_runoff(profile, n_alts, &options.tiebreak)?)
        }
        Rule::Copeland => ElectionResult::Scored(copeland(profile, n_alts)?),
    };
    info!("run_rule: {}: winners {:?}", rule, res.winners());
    Ok(res)
}
