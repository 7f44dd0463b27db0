// ********* Input data structures ***********

use serde::{Deserialize, Serialize};
use snafu::Snafu;
use std::fmt::Display;
use std::str::FromStr;

/// The index of an alternative, in `[0, n_alts)`.
///
/// Names or any other metadata about the alternatives are kept by the caller.
pub type AltIndex = usize;

/// One voter's ranking, most preferred alternative first.
///
/// A ballot may be a full ranking (every alternative exactly once) or a
/// partial one that omits some alternatives.
pub type Ballot = Vec<AltIndex>;

/// The collection of ballots of one election.
pub type Profile = Vec<Ballot>;

pub type Score = i64;

/// Scores indexed by alternative.
pub type ScoreVector = Vec<Score>;

// ******** Output data structures *********

/// The alternatives selected by a rule, in increasing order.
///
/// Never empty when returned by one of the rules: ties are kept, not collapsed.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<AltIndex>", into = "Vec<AltIndex>")]
pub struct WinnerSet(Vec<AltIndex>);

impl WinnerSet {
    pub(crate) fn from_unsorted(mut alts: Vec<AltIndex>) -> WinnerSet {
        alts.sort_unstable();
        alts.dedup();
        WinnerSet(alts)
    }

    /// All the alternatives reaching the maximum of the scores.
    pub(crate) fn argmax(scores: &[Score]) -> WinnerSet {
        match scores.iter().max() {
            Some(max_score) => WinnerSet(
                scores
                    .iter()
                    .enumerate()
                    .filter(|(_, s)| *s == max_score)
                    .map(|(alt, _)| alt)
                    .collect(),
            ),
            None => WinnerSet(Vec::new()),
        }
    }

    pub fn single(&self) -> Option<AltIndex> {
        match self.0.as_slice() {
            [alt] => Some(*alt),
            _ => None,
        }
    }

    pub fn is_unique(&self) -> bool {
        self.0.len() == 1
    }

    pub fn contains(&self, alt: AltIndex) -> bool {
        self.0.binary_search(&alt).is_ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AltIndex> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[AltIndex] {
        &self.0
    }
}

impl From<Vec<AltIndex>> for WinnerSet {
    fn from(alts: Vec<AltIndex>) -> WinnerSet {
        WinnerSet::from_unsorted(alts)
    }
}

impl From<WinnerSet> for Vec<AltIndex> {
    fn from(ws: WinnerSet) -> Vec<AltIndex> {
        ws.0
    }
}

/// The result of a scoring rule: the winners and the scores they were selected from.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RuleOutcome {
    pub winners: WinnerSet,
    pub scores: ScoreVector,
}

impl RuleOutcome {
    pub(crate) fn from_scores(scores: ScoreVector) -> RuleOutcome {
        RuleOutcome {
            winners: WinnerSet::argmax(&scores),
            scores,
        }
    }
}

/// Statistics for one round of instant-runoff voting.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IrvRound {
    /// Starts at 1.
    pub round: u32,
    /// The votes of every alternative still running at the start of the round.
    pub tally: Vec<(AltIndex, u64)>,
    /// Ballots that did not rank any remaining alternative.
    pub exhausted: u64,
    /// None for the last round.
    pub eliminated: Option<AltIndex>,
    /// True if several alternatives were tied for elimination.
    pub tie_broken: bool,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct IrvOutcome {
    pub winners: WinnerSet,
    pub rounds: Vec<IrvRound>,
}

/// What makes a ballot fail the full-ranking check.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
pub enum BallotDefect {
    OutOfRange(AltIndex),
    Duplicate(AltIndex),
    Missing(AltIndex),
}

impl Display for BallotDefect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BallotDefect::OutOfRange(alt) => write!(f, "alternative {} is out of range", alt),
            BallotDefect::Duplicate(alt) => write!(f, "alternative {} is ranked twice", alt),
            BallotDefect::Missing(alt) => write!(f, "alternative {} is not ranked", alt),
        }
    }
}

/// Errors that prevent a rule from completing.
#[derive(Eq, PartialEq, Debug, Clone, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum VotingErrors {
    #[snafu(display("Invalid input: {reason}"))]
    InvalidInput { reason: String },
    #[snafu(display("Invalid ballot at position {position} {ballot:?}: {defect}"))]
    InvalidBallot {
        position: usize,
        ballot: Ballot,
        defect: BallotDefect,
    },
    #[snafu(display("Unknown candidate {name:?}"))]
    UnknownCandidate { name: String },
    #[snafu(display("Candidate {name:?} is declared twice"))]
    DuplicateCandidate { name: String },
}

pub type VotingResult<T> = Result<T, VotingErrors>;

// ********* Configuration **********

/// Options for the positional rules (plurality and Borda count).
#[derive(Eq, PartialEq, Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionalOptions {
    /// If true, every ballot must rank all the alternatives exactly once.
    /// Otherwise partial ballots are accepted, which is the historical behaviour.
    pub require_full_ranking: bool,
}

impl PositionalOptions {
    pub const PERMISSIVE: PositionalOptions = PositionalOptions {
        require_full_ranking: false,
    };
    pub const STRICT: PositionalOptions = PositionalOptions {
        require_full_ranking: true,
    };
}

impl Default for PositionalOptions {
    fn default() -> Self {
        PositionalOptions::PERMISSIVE
    }
}

/// How instant-runoff voting picks one alternative among those tied for elimination.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum TieBreakMode {
    /// A total order over the alternatives, highest priority to survive first.
    /// The tied alternative that comes last in this order is eliminated.
    UseOrdering(Vec<AltIndex>),
    /// Uniform choice, drawn from a ChaCha generator seeded with this value.
    Random(u64),
}

/// The rules implemented by this crate.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rule {
    Plurality,
    Borda,
    #[serde(rename = "irv")]
    InstantRunoff,
    Copeland,
}

impl Rule {
    pub const ALL: [Rule; 4] = [
        Rule::Plurality,
        Rule::Borda,
        Rule::InstantRunoff,
        Rule::Copeland,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Rule::Plurality => "plurality",
            Rule::Borda => "borda",
            Rule::InstantRunoff => "irv",
            Rule::Copeland => "copeland",
        }
    }
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Rule {
    type Err = VotingErrors;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plurality" => Ok(Rule::Plurality),
            "borda" => Ok(Rule::Borda),
            "irv" | "instant_runoff" | "instantrunoff" => Ok(Rule::InstantRunoff),
            "copeland" => Ok(Rule::Copeland),
            x => InvalidInputSnafu {
                reason: format!("unknown rule {:?}", x),
            }
            .fail(),
        }
    }
}

/// All the options needed to run any of the rules.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RunOptions {
    pub positional: PositionalOptions,
    /// Only used by instant-runoff voting.
    pub tiebreak: TieBreakMode,
}

impl RunOptions {
    /// Permissive positional rules, random tie-break with a fixed seed.
    pub const DEFAULT_OPTIONS: RunOptions = RunOptions {
        positional: PositionalOptions::PERMISSIVE,
        tiebreak: TieBreakMode::Random(0),
    };
}

/// The outcome of any rule.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub enum ElectionResult {
    Scored(RuleOutcome),
    Runoff(IrvOutcome),
}

impl ElectionResult {
    pub fn winners(&self) -> &WinnerSet {
        match self {
            ElectionResult::Scored(o) => &o.winners,
            ElectionResult::Runoff(o) => &o.winners,
        }
    }
}
