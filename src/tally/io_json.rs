// Reading ballots from JSON documents.

use crate::tally::{io_common::make_default_id, *};

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
enum JsonBallot {
    Ranking(Vec<String>),
    Weighted {
        id: Option<String>,
        count: Option<u64>,
        ranking: Vec<String>,
    },
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
struct JsonBallots {
    candidates: Option<Vec<String>>,
    ballots: Vec<JsonBallot>,
}

/// Reads the candidates (if listed) and the ballots.
///
/// A ballot is either a list of names or an object with a `ranking` and an
/// optional `id` and `count`.
pub fn read_json_ballots(path: &str) -> TallyResult<(Option<Vec<String>>, Vec<ParsedBallot>)> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let parsed: JsonBallots = serde_json::from_str(&contents).context(ParsingJsonSnafu {})?;
    let default_id = make_default_id(path);
    let ballots = parsed
        .ballots
        .into_iter()
        .enumerate()
        .map(|(idx, jb)| match jb {
            JsonBallot::Ranking(choices) => ParsedBallot {
                id: Some(default_id(idx + 1)),
                count: None,
                choices,
            },
            JsonBallot::Weighted { id, count, ranking } => ParsedBallot {
                id: id.or_else(|| Some(default_id(idx + 1))),
                count,
                choices: ranking,
            },
        })
        .collect();
    Ok((parsed.candidates, ballots))
}
