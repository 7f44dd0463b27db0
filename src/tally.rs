use log::{debug, info, warn};

use social_choice::builder::{Builder, Election};
use social_choice::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

mod config_reader;
mod io_common;
mod io_csv;
mod io_json;

use crate::tally::config_reader::*;

#[derive(Debug, Snafu)]
pub enum TallyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive index in the configuration"))]
    ParsingJsonNumber {},
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("No ballot file: use --input or a fileSource in the configuration"))]
    MissingInput {},

    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error parsing CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("CSV line {lineno}: expected a count, got {cell:?}"))]
    CsvCountParse { lineno: usize, cell: String },

    #[snafu(display("Invalid list of candidates"))]
    InvalidCandidates { source: VotingErrors },
    #[snafu(display("Ballot {id} could not be read"))]
    InvalidBallotInput { source: VotingErrors, id: String },
    #[snafu(display("Invalid rule"))]
    InvalidRule { source: VotingErrors },
    #[snafu(display("Rule {rule} failed"))]
    Voting { source: VotingErrors, rule: Rule },

    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type TallyResult<T> = Result<T, TallyError>;

/// A ballot, as parsed by the readers.
/// This is before mapping the candidate names to alternatives.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct ParsedBallot {
    pub id: Option<String>,
    pub count: Option<u64>,
    pub choices: Vec<String>,
}

fn name_of(election: &Election, alt: AltIndex) -> String {
    election
        .name(alt)
        .map(|s| s.to_string())
        .unwrap_or_else(|| alt.to_string())
}

fn winners_to_json(election: &Election, winners: &WinnerSet) -> JSValue {
    json!(winners
        .iter()
        .map(|alt| name_of(election, *alt))
        .collect::<Vec<String>>())
}

fn result_to_json(election: &Election, rule: Rule, res: &ElectionResult) -> JSValue {
    match res {
        ElectionResult::Scored(outcome) => {
            let mut scores: JSMap<String, JSValue> = JSMap::new();
            for (alt, score) in outcome.scores.iter().enumerate() {
                scores.insert(name_of(election, alt), json!(score));
            }
            json!({
                "rule": rule.name(),
                "winners": winners_to_json(election, &outcome.winners),
                "scores": scores,
            })
        }
        ElectionResult::Runoff(outcome) => {
            let mut rounds: Vec<JSValue> = Vec::new();
            for round in outcome.rounds.iter() {
                let mut tally: JSMap<String, JSValue> = JSMap::new();
                for (alt, count) in round.tally.iter() {
                    tally.insert(name_of(election, *alt), json!(count));
                }
                rounds.push(json!({
                    "round": round.round,
                    "tally": tally,
                    "exhausted": round.exhausted,
                    "eliminated": round.eliminated.map(|alt| name_of(election, alt)),
                    "tieBroken": round.tie_broken,
                }));
            }
            json!({
                "rule": rule.name(),
                "winners": winners_to_json(election, &outcome.winners),
                "rounds": rounds,
            })
        }
    }
}

fn build_summary_js(
    config: Option<&TallyConfig>,
    election: &Election,
    results: &[(Rule, ElectionResult)],
) -> JSValue {
    let settings = config.map(|c| c.output_settings.clone());
    let c = OutputConfig {
        contest: settings
            .as_ref()
            .map(|s| s.contest_name.clone())
            .unwrap_or_default(),
        date: settings.as_ref().and_then(|s| s.contest_date.clone()),
        jurisdiction: settings
            .as_ref()
            .and_then(|s| s.contest_jurisdiction.clone()),
        office: settings.as_ref().and_then(|s| s.contest_office.clone()),
        candidates: election.candidates.clone(),
        ballots: election.profile.len(),
    };
    let results_js: Vec<JSValue> = results
        .iter()
        .map(|(rule, res)| result_to_json(election, *rule, res))
        .collect();
    json!({
        "config": c,
        "results": results_js })
}

// The path of the ballot file, and how to read it.
fn resolve_file_source(
    args: &Args,
    config: Option<&TallyConfig>,
) -> TallyResult<(String, FileSource)> {
    if let Some(input) = args.input.clone() {
        let provider = args.input_type.clone().unwrap_or_else(|| "csv".to_string());
        let cfs = match config.and_then(|c| c.file_source.clone()) {
            // Keep the column settings of the configuration.
            Some(cfs) => FileSource {
                provider,
                file_path: input.clone(),
                ..cfs
            },
            None => FileSource::from_path(&provider, &input),
        };
        return Ok((input, cfs));
    }

    let mut cfs = config
        .and_then(|c| c.file_source.clone())
        .context(MissingInputSnafu {})?;
    if let Some(provider) = args.input_type.clone() {
        cfs.provider = provider;
    }
    // Relative paths are resolved against the directory of the configuration.
    let config_path = args.config.clone().context(MissingInputSnafu {})?;
    let root_p = Path::new(&config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let p = root_p.join(&cfs.file_path).display().to_string();
    Ok((p, cfs))
}

fn read_ranking_data(
    path: &str,
    cfs: &FileSource,
) -> TallyResult<(Option<Vec<String>>, Vec<ParsedBallot>)> {
    info!("Attempting to read rank file {:?}", path);
    match cfs.provider.as_str() {
        "csv" => Ok((None, io_csv::read_csv_ranking(path, cfs)?)),
        "json" => io_json::read_json_ballots(path),
        x => whatever!("Provider not implemented {:?}", x),
    }
}

fn build_election(
    parsed_ballots: &[ParsedBallot],
    candidates: Option<Vec<String>>,
) -> TallyResult<Election> {
    let mut builder = match candidates {
        Some(cands) => Builder::new()
            .candidates(&cands)
            .context(InvalidCandidatesSnafu {})?,
        None => Builder::new(),
    };
    for pb in parsed_ballots.iter() {
        let id = pb.id.clone().unwrap_or_default();
        // Default of 1 if not specified
        let count = pb.count.unwrap_or(1);
        if count == 0 {
            warn!("build_election: ballot {}: count of zero, skipping", id);
            continue;
        }
        if pb.choices.iter().all(|c| c.is_empty()) {
            warn!("build_election: ballot {} is empty", id);
        }
        builder
            .add_ballot_weighted(&pb.choices, count)
            .context(InvalidBallotInputSnafu { id })?;
    }
    let election = builder.build();
    info!(
        "build_election: {} ballots, candidates: {:?}",
        election.profile.len(),
        election.candidates
    );
    Ok(election)
}

fn select_rules(args: &Args, config: Option<&TallyConfig>) -> TallyResult<Vec<Rule>> {
    if let Some(names) = &args.rule {
        let mut rules: Vec<Rule> = Vec::new();
        for name in names.iter() {
            rules.push(name.parse::<Rule>().context(InvalidRuleSnafu {})?);
        }
        return Ok(rules);
    }
    let from_config = config
        .and_then(|c| c.rules.as_ref())
        .and_then(|r| r.rules.clone());
    Ok(from_config.unwrap_or_else(|| Rule::ALL.to_vec()))
}

fn select_options(
    args: &Args,
    config: Option<&TallyConfig>,
    n_alts: usize,
) -> TallyResult<RunOptions> {
    let rules = config.and_then(|c| c.rules.clone());
    let require_full_ranking = args.require_full_ranking
        || rules
            .as_ref()
            .and_then(|r| r.require_full_ranking)
            .unwrap_or(false);

    let tiebreak = match (args.seed, rules.as_ref().and_then(|r| r.tiebreak_mode.clone())) {
        (Some(seed), _) => TieBreakMode::Random(seed),
        (None, None) => RunOptions::DEFAULT_OPTIONS.tiebreak,
        (None, Some(mode)) => match mode.as_str() {
            // The declared order of the candidates is their priority to survive.
            "useCandidateOrder" => TieBreakMode::UseOrdering((0..n_alts).collect()),
            "random" => {
                let seed = match rules
                    .as_ref()
                    .and_then(|r| r.random_seed.clone())
                    .map(|s| s.parse::<u64>())
                {
                    Some(Ok(x)) => x,
                    x => {
                        whatever!("Cannot use tiebreak mode random with seed {:?}", x)
                    }
                };
                TieBreakMode::Random(seed)
            }
            x => {
                whatever!("Cannot use tiebreak mode {:?} (currently not implemented)", x)
            }
        },
    };

    Ok(RunOptions {
        positional: PositionalOptions {
            require_full_ranking,
        },
        tiebreak,
    })
}

fn write_output(out: Option<&str>, pretty_js_stats: &str) -> TallyResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js_stats).context(WritingOutputSnafu { path })?;
        }
    }
    Ok(())
}

fn check_reference(summary_p: &str, pretty_js_stats: &str) -> TallyResult<()> {
    let summary_ref = read_summary(summary_p)?;
    debug!("summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(ParsingJsonSnafu {})?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference string");
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

pub fn run_election(args: &Args) -> TallyResult<()> {
    let config: Option<TallyConfig> = match &args.config {
        Some(config_path) => Some(read_config(config_path)?),
        None => None,
    };
    info!("config: {:?}", config);

    let (path, cfs) = resolve_file_source(args, config.as_ref())?;
    let (listed_candidates, parsed_ballots) = read_ranking_data(&path, &cfs)?;
    debug!("data: {:?}", parsed_ballots);

    // The candidates of the configuration come first, then the ones listed in
    // the input. Otherwise they are inferred from the ballots.
    let candidates: Option<Vec<String>> = config
        .as_ref()
        .and_then(|c| c.candidates.as_ref())
        .map(|cs| cs.iter().map(|c| c.name.clone()).collect())
        .or(listed_candidates);
    let election = build_election(&parsed_ballots, candidates)?;

    let rules = select_rules(args, config.as_ref())?;
    let options = select_options(args, config.as_ref(), election.n_alts())?;

    let mut results: Vec<(Rule, ElectionResult)> = Vec::new();
    for rule in rules {
        let res = election.run(rule, &options).context(VotingSnafu { rule })?;
        let winner_names: Vec<String> = res
            .winners()
            .iter()
            .map(|alt| name_of(&election, *alt))
            .collect();
        info!("{}: winners: {:?}", rule, winner_names);
        results.push((rule, res));
    }

    // Assemble the final json
    let result_js = build_summary_js(config.as_ref(), &election, &results);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(ParsingJsonSnafu {})?;
    write_output(args.out.as_deref(), &pretty_js_stats)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = &args.reference {
        check_reference(summary_p, &pretty_js_stats)?;
    }

    Ok(())
}
