use clap::Parser;

/// This is a tabulation program for ranked ballots under several social choice rules.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON.
    /// For more information about the file format, read the documentation of the `manual` module.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, sctally will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Otherwise it is printed on the standard output.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) The file with the ballots. Setting this option overrides the file source
    /// that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// (plurality, borda, irv or copeland) The rules to run. May be repeated. All the rules are run by default.
    #[clap(long, value_parser)]
    pub rule: Option<Vec<String>>,

    /// (number) Breaks the elimination ties of irv at random, using this seed.
    #[clap(long, value_parser)]
    pub seed: Option<u64>,

    /// If passed as an argument, plurality and borda reject the ballots that do not rank every candidate.
    #[clap(long, takes_value = false)]
    pub require_full_ranking: bool,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
