use clap::Parser;

/// This is a ranked-choice tabulation program: instant runoff, ranked pairs and Coombs.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) The file containing the election description in JSON format:
    /// candidates, rules, and the ballots or the files that contain them.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,
    /// (file path) A reference file containing the outcome of an election in JSON format. If provided, rcvtab will
    /// check that the tabulated output matches the reference.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    /// (file path, 'stdout' or empty) If specified, the summary of the election will be written in JSON format to the given
    /// location. Setting this option overrides the directory that may be specified with the --config option.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path or empty) A file of ballot entries. Setting this option overrides the ballot sources of
    /// the --config option.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (default csv) The type of the input: csv, csv_ranked or json.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// ('Instant Runoff', 'Ranked Pairs' or 'Coombs') The tabulation method. Setting this option overrides
    /// the method of the --config option. Unlike in the configuration file, an unknown method is an error.
    #[clap(short, long, value_parser)]
    pub method: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
