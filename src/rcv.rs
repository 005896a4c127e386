mod config_reader;
mod io_common;
mod io_csv;
mod io_json;

use log::{debug, info, warn};

use ranked_tabulation::*;
use snafu::{prelude::*, Snafu};

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Map as JSMap;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::rcv::config_reader::*;

#[derive(Debug, Snafu)]
pub enum RcvError {
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("Expected a positive integer"))]
    ParsingJsonNumber {},
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading CSV line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("CSV line {lineno} is too short"))]
    CsvLineTooShort { lineno: usize },
    #[snafu(display("CSV line {lineno}: column {column} is not a positive integer: {value:?}"))]
    CsvField {
        lineno: usize,
        column: String,
        value: String,
    },
    #[snafu(display("Unknown ballot file provider {provider:?}"))]
    UnknownProvider { provider: String },
    #[snafu(display("Unknown tabulation method {label:?}"))]
    UnknownMethod { label: String },
    #[snafu(display("Invalid value for rule {rule}: {value:?}"))]
    InvalidRule { rule: String, value: String },
    #[snafu(display("No election description provided (use --config)"))]
    MissingConfig {},
    #[snafu(display("Cannot find the directory of {path}"))]
    MissingParentDir { path: String },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Tabulation failed"))]
    Tabulation { source: TabulationErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type RcvResult<T> = Result<T, RcvError>;

fn result_stats_to_json(rs: &TabulationResult) -> Vec<JSValue> {
    let mut l: Vec<JSValue> = Vec::new();
    for round_stat in rs.round_stats.iter() {
        let mut tally: JSMap<String, JSValue> = JSMap::new();
        for (name, count) in round_stat.tally.iter() {
            tally.insert(name.clone(), json!(count.to_string()));
        }

        let mut tally_results: Vec<JSValue> = Vec::new();
        for name in round_stat.tally_result_eliminated.iter() {
            tally_results.push(json!({ "eliminated": name }));
        }
        for name in round_stat.tally_results_elected.iter() {
            tally_results.push(json!({ "elected": name }));
        }

        let js = json!({
            "round": round_stat.round,
            "tally": tally,
            "exhausted": round_stat.exhausted.to_string(),
            "tallyResults": tally_results
        });
        l.push(js);
    }
    l
}

fn pair_decisions_to_json(rs: &TabulationResult) -> Vec<JSValue> {
    rs.pair_decisions
        .iter()
        .map(|pd| {
            json!({
                "winner": pd.winner,
                "loser": pd.loser,
                "margin": pd.margin.to_string(),
                "locked": pd.locked
            })
        })
        .collect()
}

fn outcome_to_json(outcome: &Outcome) -> JSValue {
    match outcome {
        Outcome::Winner(c) => json!({ "winner": { "id": c.id.0, "name": c.name } }),
        Outcome::NoWinner(reason) => json!({ "noWinner": reason.label() }),
    }
}

fn build_summary_js(config: &RcvConfig, rv: &TabulationResult) -> JSValue {
    let c = OutputConfig {
        contest: config.output_settings.contest_name.clone(),
        method: rv.method.label().to_string(),
        date: config.output_settings.contest_date.clone(),
        jurisdiction: config.output_settings.contest_jurisdiction.clone(),
        office: config.output_settings.contest_office.clone(),
    };
    json!({
        "config": c,
        "outcome": outcome_to_json(&rv.outcome),
        "results": result_stats_to_json(rv),
        "pairs": pair_decisions_to_json(rv),
    })
}

fn validate_rules(rcv_rules: &RcvRules) -> RcvResult<TabulationRules> {
    let tiebreak_mode = match rcv_rules.tiebreak_mode.as_deref() {
        None | Some("eliminateAllTied") => TieBreakMode::EliminateAllTied,
        Some("useCandidateOrder") => TieBreakMode::UseCandidateOrder,
        Some("random") => {
            let seed_s = rcv_rules.random_seed.clone().unwrap_or_default();
            let seed = seed_s.parse::<u32>().ok().context(InvalidRuleSnafu {
                rule: "randomSeed",
                value: seed_s.clone(),
            })?;
            TieBreakMode::Random(seed)
        }
        Some(x) => {
            return InvalidRuleSnafu {
                rule: "tiebreakMode",
                value: x,
            }
            .fail();
        }
    };
    let unknown_candidate_mode = match rcv_rules.unknown_candidates.as_deref() {
        None | Some("drop") => UnknownCandidateMode::Drop,
        Some("reject") => UnknownCandidateMode::Reject,
        Some(x) => {
            return InvalidRuleSnafu {
                rule: "unknownCandidates",
                value: x,
            }
            .fail();
        }
    };
    Ok(TabulationRules {
        tiebreak_mode,
        unknown_candidate_mode,
        coombs_majority_stop: rcv_rules.coombs_majority_stop.unwrap_or(false),
    })
}

/// The method on the command line must be one of the known labels. The method
/// in the configuration file falls back to instant runoff.
fn validate_method(cli_method: &Option<String>, config: &RcvConfig) -> RcvResult<Method> {
    match (cli_method, &config.method) {
        (Some(label), _) => Method::parse_strict(label).context(UnknownMethodSnafu { label }),
        (None, Some(label)) => Ok(Method::from_label(label)),
        (None, None) => Ok(Method::default()),
    }
}

fn read_ballot_data(root_path: &Path, cfs: &BallotFileSource) -> RcvResult<Vec<RcvBallotEntry>> {
    let p: PathBuf = root_path.join(&cfs.file_path);
    let p2 = p.as_path().display().to_string();
    info!("Attempting to read ballot file {:?}", p2);
    match cfs.provider.as_str() {
        "csv" => io_csv::read_csv_entries(&p2, cfs),
        "csv_ranked" => io_csv::read_csv_ranking(&p2, cfs),
        "json" => io_json::read_json_entries(&p2),
        x => UnknownProviderSnafu { provider: x }.fail(),
    }
}

fn convert_candidates(config: &RcvConfig) -> Vec<Candidate> {
    config
        .candidates
        .iter()
        .map(|c| Candidate {
            id: CandidateId(c.id),
            name: c.name.clone(),
            active: c.active.unwrap_or(true),
        })
        .collect()
}

fn write_summary(pretty_js: &str, out_path: &Option<String>) -> RcvResult<()> {
    match out_path.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingOutputSnafu { path })
        }
    }
}

/// Runs an election described by a configuration file.
///
/// Arguments:
/// * `config_path` the JSON election description.
/// * `check_summary_path` a reference summary. The run fails if the computed
/// summary differs from it.
/// * `out_path` where to write the summary: a file, or `stdout`. Defaults to
/// the `outputDirectory` of the configuration, or to the standard output.
/// * `in_path`, `in_type` a ballot file replacing the ballots of the configuration.
/// * `method` a method label replacing the method of the configuration.
pub fn run_election(
    config_path: &Option<String>,
    check_summary_path: &Option<String>,
    out_path: &Option<String>,
    in_path: &Option<String>,
    in_type: &Option<String>,
    method: &Option<String>,
) -> RcvResult<()> {
    let config_path = config_path.as_deref().context(MissingConfigSnafu {})?;
    let config = read_config(config_path)?;
    info!("config: {:?}", config);

    let rules = validate_rules(&config.rules)?;
    let method = validate_method(method, &config)?;

    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu { path: config_path })?;

    let mut data: Vec<RcvBallotEntry> = Vec::new();
    if let Some(input) = in_path {
        let provider = in_type.clone().unwrap_or_else(|| "csv".to_string());
        let cfs = BallotFileSource::new(&provider, input);
        // Relative to the working directory, not to the configuration.
        data.extend(read_ballot_data(Path::new(""), &cfs)?);
    } else {
        if let Some(ballots) = &config.ballots {
            data.extend(ballots.iter().cloned());
        }
        for cfs in config.ballot_file_sources.iter().flatten() {
            data.extend(read_ballot_data(root_p, cfs)?);
        }
    }
    if data.is_empty() {
        warn!("No ballot entries found for contest {:?}", config.output_settings.contest_name);
    }
    debug!("data: {:?}", data);

    let candidates = convert_candidates(&config);
    let entries: Vec<BallotEntry> = data
        .iter()
        .map(|e| BallotEntry::new(&e.ballot_id, e.candidate_id, e.rank))
        .collect();

    let result = tabulate(method, &candidates, &entries, &rules).context(TabulationSnafu {})?;
    info!("result: {:?}", result);

    let result_js = build_summary_js(&config, &result);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(SerializingJsonSnafu {})?;

    let out_path = match (out_path, &config.output_settings.output_directory) {
        (Some(p), _) => Some(p.clone()),
        (None, Some(dir)) => Some(
            root_p
                .join(dir)
                .join("summary.json")
                .display()
                .to_string(),
        ),
        (None, None) => None,
    };
    write_summary(&pretty_js_stats, &out_path)?;

    // The reference summary, if provided for comparison
    if let Some(summary_p) = check_summary_path {
        let summary_ref = read_summary(summary_p)?;
        if summary_ref != result_js {
            let pretty_js_summary_ref =
                serde_json::to_string_pretty(&summary_ref).context(SerializingJsonSnafu {})?;
            warn!("Found differences with the reference string");
            print_diff(
                pretty_js_summary_ref.as_str(),
                pretty_js_stats.as_ref(),
                "\n",
            );
            whatever!("Difference detected between calculated summary and reference summary")
        }
    }

    Ok(())
}

#[cfg(test)]
fn run_election_test(test_name: &str, config_lpath: &str, summary_lpath: &str) -> RcvResult<()> {
    let test_dir = format!("{}/tests/data", env!("CARGO_MANIFEST_DIR"));
    info!("Running test {}", test_name);
    run_election(
        &Some(format!("{}/{}/{}", test_dir, test_name, config_lpath)),
        &Some(format!("{}/{}/{}", test_dir, test_name, summary_lpath)),
        &Some(std::env::temp_dir().join(format!("rcvtab_{}.json", test_name)).display().to_string()),
        &None,
        &None,
        &None,
    )
}

#[cfg(test)]
pub fn test_wrapper(test_name: &str) {
    let _ = env_logger::try_init();
    let res = run_election_test(
        test_name,
        format!("{}_config.json", test_name).as_str(),
        format!("{}_expected_summary.json", test_name).as_str(),
    );
    if let Err(e) = res {
        panic!("test {} failed: {}: {:?}", test_name, e, e);
    }
}
