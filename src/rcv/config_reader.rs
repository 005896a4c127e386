use crate::rcv::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "contestName")]
    pub contest_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "contestDate")]
    pub contest_date: Option<String>,
    #[serde(rename = "contestJurisdiction")]
    pub contest_jurisdiction: Option<String>,
    #[serde(rename = "contestOffice")]
    pub contest_office: Option<String>,
}

/// The "config" section of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub contest: String,
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub jurisdiction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub office: Option<String>,
}

/// A file containing ballots.
///
/// Providers:
/// - `json`: an array of ballot entries, as in the `ballots` field of the config.
/// - `csv`: one entry per row, with a header and the columns
///   `ballot_id,candidate_id,rank`.
/// - `csv_ranked`: one ballot per row. The columns starting at
///   `firstVoteColumnIndex` hold candidate ids, most preferred first.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct BallotFileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "firstVoteColumnIndex")]
    _first_vote_column_index: Option<JSValue>,
    #[serde(rename = "firstVoteRowIndex")]
    _first_vote_row_index: Option<JSValue>,
    #[serde(rename = "idColumnIndex")]
    pub id_column_index: Option<JSValue>,
}

impl BallotFileSource {
    pub fn new(provider: &str, file_path: &str) -> BallotFileSource {
        BallotFileSource {
            provider: provider.to_string(),
            file_path: file_path.to_string(),
            _first_vote_column_index: None,
            _first_vote_row_index: None,
            id_column_index: None,
        }
    }

    /// 0-based. Defaults to the first column.
    pub fn first_vote_column_index(&self) -> RcvResult<usize> {
        match &self._first_vote_column_index {
            None => Ok(0),
            x => Ok(read_js_int(x)?.saturating_sub(1)),
        }
    }

    /// 1-based, as in spreadsheets. Defaults to the row after the header.
    pub fn first_vote_row_index(&self) -> RcvResult<usize> {
        match &self._first_vote_row_index {
            None => Ok(2),
            x => Ok(read_js_int(x)?.max(1)),
        }
    }

    /// 0-based, if an id column is specified.
    pub fn id_column_index_int(&self) -> RcvResult<Option<usize>> {
        match &self.id_column_index {
            None => Ok(None),
            x => Ok(Some(read_js_int(x)?.saturating_sub(1))),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvCandidate {
    pub id: u32,
    pub name: String,
    pub active: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvBallotEntry {
    #[serde(rename = "ballotId")]
    pub ballot_id: String,
    #[serde(rename = "candidateId")]
    pub candidate_id: u32,
    pub rank: u32,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize, Default)]
pub struct RcvRules {
    #[serde(rename = "tiebreakMode")]
    pub tiebreak_mode: Option<String>,
    #[serde(rename = "randomSeed")]
    pub random_seed: Option<String>,
    #[serde(rename = "unknownCandidates")]
    pub unknown_candidates: Option<String>,
    #[serde(rename = "coombsMajorityStop")]
    pub coombs_majority_stop: Option<bool>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct RcvConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    pub method: Option<String>,
    #[serde(default)]
    pub rules: RcvRules,
    pub candidates: Vec<RcvCandidate>,
    pub ballots: Option<Vec<RcvBallotEntry>>,
    #[serde(rename = "ballotFileSources")]
    pub ballot_file_sources: Option<Vec<BallotFileSource>>,
}

pub fn read_config(path: &str) -> RcvResult<RcvConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let config: RcvConfig =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_config: {:?}", config);
    Ok(config)
}

pub fn read_summary(path: &str) -> RcvResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read content: {:?}", contents);
    let js: JSValue =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    Ok(js)
}

fn read_js_int(x: &Option<JSValue>) -> RcvResult<usize> {
    match x {
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| x as usize)
            .context(ParsingJsonNumberSnafu {}),
        Some(JSValue::String(s)) => s.parse::<usize>().ok().context(ParsingJsonNumberSnafu {}),
        _ => None.context(ParsingJsonNumberSnafu {}),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config() {
        let js = r#"{
            "outputSettings": {"contestName": "c"},
            "candidates": [{"id": 1, "name": "A"}, {"id": 2, "name": "B", "active": false}]
        }"#;
        let config: RcvConfig = serde_json::from_str(js).unwrap();
        assert_eq!(config.method, None);
        assert_eq!(config.rules, RcvRules::default());
        assert_eq!(config.candidates[1].active, Some(false));
        assert!(config.ballots.is_none());
    }

    #[test]
    fn file_source_indices() {
        let js = r#"{"provider": "csv_ranked", "filePath": "x.csv",
                     "firstVoteColumnIndex": "2", "idColumnIndex": 1}"#;
        let cfs: BallotFileSource = serde_json::from_str(js).unwrap();
        assert_eq!(cfs.first_vote_column_index().unwrap(), 1);
        assert_eq!(cfs.id_column_index_int().unwrap(), Some(0));
        assert_eq!(cfs.first_vote_row_index().unwrap(), 2);

        let bad: BallotFileSource =
            serde_json::from_str(r#"{"provider": "csv", "filePath": "x", "idColumnIndex": "one"}"#)
                .unwrap();
        assert!(bad.id_column_index_int().is_err());
    }
}
