use crate::rcv::*;

/// Reads a JSON array of ballot entries, in the same format as the `ballots`
/// field of the election description.
pub fn read_json_entries(path: &str) -> RcvResult<Vec<RcvBallotEntry>> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    let entries: Vec<RcvBallotEntry> =
        serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })?;
    debug!("read_json_entries: {}: {} entries", path, entries.len());
    Ok(entries)
}
