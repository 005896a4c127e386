// Primitives for reading CSV files.

use std::fs::File;

use crate::rcv::{io_common::make_default_id, *};

/// Reads one ballot entry per row: `ballot_id,candidate_id,rank`.
///
/// The rows before `firstVoteRowIndex` are skipped (by default, the header).
pub fn read_csv_entries(path: &str, cfs: &BallotFileSource) -> RcvResult<Vec<RcvBallotEntry>> {
    let mut res: Vec<RcvBallotEntry> = Vec::new();
    let (records, row_offset) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        debug!("read_csv_entries: lineno: {:?} row: {:?}", lineno, line);
        if line.iter().all(|s| s.trim().is_empty()) {
            continue;
        }
        let ballot_id = line.get(0).context(CsvLineTooShortSnafu { lineno })?;
        let candidate_id = read_int(line.get(1), lineno, "candidate_id")?;
        let rank = read_int(line.get(2), lineno, "rank")?;
        res.push(RcvBallotEntry {
            ballot_id: ballot_id.trim().to_string(),
            candidate_id,
            rank,
        });
    }
    Ok(res)
}

/// Reads one ballot per row. The cells from `firstVoteColumnIndex` onwards hold
/// candidate ids, the first one being ranked 1. Blank cells are skipped and leave
/// a gap in the ranks.
pub fn read_csv_ranking(path: &str, cfs: &BallotFileSource) -> RcvResult<Vec<RcvBallotEntry>> {
    let default_id = make_default_id(path);

    let id_idx_o = cfs.id_column_index_int()?;
    let choices_start_col = cfs.first_vote_column_index()?;

    let mut res: Vec<RcvBallotEntry> = Vec::new();
    let (records, row_offset) = get_records(path, cfs)?;

    for (idx, line_r) in records.enumerate() {
        let lineno = idx + row_offset;
        let line = line_r.context(CsvLineParseSnafu { lineno })?;
        let ballot_id = if let Some(id_idx) = id_idx_o {
            line.get(id_idx)
                .context(CsvLineTooShortSnafu { lineno })?
                .trim()
                .to_string()
        } else {
            default_id(lineno)
        };

        let mut num_choices = 0;
        for (pos, cell) in line.iter().skip(choices_start_col).enumerate() {
            if cell.trim().is_empty() {
                continue;
            }
            let candidate_id = read_int(Some(cell), lineno, "choice")?;
            res.push(RcvBallotEntry {
                ballot_id: ballot_id.clone(),
                candidate_id,
                rank: (pos + 1) as u32,
            });
            num_choices += 1;
        }
        debug!(
            "read_csv_ranking: lineno: {:?} ballot: {:?} choices: {:?}",
            lineno, ballot_id, num_choices
        );
        if num_choices == 0 {
            warn!("read_csv_ranking: {}: ballot {} is blank", path, ballot_id);
        }
    }
    Ok(res)
}

fn read_int(cell: Option<&str>, lineno: usize, column: &str) -> RcvResult<u32> {
    let s = cell.context(CsvLineTooShortSnafu { lineno })?.trim();
    s.parse::<u32>().ok().context(CsvFieldSnafu {
        lineno,
        column,
        value: s,
    })
}

// Returns the records starting at the first vote row, and the 1-based line
// number of the first record.
fn get_records(
    path: &str,
    cfs: &BallotFileSource,
) -> RcvResult<(csv::StringRecordsIntoIter<File>, usize)> {
    let first_row = cfs.first_vote_row_index()?;
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .context(CsvOpenSnafu { path })?;
    let mut records = rdr.into_records();
    // The index starts at 1 to respect most conventions in the excel world
    for _ in 1..first_row {
        _ = records.next();
    }
    Ok((records, first_row))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_tmp(name: &str, content: &str) -> String {
        let p = std::env::temp_dir().join(name);
        let mut f = File::create(&p).unwrap();
        f.write_all(content.as_bytes()).unwrap();
        p.display().to_string()
    }

    #[test]
    fn entries_with_header() {
        let path = write_tmp(
            "rcvtab_entries.csv",
            "ballot_id,candidate_id,rank\nb1,1,1\nb1, 2 ,2\n\nb2,2,1\n",
        );
        let cfs = BallotFileSource::new("csv", &path);
        let res = read_csv_entries(&path, &cfs).unwrap();
        assert_eq!(res.len(), 3);
        assert_eq!(res[1].candidate_id, 2);
        assert_eq!(res[2].ballot_id, "b2");
    }

    #[test]
    fn bad_rank_is_reported_with_line() {
        let path = write_tmp("rcvtab_bad_rank.csv", "ballot_id,candidate_id,rank\nb1,1,first\n");
        let cfs = BallotFileSource::new("csv", &path);
        match read_csv_entries(&path, &cfs) {
            Err(RcvError::CsvField { lineno, column, .. }) => {
                assert_eq!(lineno, 2);
                assert_eq!(column, "rank");
            }
            x => panic!("unexpected result {:?}", x),
        }
    }

    #[test]
    fn ranked_rows() {
        let path = write_tmp("rcvtab_ranked.csv", "first,second,third\n2,,1\n3,1,2\n");
        let cfs = BallotFileSource::new("csv_ranked", &path);
        let res = read_csv_ranking(&path, &cfs).unwrap();
        let ranks: Vec<(String, u32, u32)> = res
            .iter()
            .map(|e| (e.ballot_id.clone(), e.candidate_id, e.rank))
            .collect();
        assert_eq!(
            ranks,
            vec![
                ("rcvtab_ranked.csv-00000002".to_string(), 2, 1),
                ("rcvtab_ranked.csv-00000002".to_string(), 1, 3),
                ("rcvtab_ranked.csv-00000003".to_string(), 3, 1),
                ("rcvtab_ranked.csv-00000003".to_string(), 1, 2),
                ("rcvtab_ranked.csv-00000003".to_string(), 2, 3),
            ]
        );
    }
}
