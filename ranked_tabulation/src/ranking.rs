// Turns the raw ballot rows into preference lists.

use log::{debug, warn};
use std::collections::{HashMap, HashSet};

use crate::config::*;

/// A ballot, once its entries have been put in rank order.
///
/// Invariant: a candidate appears at most once, and only registered active
/// candidates appear. The list may be empty if all the entries were skipped.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct RankedBallot {
    pub ballot_id: String,
    /// Most preferred first.
    pub preferences: Vec<CandidateId>,
}

impl RankedBallot {
    /// The most preferred candidate that is still running, if any.
    pub fn first_active(&self, active: &HashSet<CandidateId>) -> Option<CandidateId> {
        self.preferences
            .iter()
            .find(|cid| active.contains(cid))
            .copied()
    }

    /// The least preferred candidate that is still running, if any.
    pub fn last_active(&self, active: &HashSet<CandidateId>) -> Option<CandidateId> {
        self.preferences
            .iter()
            .rev()
            .find(|cid| active.contains(cid))
            .copied()
    }
}

/// Returns the active candidates, in registration order.
///
/// Fails if the same id was registered twice, even if one of the candidates is
/// inactive.
pub fn active_candidates(candidates: &[Candidate]) -> Result<Vec<Candidate>, TabulationErrors> {
    let mut seen: HashSet<CandidateId> = HashSet::new();
    for c in candidates.iter() {
        if !seen.insert(c.id) {
            return Err(TabulationErrors::DuplicateCandidate(c.id));
        }
    }
    let res: Vec<Candidate> = candidates.iter().filter(|c| c.active).cloned().collect();
    debug!(
        "active_candidates: {} registered, {} active",
        candidates.len(),
        res.len()
    );
    Ok(res)
}

/// Groups the entries by ballot and orders each ballot by increasing rank.
///
/// Ballots are returned in the order in which their first entry appears.
/// Entries naming a registered but inactive candidate are skipped. Entries naming
/// an unregistered candidate are skipped or rejected depending on `unknown_mode`.
pub fn rank_ballots(
    candidates: &[Candidate],
    entries: &[BallotEntry],
    unknown_mode: UnknownCandidateMode,
) -> Result<Vec<RankedBallot>, TabulationErrors> {
    let registered: HashMap<CandidateId, bool> =
        candidates.iter().map(|c| (c.id, c.active)).collect();

    let mut ballot_order: Vec<&str> = Vec::new();
    let mut grouped: HashMap<&str, Vec<&BallotEntry>> = HashMap::new();
    for e in entries.iter() {
        let group = grouped.entry(e.ballot_id.as_str()).or_insert_with(|| {
            ballot_order.push(e.ballot_id.as_str());
            Vec::new()
        });
        group.push(e);
    }

    let mut res: Vec<RankedBallot> = Vec::with_capacity(ballot_order.len());
    for ballot_id in ballot_order {
        let mut ballot_entries = grouped.remove(ballot_id).unwrap_or_default();
        check_entries(ballot_id, &ballot_entries)?;
        ballot_entries.sort_by_key(|e| e.rank);

        let mut preferences: Vec<CandidateId> = Vec::with_capacity(ballot_entries.len());
        for e in ballot_entries {
            match registered.get(&e.candidate_id) {
                Some(true) => preferences.push(e.candidate_id),
                Some(false) => {
                    debug!(
                        "rank_ballots: ballot {}: skipping inactive candidate {}",
                        ballot_id, e.candidate_id
                    );
                }
                None if unknown_mode == UnknownCandidateMode::Drop => {
                    warn!(
                        "rank_ballots: ballot {}: dropping unknown candidate {} at rank {}",
                        ballot_id, e.candidate_id, e.rank
                    );
                }
                None => {
                    return Err(TabulationErrors::InvalidBallot {
                        ballot_id: ballot_id.to_string(),
                        reason: InvalidBallotReason::UnknownCandidate(e.candidate_id),
                    });
                }
            }
        }
        res.push(RankedBallot {
            ballot_id: ballot_id.to_string(),
            preferences,
        });
    }
    debug!(
        "rank_ballots: {} entries grouped into {} ballots",
        entries.len(),
        res.len()
    );
    Ok(res)
}

// A rank order is only well defined if ranks and candidates are unique.
fn check_entries(ballot_id: &str, entries: &[&BallotEntry]) -> Result<(), TabulationErrors> {
    let invalid = |reason| TabulationErrors::InvalidBallot {
        ballot_id: ballot_id.to_string(),
        reason,
    };
    let mut ranks: HashSet<u32> = HashSet::new();
    let mut cids: HashSet<CandidateId> = HashSet::new();
    for e in entries.iter() {
        if e.rank == 0 {
            return Err(invalid(InvalidBallotReason::ZeroRank(e.candidate_id)));
        }
        if !ranks.insert(e.rank) {
            return Err(invalid(InvalidBallotReason::DuplicateRank(e.rank)));
        }
        if !cids.insert(e.candidate_id) {
            return Err(invalid(InvalidBallotReason::DuplicateCandidate(
                e.candidate_id,
            )));
        }
    }
    Ok(())
}
