// Head-to-head counts between candidates, and the victories derived from them.

use log::debug;
use std::collections::HashMap;

use crate::config::*;
use crate::ranking::RankedBallot;

/// wins[(A, B)] = number of ballots ranking A strictly above B.
///
/// Only the candidates present on a ballot are compared: a ballot that does
/// not rank B does not count as a win of A over B.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct PairwiseRecord {
    wins: HashMap<(CandidateId, CandidateId), u64>,
}

/// A strictly positive head-to-head margin.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub struct Victory {
    pub winner: CandidateId,
    pub loser: CandidateId,
    pub margin: u64,
}

impl PairwiseRecord {
    pub fn from_ballots(ballots: &[RankedBallot]) -> PairwiseRecord {
        let mut wins: HashMap<(CandidateId, CandidateId), u64> = HashMap::new();
        for b in ballots.iter() {
            for (idx, above) in b.preferences.iter().enumerate() {
                for below in b.preferences[idx + 1..].iter() {
                    *wins.entry((*above, *below)).or_insert(0) += 1;
                }
            }
        }
        debug!(
            "PairwiseRecord: {} ballots, {} non-zero pairs",
            ballots.len(),
            wins.len()
        );
        PairwiseRecord { wins }
    }

    /// Number of ballots preferring `a` to `b`.
    pub fn get(&self, a: CandidateId, b: CandidateId) -> u64 {
        self.wins.get(&(a, b)).copied().unwrap_or(0)
    }

    /// All the victories between the given candidates, in locking order:
    /// decreasing margin, then increasing winner id, then increasing loser id.
    pub fn victories(&self, candidates: &[Candidate]) -> Vec<Victory> {
        let mut res: Vec<Victory> = Vec::new();
        for (idx, x) in candidates.iter().enumerate() {
            for y in candidates[idx + 1..].iter() {
                let xy = self.get(x.id, y.id);
                let yx = self.get(y.id, x.id);
                if xy > yx {
                    res.push(Victory {
                        winner: x.id,
                        loser: y.id,
                        margin: xy - yx,
                    });
                } else if yx > xy {
                    res.push(Victory {
                        winner: y.id,
                        loser: x.id,
                        margin: yx - xy,
                    });
                }
            }
        }
        res.sort_by(|a, b| {
            b.margin
                .cmp(&a.margin)
                .then(a.winner.cmp(&b.winner))
                .then(a.loser.cmp(&b.loser))
        });
        res
    }
}
