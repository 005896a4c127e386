use log::{debug, info};
use std::collections::HashMap;

use crate::config::*;
use crate::lock_graph::LockGraph;
use crate::pairwise::PairwiseRecord;
use crate::ranking::RankedBallot;

/// Runs ranked pairs (Tideman).
///
/// Head-to-head victories are locked in order of decreasing margin, skipping
/// any victory that would create a cycle with the ones already locked. The
/// winner is the only candidate without a locked defeat. If there is none, or
/// more than one (for example when some pairs are exactly tied), the result is
/// [NoWinnerReason::CycleUnresolved].
pub fn ranked_pairs(
    candidates: &[Candidate],
    ballots: &[RankedBallot],
    _rules: &TabulationRules,
) -> TabulationResult {
    let names: HashMap<CandidateId, &str> =
        candidates.iter().map(|c| (c.id, c.name.as_str())).collect();
    let name = |cid: CandidateId| names.get(&cid).map(|s| s.to_string()).unwrap_or_default();

    let record = PairwiseRecord::from_ballots(ballots);
    let victories = record.victories(candidates);
    info!(
        "ranked_pairs: {} candidates, {} victories to lock",
        candidates.len(),
        victories.len()
    );

    let ids: Vec<CandidateId> = candidates.iter().map(|c| c.id).collect();
    let mut graph = LockGraph::new(&ids);
    let mut pair_decisions: Vec<PairDecision> = Vec::with_capacity(victories.len());
    for v in victories.iter() {
        let locked = graph.try_lock(v.winner, v.loser);
        debug_assert!(graph.is_acyclic());
        debug!(
            "ranked_pairs: {} over {} by {}: {}",
            v.winner,
            v.loser,
            v.margin,
            if locked { "locked" } else { "skipped" }
        );
        pair_decisions.push(PairDecision {
            winner: name(v.winner),
            loser: name(v.loser),
            margin: v.margin,
            locked,
        });
    }

    let sources = graph.sources();
    debug!("ranked_pairs: candidates without locked defeat: {:?}", sources);
    let outcome = match sources.as_slice() {
        [single] => match candidates.iter().find(|c| c.id == *single) {
            Some(c) => Outcome::Winner(c.clone()),
            None => Outcome::NoWinner(NoWinnerReason::CycleUnresolved),
        },
        _ => Outcome::NoWinner(NoWinnerReason::CycleUnresolved),
    };
    info!("ranked_pairs: outcome: {:?}", outcome);

    TabulationResult {
        method: Method::RankedPairs,
        outcome,
        round_stats: Vec::new(),
        pair_decisions,
    }
}
