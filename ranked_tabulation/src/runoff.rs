// Round-based methods: instant runoff and Coombs.
//
// Both methods tally the ballots against the continuing candidates, stop if a
// winner is found, and otherwise eliminate candidates until one remains or all
// the continuing candidates are tied.

use log::{debug, info};
use std::collections::HashSet;

use crate::config::*;
use crate::elimination::{select_eliminated, Criterion, Elimination};
use crate::ranking::RankedBallot;

// The counts for one round, in candidate order, and the number of ballots that
// did not contribute.
struct Tally {
    counts: Vec<(CandidateId, String, u64)>,
    exhausted: u64,
}

impl Tally {
    fn total(&self) -> u64 {
        self.counts.iter().map(|(_, _, c)| *c).sum()
    }

    /// The candidate holding strictly more than half of the counted votes.
    fn majority(&self) -> Option<CandidateId> {
        let total = self.total();
        self.counts
            .iter()
            .find(|(_, _, c)| *c * 2 > total)
            .map(|(cid, _, _)| *cid)
    }

    fn to_stats(&self, round: u32) -> RoundStats {
        RoundStats {
            round,
            tally: self
                .counts
                .iter()
                .map(|(_, name, c)| (name.clone(), *c))
                .collect(),
            exhausted: self.exhausted,
            tally_results_elected: Vec::new(),
            tally_result_eliminated: Vec::new(),
        }
    }
}

fn compute_tally<F>(ballots: &[RankedBallot], continuing: &[&Candidate], pick: F) -> Tally
where
    F: Fn(&RankedBallot, &HashSet<CandidateId>) -> Option<CandidateId>,
{
    let active: HashSet<CandidateId> = continuing.iter().map(|c| c.id).collect();
    let mut counts: Vec<(CandidateId, String, u64)> = continuing
        .iter()
        .map(|c| (c.id, c.name.clone(), 0))
        .collect();
    let mut exhausted: u64 = 0;
    for b in ballots.iter() {
        match pick(b, &active) {
            Some(cid) => {
                if let Some(entry) = counts.iter_mut().find(|(cid2, _, _)| *cid2 == cid) {
                    entry.2 += 1;
                }
            }
            None => exhausted += 1,
        }
    }
    Tally { counts, exhausted }
}

/// Votes for the most preferred continuing candidate of every ballot.
fn first_choices(ballots: &[RankedBallot], continuing: &[&Candidate]) -> Tally {
    compute_tally(ballots, continuing, RankedBallot::first_active)
}

/// Votes against the least preferred continuing candidate of every ballot.
fn last_places(ballots: &[RankedBallot], continuing: &[&Candidate]) -> Tally {
    compute_tally(ballots, continuing, RankedBallot::last_active)
}

/// Runs instant runoff voting.
///
/// Each round, every ballot counts for its most preferred continuing candidate.
/// A candidate with more than half of these votes wins. Otherwise the candidates
/// with the fewest votes are eliminated, following the tiebreak mode of the rules.
///
/// The caller is expected to have checked that candidates and ballots are not empty.
pub fn instant_runoff(
    candidates: &[Candidate],
    ballots: &[RankedBallot],
    rules: &TabulationRules,
) -> TabulationResult {
    run_rounds(Method::InstantRunoff, candidates, ballots, rules)
}

/// Runs the Coombs method.
///
/// Each round, every ballot counts against its least preferred continuing
/// candidate, and the candidates with the most such votes are eliminated. The
/// last continuing candidate wins. With `coombs_majority_stop`, a candidate
/// holding a majority of first choices wins before any elimination of the round.
pub fn coombs(
    candidates: &[Candidate],
    ballots: &[RankedBallot],
    rules: &TabulationRules,
) -> TabulationResult {
    run_rounds(Method::Coombs, candidates, ballots, rules)
}

fn run_rounds(
    method: Method,
    candidates: &[Candidate],
    ballots: &[RankedBallot],
    rules: &TabulationRules,
) -> TabulationResult {
    let mut continuing: Vec<&Candidate> = candidates.iter().collect();
    let mut round_stats: Vec<RoundStats> = Vec::new();

    let finish = |round_stats: Vec<RoundStats>, outcome: Outcome| {
        info!("{}: outcome after {} rounds: {:?}", method, round_stats.len(), outcome);
        TabulationResult {
            method,
            outcome,
            round_stats,
            pair_decisions: Vec::new(),
        }
    };

    // Every round either returns or strictly shrinks `continuing`, so this
    // loop runs at most candidates.len() times.
    loop {
        let round_id = round_stats.len() as u32 + 1;
        let firsts = first_choices(ballots, &continuing);
        info!(
            "{}: round {}: {} continuing candidates, {} exhausted ballots",
            method,
            round_id,
            continuing.len(),
            firsts.exhausted
        );

        let (tally, criterion, early_winner) = match method {
            Method::Coombs => {
                let early = if continuing.len() == 1 {
                    Some(continuing[0].id)
                } else if rules.coombs_majority_stop {
                    firsts.majority()
                } else {
                    None
                };
                (last_places(ballots, &continuing), Criterion::Most, early)
            }
            Method::InstantRunoff | Method::RankedPairs => {
                let early = firsts.majority();
                (firsts, Criterion::Fewest, early)
            }
        };
        debug!("{}: round {}: tally {:?}", method, round_id, tally.counts);

        let mut stats = tally.to_stats(round_id);
        if let Some(winner_id) = early_winner {
            let winner: Option<&Candidate> =
                continuing.iter().find(|c| c.id == winner_id).copied();
            if let Some(w) = winner {
                stats.tally_results_elected.push(w.name.clone());
                round_stats.push(stats);
                return finish(round_stats, Outcome::Winner(w.clone()));
            }
        }

        match select_eliminated(&tally.counts, criterion, rules.tiebreak_mode, round_id) {
            Elimination::AllTied => {
                debug!("{}: round {}: all candidates tied", method, round_id);
                round_stats.push(stats);
                return finish(round_stats, Outcome::NoWinner(NoWinnerReason::AllTied));
            }
            Elimination::Eliminate(eliminated) => {
                let eliminated: HashSet<CandidateId> = eliminated.into_iter().collect();
                for c in continuing.iter().filter(|c| eliminated.contains(&c.id)) {
                    info!("{}: round {}: eliminating {}", method, round_id, c.name);
                    stats.tally_result_eliminated.push(c.name.clone());
                }
                let before = continuing.len();
                continuing.retain(|c| !eliminated.contains(&c.id));
                debug_assert!(continuing.len() < before);
                round_stats.push(stats);
                if continuing.is_empty() {
                    // Only when several candidates share an eliminated id.
                    return finish(round_stats, Outcome::NoWinner(NoWinnerReason::AllTied));
                }
            }
        }
    }
}
