/*!
Single-winner ranked-choice tabulation.

Three methods are supported: instant runoff voting, ranked pairs (Tideman) and
the Coombs method. The engine is pure: it reads a list of candidates and a list
of ballot entries, and returns a result without touching any storage.

```
use ranked_tabulation::*;

let candidates = vec![Candidate::new(1, "Anna"), Candidate::new(2, "Bob")];
let ballots = vec![
    BallotEntry::new("b1", 1, 1),
    BallotEntry::new("b1", 2, 2),
    BallotEntry::new("b2", 2, 1),
    BallotEntry::new("b3", 1, 1),
];
let res = tabulate(
    Method::from_label("Ranked Pairs"),
    &candidates,
    &ballots,
    &TabulationRules::DEFAULT_RULES,
)?;
assert_eq!(res.outcome.winner().map(|c| c.name.as_str()), Some("Anna"));
# Ok::<(), TabulationErrors>(())
```

See the [manual] for the details of each method.
*/

mod config;
mod elimination;
mod lock_graph;
mod pairwise;
mod ranked_pairs;
mod ranking;
mod runoff;

pub mod builder;
pub mod manual;

use log::{debug, info};

pub use crate::config::*;
pub use crate::lock_graph::LockGraph;
pub use crate::pairwise::{PairwiseRecord, Victory};
pub use crate::ranked_pairs::ranked_pairs;
pub use crate::ranking::{active_candidates, rank_ballots, RankedBallot};
pub use crate::runoff::{coombs, instant_runoff};

/// Runs the tabulation for the given method.
///
/// Arguments:
/// * `method` the tabulation method. Use [Method::from_label] to get the
/// platform behavior where an unknown label means instant runoff.
/// * `candidates` the registered candidates. Inactive candidates are ignored.
/// * `ballots` the ballot entries. Entries are grouped by ballot id.
/// * `rules` the tiebreak and validation rules.
///
/// An election without any active candidate or without any ballot returns
/// [NoWinnerReason::EmptyInput].
pub fn tabulate(
    method: Method,
    candidates: &[Candidate],
    ballots: &[BallotEntry],
    rules: &TabulationRules,
) -> Result<TabulationResult, TabulationErrors> {
    info!(
        "Processing {:?} ballot entries, {:?} candidates, method: {}, rules: {:?}",
        ballots.len(),
        candidates.len(),
        method,
        rules
    );
    active_candidates(candidates)?;
    let ranked = rank_ballots(candidates, ballots, rules.unknown_candidate_mode)?;
    tabulate_ranked(method, candidates, &ranked, rules)
}

/// Runs the tabulation on ballots that are already in preference order.
///
/// Inactive candidates are ignored. Fails with
/// [TabulationErrors::DuplicateCandidate] if two candidates share an id.
pub fn tabulate_ranked(
    method: Method,
    candidates: &[Candidate],
    ballots: &[RankedBallot],
    rules: &TabulationRules,
) -> Result<TabulationResult, TabulationErrors> {
    let contest = active_candidates(candidates)?;
    if contest.is_empty() || ballots.is_empty() {
        info!(
            "Nothing to tabulate: {} candidates, {} ballots",
            contest.len(),
            ballots.len()
        );
        return Ok(TabulationResult::no_winner(
            method,
            NoWinnerReason::EmptyInput,
        ));
    }
    for c in contest.iter() {
        debug!("Candidate: {}: {}", c.id, c.name);
    }
    let res = match method {
        Method::InstantRunoff => instant_runoff(&contest, ballots, rules),
        Method::RankedPairs => ranked_pairs(&contest, ballots, rules),
        Method::Coombs => coombs(&contest, ballots, rules),
    };
    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidates() -> Vec<Candidate> {
        vec![Candidate::new(1, "A"), Candidate::new(2, "B")]
    }

    #[test]
    fn empty_inputs() {
        let _ = env_logger::try_init();
        for m in Method::ALL {
            let res = tabulate(m, &candidates(), &[], &TabulationRules::DEFAULT_RULES).unwrap();
            assert_eq!(res.outcome, Outcome::NoWinner(NoWinnerReason::EmptyInput));
            assert_eq!(res.method, m);

            let ballots = vec![BallotEntry::new("b1", 1, 1)];
            let res = tabulate(m, &[], &ballots, &TabulationRules::DEFAULT_RULES).unwrap();
            assert_eq!(res.outcome, Outcome::NoWinner(NoWinnerReason::EmptyInput));
        }
    }

    #[test]
    fn inactive_candidates_do_not_run() {
        let _ = env_logger::try_init();
        let mut cands = candidates();
        cands.push(Candidate {
            id: CandidateId(3),
            name: "C".to_string(),
            active: false,
        });
        let ballots = vec![
            BallotEntry::new("b1", 3, 1),
            BallotEntry::new("b1", 2, 2),
            BallotEntry::new("b1", 1, 3),
            BallotEntry::new("b2", 3, 1),
            BallotEntry::new("b2", 2, 2),
            BallotEntry::new("b2", 1, 3),
            BallotEntry::new("b3", 1, 1),
            BallotEntry::new("b3", 2, 2),
        ];
        for m in Method::ALL {
            let res = tabulate(m, &cands, &ballots, &TabulationRules::DEFAULT_RULES).unwrap();
            assert_eq!(res.outcome.winner().map(|c| c.id), Some(CandidateId(2)));
        }
    }

    #[test]
    fn errors_are_reported() {
        let ballots = vec![BallotEntry::new("b1", 1, 1), BallotEntry::new("b1", 2, 1)];
        let res = tabulate(
            Method::Coombs,
            &candidates(),
            &ballots,
            &TabulationRules::DEFAULT_RULES,
        );
        assert!(matches!(
            res,
            Err(TabulationErrors::InvalidBallot { ref ballot_id, .. }) if ballot_id == "b1"
        ));
    }

    #[test]
    fn ranked_ballots_with_duplicate_ids() {
        let _ = env_logger::try_init();
        let cands = vec![Candidate::new(1, "A"), Candidate::new(1, "A2"), Candidate::new(2, "B")];
        let ballots = vec![
            RankedBallot {
                ballot_id: "b1".to_string(),
                preferences: vec![CandidateId(1), CandidateId(2)],
            },
            RankedBallot {
                ballot_id: "b2".to_string(),
                preferences: vec![CandidateId(2), CandidateId(1)],
            },
        ];
        for m in Method::ALL {
            let res = tabulate_ranked(m, &cands, &ballots, &TabulationRules::DEFAULT_RULES);
            assert_eq!(
                res,
                Err(TabulationErrors::DuplicateCandidate(CandidateId(1)))
            );
        }
    }

    #[test]
    fn method_labels() {
        assert_eq!(Method::from_label("Coombs"), Method::Coombs);
        assert_eq!(Method::from_label("Ranked Pairs"), Method::RankedPairs);
        assert_eq!(Method::from_label("Instant Runoff"), Method::InstantRunoff);
        assert_eq!(Method::from_label("Borda"), Method::InstantRunoff);
        assert_eq!(Method::parse_strict("ranked pairs"), None);
        for m in Method::ALL {
            assert_eq!(Method::parse_strict(m.label()), Some(m));
        }
    }
}
