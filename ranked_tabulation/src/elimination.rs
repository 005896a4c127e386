// Selection of the candidates removed at the end of a round.
// Shared by instant runoff (fewest first choices) and Coombs (most last places).

use log::debug;

use crate::config::*;

/// Which end of the tally gets eliminated.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub(crate) enum Criterion {
    Fewest,
    Most,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub(crate) enum Elimination {
    Eliminate(Vec<CandidateId>),
    /// Every continuing candidate sits at the threshold.
    AllTied,
}

/// Picks the candidates to eliminate.
///
/// `tally` lists every continuing candidate once, in registration order.
/// The returned candidates are never the whole tally.
pub(crate) fn select_eliminated(
    tally: &[(CandidateId, String, u64)],
    criterion: Criterion,
    tiebreak: TieBreakMode,
    num_round: u32,
) -> Elimination {
    let threshold = match criterion {
        Criterion::Fewest => tally.iter().map(|(_, _, c)| *c).min(),
        Criterion::Most => tally.iter().map(|(_, _, c)| *c).max(),
    };
    let threshold = match threshold {
        Some(t) => t,
        None => return Elimination::AllTied,
    };

    let tied: Vec<(CandidateId, &str)> = tally
        .iter()
        .filter(|(_, _, c)| *c == threshold)
        .map(|(cid, name, _)| (*cid, name.as_str()))
        .collect();
    debug!(
        "select_eliminated: round {} threshold {} tied {:?}",
        num_round, threshold, tied
    );

    if tied.len() == tally.len() {
        return Elimination::AllTied;
    }
    if tied.len() == 1 {
        return Elimination::Eliminate(vec![tied[0].0]);
    }

    let eliminated = match tiebreak {
        TieBreakMode::EliminateAllTied => tied.iter().map(|(cid, _)| *cid).collect(),
        TieBreakMode::UseCandidateOrder => {
            // Losers are picked from the end of the registration order.
            tied.iter().map(|(cid, _)| *cid).rev().take(1).collect()
        }
        TieBreakMode::Random(seed) => candidate_permutation_crypto(&tied, seed, num_round)
            .into_iter()
            .take(1)
            .collect(),
    };
    debug!(
        "select_eliminated: tiebreak {:?} selected {:?}",
        tiebreak, eliminated
    );
    Elimination::Eliminate(eliminated)
}

/// Generates a "random" permutation of the candidates. Random in this context means hard to guess in advance.
/// The order only depends on the seed, the round and the candidate names.
fn candidate_permutation_crypto(
    candidates: &[(CandidateId, &str)],
    seed: u32,
    num_round: u32,
) -> Vec<CandidateId> {
    let mut data: Vec<(CandidateId, String)> = candidates
        .iter()
        .map(|(cid, name)| {
            let key = format!("{:08}{:08}{}", seed, num_round, name);
            (*cid, sha256::digest(key))
        })
        .collect();
    // The id breaks the tie for homonyms.
    data.sort_by(|a, b| a.1.cmp(&b.1).then(a.0.cmp(&b.0)));
    data.iter().map(|p| p.0).collect()
}
