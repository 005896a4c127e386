pub use crate::config::*;

use crate::{tabulate, tabulate_ranked};
use crate::ranking::{active_candidates, RankedBallot};

/// A builder for adding ballots.
///
/// ```
/// pub use ranked_tabulation::builder::Builder;
/// pub use ranked_tabulation::{Method, TabulationRules};
/// # use ranked_tabulation::TabulationErrors;
///
/// let mut builder = Builder::new(&TabulationRules::DEFAULT_RULES)?
///     .candidates(&["Anna".to_string(), "Bob".to_string()])?;
///
/// builder.add_ballot_simple(&["Bob".to_string(), "Anna".to_string()])?;
/// builder.add_ballot_simple(&["Bob".to_string(), "Anna".to_string()])?;
/// builder.add_ballot_simple(&["Anna".to_string(), "Bob".to_string()])?;
///
/// let res = builder.tabulate(Method::Coombs)?;
/// assert_eq!(res.outcome.winner().map(|c| c.name.as_str()), Some("Bob"));
///
/// # Ok::<(), TabulationErrors>(())
/// ```
pub struct Builder {
    pub(crate) _rules: TabulationRules,
    pub(crate) _candidates: Vec<Candidate>,
    pub(crate) _entries: Vec<BallotEntry>,
    pub(crate) _num_ballots: usize,
}

impl Builder {
    pub fn new(rules: &TabulationRules) -> Result<Builder, TabulationErrors> {
        Ok(Builder {
            _rules: rules.clone(),
            _candidates: Vec::new(),
            _entries: Vec::new(),
            _num_ballots: 0,
        })
    }

    /// Registers the candidates by name. Ids are assigned from 1 in the given order.
    pub fn candidates(self, names: &[String]) -> Result<Builder, TabulationErrors> {
        let cands: Vec<Candidate> = names
            .iter()
            .enumerate()
            .map(|(idx, name)| Candidate::new((idx + 1) as u32, name))
            .collect();
        self.registered_candidates(&cands)
    }

    /// Registers the candidates with their own ids.
    pub fn registered_candidates(self, cands: &[Candidate]) -> Result<Builder, TabulationErrors> {
        // Fails early on duplicate ids.
        active_candidates(cands)?;
        Ok(Builder {
            _rules: self._rules,
            _candidates: cands.to_vec(),
            _entries: Vec::new(),
            _num_ballots: 0,
        })
    }

    /// Adds a ballot, as a list of candidate names in order of preference.
    ///
    /// Names that do not match a registered candidate are handled like unknown
    /// candidates in [crate::rank_ballots].
    pub fn add_ballot_simple(&mut self, names: &[String]) -> Result<(), TabulationErrors> {
        let ballot_id = format!("ballot-{:08}", self._num_ballots + 1);
        let mut ranks: Vec<(CandidateId, u32)> = Vec::new();
        for (idx, name) in names.iter().enumerate() {
            let rank = (idx + 1) as u32;
            match self._candidates.iter().find(|c| c.name == *name) {
                Some(c) => ranks.push((c.id, rank)),
                None if self._rules.unknown_candidate_mode == UnknownCandidateMode::Drop => {
                    log::warn!(
                        "add_ballot_simple: {}: skipping unknown candidate {:?}",
                        ballot_id,
                        name
                    );
                }
                None => {
                    return Err(TabulationErrors::InvalidBallot {
                        ballot_id,
                        reason: InvalidBallotReason::UnknownCandidateName(name.clone()),
                    });
                }
            }
        }
        self.add_ballot_ids(&ballot_id, &ranks)
    }

    /// Adds a ballot, as (candidate id, rank) pairs.
    pub fn add_ballot_ids(
        &mut self,
        ballot_id: &str,
        ranks: &[(CandidateId, u32)],
    ) -> Result<(), TabulationErrors> {
        self._num_ballots += 1;
        for (cid, rank) in ranks.iter() {
            self._entries.push(BallotEntry {
                ballot_id: ballot_id.to_string(),
                candidate_id: *cid,
                rank: *rank,
            });
        }
        Ok(())
    }

    /// Adds raw ballot entries.
    pub fn add_entries(&mut self, entries: &[BallotEntry]) -> Result<(), TabulationErrors> {
        self._entries.extend(entries.iter().cloned());
        Ok(())
    }

    /// Runs the tabulation with the ballots added so far.
    ///
    /// The builder can be used again, for example with another method.
    pub fn tabulate(&self, method: Method) -> Result<TabulationResult, TabulationErrors> {
        tabulate(method, &self._candidates, &self._entries, &self._rules)
    }

    /// Runs the tabulation on already ordered ballots, bypassing the entries added
    /// to this builder.
    pub fn tabulate_ranked(
        &self,
        method: Method,
        ballots: &[RankedBallot],
    ) -> Result<TabulationResult, TabulationErrors> {
        tabulate_ranked(method, &self._candidates, ballots, &self._rules)
    }
}
