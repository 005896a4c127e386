// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The identifier of a candidate, as assigned by the election administration.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub struct CandidateId(pub u32);

impl Display for CandidateId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A registered candidate.
///
/// Only active candidates take part in a tabulation. Inactive candidates are
/// removed before the first round and any ranking given to them is skipped.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub active: bool,
}

impl Candidate {
    pub fn new(id: u32, name: &str) -> Candidate {
        Candidate {
            id: CandidateId(id),
            name: name.to_string(),
            active: true,
        }
    }
}

/// One row of a ballot: the rank given to a candidate.
///
/// All the entries that share the same `ballot_id` form one ballot.
/// Ranks start at 1 and do not need to be contiguous.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub struct BallotEntry {
    pub ballot_id: String,
    pub candidate_id: CandidateId,
    pub rank: u32,
}

impl BallotEntry {
    pub fn new(ballot_id: &str, candidate_id: u32, rank: u32) -> BallotEntry {
        BallotEntry {
            ballot_id: ballot_id.to_string(),
            candidate_id: CandidateId(candidate_id),
            rank,
        }
    }
}

// ********* Methods **********

/// The tabulation method.
///
/// The set of methods is closed: dispatch is a single `match` in [crate::tabulate].
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Default)]
pub enum Method {
    #[default]
    InstantRunoff,
    RankedPairs,
    Coombs,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::InstantRunoff, Method::RankedPairs, Method::Coombs];

    /// The label used by the election platform for this method.
    pub fn label(&self) -> &'static str {
        match self {
            Method::InstantRunoff => "Instant Runoff",
            Method::RankedPairs => "Ranked Pairs",
            Method::Coombs => "Coombs",
        }
    }

    /// Parses a method label. Returns None for any label that is not exactly one
    /// of the known labels.
    pub fn parse_strict(label: &str) -> Option<Method> {
        Method::ALL.iter().find(|m| m.label() == label).copied()
    }

    /// Parses a method label, falling back to [Method::InstantRunoff] for any
    /// unknown label.
    ///
    /// This is the behavior expected by the voting platform, which stores the
    /// preferred method as free text. Use [Method::parse_strict] to reject typos.
    pub fn from_label(label: &str) -> Method {
        match Method::parse_strict(label) {
            Some(m) => m,
            None => {
                log::warn!(
                    "Unknown tabulation method {:?}, defaulting to {:?}",
                    label,
                    Method::InstantRunoff.label()
                );
                Method::InstantRunoff
            }
        }
    }
}

impl Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ********* Configuration **********

/// How candidates tied for elimination are handled by instant runoff and Coombs.
///
/// Whatever the mode, a round in which every continuing candidate is tied
/// ends the tabulation without a winner.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum TieBreakMode {
    /// All the tied candidates are eliminated in the same round.
    EliminateAllTied,
    /// A single candidate is eliminated: the tied candidate that comes last in
    /// the order in which the candidates were registered.
    UseCandidateOrder,
    /// A single candidate is eliminated, picked with a cryptographic hash of the
    /// seed, the round number and the candidate names.
    Random(u32),
}

/// What to do with a ballot entry that names a candidate that is not registered.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum UnknownCandidateMode {
    /// The entry is skipped and the rest of the ballot is kept.
    Drop,
    /// The whole tabulation fails with [TabulationErrors::InvalidBallot].
    Reject,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationRules {
    pub tiebreak_mode: TieBreakMode,
    pub unknown_candidate_mode: UnknownCandidateMode,
    /// Coombs only: stop as soon as a candidate holds a majority of the first
    /// choices, instead of eliminating until a single candidate is left.
    pub coombs_majority_stop: bool,
}

impl TabulationRules {
    pub const DEFAULT_RULES: TabulationRules = TabulationRules {
        tiebreak_mode: TieBreakMode::EliminateAllTied,
        unknown_candidate_mode: UnknownCandidateMode::Drop,
        coombs_majority_stop: false,
    };
}

impl Default for TabulationRules {
    fn default() -> Self {
        TabulationRules::DEFAULT_RULES
    }
}

// ******** Output data structures *********

/// Why a tabulation did not produce a winner.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash)]
pub enum NoWinnerReason {
    /// All the continuing candidates are tied at the elimination threshold.
    AllTied,
    /// No active candidate or no ballot was provided.
    EmptyInput,
    /// The ranked pairs graph does not have exactly one candidate without a
    /// locked defeat.
    CycleUnresolved,
}

impl NoWinnerReason {
    pub fn label(&self) -> &'static str {
        match self {
            NoWinnerReason::AllTied => "all-tied",
            NoWinnerReason::EmptyInput => "empty-input",
            NoWinnerReason::CycleUnresolved => "cycle-unresolved",
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Outcome {
    Winner(Candidate),
    NoWinner(NoWinnerReason),
}

impl Outcome {
    pub fn winner(&self) -> Option<&Candidate> {
        match self {
            Outcome::Winner(c) => Some(c),
            Outcome::NoWinner(_) => None,
        }
    }
}

/// Statistics for one round of instant runoff or Coombs.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RoundStats {
    pub round: u32,
    /// For instant runoff, the first choices. For Coombs, the last places.
    /// Listed in candidate order.
    pub tally: Vec<(String, u64)>,
    /// Ballots that did not rank any continuing candidate.
    pub exhausted: u64,
    pub tally_results_elected: Vec<String>,
    pub tally_result_eliminated: Vec<String>,
}

/// A pairwise victory considered by ranked pairs, in processing order.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct PairDecision {
    pub winner: String,
    pub loser: String,
    pub margin: u64,
    /// False if locking this pair would have created a cycle.
    pub locked: bool,
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct TabulationResult {
    pub method: Method,
    pub outcome: Outcome,
    /// Empty for ranked pairs.
    pub round_stats: Vec<RoundStats>,
    /// Empty for instant runoff and Coombs.
    pub pair_decisions: Vec<PairDecision>,
}

impl TabulationResult {
    pub(crate) fn no_winner(method: Method, reason: NoWinnerReason) -> TabulationResult {
        TabulationResult {
            method,
            outcome: Outcome::NoWinner(reason),
            round_stats: Vec::new(),
            pair_decisions: Vec::new(),
        }
    }
}

/// Problems found in a ballot while building its preference list.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum InvalidBallotReason {
    ZeroRank(CandidateId),
    DuplicateRank(u32),
    DuplicateCandidate(CandidateId),
    UnknownCandidate(CandidateId),
    UnknownCandidateName(String),
}

impl Display for InvalidBallotReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidBallotReason::ZeroRank(cid) => write!(f, "candidate {} has rank 0", cid),
            InvalidBallotReason::DuplicateRank(rank) => {
                write!(f, "rank {} is given more than once", rank)
            }
            InvalidBallotReason::DuplicateCandidate(cid) => {
                write!(f, "candidate {} is ranked more than once", cid)
            }
            InvalidBallotReason::UnknownCandidate(cid) => {
                write!(f, "candidate {} is not registered", cid)
            }
            InvalidBallotReason::UnknownCandidateName(name) => {
                write!(f, "candidate {:?} is not registered", name)
            }
        }
    }
}

/// Errors that prevent the tabulation from running.
///
/// An election without a winner is not an error: see [NoWinnerReason].
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum TabulationErrors {
    InvalidBallot {
        ballot_id: String,
        reason: InvalidBallotReason,
    },
    DuplicateCandidate(CandidateId),
}

impl Error for TabulationErrors {}

impl Display for TabulationErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TabulationErrors::InvalidBallot { ballot_id, reason } => {
                write!(f, "invalid ballot {}: {}", ballot_id, reason)
            }
            TabulationErrors::DuplicateCandidate(cid) => {
                write!(f, "candidate id {} is registered more than once", cid)
            }
        }
    }
}
