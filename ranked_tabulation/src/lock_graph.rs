// The graph of locked victories used by ranked pairs.

use std::collections::{HashMap, HashSet};

use crate::config::CandidateId;

/// A directed acyclic graph over the candidates.
///
/// An edge A -> B means that the victory of A over B is locked. The transitive
/// closure is kept up to date on every insertion, so that the cycle check before
/// an insertion is a single lookup.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct LockGraph {
    // Registration order, used to report the sources deterministically.
    nodes: Vec<CandidateId>,
    edges: HashMap<CandidateId, HashSet<CandidateId>>,
    // reachable[A] = all the candidates that A beats through locked edges.
    reachable: HashMap<CandidateId, HashSet<CandidateId>>,
}

impl LockGraph {
    pub fn new(nodes: &[CandidateId]) -> LockGraph {
        LockGraph {
            nodes: nodes.to_vec(),
            edges: nodes.iter().map(|n| (*n, HashSet::new())).collect(),
            reachable: nodes.iter().map(|n| (*n, HashSet::new())).collect(),
        }
    }

    /// True if a path of locked edges leads from `from` to `to`.
    pub fn reaches(&self, from: CandidateId, to: CandidateId) -> bool {
        self.reachable
            .get(&from)
            .map(|r| r.contains(&to))
            .unwrap_or(false)
    }

    /// Locks the edge winner -> loser, unless it would close a cycle.
    ///
    /// Returns whether the edge was added. Unknown candidates are never locked.
    pub fn try_lock(&mut self, winner: CandidateId, loser: CandidateId) -> bool {
        if winner == loser
            || !self.edges.contains_key(&winner)
            || !self.edges.contains_key(&loser)
            || self.reaches(loser, winner)
        {
            return false;
        }

        let mut gained: HashSet<CandidateId> =
            self.reachable.get(&loser).cloned().unwrap_or_default();
        gained.insert(loser);
        let upstream: Vec<CandidateId> = self
            .nodes
            .iter()
            .filter(|n| **n == winner || self.reaches(**n, winner))
            .copied()
            .collect();
        for n in upstream {
            if let Some(r) = self.reachable.get_mut(&n) {
                r.extend(gained.iter().copied());
            }
        }
        if let Some(out) = self.edges.get_mut(&winner) {
            out.insert(loser);
        }
        true
    }

    /// The candidates without any locked defeat, in registration order.
    pub fn sources(&self) -> Vec<CandidateId> {
        let targets: HashSet<CandidateId> = self.edges.values().flatten().copied().collect();
        self.nodes
            .iter()
            .filter(|n| !targets.contains(*n))
            .copied()
            .collect()
    }

    /// The number of locked victories.
    pub fn num_edges(&self) -> usize {
        self.edges.values().map(|e| e.len()).sum()
    }

    /// Checks the absence of cycles from the edges alone, without the cached
    /// closure (Kahn's algorithm).
    pub fn is_acyclic(&self) -> bool {
        let mut in_degree: HashMap<CandidateId, usize> =
            self.nodes.iter().map(|n| (*n, 0)).collect();
        for targets in self.edges.values() {
            for t in targets.iter() {
                if let Some(d) = in_degree.get_mut(t) {
                    *d += 1;
                }
            }
        }
        let mut ready: Vec<CandidateId> = in_degree
            .iter()
            .filter(|(_, d)| **d == 0)
            .map(|(n, _)| *n)
            .collect();
        let mut visited = 0;
        while let Some(n) = ready.pop() {
            visited += 1;
            if let Some(targets) = self.edges.get(&n) {
                for t in targets.iter() {
                    if let Some(d) = in_degree.get_mut(t) {
                        *d -= 1;
                        if *d == 0 {
                            ready.push(*t);
                        }
                    }
                }
            }
        }
        visited == self.nodes.len()
    }
}
