use ranked_tabulation::*;

fn candidates(names: &[&str]) -> Vec<Candidate> {
    names
        .iter()
        .enumerate()
        .map(|(idx, n)| Candidate::new(idx as u32 + 1, n))
        .collect()
}

// Each group of ballots is a preference order (candidate ids) repeated `count` times.
fn entries(groups: &[(&[u32], usize)]) -> Vec<BallotEntry> {
    let mut res = Vec::new();
    let mut ballot_idx = 0;
    for (prefs, count) in groups.iter() {
        for _ in 0..*count {
            ballot_idx += 1;
            for (rank, cid) in prefs.iter().enumerate() {
                res.push(BallotEntry::new(
                    &format!("ballot-{}", ballot_idx),
                    *cid,
                    rank as u32 + 1,
                ));
            }
        }
    }
    res
}

fn run(method: Method, cands: &[Candidate], ballots: &[BallotEntry]) -> TabulationResult {
    tabulate(method, cands, ballots, &TabulationRules::DEFAULT_RULES).unwrap()
}

fn winner(res: &TabulationResult) -> Option<&str> {
    res.outcome.winner().map(|c| c.name.as_str())
}

// Small deterministic generator for the property checks.
struct Lcg(u64);

impl Lcg {
    fn next(&mut self, bound: u32) -> u32 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        ((self.0 >> 33) % bound as u64) as u32
    }

    fn ballots(&mut self, num_candidates: u32, num_ballots: usize) -> Vec<BallotEntry> {
        let mut res = Vec::new();
        for b in 0..num_ballots {
            let mut ids: Vec<u32> = (1..=num_candidates).collect();
            // Fisher-Yates, then keep a random prefix.
            for i in (1..ids.len()).rev() {
                let j = self.next(i as u32 + 1) as usize;
                ids.swap(i, j);
            }
            let len = 1 + self.next(num_candidates) as usize;
            for (rank, cid) in ids.iter().take(len).enumerate() {
                // Gaps in the ranks must not matter.
                res.push(BallotEntry::new(&format!("r{}", b), *cid, 2 * rank as u32 + 1));
            }
        }
        res
    }
}

#[test]
fn scenario_a_simultaneous_elimination() {
    let _ = env_logger::try_init();
    let c = candidates(&["X", "Y", "Z"]);
    let b = entries(&[(&[1, 2, 3], 3), (&[2, 3, 1], 2), (&[3, 1, 2], 2)]);
    let res = run(Method::InstantRunoff, &c, &b);
    let first = &res.round_stats[0];
    assert_eq!(
        first.tally,
        vec![("X".to_string(), 3), ("Y".to_string(), 2), ("Z".to_string(), 2)]
    );
    // Y and Z are tied at the minimum and leave together.
    assert_eq!(
        first.tally_result_eliminated,
        vec!["Y".to_string(), "Z".to_string()]
    );
    // All the ballots then go to X, the only continuing candidate.
    assert_eq!(res.round_stats[1].tally, vec![("X".to_string(), 7)]);
    assert_eq!(winner(&res), Some("X"));
}

#[test]
fn scenario_b_unanimous() {
    let _ = env_logger::try_init();
    let c = candidates(&["A", "B", "C"]);
    let b = entries(&[(&[1, 2, 3], 5)]);
    for m in Method::ALL {
        assert_eq!(winner(&run(m, &c, &b)), Some("A"), "method {}", m);
    }
}

#[test]
fn scenario_c_two_candidates() {
    let _ = env_logger::try_init();
    let c = candidates(&["A", "B"]);
    let b = entries(&[(&[1, 2], 3), (&[2, 1], 2)]);
    let res = run(Method::RankedPairs, &c, &b);
    assert_eq!(winner(&res), Some("A"));
    let locked: Vec<(&str, &str)> = res
        .pair_decisions
        .iter()
        .filter(|d| d.locked)
        .map(|d| (d.winner.as_str(), d.loser.as_str()))
        .collect();
    assert_eq!(locked, vec![("A", "B")]);
}

#[test]
fn scenario_d_no_ballots() {
    let _ = env_logger::try_init();
    let c = candidates(&["A", "B"]);
    for m in Method::ALL {
        let res = run(m, &c, &[]);
        assert_eq!(res.outcome, Outcome::NoWinner(NoWinnerReason::EmptyInput));
        assert!(res.round_stats.is_empty());
        assert!(res.pair_decisions.is_empty());
    }
}

#[test]
fn coombs_mirror_ballots_are_all_tied() {
    let _ = env_logger::try_init();
    let c = candidates(&["A", "B"]);
    let b = entries(&[(&[1, 2], 1), (&[2, 1], 1)]);
    let res = run(Method::Coombs, &c, &b);
    assert_eq!(res.outcome, Outcome::NoWinner(NoWinnerReason::AllTied));
    assert!(res.round_stats[0].tally_result_eliminated.is_empty());
}

#[test]
fn unknown_method_label_runs_instant_runoff() {
    let c = candidates(&["A", "B", "C"]);
    let b = entries(&[(&[1], 4), (&[2], 3), (&[3, 2], 2)]);
    let res = run(Method::from_label("instant-runoff"), &c, &b);
    assert_eq!(res.method, Method::InstantRunoff);
    assert_eq!(winner(&res), Some("B"));
}

#[test]
fn majority_wins_first_round() {
    let _ = env_logger::try_init();
    let mut gen = Lcg(7);
    let c = candidates(&["A", "B", "C", "D"]);
    for _ in 0..20 {
        let mut b = gen.ballots(4, 9);
        // Ten more ballots with A first give A a strict majority.
        b.extend(entries(&[(&[1, 3], 10)]).into_iter().map(|mut e| {
            e.ballot_id = format!("maj-{}", e.ballot_id);
            e
        }));
        let res = run(Method::InstantRunoff, &c, &b);
        assert_eq!(winner(&res), Some("A"));
        assert_eq!(res.round_stats.len(), 1);
    }
}

#[test]
fn condorcet_winner_wins_ranked_pairs() {
    let _ = env_logger::try_init();
    let mut gen = Lcg(11);
    let c = candidates(&["A", "B", "C", "D", "E"]);
    let mut checked = 0;
    for _ in 0..200 {
        let b = gen.ballots(5, 15);
        let ranked = rank_ballots(&c, &b, UnknownCandidateMode::Reject).unwrap();
        let record = PairwiseRecord::from_ballots(&ranked);
        let condorcet = c.iter().find(|x| {
            c.iter()
                .filter(|y| y.id != x.id)
                .all(|y| record.get(x.id, y.id) > record.get(y.id, x.id))
        });
        if let Some(cw) = condorcet {
            checked += 1;
            let res = run(Method::RankedPairs, &c, &b);
            assert_eq!(res.outcome, Outcome::Winner(cw.clone()));
        }
    }
    assert!(checked > 0);
}

#[test]
fn tabulations_are_idempotent() {
    let _ = env_logger::try_init();
    let mut gen = Lcg(3);
    let c = candidates(&["A", "B", "C", "D"]);
    for _ in 0..30 {
        let b = gen.ballots(4, 12);
        for m in Method::ALL {
            assert_eq!(run(m, &c, &b), run(m, &c, &b));
        }
    }
}

#[test]
fn rounds_terminate_and_shrink() {
    let _ = env_logger::try_init();
    let mut gen = Lcg(5);
    let c = candidates(&["A", "B", "C", "D", "E", "F"]);
    for seed in 0..40 {
        let b = gen.ballots(6, 1 + seed % 13);
        for mode in [
            TieBreakMode::EliminateAllTied,
            TieBreakMode::UseCandidateOrder,
            TieBreakMode::Random(seed as u32),
        ] {
            let rules = TabulationRules {
                tiebreak_mode: mode,
                ..TabulationRules::DEFAULT_RULES
            };
            for m in [Method::InstantRunoff, Method::Coombs] {
                let res = tabulate(m, &c, &b, &rules).unwrap();
                assert!(res.round_stats.len() <= c.len());
                for pair in res.round_stats.windows(2) {
                    assert!(pair[1].tally.len() < pair[0].tally.len());
                }
                // Only the last round can end the tabulation.
                let last = res.round_stats.len() - 1;
                for rs in res.round_stats[..last].iter() {
                    assert!(!rs.tally_result_eliminated.is_empty());
                    assert!(rs.tally_results_elected.is_empty());
                }
            }
        }
    }
}

#[test]
fn lock_graph_stays_acyclic_at_every_step() {
    let _ = env_logger::try_init();
    let mut gen = Lcg(13);
    let c = candidates(&["A", "B", "C", "D", "E", "F"]);
    let ids: Vec<CandidateId> = c.iter().map(|x| x.id).collect();
    for _ in 0..50 {
        let b = gen.ballots(6, 7);
        let ranked = rank_ballots(&c, &b, UnknownCandidateMode::Reject).unwrap();
        let victories = PairwiseRecord::from_ballots(&ranked).victories(&c);
        for pair in victories.windows(2) {
            assert!(pair[0].margin >= pair[1].margin);
        }
        let mut graph = LockGraph::new(&ids);
        for v in victories.iter() {
            let would_cycle = graph.reaches(v.loser, v.winner);
            assert_eq!(graph.try_lock(v.winner, v.loser), !would_cycle);
            assert!(graph.is_acyclic());
        }
    }
}

#[test]
fn invalid_ballots_are_errors_not_panics() {
    let c = candidates(&["A", "B"]);
    let b = vec![
        BallotEntry::new("ok", 1, 1),
        BallotEntry::new("bad", 2, 3),
        BallotEntry::new("bad", 1, 3),
    ];
    for m in Method::ALL {
        let res = tabulate(m, &c, &b, &TabulationRules::DEFAULT_RULES);
        assert_eq!(
            res,
            Err(TabulationErrors::InvalidBallot {
                ballot_id: "bad".to_string(),
                reason: InvalidBallotReason::DuplicateRank(3),
            })
        );
    }
}
