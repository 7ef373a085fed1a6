use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::SeedableRng;
use swiss_tournament_core::graph::MatchGraph;
use swiss_tournament_core::store::{MemoryStore, Store};
use swiss_tournament_core::{
    Key, Match, Outcome, PairingOptions, ResultUpdate, RoundState, Tournament,
};

fn assert_matching(matches: &[Match]) {
    let mut seen = HashSet::new();
    for m in matches {
        assert_ne!(Some(m.competitor_a), m.competitor_b);
        assert_eq!(m.is_bye(), m.outcome == Outcome::Bye);

        for id in m.competitors() {
            assert!(seen.insert(id));
        }
    }
}

fn pending_rounds(tournament: &Tournament) -> usize {
    tournament
        .rounds
        .iter()
        .filter(|round| round.has_pending())
        .count()
}

#[test]
fn test_full_tournament() {
    let names = ["Ann", "Bob", "Cid", "Dee", "Eve", "Fay", "Gus"];
    let mut rng = StdRng::seed_from_u64(7);
    let options = PairingOptions::default();
    let store = MemoryStore::new();

    let tournament = Tournament::create("Open", 3, names).unwrap();
    let id = tournament.id;
    store.save(&tournament).unwrap();

    let mut byes = Vec::new();
    let mut pairs = HashSet::new();

    for number in 1..=3 {
        let mut tournament = store.load(id).unwrap().unwrap();

        let round = tournament.pair_next(&mut rng, &options).unwrap();
        assert_eq!(round.number, number);
        assert_eq!(round.matches.len(), 4);
        assert_matching(&round.matches);
        assert_eq!(pending_rounds(&tournament), 1);

        for m in &round.matches {
            match m.pair() {
                Some(pair) => assert!(pairs.insert(pair), "rematch in round {}", number),
                None => byes.push(m.competitor_a),
            }
        }

        let updates: Vec<_> = round
            .matches
            .iter()
            .map(|m| ResultUpdate::new(m.id, "A_WINS"))
            .collect();
        tournament.finalize_round(&updates).unwrap();

        assert_eq!(tournament.state(), RoundState::RoundComplete);
        assert_eq!(pending_rounds(&tournament), 0);
        store.save(&tournament).unwrap();
    }

    let tournament = store.load(id).unwrap().unwrap();
    assert!(tournament.is_complete());
    assert_eq!(byes.iter().collect::<HashSet<_>>().len(), 3);
    assert_eq!(tournament.bye_history.len(), 3);

    // Three decided matches and one bye per round.
    let standings = tournament.standings();
    assert_eq!(standings.iter().map(|s| s.points).sum::<u32>(), 36);

    let keys: Vec<_> = standings.iter().map(|s| s.key).collect();
    assert!(keys.windows(2).all(|w| w[0] >= w[1]));

    for (rank, standing) in standings.iter().enumerate() {
        assert_eq!(standing.rank, rank + 1);
        assert_eq!(standing.key.points, standing.points);
        assert_eq!(standing.key.to_string().parse::<Key>(), Ok(standing.key));
    }
}

#[test]
fn test_restart_keeps_history() {
    let mut rng = StdRng::seed_from_u64(3);
    let options = PairingOptions::default();

    let mut tournament = Tournament::create("Open", 4, ["A", "B", "C", "D", "E", "F"]).unwrap();

    for _ in 0..2 {
        let round = tournament.pair_next(&mut rng, &options).unwrap();
        let updates: Vec<_> = round
            .matches
            .iter()
            .map(|m| ResultUpdate::new(m.id, "TIE"))
            .collect();
        tournament.finalize_round(&updates).unwrap();
    }

    let played = tournament.rounds.clone();

    tournament.pair_next(&mut rng, &options).unwrap();
    let round = tournament.restart_round(&mut rng, &options).unwrap();

    assert_eq!(round.number, 3);
    assert_eq!(&tournament.rounds[..2], &played[..]);
    assert_eq!(tournament.rounds.len(), 3);
    assert_matching(&round.matches);

    // Ties never score.
    assert!(tournament.standings().iter().all(|s| s.points == 0));
}

#[test]
fn test_scoring_after_second_round() {
    let mut rng = StdRng::seed_from_u64(11);
    let options = PairingOptions::default();

    let mut tournament = Tournament::create("Open", 3, ["A", "B", "C", "D", "E"]).unwrap();

    let round = tournament.pair_next(&mut rng, &options).unwrap();
    let updates: Vec<_> = round
        .matches
        .iter()
        .map(|m| ResultUpdate::new(m.id, "A_WINS"))
        .collect();
    tournament.finalize_round(&updates).unwrap();

    let before = MatchGraph::build(&tournament);

    let round = tournament.pair_next(&mut rng, &options).unwrap();
    assert_eq!(round.number, 2);

    let updates: Vec<_> = round
        .matches
        .iter()
        .map(|m| ResultUpdate::new(m.id, "B_WINS"))
        .collect();
    tournament.finalize_round(&updates).unwrap();

    let after = MatchGraph::build(&tournament);

    let mut decided = 0;
    for m in &round.matches {
        let (a, Some(b)) = (m.competitor_a, m.competitor_b) else {
            continue;
        };
        decided += 1;

        // B wins every match of round 2.
        let winner = (before.get(b).unwrap(), after.get(b).unwrap());
        let loser = (before.get(a).unwrap(), after.get(a).unwrap());

        assert_eq!(winner.1.wins_real(), winner.0.wins_real() + 1);
        assert_eq!(winner.1.loss_penalty(), winner.0.loss_penalty());
        assert_eq!(loser.1.wins_real(), loser.0.wins_real());
        assert_eq!(loser.1.loss_penalty(), loser.0.loss_penalty() + 2 * 2);
    }
    assert_eq!(decided, 2);
}
