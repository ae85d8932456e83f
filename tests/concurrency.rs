use std::sync::Arc;

use rand::{rngs::StdRng, seq::IteratorRandom, Rng, SeedableRng};
use shared_chess::board::Board;
use shared_chess::types::{Color, Coord, Square};
use shared_chess::{Game, Response};

fn assert_kings_consistent(board: &Board, white: Coord, black: Coord) {
    assert_eq!(board.kings(Color::White), vec![white]);
    assert_eq!(board.kings(Color::Black), vec![black]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_moves_are_serialized() {
    let game = Arc::new(Game::new());
    game.submit(b"00 W\n").await;

    let tasks: Vec<_> = (0..16)
        .map(|_| {
            let game = game.clone();
            tokio::spawn(async move { game.submit(b"02 WPe2-e4\n").await })
        })
        .collect();

    let mut ok = 0;
    for task in tasks {
        match task.await.unwrap() {
            Response::Ok => ok += 1,
            Response::OutOfTurn => {}
            other => panic!("unexpected {other:?}"),
        }
    }
    assert_eq!(ok, 1);
    let summary = game.summary().await;
    assert_eq!(summary.moves, 1);
    assert_eq!(summary.turn, Color::Black);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn syntax_errors_do_not_interfere_with_play() {
    let game = Arc::new(Game::new());
    game.submit(b"00 B\n").await;

    let noise: Vec<_> = (0..8)
        .map(|_| {
            let game = game.clone();
            tokio::spawn(async move {
                for _ in 0..50 {
                    assert_eq!(game.submit(b"02 ??\n").await, Response::InvalidFormat);
                }
            })
        })
        .collect();

    // The computer and the human alternate while the noise is going on.
    assert_eq!(game.submit(b"03\n").await, Response::Ok);
    assert_eq!(game.submit(b"02 BPe7-e5\n").await, Response::Ok);
    assert_eq!(game.submit(b"03\n").await, Response::Ok);
    for task in noise {
        task.await.unwrap();
    }
    assert_eq!(game.summary().await.moves, 3);
}

/// Plays random (mostly illegal) human moves against the computer and checks
/// the board invariants after every step.
#[tokio::test]
async fn random_play_keeps_invariants() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let game = Game::new();
        let human = if rng.gen_bool(0.5) { Color::White } else { Color::Black };
        game.submit(format!("00 {}\n", human.code() as char).as_bytes()).await;

        for _ in 0..200 {
            let before = game.summary().await;
            if !before.status.is_active() {
                break;
            }
            if before.turn != human {
                let r = game.submit(b"03\n").await;
                assert!(
                    matches!(r, Response::Ok | Response::Check | Response::Mate | Response::Tie),
                    "computer move gave {r:?}"
                );
                continue;
            }

            let Some((from, piece)) = before.board.pieces(human).choose(&mut rng) else {
                panic!("human has no pieces");
            };
            let Some(to) = Coord::new(rng.gen_range(0..8), rng.gen_range(0..8)) else {
                continue;
            };
            let mut line = format!(
                "02 {}{}{}-{}",
                human.code() as char,
                piece.kind.code() as char,
                from,
                to
            );
            if let Square::Occupied(target) = before.board.get(to) {
                line.push('x');
                line.push(target.color.code() as char);
                line.push(target.kind.code() as char);
            }
            line.push('\n');

            let r = game.submit(line.as_bytes()).await;
            let after = game.summary().await;
            assert_kings_consistent(&after.board, after.white_king, after.black_king);
            match r {
                Response::IllegalMove => {
                    assert_eq!(after, before, "{line:?} was rejected but changed the game");
                }
                Response::Ok | Response::Check | Response::Mate => {
                    assert_eq!(after.moves, before.moves + 1);
                    assert_eq!(after.turn, human.opposite());
                }
                other => panic!("{line:?} gave {other:?}"),
            }
        }
    }
}
