use rand::SeedableRng;
use rand::rngs::StdRng;
use xtmines::xtm_board::{Board, Visibility};
use xtmines::xtm_game::{Difficulty, GameSettings};
use xtmines::xtm_scores::{Outcome, ScoreLog, player_stats, top_winners};
use xtmines::xtm_session::{Action, GameSession, SessionState, Turn};

fn safe_hidden_cells(board: &Board) -> Vec<(usize, usize)> {
    let n = board.size();
    (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .filter(|&(r, c)| !board.has_bomb(r, c) && board.visibility(r, c) == Some(Visibility::Hidden))
        .collect()
}

#[test]
fn test_seeded_games_are_reproducible() {
    let settings = GameSettings::for_difficulty(Difficulty::Hard);
    let a = GameSession::start(settings, &mut StdRng::seed_from_u64(99)).unwrap();
    let b = GameSession::start(settings, &mut StdRng::seed_from_u64(99)).unwrap();
    assert_eq!(a.board(), b.board());
    assert_eq!(a.opening(), b.opening());
    assert_eq!(a.board().bomb_count(), 28);
}

#[test]
fn test_easy_game_won_after_all_safe_cells() {
    let settings = GameSettings::for_difficulty(Difficulty::Easy);
    let mut rng = StdRng::seed_from_u64(5);
    let mut session = GameSession::start(settings, &mut rng).unwrap();

    while !session.is_finished() {
        let (r, c) = safe_hidden_cells(session.board())[0];
        session.select(r, c).unwrap();
        let turn = session.act(Action::Reveal).unwrap();
        assert_ne!(turn, Turn::Lost);
    }
    assert_eq!(session.state(), SessionState::Won);
    assert_eq!(session.board().revealed_count(), 36 - 5);
}

#[test]
fn test_played_games_feed_rankings_and_stats() {
    let dir = tempfile::tempdir().unwrap();
    let log = ScoreLog::new(dir.path().join("highscore.txt"));
    let settings = GameSettings::for_difficulty(Difficulty::Easy);
    let mut rng = StdRng::seed_from_u64(17);

    // one loss: step on the first bomb found
    let mut lost = loop {
        let s = GameSession::start(settings, &mut rng).unwrap();
        if !s.is_finished() {
            break s;
        }
    };
    let n = lost.board().size();
    let bomb = (0..n)
        .flat_map(|r| (0..n).map(move |c| (r, c)))
        .find(|&(r, c)| lost.board().has_bomb(r, c))
        .unwrap();
    lost.select(bomb.0, bomb.1).unwrap();
    assert_eq!(lost.act(Action::Reveal), Ok(Turn::Lost));
    log.append(&lost.record("alice").unwrap().unwrap()).unwrap();

    // one win
    let mut won = GameSession::start(settings, &mut rng).unwrap();
    while !won.is_finished() {
        let (r, c) = safe_hidden_cells(won.board())[0];
        won.select(r, c).unwrap();
        won.act(Action::Reveal).unwrap();
    }
    log.append(&won.record("alice").unwrap().unwrap()).unwrap();

    let records = log.load().unwrap();
    assert_eq!(records.len(), 2);
    let top = top_winners(&records, "EASY", 5);
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].outcome, Outcome::Win);

    let stats = player_stats(&records, "Alice").unwrap();
    assert_eq!((stats.games, stats.wins, stats.losses), (2, 1, 1));
}
