//! Tests for the match state machine: turn order, move validation,
//! and termination.

use gridlock::{
    Board, ConnectionId, ConnectionRegistry, GameError, Mark, Match, MatchStatus,
};

/// Mints `n` fresh connection ids through the registry.
fn ids(n: usize) -> Vec<ConnectionId> {
    let mut registry = ConnectionRegistry::new(64);
    (0..n).map(|_| registry.on_connect().unwrap()).collect()
}

fn new_match() -> (Match, ConnectionId, ConnectionId) {
    let ids = ids(2);
    (Match::new(1, ids[0], ids[1]), ids[0], ids[1])
}

/// Replays alternating moves, panicking on any rejection.
fn play(m: &mut Match, x: ConnectionId, o: ConnectionId, cells: &[usize]) {
    for (i, &cell) in cells.iter().enumerate() {
        let mover = if i % 2 == 0 { x } else { o };
        m.apply_move(mover, cell).unwrap();
    }
}

#[test]
fn x_moves_first() {
    let (m, x, _) = new_match();
    assert_eq!(m.turn(), Mark::X);
    assert_eq!(m.role_of(x), Some(Mark::X));
    assert_eq!(m.status(), MatchStatus::InProgress);
    assert_eq!(m.board(), &Board::new());
}

#[test]
fn turn_flips_after_every_accepted_move() {
    let (mut m, x, o) = new_match();

    m.apply_move(x, 4).unwrap();
    assert_eq!(m.turn(), Mark::O);

    m.apply_move(o, 0).unwrap();
    assert_eq!(m.turn(), Mark::X);

    m.apply_move(x, 8).unwrap();
    assert_eq!(m.turn(), Mark::O);
}

#[test]
fn out_of_turn_move_rejected() {
    let (mut m, x, o) = new_match();

    assert_eq!(m.apply_move(o, 0), Err(GameError::NotYourTurn));

    m.apply_move(x, 0).unwrap();
    assert_eq!(m.apply_move(x, 1), Err(GameError::NotYourTurn));
}

#[test]
fn non_participant_rejected() {
    let ids = ids(3);
    let mut m = Match::new(1, ids[0], ids[1]);
    assert_eq!(m.apply_move(ids[2], 0), Err(GameError::NotParticipant));
}

#[test]
fn out_of_range_cell_rejected() {
    let (mut m, x, _) = new_match();
    assert_eq!(m.apply_move(x, 9), Err(GameError::InvalidCell));
    assert_eq!(m.apply_move(x, usize::MAX), Err(GameError::InvalidCell));
    // Rejection has no side effect: the turn is still X's.
    assert_eq!(m.turn(), Mark::X);
}

#[test]
fn occupied_cell_rejected_without_board_change() {
    let (mut m, x, o) = new_match();
    m.apply_move(x, 4).unwrap();

    let before = m.board().clone();
    assert_eq!(m.apply_move(o, 4), Err(GameError::CellOccupied));
    assert_eq!(m.board(), &before);
    assert_eq!(m.turn(), Mark::O);
}

#[test]
fn top_row_wins_for_x() {
    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[0, 4, 1, 5, 2]);

    assert_eq!(m.status(), MatchStatus::WonBy(Mark::X));
    // Turn freezes once the match is terminal.
    assert_eq!(m.turn(), Mark::X);
}

#[test]
fn terminal_match_rejects_moves_with_game_over() {
    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[0, 4, 1, 5, 2]);

    let board = m.board().clone();
    assert_eq!(m.apply_move(o, 8), Err(GameError::GameOver));
    assert_eq!(m.apply_move(x, 8), Err(GameError::GameOver));
    assert_eq!(m.board(), &board);
    assert_eq!(m.status(), MatchStatus::WonBy(Mark::X));
}

#[test]
fn full_board_without_line_is_draw() {
    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[0, 1, 2, 3, 5, 4, 6, 8, 7]);

    assert_eq!(m.status(), MatchStatus::Draw);
    assert!(m.board().is_full());
}

#[test]
fn draw_requires_full_board() {
    let (mut m, x, o) = new_match();
    // Eight moves in, one cell open, nobody has a line.
    play(&mut m, x, o, &[0, 1, 2, 3, 5, 4, 6, 8]);
    assert_eq!(m.status(), MatchStatus::InProgress);
}

#[test]
fn column_and_diagonal_wins_detected() {
    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[0, 1, 3, 2, 6]); // X takes the left column
    assert_eq!(m.status(), MatchStatus::WonBy(Mark::X));

    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[1, 0, 2, 4, 5, 8]); // O takes the main diagonal
    assert_eq!(m.status(), MatchStatus::WonBy(Mark::O));
}

#[test]
fn win_detection_is_symmetric() {
    // The 8-fold symmetry group of the board as index permutations.
    const SYMMETRIES: [[usize; 9]; 8] = [
        [0, 1, 2, 3, 4, 5, 6, 7, 8], // identity
        [2, 5, 8, 1, 4, 7, 0, 3, 6], // rotate 90
        [8, 7, 6, 5, 4, 3, 2, 1, 0], // rotate 180
        [6, 3, 0, 7, 4, 1, 8, 5, 2], // rotate 270
        [2, 1, 0, 5, 4, 3, 8, 7, 6], // mirror columns
        [6, 7, 8, 3, 4, 5, 0, 1, 2], // mirror rows
        [0, 3, 6, 1, 4, 7, 2, 5, 8], // transpose
        [8, 5, 2, 7, 4, 1, 6, 3, 0], // anti-transpose
    ];

    // X wins the top row via [0,4,1,5,2]; every image of that game
    // under the symmetry group must also be a win for X.
    for sigma in SYMMETRIES {
        let (mut m, x, o) = new_match();
        let moves: Vec<usize> = [0, 4, 1, 5, 2].iter().map(|&c| sigma[c]).collect();
        play(&mut m, x, o, &moves);
        assert_eq!(
            m.status(),
            MatchStatus::WonBy(Mark::X),
            "symmetry {sigma:?} broke win detection"
        );
    }
}

#[test]
fn abandon_transitions_once() {
    let (mut m, _, _) = new_match();
    assert!(m.abandon());
    assert_eq!(m.status(), MatchStatus::Abandoned);
    // Idempotent: the second call reports no transition.
    assert!(!m.abandon());
    assert_eq!(m.status(), MatchStatus::Abandoned);
}

#[test]
fn abandon_does_not_overwrite_a_finished_match() {
    let (mut m, x, o) = new_match();
    play(&mut m, x, o, &[0, 4, 1, 5, 2]);
    assert!(!m.abandon());
    assert_eq!(m.status(), MatchStatus::WonBy(Mark::X));
}

#[test]
fn abandoned_match_rejects_moves() {
    let (mut m, x, _) = new_match();
    m.abandon();
    assert_eq!(m.apply_move(x, 0), Err(GameError::GameOver));
}
