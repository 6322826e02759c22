//! Tests for the wire codec: inbound schema enforcement and outbound
//! frame shapes.

use gridlock::{
    decode, encode, ClientMessage, ConnectionRegistry, Mark, Match, MatchStatus, ProtocolError,
    ServerMessage,
};
use serde_json::{json, Value};

fn encoded(message: &ServerMessage) -> Value {
    serde_json::from_str(&encode(message)).unwrap()
}

#[test]
fn decodes_move() {
    assert_eq!(
        decode(r#"{"type":"move","cell":4}"#).unwrap(),
        ClientMessage::Move { cell: 4 }
    );
}

#[test]
fn decodes_forfeit() {
    assert_eq!(decode(r#"{"type":"forfeit"}"#).unwrap(), ClientMessage::Forfeit);
}

#[test]
fn out_of_range_cell_is_well_formed() {
    // Schema conformance only: the range check belongs to the match.
    assert_eq!(
        decode(r#"{"type":"move","cell":9}"#).unwrap(),
        ClientMessage::Move { cell: 9 }
    );
}

#[test]
fn malformed_inputs_rejected() {
    let cases = [
        "",                                    // empty
        "not json",                            // unparseable
        "{}",                                  // missing type
        r#"{"type":"dance"}"#,                 // unknown type
        r#"{"type":"move"}"#,                  // missing field
        r#"{"type":"move","cell":"four"}"#,    // wrong field type
        r#"{"type":"move","cell":4.5}"#,       // non-integer
        r#"{"type":"move","cell":-1}"#,        // negative index
        r#"[{"type":"forfeit"}]"#,             // wrong top-level shape
    ];
    for payload in cases {
        assert!(
            matches!(decode(payload), Err(ProtocolError::MalformedMessage(_))),
            "expected rejection for {payload:?}"
        );
    }
}

#[test]
fn encodes_match_start() {
    assert_eq!(
        encoded(&ServerMessage::MatchStart { role: Mark::O }),
        json!({"type": "match_start", "role": "O"})
    );
}

#[test]
fn encodes_state_snapshot() {
    // Build a real position through the state machine: X 0, O 4.
    let mut registry = ConnectionRegistry::new(2);
    let x = registry.on_connect().unwrap();
    let o = registry.on_connect().unwrap();
    let mut m = Match::new(1, x, o);
    m.apply_move(x, 0).unwrap();
    m.apply_move(o, 4).unwrap();

    let frame = encoded(&ServerMessage::State {
        board: m.board().clone(),
        turn: m.turn(),
        status: m.status(),
    });
    assert_eq!(
        frame,
        json!({
            "type": "state",
            "board": ["X", "", "", "", "O", "", "", "", ""],
            "turn": "X",
            "status": "in_progress",
        })
    );
}

#[test]
fn encodes_every_status_spelling() {
    let expect = [
        (MatchStatus::InProgress, "in_progress"),
        (MatchStatus::WonBy(Mark::X), "won_x"),
        (MatchStatus::WonBy(Mark::O), "won_o"),
        (MatchStatus::Draw, "draw"),
        (MatchStatus::Abandoned, "abandoned"),
    ];
    for (status, wire) in expect {
        let frame = encoded(&ServerMessage::MatchEnd { status });
        assert_eq!(frame, json!({"type": "match_end", "status": wire}));
    }
}

#[test]
fn encodes_error_frame() {
    let frame = encoded(&ServerMessage::Error {
        kind: "not_your_turn",
        message: "not your turn".to_string(),
    });
    assert_eq!(
        frame,
        json!({"type": "error", "kind": "not_your_turn", "message": "not your turn"})
    );
}
