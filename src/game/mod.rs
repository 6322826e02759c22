mod rules;
mod types;

pub use rules::{Match, MatchId};
pub use types::{Board, Cell, Mark, MatchStatus};
