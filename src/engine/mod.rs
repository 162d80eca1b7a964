pub mod attacks;
pub mod board;
pub mod game;
pub mod movegen;
pub mod piece;
pub mod player;
pub mod stack;
pub mod types;

pub use board::Board;
pub use game::{Game, GameStatus};
pub use movegen::legal_moves;
pub use piece::{Piece, PieceId};
pub use player::{MoveRecord, Player};
pub use stack::BoundedStack;
pub use types::*;
