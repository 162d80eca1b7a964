//! A chess rules engine.
//!
//! The [`engine`] module holds the core: board state, per-piece legal move
//! generation under full chess law (pins, checks, double check, en
//! passant, castling, promotion), and validated move execution with score
//! and capture tracking. [`api`] wraps one game in a string-keyed session
//! facade for transport layers, and [`config`] reads player names from
//! the environment.
//!
//! ```
//! use chess_rules::engine::{Game, MoveType, Position};
//!
//! let mut game = Game::new("alice", "bob");
//! let from = Position::from_key("14")?;
//! let moves = game.legal_moves(from)?;
//! assert!(moves.iter().any(|m| m.move_type == MoveType::AdvanceTwice));
//! # Ok::<(), chess_rules::engine::ChessError>(())
//! ```

pub mod api;
pub mod config;
pub mod engine;

pub use api::GameSession;
pub use config::GameConfig;
pub use engine::{
    Board, ChessError, Color, Game, GameStatus, Move, MoveType, Piece, PieceType, Position,
};
