//! Session facade for transport layers.
//!
//! Positions cross this boundary as two-digit string keys and engine state
//! leaves as serde-friendly DTOs, so a network or UI layer never touches
//! engine types directly. The facade owns one game and forwards every
//! rules question to it.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::engine::game::{Game, GameStatus};
use crate::engine::piece::Piece;
use crate::engine::types::{ChessError, Color, Move, MoveType, PieceType, Position};

// ---------------------------------------------------------------------------
// Request models
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRequest {
    pub from: String,
    pub to: String,
    pub move_type: MoveType,
    pub promotion: Option<PieceType>,
}

// ---------------------------------------------------------------------------
// Response models
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PieceDto {
    pub id: String,
    pub kind: PieceType,
    pub color: Color,
    pub position: String,
    pub value: u32,
    pub move_count: u32,
    pub promoted: bool,
    pub castled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardDto {
    /// Occupied squares keyed by position ("RF" digits).
    pub squares: BTreeMap<String, PieceDto>,
    pub global_move_counter: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LegalMoveDto {
    pub position: String,
    pub move_type: MoveType,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerDto {
    pub name: String,
    pub color: Color,
    pub score: u32,
    pub captured: Vec<PieceDto>,
    pub moves_played: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveResponse {
    pub status: GameStatus,
    pub next_turn: Color,
    pub score: u32,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// One game behind a string-keyed interface.
pub struct GameSession {
    game: Game,
}

impl GameSession {
    pub fn new(config: &GameConfig) -> Self {
        GameSession {
            game: Game::new(config.player_one.clone(), config.player_two.clone()),
        }
    }

    /// Deterministic construction for callers that control the color coin.
    pub fn with_rng<R: Rng + ?Sized>(config: &GameConfig, rng: &mut R) -> Self {
        GameSession {
            game: Game::with_rng(config.player_one.clone(), config.player_two.clone(), rng),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn status(&self) -> GameStatus {
        self.game.status()
    }

    pub fn active_color(&self) -> Color {
        self.game.active_color()
    }

    /// Legal moves for the piece on the given square key.
    pub fn legal_moves(&self, from: &str) -> Result<Vec<LegalMoveDto>, ChessError> {
        let from = Position::from_key(from)?;
        let moves = self.game.legal_moves(from)?;
        tracing::debug!(game_id = %self.game.id(), %from, count = moves.len(), "legal moves queried");
        Ok(moves
            .into_iter()
            .map(|m| LegalMoveDto {
                position: m.position.key(),
                move_type: m.move_type,
            })
            .collect())
    }

    pub fn make_move(&mut self, request: &MoveRequest) -> Result<MoveResponse, ChessError> {
        let from = Position::from_key(&request.from)?;
        let to = Position::from_key(&request.to)?;
        let mover = self.game.active_color();
        let status = self
            .game
            .make_move(from, Move::new(to, request.move_type), request.promotion)?;
        Ok(MoveResponse {
            status,
            next_turn: self.game.active_color(),
            score: self.game.player(mover).score(),
        })
    }

    /// Read-only snapshot of every occupied square.
    pub fn board(&self) -> BoardDto {
        let squares = self
            .game
            .board()
            .pieces()
            .map(|p| (p.position().key(), piece_dto(p)))
            .collect();
        BoardDto {
            squares,
            global_move_counter: self.game.board().global_move_counter(),
        }
    }

    pub fn player(&self, color: Color) -> PlayerDto {
        let player = self.game.player(color);
        PlayerDto {
            name: player.name().to_string(),
            color: player.color(),
            score: player.score(),
            captured: player.captured_pieces().map(piece_dto).collect(),
            moves_played: player.move_count(),
        }
    }

    pub fn reset(&mut self) {
        self.game.reset();
    }
}

fn piece_dto(piece: &Piece) -> PieceDto {
    PieceDto {
        id: piece.id().to_string(),
        kind: piece.kind(),
        color: piece.color(),
        position: piece.position().key(),
        value: piece.value(),
        move_count: piece.move_counter(),
        promoted: piece.is_promoted(),
        castled: piece.has_castled(),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
