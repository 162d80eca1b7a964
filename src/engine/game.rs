//! The turn controller: two players, one board, strict alternation.
//!
//! A move request is validated against the generator's own output for the
//! selected piece before the executor touches anything, so a caller can
//! never smuggle in a move the rules would not offer. After every accepted
//! move the status is recomputed for the side now to move, including full
//! checkmate and stalemate detection by simulated evasion search.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::Serialize;
use uuid::Uuid;

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::movegen;
use crate::engine::player::Player;
use crate::engine::types::{ChessError, Color, Move, MoveType, PieceType, Position};

/// Game outcome state, always relative to the side to move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Active,
    Check,
    Checkmate,
    Stalemate,
}

impl GameStatus {
    pub fn is_over(self) -> bool {
        matches!(self, GameStatus::Checkmate | GameStatus::Stalemate)
    }
}

/// A full game: board, both players, whose turn it is, and metadata.
#[derive(Clone, Debug)]
pub struct Game {
    id: String,
    created_at: DateTime<Utc>,
    board: Board,
    white: Player,
    black: Player,
    active: Color,
    status: GameStatus,
}

impl Game {
    /// Create a game with colors assigned by the provided randomness
    /// source. White always moves first; the coin decides which named
    /// player gets it.
    pub fn with_rng<R: Rng + ?Sized>(
        player_one: impl Into<String>,
        player_two: impl Into<String>,
        rng: &mut R,
    ) -> Self {
        let (one, two) = (player_one.into(), player_two.into());
        let (white_name, black_name) = if rng.gen::<bool>() {
            (one, two)
        } else {
            (two, one)
        };
        let game = Game {
            id: Uuid::new_v4().to_string(),
            created_at: Utc::now(),
            board: Board::new(),
            white: Player::new(white_name, Color::White),
            black: Player::new(black_name, Color::Black),
            active: Color::White,
            status: GameStatus::Active,
        };
        tracing::info!(
            game_id = %game.id,
            white = game.white.name(),
            black = game.black.name(),
            "game created"
        );
        game
    }

    pub fn new(player_one: impl Into<String>, player_two: impl Into<String>) -> Self {
        Game::with_rng(player_one, player_two, &mut rand::thread_rng())
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn active_color(&self) -> Color {
        self.active
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player(&self, color: Color) -> &Player {
        match color {
            Color::White => &self.white,
            Color::Black => &self.black,
        }
    }

    pub fn active_player(&self) -> &Player {
        self.player(self.active)
    }

    // -----------------------------------------------------------------
    // Moves
    // -----------------------------------------------------------------

    /// Legal moves for the piece on `from`, which must belong to the side
    /// to move. While in double check, only the king may be selected and
    /// every other piece reports an empty set.
    pub fn legal_moves(&self, from: Position) -> Result<Vec<Move>, ChessError> {
        let piece = self.board.get(from).ok_or(ChessError::SourceEmpty(from))?;
        if piece.color() != self.active {
            return Err(ChessError::OutOfTurn(from));
        }
        if piece.kind() != PieceType::King && attacks::in_double_check(&self.board, self.active) {
            return Ok(Vec::new());
        }
        movegen::legal_moves(&self.board, from)
    }

    /// Validate `mv` against the generated set for `from`, execute it, and
    /// pass the turn. Returns the status facing the next player.
    pub fn make_move(
        &mut self,
        from: Position,
        mv: Move,
        promotion: Option<PieceType>,
    ) -> Result<GameStatus, ChessError> {
        let offered = self.legal_moves(from)?;
        if !offered.contains(&mv) {
            return Err(ChessError::IllegalMove { from, mv });
        }

        let player = match self.active {
            Color::White => &mut self.white,
            Color::Black => &mut self.black,
        };
        player.make_move(&mut self.board, from, mv, promotion)?;

        self.active = !self.active;
        self.status = self.compute_status();
        tracing::info!(
            game_id = %self.id,
            %mv,
            next = %self.active,
            status = ?self.status,
            "move accepted"
        );
        Ok(self.status)
    }

    /// Restore the opening layout and fresh players. Names persist, the
    /// color coin is tossed again.
    pub fn reset_with_rng<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let (one, two) = (self.white.name().to_string(), self.black.name().to_string());
        let (white_name, black_name) = if rng.gen::<bool>() { (one, two) } else { (two, one) };
        self.board.reset();
        self.white = Player::new(white_name, Color::White);
        self.black = Player::new(black_name, Color::Black);
        self.active = Color::White;
        self.status = GameStatus::Active;
        tracing::info!(game_id = %self.id, "game reset");
    }

    pub fn reset(&mut self) {
        self.reset_with_rng(&mut rand::thread_rng());
    }

    // -----------------------------------------------------------------
    // Status
    // -----------------------------------------------------------------

    fn compute_status(&self) -> GameStatus {
        let in_check = attacks::in_check(&self.board, self.active);
        if self.side_has_escape(self.active) {
            if in_check {
                GameStatus::Check
            } else {
                GameStatus::Active
            }
        } else if in_check {
            GameStatus::Checkmate
        } else {
            GameStatus::Stalemate
        }
    }

    /// Whether `color` has at least one move that leaves its own king
    /// safe. Each candidate is applied to a board clone and check is
    /// re-run, so shields, interpositions and en-passant removals are all
    /// accounted for.
    fn side_has_escape(&self, color: Color) -> bool {
        let double_check = attacks::in_double_check(&self.board, color);
        let origins: Vec<Position> = self
            .board
            .pieces()
            .filter(|p| p.color() == color)
            .filter(|p| !double_check || p.kind() == PieceType::King)
            .map(|p| p.position())
            .collect();

        for from in origins {
            let Ok(moves) = movegen::legal_moves(&self.board, from) else {
                continue;
            };
            for mv in moves {
                if mv.move_type.is_executable() && move_leaves_king_safe(&self.board, from, mv, color)
                {
                    return true;
                }
            }
        }
        false
    }
}

/// Apply `mv` structurally on a clone of `board` and test whether
/// `color`'s king is attacked afterwards.
fn move_leaves_king_safe(board: &Board, from: Position, mv: Move, color: Color) -> bool {
    let mut sim = board.clone();
    let target = mv.position;
    let ok = match mv.move_type {
        MoveType::EnPassant => {
            sim.take(Position::new(from.rank, target.file));
            sim.relocate(from, target).is_ok()
        }
        MoveType::Castle => {
            // Offered castles already exclude check and attacked transit.
            let rank = target.rank;
            let (rook_file, king_file) = if target.file == 7 { (5, 6) } else { (3, 2) };
            sim.relocate(target, Position::new(rank, rook_file)).is_ok()
                && sim.relocate(from, Position::new(rank, king_file)).is_ok()
        }
        _ => {
            sim.take(target);
            sim.relocate(from, target).is_ok()
        }
    };
    ok && !attacks::in_check(&sim, color)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
