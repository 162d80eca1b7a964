//! Per-player state and the move executor.
//!
//! `make_move` assumes the move was drawn from the generator's output (the
//! turn controller enforces that) and concentrates on applying it: per-type
//! preconditions, board mutation, scorekeeping and history. Every failure
//! is reported before any state changes, so a rejected move leaves board
//! and player untouched.

use serde::Serialize;

use crate::engine::board::Board;
use crate::engine::piece::{Piece, PieceId};
use crate::engine::stack::BoundedStack;
use crate::engine::types::{ChessError, Color, Move, MoveType, PieceType, Position};

/// Upper bound on recorded moves per player.
pub const MOVE_HISTORY_CAPACITY: usize = 1000;
/// A player can capture at most the enemy's fifteen non-king pieces.
pub const CAPTURED_CAPACITY: usize = 15;

/// One executed move as remembered by the player who made it.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MoveRecord {
    pub origin: Position,
    #[serde(rename = "move")]
    pub mv: Move,
    pub piece: PieceId,
    pub captured: Option<PieceId>,
    pub promotion: Option<PieceType>,
    /// Player score after this move.
    pub score: u32,
    /// Identities of every piece captured so far, oldest first.
    pub captured_ids: Vec<PieceId>,
}

/// One side of the game: identity, score, capture and move history, and
/// the cached position of the own king.
#[derive(Clone, Debug)]
pub struct Player {
    name: String,
    color: Color,
    score: u32,
    moves: BoundedStack<MoveRecord>,
    captured: BoundedStack<Piece>,
    king_position: Position,
}

impl Player {
    pub fn new(name: impl Into<String>, color: Color) -> Self {
        Player {
            name: name.into(),
            color,
            score: 0,
            moves: BoundedStack::new(MOVE_HISTORY_CAPACITY),
            captured: BoundedStack::new(CAPTURED_CAPACITY),
            king_position: Position::new(color.back_rank(), 4),
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn king_position(&self) -> Position {
        self.king_position
    }

    pub fn captured_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.captured.iter()
    }

    pub fn move_count(&self) -> usize {
        self.moves.len()
    }

    pub fn last_move(&self) -> Option<&MoveRecord> {
        self.moves.peek()
    }

    pub fn move_history(&self) -> impl Iterator<Item = &MoveRecord> {
        self.moves.iter()
    }

    // -----------------------------------------------------------------
    // Execution
    // -----------------------------------------------------------------

    /// Apply `mv` for the piece on `from`.
    ///
    /// `promotion` is consulted only by the promotion move types and must
    /// name a non-pawn, non-king kind there. Informational move types are
    /// refused with `InvalidMoveType`, and nothing may capture a king.
    pub fn make_move(
        &mut self,
        board: &mut Board,
        from: Position,
        mv: Move,
        promotion: Option<PieceType>,
    ) -> Result<(), ChessError> {
        let piece = board.get(from).ok_or(ChessError::SourceEmpty(from))?;
        let piece_id = piece.id();
        let kind = piece.kind();
        let target = mv.position;
        let mut captured_id = None;
        let mut recorded_promotion = None;

        // Stack capacity is verified up front: a full stack must reject
        // the move before the board or the score has changed.
        if self.moves.len() >= self.moves.capacity() {
            return Err(ChessError::HistoryOverflow(self.moves.capacity()));
        }
        let captures = matches!(
            mv.move_type,
            MoveType::Capture | MoveType::EnPassant | MoveType::PromoteWithCapture
        );
        if captures && self.captured.len() >= self.captured.capacity() {
            return Err(ChessError::HistoryOverflow(self.captured.capacity()));
        }

        match mv.move_type {
            MoveType::Advance => {
                board.relocate(from, target)?;
            }
            MoveType::AdvanceTwice => {
                require_kind(mv.move_type, PieceType::Pawn, kind)?;
                // The stamp is the counter value before the relocation, so
                // a neighbor querying on the very next ply sees a gap of
                // exactly one.
                let stamp = board.global_move_counter();
                let first = !piece.has_moved();
                board.relocate(from, target)?;
                if first {
                    if let Some(pawn) = board.get_mut(target) {
                        pawn.stamp_first_move(stamp);
                    }
                }
            }
            MoveType::Capture => {
                captured_id = Some(self.capture_on(board, target)?);
                board.relocate(from, target)?;
            }
            MoveType::EnPassant => {
                require_kind(mv.move_type, PieceType::Pawn, kind)?;
                // The victim stands beside the pawn, not on the target.
                let victim_pos = Position::new(from.rank, target.file);
                let victim = board
                    .get(victim_pos)
                    .ok_or(ChessError::CaptureTargetEmpty(victim_pos))?;
                require_kind(mv.move_type, PieceType::Pawn, victim.kind())?;
                captured_id = Some(self.capture_on(board, victim_pos)?);
                board.relocate(from, target)?;
            }
            MoveType::Promote => {
                require_kind(mv.move_type, PieceType::Pawn, kind)?;
                let promoted = validated_promotion(promotion)?;
                board.relocate(from, target)?;
                self.promote_on(board, target, promoted)?;
                recorded_promotion = Some(promoted);
            }
            MoveType::PromoteWithCapture => {
                require_kind(mv.move_type, PieceType::Pawn, kind)?;
                let promoted = validated_promotion(promotion)?;
                captured_id = Some(self.capture_on(board, target)?);
                board.relocate(from, target)?;
                self.promote_on(board, target, promoted)?;
                recorded_promotion = Some(promoted);
            }
            MoveType::Castle => {
                require_kind(mv.move_type, PieceType::King, kind)?;
                self.perform_castle(board, from, target)?;
            }
            other => return Err(ChessError::InvalidMoveType(other)),
        }

        if kind == PieceType::King {
            self.king_position = if mv.move_type == MoveType::Castle {
                Position::new(target.rank, if target.file == 7 { 6 } else { 2 })
            } else {
                target
            };
        }

        let record = MoveRecord {
            origin: from,
            mv,
            piece: piece_id,
            captured: captured_id,
            promotion: recorded_promotion,
            score: self.score,
            captured_ids: self.captured.iter().map(|p| p.id()).collect(),
        };
        self.moves.push(record)?;

        tracing::debug!(player = %self.color, %mv, from = %from, "move executed");
        Ok(())
    }

    /// Remove the victim on `pos` from play, scoring its value.
    fn capture_on(&mut self, board: &mut Board, pos: Position) -> Result<PieceId, ChessError> {
        match board.get(pos) {
            None => return Err(ChessError::CaptureTargetEmpty(pos)),
            Some(victim) if victim.kind() == PieceType::King => {
                return Err(ChessError::KingCapture)
            }
            Some(_) => {}
        }
        let mut victim = board.take(pos).ok_or(ChessError::CaptureTargetEmpty(pos))?;
        victim.mark_captured();
        self.score += victim.value();
        let id = victim.id();
        self.captured.push(victim)?;
        Ok(id)
    }

    /// Replace the pawn on `pos` with a fresh piece of the chosen kind.
    /// Scores the new piece's value minus the pawn given up.
    fn promote_on(
        &mut self,
        board: &mut Board,
        pos: Position,
        kind: PieceType,
    ) -> Result<(), ChessError> {
        let color = board
            .get(pos)
            .map(|p| p.color())
            .ok_or(ChessError::SourceEmpty(pos))?;
        let mut pawn = board.replace(pos, Piece::new(kind, color, pos))?;
        pawn.mark_promoted();
        self.score += kind.value() - 1;
        Ok(())
    }

    /// The castle move targets the rook's home square. Both pieces
    /// relocate, so the global counter advances twice.
    fn perform_castle(
        &mut self,
        board: &mut Board,
        king_from: Position,
        rook_home: Position,
    ) -> Result<(), ChessError> {
        let rook = board
            .get(rook_home)
            .ok_or(ChessError::SourceEmpty(rook_home))?;
        require_kind(MoveType::Castle, PieceType::Rook, rook.kind())?;

        let rank = rook_home.rank;
        let (rook_file, king_file) = if rook_home.file == 7 { (5, 6) } else { (3, 2) };
        board.relocate(rook_home, Position::new(rank, rook_file))?;
        board.relocate(king_from, Position::new(rank, king_file))?;
        if let Some(king) = board.get_mut(Position::new(rank, king_file)) {
            king.mark_castled();
        }
        Ok(())
    }
}

fn require_kind(
    move_type: MoveType,
    expected: PieceType,
    found: PieceType,
) -> Result<(), ChessError> {
    if found == expected {
        Ok(())
    } else {
        Err(ChessError::WrongPieceType {
            move_type,
            expected,
            found,
        })
    }
}

fn validated_promotion(promotion: Option<PieceType>) -> Result<PieceType, ChessError> {
    let kind = promotion.ok_or(ChessError::MissingPromotion)?;
    if kind.is_promotion_target() {
        Ok(kind)
    } else {
        Err(ChessError::InvalidPromotion(kind))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
