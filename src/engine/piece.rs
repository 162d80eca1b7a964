//! The piece model: one struct over the closed `PieceType` union.
//!
//! A single `Piece` carries the shared state (identity, color, counters,
//! captured flag) plus the pawn- and king-specific flags; all behavior
//! dispatch happens by matching `kind`.

use serde::Serialize;
use uuid::Uuid;

use crate::engine::types::{Color, PieceType, Position};

/// Stable identity for a piece, assigned at construction and kept through
/// relocation and capture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct PieceId(Uuid);

impl PieceId {
    fn generate() -> Self {
        PieceId(Uuid::new_v4())
    }
}

impl std::fmt::Display for PieceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A chess piece and its mutable in-game state.
///
/// Pin and check state are deliberately *not* stored here: both are
/// recomputed from the board on every query (see `engine::attacks`), so
/// holding them on the piece would only create a second source of truth.
#[derive(Clone, Debug)]
pub struct Piece {
    id: PieceId,
    kind: PieceType,
    color: Color,
    position: Position,
    move_counter: u32,
    captured: bool,
    /// Pawn only: replaced by a promotion piece.
    promoted: bool,
    /// Pawn only: global move counter observed at the instant of its
    /// two-square first move. Drives en-passant eligibility of neighbors.
    first_move_counter: Option<u64>,
    /// King only: has performed castling.
    castled: bool,
}

impl Piece {
    pub fn new(kind: PieceType, color: Color, position: Position) -> Self {
        Piece {
            id: PieceId::generate(),
            kind,
            color,
            position,
            move_counter: 0,
            captured: false,
            promoted: false,
            first_move_counter: None,
            castled: false,
        }
    }

    // -----------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------

    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn kind(&self) -> PieceType {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn value(&self) -> u32 {
        self.kind.value()
    }

    pub fn move_counter(&self) -> u32 {
        self.move_counter
    }

    pub fn has_moved(&self) -> bool {
        self.move_counter > 0
    }

    pub fn is_captured(&self) -> bool {
        self.captured
    }

    pub fn is_promoted(&self) -> bool {
        self.promoted
    }

    pub fn first_move_counter(&self) -> Option<u64> {
        self.first_move_counter
    }

    pub fn has_castled(&self) -> bool {
        self.castled
    }

    // -----------------------------------------------------------------
    // State transitions (driven by Board and the move executor)
    // -----------------------------------------------------------------

    pub(crate) fn relocated_to(&mut self, position: Position) {
        self.position = position;
        self.move_counter += 1;
    }

    pub(crate) fn mark_captured(&mut self) {
        self.captured = true;
    }

    pub(crate) fn mark_promoted(&mut self) {
        debug_assert_eq!(self.kind, PieceType::Pawn);
        self.promoted = true;
    }

    pub(crate) fn stamp_first_move(&mut self, global_counter: u64) {
        debug_assert_eq!(self.kind, PieceType::Pawn);
        self.first_move_counter = Some(global_counter);
    }

    pub(crate) fn mark_castled(&mut self) {
        debug_assert_eq!(self.kind, PieceType::King);
        self.castled = true;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
