//! Board state: the `Position -> Piece` mapping and the global move counter.
//!
//! The board performs no legality checks of its own — move generation and
//! the executor own that. Its contract is purely structural: a relocation
//! needs an occupied source square, a promotion needs an occupied square,
//! and every successful relocation bumps the global counter exactly once.

use std::collections::HashMap;

use crate::engine::piece::Piece;
use crate::engine::types::{ChessError, Color, PieceType, Position};

/// Back-rank piece order, queen on file 3, identical for both colors
/// (the layout is mirror-symmetric between white's rank 0 and black's
/// rank 7).
const BACK_RANK: [PieceType; 8] = [
    PieceType::Rook,
    PieceType::Knight,
    PieceType::Bishop,
    PieceType::Queen,
    PieceType::King,
    PieceType::Bishop,
    PieceType::Knight,
    PieceType::Rook,
];

/// The board: occupied squares keyed by position (absent = empty), plus a
/// per-game monotonic move counter used to timestamp pawn first moves.
#[derive(Clone, Debug)]
pub struct Board {
    squares: HashMap<Position, Piece>,
    global_move_counter: u64,
}

impl Board {
    /// A board populated with the standard 32-piece opening layout.
    pub fn new() -> Self {
        let mut board = Board::empty();
        board.reset();
        board
    }

    /// An empty board. Used to assemble test positions piece by piece.
    pub fn empty() -> Self {
        Board {
            squares: HashMap::with_capacity(32),
            global_move_counter: 0,
        }
    }

    /// Repopulate the standard opening layout and restart the counter.
    pub fn reset(&mut self) {
        self.squares.clear();
        self.global_move_counter = 0;
        for color in [Color::White, Color::Black] {
            let back = color.back_rank();
            let pawn_rank = (back as i8 + color.forward()) as u8;
            for (file, &kind) in BACK_RANK.iter().enumerate() {
                self.put(Piece::new(kind, color, Position::new(back, file as u8)));
            }
            for file in 0..8 {
                self.put(Piece::new(
                    PieceType::Pawn,
                    color,
                    Position::new(pawn_rank, file),
                ));
            }
        }
    }

    // -----------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------

    /// The piece on `pos`, if any.
    pub fn get(&self, pos: Position) -> Option<&Piece> {
        self.squares.get(&pos)
    }

    pub fn is_occupied(&self, pos: Position) -> bool {
        self.squares.contains_key(&pos)
    }

    /// Iterate all pieces currently on the board.
    pub fn pieces(&self) -> impl Iterator<Item = &Piece> {
        self.squares.values()
    }

    /// Locate the king of the given color by scanning the board.
    pub fn king_position(&self, color: Color) -> Option<Position> {
        self.pieces()
            .find(|p| p.kind() == PieceType::King && p.color() == color)
            .map(|p| p.position())
    }

    /// Monotonic counter, incremented once per successful relocation.
    pub fn global_move_counter(&self) -> u64 {
        self.global_move_counter
    }

    /// Number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.squares.len()
    }

    // -----------------------------------------------------------------
    // Mutations
    // -----------------------------------------------------------------

    /// Place a piece on its own position. Replaces any previous occupant.
    pub fn put(&mut self, piece: Piece) {
        self.squares.insert(piece.position(), piece);
    }

    /// Relocate the piece on `from` to `to`, updating the piece's own
    /// position and move counter and bumping the global counter.
    ///
    /// Fails with `SourceEmpty` when `from` holds nothing. The destination
    /// must already be clear — captures remove the victim first.
    pub fn relocate(&mut self, from: Position, to: Position) -> Result<(), ChessError> {
        let mut piece = self
            .squares
            .remove(&from)
            .ok_or(ChessError::SourceEmpty(from))?;
        debug_assert!(
            !self.squares.contains_key(&to),
            "relocation onto occupied square {to}"
        );
        piece.relocated_to(to);
        self.squares.insert(to, piece);
        self.global_move_counter += 1;
        Ok(())
    }

    /// Remove the piece on `pos` from play, returning ownership of it.
    pub(crate) fn take(&mut self, pos: Position) -> Option<Piece> {
        self.squares.remove(&pos)
    }

    /// Replace the piece on `pos` in place (promotion), returning the
    /// displaced piece. Fails when the square is empty. Does not touch the
    /// global counter — no relocation happens.
    pub(crate) fn replace(
        &mut self,
        pos: Position,
        replacement: Piece,
    ) -> Result<Piece, ChessError> {
        debug_assert_eq!(replacement.position(), pos);
        match self.squares.insert(pos, replacement) {
            Some(displaced) => Ok(displaced),
            None => {
                self.squares.remove(&pos);
                Err(ChessError::SourceEmpty(pos))
            }
        }
    }

    /// Mutable access for the executor (first-move stamps, castled flag).
    pub(crate) fn get_mut(&mut self, pos: Position) -> Option<&mut Piece> {
        self.squares.get_mut(&pos)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
