//! Ray-casting queries: square attacks, king check state, and absolute pins.
//!
//! Everything here is a pure function of the board. Pin and check state are
//! recomputed on demand rather than cached on pieces, so the answers can
//! never go stale after a relocation.

use crate::engine::board::Board;
use crate::engine::piece::Piece;
use crate::engine::types::{Color, Direction, PieceType, Pin, Position};

/// The eight knight jump offsets as (rank, file) deltas.
pub(crate) const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (1, 2),
    (1, -2),
    (-1, 2),
    (-1, -2),
];

/// Walk outward from `from` in `dir` and return the first piece hit.
pub(crate) fn first_piece_along(board: &Board, from: Position, dir: Direction) -> Option<&Piece> {
    let mut cursor = from.step(dir)?;
    loop {
        if let Some(piece) = board.get(cursor) {
            return Some(piece);
        }
        cursor = cursor.step(dir)?;
    }
}

/// The compass direction from `from` to `to` when the two squares share a
/// rank, a file or a diagonal, `None` otherwise.
pub(crate) fn direction_between(from: Position, to: Position) -> Option<Direction> {
    if from == to {
        return None;
    }
    let dr = to.rank as i8 - from.rank as i8;
    let df = to.file as i8 - from.file as i8;
    let aligned = dr == 0 || df == 0 || dr.abs() == df.abs();
    if !aligned {
        return None;
    }
    let unit = (dr.signum(), df.signum());
    Direction::ALL.into_iter().find(|d| d.delta() == unit)
}

/// Absolute-pin query for a single piece.
///
/// The piece is pinned when it is the only piece between its own king and
/// an enemy slider whose geometry matches the shared line. `toward` points
/// from the piece to the pinning attacker. Kings are never pinned.
pub fn pin_on(board: &Board, piece: &Piece) -> Option<Pin> {
    if piece.kind() == PieceType::King {
        return None;
    }
    let king = board.king_position(piece.color())?;
    let toward = direction_between(king, piece.position())?;
    // Nothing may stand between the king and the candidate.
    let shield = first_piece_along(board, king, toward)?;
    if shield.id() != piece.id() {
        return None;
    }
    let attacker = first_piece_along(board, piece.position(), toward)?;
    if attacker.color() != piece.color() && attacker.kind().slides_along(toward.axis()) {
        Some(Pin { toward })
    } else {
        None
    }
}

/// All pieces of color `by` that attack `square`, reported by position.
///
/// Covers sliders along the eight rays, knight jumps, pawn capture
/// diagonals and enemy-king adjacency.
pub fn attackers_of(board: &Board, square: Position, by: Color) -> Vec<Position> {
    let mut attackers = Vec::new();

    for dir in Direction::ALL {
        if let Some(piece) = first_piece_along(board, square, dir) {
            if piece.color() == by && piece.kind().slides_along(dir.axis()) {
                attackers.push(piece.position());
            }
        }
    }

    for (dr, df) in KNIGHT_OFFSETS {
        if let Some(pos) = square.offset(dr, df) {
            if let Some(piece) = board.get(pos) {
                if piece.color() == by && piece.kind() == PieceType::Knight {
                    attackers.push(pos);
                }
            }
        }
    }

    // A pawn of `by` attacks `square` from one rank behind it (relative to
    // the pawn's own forward direction).
    for df in [-1, 1] {
        if let Some(pos) = square.offset(-by.forward(), df) {
            if let Some(piece) = board.get(pos) {
                if piece.color() == by && piece.kind() == PieceType::Pawn {
                    attackers.push(pos);
                }
            }
        }
    }

    for dr in -1..=1i8 {
        for df in -1..=1i8 {
            if dr == 0 && df == 0 {
                continue;
            }
            if let Some(pos) = square.offset(dr, df) {
                if let Some(piece) = board.get(pos) {
                    if piece.color() == by && piece.kind() == PieceType::King {
                        attackers.push(pos);
                    }
                }
            }
        }
    }

    attackers
}

pub fn is_square_attacked(board: &Board, square: Position, by: Color) -> bool {
    !attackers_of(board, square, by).is_empty()
}

/// Positions of every enemy piece currently giving check to `color`'s king.
/// Empty when the king is absent (bare test positions) or not in check.
pub fn king_attackers(board: &Board, color: Color) -> Vec<Position> {
    match board.king_position(color) {
        Some(king) => attackers_of(board, king, !color),
        None => Vec::new(),
    }
}

pub fn in_check(board: &Board, color: Color) -> bool {
    !king_attackers(board, color).is_empty()
}

/// Two distinct attackers at once. Only king moves can answer this.
pub fn in_double_check(board: &Board, color: Color) -> bool {
    king_attackers(board, color).len() >= 2
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(key: &str) -> Position {
        Position::from_key(key).unwrap()
    }

    fn put(board: &mut Board, kind: PieceType, color: Color, key: &str) {
        board.put(Piece::new(kind, color, pos(key)));
    }

    // -----------------------------------------------------------------
    // Rays
    // -----------------------------------------------------------------

    #[test]
    fn first_piece_skips_empty_squares() {
        let mut board = Board::empty();
        put(&mut board, PieceType::Rook, Color::White, "00");
        put(&mut board, PieceType::Pawn, Color::Black, "05");
        let hit = first_piece_along(&board, pos("00"), Direction::Right).unwrap();
        assert_eq!(hit.position(), pos("05"));
        assert!(first_piece_along(&board, pos("00"), Direction::Up).is_none());
    }

    #[test]
    fn direction_between_aligned_squares() {
        assert_eq!(
            direction_between(pos("00"), pos("07")),
            Some(Direction::Right)
        );
        assert_eq!(
            direction_between(pos("44"), pos("11")),
            Some(Direction::DownLeft)
        );
        assert_eq!(direction_between(pos("00"), pos("12")), None);
        assert_eq!(direction_between(pos("33"), pos("33")), None);
    }

    // -----------------------------------------------------------------
    // Pins
    // -----------------------------------------------------------------

    #[test]
    fn rook_pins_along_file() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Knight, Color::White, "34");
        put(&mut board, PieceType::Rook, Color::Black, "74");
        let knight = board.get(pos("34")).unwrap();
        let pin = pin_on(&board, knight).unwrap();
        assert_eq!(pin.toward, Direction::Up);
        assert!(pin.allows(Direction::Up));
        assert!(pin.allows(Direction::Down));
        assert!(!pin.allows(Direction::Left));
    }

    #[test]
    fn bishop_pins_along_diagonal() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "00");
        put(&mut board, PieceType::Rook, Color::White, "22");
        put(&mut board, PieceType::Bishop, Color::Black, "55");
        let rook = board.get(pos("22")).unwrap();
        let pin = pin_on(&board, rook).unwrap();
        assert_eq!(pin.toward, Direction::UpRight);
    }

    #[test]
    fn no_pin_when_line_is_blocked() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Knight, Color::White, "34");
        put(&mut board, PieceType::Pawn, Color::White, "54");
        put(&mut board, PieceType::Rook, Color::Black, "74");
        let knight = board.get(pos("34")).unwrap();
        assert!(pin_on(&board, knight).is_none());
    }

    #[test]
    fn no_pin_from_mismatched_slider() {
        // A rook cannot pin along a diagonal.
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "00");
        put(&mut board, PieceType::Pawn, Color::White, "11");
        put(&mut board, PieceType::Rook, Color::Black, "44");
        let pawn = board.get(pos("11")).unwrap();
        assert!(pin_on(&board, pawn).is_none());
    }

    #[test]
    fn knight_never_pins() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Pawn, Color::White, "14");
        put(&mut board, PieceType::Knight, Color::Black, "24");
        let pawn = board.get(pos("14")).unwrap();
        assert!(pin_on(&board, pawn).is_none());
    }

    #[test]
    fn king_is_never_pinned() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Rook, Color::Black, "74");
        let king = board.get(pos("04")).unwrap();
        assert!(pin_on(&board, king).is_none());
    }

    // -----------------------------------------------------------------
    // Square attacks
    // -----------------------------------------------------------------

    #[test]
    fn pawn_attacks_its_forward_diagonals_only() {
        let mut board = Board::empty();
        put(&mut board, PieceType::Pawn, Color::White, "33");
        assert!(is_square_attacked(&board, pos("42"), Color::White));
        assert!(is_square_attacked(&board, pos("44"), Color::White));
        assert!(!is_square_attacked(&board, pos("43"), Color::White));
        assert!(!is_square_attacked(&board, pos("22"), Color::White));
    }

    #[test]
    fn knight_attacks_jump_over_blockers() {
        let mut board = Board::empty();
        put(&mut board, PieceType::Knight, Color::Black, "44");
        // Surround the knight completely.
        for dr in -1..=1i8 {
            for df in -1..=1i8 {
                if dr != 0 || df != 0 {
                    let p = pos("44").offset(dr, df).unwrap();
                    board.put(Piece::new(PieceType::Pawn, Color::White, p));
                }
            }
        }
        assert!(is_square_attacked(&board, pos("63"), Color::Black));
        assert!(is_square_attacked(&board, pos("25"), Color::Black));
    }

    #[test]
    fn slider_attack_is_blocked_by_any_piece() {
        let mut board = Board::empty();
        put(&mut board, PieceType::Rook, Color::Black, "70");
        assert!(is_square_attacked(&board, pos("00"), Color::Black));
        put(&mut board, PieceType::Pawn, Color::Black, "30");
        assert!(!is_square_attacked(&board, pos("00"), Color::Black));
    }

    #[test]
    fn king_attacks_adjacent_squares() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::Black, "44");
        assert!(is_square_attacked(&board, pos("55"), Color::Black));
        assert!(is_square_attacked(&board, pos("43"), Color::Black));
        assert!(!is_square_attacked(&board, pos("46"), Color::Black));
    }

    // -----------------------------------------------------------------
    // Check state
    // -----------------------------------------------------------------

    #[test]
    fn opening_position_has_no_check() {
        let board = Board::new();
        assert!(!in_check(&board, Color::White));
        assert!(!in_check(&board, Color::Black));
    }

    #[test]
    fn single_check_from_slider() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Queen, Color::Black, "64");
        assert!(in_check(&board, Color::White));
        assert!(!in_double_check(&board, Color::White));
        assert_eq!(king_attackers(&board, Color::White), vec![pos("64")]);
    }

    #[test]
    fn double_check_counts_two_attackers() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Rook, Color::Black, "74");
        put(&mut board, PieceType::Knight, Color::Black, "23");
        assert!(in_double_check(&board, Color::White));
        assert_eq!(king_attackers(&board, Color::White).len(), 2);
    }

    #[test]
    fn pinned_shield_still_blocks_check() {
        let mut board = Board::empty();
        put(&mut board, PieceType::King, Color::White, "04");
        put(&mut board, PieceType::Bishop, Color::White, "24");
        put(&mut board, PieceType::Rook, Color::Black, "74");
        assert!(!in_check(&board, Color::White));
        let bishop = board.get(pos("24")).unwrap();
        assert!(pin_on(&board, bishop).is_some());
    }
}
