//! Legal move generation, one piece at a time.
//!
//! Each piece kind walks direction-vector tables instead of per-direction
//! unrolled code. Pin restrictions come from `attacks::pin_on`; king safety
//! and en-passant exposure are settled by simulating the move on a board
//! clone and re-running check detection, which covers the discovered-attack
//! edge cases a static scan misses.
//!
//! Generation does not enforce single-check evasion for non-king pieces and
//! may emit captures onto the enemy king's square along an open line. Both
//! are the move executor's problem: it refuses king captures outright, and
//! the turn controller restricts selection to the king while in double
//! check.

use crate::engine::attacks;
use crate::engine::board::Board;
use crate::engine::piece::Piece;
use crate::engine::types::{ChessError, Direction, Move, MoveType, PieceType, Pin, Position};

/// All legal moves for the piece standing on `from`.
///
/// Fails with `SourceEmpty` when the square holds nothing.
pub fn legal_moves(board: &Board, from: Position) -> Result<Vec<Move>, ChessError> {
    let piece = board.get(from).ok_or(ChessError::SourceEmpty(from))?;
    let pin = attacks::pin_on(board, piece);
    let moves = match piece.kind() {
        PieceType::Pawn => pawn_moves(board, piece, pin),
        PieceType::Knight => knight_moves(board, piece, pin),
        PieceType::Bishop => slider_moves(board, piece, pin, &Direction::DIAGONAL),
        PieceType::Rook => slider_moves(board, piece, pin, &Direction::ORTHOGONAL),
        PieceType::Queen => slider_moves(board, piece, pin, &Direction::ALL),
        PieceType::King => king_moves(board, piece),
    };
    Ok(moves)
}

// ---------------------------------------------------------------------------
// Pawn
// ---------------------------------------------------------------------------

fn pawn_moves(board: &Board, pawn: &Piece, pin: Option<Pin>) -> Vec<Move> {
    let mut moves = Vec::new();
    let color = pawn.color();
    let forward = color.forward();
    let from = pawn.position();
    let advance_dir = if forward > 0 {
        Direction::Up
    } else {
        Direction::Down
    };

    // Forward advances stay on the file, so any non-vertical pin blocks
    // them.
    let may_advance = pin.map_or(true, |p| p.allows(advance_dir));
    if may_advance {
        if let Some(one) = from.offset(forward, 0) {
            if !board.is_occupied(one) {
                let tag = if one.rank == color.promotion_rank() {
                    MoveType::Promote
                } else {
                    MoveType::Advance
                };
                moves.push(Move::new(one, tag));

                if !pawn.has_moved() {
                    if let Some(two) = from.offset(2 * forward, 0) {
                        if !board.is_occupied(two) {
                            moves.push(Move::new(two, MoveType::AdvanceTwice));
                        }
                    }
                }
            }
        }
    }

    // Diagonal captures.
    for df in [-1, 1] {
        let dir = match (forward > 0, df > 0) {
            (true, true) => Direction::UpRight,
            (true, false) => Direction::UpLeft,
            (false, true) => Direction::DownRight,
            (false, false) => Direction::DownLeft,
        };
        if pin.is_some_and(|p| !p.allows(dir)) {
            continue;
        }
        if let Some(target) = from.offset(forward, df) {
            if let Some(victim) = board.get(target) {
                if victim.color() != color {
                    let tag = if target.rank == color.promotion_rank() {
                        MoveType::PromoteWithCapture
                    } else {
                        MoveType::Capture
                    };
                    moves.push(Move::new(target, tag));
                }
            }
        }
    }

    en_passant_moves(board, pawn, &mut moves);
    moves
}

/// En passant: the pawn stands on its capture rank and an adjacent-file
/// enemy pawn two-square-advanced on the immediately preceding ply, read
/// off its first-move stamp against the global counter. The capture is
/// suppressed when removing both pawns from their rank would leave the own
/// king attacked, which is decided by simulation rather than a rank scan.
fn en_passant_moves(board: &Board, pawn: &Piece, moves: &mut Vec<Move>) {
    let color = pawn.color();
    let from = pawn.position();
    if from.rank != color.en_passant_rank() {
        return;
    }
    let global = board.global_move_counter();

    for df in [-1, 1] {
        let Some(victim_pos) = from.offset(0, df) else {
            continue;
        };
        let Some(victim) = board.get(victim_pos) else {
            continue;
        };
        let eligible = victim.kind() == PieceType::Pawn
            && victim.color() != color
            && victim.move_counter() == 1
            && victim.first_move_counter() == Some(global.wrapping_sub(1));
        if !eligible {
            continue;
        }
        let Some(target) = from.offset(color.forward(), df) else {
            continue;
        };
        if board.is_occupied(target) {
            continue;
        }
        if en_passant_is_safe(board, pawn, victim_pos, target) {
            moves.push(Move::new(target, MoveType::EnPassant));
        }
    }
}

fn en_passant_is_safe(board: &Board, pawn: &Piece, victim: Position, target: Position) -> bool {
    let mut sim = board.clone();
    sim.take(victim);
    if sim.relocate(pawn.position(), target).is_err() {
        return false;
    }
    !attacks::in_check(&sim, pawn.color())
}

// ---------------------------------------------------------------------------
// Knight
// ---------------------------------------------------------------------------

fn knight_moves(board: &Board, knight: &Piece, pin: Option<Pin>) -> Vec<Move> {
    // A knight cannot jump along any line, so any pin empties its set.
    if pin.is_some() {
        return Vec::new();
    }
    let mut moves = Vec::new();
    for (dr, df) in attacks::KNIGHT_OFFSETS {
        if let Some(target) = knight.position().offset(dr, df) {
            match board.get(target) {
                None => moves.push(Move::new(target, MoveType::Advance)),
                Some(victim) if victim.color() != knight.color() => {
                    moves.push(Move::new(target, MoveType::Capture));
                }
                Some(_) => {}
            }
        }
    }
    moves
}

// ---------------------------------------------------------------------------
// Sliders
// ---------------------------------------------------------------------------

fn slider_moves(
    board: &Board,
    piece: &Piece,
    pin: Option<Pin>,
    directions: &[Direction],
) -> Vec<Move> {
    let mut moves = Vec::new();
    for &dir in directions {
        if pin.is_some_and(|p| !p.allows(dir)) {
            continue;
        }
        let mut cursor = piece.position();
        while let Some(next) = cursor.step(dir) {
            match board.get(next) {
                None => {
                    moves.push(Move::new(next, MoveType::Advance));
                    cursor = next;
                }
                Some(victim) => {
                    if victim.color() != piece.color() {
                        moves.push(Move::new(next, MoveType::Capture));
                    }
                    break;
                }
            }
        }
    }
    moves
}

// ---------------------------------------------------------------------------
// King
// ---------------------------------------------------------------------------

fn king_moves(board: &Board, king: &Piece) -> Vec<Move> {
    let mut moves = Vec::new();
    for dr in -1..=1i8 {
        for df in -1..=1i8 {
            if dr == 0 && df == 0 {
                continue;
            }
            let Some(target) = king.position().offset(dr, df) else {
                continue;
            };
            let tag = match board.get(target) {
                None => MoveType::Advance,
                Some(victim) if victim.color() != king.color() => MoveType::Capture,
                Some(_) => continue,
            };
            if king_move_is_safe(board, king, target) {
                moves.push(Move::new(target, tag));
            }
        }
    }
    castle_moves(board, king, &mut moves);
    moves
}

/// Simulate the king stepping onto `target` (capturing if occupied) and
/// test whether it would stand in check. The actual relocation matters:
/// stepping away along a slider's ray re-opens the vacated square.
fn king_move_is_safe(board: &Board, king: &Piece, target: Position) -> bool {
    let mut sim = board.clone();
    sim.take(target);
    if sim.relocate(king.position(), target).is_err() {
        return false;
    }
    !attacks::in_check(&sim, king.color())
}

/// Castle moves target the rook's home square. Requirements per side: the
/// king and that rook are unmoved, the king is not in check and has not
/// castled, every square strictly between them is empty, and neither of
/// the king's transit squares is attacked.
fn castle_moves(board: &Board, king: &Piece, moves: &mut Vec<Move>) {
    let color = king.color();
    let rank = color.back_rank();
    if king.position() != Position::new(rank, 4)
        || king.has_moved()
        || king.has_castled()
        || attacks::in_check(board, color)
    {
        return;
    }

    // (rook home file, files between king and rook, king transit files)
    const SIDES: [(u8, &[u8], [u8; 2]); 2] = [(7, &[5, 6], [5, 6]), (0, &[1, 2, 3], [3, 2])];

    for (rook_file, between, transit) in SIDES {
        let rook_home = Position::new(rank, rook_file);
        let rook_ok = board.get(rook_home).is_some_and(|p| {
            p.kind() == PieceType::Rook && p.color() == color && !p.has_moved()
        });
        if !rook_ok {
            continue;
        }
        if between
            .iter()
            .any(|&f| board.is_occupied(Position::new(rank, f)))
        {
            continue;
        }
        if transit
            .iter()
            .any(|&f| attacks::is_square_attacked(board, Position::new(rank, f), !color))
        {
            continue;
        }
        moves.push(Move::new(rook_home, MoveType::Castle));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
