use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Color
// ---------------------------------------------------------------------------

/// The two sides in a chess game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    White,
    Black,
}

impl Color {
    /// Rank direction a pawn of this color advances in (+1 for white).
    #[inline]
    pub const fn forward(self) -> i8 {
        match self {
            Color::White => 1,
            Color::Black => -1,
        }
    }

    /// Back rank for this color (0 for white, 7 for black).
    #[inline]
    pub const fn back_rank(self) -> u8 {
        match self {
            Color::White => 0,
            Color::Black => 7,
        }
    }

    /// Rank a pawn of this color promotes on.
    #[inline]
    pub const fn promotion_rank(self) -> u8 {
        match self {
            Color::White => 7,
            Color::Black => 0,
        }
    }

    /// Rank a pawn of this color must stand on to capture en passant
    /// (rank 4 for white, rank 3 for black).
    #[inline]
    pub const fn en_passant_rank(self) -> u8 {
        match self {
            Color::White => 4,
            Color::Black => 3,
        }
    }
}

impl std::ops::Not for Color {
    type Output = Self;
    fn not(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Color::White => write!(f, "white"),
            Color::Black => write!(f, "black"),
        }
    }
}

// ---------------------------------------------------------------------------
// PieceType
// ---------------------------------------------------------------------------

/// The six piece kinds. A closed union — all behavior dispatch is an
/// exhaustive match over this enum.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PieceType {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl PieceType {
    /// Material value in points.
    pub const fn value(self) -> u32 {
        match self {
            PieceType::Pawn => 1,
            PieceType::Knight => 3,
            PieceType::Bishop => 3,
            PieceType::Rook => 5,
            PieceType::Queen => 9,
            PieceType::King => 0, // never scored
        }
    }

    /// Whether a pawn may promote to this kind.
    pub const fn is_promotion_target(self) -> bool {
        matches!(
            self,
            PieceType::Rook | PieceType::Knight | PieceType::Bishop | PieceType::Queen
        )
    }

    /// Whether this kind attacks along the given axis from a distance.
    pub const fn slides_along(self, axis: Axis) -> bool {
        match self {
            PieceType::Rook => matches!(axis, Axis::Horizontal | Axis::Vertical),
            PieceType::Bishop => matches!(axis, Axis::Diagonal),
            PieceType::Queen => true,
            _ => false,
        }
    }
}

impl fmt::Display for PieceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PieceType::Pawn => write!(f, "pawn"),
            PieceType::Knight => write!(f, "knight"),
            PieceType::Bishop => write!(f, "bishop"),
            PieceType::Rook => write!(f, "rook"),
            PieceType::Queen => write!(f, "queen"),
            PieceType::King => write!(f, "king"),
        }
    }
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A board square: rank and file, each 0..=7.
///
/// The wire encoding is two ASCII digits, rank then file ("04" = rank 0,
/// file 4). Anything else is rejected with `ChessError::InvalidPosition`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub rank: u8,
    pub file: u8,
}

impl Position {
    /// Construct from known-valid coordinates.
    #[inline]
    pub fn new(rank: u8, file: u8) -> Self {
        debug_assert!(rank < 8 && file < 8, "position out of range: {rank}{file}");
        Position { rank, file }
    }

    /// Parse the 2-digit wire key.
    pub fn from_key(key: &str) -> Result<Self, ChessError> {
        let bytes = key.as_bytes();
        if bytes.len() != 2 {
            return Err(ChessError::InvalidPosition(key.to_string()));
        }
        let rank = bytes[0].wrapping_sub(b'0');
        let file = bytes[1].wrapping_sub(b'0');
        if rank < 8 && file < 8 {
            Ok(Position { rank, file })
        } else {
            Err(ChessError::InvalidPosition(key.to_string()))
        }
    }

    /// The 2-digit wire key ("RF").
    pub fn key(self) -> String {
        format!("{}{}", self.rank, self.file)
    }

    /// Offset by a (rank, file) delta, `None` when off the board.
    #[inline]
    pub fn offset(self, dr: i8, df: i8) -> Option<Self> {
        let rank = self.rank as i8 + dr;
        let file = self.file as i8 + df;
        if (0..8).contains(&rank) && (0..8).contains(&file) {
            Some(Position {
                rank: rank as u8,
                file: file as u8,
            })
        } else {
            None
        }
    }

    /// One step in the given direction, `None` when off the board.
    #[inline]
    pub fn step(self, dir: Direction) -> Option<Self> {
        let (dr, df) = dir.delta();
        self.offset(dr, df)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.file)
    }
}

impl Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.key())
    }
}

impl<'de> Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let key = String::deserialize(deserializer)?;
        Position::from_key(&key).map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Direction & Axis
// ---------------------------------------------------------------------------

/// The eight compass directions on the board. "Up" is the direction of
/// increasing rank (white's forward).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl Direction {
    /// All eight directions.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// Rook rays.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Bishop rays.
    pub const DIAGONAL: [Direction; 4] = [
        Direction::UpLeft,
        Direction::UpRight,
        Direction::DownLeft,
        Direction::DownRight,
    ];

    /// (rank, file) unit vector.
    #[inline]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Direction::Up => (1, 0),
            Direction::Down => (-1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::UpLeft => (1, -1),
            Direction::UpRight => (1, 1),
            Direction::DownLeft => (-1, -1),
            Direction::DownRight => (-1, 1),
        }
    }

    /// The opposite compass direction.
    #[inline]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
            Direction::UpLeft => Direction::DownRight,
            Direction::UpRight => Direction::DownLeft,
            Direction::DownLeft => Direction::UpRight,
            Direction::DownRight => Direction::UpLeft,
        }
    }

    /// Which axis this direction lies on.
    #[inline]
    pub const fn axis(self) -> Axis {
        match self {
            Direction::Up | Direction::Down => Axis::Vertical,
            Direction::Left | Direction::Right => Axis::Horizontal,
            _ => Axis::Diagonal,
        }
    }
}

/// The three pin axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    Horizontal,
    Vertical,
    Diagonal,
}

/// An absolute pin: the piece shields its own king from a slider.
///
/// `toward` is the direction from the pinned piece toward the pinning
/// attacker; the king lies in the opposite direction. A piece can be
/// pinned along at most one axis at a time, so a single optional `Pin`
/// is the whole story.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pin {
    pub toward: Direction,
}

impl Pin {
    /// The axis the pinned piece is confined to.
    #[inline]
    pub fn axis(self) -> Axis {
        self.toward.axis()
    }

    /// Whether a move in `dir` stays on the pin line.
    #[inline]
    pub fn allows(self, dir: Direction) -> bool {
        dir == self.toward || dir == self.toward.opposite()
    }
}

// ---------------------------------------------------------------------------
// MoveType & Move
// ---------------------------------------------------------------------------

/// Kind tag attached to every generated move.
///
/// `Check`, `PinHint` and `CaptureWithCheck` are informational only — the
/// executor rejects them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoveType {
    Advance,
    AdvanceTwice,
    Capture,
    #[serde(rename = "enpassant")]
    EnPassant,
    Promote,
    PromoteWithCapture,
    Castle,
    Check,
    #[serde(rename = "pin")]
    PinHint,
    CaptureWithCheck,
}

impl MoveType {
    /// Whether the executor accepts this tag.
    pub const fn is_executable(self) -> bool {
        !matches!(
            self,
            MoveType::Check | MoveType::PinHint | MoveType::CaptureWithCheck
        )
    }
}

impl fmt::Display for MoveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MoveType::Advance => "advance",
            MoveType::AdvanceTwice => "advanceTwice",
            MoveType::Capture => "capture",
            MoveType::EnPassant => "enpassant",
            MoveType::Promote => "promote",
            MoveType::PromoteWithCapture => "promoteWithCapture",
            MoveType::Castle => "castle",
            MoveType::Check => "check",
            MoveType::PinHint => "pin",
            MoveType::CaptureWithCheck => "captureWithCheck",
        };
        write!(f, "{s}")
    }
}

/// A candidate move: target square plus its kind tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Move {
    pub position: Position,
    pub move_type: MoveType,
}

impl Move {
    pub fn new(position: Position, move_type: MoveType) -> Self {
        Move {
            position,
            move_type,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.move_type, self.position)
    }
}

// ---------------------------------------------------------------------------
// ChessError
// ---------------------------------------------------------------------------

/// Domain errors for the rules engine. All are surfaced synchronously to
/// the caller; nothing is retried or silently recovered.
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    #[error("invalid position key: {0:?}")]
    InvalidPosition(String),

    #[error("no piece on position {0}")]
    SourceEmpty(Position),

    #[error("piece on {0} does not belong to the active player")]
    OutOfTurn(Position),

    #[error("king cannot be captured")]
    KingCapture,

    #[error("{move_type} requires a {expected}, found {found}")]
    WrongPieceType {
        move_type: MoveType,
        expected: PieceType,
        found: PieceType,
    },

    #[error("no opposing piece on capture target {0}")]
    CaptureTargetEmpty(Position),

    #[error("promotion piece type required")]
    MissingPromotion,

    #[error("cannot promote to a {0}")]
    InvalidPromotion(PieceType),

    #[error("invalid move type: {0}")]
    InvalidMoveType(MoveType),

    #[error("move {mv} is not legal from {from}")]
    IllegalMove { from: Position, mv: Move },

    #[error("history stack overflow (capacity {0})")]
    HistoryOverflow(usize),
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn color_toggle() {
        assert_eq!(!Color::White, Color::Black);
        assert_eq!(!Color::Black, Color::White);
    }

    #[test]
    fn color_geometry() {
        assert_eq!(Color::White.forward(), 1);
        assert_eq!(Color::Black.forward(), -1);
        assert_eq!(Color::White.back_rank(), 0);
        assert_eq!(Color::Black.back_rank(), 7);
        assert_eq!(Color::White.promotion_rank(), 7);
        assert_eq!(Color::Black.promotion_rank(), 0);
    }

    #[test]
    fn piece_values() {
        assert_eq!(PieceType::Pawn.value(), 1);
        assert_eq!(PieceType::Knight.value(), 3);
        assert_eq!(PieceType::Bishop.value(), 3);
        assert_eq!(PieceType::Rook.value(), 5);
        assert_eq!(PieceType::Queen.value(), 9);
        assert_eq!(PieceType::King.value(), 0);
    }

    #[test]
    fn promotion_targets() {
        assert!(PieceType::Queen.is_promotion_target());
        assert!(PieceType::Rook.is_promotion_target());
        assert!(PieceType::Bishop.is_promotion_target());
        assert!(PieceType::Knight.is_promotion_target());
        assert!(!PieceType::Pawn.is_promotion_target());
        assert!(!PieceType::King.is_promotion_target());
    }

    #[test]
    fn slider_axes() {
        assert!(PieceType::Rook.slides_along(Axis::Horizontal));
        assert!(PieceType::Rook.slides_along(Axis::Vertical));
        assert!(!PieceType::Rook.slides_along(Axis::Diagonal));
        assert!(PieceType::Bishop.slides_along(Axis::Diagonal));
        assert!(!PieceType::Bishop.slides_along(Axis::Vertical));
        assert!(PieceType::Queen.slides_along(Axis::Diagonal));
        assert!(PieceType::Queen.slides_along(Axis::Horizontal));
        assert!(!PieceType::Knight.slides_along(Axis::Vertical));
        assert!(!PieceType::King.slides_along(Axis::Vertical));
    }

    #[test]
    fn position_key_round_trip() {
        for rank in 0..8u8 {
            for file in 0..8u8 {
                let pos = Position::new(rank, file);
                assert_eq!(Position::from_key(&pos.key()).unwrap(), pos);
            }
        }
    }

    #[test]
    fn position_from_key_invalid() {
        for key in ["", "0", "000", "a1", "08", "80", "-1", "1 "] {
            assert!(Position::from_key(key).is_err(), "accepted {key:?}");
        }
    }

    #[test]
    fn position_offset_bounds() {
        let corner = Position::new(0, 0);
        assert_eq!(corner.offset(-1, 0), None);
        assert_eq!(corner.offset(0, -1), None);
        assert_eq!(corner.offset(1, 1), Some(Position::new(1, 1)));
        let far = Position::new(7, 7);
        assert_eq!(far.offset(1, 0), None);
        assert_eq!(far.offset(0, 1), None);
    }

    #[test]
    fn direction_opposites() {
        for dir in Direction::ALL {
            assert_eq!(dir.opposite().opposite(), dir);
            assert_eq!(dir.axis(), dir.opposite().axis());
        }
    }

    #[test]
    fn direction_deltas_are_units() {
        for dir in Direction::ALL {
            let (dr, df) = dir.delta();
            assert!(dr.abs() <= 1 && df.abs() <= 1);
            assert!(dr != 0 || df != 0);
        }
    }

    #[test]
    fn pin_allows_both_ways_along_axis() {
        let pin = Pin {
            toward: Direction::Up,
        };
        assert!(pin.allows(Direction::Up));
        assert!(pin.allows(Direction::Down));
        assert!(!pin.allows(Direction::Left));
        assert!(!pin.allows(Direction::UpLeft));
        assert_eq!(pin.axis(), Axis::Vertical);
    }

    #[test]
    fn move_type_executable() {
        assert!(MoveType::Advance.is_executable());
        assert!(MoveType::Castle.is_executable());
        assert!(MoveType::EnPassant.is_executable());
        assert!(!MoveType::Check.is_executable());
        assert!(!MoveType::PinHint.is_executable());
        assert!(!MoveType::CaptureWithCheck.is_executable());
    }

    #[test]
    fn move_type_wire_names() {
        let json = serde_json::to_string(&MoveType::EnPassant).unwrap();
        assert_eq!(json, "\"enpassant\"");
        let json = serde_json::to_string(&MoveType::AdvanceTwice).unwrap();
        assert_eq!(json, "\"advanceTwice\"");
        let json = serde_json::to_string(&MoveType::PromoteWithCapture).unwrap();
        assert_eq!(json, "\"promoteWithCapture\"");
    }

    #[test]
    fn position_serde_uses_wire_key() {
        let pos = Position::new(3, 5);
        assert_eq!(serde_json::to_string(&pos).unwrap(), "\"35\"");
        let back: Position = serde_json::from_str("\"35\"").unwrap();
        assert_eq!(back, pos);
        assert!(serde_json::from_str::<Position>("\"99\"").is_err());
    }
}
