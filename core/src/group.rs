use std::fmt;

use crate::game::Point;
use crate::piece::{Piece, PieceId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(pub u32);

impl GroupId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "group#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WorldPosition {
    pub id: PieceId,
    pub x: f32,
    pub y: f32,
}

/// A rigid cluster of pieces sharing one world transform.
///
/// Members are stored by id; the pieces themselves live in the owning
/// [`Board`](crate::Board) arena, so the queries here take that arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) id: GroupId,
    pub(crate) pieces: Vec<PieceId>,
    pub(crate) position: Point,
    pub(crate) is_locked: bool,
}

impl Group {
    pub(crate) fn new(id: GroupId, position: Point) -> Self {
        Self {
            id,
            pieces: Vec::new(),
            position,
            is_locked: false,
        }
    }

    pub fn id(&self) -> GroupId {
        self.id
    }

    pub fn pieces(&self) -> &[PieceId] {
        &self.pieces
    }

    pub fn len(&self) -> usize {
        self.pieces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pieces.is_empty()
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn lock(&mut self) {
        self.is_locked = true;
    }

    pub fn world_positions(&self, arena: &[Piece]) -> Vec<WorldPosition> {
        self.pieces
            .iter()
            .filter_map(|id| arena.get(id.index()))
            .map(|piece| WorldPosition {
                id: piece.id,
                x: self.position.0 + piece.relative_pos.0,
                y: self.position.1 + piece.relative_pos.1,
            })
            .collect()
    }

    pub fn contains_point(&self, arena: &[Piece], x: f32, y: f32) -> bool {
        self.pieces
            .iter()
            .filter_map(|id| arena.get(id.index()))
            .any(|piece| {
                let left = self.position.0 + piece.relative_pos.0;
                let top = self.position.1 + piece.relative_pos.1;
                x >= left && x < left + piece.size && y >= top && y < top + piece.size
            })
    }
}
