use std::fmt;

use crate::game::Point;
use crate::group::GroupId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(pub u32);

impl PieceId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for PieceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Piece {
    pub(crate) id: PieceId,
    pub(crate) grid_x: u32,
    pub(crate) grid_y: u32,
    pub(crate) size: f32,
    pub(crate) relative_pos: Point,
    pub(crate) group: GroupId,
}

impl Piece {
    pub fn id(&self) -> PieceId {
        self.id
    }

    pub fn grid(&self) -> (u32, u32) {
        (self.grid_x, self.grid_y)
    }

    pub fn grid_x(&self) -> u32 {
        self.grid_x
    }

    pub fn grid_y(&self) -> u32 {
        self.grid_y
    }

    pub fn size(&self) -> f32 {
        self.size
    }

    pub fn relative_pos(&self) -> Point {
        self.relative_pos
    }

    pub fn group(&self) -> GroupId {
        self.group
    }

    /// Solved-board position, without the board's screen offset.
    pub fn target_pos(&self) -> Point {
        (self.grid_x as f32 * self.size, self.grid_y as f32 * self.size)
    }
}
