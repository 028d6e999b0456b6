use crate::error::SessionError;
use crate::game::{grid_delta, Point, TrayLayout, GRID_SIZE_MAX};
use crate::group::{Group, GroupId, WorldPosition};
use crate::piece::{Piece, PieceId};

/// Blueprint for one group when building a board.
///
/// Locked seeds ignore `position`: they are rebuilt in the solved frame.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupSeed {
    pub position: Point,
    pub cells: Vec<(u32, u32)>,
    pub locked: bool,
}

impl GroupSeed {
    pub fn single(cell: (u32, u32), position: Point) -> Self {
        Self {
            position,
            cells: vec![cell],
            locked: false,
        }
    }

    pub fn loose(position: Point, cells: Vec<(u32, u32)>) -> Self {
        Self {
            position,
            cells,
            locked: false,
        }
    }

    pub fn locked(cells: Vec<(u32, u32)>) -> Self {
        Self {
            position: (0.0, 0.0),
            cells,
            locked: true,
        }
    }
}

/// Arena owning every piece and group of one puzzle instance.
///
/// Group ids are stable indexes; a group emptied by a merge stays in the
/// arena as a dead slot so arena order never shifts.
#[derive(Clone, Debug)]
pub struct Board {
    grid_size: u32,
    piece_size: f32,
    pieces: Vec<Piece>,
    groups: Vec<Group>,
}

impl Board {
    pub fn from_seeds(
        grid_size: u32,
        piece_size: f32,
        seeds: &[GroupSeed],
    ) -> Result<Self, SessionError> {
        let total = piece_count(grid_size)?;
        if !piece_size.is_finite() || piece_size <= 0.0 {
            return Err(SessionError::InvalidPieceSize(piece_size));
        }
        let side = grid_size as usize;
        let mut owner: Vec<Option<usize>> = vec![None; total];
        for (index, seed) in seeds.iter().enumerate() {
            if seed.cells.is_empty() {
                return Err(SessionError::EmptyGroup { index });
            }
            for &(x, y) in &seed.cells {
                if x >= grid_size || y >= grid_size {
                    return Err(SessionError::CellOutOfRange { x, y, grid_size });
                }
                let slot = &mut owner[y as usize * side + x as usize];
                if slot.is_some() {
                    return Err(SessionError::DuplicateCell { x, y });
                }
                *slot = Some(index);
            }
        }
        let missing = owner.iter().filter(|slot| slot.is_none()).count();
        if missing > 0 {
            return Err(SessionError::MissingPieces {
                count: missing,
                total,
            });
        }

        let pieces = owner
            .iter()
            .enumerate()
            .map(|(id, slot)| Piece {
                id: PieceId(id as u32),
                grid_x: (id % side) as u32,
                grid_y: (id / side) as u32,
                size: piece_size,
                relative_pos: (0.0, 0.0),
                group: GroupId(slot.unwrap_or_default() as u32),
            })
            .collect();
        let mut board = Self {
            grid_size,
            piece_size,
            pieces,
            groups: Vec::with_capacity(seeds.len()),
        };
        for (index, seed) in seeds.iter().enumerate() {
            let group_id = GroupId(index as u32);
            let position = if seed.locked { (0.0, 0.0) } else { seed.position };
            board.groups.push(Group::new(group_id, position));
            let first = seed.cells[0];
            for &cell in &seed.cells {
                let piece_id = board.piece_id_at(cell);
                let rel = if seed.locked {
                    board.pieces[piece_id.index()].target_pos()
                } else {
                    grid_delta(first, cell, piece_size)
                };
                board.add_piece(group_id, piece_id, rel.0, rel.1);
            }
            if seed.locked {
                board.groups[index].lock();
            }
        }
        Ok(board)
    }

    /// One singleton group per piece, created in the layout's shuffled order.
    pub fn scrambled(
        grid_size: u32,
        piece_size: f32,
        layout: &TrayLayout,
    ) -> Result<Self, SessionError> {
        let expected = piece_count(grid_size)?;
        let side = grid_size as usize;
        if layout.positions.len() != expected || layout.order.len() != expected {
            return Err(SessionError::LayoutMismatch {
                expected,
                found: layout.positions.len().min(layout.order.len()),
            });
        }
        let seeds: Vec<GroupSeed> = layout
            .order
            .iter()
            .map(|&id| {
                let cell = ((id % side) as u32, (id / side) as u32);
                let position = layout.positions.get(id).copied().unwrap_or_default();
                GroupSeed::single(cell, position)
            })
            .collect();
        Self::from_seeds(grid_size, piece_size, &seeds)
    }

    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    pub fn piece_size(&self) -> f32 {
        self.piece_size
    }

    pub fn total_pieces(&self) -> usize {
        self.pieces.len()
    }

    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    pub fn piece(&self, id: PieceId) -> Option<&Piece> {
        self.pieces.get(id.index())
    }

    pub fn piece_id_at(&self, cell: (u32, u32)) -> PieceId {
        PieceId(cell.1.saturating_mul(self.grid_size).saturating_add(cell.0))
    }

    pub fn group(&self, id: GroupId) -> Option<&Group> {
        self.groups.get(id.index())
    }

    pub(crate) fn group_mut(&mut self, id: GroupId) -> Option<&mut Group> {
        self.groups.get_mut(id.index())
    }

    pub fn group_of(&self, piece: PieceId) -> Option<GroupId> {
        self.piece(piece).map(Piece::group)
    }

    /// Every group still holding pieces, in stable arena order.
    pub fn live_groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.groups.iter().filter(|group| !group.is_empty())
    }

    pub fn live_group_ids(&self) -> Vec<GroupId> {
        self.live_groups().map(Group::id).collect()
    }

    /// Moves `piece` into `group` at the given offset from the group origin.
    ///
    /// No overlap checks. A piece listed in another group is detached from
    /// it first, so a piece is never a member of two groups.
    pub fn add_piece(&mut self, group: GroupId, piece: PieceId, rel_x: f32, rel_y: f32) {
        if group.index() >= self.groups.len() {
            return;
        }
        let Some(slot) = self.pieces.get_mut(piece.index()) else {
            return;
        };
        let previous = slot.group;
        slot.relative_pos = (rel_x, rel_y);
        slot.group = group;
        if previous != group {
            if let Some(old) = self.groups.get_mut(previous.index()) {
                old.pieces.retain(|id| *id != piece);
            }
        }
        let members = &mut self.groups[group.index()].pieces;
        if !members.contains(&piece) {
            members.push(piece);
        }
    }

    pub(crate) fn set_relative_pos(&mut self, piece: PieceId, rel: Point) {
        if let Some(slot) = self.pieces.get_mut(piece.index()) {
            slot.relative_pos = rel;
        }
    }

    pub fn world_position(&self, piece: PieceId) -> Option<Point> {
        let piece = self.piece(piece)?;
        let group = self.group(piece.group)?;
        Some((
            group.position.0 + piece.relative_pos.0,
            group.position.1 + piece.relative_pos.1,
        ))
    }

    pub fn world_positions(&self, group: GroupId) -> Vec<WorldPosition> {
        self.group(group)
            .map(|group| group.world_positions(&self.pieces))
            .unwrap_or_default()
    }

    pub fn contains_point(&self, group: GroupId, x: f32, y: f32) -> bool {
        self.group(group)
            .map(|group| group.contains_point(&self.pieces, x, y))
            .unwrap_or(false)
    }

    /// Topmost (latest in arena order) live, unlocked group under the point.
    pub fn group_at(&self, x: f32, y: f32) -> Option<GroupId> {
        self.groups
            .iter()
            .rev()
            .filter(|group| !group.is_empty() && !group.is_locked)
            .find(|group| group.contains_point(&self.pieces, x, y))
            .map(Group::id)
    }

    /// Input-layer move; locked and empty groups never move.
    pub fn move_group(&mut self, id: GroupId, position: Point) -> bool {
        match self.group_mut(id) {
            Some(group) if !group.is_locked && !group.is_empty() => {
                group.position = position;
                true
            }
            _ => false,
        }
    }

    pub fn locked_piece_count(&self) -> usize {
        self.live_groups()
            .filter(|group| group.is_locked)
            .map(Group::len)
            .sum()
    }

    pub fn is_complete(&self) -> bool {
        !self.pieces.is_empty() && self.locked_piece_count() == self.pieces.len()
    }
}

/// Piece count for a square grid, rejecting sizes the arena cannot index.
fn piece_count(grid_size: u32) -> Result<usize, SessionError> {
    if grid_size == 0 {
        return Err(SessionError::EmptyGrid);
    }
    let too_large = SessionError::GridTooLarge {
        grid_size,
        max: GRID_SIZE_MAX,
    };
    if grid_size > GRID_SIZE_MAX {
        return Err(too_large);
    }
    let side = grid_size as usize;
    side.checked_mul(side).ok_or(too_large)
}
