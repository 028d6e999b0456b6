use tracing::debug;

use crate::board::Board;
use crate::game::{distance, offset, BOARD_LOCK_THRESHOLD_DEFAULT};
use crate::group::GroupId;

/// Decides whether a group sits on its solved position and, if so, snaps
/// and permanently locks it.
pub trait LockChecker {
    /// Returns true when this call locked the group.
    fn check_board_lock(&self, board: &mut Board, group: GroupId) -> bool;
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLock {
    pub lock_threshold: f32,
}

impl Default for BoardLock {
    fn default() -> Self {
        Self {
            lock_threshold: BOARD_LOCK_THRESHOLD_DEFAULT,
        }
    }
}

impl BoardLock {
    pub fn new(lock_threshold: f32) -> Self {
        Self { lock_threshold }
    }
}

impl LockChecker for BoardLock {
    fn check_board_lock(&self, board: &mut Board, group: GroupId) -> bool {
        let Some(current) = board.group(group) else {
            return false;
        };
        if current.is_locked() {
            return false;
        }
        // The first member is the anchor.
        let Some(anchor) = current.pieces().first().and_then(|id| board.piece(*id)) else {
            return false;
        };
        let world = offset(current.position(), anchor.relative_pos());
        let dist = distance(world, anchor.target_pos());
        if dist >= self.lock_threshold {
            return false;
        }

        let members = current.pieces().to_vec();
        for id in members.iter().copied() {
            if let Some(target) = board.piece(id).map(|piece| piece.target_pos()) {
                board.set_relative_pos(id, target);
            }
        }
        if let Some(slot) = board.group_mut(group) {
            slot.position = (0.0, 0.0);
            slot.lock();
        }
        debug!(%group, pieces = members.len(), dist, "group snapped onto board and locked");
        true
    }
}
