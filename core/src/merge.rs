use tracing::debug;

use crate::board::Board;
use crate::game::{distance, grid_delta, is_grid_neighbor, offset, Point, SNAP_THRESHOLD_DEFAULT};
use crate::group::GroupId;
use crate::piece::PieceId;

/// Decides whether two groups fuse and performs the fusion.
pub trait MergeEngine {
    /// Returns true when `active` was merged into `target`. On success
    /// `active` is left empty and `target` holds the union.
    fn try_merge(&self, board: &mut Board, active: GroupId, target: GroupId) -> bool;
}

/// Seam-alignment merge: the first adjacent pair within `snap_threshold`
/// pulls both groups into one rigid frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnapMerge {
    pub snap_threshold: f32,
}

impl Default for SnapMerge {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD_DEFAULT,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct MergeCandidate {
    anchor: PieceId,
    ideal: Point,
    dist: f32,
}

impl SnapMerge {
    pub fn new(snap_threshold: f32) -> Self {
        Self { snap_threshold }
    }

    fn find_candidate(
        &self,
        board: &Board,
        active: GroupId,
        target: GroupId,
    ) -> Option<MergeCandidate> {
        let active_group = board.group(active)?;
        let target_group = board.group(target)?;
        for &a_id in active_group.pieces() {
            let Some(a) = board.piece(a_id) else {
                continue;
            };
            for &b_id in target_group.pieces() {
                let Some(b) = board.piece(b_id) else {
                    continue;
                };
                if !is_grid_neighbor(a.grid(), b.grid()) {
                    continue;
                }
                let world_a = offset(active_group.position(), a.relative_pos());
                let ideal = offset(world_a, grid_delta(a.grid(), b.grid(), a.size()));
                let current_b = offset(target_group.position(), b.relative_pos());
                let dist = distance(current_b, ideal);
                if dist < self.snap_threshold {
                    return Some(MergeCandidate {
                        anchor: b_id,
                        ideal,
                        dist,
                    });
                }
            }
        }
        None
    }
}

impl MergeEngine for SnapMerge {
    fn try_merge(&self, board: &mut Board, active: GroupId, target: GroupId) -> bool {
        if active == target {
            return false;
        }
        match (board.group(active), board.group(target)) {
            (Some(a), Some(t)) if !a.is_empty() && !t.is_empty() => {}
            _ => return false,
        }
        let Some(candidate) = self.find_candidate(board, active, target) else {
            return false;
        };
        debug!(
            %active,
            %target,
            anchor = %candidate.anchor,
            dist = candidate.dist,
            "seam aligned, merging groups"
        );
        execute_merge(board, active, target, candidate.ideal, candidate.anchor);
        true
    }
}

/// Folds every piece of `active` into `target`, placing `anchor` (a member
/// of `target`) at `ideal`. A locked target keeps its position.
pub fn execute_merge(
    board: &mut Board,
    active: GroupId,
    target: GroupId,
    ideal: Point,
    anchor: PieceId,
) {
    if active == target {
        return;
    }
    let Some((anchor_grid, anchor_rel)) = board
        .piece(anchor)
        .map(|piece| (piece.grid(), piece.relative_pos()))
    else {
        return;
    };
    let (active_locked, moved) = match board.group_mut(active) {
        Some(group) => (group.is_locked, std::mem::take(&mut group.pieces)),
        None => return,
    };
    let target_locked = match board.group_mut(target) {
        Some(group) => {
            if !group.is_locked {
                group.position = (ideal.0 - anchor_rel.0, ideal.1 - anchor_rel.1);
            }
            group.is_locked
        }
        None => {
            if let Some(group) = board.group_mut(active) {
                group.pieces = moved;
            }
            return;
        }
    };
    for piece_id in moved {
        let Some(piece) = board.piece(piece_id) else {
            continue;
        };
        let rel = offset(anchor_rel, grid_delta(anchor_grid, piece.grid(), piece.size()));
        board.add_piece(target, piece_id, rel.0, rel.1);
    }
    if active_locked || target_locked {
        if let Some(group) = board.group_mut(target) {
            group.lock();
        }
    }
}
