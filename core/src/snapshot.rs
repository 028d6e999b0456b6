use rkyv::{Archive, Deserialize, Serialize};

use crate::board::{Board, GroupSeed};
use crate::rules::EngineRules;

pub const SESSION_SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct LooseGroupSnapshot {
    pub position: (f32, f32),
    pub pieces: Vec<(u32, u32)>,
}

/// Persisted session. Groups are stored as grid cells only; restoring
/// rebuilds offsets from the grid rather than replaying merges.
#[derive(Debug, Clone, PartialEq, Archive, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub version: u32,
    pub grid_size: u32,
    pub piece_size: f32,
    pub elapsed_ms: u64,
    pub rules: EngineRules,
    pub locked: Vec<Vec<(u32, u32)>>,
    pub loose: Vec<LooseGroupSnapshot>,
}

impl SessionSnapshot {
    pub fn capture(board: &Board, rules: EngineRules, elapsed_ms: u64) -> Self {
        let mut locked = Vec::new();
        let mut loose = Vec::new();
        for group in board.live_groups() {
            let cells: Vec<(u32, u32)> = group
                .pieces()
                .iter()
                .filter_map(|id| board.piece(*id))
                .map(|piece| piece.grid())
                .collect();
            if group.is_locked() {
                locked.push(cells);
            } else {
                // Loose offsets are pure grid deltas from the first member,
                // so the first member's world position pins the whole group.
                let position = group
                    .pieces()
                    .first()
                    .and_then(|id| board.world_position(*id))
                    .unwrap_or_else(|| group.position());
                loose.push(LooseGroupSnapshot {
                    position,
                    pieces: cells,
                });
            }
        }
        Self {
            version: SESSION_SNAPSHOT_VERSION,
            grid_size: board.grid_size(),
            piece_size: board.piece_size(),
            elapsed_ms,
            rules,
            locked,
            loose,
        }
    }

    /// Group seeds in the order they were captured: locked groups first.
    pub fn seeds(&self) -> Vec<GroupSeed> {
        let locked = self.locked.iter().map(|cells| GroupSeed::locked(cells.clone()));
        let loose = self
            .loose
            .iter()
            .map(|group| GroupSeed::loose(group.position, group.pieces.clone()));
        locked.chain(loose).collect()
    }

    pub fn locked_piece_count(&self) -> usize {
        self.locked.iter().map(Vec::len).sum()
    }
}
