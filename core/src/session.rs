use std::time::Duration;

use tracing::{debug, info};

use crate::board::Board;
use crate::config::PuzzleConfig;
use crate::error::SessionError;
use crate::game::{scramble_layout, Point};
use crate::group::{Group, GroupId};
use crate::lock::{BoardLock, LockChecker};
use crate::merge::{MergeEngine, SnapMerge};
use crate::rules::EngineRules;
use crate::snapshot::{SessionSnapshot, SESSION_SNAPSHOT_VERSION};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MergeRecord {
    pub absorbed: GroupId,
    pub into: GroupId,
}

/// What one drag release did to the board.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ReleaseOutcome {
    /// Group now holding the released pieces; `None` when the release was ignored.
    pub group: Option<GroupId>,
    pub merges: Vec<MergeRecord>,
    pub locked: bool,
    /// Set on the one release that finished the puzzle.
    pub completed: bool,
}

/// One puzzle instance: the board plus the engines that act on it.
#[derive(Debug, Clone)]
pub struct PuzzleSession<M = SnapMerge, L = BoardLock> {
    board: Board,
    rules: EngineRules,
    merge: M,
    lock: L,
    elapsed: Duration,
    completed: bool,
}

impl PuzzleSession<SnapMerge, BoardLock> {
    pub fn new(config: &PuzzleConfig) -> Result<Self, SessionError> {
        config.validate()?;
        let layout = scramble_layout(
            config.tray.seed,
            config.grid_size,
            config.piece_size,
            &config.tray_area(),
        );
        let board = Board::scrambled(config.grid_size, config.piece_size, &layout)?;
        debug!(
            grid_size = config.grid_size,
            seed = config.tray.seed,
            "scrambled new puzzle"
        );
        Ok(Self::from_board(board, config.rules))
    }

    /// Thresholds are clamped, so the stored rules are the ones the engines use.
    pub fn from_board(board: Board, rules: EngineRules) -> Self {
        let rules = rules.clamped();
        let merge = rules.merge_engine();
        let lock = rules.lock_checker();
        Self::with_engines(board, rules, merge, lock)
    }

    /// Rebuilds a session by replaying group membership, never merges.
    pub fn restore(snapshot: &SessionSnapshot) -> Result<Self, SessionError> {
        if snapshot.version != SESSION_SNAPSHOT_VERSION {
            return Err(SessionError::SnapshotVersion {
                expected: SESSION_SNAPSHOT_VERSION,
                found: snapshot.version,
            });
        }
        let rules = snapshot.rules.sanitized()?;
        let board = Board::from_seeds(snapshot.grid_size, snapshot.piece_size, &snapshot.seeds())?;
        let mut session = Self::from_board(board, rules);
        session.elapsed = Duration::from_millis(snapshot.elapsed_ms);
        info!(
            locked = session.locked_piece_count(),
            total = session.board.total_pieces(),
            groups = session.board.live_groups().count(),
            "restored puzzle session"
        );
        Ok(session)
    }
}

impl<M: MergeEngine, L: LockChecker> PuzzleSession<M, L> {
    /// `rules` is only what `snapshot` records; custom engines bring their
    /// own thresholds and a restore always rebuilds the default engines.
    pub fn with_engines(board: Board, rules: EngineRules, merge: M, lock: L) -> Self {
        let completed = board.is_complete();
        Self {
            board,
            rules,
            merge,
            lock,
            elapsed: Duration::ZERO,
            completed,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn rules(&self) -> EngineRules {
        self.rules
    }

    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn locked_piece_count(&self) -> usize {
        self.board.locked_piece_count()
    }

    pub fn live_groups(&self) -> impl Iterator<Item = &Group> + '_ {
        self.board.live_groups()
    }

    pub fn group_at(&self, x: f32, y: f32) -> Option<GroupId> {
        self.board.group_at(x, y)
    }

    pub fn move_group(&mut self, group: GroupId, position: Point) -> bool {
        self.board.move_group(group, position)
    }

    pub fn drag_by(&mut self, group: GroupId, dx: f32, dy: f32) -> bool {
        let Some(position) = self.board.group(group).map(Group::position) else {
            return false;
        };
        self.board.move_group(group, (position.0 + dx, position.1 + dy))
    }

    /// Adds play time. The clock stops once the puzzle is complete.
    pub fn advance_clock(&mut self, delta: Duration) {
        if !self.completed {
            self.elapsed += delta;
        }
    }

    /// Runs the merge cascade for a dropped group, then the board lock check.
    pub fn release(&mut self, group: GroupId) -> ReleaseOutcome {
        let mut outcome = ReleaseOutcome::default();
        match self.board.group(group) {
            Some(start) if !start.is_empty() && !start.is_locked() => {}
            _ => return outcome,
        }

        let mut active = group;
        'cascade: loop {
            let mut merged = false;
            for other in self.board.live_group_ids() {
                if other == active {
                    continue;
                }
                if self.merge.try_merge(&mut self.board, active, other) {
                    outcome.merges.push(MergeRecord {
                        absorbed: active,
                        into: other,
                    });
                    active = other;
                    merged = true;
                    if self.is_locked(active) {
                        break 'cascade;
                    }
                    break;
                }
            }
            if !merged {
                break;
            }
        }

        if !self.is_locked(active) {
            self.lock.check_board_lock(&mut self.board, active);
        }
        outcome.group = Some(active);
        outcome.locked = self.is_locked(active);

        if !self.completed && self.board.is_complete() {
            self.completed = true;
            outcome.completed = true;
            info!(
                pieces = self.board.total_pieces(),
                elapsed_ms = self.elapsed.as_millis() as u64,
                "puzzle complete"
            );
        }
        outcome
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot::capture(&self.board, self.rules, self.elapsed.as_millis() as u64)
    }

    fn is_locked(&self, group: GroupId) -> bool {
        self.board.group(group).map(Group::is_locked).unwrap_or(false)
    }
}
