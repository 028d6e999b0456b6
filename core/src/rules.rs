use rkyv::{Archive, Deserialize, Serialize};

use crate::error::SessionError;
use crate::game::{
    BOARD_LOCK_THRESHOLD_DEFAULT, BOARD_LOCK_THRESHOLD_MAX, BOARD_LOCK_THRESHOLD_MIN,
    SNAP_THRESHOLD_DEFAULT, SNAP_THRESHOLD_MAX, SNAP_THRESHOLD_MIN,
};
use crate::lock::BoardLock;
use crate::merge::SnapMerge;

#[derive(Debug, Clone, Copy, PartialEq, Archive, Serialize, Deserialize, serde::Deserialize)]
#[serde(default)]
pub struct EngineRules {
    pub snap_threshold: f32,
    pub board_lock_threshold: f32,
}

impl Default for EngineRules {
    fn default() -> Self {
        Self {
            snap_threshold: SNAP_THRESHOLD_DEFAULT,
            board_lock_threshold: BOARD_LOCK_THRESHOLD_DEFAULT,
        }
    }
}

impl EngineRules {
    /// Pulls both thresholds into their supported ranges. NaN passes through.
    pub fn clamped(self) -> Self {
        Self {
            snap_threshold: self.snap_threshold.clamp(SNAP_THRESHOLD_MIN, SNAP_THRESHOLD_MAX),
            board_lock_threshold: self
                .board_lock_threshold
                .clamp(BOARD_LOCK_THRESHOLD_MIN, BOARD_LOCK_THRESHOLD_MAX),
        }
    }

    /// Clamped copy of rules read from an untrusted source such as a save file.
    pub fn sanitized(self) -> Result<Self, SessionError> {
        for (name, value) in [
            ("snap_threshold", self.snap_threshold),
            ("board_lock_threshold", self.board_lock_threshold),
        ] {
            if !value.is_finite() {
                return Err(SessionError::InvalidThreshold { name, value });
            }
        }
        Ok(self.clamped())
    }

    pub fn merge_engine(&self) -> SnapMerge {
        SnapMerge::new(self.snap_threshold)
    }

    pub fn lock_checker(&self) -> BoardLock {
        BoardLock::new(self.board_lock_threshold)
    }
}
