pub mod board;
pub mod codec;
pub mod config;
pub mod error;
pub mod game;
pub mod group;
pub mod lock;
pub mod merge;
pub mod piece;
pub mod rules;
pub mod session;
pub mod snapshot;

pub use board::{Board, GroupSeed};
pub use codec::{decode, encode, CodecError};
pub use config::{ConfigError, PuzzleConfig, TrayConfig};
pub use error::SessionError;
pub use game::{Point, TrayArea, TrayLayout};
pub use group::{Group, GroupId, WorldPosition};
pub use lock::{BoardLock, LockChecker};
pub use merge::{execute_merge, MergeEngine, SnapMerge};
pub use piece::{Piece, PieceId};
pub use rules::EngineRules;
pub use session::{MergeRecord, PuzzleSession, ReleaseOutcome};
pub use snapshot::{LooseGroupSnapshot, SessionSnapshot, SESSION_SNAPSHOT_VERSION};
