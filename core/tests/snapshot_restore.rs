use std::time::Duration;

use snapboard_core::game::{BOARD_LOCK_THRESHOLD_MIN, GRID_SIZE_MAX};
use snapboard_core::{
    decode, encode, CodecError, EngineRules, GroupSeed, LooseGroupSnapshot, PuzzleConfig,
    PuzzleSession, SessionError, SessionSnapshot, SESSION_SNAPSHOT_VERSION,
};

fn played_session() -> PuzzleSession {
    let mut session = PuzzleSession::new(&PuzzleConfig::default()).expect("session");
    let board = session.board();
    let left = board.group_of(board.piece_id_at((0, 0))).unwrap();
    let right = board.group_of(board.piece_id_at((1, 0))).unwrap();
    let corner = board.group_of(board.piece_id_at((2, 2))).unwrap();

    assert!(session.move_group(left, (1000.0, 1000.0)));
    assert!(session.move_group(right, (1100.0, 1003.0)));
    assert_eq!(session.release(right).merges.len(), 1);

    assert!(session.move_group(corner, (203.0, 203.0)));
    assert!(session.release(corner).locked);
    session.advance_clock(Duration::from_millis(1500));
    session
}

fn assert_same_layout(a: &PuzzleSession, b: &PuzzleSession) {
    for piece in a.board().pieces() {
        let wa = a.board().world_position(piece.id()).unwrap();
        let wb = b.board().world_position(piece.id()).unwrap();
        assert!((wa.0 - wb.0).abs() < 1e-3 && (wa.1 - wb.1).abs() < 1e-3, "{wa:?} vs {wb:?}");
        let locked_a = a.board().group(piece.group()).unwrap().is_locked();
        let restored = b.board().piece(piece.id()).unwrap();
        let locked_b = b.board().group(restored.group()).unwrap().is_locked();
        assert_eq!(locked_a, locked_b);
    }
}

#[test]
fn snapshot_captures_locked_and_loose_groups() {
    let session = played_session();
    let snapshot = session.snapshot();
    assert_eq!(snapshot.version, SESSION_SNAPSHOT_VERSION);
    assert_eq!(snapshot.grid_size, 3);
    assert_eq!(snapshot.elapsed_ms, 1500);
    assert_eq!(snapshot.locked, vec![vec![(2, 2)]]);
    assert_eq!(snapshot.locked_piece_count(), 1);
    assert_eq!(snapshot.loose.len(), 7);
    let pair = snapshot
        .loose
        .iter()
        .find(|group| group.pieces.len() == 2)
        .expect("merged pair");
    // The dragged piece joins the group it snapped to, which moves to meet it.
    assert_eq!(pair.pieces, vec![(0, 0), (1, 0)]);
    assert_eq!(pair.position, (1000.0, 1003.0));
}

#[test]
fn restore_through_codec_rebuilds_board() {
    let session = played_session();
    let bytes = encode(&session.snapshot()).expect("encode");
    let decoded: SessionSnapshot = decode(&bytes).expect("decode");
    assert_eq!(decoded, session.snapshot());

    let restored = PuzzleSession::restore(&decoded).expect("restore");
    assert_same_layout(&session, &restored);
    assert_eq!(restored.elapsed(), Duration::from_millis(1500));
    assert_eq!(restored.locked_piece_count(), 1);
    assert!(!restored.is_complete());
    assert_eq!(restored.rules(), session.rules());
}

#[test]
fn restored_session_keeps_playing() {
    let session = played_session();
    let mut restored = PuzzleSession::restore(&session.snapshot()).expect("restore");
    let board = restored.board();
    let piece = board.piece_id_at((2, 1));
    let group = board.group_of(piece).unwrap();
    assert!(restored.move_group(group, (201.0, 104.0)));
    let outcome = restored.release(group);
    assert!(outcome.locked);
    assert_eq!(outcome.merges.len(), 1);
    assert_eq!(restored.locked_piece_count(), 2);
}

#[test]
fn completed_snapshot_does_not_fire_again() {
    let snapshot = SessionSnapshot {
        version: SESSION_SNAPSHOT_VERSION,
        grid_size: 2,
        piece_size: 50.0,
        elapsed_ms: 90_000,
        rules: Default::default(),
        locked: vec![vec![(0, 0), (1, 0)], vec![(0, 1), (1, 1)]],
        loose: Vec::new(),
    };
    let mut session = PuzzleSession::restore(&snapshot).expect("restore");
    assert!(session.is_complete());
    assert_eq!(session.locked_piece_count(), 4);
    for group in session.board().live_group_ids() {
        assert!(!session.release(group).completed);
    }
}

#[test]
fn restore_rejects_bad_snapshots() {
    let base = SessionSnapshot {
        version: SESSION_SNAPSHOT_VERSION,
        grid_size: 2,
        piece_size: 50.0,
        elapsed_ms: 0,
        rules: Default::default(),
        locked: vec![vec![(0, 0)]],
        loose: vec![LooseGroupSnapshot {
            position: (300.0, 0.0),
            pieces: vec![(1, 0), (0, 1), (1, 1)],
        }],
    };
    assert!(PuzzleSession::restore(&base).is_ok());

    let mut duplicate = base.clone();
    duplicate.locked[0].push((1, 1));
    assert!(matches!(
        PuzzleSession::restore(&duplicate),
        Err(SessionError::DuplicateCell { x: 1, y: 1 })
    ));

    let mut outside = base.clone();
    outside.loose[0].pieces.push((2, 0));
    assert!(matches!(
        PuzzleSession::restore(&outside),
        Err(SessionError::CellOutOfRange { x: 2, y: 0, .. })
    ));

    let mut missing = base.clone();
    missing.loose[0].pieces.pop();
    assert!(matches!(
        PuzzleSession::restore(&missing),
        Err(SessionError::MissingPieces { count: 1, total: 4 })
    ));

    let mut version = base.clone();
    version.version = 99;
    assert!(matches!(
        PuzzleSession::restore(&version),
        Err(SessionError::SnapshotVersion { found: 99, .. })
    ));

    let mut size = base.clone();
    size.piece_size = 0.0;
    assert!(matches!(
        PuzzleSession::restore(&size),
        Err(SessionError::InvalidPieceSize(_))
    ));

    let mut nan_rules = base;
    nan_rules.rules = EngineRules {
        snap_threshold: f32::NAN,
        board_lock_threshold: -5.0,
    };
    assert!(matches!(
        PuzzleSession::restore(&nan_rules),
        Err(SessionError::InvalidThreshold {
            name: "snap_threshold",
            ..
        })
    ));
}

#[test]
fn restore_rejects_oversized_grid() {
    for grid_size in [GRID_SIZE_MAX + 1, 70_000, u32::MAX] {
        let snapshot = SessionSnapshot {
            version: SESSION_SNAPSHOT_VERSION,
            grid_size,
            piece_size: 50.0,
            elapsed_ms: 0,
            rules: Default::default(),
            locked: vec![vec![(0, 0)]],
            loose: Vec::new(),
        };
        assert!(matches!(
            PuzzleSession::restore(&snapshot),
            Err(SessionError::GridTooLarge { max: GRID_SIZE_MAX, .. })
        ));
    }
    let seeds = vec![GroupSeed::single((0, 0), (0.0, 0.0))];
    assert!(matches!(
        snapboard_core::Board::from_seeds(u32::MAX, 10.0, &seeds),
        Err(SessionError::GridTooLarge { .. })
    ));
}

#[test]
fn restore_clamps_out_of_range_rules() {
    let snapshot = SessionSnapshot {
        version: SESSION_SNAPSHOT_VERSION,
        grid_size: 1,
        piece_size: 50.0,
        elapsed_ms: 0,
        rules: EngineRules {
            snap_threshold: 20.0,
            board_lock_threshold: -5.0,
        },
        locked: Vec::new(),
        loose: vec![LooseGroupSnapshot {
            position: (0.0, 0.0),
            pieces: vec![(0, 0)],
        }],
    };
    let mut session = PuzzleSession::restore(&snapshot).expect("restore");
    assert_eq!(session.rules().board_lock_threshold, BOARD_LOCK_THRESHOLD_MIN);
    assert_eq!(session.snapshot().rules, session.rules());

    let group = session.board().live_group_ids()[0];
    let outcome = session.release(group);
    assert!(outcome.locked);
    assert!(outcome.completed);
}

#[test]
fn empty_group_seed_is_rejected() {
    let seeds = vec![GroupSeed::loose((0.0, 0.0), Vec::new())];
    assert!(matches!(
        snapboard_core::Board::from_seeds(1, 10.0, &seeds),
        Err(SessionError::EmptyGroup { index: 0 })
    ));
}

#[test]
fn decode_rejects_garbage() {
    let result: Result<SessionSnapshot, CodecError> = decode(&[1, 2, 3]);
    assert!(matches!(result, Err(CodecError::Decode { len: 3, .. })));
}
