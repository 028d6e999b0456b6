use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use snapboard_core::game::{grid_delta, Point};
use snapboard_core::{Board, GroupId, PuzzleSession};
use tracing::{debug, info};

#[derive(clap::Args, Clone, Debug)]
pub(super) struct BotArgs {
    #[arg(long, default_value_t = 500)]
    pub(super) max_moves: u32,
    #[arg(long)]
    pub(super) bot_seed: Option<u64>,
    #[arg(long, default_value_t = 4.0, value_parser = parse_finite)]
    pub(super) jitter: f32,
    #[arg(long, default_value_t = 0.6, value_parser = parse_finite)]
    pub(super) merge_rate: f32,
    #[arg(long, default_value_t = 0.1, value_parser = parse_finite)]
    pub(super) miss_rate: f32,
    #[arg(long, default_value_t = 240.0, value_parser = parse_finite)]
    pub(super) miss_distance: f32,
    #[arg(long, default_value_t = 300)]
    pub(super) think_min_ms: u64,
    #[arg(long, default_value_t = 2500)]
    pub(super) think_max_ms: u64,
}

impl Default for BotArgs {
    fn default() -> Self {
        Self {
            max_moves: 500,
            bot_seed: None,
            jitter: 4.0,
            merge_rate: 0.6,
            miss_rate: 0.1,
            miss_distance: 240.0,
            think_min_ms: 300,
            think_max_ms: 2500,
        }
    }
}

fn parse_finite(raw: &str) -> Result<f32, String> {
    let value: f32 = raw.trim().parse().map_err(|err| format!("{err}"))?;
    if value.is_finite() {
        Ok(value)
    } else {
        Err(format!("expected a finite number, got {raw}"))
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(super) struct BotReport {
    pub moves: u32,
    pub merges: u32,
    pub locks: u32,
    pub completed: bool,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum DropKind {
    Miss,
    Join,
    Solve,
}

pub(super) fn play(session: &mut PuzzleSession, args: &BotArgs) -> BotReport {
    let seed = args.bot_seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, max_moves = args.max_moves, "bot starting");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut report = BotReport {
        completed: session.is_complete(),
        ..BotReport::default()
    };
    while report.moves < args.max_moves && !session.is_complete() {
        let movable: Vec<GroupId> = session
            .live_groups()
            .filter(|group| !group.is_locked())
            .map(|group| group.id())
            .collect();
        if movable.is_empty() {
            break;
        }
        let group = movable[rng.random_range(0..movable.len())];
        let (kind, position) = choose_drop(session.board(), group, args, &mut rng);
        let jitter = args.jitter.abs();
        let position = (
            position.0 + rng.random_range(-jitter..=jitter),
            position.1 + rng.random_range(-jitter..=jitter),
        );
        report.moves += 1;
        if !session.move_group(group, position) {
            continue;
        }
        let think_max = args.think_max_ms.max(args.think_min_ms);
        session.advance_clock(Duration::from_millis(
            rng.random_range(args.think_min_ms..=think_max),
        ));

        let outcome = session.release(group);
        report.merges += outcome.merges.len() as u32;
        if outcome.locked {
            report.locks += 1;
        }
        debug!(
            %group,
            ?kind,
            x = position.0,
            y = position.1,
            merges = outcome.merges.len(),
            locked = outcome.locked,
            "bot move"
        );
        if outcome.completed {
            report.completed = true;
        }
    }
    if report.completed {
        info!(moves = report.moves, "bot finished: puzzle is complete");
    }
    report
}

fn choose_drop(
    board: &Board,
    group: GroupId,
    args: &BotArgs,
    rng: &mut StdRng,
) -> (DropKind, Point) {
    let current = board
        .group(group)
        .map(|group| group.position())
        .unwrap_or_default();
    let roll: f32 = rng.random();
    if roll < args.miss_rate {
        let reach = args.miss_distance.abs();
        let dx = rng.random_range(-reach..=reach);
        let dy = rng.random_range(-reach..=reach);
        return (DropKind::Miss, (current.0 + dx, current.1 + dy));
    }
    if roll < args.miss_rate + args.merge_rate {
        let joins = join_positions(board, group);
        if !joins.is_empty() {
            return (DropKind::Join, joins[rng.random_range(0..joins.len())]);
        }
    }
    (DropKind::Solve, solved_position(board, group).unwrap_or(current))
}

/// Group positions that would line one member up with a grid neighbour held
/// by a different group.
fn join_positions(board: &Board, group: GroupId) -> Vec<Point> {
    let Some(current) = board.group(group) else {
        return Vec::new();
    };
    let grid_size = board.grid_size();
    let mut positions = Vec::new();
    for &member_id in current.pieces() {
        let Some(member) = board.piece(member_id) else {
            continue;
        };
        let (x, y) = member.grid();
        let neighbors = [
            (x.checked_sub(1), Some(y)),
            (x.checked_add(1), Some(y)),
            (Some(x), y.checked_sub(1)),
            (Some(x), y.checked_add(1)),
        ];
        for (nx, ny) in neighbors {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            if nx >= grid_size || ny >= grid_size {
                continue;
            }
            let neighbor_id = board.piece_id_at((nx, ny));
            if board.group_of(neighbor_id) == Some(group) {
                continue;
            }
            let Some(neighbor_world) = board.world_position(neighbor_id) else {
                continue;
            };
            let delta = grid_delta((nx, ny), (x, y), member.size());
            let rel = member.relative_pos();
            positions.push((
                neighbor_world.0 + delta.0 - rel.0,
                neighbor_world.1 + delta.1 - rel.1,
            ));
        }
    }
    positions
}

fn solved_position(board: &Board, group: GroupId) -> Option<Point> {
    let first = board.group(group)?.pieces().first()?;
    let piece = board.piece(*first)?;
    let target = piece.target_pos();
    let rel = piece.relative_pos();
    Some((target.0 - rel.0, target.1 - rel.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use snapboard_core::PuzzleConfig;

    fn args(seed: u64) -> BotArgs {
        BotArgs {
            max_moves: 2000,
            bot_seed: Some(seed),
            ..BotArgs::default()
        }
    }

    #[test]
    fn bot_completes_default_puzzle() {
        let mut session = PuzzleSession::new(&PuzzleConfig::default()).expect("session");
        let report = play(&mut session, &args(42));
        assert!(report.completed);
        assert!(session.is_complete());
        assert_eq!(session.locked_piece_count(), 9);
        assert!(report.locks >= 1);
        assert!(session.elapsed() > Duration::ZERO);
    }

    #[test]
    fn bot_is_deterministic_per_seed() {
        let config = PuzzleConfig {
            grid_size: 4,
            ..PuzzleConfig::default()
        };
        let mut first = PuzzleSession::new(&config).expect("session");
        let mut second = PuzzleSession::new(&config).expect("session");
        let a = play(&mut first, &args(9));
        let b = play(&mut second, &args(9));
        assert_eq!(a, b);
        assert_eq!(first.elapsed(), second.elapsed());
    }

    #[test]
    fn join_positions_line_up_with_neighbors() {
        let session = PuzzleSession::new(&PuzzleConfig::default()).expect("session");
        let board = session.board();
        let corner = board.piece_id_at((0, 0));
        let group = board.group_of(corner).expect("group");
        let joins = join_positions(board, group);
        assert_eq!(joins.len(), 2);
        let right = board.world_position(board.piece_id_at((1, 0))).expect("right");
        assert!(joins.contains(&(right.0 - 100.0, right.1)));
    }

    #[test]
    fn rejects_non_finite_numbers() {
        assert_eq!(parse_finite(" 2.5 "), Ok(2.5));
        assert!(parse_finite("NaN").is_err());
        assert!(parse_finite("inf").is_err());
        assert!(parse_finite("-infinity").is_err());
        assert!(parse_finite("wide").is_err());
    }

    #[test]
    fn zero_moves_leaves_session_untouched() {
        let mut session = PuzzleSession::new(&PuzzleConfig::default()).expect("session");
        let report = play(
            &mut session,
            &BotArgs {
                max_moves: 0,
                ..args(1)
            },
        );
        assert_eq!(report, BotReport::default());
        assert_eq!(session.live_groups().count(), 9);
    }
}
