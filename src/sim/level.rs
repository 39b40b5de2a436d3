//! Level layout
//!
//! One level for now: each player defends two columns of strong blocks
//! against their own wall and two columns of normal blocks in front of
//! them, with the paddle just ahead of the block wall. The right side
//! mirrors the left.

use glam::Vec2;

use super::state::{BlockKind, PlayerSide, World};

const STRONG_COLUMNS: i32 = 2;
const NORMAL_COLUMNS: i32 = 2;

/// Gap between a wall and its player's first block column, in block widths
const WALL_GAP_COLUMNS: i32 = 2;

/// Paddle distance from the block wall, in paddle widths
const PADDLE_GAP: i32 = 4;

/// Populate `world` with both players' blocks and paddles
pub fn build(world: &mut World) {
    let arena = world.arena;
    let block = world.tuning.block.clone();
    let paddle = world.tuning.paddle.clone();
    let (w, h) = (block.width, block.height);

    let rows = (arena.height - 2 * h) / h;
    let row_y = |row: i32| (arena.top() + h + h * row) as f32;

    let columns = [
        (BlockKind::Strong, 0, STRONG_COLUMNS),
        (BlockKind::Normal, STRONG_COLUMNS, NORMAL_COLUMNS),
    ];
    for (kind, first_column, count) in columns {
        for column in first_column..first_column + count {
            let offset = w * (WALL_GAP_COLUMNS + column);
            let left_x = (arena.left() + offset) as f32;
            // Mirrored: the right player's column ends where the left one starts
            let right_x = (arena.right() - offset - w) as f32;
            for row in 0..rows {
                world.spawn_block(kind, Vec2::new(left_x, row_y(row)), PlayerSide::Left);
                world.spawn_block(kind, Vec2::new(right_x, row_y(row)), PlayerSide::Right);
            }
        }
    }

    let wall_depth = w * (STRONG_COLUMNS + NORMAL_COLUMNS);
    let paddle_y = (arena.top() + arena.bottom() - paddle.height) as f32 / 2.0;
    let left_x = arena.left() + wall_depth + paddle.width * PADDLE_GAP;
    let right_x = arena.right() - wall_depth - paddle.width * (PADDLE_GAP + 1);
    world.spawn_paddle(Vec2::new(left_x as f32, paddle_y), PlayerSide::Left);
    world.spawn_paddle(Vec2::new(right_x as f32, paddle_y), PlayerSide::Right);

    log::info!(
        "Level built: {} blocks in {rows} rows, {} paddles",
        world.blocks.len(),
        world.paddles.len()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::*;
    use crate::settings::Settings;
    use crate::tuning::Tuning;

    fn built() -> World {
        let mut world = World::new(1, &Settings::default(), Tuning::default());
        build(&mut world);
        world
    }

    #[test]
    fn test_block_counts() {
        let world = built();
        assert_eq!(world.blocks.len(), 64);
        for side in [PlayerSide::Left, PlayerSide::Right] {
            let owned: Vec<_> = world.blocks_owned_by(side).collect();
            assert_eq!(owned.len(), 32);
            let strong = owned.iter().filter(|b| b.kind == BlockKind::Strong).count();
            assert_eq!(strong, 16);
        }
    }

    #[test]
    fn test_known_positions() {
        let world = built();
        let at = |x: i32, y: i32| world.blocks.iter().find(|b| b.rect.x == x && b.rect.y == y);

        let first = at(LEVEL_X + 32, LEVEL_Y + 24).unwrap();
        assert_eq!((first.kind, first.owner), (BlockKind::Strong, PlayerSide::Left));
        let mirrored = at(LEVEL_MAX_X - 48, LEVEL_Y + 24).unwrap();
        assert_eq!((mirrored.kind, mirrored.owner), (BlockKind::Strong, PlayerSide::Right));
        let normal = at(LEVEL_MAX_X - 80, LEVEL_Y + 24).unwrap();
        assert_eq!(normal.kind, BlockKind::Normal);

        let left = &world.paddles[0];
        let right = &world.paddles[1];
        assert_eq!((left.rect.x, left.rect.y), (205, 136));
        assert_eq!((right.rect.x, right.rect.y), (357, 136));
    }

    #[test]
    fn test_layout_is_mirrored_and_disjoint() {
        let world = built();
        let arena = world.arena;

        for block in &world.blocks {
            assert!(arena.contains(&block.rect));
            let twin_x = arena.left() + arena.right() - block.rect.x - block.rect.width;
            assert!(world.blocks.iter().any(|b| {
                b.rect.x == twin_x
                    && b.rect.y == block.rect.y
                    && b.kind == block.kind
                    && b.owner != block.owner
            }));
        }

        for (i, a) in world.blocks.iter().enumerate() {
            for b in &world.blocks[i + 1..] {
                assert!(!a.rect.overlaps(&b.rect), "blocks {} and {} overlap", a.id, b.id);
            }
            for paddle in &world.paddles {
                assert!(!a.rect.overlaps(&paddle.rect));
            }
        }
    }
}
