//! Ball vs block resolution
//!
//! Blocks are laid out on a grid, so a ball often overlaps two or three of
//! them in the same tick. Reflecting off each one separately would flip the
//! ball several times and let it tunnel into the wall of blocks; instead the
//! overlapped group is resolved as a whole, reflecting once off the face the
//! ball really struck.

use super::collision::{Side, approaches, classify_side, mirror_x, mirror_y, nearest_exit};
use super::particle::block_burst;
use super::physics::TickContext;
use super::rect::Rect;
use super::state::{Ball, Block, GameEvent};

/// A block the ball overlaps and the face it was classified against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Contact {
    index: usize,
    side: Side,
}

/// How two blocks line up on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    /// Same `y`, side by side
    Row,
    /// Same `x`, stacked
    Column,
}

impl Axis {
    fn aligned(self, a: &Rect, b: &Rect) -> bool {
        match self {
            Axis::Row => a.y == b.y,
            Axis::Column => a.x == b.x,
        }
    }

    /// Faces the pair presents as one continuous surface
    fn shared_faces(self) -> [Side; 2] {
        match self {
            Axis::Row => [Side::Top, Side::Bottom],
            Axis::Column => [Side::Left, Side::Right],
        }
    }

    /// Faces an odd block out of an L is resolved against
    fn cross_faces(self) -> [Side; 2] {
        match self {
            Axis::Row => [Side::Left, Side::Right],
            Axis::Column => [Side::Top, Side::Bottom],
        }
    }

    /// Position along the line of the pair
    fn along(self, rect: &Rect) -> i32 {
        match self {
            Axis::Row => rect.x,
            Axis::Column => rect.y,
        }
    }

    /// Position across the line of the pair
    fn across(self, rect: &Rect) -> i32 {
        match self {
            Axis::Row => rect.y,
            Axis::Column => rect.x,
        }
    }
}

/// Resolve every block the ball overlaps this tick
pub fn collide_blocks(ball: &mut Ball, blocks: &mut [Block], ctx: &mut TickContext<'_>) {
    // Blocks with no classifiable face (ball fully inside) are ignored
    let contacts: Vec<Contact> = blocks
        .iter()
        .enumerate()
        .filter(|(_, block)| !block.is_destroyed() && ball.rect.overlaps(&block.rect))
        .filter_map(|(index, block)| {
            classify_side(&ball.rect, &block.rect).map(|side| Contact { index, side })
        })
        .collect();

    match contacts.as_slice() {
        [] => {}
        [single] => {
            strike(ball, &mut blocks[single.index], single.side, ctx);
        }
        [first, second] => resolve_pair(ball, blocks, *first, *second, ctx),
        [first, second, third] => resolve_triple(ball, blocks, [*first, *second, *third], ctx),
        // Four or more only happens with odd layouts; treat each on its own
        _ => resolve_each(ball, blocks, &contacts, ctx),
    }
}

fn resolve_pair(
    ball: &mut Ball,
    blocks: &mut [Block],
    first: Contact,
    second: Contact,
    ctx: &mut TickContext<'_>,
) {
    let (a, b) = (blocks[first.index].rect, blocks[second.index].rect);
    let axis = [Axis::Row, Axis::Column]
        .into_iter()
        .find(|axis| axis.aligned(&a, &b));

    let shared = axis.and_then(|axis| {
        axis.shared_faces()
            .into_iter()
            .find(|face| first.side == *face || second.side == *face)
    });

    match (axis, shared) {
        (_, Some(side)) => strike_together(ball, blocks, first.index, second.index, side, ctx),
        // Both faces are the seam between the two blocks: bounce off the
        // pair as one box, or the second placement would push the ball back
        // into the first block
        (Some(_), None) => {
            let merged = a.union(&b);
            let side = classify_side(&ball.rect, &merged)
                .unwrap_or_else(|| nearest_exit(&ball.rect, &merged));
            let (primary, companion) = if on_outer_face(&a, &b, side) {
                (first.index, second.index)
            } else {
                (second.index, first.index)
            };
            strike_together(ball, blocks, primary, companion, side, ctx);
        }
        (None, None) => resolve_each(ball, blocks, &[first, second], ctx),
    }
}

/// Whether `a` forms `side` of the box covering `a` and `b`
fn on_outer_face(a: &Rect, b: &Rect, side: Side) -> bool {
    match side {
        Side::Top => a.top() <= b.top(),
        Side::Bottom => a.bottom() >= b.bottom(),
        Side::Left => a.left() <= b.left(),
        Side::Right => a.right() >= b.right(),
    }
}

/// An L or a line of three: two blocks share a row (or failing that a
/// column) and the third sits off it
fn resolve_triple(
    ball: &mut Ball,
    blocks: &mut [Block],
    contacts: [Contact; 3],
    ctx: &mut TickContext<'_>,
) {
    let rects = contacts.map(|contact| blocks[contact.index].rect);

    for axis in [Axis::Row, Axis::Column] {
        for (i, j, k) in [(0, 1, 2), (1, 2, 0), (2, 0, 1)] {
            if !axis.aligned(&rects[i], &rects[j]) {
                continue;
            }
            let third = contacts[k];

            let [near, far] = axis.cross_faces();
            let third_side = if third.side == near { near } else { far };
            strike(ball, &mut blocks[third.index], third_side, ctx);

            let [front, back] = axis.shared_faces();
            let pair_side = if axis.across(&rects[k]) > axis.across(&rects[i]) {
                back
            } else {
                front
            };
            let (primary, companion) = if axis.along(&rects[i]) > axis.along(&rects[j]) {
                (contacts[i], contacts[j])
            } else {
                (contacts[j], contacts[i])
            };
            strike_together(ball, blocks, primary.index, companion.index, pair_side, ctx);
            return;
        }
    }

    resolve_each(ball, blocks, &contacts, ctx);
}

fn resolve_each(ball: &mut Ball, blocks: &mut [Block], contacts: &[Contact], ctx: &mut TickContext<'_>) {
    for contact in contacts {
        strike(ball, &mut blocks[contact.index], contact.side, ctx);
    }
}

/// Reflect off `primary` and, if that was a real hit, damage `companion` as
/// part of the same surface
fn strike_together(
    ball: &mut Ball,
    blocks: &mut [Block],
    primary: usize,
    companion: usize,
    side: Side,
    ctx: &mut TickContext<'_>,
) {
    if strike(ball, &mut blocks[primary], side, ctx) {
        hit_block(ball, &mut blocks[companion], ctx);
    }
}

/// Bounce off one face of a block. The ball only reflects (and the block
/// only takes damage) if the ball was moving into that face; either way the
/// ball is moved clear of it. Returns whether the block was struck.
pub fn strike(ball: &mut Ball, block: &mut Block, side: Side, ctx: &mut TickContext<'_>) -> bool {
    let struck = approaches(side, ball.stats.angle);
    if struck {
        let reflected = match side {
            Side::Top | Side::Bottom => mirror_y(ball.stats.angle),
            Side::Left | Side::Right => mirror_x(ball.stats.angle),
        };
        ball.set_angle(reflected);
        hit_block(ball, block, ctx);
    }
    ball.place_against(side, &block.rect);
    struck
}

/// Damage a block. A player's own blocks take half damage.
fn hit_block(ball: &mut Ball, block: &mut Block, ctx: &mut TickContext<'_>) {
    let damage = if block.owner == ball.owner {
        ball.stats.damage / 2.0
    } else {
        ball.stats.damage
    };

    ctx.ball_particles(ball);
    let hit = block.on_hit(damage, ctx.tuning.block.flash_fade_step);
    block_burst(ctx.particles, ctx.max_particles, ctx.rng, block, ctx.tuning);

    if hit.crossed_half_health {
        ctx.events.push(GameEvent::BlockHalfHealth { block: block.id });
    }
    if hit.depleted {
        log::debug!("Block {} depleted by ball {}", block.id, ball.id);
    }
    ctx.events.push(GameEvent::BallHitBlock {
        ball: ball.id,
        block: block.id,
        damage,
    });

    for effect in &mut ball.effects {
        effect.on_hit_block(&mut ball.stats, block);
    }
    ball.collided = true;
}
