//! Particle layouts. Everything here only computes positions; spawning is
//! left to the caller.

use cool_events::Position;
use rand::Rng;

pub const JOIN_PARTICLES: usize = 10;
pub const DIAMOND_PARTICLES: usize = 15;
pub const MILESTONE_PARTICLES: usize = 20;
pub const HEAL_PARTICLES: usize = 10;
pub const SPIRAL_PARTICLES: usize = 30;

/// `count` points at whole-block offsets from `center`: x and z in
/// `-spread..=spread`, y in `0..=rise`.
pub fn scatter<R: Rng + ?Sized>(
    rng: &mut R,
    center: Position,
    count: usize,
    spread: i32,
    rise: i32,
) -> Vec<Position> {
    (0..count)
        .map(|_| {
            center.offset(
                rng.gen_range(-spread..=spread) as f64,
                rng.gen_range(0..=rise) as f64,
                rng.gen_range(-spread..=spread) as f64,
            )
        })
        .collect()
}

/// Welcome burst around a joining player.
pub fn join_burst<R: Rng + ?Sized>(rng: &mut R, at: Position) -> Vec<Position> {
    scatter(rng, at, JOIN_PARTICLES, 2, 3)
}

/// Burst around a block hit with a diamond.
pub fn diamond_burst<R: Rng + ?Sized>(rng: &mut R, block: Position) -> Vec<Position> {
    scatter(rng, block, DIAMOND_PARTICLES, 3, 4)
}

/// Celebration around the block that completed a milestone.
pub fn milestone_burst<R: Rng + ?Sized>(rng: &mut R, block: Position) -> Vec<Position> {
    scatter(rng, block, MILESTONE_PARTICLES, 2, 3)
}

pub fn heal_burst<R: Rng + ?Sized>(rng: &mut R, at: Position) -> Vec<Position> {
    scatter(rng, at, HEAL_PARTICLES, 1, 2)
}

/// A single ambient spark near a player.
pub fn ambient_spark<R: Rng + ?Sized>(rng: &mut R, at: Position) -> Position {
    at.offset(
        rng.gen_range(-5..=5) as f64,
        rng.gen_range(0..=3) as f64,
        rng.gen_range(-5..=5) as f64,
    )
}

/// Rising spiral of radius 2 around `at`.
pub fn spiral(at: Position) -> Vec<Position> {
    (0..SPIRAL_PARTICLES)
        .map(|i| {
            let angle = i as f64 * 0.5;
            at.offset(angle.cos() * 2.0, i as f64 * 0.1, angle.sin() * 2.0)
        })
        .collect()
}

/// Where the sprint trail particle goes for a move starting at `from`.
pub fn sprint_trail(from: Position) -> Position {
    from.offset(0.0, 0.1, 0.0)
}

/// True with probability `1 / chance`. A chance of 0 or 1 always hits.
pub fn roll_chance<R: Rng + ?Sized>(rng: &mut R, chance: u32) -> bool {
    chance <= 1 || rng.gen_range(1..=chance) == 1
}
