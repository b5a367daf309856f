//! Collision detection
//!
//! Pure geometric pass over the live entities. Everything is a circle except
//! the snake, whose body is a chain of independently hittable segment circles.
//! Detection only reports overlapping pairs; deciding what a hit means is the
//! orchestrator's job.

use glam::Vec2;

use super::bullet::{Bullet, EnemyBullet};
use super::enemy::{Enemy, SNAKE_SEGMENT_RADIUS};
use super::player::Player;
use super::powerup::PowerUp;

/// Circle-circle overlap (touching circles do not collide)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let reach = ra + rb;
    a.distance_squared(b) < reach * reach
}

/// First snake segment containing a circle at `point`
pub fn segment_hit(point: Vec2, radius: f32, segments: &[Vec2]) -> Option<usize> {
    segments
        .iter()
        .position(|seg| circles_overlap(point, radius, *seg, SNAKE_SEGMENT_RADIUS))
}

/// Everything the collision pass looks at
#[derive(Debug, Clone, Copy)]
pub struct CollisionWorld<'a> {
    pub player: &'a Player,
    /// False while invincible: player hazard checks are skipped outright
    pub player_vulnerable: bool,
    pub bullets: &'a [Bullet],
    pub enemy_bullets: &'a [EnemyBullet],
    pub enemies: &'a [Enemy],
    pub power_ups: &'a [PowerUp],
}

/// Overlapping pairs, by index into the input slices
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// (bullet, enemy) for every non-snake enemy
    pub bullet_enemy: Vec<(usize, usize)>,
    /// (bullet, snake enemy, segment)
    pub bullet_segment: Vec<(usize, usize, usize)>,
    pub player_enemy: Vec<usize>,
    pub player_enemy_bullet: Vec<usize>,
    pub player_power_up: Vec<usize>,
}

impl CollisionReport {
    pub fn is_empty(&self) -> bool {
        self.bullet_enemy.is_empty()
            && self.bullet_segment.is_empty()
            && self.player_enemy.is_empty()
            && self.player_enemy_bullet.is_empty()
            && self.player_power_up.is_empty()
    }
}

/// Run the collision pass
pub fn detect(world: &CollisionWorld) -> CollisionReport {
    let mut report = CollisionReport::default();

    for (bi, bullet) in world.bullets.iter().enumerate() {
        if !bullet.is_alive() {
            continue;
        }
        for (ei, enemy) in world.enemies.iter().enumerate() {
            if !enemy.alive {
                continue;
            }
            let segments = enemy.segments();
            if !segments.is_empty() {
                if let Some(si) = segment_hit(bullet.pos(), bullet.get_size(), segments) {
                    report.bullet_segment.push((bi, ei, si));
                }
            } else if circles_overlap(bullet.pos(), bullet.get_size(), enemy.pos, enemy.get_size()) {
                report.bullet_enemy.push((bi, ei));
            }
        }
    }

    let player = world.player;
    if !player.alive {
        return report;
    }

    for (pi, power_up) in world.power_ups.iter().enumerate() {
        if power_up.alive
            && circles_overlap(player.pos, player.get_size(), power_up.pos, power_up.get_size())
        {
            report.player_power_up.push(pi);
        }
    }

    if !world.player_vulnerable {
        return report;
    }

    let body = player.enemy_hitbox();
    for (ei, enemy) in world.enemies.iter().enumerate() {
        if !enemy.alive {
            continue;
        }
        let touches = circles_overlap(player.pos, body, enemy.pos, enemy.get_size())
            || segment_hit(player.pos, body, enemy.segments()).is_some();
        if touches {
            report.player_enemy.push(ei);
        }
    }

    let core = player.bullet_hitbox();
    for (bi, bullet) in world.enemy_bullets.iter().enumerate() {
        if bullet.is_alive() && circles_overlap(player.pos, core, bullet.pos(), bullet.get_size()) {
            report.player_enemy_bullet.push(bi);
        }
    }

    report
}
