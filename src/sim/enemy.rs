//! Enemies and their per-variant behaviors
//!
//! One `Enemy` record carries the shared body (position, velocity, health) and a
//! `Behavior` tag holding only the state its variant needs. Each variant steers
//! itself from its own timers; nothing here touches other entities. Shots and
//! split offspring are queued on the enemy and drained by the orchestrator.

use glam::Vec2;
use rand::Rng;

use super::arena::Arena;
use super::bullet::Bullet;
use crate::consts::MIN_SPAWN_DISTANCE;
use crate::{clamp_magnitude, cross, ease_factor, from_angle, heading, normalize_angle, turn_toward};

/// Seconds between Wanderer heading changes
pub const WANDER_INTERVAL: f32 = 2.0;
/// Shooters re-roll heading on a slower beat than Wanderers
pub const SHOOTER_WANDER_INTERVAL: f32 = WANDER_INTERVAL * 1.5;
pub const SHOOTER_FIRE_INTERVAL: f32 = 2.0;
const CHASER_ACCEL: f32 = 600.0;
const SEEK_EASE_RATE: f32 = 2.5;
const DODGER_EASE_RATE: f32 = 5.0;
const DODGE_RADIUS: f32 = 160.0;
const DODGE_FORCE: f32 = 420.0;
const DODGER_MAX_SPEED_SCALE: f32 = 1.6;
const SPLITTER_SPIN: f32 = 3.0;

pub const SPLIT_COUNT: usize = 3;
const SPLIT_OFFSET: f32 = 24.0;

pub const SNAKE_SEGMENTS: usize = 9;
pub const SNAKE_SEGMENT_SPACING: f32 = 18.0;
pub const SNAKE_SEGMENT_RADIUS: f32 = 9.0;
pub const SNAKE_SEGMENT_POINTS: u64 = 10;
const SNAKE_TURN_RATE: f32 = 3.5;
const SNAKE_WIGGLE_FREQ: f32 = 4.0;
const SNAKE_WIGGLE_AMPLITUDE: f32 = 0.7;

pub const BOSS_TELEPORT_INTERVAL: f32 = 3.0;
pub const BOSS_CHARGE_TIME: f32 = 1.0;
pub const BOSS_FIRE_INTERVAL: f32 = 1.5;
pub const BOSS_FAN_BULLETS: usize = 5;
const BOSS_FAN_SPACING: f32 = 0.2;
const BOSS_TELEPORT_ATTEMPTS: usize = 8;

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EnemyKind {
    Wanderer,
    Chaser,
    Shooter,
    Diamond,
    Dodger,
    Splitter,
    SplitterMini,
    Snake,
    BossHexagon,
}

impl EnemyKind {
    /// Score for a kill (before multiplier)
    pub fn points(self) -> u64 {
        match self {
            EnemyKind::Wanderer => 25,
            EnemyKind::Chaser => 50,
            EnemyKind::Shooter => 75,
            EnemyKind::Diamond => 50,
            EnemyKind::Dodger => 100,
            EnemyKind::Splitter => 75,
            EnemyKind::SplitterMini => 25,
            EnemyKind::Snake => 150,
            EnemyKind::BossHexagon => 1000,
        }
    }

    /// Collision radius of the body (the snake's head)
    pub fn size(self) -> f32 {
        match self {
            EnemyKind::Wanderer => 16.0,
            EnemyKind::Chaser => 15.0,
            EnemyKind::Shooter => 18.0,
            EnemyKind::Diamond => 16.0,
            EnemyKind::Dodger => 14.0,
            EnemyKind::Splitter => 20.0,
            EnemyKind::SplitterMini => 10.0,
            EnemyKind::Snake => 12.0,
            EnemyKind::BossHexagon => 55.0,
        }
    }

    pub fn base_health(self) -> f32 {
        match self {
            EnemyKind::Shooter | EnemyKind::Splitter => 2.0,
            EnemyKind::Snake => SNAKE_SEGMENTS as f32,
            EnemyKind::BossHexagon => 50.0,
            _ => 1.0,
        }
    }

    pub fn base_speed(self) -> f32 {
        match self {
            EnemyKind::Wanderer => 110.0,
            EnemyKind::Chaser => 190.0,
            EnemyKind::Shooter => 80.0,
            EnemyKind::Diamond => 160.0,
            EnemyKind::Dodger => 200.0,
            EnemyKind::Splitter => 120.0,
            EnemyKind::SplitterMini => 190.0,
            EnemyKind::Snake => 170.0,
            EnemyKind::BossHexagon => 0.0,
        }
    }

    /// Whether a kill may drop a power-up
    pub fn drops_power_ups(self) -> bool {
        self != EnemyKind::SplitterMini
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnemyKind::Wanderer => "wanderer",
            EnemyKind::Chaser => "chaser",
            EnemyKind::Shooter => "shooter",
            EnemyKind::Diamond => "diamond",
            EnemyKind::Dodger => "dodger",
            EnemyKind::Splitter => "splitter",
            EnemyKind::SplitterMini => "splitter_mini",
            EnemyKind::Snake => "snake",
            EnemyKind::BossHexagon => "boss_hexagon",
        }
    }
}

/// Trailing body of a snake
#[derive(Debug, Clone)]
pub struct SnakeBody {
    pub segments: Vec<Vec2>,
    /// Drives the slithering oscillation
    pub wiggle_time: f32,
}

/// Boss teleport/charge/fire cycle
#[derive(Debug, Clone)]
pub struct BossState {
    pub teleport_timer: f32,
    pub shoot_timer: f32,
    pub charge_timer: f32,
    pub charging: bool,
}

/// Per-variant behavior state
#[derive(Debug, Clone)]
pub enum Behavior {
    Wanderer { change_timer: f32 },
    Chaser,
    Shooter { change_timer: f32, shoot_timer: f32 },
    Diamond,
    Dodger,
    Splitter,
    SplitterMini,
    Snake(SnakeBody),
    Boss(BossState),
}

impl Behavior {
    fn initial(kind: EnemyKind, head: Vec2, rotation: f32) -> Self {
        match kind {
            EnemyKind::Wanderer => Behavior::Wanderer {
                // Pick a heading on the first update
                change_timer: WANDER_INTERVAL,
            },
            EnemyKind::Chaser => Behavior::Chaser,
            EnemyKind::Shooter => Behavior::Shooter {
                change_timer: SHOOTER_WANDER_INTERVAL,
                shoot_timer: 0.0,
            },
            EnemyKind::Diamond => Behavior::Diamond,
            EnemyKind::Dodger => Behavior::Dodger,
            EnemyKind::Splitter => Behavior::Splitter,
            EnemyKind::SplitterMini => Behavior::SplitterMini,
            EnemyKind::Snake => {
                let back = from_angle(rotation + std::f32::consts::PI, SNAKE_SEGMENT_SPACING);
                Behavior::Snake(SnakeBody {
                    segments: (1..=SNAKE_SEGMENTS).map(|i| head + back * i as f32).collect(),
                    wiggle_time: 0.0,
                })
            }
            EnemyKind::BossHexagon => Behavior::Boss(BossState {
                teleport_timer: 0.0,
                shoot_timer: 0.0,
                charge_timer: 0.0,
                charging: true,
            }),
        }
    }
}

/// A bullet an enemy wants fired this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemyShot {
    pub pos: Vec2,
    pub angle: f32,
}

/// Offspring a splitter leaves behind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitSpawn {
    pub pos: Vec2,
    pub angle: f32,
}

/// Read-only view of the world an enemy steers by
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext<'a> {
    pub player_pos: Vec2,
    pub bullets: &'a [Bullet],
    pub arena: &'a Arena,
}

#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub rotation: f32,
    pub health: f32,
    pub max_health: f32,
    pub alive: bool,
    /// Cruise speed after wave scaling
    pub speed: f32,
    pub behavior: Behavior,
    pending_shots: Vec<EnemyShot>,
    pending_splits: Vec<SplitSpawn>,
}

impl Enemy {
    /// Enemy at base stats
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2) -> Self {
        Self::with_stats(id, kind, pos, kind.base_speed(), kind.base_health(), 0.0)
    }

    /// Enemy scaled by the wave's speed and health multipliers
    pub fn spawn(
        id: u32,
        kind: EnemyKind,
        pos: Vec2,
        speed_mult: f32,
        health_mult: f32,
        rng: &mut impl Rng,
    ) -> Self {
        let rotation = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
        // Snake health is its segment count
        let health = if kind == EnemyKind::Snake {
            kind.base_health()
        } else {
            (kind.base_health() * health_mult).ceil()
        };
        Self::with_stats(id, kind, pos, kind.base_speed() * speed_mult, health, rotation)
    }

    fn with_stats(id: u32, kind: EnemyKind, pos: Vec2, speed: f32, health: f32, rotation: f32) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            rotation,
            health,
            max_health: health,
            alive: true,
            speed,
            behavior: Behavior::initial(kind, pos, rotation),
            pending_shots: Vec::new(),
            pending_splits: Vec::new(),
        }
    }

    pub fn kind(&self) -> EnemyKind {
        match self.behavior {
            Behavior::Wanderer { .. } => EnemyKind::Wanderer,
            Behavior::Chaser => EnemyKind::Chaser,
            Behavior::Shooter { .. } => EnemyKind::Shooter,
            Behavior::Diamond => EnemyKind::Diamond,
            Behavior::Dodger => EnemyKind::Dodger,
            Behavior::Splitter => EnemyKind::Splitter,
            Behavior::SplitterMini => EnemyKind::SplitterMini,
            Behavior::Snake(_) => EnemyKind::Snake,
            Behavior::Boss(_) => EnemyKind::BossHexagon,
        }
    }

    pub fn get_size(&self) -> f32 {
        self.kind().size()
    }

    pub fn points(&self) -> u64 {
        self.kind().points()
    }

    /// Advance behavior one frame
    pub fn update(&mut self, dt: f32, ctx: &EnemyContext, rng: &mut impl Rng) {
        if !self.alive {
            return;
        }

        let to_player = (ctx.player_pos - self.pos).normalize_or_zero();
        let speed = self.speed;

        match &mut self.behavior {
            Behavior::Wanderer { change_timer } => {
                *change_timer += dt;
                if *change_timer >= WANDER_INTERVAL {
                    *change_timer = 0.0;
                    self.vel = random_heading(rng, speed);
                }
                self.rotation = normalize_angle(self.rotation + dt * 2.0);
            }
            Behavior::Chaser => {
                self.vel = clamp_magnitude(self.vel + to_player * CHASER_ACCEL * dt, speed);
                if self.vel != Vec2::ZERO {
                    self.rotation = heading(self.vel);
                }
            }
            Behavior::Shooter {
                change_timer,
                shoot_timer,
            } => {
                *change_timer += dt;
                if *change_timer >= SHOOTER_WANDER_INTERVAL {
                    *change_timer = 0.0;
                    self.vel = random_heading(rng, speed);
                }
                *shoot_timer += dt;
                if *shoot_timer >= SHOOTER_FIRE_INTERVAL {
                    *shoot_timer = 0.0;
                    self.pending_shots.push(EnemyShot {
                        pos: self.pos,
                        angle: heading(ctx.player_pos - self.pos),
                    });
                }
                self.rotation = heading(ctx.player_pos - self.pos);
            }
            Behavior::Diamond => {
                self.vel = self.vel.lerp(to_player * speed, ease_factor(SEEK_EASE_RATE, dt));
                if self.vel != Vec2::ZERO {
                    self.rotation = heading(self.vel) + std::f32::consts::FRAC_PI_4;
                }
            }
            Behavior::Dodger => {
                let desired = to_player * speed + dodge_force(self.pos, self.vel, ctx.bullets);
                self.vel = clamp_magnitude(
                    self.vel.lerp(desired, ease_factor(DODGER_EASE_RATE, dt)),
                    speed * DODGER_MAX_SPEED_SCALE,
                );
                if self.vel != Vec2::ZERO {
                    self.rotation = heading(self.vel);
                }
            }
            Behavior::Splitter | Behavior::SplitterMini => {
                self.vel = self.vel.lerp(to_player * speed, ease_factor(SEEK_EASE_RATE, dt));
                self.rotation = normalize_angle(self.rotation + SPLITTER_SPIN * dt);
            }
            Behavior::Snake(body) => {
                body.wiggle_time += dt;
                let target = heading(ctx.player_pos - self.pos)
                    + SNAKE_WIGGLE_AMPLITUDE * (body.wiggle_time * SNAKE_WIGGLE_FREQ).sin();
                self.rotation = turn_toward(self.rotation, target, SNAKE_TURN_RATE * dt);
                self.vel = from_angle(self.rotation, speed);
            }
            Behavior::Boss(boss) => {
                update_boss(boss, &mut self.pos, &mut self.pending_shots, dt, ctx, rng);
                self.rotation = normalize_angle(self.rotation + dt * 0.5);
                // Teleports only, no velocity integration
                return;
            }
        }

        let size = self.get_size();
        let (pos, vel) = ctx.arena.bounce(self.pos + self.vel * dt, self.vel, size);
        self.pos = pos;
        self.vel = vel;

        if let Behavior::Snake(body) = &mut self.behavior {
            follow_chain(self.pos, &mut body.segments);
        }
    }

    /// Apply damage. Returns true only when this hit killed the enemy.
    ///
    /// Snakes lose their tail segment instead of health.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        if !self.alive {
            return false;
        }
        if let Behavior::Snake(body) = &self.behavior {
            let Some(tail) = body.segments.len().checked_sub(1) else {
                return false;
            };
            return self.destroy_segment(tail);
        }
        self.health -= amount;
        if self.health <= 0.0 {
            self.die();
            return true;
        }
        false
    }

    /// Remove one snake segment. Returns true when it was the last one.
    pub fn destroy_segment(&mut self, index: usize) -> bool {
        if !self.alive {
            return false;
        }
        let Behavior::Snake(body) = &mut self.behavior else {
            return false;
        };
        if index >= body.segments.len() {
            return false;
        }
        body.segments.remove(index);
        self.health = body.segments.len() as f32;
        if body.segments.is_empty() {
            self.die();
            return true;
        }
        false
    }

    /// Kill outright (bomb, shield ram). Splitters still split.
    pub fn kill(&mut self) -> bool {
        if !self.alive {
            return false;
        }
        if let Behavior::Snake(body) = &mut self.behavior {
            body.segments.clear();
        }
        self.health = 0.0;
        self.die();
        true
    }

    fn die(&mut self) {
        self.alive = false;
        if matches!(self.behavior, Behavior::Splitter) {
            let base = self.rotation;
            for i in 0..SPLIT_COUNT {
                let angle = base + i as f32 * std::f32::consts::TAU / SPLIT_COUNT as f32;
                self.pending_splits.push(SplitSpawn {
                    pos: self.pos + from_angle(angle, SPLIT_OFFSET),
                    angle,
                });
            }
        }
    }

    pub fn segments(&self) -> &[Vec2] {
        match &self.behavior {
            Behavior::Snake(body) => &body.segments,
            _ => &[],
        }
    }

    pub fn get_segment_count(&self) -> usize {
        self.segments().len()
    }

    /// Boss is blinking between teleport and firing
    pub fn is_charging(&self) -> bool {
        matches!(&self.behavior, Behavior::Boss(boss) if boss.charging)
    }

    pub fn pending_splits(&self) -> &[SplitSpawn] {
        &self.pending_splits
    }

    pub fn drain_pending_shots(&mut self) -> Vec<EnemyShot> {
        std::mem::take(&mut self.pending_shots)
    }

    pub fn drain_pending_splits(&mut self) -> Vec<SplitSpawn> {
        std::mem::take(&mut self.pending_splits)
    }
}

fn random_heading(rng: &mut impl Rng, speed: f32) -> Vec2 {
    let angle = rng.random_range(-std::f32::consts::PI..std::f32::consts::PI);
    from_angle(angle, speed * rng.random_range(0.6..1.0))
}

/// Sideways push away from nearby player bullets
fn dodge_force(pos: Vec2, vel: Vec2, bullets: &[Bullet]) -> Vec2 {
    let mut force = Vec2::ZERO;
    for bullet in bullets.iter().filter(|b| b.is_alive()) {
        let offset = pos - bullet.pos();
        let dist = offset.length();
        if dist >= DODGE_RADIUS || dist < f32::EPSILON {
            continue;
        }
        let approach = bullet.vel().normalize_or_zero();
        if approach == Vec2::ZERO {
            continue;
        }
        let side = if cross(approach, vel) >= 0.0 { 1.0 } else { -1.0 };
        let perpendicular = approach.perp() * side;
        let strength = DODGE_FORCE * (1.0 - dist / DODGE_RADIUS);
        force += (perpendicular * 0.8 + offset / dist * 0.2) * strength;
    }
    force
}

/// Pull each segment toward the one ahead once the gap exceeds the spacing
fn follow_chain(head: Vec2, segments: &mut [Vec2]) {
    let mut leader = head;
    for segment in segments.iter_mut() {
        let gap = leader - *segment;
        let dist = gap.length();
        if dist > SNAKE_SEGMENT_SPACING {
            let step = (dist - SNAKE_SEGMENT_SPACING).min(dist);
            *segment += gap / dist * step;
        }
        leader = *segment;
    }
}

fn update_boss(
    boss: &mut BossState,
    pos: &mut Vec2,
    shots: &mut Vec<EnemyShot>,
    dt: f32,
    ctx: &EnemyContext,
    rng: &mut impl Rng,
) {
    boss.teleport_timer += dt;
    if boss.teleport_timer >= BOSS_TELEPORT_INTERVAL {
        boss.teleport_timer = 0.0;
        boss.shoot_timer = 0.0;
        boss.charge_timer = 0.0;
        boss.charging = true;
        *pos = teleport_target(ctx, rng);
        return;
    }

    if boss.charging {
        boss.charge_timer += dt;
        if boss.charge_timer >= BOSS_CHARGE_TIME {
            boss.charging = false;
        }
        return;
    }

    boss.shoot_timer += dt;
    if boss.shoot_timer >= BOSS_FIRE_INTERVAL {
        boss.shoot_timer = 0.0;
        let aim = heading(ctx.player_pos - *pos);
        let half = (BOSS_FAN_BULLETS as f32 - 1.0) / 2.0;
        for i in 0..BOSS_FAN_BULLETS {
            shots.push(EnemyShot {
                pos: *pos,
                angle: aim + (i as f32 - half) * BOSS_FAN_SPACING,
            });
        }
    }
}

/// Random arena point, preferring ones away from the player
fn teleport_target(ctx: &EnemyContext, rng: &mut impl Rng) -> Vec2 {
    let margin = EnemyKind::BossHexagon.size() + 20.0;
    let mut best = ctx.arena.random_point(rng, margin);
    for _ in 1..BOSS_TELEPORT_ATTEMPTS {
        if best.distance(ctx.player_pos) >= MIN_SPAWN_DISTANCE {
            break;
        }
        let candidate = ctx.arena.random_point(rng, margin);
        if candidate.distance(ctx.player_pos) > best.distance(ctx.player_pos) {
            best = candidate;
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    const DT: f32 = 1.0 / 60.0;

    fn ctx<'a>(arena: &'a Arena, player_pos: Vec2, bullets: &'a [Bullet]) -> EnemyContext<'a> {
        EnemyContext {
            player_pos,
            bullets,
            arena,
        }
    }

    #[test]
    fn test_boss_takes_fifty_hits() {
        let mut boss = Enemy::new(1, EnemyKind::BossHexagon, Vec2::new(500.0, 500.0));
        assert_eq!(boss.health, 50.0);
        for _ in 0..49 {
            assert!(!boss.take_damage(1.0));
        }
        assert!(boss.take_damage(1.0));
        assert!(!boss.alive);
        // Already dead: no second kill report
        assert!(!boss.take_damage(1.0));
    }

    #[test]
    fn test_splitter_queues_three_splits() {
        let mut splitter = Enemy::new(1, EnemyKind::Splitter, Vec2::new(400.0, 400.0));
        assert!(!splitter.take_damage(1.0));
        assert!(splitter.take_damage(1.0));
        let splits = splitter.drain_pending_splits();
        assert_eq!(splits.len(), SPLIT_COUNT);
        for split in &splits {
            assert!((split.pos.distance(Vec2::new(400.0, 400.0)) - SPLIT_OFFSET).abs() < 1e-3);
        }
        assert!(splitter.drain_pending_splits().is_empty());

        let mut mini = Enemy::new(2, EnemyKind::SplitterMini, Vec2::new(400.0, 400.0));
        assert!(mini.take_damage(1.0));
        assert!(mini.pending_splits().is_empty());
        assert!(!EnemyKind::SplitterMini.drops_power_ups());
    }

    #[test]
    fn test_snake_dies_with_last_segment() {
        let mut snake = Enemy::new(1, EnemyKind::Snake, Vec2::new(800.0, 600.0));
        assert_eq!(snake.get_segment_count(), SNAKE_SEGMENTS);

        for destroyed in 1..SNAKE_SEGMENTS {
            assert!(!snake.destroy_segment(0));
            assert!(snake.alive);
            assert_eq!(snake.get_segment_count(), SNAKE_SEGMENTS - destroyed);
        }
        assert!(snake.destroy_segment(0));
        assert!(!snake.alive);
        assert_eq!(snake.get_segment_count(), 0);
    }

    #[test]
    fn test_snake_segment_index_is_validated() {
        let mut snake = Enemy::new(1, EnemyKind::Snake, Vec2::new(800.0, 600.0));
        assert!(!snake.destroy_segment(SNAKE_SEGMENTS + 3));
        assert_eq!(snake.get_segment_count(), SNAKE_SEGMENTS);

        let mut wanderer = Enemy::new(2, EnemyKind::Wanderer, Vec2::ZERO);
        assert!(!wanderer.destroy_segment(0));
    }

    #[test]
    fn test_snake_segments_keep_spacing() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(1);
        let mut snake = Enemy::new(1, EnemyKind::Snake, Vec2::new(500.0, 700.0));
        let player = Vec2::new(1500.0, 700.0);
        for _ in 0..120 {
            snake.update(DT, &ctx(&arena, player, &[]), &mut rng);
        }
        let mut leader = snake.pos;
        for seg in snake.segments() {
            assert!(leader.distance(*seg) <= SNAKE_SEGMENT_SPACING + 1e-3);
            leader = *seg;
        }
        assert!(snake.pos.x > 500.0);
    }

    #[test]
    fn test_chaser_closes_distance_within_speed() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(2);
        let mut chaser = Enemy::new(1, EnemyKind::Chaser, Vec2::new(200.0, 200.0));
        let player = Vec2::new(1000.0, 700.0);
        let start = chaser.pos.distance(player);
        for _ in 0..60 {
            chaser.update(DT, &ctx(&arena, player, &[]), &mut rng);
            assert!(chaser.vel.length() <= chaser.speed + 1e-3);
        }
        assert!(chaser.pos.distance(player) < start);
    }

    #[test]
    fn test_shooter_fires_at_player() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(3);
        let mut shooter = Enemy::new(1, EnemyKind::Shooter, Vec2::new(300.0, 700.0));
        let player = Vec2::new(1000.0, 700.0);
        let mut shots = Vec::new();
        for _ in 0..((SHOOTER_FIRE_INTERVAL / DT) as usize + 2) {
            shooter.update(DT, &ctx(&arena, player, &[]), &mut rng);
            shots.extend(shooter.drain_pending_shots());
        }
        assert_eq!(shots.len(), 1);
        let expected = heading(player - shots[0].pos);
        assert!((shots[0].angle - expected).abs() < 1e-4);
    }

    #[test]
    fn test_boss_charges_then_fires_fan() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(4);
        let start = Vec2::new(1500.0, 300.0);
        let mut boss = Enemy::new(1, EnemyKind::BossHexagon, start);
        let player = Vec2::new(500.0, 700.0);

        let mut shots = Vec::new();
        // 2.6 s: charge for 1 s, first fan at 2.5 s, before the 3 s teleport
        for _ in 0..156 {
            boss.update(DT, &ctx(&arena, player, &[]), &mut rng);
            shots.extend(boss.drain_pending_shots());
        }
        assert_eq!(boss.pos, start, "boss must not drift");
        assert!(!boss.is_charging());
        assert_eq!(shots.len(), BOSS_FAN_BULLETS);

        for _ in 0..30 {
            boss.update(DT, &ctx(&arena, player, &[]), &mut rng);
        }
        assert_ne!(boss.pos, start, "boss teleports after 3 s");
        assert!(boss.is_charging());
    }

    #[test]
    fn test_dodger_sidesteps_incoming_bullet() {
        let arena = Arena::default();
        let mut rng = Pcg32::seed_from_u64(5);
        let mut dodger = Enemy::new(1, EnemyKind::Dodger, Vec2::new(1000.0, 400.0));
        // Player and bullet straight below, bullet flying up at the dodger
        let player = Vec2::new(1000.0, 1000.0);
        let bullets = vec![Bullet::new(Vec2::new(1000.0, 480.0), -std::f32::consts::FRAC_PI_2, false)];
        for _ in 0..10 {
            dodger.update(DT, &ctx(&arena, player, &bullets), &mut rng);
        }
        assert!((dodger.pos.x - 1000.0).abs() > 1.0);
    }

    #[test]
    fn test_wanderer_bounces_inside_arena() {
        let arena = Arena::new(200.0, 200.0);
        let mut rng = Pcg32::seed_from_u64(6);
        let mut wanderer = Enemy::new(1, EnemyKind::Wanderer, Vec2::new(100.0, 100.0));
        for _ in 0..600 {
            wanderer.update(DT, &ctx(&arena, Vec2::ZERO, &[]), &mut rng);
            let r = wanderer.get_size();
            assert!(wanderer.pos.x >= r && wanderer.pos.x <= arena.width - r);
            assert!(wanderer.pos.y >= r && wanderer.pos.y <= arena.height - r);
        }
    }

    #[test]
    fn test_spawn_scales_health() {
        let mut rng = Pcg32::seed_from_u64(7);
        let shooter = Enemy::spawn(1, EnemyKind::Shooter, Vec2::ZERO, 1.2, 1.5, &mut rng);
        assert_eq!(shooter.health, 3.0);
        assert!((shooter.speed - 96.0).abs() < 1e-3);

        let snake = Enemy::spawn(2, EnemyKind::Snake, Vec2::ZERO, 1.0, 3.0, &mut rng);
        assert_eq!(snake.get_segment_count(), SNAKE_SEGMENTS);
    }
}
