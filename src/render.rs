//! Renderer-neutral draw list
//!
//! The game never queries the renderer. Each frame it hands every visible
//! entity to a `Renderer` as a `Sprite`: world-space position, size,
//! rotation, color and a shape tag. Canvas, GPU or test renderers implement
//! the trait.

use glam::Vec2;

use crate::camera::Camera;
use crate::sim::{EnemyKind, GameState, PowerUpKind};

/// What to draw at a sprite's position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Ship,
    Bullet,
    EnemyBullet,
    Enemy(EnemyKind),
    SnakeSegment,
    PowerUp(PowerUpKind),
}

/// RGBA, 0.0 - 1.0
pub type Color = [f32; 4];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sprite {
    pub shape: Shape,
    pub pos: Vec2,
    pub size: f32,
    pub rotation: f32,
    pub color: Color,
}

pub trait Renderer {
    fn draw(&mut self, sprite: &Sprite, camera: &Camera);
}

pub fn enemy_color(kind: EnemyKind) -> Color {
    match kind {
        EnemyKind::Wanderer => [0.6, 0.3, 1.0, 1.0],
        EnemyKind::Chaser => [0.2, 0.6, 1.0, 1.0],
        EnemyKind::Shooter => [1.0, 0.3, 0.3, 1.0],
        EnemyKind::Diamond => [0.0, 1.0, 1.0, 1.0],
        EnemyKind::Dodger => [0.2, 1.0, 0.3, 1.0],
        EnemyKind::Splitter => [1.0, 0.4, 0.8, 1.0],
        EnemyKind::SplitterMini => [1.0, 0.6, 0.9, 1.0],
        EnemyKind::Snake => [1.0, 0.9, 0.1, 1.0],
        EnemyKind::BossHexagon => [1.0, 0.5, 0.0, 1.0],
    }
}

pub fn power_up_color(kind: PowerUpKind) -> Color {
    match kind {
        PowerUpKind::RapidFire => [1.0, 0.9, 0.2, 1.0],
        PowerUpKind::TripleShot => [0.3, 1.0, 0.3, 1.0],
        PowerUpKind::SpeedBoost => [0.2, 0.8, 1.0, 1.0],
        PowerUpKind::Shield => [0.4, 0.6, 1.0, 1.0],
        PowerUpKind::Piercing => [1.0, 0.3, 1.0, 1.0],
        PowerUpKind::RearShot => [1.0, 0.6, 0.2, 1.0],
        PowerUpKind::SideShot => [0.6, 1.0, 0.8, 1.0],
        PowerUpKind::DoublePoints => [1.0, 1.0, 1.0, 1.0],
    }
}

const PLAYER_COLOR: Color = [1.0, 1.0, 1.0, 1.0];
const BULLET_COLOR: Color = [1.0, 1.0, 0.6, 1.0];
const ENEMY_BULLET_COLOR: Color = [1.0, 0.25, 0.25, 1.0];
/// Blink period for invincibility, expiring power-ups and charging bosses
const BLINK_HZ: f32 = 8.0;

fn blink_on(time: f32) -> bool {
    (time * BLINK_HZ).fract() < 0.5
}

fn faded(mut color: Color, alpha: f32) -> Color {
    color[3] = alpha;
    color
}

/// Draw every visible entity. Returns the number of sprites drawn.
pub fn render_state(state: &GameState, camera: &Camera, renderer: &mut dyn Renderer) -> usize {
    let mut drawn = 0;
    let mut emit = |sprite: Sprite| {
        if camera.is_visible(sprite.pos, sprite.size) {
            renderer.draw(&sprite, camera);
            drawn += 1;
        }
    };

    for power_up in state.power_ups.iter().filter(|p| p.alive) {
        if power_up.is_blinking() && !blink_on(state.time) {
            continue;
        }
        emit(Sprite {
            shape: Shape::PowerUp(power_up.kind),
            pos: power_up.pos,
            size: power_up.get_size(),
            rotation: power_up.age,
            color: power_up_color(power_up.kind),
        });
    }

    for enemy in state.enemies.iter().filter(|e| e.alive) {
        let kind = enemy.kind();
        let mut color = enemy_color(kind);
        if enemy.is_charging() && !blink_on(state.time) {
            color = faded(color, 0.4);
        }
        for segment in enemy.segments() {
            emit(Sprite {
                shape: Shape::SnakeSegment,
                pos: *segment,
                size: crate::sim::enemy::SNAKE_SEGMENT_RADIUS,
                rotation: 0.0,
                color,
            });
        }
        emit(Sprite {
            shape: Shape::Enemy(kind),
            pos: enemy.pos,
            size: enemy.get_size(),
            rotation: enemy.rotation,
            color,
        });
    }

    for bullet in state.enemy_bullets.iter().filter(|b| b.is_alive()) {
        emit(Sprite {
            shape: Shape::EnemyBullet,
            pos: bullet.pos(),
            size: bullet.get_size(),
            rotation: 0.0,
            color: ENEMY_BULLET_COLOR,
        });
    }

    for bullet in state.bullets.iter().filter(|b| b.is_alive()) {
        emit(Sprite {
            shape: Shape::Bullet,
            pos: bullet.pos(),
            size: bullet.get_size(),
            rotation: crate::heading(bullet.vel()),
            color: BULLET_COLOR,
        });
    }

    let player = &state.player;
    if player.alive {
        let alpha = if state.is_invincible() && !blink_on(state.time) {
            0.3
        } else {
            1.0
        };
        emit(Sprite {
            shape: Shape::Ship,
            pos: player.pos,
            size: player.get_size(),
            rotation: player.rotation,
            color: faded(PLAYER_COLOR, alpha),
        });
    }

    drawn
}

/// Collects sprites instead of drawing them
#[derive(Debug, Default)]
pub struct SpriteList {
    pub sprites: Vec<Sprite>,
}

impl Renderer for SpriteList {
    fn draw(&mut self, sprite: &Sprite, _camera: &Camera) {
        self.sprites.push(*sprite);
    }
}
