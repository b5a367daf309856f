//! JavaScript bindings
//!
//! The page owns the canvas, the animation frame loop and DOM listeners; it
//! forwards events here and draws the packed sprite list each frame.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::audio::WebAudio;
use crate::camera::Camera;
use crate::input::Key;
use crate::persistence::SaveStore;
use crate::platform;
use crate::render::{Renderer, Shape, Sprite};
use crate::session::Session;
use crate::sim::GamePhase;

/// Floats per sprite in `WebGame::sprites`:
/// shape, x, y, size, rotation, r, g, b, a (screen space)
pub const SPRITE_STRIDE: usize = 9;

fn shape_id(shape: Shape) -> f32 {
    match shape {
        Shape::Ship => 0.0,
        Shape::Bullet => 1.0,
        Shape::EnemyBullet => 2.0,
        Shape::SnakeSegment => 3.0,
        Shape::Enemy(kind) => 10.0 + kind as u8 as f32,
        Shape::PowerUp(kind) => 30.0 + kind as u8 as f32,
    }
}

/// Packs sprites into a flat buffer for the page
#[derive(Default)]
struct PackedSprites {
    data: Vec<f32>,
}

impl Renderer for PackedSprites {
    fn draw(&mut self, sprite: &Sprite, camera: &Camera) {
        let screen = camera.world_to_screen(sprite.pos);
        self.data.extend_from_slice(&[
            shape_id(sprite.shape),
            screen.x,
            screen.y,
            sprite.size,
            sprite.rotation,
        ]);
        self.data.extend_from_slice(&sprite.color);
    }
}

#[wasm_bindgen]
pub struct WebGame {
    session: Session,
}

#[wasm_bindgen]
impl WebGame {
    #[wasm_bindgen(constructor)]
    pub fn new(width: f32, height: f32) -> WebGame {
        platform::init_logging();
        log::info!("Neon Wars starting...");
        let session = Session::new(
            platform::random_seed(),
            Vec2::new(width, height),
            Box::new(WebAudio::new()),
            SaveStore::platform_default(),
        );
        WebGame { session }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.camera.set_viewport(Vec2::new(width, height));
    }

    /// `code` is `KeyboardEvent.code`
    pub fn key_down(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.session.input.key_down(key);
        }
    }

    pub fn key_up(&mut self, code: &str) {
        if let Some(key) = Key::from_code(code) {
            self.session.input.key_up(key);
        }
    }

    pub fn mouse_move(&mut self, x: f32, y: f32) {
        self.session.input.mouse_move(Vec2::new(x, y));
    }

    pub fn mouse_button(&mut self, down: bool) {
        self.session.input.mouse_button(down);
    }

    pub fn secondary_click(&mut self, x: f32, y: f32) {
        self.session.input.secondary_click(Vec2::new(x, y));
    }

    /// Window blur: drop held keys and pause a running game
    pub fn blur(&mut self) {
        self.session.input.release_all();
        if self.session.state.phase == GamePhase::Playing {
            self.session.state.toggle_pause();
        }
    }

    pub fn set_demo(&mut self, demo: bool) {
        self.session.demo = demo;
    }

    /// Advance one frame; `dt` in seconds
    pub fn frame(&mut self, dt: f32) {
        self.session.frame(dt);
    }

    /// Visible sprites, `SPRITE_STRIDE` floats each
    pub fn sprites(&self) -> Vec<f32> {
        let mut packed = PackedSprites::default();
        self.session.render(&mut packed);
        packed.data
    }

    pub fn phase(&self) -> String {
        format!("{:?}", self.session.state.phase)
    }

    pub fn score(&self) -> f64 {
        self.session.state.score as f64
    }

    pub fn high_score(&self) -> f64 {
        self.session.store().stats().high_score as f64
    }

    pub fn wave(&self) -> u32 {
        self.session.state.wave.current_wave
    }

    pub fn lives(&self) -> u32 {
        self.session.state.lives
    }

    pub fn bombs(&self) -> u32 {
        self.session.state.player.bombs()
    }

    pub fn multiplier(&self) -> u32 {
        self.session.state.multiplier
    }

    pub fn control_mode(&self) -> String {
        self.session.settings().control_mode.as_str().to_string()
    }
}
