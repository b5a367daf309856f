//! Input tracking
//!
//! The host feeds raw key and mouse events; this module keeps the held set
//! and the just-pressed edges. Edges live until `end_frame`, which the
//! session calls once the frame has been simulated.

use std::collections::HashSet;

use glam::Vec2;

use crate::camera::Camera;
use crate::sim::TickInput;

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Up,
    Down,
    Left,
    Right,
    Fire,
    Bomb,
    ToggleControl,
    Pause,
    /// Start / restart
    Confirm,
    Options,
    /// Leave a screen
    Back,
    Mute,
}

impl Key {
    /// Map a DOM `KeyboardEvent.code` to a game key
    pub fn from_code(code: &str) -> Option<Self> {
        Some(match code {
            "KeyW" | "ArrowUp" => Key::Up,
            "KeyS" | "ArrowDown" => Key::Down,
            "KeyA" | "ArrowLeft" => Key::Left,
            "KeyD" | "ArrowRight" => Key::Right,
            "Space" => Key::Fire,
            "KeyB" | "ShiftLeft" | "ShiftRight" => Key::Bomb,
            "KeyC" => Key::ToggleControl,
            "KeyP" => Key::Pause,
            "Enter" => Key::Confirm,
            "KeyO" => Key::Options,
            "Escape" => Key::Back,
            "KeyM" => Key::Mute,
            _ => return None,
        })
    }
}

/// Raw held state plus per-frame edges
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: HashSet<Key>,
    just_pressed: HashSet<Key>,
    /// Mouse position in screen pixels
    pub mouse_screen: Option<Vec2>,
    pub mouse_down: bool,
    /// Secondary-button clicks this frame (screen space)
    clicks: Vec<Vec2>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, key: Key) {
        // Key repeat does not produce a new edge
        if self.held.insert(key) {
            self.just_pressed.insert(key);
        }
    }

    pub fn key_up(&mut self, key: Key) {
        self.held.remove(&key);
    }

    pub fn mouse_move(&mut self, screen: Vec2) {
        self.mouse_screen = Some(screen);
    }

    pub fn mouse_button(&mut self, down: bool) {
        self.mouse_down = down;
    }

    pub fn secondary_click(&mut self, screen: Vec2) {
        self.clicks.push(screen);
    }

    /// Window lost focus: nothing stays held
    pub fn release_all(&mut self) {
        self.held.clear();
        self.mouse_down = false;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    pub fn is_key_just_pressed(&self, key: Key) -> bool {
        self.just_pressed.contains(&key)
    }

    pub fn is_moving_forward(&self) -> bool {
        self.is_held(Key::Up)
    }

    pub fn is_firing(&self) -> bool {
        self.mouse_down || self.is_held(Key::Fire)
    }

    /// Held direction keys as a screen-space vector (+y is down)
    pub fn move_dir(&self) -> Vec2 {
        let axis = |neg: Key, pos: Key| f32::from(u8::from(self.is_held(pos))) - f32::from(u8::from(self.is_held(neg)));
        Vec2::new(axis(Key::Left, Key::Right), axis(Key::Up, Key::Down))
    }

    /// Rotation axis for relative steering
    pub fn turn_axis(&self) -> f32 {
        self.move_dir().x
    }

    pub fn clicks(&self) -> &[Vec2] {
        &self.clicks
    }

    /// Build this frame's simulation input
    pub fn to_tick_input(&self, camera: &Camera) -> TickInput {
        TickInput {
            move_dir: self.move_dir(),
            turn: self.turn_axis(),
            moving_forward: self.is_moving_forward(),
            firing: self.is_firing(),
            aim_target: self.mouse_screen.map(|p| camera.screen_to_world(p)),
            bomb: self.is_key_just_pressed(Key::Bomb),
            toggle_control: self.is_key_just_pressed(Key::ToggleControl),
            pause: self.is_key_just_pressed(Key::Pause) || self.is_key_just_pressed(Key::Back),
        }
    }

    /// Clear per-frame edges
    pub fn end_frame(&mut self) {
        self.just_pressed.clear();
        self.clicks.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::Arena;

    #[test]
    fn test_just_pressed_edges() {
        let mut input = InputState::new();
        input.key_down(Key::Bomb);
        assert!(input.is_key_just_pressed(Key::Bomb));
        input.end_frame();
        // Still held, but no new edge from auto-repeat
        input.key_down(Key::Bomb);
        assert!(!input.is_key_just_pressed(Key::Bomb));
        assert!(input.is_held(Key::Bomb));

        input.key_up(Key::Bomb);
        input.key_down(Key::Bomb);
        assert!(input.is_key_just_pressed(Key::Bomb));
    }

    #[test]
    fn test_move_dir_cancels() {
        let mut input = InputState::new();
        input.key_down(Key::Left);
        input.key_down(Key::Right);
        input.key_down(Key::Down);
        assert_eq!(input.move_dir(), Vec2::new(0.0, 1.0));
        assert!(!input.is_moving_forward());
    }

    #[test]
    fn test_key_codes() {
        assert_eq!(Key::from_code("ArrowUp"), Some(Key::Up));
        assert_eq!(Key::from_code("KeyW"), Some(Key::Up));
        assert_eq!(Key::from_code("Space"), Some(Key::Fire));
        assert_eq!(Key::from_code("F13"), None);
    }

    #[test]
    fn test_tick_input_aims_in_world_space() {
        let camera = Camera::new(Vec2::new(800.0, 600.0), Arena::default());
        let mut input = InputState::new();
        input.mouse_move(Vec2::new(400.0, 300.0));
        input.mouse_button(true);
        input.key_down(Key::Pause);

        let tick = input.to_tick_input(&camera);
        assert!(tick.firing);
        assert!(tick.pause);
        assert_eq!(tick.aim_target, Some(camera.pos));

        input.end_frame();
        assert!(!input.to_tick_input(&camera).pause);
    }

    #[test]
    fn test_release_all() {
        let mut input = InputState::new();
        input.key_down(Key::Fire);
        input.release_all();
        assert!(!input.is_firing());
    }
}
