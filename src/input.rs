//! Keyboard polling for the browser build.
//!
//! Keydown/keyup listeners maintain a held-key set; the game loop polls a
//! [`TickInput`] snapshot per substep instead of reacting to events directly.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use wasm_bindgen::prelude::*;
use web_sys::KeyboardEvent;

use crate::sim::TickInput;

/// Actions the simulation understands. Arrow keys and WASD both map here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalKey {
    Up,
    Down,
    Left,
    Right,
    Fire,
}

impl LogicalKey {
    /// Maps a `KeyboardEvent::key()` string. `None` for keys the game ignores.
    fn from_event_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" | "w" | "W" => Some(Self::Up),
            "ArrowDown" | "s" | "S" => Some(Self::Down),
            "ArrowLeft" | "a" | "A" => Some(Self::Left),
            "ArrowRight" | "d" | "D" => Some(Self::Right),
            " " | "Spacebar" => Some(Self::Fire),
            _ => None,
        }
    }
}

/// Currently held keys, shared with the event closures.
#[derive(Clone, Default)]
pub struct KeyState {
    held: Rc<RefCell<HashSet<LogicalKey>>>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs keydown/keyup listeners on `window`. The closures stay alive
    /// for the page lifetime.
    pub fn attach(&self, window: &web_sys::Window) {
        {
            let held = self.held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = LogicalKey::from_event_key(&event.key()) {
                    event.prevent_default();
                    held.borrow_mut().insert(key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        {
            let held = self.held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = LogicalKey::from_event_key(&event.key()) {
                    held.borrow_mut().remove(&key);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // No release event arrives for keys held across a focus change
        {
            let held = self.held.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
                held.borrow_mut().clear();
            });
            let _ = window
                .add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    pub fn is_down(&self, key: LogicalKey) -> bool {
        self.held.borrow().contains(&key)
    }

    /// Polls the held set into the per-tick input the simulation consumes.
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            up: self.is_down(LogicalKey::Up),
            down: self.is_down(LogicalKey::Down),
            left: self.is_down(LogicalKey::Left),
            right: self.is_down(LogicalKey::Right),
            fire: self.is_down(LogicalKey::Fire),
        }
    }
}
