//! Input model: buttons, keys, semantic events, and the interaction state machine.
//!
//! Raw window events are decoded by the host into [`InputEvent`]s. The
//! engine consumes them one at a time and tracks the active gesture in
//! [`InputState`]. [`UiState`] carries editor flags that outlive a gesture.
//!
//! Events also have a one-line text form (see [`InputEvent::from_str`]) so a
//! headless host can replay a script of them.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use std::fmt;
use std::str::FromStr;

use crate::camera::Point;
use crate::hit::ScreenRect;

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Button {
    /// Left mouse button. Pans the camera.
    Primary,
    /// Middle mouse button. Ignored.
    Middle,
    /// Right mouse button. Draws the selection rectangle.
    Secondary,
}

/// Scroll wheel direction, one notch per event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scroll {
    Up,
    Down,
}

/// A logical key name (e.g. `"h"`, `"ArrowLeft"`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Key(pub String);

impl Key {
    pub const TOGGLE_HITBOXES: &'static str = "h";
    pub const DELETE: &'static str = "d";
    pub const DUPLICATE: &'static str = "c";
    pub const SAVE: &'static str = "s";
    pub const LEFT: &'static str = "ArrowLeft";
    pub const RIGHT: &'static str = "ArrowRight";
    pub const UP: &'static str = "ArrowUp";
    pub const DOWN: &'static str = "ArrowDown";

    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Unit step `(dx, dy)` for an arrow key, Y-up.
    #[must_use]
    pub fn arrow_step(&self) -> Option<(i32, i32)> {
        match self.0.as_str() {
            Self::LEFT => Some((-1, 0)),
            Self::RIGHT => Some((1, 0)),
            Self::UP => Some((0, 1)),
            Self::DOWN => Some((0, -1)),
            _ => None,
        }
    }
}

/// A decoded input event.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    PointerDown { button: Button, screen: Point },
    PointerUp { button: Button, screen: Point },
    PointerMove { screen: Point },
    Scroll(Scroll),
    KeyPress(Key),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseEventError {
    #[error("empty event line")]
    Empty,
    #[error("unknown event `{0}`")]
    UnknownEvent(String),
    #[error("unknown button `{0}`")]
    UnknownButton(String),
    #[error("unknown key `{0}`")]
    UnknownKey(String),
    #[error("unknown scroll direction `{0}`")]
    UnknownScroll(String),
    #[error("expected {expected} arguments for `{event}`")]
    Arity { event: String, expected: usize },
    #[error("invalid coordinate `{0}`")]
    Coordinate(String),
}

impl FromStr for Button {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" | "left" | "1" => Ok(Self::Primary),
            "middle" | "2" => Ok(Self::Middle),
            "secondary" | "right" | "3" => Ok(Self::Secondary),
            other => Err(ParseEventError::UnknownButton(other.to_owned())),
        }
    }
}

impl FromStr for Key {
    type Err = ParseEventError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = match s {
            "left" => Self::LEFT,
            "right" => Self::RIGHT,
            "up" => Self::UP,
            "down" => Self::DOWN,
            Self::LEFT | Self::RIGHT | Self::UP | Self::DOWN => s,
            single if single.chars().count() == 1 => single,
            other => return Err(ParseEventError::UnknownKey(other.to_owned())),
        };
        Ok(Self::new(name))
    }
}

impl FromStr for InputEvent {
    type Err = ParseEventError;

    /// Parse one event line:
    ///
    /// ```text
    /// down primary 10 20
    /// up secondary 10 20
    /// move 30 40
    /// scroll up
    /// key h
    /// quit
    /// ```
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = line.split_whitespace().collect();
        let Some((&name, args)) = parts.split_first() else {
            return Err(ParseEventError::Empty);
        };
        let arity = |expected: usize| {
            if args.len() == expected {
                Ok(())
            } else {
                Err(ParseEventError::Arity { event: name.to_owned(), expected })
            }
        };
        match name {
            "down" | "up" => {
                arity(3)?;
                let button = args[0].parse()?;
                let screen = parse_point(args[1], args[2])?;
                if name == "down" {
                    Ok(Self::PointerDown { button, screen })
                } else {
                    Ok(Self::PointerUp { button, screen })
                }
            }
            "move" => {
                arity(2)?;
                Ok(Self::PointerMove { screen: parse_point(args[0], args[1])? })
            }
            "scroll" => {
                arity(1)?;
                match args[0] {
                    "up" => Ok(Self::Scroll(Scroll::Up)),
                    "down" => Ok(Self::Scroll(Scroll::Down)),
                    other => Err(ParseEventError::UnknownScroll(other.to_owned())),
                }
            }
            "key" => {
                arity(1)?;
                Ok(Self::KeyPress(args[0].parse()?))
            }
            "quit" => {
                arity(0)?;
                Ok(Self::Quit)
            }
            other => Err(ParseEventError::UnknownEvent(other.to_owned())),
        }
    }
}

fn parse_point(x: &str, y: &str) -> Result<Point, ParseEventError> {
    let parse = |s: &str| s.parse::<f64>().map_err(|_| ParseEventError::Coordinate(s.to_owned()));
    Ok(Point::new(parse(x)?, parse(y)?))
}

/// Editor flags visible to the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UiState {
    /// Outline every shape's hitbox.
    pub show_hitboxes: bool,
}

/// The gesture currently being tracked between button-down and button-up.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InputState {
    /// No gesture in progress.
    #[default]
    Idle,
    /// Panning the camera with the primary button held.
    Dragging {
        /// Screen position of the previous pointer event, for the pan delta.
        last_screen: Point,
    },
    /// Dragging out a selection rectangle with the secondary button held.
    Selecting {
        /// Screen position where the rectangle started.
        start_screen: Point,
        /// The same start point in world coordinates at press time.
        start_world: Point,
        /// Screen position of the latest pointer event.
        current_screen: Point,
    },
}

impl InputState {
    /// The rectangle being dragged, in drag order, while selecting.
    #[must_use]
    pub fn selection_rect(&self) -> Option<ScreenRect> {
        match *self {
            Self::Selecting { start_screen, current_screen, .. } => {
                Some(ScreenRect::from_corners(start_screen, current_screen))
            }
            _ => None,
        }
    }
}

impl fmt::Display for InputState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Selecting { .. } => "selecting",
        };
        f.write_str(name)
    }
}
