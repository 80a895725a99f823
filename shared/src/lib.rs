use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const WORLD_WIDTH: f32 = 2048.0;
pub const WORLD_HEIGHT: f32 = 2048.0;
pub const MOVE_STEP: f32 = 32.0;
pub const PLAYER_SIZE: f32 = 32.0;

/// Movement direction as it appears in `move` commands.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Unit offset in world coordinates (y grows downward).
    pub fn delta(self) -> (f32, f32) {
        match self {
            Direction::Up => (0.0, -1.0),
            Direction::Down => (0.0, 1.0),
            Direction::Left => (-1.0, 0.0),
            Direction::Right => (1.0, 0.0),
        }
    }
}

/// Avatar orientation; keys the per-direction frame sequences.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Facing {
    North,
    #[default]
    South,
    East,
    West,
}

impl From<Direction> for Facing {
    fn from(direction: Direction) -> Self {
        match direction {
            Direction::Up => Facing::North,
            Direction::Down => Facing::South,
            Direction::Left => Facing::West,
            Direction::Right => Facing::East,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: String,
    pub username: String,
    pub x: f32,
    pub y: f32,
    pub avatar_id: String,
    #[serde(default)]
    pub facing: Facing,
    #[serde(default)]
    pub animation_frame: usize,
}

impl Player {
    pub fn new(
        id: impl Into<String>,
        username: impl Into<String>,
        x: f32,
        y: f32,
        avatar_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            x,
            y,
            avatar_id: avatar_id.into(),
            facing: Facing::default(),
            animation_frame: 0,
        }
    }
}

/// Per-direction animation frames. Frame sources are opaque strings handed
/// to the host image loader; the set is immutable once received.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Avatar {
    pub name: String,
    pub frames: HashMap<Facing, Vec<String>>,
}

impl Avatar {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            frames: HashMap::new(),
        }
    }

    pub fn with_frames(mut self, facing: Facing, frames: Vec<String>) -> Self {
        self.frames.insert(facing, frames);
        self
    }

    /// Source string for one frame, or `None` when the direction or index
    /// is absent from the set.
    pub fn frame_source(&self, facing: Facing, frame: usize) -> Option<&str> {
        self.frames
            .get(&facing)
            .and_then(|frames| frames.get(frame))
            .map(String::as_str)
    }
}

/// Commands the client sends. `move` is overloaded on the wire: either a
/// direction step or an absolute target, never both.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    JoinGame { username: String },
    Move(MoveCommand),
    Stop,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum MoveCommand {
    Direction { direction: Direction },
    Target { x: i32, y: i32 },
}

/// Events the server sends.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ServerMessage {
    JoinGame(JoinReply),
    PlayerJoined {
        player: Player,
        avatar: Avatar,
    },
    PlayersMoved {
        players: HashMap<String, Player>,
    },
    #[serde(rename_all = "camelCase")]
    PlayerLeft {
        player_id: String,
    },
}

/// Initial session snapshot, or a rejection carrying `error`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct JoinReply {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub player_id: Option<String>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub players: HashMap<String, Player>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub avatars: HashMap<String, Avatar>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
