//! Shared world state as reported by the server.

use log::info;
use shared::{Avatar, Player, ServerMessage};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connecting,
    Connected,
    Disconnected,
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("server rejected join: {0}")]
    JoinRefused(String),
    #[error("join reply does not include our own player")]
    IncompleteJoin,
}

/// Snapshot of every player and avatar the server has told us about.
///
/// Position updates replace player entries wholesale. Our own entry is kept
/// current too, but rendering reads the local prediction for it; nothing in
/// here ever writes the prediction.
pub struct SessionState {
    pub players: HashMap<String, Player>,
    pub avatars: HashMap<String, Avatar>,
    pub self_id: Option<String>,
    pub status: ConnectionStatus,
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            players: HashMap::new(),
            avatars: HashMap::new(),
            self_id: None,
            status: ConnectionStatus::Connecting,
        }
    }

    pub fn joined(&self) -> bool {
        self.self_id.is_some()
    }

    pub fn self_player(&self) -> Option<&Player> {
        self.players.get(self.self_id.as_ref()?)
    }

    /// Applies one inbound server message to the snapshot.
    pub fn apply(&mut self, message: ServerMessage) -> Result<(), SessionError> {
        match message {
            ServerMessage::JoinGame(reply) => {
                if !reply.success {
                    let reason = reply.error.unwrap_or_else(|| "unspecified".to_string());
                    return Err(SessionError::JoinRefused(reason));
                }
                let player_id = reply.player_id.ok_or(SessionError::IncompleteJoin)?;
                if !reply.players.contains_key(&player_id) {
                    return Err(SessionError::IncompleteJoin);
                }
                info!(
                    "Joined as {} ({} players, {} avatars)",
                    player_id,
                    reply.players.len(),
                    reply.avatars.len()
                );
                self.players = reply.players;
                self.avatars = reply.avatars;
                self.self_id = Some(player_id);
                Ok(())
            }
            ServerMessage::PlayerJoined { player, avatar } => {
                info!("{} joined the world", player.username);
                self.avatars.entry(avatar.name.clone()).or_insert(avatar);
                self.players.insert(player.id.clone(), player);
                Ok(())
            }
            ServerMessage::PlayersMoved { players } => {
                for (id, player) in players {
                    self.players.insert(id, player);
                }
                Ok(())
            }
            ServerMessage::PlayerLeft { player_id } => {
                if let Some(player) = self.players.remove(&player_id) {
                    info!("{} left the world", player.username);
                }
                Ok(())
            }
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Facing, JoinReply};

    fn join_reply(self_id: &str, players: Vec<Player>) -> ServerMessage {
        let players: HashMap<String, Player> = players
            .into_iter()
            .map(|player| (player.id.clone(), player))
            .collect();
        ServerMessage::JoinGame(JoinReply {
            success: true,
            player_id: Some(self_id.to_string()),
            players,
            avatars: HashMap::new(),
            error: None,
        })
    }

    #[test]
    fn test_successful_join_populates_snapshot() {
        let mut session = SessionState::new();
        let message = join_reply(
            "p1",
            vec![
                Player::new("p1", "ada", 100.0, 100.0, "knight"),
                Player::new("p2", "bob", 300.0, 400.0, "mage"),
            ],
        );

        session.apply(message).unwrap();

        assert!(session.joined());
        assert_eq!(session.players.len(), 2);
        assert_eq!(session.self_player().unwrap().username, "ada");
    }

    #[test]
    fn test_refused_join_leaves_snapshot_empty() {
        let mut session = SessionState::new();
        let message = ServerMessage::JoinGame(JoinReply {
            success: false,
            error: Some("world full".to_string()),
            ..JoinReply::default()
        });

        let err = session.apply(message).unwrap_err();
        assert_eq!(err, SessionError::JoinRefused("world full".to_string()));
        assert!(!session.joined());
        assert!(session.players.is_empty());
    }

    #[test]
    fn test_join_without_own_player_is_incomplete() {
        let mut session = SessionState::new();
        let message = join_reply("p1", vec![Player::new("p2", "bob", 0.0, 0.0, "mage")]);
        assert_eq!(session.apply(message), Err(SessionError::IncompleteJoin));
        assert!(!session.joined());
    }

    #[test]
    fn test_player_joined_adds_player_and_avatar() {
        let mut session = SessionState::new();
        session
            .apply(join_reply("p1", vec![Player::new("p1", "ada", 0.0, 0.0, "knight")]))
            .unwrap();

        let avatar = Avatar::new("mage").with_frames(Facing::South, vec!["m0.png".to_string()]);
        session
            .apply(ServerMessage::PlayerJoined {
                player: Player::new("p2", "bob", 64.0, 64.0, "mage"),
                avatar,
            })
            .unwrap();

        assert_eq!(session.players.len(), 2);
        assert!(session.avatars.contains_key("mage"));
    }

    #[test]
    fn test_known_avatar_is_not_replaced() {
        let mut session = SessionState::new();
        session
            .apply(join_reply("p1", vec![Player::new("p1", "ada", 0.0, 0.0, "knight")]))
            .unwrap();

        let original = Avatar::new("mage").with_frames(Facing::South, vec!["m0.png".to_string()]);
        session
            .apply(ServerMessage::PlayerJoined {
                player: Player::new("p2", "bob", 0.0, 0.0, "mage"),
                avatar: original,
            })
            .unwrap();
        session
            .apply(ServerMessage::PlayerJoined {
                player: Player::new("p3", "eve", 0.0, 0.0, "mage"),
                avatar: Avatar::new("mage"),
            })
            .unwrap();

        let kept = &session.avatars["mage"];
        assert_eq!(kept.frame_source(Facing::South, 0), Some("m0.png"));
    }

    #[test]
    fn test_players_moved_replaces_entries_wholesale() {
        let mut session = SessionState::new();
        session
            .apply(join_reply(
                "p1",
                vec![
                    Player::new("p1", "ada", 100.0, 100.0, "knight"),
                    Player::new("p2", "bob", 0.0, 0.0, "mage"),
                ],
            ))
            .unwrap();

        let mut moved = Player::new("p2", "bob", 64.0, 96.0, "mage");
        moved.facing = Facing::East;
        moved.animation_frame = 1;
        let mut players = HashMap::new();
        players.insert("p2".to_string(), moved);
        session.apply(ServerMessage::PlayersMoved { players }).unwrap();

        let bob = &session.players["p2"];
        assert_eq!((bob.x, bob.y), (64.0, 96.0));
        assert_eq!(bob.facing, Facing::East);
        assert_eq!(bob.animation_frame, 1);
    }

    #[test]
    fn test_player_left_removes_entry() {
        let mut session = SessionState::new();
        session
            .apply(join_reply(
                "p1",
                vec![
                    Player::new("p1", "ada", 0.0, 0.0, "knight"),
                    Player::new("p2", "bob", 0.0, 0.0, "mage"),
                ],
            ))
            .unwrap();

        session
            .apply(ServerMessage::PlayerLeft {
                player_id: "p2".to_string(),
            })
            .unwrap();
        assert_eq!(session.players.len(), 1);

        // Unknown ids are a no-op, not an error.
        session
            .apply(ServerMessage::PlayerLeft {
                player_id: "p9".to_string(),
            })
            .unwrap();
        assert_eq!(session.players.len(), 1);
    }
}
