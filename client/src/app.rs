//! Frame-step dispatch.
//!
//! Everything the client does happens inside [`GameClient::step`], called
//! once per display frame from the window loop: drain network events, run
//! input resolution, apply click-to-move, settle the camera. No state is
//! shared across threads and no callbacks run outside the step.

use crate::avatars::{AvatarCache, FrameLoader};
use crate::camera::CameraController;
use crate::input::{HeldDirections, InputController};
use crate::net::{NetEvent, ServerLink};
use crate::prediction::MovementPredictor;
use crate::session::{ConnectionStatus, SessionState};
use log::{debug, error, info, warn};
use shared::{ClientMessage, MoveCommand, WORLD_HEIGHT, WORLD_WIDTH};
use std::time::Instant;

pub struct GameClient<L: FrameLoader> {
    pub session: SessionState,
    pub input: InputController,
    pub predictor: MovementPredictor,
    pub camera: CameraController,
    pub cache: AvatarCache<L>,
    pub link: ServerLink,
    username: String,
}

impl<L: FrameLoader> GameClient<L> {
    pub fn new(link: ServerLink, loader: L, username: impl Into<String>) -> Self {
        Self {
            session: SessionState::new(),
            input: InputController::new(),
            predictor: MovementPredictor::new(),
            camera: CameraController::new(),
            cache: AvatarCache::new(loader),
            link,
            username: username.into(),
        }
    }

    /// Runs one frame of game logic. `click` is a press position on the
    /// drawing surface; `viewport` is the current surface size.
    pub fn step(
        &mut self,
        now: Instant,
        held: HeldDirections,
        click: Option<(f32, f32)>,
        viewport: (f32, f32),
    ) {
        self.cache.pump();

        while let Some(event) = self.link.poll_event() {
            self.handle_event(event);
        }

        // The prediction seeds itself from our join position and owns our
        // coordinates from then on.
        if let Some(player) = self.session.self_player() {
            self.predictor.seed(player.x, player.y, now);
        }

        self.input.set_held(held, now);
        if let Some(direction) = self.input.poll(now) {
            if self.predictor.advance_by(direction, now) {
                self.link
                    .send(ClientMessage::Move(MoveCommand::Direction { direction }));
            }
        }
        // TODO: agree with the server on whether releasing all keys should
        // emit the protocol's `stop` action; today only the local timer
        // stops and no command is sent.

        if let Some((sx, sy)) = click {
            let (wx, wy) = self.camera.screen_to_world(sx, sy);
            if let Some((x, y)) = self.predictor.set_target(wx, wy, now) {
                debug!("Click travel to ({}, {})", x, y);
                self.link.send(ClientMessage::Move(MoveCommand::Target { x, y }));
            }
        }

        let focus = self
            .predictor
            .position()
            .or_else(|| self.session.self_player().map(|p| (p.x, p.y)));
        if let Some(focus) = focus {
            self.camera.update(focus, viewport, (WORLD_WIDTH, WORLD_HEIGHT));
        }
    }

    fn handle_event(&mut self, event: NetEvent) {
        match event {
            NetEvent::Opened => {
                info!("Connection open, joining as {}", self.username);
                self.session.status = ConnectionStatus::Connected;
                self.link.send(ClientMessage::JoinGame {
                    username: self.username.clone(),
                });
            }
            NetEvent::Message(message) => {
                if let Err(e) = self.session.apply(message) {
                    error!("{}", e);
                }
            }
            NetEvent::Closed => {
                warn!("Disconnected from server");
                self.session.status = ConnectionStatus::Disconnected;
            }
        }
    }
}
