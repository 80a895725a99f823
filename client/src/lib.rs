//! # World Client Library
//!
//! Client-side implementation of the shared-world game: a keyboard and
//! mouse driven view onto a large 2D world where every connected player is
//! visible and moving in near real time.
//!
//! ## Architecture Overview
//!
//! The client is a single-threaded frame loop around [`app::GameClient`].
//! Once per display frame it drains network events, resolves held keys into
//! movement commands, advances the local prediction and settles the camera;
//! rendering then draws whatever state that left behind. The only other
//! thread is the websocket socket thread, which communicates exclusively
//! through channels.
//!
//! ### Local Prediction
//! Our own player moves the moment a command is issued. The server echoes
//! positions back through its broadcast channel, but those echoes only ever
//! update the shared session snapshot; the predicted position is never
//! overwritten, so local motion stays smooth under any latency.
//!
//! ### Command Resolution
//! Movement keys are sampled every frame but resolved into commands on a
//! fixed 100ms timer. The protocol has no diagonal movement, so a held
//! diagonal alternates between its two axes tick by tick, tracing a
//! staircase across the world.
//!
//! ## Module Organization
//!
//! - [`app`]: per-frame dispatch tying the pieces below together
//! - [`input`]: held-key tracking and the resolution timer
//! - [`prediction`]: locally predicted position of our own player
//! - [`camera`]: clamped viewport tracking
//! - [`session`]: world snapshot built from server messages
//! - [`net`]: websocket link and its event channel
//! - [`avatars`]: lazy frame cache keyed by (avatar, facing, frame)
//! - [`assets`]: texture loading behind the cache's loader trait
//! - [`render`]: drawing the world, players and HUD
//!
//! ## Usage Example
//!
//! ```no_run
//! use client::app::GameClient;
//! use client::assets::TextureLoader;
//! use client::input::HeldDirections;
//! use client::net::ServerLink;
//! use std::time::Instant;
//!
//! let link = ServerLink::connect("ws://127.0.0.1:8080");
//! let mut game = GameClient::new(link, TextureLoader::default(), "ada");
//!
//! // Inside the window loop, once per frame:
//! let held = HeldDirections::default();
//! game.step(Instant::now(), held, None, (800.0, 600.0));
//! ```

pub mod app;
pub mod assets;
pub mod avatars;
pub mod camera;
pub mod input;
pub mod net;
pub mod prediction;
pub mod render;
pub mod session;
