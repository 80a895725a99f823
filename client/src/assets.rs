//! Texture loading at the host boundary.

use crate::avatars::{FrameKey, FrameLoader};
use log::warn;
use macroquad::experimental::coroutines::start_coroutine;
use macroquad::prelude::*;
use std::sync::{Arc, Mutex};

type CompletedLoads = Arc<Mutex<Vec<(FrameKey, Option<Texture2D>)>>>;

/// [`FrameLoader`] backed by macroquad coroutines. `start_coroutine`
/// requires a `Send` future, so finished loads cross back through an
/// `Arc<Mutex<_>>` queue; `completions` drains it on the main thread once
/// per frame.
#[derive(Default)]
pub struct TextureLoader {
    completed: CompletedLoads,
}

async fn fetch_frame(key: FrameKey, source: String, completed: CompletedLoads) {
    let handle = match load_texture(&source).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(e) => {
            warn!("Failed to load avatar frame {}: {}", source, e);
            None
        }
    };
    if let Ok(mut completed) = completed.lock() {
        completed.push((key, handle));
    }
}

impl FrameLoader for TextureLoader {
    type Handle = Texture2D;

    fn request(&mut self, key: FrameKey, source: &str) {
        start_coroutine(fetch_frame(
            key,
            source.to_string(),
            Arc::clone(&self.completed),
        ));
    }

    fn completions(&mut self) -> Vec<(FrameKey, Option<Texture2D>)> {
        match self.completed.lock() {
            Ok(mut completed) => completed.drain(..).collect(),
            Err(_) => Vec::new(),
        }
    }
}

/// Loads the world background once at startup. A missing image degrades to
/// a plain backdrop instead of an error.
pub async fn load_background(path: &str) -> Option<Texture2D> {
    match load_texture(path).await {
        Ok(texture) => {
            texture.set_filter(FilterMode::Nearest);
            Some(texture)
        }
        Err(e) => {
            warn!("Failed to load world background {}: {}", path, e);
            None
        }
    }
}
