//! Lazy avatar frame cache.
//!
//! Drawables are produced on demand, keyed by (avatar, facing, frame index).
//! The first lookup of a key starts an asynchronous load through the host
//! [`FrameLoader`]; until it finishes the slot reports `Pending` and callers
//! draw placeholder art. Entries are never evicted.

use shared::{Avatar, Facing};
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FrameKey {
    pub avatar: String,
    pub facing: Facing,
    pub frame: usize,
}

impl FrameKey {
    pub fn new(avatar: impl Into<String>, facing: Facing, frame: usize) -> Self {
        Self {
            avatar: avatar.into(),
            facing,
            frame,
        }
    }
}

/// State of one cached frame.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameSlot<T> {
    /// Load in flight; not drawable yet.
    Pending,
    Ready(T),
    /// No drawable can be produced for this key.
    Unavailable,
}

/// Host image-loading facility. `request` starts a load; finished loads are
/// collected later via `completions`, with `None` marking a failure.
pub trait FrameLoader {
    type Handle: Clone;

    fn request(&mut self, key: FrameKey, source: &str);

    fn completions(&mut self) -> Vec<(FrameKey, Option<Self::Handle>)>;
}

pub struct AvatarCache<L: FrameLoader> {
    entries: HashMap<FrameKey, FrameSlot<L::Handle>>,
    loader: L,
}

impl<L: FrameLoader> AvatarCache<L> {
    pub fn new(loader: L) -> Self {
        Self {
            entries: HashMap::new(),
            loader,
        }
    }

    /// Drains finished loads into the cache. Called once per frame, before
    /// any `resolve`.
    pub fn pump(&mut self) {
        for (key, handle) in self.loader.completions() {
            let slot = match handle {
                Some(handle) => FrameSlot::Ready(handle),
                None => FrameSlot::Unavailable,
            };
            self.entries.insert(key, slot);
        }
    }

    /// Looks up the drawable for one frame, starting a load on first use.
    ///
    /// A key whose avatar data is missing (unknown avatar, direction or
    /// frame index) reports `Unavailable` without caching it, so the frame
    /// recovers as soon as the data arrives. A failed load is cached as
    /// `Unavailable` and never retried.
    pub fn resolve(
        &mut self,
        avatars: &HashMap<String, Avatar>,
        key: &FrameKey,
    ) -> FrameSlot<L::Handle> {
        if let Some(slot) = self.entries.get(key) {
            return slot.clone();
        }
        let source = avatars
            .get(&key.avatar)
            .and_then(|avatar| avatar.frame_source(key.facing, key.frame));
        match source {
            Some(source) => {
                self.loader.request(key.clone(), source);
                self.entries.insert(key.clone(), FrameSlot::Pending);
                FrameSlot::Pending
            }
            None => FrameSlot::Unavailable,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
