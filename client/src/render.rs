use crate::assets::TextureLoader;
use crate::avatars::{AvatarCache, FrameKey, FrameSlot};
use crate::prediction::LocalPrediction;
use crate::session::{ConnectionStatus, SessionState};
use macroquad::prelude::*;
use shared::{Avatar, Player, PLAYER_SIZE, WORLD_HEIGHT, WORLD_WIDTH};
use std::collections::HashMap;

/// Players this far outside the surface are skipped entirely.
pub const CULL_MARGIN: f32 = 50.0;
/// On-screen avatar height; width follows the frame's aspect ratio.
pub const AVATAR_HEIGHT: f32 = 64.0;

const LABEL_FONT_SIZE: u16 = 16;
const REMOTE_COLOR: Color = Color::new(1.0, 0.267, 0.267, 1.0);

pub struct WorldRenderer {
    background: Option<Texture2D>,
}

impl WorldRenderer {
    pub fn new(background: Option<Texture2D>) -> Self {
        Self { background }
    }

    /// Draws one frame: background slice, players, HUD. Our own player is
    /// placed at the predicted position; everyone else at their last
    /// server position.
    pub fn render(
        &self,
        session: &SessionState,
        prediction: Option<LocalPrediction>,
        camera: (f32, f32),
        cache: &mut AvatarCache<TextureLoader>,
    ) {
        clear_background(Color::from_rgba(26, 26, 26, 255));

        self.draw_background(camera);

        for player in session.players.values() {
            let is_self = Some(&player.id) == session.self_id.as_ref();
            let (wx, wy) = if is_self {
                match prediction {
                    Some(p) => (p.x, p.y),
                    None => (player.x, player.y),
                }
            } else {
                (player.x, player.y)
            };

            let sx = wx - camera.0;
            let sy = wy - camera.1;
            if !is_on_surface(sx, sy, screen_width(), screen_height(), CULL_MARGIN) {
                continue;
            }

            self.draw_player(player, sx, sy, is_self, &session.avatars, cache);
        }

        self.draw_hud(session, prediction);
    }

    fn draw_background(&self, camera: (f32, f32)) {
        // The background image is authored at world scale, so world units
        // double as texture pixels.
        if let Some(texture) = &self.background {
            let slice_w = screen_width().min(WORLD_WIDTH - camera.0);
            let slice_h = screen_height().min(WORLD_HEIGHT - camera.1);
            draw_texture_ex(
                texture,
                0.0,
                0.0,
                WHITE,
                DrawTextureParams {
                    dest_size: Some(vec2(slice_w, slice_h)),
                    source: Some(Rect::new(camera.0, camera.1, slice_w, slice_h)),
                    ..Default::default()
                },
            );
        }
    }

    /// One player, anchored bottom-center at its world position. Frames
    /// that are loading, missing or degenerate fall back to a flat square
    /// so the player never disappears.
    fn draw_player(
        &self,
        player: &Player,
        sx: f32,
        sy: f32,
        is_self: bool,
        avatars: &HashMap<String, Avatar>,
        cache: &mut AvatarCache<TextureLoader>,
    ) {
        let key = FrameKey::new(
            player.avatar_id.clone(),
            player.facing,
            player.animation_frame,
        );

        let mut label_y = sy - PLAYER_SIZE - 6.0;
        match cache.resolve(avatars, &key) {
            FrameSlot::Ready(texture) if texture.height() > 0.0 => {
                let (w, h) = scaled_size(texture.width(), texture.height(), AVATAR_HEIGHT);
                draw_texture_ex(
                    &texture,
                    sx - w / 2.0,
                    sy - h,
                    WHITE,
                    DrawTextureParams {
                        dest_size: Some(vec2(w, h)),
                        ..Default::default()
                    },
                );
                label_y = sy - h - 6.0;
            }
            _ => {
                let color = if is_self { GREEN } else { REMOTE_COLOR };
                draw_rectangle(sx - PLAYER_SIZE / 2.0, sy - PLAYER_SIZE, PLAYER_SIZE, PLAYER_SIZE, color);
                draw_rectangle_lines(
                    sx - PLAYER_SIZE / 2.0,
                    sy - PLAYER_SIZE,
                    PLAYER_SIZE,
                    PLAYER_SIZE,
                    2.0,
                    WHITE,
                );
            }
        }

        self.draw_label(&player.username, sx, label_y);

        if is_self {
            draw_rectangle(sx - 2.0, sy - 2.0, 4.0, 4.0, YELLOW);
        }
    }

    fn draw_label(&self, text: &str, center_x: f32, baseline_y: f32) {
        let size = measure_text(text, None, LABEL_FONT_SIZE, 1.0);
        let x = center_x - size.width / 2.0;
        for (ox, oy) in [(-1.0, 0.0), (1.0, 0.0), (0.0, -1.0), (0.0, 1.0)] {
            draw_text(text, x + ox, baseline_y + oy, LABEL_FONT_SIZE as f32, BLACK);
        }
        draw_text(text, x, baseline_y, LABEL_FONT_SIZE as f32, WHITE);
    }

    fn draw_hud(&self, session: &SessionState, prediction: Option<LocalPrediction>) {
        let (connection_color, connection_text) = match session.status {
            ConnectionStatus::Connected => (GREEN, "online"),
            ConnectionStatus::Connecting => (YELLOW, "connecting"),
            ConnectionStatus::Disconnected => (RED, "offline"),
        };
        draw_rectangle(10.0, 10.0, 8.0, 8.0, connection_color);
        draw_text(connection_text, 22.0, 18.0, 12.0, WHITE);

        let player_text = format!("{} players", session.players.len());
        draw_text(&player_text, 10.0, 32.0, 12.0, WHITE);

        if let (Some(player), Some(p)) = (session.self_player(), prediction) {
            let self_text = format!(
                "{} ({}, {})",
                player.username,
                p.x.round() as i32,
                p.y.round() as i32
            );
            draw_text(&self_text, 10.0, 44.0, 12.0, WHITE);
        }
    }
}

pub fn is_on_surface(sx: f32, sy: f32, surface_w: f32, surface_h: f32, margin: f32) -> bool {
    sx > -margin && sx < surface_w + margin && sy > -margin && sy < surface_h + margin
}

/// Display size for a frame scaled to `display_h` preserving aspect ratio.
pub fn scaled_size(tex_w: f32, tex_h: f32, display_h: f32) -> (f32, f32) {
    (display_h * tex_w / tex_h, display_h)
}
