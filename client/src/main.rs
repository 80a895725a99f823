use clap::Parser;
use client::app::GameClient;
use client::assets::{self, TextureLoader};
use client::input::HeldDirections;
use client::net::ServerLink;
use client::render::WorldRenderer;
use log::info;
use macroquad::prelude::*;
use std::time::Instant;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Server websocket URL to connect to
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080")]
    server: String,

    /// Username sent with the join request
    #[arg(short = 'u', long, default_value = "player")]
    username: String,

    /// Window width
    #[arg(short = 'w', long, default_value = "800")]
    width: i32,

    /// Window height (no short flag to avoid conflict with --help)
    #[arg(long, default_value = "600")]
    height: i32,

    /// World background image
    #[arg(long, default_value = "assets/world.png")]
    background: String,
}

fn window_conf() -> Conf {
    let args = Args::parse();
    Conf {
        window_title: "World Client".to_string(),
        window_width: args.width,
        window_height: args.height,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    info!("Starting client...");
    info!("Connecting to: {}", args.server);
    info!("Controls: WASD/arrows to move, click to travel");

    let link = ServerLink::connect(&args.server);
    let mut game = GameClient::new(link, TextureLoader::default(), args.username);
    let renderer = WorldRenderer::new(assets::load_background(&args.background).await);

    loop {
        let now = Instant::now();
        let held = HeldDirections::sample();
        let click = if is_mouse_button_pressed(MouseButton::Left) {
            Some(mouse_position())
        } else {
            None
        };

        game.step(now, held, click, (screen_width(), screen_height()));
        renderer.render(
            &game.session,
            game.predictor.prediction(),
            game.camera.position(),
            &mut game.cache,
        );

        next_frame().await;
    }
}
