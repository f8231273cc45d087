//! Square Dash headless runner
//!
//! Plays one run at a fixed 60 Hz with no input and logs what happens. Takes
//! the same query string a browser host would, e.g.
//! `square-dash "level=proof_top_land.json&replay=true"`. Exits non-zero when
//! the replay verifier reports a failure.

use std::process::ExitCode;

use square_dash::level::{DirLevelSource, load_level};
use square_dash::platform::{LogRenderer, RenderFrame, RenderPort};
use square_dash::sim::{GameEvent, GameState, ReplayVerdict, TickInput, tick};
use square_dash::Settings;

const FRAME_MS: f64 = 1000.0 / 60.0;
/// Give up after this much simulated time
const MAX_RUN_MS: f64 = 60_000.0;

fn main() -> ExitCode {
    #[cfg(not(target_arch = "wasm32"))]
    env_logger::init();

    let query = std::env::args().nth(1).unwrap_or_default();
    let settings = Settings::from_query(&query);
    let levels_dir = std::env::var("SQUARE_DASH_LEVELS").unwrap_or_else(|_| "levels".to_string());
    let level = load_level(&DirLevelSource::new(levels_dir), &settings);
    log::info!("Square Dash (headless) starting with {settings:?}");

    let mut state = GameState::new(settings, level);
    let mut renderer = LogRenderer::new();
    let input = TickInput::default();
    let mut verdict = None;
    let mut now_ms = 0.0;

    while now_ms <= MAX_RUN_MS {
        tick(&mut state, &input, now_ms);
        let frame = RenderFrame::capture(&mut state);
        renderer.present(&frame);

        for event in &frame.events {
            if let GameEvent::Replay(v) = event {
                verdict = Some(*v);
            }
        }
        if frame.game_over || (state.replay.enabled && state.replay.completed) {
            break;
        }
        now_ms += FRAME_MS;
    }

    log::info!(
        "Finished after {} frames: score {}, {}",
        renderer.frames(),
        state.score,
        state
            .player
            .death_reason
            .map_or("alive".to_string(), |r| format!("died ({r})"))
    );

    match verdict {
        Some(v @ ReplayVerdict::Fail(_)) => {
            eprintln!("{v}");
            ExitCode::FAILURE
        }
        Some(v) => {
            println!("{v}");
            ExitCode::SUCCESS
        }
        None => ExitCode::SUCCESS,
    }
}
