//! End-to-end demo on synthetic frames: paint a board on a wall, auto
//! calibrate, throw nine darts, and play a 2-player 501 game.

use std::str::FromStr;

use dartscore::core::{init_with_level, RgbFrame};
use dartscore::{GameMode, GameSession, ScorePipeline};
use log::{info, LevelFilter};

const WALL: [u8; 3] = [110, 110, 110];
const BOARD_BLACK: [u8; 3] = [25, 25, 25];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let log_level = LevelFilter::from_str("info").unwrap_or(LevelFilter::Info);
    init_with_level(log_level)?;

    let width = 640;
    let height = 480;
    let center = (320.0f32, 244.0f32);
    let radius = 130.0f32;

    let mut board = RgbFrame::filled(width, height, WALL);
    board.fill_ellipse(center.0, center.1, radius, radius, 0.0, BOARD_BLACK);

    let mut pipeline = ScorePipeline::default();
    let fit = pipeline.calibrate_from(&board.view());
    info!(
        "calibration: center ({:.1}, {:.1}) score {:.3} fallback {}",
        fit.model.center.x, fit.model.center.y, fit.score, fit.fallback
    );

    let mut session = GameSession::new(2, GameMode::FiveOhOne);
    session.start();
    pipeline.reset_frame_comparison();
    pipeline.process_frame(&board.view())?;

    // alternate darts around the board: center, mid-ring, rim
    let spots = [
        (0.0f32, 0.0f32),
        (0.3, 0.2),
        (-0.45, 0.1),
        (0.0, -0.6),
        (0.61, 0.0),
        (-0.2, -0.5),
        (0.1, 0.96),
        (-0.7, 0.3),
        (0.4, -0.4),
    ];

    for (fx, fy) in spots {
        let x = (fit.model.center.x + fx * fit.model.radius_x) as i32;
        let y = (fit.model.center.y + fy * fit.model.radius_y) as i32;
        let mut hit = board.clone();
        hit.fill_rect(x - 2, y - 2, x + 3, y + 3, [240, 240, 80]);

        if let Some(score) = pipeline.process_frame(&hit.view())? {
            info!("dart at ({x}, {y}) -> {}x{}", score.value, score.multiplier);
            session.register_throw(score);
        }
        // board frame again so the next dart is the only change
        pipeline.process_frame(&board.view())?;
    }

    session.end();
    for standing in session.standings().players {
        info!(
            "{}: {} remaining after {} darts",
            standing.name, standing.display_score, standing.darts_thrown
        );
    }
    Ok(())
}
