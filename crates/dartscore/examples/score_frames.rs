//! Score a captured frame sequence from disk.
//!
//! Usage: `score_frames <frame0.png> <frame1.png> [frame2.png ...]`
//!
//! The first frame calibrates the board; every following consecutive pair
//! is searched for an impact. Emits the calibration fit and each score as
//! JSON lines on stdout.

use std::{env, path::PathBuf};

use dartscore::core::RgbFrameView;
use dartscore::ScorePipeline;
use image::ImageReader;
use log::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let paths: Vec<PathBuf> = env::args().skip(1).map(PathBuf::from).collect();
    if paths.len() < 2 {
        eprintln!("usage: score_frames <frame0.png> <frame1.png> [frame2.png ...]");
        std::process::exit(2);
    }

    let mut pipeline = ScorePipeline::default();
    let mut frames = paths.iter();

    let first = load_rgb(frames.next().expect("checked above"))?;
    let fit = pipeline.calibrate_from(&view(&first));
    println!("{}", serde_json::to_string(&fit)?);
    // seed the frame comparison with the calibration frame
    pipeline.process_frame(&view(&first))?;

    for path in frames {
        let frame = load_rgb(path)?;
        match pipeline.process_frame(&view(&frame))? {
            Some(score) => println!("{}", serde_json::to_string(&score)?),
            None => info!("{}: no impact", path.display()),
        }
    }
    Ok(())
}

fn load_rgb(path: &PathBuf) -> Result<image::RgbImage, Box<dyn std::error::Error>> {
    Ok(ImageReader::open(path)?.decode()?.to_rgb8())
}

fn view(img: &image::RgbImage) -> RgbFrameView<'_> {
    RgbFrameView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}
