//! Renders a drum-like test signal through the limiter into `out/demo/render.wav`.

use std::f32::consts::TAU;
use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};
use simple_logger::SimpleLogger;

use peak_limiter_dsp::{ChannelLayout, LimiterProcessor, Parameters};

const SAMPLE_RATE: u32 = 48000;
const BLOCK_SIZE: usize = 64;
const DURATION: f32 = 4.0;

fn main() {
    SimpleLogger::new()
        .with_level(log::LevelFilter::Debug)
        .init()
        .unwrap();

    let layout: ChannelLayout = "stereo".parse().unwrap();
    let mut processor = LimiterProcessor::new(SAMPLE_RATE as f32, layout);
    let params = Parameters {
        input_gain: 6.0,
        threshold: -1.0,
        release: 0.05,
        ..Default::default()
    };

    let path = Path::new("out/demo/render.wav");
    std::fs::create_dir_all(path.parent().unwrap()).ok();
    let spec = WavSpec {
        channels: 2,
        sample_rate: SAMPLE_RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();

    let blocks = (DURATION * SAMPLE_RATE as f32) as usize / BLOCK_SIZE;
    let mut left = [0.0; BLOCK_SIZE];
    let mut right = [0.0; BLOCK_SIZE];
    let mut frame = 0;

    for n in 0..blocks {
        for i in 0..BLOCK_SIZE {
            let t = frame as f32 / SAMPLE_RATE as f32;
            // Kick every half second on top of a quiet pad.
            let beat = t % 0.5;
            let kick = (TAU * 55.0 * t).sin() * (-beat * 12.0).exp();
            let pad = 0.2 * (TAU * 440.0 * t).sin();
            left[i] = kick + pad;
            right[i] = kick - pad;
            frame += 1;
        }

        let report = processor.run_in_place(&params, &mut [&mut left[..], &mut right[..]]);

        for i in 0..BLOCK_SIZE {
            writer.write_sample(left[i]).unwrap();
            writer.write_sample(right[i]).unwrap();
        }

        if report.history_updated && n % 100 == 0 {
            log::info!("level: {:.1} dB", report.level);
        }
    }

    writer.finalize().unwrap();
    log::info!("latency: {} samples", processor.latency());
}
