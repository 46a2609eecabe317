//! Tests for the building blocks of the limiter

use peak_limiter_dsp::limiter::detector::PeakDetector;
use peak_limiter_dsp::limiter::smoother::GainSmoother;
use peak_limiter_dsp::utils::delay_line::{buffer_size, DelayLine};
use peak_limiter_dsp::utils::filter::OnePoleLowPass;
use peak_limiter_dsp::utils::parameter_interpolator::Ramp;
use peak_limiter_dsp::utils::{db_to_gain, gain_to_db, safe_gain};

const SAMPLE_RATE: f32 = 48000.0;

#[test]
fn decibel_conversion() {
    assert_eq!(db_to_gain(0.0), 1.0);
    assert!((db_to_gain(-6.0) - 0.501187).abs() < 1e-5);
    assert!((db_to_gain(20.0) - 10.0).abs() < 1e-4);
    assert!((gain_to_db(0.5) + 6.0206).abs() < 1e-3);
}

#[test]
fn safe_gain_of_peaks() {
    assert_eq!(safe_gain(0.0), 1.0);
    assert_eq!(safe_gain(1.0), 1.0);
    assert_eq!(safe_gain(4.0), 0.25);
}

#[test]
fn delay_line_sizes() {
    assert_eq!(buffer_size(1), 64);
    assert_eq!(buffer_size(72), 128);
    assert_eq!(buffer_size(128), 128);
    assert_eq!(buffer_size(264), 512);

    let mut line = DelayLine::new();
    line.init(72);
    assert_eq!(line.size(), 128);
    assert_eq!(line.mask(), 127);
}

#[test]
fn delay_line_wraps() {
    let mut line = DelayLine::new();
    line.init(72);
    let delay = 64;

    for n in 0..1000 {
        line.write(n + delay, n as f32);
        let expected = if n >= delay { (n - delay) as f32 } else { 0.0 };
        assert_eq!(line.read(n), expected);
    }

    line.reset();
    assert_eq!(line.read(5), 0.0);
}

#[test]
fn ramp_reaches_target() {
    let mut ramp = Ramp::new(1.0);
    ramp.set_target(2.0);
    assert_eq!(ramp.value(), 1.0);

    ramp.retarget(64);
    assert_eq!(ramp.increment(), 1.0 / 64.0);
    assert_eq!(ramp.subsample(32.0), 1.5);

    for _ in 0..8 {
        ramp.advance(8);
    }
    assert!((ramp.value() - 2.0).abs() < 1e-6);

    ramp.retarget(64);
    ramp.retarget(64);
    assert_eq!(ramp.value(), 2.0);
    assert_eq!(ramp.increment(), 0.0);
}

#[test]
fn ramp_snaps_tiny_steps() {
    let mut ramp = Ramp::new(1.0);
    ramp.set_target(1.0 + 1e-10);
    ramp.retarget(64);
    assert_eq!(ramp.increment(), 0.0);
    assert_eq!(ramp.value(), ramp.target());
}

#[test]
fn low_pass_settles() {
    let mut filter = OnePoleLowPass::new();
    filter.init(500.0, SAMPLE_RATE);
    assert!((filter.coefficient() - 6.28 * 500.0 / SAMPLE_RATE).abs() < 1e-9);

    let mut out = 0.0;
    for _ in 0..2000 {
        out = filter.process(1.0);
    }
    assert!((out - 1.0).abs() < 1e-4);

    // A high frequency is attenuated.
    filter.reset();
    let mut peak = 0.0f32;
    for n in 0..4800 {
        let x = if n % 2 == 0 { 1.0 } else { -1.0 };
        peak = peak.max(filter.process(x).abs());
    }
    assert!(peak < 0.1);
}

#[test]
fn detector_collects_peaks() {
    let mut detector = PeakDetector::new();
    detector.init(SAMPLE_RATE);

    detector.process(0, 0.5);
    detector.process(1, -0.8);
    detector.process(0, 0.1);
    assert_eq!(detector.take_peak(), 0.8);
    assert_eq!(detector.take_peak(), 0.0);

    let low = detector.take_low_peak();
    assert!(low > 0.0 && low < 0.1);
    assert_eq!(detector.take_low_peak(), 0.0);
}

#[test]
fn smoother_attacks_fast_and_releases_slowly() {
    let delay = 64;
    let mut smoother = GainSmoother::new();
    smoother.init(delay, 8, 0.1, SAMPLE_RATE);
    assert_eq!(smoother.gain(), 1.0);
    assert_eq!(smoother.fast_coefficient(), 10.0 / 64.0);
    assert_eq!(smoother.slow_coefficient(), 10.0 / 64.0 / 8.0);

    for _ in 0..delay {
        smoother.process(0.5, 1.0);
    }
    assert!(smoother.gain() < 0.501);

    // Release at 0.1 s is far slower than the attack.
    for _ in 0..delay {
        smoother.process(1.0, 1.0);
    }
    assert!(smoother.gain() < 0.52);

    for _ in 0..SAMPLE_RATE as usize {
        smoother.process(1.0, 1.0);
    }
    assert!(smoother.gain() > 0.999);
}

#[test]
fn smoother_follows_the_tighter_minimum() {
    let mut smoother = GainSmoother::new();
    smoother.init(64, 8, 0.01, SAMPLE_RATE);

    for _ in 0..10000 {
        smoother.process(0.9, 0.3);
    }
    assert!((smoother.gain() - 0.3).abs() < 1e-4);

    smoother.set_release(1.0, SAMPLE_RATE);
    assert_eq!(smoother.release_coefficient(), 1.0 / SAMPLE_RATE);
}
