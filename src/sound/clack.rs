use fundsp::prelude32 as dsp;
use rodio::buffer::SamplesBuffer;

pub const SAMPLE_RATE: u32 = 44_100;
/// Length of one clack, in seconds.
pub const CLACK_SECS: f32 = 0.045;
const DECAY: f32 = 35.0;
const BAND_PASS_HZ: f32 = 1_900.0;
const BAND_PASS_Q: f32 = 9.0;
const HIGH_PASS_HZ: f32 = 450.0;
const HIGH_PASS_Q: f32 = 0.7;

/// A fresh clack, ready for the output bus. Every call gets its own noise.
pub fn clack_buffer(gain: f32) -> SamplesBuffer<f32> {
    let samples = synthesize(SAMPLE_RATE, gain, rand::random());
    SamplesBuffer::new(1, SAMPLE_RATE, samples)
}

/// One mechanical flap click: white noise under an exponential decay,
/// band-passed then high-passed.
pub fn synthesize(sample_rate: u32, gain: f32, seed: u64) -> Vec<f32> {
    let mut node = ((dsp::noise() * dsp::lfo(|t: f32| (-DECAY * t / CLACK_SECS).exp()))
        >> dsp::bandpass_hz(BAND_PASS_HZ, BAND_PASS_Q)
        >> dsp::highpass_hz(HIGH_PASS_HZ, HIGH_PASS_Q))
        * dsp::dc(gain);
    render_mono(&mut node, sample_rate, CLACK_SECS, seed)
}

fn render_mono(node: &mut dyn dsp::AudioUnit, sample_rate: u32, duration: f32, seed: u64) -> Vec<f32> {
    node.set_sample_rate(sample_rate as f64);
    node.set_hash(seed);
    node.reset();

    let sample_count = (sample_rate as f32 * duration) as usize;
    let mut samples = Vec::with_capacity(sample_count);
    for _ in 0..sample_count {
        samples.push(node.get_mono());
    }
    samples
}
