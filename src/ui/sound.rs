/// Sound engine: procedural 8-bit style cues for `sfx:jump`, `sfx:coin` and
/// `sfx:stomp` via rodio.
///
/// All cues are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    use crate::domain::assets::Sfx;

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// One WAV buffer per cue, rendered once at startup.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        cues: [Arc<Vec<u8>>; 3],
    }

    impl SoundEngine {
        /// `None` when no output device is available.
        pub fn new() -> Option<Self> {
            let (stream, handle) = match OutputStream::try_default() {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("no audio output ({e}), sound disabled");
                    return None;
                }
            };
            let cues = [Sfx::Jump, Sfx::Coin, Sfx::Stomp]
                .map(|sfx| Arc::new(make_wav(&synth(recipe(sfx)))));
            Some(SoundEngine { _stream: stream, handle, cues })
        }

        pub fn play(&self, sfx: Sfx) {
            let buf = &self.cues[sfx as usize];
            let sink = match Sink::try_new(&self.handle) {
                Ok(sink) => sink,
                Err(e) => {
                    log::warn!("{}: no sink: {e}", sfx.key());
                    return;
                }
            };
            match rodio::Decoder::new(Cursor::new(buf.as_ref().clone())) {
                Ok(src) => {
                    sink.append(src);
                    sink.detach();
                }
                Err(e) => log::warn!("{}: decode failed: {e}", sfx.key()),
            }
        }
    }

    /// A pitch sweep with a decaying envelope.
    struct Segment {
        from_hz: f32,
        to_hz: f32,
        secs: f32,
        /// Share of white noise mixed into the tone, 0..=1.
        noise: f32,
        /// Envelope exponent: `(1 - t)^decay`.
        decay: f32,
        gain: f32,
    }

    const JUMP: &[Segment] = &[
        Segment { from_hz: 300.0, to_hz: 800.0, secs: 0.14, noise: 0.0, decay: 0.7, gain: 0.25 },
    ];

    // B5 then E6
    const COIN: &[Segment] = &[
        Segment { from_hz: 988.0, to_hz: 988.0, secs: 0.05, noise: 0.0, decay: 0.5, gain: 0.25 },
        Segment { from_hz: 1319.0, to_hz: 1319.0, secs: 0.16, noise: 0.0, decay: 0.5, gain: 0.25 },
    ];

    const STOMP: &[Segment] = &[
        Segment { from_hz: 180.0, to_hz: 60.0, secs: 0.12, noise: 0.3, decay: 1.5, gain: 0.35 },
    ];

    fn recipe(sfx: Sfx) -> &'static [Segment] {
        match sfx {
            Sfx::Jump => JUMP,
            Sfx::Coin => COIN,
            Sfx::Stomp => STOMP,
        }
    }

    /// Render segments back to back as mono samples. The tone carries a
    /// third of its energy on the octave for a brighter 8-bit feel.
    fn synth(segments: &[Segment]) -> Vec<f32> {
        let mut out = Vec::new();
        let mut rng: u32 = 0x5eed;
        for seg in segments {
            let n = (SAMPLE_RATE as f32 * seg.secs) as usize;
            let mut phase = 0.0_f32;
            for i in 0..n {
                let t = i as f32 / n as f32;
                phase += (seg.from_hz + (seg.to_hz - seg.from_hz) * t) / SAMPLE_RATE as f32;
                let tone = (phase * TAU).sin() * 0.7 + (phase * 2.0 * TAU).sin() * 0.3;
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let hiss = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                let env = (1.0 - t).powf(seg.decay);
                out.push((tone * (1.0 - seg.noise) + hiss * seg.noise) * env * seg.gain);
            }
        }
        out
    }

    /// 16-bit mono PCM in a RIFF container.
    fn make_wav(samples: &[f32]) -> Vec<u8> {
        const BYTES_PER_SAMPLE: u32 = 2;
        let data_len = samples.len() as u32 * BYTES_PER_SAMPLE;

        let mut buf = Vec::with_capacity(44 + data_len as usize);
        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&(36 + data_len).to_le_bytes());
        buf.extend_from_slice(b"WAVEfmt ");
        for field in [16u32, 1 | (1 << 16), SAMPLE_RATE, SAMPLE_RATE * BYTES_PER_SAMPLE] {
            buf.extend_from_slice(&field.to_le_bytes());
        }
        // block align, bits per sample
        buf.extend_from_slice(&(BYTES_PER_SAMPLE as u16).to_le_bytes());
        buf.extend_from_slice(&16u16.to_le_bytes());
        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_len.to_le_bytes());
        buf.extend(samples.iter().flat_map(|s| ((s.clamp(-1.0, 1.0) * 32767.0) as i16).to_le_bytes()));
        buf
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn wav_header_matches_payload() {
            let wav = make_wav(&[0.0, 0.5, -0.5, 2.0]);
            assert_eq!(wav.len(), 44 + 8);
            assert_eq!(&wav[0..4], b"RIFF");
            assert_eq!(&wav[8..12], b"WAVE");
            assert_eq!(u32::from_le_bytes([wav[40], wav[41], wav[42], wav[43]]), 8);
            // Out-of-range samples are clamped.
            assert_eq!(i16::from_le_bytes([wav[50], wav[51]]), 32767);
        }

        #[test]
        fn cues_are_short_and_bounded() {
            for sfx in [Sfx::Jump, Sfx::Coin, Sfx::Stomp] {
                let samples = synth(recipe(sfx));
                assert!(!samples.is_empty());
                assert!(samples.len() < SAMPLE_RATE as usize / 2);
                assert!(samples.iter().all(|s| s.abs() <= 1.0));
            }
        }
    }
}

// ════════════════════════════════════════════════════════════
//  Public API, compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play(&self, _sfx: crate::domain::assets::Sfx) {}
}
