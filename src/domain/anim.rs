/// Frame-sequence animation playback.
///
/// An `Animation` is static data: a named list of spritesheet frame indices
/// played at a fixed rate. An `Animator` plays one animation at a time and
/// reports completion of a non-looping sequence as an `AnimationEvent` returned
/// from `tick()`. The caller consumes the event in the same update; there are
/// no registered callbacks.

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Animation {
    pub name: &'static str,
    pub frames: &'static [u8],
    pub fps: f32,
    pub looping: bool,
}

impl Animation {
    pub fn frame_duration(&self) -> f32 {
        1.0 / self.fps
    }

    /// Total play time of one pass through the sequence, in seconds.
    pub fn duration(&self) -> f32 {
        self.frames.len() as f32 * self.frame_duration()
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AnimationEvent {
    Completed(&'static str),
}

#[derive(Clone, Debug, Default)]
pub struct Animator {
    current: Option<Animation>,
    index: usize,
    timer: f32,
    playing: bool,
}

impl Animator {
    pub fn new() -> Self {
        Animator::default()
    }

    /// Start `anim` from its first frame, replacing whatever was playing.
    pub fn play(&mut self, anim: Animation) {
        self.current = Some(anim);
        self.index = 0;
        self.timer = 0.0;
        self.playing = !anim.frames.is_empty();
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn current(&self) -> Option<&'static str> {
        self.current.map(|a| a.name)
    }

    /// Spritesheet frame currently shown (0 when nothing was ever played).
    pub fn frame(&self) -> u8 {
        self.current
            .and_then(|a| a.frames.get(self.index).copied())
            .unwrap_or(0)
    }

    /// Advance by `dt` seconds. Returns `Completed` exactly once, on the tick
    /// where a non-looping animation runs past its last frame.
    pub fn tick(&mut self, dt: f32) -> Option<AnimationEvent> {
        if !self.playing { return None; }
        let anim = self.current?;
        let frame_dur = anim.frame_duration();

        self.timer += dt;
        while self.timer >= frame_dur {
            self.timer -= frame_dur;
            self.index += 1;
            if self.index >= anim.frames.len() {
                if anim.looping {
                    self.index = 0;
                } else {
                    self.index = anim.frames.len() - 1;
                    self.playing = false;
                    return Some(AnimationEvent::Completed(anim.name));
                }
            }
        }
        None
    }
}

/// Something carrying an animator the frame loop advances.
pub trait Animatable {
    fn animator(&self) -> &Animator;
    fn animator_mut(&mut self) -> &mut Animator;
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLINK: Animation = Animation { name: "blink", frames: &[0, 1, 2], fps: 10.0, looping: false };
    const SPIN: Animation = Animation { name: "spin", frames: &[0, 1], fps: 10.0, looping: true };

    #[test]
    fn one_shot_completes_once() {
        let mut a = Animator::new();
        a.play(BLINK);
        assert_eq!(a.frame(), 0);

        let mut completions = 0;
        for _ in 0..100 {
            if let Some(AnimationEvent::Completed(name)) = a.tick(0.01) {
                assert_eq!(name, "blink");
                completions += 1;
            }
        }
        assert_eq!(completions, 1);
        assert!(!a.is_playing());
        assert_eq!(a.frame(), 2);
    }

    #[test]
    fn looping_animation_wraps_without_events() {
        let mut a = Animator::new();
        a.play(SPIN);
        for _ in 0..50 {
            assert_eq!(a.tick(0.05), None);
        }
        assert!(a.is_playing());
        assert!(a.frame() <= 1);
    }

    #[test]
    fn play_restarts_from_first_frame() {
        let mut a = Animator::new();
        a.play(SPIN);
        a.tick(0.15);
        assert_eq!(a.frame(), 1);
        a.play(BLINK);
        assert_eq!(a.current(), Some("blink"));
        assert_eq!(a.frame(), 0);
    }
}
