//! Sprite animation clips, one per player state, and a small frame clock.

use super::entity::PlayerState;

#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Clip {
    pub name: &'static str,
    pub frames: &'static [u8],
    pub fps: f32,
    pub looping: bool,
}

const STAND: Clip = Clip { name: "stand", frames: &[0], fps: 60.0, looping: false };
const WALK: Clip = Clip { name: "walk", frames: &[0, 1, 2, 1], fps: 12.0, looping: true };
const JUMP: Clip = Clip { name: "jump", frames: &[2], fps: 60.0, looping: false };
const FALL: Clip = Clip { name: "fall", frames: &[2], fps: 60.0, looping: false };
const CROUCH: Clip = Clip { name: "crouch", frames: &[3], fps: 60.0, looping: false };
const CLIMB: Clip = Clip { name: "climb", frames: &[4, 5], fps: 12.0, looping: true };
const LADDER: Clip = Clip { name: "ladder", frames: &[4], fps: 60.0, looping: false };

pub fn clip_for(state: PlayerState) -> &'static Clip {
    match state {
        PlayerState::Standing => &STAND,
        PlayerState::Walking => &WALK,
        PlayerState::Jumping => &JUMP,
        PlayerState::Falling => &FALL,
        PlayerState::Crouching => &CROUCH,
        PlayerState::OnLadder => &LADDER,
        PlayerState::Climbing => &CLIMB,
    }
}

/// Plays one clip at a time. `play` restarts only when the clip changes.
#[derive(Clone, Debug)]
pub struct Animator {
    clip: &'static Clip,
    elapsed: f32,
}

impl Default for Animator {
    fn default() -> Self {
        Animator { clip: &STAND, elapsed: 0.0 }
    }
}

impl Animator {
    pub fn play(&mut self, clip: &'static Clip) {
        if self.clip.name != clip.name {
            self.clip = clip;
            self.elapsed = 0.0;
        }
    }

    /// Looping clips wrap at their period; one-shot clips hold at the end.
    pub fn advance(&mut self, dt: f32) {
        let period = self.clip.frames.len() as f32 / self.clip.fps;
        self.elapsed += dt;
        if self.clip.looping {
            self.elapsed %= period;
        } else {
            self.elapsed = self.elapsed.min(period);
        }
    }

    pub fn clip(&self) -> &'static Clip {
        self.clip
    }

    /// Current sprite frame index.
    pub fn frame(&self) -> u8 {
        let frames = self.clip.frames;
        let step = (self.elapsed * self.clip.fps).floor() as usize;
        let i = if self.clip.looping {
            step % frames.len()
        } else {
            step.min(frames.len() - 1)
        };
        frames[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_state_has_a_clip() {
        for s in PlayerState::ALL {
            assert!(!clip_for(s).frames.is_empty(), "{s:?}");
        }
        assert_eq!(clip_for(PlayerState::OnLadder).name, "ladder");
    }

    #[test]
    fn walk_loops_at_twelve_fps() {
        let mut a = Animator::default();
        a.play(clip_for(PlayerState::Walking));
        let seen: Vec<u8> = (0..6)
            .map(|_| {
                let f = a.frame();
                a.advance(1.0 / 12.0 + 1e-4);
                f
            })
            .collect();
        assert_eq!(seen, vec![0, 1, 2, 1, 0, 1]);
    }

    #[test]
    fn clock_stays_bounded_over_long_sessions() {
        let mut walk = Animator::default();
        walk.play(clip_for(PlayerState::Walking));
        let mut stand = Animator::default();
        for _ in 0..216_000 {
            walk.advance(1.0 / 60.0);
            stand.advance(1.0 / 60.0);
        }
        assert!(walk.elapsed < 4.0 / 12.0);
        assert!(stand.elapsed <= 1.0 / 60.0);
        assert_eq!(stand.frame(), 0);

        let mut seen = vec![];
        for _ in 0..8 {
            seen.push(walk.frame());
            walk.advance(1.0 / 24.0);
        }
        for f in [0, 1, 2] {
            assert!(seen.contains(&f), "frame {f} missing from {seen:?}");
        }
    }

    #[test]
    fn replaying_same_clip_keeps_phase() {
        let mut a = Animator::default();
        a.play(clip_for(PlayerState::Climbing));
        a.advance(0.1);
        a.play(clip_for(PlayerState::Climbing));
        assert_eq!(a.frame(), 5);
        a.play(clip_for(PlayerState::OnLadder));
        assert_eq!(a.frame(), 4);
    }
}
