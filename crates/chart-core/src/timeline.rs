// File: crates/chart-core/src/timeline.rs
// Summary: Declarative reveal timeline: cues with delay, duration, effect and easing.
// Notes:
// - The timeline is plain data; hosts sample it with an elapsed time, nothing sleeps.
// - Cue delays are non-decreasing in insertion order (the builder enforces it).

use crate::scene::PrimitiveId;

/// How a primitive enters the scene.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Stroked length grows from 0 to the full path.
    Reveal,
    /// Opacity 0 -> 1.
    Fade,
    /// Radius/scale 0 -> 1.
    Grow,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Easing {
    Linear,
    QuadOut,
    QuadInOut,
    CubicOut,
}

impl Easing {
    pub fn apply(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::QuadOut => t * (2.0 - t),
            Easing::QuadInOut => {
                if t < 0.5 { 2.0 * t * t } else { -1.0 + (4.0 - 2.0 * t) * t }
            }
            Easing::CubicOut => {
                let u = t - 1.0;
                u * u * u + 1.0
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cue {
    pub primitive: PrimitiveId,
    pub delay_ms: u32,
    pub duration_ms: u32,
    pub effect: Effect,
    pub easing: Easing,
}

impl Cue {
    /// Eased progress in [0, 1] at `elapsed_ms`. Zero-length cues jump straight to 1.
    pub fn progress_at(&self, elapsed_ms: u32) -> f32 {
        if elapsed_ms < self.delay_ms {
            return 0.0;
        }
        if self.duration_ms == 0 {
            return 1.0;
        }
        let t = (elapsed_ms - self.delay_ms) as f32 / self.duration_ms as f32;
        self.easing.apply(t)
    }

    pub fn end_ms(&self) -> u32 { self.delay_ms.saturating_add(self.duration_ms) }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    cues: Vec<Cue>,
}

impl Timeline {
    pub fn cues(&self) -> &[Cue] { &self.cues }

    pub fn cue_for(&self, id: PrimitiveId) -> Option<&Cue> {
        self.cues.iter().find(|c| c.primitive == id)
    }

    /// Time at which every cue has finished.
    pub fn total_duration_ms(&self) -> u32 {
        self.cues.iter().map(Cue::end_ms).max().unwrap_or(0)
    }

    pub fn is_settled(&self, elapsed_ms: u32) -> bool {
        elapsed_ms >= self.total_duration_ms()
    }

    pub fn is_monotonic(&self) -> bool {
        self.cues.windows(2).all(|w| w[0].delay_ms <= w[1].delay_ms)
    }
}

/// Appends cues in scene order. A requested delay earlier than the last one
/// is clamped up to it.
#[derive(Debug, Default)]
pub struct TimelineBuilder {
    cues: Vec<Cue>,
    cursor_ms: u32,
}

impl TimelineBuilder {
    pub fn new() -> Self { Self::default() }

    pub fn cue(&mut self, primitive: PrimitiveId, delay_ms: u32, duration_ms: u32, effect: Effect, easing: Easing) -> &mut Self {
        let delay_ms = delay_ms.max(self.cursor_ms);
        self.cursor_ms = delay_ms;
        self.cues.push(Cue { primitive, delay_ms, duration_ms, effect, easing });
        self
    }

    pub fn cursor_ms(&self) -> u32 { self.cursor_ms }

    pub fn build(self) -> Timeline { Timeline { cues: self.cues } }
}

/// Per-item stagger so that `count` items starting `per_item_ms` apart never
/// span more than `max_span_ms`.
pub fn stagger_ms(count: usize, per_item_ms: u32, max_span_ms: u32) -> f32 {
    if count <= 1 {
        return per_item_ms as f32;
    }
    let fit = max_span_ms as f32 / (count - 1) as f32;
    (per_item_ms as f32).min(fit)
}
