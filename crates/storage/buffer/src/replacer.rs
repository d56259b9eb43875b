//! Replacement policies for the buffer pool.
//!
//! A [`Replacer`] decides which frame a cache miss may reuse. The policy is
//! chosen at pool construction from a [`ReplacementPolicy`] value; only the
//! clock policy exists today, but the pool only ever talks to the trait.

use crate::frame::{Frame, FrameId};
use std::str::FromStr;
use thiserror::Error;

/// A frame replacement policy.
pub trait Replacer: std::fmt::Debug + Send {
    /// Picks the frame the next miss may take over, or `None` when every
    /// frame is pinned. Free frames are preferred over evictions.
    fn pick_victim(&mut self, frames: &[Frame]) -> Option<FrameId>;
}

/// The set of replacement policies a pool can be built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementPolicy {
    /// Clock (second-chance) replacement.
    Clock,
}

impl ReplacementPolicy {
    /// Builds the concrete replacer for this policy.
    pub(crate) fn build(self) -> Box<dyn Replacer + Send + Sync> {
        match self {
            ReplacementPolicy::Clock => Box::new(ClockReplacer::new()),
        }
    }
}

impl std::fmt::Display for ReplacementPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReplacementPolicy::Clock => write!(f, "Clock"),
        }
    }
}

/// Raised when a policy name does not match any known replacement policy.
#[derive(Debug, Error)]
#[error("unknown replacement policy {0:?}")]
pub struct UnknownReplacementPolicy(pub String);

impl FromStr for ReplacementPolicy {
    type Err = UnknownReplacementPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Clock" => Ok(ReplacementPolicy::Clock),
            other => Err(UnknownReplacementPolicy(other.to_string())),
        }
    }
}

/// Clock (second-chance) replacement: a single cursor rotates over the frame
/// table, giving every recently-used frame one chance to be skipped before it
/// becomes a victim.
#[derive(Debug, Default)]
pub struct ClockReplacer {
    hand: FrameId,
}

impl ClockReplacer {
    /// Creates a replacer with the cursor at frame 0.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Replacer for ClockReplacer {
    fn pick_victim(&mut self, frames: &[Frame]) -> Option<FrameId> {
        let frame_count = frames.len();
        if frame_count == 0 {
            return None;
        }

        // Two sweeps guarantee that a frame skipped for its reference bit on
        // the first pass is reconsidered after the bit was cleared; after
        // 2 * frame_count probes without a hit, everything is pinned.
        for _ in 0..2 * frame_count {
            let current = self.hand;
            self.hand = (self.hand + 1) % frame_count;

            let frame = &frames[current];

            if !frame.is_valid() {
                return Some(current);
            }

            if frame.is_pinned() {
                continue;
            }

            if frame.clear_ref_bit() {
                // Second chance: spend the reference bit instead of the frame.
                continue;
            }

            return Some(current);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use page::page_id::PageId;
    use std::sync::atomic::Ordering;

    fn frames(count: usize) -> Vec<Frame> {
        (0..count).map(|_| Frame::default()).collect()
    }

    fn fill(frame: &Frame, page_id: i32) {
        *frame.page_id.write().unwrap() = Some(PageId::new(page_id));
    }

    #[test]
    fn parse_round_trips_through_display() {
        let policy: ReplacementPolicy = "Clock".parse().unwrap();
        assert_eq!(policy, ReplacementPolicy::Clock);
        assert_eq!(policy.to_string(), "Clock");
        assert!("Lru".parse::<ReplacementPolicy>().is_err());
    }

    #[test]
    fn free_frame_is_chosen_immediately() {
        let pool = frames(3);
        fill(&pool[0], 1);

        let mut clock = ClockReplacer::new();
        assert_eq!(clock.pick_victim(&pool), Some(1));
    }

    #[test]
    fn referenced_frames_get_a_second_chance() {
        let pool = frames(3);
        for (index, frame) in pool.iter().enumerate() {
            fill(frame, index as i32);
            frame.ref_bit.store(true, Ordering::Relaxed);
        }

        let mut clock = ClockReplacer::new();
        // The first sweep clears every reference bit; the second pass then
        // takes the frame the cursor started from.
        assert_eq!(clock.pick_victim(&pool), Some(0));
        assert!(!pool[1].ref_bit.load(Ordering::Relaxed));
        assert!(!pool[2].ref_bit.load(Ordering::Relaxed));
    }

    #[test]
    fn pinned_frames_are_never_victims() {
        let pool = frames(2);
        for (index, frame) in pool.iter().enumerate() {
            fill(frame, index as i32);
        }
        pool[0].pin_count.store(1, Ordering::Relaxed);

        let mut clock = ClockReplacer::new();
        assert_eq!(clock.pick_victim(&pool), Some(1));
    }

    #[test]
    fn fully_pinned_pool_yields_no_victim() {
        let pool = frames(2);
        for (index, frame) in pool.iter().enumerate() {
            fill(frame, index as i32);
            frame.pin_count.store(1, Ordering::Relaxed);
        }

        let mut clock = ClockReplacer::new();
        assert_eq!(clock.pick_victim(&pool), None);
    }

    #[test]
    fn cursor_resumes_after_the_previous_victim() {
        let pool = frames(3);
        for (index, frame) in pool.iter().enumerate() {
            fill(frame, index as i32);
        }

        let mut clock = ClockReplacer::new();
        assert_eq!(clock.pick_victim(&pool), Some(0));
        assert_eq!(clock.pick_victim(&pool), Some(1));
        assert_eq!(clock.pick_victim(&pool), Some(2));
        assert_eq!(clock.pick_victim(&pool), Some(0));
    }
}
