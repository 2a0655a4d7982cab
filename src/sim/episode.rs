//! Timed episodes (hesitations and deliberate mistakes)
//!
//! An episode is a due-time record checked every tick. At most one episode of
//! each kind is live; completed episodes are handed back to the caller, which
//! returns the controller to Tracking.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a deliberate mistake does while it runs
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MistakeKind {
    /// Aim off by a fixed offset
    Nudge { offset: f32 },
    /// Move at reduced base speed
    Slowdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum EpisodeKind {
    Hesitation,
    Mistake(MistakeKind),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Episode {
    pub kind: EpisodeKind,
    pub started_at: f32,
    pub due_at: f32,
}

impl Episode {
    #[inline]
    pub fn is_due(&self, now: f32) -> bool {
        now >= self.due_at
    }
}

/// Live episodes, one slot per kind
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Episodes {
    hesitation: Option<Episode>,
    mistake: Option<Episode>,
}

impl Episodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hesitation(&self) -> Option<&Episode> {
        self.hesitation.as_ref()
    }

    pub fn mistake(&self) -> Option<&Episode> {
        self.mistake.as_ref()
    }

    #[inline]
    pub fn mistake_active(&self) -> bool {
        self.mistake.is_some()
    }

    /// Schedule a hesitation; returns false if one is already running
    pub fn begin_hesitation<R: Rng + ?Sized>(&mut self, now: f32, rng: &mut R) -> bool {
        if self.hesitation.is_some() {
            return false;
        }
        let duration = rng.random_range(HESITATION_MIN..=HESITATION_MAX);
        self.hesitation = Some(Episode {
            kind: EpisodeKind::Hesitation,
            started_at: now,
            due_at: now + duration,
        });
        true
    }

    /// Schedule a deliberate mistake; `None` if one is already running
    pub fn begin_mistake<R: Rng + ?Sized>(
        &mut self,
        now: f32,
        difficulty: f32,
        rng: &mut R,
    ) -> Option<MistakeKind> {
        if self.mistake.is_some() {
            return None;
        }

        let (kind, duration) = if rng.random::<f32>() > MISTAKE_NUDGE_THRESHOLD {
            let offset =
                rng.random_range(-MISTAKE_NUDGE_RANGE..=MISTAKE_NUDGE_RANGE) * (1.0 - difficulty);
            (
                MistakeKind::Nudge { offset },
                rng.random_range(MISTAKE_NUDGE_MIN..=MISTAKE_NUDGE_MAX),
            )
        } else {
            (
                MistakeKind::Slowdown,
                rng.random_range(MISTAKE_SLOWDOWN_MIN..=MISTAKE_SLOWDOWN_MAX),
            )
        };

        self.mistake = Some(Episode {
            kind: EpisodeKind::Mistake(kind),
            started_at: now,
            due_at: now + duration,
        });
        Some(kind)
    }

    /// Drop a running hesitation without completing it
    pub fn cancel_hesitation(&mut self) -> Option<Episode> {
        self.hesitation.take()
    }

    /// Remove and return every episode due at `now`
    pub fn take_due(&mut self, now: f32) -> impl Iterator<Item = Episode> + use<> {
        let hesitation = self.hesitation.take_if(|e| e.is_due(now));
        let mistake = self.mistake.take_if(|e| e.is_due(now));
        [hesitation, mistake].into_iter().flatten()
    }

    /// Target offset contributed by an active nudge mistake
    pub fn target_offset(&self) -> f32 {
        match self.mistake {
            Some(Episode {
                kind: EpisodeKind::Mistake(MistakeKind::Nudge { offset }),
                ..
            }) => offset,
            _ => 0.0,
        }
    }

    /// Abandon everything (round reset)
    pub fn clear(&mut self) {
        self.hesitation = None;
        self.mistake = None;
    }
}
