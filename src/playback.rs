//! Per-item play/pause/scrub state.
//!
//! A [`PlaybackController`] exists only while its history item is on screen.
//! [`PlaybackDeck`] keeps one controller per displayed item and drops it when
//! the item goes away. None of this is stored on the record itself.

use std::collections::HashMap;
use std::time::Duration;

use crate::history::AudioId;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackState {
    /// Not playing. Position 0 after reaching the end; frozen after a pause.
    Paused { position: f64 },
    Playing { position: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlaybackController {
    state: PlaybackState,
    duration: f64,
}

impl PlaybackController {
    /// Stopped at 0 for an asset of `duration` seconds.
    pub fn new(duration: f64) -> Self {
        let duration = if duration.is_finite() && duration > 0.0 {
            duration
        } else {
            0.0
        };
        Self {
            state: PlaybackState::Paused { position: 0.0 },
            duration,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        matches!(self.state, PlaybackState::Playing { .. })
    }

    pub fn position(&self) -> f64 {
        match self.state {
            PlaybackState::Paused { position } | PlaybackState::Playing { position } => position,
        }
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// `position / duration`, or 0 when the duration is unknown.
    pub fn progress_fraction(&self) -> f64 {
        if self.duration <= 0.0 {
            return 0.0;
        }
        (self.position() / self.duration).clamp(0.0, 1.0)
    }

    pub fn play(&mut self) {
        if let PlaybackState::Paused { position } = self.state {
            self.state = PlaybackState::Playing { position };
        }
    }

    pub fn pause(&mut self) {
        if let PlaybackState::Playing { position } = self.state {
            self.state = PlaybackState::Paused { position };
        }
    }

    /// Play if paused, pause if playing.
    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Jump to `fraction` of the duration, keeping the play/pause state.
    pub fn seek(&mut self, fraction: f64) {
        let fraction = if fraction.is_nan() { 0.0 } else { fraction };
        let position = (fraction * self.duration).clamp(0.0, self.duration);
        self.state = match self.state {
            PlaybackState::Paused { .. } => PlaybackState::Paused { position },
            PlaybackState::Playing { .. } => PlaybackState::Playing { position },
        };
    }

    /// Stop and rewind after the end of the audio.
    pub fn reach_end(&mut self) {
        if self.is_playing() {
            self.state = PlaybackState::Paused { position: 0.0 };
        }
    }

    /// Advance a playing position by `elapsed`, firing [`Self::reach_end`] at the end.
    ///
    /// Returns `true` if the end was reached during this step.
    pub fn advance(&mut self, elapsed: Duration) -> bool {
        let PlaybackState::Playing { position } = self.state else {
            return false;
        };
        let next = position + elapsed.as_secs_f64();
        if next >= self.duration {
            self.reach_end();
            true
        } else {
            self.state = PlaybackState::Playing { position: next };
            false
        }
    }
}

/// Controllers for the items currently on display, keyed by record id.
#[derive(Debug, Default)]
pub struct PlaybackDeck {
    controllers: HashMap<AudioId, PlaybackController>,
}

impl PlaybackDeck {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controller for `id`, created stopped on first access.
    pub fn show(&mut self, id: AudioId, duration: f64) -> &mut PlaybackController {
        self.controllers
            .entry(id)
            .or_insert_with(|| PlaybackController::new(duration))
    }

    pub fn get(&self, id: AudioId) -> Option<&PlaybackController> {
        self.controllers.get(&id)
    }

    pub fn get_mut(&mut self, id: AudioId) -> Option<&mut PlaybackController> {
        self.controllers.get_mut(&id)
    }

    /// Drop the controller for an item leaving the view.
    pub fn hide(&mut self, id: AudioId) {
        self.controllers.remove(&id);
    }

    /// Advance every playing controller; returns the ids that finished.
    pub fn tick(&mut self, elapsed: Duration) -> Vec<AudioId> {
        self.controllers
            .iter_mut()
            .filter_map(|(id, controller)| controller.advance(elapsed).then_some(*id))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_stopped_at_zero() {
        let player = PlaybackController::new(2.0);
        assert!(!player.is_playing());
        assert_eq!(player.position(), 0.0);
        assert_eq!(player.progress_fraction(), 0.0);
    }

    #[test]
    fn pause_freezes_position() {
        let mut player = PlaybackController::new(2.0);
        player.play();
        player.advance(Duration::from_millis(500));
        player.pause();
        player.advance(Duration::from_millis(500));

        assert_eq!(player.state(), PlaybackState::Paused { position: 0.5 });
        assert_eq!(player.progress_fraction(), 0.25);
    }

    #[test]
    fn seek_keeps_state_and_clamps() {
        let mut player = PlaybackController::new(4.0);
        player.seek(0.5);
        assert_eq!(player.state(), PlaybackState::Paused { position: 2.0 });

        player.play();
        player.seek(1.5);
        assert_eq!(player.state(), PlaybackState::Playing { position: 4.0 });

        player.seek(-1.0);
        assert_eq!(player.position(), 0.0);
    }

    #[test]
    fn reaching_end_stops_and_rewinds() {
        let mut player = PlaybackController::new(1.0);
        player.play();
        assert!(!player.advance(Duration::from_millis(900)));
        assert!(player.advance(Duration::from_millis(200)));

        assert_eq!(player.state(), PlaybackState::Paused { position: 0.0 });
        assert_eq!(player.progress_fraction(), 0.0);
    }

    #[test]
    fn zero_duration_has_zero_progress() {
        let mut player = PlaybackController::new(0.0);
        player.seek(0.7);
        assert_eq!(player.progress_fraction(), 0.0);
        assert_eq!(PlaybackController::new(f64::NAN).duration(), 0.0);
    }

    #[test]
    fn toggle_alternates() {
        let mut player = PlaybackController::new(1.0);
        player.toggle();
        assert!(player.is_playing());
        player.toggle();
        assert!(!player.is_playing());
    }

    #[test]
    fn deck_tracks_controllers_per_item() {
        let mut deck = PlaybackDeck::new();
        let a = AudioId::new();
        let b = AudioId::new();

        deck.show(a, 1.0).play();
        deck.show(b, 10.0).play();
        assert_eq!(deck.len(), 2);

        let finished = deck.tick(Duration::from_secs(2));
        assert_eq!(finished, vec![a]);
        assert!(!deck.get(a).unwrap().is_playing());
        assert!(deck.get(b).unwrap().is_playing());

        deck.hide(a);
        assert!(deck.get(a).is_none());
        assert_eq!(deck.len(), 1);
    }
}
