//! Show/hide fade state machine
//!
//! Visibility is tracked as explicit states instead of being inferred from
//! which animation callback fired last:
//!
//! ```text
//!   Hidden ──show()──▶ FadingIn ──complete──▶ Visible
//!     ▲                  │    ▲                  │
//!     │               hide()  show()           hide()
//!     │                  ▼    │                  │
//!     └────complete──── FadingOut ◀──────────────┘
//! ```
//!
//! Completion comes either from [`VisibilityFade::advance`] when the internal
//! tween runs out, or from an external animation driver through
//! [`VisibilityFade::complete`].

use crate::easing::Easing;
use crate::tween::Tween;
use serde::{Deserialize, Serialize};

/// Current visibility state
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    FadingIn,
    Visible,
    FadingOut,
}

/// Emitted when a fade finishes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FadeEvent {
    /// Fade-in finished, now [`Visibility::Visible`]
    Shown,
    /// Fade-out finished, now [`Visibility::Hidden`]
    Hidden,
}

/// Fade timing and target opacity
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FadeConfig {
    /// Opacity when fully visible
    pub visible_opacity: f32,
    /// Fade-in duration in seconds
    pub fade_in: f32,
    /// Fade-out duration in seconds
    pub fade_out: f32,
    pub fade_in_easing: Easing,
    pub fade_out_easing: Easing,
}

impl Default for FadeConfig {
    fn default() -> Self {
        Self {
            visible_opacity: 0.8,
            fade_in: 1.0,
            fade_out: 1.0,
            fade_in_easing: Easing::EaseOutQuad,
            fade_out_easing: Easing::EaseInQuad,
        }
    }
}

/// Opacity fade driven by the visibility state machine
#[derive(Clone, Debug)]
pub struct VisibilityFade {
    config: FadeConfig,
    state: Visibility,
    opacity: f32,
    tween: Option<Tween<f32>>,
}

impl VisibilityFade {
    /// Start hidden with zero opacity
    pub fn hidden(config: FadeConfig) -> Self {
        Self {
            config,
            state: Visibility::Hidden,
            opacity: 0.0,
            tween: None,
        }
    }

    /// Start fully visible
    pub fn visible(config: FadeConfig) -> Self {
        Self {
            opacity: config.visible_opacity,
            state: Visibility::Visible,
            tween: None,
            config,
        }
    }

    pub fn state(&self) -> Visibility {
        self.state
    }

    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    /// Whether anything should be drawn this frame
    pub fn is_rendered(&self) -> bool {
        self.state != Visibility::Hidden
    }

    /// Begin fading in. Returns false when already visible or fading in.
    pub fn show(&mut self) -> bool {
        match self.state {
            Visibility::Hidden | Visibility::FadingOut => {
                self.tween = Some(Tween::new(
                    self.opacity,
                    self.config.visible_opacity,
                    self.config.fade_in,
                    self.config.fade_in_easing,
                ));
                self.transition(Visibility::FadingIn);
                true
            }
            Visibility::FadingIn | Visibility::Visible => false,
        }
    }

    /// Begin fading out. Returns false when already hidden or fading out.
    pub fn hide(&mut self) -> bool {
        match self.state {
            Visibility::Visible | Visibility::FadingIn => {
                self.tween = Some(Tween::new(
                    self.opacity,
                    0.0,
                    self.config.fade_out,
                    self.config.fade_out_easing,
                ));
                self.transition(Visibility::FadingOut);
                true
            }
            Visibility::Hidden | Visibility::FadingOut => false,
        }
    }

    /// Advance the running fade by `dt` seconds
    pub fn advance(&mut self, dt: f32) -> Option<FadeEvent> {
        let tween = self.tween.as_mut()?;
        let finished = tween.step(dt);
        self.opacity = tween.value();
        if finished {
            self.complete()
        } else {
            None
        }
    }

    /// Apply an animation-completion event. No-op outside a fade.
    pub fn complete(&mut self) -> Option<FadeEvent> {
        let (next, opacity, event) = match self.state {
            Visibility::FadingIn => (
                Visibility::Visible,
                self.config.visible_opacity,
                FadeEvent::Shown,
            ),
            Visibility::FadingOut => (Visibility::Hidden, 0.0, FadeEvent::Hidden),
            Visibility::Hidden | Visibility::Visible => return None,
        };
        self.tween = None;
        self.opacity = opacity;
        self.transition(next);
        Some(event)
    }

    fn transition(&mut self, next: Visibility) {
        tracing::debug!("VisibilityFade: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

impl Default for VisibilityFade {
    fn default() -> Self {
        Self::visible(FadeConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_cycle() {
        let mut fade = VisibilityFade::hidden(FadeConfig::default());
        assert!(!fade.is_rendered());

        assert!(fade.show());
        assert_eq!(fade.state(), Visibility::FadingIn);
        assert_eq!(fade.advance(0.5), None);
        assert!(fade.opacity() > 0.0 && fade.opacity() < 0.8);
        assert_eq!(fade.advance(0.5), Some(FadeEvent::Shown));
        assert_eq!(fade.state(), Visibility::Visible);
        assert!((fade.opacity() - 0.8).abs() < 1e-6);

        assert!(fade.hide());
        assert_eq!(fade.advance(2.0), Some(FadeEvent::Hidden));
        assert_eq!(fade.state(), Visibility::Hidden);
        assert_eq!(fade.opacity(), 0.0);
    }

    #[test]
    fn test_redundant_requests_ignored() {
        let mut fade = VisibilityFade::default();
        assert!(!fade.show());
        assert!(fade.hide());
        assert!(!fade.hide());
        assert_eq!(fade.state(), Visibility::FadingOut);
    }

    #[test]
    fn test_reverse_mid_fade_starts_from_current_opacity() {
        let mut fade = VisibilityFade::default();
        fade.hide();
        fade.advance(0.5);
        let midway = fade.opacity();
        assert!(midway < 0.8);

        assert!(fade.show());
        assert_eq!(fade.state(), Visibility::FadingIn);
        assert!((fade.opacity() - midway).abs() < 1e-6);
        fade.advance(0.01);
        assert!(fade.opacity() >= midway);
    }

    #[test]
    fn test_external_completion() {
        let mut fade = VisibilityFade::hidden(FadeConfig::default());
        assert_eq!(fade.complete(), None);
        fade.show();
        assert_eq!(fade.complete(), Some(FadeEvent::Shown));
        assert_eq!(fade.advance(1.0), None);
        assert_eq!(fade.state(), Visibility::Visible);
    }

    #[test]
    fn test_instant_fade() {
        let config = FadeConfig {
            fade_out: 0.0,
            ..Default::default()
        };
        let mut fade = VisibilityFade::visible(config);
        fade.hide();
        assert_eq!(fade.advance(0.0), Some(FadeEvent::Hidden));
    }
}
