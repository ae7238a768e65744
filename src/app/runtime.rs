//! Frame pump: drives the engine's timers from the app clock, keeps the
//! strip animator in step with engine revisions, and delivers "next frame"
//! requests once a draw has been committed.
//!
//! Per loop iteration the order is: [`advance`], draw, [`after_commit`].

use std::time::Duration;

use super::state::AppState;

/// Offsets closer than this are the same target.
const SAME_TARGET: f64 = 1e-9;

/// Move timers and animation to `now`, before drawing.
pub fn advance(state: &mut AppState, now: Duration) {
    let fired = state.engine.scheduler_mut().advance_to(now);
    for wake in fired {
        state.engine.dispatch(wake);
    }

    if state.animator.tick(now) {
        state.engine.on_transition_end();
    }

    sync_animator(state, now);
}

/// Deliver post-commit frame requests, after drawing.
pub fn after_commit(state: &mut AppState, now: Duration) {
    let requests = state.engine.scheduler_mut().take_frame_requests();
    if requests.is_empty() {
        return;
    }
    for wake in requests {
        state.engine.dispatch(wake);
    }
    sync_animator(state, now);
}

/// Retarget the animator if the engine moved since the last sync.
fn sync_animator(state: &mut AppState, now: Duration) {
    let revision = state.engine.revision();
    if revision == state.seen_revision {
        return;
    }
    state.seen_revision = revision;

    let target = state.engine.offset_percent();
    if (target - state.animator.target()).abs() < SAME_TARGET {
        return;
    }
    state.animator.retarget(target, state.engine.transition(), now);
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use super::*;
    use crate::app::loader::LoadUpdate;
    use crate::config::AppConfig;
    use crate::core::testimonial::{demo_testimonials, ItemSource, Testimonial, TestimonialId};

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// Demo items (7) on a wide terminal: 3 per page, display list of 14.
    fn loaded_state() -> AppState {
        let config = AppConfig {
            autoplay: false,
            ..AppConfig::default()
        };
        let mut state = AppState::new(ItemSource::Demo, config, Rect::new(0, 0, 200, 40));
        let generation = state.begin_load();
        state.apply_load(LoadUpdate {
            generation,
            result: Ok(demo_testimonials()),
        });
        advance(&mut state, ms(0));
        state
    }

    fn percent_for(state: &AppState, index: usize) -> f64 {
        -(index as f64 * 100.0) / state.engine.display_len() as f64
    }

    #[test]
    fn backward_wrap_draws_sentinel_before_animating() {
        let mut s = loaded_state();
        let total = s.engine.total();

        assert!(s.engine.previous());
        advance(&mut s, ms(10));
        // What gets drawn this frame: parked on the duplicate of item 0.
        assert_eq!(s.animator.offset_percent(), percent_for(&s, total));

        after_commit(&mut s, ms(10));
        assert_eq!(s.engine.current_index(), total - 1);
        assert!(s.animator.is_animating());

        advance(&mut s, ms(600));
        assert_eq!(s.animator.offset_percent(), percent_for(&s, total - 1));
        assert_eq!(s.engine.current_index(), total - 1);
    }

    #[test]
    fn forward_wrap_snaps_home_after_animation() {
        let mut s = loaded_state();
        let total = s.engine.total();
        let mut now = 0;

        for step in 1..=total {
            assert!(s.engine.next());
            // Frame that starts the animation, then one after it ends.
            advance(&mut s, ms(now));
            if step == total {
                assert_eq!(s.animator.target(), percent_for(&s, total));
            }
            now += 600;
            advance(&mut s, ms(now));
            after_commit(&mut s, ms(now));
        }

        assert_eq!(s.engine.current_index(), 0);
        assert_eq!(s.animator.offset_percent(), 0.0);
        assert!(s.engine.is_instant());
    }

    #[test]
    fn reload_keeps_strip_on_whole_slots() {
        let mut s = loaded_state();
        let mut now = 0;
        for _ in 0..2 {
            assert!(s.engine.next());
            advance(&mut s, ms(now));
            now += 600;
            advance(&mut s, ms(now));
        }
        assert_eq!(s.engine.current_index(), 2);
        assert!(!s.animator.is_animating());

        let mut items = demo_testimonials();
        let extra: Vec<Testimonial> = items[..2]
            .iter()
            .zip(100u64..)
            .map(|(t, id)| Testimonial {
                id: TestimonialId::Number(id),
                ..t.clone()
            })
            .collect();
        items.extend(extra);

        let generation = s.begin_load();
        s.apply_load(LoadUpdate {
            generation,
            result: Ok(items),
        });
        advance(&mut s, ms(now + 10));

        assert_eq!(s.engine.current_index(), 2);
        assert_eq!(s.engine.display_len(), 18);
        // Snapped, not tweened: the strip is already on slot 2.
        assert!(s.engine.is_instant());
        assert_eq!(s.animator.offset_percent(), percent_for(&s, 2));

        advance(&mut s, ms(now + 110));
        assert_eq!(s.animator.offset_percent(), percent_for(&s, 2));
    }

    #[test]
    fn non_positional_changes_do_not_restart_motion() {
        let mut s = loaded_state();
        s.engine.next();
        advance(&mut s, ms(0));
        advance(&mut s, ms(200));
        let mid = s.animator.offset_percent();
        assert!(mid < 0.0);

        s.engine.toggle_autoplay();
        advance(&mut s, ms(200));
        assert_eq!(s.animator.offset_percent(), mid);
        assert!(s.animator.is_animating());
    }

    #[test]
    fn autoplay_runs_off_the_app_clock() {
        let mut s = loaded_state();
        s.engine.set_autoplay(true);

        advance(&mut s, ms(5000));
        assert_eq!(s.engine.current_index(), 1);
        advance(&mut s, ms(10_000));
        assert_eq!(s.engine.current_index(), 2);
    }
}
