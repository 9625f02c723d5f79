//! Scroll-into-view centering for the channel grid
//!
//! The row height is estimated from the scroll extent, so the same code
//! works whatever unit the renderer measures in (terminal lines here).

use std::time::{Duration, Instant};

/// Row height used when there is nothing to measure
pub const DEFAULT_ROW_HEIGHT: f32 = 100.0;

/// Offset that centers the row of `index` in the viewport, clamped to
/// `[0, max_scroll]`
pub fn compute_offset(
    index: usize,
    columns: usize,
    viewport_size: f32,
    max_scroll: f32,
    total_items: usize,
) -> f32 {
    let columns = columns.max(1);
    let max_scroll = max_scroll.max(0.0);
    let total_rows = total_items.div_ceil(columns);
    let row_height = if total_rows == 0 {
        DEFAULT_ROW_HEIGHT
    } else {
        (max_scroll + viewport_size) / total_rows as f32
    };

    let row = (index / columns) as f32;
    let target = row * row_height - viewport_size / 2.0 + row_height / 2.0;
    target.clamp(0.0, max_scroll)
}

/// Eased transition between scroll offsets
#[derive(Debug, Clone)]
pub struct ScrollAnimator {
    from: f32,
    to: f32,
    started: Option<Instant>,
    duration: Duration,
}

impl ScrollAnimator {
    pub fn new(duration: Duration) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            started: None,
            duration,
        }
    }

    /// Start moving towards `target`; re-targeting the same offset is a no-op
    pub fn animate_to(&mut self, target: f32, now: Instant) {
        if (target - self.to).abs() < f32::EPSILON {
            return;
        }
        self.from = self.offset_at(now);
        self.to = target;
        self.started = Some(now);
    }

    /// Jump without a transition
    pub fn jump_to(&mut self, target: f32) {
        self.from = target;
        self.to = target;
        self.started = None;
    }

    /// Where the transition will end
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Current offset with ease-out cubic easing
    pub fn offset_at(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return self.to;
        };
        if self.duration.is_zero() {
            return self.to;
        }
        let t = (now.saturating_duration_since(started).as_secs_f32() / self.duration.as_secs_f32())
            .clamp(0.0, 1.0);
        let eased = 1.0 - (1.0 - t).powi(3);
        self.from + (self.to - self.from) * eased
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.started
            .map(|s| now.saturating_duration_since(s) >= self.duration)
            .unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centers_middle_row() {
        // 10 rows of 100 in a 300 viewport: max scroll 700
        let offset = compute_offset(25, 5, 300.0, 700.0, 50);
        // row 5 -> 500 - 150 + 50
        assert!((offset - 400.0).abs() < 1e-3);
    }

    #[test]
    fn test_clamps_to_bounds() {
        assert_eq!(compute_offset(0, 5, 300.0, 700.0, 50), 0.0);
        assert_eq!(compute_offset(49, 5, 300.0, 700.0, 50), 700.0);
        assert_eq!(compute_offset(3, 5, 300.0, 0.0, 4), 0.0);
    }

    #[test]
    fn test_empty_grid_uses_default_height() {
        assert_eq!(compute_offset(0, 5, 300.0, 0.0, 0), 0.0);
        assert_eq!(compute_offset(0, 0, 300.0, 50.0, 0), 0.0);
    }

    #[test]
    fn test_idempotent() {
        let a = compute_offset(17, 4, 240.0, 960.0, 40);
        let b = compute_offset(17, 4, 240.0, 960.0, 40);
        assert_eq!(a, b);
    }

    #[test]
    fn test_animation_reaches_target() {
        let base = Instant::now();
        let mut anim = ScrollAnimator::new(Duration::from_millis(200));
        anim.animate_to(100.0, base);

        let mid = anim.offset_at(base + Duration::from_millis(100));
        assert!(mid > 50.0 && mid < 100.0, "ease-out is past halfway: {}", mid);
        assert_eq!(anim.offset_at(base + Duration::from_millis(200)), 100.0);
        assert!(anim.is_settled(base + Duration::from_millis(250)));
    }

    #[test]
    fn test_retarget_same_offset_keeps_transition() {
        let base = Instant::now();
        let mut anim = ScrollAnimator::new(Duration::from_millis(200));
        anim.animate_to(100.0, base);
        anim.animate_to(100.0, base + Duration::from_millis(150));
        assert_eq!(anim.offset_at(base + Duration::from_millis(200)), 100.0);
        assert_eq!(anim.target(), 100.0);
    }
}
