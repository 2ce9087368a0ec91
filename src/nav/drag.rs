//! Drag-to-reveal gesture for the category menu.

/// Width of the menu panel in pixels; also the drag clamp bound.
pub const MENU_WIDTH_PX: i32 = 200;
/// Horizontal movement beyond which a drag flips the menu state.
pub const DRAG_COMMIT_PX: i32 = 70;

/// A drag in progress, between start and stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DragSession {
    was_open: bool,
    movement: i32,
    delta: i32,
}

impl DragSession {
    pub fn start(was_open: bool) -> Self {
        Self {
            was_open,
            movement: 0,
            delta: 0,
        }
    }

    /// Track the pointer at `position` px from the drag origin and return
    /// the menu offset to preview. Closed menus are biased by the menu width
    /// so that dragging right from zero slides the panel in.
    pub fn update(&mut self, position: i32) -> i32 {
        self.movement = position.clamp(-MENU_WIDTH_PX, MENU_WIDTH_PX);
        self.delta = if self.was_open {
            self.movement
        } else {
            self.movement - MENU_WIDTH_PX
        };
        self.delta
    }

    pub fn was_open(&self) -> bool {
        self.was_open
    }

    /// Latest preview offset.
    pub fn delta(&self) -> i32 {
        self.delta
    }

    /// Whether releasing now flips the menu state.
    pub fn commits(&self) -> bool {
        self.movement.abs() > DRAG_COMMIT_PX
    }
}

/// Result of releasing a drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// Movement passed the threshold; the menu visibility flipped.
    Committed { menu_visible: bool },
    /// Below threshold; the menu returns to its pre-drag state.
    SnappedBack,
    /// Stop without a matching start.
    Ignored,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_closed_menu_bias() {
        let mut drag = DragSession::start(false);
        assert_eq!(drag.update(0), -200);
        assert_eq!(drag.update(90), -110);
        assert!(drag.commits());
    }

    #[test]
    fn test_open_menu_unbiased() {
        let mut drag = DragSession::start(true);
        assert_eq!(drag.update(-40), -40);
        assert!(!drag.commits());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        let mut drag = DragSession::start(false);
        drag.update(70);
        assert!(!drag.commits());
        drag.update(71);
        assert!(drag.commits());
    }

    proptest! {
        #[test]
        fn prop_offset_stays_in_bounds(position in -5000i32..5000, was_open: bool) {
            let mut drag = DragSession::start(was_open);
            let offset = drag.update(position);
            if was_open {
                prop_assert!((-MENU_WIDTH_PX..=MENU_WIDTH_PX).contains(&offset));
            } else {
                prop_assert!((-2 * MENU_WIDTH_PX..=0).contains(&offset));
            }
            prop_assert_eq!(drag.delta(), offset);
        }

        #[test]
        fn prop_commit_matches_clamped_movement(position in -5000i32..5000, was_open: bool) {
            let mut drag = DragSession::start(was_open);
            drag.update(position);
            let clamped = position.clamp(-MENU_WIDTH_PX, MENU_WIDTH_PX);
            prop_assert_eq!(drag.commits(), clamped.abs() > DRAG_COMMIT_PX);
        }
    }
}
