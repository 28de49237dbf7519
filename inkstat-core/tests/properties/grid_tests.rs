//! Property tests for the line grid and horizontal placement

use embedded_graphics::prelude::Size;
use inkstat_core::display::{GridError, Justify, LineGrid, resolve_center, resolve_x};
use proptest::prelude::*;

/// Strategy producing `(line_count, display_height, margin_y)` that fit
fn fitting_layout() -> impl Strategy<Value = (usize, u32, u32)> {
    (0u32..40, 1u32..400).prop_flat_map(|(margin_y, usable)| {
        let height = usable + 2 * margin_y;
        (1usize..=usable.min(64) as usize, Just(height), Just(margin_y))
    })
}

proptest! {
    /// Property: the grid has exactly `line_count` ordered, non-overlapping
    /// lines inside the margins
    #[test]
    fn lines_are_ordered_and_contained((count, height, margin) in fitting_layout()) {
        let grid = LineGrid::compute(count, height, margin, 0).unwrap();
        let lines = grid.lines();

        prop_assert_eq!(lines.len(), count);
        prop_assert_eq!(lines[0].y_offset_px, margin as i32);
        for (i, pair) in lines.windows(2).enumerate() {
            prop_assert_eq!(pair[0].index, i);
            prop_assert!(pair[0].bottom() <= pair[1].y_offset_px);
        }
        prop_assert!(lines[count - 1].bottom() <= (height - margin) as i32);
        prop_assert!(lines.iter().all(|l| l.height_px == grid.line_height()));
    }

    /// Property: with no spacing and a divisible height the lines tile the
    /// usable range exactly
    #[test]
    fn lines_tile_when_divisible(count in 1usize..20, line_height in 1u32..40, margin in 0u32..20) {
        let height = count as u32 * line_height + 2 * margin;
        let grid = LineGrid::compute(count, height, margin, 0).unwrap();

        let mut expected_top = margin as i32;
        for line in grid.lines() {
            prop_assert_eq!(line.y_offset_px, expected_top);
            expected_top = line.bottom();
        }
        prop_assert_eq!(expected_top, (height - margin) as i32);
    }

    /// Property: spacing shifts each line by a fixed step
    #[test]
    fn spacing_adds_fixed_step((count, height, margin) in fitting_layout(), spacing in 0u32..10) {
        let grid = LineGrid::compute(count, height, margin, spacing).unwrap();
        let step = (grid.line_height() + spacing) as i32;
        for pair in grid.lines().windows(2) {
            prop_assert_eq!(pair[1].y_offset_px - pair[0].y_offset_px, step);
        }
    }

    /// Property: margins consuming the whole height are rejected
    #[test]
    fn oversized_margins_rejected(margin in 0u32..100, cut in 0u32..=200, count in 1usize..10) {
        let height = (2 * margin).saturating_sub(cut);
        prop_assert!(matches!(
            LineGrid::compute(count, height, margin, 0),
            Err(GridError::MarginsExceedHeight { .. })
        ), "expected MarginsExceedHeight error");
    }

    /// Property: middle line follows the count parity rule
    #[test]
    fn middle_line_rule(count in 1usize..60) {
        let grid = LineGrid::compute(count, 1000, 0, 0).unwrap();
        let expected = if count % 2 == 0 { count / 2 } else { count / 2 + 1 };
        prop_assert_eq!(grid.middle_line(), expected);
    }

    /// Property: left, right and center placement formulas
    #[test]
    fn resolve_x_formulas(w in 0u32..300, display in 1u32..400, m in 0i32..50) {
        prop_assert_eq!(resolve_x(w, display, m, Justify::Left), m);
        prop_assert_eq!(
            resolve_x(w, display, m, Justify::Right),
            display as i32 - m - w as i32
        );
        prop_assert_eq!(
            resolve_x(w, display, m, Justify::Center),
            display as i32 / 2 - w as i32 / 2
        );
    }

    /// Property: centering ignores the horizontal margin
    #[test]
    fn center_ignores_margin(w in 0u32..300, display in 1u32..400, a in 0i32..50, b in 0i32..50) {
        prop_assert_eq!(
            resolve_x(w, display, a, Justify::Center),
            resolve_x(w, display, b, Justify::Center)
        );
    }

    /// Property: free-text centering matches horizontal centering
    #[test]
    fn resolve_center_matches_axes(tw in 0u32..250, th in 0u32..122) {
        let display = Size::new(250, 122);
        let point = resolve_center(Size::new(tw, th), display);
        prop_assert_eq!(point.x, resolve_x(tw, 250, 7, Justify::Center));
        prop_assert_eq!(point.y, 61 - th as i32 / 2);
    }
}

#[test]
fn zero_lines_rejected() {
    assert_eq!(LineGrid::compute(0, 122, 1, 0), Err(GridError::NoLines));
}
