//! Prompt-shortcut buttons: layout and hit testing.
//!
//! Buttons flow left to right and wrap onto extra rows when the terminal is
//! narrow. The same layout function serves drawing and mouse hit tests, so a
//! click always lands on the button that was drawn there.

use ratatui::layout::Rect;
use unicode_width::UnicodeWidthStr;

use crate::core::constants::PROMPT_SHORTCUTS;

const GAP: u16 = 1;

pub fn shortcut_labels() -> &'static [&'static str] {
    &PROMPT_SHORTCUTS
}

/// Text drawn for a button, brackets included.
pub fn button_text(label: &str) -> String {
    format!("[ {label} ]")
}

fn button_width(label: &str) -> u16 {
    u16::try_from(UnicodeWidthStr::width(button_text(label).as_str())).unwrap_or(u16::MAX)
}

/// Rects for each label inside `area`. Buttons that do not fit below the
/// area are omitted, and a button wider than the area is clipped to it.
pub fn layout_buttons(area: Rect, labels: &[&str]) -> Vec<Rect> {
    let mut rects = Vec::with_capacity(labels.len());
    if area.width == 0 || area.height == 0 {
        return rects;
    }

    let mut x = area.x;
    let mut y = area.y;
    let right = area.x.saturating_add(area.width);
    let bottom = area.y.saturating_add(area.height);

    for label in labels {
        let width = button_width(label).min(area.width);
        if x > area.x && x.saturating_add(width) > right {
            x = area.x;
            y = y.saturating_add(1);
        }
        if y >= bottom {
            break;
        }
        rects.push(Rect::new(x, y, width, 1));
        x = x.saturating_add(width).saturating_add(GAP);
    }
    rects
}

/// Rows needed to show every label at `width`.
pub fn rows_needed(width: u16, labels: &[&str]) -> u16 {
    if labels.is_empty() {
        return 0;
    }
    let rects = layout_buttons(Rect::new(0, 0, width, u16::MAX), labels);
    rects
        .iter()
        .map(|rect| rect.y + 1)
        .max()
        .unwrap_or(1)
}

/// Index of the button under a terminal cell.
pub fn button_at(rects: &[Rect], column: u16, row: u16) -> Option<usize> {
    rects.iter().position(|rect| {
        column >= rect.x
            && column < rect.x.saturating_add(rect.width)
            && row >= rect.y
            && row < rect.y.saturating_add(rect.height)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wide_area_fits_one_row() {
        let labels = shortcut_labels();
        let rects = layout_buttons(Rect::new(0, 10, 200, 3), labels);

        assert_eq!(rects.len(), labels.len());
        assert!(rects.iter().all(|rect| rect.y == 10));
        assert_eq!(rects[0], Rect::new(0, 10, 22, 1));
        assert_eq!(rects[1].x, 23);
        assert_eq!(rows_needed(200, labels), 1);
    }

    #[test]
    fn narrow_area_wraps_rows() {
        let labels = ["Course schedule", "Course materials"];
        let rects = layout_buttons(Rect::new(2, 0, 30, 5), &labels);

        assert_eq!(rects[0], Rect::new(2, 0, 19, 1));
        assert_eq!(rects[1], Rect::new(2, 1, 20, 1));
        assert_eq!(rows_needed(30, &labels), 2);
    }

    #[test]
    fn overflowing_rows_are_dropped_and_long_labels_clipped() {
        let labels = ["Attendance Verification Quiz", "Course schedule"];
        let rects = layout_buttons(Rect::new(0, 0, 10, 1), &labels);

        assert_eq!(rects, vec![Rect::new(0, 0, 10, 1)]);
        assert!(layout_buttons(Rect::new(0, 0, 0, 1), &labels).is_empty());
    }

    #[test]
    fn hit_testing_matches_layout() {
        let rects = layout_buttons(Rect::new(0, 4, 200, 1), shortcut_labels());

        assert_eq!(button_at(&rects, 0, 4), Some(0));
        assert_eq!(button_at(&rects, 21, 4), Some(0));
        assert_eq!(button_at(&rects, 22, 4), None);
        assert_eq!(button_at(&rects, 23, 4), Some(1));
        assert_eq!(button_at(&rects, 5, 5), None);
    }
}
