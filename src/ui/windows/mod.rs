pub mod help;
pub mod info;
pub mod language;
pub mod text_controls;
pub mod toc;

use ratatui::layout::{Position, Rect};

/// Compute a centered popup area within the given area.
pub fn centered_popup_area(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let scale = |length: u16, percent: u16| (u32::from(length) * u32::from(percent.min(100)) / 100) as u16;
    let width = scale(area.width, width_percent);
    let height = scale(area.height, height_percent);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + (area.height - height) / 2;

    Rect::new(x, y, width, height)
}

/// First visible row of a list so that `selected` stays on screen.
pub fn list_offset(selected: usize, visible_rows: usize) -> usize {
    if visible_rows == 0 {
        return 0;
    }
    selected.saturating_sub(visible_rows - 1)
}

/// Row index inside a bordered panel, if `position` is on an inner row.
pub fn inner_row(panel: Rect, position: Position) -> Option<usize> {
    let inner = Rect::new(
        panel.x + 1,
        panel.y + 1,
        panel.width.saturating_sub(2),
        panel.height.saturating_sub(2),
    );
    inner
        .contains(position)
        .then(|| (position.y - inner.y) as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_popup_area() {
        let popup = centered_popup_area(Rect::new(0, 0, 100, 50), 50, 40);
        assert_eq!(popup, Rect::new(25, 15, 50, 20));
    }

    #[test]
    fn test_centered_popup_area_on_wide_terminal() {
        let popup = centered_popup_area(Rect::new(0, 0, 2000, 1200), 70, 70);
        assert_eq!(popup, Rect::new(300, 180, 1400, 840));
    }

    #[test]
    fn test_list_offset_keeps_selection_visible() {
        assert_eq!(list_offset(0, 5), 0);
        assert_eq!(list_offset(4, 5), 0);
        assert_eq!(list_offset(7, 5), 3);
        assert_eq!(list_offset(7, 0), 0);
    }

    #[test]
    fn test_inner_row() {
        let panel = Rect::new(10, 2, 20, 6);
        assert_eq!(inner_row(panel, Position::new(12, 3)), Some(0));
        assert_eq!(inner_row(panel, Position::new(12, 6)), Some(3));
        assert_eq!(inner_row(panel, Position::new(10, 3)), None);
        assert_eq!(inner_row(panel, Position::new(12, 2)), None);
    }
}
