//! Fixed row geometry in pixels.
//!
//! Defaults reproduce the two-line conversation cell: 72px tall with a
//! 56px avatar, timestamp on the title line, and badges on the preview line.

/// All fixed distances used by [`LayoutEngine`](super::LayoutEngine).
#[derive(Debug, Clone, PartialEq)]
pub struct RowMetrics {
    /// Row height without the divider.
    pub row_height: f32,
    /// Divider line below the content.
    pub divider_height: f32,
    /// Avatar diameter.
    pub avatar_size: f32,
    /// Distance from the leading edge to the avatar.
    pub avatar_start: f32,
    /// Distance from the top to the avatar.
    pub avatar_top: f32,
    /// Distance from the leading edge to the title and preview.
    pub content_start: f32,
    /// Gap kept free at the trailing edge of the title and preview lines.
    pub end_padding: f32,
    /// Top of the title line.
    pub title_top: f32,
    /// Top of the preview line.
    pub preview_top: f32,
    /// Height of one text line.
    pub line_height: f32,
    /// Distance from the trailing edge to the timestamp.
    pub timestamp_end_inset: f32,
    /// Top of the timestamp text.
    pub timestamp_top: f32,
    /// Gap between the status icon and the timestamp.
    pub status_gap: f32,
    /// Width of one check mark or the clock.
    pub status_icon_width: f32,
    /// Horizontal offset of the second mark of a double check.
    pub double_check_offset: f32,
    /// Pill height.
    pub pill_height: f32,
    /// Minimum width of the text inside a pill.
    pub pill_min_text_width: f32,
    /// Horizontal padding on each side of the pill text.
    pub pill_padding: f32,
    /// Gap between neighbouring pills.
    pub pill_gap: f32,
    /// Distance from the trailing edge to the first pill.
    pub pill_end_inset: f32,
    /// Top of the pills.
    pub pill_top: f32,
    /// Size of small inline icons (pin, mute, verified, lock).
    pub icon_size: f32,
    /// Gap between text and an inline icon.
    pub icon_gap: f32,
    /// Diameter of the online dot.
    pub online_dot_size: f32,
    /// Diameter of the call indicator bubble.
    pub call_indicator_size: f32,
    /// Inset of the presence badges from the avatar's bottom trailing corner.
    pub presence_inset: f32,
    /// Size of the swipe action icon.
    pub swipe_icon_size: f32,
    /// Distance from the trailing edge to the swipe icon center.
    pub swipe_icon_end_inset: f32,
    /// Top of the swipe action icon.
    pub swipe_icon_top: f32,
    /// Maximum width of the swipe label.
    pub swipe_label_max_width: f32,
    /// Top of the swipe label.
    pub swipe_label_top: f32,
    /// Corner radius of the foreground while it is swiped.
    pub swipe_corner_radius: f32,
    /// Character advance used when text measurement fails.
    pub fallback_char_width: f32,
}

impl RowMetrics {
    /// Total row height including the divider.
    pub fn total_height(&self) -> f32 {
        self.row_height + self.divider_height
    }

    /// Pill width for `text_width` of content.
    pub fn pill_width(&self, text_width: f32) -> f32 {
        text_width.max(self.pill_min_text_width) + self.pill_padding * 2.0
    }
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            row_height: 72.0,
            divider_height: 1.0,
            avatar_size: 56.0,
            avatar_start: 16.0,
            avatar_top: 8.0,
            content_start: 85.0,
            end_padding: 14.0,
            title_top: 12.0,
            preview_top: 38.0,
            line_height: 20.0,
            timestamp_end_inset: 16.0,
            timestamp_top: 13.0,
            status_gap: 5.0,
            status_icon_width: 12.0,
            double_check_offset: 5.0,
            pill_height: 23.0,
            pill_min_text_width: 12.0,
            pill_padding: 5.5,
            pill_gap: 6.0,
            pill_end_inset: 14.0,
            pill_top: 37.0,
            icon_size: 16.0,
            icon_gap: 4.0,
            online_dot_size: 14.0,
            call_indicator_size: 22.0,
            presence_inset: 6.0,
            swipe_icon_size: 36.0,
            swipe_icon_end_inset: 43.0,
            swipe_icon_top: 9.0,
            swipe_label_max_width: 80.0,
            swipe_label_top: 47.0,
            swipe_corner_radius: 8.0,
            fallback_char_width: 8.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pill_width_respects_minimum() {
        let metrics = RowMetrics::default();
        assert_eq!(metrics.pill_width(3.0), 23.0);
        assert_eq!(metrics.pill_width(24.0), 35.0);
    }

    #[test]
    fn total_height_includes_divider() {
        assert_eq!(RowMetrics::default().total_height(), 73.0);
    }
}
