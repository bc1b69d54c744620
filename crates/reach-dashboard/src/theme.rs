//! Category presentation.
//!
//! The single lookup table mapping the closed category set to a glyph and
//! accent color. Every view that renders a category badge (email list,
//! detail pane, stats row) goes through here.

use ratatui::style::Color;

use reach_core::Category;

/// Visual treatment of one category badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CategoryStyle {
    pub glyph: &'static str,
    pub color: Color,
}

/// Style for a (possibly missing) category.
pub fn category_style(category: Option<Category>) -> CategoryStyle {
    match category {
        Some(Category::Interested) => CategoryStyle {
            glyph: "▲",
            color: Color::Green,
        },
        Some(Category::MeetingBooked) => CategoryStyle {
            glyph: "◆",
            color: Color::Blue,
        },
        Some(Category::NotInterested) => CategoryStyle {
            glyph: "✕",
            color: Color::Red,
        },
        Some(Category::Spam) => CategoryStyle {
            glyph: "!",
            color: Color::Yellow,
        },
        Some(Category::OutOfOffice) => CategoryStyle {
            glyph: "◷",
            color: Color::Magenta,
        },
        None => CategoryStyle {
            glyph: "·",
            color: Color::DarkGray,
        },
    }
}
