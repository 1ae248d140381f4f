//! Text-box size estimation.
//!
//! Core has no font rasterizer, so width is estimated from character count
//! using an average glyph advance. Sizes are in tile units.

use crate::config::{TEXTBOX_GLYPH_WIDTH_RATIO, TEXTBOX_PADDING};
use crate::model::diagram::TextBox;
use crate::model::geometry::Size;

/// Estimates the tile footprint of a text box.
pub fn text_box_size(text_box: &TextBox) -> Size {
    let chars = text_box.content.chars().count() as f64;
    let text_width = chars * text_box.effective_font_size() * TEXTBOX_GLYPH_WIDTH_RATIO;
    let width = (text_width + TEXTBOX_PADDING * 2.0).ceil() as i32;
    Size::new(width.max(1), 1)
}

#[cfg(test)]
mod tests {
    use super::text_box_size;
    use crate::model::diagram::TextBox;
    use crate::model::geometry::{Coords, Size};

    #[test]
    fn width_grows_with_content_and_font_size() {
        let mut text_box = TextBox::new("t1", Coords::zero(), "Hello world");
        // 11 chars * 0.6 * 0.6 = 3.96, + 0.4 padding -> 5
        assert_eq!(text_box_size(&text_box), Size::new(5, 1));

        text_box.font_size = Some(1.2);
        // 11 * 1.2 * 0.6 = 7.92, + 0.4 -> 9
        assert_eq!(text_box_size(&text_box), Size::new(9, 1));
    }

    #[test]
    fn empty_content_still_occupies_one_tile() {
        let text_box = TextBox::new("t1", Coords::zero(), "");
        assert_eq!(text_box_size(&text_box), Size::new(1, 1));
    }
}
