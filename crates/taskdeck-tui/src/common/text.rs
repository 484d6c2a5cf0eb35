//! Text utilities for TUI rendering and single-line editing.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Truncates a string with ellipsis if it exceeds `max_width` columns.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width <= 1 {
        return "…".to_string();
    }
    let mut truncated = String::new();
    let mut width = 0;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width + 1 > max_width {
            break;
        }
        width += ch_width;
        truncated.push(ch);
    }
    truncated.push('…');
    truncated
}

/// Cursor for a single-line text field. Positions are char indices.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextCursor {
    pos: usize,
}

impl TextCursor {
    /// Cursor placed after the last char of `text`.
    pub fn at_end(text: &str) -> Self {
        Self {
            pos: text.chars().count(),
        }
    }

    pub fn position(self) -> usize {
        self.pos
    }

    fn byte_index(self, text: &str) -> usize {
        text.char_indices()
            .nth(self.pos)
            .map_or(text.len(), |(idx, _)| idx)
    }

    pub fn insert(&mut self, text: &mut String, ch: char) {
        if ch.is_control() {
            return;
        }
        let idx = self.byte_index(text);
        text.insert(idx, ch);
        self.pos += 1;
    }

    /// Inserts pasted text, dropping line breaks and other control chars.
    pub fn insert_str(&mut self, text: &mut String, pasted: &str) {
        for ch in pasted.chars() {
            self.insert(text, ch);
        }
    }

    pub fn backspace(&mut self, text: &mut String) {
        if self.pos == 0 {
            return;
        }
        self.pos -= 1;
        let idx = self.byte_index(text);
        text.remove(idx);
    }

    pub fn delete(&mut self, text: &mut String) {
        if self.pos >= text.chars().count() {
            return;
        }
        let idx = self.byte_index(text);
        text.remove(idx);
    }

    pub fn left(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    pub fn right(&mut self, text: &str) {
        if self.pos < text.chars().count() {
            self.pos += 1;
        }
    }

    pub fn home(&mut self) {
        self.pos = 0;
    }

    pub fn end(&mut self, text: &str) {
        self.pos = text.chars().count();
    }

    /// Display column of the cursor within `text`.
    pub fn column(self, text: &str) -> u16 {
        let width: usize = text.chars().take(self.pos).filter_map(UnicodeWidthChar::width).sum();
        u16::try_from(width).unwrap_or(u16::MAX)
    }
}

/// Masks a secret for display, one bullet per char.
pub fn mask(text: &str) -> String {
    "•".repeat(text.chars().count())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis() {
        assert_eq!(truncate_with_ellipsis("short", 10), "short");
        assert_eq!(truncate_with_ellipsis("a longer title", 6), "a lon…");
    }

    #[test]
    fn test_cursor_edits_in_the_middle() {
        let mut text = "helo".to_string();
        let mut cursor = TextCursor::at_end(&text);
        cursor.left();
        cursor.insert(&mut text, 'l');
        assert_eq!(text, "hello");
        assert_eq!(cursor.position(), 4);

        cursor.home();
        cursor.delete(&mut text);
        assert_eq!(text, "ello");
        cursor.backspace(&mut text);
        assert_eq!(text, "ello");
    }

    #[test]
    fn test_cursor_handles_multibyte_chars() {
        let mut text = "tâche".to_string();
        let mut cursor = TextCursor::at_end(&text);
        cursor.backspace(&mut text);
        cursor.backspace(&mut text);
        cursor.backspace(&mut text);
        assert_eq!(text, "tâ");
        assert_eq!(cursor.column(&text), 2);
    }

    #[test]
    fn test_column_counts_wide_chars() {
        let text = "日本".to_string();
        assert_eq!(TextCursor::at_end(&text).column(&text), 4);
    }

    #[test]
    fn test_paste_drops_newlines() {
        let mut text = String::new();
        let mut cursor = TextCursor::default();
        cursor.insert_str(&mut text, "buy\nmilk");
        assert_eq!(text, "buymilk");
    }
}
