use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a string, accounting for CJK double-width, emoji, etc.
pub(crate) fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Cut `s` to at most `width` display columns, ending in ".." when cut.
pub(crate) fn truncate_display(s: &str, width: usize) -> String {
    if display_width(s) <= width {
        return s.to_string();
    }
    if width < 3 {
        return s
            .chars()
            .scan(0, |used, ch| {
                *used += ch.width().unwrap_or(0);
                (*used <= width).then_some(ch)
            })
            .collect();
    }

    let budget = width - 2;
    let mut used = 0;
    let mut out = String::new();
    for ch in s.chars() {
        let cw = ch.width().unwrap_or(0);
        if used + cw > budget {
            break;
        }
        used += cw;
        out.push(ch);
    }
    out.push_str("..");
    out
}

/// Pad or truncate a string to exactly `width` display columns.
pub(crate) fn pad_right(s: &str, width: usize) -> String {
    let cut = truncate_display(s, width);
    let sw = display_width(&cut);
    format!("{}{}", cut, " ".repeat(width.saturating_sub(sw)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pads_short_strings() {
        assert_eq!(pad_right("ab", 5), "ab   ");
    }

    #[test]
    fn truncates_long_strings() {
        assert_eq!(pad_right("abcdefgh", 5), "abc..");
        assert_eq!(truncate_display("abcdefgh", 2), "ab");
    }

    #[test]
    fn wide_chars_count_double() {
        assert_eq!(display_width("日本"), 4);
        assert_eq!(pad_right("日本語", 5), "日.. ");
        assert_eq!(display_width(&pad_right("日本語", 5)), 5);
    }
}
