//! Label text helpers: HTML escaping, greedy column wrapping and record-label
//! escaping.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Characters with a meaning in Graphviz record labels.
const RECORD_SPECIAL: [char; 5] = ['|', '{', '}', '<', '>'];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

impl Align {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
        }
    }
}

pub fn escape_html(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            _ => out.push(c),
        }
    }
    out
}

/// Greedily fill lines of at most `width` display columns.
///
/// Whitespace runs collapse to a single space between words. A word wider
/// than `width` fills the rest of the current line and continues on the next.
pub fn wrap(source: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in source.split_whitespace() {
        let sep = usize::from(!line.is_empty());
        let word_width = word.width();
        if line_width + sep + word_width <= width {
            if sep == 1 {
                line.push(' ');
            }
            line.push_str(word);
            line_width += sep + word_width;
            continue;
        }

        let mut rest = word;
        if word_width > width {
            let (head, tail) = split_at_width(rest, width.saturating_sub(line_width + sep));
            if !head.is_empty() {
                if sep == 1 {
                    line.push(' ');
                }
                line.push_str(head);
                rest = tail;
            }
        }
        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
        }

        while rest.width() > width {
            let (mut head, mut tail) = split_at_width(rest, width);
            if head.is_empty() {
                // A single glyph wider than the line still has to go somewhere.
                let end = rest.chars().next().map_or(rest.len(), char::len_utf8);
                (head, tail) = rest.split_at(end);
            }
            lines.push(head.to_string());
            rest = tail;
        }
        line.push_str(rest);
        line_width = rest.width();
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Longest prefix of `word` no wider than `width` columns, and the remainder.
fn split_at_width(word: &str, width: usize) -> (&str, &str) {
    let mut used = 0;
    for (index, c) in word.char_indices() {
        used += c.width().unwrap_or(0);
        if used > width {
            return word.split_at(index);
        }
    }
    (word, "")
}

/// Escape, strip double quotes and wrap a title into HTML-like label markup.
/// Every line, the last one included, ends with an aligned line break.
pub fn wrap_html(source: &str, align: Align, width: usize) -> String {
    let splitter = format!("<br align=\"{}\"/>", align.as_str());
    let escaped = escape_html(&source.replace('"', ""));
    let mut wrapped = wrap(&escaped, width).join(&splitter);
    wrapped.push_str(&splitter);
    wrapped
}

/// Wrap a title into plain label text, lines joined by the DOT `\n` escape.
/// Each line goes through `escape` first, so backslashes already in the title
/// cannot combine with the joins.
pub fn wrap_text(source: &str, width: usize, escape: fn(&str) -> String) -> String {
    wrap(source, width)
        .iter()
        .map(|line| escape(line))
        .collect::<Vec<_>>()
        .join("\\n")
}

pub fn escape_backslashes(source: &str) -> String {
    source.replace('\\', "\\\\")
}

pub fn format_record_label(raw_label: &str) -> String {
    let mut out = String::with_capacity(raw_label.len());
    for c in raw_label.chars() {
        if c == '\\' || RECORD_SPECIAL.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_entities() {
        assert_eq!(
            escape_html("a & b <c> 'd' \"e\""),
            "a &amp; b &lt;c&gt; &#x27;d&#x27; &quot;e&quot;"
        );
    }

    #[test]
    fn wrap_short_text_is_one_line() {
        assert_eq!(wrap("Goal", 20), vec!["Goal"]);
    }

    #[test]
    fn wrap_fills_lines_greedily() {
        assert_eq!(
            wrap("Write the rendering engine for roadmaps", 20),
            vec!["Write the rendering", "engine for roadmaps"]
        );
    }

    #[test]
    fn wrap_exact_width_fits() {
        assert_eq!(wrap("aaaaaaaaaa bbbbbbbbb", 20), vec!["aaaaaaaaaa bbbbbbbbb"]);
        assert_eq!(
            wrap("aaaaaaaaaa bbbbbbbbbb", 20),
            vec!["aaaaaaaaaa", "bbbbbbbbbb"]
        );
    }

    #[test]
    fn wrap_breaks_long_words() {
        assert_eq!(
            wrap("ab cdefghijklmnopqrstuvwxyz", 10),
            vec!["ab cdefghi", "jklmnopqrs", "tuvwxyz"]
        );
        assert_eq!(wrap("abcdefghijkl", 5), vec!["abcde", "fghij", "kl"]);
    }

    #[test]
    fn wrap_collapses_whitespace() {
        assert_eq!(wrap("  a \t b\n c  ", 20), vec!["a b c"]);
        assert!(wrap("   ", 20).is_empty());
    }

    #[test]
    fn wrap_html_appends_trailing_break() {
        assert_eq!(
            wrap_html("Goal", Align::Center, 20),
            "Goal<br align=\"center\"/>"
        );
        assert_eq!(
            wrap_html("Write the rendering engine", Align::Left, 20),
            "Write the rendering<br align=\"left\"/>engine<br align=\"left\"/>"
        );
    }

    #[test]
    fn wrap_html_strips_quotes_and_escapes() {
        assert_eq!(
            wrap_html("Say \"hi\" & <go>", Align::Center, 20),
            "Say hi &amp;<br align=\"center\"/>&lt;go&gt;<br align=\"center\"/>"
        );
    }

    #[test]
    fn wrap_html_empty_title() {
        assert_eq!(wrap_html("", Align::Center, 20), "<br align=\"center\"/>");
    }

    #[test]
    fn wrap_text_uses_dot_newlines() {
        assert_eq!(
            wrap_text("Write the rendering engine", 20, escape_backslashes),
            "Write the rendering\\nengine"
        );
    }

    #[test]
    fn wrap_text_escapes_trailing_backslash() {
        assert_eq!(wrap_text("Fix C:\\", 20, escape_backslashes), "Fix C:\\\\");
        assert_eq!(
            wrap_text("path a\\b then c\\", 10, escape_backslashes),
            "path a\\\\b\\nthen c\\\\"
        );
    }

    #[test]
    fn wrap_counts_display_columns() {
        assert_eq!(wrap("漢字漢字 テスト", 8), vec!["漢字漢字", "テスト"]);
        assert_eq!(wrap("漢字漢字漢", 4), vec!["漢字", "漢字", "漢"]);
        assert_eq!(wrap("漢", 1), vec!["漢"]);
    }

    #[test]
    fn record_label_escapes_special_characters() {
        assert_eq!(format_record_label("a | b"), "a \\| b");
        assert_eq!(format_record_label("{x} <y>"), "\\{x\\} \\<y\\>");
        assert_eq!(format_record_label("C:\\ | D:\\"), "C:\\\\ \\| D:\\\\");
    }
}
