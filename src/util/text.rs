use std::borrow::Cow;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Calculates the display width of a string in terminal columns.
///
/// Wide characters (CJK, most emoji) count as two columns and combining
/// marks as zero.
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

const ELLIPSIS: &str = "...";
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within `max_width` columns, appending "..."
/// when text was cut. Widths of 3 or less get a plain cut with no ellipsis.
///
/// ```
/// use shadow_reader::util::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(s: &str, max_width: usize) -> Cow<'_, str> {
    if display_width(s) <= max_width {
        return Cow::Borrowed(s);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(take_width(s, max_width).to_string());
    }
    let head = take_width(s, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{}{}", head, ELLIPSIS))
}

/// Longest prefix of `s` that fits in `width` columns.
fn take_width(s: &str, width: usize) -> &str {
    let mut used = 0;
    for (idx, c) in s.char_indices() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > width {
            return &s[..idx];
        }
        used += w;
    }
    s
}

/// Greedy word wrap to `width` columns.
///
/// Whitespace runs collapse to a single space and words wider than the line
/// are hard-split. Empty or whitespace-only input yields no lines.
pub fn wrap_to_width(s: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in s.split_whitespace() {
        let mut word = word;
        let mut word_width = display_width(word);

        let needed = if line.is_empty() { word_width } else { word_width + 1 };
        if line_width + needed <= width {
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
            line_width += needed;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        while word_width > width {
            let mut head = take_width(word, width);
            if head.is_empty() {
                // A single character wider than the line still gets its own row
                let first = word.chars().next().map(char::len_utf8).unwrap_or(word.len());
                head = &word[..first];
            }
            lines.push(head.to_string());
            word = &word[head.len()..];
            word_width = display_width(word);
        }

        if !word.is_empty() {
            line.push_str(word);
            line_width = word_width;
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Reduce an HTML fragment to plain text: drops tags, decodes the common
/// entities and collapses whitespace.
pub fn strip_html_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;

    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&apos;", "'")
        .replace("&amp;", "&");

    let mut out = String::with_capacity(decoded.len());
    for word in decoded.split_whitespace() {
        if !out.is_empty() && !matches!(word.chars().next(), Some('.' | ',' | ';' | ':' | '!' | '?')) {
            out.push(' ');
        }
        out.push_str(word);
    }
    out
}

/// Strip terminal control characters and ANSI escape sequences from text.
///
/// Removes characters that could manipulate terminal behavior when rendering
/// user-controlled text (feed titles, article content, etc.) from feeds.
///
/// Strips:
/// - ASCII control chars: 0x00-0x08, 0x0B-0x0C, 0x0E-0x1F, 0x7F
/// - ANSI CSI sequences: `\x1b[` ... (terminal byte 0x40-0x7E)
/// - ANSI OSC sequences: `\x1b]` ... (until BEL 0x07 or ST `\x1b\\`)
/// - Bare ESC (0x1b) not followed by `[` or `]`
///
/// Preserves: tab (0x09), newline (0x0A), carriage return (0x0D).
///
/// Returns `Cow::Borrowed` when the input contains no control characters (common case).
///
/// The fast path (byte scan via `Iterator::any`) makes repeated calls on already-clean
/// content essentially free: a single pass over bytes with no allocation or string building.
pub fn strip_control_chars(s: &str) -> Cow<'_, str> {
    let bytes = s.as_bytes();
    let len = bytes.len();

    // Fast path: scan for any byte that needs stripping
    let needs_strip = bytes
        .iter()
        .any(|&b| b == 0x1b || b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d));

    if !needs_strip {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        let b = bytes[i];

        if b == 0x1b {
            // ESC byte: check what follows
            if i + 1 < len && bytes[i + 1] == b'[' {
                // CSI sequence: skip \x1b[ then parameter/intermediate bytes until final byte
                i += 2;
                while i < len {
                    let c = bytes[i];
                    i += 1;
                    if (0x40..=0x7e).contains(&c) {
                        break; // final byte consumed
                    }
                }
            } else if i + 1 < len && bytes[i + 1] == b']' {
                // OSC sequence: skip \x1b] then everything until BEL or ST (\x1b\\)
                i += 2;
                while i < len {
                    if bytes[i] == 0x07 {
                        i += 1; // consume BEL
                        break;
                    }
                    if bytes[i] == 0x1b && i + 1 < len && bytes[i + 1] == b'\\' {
                        i += 2; // consume ST
                        break;
                    }
                    i += 1;
                }
            } else {
                // Bare ESC, skip it
                i += 1;
            }
        } else if b == 0x7f || (b < 0x20 && b != 0x09 && b != 0x0a && b != 0x0d) {
            // Control character (not tab/newline/CR), skip
            i += 1;
        } else {
            // Safe byte: find the run of safe bytes to batch-copy
            let start = i;
            i += 1;
            while i < len {
                let nb = bytes[i];
                if nb == 0x1b || nb == 0x7f || (nb < 0x20 && nb != 0x09 && nb != 0x0a && nb != 0x0d)
                {
                    break;
                }
                i += 1;
            }
            // SAFETY: we only break on ASCII control bytes, which cannot appear
            // mid-codepoint in valid UTF-8, so s[start..i] is valid UTF-8.
            out.push_str(&s[start..i]);
        }
    }

    Cow::Owned(out)
}
