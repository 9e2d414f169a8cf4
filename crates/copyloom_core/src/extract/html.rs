//! Minimal HTML fragment scanner for plain-text extraction.
//!
//! # Responsibility
//! - Convert inline-markup block content into plain text.
//! - Map `<br>` to a newline and closing `</p>`/`</div>` to a trailing
//!   newline; strip every other tag.
//!
//! # Invariants
//! - Total: malformed markup degrades to best-effort text, never an error.
//! - A `<` that does not open markup stays in the output literally.

/// Outcome of scanning one markup construct starting at `<`.
enum Markup {
    /// Comment, doctype or processing instruction. Contributes no text.
    Skip { end: usize },
    /// Ordinary tag. `end` is one past the closing `>` (or input end).
    Tag {
        name: String,
        closing: bool,
        end: usize,
    },
}

/// Converts an HTML fragment to plain text.
///
/// Rules:
/// - `<br>` in any casing, with or without `/`, becomes `\n`.
/// - `</p>` and `</div>` each become `\n` after their content.
/// - `<script>`/`<style>` bodies are dropped together with their tags.
/// - Comments and `<!...>`/`<?...>` constructs are dropped.
/// - Character entities are decoded; unknown ones stay literal.
/// - All other tags are removed without replacement.
///
/// The result is not trimmed; callers own the final whitespace policy.
pub(crate) fn html_fragment_to_text(input: &str) -> String {
    let chars: Vec<char> = input.chars().collect();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '<' => match scan_markup(&chars, i) {
                Some(Markup::Skip { end }) => i = end,
                Some(Markup::Tag { name, closing, end }) => {
                    i = end;
                    if name == "br" {
                        out.push('\n');
                    } else if closing && (name == "p" || name == "div") {
                        out.push('\n');
                    } else if !closing && (name == "script" || name == "style") {
                        i = skip_raw_text(&chars, i, &name);
                    }
                }
                None => {
                    out.push('<');
                    i += 1;
                }
            },
            '&' => {
                let (text, end) = decode_entity(&chars, i);
                out.push_str(&text);
                i = end;
            }
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    out
}

/// Scans the markup construct starting at `chars[start] == '<'`.
///
/// Returns `None` when the `<` does not open markup and must stay literal.
/// Unterminated constructs are swallowed to the end of input.
fn scan_markup(chars: &[char], start: usize) -> Option<Markup> {
    let next = *chars.get(start + 1)?;

    if next == '!' || next == '?' {
        if chars[start + 1..].starts_with(&['!', '-', '-']) {
            let end = find_seq(chars, start + 4, &['-', '-', '>'])
                .map(|at| at + 3)
                .unwrap_or(chars.len());
            return Some(Markup::Skip { end });
        }
        let end = find_char(chars, start + 2, '>')
            .map(|at| at + 1)
            .unwrap_or(chars.len());
        return Some(Markup::Skip { end });
    }

    let closing = next == '/';
    let mut i = if closing { start + 2 } else { start + 1 };

    let name_start = i;
    while i < chars.len() && (chars[i].is_ascii_alphanumeric() || chars[i] == '-') {
        i += 1;
    }
    if i == name_start {
        return None;
    }
    let name: String = chars[name_start..i]
        .iter()
        .collect::<String>()
        .to_ascii_lowercase();

    // Attribute values may contain '>' when quoted.
    let mut quote: Option<char> = None;
    while i < chars.len() {
        let c = chars[i];
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => {}
            None if c == '"' || c == '\'' => quote = Some(c),
            None if c == '>' => {
                return Some(Markup::Tag {
                    name,
                    closing,
                    end: i + 1,
                });
            }
            None => {}
        }
        i += 1;
    }

    Some(Markup::Tag {
        name,
        closing,
        end: chars.len(),
    })
}

/// Skips raw text after an opening `<script>`/`<style>` tag.
///
/// Returns the index one past the matching close tag's `>`, or the end of
/// input when no close tag exists.
fn skip_raw_text(chars: &[char], from: usize, name: &str) -> usize {
    let close: Vec<char> = format!("</{name}").chars().collect();
    let mut i = from;
    while i + close.len() <= chars.len() {
        let hit = chars[i..i + close.len()]
            .iter()
            .zip(close.iter())
            .all(|(a, b)| a.eq_ignore_ascii_case(b));
        if hit {
            return find_char(chars, i + close.len(), '>')
                .map(|at| at + 1)
                .unwrap_or(chars.len());
        }
        i += 1;
    }
    chars.len()
}

/// Decodes the character entity starting at `chars[start] == '&'`.
///
/// Returns the decoded text and the index to resume at. Unknown or
/// malformed entities come back literally, one `&` at a time.
fn decode_entity(chars: &[char], start: usize) -> (String, usize) {
    const MAX_ENTITY_LEN: usize = 32;

    let semi = chars[start + 1..]
        .iter()
        .take(MAX_ENTITY_LEN)
        .position(|&c| c == ';')
        .map(|off| start + 1 + off);
    let Some(semi) = semi else {
        return ("&".to_string(), start + 1);
    };

    let body: String = chars[start + 1..semi].iter().collect();
    let decoded = match body.as_str() {
        "amp" => Some('&'),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "nbsp" => Some(' '),
        _ => decode_numeric_entity(&body),
    };

    match decoded {
        Some(c) => (c.to_string(), semi + 1),
        None => ("&".to_string(), start + 1),
    }
}

/// Decodes `#N` (decimal) or `#xN` (hex) entity bodies.
fn decode_numeric_entity(body: &str) -> Option<char> {
    let digits = body.strip_prefix('#')?;
    let value = if let Some(hex) = digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        u32::from_str_radix(hex, 16).ok()?
    } else {
        digits.parse::<u32>().ok()?
    };
    char::from_u32(value)
}

fn find_char(chars: &[char], from: usize, target: char) -> Option<usize> {
    chars[from..].iter().position(|&c| c == target).map(|off| from + off)
}

fn find_seq(chars: &[char], from: usize, seq: &[char]) -> Option<usize> {
    if seq.is_empty() || chars.len() < seq.len() {
        return None;
    }
    (from..=chars.len() - seq.len()).find(|&at| chars[at..at + seq.len()].starts_with(seq))
}

#[cfg(test)]
mod tests {
    use super::html_fragment_to_text;

    #[test]
    fn br_becomes_newline_in_any_casing() {
        assert_eq!(html_fragment_to_text("a<br>b"), "a\nb");
        assert_eq!(html_fragment_to_text("a<br/>b"), "a\nb");
        assert_eq!(html_fragment_to_text("a<BR >b"), "a\nb");
        assert_eq!(html_fragment_to_text("a<br class=\"x\">b"), "a\nb");
    }

    #[test]
    fn closing_paragraph_and_div_add_trailing_newline() {
        assert_eq!(html_fragment_to_text("<p>Hello<br>World</p>"), "Hello\nWorld\n");
        assert_eq!(html_fragment_to_text("<div>a</div><div>b</div>"), "a\nb\n");
    }

    #[test]
    fn opening_containers_contribute_nothing() {
        assert_eq!(html_fragment_to_text("<p>x"), "x");
        assert_eq!(html_fragment_to_text("<div class='hero'>x"), "x");
    }

    #[test]
    fn unknown_tags_are_stripped() {
        assert_eq!(html_fragment_to_text("<strong>bold</strong> and <em>em</em>"), "bold and em");
        assert_eq!(html_fragment_to_text("<span data-x=\"1\">s</span>"), "s");
    }

    #[test]
    fn quoted_attribute_may_contain_angle_bracket() {
        assert_eq!(html_fragment_to_text("<a href=\"/x?a>b\">link</a>"), "link");
        assert_eq!(html_fragment_to_text("<a title='a>b'>t</a>"), "t");
    }

    #[test]
    fn comments_and_directives_are_dropped() {
        assert_eq!(html_fragment_to_text("a<!-- hidden -->b"), "ab");
        assert_eq!(html_fragment_to_text("<!-- <p>no</p> -->x"), "x");
        assert_eq!(html_fragment_to_text("<!DOCTYPE html>x"), "x");
        assert_eq!(html_fragment_to_text("<?xml version=\"1.0\"?>x"), "x");
    }

    #[test]
    fn script_and_style_bodies_are_dropped() {
        assert_eq!(html_fragment_to_text("a<script>let x = 1;</script>b"), "ab");
        assert_eq!(html_fragment_to_text("a<style>.c { color: red }</style>b"), "ab");
        assert_eq!(html_fragment_to_text("a<SCRIPT>x</SCRIPT>b"), "ab");
    }

    #[test]
    fn entities_are_decoded() {
        assert_eq!(html_fragment_to_text("Tom &amp; Jerry"), "Tom & Jerry");
        assert_eq!(html_fragment_to_text("1 &lt; 2 &gt; 0"), "1 < 2 > 0");
        assert_eq!(html_fragment_to_text("&quot;hi&quot; &apos;yo&apos;"), "\"hi\" 'yo'");
        assert_eq!(html_fragment_to_text("a&nbsp;b"), "a b");
        assert_eq!(html_fragment_to_text("&#39;s"), "'s");
        assert_eq!(html_fragment_to_text("&#x2022; dot"), "\u{2022} dot");
    }

    #[test]
    fn unknown_entities_stay_literal() {
        assert_eq!(html_fragment_to_text("&bogus; &"), "&bogus; &");
        assert_eq!(html_fragment_to_text("&#xZZ;"), "&#xZZ;");
        assert_eq!(html_fragment_to_text("100 & counting"), "100 & counting");
    }

    #[test]
    fn stray_angle_bracket_stays_literal() {
        assert_eq!(html_fragment_to_text("1 < 2"), "1 < 2");
        assert_eq!(html_fragment_to_text("a <= b"), "a <= b");
        assert_eq!(html_fragment_to_text("tail<"), "tail<");
    }

    #[test]
    fn unterminated_tag_is_swallowed() {
        assert_eq!(html_fragment_to_text("keep<span class=\"x"), "keep");
        assert_eq!(html_fragment_to_text("keep<!-- open"), "keep");
        assert_eq!(html_fragment_to_text("keep<script>gone"), "keep");
    }

    #[test]
    fn plain_text_passes_through() {
        assert_eq!(html_fragment_to_text("no markup here"), "no markup here");
        assert_eq!(html_fragment_to_text(""), "");
    }
}
