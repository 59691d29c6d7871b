//! Callout → admonition state machine.
//!
//! Obsidian callouts are blockquotes whose first line carries a `[!type]` tag:
//!
//! ```text
//! > [!note] Heads up          :::note Heads up
//! > line one           →      line one
//! > line two                  line two
//!                             :::
//! ```
//!
//! | State | Line | Emits | Next |
//! |---|---|---|---|
//! | Normal | `> [!quote]` | nothing | Quote |
//! | Normal | `> [!t]`, `t` unsupported | line unchanged | Normal |
//! | Normal | `> [!t] Title` | `:::t Title` | Admonition |
//! | Admonition | blank | `:::` + blank line | Normal |
//! | Admonition | other | line minus `indent` chars | Admonition |
//! | Quote | contains `-` | `> ` line, then line with `-` → `—` | Normal |
//! | Quote | other | line unchanged | Quote |

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `>`, anything without `[`, then `[!type]`, an optional fold marker and title.
static CALLOUT_OPENER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^>(?P<pad>[^\[]*)\[!(?P<kind>[^\]\s]+)\][+-]?\s*(?P<title>.*)$")
        .expect("callout opener pattern")
});

/// Block-level state carried from one line to the next.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BlockState {
    #[default]
    Normal,
    /// Inside a converted callout. `indent` is the number of characters from
    /// `>` up to `[` on the opening line, stripped from every body line.
    Admonition { indent: usize },
    /// Inside a `[!quote]` callout.
    Quote,
}

/// A parsed callout opening line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalloutOpener<'a> {
    pub kind: &'a str,
    pub title: Option<&'a str>,
    pub indent: usize,
}

/// Parse `> [!type] Title`. Returns `None` for any other line.
pub fn parse_callout_opener(line: &str) -> Option<CalloutOpener<'_>> {
    let caps = CALLOUT_OPENER.captures(line)?;
    let pad = caps.name("pad").map_or("", |m| m.as_str());
    let kind = caps.name("kind")?.as_str();
    let title = caps
        .name("title")
        .map(|m| m.as_str().trim())
        .filter(|t| !t.is_empty());
    Some(CalloutOpener {
        kind,
        title,
        indent: 1 + pad.chars().count(),
    })
}

/// Drop the first `count` characters of `line`.
fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}

/// Run one line through the state machine.
///
/// `supported` holds lowercase admonition type names. `None` means the line
/// produces no output at all. A returned chunk may span several lines.
pub fn process_line<'a>(
    line: &'a str,
    state: &mut BlockState,
    supported: &[String],
) -> Option<Cow<'a, str>> {
    match *state {
        BlockState::Admonition { indent } => {
            if line.trim().is_empty() {
                *state = BlockState::Normal;
                Some(Cow::Borrowed(":::\n"))
            } else {
                Some(Cow::Borrowed(skip_chars(line, indent)))
            }
        }
        BlockState::Quote => {
            if line.contains('-') {
                *state = BlockState::Normal;
                Some(Cow::Owned(format!("> \n{}", line.replace('-', "—"))))
            } else {
                Some(Cow::Borrowed(line))
            }
        }
        BlockState::Normal => {
            let Some(opener) = parse_callout_opener(line) else {
                return Some(Cow::Borrowed(line));
            };
            let kind = opener.kind.to_lowercase();
            if kind == "quote" {
                *state = BlockState::Quote;
                return None;
            }
            if !supported.iter().any(|s| *s == kind) {
                return Some(Cow::Borrowed(line));
            }
            *state = BlockState::Admonition {
                indent: opener.indent,
            };
            Some(Cow::Owned(match opener.title {
                Some(title) => format!(":::{kind} {title}"),
                None => format!(":::{kind}"),
            }))
        }
    }
}

/// Closing output for a file that ends while a block is still open.
pub fn flush(state: BlockState) -> Option<&'static str> {
    match state {
        BlockState::Admonition { .. } => Some(":::"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supported() -> Vec<String> {
        ["note", "tip", "info", "caution", "danger"]
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    fn run(lines: &[&str]) -> (Vec<String>, BlockState) {
        let mut state = BlockState::Normal;
        let out = lines
            .iter()
            .filter_map(|l| process_line(l, &mut state, &supported()).map(|c| c.into_owned()))
            .collect();
        (out, state)
    }

    #[test]
    fn opener_with_title() {
        let opener = parse_callout_opener("> [!note] Heads up").unwrap();
        assert_eq!(opener.kind, "note");
        assert_eq!(opener.title, Some("Heads up"));
        assert_eq!(opener.indent, 2);
    }

    #[test]
    fn opener_without_title() {
        let opener = parse_callout_opener(">[!tip]").unwrap();
        assert_eq!(opener.title, None);
        assert_eq!(opener.indent, 1);
    }

    #[test]
    fn opener_with_fold_marker() {
        let opener = parse_callout_opener("> [!info]- Folded").unwrap();
        assert_eq!(opener.kind, "info");
        assert_eq!(opener.title, Some("Folded"));
    }

    #[test]
    fn opener_title_without_space() {
        let opener = parse_callout_opener("> [!note]Heads up").unwrap();
        assert_eq!(opener.kind, "note");
        assert_eq!(opener.title, Some("Heads up"));
        let (out, _) = run(&["> [!note]Heads up", "> body", ""]);
        assert_eq!(out, vec![":::note Heads up", "body", ":::\n"]);
    }

    #[test]
    fn opener_requires_leading_marker() {
        assert!(parse_callout_opener("text [!note]").is_none());
        assert!(parse_callout_opener("> plain quote").is_none());
    }

    #[test]
    fn admonition_block_is_fenced() {
        let (out, state) = run(&["> [!note] Heads up", "> line one", "> line two", ""]);
        assert_eq!(out, vec![":::note Heads up", "line one", "line two", ":::\n"]);
        assert_eq!(state, BlockState::Normal);
    }

    #[test]
    fn indent_follows_opening_line() {
        let (out, _) = run(&[">   [!tip]", ">   deep", ""]);
        assert_eq!(out, vec![":::tip", "deep", ":::\n"]);
    }

    #[test]
    fn type_match_is_case_insensitive() {
        let (out, _) = run(&["> [!NOTE] Loud", "> body", ""]);
        assert_eq!(out[0], ":::note Loud");
    }

    #[test]
    fn unsupported_type_passes_through() {
        let lines = ["> [!weird] title", "> body", "> more"];
        let (out, state) = run(&lines);
        assert_eq!(out, lines);
        assert_eq!(state, BlockState::Normal);
    }

    #[test]
    fn quote_callout_attribution() {
        let (out, state) = run(&["> [!quote]", "> To be or not", "> - Someone"]);
        assert_eq!(out, vec!["> To be or not", "> \n> — Someone"]);
        assert_eq!(state, BlockState::Normal);
    }

    #[test]
    fn quote_without_hyphen_stays_open() {
        let (_, state) = run(&["> [!quote]", "> words"]);
        assert_eq!(state, BlockState::Quote);
    }

    #[test]
    fn open_admonition_flushes_fence() {
        let (_, state) = run(&["> [!danger]", "> careful"]);
        assert_eq!(flush(state), Some(":::"));
        assert_eq!(flush(BlockState::Normal), None);
        assert_eq!(flush(BlockState::Quote), None);
    }

    #[test]
    fn short_body_line_becomes_empty() {
        let (out, _) = run(&["> [!note]", ">", "> x", ""]);
        assert_eq!(out, vec![":::note", "", "x", ":::\n"]);
    }
}
