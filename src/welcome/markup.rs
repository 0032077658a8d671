//! Rendering of page markup into styled terminal text
//!
//! Pages use the small Pango subset the documentation has always been written
//! in: `b`, `i`, `u`, `big`, `small`, `tt`, `span` and `a href`.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use thiserror::Error;

use crate::ui::catppuccin::{color, colors};

#[derive(Error, Debug, PartialEq, Eq)]
pub enum MarkupError {
    #[error("Unterminated tag")]
    UnterminatedTag,

    #[error("Unknown tag <{0}>")]
    UnknownTag(String),

    #[error("Closing </{found}> does not match <{expected}>")]
    Mismatched { expected: String, found: String },

    #[error("Unclosed <{0}>")]
    Unclosed(String),

    #[error("Unknown entity &{0};")]
    UnknownEntity(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Tag {
    Bold,
    Italic,
    Underline,
    Big,
    Small,
    Mono,
    Span,
    Link { href: String, text: String },
}

impl Tag {
    fn open(name: &str, attrs: &str) -> Result<Self, MarkupError> {
        Ok(match name {
            "b" => Tag::Bold,
            "i" => Tag::Italic,
            "u" => Tag::Underline,
            "big" => Tag::Big,
            "small" => Tag::Small,
            "tt" => Tag::Mono,
            "span" => Tag::Span,
            "a" => Tag::Link {
                href: attribute(attrs, "href").unwrap_or_default(),
                text: String::new(),
            },
            other => return Err(MarkupError::UnknownTag(other.to_string())),
        })
    }

    fn name(&self) -> &'static str {
        match self {
            Tag::Bold => "b",
            Tag::Italic => "i",
            Tag::Underline => "u",
            Tag::Big => "big",
            Tag::Small => "small",
            Tag::Mono => "tt",
            Tag::Span => "span",
            Tag::Link { .. } => "a",
        }
    }

    fn apply(&self, style: Style) -> Style {
        match self {
            Tag::Bold => style.add_modifier(Modifier::BOLD),
            Tag::Italic => style.add_modifier(Modifier::ITALIC),
            Tag::Underline => style.add_modifier(Modifier::UNDERLINED),
            Tag::Big => style
                .add_modifier(Modifier::BOLD)
                .fg(color(colors::LAVENDER)),
            Tag::Small => style.add_modifier(Modifier::DIM),
            Tag::Mono => style.fg(color(colors::TEAL)),
            Tag::Span => style,
            Tag::Link { .. } => style
                .add_modifier(Modifier::UNDERLINED)
                .fg(color(colors::BLUE)),
        }
    }
}

/// Value of `name="..."` (or single-quoted) inside a tag's attribute list.
fn attribute(attrs: &str, name: &str) -> Option<String> {
    let mut rest = attrs;
    while let Some(pos) = rest.find(name) {
        let after = rest[pos + name.len()..].trim_start();
        let boundary_ok = pos == 0
            || rest[..pos]
                .chars()
                .last()
                .is_some_and(|c| c.is_whitespace());

        if boundary_ok && let Some(value) = after.strip_prefix('=') {
            let value = value.trim_start();
            let quote = value.chars().next()?;
            if quote == '"' || quote == '\'' {
                let end = value[1..].find(quote)?;
                return Some(value[1..1 + end].to_string());
            }
        }

        rest = &rest[pos + name.len()..];
    }
    None
}

fn decode_entities(text: &str) -> Result<String, MarkupError> {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];
        let end = after
            .find(';')
            .ok_or_else(|| MarkupError::UnknownEntity(after.chars().take(8).collect()))?;
        let name = &after[..end];

        let decoded = match name {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => name
                .strip_prefix("#x")
                .or_else(|| name.strip_prefix("#X"))
                .and_then(|hex| u32::from_str_radix(hex, 16).ok())
                .or_else(|| name.strip_prefix('#').and_then(|dec| dec.parse().ok()))
                .and_then(char::from_u32),
        };

        match decoded {
            Some(c) => out.push(c),
            None => return Err(MarkupError::UnknownEntity(name.to_string())),
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

#[derive(Default)]
struct Builder {
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,
    stack: Vec<Tag>,
}

impl Builder {
    fn style(&self) -> Style {
        self.stack
            .iter()
            .fold(Style::default(), |style, tag| tag.apply(style))
    }

    fn push_text(&mut self, text: &str) {
        let style = self.style();

        for tag in self.stack.iter_mut() {
            if let Tag::Link { text: link_text, .. } = tag {
                link_text.push_str(text);
            }
        }

        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                self.break_line();
            }
            if !part.is_empty() {
                self.current.push(Span::styled(part.to_string(), style));
            }
        }
    }

    fn break_line(&mut self) {
        let spans = std::mem::take(&mut self.current);
        self.lines.push(Line::from(spans));
    }

    fn close(&mut self, name: &str) -> Result<(), MarkupError> {
        let Some(tag) = self.stack.pop() else {
            return Err(MarkupError::Mismatched {
                expected: String::new(),
                found: name.to_string(),
            });
        };

        if tag.name() != name {
            return Err(MarkupError::Mismatched {
                expected: tag.name().to_string(),
                found: name.to_string(),
            });
        }

        if let Tag::Link { href, text } = tag
            && !href.is_empty()
            && text.trim() != href
        {
            self.current.push(Span::styled(
                format!(" ({href})"),
                Style::default().fg(color(colors::SUBTEXT0)),
            ));
        }

        Ok(())
    }

    fn finish(mut self) -> Result<Vec<Line<'static>>, MarkupError> {
        if let Some(tag) = self.stack.last() {
            return Err(MarkupError::Unclosed(tag.name().to_string()));
        }
        self.break_line();
        Ok(self.lines)
    }
}

/// Parse markup into styled lines.
pub fn parse(markup: &str) -> Result<Vec<Line<'static>>, MarkupError> {
    let mut builder = Builder::default();
    let mut rest = markup;

    while let Some(start) = rest.find('<') {
        builder.push_text(&decode_entities(&rest[..start])?);

        let after = &rest[start + 1..];
        let end = after.find('>').ok_or(MarkupError::UnterminatedTag)?;
        let body = after[..end].trim();

        if let Some(name) = body.strip_prefix('/') {
            builder.close(name.trim())?;
        } else {
            let (name, attrs) = body
                .split_once(char::is_whitespace)
                .unwrap_or((body, ""));
            builder.stack.push(Tag::open(name, attrs)?);
        }

        rest = &after[end + 1..];
    }

    builder.push_text(&decode_entities(rest)?);
    builder.finish()
}

/// Render page markup, showing the raw text when it cannot be parsed.
pub fn render(markup: &str) -> Text<'static> {
    match parse(markup) {
        Ok(lines) => Text::from(lines),
        Err(_) => Text::from(markup.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|line| line.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn test_tags_stripped_and_styled() {
        let lines = parse("<b>Welcome</b> to <i>Manjaro</i>").unwrap();
        assert_eq!(plain(&lines), vec!["Welcome to Manjaro"]);

        let spans = &lines[0].spans;
        assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
        assert!(!spans[1].style.add_modifier.contains(Modifier::BOLD));
        assert!(spans[2].style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn test_nested_styles_combine() {
        let lines = parse("<big><b>Title</b></big>").unwrap();
        let style = lines[0].spans[0].style;
        assert!(style.add_modifier.contains(Modifier::BOLD));
        assert_eq!(style.fg, Some(color(colors::LAVENDER)));
    }

    #[test]
    fn test_newlines_become_lines() {
        let lines = parse("one\n\n<b>two\nthree</b>").unwrap();
        assert_eq!(plain(&lines), vec!["one", "", "two", "three"]);
        assert!(
            lines[3].spans[0]
                .style
                .add_modifier
                .contains(Modifier::BOLD)
        );
    }

    #[test]
    fn test_entities_decoded() {
        let lines = parse("a &amp; b &lt;c&gt; &quot;d&quot; &apos;e&apos; &#65;&#x42;").unwrap();
        assert_eq!(plain(&lines), vec!["a & b <c> \"d\" 'e' AB"]);
    }

    #[test]
    fn test_link_target_appended() {
        let lines = parse("see <a href=\"https://wiki.manjaro.org\">the wiki</a>.").unwrap();
        assert_eq!(
            plain(&lines),
            vec!["see the wiki (https://wiki.manjaro.org)."]
        );

        let lines = parse("<a href='https://x.org'>https://x.org</a>").unwrap();
        assert_eq!(plain(&lines), vec!["https://x.org"]);
    }

    #[test]
    fn test_span_attributes_ignored() {
        let lines = parse("<span foreground=\"red\" size=\"large\">hi</span>").unwrap();
        assert_eq!(plain(&lines), vec!["hi"]);
    }

    #[test]
    fn test_errors() {
        assert_eq!(
            parse("<blink>x</blink>"),
            Err(MarkupError::UnknownTag("blink".into()))
        );
        assert!(matches!(
            parse("<b>x</i>"),
            Err(MarkupError::Mismatched { .. })
        ));
        assert_eq!(parse("<b>x"), Err(MarkupError::Unclosed("b".into())));
        assert_eq!(parse("x <b"), Err(MarkupError::UnterminatedTag));
        assert!(matches!(
            parse("AT&T rocks"),
            Err(MarkupError::UnknownEntity(_))
        ));
    }

    #[test]
    fn test_render_falls_back_to_raw_text() {
        let text = render("<b>broken");
        assert_eq!(text.lines.len(), 1);
        assert_eq!(text.lines[0].spans[0].content, "<b>broken");
    }

    #[test]
    fn test_attribute_lookup() {
        assert_eq!(
            attribute(" href=\"u\" data-href=\"v\"", "href").as_deref(),
            Some("u")
        );
        assert_eq!(
            attribute(" data-href=\"v\"", "href"),
            None
        );
    }
}
