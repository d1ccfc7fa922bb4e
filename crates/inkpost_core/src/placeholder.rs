//! Placeholder tokens standing in for not-yet-uploaded media inside draft markup.
//!
//! A token reads `[IMAGE: cat.png]` or `[VIDEO: clip.mp4]`. When appended to a
//! draft it is wrapped in its own paragraph block, `<p>[IMAGE: cat.png]<br/></p>`.
//! Rich-text editors rewrite the space after the colon as `&nbsp;`, so lookups
//! accept both spellings of the separator.

use crate::media::MediaKind;

pub const NBSP_ENTITY: &str = "&nbsp;";

const SEPARATORS: [&str; 2] = [" ", NBSP_ENTITY];

/// Normalizes a file name for use inside a token: whitespace runs become `_`.
pub fn sanitize_file_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut in_whitespace = false;
    for c in name.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push('_');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    if out.is_empty() {
        out.push_str("untitled");
    }
    out
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    kind: MediaKind,
    name: String,
}

impl Placeholder {
    /// Builds a placeholder from a raw file name.
    pub fn for_file(kind: MediaKind, file_name: &str) -> Self {
        Self {
            kind,
            name: sanitize_file_name(file_name),
        }
    }

    /// Builds a placeholder for `file_name`, appending `_2`, `_3`, ... before the
    /// extension until `is_taken` no longer reports a collision.
    pub fn unique(kind: MediaKind, file_name: &str, is_taken: impl Fn(&Placeholder) -> bool) -> Self {
        let base = Self::for_file(kind, file_name);
        if !is_taken(&base) {
            return base;
        }
        let (stem, ext) = split_extension(&base.name);
        let (stem, ext) = (stem.to_string(), ext.to_string());
        (2u32..)
            .map(|n| Self {
                kind,
                name: format!("{stem}_{n}{ext}"),
            })
            .find(|candidate| !is_taken(candidate))
            .unwrap_or(base)
    }

    pub fn kind(&self) -> MediaKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical token text, e.g. `[IMAGE: cat.png]`.
    pub fn token(&self) -> String {
        format!("[{}: {}]", self.kind.token_tag(), self.name)
    }

    /// Paragraph block appended to the draft when the file is selected.
    pub fn block(&self) -> String {
        format!("<p>{}<br/></p>", self.token())
    }

    fn variants(&self) -> [String; 2] {
        SEPARATORS.map(|sep| format!("[{}:{sep}{}]", self.kind.token_tag(), self.name))
    }

    pub fn occurs_in(&self, content: &str) -> bool {
        self.variants().iter().any(|v| content.contains(v.as_str()))
    }

    /// Removes every occurrence of this token together with its enclosing
    /// `<p ...>...</p>` block. Tokens outside a block are removed on their own.
    pub fn strip_block(&self, content: &str) -> String {
        let mut out = content.to_string();
        for variant in self.variants() {
            while let Some(start) = out.find(variant.as_str()) {
                let end = start + variant.len();
                let range = enclosing_block(&out, start, end).unwrap_or((start, end));
                out.replace_range(range.0..range.1, "");
            }
        }
        out
    }

    /// Replaces every occurrence of the token with `element`, returning the new
    /// content and the number of replacements.
    pub fn substitute(&self, content: &str, element: &str) -> (String, usize) {
        let mut out = content.to_string();
        let mut replaced = 0;
        for variant in self.variants() {
            let hits = out.matches(variant.as_str()).count();
            if hits > 0 {
                out = out.replace(variant.as_str(), element);
                replaced += hits;
            }
        }
        (out, replaced)
    }
}

/// Finds `<p[^>]*>` immediately before `start` and the first `</p>` after `end`.
fn enclosing_block(content: &str, start: usize, end: usize) -> Option<(usize, usize)> {
    let before = &content[..start];
    let tag_start = before.rfind('<')?;
    let tag = &before[tag_start..];
    let is_paragraph_open = tag.ends_with('>')
        && tag[..tag.len() - 1].find('>').is_none()
        && tag
            .strip_prefix("<p")
            .and_then(|rest| rest.chars().next())
            .is_some_and(|c| c == '>' || c.is_whitespace());
    if !is_paragraph_open {
        return None;
    }
    let close = content[end..].find("</p>")?;
    Some((tag_start, end + close + "</p>".len()))
}

fn split_extension(name: &str) -> (&str, &str) {
    match name.rfind('.') {
        Some(idx) if idx > 0 => (&name[..idx], &name[idx..]),
        _ => (name, ""),
    }
}

/// Counts placeholder tokens of either kind left in `content`.
pub fn count_placeholders(content: &str) -> usize {
    [MediaKind::Image, MediaKind::Video]
        .iter()
        .map(|kind| {
            let opener = format!("[{}:", kind.token_tag());
            content
                .match_indices(opener.as_str())
                .filter(|(idx, _)| {
                    let rest = &content[idx + opener.len()..];
                    SEPARATORS
                        .iter()
                        .find_map(|sep| rest.strip_prefix(sep))
                        .and_then(|name| name.find(']').map(|close| &name[..close]))
                        .is_some_and(|name| !name.is_empty() && !name.contains(['[', '<']))
                })
                .count()
        })
        .sum()
}

/// Markup for an uploaded media file embedded in published content.
pub fn media_element(kind: MediaKind, url: &str) -> String {
    let src = escape_attr(url);
    match kind {
        MediaKind::Image => format!(r#"<img src="{src}" />"#),
        MediaKind::Video => format!(r#"<video src="{src}" controls></video>"#),
    }
}

fn escape_attr(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}
