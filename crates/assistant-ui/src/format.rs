//! Answer text → renderable segments.
//!
//! The chat service answers in a loose markdown dialect:
//! - `[videoN]` markers that refer to the turn's `video_links`
//! - `****timestamp****` placeholders in front of those markers
//! - numbered items written as `1. **Title**: body`
//! - headings written as `## **Title**`
//!
//! Anything else is passed through as plain text, one paragraph per line.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Video { marker: String, url: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Paragraph(Vec<Inline>),
    Heading { level: usize, title: String },
    ListItem {
        number: String,
        /// Includes the trailing colon when the answer had one
        title: String,
        body: Vec<Inline>,
    },
}

fn timestamp_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\*\*\*\*timestamp\*\*\*\*\s*(\[video\d+\])").expect("invalid timestamp regex")
    })
}

fn video_marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[video\d+\]").expect("invalid video marker regex"))
}

fn list_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\s*(\d+)\.\s*\*\*(.*?)\*\*(:?)\s*[-\s]*(.+)$").expect("invalid list item regex")
    })
}

fn heading_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(#{1,6})\s*\*\*(.*?)\*\*(.*)$").expect("invalid heading regex"))
}

fn youtube_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^.*(youtu\.be/|v/|u/\w/|embed/|watch\?v=|&v=)([^#&?]*).*")
            .expect("invalid youtube regex")
    })
}

/// Split an answer into segments. `[videoN]` markers with an entry in
/// `video_links` become links; unknown markers stay as text.
pub fn format_answer(text: &str, video_links: &BTreeMap<String, String>) -> Vec<Segment> {
    let cleaned = timestamp_re().replace_all(text, "$1");

    cleaned
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            if let Some(caps) = heading_re().captures(line) {
                let title = format!("{}{}", &caps[2], &caps[3]);
                return Segment::Heading {
                    level: caps[1].len(),
                    title: title.trim().to_string(),
                };
            }
            if let Some(caps) = list_item_re().captures(line) {
                return Segment::ListItem {
                    number: caps[1].to_string(),
                    title: format!("{}{}", &caps[2], &caps[3]),
                    body: split_inline(&caps[4], video_links),
                };
            }
            Segment::Paragraph(split_inline(line.trim(), video_links))
        })
        .collect()
}

fn split_inline(text: &str, video_links: &BTreeMap<String, String>) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut last = 0;

    for m in video_marker_re().find_iter(text) {
        let Some(url) = video_links.get(m.as_str()) else {
            continue;
        };
        plain.push_str(&text[last..m.start()]);
        if !plain.is_empty() {
            out.push(Inline::Text(std::mem::take(&mut plain)));
        }
        out.push(Inline::Video {
            marker: m.as_str().to_string(),
            url: url.clone(),
        });
        last = m.end();
    }

    plain.push_str(&text[last..]);
    if !plain.is_empty() {
        out.push(Inline::Text(plain));
    }
    out
}

/// The 11-character video id of a YouTube URL (`watch?v=`, `youtu.be/`,
/// `embed/`, `v/`, ...), or `None` for anything else.
pub fn youtube_video_id(url: &str) -> Option<&str> {
    let caps = youtube_re().captures(url)?;
    let id = caps.get(2)?.as_str();
    (id.len() == 11).then_some(id)
}

pub fn youtube_watch_url(video_id: &str) -> String {
    format!("https://www.youtube.com/watch?v={}", video_id)
}
