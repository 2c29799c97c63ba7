// src/report.rs
//! HTML report: one section per topic (declared order), first N items each.

use chrono::{DateTime, Utc};
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;

use crate::classify::{Item, TopicTable};

pub const DEFAULT_REPORT_TITLE: &str = "Weekly Media Update";
pub const DEFAULT_MAX_ITEMS_PER_TOPIC: usize = 5;

/// `M/D/YYYY`, as shown in the header and on each item.
pub fn format_date(ts: DateTime<Utc>) -> String {
    ts.format("%-m/%-d/%Y").to_string()
}

#[derive(Debug, Clone)]
pub struct ReportBuilder {
    title: String,
    tagline: Option<String>,
    max_items_per_topic: usize,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new(DEFAULT_REPORT_TITLE)
    }
}

impl ReportBuilder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            tagline: None,
            max_items_per_topic: DEFAULT_MAX_ITEMS_PER_TOPIC,
        }
    }

    pub fn with_tagline(mut self, tagline: Option<String>) -> Self {
        self.tagline = tagline.filter(|t| !t.trim().is_empty());
        self
    }

    pub fn with_max_items_per_topic(mut self, max: usize) -> Self {
        self.max_items_per_topic = max;
        self
    }

    /// Document title for a run, e.g. `Weekly Media Update - 5/20/2024`.
    pub fn title_for(&self, generated_at: DateTime<Utc>) -> String {
        format!("{} - {}", self.title, format_date(generated_at))
    }

    /// Render the report. Pure: same inputs and `generated_at`, same bytes.
    pub fn build(&self, items: &[Item], topics: &TopicTable, generated_at: DateTime<Utc>) -> String {
        let mut out = String::new();
        let _ = write!(
            out,
            "<h1>{}</h1>\n\n",
            encode_text(&self.title_for(generated_at))
        );
        if let Some(tagline) = &self.tagline {
            let _ = write!(out, "<p><em>{}</em></p>\n\n", encode_text(tagline));
        }

        for topic in topics.topics() {
            let mut section = items
                .iter()
                .filter(|it| it.topic == topic.key)
                .take(self.max_items_per_topic)
                .peekable();
            if section.peek().is_none() {
                continue;
            }

            let _ = write!(out, "<h2>{}</h2>\n\n", encode_text(&topic.display_name));
            for it in section {
                render_item(&mut out, it);
            }
        }
        out
    }
}

fn render_item(out: &mut String, it: &Item) {
    let _ = writeln!(
        out,
        "<h3><a href=\"{}\" target=\"_blank\">{}</a></h3>",
        encode_double_quoted_attribute(&it.url),
        encode_text(&it.title)
    );
    let _ = writeln!(
        out,
        "<p><strong>Source:</strong> {} | <strong>Date:</strong> {}</p>",
        encode_text(&it.source_label),
        format_date(it.published_at)
    );
    let _ = writeln!(out, "<p>{}</p>", encode_text(&it.summary));
    out.push_str("<hr>\n\n");
}
