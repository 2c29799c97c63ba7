// src/ingest/parse.rs
//! Feed document shapes (RSS 2.0 channel/item and Atom feed/entry) and their
//! conversion into [`RawItem`]. The shapes never leave this module.

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use quick_xml::de::from_str;
use quick_xml::events::Event;
use quick_xml::Reader;
use regex::{Captures, Regex};
use serde::Deserialize;

use crate::ingest::types::RawItem;
use crate::ingest::{clean_summary, clean_title};

/// Element text, tolerant of attributes such as Atom's `type="html"`.
#[derive(Debug, Default, Deserialize)]
struct TextNode {
    #[serde(rename = "$text", default)]
    value: String,
}

/// `<link>` as plain text (RSS) or as an `href` attribute (Atom).
#[derive(Debug, Default, Deserialize)]
struct LinkNode {
    #[serde(rename = "@href", default)]
    href: Option<String>,
    #[serde(rename = "@rel", default)]
    rel: Option<String>,
    #[serde(rename = "$text", default)]
    text: Option<String>,
}

impl LinkNode {
    fn target(&self) -> Option<&str> {
        self.href
            .as_deref()
            .or(self.text.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    fn is_alternate(&self) -> bool {
        matches!(self.rel.as_deref(), None | Some("alternate"))
    }
}

#[derive(Debug, Deserialize)]
struct RssDocument {
    #[serde(default)]
    channel: Option<RssChannel>,
}

#[derive(Debug, Default, Deserialize)]
struct RssChannel {
    #[serde(rename = "item", default)]
    items: Vec<RssItem>,
}

// Text fields are lists: the deserializer ignores namespace prefixes, so
// `<media:title>` or `<itunes:summary>` land next to the plain element.
#[derive(Debug, Deserialize)]
struct RssItem {
    #[serde(default)]
    title: Vec<TextNode>,
    #[serde(default)]
    description: Vec<TextNode>,
    #[serde(default)]
    link: Vec<LinkNode>,
    #[serde(rename = "pubDate", default)]
    pub_date: Vec<TextNode>,
}

#[derive(Debug, Deserialize)]
struct AtomDocument {
    #[serde(rename = "entry", default)]
    entries: Vec<AtomEntry>,
}

#[derive(Debug, Deserialize)]
struct AtomEntry {
    #[serde(default)]
    title: Vec<TextNode>,
    #[serde(default)]
    summary: Vec<TextNode>,
    #[serde(default)]
    content: Vec<TextNode>,
    #[serde(default)]
    link: Vec<LinkNode>,
    #[serde(default)]
    published: Vec<TextNode>,
    #[serde(default)]
    updated: Vec<TextNode>,
}

/// A raw entry of either shape, resolved once into a [`RawItem`].
#[derive(Debug)]
enum Entry {
    Rss(RssItem),
    Atom(AtomEntry),
}

impl Entry {
    fn into_raw(self, fetched_at: DateTime<Utc>) -> RawItem {
        match self {
            Entry::Rss(it) => RawItem {
                title: clean_title(text_of(&it.title)),
                summary: clean_summary(text_of(&it.description)),
                url: pick_link(&it.link),
                published_at: first_timestamp(&[&it.pub_date]).unwrap_or(fetched_at),
            },
            Entry::Atom(e) => RawItem {
                title: clean_title(text_of(&e.title)),
                summary: clean_summary(text_of(&e.summary).or(text_of(&e.content))),
                url: pick_link(&e.link),
                published_at: first_timestamp(&[&e.published, &e.updated])
                    .unwrap_or(fetched_at),
            },
        }
    }
}

/// First non-blank text among same-named siblings.
fn text_of(nodes: &[TextNode]) -> Option<&str> {
    nodes
        .iter()
        .map(|n| n.value.as_str())
        .find(|s| !s.trim().is_empty())
}

fn pick_link(links: &[LinkNode]) -> String {
    links
        .iter()
        .filter(|l| l.is_alternate())
        .find_map(LinkNode::target)
        .or_else(|| links.iter().find_map(LinkNode::target))
        .unwrap_or_default()
        .to_string()
}

fn first_timestamp(candidates: &[&Vec<TextNode>]) -> Option<DateTime<Utc>> {
    candidates
        .iter()
        .find_map(|node| text_of(node))
        .and_then(parse_timestamp)
}

/// Parse RFC 2822 (`pubDate`) or RFC 3339 (`published`/`updated`) into UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc2822(raw)
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Parse a feed body. The root element picks the shape: `<rss>` for RSS 2.0,
/// `<feed>` for Atom; anything else (an HTML error page, say) is an error.
/// At most `limit` entries are returned, in document order.
pub fn parse_feed(body: &str, fetched_at: DateTime<Utc>, limit: usize) -> Result<Vec<RawItem>> {
    let xml = scrub_html_entities_for_xml(body);

    let entries: Vec<Entry> = match root_element(&xml)?.as_str() {
        "rss" => from_str::<RssDocument>(&xml)
            .context("parsing rss document")?
            .channel
            .unwrap_or_default()
            .items
            .into_iter()
            .map(Entry::Rss)
            .collect(),
        "feed" => from_str::<AtomDocument>(&xml)
            .context("parsing atom document")?
            .entries
            .into_iter()
            .map(Entry::Atom)
            .collect(),
        other => bail!("not a feed document: root element <{other}>"),
    };

    Ok(entries
        .into_iter()
        .take(limit)
        .map(|e| e.into_raw(fetched_at))
        .collect())
}

/// Local name of the document's first element, prefix dropped.
fn root_element(xml: &str) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    loop {
        match reader.read_event().context("reading feed xml")? {
            Event::Start(e) | Event::Empty(e) => {
                return Ok(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Event::Eof => bail!("empty feed document"),
            _ => {}
        }
    }
}

/// Named HTML entities are not valid XML; feeds use them anyway. Known names
/// become numeric character references, unknown ones get their `&` escaped.
fn scrub_html_entities_for_xml(s: &str) -> String {
    static RE_ENTITY: OnceCell<Regex> = OnceCell::new();
    let re = RE_ENTITY
        .get_or_init(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]*);").expect("entity regex"));

    re.replace_all(s, |caps: &Captures| {
        let whole = &caps[0];
        if matches!(&caps[1], "amp" | "lt" | "gt" | "quot" | "apos") {
            return whole.to_string();
        }
        let decoded = html_escape::decode_html_entities(whole);
        if decoded == whole {
            format!("&amp;{}", &whole[1..])
        } else {
            decoded.chars().map(|c| format!("&#{};", c as u32)).collect()
        }
    })
    .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fetched() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 20, 12, 0, 0).unwrap()
    }

    #[test]
    fn rss_items_are_normalized() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0"><channel><title>T</title>
  <item>
    <title>Hello &amp; welcome</title>
    <link>https://example.test/a</link>
    <description><![CDATA[<p>Body <b>text</b></p>]]></description>
    <pubDate>Mon, 20 May 2024 08:00:00 GMT</pubDate>
  </item>
</channel></rss>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Hello & welcome");
        assert_eq!(items[0].summary, "Body text");
        assert_eq!(items[0].url, "https://example.test/a");
        assert_eq!(
            items[0].published_at,
            Utc.with_ymd_and_hms(2024, 5, 20, 8, 0, 0).unwrap()
        );
    }

    #[test]
    fn atom_prefers_alternate_href() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom">
  <entry>
    <title type="html">Atom entry</title>
    <link rel="self" href="https://example.test/self"/>
    <link rel="alternate" href="https://example.test/post"/>
    <summary>Short</summary>
    <published>2024-05-19T10:00:00Z</published>
  </entry>
</feed>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Atom entry");
        assert_eq!(items[0].url, "https://example.test/post");
        assert_eq!(
            items[0].published_at,
            Utc.with_ymd_and_hms(2024, 5, 19, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn missing_or_bad_dates_default_to_fetch_time() {
        let xml = r#"<rss><channel>
  <item><title>a</title><pubDate>not a date</pubDate></item>
  <item><title>b</title></item>
</channel></rss>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items.len(), 2);
        assert!(items.iter().all(|i| i.published_at == fetched()));
        assert!(items.iter().all(|i| i.url.is_empty()));
    }

    #[test]
    fn missing_title_gets_placeholder() {
        let xml = r#"<rss><channel><item><description>only body</description></item></channel></rss>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items[0].title, crate::ingest::UNTITLED);
    }

    #[test]
    fn cap_keeps_document_order() {
        let mut xml = String::from("<rss><channel>");
        for i in 0..8 {
            xml.push_str(&format!("<item><title>n{i}</title></item>"));
        }
        xml.push_str("</channel></rss>");
        let items = parse_feed(&xml, fetched(), 5).unwrap();
        let titles: Vec<_> = items.iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, vec!["n0", "n1", "n2", "n3", "n4"]);
    }

    #[test]
    fn html_entities_do_not_break_xml() {
        let xml = r#"<rss><channel><item><title>A&nbsp;B &mdash; C &bogus;</title></item></channel></rss>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items[0].title, "A B \u{2014} C &bogus;");
    }

    #[test]
    fn empty_channel_is_ok() {
        let xml = r#"<rss version="2.0"><channel><title>x</title></channel></rss>"#;
        assert!(parse_feed(xml, fetched(), 5).unwrap().is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(parse_feed("<rss><channel><item>", fetched(), 5).is_err());
    }

    #[test]
    fn namespaced_siblings_do_not_drop_the_feed() {
        let xml = r#"<?xml version="1.0"?>
<rss version="2.0" xmlns:media="http://search.yahoo.com/mrss/"
     xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd">
<channel><title>Show</title><itunes:author>Host</itunes:author>
  <item>
    <title>Episode 12: Fair use</title>
    <media:title>Ep. 12</media:title>
    <description>Plain notes.</description>
    <itunes:summary>Longer notes.</itunes:summary>
    <link>https://pod.test/12</link>
    <pubDate>Sun, 19 May 2024 07:00:00 GMT</pubDate>
  </item>
  <item>
    <itunes:title>Bonus</itunes:title>
    <title></title>
    <media:description>Only media text.</media:description>
  </item>
</channel></rss>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].title, "Episode 12: Fair use");
        assert_eq!(items[0].summary, "Plain notes.");
        assert_eq!(items[0].url, "https://pod.test/12");
        assert_eq!(
            items[0].published_at,
            Utc.with_ymd_and_hms(2024, 5, 19, 7, 0, 0).unwrap()
        );
        assert_eq!(items[1].title, "Bonus");
        assert_eq!(items[1].summary, "Only media text.");
    }

    #[test]
    fn atom_tolerates_media_extensions() {
        let xml = r#"<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/">
  <entry>
    <title>Clip</title>
    <media:title>Clip (video)</media:title>
    <media:content url="https://cdn.test/clip.mp4"/>
    <content type="html">Body</content>
    <link href="https://example.test/clip"/>
  </entry>
</feed>"#;
        let items = parse_feed(xml, fetched(), 5).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].title, "Clip");
        assert_eq!(items[0].summary, "Body");
    }

    #[test]
    fn non_feed_documents_are_errors() {
        let page = "<!DOCTYPE html><html><body><p>Not found</p></body></html>";
        let err = parse_feed(page, fetched(), 5).unwrap_err();
        assert!(format!("{err:#}").contains("<html>"));

        assert!(parse_feed("", fetched(), 5).is_err());
        assert!(parse_feed("service unavailable", fetched(), 5).is_err());
    }
}
