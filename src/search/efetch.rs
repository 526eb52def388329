//! EFetch XML extraction.
//!
//! Streams the `PubmedArticleSet` document once and keeps, per
//! `PubmedArticle`, only the fields an [`ArticleRecord`] needs. Every field
//! takes the text of the *first* matching element inside the article, the
//! same way a descendant search would.

use std::borrow::Cow;

use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;

use super::pubmed::LiteratureError;
use super::records::{article_url, ArticleRecord, NO_ABSTRACT, NO_AUTHORS, NO_DATE, NO_TITLE};

/// Raw fields of one `PubmedArticle`, before sentinels are applied.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DetailBlock {
    pub title: Option<String>,
    pub abstract_text: Option<String>,
    pub authors: Vec<AuthorName>,
    pub year: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AuthorName {
    pub fore_name: Option<String>,
    pub last_name: Option<String>,
}

impl AuthorName {
    /// "ForeName LastName", or LastName alone. Authors without a last name
    /// (collective names) are not displayed.
    pub fn display_name(&self) -> Option<String> {
        match (self.fore_name.as_deref(), self.last_name.as_deref()) {
            (Some(fore), Some(last)) => Some(format!("{} {}", fore, last)),
            (None, Some(last)) => Some(last.to_string()),
            _ => None,
        }
    }
}

impl DetailBlock {
    pub fn publication_date(&self) -> String {
        match (self.month.as_deref(), self.year.as_deref()) {
            (Some(month), Some(year)) => format!("{} {}", month, year),
            (None, Some(year)) => year.to_string(),
            _ => NO_DATE.to_string(),
        }
    }

    /// Build the record for `pmid`, filling every missing field with its sentinel.
    pub fn into_record(self, pmid: &str) -> ArticleRecord {
        let publication_date = self.publication_date();

        let mut authors: Vec<String> = self
            .authors
            .iter()
            .filter_map(AuthorName::display_name)
            .collect();
        if authors.is_empty() {
            authors.push(NO_AUTHORS.to_string());
        }

        ArticleRecord {
            title: self.title.unwrap_or_else(|| NO_TITLE.to_string()),
            abstract_text: self.abstract_text.unwrap_or_else(|| NO_ABSTRACT.to_string()),
            authors,
            publication_date,
            article_url: article_url(pmid),
        }
    }
}

/// Text collector for the first occurrence of an element.
#[derive(Debug, Default)]
enum Capture {
    #[default]
    Pending,
    Open(Vec<String>),
    Done(Vec<String>),
}

impl Capture {
    fn open(&mut self) {
        if matches!(self, Capture::Pending) {
            *self = Capture::Open(Vec::new());
        }
    }

    fn close(&mut self) {
        if let Capture::Open(parts) = self {
            *self = Capture::Done(std::mem::take(parts));
        }
    }

    fn is_open(&self) -> bool {
        matches!(self, Capture::Open(_))
    }

    fn push(&mut self, text: &str) {
        if let Capture::Open(parts) = self {
            parts.push(text.to_string());
        }
    }

    /// Collected pieces joined by a single space; `None` when absent or blank.
    fn into_text(self) -> Option<String> {
        match self {
            Capture::Open(parts) | Capture::Done(parts) => {
                let text = parts.join(" ");
                let text = text.trim();
                (!text.is_empty()).then(|| text.to_string())
            }
            Capture::Pending => None,
        }
    }
}

#[derive(Debug, Default)]
struct AuthorParser {
    last_name: Capture,
    fore_name: Capture,
}

#[derive(Debug, Default)]
struct BlockParser {
    title: Capture,
    abstract_text: Capture,
    pub_date: Capture,
    year: Capture,
    month: Capture,
    author: Option<AuthorParser>,
    authors: Vec<AuthorName>,
}

impl BlockParser {
    fn start(&mut self, name: &[u8]) {
        if is(name, b"ArticleTitle") {
            self.title.open();
        } else if is(name, b"Abstract") {
            self.abstract_text.open();
        } else if is(name, b"PubDate") {
            self.pub_date.open();
        } else if is(name, b"Year") && self.pub_date.is_open() {
            self.year.open();
        } else if is(name, b"Month") && self.pub_date.is_open() {
            self.month.open();
        } else if is(name, b"Author") {
            self.author = Some(AuthorParser::default());
        } else if let Some(author) = self.author.as_mut() {
            if is(name, b"LastName") {
                author.last_name.open();
            } else if is(name, b"ForeName") {
                author.fore_name.open();
            }
        }
    }

    fn end(&mut self, name: &[u8]) {
        if is(name, b"ArticleTitle") {
            self.title.close();
        } else if is(name, b"Abstract") {
            self.abstract_text.close();
        } else if is(name, b"PubDate") {
            self.pub_date.close();
        } else if is(name, b"Year") {
            self.year.close();
        } else if is(name, b"Month") {
            self.month.close();
        } else if is(name, b"Author") {
            if let Some(author) = self.author.take() {
                self.authors.push(AuthorName {
                    fore_name: author.fore_name.into_text(),
                    last_name: author.last_name.into_text(),
                });
            }
        } else if let Some(author) = self.author.as_mut() {
            if is(name, b"LastName") {
                author.last_name.close();
            } else if is(name, b"ForeName") {
                author.fore_name.close();
            }
        }
    }

    // Text belongs to every element that is currently open around it.
    fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.title.push(text);
        self.abstract_text.push(text);
        self.year.push(text);
        self.month.push(text);
        if let Some(author) = self.author.as_mut() {
            author.last_name.push(text);
            author.fore_name.push(text);
        }
    }

    fn finish(self) -> DetailBlock {
        DetailBlock {
            title: self.title.into_text(),
            abstract_text: self.abstract_text.into_text(),
            authors: self.authors,
            year: self.year.into_text(),
            month: self.month.into_text(),
        }
    }
}

/// HTML named entities seen in PubMed text. Anything else is dropped.
fn resolve_entity(name: &str) -> Option<&'static str> {
    let value = resolve_predefined_entity(name).unwrap_or(match name {
        "nbsp" => "\u{a0}",
        "ndash" => "\u{2013}",
        "mdash" => "\u{2014}",
        "lsquo" => "\u{2018}",
        "rsquo" => "\u{2019}",
        "ldquo" => "\u{201c}",
        "rdquo" => "\u{201d}",
        "hellip" => "\u{2026}",
        "deg" => "\u{b0}",
        "plusmn" => "\u{b1}",
        "times" => "\u{d7}",
        "micro" => "\u{b5}",
        "middot" => "\u{b7}",
        "le" => "\u{2264}",
        "ge" => "\u{2265}",
        "alpha" => "\u{3b1}",
        "beta" => "\u{3b2}",
        "gamma" => "\u{3b3}",
        "delta" => "\u{3b4}",
        "kappa" => "\u{3ba}",
        "mu" => "\u{3bc}",
        _ => "",
    });
    Some(value)
}

fn is(name: &[u8], expected: &[u8]) -> bool {
    name.eq_ignore_ascii_case(expected)
}

/// Parse an EFetch response into one [`DetailBlock`] per `PubmedArticle`, in document order.
pub fn parse_articles(xml: &str) -> Result<Vec<DetailBlock>, LiteratureError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut blocks = Vec::new();
    let mut current: Option<BlockParser> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            LiteratureError::MalformedXml(format!(
                "at byte {}: {}",
                reader.buffer_position(),
                e
            ))
        })?;

        match event {
            Event::Start(e) => {
                let name = e.local_name();
                if is(name.as_ref(), b"PubmedArticle") {
                    current = Some(BlockParser::default());
                } else if let Some(block) = current.as_mut() {
                    block.start(name.as_ref());
                }
            }
            Event::Empty(e) => {
                if let Some(block) = current.as_mut() {
                    let name = e.local_name();
                    block.start(name.as_ref());
                    block.end(name.as_ref());
                }
            }
            Event::End(e) => {
                let name = e.local_name();
                if is(name.as_ref(), b"PubmedArticle") {
                    if let Some(block) = current.take() {
                        blocks.push(block.finish());
                    }
                } else if let Some(block) = current.as_mut() {
                    block.end(name.as_ref());
                }
            }
            Event::Text(e) => {
                if let Some(block) = current.as_mut() {
                    let text = e
                        .unescape_with(resolve_entity)
                        .map(Cow::into_owned)
                        .unwrap_or_else(|_| String::from_utf8_lossy(&e).into_owned());
                    block.text(text.trim());
                }
            }
            Event::CData(e) => {
                if let Some(block) = current.as_mut() {
                    let raw = e.into_inner();
                    block.text(String::from_utf8_lossy(&raw).trim());
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(blocks)
}
