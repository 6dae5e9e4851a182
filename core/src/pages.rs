//! Page classification and the per-kind scrapers.
//!
//! The site has a fixed shape: a hub (or the body map) links to condition introduction
//! pages, and each introduction links to a handful of category subpages. Scraping is a
//! pure function of (url, markup); the resulting [`Mutation`] is applied by the caller.

use crate::{Condition, Mutation, Subpage};
use lazy_static::lazy_static;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::BTreeMap;

pub const SITE_ROOT: &str = "http://www.nhs.uk";
pub const CONDITION_PAGES: &str = "http://www.nhs.uk/Conditions/Pages/";
pub const INTRODUCTION_SUFFIX: &str = "/Pages/Introduction.aspx";

lazy_static! {
    static ref HUB_LINKS: Selector = Selector::parse("div#haz-mod1 a").expect("valid selector");
    static ref BODY_MAP_LINKS: Selector = Selector::parse("div#haz-mod5 a").expect("valid selector");
    static ref ACTIVE_TITLE: Selector = Selector::parse("ul.sub-nav span.active-text").expect("valid selector");
    static ref SUB_NAV_LINKS: Selector = Selector::parse("ul.sub-nav a").expect("valid selector");
    static ref MAIN_PARAGRAPHS: Selector = Selector::parse("div.main-content p").expect("valid selector");
    static ref ALL_PARAGRAPHS: Selector = Selector::parse("p").expect("valid selector");
    static ref KEYWORDS: Selector = Selector::parse("meta[name='keywords']").expect("valid selector");
    static ref DC_TITLE: Selector = Selector::parse("meta[name='DC.title']").expect("valid selector");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubpageKind {
    Symptoms,
    Causes,
    Diagnosis,
    Treatment,
    Complications,
    Prevention,
}

impl SubpageKind {
    pub const ALL: [SubpageKind; 6] = [
        SubpageKind::Symptoms,
        SubpageKind::Causes,
        SubpageKind::Diagnosis,
        SubpageKind::Treatment,
        SubpageKind::Complications,
        SubpageKind::Prevention,
    ];

    /// Key under which the subpage is stored; the page's file name, lowercased.
    pub fn label(self) -> &'static str {
        match self {
            SubpageKind::Symptoms => "symptoms",
            SubpageKind::Causes => "causes",
            SubpageKind::Diagnosis => "diagnosis",
            SubpageKind::Treatment => "treatment",
            SubpageKind::Complications => "complications",
            SubpageKind::Prevention => "prevention",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Hub,
    BodyMap,
    Introduction,
    Subpage(SubpageKind),
    Default,
}

impl PageKind {
    /// Classifies a page by the last path segment, ignoring any query string or fragment.
    pub fn from_url(url: &str) -> Self {
        let file = file_name(url);
        let is = |name: &str| file.eq_ignore_ascii_case(name);
        if is("hub.aspx") {
            PageKind::Hub
        } else if is("BodyMap.aspx") {
            PageKind::BodyMap
        } else if is("Introduction.aspx") {
            PageKind::Introduction
        } else {
            SubpageKind::ALL
                .into_iter()
                .find(|k| is(&format!("{}.aspx", k.label())))
                .map(PageKind::Subpage)
                .unwrap_or(PageKind::Default)
        }
    }

    pub fn scrape(self, url: &str, doc: &Html) -> Scraped {
        match self {
            PageKind::Hub => scrape_hub(doc),
            PageKind::BodyMap => scrape_body_map(doc),
            PageKind::Introduction => scrape_introduction(url, doc),
            PageKind::Subpage(kind) => scrape_subpage(kind, url, doc),
            PageKind::Default => scrape_default(url, doc),
        }
    }
}

/// What one page contributes: at most one dataset change and the pages to fetch next.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Scraped {
    pub mutation: Option<Mutation>,
    pub children: Vec<String>,
}

pub fn dispatch(url: &str, html: &str) -> Scraped {
    let kind = PageKind::from_url(url);
    let doc = Html::parse_document(html);
    let scraped = kind.scrape(url, &doc);
    tracing::debug!(url, ?kind, children = scraped.children.len(), "page scraped");
    scraped
}

fn file_name(url: &str) -> &str {
    let path = url.split(|c: char| c == '?' || c == '#').next().unwrap_or(url);
    path.rsplit('/').next().unwrap_or(path)
}

fn scrape_hub(doc: &Html) -> Scraped {
    let children = doc
        .select(&HUB_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| format!("{CONDITION_PAGES}{href}"))
        .collect();
    Scraped { mutation: None, children }
}

fn scrape_body_map(doc: &Html) -> Scraped {
    let children = doc
        .select(&BODY_MAP_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .filter_map(|href| {
            if href.starts_with('/') {
                Some(format!("{SITE_ROOT}{href}{INTRODUCTION_SUFFIX}"))
            } else if href.starts_with("http://") || href.starts_with("https://") {
                Some(href.to_string())
            } else {
                None
            }
        })
        .collect();
    Scraped { mutation: None, children }
}

fn scrape_introduction(url: &str, doc: &Html) -> Scraped {
    let mut title: String = doc.select(&ACTIVE_TITLE).map(visible_text).collect::<String>().trim().to_string();
    if title.is_empty() {
        tracing::warn!(url, "introduction page without an active title; keying it by url");
        title = url.to_string();
    }
    let condition = Condition {
        title,
        url: url.to_string(),
        keywords: keywords(doc),
        text: paragraphs(doc, &MAIN_PARAGRAPHS),
        subpages: BTreeMap::new(),
    };
    let children = doc
        .select(&SUB_NAV_LINKS)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| if href.starts_with("http") { href.to_string() } else { format!("{SITE_ROOT}{href}") })
        .collect();
    Scraped { mutation: Some(Mutation::Condition(condition)), children }
}

fn scrape_subpage(kind: SubpageKind, url: &str, doc: &Html) -> Scraped {
    // The first sub-navigation link always points back at the condition's introduction.
    let parent = doc.select(&SUB_NAV_LINKS).next().map(visible_text).unwrap_or_default().trim().to_string();
    let subpage = Subpage { url: url.to_string(), keywords: keywords(doc), text: paragraphs(doc, &MAIN_PARAGRAPHS) };
    Scraped {
        mutation: Some(Mutation::Subpage { parent, label: kind.label().to_string(), subpage }),
        children: Vec::new(),
    }
}

fn scrape_default(url: &str, doc: &Html) -> Scraped {
    let title = doc
        .select(&DC_TITLE)
        .next()
        .and_then(|m| m.value().attr("content"))
        .map(|t| t.trim().to_string())
        .unwrap_or_else(|| url.to_string());
    let condition = Condition {
        title,
        url: url.to_string(),
        keywords: keywords(doc),
        text: paragraphs(doc, &ALL_PARAGRAPHS),
        subpages: BTreeMap::new(),
    };
    Scraped { mutation: Some(Mutation::Condition(condition)), children: Vec::new() }
}

fn keywords(doc: &Html) -> Option<String> {
    doc.select(&KEYWORDS).next().and_then(|m| m.value().attr("content")).map(str::to_string)
}

/// Each paragraph trimmed and followed by a single space.
fn paragraphs(doc: &Html, selector: &Selector) -> String {
    let mut text = String::new();
    for p in doc.select(selector) {
        text.push_str(p.text().collect::<String>().trim());
        text.push(' ');
    }
    text
}

/// Element text with anything inside `span.hidden` left out.
fn visible_text(el: ElementRef) -> String {
    let mut out = String::new();
    collect_visible(el, &mut out);
    out
}

fn collect_visible(el: ElementRef, out: &mut String) {
    for child in el.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(_) => {
                if let Some(child_el) = ElementRef::wrap(child) {
                    let hidden = child_el.value().name() == "span" && child_el.value().classes().any(|c| c == "hidden");
                    if !hidden {
                        collect_visible(child_el, out);
                    }
                }
            }
            _ => {}
        }
    }
}
