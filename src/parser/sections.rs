use std::sync::LazyLock;

use scraper::{ElementRef, Html, Selector};

use super::findings::Findings;
use super::patterns::{self, ExtractOptions, Platform};

static LINK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static HEADER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("header").unwrap());
static FOOTER_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("footer").unwrap());
static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());
static ABOUT_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div#about-us").unwrap());

/// Landing-page regions, in the order they are folded into the aggregate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Footer,
    Body,
    AboutUs,
}

impl SectionKind {
    pub const ORDER: [SectionKind; 4] = [
        SectionKind::Header,
        SectionKind::Footer,
        SectionKind::Body,
        SectionKind::AboutUs,
    ];

    fn selector(self) -> &'static Selector {
        match self {
            SectionKind::Header => &HEADER_SEL,
            SectionKind::Footer => &FOOTER_SEL,
            SectionKind::Body => &BODY_SEL,
            SectionKind::AboutUs => &ABOUT_SEL,
        }
    }

    /// First element of this kind in the document, if any.
    pub fn find<'a>(self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(self.selector()).next()
    }
}

/// Apply the pattern library to one section's visible text and link targets.
pub fn extract_text<'a, I>(text: &str, hrefs: I, options: &ExtractOptions) -> Findings
where
    I: IntoIterator<Item = &'a str>,
{
    let mut findings = Findings {
        owner_name: patterns::owner_name(text).unwrap_or_default(),
        owner_emails: patterns::emails(text),
        phone_numbers: patterns::phone_numbers(text, options.phone_capture),
        ..Default::default()
    };

    for href in hrefs {
        if let Some(platform) = Platform::classify(href) {
            // a later link for the same platform replaces the earlier one
            findings.social_media_links.insert(platform, href.to_string());
        }
    }

    findings
}

pub fn extract_element(element: ElementRef<'_>, options: &ExtractOptions) -> Findings {
    let text: String = element.text().collect();
    let hrefs = element
        .select(&LINK_SEL)
        .filter_map(|a| a.value().attr("href"));
    extract_text(&text, hrefs, options)
}

/// Header, footer, body and about-us container merged in that order.
pub fn extract_landing_page(html: &str, options: &ExtractOptions) -> Findings {
    let document = Html::parse_document(html);
    let mut findings = Findings::default();
    for kind in SectionKind::ORDER {
        if let Some(element) = kind.find(&document) {
            findings.merge(extract_element(element, options));
        }
    }
    findings
}

/// The whole document as a single section.
pub fn extract_document(html: &str, options: &ExtractOptions) -> Findings {
    let document = Html::parse_document(html);
    extract_element(document.root_element(), options)
}

// ── Tests ──
