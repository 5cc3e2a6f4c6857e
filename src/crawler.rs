use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};

use crate::fetcher::{Page, PageSource};
use crate::parser::{self, ExtractOptions, Findings};

/// Conventional policy and info pages probed on every site.
pub const GUESSED_PATHS: &[&str] = &[
    "/privacy-policy",
    "/terms-of-service",
    "/terms-of-use",
    "/cookies-policy",
    "/contact",
    "/contact-us",
    "/about",
    "/about-us",
    "/legal",
    "/legal-notice",
    "/disclaimer",
    "/support",
    "/help",
    "/careers",
    "/faq",
    "/faq.htm",
    "/faq.html",
    "/faq.aspx",
    "/blog",
    "/blog.htm",
    "/blog.html",
    "/sitemap",
];

/// Prepend `https://` unless the domain already carries an http(s) scheme.
pub fn normalize_domain(domain: &str) -> String {
    let domain = domain.trim();
    if domain.starts_with("http://") || domain.starts_with("https://") {
        domain.to_string()
    } else {
        format!("https://{domain}")
    }
}

/// Guessed page URLs, joined by plain concatenation.
pub fn guessed_urls(base: &str) -> Vec<String> {
    GUESSED_PATHS.iter().map(|path| format!("{base}{path}")).collect()
}

pub struct SiteCrawler<'a> {
    source: &'a dyn PageSource,
    options: ExtractOptions,
}

impl<'a> SiteCrawler<'a> {
    pub fn new(source: &'a dyn PageSource, options: ExtractOptions) -> Self {
        Self { source, options }
    }

    /// Visit one site and fold everything found into a single record.
    ///
    /// Pages are fetched one at a time: landing page sections, then every
    /// guessed path, then `ads.txt`. A page that fails to load contributes
    /// nothing. Only a domain that cannot form a URL is an error.
    pub async fn crawl(&self, domain: &str) -> Result<Findings> {
        let base = normalize_domain(domain);
        let parsed =
            reqwest::Url::parse(&base).with_context(|| format!("Invalid domain: {domain:?}"))?;
        if parsed.host_str().map_or(true, str::is_empty) {
            bail!("Domain has no host: {domain:?}");
        }

        let mut findings = Findings::default();

        if let Some(page) = self.fetch_soft(&base).await {
            findings.merge(parser::extract_landing_page(&page.body, &self.options));
        }

        for url in guessed_urls(&base) {
            if let Some(page) = self.fetch_soft(&url).await {
                findings.merge(parser::extract_document(&page.body, &self.options));
            }
        }

        let ads_url = format!("{base}/ads.txt");
        if let Some(page) = self.fetch_soft(&ads_url).await {
            let ads = parser::parse_ads_txt(&page.body, self.options.ads_txt_scan);
            if let Some(email) = ads.owner_email.filter(|e| !e.is_empty()) {
                findings.owner_emails.push(email);
            }
            if let Some(name) = ads.owner_name {
                findings.owner_name = name;
            }
        }

        if findings.is_empty() {
            info!("{}: nothing found", base);
            return Ok(findings);
        }
        info!(
            "{}: {} emails, {} phones, {} social links, owner {:?}",
            base,
            findings.owner_emails.len(),
            findings.phone_numbers.len(),
            findings.social_media_links.len(),
            findings.owner_name,
        );
        Ok(findings)
    }

    async fn fetch_soft(&self, url: &str) -> Option<Page> {
        match self.source.fetch(url).await {
            Ok(page) => {
                debug!("Fetched {} ({}, {} bytes)", page.url, page.status, page.body.len());
                Some(page)
            }
            Err(e) if e.is_missing_page() => {
                debug!("Skipping page: {}", e);
                None
            }
            Err(e) => {
                warn!("Skipping page: {}", e);
                None
            }
        }
    }
}

// ── Tests ──
