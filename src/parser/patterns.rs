use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Bumped whenever a rule below changes, so extracted data can be traced
/// back to the table that produced it.
pub const PATTERN_VERSION: u32 = 1;

/// Label-prefixed owner-name rules, highest priority first.
pub const OWNER_NAME_PATTERNS: &[&str] = &[
    r"Owner Name: (.*)",
    r"Contact Name: (.*)",
    r"About the Owner: (.*)",
    r"Owner: (.*)",
    r"Name: (.*)",
    r"Managed by: (.*)",
    r"Business Owner: (.*)",
    r"Company Owner: (.*)",
    r"CEO: (.*)",
    r"President: (.*)",
    r"Founder: (.*)",
];

pub const EMAIL_PATTERN: &str = r"[a-z0-9.\-+_]+@[a-z0-9.\-+_]+\.[a-z]+";

pub const PHONE_PATTERN: &str =
    r"(\+?\d{1,3}[-.\s]?)?(\(?\d{1,4}\)?)?[-.\s]?\d{1,4}[-.\s]?\d{1,4}[-.\s]?\d{4,10}";

static OWNER_NAME_RES: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    OWNER_NAME_PATTERNS
        .iter()
        .map(|p| Regex::new(&format!("(?i){p}")).unwrap())
        .collect()
});
static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(&format!("(?i){EMAIL_PATTERN}")).unwrap());
static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(PHONE_PATTERN).unwrap());

/// Social platforms recognised in hyperlink targets, in classification order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Facebook,
    Twitter,
    Linkedin,
    Youtube,
    Twitch,
    Reddit,
    Pinterest,
    Instagram,
    Tiktok,
    Discord,
}

impl Platform {
    pub const ALL: [Platform; 10] = [
        Platform::Facebook,
        Platform::Twitter,
        Platform::Linkedin,
        Platform::Youtube,
        Platform::Twitch,
        Platform::Reddit,
        Platform::Pinterest,
        Platform::Instagram,
        Platform::Tiktok,
        Platform::Discord,
    ];

    pub fn marker(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook.com",
            Platform::Twitter => "twitter.com",
            Platform::Linkedin => "linkedin.com",
            Platform::Youtube => "youtube.com",
            Platform::Twitch => "twitch.tv",
            Platform::Reddit => "reddit.com",
            Platform::Pinterest => "pinterest.com",
            Platform::Instagram => "instagram.com",
            Platform::Tiktok => "tiktok.com",
            Platform::Discord => "discord.com",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Platform::Facebook => "facebook",
            Platform::Twitter => "twitter",
            Platform::Linkedin => "linkedin",
            Platform::Youtube => "youtube",
            Platform::Twitch => "twitch",
            Platform::Reddit => "reddit",
            Platform::Pinterest => "pinterest",
            Platform::Instagram => "instagram",
            Platform::Tiktok => "tiktok",
            Platform::Discord => "discord",
        }
    }

    pub fn from_name(name: &str) -> Option<Platform> {
        Platform::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(name.trim()))
    }

    /// First platform (in `ALL` order) whose marker the href contains.
    pub fn classify(href: &str) -> Option<Platform> {
        Platform::ALL.into_iter().find(|p| href.contains(p.marker()))
    }
}

/// How a phone match is turned into the stored string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhoneCapture {
    /// Country-code group followed by area-code group; trailing digit blocks are dropped.
    #[default]
    LeadingGroups,
    WholeMatch,
}

/// How far an ads.txt file is read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdsTxtScan {
    /// Stop at the first `domainowner=` or `contact=` line, whichever comes first.
    #[default]
    FirstMatch,
    AllLines,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExtractOptions {
    pub phone_capture: PhoneCapture,
    pub ads_txt_scan: AdsTxtScan,
}

/// Capture of the first owner-name rule (by priority) that matches anywhere in `text`.
pub fn owner_name(text: &str) -> Option<String> {
    OWNER_NAME_RES
        .iter()
        .find_map(|re| re.captures(text))
        .map(|caps| caps[1].trim().to_string())
}

pub fn emails(text: &str) -> Vec<String> {
    EMAIL_RE.find_iter(text).map(|m| m.as_str().to_string()).collect()
}

pub fn phone_numbers(text: &str, capture: PhoneCapture) -> Vec<String> {
    PHONE_RE
        .captures_iter(text)
        .map(|caps| match capture {
            PhoneCapture::LeadingGroups => {
                let country = caps.get(1).map_or("", |m| m.as_str());
                let area = caps.get(2).map_or("", |m| m.as_str());
                format!("{country}{area}")
            }
            PhoneCapture::WholeMatch => caps[0].to_string(),
        })
        .collect()
}

// ── Tests ──
