use std::collections::BTreeMap;

use serde::Serialize;

use super::patterns::Platform;

/// Contact facts pulled from one section, one page, or a whole domain.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    /// Empty when no owner-name rule matched.
    pub owner_name: String,
    pub owner_emails: Vec<String>,
    pub phone_numbers: Vec<String>,
    pub social_media_links: BTreeMap<Platform, String>,
}

impl Findings {
    /// Fold a later source into this aggregate.
    ///
    /// Lists concatenate in visit order, links are a map union where the later
    /// source wins per platform, and the owner name is replaced only by a
    /// non-empty value.
    pub fn merge(&mut self, other: Findings) {
        if !other.owner_name.is_empty() {
            self.owner_name = other.owner_name;
        }
        self.owner_emails.extend(other.owner_emails);
        self.phone_numbers.extend(other.phone_numbers);
        self.social_media_links.extend(other.social_media_links);
    }

    pub fn is_empty(&self) -> bool {
        self.owner_name.is_empty()
            && self.owner_emails.is_empty()
            && self.phone_numbers.is_empty()
            && self.social_media_links.is_empty()
    }

    pub fn link(&self, platform: Platform) -> Option<&str> {
        self.social_media_links.get(&platform).map(String::as_str)
    }
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    fn named(name: &str) -> Findings {
        Findings {
            owner_name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn default_is_empty() {
        let f = Findings::default();
        assert!(f.is_empty());
        assert_eq!(f.owner_name, "");
    }

    #[test]
    fn empty_name_never_overwrites() {
        let mut agg = named("Alice");
        agg.merge(named(""));
        assert_eq!(agg.owner_name, "Alice");
    }

    #[test]
    fn later_name_wins() {
        let mut agg = named("Alice");
        agg.merge(named("Bob"));
        assert_eq!(agg.owner_name, "Bob");
    }

    #[test]
    fn lists_concatenate_in_order() {
        let mut agg = Findings {
            owner_emails: vec!["a@x.com".into()],
            phone_numbers: vec!["1".into()],
            ..Default::default()
        };
        agg.merge(Findings {
            owner_emails: vec!["b@x.com".into(), "a@x.com".into()],
            phone_numbers: vec!["2".into()],
            ..Default::default()
        });
        assert_eq!(agg.owner_emails, vec!["a@x.com", "b@x.com", "a@x.com"]);
        assert_eq!(agg.phone_numbers, vec!["1", "2"]);
    }

    #[test]
    fn links_union_later_wins() {
        let mut agg = Findings::default();
        agg.social_media_links
            .insert(Platform::Facebook, "https://facebook.com/old".into());
        agg.social_media_links
            .insert(Platform::Reddit, "https://reddit.com/r/acme".into());

        let mut later = Findings::default();
        later
            .social_media_links
            .insert(Platform::Facebook, "https://facebook.com/new".into());
        agg.merge(later);

        assert_eq!(agg.link(Platform::Facebook), Some("https://facebook.com/new"));
        assert_eq!(agg.link(Platform::Reddit), Some("https://reddit.com/r/acme"));
        assert_eq!(agg.social_media_links.len(), 2);
    }

    #[test]
    fn serializes_with_platform_keys() {
        let mut f = named("Acme");
        f.social_media_links
            .insert(Platform::Youtube, "https://youtube.com/@acme".into());
        let json = serde_json::to_value(&f).unwrap();
        assert_eq!(json["owner_name"], "Acme");
        assert_eq!(json["social_media_links"]["youtube"], "https://youtube.com/@acme");
    }
}
