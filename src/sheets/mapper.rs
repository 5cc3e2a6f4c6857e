use std::collections::BTreeMap;

use anyhow::Result;
use serde::{Deserialize, Deserializer};
use tracing::debug;

use super::RowStore;
use crate::parser::{Findings, Platform};

/// Destination columns (0-based) for each findings field.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub owner_name: Option<usize>,
    /// One column per email slot: first email goes to the first column, and so on.
    pub emails: Vec<usize>,
    /// Only the first phone number is written.
    pub phone_number: Option<usize>,
    #[serde(deserialize_with = "platform_columns")]
    pub social: BTreeMap<Platform, usize>,
}

fn platform_columns<'de, D>(deserializer: D) -> Result<BTreeMap<Platform, usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, usize>::deserialize(deserializer)?;
    raw.into_iter()
        .map(|(name, col)| {
            Platform::from_name(&name)
                .map(|p| (p, col))
                .ok_or_else(|| serde::de::Error::custom(format!("unknown platform {name:?}")))
        })
        .collect()
}

impl Default for ColumnMap {
    fn default() -> Self {
        let social = BTreeMap::from([
            (Platform::Reddit, 13),
            (Platform::Twitter, 14),
            (Platform::Discord, 15),
            (Platform::Pinterest, 16),
            (Platform::Facebook, 17),
            (Platform::Instagram, 18),
            (Platform::Linkedin, 19),
            (Platform::Youtube, 23),
            (Platform::Twitch, 24),
        ]);
        Self {
            owner_name: Some(6),
            emails: vec![7, 8, 9],
            phone_number: Some(22),
            social,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellUpdate {
    /// 1-based sheet row.
    pub row: usize,
    /// 1-based sheet column.
    pub column: usize,
    pub field: String,
    pub value: String,
}

/// Cell writes for every non-empty mapped value, ordered by column.
/// Empty values produce nothing, so existing cells are never blanked.
pub fn plan_updates(row: usize, findings: &Findings, columns: &ColumnMap) -> Vec<CellUpdate> {
    let mut updates = Vec::new();
    let mut push = |column: usize, field: String, value: &str| {
        if !value.is_empty() {
            updates.push(CellUpdate {
                row,
                column: column + 1,
                field,
                value: value.to_string(),
            });
        }
    };

    if let Some(col) = columns.owner_name {
        push(col, "owner name".into(), &findings.owner_name);
    }
    for (slot, &col) in columns.emails.iter().enumerate() {
        if let Some(email) = findings.owner_emails.get(slot) {
            push(col, format!("email {}", slot + 1), email);
        }
    }
    if let (Some(col), Some(phone)) = (columns.phone_number, findings.phone_numbers.first()) {
        push(col, "phone number".into(), phone);
    }
    for (&platform, &col) in &columns.social {
        if let Some(url) = findings.link(platform) {
            push(col, platform.as_str().into(), url);
        }
    }

    updates.sort_by_key(|u| u.column);
    updates
}

/// Apply planned writes in order. The first failing write aborts.
pub async fn write_updates(store: &dyn RowStore, updates: &[CellUpdate]) -> Result<usize> {
    for u in updates {
        debug!("row {} col {} ({}) <- {:?}", u.row, u.column, u.field, u.value);
        store.update_cell(u.row, u.column, &u.value).await?;
    }
    Ok(updates.len())
}

// ── Tests ──

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_findings_touch_nothing() {
        assert!(plan_updates(2, &Findings::default(), &ColumnMap::default()).is_empty());
    }

    #[test]
    fn phone_only_updates_one_cell() {
        let findings = Findings {
            phone_numbers: vec!["555-1234".into()],
            ..Default::default()
        };
        let updates = plan_updates(4, &findings, &ColumnMap::default());
        assert_eq!(
            updates,
            vec![CellUpdate {
                row: 4,
                column: 23,
                field: "phone number".into(),
                value: "555-1234".into(),
            }]
        );
    }

    #[test]
    fn blank_first_phone_is_not_written() {
        let findings = Findings {
            phone_numbers: vec!["".into(), "555-1".into()],
            ..Default::default()
        };
        assert!(plan_updates(2, &findings, &ColumnMap::default()).is_empty());
    }

    #[test]
    fn emails_fill_slots_in_order() {
        let findings = Findings {
            owner_emails: vec![
                "a@x.com".into(),
                "b@x.com".into(),
                "c@x.com".into(),
                "d@x.com".into(),
            ],
            ..Default::default()
        };
        let updates = plan_updates(3, &findings, &ColumnMap::default());
        let cells: Vec<(usize, &str)> = updates
            .iter()
            .map(|u| (u.column, u.value.as_str()))
            .collect();
        // fourth email has no slot
        assert_eq!(cells, vec![(8, "a@x.com"), (9, "b@x.com"), (10, "c@x.com")]);
    }

    #[test]
    fn social_and_owner_columns() {
        let mut findings = Findings {
            owner_name: "Ann Lee".into(),
            ..Default::default()
        };
        findings
            .social_media_links
            .insert(Platform::Discord, "https://discord.com/invite/x".into());
        findings
            .social_media_links
            .insert(Platform::Tiktok, "https://tiktok.com/@acme".into());

        let updates = plan_updates(2, &findings, &ColumnMap::default());
        let cells: Vec<(usize, &str)> = updates
            .iter()
            .map(|u| (u.column, u.field.as_str()))
            .collect();
        // tiktok has no default column
        assert_eq!(cells, vec![(7, "owner name"), (16, "discord")]);
    }

    #[test]
    fn custom_map_from_json() {
        let map: ColumnMap =
            serde_json::from_str(r#"{"emails":[3],"social":{"tiktok":4}}"#).unwrap();
        assert_eq!(map.emails, vec![3]);
        assert_eq!(map.social.get(&Platform::Tiktok), Some(&4));
        // unspecified fields fall back to the default layout
        assert_eq!(map.owner_name, Some(6));
    }

    #[test]
    fn unknown_platform_column_rejected() {
        let err = serde_json::from_str::<ColumnMap>(r#"{"social":{"myspace":4}}"#).unwrap_err();
        assert!(err.to_string().contains("myspace"));
    }
}
