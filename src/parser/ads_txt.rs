use super::patterns::AdsTxtScan;

const OWNER_KEY: &str = "domainowner=";
const CONTACT_KEY: &str = "contact=";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AdsTxtFindings {
    /// Set whenever a `domainowner=` line was read, even if its value is blank.
    pub owner_name: Option<String>,
    pub owner_email: Option<String>,
}

pub fn parse_ads_txt(content: &str, scan: AdsTxtScan) -> AdsTxtFindings {
    let mut found = AdsTxtFindings::default();

    for line in content.lines() {
        if line.contains(OWNER_KEY) {
            if found.owner_name.is_none() {
                found.owner_name = Some(line_value(line));
            }
            if scan == AdsTxtScan::FirstMatch {
                break;
            }
        } else if line.contains(CONTACT_KEY) {
            if found.owner_email.is_none() {
                found.owner_email = Some(line_value(line));
            }
            if scan == AdsTxtScan::FirstMatch {
                break;
            }
        }
    }

    found
}

/// Text between the first and second `=`.
fn line_value(line: &str) -> String {
    line.split('=').nth(1).unwrap_or("").trim().to_string()
}

// ── Tests ──
