pub mod ads_txt;
pub mod findings;
pub mod patterns;
pub mod sections;

pub use ads_txt::parse_ads_txt;
pub use findings::Findings;
pub use patterns::{AdsTxtScan, ExtractOptions, PhoneCapture, Platform};
pub use sections::{extract_document, extract_landing_page};
