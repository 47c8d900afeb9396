use log::Level;

/// Placeholder tracking host. Replace with the network's real click endpoint before deploying.
pub const AFFILIATE_ENDPOINT: &str = "https://trk.backspingames.com/aff_c";
pub const OFFER_ID: &str = "2148";
pub const AFF_ID: &str = "11962";

/// How long the CTA waits before leaving the page, so pixel calls can flush.
pub const REDIRECT_DELAY_MS: u32 = 200;

pub const EXCLUDED_STATES: [&str; 7] = [
    "Michigan",
    "Arizona",
    "Arkansas",
    "Delaware",
    "Louisiana",
    "South Carolina",
    "South Dakota",
];

pub fn affiliate_base_url() -> String {
    format!("{}?offer_id={}&aff_id={}", AFFILIATE_ENDPOINT, OFFER_ID, AFF_ID)
}

#[cfg(debug_assertions)]
pub fn log_level() -> Level {
    Level::Debug // Verbose collector logging when running locally
}

#[cfg(not(debug_assertions))]
pub fn log_level() -> Level {
    Level::Info
}
