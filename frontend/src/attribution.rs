//! Click-id attribution read from the landing URL and the outbound affiliate link.

use std::fmt;

use log::warn;
use url::form_urlencoded;

use crate::config;

const TIKTOK_PARAM: &str = "ttclid";
const SNAPCHAT_PARAMS: [&str; 2] = ["ScCid", "sccid"];
const SNAPCHAT_OUT_PARAM: &str = "sccid";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickSource {
    TikTok,
    Snapchat,
    None,
}

impl ClickSource {
    /// Query parameter the click id is echoed under on the affiliate link.
    pub fn outbound_param(&self) -> Option<&'static str> {
        match self {
            ClickSource::TikTok => Some(TIKTOK_PARAM),
            ClickSource::Snapchat => Some(SNAPCHAT_OUT_PARAM),
            ClickSource::None => None,
        }
    }
}

impl fmt::Display for ClickSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ClickSource::TikTok => "tiktok",
            ClickSource::Snapchat => "snapchat",
            ClickSource::None => "none",
        };
        f.write_str(name)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttributionContext {
    click_id: Option<String>,
    source: ClickSource,
}

impl AttributionContext {
    pub fn none() -> Self {
        Self { click_id: None, source: ClickSource::None }
    }

    /// Builds the context from a raw query string, with or without the leading `?`.
    /// TikTok wins over Snapchat; between the two Snapchat spellings the first one in the
    /// URL wins. Empty values are treated as missing.
    pub fn from_query(query: &str) -> Self {
        let params: Vec<(String, String)> = form_urlencoded::parse(query.trim_start_matches('?').as_bytes())
            .into_owned()
            .filter(|(_, value)| !value.is_empty())
            .collect();

        if let Some((_, id)) = params.iter().find(|(key, _)| key == TIKTOK_PARAM) {
            return Self { click_id: Some(id.clone()), source: ClickSource::TikTok };
        }
        if let Some((_, id)) = params.iter().find(|(key, _)| SNAPCHAT_PARAMS.contains(&key.as_str())) {
            return Self { click_id: Some(id.clone()), source: ClickSource::Snapchat };
        }
        Self::none()
    }

    /// Reads `window.location.search`. Outside a browser this falls back to no attribution.
    pub fn from_window() -> Self {
        let search = web_sys::window()
            .map(|window| window.location())
            .and_then(|location| location.search().ok());
        match search {
            Some(search) => Self::from_query(&search),
            None => {
                warn!("No location available, skipping click attribution");
                Self::none()
            }
        }
    }

    pub fn click_id(&self) -> Option<&str> {
        self.click_id.as_deref()
    }

    pub fn source(&self) -> ClickSource {
        self.source
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AffiliateLink(String);

impl AffiliateLink {
    pub fn build(base: &str, context: &AttributionContext) -> Self {
        match (context.click_id(), context.source().outbound_param()) {
            (Some(id), Some(param)) => {
                let id = urlencoding::encode(id);
                Self(format!("{}&aff_sub={}&{}={}", base, id, param, id))
            }
            _ => Self(base.to_string()),
        }
    }

    pub fn from_context(context: &AttributionContext) -> Self {
        Self::build(&config::affiliate_base_url(), context)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AffiliateLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://aff.example/aff_c?offer_id=1&aff_id=2";

    fn link(query: &str) -> String {
        AffiliateLink::build(BASE, &AttributionContext::from_query(query)).to_string()
    }

    #[test]
    fn tiktok_click_id_is_echoed_twice() {
        assert!(link("?ttclid=abc123").ends_with("&aff_sub=abc123&ttclid=abc123"));
    }

    #[test]
    fn snapchat_click_id_uses_lowercase_param() {
        assert!(link("?ScCid=xyz789").ends_with("&aff_sub=xyz789&sccid=xyz789"));
        assert!(link("sccid=xyz789").ends_with("&aff_sub=xyz789&sccid=xyz789"));
    }

    #[test]
    fn no_click_id_leaves_base_untouched() {
        assert_eq!(link(""), BASE);
        assert_eq!(link("?utm_source=tiktok&foo=bar"), BASE);
    }

    #[test]
    fn tiktok_takes_precedence_over_snapchat() {
        let context = AttributionContext::from_query("?ScCid=snap&ttclid=tt");
        assert_eq!(context.source(), ClickSource::TikTok);
        assert_eq!(context.click_id(), Some("tt"));
    }

    #[test]
    fn empty_tiktok_value_falls_through_to_snapchat() {
        let context = AttributionContext::from_query("?ttclid=&sccid=snap");
        assert_eq!(context.source(), ClickSource::Snapchat);
        assert_eq!(context.click_id(), Some("snap"));
    }

    #[test]
    fn click_id_is_decoded_then_reencoded() {
        let context = AttributionContext::from_query("?ttclid=a%2Fb+c");
        assert_eq!(context.click_id(), Some("a/b c"));
        assert!(link("?ttclid=a%2Fb+c").ends_with("&aff_sub=a%2Fb%20c&ttclid=a%2Fb%20c"));
    }

    #[test]
    fn first_snapchat_spelling_in_url_wins() {
        assert_eq!(AttributionContext::from_query("?sccid=a&ScCid=b").click_id(), Some("a"));
        assert_eq!(AttributionContext::from_query("?ScCid=b&sccid=a").click_id(), Some("b"));
    }

    #[test]
    fn invalid_utf8_click_id_is_not_double_encoded() {
        let context = AttributionContext::from_query("?ttclid=%FF");
        assert_eq!(context.click_id(), Some("\u{FFFD}"));
        let link = link("?ttclid=%FF");
        assert!(!link.contains("%25"));
        assert!(link.ends_with("&aff_sub=%EF%BF%BD&ttclid=%EF%BF%BD"));
    }

    #[test]
    fn selection_is_idempotent() {
        let query = "?ttclid=abc&ScCid=xyz";
        assert_eq!(AttributionContext::from_query(query), AttributionContext::from_query(query));
        assert_eq!(ClickSource::None.to_string(), "none");
    }

    #[test]
    fn default_base_carries_offer_and_affiliate() {
        let link = AffiliateLink::from_context(&AttributionContext::none());
        assert_eq!(link.as_str(), config::affiliate_base_url());
        assert!(link.as_str().contains("offer_id=") && link.as_str().contains("aff_id="));
    }
}
