//! Analytics taxonomy helpers
//!
//! Pure classification logic behind the tracking layer: device class from a
//! user-agent string, page category from a path, scroll-depth markers, and
//! the ephemeral per-session flag store. Nothing here talks to a sink; these
//! feed the labels and params of [`crate::page::analytics::AnalyticsEvent`]s.

use std::collections::HashMap;

/// Coarse device class derived from the user agent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    Desktop,
    Mobile,
    Tablet,
}

impl DeviceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceType::Desktop => "desktop",
            DeviceType::Mobile => "mobile",
            DeviceType::Tablet => "tablet",
        }
    }
}

const TABLET_MARKERS: &[&str] = &["tablet", "ipad", "playbook", "silk"];
const MOBILE_MARKERS: &[&str] = &[
    "mobile",
    "iphone",
    "ipod",
    "android",
    "blackberry",
    "opera mini",
    "windows ce",
    "palm",
    "smartphone",
    "iemobile",
];

/// Classify a user-agent string. Tablet markers win over mobile markers
/// (an iPad UA also contains "mobile").
pub fn classify_device(user_agent: &str) -> DeviceType {
    let ua = user_agent.to_ascii_lowercase();
    if TABLET_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceType::Tablet
    } else if MOBILE_MARKERS.iter().any(|m| ua.contains(m)) {
        DeviceType::Mobile
    } else {
        DeviceType::Desktop
    }
}

/// Content grouping of a page path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageCategory {
    Home,
    Rentals,
    Experiences,
    About,
    Contact,
    Faq,
    Ownership,
    Cartel,
    Other,
}

impl PageCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            PageCategory::Home => "home",
            PageCategory::Rentals => "rentals",
            PageCategory::Experiences => "experiences",
            PageCategory::About => "about",
            PageCategory::Contact => "contact",
            PageCategory::Faq => "faq",
            PageCategory::Ownership => "ownership",
            PageCategory::Cartel => "cartel",
            PageCategory::Other => "other",
        }
    }
}

/// Map a request path onto its content category
pub fn classify_page(path: &str) -> PageCategory {
    let p = path.to_ascii_lowercase();
    if p == "/" || p == "/index.html" {
        return PageCategory::Home;
    }
    if p.contains("rental") {
        PageCategory::Rentals
    } else if p.contains("experience") {
        PageCategory::Experiences
    } else if p.contains("about") {
        PageCategory::About
    } else if p.contains("contact") {
        PageCategory::Contact
    } else if p.contains("faq") {
        PageCategory::Faq
    } else if p.contains("ownership") {
        PageCategory::Ownership
    } else if p.contains("cartel") {
        PageCategory::Cartel
    } else {
        PageCategory::Other
    }
}

/// Fires each scroll-depth marker at most once per page view
pub struct ScrollDepthTracker {
    markers: Vec<u8>,
    fired: Vec<u8>,
}

impl ScrollDepthTracker {
    /// Standard 25/50/75/100 markers
    pub fn new() -> Self {
        Self::with_markers(&[25, 50, 75, 100])
    }

    pub fn with_markers(markers: &[u8]) -> Self {
        Self {
            markers: markers.to_vec(),
            fired: Vec::new(),
        }
    }

    /// Report the current scroll percentage; returns the markers newly
    /// crossed by this observation, each of which will never fire again.
    pub fn observe(&mut self, percent: u8) -> Vec<u8> {
        let mut crossed = Vec::new();
        for &marker in &self.markers {
            if percent >= marker && !self.fired.contains(&marker) {
                self.fired.push(marker);
                crossed.push(marker);
            }
        }
        crossed
    }

    /// Forget fired markers, e.g. on soft navigation to a new page
    pub fn reset(&mut self) {
        self.fired.clear();
    }

    pub fn fired(&self) -> &[u8] {
        &self.fired
    }
}

impl Default for ScrollDepthTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Ephemeral per-session key/value flags (device type, preferred contact
/// method, ...). Lives only as long as the session object; nothing is
/// persisted.
#[derive(Debug, Default)]
pub struct SessionFlags {
    flags: HashMap<String, String>,
}

impl SessionFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.flags.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.flags.get(key).map(String::as_str)
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.flags.remove(key)
    }

    pub fn clear(&mut self) {
        self.flags.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_common_user_agents() {
        assert_eq!(
            classify_device("Mozilla/5.0 (X11; Linux x86_64) Gecko/20100101 Firefox/115.0"),
            DeviceType::Desktop
        );
        assert_eq!(
            classify_device("Mozilla/5.0 (iPhone; CPU iPhone OS 16_0 like Mac OS X) Mobile/15E148"),
            DeviceType::Mobile
        );
        assert_eq!(
            classify_device("Mozilla/5.0 (iPad; CPU OS 16_0 like Mac OS X) Mobile/15E148"),
            DeviceType::Tablet
        );
        assert_eq!(classify_device("Kindle Silk/3.0"), DeviceType::Tablet);
    }

    #[test]
    fn classifies_page_paths() {
        assert_eq!(classify_page("/"), PageCategory::Home);
        assert_eq!(classify_page("/index.html"), PageCategory::Home);
        assert_eq!(classify_page("/rentals/villa-1"), PageCategory::Rentals);
        assert_eq!(classify_page("/EXPERIENCES"), PageCategory::Experiences);
        assert_eq!(classify_page("/pricing"), PageCategory::Other);
    }

    #[test]
    fn scroll_markers_fire_once_each() {
        let mut tracker = ScrollDepthTracker::new();
        assert_eq!(tracker.observe(10), Vec::<u8>::new());
        assert_eq!(tracker.observe(30), vec![25]);
        // Jumping far down crosses several markers in one observation
        assert_eq!(tracker.observe(80), vec![50, 75]);
        // Scrolling back up and down again fires nothing new
        assert_eq!(tracker.observe(80), Vec::<u8>::new());
        assert_eq!(tracker.observe(100), vec![100]);
        assert_eq!(tracker.fired(), &[25, 50, 75, 100]);
    }

    #[test]
    fn session_flags_are_ephemeral_key_values() {
        let mut flags = SessionFlags::new();
        flags.set("preferredContactMethod", "whatsapp");
        assert_eq!(flags.get("preferredContactMethod"), Some("whatsapp"));
        flags.clear();
        assert_eq!(flags.get("preferredContactMethod"), None);
    }
}
