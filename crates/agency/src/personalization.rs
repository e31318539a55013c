//! Visitor segmentation from local interaction history
//!
//! The profile lives in the preference store under [`PROFILE_KEY`]. Segment,
//! service ordering, recommendations and greeting are pure functions of the
//! profile so they can be tested without a store.

use agency_store::{KeyValueStore, Persisted};
use chrono::{DateTime, Local, Timelike, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub const PROFILE_KEY: &str = "user-preferences";
pub const HAS_VISITED_KEY: &str = "has-visited";

const MAX_VISITED_PAGES: usize = 50;
const MAX_SEARCHES: usize = 20;
const MAX_SERVICES: usize = 10;
const MAX_INTERESTS: usize = 15;
const MAX_RECOMMENDATIONS: usize = 3;

static MOBILE_AGENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Mobi|Android").expect("valid mobile regex"));
static TABLET_AGENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Tablet|iPad").expect("valid tablet regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceType {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BehaviorData {
    pub session_count: u32,
    pub total_time_spent_ms: u64,
    pub average_session_duration_ms: f64,
    pub conversion_events: Vec<String>,
    pub last_visit: DateTime<Utc>,
    pub device_type: DeviceType,
    pub browser_type: String,
}

impl Default for BehaviorData {
    fn default() -> Self {
        Self {
            session_count: 0,
            total_time_spent_ms: 0,
            average_session_duration_ms: 0.0,
            conversion_events: Vec::new(),
            last_visit: Utc::now(),
            device_type: DeviceType::Desktop,
            browser_type: "unknown".to_string(),
        }
    }
}

/// Everything remembered about a visitor
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProfile {
    pub interests: Vec<String>,
    pub visited_pages: Vec<String>,
    pub search_history: Vec<String>,
    pub preferred_services: Vec<String>,
    pub behavior_data: BehaviorData,
}

impl UserProfile {
    fn has_visited(&self, page: &str) -> bool {
        self.visited_pages.iter().any(|p| p == page)
    }

    fn has_interest(&self, interest: &str) -> bool {
        self.interests.iter().any(|i| i == interest)
    }
}

/// Interaction worth remembering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BehaviorEvent {
    Conversion { kind: Option<String> },
    ServiceInterest { service: String },
    Search { query: String },
    ContentInteraction { interest: Option<String> },
}

impl BehaviorEvent {
    fn name(&self) -> &'static str {
        match self {
            BehaviorEvent::Conversion { .. } => "conversion",
            BehaviorEvent::ServiceInterest { .. } => "service_interest",
            BehaviorEvent::Search { .. } => "search",
            BehaviorEvent::ContentInteraction { .. } => "content_interaction",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Segment {
    NewUser,
    HighValueProspect,
    TechnicalUser,
    BusinessUser,
    ReturningVisitor,
    GeneralVisitor,
}

impl Segment {
    pub fn as_str(self) -> &'static str {
        match self {
            Segment::NewUser => "new_user",
            Segment::HighValueProspect => "high_value_prospect",
            Segment::TechnicalUser => "technical_user",
            Segment::BusinessUser => "business_user",
            Segment::ReturningVisitor => "returning_visitor",
            Segment::GeneralVisitor => "general_visitor",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bucket a visitor; the first matching rule wins
pub fn segment(profile: &UserProfile) -> Segment {
    let behavior = &profile.behavior_data;

    if behavior.session_count <= 2 {
        return Segment::NewUser;
    }

    if !behavior.conversion_events.is_empty()
        || profile.has_visited("/contact")
        || profile.has_visited("/services")
    {
        return Segment::HighValueProspect;
    }

    if profile.has_interest("AI")
        || profile.has_interest("Cloud")
        || profile.preferred_services.iter().any(|s| s.contains("Development"))
    {
        return Segment::TechnicalUser;
    }

    if profile.has_interest("Strategy")
        || profile.has_interest("Consulting")
        || profile.has_visited("/about")
    {
        return Segment::BusinessUser;
    }

    if behavior.session_count > 5 {
        return Segment::ReturningVisitor;
    }

    Segment::GeneralVisitor
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCategory {
    Technical,
    Business,
}

impl ServiceCategory {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceCategory::Technical => "technical",
            ServiceCategory::Business => "business",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: &'static str,
    pub name: &'static str,
    pub category: ServiceCategory,
}

pub const SERVICES: [Service; 6] = [
    Service { id: "web-dev", name: "Web Development", category: ServiceCategory::Technical },
    Service { id: "ai-integration", name: "AI Integration", category: ServiceCategory::Technical },
    Service { id: "cloud-solutions", name: "Cloud Solutions", category: ServiceCategory::Technical },
    Service { id: "digital-strategy", name: "Digital Strategy", category: ServiceCategory::Business },
    Service { id: "consulting", name: "Business Consulting", category: ServiceCategory::Business },
    Service { id: "automation", name: "Process Automation", category: ServiceCategory::Technical },
];

/// Services with the segment's category first, otherwise in catalogue order
pub fn personalized_services(segment: Segment) -> Vec<Service> {
    let mut services = SERVICES.to_vec();
    let preferred = match segment {
        Segment::TechnicalUser => ServiceCategory::Technical,
        Segment::BusinessUser => ServiceCategory::Business,
        _ => return services,
    };
    services.sort_by_key(|service| service.category != preferred);
    services
}

/// Up to three next steps for the visitor
pub fn recommendations(profile: &UserProfile, segment: Segment) -> Vec<&'static str> {
    let mut out = Vec::new();

    if segment == Segment::NewUser && !profile.has_visited("/about") {
        out.push("Learn more about our company");
    }
    if segment == Segment::HighValueProspect && !profile.has_visited("/portfolio") {
        out.push("View our portfolio");
    }
    if profile.has_interest("AI") && !profile.has_visited("/services") {
        out.push("Explore our AI services");
    }
    if profile.preferred_services.is_empty() {
        out.push("Discover our core services");
    }

    out.truncate(MAX_RECOMMENDATIONS);
    out
}

/// Greeting for the local hour of day (0-23)
pub fn greeting(segment: Segment, hour: u32, site_name: &str) -> String {
    let salutation = match hour {
        0..=11 => "Good morning",
        12..=17 => "Good afternoon",
        _ => "Good evening",
    };

    match segment {
        Segment::NewUser => format!("{}! Welcome to {}", salutation, site_name),
        Segment::ReturningVisitor => format!("{}! Welcome back", salutation),
        Segment::HighValueProspect => format!("{}! Ready to transform your business?", salutation),
        _ => format!("{}! How can we help you today?", salutation),
    }
}

/// Device class and browser family from a User-Agent header
pub fn detect_client(user_agent: &str) -> (DeviceType, &'static str) {
    let device = if MOBILE_AGENT.is_match(user_agent) {
        DeviceType::Mobile
    } else if TABLET_AGENT.is_match(user_agent) {
        DeviceType::Tablet
    } else {
        DeviceType::Desktop
    };

    let browser = if user_agent.contains("Chrome") {
        "chrome"
    } else if user_agent.contains("Firefox") {
        "firefox"
    } else if user_agent.contains("Safari") {
        "safari"
    } else if user_agent.contains("Edge") {
        "edge"
    } else {
        "unknown"
    };

    (device, browser)
}

fn push_capped(list: &mut Vec<String>, item: String, cap: usize) {
    list.push(item);
    if list.len() > cap {
        let excess = list.len() - cap;
        list.drain(..excess);
    }
}

fn push_unique_capped(list: &mut Vec<String>, item: String, cap: usize) -> bool {
    if list.contains(&item) {
        return false;
    }
    push_capped(list, item, cap);
    true
}

/// Persisted visitor profile
#[derive(Debug, Clone)]
pub struct Personalization {
    profile: Persisted<UserProfile>,
    returning: bool,
}

impl Personalization {
    /// Load the profile and record that this visitor has now been seen
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let profile = Persisted::new(Arc::clone(&store), PROFILE_KEY, UserProfile::default());
        let has_visited = Persisted::new(store, HAS_VISITED_KEY, false);

        let returning = profile.is_stored() || has_visited.get();
        if !has_visited.is_stored() {
            has_visited.set(&true);
        }

        debug!(returning, "personalization profile loaded");
        Self { profile, returning }
    }

    pub fn profile(&self) -> UserProfile {
        self.profile.get()
    }

    pub fn is_returning_user(&self) -> bool {
        self.returning
    }

    pub fn segment(&self) -> Segment {
        segment(&self.profile())
    }

    /// Record a page view at `path`; each call counts as a session start
    pub fn track_page_visit(&self, path: &str) {
        self.profile.update(|mut profile| {
            push_unique_capped(&mut profile.visited_pages, path.to_string(), MAX_VISITED_PAGES);
            profile.behavior_data.session_count = profile.behavior_data.session_count.saturating_add(1);
            profile
        });
    }

    pub fn track_behavior(&self, event: BehaviorEvent) {
        let profile = self.profile.update(|mut profile| {
            match &event {
                BehaviorEvent::Conversion { kind } => {
                    let kind = kind.clone().unwrap_or_else(|| "unknown".to_string());
                    profile.behavior_data.conversion_events.push(kind);
                }
                BehaviorEvent::ServiceInterest { service } => {
                    push_unique_capped(&mut profile.preferred_services, service.clone(), MAX_SERVICES);
                }
                BehaviorEvent::Search { query } => {
                    push_capped(&mut profile.search_history, query.clone(), MAX_SEARCHES);
                }
                BehaviorEvent::ContentInteraction { interest } => {
                    if let Some(interest) = interest {
                        push_unique_capped(&mut profile.interests, interest.clone(), MAX_INTERESTS);
                    }
                }
            }
            profile
        });

        info!(event = event.name(), segment = %segment(&profile), "visitor behavior tracked");
    }

    /// Fold a finished session into the time totals
    pub fn track_session_end(&self, duration: Duration) {
        self.profile.update(|mut profile| {
            let behavior = &mut profile.behavior_data;
            let spent = u64::try_from(duration.as_millis()).unwrap_or(u64::MAX);
            behavior.total_time_spent_ms = behavior.total_time_spent_ms.saturating_add(spent);
            behavior.average_session_duration_ms = if behavior.session_count > 0 {
                behavior.total_time_spent_ms as f64 / f64::from(behavior.session_count)
            } else {
                0.0
            };
            behavior.last_visit = Utc::now();
            profile
        });
    }

    /// Remember the visitor's device and browser
    pub fn record_client(&self, user_agent: &str) {
        let (device, browser) = detect_client(user_agent);
        self.profile.update(|mut profile| {
            profile.behavior_data.device_type = device;
            profile.behavior_data.browser_type = browser.to_string();
            profile
        });
    }

    pub fn services(&self) -> Vec<Service> {
        personalized_services(self.segment())
    }

    pub fn recommendations(&self) -> Vec<&'static str> {
        let profile = self.profile();
        recommendations(&profile, segment(&profile))
    }

    pub fn greeting(&self, site_name: &str) -> String {
        greeting(self.segment(), Local::now().hour(), site_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use agency_store::MemoryStore;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn profile_with_sessions(sessions: u32) -> UserProfile {
        let mut profile = UserProfile::default();
        profile.behavior_data.session_count = sessions;
        profile
    }

    #[test]
    fn test_new_user_wins_over_everything() {
        let mut profile = profile_with_sessions(2);
        profile.visited_pages.push("/contact".to_string());
        profile.interests.push("AI".to_string());
        assert_eq!(segment(&profile), Segment::NewUser);
    }

    #[rstest]
    #[case(&["/contact"], &[], &[], Segment::HighValueProspect)]
    #[case(&["/services"], &["AI"], &[], Segment::HighValueProspect)]
    #[case(&["/about"], &["Cloud"], &[], Segment::TechnicalUser)]
    #[case(&[], &[], &["Web Development"], Segment::TechnicalUser)]
    #[case(&["/about"], &[], &[], Segment::BusinessUser)]
    #[case(&[], &["Consulting"], &[], Segment::BusinessUser)]
    #[case(&["/blog"], &[], &[], Segment::GeneralVisitor)]
    fn test_segment_rules(
        #[case] pages: &[&str],
        #[case] interests: &[&str],
        #[case] services: &[&str],
        #[case] expected: Segment,
    ) {
        let mut profile = profile_with_sessions(4);
        profile.visited_pages = pages.iter().map(|s| s.to_string()).collect();
        profile.interests = interests.iter().map(|s| s.to_string()).collect();
        profile.preferred_services = services.iter().map(|s| s.to_string()).collect();
        assert_eq!(segment(&profile), expected);
    }

    #[test]
    fn test_conversion_makes_high_value_prospect() {
        let mut profile = profile_with_sessions(3);
        profile.behavior_data.conversion_events.push("contact_request".to_string());
        assert_eq!(segment(&profile), Segment::HighValueProspect);
    }

    #[test]
    fn test_returning_visitor_after_five_sessions() {
        assert_eq!(segment(&profile_with_sessions(5)), Segment::GeneralVisitor);
        assert_eq!(segment(&profile_with_sessions(6)), Segment::ReturningVisitor);
    }

    #[test]
    fn test_service_ordering() {
        let technical: Vec<_> = personalized_services(Segment::TechnicalUser)
            .iter()
            .map(|s| s.id)
            .collect();
        assert_eq!(
            technical,
            vec!["web-dev", "ai-integration", "cloud-solutions", "automation", "digital-strategy", "consulting"]
        );

        let business = personalized_services(Segment::BusinessUser);
        assert_eq!(business[0].id, "digital-strategy");
        assert_eq!(business[1].id, "consulting");

        assert_eq!(personalized_services(Segment::NewUser), SERVICES.to_vec());
    }

    #[test]
    fn test_recommendations_capped_at_three() {
        let mut profile = profile_with_sessions(1);
        profile.interests.push("AI".to_string());
        let recs = recommendations(&profile, segment(&profile));
        assert_eq!(
            recs,
            vec![
                "Learn more about our company",
                "Explore our AI services",
                "Discover our core services",
            ]
        );
    }

    #[rstest]
    #[case(Segment::NewUser, 9, "Good morning! Welcome to Acme")]
    #[case(Segment::ReturningVisitor, 12, "Good afternoon! Welcome back")]
    #[case(Segment::HighValueProspect, 20, "Good evening! Ready to transform your business?")]
    #[case(Segment::BusinessUser, 17, "Good afternoon! How can we help you today?")]
    fn test_greeting(#[case] segment: Segment, #[case] hour: u32, #[case] expected: &str) {
        assert_eq!(greeting(segment, hour, "Acme"), expected);
    }

    #[test]
    fn test_detect_client() {
        assert_eq!(
            detect_client("Mozilla/5.0 (Linux; Android 14) Chrome/120.0 Mobile Safari/537.36"),
            (DeviceType::Mobile, "chrome")
        );
        assert_eq!(
            detect_client("Mozilla/5.0 (iPad; CPU OS 17_0) Version/17.0 Safari/604.1"),
            (DeviceType::Tablet, "safari")
        );
        assert_eq!(
            detect_client("Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"),
            (DeviceType::Desktop, "firefox")
        );
    }

    #[test]
    fn test_tracking_caps_and_uniqueness() {
        let personalization = Personalization::load(Arc::new(MemoryStore::new()));

        for i in 0..25 {
            personalization.track_behavior(BehaviorEvent::Search { query: format!("q{}", i) });
        }
        for _ in 0..3 {
            personalization.track_behavior(BehaviorEvent::ServiceInterest {
                service: "Cloud Solutions".to_string(),
            });
        }
        personalization.track_behavior(BehaviorEvent::ContentInteraction { interest: None });
        personalization.track_behavior(BehaviorEvent::Conversion { kind: None });

        let profile = personalization.profile();
        assert_eq!(profile.search_history.len(), 20);
        assert_eq!(profile.search_history[0], "q5");
        assert_eq!(profile.preferred_services, vec!["Cloud Solutions"]);
        assert!(profile.interests.is_empty());
        assert_eq!(profile.behavior_data.conversion_events, vec!["unknown"]);
    }

    #[test]
    fn test_page_visits_count_sessions() {
        let personalization = Personalization::load(Arc::new(MemoryStore::new()));
        personalization.track_page_visit("/");
        personalization.track_page_visit("/services");
        personalization.track_page_visit("/services");

        let profile = personalization.profile();
        assert_eq!(profile.visited_pages, vec!["/", "/services"]);
        assert_eq!(profile.behavior_data.session_count, 3);
        assert_eq!(personalization.segment(), Segment::HighValueProspect);
    }

    #[test]
    fn test_session_end_averages() {
        let personalization = Personalization::load(Arc::new(MemoryStore::new()));
        personalization.track_page_visit("/");
        personalization.track_page_visit("/about");
        personalization.track_session_end(Duration::from_secs(60));

        let behavior = personalization.profile().behavior_data;
        assert_eq!(behavior.total_time_spent_ms, 60_000);
        assert_eq!(behavior.average_session_duration_ms, 30_000.0);
    }

    #[test]
    fn test_returning_user_detection() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let first = Personalization::load(Arc::clone(&store));
        assert!(!first.is_returning_user());

        let second = Personalization::load(Arc::clone(&store));
        assert!(second.is_returning_user());

        let legacy: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entries([("has-visited", "true")]));
        assert!(Personalization::load(legacy).is_returning_user());
    }

    #[test]
    fn test_saturated_counters_do_not_overflow() {
        let stored = r#"{"behaviorData":{"sessionCount":4294967295,"totalTimeSpentMs":18446744073709551615}}"#;
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::with_entries([(PROFILE_KEY, stored)]));
        let personalization = Personalization::load(store);

        personalization.track_page_visit("/");
        personalization.track_session_end(Duration::from_secs(60));

        let behavior = personalization.profile().behavior_data;
        assert_eq!(behavior.session_count, u32::MAX);
        assert_eq!(behavior.total_time_spent_ms, u64::MAX);
    }

    #[test]
    fn test_malformed_profile_falls_back_to_default() {
        let store: Arc<dyn KeyValueStore> =
            Arc::new(MemoryStore::with_entries([(PROFILE_KEY, "{broken")]));
        let personalization = Personalization::load(store);
        assert_eq!(personalization.profile().visited_pages, Vec::<String>::new());
        assert_eq!(personalization.segment(), Segment::NewUser);
    }
}
