//! Core types for business record consolidation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Origin system a record was collected from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    /// Mapping service listing
    MapsService,
    /// Review site listing
    ReviewSite,
    /// Social-profile page
    SocialPage,
    /// Produced by the record merger
    Merged,
}

impl std::fmt::Display for Source {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MapsService => write!(f, "mapsService"),
            Self::ReviewSite => write!(f, "reviewSite"),
            Self::SocialPage => write!(f, "socialPage"),
            Self::Merged => write!(f, "merged"),
        }
    }
}

/// Operating status reported by the source
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessStatus {
    #[default]
    Open,
    Closed,
    TemporarilyClosed,
}

/// Free-text opening hours, one entry per weekday
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OpeningHours {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thursday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub friday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturday: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sunday: Option<String>,
}

/// Listing details from the mapping service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MapsListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

/// Listing details from the review site
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ReviewListing {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub listing_id: Option<String>,
}

/// Page details from the social-profile source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SocialPage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

/// Links to other social profiles of the business
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SocialProfiles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instagram: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
}

/// A single business description collected from one source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Record {
    /// Unique identifier within one consolidation input
    pub id: String,
    /// Business name, non-empty by producer contract
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opening_hours: Option<OpeningHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maps_listing: Option<MapsListing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_listing: Option<ReviewListing>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_page: Option<SocialPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub social_profiles: Option<SocialProfiles>,
    #[serde(default)]
    pub business_status: BusinessStatus,
    pub source: Source,
    pub last_updated: DateTime<Utc>,
    /// Data quality score (0.0 - 1.0)
    pub confidence: f64,
    /// Ids of the two records a merged record replaces
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub merged_from: Vec<String>,
}

impl Record {
    pub fn new(id: impl Into<String>, name: impl Into<String>, source: Source) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: String::new(),
            address: String::new(),
            phone: None,
            website: None,
            email: None,
            opening_hours: None,
            maps_listing: None,
            review_listing: None,
            social_page: None,
            social_profiles: None,
            business_status: BusinessStatus::Open,
            source,
            last_updated: Utc::now(),
            confidence: 1.0,
            merged_from: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_website(mut self, website: impl Into<String>) -> Self {
        self.website = Some(website.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn with_opening_hours(mut self, hours: OpeningHours) -> Self {
        self.opening_hours = Some(hours);
        self
    }

    pub fn with_maps_listing(mut self, listing: MapsListing) -> Self {
        self.maps_listing = Some(listing);
        self
    }

    pub fn with_review_listing(mut self, listing: ReviewListing) -> Self {
        self.review_listing = Some(listing);
        self
    }

    pub fn with_social_page(mut self, page: SocialPage) -> Self {
        self.social_page = Some(page);
        self
    }

    pub fn with_social_profiles(mut self, profiles: SocialProfiles) -> Self {
        self.social_profiles = Some(profiles);
        self
    }

    pub fn with_status(mut self, status: BusinessStatus) -> Self {
        self.business_status = status;
        self
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_last_updated(mut self, last_updated: DateTime<Utc>) -> Self {
        self.last_updated = last_updated;
        self
    }

    /// Whether this record was produced by the merger
    pub fn is_merged(&self) -> bool {
        self.source == Source::Merged
    }
}

/// Strongest signal behind a match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    /// Name agreement backed by address similarity
    NameAddress,
    /// Same phone number
    NamePhone,
    /// Same website host
    Website,
    /// Approximate name agreement only
    Fuzzy,
}

impl std::fmt::Display for MatchType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameAddress => write!(f, "name_address"),
            Self::NamePhone => write!(f, "name_phone"),
            Self::Website => write!(f, "website"),
            Self::Fuzzy => write!(f, "fuzzy"),
        }
    }
}

/// A scored hypothesis that two records from different sources describe the
/// same business.
///
/// Records are borrowed from the consolidation input; `index_a` and `index_b`
/// are their positions in that input.
#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate<'a> {
    pub record_a: &'a Record,
    pub record_b: &'a Record,
    #[serde(skip)]
    pub index_a: usize,
    #[serde(skip)]
    pub index_b: usize,
    /// Accumulated score, not clamped (can reach 1.4)
    pub confidence: f64,
    pub match_type: MatchType,
}

impl MatchCandidate<'_> {
    /// Confidence clamped to 1.0 for user-facing output
    pub fn display_confidence(&self) -> f64 {
        self.confidence.min(1.0)
    }
}

/// Errors that can occur at the edges of the consolidation engine
#[derive(Debug, thiserror::Error)]
pub enum DedupError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Parse a JSON array of records as emitted by the producers
pub fn parse_records(json: &str) -> Result<Vec<Record>, DedupError> {
    Ok(serde_json::from_str(json)?)
}
