//! Field-level merging of two matched records
//!
//! The record with the higher data-quality confidence is the base. Every field
//! takes the base value when it is filled and falls back to the other record.

use crate::types::{
    MapsListing, MatchCandidate, OpeningHours, Record, ReviewListing, SocialPage, SocialProfiles,
    Source,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Key-by-key merge where `self` wins over `other`
pub trait MergeFields {
    fn merge_fields(&self, other: &Self) -> Self;
}

fn is_filled(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn prefer(base: &Option<String>, other: &Option<String>) -> Option<String> {
    if is_filled(base) {
        base.clone()
    } else {
        other.clone()
    }
}

fn prefer_text(base: &str, other: &str) -> String {
    if base.trim().is_empty() {
        other.to_string()
    } else {
        base.to_string()
    }
}

fn merge_optional<T: MergeFields + Clone>(base: &Option<T>, other: &Option<T>) -> Option<T> {
    match (base, other) {
        (Some(base), Some(other)) => Some(base.merge_fields(other)),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

impl MergeFields for OpeningHours {
    fn merge_fields(&self, other: &Self) -> Self {
        Self {
            monday: prefer(&self.monday, &other.monday),
            tuesday: prefer(&self.tuesday, &other.tuesday),
            wednesday: prefer(&self.wednesday, &other.wednesday),
            thursday: prefer(&self.thursday, &other.thursday),
            friday: prefer(&self.friday, &other.friday),
            saturday: prefer(&self.saturday, &other.saturday),
            sunday: prefer(&self.sunday, &other.sunday),
        }
    }
}

impl MergeFields for MapsListing {
    fn merge_fields(&self, other: &Self) -> Self {
        Self {
            rating: self.rating.or(other.rating),
            review_count: self.review_count.or(other.review_count),
            place_id: prefer(&self.place_id, &other.place_id),
        }
    }
}

impl MergeFields for ReviewListing {
    fn merge_fields(&self, other: &Self) -> Self {
        Self {
            rating: self.rating.or(other.rating),
            review_count: self.review_count.or(other.review_count),
            listing_id: prefer(&self.listing_id, &other.listing_id),
        }
    }
}

impl MergeFields for SocialPage {
    fn merge_fields(&self, other: &Self) -> Self {
        Self {
            page_url: prefer(&self.page_url, &other.page_url),
            page_id: prefer(&self.page_id, &other.page_id),
            verified: self.verified.or(other.verified),
        }
    }
}

impl MergeFields for SocialProfiles {
    fn merge_fields(&self, other: &Self) -> Self {
        Self {
            instagram: prefer(&self.instagram, &other.instagram),
            twitter: prefer(&self.twitter, &other.twitter),
            linkedin: prefer(&self.linkedin, &other.linkedin),
        }
    }
}

/// Merge two records describing the same business into a new canonical record
///
/// `first` is the base unless `second` has strictly higher confidence.
pub fn merge_records(first: &Record, second: &Record) -> Record {
    merge_records_at(first, second, Utc::now())
}

/// Merge with an explicit `last_updated` timestamp
pub fn merge_records_at(first: &Record, second: &Record, now: DateTime<Utc>) -> Record {
    let (base, other) = if first.confidence >= second.confidence {
        (first, second)
    } else {
        (second, first)
    };

    Record {
        id: format!("merged_{}", Uuid::new_v4()),
        name: prefer_text(&base.name, &other.name),
        category: prefer_text(&base.category, &other.category),
        address: prefer_text(&base.address, &other.address),
        phone: prefer(&base.phone, &other.phone),
        website: prefer(&base.website, &other.website),
        email: prefer(&base.email, &other.email),
        opening_hours: merge_optional(&base.opening_hours, &other.opening_hours),
        maps_listing: merge_optional(&base.maps_listing, &other.maps_listing),
        review_listing: merge_optional(&base.review_listing, &other.review_listing),
        social_page: merge_optional(&base.social_page, &other.social_page),
        social_profiles: merge_optional(&base.social_profiles, &other.social_profiles),
        business_status: base.business_status,
        source: Source::Merged,
        last_updated: now,
        confidence: base.confidence.max(other.confidence),
        merged_from: vec![base.id.clone(), other.id.clone()],
    }
}

/// Merge the two records of an accepted candidate
pub fn merge_candidate(candidate: &MatchCandidate<'_>) -> Record {
    merge_records(candidate.record_a, candidate.record_b)
}
