//! Run phase definitions for the scrape loop
//!
//! Every listing page starts and ends in `Idle`. A failed listing fetch goes
//! straight back to `Idle`; a failed product fetch goes back to
//! `ExtractingLinks` for the next link. `Done` is entered from `Idle` once
//! every seed URL and page is exhausted.

use std::fmt;

/// Represents where the run loop currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RunPhase {
    /// Between listing pages
    Idle,

    /// Waiting on a listing page
    FetchingListing,

    /// Pulling the next product link from the listing page
    ExtractingLinks,

    /// Waiting on a product page
    FetchingProduct,

    /// Reading product blocks from a product page
    ExtractingFields,

    /// Appending records to the collection
    Accumulating,

    /// All seed URLs and pages exhausted
    Done,
}

impl RunPhase {
    /// Returns true once the run has nothing left to do
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done)
    }

    /// Returns true while a request is in flight
    pub fn is_fetching(&self) -> bool {
        matches!(self, Self::FetchingListing | Self::FetchingProduct)
    }

    /// Returns true if the loop may move from `self` to `next`
    pub fn can_transition_to(&self, next: RunPhase) -> bool {
        use RunPhase::*;
        matches!(
            (*self, next),
            (Idle, FetchingListing)
                | (Idle, Done)
                | (FetchingListing, ExtractingLinks)
                | (FetchingListing, Idle)
                | (ExtractingLinks, FetchingProduct)
                | (ExtractingLinks, Idle)
                | (FetchingProduct, ExtractingFields)
                | (FetchingProduct, ExtractingLinks)
                | (ExtractingFields, Accumulating)
                | (Accumulating, ExtractingLinks)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::FetchingListing => "fetching_listing",
            Self::ExtractingLinks => "extracting_links",
            Self::FetchingProduct => "fetching_product",
            Self::ExtractingFields => "extracting_fields",
            Self::Accumulating => "accumulating",
            Self::Done => "done",
        }
    }

    /// Returns all run phases
    pub fn all_phases() -> Vec<Self> {
        vec![
            Self::Idle,
            Self::FetchingListing,
            Self::ExtractingLinks,
            Self::FetchingProduct,
            Self::ExtractingFields,
            Self::Accumulating,
            Self::Done,
        ]
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
