pub mod client;
pub mod controller;
pub mod error;
pub mod extract;
pub mod listing;
pub mod normalize;
mod parse_helpers;
pub mod review;
pub mod shape;
pub mod types;

pub use client::{AdminClient, CredentialProvider, NoCredentials, StaticToken};
pub use controller::{FetchTicket, ListingController, ProductSource, FETCH_ERROR_FALLBACK};
pub use error::ApiError;
pub use extract::{FieldValue, ProductField, RawProduct};
pub use listing::{
    FilterField, ListingFilters, ListingKind, ListingPage, ListingQuery, PriceRange, PAGE_SIZE,
};
pub use normalize::{normalize_product, split_variant_title};
pub use review::{
    validate_rejection_reason, ProductReviewer, ReviewOutcome, REJECTION_REASON_REQUIRED,
};
pub use shape::{detect_collection_shape, detect_record_shape, Shape};
pub use types::{FilterOption, FilterOptions, RawProductA, RawProductB};
