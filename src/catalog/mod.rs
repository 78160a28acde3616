//! Catalog service client: queries, response models and transport.

mod client;
mod collections;
mod error;
mod model;
mod query;

pub use client::{CatalogClient, CatalogTransport, ClientSettings};
pub use collections::CollectionList;
pub use error::FetchError;
pub use model::{
    total_pages, CatalogPage, Collection, CollectionExhibits, CollectionHeader, CollectionId,
    ExhibitDetail, ExhibitId, ExhibitSummary, RecordId, FIELD_PLACEHOLDER, NO_DESCRIPTION,
    PLACEHOLDER_IMAGE_URL, UNKNOWN_CREATOR,
};
pub use query::{FilterField, Query, DEFAULT_PAGE_SIZE};
