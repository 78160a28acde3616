//! Personal collections: list, create, delete, and exhibit membership.
//!
//! Every call needs a bearer token. Without one the call fails with
//! [`FetchError::Unauthenticated`] before anything is sent.

use reqwest::{Method, Url};
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::catalog::client::{push_segments, CatalogClient};
use crate::catalog::error::FetchError;
use crate::catalog::model::{Collection, CollectionExhibits, CollectionId, ExhibitDetail, ExhibitId};

#[derive(Debug, Serialize)]
struct NewCollection<'a> {
    name: &'a str,
    description: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SaveExhibit<'a> {
    collection_id: &'a CollectionId,
    exhibit_id: &'a ExhibitId,
    title: &'a str,
    institution: Option<&'a str>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RemoveExhibit<'a> {
    collection_id: &'a CollectionId,
    exhibit_id: &'a ExhibitId,
}

impl CatalogClient {
    fn collections_url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.endpoint("/collections")?;
        if !segments.is_empty() {
            push_segments(&mut url, segments)?;
        }
        Ok(url)
    }

    fn require_auth(&self) -> Result<(), FetchError> {
        if self.auth().is_authenticated() {
            Ok(())
        } else {
            Err(FetchError::Unauthenticated)
        }
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>, FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&[])?;
        self.send_json(self.request(Method::GET, &url), &url, &CancellationToken::new())
            .await
    }

    pub async fn create_collection(
        &self,
        name: &str,
        description: &str,
    ) -> Result<Collection, FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&[])?;
        let request = self
            .request(Method::POST, &url)
            .json(&NewCollection { name, description });
        let created: Collection = self
            .send_json(request, &url, &CancellationToken::new())
            .await?;
        tracing::info!(collection = %created.id, name = %created.name, "Collection created");
        Ok(created)
    }

    pub async fn delete_collection(&self, id: &CollectionId) -> Result<(), FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&[id.as_str()])?;
        self.send(self.request(Method::DELETE, &url), &url, &CancellationToken::new())
            .await?;
        tracing::info!(collection = %id, "Collection deleted");
        Ok(())
    }

    pub async fn collection_exhibits(
        &self,
        id: &CollectionId,
    ) -> Result<CollectionExhibits, FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&[id.as_str(), "exhibits"])?;
        self.send_json(self.request(Method::GET, &url), &url, &CancellationToken::new())
            .await
    }

    /// Saves `exhibit` into a collection, sending the title and institution
    /// the service stores alongside the reference.
    pub async fn add_to_collection(
        &self,
        collection: &CollectionId,
        exhibit: &ExhibitDetail,
    ) -> Result<(), FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&["save"])?;
        let request = self.request(Method::POST, &url).json(&SaveExhibit {
            collection_id: collection,
            exhibit_id: &exhibit.summary.id,
            title: &exhibit.summary.title,
            institution: exhibit.institution.as_deref(),
        });
        self.send(request, &url, &CancellationToken::new()).await?;
        tracing::info!(collection = %collection, exhibit = %exhibit.summary.id, "Exhibit added");
        Ok(())
    }

    pub async fn remove_from_collection(
        &self,
        collection: &CollectionId,
        exhibit: &ExhibitId,
    ) -> Result<(), FetchError> {
        self.require_auth()?;
        let url = self.collections_url(&["exhibits"])?;
        let request = self.request(Method::DELETE, &url).json(&RemoveExhibit {
            collection_id: collection,
            exhibit_id: exhibit,
        });
        self.send(request, &url, &CancellationToken::new()).await?;
        tracing::info!(collection = %collection, exhibit = %exhibit, "Exhibit removed");
        Ok(())
    }
}

/// Locally held list of the user's collections.
///
/// Creating or deleting a collection updates the list in place instead of
/// refetching it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CollectionList {
    items: Vec<Collection>,
}

impl CollectionList {
    pub fn new(items: Vec<Collection>) -> Self {
        Self { items }
    }

    pub fn items(&self) -> &[Collection] {
        &self.items
    }

    pub fn get(&self, id: &CollectionId) -> Option<&Collection> {
        self.items.iter().find(|c| &c.id == id)
    }

    pub fn push(&mut self, collection: Collection) {
        self.items.push(collection);
    }

    /// Removes the collection with `id`. Returns whether anything was removed.
    pub fn remove(&mut self, id: &CollectionId) -> bool {
        let before = self.items.len();
        self.items.retain(|c| &c.id != id);
        self.items.len() != before
    }
}
