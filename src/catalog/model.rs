//! Response shapes of the catalog and collections service.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Shown when an exhibit has no creator.
pub const UNKNOWN_CREATOR: &str = "Unknown";
/// Shown when an exhibit has no description.
pub const NO_DESCRIPTION: &str = "No description available";
/// Shown in place of a missing image.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/150";
/// Shown for any other missing optional field.
pub const FIELD_PLACEHOLDER: &str = "Unknown";

/// Identifier assigned by the service. Accepts JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Int(i64),
            Float(f64),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Text(s) => RecordId(s),
            Raw::Int(n) => RecordId(n.to_string()),
            Raw::Float(n) => RecordId(n.to_string()),
        })
    }
}

pub type ExhibitId = RecordId;
pub type CollectionId = RecordId;

/// One exhibit as listed in a catalog page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitSummary {
    pub id: ExhibitId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub creator: Option<String>,
    #[serde(default, alias = "image_url")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub collection: Option<String>,
    #[serde(default)]
    pub culture: Option<String>,
    #[serde(default)]
    pub date: Option<String>,
}

impl ExhibitSummary {
    pub fn creator_or_placeholder(&self) -> &str {
        present(&self.creator).unwrap_or(UNKNOWN_CREATOR)
    }

    pub fn description_or_placeholder(&self) -> &str {
        present(&self.description).unwrap_or(NO_DESCRIPTION)
    }

    pub fn image_url_or_placeholder(&self) -> &str {
        present(&self.image_url).unwrap_or(PLACEHOLDER_IMAGE_URL)
    }

    pub fn collection_or_placeholder(&self) -> &str {
        present(&self.collection).unwrap_or(FIELD_PLACEHOLDER)
    }

    pub fn culture_or_placeholder(&self) -> &str {
        present(&self.culture).unwrap_or(FIELD_PLACEHOLDER)
    }

    pub fn date_or_placeholder(&self) -> &str {
        present(&self.date).unwrap_or(FIELD_PLACEHOLDER)
    }
}

/// Full exhibit record returned by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExhibitDetail {
    #[serde(flatten)]
    pub summary: ExhibitSummary,
    #[serde(default)]
    pub medium: Option<String>,
    #[serde(default)]
    pub style_or_period: Option<String>,
    #[serde(default)]
    pub institution: Option<String>,
}

impl ExhibitDetail {
    pub fn medium_or_placeholder(&self) -> &str {
        present(&self.medium).unwrap_or(FIELD_PLACEHOLDER)
    }

    pub fn period_or_placeholder(&self) -> &str {
        present(&self.style_or_period).unwrap_or(FIELD_PLACEHOLDER)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ExhibitEnvelope {
    pub exhibit: ExhibitDetail,
}

/// One page of catalog results.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogPage {
    #[serde(default, alias = "exhibits")]
    pub items: Vec<ExhibitSummary>,
    /// Total matches across all pages. Older deployments omit it.
    #[serde(default)]
    pub total_count: Option<u64>,
}

impl CatalogPage {
    /// Number of pages for this result set, `None` when the count is unknown.
    pub fn total_pages(&self, page_size: u32) -> Option<u32> {
        self.total_count.map(|count| total_pages(count, page_size))
    }
}

/// `ceil(total_count / page_size)`, never less than one page.
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    let pages = total_count.div_ceil(size).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// A user's named collection of exhibits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: CollectionId,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub exhibit_count: Option<u64>,
}

impl Collection {
    /// "1 exhibit", "3 exhibits"; a missing count reads as zero.
    pub fn exhibit_count_label(&self) -> String {
        let count = self.exhibit_count.unwrap_or(0);
        if count == 1 {
            "1 exhibit".to_string()
        } else {
            format!("{} exhibits", count)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CollectionHeader {
    #[serde(default)]
    pub name: String,
}

/// Exhibits saved into one collection.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct CollectionExhibits {
    #[serde(default)]
    pub collection: CollectionHeader,
    #[serde(default)]
    pub exhibits: Vec<ExhibitSummary>,
}

impl CollectionExhibits {
    pub fn title(&self) -> &str {
        if self.collection.name.trim().is_empty() {
            "Collection"
        } else {
            &self.collection.name
        }
    }
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_rounds_up() {
        assert_eq!(total_pages(41, 20), 3);
        assert_eq!(total_pages(57, 20), 3);
        assert_eq!(total_pages(40, 20), 2);
        assert_eq!(total_pages(1, 20), 1);
    }

    #[test]
    fn empty_result_is_one_page() {
        assert_eq!(total_pages(0, 20), 1);
    }

    #[test]
    fn page_without_count_has_unknown_total() {
        let page: CatalogPage = serde_json::from_str(r#"{"exhibits": []}"#).unwrap();
        assert_eq!(page.total_pages(20), None);
    }

    #[test]
    fn catalog_page_accepts_items_or_exhibits() {
        let page: CatalogPage = serde_json::from_str(
            r#"{"items": [{"id": 7, "title": "Amphora"}], "totalCount": 41}"#,
        )
        .unwrap();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id.as_str(), "7");
        assert_eq!(page.total_pages(20), Some(3));

        let legacy: CatalogPage =
            serde_json::from_str(r#"{"exhibits": [{"id": "harvard-12", "title": "Bowl"}]}"#)
                .unwrap();
        assert_eq!(legacy.items[0].id.as_str(), "harvard-12");
    }

    #[test]
    fn summary_placeholders() {
        let exhibit: ExhibitSummary =
            serde_json::from_str(r#"{"id": "1", "title": "Coin", "description": "  "}"#).unwrap();
        assert_eq!(exhibit.creator_or_placeholder(), UNKNOWN_CREATOR);
        assert_eq!(exhibit.description_or_placeholder(), NO_DESCRIPTION);
        assert_eq!(exhibit.image_url_or_placeholder(), PLACEHOLDER_IMAGE_URL);
        assert_eq!(exhibit.date_or_placeholder(), FIELD_PLACEHOLDER);
    }

    #[test]
    fn snake_case_image_url_is_accepted() {
        let exhibit: ExhibitSummary =
            serde_json::from_str(r#"{"id": "1", "image_url": "https://img/1.jpg"}"#).unwrap();
        assert_eq!(exhibit.image_url_or_placeholder(), "https://img/1.jpg");
    }

    #[test]
    fn detail_flattens_summary_fields() {
        let envelope: ExhibitEnvelope = serde_json::from_str(
            r#"{"exhibit": {"id": 3, "title": "Head of Augustus", "creator": "Unknown Roman",
                "medium": "marble", "styleOrPeriod": "Imperial", "institution": "harvard"}}"#,
        )
        .unwrap();
        let detail = envelope.exhibit;
        assert_eq!(detail.summary.title, "Head of Augustus");
        assert_eq!(detail.medium_or_placeholder(), "marble");
        assert_eq!(detail.period_or_placeholder(), "Imperial");
        assert_eq!(detail.institution.as_deref(), Some("harvard"));
    }

    #[test]
    fn exhibit_count_label() {
        let mut collection = Collection {
            id: RecordId::new("1"),
            name: "Favourites".to_string(),
            description: None,
            exhibit_count: None,
        };
        assert_eq!(collection.exhibit_count_label(), "0 exhibits");
        collection.exhibit_count = Some(1);
        assert_eq!(collection.exhibit_count_label(), "1 exhibit");
        collection.exhibit_count = Some(5);
        assert_eq!(collection.exhibit_count_label(), "5 exhibits");
    }

    #[test]
    fn collection_exhibits_title_falls_back() {
        let exhibits: CollectionExhibits = serde_json::from_str(r#"{"exhibits": []}"#).unwrap();
        assert_eq!(exhibits.title(), "Collection");
    }
}
