use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;

use crate::catalog::error::FetchError;
use crate::catalog::model::{CatalogPage, ExhibitDetail, ExhibitEnvelope, ExhibitId};
use crate::catalog::query::Query;
use crate::config::{AuthContext, Config};

/// Source of catalog pages for the fetch controller.
///
/// Implementations should stop work when `cancel` fires and return
/// [`FetchError::Cancelled`], but callers never rely on it: a superseded
/// attempt's result is discarded whatever it turns out to be.
#[async_trait]
pub trait CatalogTransport: Send + Sync + 'static {
    async fn fetch_page(
        &self,
        query: &Query,
        cancel: CancellationToken,
    ) -> Result<CatalogPage, FetchError>;
}

/// Endpoint and timeout settings for [`CatalogClient`].
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub api_base: String,
    pub exhibits_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Option<Duration>,
}

impl ClientSettings {
    pub fn new(api_base: impl Into<String>) -> Self {
        let defaults = Config::default();
        Self {
            api_base: api_base.into(),
            exhibits_path: defaults.catalog.exhibits_path,
            connect_timeout: Duration::from_secs(u64::from(defaults.http.connect_timeout_seconds)),
            request_timeout: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            api_base: config.catalog.api_base.clone(),
            exhibits_path: config.catalog.exhibits_path.clone(),
            connect_timeout: Duration::from_secs(u64::from(config.http.connect_timeout_seconds)),
            request_timeout: config
                .http
                .request_timeout_seconds
                .map(|secs| Duration::from_secs(u64::from(secs))),
        }
    }

    pub fn with_request_timeout(mut self, limit: Duration) -> Self {
        self.request_timeout = Some(limit);
        self
    }
}

/// HTTP client for the catalog and collections service.
#[derive(Clone)]
pub struct CatalogClient {
    client: Client,
    settings: ClientSettings,
    auth: AuthContext,
}

impl CatalogClient {
    pub fn new(settings: ClientSettings, auth: AuthContext) -> Result<Self, FetchError> {
        let client = Client::builder()
            .connect_timeout(settings.connect_timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            settings,
            auth,
        })
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    /// `api_base` joined with `path`, keeping any path prefix on the base.
    pub fn endpoint(&self, path: &str) -> Result<Url, FetchError> {
        let raw = format!(
            "{}/{}",
            self.settings.api_base.trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Url::parse(&raw).map_err(|e| FetchError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })
    }

    /// Catalog listing URL for `query`; empty filters are left out.
    pub fn catalog_url(&self, query: &Query) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&self.settings.exhibits_path)?;
        url.query_pairs_mut().extend_pairs(query.params());
        Ok(url)
    }

    pub fn exhibit_url(&self, id: &ExhibitId) -> Result<Url, FetchError> {
        let mut url = self.endpoint(&self.settings.exhibits_path)?;
        push_segments(&mut url, &[id.as_str()])?;
        Ok(url)
    }

    /// Full record for one exhibit.
    pub async fn fetch_exhibit(&self, id: &ExhibitId) -> Result<ExhibitDetail, FetchError> {
        let url = self.exhibit_url(id)?;
        tracing::debug!(url = %url, "Fetching exhibit detail");
        let envelope: ExhibitEnvelope = self
            .send_json(
                self.request(reqwest::Method::GET, &url),
                &url,
                &CancellationToken::new(),
            )
            .await?;
        Ok(envelope.exhibit)
    }

    pub(crate) fn request(&self, method: reqwest::Method, url: &Url) -> RequestBuilder {
        let builder = self.client.request(method, url.clone());
        match self.auth.bearer() {
            Some(value) => builder.header(reqwest::header::AUTHORIZATION, value),
            None => builder,
        }
    }

    /// Sends `request` and decodes a 2xx JSON body.
    pub(crate) async fn send_json<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<T, FetchError> {
        let response = self.send(request, url, cancel).await?;
        self.guard(cancel, async {
            response.json::<T>().await.map_err(|e| FetchError::Decode {
                url: url.to_string(),
                source: e,
            })
        })
        .await
    }

    /// Sends `request`, failing on transport errors and non-2xx statuses.
    pub(crate) async fn send(
        &self,
        request: RequestBuilder,
        url: &Url,
        cancel: &CancellationToken,
    ) -> Result<Response, FetchError> {
        self.guard(cancel, async {
            let response = request.send().await.map_err(|e| FetchError::Transport {
                url: url.to_string(),
                source: e,
            })?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.to_string(),
                    status: status.as_u16(),
                });
            }
            Ok(response)
        })
        .await
    }

    /// Races `work` against cancellation and the optional request timeout.
    async fn guard<T, F>(&self, cancel: &CancellationToken, work: F) -> Result<T, FetchError>
    where
        F: Future<Output = Result<T, FetchError>>,
    {
        let bounded = async {
            match self.settings.request_timeout {
                Some(limit) => match timeout(limit, work).await {
                    Ok(result) => result,
                    Err(_) => Err(FetchError::Timeout {
                        duration_ms: limit.as_millis() as u64,
                    }),
                },
                None => work.await,
            }
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::Cancelled),
            result = bounded => result,
        }
    }
}

#[async_trait]
impl CatalogTransport for CatalogClient {
    async fn fetch_page(
        &self,
        query: &Query,
        cancel: CancellationToken,
    ) -> Result<CatalogPage, FetchError> {
        let url = self.catalog_url(query)?;
        tracing::debug!(url = %url, "Fetching catalog page");
        self.send_json(self.request(reqwest::Method::GET, &url), &url, &cancel)
            .await
    }
}

pub(crate) fn push_segments(url: &mut Url, segments: &[&str]) -> Result<(), FetchError> {
    let raw = url.to_string();
    let mut path = url.path_segments_mut().map_err(|_| FetchError::InvalidUrl {
        url: raw,
        reason: "URL cannot be a base".to_string(),
    })?;
    path.pop_if_empty().extend(segments);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::FilterField;

    fn client(base: &str) -> CatalogClient {
        CatalogClient::new(ClientSettings::new(base), AuthContext::anonymous()).unwrap()
    }

    #[test]
    fn catalog_url_omits_empty_filters() {
        let query = Query::default()
            .with_filter(FilterField::Culture, "Roman")
            .with_filter(FilterField::Medium, "");
        let url = client("https://museum.example").catalog_url(&query).unwrap();
        assert_eq!(
            url.as_str(),
            "https://museum.example/api/exhibits?page=1&pageSize=20&culture=Roman"
        );
    }

    #[test]
    fn search_text_is_encoded() {
        let query = Query::default().with_search_text("blue & white");
        let url = client("https://museum.example/").catalog_url(&query).unwrap();
        assert_eq!(url.query(), Some("page=1&pageSize=20&query=blue+%26+white"));
    }

    #[test]
    fn base_path_prefix_is_kept() {
        let url = client("https://museum.example/v2/").endpoint("/collections").unwrap();
        assert_eq!(url.as_str(), "https://museum.example/v2/collections");
    }

    #[test]
    fn exhibit_id_is_one_path_segment() {
        let url = client("https://museum.example")
            .exhibit_url(&ExhibitId::new("a/b"))
            .unwrap();
        assert_eq!(url.as_str(), "https://museum.example/api/exhibits/a%2Fb");
    }

    #[tokio::test]
    async fn cancelled_token_short_circuits() {
        let client = client("http://127.0.0.1:9");
        let cancel = CancellationToken::new();
        cancel.cancel();
        let err = client
            .fetch_page(&Query::default(), cancel)
            .await
            .unwrap_err();
        assert!(err.is_cancelled());
    }
}
