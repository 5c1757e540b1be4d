//! HTTP-backed source for live data.
//!
//! Endpoints:
//!   `GET {base}/api/crops/{region}`                 → `{ "groups": [...] }`
//!   `GET {base}/api/crops/profile?name=..&region=..` → `{ "profile": {...} | null }`
//!
//! `{region}` is `india` when no region is selected. A 404 on the profile
//! endpoint is treated as "no profile".

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::model::{CropCatalog, CropGroup, CropName, CropProfile, RegionFilter};

use super::{DataSource, SourceError};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

/// `groups` is required here: an error body such as `{"error": ".."}` must
/// fail to decode rather than read as an empty catalog.
#[derive(Deserialize)]
struct CatalogResponse {
    groups: Vec<CropGroup>,
}

#[derive(Deserialize)]
struct ProfileResponse {
    #[serde(default)]
    profile: Option<CropProfile>,
}

pub struct RemoteSource {
    base_url: String,
    agent: ureq::Agent,
}

impl RemoteSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn catalog_url(&self, region: &RegionFilter) -> String {
        let segment = match region.region() {
            None => "india".to_string(),
            Some(r) => urlencoding::encode(r.as_str()).into_owned(),
        };
        format!("{}/api/crops/{}", self.base_url, segment)
    }

    pub fn profile_url(&self) -> String {
        format!("{}/api/crops/profile", self.base_url)
    }

    /// Run a request and decode its JSON body. `Ok(None)` on 404.
    fn get_json<T: DeserializeOwned>(
        &self,
        request: ureq::Request,
        url: &str,
    ) -> Result<Option<T>, SourceError> {
        let response = match request.call() {
            Ok(response) => response,
            Err(ureq::Error::Status(404, _)) => return Ok(None),
            Err(ureq::Error::Status(status, _)) => {
                return Err(SourceError::Status {
                    url: url.to_string(),
                    status,
                })
            }
            Err(e) => {
                return Err(SourceError::Request {
                    url: url.to_string(),
                    message: e.to_string(),
                })
            }
        };

        response
            .into_json::<T>()
            .map(Some)
            .map_err(|e| SourceError::Decode {
                url: url.to_string(),
                message: e.to_string(),
            })
    }
}

impl DataSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn fetch_catalog(&self, region: &RegionFilter) -> Result<CropCatalog, SourceError> {
        let url = self.catalog_url(region);
        tracing::debug!(%url, "fetching catalog");
        self.get_json::<CatalogResponse>(self.agent.get(&url), &url)?
            .map(|body| CropCatalog::new(body.groups))
            .ok_or(SourceError::Status { url, status: 404 })
    }

    fn fetch_profile(
        &self,
        crop: &CropName,
        region: &RegionFilter,
    ) -> Result<Option<CropProfile>, SourceError> {
        let url = self.profile_url();
        tracing::debug!(%url, crop = crop.as_str(), "fetching profile");
        let request = self
            .agent
            .get(&url)
            .query("name", crop.as_str())
            .query("region", region.label());
        Ok(self
            .get_json::<ProfileResponse>(request, &url)?
            .and_then(|body| body.profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_url_for_all_regions() {
        let source = RemoteSource::new("http://localhost:4000/", DEFAULT_TIMEOUT);
        assert_eq!(
            source.catalog_url(&RegionFilter::All),
            "http://localhost:4000/api/crops/india"
        );
    }

    #[test]
    fn test_catalog_url_encodes_region() {
        let source = RemoteSource::new("http://localhost:4000", DEFAULT_TIMEOUT);
        assert_eq!(
            source.catalog_url(&RegionFilter::from_str_loose("tamil nadu")),
            "http://localhost:4000/api/crops/Tamil%20Nadu"
        );
    }

    #[test]
    fn test_catalog_response_requires_groups() {
        assert!(serde_json::from_str::<CatalogResponse>(r#"{"error": "backend not ready"}"#).is_err());
        assert!(serde_json::from_str::<CatalogResponse>("{}").is_err());

        let body: CatalogResponse =
            serde_json::from_str(r#"{"groups": [{"name": "Cereals", "items": ["Rice", "Wheat"]}]}"#)
                .unwrap();
        let catalog = CropCatalog::new(body.groups);
        assert_eq!(catalog.item_count(), 2);
        assert!(catalog.contains("Wheat"));
    }

    #[test]
    fn test_profile_response_null_is_miss() {
        let body: ProfileResponse = serde_json::from_str(r#"{"profile": null}"#).unwrap();
        assert!(body.profile.is_none());

        let body: ProfileResponse = serde_json::from_str(
            r#"{"profile": {"agronomy": "Deep loam.", "sowing": [{"state": "Punjab", "season": "Rabi", "window": "Nov"}]}}"#,
        )
        .unwrap();
        let profile = body.profile.unwrap();
        assert_eq!(profile.sowing[0].region, "Punjab");
    }

    #[test]
    fn test_unreachable_backend_is_an_error() {
        let source = RemoteSource::new("http://127.0.0.1:9", Duration::from_millis(500));
        assert!(source.fetch_catalog(&RegionFilter::All).is_err());
    }
}
