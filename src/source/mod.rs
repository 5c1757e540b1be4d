//! Data-source boundary: where the catalog and crop profiles come from.
//!
//! The selection controller and the app only see [`DataSource`]. The default
//! is [`StaticSource`] over the loaded snapshot; [`RemoteSource`] talks to an
//! HTTP backend when live data is switched on.

pub mod local;
pub mod remote;

use crate::model::{CropCatalog, CropName, CropProfile, RegionFilter};

pub use local::StaticSource;
pub use remote::RemoteSource;

#[derive(thiserror::Error, Debug)]
pub enum SourceError {
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    #[error("unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("invalid response from {url}: {message}")]
    Decode { url: String, message: String },
}

/// A provider of catalog and profile data. Calls may block; the app runs
/// non-local sources off the event loop.
pub trait DataSource: Send + Sync {
    /// Short name for logs and the title bar.
    fn name(&self) -> &'static str;

    /// Whether calls return immediately without I/O.
    fn is_local(&self) -> bool {
        false
    }

    fn fetch_catalog(&self, region: &RegionFilter) -> Result<CropCatalog, SourceError>;

    /// `Ok(None)` is a miss, which is expected for most crops.
    fn fetch_profile(
        &self,
        crop: &CropName,
        region: &RegionFilter,
    ) -> Result<Option<CropProfile>, SourceError>;
}
