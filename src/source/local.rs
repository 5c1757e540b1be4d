use std::sync::Arc;

use crate::model::{CropCatalog, CropName, CropProfile, FarmData, RegionFilter};

use super::{DataSource, SourceError};

/// Serves catalog and profiles straight from a loaded snapshot.
#[derive(Debug, Clone)]
pub struct StaticSource {
    data: Arc<FarmData>,
}

impl StaticSource {
    pub fn new(data: Arc<FarmData>) -> Self {
        Self { data }
    }
}

impl DataSource for StaticSource {
    fn name(&self) -> &'static str {
        "static"
    }

    fn is_local(&self) -> bool {
        true
    }

    /// The snapshot catalog is national; region narrowing happens in the filter.
    fn fetch_catalog(&self, _region: &RegionFilter) -> Result<CropCatalog, SourceError> {
        Ok(self.data.catalog.clone())
    }

    fn fetch_profile(
        &self,
        crop: &CropName,
        _region: &RegionFilter,
    ) -> Result<Option<CropProfile>, SourceError> {
        Ok(self.data.profiles.get(crop.as_str()).cloned())
    }
}
