use super::board::Board;
use super::crop::{CropCatalog, ProfileTable, RegionMembership, SeasonMembership};

/// One immutable load of all reference tables. Shared behind an `Arc` and
/// swapped whole on reload.
#[derive(Debug, Clone, Default)]
pub struct FarmData {
    pub catalog: CropCatalog,
    pub seasons: SeasonMembership,
    pub regions: RegionMembership,
    pub profiles: ProfileTable,
    pub board: Board,
}
