pub mod board;
pub mod catalog;
pub mod error;
pub mod membership;
pub mod profiles;
pub mod seed;
pub mod validate;

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::loader::error::LoadError;
use crate::model::{DataFile, FarmData};

/// The compiled-in snapshot used when no data directory is configured.
pub fn builtin() -> FarmData {
    seed::builtin()
}

/// Load every reference table from a farm data directory.
///
/// 1. `catalog.yaml` / `catalog.json` (required).
/// 2. `membership.yaml`, `profiles.md`, `dashboard.json` (optional).
/// 3. Cross-table validation; issues are logged, never fatal.
pub fn load_farm_data(data_dir: &Path) -> Result<FarmData, LoadError> {
    let catalog = catalog::parse_catalog(data_dir)?;
    let memberships = membership::parse_membership(data_dir)?;
    let profiles = profiles::parse_profiles(data_dir)?;
    let board = board::parse_board(data_dir)?;

    let data = FarmData {
        catalog,
        seasons: memberships.seasons,
        regions: memberships.regions,
        profiles,
        board,
    };
    report_issues(&data);

    info!(
        dir = %data_dir.display(),
        groups = data.catalog.groups().len(),
        crops = data.catalog.item_count(),
        profiles = data.profiles.len(),
        "loaded farm data"
    );
    Ok(data)
}

/// Re-read only the side tables named in `changed`, keeping everything else
/// from `current`.
pub fn reload_tables(
    data_dir: &Path,
    current: &FarmData,
    changed: &[DataFile],
) -> Result<FarmData, LoadError> {
    if changed.contains(&DataFile::Catalog) {
        return load_farm_data(data_dir);
    }

    let mut data = current.clone();
    for file in changed {
        match file {
            DataFile::Membership => {
                let m = membership::parse_membership(data_dir)?;
                data.seasons = m.seasons;
                data.regions = m.regions;
            }
            DataFile::Profiles => data.profiles = profiles::parse_profiles(data_dir)?,
            DataFile::Dashboard => data.board = board::parse_board(data_dir)?,
            DataFile::Catalog => {}
        }
        debug!(?file, "reloaded table");
    }
    report_issues(&data);
    Ok(data)
}

/// Load from `data_dir` if given, otherwise the built-in snapshot.
pub fn load(data_dir: Option<&Path>) -> Result<Arc<FarmData>, LoadError> {
    match data_dir {
        Some(dir) => load_farm_data(dir).map(Arc::new),
        None => {
            debug!("no data directory, using built-in tables");
            Ok(Arc::new(builtin()))
        }
    }
}

fn report_issues(data: &FarmData) {
    for issue in validate::validate(data) {
        warn!(%issue, "farm data inconsistency");
    }
}
