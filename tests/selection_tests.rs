use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use farm_dashboard::loader;
use farm_dashboard::model::*;
use farm_dashboard::selection::{DetailController, ProfilePhase};
use farm_dashboard::source::{DataSource, SourceError, StaticSource};
use pretty_assertions::assert_eq;

/// Records every profile request and answers from a fixed script.
#[derive(Default)]
struct ScriptedSource {
    calls: AtomicUsize,
    regions_seen: Mutex<Vec<String>>,
    fail: bool,
}

impl DataSource for ScriptedSource {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn fetch_catalog(&self, _region: &RegionFilter) -> Result<CropCatalog, SourceError> {
        Ok(CropCatalog::default())
    }

    fn fetch_profile(
        &self,
        crop: &CropName,
        region: &RegionFilter,
    ) -> Result<Option<CropProfile>, SourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.regions_seen
            .lock()
            .unwrap()
            .push(region.label().to_string());

        if self.fail {
            return Err(SourceError::Request {
                url: "http://farm.test/api/crops/profile".into(),
                message: "connection refused".into(),
            });
        }
        Ok((crop.as_str() == "Cotton").then(|| CropProfile {
            agronomy: "Deep black soils; long frost-free season.".into(),
            sowing: vec![SowingWindow::new("Maharashtra", "Kharif", "Jun–Jul")],
        }))
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// select / close
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_select_hit_through_trait_object() {
    let source = ScriptedSource::default();
    let mut ctl = DetailController::new(true);
    let region = RegionFilter::from_str_loose("Maharashtra");

    let state = ctl.select(CropName::new("Cotton"), &source, &region);
    assert!(state.panel_open);
    assert_eq!(state.phase, ProfilePhase::Ready);
    assert_eq!(state.agronomy(), "Deep black soils; long frost-free season.");
    assert_eq!(state.sowing_rows()[0].region, "Maharashtra");

    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(*source.regions_seen.lock().unwrap(), vec!["Maharashtra"]);
}

#[test]
fn test_select_error_degrades_to_placeholder() {
    let source = ScriptedSource {
        fail: true,
        ..Default::default()
    };
    let mut ctl = DetailController::default();

    let state = ctl.select(CropName::new("Cotton"), &source, &RegionFilter::All);
    assert!(state.panel_open);
    assert!(state.profile.is_none());
    assert_eq!(state.agronomy(), FALLBACK_AGRONOMY);
    assert_eq!(&*state.sowing_rows(), &[SowingWindow::fallback()]);
}

#[test]
fn test_reselect_after_close_refetches() {
    let source = ScriptedSource::default();
    let mut ctl = DetailController::default();

    ctl.select(CropName::new("Cotton"), &source, &RegionFilter::All);
    ctl.close();
    assert!(!ctl.state().panel_open);
    assert!(ctl.state().profile.is_some());

    let state = ctl.select(CropName::new("Jute"), &source, &RegionFilter::All);
    assert_eq!(state.selected_crop, Some(CropName::new("Jute")));
    assert!(state.profile.is_none());
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_static_source_without_profile_entry() {
    let data = FarmData {
        catalog: CropCatalog::new(vec![CropGroup::new("Vegetables", ["Potato", "Tomato"])]),
        ..Default::default()
    };
    let source = StaticSource::new(Arc::new(data));
    let mut ctl = DetailController::default();

    let state = ctl.select(CropName::new("Tomato"), &source, &RegionFilter::All);
    assert_eq!(state.selected_crop, Some(CropName::new("Tomato")));
    assert!(state.panel_open);
    assert!(state.profile.is_none());
    assert_eq!(state.agronomy(), FALLBACK_AGRONOMY);
}

#[test]
fn test_select_rice_then_close_keeps_rice() {
    let source = StaticSource::new(Arc::new(loader::builtin()));
    let mut ctl = DetailController::default();

    ctl.select(CropName::new("Rice"), &source, &RegionFilter::All);
    let state = ctl.close();
    assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
    assert!(!state.panel_open);
}

#[test]
fn test_close_is_idempotent() {
    let mut ctl = DetailController::default();
    let first = ctl.close().clone();
    let second = ctl.close().clone();
    assert_eq!(first, second);
    assert!(first.selected_crop.is_none());
}

// ═══════════════════════════════════════════════════════════════════════════
// Tickets and live mode
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn test_out_of_order_results_keep_latest_selection() {
    let source = ScriptedSource::default();
    let mut ctl = DetailController::new(true);

    let cotton = ctl.begin_select(CropName::new("Cotton"));
    let jute = ctl.begin_select(CropName::new("Jute"));

    // Jute answers first, then the slow Cotton response arrives
    let jute_result = source.fetch_profile(&CropName::new("Jute"), &RegionFilter::All);
    assert!(ctl.resolve(jute, jute_result));
    let cotton_result = source.fetch_profile(&CropName::new("Cotton"), &RegionFilter::All);
    assert!(!ctl.resolve(cotton, cotton_result));

    assert_eq!(ctl.state().selected_crop, Some(CropName::new("Jute")));
    assert!(ctl.state().profile.is_none());
    assert_eq!(ctl.state().phase, ProfilePhase::Ready);
}

#[test]
fn test_toggle_live_mode_does_no_io() {
    let source = ScriptedSource::default();
    let mut ctl = DetailController::default();
    ctl.select(CropName::new("Cotton"), &source, &RegionFilter::All);

    assert!(!ctl.live_mode());
    assert!(ctl.toggle_live_mode());
    assert!(ctl.live_mode());
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert!(ctl.state().profile.is_some());
}
