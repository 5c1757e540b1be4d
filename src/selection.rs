//! Selection / detail-panel controller.
//!
//! Tracks which crop is selected, whether the detail panel is open, and the
//! profile attached to the selection. Profile lookups can complete out of
//! order when they go over the network; every selection issues a new
//! [`SelectionTicket`] and only the newest ticket may resolve the profile, so
//! a slow response can never overwrite a later click.

use std::borrow::Cow;

use crate::model::{CropName, CropProfile, RegionFilter, SowingWindow, FALLBACK_AGRONOMY};
use crate::source::{DataSource, SourceError};

/// Whether the profile for the current selection has arrived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProfilePhase {
    #[default]
    Ready,
    Loading,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionState {
    pub selected_crop: Option<CropName>,
    pub panel_open: bool,
    pub profile: Option<CropProfile>,
    pub phase: ProfilePhase,
}

impl SelectionState {
    /// Agronomy notes, or the placeholder when there is no profile.
    pub fn agronomy(&self) -> &str {
        self.profile
            .as_ref()
            .map(|p| p.agronomy.trim())
            .filter(|text| !text.is_empty())
            .unwrap_or(FALLBACK_AGRONOMY)
    }

    /// Sowing rows, or the single fallback row when there are none.
    pub fn sowing_rows(&self) -> Cow<'_, [SowingWindow]> {
        match &self.profile {
            Some(p) if !p.sowing.is_empty() => Cow::Borrowed(&p.sowing),
            _ => Cow::Owned(vec![SowingWindow::fallback()]),
        }
    }
}

/// Identifies one selection. Stale tickets are rejected by [`DetailController::resolve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionTicket(u64);

#[derive(Debug, Default)]
pub struct DetailController {
    state: SelectionState,
    live_mode: bool,
    generation: u64,
}

impl DetailController {
    pub fn new(live_mode: bool) -> Self {
        Self {
            live_mode,
            ..Self::default()
        }
    }

    pub fn state(&self) -> &SelectionState {
        &self.state
    }

    pub fn live_mode(&self) -> bool {
        self.live_mode
    }

    /// Select a crop and look its profile up synchronously. A miss or a
    /// source error both leave `profile` empty.
    pub fn select(
        &mut self,
        crop: CropName,
        source: &dyn DataSource,
        region: &RegionFilter,
    ) -> &SelectionState {
        let ticket = self.begin_select(crop.clone());
        let result = source.fetch_profile(&crop, region);
        self.resolve(ticket, result);
        &self.state
    }

    /// Select a crop and open the panel while the profile is fetched
    /// elsewhere. The previous profile is cleared, not carried over.
    pub fn begin_select(&mut self, crop: CropName) -> SelectionTicket {
        self.generation += 1;
        self.state = SelectionState {
            selected_crop: Some(crop),
            panel_open: true,
            profile: None,
            phase: ProfilePhase::Loading,
        };
        SelectionTicket(self.generation)
    }

    /// Apply a profile lookup. Returns `false` (and changes nothing) when
    /// the ticket is not the newest one.
    pub fn resolve(
        &mut self,
        ticket: SelectionTicket,
        result: Result<Option<CropProfile>, SourceError>,
    ) -> bool {
        if ticket.0 != self.generation {
            tracing::debug!(ticket = ticket.0, current = self.generation, "discarding stale profile");
            return false;
        }
        self.state.profile = match result {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(error = %e, "profile lookup failed");
                None
            }
        };
        self.state.phase = ProfilePhase::Ready;
        true
    }

    /// Close the panel. The selection and profile are kept so the panel can
    /// come back showing the same crop without a refetch.
    pub fn close(&mut self) -> &SelectionState {
        self.state.panel_open = false;
        &self.state
    }

    /// Flip the live-data flag. Performs no I/O.
    pub fn toggle_live_mode(&mut self) -> bool {
        self.live_mode = !self.live_mode;
        self.live_mode
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::loader;
    use crate::source::StaticSource;

    fn source() -> StaticSource {
        StaticSource::new(Arc::new(loader::builtin()))
    }

    #[test]
    fn test_select_without_profile_shows_fallback() {
        let mut ctl = DetailController::default();
        let state = ctl.select(CropName::new("Onion"), &source(), &RegionFilter::All);

        assert_eq!(state.selected_crop, Some(CropName::new("Onion")));
        assert!(state.panel_open);
        assert!(state.profile.is_none());
        assert_eq!(state.phase, ProfilePhase::Ready);
        assert_eq!(state.agronomy(), FALLBACK_AGRONOMY);
        assert_eq!(&*state.sowing_rows(), &[SowingWindow::fallback()]);
    }

    #[test]
    fn test_close_retains_selection() {
        let mut ctl = DetailController::default();
        ctl.select(CropName::new("Rice"), &source(), &RegionFilter::All);
        let state = ctl.close();

        assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
        assert!(!state.panel_open);
        assert!(state.profile.is_some());
    }

    #[test]
    fn test_miss_clears_previous_profile() {
        let mut ctl = DetailController::default();
        ctl.select(CropName::new("Rice"), &source(), &RegionFilter::All);
        ctl.select(CropName::new("Jute"), &source(), &RegionFilter::All);
        assert!(ctl.state().profile.is_none());
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut ctl = DetailController::default();
        let first = ctl.begin_select(CropName::new("Rice"));
        let second = ctl.begin_select(CropName::new("Wheat"));
        assert_eq!(ctl.state().phase, ProfilePhase::Loading);

        let rice = loader::seed::profiles().remove("Rice");
        assert!(!ctl.resolve(first, Ok(rice)));
        assert_eq!(ctl.state().phase, ProfilePhase::Loading);
        assert_eq!(ctl.state().selected_crop, Some(CropName::new("Wheat")));

        let wheat = loader::seed::profiles().remove("Wheat");
        assert!(ctl.resolve(second, Ok(wheat.clone())));
        assert_eq!(ctl.state().profile, wheat);
        assert_eq!(ctl.state().phase, ProfilePhase::Ready);
    }

    #[test]
    fn test_failed_lookup_resolves_to_none() {
        let mut ctl = DetailController::default();
        let ticket = ctl.begin_select(CropName::new("Cotton"));
        let resolved = ctl.resolve(
            ticket,
            Err(SourceError::Status {
                url: "http://backend/api/crops/profile".into(),
                status: 500,
            }),
        );
        assert!(resolved);
        assert!(ctl.state().profile.is_none());
        assert!(ctl.state().panel_open);
        assert_eq!(ctl.state().agronomy(), FALLBACK_AGRONOMY);
    }

    #[test]
    fn test_toggle_live_mode_leaves_selection_alone() {
        let mut ctl = DetailController::default();
        ctl.select(CropName::new("Tomato"), &source(), &RegionFilter::All);
        let before = ctl.state().clone();

        assert!(ctl.toggle_live_mode());
        assert!(!ctl.toggle_live_mode());
        assert_eq!(ctl.state(), &before);
    }

    #[test]
    fn test_blank_agronomy_uses_fallback() {
        let state = SelectionState {
            selected_crop: Some(CropName::new("Barley")),
            panel_open: true,
            profile: Some(CropProfile::default()),
            phase: ProfilePhase::Ready,
        };
        assert_eq!(state.agronomy(), FALLBACK_AGRONOMY);
        assert_eq!(state.sowing_rows().len(), 1);
    }
}
