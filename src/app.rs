//! Main application state, event handling, and rendering.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::symbols;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Axis, Block, Cell, Chart, Clear, Dataset, GraphType, LineGauge, Padding, Paragraph, Row,
    Scrollbar, ScrollbarOrientation, ScrollbarState, Table, TableState, Tabs, Wrap,
};
use ratatui::Frame;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{info, warn};

use farm_dashboard::filter::filter_catalog;
use farm_dashboard::loader::{self, catalog::catalog_path};
use farm_dashboard::model::{
    AlertKind, CropCatalog, CropName, DataCache, DateRange, Environment, FarmData,
    FilterCriteria, IrrigationStatus, OrderStatus, Priority, RegionFilter, ReloadScope, Tab,
    MSP_URL,
};
use farm_dashboard::selection::{DetailController, ProfilePhase};
use farm_dashboard::source::{DataSource, StaticSource};

use crate::event::Event;
use crate::theme::Theme;

/// Return value from event handling.
#[derive(Debug, PartialEq)]
pub enum Action {
    Continue,
    Quit,
    ForceRefresh,
}

/// Input mode for modal states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Search,
    Help,
}

/// One line of the crop list: a crop and the group it was listed under.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRow {
    pub group: String,
    pub crop: CropName,
    /// First crop of its group; the group name is only drawn here.
    pub group_start: bool,
}

/// Startup settings from the command line.
pub struct AppOptions {
    pub data_dir: Option<PathBuf>,
    pub no_watch: bool,
    pub criteria: FilterCriteria,
    pub tab: Tab,
    pub remote: Option<Arc<dyn DataSource>>,
}

/// Core application state.
pub struct App {
    // Core data
    pub data: Arc<FarmData>,
    pub data_dir: Option<PathBuf>,

    // UI state
    pub tab: Tab,
    pub range: DateRange,
    pub env: Environment,
    pub criteria: FilterCriteria,
    pub table_state: TableState,
    pub detail: DetailController,
    pub mode: InputMode,
    pub detail_scroll: u16,
    pub detail_total_lines: u16,

    // Theme
    pub theme: Theme,

    // Live data
    pub remote: Option<Arc<dyn DataSource>>,
    pub live_catalog: Option<CropCatalog>,
    pub catalog_generation: u64,
    pub catalog_loading: bool,
    events: Option<UnboundedSender<Event>>,

    // Status
    pub watcher_active: bool,
    pub no_watch: bool,
    pub last_refresh: Option<Instant>,
    pub error_message: Option<(String, Instant)>,
    pub clock: String,

    // Cached filtered list
    pub filtered: CropCatalog,
    pub crop_rows: Vec<CropRow>,

    // Layout areas for mouse hit-testing
    pub list_area: Rect,
    pub detail_area: Rect,

    // Cache for incremental reloading
    pub data_cache: DataCache,
}

impl App {
    pub fn new(data: Arc<FarmData>, options: AppOptions) -> Self {
        let watch = options.data_dir.is_some() && !options.no_watch;
        let mut app = Self {
            data,
            data_dir: options.data_dir,
            tab: options.tab,
            range: DateRange::default(),
            env: Environment::default(),
            criteria: options.criteria,
            table_state: TableState::default(),
            detail: DetailController::new(false),
            mode: InputMode::Normal,
            detail_scroll: 0,
            detail_total_lines: 0,
            theme: Theme::harvest(),
            remote: options.remote,
            live_catalog: None,
            catalog_generation: 0,
            catalog_loading: false,
            events: None,
            watcher_active: watch,
            no_watch: !watch,
            last_refresh: Some(Instant::now()),
            error_message: None,
            clock: chrono::Local::now().format("%H:%M:%S").to_string(),
            filtered: CropCatalog::default(),
            crop_rows: Vec::new(),
            list_area: Rect::default(),
            detail_area: Rect::default(),
            data_cache: DataCache::new(),
        };
        app.prime_cache();
        app.recompute_filtered_crops();
        app
    }

    /// Record current mtimes so the first watcher event is compared against them.
    fn prime_cache(&mut self) {
        let Some(dir) = &self.data_dir else {
            return;
        };
        let mut files = vec![
            dir.join(loader::membership::FILE_NAME),
            dir.join(loader::profiles::FILE_NAME),
            dir.join(loader::board::FILE_NAME),
        ];
        files.extend(catalog_path(dir));
        for path in files {
            self.data_cache.update_mtime(&path);
        }
    }

    /// Re-read everything from disk, keeping the current data on failure.
    pub fn load_data(&mut self) {
        self.reload_data(ReloadScope::Full);
    }

    /// Reload specific tables or do a full reload.
    pub fn reload_data(&mut self, scope: ReloadScope) {
        let Some(dir) = self.data_dir.clone() else {
            return;
        };
        let result = match scope {
            ReloadScope::Full => loader::load_farm_data(&dir),
            ReloadScope::Tables(files) if files.is_empty() => return,
            ReloadScope::Tables(files) => loader::reload_tables(&dir, &self.data, &files),
        };

        match result {
            Ok(data) => {
                self.data = Arc::new(data);
                self.last_refresh = Some(Instant::now());
                self.prime_cache();
                self.recompute_filtered_crops();
                self.refresh_open_profile();
            }
            Err(e) => {
                warn!(error = %e, "reload failed, keeping previous data");
                self.set_error(e.to_string());
            }
        }
    }

    /// Main event loop.
    pub async fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> color_eyre::Result<()> {
        let watch_dir = if self.no_watch {
            None
        } else {
            self.data_dir.clone()
        };
        let mut events = crate::event::EventHandler::new(watch_dir);
        self.events = Some(events.sender());

        loop {
            // RENDER
            terminal.draw(|frame| self.render(frame))?;

            // WAIT FOR EVENT
            let Some(event) = events.next().await else {
                break;
            };

            // UPDATE
            match self.handle_event(event) {
                Action::Quit => break,
                Action::ForceRefresh => {
                    self.load_data();
                    self.request_live_catalog();
                }
                Action::Continue => {}
            }
        }

        Ok(())
    }

    /// Handle a single event.
    pub fn handle_event(&mut self, event: Event) -> Action {
        match event {
            Event::Key(key) => self.handle_key_event(key),
            Event::Mouse(mouse) => self.handle_mouse_event(mouse),
            Event::Tick => {
                self.clock = chrono::Local::now().format("%H:%M:%S").to_string();
                // Auto-dismiss errors after 10 seconds
                if let Some((_, when)) = &self.error_message {
                    if when.elapsed().as_secs() >= 10 {
                        self.error_message = None;
                    }
                }
                Action::Continue
            }
            Event::FilesChanged(paths) => {
                self.watcher_active = true;
                let paths = self.data_cache.retain_changed(paths);
                if !paths.is_empty() {
                    let scope = self.data_cache.classify_changes(&paths);
                    self.reload_data(scope);
                }
                Action::Continue
            }
            Event::ProfileFetched { ticket, result } => {
                self.detail.resolve(ticket, result);
                Action::Continue
            }
            Event::CatalogFetched { generation, result } => {
                self.apply_live_catalog(generation, result);
                Action::Continue
            }
            Event::Resize(_, _) => Action::Continue,
        }
    }

    /// Handle key events.
    fn handle_key_event(&mut self, key: KeyEvent) -> Action {
        // Global keys
        match key.code {
            KeyCode::Char('q') if self.mode == InputMode::Normal => return Action::Quit,
            KeyCode::Char('?') if self.mode != InputMode::Search => {
                self.mode = if self.mode == InputMode::Help {
                    InputMode::Normal
                } else {
                    InputMode::Help
                };
                return Action::Continue;
            }
            KeyCode::Esc => {
                match self.mode {
                    InputMode::Search => {
                        self.mode = InputMode::Normal;
                        self.criteria.query.clear();
                        self.recompute_filtered_crops();
                    }
                    InputMode::Help => {
                        self.mode = InputMode::Normal;
                    }
                    InputMode::Normal if self.tab == Tab::Crops => {
                        self.detail.close();
                    }
                    _ => {}
                }
                return Action::Continue;
            }
            _ => {}
        }

        // Help mode: any key dismisses
        if self.mode == InputMode::Help {
            self.mode = InputMode::Normal;
            return Action::Continue;
        }

        // Search mode: capture all input
        if self.mode == InputMode::Search {
            match key.code {
                KeyCode::Char(c) => {
                    self.criteria.query.push(c);
                    self.recompute_filtered_crops();
                }
                KeyCode::Backspace => {
                    self.criteria.query.pop();
                    self.recompute_filtered_crops();
                }
                KeyCode::Enter => {
                    self.mode = InputMode::Normal;
                }
                _ => {}
            }
            return Action::Continue;
        }

        // Normal mode keys, both tabs
        match key.code {
            KeyCode::Char('1') => self.tab = Tab::Landing,
            KeyCode::Char('2') => self.tab = Tab::Dashboard,
            KeyCode::Char('3') => self.tab = Tab::Crops,
            KeyCode::Tab => self.tab = self.tab.next(),
            KeyCode::Char('w') => self.range = self.range.next(),
            KeyCode::Char('e') => {
                self.env = self.env.next();
                info!(env = self.env.label(), "environment switched");
            }
            KeyCode::Char('r') => return Action::ForceRefresh,
            KeyCode::Char('t') => self.theme = self.theme.next(),
            KeyCode::Char('l') => self.toggle_live_mode(),
            _ => {}
        }

        if self.tab != Tab::Crops {
            return Action::Continue;
        }

        match key.code {
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor_next(),
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor_previous(),
            KeyCode::Home => self.move_cursor_to(0),
            KeyCode::End => self.move_cursor_to(self.crop_rows.len().saturating_sub(1)),
            KeyCode::Enter => {
                if let Some(row) = self.cursor_row() {
                    let crop = row.crop.clone();
                    self.select_crop(crop);
                }
            }
            KeyCode::Char('/') => {
                self.mode = InputMode::Search;
            }
            KeyCode::Char('f') => {
                self.criteria.season = self.criteria.season.next();
                self.recompute_filtered_crops();
            }
            KeyCode::Char('g') => self.set_region(self.criteria.region.next()),
            KeyCode::Char('G') => self.set_region(self.criteria.region.previous()),
            KeyCode::Char('d') => {
                self.detail_scroll = self
                    .detail_scroll
                    .saturating_add(5)
                    .min(self.detail_total_lines.saturating_sub(5));
            }
            KeyCode::Char('u') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(5);
            }
            _ => {}
        }

        Action::Continue
    }

    /// Handle mouse events.
    fn handle_mouse_event(&mut self, mouse: MouseEvent) -> Action {
        if self.tab != Tab::Crops {
            return Action::Continue;
        }
        let position = (mouse.column, mouse.row).into();
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                // Click in crop list area → select that crop
                if self.list_area.contains(position) {
                    // Account for border (1) + header row (1) + header bottom margin (1) = 3 rows offset
                    if let Some(row_offset) = mouse.row.checked_sub(self.list_area.y + 3) {
                        let index = self.table_state.offset() + row_offset as usize;
                        if index < self.crop_rows.len() {
                            self.move_cursor_to(index);
                            let crop = self.crop_rows[index].crop.clone();
                            self.select_crop(crop);
                        }
                    }
                }
            }
            MouseEventKind::ScrollDown => {
                if self.detail_area.contains(position) {
                    self.detail_scroll = self
                        .detail_scroll
                        .saturating_add(3)
                        .min(self.detail_total_lines.saturating_sub(5));
                } else if self.list_area.contains(position) {
                    self.move_cursor_next();
                }
            }
            MouseEventKind::ScrollUp => {
                if self.detail_area.contains(position) {
                    self.detail_scroll = self.detail_scroll.saturating_sub(3);
                } else if self.list_area.contains(position) {
                    self.move_cursor_previous();
                }
            }
            _ => {}
        }
        Action::Continue
    }

    // ─────────────────────────────────────────────────────────
    // Cursor helpers
    // ─────────────────────────────────────────────────────────

    fn cursor_row(&self) -> Option<&CropRow> {
        self.table_state
            .selected()
            .and_then(|i| self.crop_rows.get(i))
    }

    fn move_cursor_next(&mut self) {
        let len = self.crop_rows.len();
        if len == 0 {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|s| (s + 1).min(len - 1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    fn move_cursor_previous(&mut self) {
        if self.crop_rows.is_empty() {
            return;
        }
        let i = self
            .table_state
            .selected()
            .map(|s| s.saturating_sub(1))
            .unwrap_or(0);
        self.table_state.select(Some(i));
    }

    fn move_cursor_to(&mut self, index: usize) {
        if index < self.crop_rows.len() {
            self.table_state.select(Some(index));
        }
    }

    // ─────────────────────────────────────────────────────────
    // Selection / live data
    // ─────────────────────────────────────────────────────────

    /// Open the detail panel for `crop`. In live mode with a remote source
    /// the profile is fetched on the blocking pool and applied when it
    /// arrives; otherwise it is read from the loaded snapshot.
    pub fn select_crop(&mut self, crop: CropName) {
        self.detail_scroll = 0;
        let region = self.criteria.region.clone();

        if self.detail.live_mode() {
            if let (Some(remote), Some(tx)) = (&self.remote, &self.events) {
                let ticket = self.detail.begin_select(crop.clone());
                let remote = Arc::clone(remote);
                let tx = tx.clone();
                tokio::task::spawn_blocking(move || {
                    let result = remote.fetch_profile(&crop, &region);
                    let _ = tx.send(Event::ProfileFetched { ticket, result });
                });
                return;
            }
        }

        let source = StaticSource::new(Arc::clone(&self.data));
        self.detail.select(crop, &source, &region);
    }

    /// After a reload, pick up the new profile for an open static selection.
    fn refresh_open_profile(&mut self) {
        let state = self.detail.state();
        if !state.panel_open || self.detail.live_mode() {
            return;
        }
        if let Some(crop) = state.selected_crop.clone() {
            let source = StaticSource::new(Arc::clone(&self.data));
            self.detail.select(crop, &source, &self.criteria.region);
        }
    }

    /// In live mode an open profile follows the region, so it is fetched
    /// again whenever live mode turns on or the region changes.
    fn refetch_open_profile(&mut self) {
        if !self.detail.live_mode() || self.remote.is_none() {
            return;
        }
        let state = self.detail.state();
        if !state.panel_open {
            return;
        }
        if let Some(crop) = state.selected_crop.clone() {
            self.select_crop(crop);
        }
    }

    fn toggle_live_mode(&mut self) {
        let live = self.detail.toggle_live_mode();
        info!(live, remote = self.remote.is_some(), "live data toggled");
        if live {
            self.request_live_catalog();
            self.refetch_open_profile();
        } else {
            // Invalidate anything still in flight
            self.catalog_generation += 1;
            self.catalog_loading = false;
            if self.live_catalog.take().is_some() {
                self.recompute_filtered_crops();
            }
        }
    }

    fn set_region(&mut self, region: RegionFilter) {
        self.criteria.region = region;
        self.recompute_filtered_crops();
        self.request_live_catalog();
        self.refetch_open_profile();
    }

    /// Start a catalog fetch if live mode is on and a remote is configured.
    /// Any earlier fetch still in flight becomes stale.
    fn request_live_catalog(&mut self) {
        if !self.detail.live_mode() {
            return;
        }
        let (Some(remote), Some(tx)) = (&self.remote, &self.events) else {
            return;
        };
        self.catalog_generation += 1;
        self.catalog_loading = true;

        let generation = self.catalog_generation;
        let region = self.criteria.region.clone();
        let remote = Arc::clone(remote);
        let tx = tx.clone();
        tokio::task::spawn_blocking(move || {
            let result = remote.fetch_catalog(&region);
            let _ = tx.send(Event::CatalogFetched { generation, result });
        });
    }

    fn apply_live_catalog(
        &mut self,
        generation: u64,
        result: Result<CropCatalog, farm_dashboard::source::SourceError>,
    ) {
        if generation != self.catalog_generation || !self.detail.live_mode() {
            tracing::debug!(generation, current = self.catalog_generation, "discarding stale catalog");
            return;
        }
        self.catalog_loading = false;
        match result {
            Ok(catalog) => {
                self.live_catalog = Some(catalog);
                self.recompute_filtered_crops();
            }
            Err(e) => {
                warn!(error = %e, "live catalog fetch failed, keeping current catalog");
                self.set_error(format!("Live catalog unavailable: {e}"));
            }
        }
    }

    fn set_error(&mut self, message: String) {
        self.error_message = Some((message, Instant::now()));
    }

    // ─────────────────────────────────────────────────────────
    // Filter
    // ─────────────────────────────────────────────────────────

    /// The catalog the filter runs over: live when available, else the snapshot.
    pub fn base_catalog(&self) -> &CropCatalog {
        self.live_catalog.as_ref().unwrap_or(&self.data.catalog)
    }

    fn recompute_filtered_crops(&mut self) {
        let previous = self.cursor_row().map(|r| r.crop.clone());

        self.filtered = filter_catalog(
            self.base_catalog(),
            &self.criteria,
            &self.data.seasons,
            &self.data.regions,
        );
        self.crop_rows = self
            .filtered
            .groups()
            .iter()
            .flat_map(|group| {
                group.items.iter().enumerate().map(|(i, crop)| CropRow {
                    group: group.name.clone(),
                    crop: crop.clone(),
                    group_start: i == 0,
                })
            })
            .collect();

        // Keep the cursor on the same crop when it survived the filter
        let position = previous
            .and_then(|crop| self.crop_rows.iter().position(|r| r.crop == crop))
            .or(if self.crop_rows.is_empty() { None } else { Some(0) });
        self.table_state.select(position);
    }

    // ─────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();

        // Graceful degradation for tiny terminals
        if area.width < 40 || area.height < 12 {
            let msg = Paragraph::new("Terminal too small. Resize to at least 80x24.")
                .alignment(Alignment::Center)
                .style(Style::default().fg(self.theme.error));
            frame.render_widget(msg, area);
            return;
        }

        let has_error = self.error_message.is_some();
        let constraints = if has_error {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Length(2), // tabs + context bar
                Constraint::Length(1), // error bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        } else {
            vec![
                Constraint::Length(1), // title bar
                Constraint::Length(2), // tabs + context bar
                Constraint::Fill(1),   // main content
                Constraint::Length(1), // status bar
            ]
        };

        let areas: Vec<Rect> = Layout::vertical(constraints).split(area).to_vec();

        let (title_area, context_area, main_area, status_area) = if has_error {
            (areas[0], areas[1], areas[3], areas[4])
        } else {
            (areas[0], areas[1], areas[2], areas[3])
        };

        self.render_title_bar(frame, title_area);
        self.render_context_bar(frame, context_area);

        if has_error {
            self.render_error_bar(frame, areas[2]);
        }

        self.render_status_bar(frame, status_area);

        if self.tab != Tab::Crops {
            self.list_area = Rect::default();
            self.detail_area = Rect::default();
        }
        match self.tab {
            Tab::Landing => self.render_landing(frame, main_area),
            Tab::Dashboard => self.render_dashboard(frame, main_area),
            Tab::Crops => self.render_crops(frame, main_area),
        }

        // Overlays
        if self.mode == InputMode::Search {
            self.render_search_overlay(frame, area);
        }
        if self.mode == InputMode::Help {
            self.render_help_overlay(frame, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let live_indicator = match (self.detail.live_mode(), self.remote.is_some()) {
            (false, _) => Span::styled("○ STATIC", Style::default().fg(self.theme.text_secondary)),
            (true, true) if self.catalog_loading => {
                Span::styled("◌ LIVE…", Style::default().fg(self.theme.warning))
            }
            (true, true) => Span::styled("● LIVE", Style::default().fg(self.theme.success)),
            (true, false) => Span::styled("● LIVE (no backend)", Style::default().fg(self.theme.warning)),
        };
        let watcher_indicator = if self.no_watch {
            Span::raw("")
        } else if self.watcher_active {
            Span::styled("  ● WATCHING", Style::default().fg(self.theme.success))
        } else {
            Span::styled("  ● WATCHER ERROR", Style::default().fg(self.theme.error))
        };

        let brand = Span::styled(" ◇ Farm Dashboard ", Style::default().add_modifier(Modifier::BOLD));
        let env_badge = Span::styled(
            format!(" {} ", self.env.label()),
            Style::default()
                .fg(self.theme.bar_bg)
                .bg(match self.env {
                    Environment::Develop => self.theme.warning,
                    Environment::Main => self.theme.success,
                }),
        );

        let used = brand.width()
            + env_badge.width()
            + self.clock.len()
            + 2
            + live_indicator.width()
            + watcher_indicator.width()
            + 1;
        let padding = (area.width as usize).saturating_sub(used);

        let title = Line::from(vec![
            brand,
            env_badge,
            Span::raw(" ".repeat(padding)),
            Span::raw(self.clock.as_str()),
            Span::raw("  "),
            live_indicator,
            watcher_indicator,
            Span::raw(" "),
        ]);

        frame.render_widget(
            Paragraph::new(title).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    fn render_context_bar(&self, frame: &mut Frame, area: Rect) {
        let [tabs_area, line_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Length(1)]).areas(area);

        let titles = Tab::ALL
            .iter()
            .map(|tab| format!("{} {}", tab.index() + 1, tab.label()));
        let tabs = Tabs::new(titles)
            .select(self.tab.index())
            .style(Style::default().fg(self.theme.text_secondary))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )
            .divider("│");
        frame.render_widget(tabs, tabs_area);

        let line = match self.tab {
            Tab::Landing => Line::from(vec![
                Span::styled(" Farmer Complete", Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(" │ "),
                Span::styled(
                    "Unified farm ops & marketplace",
                    Style::default().fg(self.theme.text_secondary),
                ),
            ]),
            Tab::Dashboard => {
                let board = &self.data.board;
                Line::from(vec![
                    Span::styled(
                        format!(" {}", board.farm.name),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        board.farm.season_label.as_str(),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        board.weather.city.as_str(),
                        Style::default().fg(self.theme.text_secondary),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        format!("Range: {}", self.range.label()),
                        Style::default().fg(self.theme.accent),
                    ),
                ])
            }
            Tab::Crops => {
                let query = if self.criteria.query.is_empty() {
                    "—".to_string()
                } else {
                    format!("\"{}\"", self.criteria.query)
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {} crops", self.crop_rows.len()),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        format!("Search: {query}"),
                        Style::default().fg(self.theme.text_secondary),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        format!("Season: {}", self.criteria.season.label()),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        format!("Region: {}", self.criteria.region.label()),
                        Style::default().fg(self.theme.accent),
                    ),
                    Span::raw(" │ "),
                    Span::styled(
                        if self.detail.live_mode() { "Live data: on" } else { "Live data: off" },
                        Style::default().fg(self.theme.text_secondary),
                    ),
                ])
            }
        };
        frame.render_widget(Paragraph::new(line), line_area);
    }

    fn render_error_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some((ref msg, _)) = self.error_message {
            let line = Line::from(Span::styled(
                format!(" ⚠ {msg}"),
                Style::default().fg(self.theme.bar_bg).bg(self.theme.warning),
            ));
            frame.render_widget(
                Paragraph::new(line).style(Style::default().bg(self.theme.warning)),
                area,
            );
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let theme_name = self.theme.name;
        let bold = Style::default().add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled(" 1-3", bold),
            Span::raw(" Tabs  "),
        ];
        if self.tab == Tab::Dashboard {
            spans.extend([Span::styled("w", bold), Span::raw(" Range  ")]);
        }
        if self.tab == Tab::Crops {
            spans.extend([
                Span::styled("↑↓", bold),
                Span::raw(" Move  "),
                Span::styled("Enter", bold),
                Span::raw(" Open  "),
                Span::styled("/", bold),
                Span::raw(" Search  "),
                Span::styled("f", bold),
                Span::raw(" Season  "),
                Span::styled("g", bold),
                Span::raw(" Region  "),
            ]);
        }
        spans.extend([
            Span::styled("l", bold),
            Span::raw(" Live  "),
            Span::styled("e", bold),
            Span::raw(" Env  "),
            Span::styled("t", bold),
            Span::raw(" Theme  "),
            Span::styled("?", bold),
            Span::raw(" Help  "),
            Span::styled("q", bold),
            Span::raw(format!(" Quit  │ {theme_name}")),
        ]);

        frame.render_widget(
            Paragraph::new(Line::from(spans)).style(
                Style::default()
                    .bg(self.theme.bar_bg)
                    .fg(self.theme.text_on_bar),
            ),
            area,
        );
    }

    // ─────────────────────────────────────────────────────────
    // Landing tab
    // ─────────────────────────────────────────────────────────

    fn render_landing(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let [hero_area, stats_area, cards_area, _] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Fill(1),
        ])
        .areas(area);

        let hero = vec![
            Line::from(Span::styled(
                " New ",
                Style::default().fg(theme.bar_bg).bg(theme.accent),
            )),
            Line::styled(
                "Plan crops. Monitor fields. Sell produce.",
                Style::default()
                    .fg(theme.text_primary)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::styled(
                "Farmer Complete brings planning, advisories, inventory, and marketplace \
                 together so you can run a profitable farm from one place.",
                Style::default().fg(theme.text_secondary),
            ),
        ];
        frame.render_widget(
            Paragraph::new(hero)
                .wrap(Wrap { trim: true })
                .block(Block::new().padding(Padding::horizontal(1))),
            hero_area,
        );

        let stats = [
            ("12k+", "Acres Managed"),
            ("96%", "On-time Tasks"),
            ("99.9%", "Platform Uptime"),
        ];
        let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(stats_area);
        for ((value, label), stat_area) in stats.into_iter().zip(columns.iter()) {
            let text = vec![
                Line::styled(
                    value,
                    Style::default().fg(theme.accent).add_modifier(Modifier::BOLD),
                ),
                Line::styled(label, Style::default().fg(theme.text_secondary)),
            ];
            frame.render_widget(
                Paragraph::new(text)
                    .alignment(Alignment::Center)
                    .block(Block::bordered().border_style(Style::default().fg(theme.border))),
                *stat_area,
            );
        }

        let cards = [
            (
                "Operations",
                "Plan seasons, schedule irrigation, and track inputs across plots.",
            ),
            (
                "Advisory",
                "Weather-aware guidance and pest alerts tailored to your crops.",
            ),
            (
                "Marketplace",
                "Sell harvests directly to buyers and source quality inputs.",
            ),
        ];
        let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(cards_area);
        for ((title, body), card_area) in cards.into_iter().zip(columns.iter()) {
            frame.render_widget(
                Paragraph::new(body)
                    .wrap(Wrap { trim: true })
                    .style(Style::default().fg(theme.text_secondary))
                    .block(
                        Block::bordered()
                            .border_style(Style::default().fg(theme.border))
                            .title(Span::styled(
                                format!(" {title} "),
                                Style::default()
                                    .fg(theme.text_primary)
                                    .add_modifier(Modifier::BOLD),
                            )),
                    ),
                *card_area,
            );
        }
    }

    // ─────────────────────────────────────────────────────────
    // Dashboard tab
    // ─────────────────────────────────────────────────────────

    fn render_dashboard(&self, frame: &mut Frame, area: Rect) {
        let [kpi_area, middle_area, bottom_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Fill(1),
            Constraint::Fill(1),
        ])
        .areas(area);

        self.render_kpis(frame, kpi_area);

        let [chart_area, side_area] =
            Layout::horizontal([Constraint::Percentage(60), Constraint::Percentage(40)])
                .areas(middle_area);
        self.render_weekly_chart(frame, chart_area);

        let health_height = self.data.board.field_health.len() as u16 * 2 + 2;
        let [health_area, alerts_area] =
            Layout::vertical([Constraint::Length(health_height), Constraint::Fill(1)])
                .areas(side_area);
        self.render_field_health(frame, health_area);
        self.render_alerts(frame, alerts_area);

        let [tasks_area, orders_area, irrigation_area] = Layout::horizontal([
            Constraint::Percentage(30),
            Constraint::Percentage(30),
            Constraint::Percentage(40),
        ])
        .areas(bottom_area);
        self.render_tasks(frame, tasks_area);
        self.render_orders(frame, orders_area);
        self.render_irrigations(frame, irrigation_area);
    }

    fn render_kpis(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let board = &self.data.board;
        let weather = &board.weather;

        let cards = [
            (
                "Weather",
                format!("{}°C", weather.today),
                format!(
                    "H {}° / L {}° · Rain {}%",
                    weather.hi, weather.lo, weather.rain_chance
                ),
            ),
            (
                "Soil Moisture",
                format!("{:.1}%", board.moisture_avg()),
                "7-day average".to_string(),
            ),
            (
                "Yield Forecast",
                board.yield_forecast.value.clone(),
                board.yield_forecast.note.clone(),
            ),
            (
                "Active Orders",
                board.active_orders.value.clone(),
                board.active_orders.note.clone(),
            ),
        ];

        let columns = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
        for ((title, value, note), card_area) in cards.into_iter().zip(columns.iter()) {
            let text = vec![
                Line::styled(
                    value,
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Line::styled(note, Style::default().fg(theme.text_secondary)),
            ];
            let card = Paragraph::new(text).block(
                Block::bordered()
                    .border_style(Style::default().fg(theme.border))
                    .title(format!(" {title} ")),
            );
            frame.render_widget(card, *card_area);
        }
    }

    fn render_weekly_chart(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let weekly = &self.data.board.weekly;
        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(" Yield vs Rainfall ");

        if weekly.is_empty() {
            let msg = Paragraph::new("No weekly readings")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_secondary))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let rain: Vec<(f64, f64)> = weekly
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.rain))
            .collect();
        let yields: Vec<(f64, f64)> = weekly
            .iter()
            .enumerate()
            .map(|(i, p)| (i as f64, p.yield_index))
            .collect();
        let y_max = weekly
            .iter()
            .map(|p| p.rain.max(p.yield_index))
            .fold(0.0_f64, f64::max)
            .max(1.0)
            * 1.2;

        let datasets = vec![
            Dataset::default()
                .name("Rain (mm)")
                .marker(symbols::Marker::HalfBlock)
                .graph_type(GraphType::Bar)
                .style(Style::default().fg(theme.rain))
                .data(&rain),
            Dataset::default()
                .name("Yield index")
                .marker(symbols::Marker::Braille)
                .graph_type(GraphType::Line)
                .style(Style::default().fg(theme.yield_line))
                .data(&yields),
        ];

        let day_labels: Vec<String> = weekly.iter().map(|p| p.day.clone()).collect();
        let chart = Chart::new(datasets)
            .block(block)
            .x_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_secondary))
                    .bounds([0.0, (weekly.len().saturating_sub(1)).max(1) as f64])
                    .labels(day_labels),
            )
            .y_axis(
                Axis::default()
                    .style(Style::default().fg(theme.text_secondary))
                    .bounds([0.0, y_max])
                    .labels(vec!["0".to_string(), format!("{:.0}", y_max)]),
            );
        frame.render_widget(chart, area);
    }

    fn render_field_health(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(" Field Health ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let metrics = &self.data.board.field_health;
        let rows = Layout::vertical(vec![Constraint::Length(2); metrics.len()]).split(inner);
        for (metric, row) in metrics.iter().zip(rows.iter()) {
            let gauge = LineGauge::default()
                .filled_style(Style::default().fg(theme.gauge))
                .unfilled_style(Style::default().fg(theme.border))
                .ratio(f64::from(metric.value.min(100)) / 100.0)
                .label(format!("{} {}%", metric.label, metric.value));
            frame.render_widget(gauge, *row);
        }
    }

    fn render_alerts(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let lines: Vec<Line> = self
            .data
            .board
            .alerts
            .iter()
            .map(|alert| {
                let color = match alert.kind {
                    AlertKind::Weather => theme.rain,
                    AlertKind::Soil => theme.warning,
                    AlertKind::Market => theme.success,
                    AlertKind::Other => theme.text_secondary,
                };
                Line::from(vec![
                    Span::styled(
                        format!("⚠ {}: ", alert.kind.label()),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(alert.message.as_str()),
                ])
            })
            .collect();

        let alerts = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::bordered()
                .border_style(Style::default().fg(theme.border))
                .title(" Alerts "),
        );
        frame.render_widget(alerts, area);
    }

    fn render_tasks(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let rows: Vec<Row> = self
            .data
            .board
            .tasks
            .iter()
            .map(|task| {
                Row::new(vec![
                    Cell::from(priority_span(task.priority, &theme)),
                    Cell::from(task.title.as_str()),
                    Cell::from(Span::styled(
                        task.due.as_str(),
                        Style::default().fg(theme.text_secondary),
                    )),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [Constraint::Length(6), Constraint::Fill(1), Constraint::Length(9)],
        )
        .block(
            Block::bordered()
                .border_style(Style::default().fg(theme.border))
                .title(" Today's Tasks "),
        );
        frame.render_widget(table, area);
    }

    fn render_orders(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let header = Row::new(vec!["Order", "Item", "Qty", "Status"]).style(
            Style::default()
                .fg(theme.text_secondary)
                .add_modifier(Modifier::BOLD),
        );
        let rows: Vec<Row> = self
            .data
            .board
            .orders
            .iter()
            .map(|order| {
                let color = match order.status {
                    OrderStatus::Packed => theme.warning,
                    OrderStatus::InTransit => theme.accent,
                    OrderStatus::Delivered => theme.success,
                };
                Row::new(vec![
                    Cell::from(order.id.as_str()),
                    Cell::from(format!("{} · {}", order.item, order.price)),
                    Cell::from(order.qty.to_string()),
                    Cell::from(Span::styled(order.status.label(), Style::default().fg(color))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(9),
                Constraint::Fill(1),
                Constraint::Length(4),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(theme.border))
                .title(" Recent Orders "),
        );
        frame.render_widget(table, area);
    }

    fn render_irrigations(&self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let header = Row::new(vec!["Run", "Plot", "Crop", "Started", "Dur.", "Flow", "Status"])
            .style(
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            );
        let rows: Vec<Row> = self
            .data
            .board
            .irrigations
            .iter()
            .map(|run| {
                let color = match run.status {
                    IrrigationStatus::Running => theme.accent,
                    IrrigationStatus::Completed => theme.success,
                    IrrigationStatus::Scheduled => theme.text_secondary,
                };
                Row::new(vec![
                    Cell::from(run.id.as_str()),
                    Cell::from(run.plot.as_str()),
                    Cell::from(run.crop.as_str()),
                    Cell::from(run.started_at.as_str()),
                    Cell::from(run.duration.as_str()),
                    Cell::from(run.flow.as_str()),
                    Cell::from(Span::styled(run.status.label(), Style::default().fg(color))),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(8),
                Constraint::Fill(2),
                Constraint::Fill(1),
                Constraint::Fill(2),
                Constraint::Length(7),
                Constraint::Length(9),
                Constraint::Length(10),
            ],
        )
        .header(header)
        .block(
            Block::bordered()
                .border_style(Style::default().fg(theme.border))
                .title(" Irrigation Log "),
        );
        frame.render_widget(table, area);
    }

    // ─────────────────────────────────────────────────────────
    // Crops tab
    // ─────────────────────────────────────────────────────────

    fn render_crops(&mut self, frame: &mut Frame, area: Rect) {
        if !self.detail.state().panel_open {
            self.list_area = area;
            self.detail_area = Rect::default();
            self.render_crop_list(frame, area);
        } else if area.width < 80 {
            // Narrow terminal: the open panel takes the whole width
            self.list_area = Rect::default();
            self.detail_area = area;
            self.render_detail_panel(frame, area);
        } else {
            let [list_area, detail_area] =
                Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)])
                    .areas(area);
            self.list_area = list_area;
            self.detail_area = detail_area;
            self.render_crop_list(frame, list_area);
            self.render_detail_panel(frame, detail_area);
        }
    }

    fn render_crop_list(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;
        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(" Crops ");

        if self.crop_rows.is_empty() {
            let msg = Paragraph::new("No crops match")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_secondary))
                .block(block);
            frame.render_widget(msg, area);
            return;
        }

        let header = Row::new(vec!["Crop", "Group", "Seasons"])
            .style(
                Style::default()
                    .fg(theme.text_secondary)
                    .add_modifier(Modifier::BOLD),
            )
            .bottom_margin(1);

        let selected_crop = self.detail.state().selected_crop.clone();
        let rows: Vec<Row> = self
            .crop_rows
            .iter()
            .map(|row| {
                let seasons = self
                    .data
                    .seasons
                    .get(row.crop.as_str())
                    .map(|set| {
                        set.iter()
                            .map(|s| s.label())
                            .collect::<Vec<_>>()
                            .join(" ")
                    })
                    .unwrap_or_else(|| "Any".to_string());
                let crop_style = if selected_crop.as_ref() == Some(&row.crop) {
                    Style::default()
                        .fg(theme.success)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                let group = if row.group_start {
                    Span::styled(row.group.clone(), Style::default().fg(theme.accent))
                } else {
                    Span::raw("")
                };
                Row::new(vec![
                    Cell::from(Span::styled(row.crop.to_string(), crop_style)),
                    Cell::from(group),
                    Cell::from(Span::styled(
                        seasons,
                        Style::default().fg(theme.text_secondary),
                    )),
                ])
            })
            .collect();

        let widths = [
            Constraint::Fill(2),
            Constraint::Fill(1),
            Constraint::Length(17),
        ];

        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(
                Style::default()
                    .bg(theme.accent)
                    .fg(theme.text_on_bar)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("▸ ");

        frame.render_stateful_widget(table, area, &mut self.table_state);
    }

    fn render_detail_panel(&mut self, frame: &mut Frame, area: Rect) {
        let theme = self.theme;

        let block = Block::bordered()
            .border_style(Style::default().fg(theme.border))
            .title(" Crop Profile ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let state = self.detail.state();
        let Some(crop) = &state.selected_crop else {
            let msg = Paragraph::new("Select a crop to view details")
                .alignment(Alignment::Center)
                .style(Style::default().fg(theme.text_secondary));
            frame.render_widget(msg, inner);
            return;
        };

        let heading = |title: String| {
            Line::from(vec![
                Span::styled("━━ ", Style::default().fg(theme.accent)),
                Span::styled(
                    title,
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" ━━", Style::default().fg(theme.accent)),
            ])
        };

        let mut lines: Vec<Line> = vec![
            Line::styled(crop.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            Line::raw(""),
        ];

        if state.phase == ProfilePhase::Loading {
            lines.push(Line::styled(
                "◌ Loading profile…",
                Style::default().fg(theme.warning),
            ));
            lines.push(Line::raw(""));
        }

        lines.push(heading("AGRONOMY".to_string()));
        lines.push(Line::raw(state.agronomy().to_string()));
        lines.push(Line::raw(""));

        let sowing_title = match self.criteria.region.region() {
            Some(region) => format!("SOWING WINDOWS · {region}"),
            None => "SOWING WINDOWS".to_string(),
        };
        lines.push(heading(sowing_title));
        for row in state.sowing_rows().iter() {
            lines.push(Line::from(vec![
                Span::styled("  • ", Style::default().fg(theme.success)),
                Span::styled(row.region.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!(" · {} · {}", row.season, row.window),
                    Style::default().fg(theme.text_secondary),
                ),
            ]));
        }
        lines.push(Line::raw(""));

        lines.push(heading("MARKET".to_string()));
        lines.push(Line::from(vec![
            Span::styled("Agmarknet  ", Style::default().fg(theme.text_secondary)),
            Span::raw(crop.agmarknet_url()),
        ]));
        lines.push(Line::from(vec![
            Span::styled("MSP        ", Style::default().fg(theme.text_secondary)),
            Span::raw(MSP_URL),
        ]));

        // Wrapped height, so scrolling reaches the last line
        let width = inner.width.max(1) as usize;
        let total_lines: usize = lines
            .iter()
            .map(|l| l.width().div_ceil(width).max(1))
            .sum();
        self.detail_total_lines = total_lines.min(u16::MAX as usize) as u16;

        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .scroll((self.detail_scroll, 0));
        frame.render_widget(paragraph, inner);

        // Scrollbar
        if self.detail_total_lines > inner.height {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight);
            let mut scrollbar_state = ScrollbarState::new(self.detail_total_lines as usize)
                .position(self.detail_scroll as usize);
            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_search_overlay(&self, frame: &mut Frame, area: Rect) {
        let search_area = Rect {
            x: area.x + 1,
            y: area.y + 3,
            width: area.width.saturating_sub(2),
            height: 1,
        };

        frame.render_widget(Clear, search_area);

        let search_line = Line::from(vec![
            Span::styled(
                " / ",
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(self.criteria.query.as_str()),
            Span::styled("█", Style::default().fg(self.theme.accent)),
        ]);

        frame.render_widget(
            Paragraph::new(search_line).style(
                Style::default()
                    .bg(self.theme.surface)
                    .fg(self.theme.text_primary),
            ),
            search_area,
        );
    }

    fn render_help_overlay(&self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 27, area);
        frame.render_widget(Clear, popup_area);

        let help_text = vec![
            Line::styled(
                "Keyboard Shortcuts",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Line::raw(""),
            Line::raw("  1 / 2 / 3 Landing / Dashboard / Crops tab"),
            Line::raw("  Tab       Next tab"),
            Line::raw("  w         Toggle range (7 / 30 days)"),
            Line::raw("  e         Toggle environment (develop / main)"),
            Line::raw("  ↑/k ↓/j   Move in crop list"),
            Line::raw("  Home/End  First/last crop"),
            Line::raw("  Enter     Open crop profile"),
            Line::raw("  Esc       Close profile / cancel search"),
            Line::raw("  /         Search crops"),
            Line::raw("  f         Cycle season (All → Kharif → Rabi → Zaid)"),
            Line::raw("  g / G     Next / previous region"),
            Line::raw("  l         Toggle live data"),
            Line::raw("  d/u       Scroll profile down/up"),
            Line::raw("  r         Reload data"),
            Line::raw("  t         Cycle theme"),
            Line::raw("  ?         Toggle this help"),
            Line::raw("  q         Quit"),
            Line::raw(""),
            Line::styled(
                "Press any key to close",
                Style::default().fg(self.theme.text_secondary),
            ),
        ];

        let help = Paragraph::new(help_text).block(
            Block::bordered()
                .title(" Help ")
                .border_style(Style::default().fg(self.theme.accent))
                .style(Style::default().bg(self.theme.surface)),
        );

        frame.render_widget(help, popup_area);
    }
}

// ─────────────────────────────────────────────────────────
// Standalone helper functions
// ─────────────────────────────────────────────────────────

fn priority_span(priority: Priority, theme: &Theme) -> Span<'static> {
    let (label, color) = match priority {
        Priority::High => ("HIGH", theme.error),
        Priority::Medium => ("MED", theme.warning),
        Priority::Low => ("LOW", theme.success),
    };
    Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
}

fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(r);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use farm_dashboard::model::{
        CropProfile, Region, SeasonFilter, SowingWindow, FALLBACK_AGRONOMY,
    };
    use farm_dashboard::selection::SelectionTicket;
    use farm_dashboard::source::SourceError;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn app() -> App {
        App::new(
            Arc::new(loader::builtin()),
            AppOptions {
                data_dir: None,
                no_watch: true,
                criteria: FilterCriteria::default(),
                tab: Tab::Crops,
                remote: None,
            },
        )
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        })
    }

    fn type_query(app: &mut App, text: &str) {
        app.handle_event(key(KeyCode::Char('/')));
        for c in text.chars() {
            app.handle_event(key(KeyCode::Char(c)));
        }
        app.handle_event(key(KeyCode::Enter));
    }

    fn screen(app: &mut App, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(|frame| app.render(frame)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_initial_rows_cover_catalog() {
        let app = app();
        assert_eq!(app.crop_rows.len(), app.data.catalog.item_count());
        assert_eq!(app.crop_rows[0].crop.as_str(), "Rice");
        assert!(app.crop_rows[0].group_start);
        assert!(!app.crop_rows[1].group_start);
        assert_eq!(app.table_state.selected(), Some(0));
    }

    #[test]
    fn test_search_narrows_rows() {
        let mut app = app();
        type_query(&mut app, "whe");
        assert_eq!(app.mode, InputMode::Normal);
        assert_eq!(app.crop_rows.len(), 1);
        assert_eq!(app.crop_rows[0].crop.as_str(), "Wheat");
    }

    #[test]
    fn test_esc_in_search_clears_query() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('/')));
        app.handle_event(key(KeyCode::Char('x')));
        app.handle_event(key(KeyCode::Char('y')));
        assert!(app.crop_rows.is_empty());
        app.handle_event(key(KeyCode::Esc));
        assert!(app.criteria.query.is_empty());
        assert_eq!(app.crop_rows.len(), app.data.catalog.item_count());
    }

    #[test]
    fn test_season_and_region_keys() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('f')));
        assert_eq!(app.criteria.season, SeasonFilter::Only(farm_dashboard::model::Season::Kharif));
        assert!(app.crop_rows.iter().all(|r| r.crop.as_str() != "Wheat"));

        app.handle_event(key(KeyCode::Char('g')));
        assert_eq!(
            app.criteria.region,
            RegionFilter::Only(Region::new("Andhra Pradesh"))
        );
        app.handle_event(key(KeyCode::Char('G')));
        assert_eq!(app.criteria.region, RegionFilter::All);
    }

    #[test]
    fn test_enter_opens_profile_and_esc_closes() {
        let mut app = app();
        app.handle_event(key(KeyCode::Enter));
        let state = app.detail.state();
        assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
        assert!(state.panel_open);
        assert!(state.profile.is_some());

        app.handle_event(key(KeyCode::Esc));
        let state = app.detail.state();
        assert!(!state.panel_open);
        assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
    }

    #[test]
    fn test_crop_keys_ignored_on_dashboard() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('2')));
        assert_eq!(app.tab, Tab::Dashboard);
        app.handle_event(key(KeyCode::Char('f')));
        assert_eq!(app.criteria.season, SeasonFilter::All);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Crops);
    }

    #[test]
    fn test_number_keys_and_tab_cycle() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('1')));
        assert_eq!(app.tab, Tab::Landing);
        app.handle_event(key(KeyCode::Char('3')));
        assert_eq!(app.tab, Tab::Crops);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Landing);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.tab, Tab::Dashboard);
    }

    #[test]
    fn test_range_and_env_keys() {
        let mut app = app();
        assert_eq!(app.range, DateRange::Last7Days);
        assert_eq!(app.env, Environment::Develop);

        app.handle_event(key(KeyCode::Char('w')));
        app.handle_event(key(KeyCode::Char('e')));
        assert_eq!(app.range, DateRange::Last30Days);
        assert_eq!(app.env, Environment::Main);

        // Typing in search does not flip them
        type_query(&mut app, "we");
        assert_eq!(app.range, DateRange::Last30Days);
        assert_eq!(app.env, Environment::Main);

        app.handle_event(key(KeyCode::Char('w')));
        app.handle_event(key(KeyCode::Char('e')));
        assert_eq!(app.range, DateRange::Last7Days);
        assert_eq!(app.env, Environment::Develop);
    }

    #[test]
    fn test_quit_and_refresh_actions() {
        let mut app = app();
        assert_eq!(app.handle_event(key(KeyCode::Char('r'))), Action::ForceRefresh);
        assert_eq!(app.handle_event(key(KeyCode::Char('q'))), Action::Quit);
    }

    #[test]
    fn test_live_toggle_without_remote_only_flips_flag() {
        let mut app = app();
        let rows = app.crop_rows.clone();
        app.handle_event(key(KeyCode::Char('l')));
        assert!(app.detail.live_mode());
        assert_eq!(app.catalog_generation, 0);
        assert!(app.live_catalog.is_none());
        assert_eq!(app.crop_rows, rows);

        // Selecting in live mode without a backend reads the snapshot
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.detail.state().phase, ProfilePhase::Ready);
        assert!(app.detail.state().profile.is_some());
    }

    #[test]
    fn test_stale_catalog_is_discarded() {
        let mut app = app();
        app.detail.toggle_live_mode();
        app.catalog_generation = 2;

        let live = CropCatalog::new(vec![farm_dashboard::model::CropGroup::new(
            "Live",
            ["Saffron"],
        )]);
        app.handle_event(Event::CatalogFetched {
            generation: 1,
            result: Ok(live.clone()),
        });
        assert!(app.live_catalog.is_none());

        app.handle_event(Event::CatalogFetched {
            generation: 2,
            result: Ok(live),
        });
        assert_eq!(app.crop_rows.len(), 1);
        assert_eq!(app.crop_rows[0].crop.as_str(), "Saffron");
    }

    #[test]
    fn test_failed_catalog_keeps_current_and_reports() {
        let mut app = app();
        app.detail.toggle_live_mode();
        let rows = app.crop_rows.len();
        app.handle_event(Event::CatalogFetched {
            generation: 0,
            result: Err(SourceError::Status {
                url: "http://farm/api/crops/india".into(),
                status: 503,
            }),
        });
        assert_eq!(app.crop_rows.len(), rows);
        let (message, _) = app.error_message.as_ref().unwrap();
        assert!(message.contains("503"));
    }

    #[test]
    fn test_profile_event_resolves_current_ticket() {
        let mut app = app();
        let ticket = app.detail.begin_select(CropName::new("Jute"));
        let profile = CropProfile {
            agronomy: "Golden fibre; needs standing water for retting.".into(),
            sowing: vec![SowingWindow::new("West Bengal", "Kharif", "Mar–May")],
        };
        app.handle_event(Event::ProfileFetched {
            ticket,
            result: Ok(Some(profile.clone())),
        });
        assert_eq!(app.detail.state().profile, Some(profile));
    }

    /// Serves the built-in catalog and never has a profile.
    struct QuietRemote;

    impl DataSource for QuietRemote {
        fn name(&self) -> &'static str {
            "quiet"
        }

        fn fetch_catalog(&self, _region: &RegionFilter) -> Result<CropCatalog, SourceError> {
            Ok(loader::builtin().catalog)
        }

        fn fetch_profile(
            &self,
            _crop: &CropName,
            _region: &RegionFilter,
        ) -> Result<Option<CropProfile>, SourceError> {
            Ok(None)
        }
    }

    fn live_app() -> (App, tokio::sync::mpsc::UnboundedReceiver<Event>) {
        let mut app = app();
        app.remote = Some(Arc::new(QuietRemote));
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();
        app.events = Some(tx);
        (app, rx)
    }

    /// Wait for the next profile result, skipping catalog results.
    async fn next_profile(
        rx: &mut tokio::sync::mpsc::UnboundedReceiver<Event>,
    ) -> (SelectionTicket, Result<Option<CropProfile>, SourceError>) {
        loop {
            match rx.recv().await {
                Some(Event::ProfileFetched { ticket, result }) => return (ticket, result),
                Some(_) => continue,
                None => panic!("event channel closed"),
            }
        }
    }

    #[tokio::test]
    async fn test_live_on_refetches_open_profile() {
        let (mut app, mut rx) = live_app();
        app.handle_event(key(KeyCode::Enter));
        assert_eq!(app.detail.state().phase, ProfilePhase::Ready);
        assert!(app.detail.state().profile.is_some());

        app.handle_event(key(KeyCode::Char('l')));
        assert_eq!(app.catalog_generation, 1);
        let state = app.detail.state();
        assert_eq!(state.phase, ProfilePhase::Loading);
        assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
        assert!(state.profile.is_none());

        let (ticket, result) = next_profile(&mut rx).await;
        app.handle_event(Event::ProfileFetched { ticket, result });
        assert_eq!(app.detail.state().phase, ProfilePhase::Ready);
    }

    #[tokio::test]
    async fn test_region_change_refetches_open_live_profile() {
        let (mut app, mut rx) = live_app();
        app.handle_event(key(KeyCode::Char('l')));
        app.handle_event(key(KeyCode::Enter));
        let (rice_ticket, result) = next_profile(&mut rx).await;
        app.handle_event(Event::ProfileFetched {
            ticket: rice_ticket,
            result,
        });
        assert_eq!(app.detail.state().phase, ProfilePhase::Ready);

        app.handle_event(key(KeyCode::Char('g')));
        let state = app.detail.state();
        assert!(state.panel_open);
        assert_eq!(state.selected_crop, Some(CropName::new("Rice")));
        assert_eq!(state.phase, ProfilePhase::Loading);
        // The answer for the old region no longer applies
        assert!(!app.detail.resolve(rice_ticket, Ok(None)));

        let (ticket, result) = next_profile(&mut rx).await;
        assert_ne!(ticket, rice_ticket);
        assert!(app.detail.resolve(ticket, result));
    }

    #[tokio::test]
    async fn test_region_change_leaves_closed_panel_alone() {
        let (mut app, _rx) = live_app();
        app.handle_event(key(KeyCode::Char('l')));
        app.handle_event(key(KeyCode::Enter));
        app.handle_event(key(KeyCode::Esc));
        let before = app.detail.state().clone();

        app.handle_event(key(KeyCode::Char('g')));
        assert_eq!(app.detail.state(), &before);
    }

    #[test]
    fn test_render_crops_with_fallback_profile() {
        let mut app = app();
        type_query(&mut app, "onion");
        app.handle_event(key(KeyCode::Enter));

        let text = screen(&mut app, 120, 40);
        assert!(text.contains("Onion"));
        assert!(text.contains(&FALLBACK_AGRONOMY[..20]));
        assert!(text.contains("All India · Kharif · Jun–Jul"));
        assert!(text.contains("Agmarknet"));
    }

    #[test]
    fn test_render_no_results() {
        let mut app = app();
        type_query(&mut app, "zzz");
        let text = screen(&mut app, 100, 30);
        assert!(text.contains("No crops match"));
    }

    #[test]
    fn test_render_dashboard() {
        let mut app = app();
        app.tab = Tab::Dashboard;
        let text = screen(&mut app, 140, 45);
        assert!(text.contains("Green Acres"));
        assert!(text.contains("30.9%"));
        assert!(text.contains("Yield vs Rainfall"));
        assert!(text.contains("ORD-1042"));
    }

    #[test]
    fn test_render_landing() {
        let mut app = app();
        app.handle_event(key(KeyCode::Char('1')));
        let text = screen(&mut app, 120, 36);
        assert!(text.contains("1 Public Landing"));
        assert!(text.contains("Plan crops. Monitor fields. Sell produce."));
        assert!(text.contains("12k+"));
        assert!(text.contains("Platform Uptime"));
        for card in ["Operations", "Advisory", "Marketplace"] {
            assert!(text.contains(card), "missing card {card}");
        }
        assert_eq!(app.list_area, Rect::default());
    }

    #[test]
    fn test_title_shows_env_and_dashboard_shows_range() {
        let mut app = app();
        app.tab = Tab::Dashboard;
        let text = screen(&mut app, 140, 45);
        let title = text.lines().next().unwrap();
        assert!(title.contains(" develop "));
        assert!(text.contains("Range: Last 7 days"));

        app.handle_event(key(KeyCode::Char('e')));
        app.handle_event(key(KeyCode::Char('w')));
        let text = screen(&mut app, 140, 45);
        let title = text.lines().next().unwrap();
        assert!(title.contains(" main "));
        assert!(!title.contains("develop"));
        assert!(text.contains("Range: Last 30 days"));
    }

    #[test]
    fn test_click_selects_crop() {
        let mut app = app();
        screen(&mut app, 100, 30);
        let list = app.list_area;
        // Third data row: border + header + margin, then rows 0, 1, 2
        app.handle_event(Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column: list.x + 4,
            row: list.y + 3 + 2,
            modifiers: KeyModifiers::NONE,
        }));
        assert_eq!(app.table_state.selected(), Some(2));
        assert_eq!(
            app.detail.state().selected_crop,
            Some(app.crop_rows[2].crop.clone())
        );
    }
}
