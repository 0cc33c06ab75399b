use std::path::PathBuf;
use std::time::{Duration, Instant};

use eframe::egui::{self, Color32, CornerRadius, Pos2, Rect, Sense, Stroke, Vec2};

use crate::canvas::geometry::{self, NODE_HEIGHT, NODE_WIDTH};
use crate::data::entities::{NodeId, NodeKind};
use crate::data::store::EntityStore;
use crate::fs_refs::resolver::{self, FsResolver, ReferenceResolver};
use crate::persistence::export;
use crate::persistence::persist::{self, AppStateFile};
use crate::persistence::settings::AppSettings;
use crate::state::controller::CanvasController;

// Style for toast notifications
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum NoticeStyle {
    Subtle,
    Prominent,
}

pub struct CanvasApp {
    controller: CanvasController,
    dragging: Option<NodeId>,
    selected: Option<NodeId>,
    hover_node: Option<NodeId>,
    // persistence
    dirty: bool,
    last_change: Instant,
    last_save: Instant,
    save_error: Option<String>,
    last_save_info: Option<String>,
    // Timestamp for transient info banner (e.g., "Saved" toast)
    last_info_time: Option<Instant>,
    last_info_style: NoticeStyle,
    show_load_versions: bool,
    // Sidebar
    sidebar_open: bool,
    add_path_input: String,
    // Export window state
    show_export_window: bool,
    export_is_json: bool,
    export_path: String,
    export_status: Option<String>,
    // Transient zoom HUD (show current zoom briefly when scrolling)
    zoom_hud_until: Option<Instant>,
    // App settings and Preferences UI state
    app_settings: AppSettings,
    show_prefs_window: bool,
    prefs_edit: AppSettings,
    prefs_status: Option<String>,
    prefs_autosave_override_str: String,
    prefs_export_override_str: String,
}

impl CanvasApp {
    pub fn new(store: EntityStore) -> Self {
        Self::with_controller(CanvasController::new(store))
    }

    pub fn from_state(state: AppStateFile) -> Self {
        let (store, transform) = state.into_runtime();
        Self::with_controller(CanvasController::with_transform(store, transform))
    }

    fn with_controller(controller: CanvasController) -> Self {
        let app_settings = AppSettings::load().unwrap_or_default();
        let prefs_edit = app_settings.clone();
        let prefs_autosave_override_str = app_settings
            .autosave_override
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let prefs_export_override_str = app_settings
            .export_override
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        Self {
            controller,
            dragging: None,
            selected: None,
            hover_node: None,
            dirty: false,
            last_change: Instant::now(),
            last_save: Instant::now(),
            save_error: None,
            last_save_info: None,
            last_info_time: None,
            last_info_style: NoticeStyle::Prominent,
            show_load_versions: false,
            sidebar_open: true,
            add_path_input: String::new(),
            show_export_window: false,
            export_is_json: true,
            export_path: String::new(),
            export_status: None,
            zoom_hud_until: None,
            app_settings,
            show_prefs_window: false,
            prefs_edit,
            prefs_status: None,
            prefs_autosave_override_str,
            prefs_export_override_str,
        }
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.last_change = Instant::now();
    }

    fn notify(&mut self, msg: impl Into<String>, style: NoticeStyle) {
        self.last_save_info = Some(msg.into());
        self.last_info_time = Some(Instant::now());
        self.last_info_style = style;
    }

    fn save_now_with(&mut self, style: NoticeStyle) {
        let state = AppStateFile::from_runtime(self.controller.store(), &self.controller.transform);
        match persist::save_active(&state) {
            Ok(path) => {
                self.dirty = false;
                self.last_save = Instant::now();
                self.save_error = None;
                self.notify(format!("Saved to {}", path.display()), style);
            }
            Err(e) => {
                self.save_error = Some(format!("Save failed: {}", e));
            }
        }
    }

    fn save_now(&mut self) {
        self.save_now_with(NoticeStyle::Prominent);
    }

    fn save_versioned_now(&mut self) {
        let state = AppStateFile::from_runtime(self.controller.store(), &self.controller.transform);
        match persist::save_versioned(&state) {
            Ok(path) => {
                self.last_save = Instant::now();
                self.save_error = None;
                self.notify(format!("Saved version {}", path.display()), NoticeStyle::Prominent);
            }
            Err(e) => self.save_error = Some(format!("Save version failed: {}", e)),
        }
    }

    fn load_latest(&mut self) {
        match persist::load_active() {
            Ok(Some(state)) => {
                let (store, transform) = state.into_runtime();
                self.controller = CanvasController::with_transform(store, transform);
                self.dragging = None;
                self.selected = None;
                self.dirty = false;
                self.last_change = Instant::now();
                self.save_error = None;
                self.notify("Loaded latest state", NoticeStyle::Prominent);
            }
            Ok(None) => {
                self.save_error = Some("No active state file found".into());
            }
            Err(e) => {
                self.save_error = Some(format!("Load failed: {}", e));
            }
        }
    }

    /// Resolve the path typed in the sidebar and drop it at the canvas
    /// center. Resolution failures surface as a transient notice and the
    /// add is aborted.
    fn add_reference_from_input(&mut self, canvas_rect: Rect) {
        let raw = self.add_path_input.trim().to_string();
        if raw.is_empty() {
            return;
        }
        match FsResolver.resolve(std::path::Path::new(&raw)) {
            Ok(r) => {
                let drop_point = self.controller.transform.screen_to_canvas(canvas_rect.center());
                let name = r.display_name.clone();
                if self.controller.add_reference(r, drop_point) {
                    self.notify(format!("Added {}", name), NoticeStyle::Subtle);
                    self.mark_dirty();
                } else {
                    self.notify(format!("{} is already on the canvas", name), NoticeStyle::Subtle);
                }
                self.add_path_input.clear();
            }
            Err(e) => {
                self.save_error = Some(format!("Add failed: {}", e));
            }
        }
    }

    fn open_node(&mut self, id: &str) {
        if let Err(e) = resolver::open_reference(id) {
            self.save_error = Some(format!("Open failed: {}", e));
        }
    }

    fn autosave_tick(&mut self) {
        if !self.dirty {
            return;
        }
        let idle = Duration::from_secs(self.app_settings.autosave_idle_secs.max(1));
        let interval = Duration::from_secs(self.app_settings.autosave_interval_secs.max(1));
        let idle_elapsed = self.last_change.elapsed() >= idle;
        let interval_elapsed = self.last_save.elapsed() >= interval;
        if idle_elapsed || interval_elapsed {
            self.save_now_with(NoticeStyle::Subtle);
        }
    }

    fn sidebar_ui(&mut self, ui: &mut egui::Ui, canvas_rect: Rect) {
        ui.heading("Filescape");
        ui.separator();

        ui.label("Add file or folder by path:");
        let edit = ui.text_edit_singleline(&mut self.add_path_input);
        let submitted = edit.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
        if ui.button("Add to canvas").clicked() || submitted {
            self.add_reference_from_input(canvas_rect);
        }

        ui.separator();
        ui.label(format!("Nodes: {}", self.controller.store().node_count()));
        ui.label(format!("Connections: {}", self.controller.store().connection_count()));

        if let Some(sel) = self.selected.clone() {
            if let Some(node) = self.controller.store().get_node(&sel) {
                let is_folder = node.kind == NodeKind::Folder;
                let name = node.display_name.clone();
                ui.separator();
                ui.label(format!("Selected: {}", name));
                ui.horizontal_wrapped(|ui| {
                    if ui.button("Connect…").clicked() {
                        self.controller.begin_connect(&sel);
                    }
                    if ui.button("Disconnect…").clicked() {
                        self.controller.begin_disconnect(&sel);
                    }
                });
                ui.horizontal_wrapped(|ui| {
                    if ui.button("Open").clicked() {
                        self.open_node(&sel);
                    }
                    if is_folder && ui.button("Sync children").clicked() {
                        let created = self.controller.sync_directory(&sel);
                        self.notify(
                            format!("Synced {} new item(s) from {}", created.len(), name),
                            NoticeStyle::Subtle,
                        );
                        if !created.is_empty() {
                            self.mark_dirty();
                        }
                    }
                    if ui.button("Delete").clicked() {
                        self.controller.delete_node(&sel);
                        self.selected = None;
                        self.mark_dirty();
                    }
                });
            }
        }

        ui.separator();
        ui.horizontal_wrapped(|ui| {
            if ui.button("Save").clicked() {
                self.save_now();
            }
            if ui.button("Save Version").clicked() {
                self.save_versioned_now();
            }
            if ui.button("Load Latest").clicked() {
                self.load_latest();
            }
        });
        ui.horizontal_wrapped(|ui| {
            if ui.button("Versions…").clicked() {
                self.show_load_versions = true;
            }
            if ui.button("Export…").clicked() {
                self.show_export_window = true;
            }
            if ui.button("Preferences…").clicked() {
                self.prefs_edit = self.app_settings.clone();
                self.show_prefs_window = true;
            }
        });
        if ui.button("Reset View").clicked() {
            self.controller.transform.reset();
        }
    }

    fn mode_banner_ui(&mut self, ui: &mut egui::Ui) {
        if self.controller.connect.is_active() {
            let count = self.controller.connect.selection_len();
            ui.horizontal(|ui| {
                ui.label(format!("Connecting: click targets ({} selected)", count));
                if ui.button("Done").clicked() {
                    let made = self.controller.complete_connect();
                    self.notify(format!("Created {} connection(s)", made), NoticeStyle::Subtle);
                    if made > 0 {
                        self.mark_dirty();
                    }
                }
                if ui.button("Cancel").clicked() {
                    self.controller.cancel_connect();
                }
            });
        } else if self.controller.disconnect.is_active() {
            ui.horizontal(|ui| {
                ui.label("Disconnecting: click connected nodes to mark them");
                if ui.button("Done").clicked() {
                    let removed = self.controller.complete_disconnect();
                    self.notify(format!("Removed {} connection(s)", removed), NoticeStyle::Subtle);
                    if removed > 0 {
                        self.mark_dirty();
                    }
                }
                if ui.button("Cancel").clicked() {
                    self.controller.cancel_disconnect();
                }
            });
        }
    }

    fn export_window_ui(&mut self, ctx: &egui::Context) {
        if !self.show_export_window {
            return;
        }
        let mut open = self.show_export_window;
        egui::Window::new("Export Canvas").open(&mut open).show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.radio_value(&mut self.export_is_json, true, "JSON");
                ui.radio_value(&mut self.export_is_json, false, "CSV");
            });
            ui.label("File name (blank for default):");
            ui.text_edit_singleline(&mut self.export_path);
            if ui.button("Export").clicked() {
                let dir = self.app_settings.export_dir();
                let name = if self.export_path.trim().is_empty() {
                    if self.export_is_json { "canvas.json" } else { "canvas" }
                } else {
                    self.export_path.trim()
                };
                let path: PathBuf = dir.join(name);
                let result = if self.export_is_json {
                    export::export_canvas_json(self.controller.store(), &path)
                        .map(|_| format!("Exported {}", path.display()))
                } else {
                    export::export_canvas_csv(self.controller.store(), &path)
                        .map(|(n, c)| format!("Exported {} and {}", n.display(), c.display()))
                };
                self.export_status = Some(match result {
                    Ok(msg) => msg,
                    Err(e) => format!("Export failed: {}", e),
                });
            }
            if let Some(status) = &self.export_status {
                ui.label(status.clone());
            }
        });
        self.show_export_window = open;
    }

    fn versions_window_ui(&mut self, ctx: &egui::Context) {
        if !self.show_load_versions {
            return;
        }
        let mut open = self.show_load_versions;
        let mut load_request: Option<PathBuf> = None;
        egui::Window::new("Saved Versions").open(&mut open).show(ctx, |ui| {
            match persist::list_versions() {
                Ok(versions) if versions.is_empty() => {
                    ui.label("No saved versions yet");
                }
                Ok(versions) => {
                    egui::ScrollArea::vertical().max_height(280.0).show(ui, |ui| {
                        for path in versions {
                            let name = path
                                .file_name()
                                .map(|s| s.to_string_lossy().into_owned())
                                .unwrap_or_else(|| path.display().to_string());
                            if ui.button(name).clicked() {
                                load_request = Some(path);
                            }
                        }
                    });
                }
                Err(e) => {
                    ui.label(format!("Cannot list versions: {}", e));
                }
            }
        });
        if let Some(path) = load_request {
            match persist::load_from_path(&path) {
                Ok(state) => {
                    let (store, transform) = state.into_runtime();
                    self.controller = CanvasController::with_transform(store, transform);
                    self.dragging = None;
                    self.selected = None;
                    self.dirty = false;
                    self.notify(format!("Loaded {}", path.display()), NoticeStyle::Prominent);
                }
                Err(e) => self.save_error = Some(format!("Load failed: {}", e)),
            }
            open = false;
        }
        self.show_load_versions = open;
    }

    fn prefs_window_ui(&mut self, ctx: &egui::Context) {
        if !self.show_prefs_window {
            return;
        }
        let mut open = self.show_prefs_window;
        egui::Window::new("Preferences").open(&mut open).show(ctx, |ui| {
            ui.label("Autosave directory override (blank for default):");
            ui.text_edit_singleline(&mut self.prefs_autosave_override_str);
            ui.label("Export directory override (blank for default):");
            ui.text_edit_singleline(&mut self.prefs_export_override_str);
            ui.add(
                egui::Slider::new(&mut self.prefs_edit.autosave_idle_secs, 1..=30)
                    .text("Autosave after idle (s)"),
            );
            ui.add(
                egui::Slider::new(&mut self.prefs_edit.autosave_interval_secs, 10..=600)
                    .text("Autosave interval (s)"),
            );
            ui.checkbox(&mut self.prefs_edit.open_on_double_click, "Double-click opens file");
            if ui.button("Apply & Save").clicked() {
                let trimmed = self.prefs_autosave_override_str.trim();
                self.prefs_edit.autosave_override =
                    if trimmed.is_empty() { None } else { Some(PathBuf::from(trimmed)) };
                let trimmed = self.prefs_export_override_str.trim();
                self.prefs_edit.export_override =
                    if trimmed.is_empty() { None } else { Some(PathBuf::from(trimmed)) };
                match self.prefs_edit.save() {
                    Ok(()) => {
                        self.app_settings = self.prefs_edit.clone();
                        self.prefs_status = Some("Saved".into());
                    }
                    Err(e) => self.prefs_status = Some(format!("Save failed: {}", e)),
                }
            }
            if let Some(status) = &self.prefs_status {
                ui.label(status.clone());
            }
        });
        self.show_prefs_window = open;
    }

    fn toast_ui(&mut self, ui: &egui::Ui, canvas_rect: Rect) {
        if let Some(err) = &self.save_error {
            let painter = ui.painter();
            let pos = Pos2::new(canvas_rect.center().x, canvas_rect.bottom() - 24.0);
            painter.text(
                pos,
                egui::Align2::CENTER_BOTTOM,
                err,
                egui::FontId::proportional(14.0),
                Color32::from_rgb(255, 120, 120),
            );
            return;
        }
        if let (Some(info), Some(at)) = (&self.last_save_info, self.last_info_time) {
            let ttl = match self.last_info_style {
                NoticeStyle::Subtle => Duration::from_millis(1600),
                NoticeStyle::Prominent => Duration::from_millis(3200),
            };
            if at.elapsed() < ttl {
                let painter = ui.painter();
                let pos = Pos2::new(canvas_rect.center().x, canvas_rect.bottom() - 24.0);
                painter.text(
                    pos,
                    egui::Align2::CENTER_BOTTOM,
                    info,
                    egui::FontId::proportional(14.0),
                    Color32::from_rgb(200, 220, 200),
                );
                ui.ctx().request_repaint_after(Duration::from_millis(100));
            } else {
                self.last_save_info = None;
                self.last_info_time = None;
            }
        }
    }

    fn canvas_ui(&mut self, ui: &mut egui::Ui) {
        let available = ui.available_rect_before_wrap();

        // Background allocation for panning/zooming. Nodes get drag
        // priority by allocating their rects first below; bg_resp gets
        // whatever pointer activity is left.
        let bg_sense = Sense::click_and_drag();
        let bg_resp = ui.allocate_rect(available, bg_sense);

        // Esc cancels whichever gesture mode is active
        if ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            self.controller.cancel_connect();
            self.controller.cancel_disconnect();
        }

        // Zoom with scroll only when pointer is over the canvas area,
        // keeping the pointer's canvas point stationary.
        if bg_resp.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                let factor = (1.0 + scroll * 0.001).clamp(0.9, 1.1);
                let focal = ui.ctx().pointer_hover_pos().unwrap_or_else(|| available.center());
                self.controller.transform.zoom(factor, focal);
                self.zoom_hud_until = Some(Instant::now() + Duration::from_millis(1000));
                ui.ctx().request_repaint_after(Duration::from_millis(16));
            }
        }

        let painter = ui.painter_at(available);
        let scale = self.controller.transform.scale;

        // Draw transient zoom HUD if active
        if let Some(until) = self.zoom_hud_until {
            if Instant::now() < until {
                let text = format!("{:.2}x", scale);
                painter.text(
                    Pos2::new(available.center().x, available.top() + 16.0),
                    egui::Align2::CENTER_TOP,
                    text,
                    egui::FontId::proportional(14.0),
                    Color32::WHITE,
                );
                ui.ctx().request_repaint_after(Duration::from_millis(16));
            } else {
                self.zoom_hud_until = None;
            }
        }

        // Connections first so nodes draw on top.
        let connections = self.controller.connections().to_vec();
        for conn in &connections {
            let (Some(pa), Some(pb)) = (
                self.controller.live_position(&conn.source),
                self.controller.live_position(&conn.target),
            ) else {
                continue;
            };
            let pts = geometry::connector_points(geometry::node_center(pa), geometry::node_center(pb));
            let points = pts.map(|p| self.controller.transform.canvas_to_screen(p));
            let incident_hover = self
                .hover_node
                .as_deref()
                .map(|h| conn.touches(h))
                .unwrap_or(false);
            let dim = self.controller.disconnect.is_active()
                && !(self.controller.disconnect.source().map(|s| conn.touches(s)).unwrap_or(false));
            let alpha: u8 = if dim { 60 } else if incident_hover { 255 } else { 180 };
            let color = Color32::from_rgba_premultiplied(200, 200, 200, alpha);
            let width = if incident_hover { 2.5 } else { 1.5 };
            painter.add(egui::Shape::CubicBezier(egui::epaint::CubicBezierShape {
                points,
                closed: false,
                fill: Color32::TRANSPARENT,
                stroke: Stroke::new(width, color).into(),
            }));
        }

        // Draw and interact with nodes
        let node_size = Vec2::new(NODE_WIDTH * scale, NODE_HEIGHT * scale);
        let mut hover_node: Option<NodeId> = None;
        let nodes = self.controller.nodes().to_vec();
        for node in &nodes {
            let Some(pos_world) = self.controller.live_position(&node.id) else {
                continue;
            };
            let top_left = self.controller.transform.canvas_to_screen(pos_world);
            let rect = Rect::from_min_size(top_left, node_size);
            let resp = ui.allocate_rect(rect, Sense::click_and_drag());

            if resp.hovered() {
                hover_node = Some(node.id.clone());
            }

            if resp.drag_started() {
                self.dragging = Some(node.id.clone());
            }
            if resp.dragged() && self.dragging.as_deref() == Some(node.id.as_str()) {
                // Screen-space delta mapped back to canvas units; cache
                // write only, no store traffic until the gesture ends.
                let delta = resp.drag_delta() / scale;
                self.controller.live_update(&node.id, pos_world + delta);
            }
            if resp.drag_stopped() && self.dragging.as_deref() == Some(node.id.as_str()) {
                self.dragging = None;
                if let Err(e) = self.controller.commit(&node.id) {
                    self.save_error = Some(format!("Position save failed: {}", e));
                } else {
                    self.mark_dirty();
                }
            }

            if resp.clicked() {
                if self.controller.connect.is_active() {
                    self.controller.toggle_connect_target(&node.id);
                } else if self.controller.disconnect.is_active() {
                    self.controller.toggle_disconnect(&node.id);
                } else {
                    self.selected = Some(node.id.clone());
                }
            }
            if resp.double_clicked() && self.app_settings.open_on_double_click {
                self.open_node(&node.id);
            }

            resp.context_menu(|ui| {
                if ui.button("Connect from here").clicked() {
                    self.controller.begin_connect(&node.id);
                    ui.close();
                }
                if ui.button("Disconnect from here").clicked() {
                    self.controller.begin_disconnect(&node.id);
                    ui.close();
                }
                if node.kind == NodeKind::Folder && ui.button("Sync children").clicked() {
                    let created = self.controller.sync_directory(&node.id);
                    self.notify(format!("Synced {} new item(s)", created.len()), NoticeStyle::Subtle);
                    if !created.is_empty() {
                        self.mark_dirty();
                    }
                    ui.close();
                }
                if ui.button("Open").clicked() {
                    self.open_node(&node.id);
                    ui.close();
                }
                if ui.button("Delete").clicked() {
                    self.controller.delete_node(&node.id);
                    if self.selected.as_deref() == Some(node.id.as_str()) {
                        self.selected = None;
                    }
                    self.mark_dirty();
                    ui.close();
                }
            });

            // Visuals
            let dim = self.controller.disconnect.should_dim(&node.id);
            let base_fill = match node.kind {
                NodeKind::Folder => Color32::from_rgb(90, 74, 40),
                NodeKind::File => Color32::from_rgb(50, 58, 72),
            };
            let fill = if dim { base_fill.gamma_multiply(0.35) } else { base_fill };
            let mut stroke = if self.selected.as_deref() == Some(node.id.as_str()) {
                Stroke::new(2.0, Color32::WHITE)
            } else {
                Stroke::new(1.5, Color32::DARK_GRAY)
            };
            if self.controller.connect.source() == Some(node.id.as_str()) {
                stroke = Stroke::new(2.5, Color32::from_rgb(80, 220, 120));
            }
            if self.controller.connect.is_selected(&node.id) {
                stroke = Stroke::new(2.5, Color32::from_rgb(255, 170, 60));
            }
            if self.controller.disconnect.source() == Some(node.id.as_str()) {
                stroke = Stroke::new(2.5, Color32::from_rgb(255, 110, 110));
            }
            if self.controller.disconnect.is_marked(&node.id) {
                stroke = Stroke::new(2.5, Color32::from_rgb(255, 170, 60));
            }
            let rounding = CornerRadius::same((6.0 * scale).clamp(2.0, 10.0) as u8);
            painter.rect_filled(rect, rounding, fill);
            painter.rect_stroke(rect, rounding, stroke, egui::StrokeKind::Inside);

            let text_color = if dim { Color32::from_gray(120) } else { Color32::from_gray(230) };
            painter.text(
                rect.center(),
                egui::Align2::CENTER_CENTER,
                &node.display_name,
                egui::FontId::proportional((13.0 * scale).clamp(9.0, 20.0)),
                text_color,
            );
        }
        self.hover_node = hover_node;

        // Panning: background drag only, and never while a node drag is live.
        if bg_resp.dragged() && self.dragging.is_none() {
            self.controller.transform.pan(bg_resp.drag_delta());
        }
        // Clicking empty canvas clears the selection.
        if bg_resp.clicked() {
            self.selected = None;
        }

        self.toast_ui(ui, available);
    }
}

impl eframe::App for CanvasApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Drain store snapshots before any gesture handling this frame.
        self.controller.process_store_events();

        let canvas_rect = ctx.screen_rect();
        if self.sidebar_open {
            egui::SidePanel::left("filescape_sidebar")
                .resizable(true)
                .default_width(220.0)
                .show(ctx, |ui| {
                    self.sidebar_ui(ui, canvas_rect);
                });
        }

        if self.controller.connect.is_active() || self.controller.disconnect.is_active() {
            egui::TopBottomPanel::top("filescape_mode_banner").show(ctx, |ui| {
                self.mode_banner_ui(ui);
            });
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            self.canvas_ui(ui);
        });

        self.export_window_ui(ctx);
        self.versions_window_ui(ctx);
        self.prefs_window_ui(ctx);

        self.autosave_tick();
        if self.dirty {
            // keep the frame loop alive so the debounce timer can fire
            ctx.request_repaint_after(Duration::from_millis(500));
        }
    }
}
