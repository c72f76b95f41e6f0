//! Menu Bar for the Level Editor
//!
//! Provides the top menu bar with File, Edit, and View menus, plus the current level
//! id and the outcome of the last save or load.

use bevy::prelude::*;
use bevy_egui::egui;

use crate::level_editor::save::{ActiveLevelStore, LevelIoRequest, SaveStatus};
use crate::level_editor::session::{EditorKey, EditorSession};
use crate::level_editor::systems::EditorGridSettings;

/// Text typed into the File menu's level id box
#[derive(Resource, Default)]
pub struct MenuBarState {
    pub level_id_input: String,
}

pub fn editor_menu_bar(
    ctx: &egui::Context,
    session: &mut EditorSession,
    menu_state: &mut MenuBarState,
    grid_settings: &mut EditorGridSettings,
    save_status: &SaveStatus,
    store: &ActiveLevelStore,
    level_requests: &mut MessageWriter<LevelIoRequest>,
) {
    egui::TopBottomPanel::top("editor_menu_bar").show(ctx, |ui| {
        egui::menu::bar(ui, |ui| {
            file_menu(ui, session, menu_state, store, level_requests);
            edit_menu(ui, session);
            view_menu(ui, grid_settings);

            ui.separator();
            let title = if session.is_modified() {
                format!("{} *", session.level_id())
            } else {
                session.level_id().to_string()
            };
            ui.label(egui::RichText::new(title).strong());

            if !save_status.message.is_empty() {
                let color = if save_status.failed {
                    egui::Color32::RED
                } else {
                    egui::Color32::GREEN
                };
                ui.label(egui::RichText::new(&save_status.message).color(color));
            }
        });
    });
}

fn file_menu(
    ui: &mut egui::Ui,
    session: &EditorSession,
    menu_state: &mut MenuBarState,
    store: &ActiveLevelStore,
    level_requests: &mut MessageWriter<LevelIoRequest>,
) {
    ui.menu_button("File", |ui| {
        if ui
            .add(egui::Button::new("Save").shortcut_text("Ctrl+S"))
            .clicked()
        {
            level_requests.write(LevelIoRequest::Save);
            ui.close();
        }

        if ui.button("Reload").clicked() {
            level_requests.write(LevelIoRequest::Load(session.level_id().to_string()));
            ui.close();
        }

        ui.menu_button("Open Stored", |ui| match store.0.list() {
            Ok(level_ids) if level_ids.is_empty() => {
                ui.label("No stored levels");
            }
            Ok(level_ids) => {
                for level_id in level_ids {
                    let is_current = level_id == session.level_id();
                    if ui.selectable_label(is_current, &level_id).clicked() {
                        level_requests.write(LevelIoRequest::Load(level_id));
                        ui.close();
                    }
                }
            }
            Err(error) => {
                ui.label(egui::RichText::new(error.to_string()).color(egui::Color32::RED));
            }
        });

        ui.separator();

        ui.label("Level id");
        ui.text_edit_singleline(&mut menu_state.level_id_input);
        let level_id = menu_state.level_id_input.trim().to_string();
        ui.horizontal(|ui| {
            if ui
                .add_enabled(!level_id.is_empty(), egui::Button::new("New"))
                .clicked()
            {
                log::info!("[EditorSession] File > New '{}'", level_id);
                level_requests.write(LevelIoRequest::New(level_id.clone()));
                ui.close();
            }
            if ui
                .add_enabled(!level_id.is_empty(), egui::Button::new("Open"))
                .clicked()
            {
                log::info!("[EditorSession] File > Open '{}'", level_id);
                level_requests.write(LevelIoRequest::Load(level_id.clone()));
                ui.close();
            }
        });
    });
}

fn edit_menu(ui: &mut egui::Ui, session: &mut EditorSession) {
    ui.menu_button("Edit", |ui| {
        let can_undo = !session.engine().history().is_empty() && !session.is_dragging();
        if ui
            .add_enabled(can_undo, egui::Button::new("Undo").shortcut_text("Ctrl+Z"))
            .clicked()
        {
            session.handle_key(EditorKey::Undo);
            ui.close();
        }

        let has_selection = session.selected().is_some();
        if ui
            .add_enabled(has_selection, egui::Button::new("Duplicate").shortcut_text("Ctrl+D"))
            .clicked()
        {
            session.handle_key(EditorKey::Duplicate);
            ui.close();
        }
        if ui
            .add_enabled(has_selection, egui::Button::new("Delete").shortcut_text("Del"))
            .clicked()
        {
            session.handle_key(EditorKey::Delete);
            ui.close();
        }
        if ui
            .add(egui::Button::new("Deselect").shortcut_text("Esc"))
            .clicked()
        {
            session.handle_key(EditorKey::Escape);
            ui.close();
        }
    });
}

fn view_menu(ui: &mut egui::Ui, grid_settings: &mut EditorGridSettings) {
    ui.menu_button("View", |ui| {
        ui.checkbox(&mut grid_settings.visible, "Show grid");
    });
}
