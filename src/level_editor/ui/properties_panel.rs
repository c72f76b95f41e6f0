//! Properties Panel for the Level Editor
//!
//! Shows the selected object's transform, color, and behavior fields. Every change
//! is committed to the session right away. A focused field keeps showing the text as
//! typed rather than the parsed value, so "1." or "-" stay editable.

use std::collections::HashMap;

use bevy::prelude::*;
use bevy_egui::egui;

use crate::level_editor::placement::ObjectId;
use crate::level_editor::property_panel::{FieldBinding, FieldKind, PropertyField};
use crate::level_editor::session::EditorSession;

use super::palette_panel::{hex_to_rgb, rgb_to_hex};

/// Draft text of the fields being edited
#[derive(Resource, Default)]
pub struct PendingPropertyEdits {
    /// The object the drafts belong to
    pub editing_object: Option<ObjectId>,
    pub focused: Option<PropertyField>,
    pub drafts: HashMap<PropertyField, String>,
}

impl PendingPropertyEdits {
    /// Drops all drafts when the selection moves to another object
    fn track(&mut self, id: ObjectId) {
        if self.editing_object != Some(id) {
            self.editing_object = Some(id);
            self.focused = None;
            self.drafts.clear();
        }
    }
}

pub fn editor_properties_panel(
    ctx: &egui::Context,
    session: &mut EditorSession,
    pending_edits: &mut PendingPropertyEdits,
) {
    let panel = session.panel();
    let mut commits: Vec<(PropertyField, String)> = Vec::new();
    let mut delete_requested = false;

    egui::SidePanel::right("properties_panel")
        .default_width(260.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Properties");
            ui.separator();

            let Some(panel) = &panel else {
                pending_edits.editing_object = None;
                ui.label("No object selected");
                return;
            };
            pending_edits.track(panel.id);

            ui.label(egui::RichText::new(panel.display_name).strong());
            ui.small(format!("{} ({})", panel.id, panel.type_id));
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                axis_row(ui, "Position", &panel.position, pending_edits, &mut commits);
                axis_row(ui, "Rotation", &panel.rotation, pending_edits, &mut commits);
                if !panel.scale.is_empty() {
                    axis_row(ui, "Scale", &panel.scale, pending_edits, &mut commits);
                }

                ui.separator();
                ui.horizontal(|ui| {
                    ui.label("Color");
                    field_editor(ui, &panel.color, pending_edits, &mut commits);
                });

                if !panel.behavior.is_empty() {
                    ui.separator();
                    ui.label(egui::RichText::new("Behavior").strong());
                    for binding in &panel.behavior {
                        ui.label(&binding.label);
                        field_editor(ui, binding, pending_edits, &mut commits);
                    }
                }

                ui.separator();
                if ui
                    .button(egui::RichText::new("Delete").color(egui::Color32::RED))
                    .clicked()
                {
                    delete_requested = true;
                }
            });
        });

    for (field, text) in commits {
        session.edit_property(&field, &text);
    }
    if delete_requested {
        if let Err(error) = session.delete_selected() {
            log::debug!("[EditorSession] Delete ignored: {}", error);
        }
    }
}

fn axis_row(
    ui: &mut egui::Ui,
    label: &str,
    bindings: &[FieldBinding],
    pending_edits: &mut PendingPropertyEdits,
    commits: &mut Vec<(PropertyField, String)>,
) {
    ui.label(label);
    ui.horizontal(|ui| {
        for binding in bindings {
            ui.label(&binding.label);
            field_editor(ui, binding, pending_edits, commits);
        }
    });
}

fn field_editor(
    ui: &mut egui::Ui,
    binding: &FieldBinding,
    pending_edits: &mut PendingPropertyEdits,
    commits: &mut Vec<(PropertyField, String)>,
) {
    if binding.kind == FieldKind::Color {
        let mut rgb = hex_to_rgb(&binding.value);
        if ui.color_edit_button_srgb(&mut rgb).changed() {
            commits.push((binding.field.clone(), rgb_to_hex(rgb)));
        }
    }

    let editing = pending_edits.focused.as_ref() == Some(&binding.field);
    let draft = pending_edits
        .drafts
        .entry(binding.field.clone())
        .or_default();
    if !editing {
        draft.clone_from(&binding.value);
    }

    let response = match binding.kind {
        FieldKind::Multiline => ui.add(egui::TextEdit::multiline(draft).desired_rows(3)),
        FieldKind::Number => ui.add(egui::TextEdit::singleline(draft).desired_width(56.0)),
        FieldKind::Text | FieldKind::Color => {
            ui.add(egui::TextEdit::singleline(draft).desired_width(120.0))
        }
    };
    if response.changed() {
        commits.push((binding.field.clone(), draft.clone()));
    }

    if response.has_focus() {
        pending_edits.focused = Some(binding.field.clone());
    } else if editing {
        pending_edits.focused = None;
    }
}
