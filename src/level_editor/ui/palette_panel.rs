//! Palette Panel for the Level Editor
//!
//! Lists every prototype by category. Clicking an entry arms the placement tool for
//! it; clicking the armed entry again disarms it. Level-wide settings sit below.

use bevy::color::{ColorToPacked, Srgba};
use bevy_egui::egui;

use crate::level_editor::prototypes::PrototypeCategory;
use crate::level_editor::save::WinCondition;
use crate::level_editor::session::EditorSession;

pub fn editor_palette_panel(ctx: &egui::Context, session: &mut EditorSession) {
    egui::SidePanel::left("palette_panel")
        .default_width(220.0)
        .resizable(true)
        .show(ctx, |ui| {
            ui.heading("Palette");
            ui.separator();

            egui::ScrollArea::vertical().show(ui, |ui| {
                prototype_list(ui, session);
                ui.separator();
                level_settings(ui, session);
            });

            ui.separator();
            ui.small("Click to place, click the entry again to stop. Esc cancels.");
        });
}

fn prototype_list(ui: &mut egui::Ui, session: &mut EditorSession) {
    let registry = session.engine().registry();
    let armed = session.armed_prototype();

    for category in PrototypeCategory::ALL {
        egui::CollapsingHeader::new(category.display_name())
            .default_open(true)
            .show(ui, |ui| {
                for prototype in registry.by_category(category) {
                    let is_armed = armed == Some(prototype.type_id);
                    if ui
                        .selectable_label(is_armed, prototype.display_name)
                        .clicked()
                    {
                        if let Err(error) = session.select_tool(prototype.type_id) {
                            log::warn!("[EditorSession] {}", error);
                        }
                    }
                }
            });
    }
}

fn level_settings(ui: &mut egui::Ui, session: &mut EditorSession) {
    let mut settings = session.settings().clone();

    egui::CollapsingHeader::new("Level Settings")
        .default_open(false)
        .show(ui, |ui| {
            ui.horizontal(|ui| {
                ui.label("Name");
                ui.text_edit_singleline(&mut settings.name);
            });

            egui::ComboBox::from_id_salt("win_condition")
                .selected_text(settings.win_condition.display_name())
                .show_ui(ui, |ui| {
                    for condition in WinCondition::ALL {
                        ui.selectable_value(
                            &mut settings.win_condition,
                            condition,
                            condition.display_name(),
                        );
                    }
                });

            ui.horizontal(|ui| {
                ui.label("Time limit");
                ui.add(
                    egui::DragValue::new(&mut settings.time_limit)
                        .range(0..=3600)
                        .suffix(" s"),
                );
            });
            if settings.time_limit == 0 {
                ui.small("No time limit");
            }

            ui.horizontal(|ui| {
                ui.label("Gravity");
                ui.add(
                    egui::DragValue::new(&mut settings.gravity)
                        .range(0.0..=5.0)
                        .speed(0.05),
                );
            });

            ui.horizontal(|ui| {
                ui.label("Sky color");
                let mut rgb = hex_to_rgb(&settings.sky_color);
                if ui.color_edit_button_srgb(&mut rgb).changed() {
                    settings.sky_color = rgb_to_hex(rgb);
                }
            });
        });

    if settings != *session.settings() {
        *session.settings_mut() = settings;
    }
}

pub(crate) fn hex_to_rgb(hex: &str) -> [u8; 3] {
    let [r, g, b, _] = Srgba::hex(hex).unwrap_or(Srgba::WHITE).to_u8_array();
    [r, g, b]
}

pub(crate) fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rgb_conversion() {
        assert_eq!(hex_to_rgb("#87ceeb"), [0x87, 0xce, 0xeb]);
        assert_eq!(rgb_to_hex([0x87, 0xce, 0xeb]), "#87ceeb");
        assert_eq!(hex_to_rgb("not a color"), [255, 255, 255]);
    }
}
