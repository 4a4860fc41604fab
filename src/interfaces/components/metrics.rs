use crate::interfaces::components::card::{Card, Tone};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// A card holding one headline number
pub fn render_metric_card(
    ui: &mut egui::Ui,
    title: &str,
    value: &str,
    value_color: egui::Color32,
    context: Option<&str>,
) {
    Card::new().title(title).min_height(90.0).show(ui, |ui| {
        ui.label(
            egui::RichText::new(value)
                .size(30.0)
                .strong()
                .color(value_color),
        );

        if let Some(ctx) = context {
            ui.label(
                egui::RichText::new(ctx)
                    .size(11.0)
                    .color(DesignSystem::TEXT_MUTED),
            );
        }
    });
}

/// Full-width status line (model loaded, halted render)
pub fn render_banner(ui: &mut egui::Ui, tone: Tone, text: &str) {
    let color = match tone {
        Tone::Success => DesignSystem::SUCCESS,
        Tone::Danger => DesignSystem::DANGER,
        Tone::Neutral => DesignSystem::TEXT_SECONDARY,
    };

    Card::new().tone(tone).show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(egui::RichText::new(text).strong().color(color));
    });
}
