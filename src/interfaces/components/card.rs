use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Border accent of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Neutral,
    Success,
    Danger,
}

impl Tone {
    fn color(self) -> Option<egui::Color32> {
        match self {
            Tone::Neutral => None,
            Tone::Success => Some(DesignSystem::SUCCESS),
            Tone::Danger => Some(DesignSystem::DANGER),
        }
    }
}

/// A generic card container with standard styling
pub struct Card {
    title: Option<String>,
    min_height: f32,
    tone: Tone,
}

impl Default for Card {
    fn default() -> Self {
        Self::new()
    }
}

impl Card {
    pub fn new() -> Self {
        Self {
            title: None,
            min_height: 0.0,
            tone: Tone::Neutral,
        }
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn min_height(mut self, height: f32) -> Self {
        self.min_height = height;
        self
    }

    pub fn tone(mut self, tone: Tone) -> Self {
        self.tone = tone;
        self
    }

    pub fn show<R>(
        self,
        ui: &mut egui::Ui,
        add_contents: impl FnOnce(&mut egui::Ui) -> R,
    ) -> egui::InnerResponse<R> {
        let mut frame = DesignSystem::card_frame();

        if let Some(color) = self.tone.color() {
            frame = frame
                .fill(color.linear_multiply(0.08))
                .stroke(egui::Stroke::new(1.5, color));
        }

        frame.show(ui, |ui| {
            // Don't set min_width as it causes issues inside ScrollArea
            if self.min_height > 0.0 {
                ui.set_min_height(self.min_height);
            }

            if let Some(title) = self.title {
                ui.label(
                    egui::RichText::new(title)
                        .size(13.0)
                        .color(DesignSystem::TEXT_SECONDARY)
                        .strong(),
                );
                ui.add_space(DesignSystem::SPACING_SMALL);
            }

            add_contents(ui)
        })
    }
}
