use crate::application::session::DashboardSession;
use crate::interfaces::dashboard::render_page;
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;
use std::time::Duration;

/// Installs the dark theme. Called once from the eframe creation context.
pub fn configure_style(ctx: &egui::Context) {
    ctx.set_visuals(DesignSystem::theme());

    let mut style = (*ctx.style()).clone();
    style.spacing.item_spacing = egui::vec2(DesignSystem::SPACING_SMALL, 6.0);
    style.spacing.button_padding = egui::vec2(14.0, 6.0);
    ctx.set_style(style);
}

impl eframe::App for DashboardSession {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.poll();

        egui::CentralPanel::default()
            .frame(DesignSystem::page_frame())
            .show(ctx, |ui| {
                egui::ScrollArea::vertical()
                    .auto_shrink([false, false])
                    .show(ui, |ui| {
                        ui.set_max_width(1100.0);
                        render_page(ui, self);
                    });
            });

        // Keep polling the worker while a render is in flight
        let refresh = if self.is_busy() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(500)
        };
        ctx.request_repaint_after(refresh);
    }
}
