use crate::application::render::{RenderOutcome, RenderStage};
use crate::application::session::DashboardSession;
use crate::domain::market::COMPANIES;
use crate::domain::ml::SCENARIO_PRECISION;
use crate::interfaces::components::metrics::{render_banner, render_metric_card};
use crate::interfaces::components::{Card, Tone};
use crate::interfaces::design_system::DesignSystem;
use eframe::egui;

/// Feature glossary shown under the project description.
const GLOSSARY: [(&str, &str); 10] = [
    (
        "ret_precio_apertura",
        "Daily percentage return of the opening price.",
    ),
    (
        "ret_precio_maximo",
        "Percentage return of the previous day's high.",
    ),
    (
        "ret_precio_minimo",
        "Percentage return of the previous day's low.",
    ),
    (
        "ret_volumen",
        "Daily log change of traded volume (one-day lag).",
    ),
    ("sp500", "Daily return of the S&P 500 index (one-day lag)."),
    (
        "ret_petroleo_usd",
        "Daily return of crude oil futures (one-day lag).",
    ),
    (
        "d_tasa_tesoro_10y",
        "Daily change of the 10-year US Treasury yield (one-day lag).",
    ),
    (
        "ret_cobre_usd",
        "Daily return of copper futures (one-day lag).",
    ),
    (
        "d_tasa_tesoro_3m",
        "Daily change of the 3-month US Treasury yield (one-day lag).",
    ),
    (
        "ret_usd_yuan",
        "Daily return of the USD/CNY exchange rate, a proxy for global trade expectations (one-day lag).",
    ),
];

pub fn render_description(ui: &mut egui::Ui) {
    ui.vertical_centered(|ui| {
        ui.heading(
            egui::RichText::new("Stock Price Return Model")
                .size(32.0)
                .strong()
                .color(DesignSystem::TEXT_PRIMARY),
        );
    });
    ui.add_space(DesignSystem::SPACING_MEDIUM);

    Card::new().title("PROJECT").show(ui, |ui| {
        ui.set_width(ui.available_width());
        ui.label(
            egui::RichText::new("Goal: project the next-day return of a stock's closing price.")
                .color(DesignSystem::TEXT_PRIMARY),
        );
        ui.label(
            egui::RichText::new(
                "Method: a multifactor model over prices, volume, commodities and macro rates.",
            )
            .color(DesignSystem::TEXT_SECONDARY),
        );
    });
}

pub fn render_glossary(ui: &mut egui::Ui) {
    egui::CollapsingHeader::new("Model features")
        .default_open(true)
        .show(ui, |ui| {
            egui::Grid::new("glossary_grid")
                .num_columns(2)
                .spacing([DesignSystem::SPACING_MEDIUM, 6.0])
                .show(ui, |ui| {
                    for (name, text) in GLOSSARY {
                        ui.label(egui::RichText::new(name).monospace().strong());
                        ui.label(egui::RichText::new(text).color(DesignSystem::TEXT_SECONDARY));
                        ui.end_row();
                    }
                });
        });
}

pub fn render_company_selector(ui: &mut egui::Ui, session: &mut DashboardSession) {
    let mut selected = session.selected_index();

    ui.horizontal(|ui| {
        ui.label(egui::RichText::new("Company").strong());
        egui::ComboBox::from_id_salt("company_selector")
            .width(220.0)
            .selected_text(session.selected_company().label)
            .show_ui(ui, |ui| {
                for (idx, company) in COMPANIES.iter().enumerate() {
                    ui.selectable_value(&mut selected, idx, company.label);
                }
            });

        if session.is_busy() {
            ui.spinner();
        }
    });

    session.select(selected);
}

pub fn render_scenario(ui: &mut egui::Ui, outcome: &RenderOutcome) {
    let Some(scenario) = &outcome.scenario else {
        return;
    };

    Card::new()
        .title(format!("MARKET SCENARIO · {} · {}", scenario.symbol, scenario.as_of))
        .show(ui, |ui| {
            ui.set_width(ui.available_width());
            egui::ScrollArea::horizontal().show(ui, |ui| {
                egui::Grid::new("scenario_grid")
                    .striped(true)
                    .spacing([DesignSystem::SPACING_MEDIUM, 4.0])
                    .show(ui, |ui| {
                        for (name, _) in scenario.features.entries() {
                            ui.label(
                                egui::RichText::new(name)
                                    .small()
                                    .color(DesignSystem::TEXT_SECONDARY),
                            );
                        }
                        ui.end_row();

                        for (_, value) in scenario.features.entries() {
                            let text = if value.is_nan() {
                                "NaN".to_string()
                            } else {
                                format!("{:.*}", SCENARIO_PRECISION as usize, value)
                            };
                            ui.label(egui::RichText::new(text).monospace());
                        }
                        ui.end_row();
                    });
            });
        });
}

/// Model status banner plus the prediction button. Returns true when the
/// button was pressed.
pub fn render_model_section(ui: &mut egui::Ui, outcome: &RenderOutcome, busy: bool) -> bool {
    let Some(model) = &outcome.model else {
        return false;
    };

    render_banner(
        ui,
        Tone::Success,
        &format!("Model loaded: {} ({})", model.name, model.version),
    );
    ui.add_space(DesignSystem::SPACING_SMALL);

    ui.add_enabled(!busy, egui::Button::new("Run prediction"))
        .clicked()
}

pub fn render_prediction(ui: &mut egui::Ui, outcome: &RenderOutcome) {
    let Some(prediction) = &outcome.prediction else {
        return;
    };

    let color = if prediction.expected_return >= 0.0 {
        DesignSystem::SUCCESS
    } else {
        DesignSystem::DANGER
    };
    render_metric_card(
        ui,
        "EXPECTED CLOSE RETURN",
        &prediction.percent_label(),
        color,
        Some(&format!("Next trading day for {}", outcome.request.symbol)),
    );
}

pub fn render_error(ui: &mut egui::Ui, outcome: &RenderOutcome) {
    if let Some(err) = &outcome.error {
        render_banner(ui, Tone::Danger, &err.to_string());
    }
}

pub fn render_activity_log(ui: &mut egui::Ui, session: &DashboardSession) {
    egui::CollapsingHeader::new("Activity log")
        .default_open(false)
        .show(ui, |ui| {
            egui::ScrollArea::vertical()
                .max_height(180.0)
                .stick_to_bottom(true)
                .auto_shrink([false, true])
                .show(ui, |ui| {
                    for line in &session.logs {
                        let color = DesignSystem::log_line_color(line);
                        ui.label(egui::RichText::new(line).small().monospace().color(color));
                    }
                });
        });
}

/// Whole page, top to bottom.
pub fn render_page(ui: &mut egui::Ui, session: &mut DashboardSession) {
    render_description(ui);
    ui.add_space(DesignSystem::SPACING_SMALL);
    render_glossary(ui);
    ui.add_space(DesignSystem::SPACING_LARGE);

    render_company_selector(ui, session);
    ui.add_space(DesignSystem::SPACING_MEDIUM);

    let busy = session.is_busy();
    let mut predict_clicked = false;

    match &session.outcome {
        Some(outcome) => {
            render_scenario(ui, outcome);
            ui.add_space(DesignSystem::SPACING_MEDIUM);
            predict_clicked = render_model_section(ui, outcome, busy);
            ui.add_space(DesignSystem::SPACING_MEDIUM);
            if outcome.stage == RenderStage::Predicted {
                render_prediction(ui, outcome);
            }
            if outcome.is_error() {
                render_error(ui, outcome);
            }
        }
        None => {
            ui.horizontal(|ui| {
                ui.spinner();
                ui.label(
                    egui::RichText::new("Fetching market data...")
                        .color(DesignSystem::TEXT_SECONDARY),
                );
            });
        }
    }

    if predict_clicked {
        session.request_prediction();
    }

    ui.add_space(DesignSystem::SPACING_LARGE);
    render_activity_log(ui, session);
}
