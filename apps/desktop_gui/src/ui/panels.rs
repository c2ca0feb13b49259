//! Stateless panels. Each one draws from the committed state and reports what
//! the user asked for; none of them change state themselves.

use client_core::view::{category_options, status_lines, PaginationView, ProductCard, StatusLine};
use eframe::egui;
use shared::{
    domain::{CategoryRecord, ProductRecord},
    state::{sort_label, CategoryFilter, FilterState, SortState, StockStatus, SORT_OPTIONS},
};

use crate::controller::events::{err_label, UiError};

#[derive(Debug, Clone, PartialEq)]
pub enum DashboardAction {
    Filters(FilterState),
    Sort(SortState),
    Page(u32),
    Clear,
    DismissBanner,
}

const CARD_WIDTH: f32 = 220.0;
const OUT_OF_STOCK: egui::Color32 = egui::Color32::from_rgb(200, 80, 80);

pub fn filter_bar(
    ui: &mut egui::Ui,
    filters: &FilterState,
    sort: SortState,
    categories: &[CategoryRecord],
    actions: &mut Vec<DashboardAction>,
) {
    let mut draft = filters.clone();
    let mut filters_changed = false;

    ui.horizontal_wrapped(|ui| {
        // Commits on every keystroke. A debounce would wrap this edit.
        filters_changed |= ui
            .add(
                egui::TextEdit::singleline(&mut draft.name)
                    .hint_text("Search by name")
                    .desired_width(180.0),
            )
            .changed();

        let options = category_options(categories);
        let selected = options
            .iter()
            .find(|(value, _)| value == draft.category.as_value())
            .map(|(_, label)| label.clone())
            .unwrap_or_else(|| draft.category.as_value().to_string());
        egui::ComboBox::from_id_salt("category_filter")
            .selected_text(selected)
            .show_ui(ui, |ui| {
                for (value, label) in &options {
                    let checked = draft.category.as_value() == value;
                    if ui.selectable_label(checked, label.as_str()).clicked() {
                        draft.category = CategoryFilter::from_value(value);
                        filters_changed = true;
                    }
                }
            });

        filters_changed |= ui
            .add(
                egui::TextEdit::singleline(&mut draft.min_price)
                    .hint_text("Min Price")
                    .desired_width(80.0),
            )
            .changed();
        filters_changed |= ui
            .add(
                egui::TextEdit::singleline(&mut draft.max_price)
                    .hint_text("Max Price")
                    .desired_width(80.0),
            )
            .changed();

        egui::ComboBox::from_id_salt("stock_filter")
            .selected_text(draft.stock_status.label())
            .show_ui(ui, |ui| {
                for status in StockStatus::ALL {
                    filters_changed |= ui
                        .selectable_value(&mut draft.stock_status, status, status.label())
                        .changed();
                }
            });

        egui::ComboBox::from_id_salt("sort_select")
            .selected_text(sort_label(&sort))
            .show_ui(ui, |ui| {
                for (option, label) in SORT_OPTIONS {
                    if ui.selectable_label(sort == option, label).clicked() {
                        actions.push(DashboardAction::Sort(option));
                    }
                }
            });

        if ui.button("Clear Filters").clicked() {
            actions.push(DashboardAction::Clear);
        }
    });

    if filters_changed {
        actions.push(DashboardAction::Filters(draft));
    }
}

pub fn error_banner(ui: &mut egui::Ui, banner: &UiError, actions: &mut Vec<DashboardAction>) {
    egui::Frame::NONE
        .fill(egui::Color32::from_rgb(111, 53, 53))
        .stroke(egui::Stroke::new(1.0, egui::Color32::from_rgb(175, 96, 96)))
        .corner_radius(8.0)
        .inner_margin(egui::Margin::symmetric(10, 8))
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                ui.label(
                    egui::RichText::new(format!(
                        "{}: {}",
                        err_label(banner.category()),
                        banner.message()
                    ))
                    .color(egui::Color32::WHITE),
                );
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Dismiss").clicked() {
                        actions.push(DashboardAction::DismissBanner);
                    }
                });
            });
        });
}

pub fn status(ui: &mut egui::Ui, results: &client_core::ResultsState) {
    for line in status_lines(results) {
        let text = egui::RichText::new(line.text());
        match line {
            StatusLine::Error(_) => ui.label(text.color(OUT_OF_STOCK)),
            StatusLine::Loading | StatusLine::Empty => ui.label(text.weak()),
        };
    }
}

pub fn product_grid(ui: &mut egui::Ui, products: &[ProductRecord]) {
    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            ui.horizontal_wrapped(|ui| {
                for product in products {
                    product_card(ui, &ProductCard::from_record(product));
                }
            });
        });
}

fn product_card(ui: &mut egui::Ui, card: &ProductCard) {
    egui::Frame::group(ui.style())
        .corner_radius(6.0)
        .inner_margin(egui::Margin::symmetric(12, 10))
        .show(ui, |ui| {
            ui.set_width(CARD_WIDTH);
            ui.vertical(|ui| {
                ui.label(egui::RichText::new(&card.title).strong().size(16.0));
                ui.label(&card.category);
                ui.label(&card.price);
                let stock = egui::RichText::new(&card.stock);
                if card.in_stock {
                    ui.label(stock);
                } else {
                    ui.label(stock.color(OUT_OF_STOCK));
                }
            });
        });
}

pub fn pagination(ui: &mut egui::Ui, view: PaginationView, actions: &mut Vec<DashboardAction>) {
    ui.horizontal(|ui| {
        if ui
            .add_enabled(!view.previous_disabled, egui::Button::new("Previous"))
            .clicked()
        {
            actions.push(DashboardAction::Page(view.previous_page()));
        }
        ui.label(view.label());
        if ui
            .add_enabled(!view.next_disabled, egui::Button::new("Next"))
            .clicked()
        {
            actions.push(DashboardAction::Page(view.next_page()));
        }
    });
}
