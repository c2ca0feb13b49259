//! Dashboard app shell: drains backend events, draws the panels and feeds the
//! user's actions back through the controller.

use client_core::{view::PaginationView, StateReconciler};
use crossbeam_channel::Receiver;
use eframe::egui;

use crate::controller::{events::UiEvent, orchestration::DashboardController};
use crate::ui::panels::{self, DashboardAction};

pub struct DashboardApp {
    controller: DashboardController,
    ui_rx: Receiver<UiEvent>,
}

impl DashboardApp {
    pub fn new(mut controller: DashboardController, ui_rx: Receiver<UiEvent>) -> Self {
        controller.mount();
        Self { controller, ui_rx }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.handle_event(event);
        }
    }

    fn apply(&mut self, action: DashboardAction) {
        match action {
            DashboardAction::Filters(filters) => {
                self.controller.commit(|r| r.set_filters(filters));
            }
            DashboardAction::Sort(sort) => {
                self.controller.commit(|r| r.set_sort(sort));
            }
            DashboardAction::Page(page) => {
                self.controller.commit(|r| r.set_page(page));
            }
            DashboardAction::Clear => {
                self.controller.commit(StateReconciler::clear_filters);
            }
            DashboardAction::DismissBanner => self.controller.dismiss_banner(),
        }
    }

    fn show_dashboard(&self, ctx: &egui::Context, actions: &mut Vec<DashboardAction>) {
        let reconciler = self.controller.reconciler();
        let state = reconciler.state();

        egui::TopBottomPanel::top("filter_bar").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.heading("Product Inventory Dashboard");
            ui.small(egui::RichText::new(self.controller.location().as_str()).weak());
            ui.add_space(4.0);
            panels::filter_bar(
                ui,
                &state.filters,
                state.sort,
                reconciler.categories(),
                actions,
            );
            ui.add_space(6.0);
        });

        egui::TopBottomPanel::bottom("pagination").show(ctx, |ui| {
            ui.add_space(4.0);
            let view = PaginationView::new(
                state.page,
                reconciler.results().total_products,
                reconciler.page_size(),
            );
            panels::pagination(ui, view, actions);
            ui.add_space(4.0);
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            if let Some(banner) = self.controller.banner() {
                panels::error_banner(ui, banner, actions);
                ui.add_space(6.0);
            }
            panels::status(ui, reconciler.results());
            panels::product_grid(ui, &reconciler.results().products);
        });
    }
}

impl eframe::App for DashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        let mut actions = Vec::new();
        self.show_dashboard(ctx, &mut actions);
        for action in actions {
            self.apply(action);
        }

        if self.controller.reconciler().results().loading {
            ctx.request_repaint_after(std::time::Duration::from_millis(16));
        } else {
            ctx.request_repaint_after(std::time::Duration::from_millis(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use client_core::DashboardLocation;
    use crossbeam_channel::bounded;
    use shared::state::{SortColumn, SortOrder, SortState};

    use super::*;
    use crate::backend_bridge::commands::BackendCommand;

    #[test]
    fn actions_flow_through_the_controller() {
        let (cmd_tx, cmd_rx) = bounded(16);
        let (_ui_tx, ui_rx) = bounded(16);
        let location = DashboardLocation::parse("page=4&name=desk").expect("location");
        let mut app = DashboardApp::new(DashboardController::new(cmd_tx, location, 10), ui_rx);

        app.apply(DashboardAction::Sort(SortState::new(
            SortColumn::Price,
            SortOrder::Desc,
        )));
        app.apply(DashboardAction::Clear);

        let pages: Vec<u32> = cmd_rx
            .try_iter()
            .filter_map(|cmd| match cmd {
                BackendCommand::FetchProducts(plan) => Some(plan.page),
                BackendCommand::FetchCategories => None,
            })
            .collect();
        assert_eq!(pages, vec![4, 1, 1]);
        assert_eq!(
            app.controller.location().url().query(),
            Some("page=1&sortBy=created_at&order=asc")
        );
    }
}
