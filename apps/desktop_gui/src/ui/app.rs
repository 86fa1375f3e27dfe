use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};
use eframe::egui;

use crate::backend_bridge::commands::BackendCommand;
use crate::config::Settings;
use crate::controller::{events::UiEvent, reducer::RootController};
use crate::ui::{
    form::{EntryForm, FormAction},
    list::{ListAction, ListView},
};

pub struct BookshelfApp {
    ui_rx: Receiver<UiEvent>,
    controller: RootController,
    form: EntryForm,
    list: ListView,
    api_base_url: String,
}

impl BookshelfApp {
    pub fn new(
        cmd_tx: Sender<BackendCommand>,
        ui_rx: Receiver<UiEvent>,
        settings: &Settings,
    ) -> Self {
        let mut controller = RootController::new(cmd_tx);
        controller.refresh();
        Self {
            ui_rx,
            controller,
            form: EntryForm::new(),
            list: ListView::new(settings.items_per_page),
            api_base_url: settings.api_base_url.clone(),
        }
    }

    fn process_ui_events(&mut self) {
        while let Ok(event) = self.ui_rx.try_recv() {
            self.controller.apply(event);
        }
    }

    fn show_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.heading("Book Manager");
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    if ui.button("Refresh").clicked() {
                        self.controller.refresh();
                    }
                });
            });
            ui.add_space(6.0);
        });
    }

    fn show_status_bar(&self, ctx: &egui::Context) {
        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.small(egui::RichText::new(self.controller.status()).weak());
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.small(egui::RichText::new(&self.api_base_url).weak());
                });
            });
        });
    }

    fn show_form_panel(&mut self, ctx: &egui::Context) {
        self.form.sync_selection(
            self.controller.selected(),
            self.controller.selection_revision(),
        );
        let editing = self.controller.selected().is_some();
        let saving = self.controller.is_saving();

        let action = egui::SidePanel::left("entry_form")
            .resizable(true)
            .default_width(320.0)
            .min_width(260.0)
            .show(ctx, |ui| {
                ui.add_space(8.0);
                self.form.show(ui, editing, saving)
            })
            .inner;

        match action {
            Some(FormAction::Submit(payload)) => self.controller.save(payload),
            Some(FormAction::Cancel) => self.controller.clear_selection(),
            None => {}
        }
    }

    fn show_book_list(&mut self, ctx: &egui::Context) {
        self.list.sync_items(
            self.controller.items(),
            self.controller.items_revision(),
        );

        let action = egui::CentralPanel::default()
            .show(ctx, |ui| self.list.show(ui, self.controller.items()))
            .inner;

        match action {
            Some(ListAction::Edit(book)) => self.controller.select(book),
            Some(ListAction::Delete(id)) => self.controller.delete(id),
            None => {}
        }
    }
}

impl eframe::App for BookshelfApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.process_ui_events();

        self.show_header(ctx);
        self.show_status_bar(ctx);
        self.show_form_panel(ctx);
        self.show_book_list(ctx);

        ctx.request_repaint_after(Duration::from_millis(100));
    }
}
