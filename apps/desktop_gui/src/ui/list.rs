//! Paginated book list with per-book edit/delete actions.

use std::ops::Range;

use eframe::egui;
use shared::{
    dates::format_date,
    domain::{Book, BookId},
};

pub enum ListAction {
    Edit(Book),
    Delete(BookId),
}

/// Client-side paging over the full fetched list. Pages are 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    current_page: usize,
    items_per_page: usize,
}

impl Pagination {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            current_page: 1,
            items_per_page: items_per_page.max(1),
        }
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.items_per_page)
    }

    pub fn visible_range(&self, count: usize) -> Range<usize> {
        let start = ((self.current_page - 1) * self.items_per_page).min(count);
        let end = (start + self.items_per_page).min(count);
        start..end
    }

    pub fn shows_controls(&self, count: usize) -> bool {
        count > self.items_per_page
    }

    pub fn can_go_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn can_go_next(&self, count: usize) -> bool {
        self.current_page < self.total_pages(count)
    }

    pub fn previous(&mut self) {
        self.current_page = self.current_page.saturating_sub(1).max(1);
    }

    pub fn next(&mut self, count: usize) {
        self.current_page = (self.current_page + 1).min(self.total_pages(count).max(1));
    }

    /// Pulls the page back inside `[1, total_pages]` after the list shrank.
    pub fn clamp_to(&mut self, count: usize) {
        self.current_page = self.current_page.min(self.total_pages(count).max(1));
    }
}

pub struct ListView {
    pagination: Pagination,
    synced_revision: Option<u64>,
    date_labels: Vec<String>,
}

impl ListView {
    pub fn new(items_per_page: usize) -> Self {
        Self {
            pagination: Pagination::new(items_per_page),
            synced_revision: None,
            date_labels: Vec::new(),
        }
    }

    /// Called once per frame; does work only when the controller replaced
    /// its list. Keeps the current page valid and formats dates once per
    /// list instead of once per frame.
    pub fn sync_items(&mut self, items: &[Book], revision: u64) {
        if self.synced_revision == Some(revision) {
            return;
        }
        self.synced_revision = Some(revision);
        self.pagination.clamp_to(items.len());
        self.date_labels = items
            .iter()
            .map(|book| format_date(&book.published_date))
            .collect();
    }

    /// Delete needs a persisted identifier; books without one yield nothing.
    pub fn delete_action(book: &Book) -> Option<ListAction> {
        book.persisted_id().cloned().map(ListAction::Delete)
    }

    pub fn show(&mut self, ui: &mut egui::Ui, items: &[Book]) -> Option<ListAction> {
        let mut action = None;
        let count = items.len();

        ui.vertical_centered(|ui| {
            ui.heading("My Bookshelf");
        });
        ui.separator();

        if items.is_empty() {
            ui.add_space(24.0);
            ui.vertical_centered(|ui| {
                ui.weak("No books found. Add one to get started!");
            });
            return None;
        }

        let range = self.pagination.visible_range(count);
        let controls_height = if self.pagination.shows_controls(count) {
            36.0
        } else {
            0.0
        };
        egui::ScrollArea::vertical()
            .max_height(ui.available_height() - controls_height)
            .auto_shrink([false, true])
            .show(ui, |ui| {
                for index in range {
                    let book = &items[index];
                    let published = self
                        .date_labels
                        .get(index)
                        .map(String::as_str)
                        .unwrap_or("N/A");
                    egui::Frame::group(ui.style()).show(ui, |ui| {
                        ui.set_width(ui.available_width());
                        ui.label(egui::RichText::new(&book.title).strong().size(17.0));
                        ui.horizontal(|ui| {
                            ui.label("by");
                            ui.label(egui::RichText::new(&book.author).strong());
                        });
                        ui.small(format!("Genre: {}", book.genre));
                        ui.small(format!("Published: {published}"));
                        ui.add_space(4.0);
                        ui.horizontal(|ui| {
                            if ui.button("Edit").clicked() {
                                action = Some(ListAction::Edit(book.clone()));
                            }
                            if ui.button("Delete").clicked() {
                                action = Self::delete_action(book);
                            }
                        });
                    });
                    ui.add_space(6.0);
                }
            });

        if self.pagination.shows_controls(count) {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(
                        self.pagination.can_go_previous(),
                        egui::Button::new("Previous"),
                    )
                    .clicked()
                {
                    self.pagination.previous();
                }
                ui.label(format!(
                    "Page {} of {}",
                    self.pagination.current_page(),
                    self.pagination.total_pages(count)
                ));
                if ui
                    .add_enabled(self.pagination.can_go_next(count), egui::Button::new("Next"))
                    .clicked()
                {
                    self.pagination.next(count);
                }
            });
        }

        action
    }
}
