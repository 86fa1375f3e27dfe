//! Entry form: edits a draft book in create or edit mode.

use eframe::egui;
use shared::{
    dates,
    domain::{Book, BookField},
    error::ValidationError,
};

pub enum FormAction {
    Submit(Book),
    Cancel,
}

#[derive(Default)]
pub struct EntryForm {
    draft: Book,
    synced_revision: Option<u64>,
    error: Option<ValidationError>,
}

impl EntryForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Book {
        &self.draft
    }

    pub fn error(&self) -> Option<&ValidationError> {
        self.error.as_ref()
    }

    /// Re-initializes the draft whenever the controller's selection changed
    /// since the last sync. A selection fills the draft (date narrowed to
    /// `YYYY-MM-DD`); no selection resets it to empty defaults.
    pub fn sync_selection(&mut self, selected: Option<&Book>, revision: u64) {
        if self.synced_revision == Some(revision) {
            return;
        }
        self.synced_revision = Some(revision);
        match selected {
            Some(book) => {
                self.draft = Book {
                    published_date: dates::to_input_value(&book.published_date),
                    ..book.clone()
                };
                self.error = None;
            }
            None => self.reset(),
        }
    }

    pub fn reset(&mut self) {
        self.draft = Book::default();
        self.error = None;
    }

    pub fn update_field(&mut self, field: BookField, value: String) {
        *self.draft.field_mut(field) = value;
        if self.error.as_ref().map(ValidationError::field) == Some(field) {
            self.error = None;
        }
    }

    /// Builds the save payload. In edit mode that is the whole draft,
    /// identifier included; in create mode only the descriptive fields.
    /// The draft itself is left untouched until the save is confirmed.
    pub fn submit(&mut self, editing: bool) -> Result<Book, ValidationError> {
        if let Err(err) = self.draft.validate() {
            tracing::debug!(field = %err.field(), "form submission blocked: {err}");
            self.error = Some(err.clone());
            return Err(err);
        }
        self.error = None;
        Ok(if editing {
            self.draft.clone()
        } else {
            Book::from(self.draft.descriptive_fields())
        })
    }

    pub fn show(&mut self, ui: &mut egui::Ui, editing: bool, saving: bool) -> Option<FormAction> {
        let mut action = None;

        ui.vertical_centered(|ui| {
            ui.heading(if editing { "Edit Book" } else { "Add New Book" });
        });
        ui.separator();
        ui.add_space(6.0);

        for field in BookField::ALL {
            ui.label(egui::RichText::new(field.label()).strong());
            let hint = match field {
                BookField::PublishedDate => "YYYY-MM-DD".to_string(),
                other => format!("Enter {}", other.wire_name()),
            };
            let mut value = self.draft.field(field).to_string();
            let response = ui.add(
                egui::TextEdit::singleline(&mut value)
                    .id_salt(field.wire_name())
                    .hint_text(hint)
                    .desired_width(f32::INFINITY),
            );
            if response.changed() {
                self.update_field(field, value);
            }
            if let Some(err) = self.error().filter(|err| err.field() == field) {
                ui.colored_label(ui.visuals().error_fg_color, err.to_string());
            }
            ui.add_space(4.0);
        }

        ui.add_space(8.0);
        ui.horizontal(|ui| {
            let submit_label = if editing { "Update Book" } else { "Add Book" };
            if ui
                .add_enabled(!saving, egui::Button::new(submit_label))
                .clicked()
            {
                if let Ok(payload) = self.submit(editing) {
                    action = Some(FormAction::Submit(payload));
                }
            }
            if editing && ui.button("Cancel").clicked() {
                action = Some(FormAction::Cancel);
            }
        });

        action
    }
}
