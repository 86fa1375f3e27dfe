//! Root controller: owns the authoritative book list and the current
//! selection, turns UI intents into backend commands, and folds backend
//! completions back into state.
//!
//! Refreshes are tagged with a generation number. Only the completion of the
//! most recently issued refresh replaces `items`; earlier ones that resolve
//! late are dropped, so overlapping fetches cannot roll the list back.

use crossbeam_channel::Sender;
use shared::domain::{Book, BookId};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::{
    events::{UiErrorContext, UiEvent},
    orchestration::dispatch_backend_command,
};

pub struct RootController {
    cmd_tx: Sender<BackendCommand>,
    items: Vec<Book>,
    items_revision: u64,
    selected: Option<Book>,
    selection_revision: u64,
    refresh_generation: u64,
    saving: bool,
    /// Selection revision the in-flight save was issued under.
    saving_revision: Option<u64>,
    status: String,
}

impl RootController {
    pub fn new(cmd_tx: Sender<BackendCommand>) -> Self {
        Self {
            cmd_tx,
            items: Vec::new(),
            items_revision: 0,
            selected: None,
            selection_revision: 0,
            refresh_generation: 0,
            saving: false,
            saving_revision: None,
            status: "Loading books...".to_string(),
        }
    }

    pub fn items(&self) -> &[Book] {
        &self.items
    }

    /// Bumped every time `items` is replaced.
    pub fn items_revision(&self) -> u64 {
        self.items_revision
    }

    pub fn selected(&self) -> Option<&Book> {
        self.selected.as_ref()
    }

    /// Bumped on every selection change, including re-selecting the same book.
    pub fn selection_revision(&self) -> u64 {
        self.selection_revision
    }

    pub fn is_saving(&self) -> bool {
        self.saving
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn refresh(&mut self) {
        self.refresh_generation += 1;
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::FetchBooks {
                generation: self.refresh_generation,
            },
            &mut self.status,
        );
    }

    /// Updates the selected book when it is persisted, otherwise creates a
    /// new one from the candidate's descriptive fields.
    pub fn save(&mut self, candidate: Book) {
        let cmd = match self.selected.as_ref().and_then(Book::persisted_id) {
            Some(id) => BackendCommand::UpdateBook {
                id: id.clone(),
                book: candidate,
            },
            None => BackendCommand::CreateBook {
                book: candidate.descriptive_fields(),
            },
        };
        if dispatch_backend_command(&self.cmd_tx, cmd, &mut self.status) {
            self.saving = true;
            self.saving_revision = Some(self.selection_revision);
            self.status = "Saving...".to_string();
        }
    }

    pub fn delete(&mut self, id: BookId) {
        dispatch_backend_command(
            &self.cmd_tx,
            BackendCommand::DeleteBook { id },
            &mut self.status,
        );
    }

    pub fn select(&mut self, book: Book) {
        self.selected = Some(book);
        self.selection_revision += 1;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.selection_revision += 1;
    }

    pub fn apply(&mut self, event: UiEvent) {
        match event {
            UiEvent::Info(message) => {
                self.status = message;
            }
            UiEvent::BooksLoaded { generation, books } => {
                if generation != self.refresh_generation {
                    tracing::debug!(
                        generation,
                        latest = self.refresh_generation,
                        "discarding stale book list"
                    );
                    return;
                }
                self.status = format!("Loaded {} books", books.len());
                self.items = books;
                self.items_revision += 1;
            }
            UiEvent::BookSaved { book } => {
                tracing::info!(id = ?book.id, title = %book.title, "book saved");
                self.saving = false;
                self.status = format!("Saved \"{}\"", book.title);
                // A selection made while the save was in flight is the user's
                // next edit; leave it and its draft alone.
                if self.saving_revision.take() == Some(self.selection_revision) {
                    self.clear_selection();
                }
                self.refresh();
            }
            UiEvent::BookDeleted { id } => {
                tracing::info!(%id, "book deleted");
                if self.selected.as_ref().and_then(Book::persisted_id) == Some(&id) {
                    self.clear_selection();
                }
                self.status = "Book deleted".to_string();
                self.refresh();
            }
            UiEvent::Error(err) => {
                tracing::error!(
                    context = ?err.context(),
                    category = ?err.category(),
                    "{}",
                    err.message()
                );
                if err.context() == UiErrorContext::Save {
                    self.saving = false;
                    self.saving_revision = None;
                }
                self.status = err.status_line();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::events::UiError;
    use crossbeam_channel::{bounded, Receiver};

    fn book(id: Option<&str>, title: &str) -> Book {
        Book {
            id: id.map(BookId::new),
            title: title.to_string(),
            author: "Octavia E. Butler".to_string(),
            genre: "Science Fiction".to_string(),
            published_date: "1993-10-01T00:00:00.000Z".to_string(),
        }
    }

    fn controller() -> (RootController, Receiver<BackendCommand>) {
        let (tx, rx) = bounded(64);
        (RootController::new(tx), rx)
    }

    fn drain(rx: &Receiver<BackendCommand>) -> Vec<BackendCommand> {
        rx.try_iter().collect()
    }

    #[test]
    fn refresh_issues_increasing_generations() {
        let (mut controller, rx) = controller();
        controller.refresh();
        controller.refresh();
        assert_eq!(
            drain(&rx),
            vec![
                BackendCommand::FetchBooks { generation: 1 },
                BackendCommand::FetchBooks { generation: 2 },
            ]
        );
    }

    #[test]
    fn only_latest_refresh_result_is_applied() {
        let (mut controller, _rx) = controller();
        controller.refresh();
        controller.refresh();

        controller.apply(UiEvent::BooksLoaded {
            generation: 2,
            books: vec![book(Some("new"), "Parable of the Talents")],
        });
        controller.apply(UiEvent::BooksLoaded {
            generation: 1,
            books: vec![book(Some("old"), "Parable of the Sower")],
        });

        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.items()[0].title, "Parable of the Talents");
        assert_eq!(controller.items_revision(), 1);
    }

    #[test]
    fn save_without_selection_creates_with_descriptive_fields() {
        let (mut controller, rx) = controller();
        controller.save(book(Some("stray-id"), "Kindred"));

        assert!(controller.is_saving());
        assert_eq!(
            drain(&rx),
            vec![BackendCommand::CreateBook {
                book: book(None, "Kindred").descriptive_fields()
            }]
        );
    }

    #[test]
    fn save_with_persisted_selection_updates_by_selected_id() {
        let (mut controller, rx) = controller();
        controller.select(book(Some("abc"), "Dawn"));

        let mut edited = book(Some("abc"), "Dawn (Xenogenesis 1)");
        edited.genre = "Classic".to_string();
        controller.save(edited.clone());

        assert_eq!(
            drain(&rx),
            vec![BackendCommand::UpdateBook {
                id: BookId::new("abc"),
                book: edited
            }]
        );
    }

    #[test]
    fn save_with_unpersisted_selection_falls_back_to_create() {
        let (mut controller, rx) = controller();
        controller.select(book(None, "Fledgling"));
        controller.save(book(None, "Fledgling"));

        assert!(matches!(
            drain(&rx).as_slice(),
            [BackendCommand::CreateBook { .. }]
        ));
    }

    #[test]
    fn confirmed_save_clears_selection_and_refreshes() {
        let (mut controller, rx) = controller();
        controller.select(book(Some("abc"), "Dawn"));
        controller.save(book(Some("abc"), "Dawn"));
        drain(&rx);
        let revision_before = controller.selection_revision();

        controller.apply(UiEvent::BookSaved {
            book: book(Some("abc"), "Dawn"),
        });

        assert!(controller.selected().is_none());
        assert!(!controller.is_saving());
        assert!(controller.selection_revision() > revision_before);
        assert_eq!(drain(&rx), vec![BackendCommand::FetchBooks { generation: 1 }]);
    }

    #[test]
    fn selection_made_during_save_survives_confirmation() {
        let (mut controller, rx) = controller();
        controller.select(book(Some("abc"), "Dawn"));
        controller.save(book(Some("abc"), "Dawn"));
        controller.select(book(Some("xyz"), "Imago"));
        drain(&rx);
        let revision_before = controller.selection_revision();

        controller.apply(UiEvent::BookSaved {
            book: book(Some("abc"), "Dawn"),
        });

        assert_eq!(
            controller.selected().and_then(Book::persisted_id),
            Some(&BookId::new("xyz"))
        );
        assert_eq!(controller.selection_revision(), revision_before);
        assert!(!controller.is_saving());
        assert_eq!(drain(&rx), vec![BackendCommand::FetchBooks { generation: 1 }]);
    }

    #[test]
    fn create_confirmation_resets_an_untouched_form() {
        let (mut controller, rx) = controller();
        controller.save(book(None, "Kindred"));
        drain(&rx);
        let revision_before = controller.selection_revision();

        controller.apply(UiEvent::BookSaved {
            book: book(Some("new"), "Kindred"),
        });

        assert!(controller.selection_revision() > revision_before);
    }

    #[test]
    fn failed_save_keeps_selection_and_items() {
        let (mut controller, rx) = controller();
        controller.refresh();
        controller.apply(UiEvent::BooksLoaded {
            generation: 1,
            books: vec![book(Some("abc"), "Dawn")],
        });
        controller.select(book(Some("abc"), "Dawn"));
        controller.save(book(Some("abc"), "Dawn!"));
        drain(&rx);
        let revision_before = controller.selection_revision();

        controller.apply(UiEvent::Error(UiError::from_message(
            UiErrorContext::Save,
            "connection reset",
        )));

        assert!(!controller.is_saving());
        assert_eq!(controller.selected().map(|b| b.title.as_str()), Some("Dawn"));
        assert_eq!(controller.selection_revision(), revision_before);
        assert_eq!(controller.items().len(), 1);
        assert!(drain(&rx).is_empty());
        assert!(controller.status().contains("Could not save book"));
    }

    #[test]
    fn failed_refresh_leaves_previous_items() {
        let (mut controller, _rx) = controller();
        controller.refresh();
        controller.apply(UiEvent::BooksLoaded {
            generation: 1,
            books: vec![book(Some("a"), "Wild Seed")],
        });
        controller.refresh();
        controller.apply(UiEvent::Error(UiError::from_message(
            UiErrorContext::Refresh,
            "network unreachable",
        )));

        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.items_revision(), 1);
    }

    #[test]
    fn delete_dispatches_then_refreshes_on_completion() {
        let (mut controller, rx) = controller();
        controller.delete(BookId::new("gone"));
        assert_eq!(
            drain(&rx),
            vec![BackendCommand::DeleteBook {
                id: BookId::new("gone")
            }]
        );

        controller.apply(UiEvent::BookDeleted {
            id: BookId::new("gone"),
        });
        assert_eq!(drain(&rx), vec![BackendCommand::FetchBooks { generation: 1 }]);
    }

    #[test]
    fn deleting_the_selected_book_clears_selection() {
        let (mut controller, _rx) = controller();
        controller.select(book(Some("keep"), "Imago"));
        controller.apply(UiEvent::BookDeleted {
            id: BookId::new("other"),
        });
        assert!(controller.selected().is_some());

        controller.apply(UiEvent::BookDeleted {
            id: BookId::new("keep"),
        });
        assert!(controller.selected().is_none());
    }

    #[test]
    fn cancel_clears_selection_without_network_calls() {
        let (mut controller, rx) = controller();
        controller.select(book(Some("a"), "Adulthood Rites"));
        controller.clear_selection();

        assert!(controller.selected().is_none());
        assert!(drain(&rx).is_empty());
    }
}
