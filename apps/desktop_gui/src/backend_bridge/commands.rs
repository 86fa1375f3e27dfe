//! Backend commands queued from UI to backend worker.

use shared::domain::{Book, BookId, NewBook};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    FetchBooks { generation: u64 },
    CreateBook { book: NewBook },
    UpdateBook { id: BookId, book: Book },
    DeleteBook { id: BookId },
}

impl BackendCommand {
    pub fn name(&self) -> &'static str {
        match self {
            BackendCommand::FetchBooks { .. } => "fetch_books",
            BackendCommand::CreateBook { .. } => "create_book",
            BackendCommand::UpdateBook { .. } => "update_book",
            BackendCommand::DeleteBook { .. } => "delete_book",
        }
    }
}
