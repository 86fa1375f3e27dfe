//! UI layer for the desktop GUI: app shell, entry form, and paginated book list.

pub mod app;
pub mod form;
pub mod list;

pub use app::BookshelfApp;
