use serde::{Deserialize, Serialize};

use crate::domain::{Book, BookId};

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000/api";

pub mod routes {
    use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

    use super::BookId;

    /// Everything outside the RFC 3986 unreserved set, so an identifier always
    /// lands in a single path segment.
    const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
        .remove(b'-')
        .remove(b'.')
        .remove(b'_')
        .remove(b'~');

    pub const LIST_BOOKS: &str = "/getAllBooks";
    pub const ADD_BOOK: &str = "/addBook";
    pub const UPDATE_BOOK: &str = "/updateBook";
    pub const DELETE_BOOK: &str = "/deleteBook";

    pub fn update_book(id: &BookId) -> String {
        format!("{UPDATE_BOOK}/{}", utf8_percent_encode(id.as_str(), PATH_SEGMENT))
    }

    pub fn delete_book(id: &BookId) -> String {
        format!("{DELETE_BOOK}/{}", utf8_percent_encode(id.as_str(), PATH_SEGMENT))
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookListResponse {
    #[serde(default)]
    pub data: Vec<Book>,
}

/// Persisted-book response. Backends answer either with the bare record or
/// with the record wrapped in `data`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum BookResponse {
    Wrapped { data: Book },
    Bare(Book),
}

impl BookResponse {
    pub fn into_book(self) -> Book {
        match self {
            BookResponse::Wrapped { data } => data,
            BookResponse::Bare(book) => book,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_paths_are_single_segments() {
        assert_eq!(
            routes::update_book(&BookId::new("65f1c0ffee")),
            "/updateBook/65f1c0ffee"
        );
        assert_eq!(
            routes::delete_book(&BookId::new("a/b c")),
            "/deleteBook/a%2Fb%20c"
        );
        assert_eq!(
            routes::update_book(&BookId::new("é?#~x_1.2")),
            "/updateBook/%C3%A9%3F%23~x_1.2"
        );
    }

    #[test]
    fn book_response_accepts_wrapped_and_bare_records() {
        let wrapped: BookResponse =
            serde_json::from_str(r#"{"data":{"_id":"1","title":"Emma"}}"#).expect("wrapped");
        let bare: BookResponse =
            serde_json::from_str(r#"{"_id":"2","title":"Persuasion"}"#).expect("bare");

        assert_eq!(wrapped.into_book().title, "Emma");
        assert_eq!(bare.into_book().id, Some(BookId::new("2")));
    }

    #[test]
    fn list_with_mixed_identifier_shapes_decodes_every_record() {
        let list: BookListResponse = serde_json::from_str(
            r#"{"data":[{"_id":7,"title":"Emma"},{"_id":"b","id":"b","title":"Persuasion"}]}"#,
        )
        .expect("decode");
        let ids: Vec<_> = list.data.iter().map(|book| book.id.clone()).collect();
        assert_eq!(ids, vec![Some(BookId::new("7")), Some(BookId::new("b"))]);
    }

    #[test]
    fn list_response_defaults_to_empty() {
        let list: BookListResponse = serde_json::from_str("{}").expect("decode");
        assert!(list.data.is_empty());
    }
}
