use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

use crate::{dates::INPUT_FORMAT, error::ValidationError};

/// Backend-assigned book identifier. Opaque to the client; numeric
/// identifiers are kept in their decimal string form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct BookId(pub String);

impl<'de> Deserialize<'de> for BookId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Signed(i64),
            Unsigned(u64),
        }

        Ok(match RawId::deserialize(deserializer)? {
            RawId::Text(value) => BookId(value),
            RawId::Signed(value) => BookId(value.to_string()),
            RawId::Unsigned(value) => BookId(value.to_string()),
        })
    }
}

impl BookId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Editable descriptive fields of a book, keyed by their wire names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookField {
    Title,
    Author,
    Genre,
    PublishedDate,
}

impl BookField {
    pub const ALL: [BookField; 4] = [
        BookField::Title,
        BookField::Author,
        BookField::Genre,
        BookField::PublishedDate,
    ];

    pub fn wire_name(self) -> &'static str {
        match self {
            BookField::Title => "title",
            BookField::Author => "author",
            BookField::Genre => "genre",
            BookField::PublishedDate => "publishedDate",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            BookField::Title => "Title",
            BookField::Author => "Author",
            BookField::Genre => "Genre",
            BookField::PublishedDate => "Published Date",
        }
    }

    pub fn from_wire_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.wire_name() == name)
    }
}

impl fmt::Display for BookField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One catalog record as it travels over the wire.
///
/// `id` is absent for drafts that were never persisted and is skipped when
/// serializing, so a draft encodes to exactly the four descriptive fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<BookId>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub author: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genre: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub published_date: String,
}

/// Create payload: the descriptive fields only, never an identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub genre: String,
    pub published_date: String,
}

impl Book {
    /// Identifier of a persisted book. Blank identifiers count as absent.
    pub fn persisted_id(&self) -> Option<&BookId> {
        self.id.as_ref().filter(|id| !id.0.trim().is_empty())
    }

    pub fn descriptive_fields(&self) -> NewBook {
        NewBook {
            title: self.title.clone(),
            author: self.author.clone(),
            genre: self.genre.clone(),
            published_date: self.published_date.clone(),
        }
    }

    pub fn field(&self, field: BookField) -> &str {
        match field {
            BookField::Title => &self.title,
            BookField::Author => &self.author,
            BookField::Genre => &self.genre,
            BookField::PublishedDate => &self.published_date,
        }
    }

    pub fn field_mut(&mut self, field: BookField) -> &mut String {
        match field {
            BookField::Title => &mut self.title,
            BookField::Author => &mut self.author,
            BookField::Genre => &mut self.genre,
            BookField::PublishedDate => &mut self.published_date,
        }
    }

    /// Required-field check performed before submission. The published date
    /// must additionally be a real `YYYY-MM-DD` calendar date.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for field in BookField::ALL {
            if self.field(field).trim().is_empty() {
                return Err(ValidationError::MissingField(field));
            }
        }

        NaiveDate::parse_from_str(self.published_date.trim(), INPUT_FORMAT)
            .map(|_| ())
            .map_err(|_| ValidationError::InvalidDate(self.published_date.clone()))
    }
}

impl From<NewBook> for Book {
    fn from(value: NewBook) -> Self {
        Self {
            id: None,
            title: value.title,
            author: value.author,
            genre: value.genre,
            published_date: value.published_date,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Option::unwrap_or_default)
}
