//! Domain identifier types with validation
//!
//! Newtype wrappers keep document ids, batch ids and topic ids from being mixed
//! up at call sites. Each type validates its format on construction.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Batch id assigned to task messages that don't carry one
pub const UNKNOWN_BATCH_ID: &str = "unknown";

/// Document identifier newtype wrapper
///
/// Identifies one record in the staging collection. Ids are opaque strings;
/// only blank ids are rejected.
///
/// # Examples
///
/// ```
/// use curator::domain::ids::DocumentId;
/// use std::str::FromStr;
///
/// let id = DocumentId::from_str("doc1").unwrap();
/// assert_eq!(id.as_str(), "doc1");
/// assert!(DocumentId::new("  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DocumentId(String);

impl DocumentId {
    /// Creates a new DocumentId from a string
    ///
    /// # Returns
    ///
    /// Returns `Ok(DocumentId)` if the id is valid, `Err` otherwise
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err("Document ID cannot be empty".to_string());
        }
        Ok(Self(id))
    }

    /// Returns the document id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DocumentId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for DocumentId {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DocumentId> for String {
    fn from(id: DocumentId) -> Self {
        id.0
    }
}

impl AsRef<str> for DocumentId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Batch correlation identifier
///
/// Attached to a record when it is processed so downstream stages can group
/// documents that arrived together. Any string is accepted, including the
/// empty string; a missing batch id becomes [`UNKNOWN_BATCH_ID`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BatchId(String);

impl BatchId {
    /// Creates a new BatchId
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The batch id used when the task message carries none
    pub fn unknown() -> Self {
        Self(UNKNOWN_BATCH_ID.to_string())
    }

    /// Returns the batch id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes self and returns the inner String
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Default for BatchId {
    fn default() -> Self {
        Self::unknown()
    }
}

impl fmt::Display for BatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Option<String>> for BatchId {
    fn from(value: Option<String>) -> Self {
        value.map(Self).unwrap_or_default()
    }
}

/// Destination topic identifier
///
/// Pub/Sub topic ids must start with a letter, be 3 to 255 characters long and
/// contain only letters, digits and `-_.~+%`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TopicId(String);

impl TopicId {
    /// Creates a new TopicId from a string
    pub fn new(id: impl Into<String>) -> Result<Self, String> {
        let id = id.into();
        let Some(first) = id.chars().next() else {
            return Err("Topic ID cannot be empty".to_string());
        };
        if !first.is_ascii_alphabetic() {
            return Err(format!("Topic ID must start with a letter: {id}"));
        }
        if id.len() < 3 || id.len() > 255 {
            return Err(format!(
                "Topic ID must be between 3 and 255 characters: {id}"
            ));
        }
        if let Some(bad) = id
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || "-_.~+%".contains(*c)))
        {
            return Err(format!("Topic ID contains invalid character '{bad}': {id}"));
        }
        Ok(Self(id))
    }

    /// Returns the topic id as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TopicId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TopicId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}
