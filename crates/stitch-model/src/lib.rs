//! Digested metadata model for stitch.
//!
//! The digestion step hands over a canonical entity tree as a JSON document.
//! This crate parses that handoff into [`DigestedMetadata`], the read-only
//! root container the rest of the pipeline consumes, and serializes it back
//! out for the optional metadata dump.
//!
//! # Handoff format
//!
//! ```json
//! {
//!   "classes": [
//!     {
//!       "name": "Parser",
//!       "sections": [
//!         {
//!           "title": "Methods",
//!           "prose": "Entry points. See [[Lexer]].",
//!           "members": [
//!             { "name": "parse", "signature": "parse(input) -> [[Ast]]", "prose": "..." }
//!           ]
//!         }
//!       ]
//!     }
//!   ]
//! }
//! ```
//!
//! Class iteration order is the array order of the handoff (discovery order).
//! A duplicate class name collapses last-write-wins, keeping the first
//! occurrence's position; the overwrite is logged as a warning.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata loading or serialization error.
#[derive(Debug, thiserror::Error)]
pub enum MetadataError {
    /// JSON parse or serialize failure.
    #[error("metadata JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Input violates a structural invariant.
    #[error("invalid metadata: {0}")]
    Validation(String),
}

/// One documented member (method or property) of a class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Member name.
    pub name: String,
    /// Signature text. May contain reference markers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub signature: String,
    /// Prose description. May contain reference markers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prose: String,
}

impl Member {
    /// Create a member with an empty signature and prose.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            signature: String::new(),
            prose: String::new(),
        }
    }

    /// Set the signature text.
    #[must_use]
    pub fn with_signature(mut self, signature: impl Into<String>) -> Self {
        self.signature = signature.into();
        self
    }

    /// Set the prose description.
    #[must_use]
    pub fn with_prose(mut self, prose: impl Into<String>) -> Self {
        self.prose = prose.into();
        self
    }
}

/// One documentation section within a class.
///
/// Sections keep their source order; members keep theirs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    /// Section title (e.g., "Methods", "Properties").
    pub title: String,
    /// Free-form introductory prose. May contain reference markers.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub prose: String,
    /// Members in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<Member>,
}

impl Section {
    /// Create a section with no prose and no members.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            prose: String::new(),
            members: Vec::new(),
        }
    }

    /// Set the introductory prose.
    #[must_use]
    pub fn with_prose(mut self, prose: impl Into<String>) -> Self {
        self.prose = prose.into();
        self
    }

    /// Append a member.
    #[must_use]
    pub fn with_member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }
}

/// One documented class or module.
///
/// The name is unique across the whole tree and doubles as the entity's URL
/// slug and output file stem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassEntity {
    /// Qualified class name. Never empty.
    pub name: String,
    /// Documentation sections in source order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl ClassEntity {
    /// Create a class with no sections.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            sections: Vec::new(),
        }
    }

    /// Append a section.
    #[must_use]
    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }
}

/// On-disk shape of the handoff document (owned, for deserialization).
#[derive(Deserialize)]
struct MetadataFile {
    #[serde(default)]
    classes: Vec<ClassEntity>,
}

/// Borrowed shape for serialization without cloning the tree.
#[derive(Serialize)]
struct MetadataFileRef<'a> {
    classes: &'a [ClassEntity],
}

/// Root container for the digested entity tree.
///
/// Read-only after construction. Iteration order of [`classes`](Self::classes)
/// is discovery order.
#[derive(Debug, Default)]
pub struct DigestedMetadata {
    /// Classes in discovery order.
    classes: Vec<ClassEntity>,
    /// Name lookup into `classes`.
    index: HashMap<String, usize>,
}

impl DigestedMetadata {
    /// Parse a digestion handoff document.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Json`] on malformed JSON and
    /// [`MetadataError::Validation`] if a class has an empty name.
    pub fn from_json(content: &str) -> Result<Self, MetadataError> {
        let file: MetadataFile = serde_json::from_str(content)?;
        Self::from_classes(file.classes)
    }

    /// Build the tree from an already-materialized class list.
    ///
    /// Duplicate names collapse last-write-wins (first occurrence keeps its
    /// position) and are logged as warnings.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Validation`] if a class has an empty name.
    pub fn from_classes(classes: Vec<ClassEntity>) -> Result<Self, MetadataError> {
        let mut metadata = Self::default();
        for class in classes {
            metadata.insert(class)?;
        }
        Ok(metadata)
    }

    /// Insert one class, applying the last-write-wins duplicate policy.
    fn insert(&mut self, class: ClassEntity) -> Result<(), MetadataError> {
        if class.name.is_empty() {
            return Err(MetadataError::Validation(
                "class name cannot be empty".to_owned(),
            ));
        }
        if let Some(&pos) = self.index.get(&class.name) {
            tracing::warn!(class = %class.name, "Duplicate class name, later entry wins");
            self.classes[pos] = class;
        } else {
            self.index.insert(class.name.clone(), self.classes.len());
            self.classes.push(class);
        }
        Ok(())
    }

    /// Classes in discovery order.
    #[must_use]
    pub fn classes(&self) -> &[ClassEntity] {
        &self.classes
    }

    /// Look up a class by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ClassEntity> {
        self.index.get(name).map(|&pos| &self.classes[pos])
    }

    /// Number of classes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    /// True when the tree holds no classes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Serialize the tree back into the handoff format, pretty-printed.
    ///
    /// Used for the optional metadata dump artifact.
    ///
    /// # Errors
    ///
    /// Returns [`MetadataError::Json`] if serialization fails.
    pub fn to_json_pretty(&self) -> Result<String, MetadataError> {
        let file = MetadataFileRef {
            classes: &self.classes,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }
}
