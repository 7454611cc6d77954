//! Boundary validation of extraction payloads.
//!
//! Deserialization guarantees the shape; this module enforces the rules
//! the type system cannot: reference titles must be non-empty, and an
//! empty link means no link.

use crate::types::reference::{Reference, ReferenceList};

/// Outcome of validating one payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Validation {
    /// Payload conforms; values are normalized
    Valid(ReferenceList),

    /// Payload violates the schema rules
    Invalid(String),
}

/// Validate and normalize an extraction payload.
///
/// Text fields are trimmed and a blank `href` becomes `None`. A reference
/// with an empty title makes the whole payload invalid.
pub fn validate_references(list: ReferenceList) -> Validation {
    let mut references = Vec::with_capacity(list.references.len());

    for (index, reference) in list.references.into_iter().enumerate() {
        let reference = normalize(reference);
        if reference.title.is_empty() {
            return Validation::Invalid(format!("reference {} has an empty title", index));
        }
        references.push(reference);
    }

    Validation::Valid(ReferenceList::new(references))
}

fn normalize(reference: Reference) -> Reference {
    Reference {
        title: reference.title.trim().to_string(),
        author: reference.author.trim().to_string(),
        publisher: reference.publisher.trim().to_string(),
        href: reference
            .href
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_payload_is_normalized() {
        let list = ReferenceList::new(vec![
            Reference::new("  paper ", "Smith, J.", " example.com").with_href(""),
            Reference::new("book", "Doe", "Press").with_href(" https://press.example/book "),
        ]);

        let Validation::Valid(list) = validate_references(list) else {
            panic!("expected valid payload");
        };

        assert_eq!(list.references[0], Reference::new("paper", "Smith, J.", "example.com"));
        assert_eq!(
            list.references[1].href.as_deref(),
            Some("https://press.example/book")
        );
    }

    #[test]
    fn test_empty_list_is_valid() {
        assert_eq!(
            validate_references(ReferenceList::empty()),
            Validation::Valid(ReferenceList::empty())
        );
    }

    #[test]
    fn test_blank_title_is_invalid() {
        let list = ReferenceList::new(vec![
            Reference::new("ok", "A", "p"),
            Reference::new("   ", "B", "p"),
        ]);

        match validate_references(list) {
            Validation::Invalid(reason) => assert!(reason.contains("reference 1")),
            other => panic!("expected invalid, got {:?}", other),
        }
    }
}
