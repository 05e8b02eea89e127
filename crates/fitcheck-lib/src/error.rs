use std::path::PathBuf;

use thiserror::Error;

use crate::catalog::TypeId;

/// Convenient result alias for the fitcheck library.
pub type Result<T> = std::result::Result<T, Error>;

/// Failure reported by an [`ItemCatalog`](crate::catalog::ItemCatalog) backend.
///
/// A lookup that finds nothing is `Ok(None)`; this type is reserved for the
/// backend itself being unable to answer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The backing store could not be reached or read.
    #[error("item catalog unavailable: {message}")]
    Unavailable { message: String },

    /// The backing store returned data that does not make sense for the request.
    #[error("corrupt catalog data for type {type_id}: {message}")]
    Corrupt { type_id: TypeId, message: String },
}

/// Errors raised while turning EFT text into a [`ParsedFitting`](crate::fitting::ParsedFitting).
#[derive(Debug, Error)]
pub enum ParseError {
    /// The first line was not `[<ship>, <fit name>]`.
    #[error("malformed fitting header: {line:?}")]
    BadHeader { line: String },

    /// Fewer than the four mandatory slot sections were present.
    #[error("fitting is truncated: found {found} of 4 slot sections (low, mid, high, rig)")]
    TruncatedFitting { found: usize },

    /// A drone bay line named an item the catalog does not know.
    #[error("unknown drone {name:?} on line {line}{}", format_suggestions(.suggestions))]
    UnknownDrone {
        name: String,
        line: usize,
        suggestions: Vec<String>,
    },

    /// Repeated drone lines added up past the largest stack the bay can record.
    #[error("drone {name:?} on line {line} overflows the stack quantity")]
    DroneQuantityOverflow { name: String, line: usize },

    /// The catalog failed while looking up `item` from line `line`.
    #[error("catalog lookup failed for {item:?} on line {line}")]
    CatalogLookupFailed {
        item: String,
        line: usize,
        #[source]
        source: CatalogError,
    },
}

/// Errors raised while computing a prerequisite closure.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// The prerequisite chain below `type_id` is deeper than the configured cap.
    #[error("prerequisite chain for type {type_id} exceeds maximum depth of {max_depth}")]
    PrerequisiteDepthExceeded { type_id: TypeId, max_depth: usize },

    /// The catalog failed while looking up `item` (a name, or `type <id>`).
    #[error("catalog lookup failed for {item}")]
    CatalogLookupFailed {
        item: String,
        #[source]
        source: CatalogError,
    },

    /// The ship hull named by a fitting is not present in the catalog.
    #[error("unknown ship hull: {name}")]
    UnknownShip { name: String },
}

/// Top-level library error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    /// A stored fitting could not be parsed.
    #[error("fitting {fitting:?} could not be parsed")]
    InvalidFitting {
        fitting: String,
        #[source]
        source: ParseError,
    },

    /// A stored fitting parsed but its skill requirements could not be resolved.
    #[error("skills for fitting {fitting:?} could not be resolved")]
    UnresolvedFitting {
        fitting: String,
        #[source]
        source: ResolveError,
    },

    /// Raised when catalog source data fails validation.
    #[error("invalid catalog data: {message}")]
    CatalogData { message: String },

    /// Raised when a catalog data file is missing from the catalog directory.
    #[error("catalog file not found at {path}")]
    CatalogFileNotFound { path: PathBuf },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
