//! Loose identifier checks.
//!
//! Identifiers arrive from session state and form fields, so sentinel
//! values (empty strings, truncated ids) show up routinely. They are
//! treated as absent rather than invalid: callers fall back to a broader
//! scope instead of seeing a format-validation error.

/// Minimum length for an identifier to be treated as present.
const MIN_ID_LEN: usize = 8;

/// Returns the trimmed id when it passes a loose length-based check.
///
/// Not a strict UUID grammar on purpose; the store is the authority on
/// whether an id exists, this only filters obvious placeholders.
pub fn usable_id(id: Option<&str>) -> Option<&str> {
    let id = id?.trim();

    if id.len() < MIN_ID_LEN {
        return None;
    }

    Some(id)
}
