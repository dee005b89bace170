//! Named constructors for API endpoints.
//!
//! Each function returns a plain `Endpoint`; optional parameters are added by
//! the caller with `Endpoint::param` / `Endpoint::optional_param`.

pub mod lists;

use crate::encoding::percent_encode;

/// Percent-encode an identifier for use as a single path segment.
pub(crate) fn segment(id: &str) -> String {
    percent_encode(id)
}
