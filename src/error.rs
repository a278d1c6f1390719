//! The [`Error`] trait shared by every error in this crate.
//!
//! Transports, parsers and the crate's own error enums all implement it, so
//! a caller can decide whether a failed request is worth repeating without
//! matching on the concrete error type.

use snafu::AsErrorSource;

use crate::platform::MaybeSendSync;

/// Errors that may occur in the library.
pub trait Error: std::error::Error + AsErrorSource + MaybeSendSync + 'static {
    /// If true, this indicates that a failed request may succeed if retried.
    fn is_retryable(&self) -> bool;
}
