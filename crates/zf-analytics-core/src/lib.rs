// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core types for the zf analytics SDK.
//!
//! This crate holds everything about an event that does not need storage or
//! a network: the wire envelope, identifiers, the page context and the
//! structural validator. It is used by the client SDK (`zf-analytics`).
//!
//! # Overview
//!
//! - [`Envelope`] is the wire unit, one of `identify`, `page` or `track`
//! - [`IdentifierGenerator`] produces version-4 identifiers from the OS CSPRNG
//! - [`validate`] gates caller-supplied shapes before they are stamped
//!
//! # Example
//!
//! ```
//! use zf_analytics_core::validate;
//!
//! let shape = serde_json::json!({"type": "track", "event": ""});
//! let err = validate(&shape).unwrap_err();
//! assert_eq!(err.field, "event");
//! ```

pub mod envelope;
pub mod error;
pub mod id;
pub mod page;
pub mod validate;

pub use envelope::{Envelope, EventKind, EventPayload, UserId};
pub use error::{RandomSourceError, ValidationError};
pub use id::{IdentifierGenerator, MessageId, OsRandomGenerator};
pub use page::PageContext;
pub use validate::validate;
