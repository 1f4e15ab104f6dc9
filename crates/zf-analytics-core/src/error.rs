// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types shared by the core and the SDK.

use thiserror::Error;

/// A caller-supplied event failed structural validation.
///
/// `field` names the offending part of the envelope (`type`, `event`,
/// `traits`, ...). Validation errors are never retried: the caller has to
/// fix its input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} {message}")]
pub struct ValidationError {
	pub field: &'static str,
	pub message: &'static str,
}

impl ValidationError {
	pub fn new(field: &'static str, message: &'static str) -> Self {
		Self { field, message }
	}
}

/// The operating system refused to hand out random bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("secure random source unavailable: {0}")]
pub struct RandomSourceError(pub String);
