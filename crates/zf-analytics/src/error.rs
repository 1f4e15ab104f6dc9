// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the analytics SDK.

use std::path::PathBuf;

use thiserror::Error;
use zf_analytics_core::{RandomSourceError, ValidationError};

/// Analytics SDK errors.
///
/// Every error reaches the immediate caller. Nothing is retried or queued:
/// once a send fails the event is dropped from the client's perspective.
#[derive(Debug, Error)]
pub enum AnalyticsError {
	/// The caller supplied a structurally invalid event.
	#[error("event validation failed: {0}")]
	Validation(#[from] ValidationError),

	/// HTTP request failed before a response arrived.
	#[error("HTTP request failed: {0}")]
	RequestFailed(#[from] reqwest::Error),

	/// Endpoint returned a non-success status.
	#[error("server error ({status}): {message}")]
	ServerError { status: u16, message: String },

	/// The client cannot operate in this environment.
	#[error("configuration error: {0}")]
	Configuration(String),

	/// Every backing store failed.
	#[error("storage error: {0}")]
	Storage(#[from] StoreError),

	/// Serialization error.
	#[error("serialization error: {0}")]
	SerializationError(#[from] serde_json::Error),
}

impl From<RandomSourceError> for AnalyticsError {
	fn from(err: RandomSourceError) -> Self {
		AnalyticsError::Configuration(err.to_string())
	}
}

/// Errors from a single backing store or from the whole chain.
#[derive(Debug, Error)]
pub enum StoreError {
	#[error("I/O error on {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("malformed store file {path}: {source}")]
	Malformed {
		path: PathBuf,
		#[source]
		source: serde_json::Error,
	},

	#[error("{operation} failed on all {stores} backing stores")]
	AllStoresFailed {
		operation: &'static str,
		stores: usize,
	},
}

/// Result type alias for analytics operations.
pub type Result<T> = std::result::Result<T, AnalyticsError>;
