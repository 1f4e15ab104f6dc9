// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Random identifiers for anonymous ids and message ids.
//!
//! Identifiers are 128-bit values from the operating-system CSPRNG with the
//! RFC 4122 variant and version-4 bits fixed, rendered as lowercase
//! `8-4-4-4-12` hex. There is no fallback to a weaker source: if the OS
//! cannot provide randomness the generator returns [`RandomSourceError`].

use rand::rngs::OsRng;
use rand::RngCore;
use serde::Serialize;
use uuid::Uuid;

use crate::error::RandomSourceError;

/// Source of fresh random identifiers.
pub trait IdentifierGenerator: Send + Sync + std::fmt::Debug {
	/// Returns a new version-4 identifier.
	fn next_uuid(&self) -> Result<Uuid, RandomSourceError>;

	/// Returns a new identifier in its textual form.
	fn next_id(&self) -> Result<String, RandomSourceError> {
		self.next_uuid().map(|id| id.to_string())
	}
}

/// Generator backed by the operating-system CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct OsRandomGenerator;

impl IdentifierGenerator for OsRandomGenerator {
	fn next_uuid(&self) -> Result<Uuid, RandomSourceError> {
		let mut bytes = [0u8; 16];
		OsRng
			.try_fill_bytes(&mut bytes)
			.map_err(|e| RandomSourceError(e.to_string()))?;
		Ok(uuid::Builder::from_random_bytes(bytes).into_uuid())
	}
}

/// Unique identifier of a single envelope.
///
/// A fresh one is drawn for every envelope, even for logically duplicate
/// calls, so the receiving service can de-duplicate on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
	/// Draws a new message id from `generator`.
	pub fn generate(generator: &dyn IdentifierGenerator) -> Result<Self, RandomSourceError> {
		generator.next_uuid().map(Self)
	}
}

impl std::fmt::Display for MessageId {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::str::FromStr for MessageId {
	type Err = uuid::Error;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Ok(Self(Uuid::parse_str(s)?))
	}
}
