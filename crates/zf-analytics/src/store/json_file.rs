// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Whole-file JSON persistence shared by the file-backed stores.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::warn;

use crate::error::StoreError;

/// Loads `path`, treating a missing or empty file as an empty store.
pub(crate) fn load<T>(path: &Path) -> Result<T, StoreError>
where
	T: DeserializeOwned + Default,
{
	let bytes = match fs::read(path) {
		Ok(bytes) => bytes,
		Err(e) if e.kind() == ErrorKind::NotFound => return Ok(T::default()),
		Err(source) => {
			return Err(StoreError::Io {
				path: path.to_path_buf(),
				source,
			})
		}
	};

	if bytes.iter().all(u8::is_ascii_whitespace) {
		return Ok(T::default());
	}

	serde_json::from_slice(&bytes).map_err(|source| StoreError::Malformed {
		path: path.to_path_buf(),
		source,
	})
}

/// Loads `path` ahead of a rewrite. A malformed file is discarded so the
/// write replaces it instead of failing.
pub(crate) fn load_for_write<T>(path: &Path) -> Result<T, StoreError>
where
	T: DeserializeOwned + Default,
{
	match load(path) {
		Err(StoreError::Malformed { path, source }) => {
			warn!(
				path = %path.display(),
				error = %source,
				"discarding malformed store file"
			);
			Ok(T::default())
		}
		other => other,
	}
}

/// Writes `value` to a sibling temp file, then renames it over `path`.
pub(crate) fn save<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
	let io_err = |source: std::io::Error| StoreError::Io {
		path: path.to_path_buf(),
		source,
	};

	if let Some(parent) = path.parent() {
		fs::create_dir_all(parent).map_err(io_err)?;
	}

	let bytes = serde_json::to_vec_pretty(value).map_err(|source| StoreError::Malformed {
		path: path.to_path_buf(),
		source,
	})?;

	let tmp = path.with_extension("tmp");
	fs::write(&tmp, bytes).map_err(io_err)?;
	fs::rename(&tmp, path).map_err(io_err)
}
