// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for the zf analytics SDK.
//!
//! Every outgoing request carries the same `User-Agent` so the collection
//! endpoint can tell SDK versions apart.

mod client;

pub use client::{builder, builder_with_user_agent, user_agent, SDK_NAME, SDK_VERSION};
