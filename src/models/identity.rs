// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Verified caller identity.

use serde::Serialize;
use std::fmt;

/// Subject of a verified credential. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Identity(String);

impl Identity {
    /// Placeholder identity asserted by the development bypass credential.
    pub const DEV_PLACEHOLDER: &'static str = "00000000-0000-0000-0000-000000000001";

    /// Wrap a subject, rejecting empty or whitespace-only values.
    pub fn new(subject: impl Into<String>) -> Option<Self> {
        let subject = subject.into();
        if subject.trim().is_empty() {
            None
        } else {
            Some(Self(subject))
        }
    }

    pub fn dev_placeholder() -> Self {
        Self(Self::DEV_PLACEHOLDER.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
