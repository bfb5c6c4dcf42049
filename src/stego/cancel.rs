// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only

//! Caller-supplied cancellation.
//!
//! A [`CancelToken`] is a cloneable handle around an atomic flag. The
//! embedding and extraction loops poll it between coefficient pairs and
//! bail out with `Cancelled`; no partial output escapes. Tokens are owned
//! by the caller, not by any process-global state, so concurrent
//! operations on distinct images are fully independent.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::error::StegoError;

/// Cancellation handle shared between a caller and a running operation.
#[derive(Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from another thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// True once cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Poll point: error out if cancellation has been requested.
    pub fn check(&self) -> Result<(), StegoError> {
        if self.is_cancelled() {
            Err(StegoError::Cancelled)
        } else {
            Ok(())
        }
    }
}
