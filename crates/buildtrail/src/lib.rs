// Copyright (c) 2026 - present Nicholas D. Crosbie
// SPDX-License-Identifier: MIT

//! buildtrail library
//!
//! Ties the git and build-info crates together: find the revision a previous
//! build was made from, then list what was committed since.

pub mod config;
pub mod output;
pub mod reconcile;

pub use reconcile::{ReconcileError, Reconciler};
