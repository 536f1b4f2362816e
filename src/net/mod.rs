// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Rendering backend client and job polling.

pub mod api;
pub mod job;
