// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Pure utility functions.

pub mod geometry;
pub mod time;
