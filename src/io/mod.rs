// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! I/O: playback, media loading and project persistence.

pub mod media;
pub mod serialization;
