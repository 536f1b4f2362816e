// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Data model for the editor.

pub mod editor;
pub mod overlay;
pub mod project;
