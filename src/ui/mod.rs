// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the editor.

pub mod canvas;
pub mod properties;
pub mod timeline;
pub mod toast;
pub mod toolbar;
