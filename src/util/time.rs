// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Timeline time formatting.

/// Format seconds as a zero-padded "MM:SS" string.
pub fn format_time(seconds: f64) -> String {
    let total = seconds.max(0.0).floor() as u64;
    format!("{:02}:{:02}", total / 60, total % 60)
}

/// Parse an "MM:SS" string into seconds. Anything that does not split
/// into exactly two numeric parts degrades silently to 0.
pub fn parse_time(text: &str) -> f64 {
    let parts: Vec<&str> = text.split(':').collect();
    if parts.len() != 2 {
        return 0.0;
    }
    match (parts[0].trim().parse::<f64>(), parts[1].trim().parse::<f64>()) {
        (Ok(minutes), Ok(seconds)) => minutes * 60.0 + seconds,
        _ => 0.0,
    }
}
