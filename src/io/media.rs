// Copyright (c) 2025, Buttercut Contributors
// SPDX-License-Identifier: BSD-3-Clause

//! Playback provider and media loading.
//!
//! Video decoding is out of scope; playback is modelled behind the
//! [`PlaybackProvider`] trait so the editor can sample the current time
//! without knowing what drives it. The bundled [`ClockPlayer`] advances
//! with wall-clock time, which is enough for scrubbing and time-window
//! editing against a known duration. Overlay image content is loaded for
//! preview with the `image` crate.

use std::path::Path;
use std::time::Instant;

/// Narrow interface over an external video player.
///
/// Implementations may not be ready immediately after a video is set, in
/// which case `current_time` and `duration` return `None` and the caller
/// skips the time update.
pub trait PlaybackProvider {
    /// Current playback position in seconds, `None` while not ready.
    fn current_time(&self) -> Option<f64>;
    /// Media duration in seconds, `None` while not ready.
    fn duration(&self) -> Option<f64>;
    fn set_playing(&mut self, playing: bool);
    fn is_playing(&self) -> bool;
    /// Jump to a position in seconds.
    fn seek(&mut self, time: f64);
}

/// Wall-clock driven playback stand-in. Advances while playing, clamps
/// to the duration and pauses at the end.
pub struct ClockPlayer {
    duration: f64,
    position: f64,
    playing: bool,
    last_tick: Option<Instant>,
}

impl ClockPlayer {
    pub fn new(duration: f64) -> Self {
        Self {
            duration,
            position: 0.0,
            playing: false,
            last_tick: None,
        }
    }

    /// Update the media duration, clamping the position into the new range.
    pub fn set_duration(&mut self, duration: f64) {
        self.duration = duration;
        self.position = self.position.min(duration);
    }

    /// Advance the position by the wall-clock time elapsed since the last
    /// tick. Call once per frame.
    pub fn tick(&mut self) {
        let now = Instant::now();
        if self.playing {
            if let Some(last) = self.last_tick {
                self.position += now.duration_since(last).as_secs_f64();
                if self.position >= self.duration {
                    self.position = self.duration;
                    self.playing = false;
                }
            }
        }
        self.last_tick = Some(now);
    }
}

impl PlaybackProvider for ClockPlayer {
    fn current_time(&self) -> Option<f64> {
        Some(self.position)
    }

    fn duration(&self) -> Option<f64> {
        Some(self.duration)
    }

    fn set_playing(&mut self, playing: bool) {
        self.playing = playing;
        self.last_tick = Some(Instant::now());
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn seek(&mut self, time: f64) {
        self.position = time.clamp(0.0, self.duration);
    }
}

/// An image decoded into RGBA pixels for texture upload.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

/// Load an image file into RGBA8 pixel data.
pub fn load_image(path: &Path) -> anyhow::Result<LoadedImage> {
    let img = image::open(path)?;
    let rgba = img.to_rgba8();
    Ok(LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_player_starts_paused_at_zero() {
        let player = ClockPlayer::new(60.0);
        assert!(!player.is_playing());
        assert_eq!(player.current_time(), Some(0.0));
        assert_eq!(player.duration(), Some(60.0));
    }

    #[test]
    fn test_seek_clamps_to_duration() {
        let mut player = ClockPlayer::new(60.0);
        player.seek(100.0);
        assert_eq!(player.current_time(), Some(60.0));
        player.seek(-5.0);
        assert_eq!(player.current_time(), Some(0.0));
    }

    #[test]
    fn test_set_duration_clamps_position() {
        let mut player = ClockPlayer::new(60.0);
        player.seek(50.0);
        player.set_duration(30.0);
        assert_eq!(player.current_time(), Some(30.0));
        assert_eq!(player.duration(), Some(30.0));

        player.set_duration(120.0);
        assert_eq!(player.current_time(), Some(30.0));
    }

    #[test]
    fn test_tick_does_not_advance_while_paused() {
        let mut player = ClockPlayer::new(60.0);
        player.tick();
        std::thread::sleep(std::time::Duration::from_millis(5));
        player.tick();
        assert_eq!(player.current_time(), Some(0.0));
    }

    #[test]
    fn test_playback_stops_at_end() {
        let mut player = ClockPlayer::new(0.001);
        player.set_playing(true);
        std::thread::sleep(std::time::Duration::from_millis(5));
        player.tick();
        assert_eq!(player.current_time(), Some(0.001));
        assert!(!player.is_playing());
    }
}
