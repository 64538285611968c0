//! Frame scheduling and timing utilities.
//!
//! Provides portable frame pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between frames.

use embassy_time::{Duration, Instant};
use rand_core::RngCore;

use crate::engine::PatternEngine;
use crate::factory::PluginFactory;
use crate::OutputDriver;

/// Default target frame rate (90 FPS).
pub const DEFAULT_FPS: u32 = 90;

/// Default frame duration based on target FPS.
pub const DEFAULT_FRAME_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_FPS as u64);

/// Result of a frame tick operation.
#[derive(Debug, Clone, Copy)]
pub struct FrameResult {
    /// The deadline for the next frame.
    pub next_deadline: Instant,
    /// How long to wait until the next frame (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether the display changed and was written to the driver.
    pub updated: bool,
}

/// Portable frame scheduler that manages timing without async.
///
/// This scheduler:
/// - Tracks frame timing with drift correction
/// - Ticks the pattern engine and writes changed frames to the driver
/// - Returns timing info so the caller can sleep appropriately
///
/// # Usage
///
/// ```ignore
/// let mut scheduler = FrameScheduler::new(engine, driver);
///
/// loop {
///     let now = get_current_time_ms();
///     let result = scheduler.tick(Instant::from_millis(now));
///
///     // Platform-specific sleep
///     sleep_ms(result.sleep_duration.as_millis() as u64);
/// }
/// ```
pub struct FrameScheduler<
    F,
    R,
    O,
    const NUM_PIXELS: usize,
    const MAX_LAYERS: usize,
    const MAX_TRACKS: usize,
> {
    output: O,
    engine: PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS>,
    next_frame: Instant,
    frame_duration: Duration,
}

impl<F, R, O, const NUM_PIXELS: usize, const MAX_LAYERS: usize, const MAX_TRACKS: usize>
    FrameScheduler<F, R, O, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS>
where
    F: PluginFactory,
    R: RngCore,
    O: OutputDriver,
{
    /// Create a new frame scheduler.
    ///
    /// Uses `DEFAULT_FRAME_DURATION` (90 FPS) for frame timing.
    pub fn new(engine: PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS>, driver: O) -> Self {
        Self::with_frame_duration(engine, driver, DEFAULT_FRAME_DURATION)
    }

    /// Create a new frame scheduler with custom frame duration.
    pub fn with_frame_duration(
        engine: PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS>,
        driver: O,
        frame_duration: Duration,
    ) -> Self {
        Self {
            output: driver,
            engine,
            next_frame: Instant::from_millis(0),
            frame_duration,
        }
    }

    /// Process one frame and return timing information.
    ///
    /// This method:
    /// 1. Applies drift correction if we've fallen too far behind
    /// 2. Ticks the engine
    /// 3. Writes to the output driver when the display changed
    /// 4. Returns the deadline for the next frame
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> FrameResult {
        // Drift correction: if we've fallen too far behind, reset to now
        // This prevents catch-up bursts after long stalls
        let max_drift_ms = self.frame_duration.as_millis() * 2;
        if now.as_millis() > self.next_frame.as_millis() + max_drift_ms {
            self.next_frame = now;
        }

        let updated = self.engine.update_effects(now);
        if updated {
            self.output.write(self.engine.display());
        }

        // Calculate next frame deadline
        self.next_frame += self.frame_duration;

        // Calculate sleep duration (may be zero if we're behind)
        let sleep_duration = if self.next_frame.as_millis() > now.as_millis() {
            Duration::from_millis(self.next_frame.as_millis() - now.as_millis())
        } else {
            Duration::from_millis(0)
        };

        FrameResult {
            next_deadline: self.next_frame,
            sleep_duration,
            updated,
        }
    }

    /// Get a reference to the engine.
    pub fn engine(&self) -> &PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS> {
        &self.engine
    }

    /// Get a mutable reference to the engine.
    pub fn engine_mut(&mut self) -> &mut PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS> {
        &mut self.engine
    }
}
