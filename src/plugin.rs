//! Effect plugin contract and the host handle passed into plugin calls
//!
//! Plugins never hold a reference back into the engine. Each call receives
//! a short-lived [`Host`] exposing exactly the services a plugin may use:
//! the current draw sink, the tick timestamp, the injected random
//! generator, and force emission toward other layers.

use embassy_time::Instant;
use heapless::Deque;
use rand_core::RngCore;

use crate::color::{scale_color, Rgb};
use crate::draw::DrawProps;
use crate::math8::rand_range;

/// Plugin produces pixels into its track's redraw buffer on `next_step`
pub const PLUGIN_TYPE_REDRAW: u8 = 0x01;
/// Plugin reacts to triggers beyond the initial activation
pub const PLUGIN_TYPE_TRIGGER: u8 = 0x02;
/// Plugin interprets the trigger force value
pub const PLUGIN_TYPE_USEFORCE: u8 = 0x04;
/// Plugin emits forces toward other layers via [`Host::send_force`]
pub const PLUGIN_TYPE_SENDFORCE: u8 = 0x08;
/// Plugin changes the drawing direction
pub const PLUGIN_TYPE_DIRECTION: u8 = 0x10;

pub(crate) const FORCE_QUEUE_DEPTH: usize = 16;

/// Forces emitted by plugins, drained by the engine after each plugin call
pub(crate) type ForceQueue = Deque<(u8, i16), FORCE_QUEUE_DEPTH>;

/// Contract every effect plugin implements
///
/// A plugin whose type bits include [`PLUGIN_TYPE_REDRAW`] owns a track and
/// draws pixels; any other plugin is a predraw effect that only mutates the
/// track's [`DrawProps`].
pub trait EffectPlugin {
    /// Type bits describing the plugin's capabilities
    fn plugin_type(&self) -> u8;

    /// Called once when the plugin is stacked, before any trigger
    fn begin(&mut self, _id: u8, _pix_len: u16) {}

    /// React to a trigger with the given force
    fn trigger(&mut self, _host: &mut Host, _draw: &mut DrawProps, _force: i16) {}

    /// Produce the next animation step into the host's draw sink
    fn next_step(&mut self, _host: &mut Host, _draw: &mut DrawProps) {}
}

/// Engine services handed to a plugin for the duration of one call
pub struct Host<'a> {
    sink: Option<&'a mut [Rgb]>,
    now: Instant,
    bright_scale: u8,
    rng: &'a mut dyn RngCore,
    forces: &'a mut ForceQueue,
}

impl<'a> Host<'a> {
    pub(crate) fn new(
        sink: Option<&'a mut [Rgb]>,
        now: Instant,
        bright_scale: u8,
        rng: &'a mut dyn RngCore,
        forces: &'a mut ForceQueue,
    ) -> Self {
        Self {
            sink,
            now,
            bright_scale,
            rng,
            forces,
        }
    }

    /// Timestamp of the current tick
    pub fn now(&self) -> Instant {
        self.now
    }

    /// Milliseconds of the current tick
    pub fn millis(&self) -> u64 {
        self.now.as_millis()
    }

    /// Write one pixel into the current draw sink
    ///
    /// The engine's maximum-brightness clamp is applied here. A predraw
    /// plugin has no sink, and the call is a no-op; out-of-range positions
    /// are ignored.
    pub fn set_pixel(&mut self, pos: usize, color: Rgb) {
        let scale = self.bright_scale;
        if let Some(pixels) = self.sink.as_deref_mut() {
            if let Some(pixel) = pixels.get_mut(pos) {
                *pixel = scale_color(color, scale);
            }
        }
    }

    /// Copy one sink pixel to another position
    ///
    /// Raw copy with no brightness rescale, so repeated shifting does not
    /// degrade already-written pixels. No-op without a sink or for
    /// out-of-range positions.
    pub fn move_pixel(&mut self, from: usize, to: usize) {
        if let Some(pixels) = self.sink.as_deref_mut() {
            if from < pixels.len() && to < pixels.len() {
                pixels[to] = pixels[from];
            }
        }
    }

    /// Read one pixel back from the current draw sink
    ///
    /// Returns black when there is no sink or the position is out of range.
    pub fn get_pixel(&self, pos: usize) -> Rgb {
        self.sink
            .as_deref()
            .and_then(|pixels| pixels.get(pos))
            .copied()
            .unwrap_or_default()
    }

    /// Emit a force from this layer toward layers triggered by it
    ///
    /// The engine routes the force to every layer whose trigger source is
    /// `from_layer` once the current plugin call returns. The queue is
    /// bounded; excess emissions within one call are dropped.
    pub fn send_force(&mut self, from_layer: u8, force: i16) {
        let _ = self.forces.push_back((from_layer, force));
    }

    /// Uniform integer in `[min, max)` from the injected generator
    pub fn rand_range(&mut self, min: u32, max: u32) -> u32 {
        rand_range(self.rng, min, max)
    }
}
