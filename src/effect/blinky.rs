//! Random blink drawing effect
//!
//! Turns a random pixel on at the current color and another random pixel
//! off again on every step, giving an uneven twinkling over the segment.

use crate::color::Rgb;
use crate::draw::DrawProps;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_TRIGGER};

/// Blinks random pixels on and off
#[derive(Debug, Clone, Copy, Default)]
pub struct Blinky {
    pix_len: u16,
}

impl EffectPlugin for Blinky {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_REDRAW | PLUGIN_TYPE_TRIGGER
    }

    fn begin(&mut self, _id: u8, pix_len: u16) {
        self.pix_len = pix_len;
    }

    fn next_step(&mut self, host: &mut Host, draw: &mut DrawProps) {
        if self.pix_len == 0 {
            return;
        }
        let len = u32::from(self.pix_len);

        let on = host.rand_range(0, len) as usize;
        host.set_pixel(on, draw.rgb);

        let off = host.rand_range(0, len) as usize;
        host.set_pixel(off, Rgb::default());
    }
}
