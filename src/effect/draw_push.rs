//! Scrolling drawing effect
//!
//! Inserts the current color at the head of the segment on each step and
//! pushes everything drawn earlier one pixel along, leaving a scrolling
//! trail of whatever colors were current when each pixel entered. A
//! trigger clears the segment and restarts the scroll.

use crate::color::Rgb;
use crate::draw::DrawProps;
use crate::plugin::{
    EffectPlugin, Host, PLUGIN_TYPE_DIRECTION, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_TRIGGER,
};

/// Scrolls the segment contents, inserting the track color at the head
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawPush {
    pix_len: u16,
}

impl EffectPlugin for DrawPush {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_REDRAW | PLUGIN_TYPE_TRIGGER | PLUGIN_TYPE_DIRECTION
    }

    fn begin(&mut self, _id: u8, pix_len: u16) {
        self.pix_len = pix_len;
    }

    fn trigger(&mut self, host: &mut Host, _draw: &mut DrawProps, _force: i16) {
        for pos in 0..usize::from(self.pix_len) {
            host.set_pixel(pos, Rgb::default());
        }
    }

    fn next_step(&mut self, host: &mut Host, draw: &mut DrawProps) {
        for pos in (1..usize::from(self.pix_len)).rev() {
            host.move_pixel(pos - 1, pos);
        }
        host.set_pixel(0, draw.rgb);
    }
}
