//! Solid fill drawing effect
//!
//! Draws the current color to every pixel of the segment on each step.

use crate::draw::DrawProps;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_TRIGGER};

/// Fills the whole segment with the track color
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawAll {
    pix_len: u16,
}

impl EffectPlugin for DrawAll {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_REDRAW | PLUGIN_TYPE_TRIGGER
    }

    fn begin(&mut self, _id: u8, pix_len: u16) {
        self.pix_len = pix_len;
    }

    fn next_step(&mut self, host: &mut Host, draw: &mut DrawProps) {
        for pos in 0..usize::from(self.pix_len) {
            host.set_pixel(pos, draw.rgb);
        }
    }
}
