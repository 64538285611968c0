//! Stepper drawing effect
//!
//! Lights one pixel with the current color per step, advancing through
//! the segment and wrapping around at the end. Earlier pixels stay lit,
//! so the segment progressively fills with whatever color was current
//! when each position was reached. A trigger restarts from the segment
//! start.

use crate::color::Rgb;
use crate::draw::DrawProps;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_TRIGGER};

/// Lights one advancing pixel per step
#[derive(Debug, Clone, Copy, Default)]
pub struct DrawStep {
    pix_len: u16,
    pos: u16,
}

impl EffectPlugin for DrawStep {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_REDRAW | PLUGIN_TYPE_TRIGGER
    }

    fn begin(&mut self, _id: u8, pix_len: u16) {
        self.pix_len = pix_len;
        self.pos = 0;
    }

    fn trigger(&mut self, host: &mut Host, _draw: &mut DrawProps, _force: i16) {
        for pos in 0..usize::from(self.pix_len) {
            host.set_pixel(pos, Rgb::default());
        }
        self.pos = 0;
    }

    fn next_step(&mut self, host: &mut Host, draw: &mut DrawProps) {
        if self.pix_len == 0 {
            return;
        }
        host.set_pixel(usize::from(self.pos), draw.rgb);
        self.pos = (self.pos + 1) % self.pix_len;
    }
}
