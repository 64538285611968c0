//! Count-setting predraw effect
//!
//! Each trigger maps the force magnitude onto the track's pixel-count
//! property across the full segment length.

use crate::draw::DrawProps;
use crate::engine::MAX_FORCE;
use crate::math8::map_value;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_TRIGGER, PLUGIN_TYPE_USEFORCE};

/// Force sets the pixel-count property directly
#[derive(Debug, Clone, Copy, Default)]
pub struct CountSet {
    pix_len: u16,
}

impl EffectPlugin for CountSet {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_TRIGGER | PLUGIN_TYPE_USEFORCE
    }

    fn begin(&mut self, _id: u8, pix_len: u16) {
        self.pix_len = pix_len;
    }

    fn trigger(&mut self, _host: &mut Host, draw: &mut DrawProps, force: i16) {
        if self.pix_len == 0 {
            return;
        }
        let force = u32::from(force.unsigned_abs());
        draw.pix_count =
            map_value(force, 0, MAX_FORCE as u32, 1, u32::from(self.pix_len)) as u16;
    }
}
