//! Hue-setting predraw effect
//!
//! Each trigger maps the force magnitude onto the hue circle and sets the
//! track's hue property once; steps change nothing.

use crate::draw::DrawProps;
use crate::engine::{MAX_DEGREES_HUE, MAX_FORCE};
use crate::math8::map_value;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_TRIGGER, PLUGIN_TYPE_USEFORCE};

/// Force sets the hue property directly
#[derive(Debug, Clone, Copy, Default)]
pub struct HueSet;

impl EffectPlugin for HueSet {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_TRIGGER | PLUGIN_TYPE_USEFORCE
    }

    fn trigger(&mut self, _host: &mut Host, draw: &mut DrawProps, force: i16) {
        let force = u32::from(force.unsigned_abs());
        draw.degree_hue = map_value(
            force,
            0,
            MAX_FORCE as u32,
            0,
            u32::from(MAX_DEGREES_HUE),
        ) as u16;
        draw.recompute_color();
    }
}
