//! Hue-rotating predraw effect
//!
//! Rotates the track's hue on each step; the trigger force selects how
//! many degrees the hue advances per step.

use crate::draw::DrawProps;
use crate::engine::MAX_FORCE;
use crate::math8::map_value;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_TRIGGER, PLUGIN_TYPE_USEFORCE};

const MAX_DEGREE_STEP: u32 = 30;

/// Rotates the hue property, force selects the step size
#[derive(Debug, Clone, Copy)]
pub struct HueRotate {
    step: u16,
}

impl Default for HueRotate {
    fn default() -> Self {
        Self { step: 1 }
    }
}

impl EffectPlugin for HueRotate {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_TRIGGER | PLUGIN_TYPE_USEFORCE
    }

    fn trigger(&mut self, _host: &mut Host, _draw: &mut DrawProps, force: i16) {
        let force = u32::from(force.unsigned_abs());
        self.step = map_value(force, 0, MAX_FORCE as u32, 1, MAX_DEGREE_STEP) as u16;
    }

    fn next_step(&mut self, _host: &mut Host, draw: &mut DrawProps) {
        draw.degree_hue = (draw.degree_hue + self.step) % 360;
        draw.recompute_color();
    }
}
