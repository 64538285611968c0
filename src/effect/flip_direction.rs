//! Direction-flipping predraw effect
//!
//! Toggles the track's drawing direction on every trigger.

use crate::draw::DrawProps;
use crate::plugin::{EffectPlugin, Host, PLUGIN_TYPE_DIRECTION, PLUGIN_TYPE_TRIGGER};

/// Reverses the drawing direction on each trigger
#[derive(Debug, Clone, Copy, Default)]
pub struct FlipDirection;

impl EffectPlugin for FlipDirection {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_TRIGGER | PLUGIN_TYPE_DIRECTION
    }

    fn trigger(&mut self, _host: &mut Host, draw: &mut DrawProps, _force: i16) {
        draw.go_upwards = !draw.go_upwards;
    }
}
