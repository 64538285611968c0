//! Plugin factories
//!
//! A factory turns the numeric id of the `E` command into a boxed plugin
//! instance. Two tiers ship with the crate: the core set of drawing
//! effects, and an advanced set adding the predraw effects, which falls
//! back to the core set for ids it does not know. Hosts inject their own
//! implementation at engine construction to extend the id space.

use alloc::boxed::Box;

use crate::effect::{
    Blinky, CometHeads, CountSet, DrawAll, DrawPush, DrawStep, FlipDirection, HueRotate, HueSet,
};
use crate::plugin::EffectPlugin;

/// Maps a plugin id to a fresh plugin instance
pub trait PluginFactory {
    /// Create the plugin for `plugin_id`, or `None` for unknown ids
    fn make_plugin(&self, plugin_id: u16) -> Option<Box<dyn EffectPlugin>>;
}

/// The core set: drawing effects only
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePluginFactory;

impl PluginFactory for CorePluginFactory {
    fn make_plugin(&self, plugin_id: u16) -> Option<Box<dyn EffectPlugin>> {
        match plugin_id {
            0 => Some(Box::new(DrawAll::default())), // current color on every pixel
            1 => Some(Box::new(DrawPush::default())), // scrolls, inserting at the head
            2 => Some(Box::new(DrawStep::default())), // one advancing pixel per step
            20 => Some(Box::new(CometHeads::default())), // moving heads with fading tails
            51 => Some(Box::new(Blinky::default())), // random pixels blink on and off
            _ => None,
        }
    }
}

/// The advanced set: predraw effects, delegating to the core set on miss
#[derive(Debug, Clone, Copy, Default)]
pub struct AdvancedPluginFactory;

impl PluginFactory for AdvancedPluginFactory {
    fn make_plugin(&self, plugin_id: u16) -> Option<Box<dyn EffectPlugin>> {
        match plugin_id {
            100 => Some(Box::new(HueSet::default())), // force sets the hue once
            101 => Some(Box::new(HueRotate::default())), // force selects a hue step
            120 => Some(Box::new(CountSet::default())), // force sets the pixel count
            160 => Some(Box::new(FlipDirection::default())), // toggles direction
            _ => CorePluginFactory.make_plugin(plugin_id),
        }
    }
}
