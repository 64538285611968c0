#![no_std]

extern crate alloc;

pub mod color;
pub mod command;
pub mod draw;
pub mod effect;
pub mod engine;
pub mod factory;
pub mod frame_scheduler;
pub mod math8;
pub mod plugin;
pub mod queue;
mod stack;

pub use command::{EngineError, Status};
pub use draw::DrawProps;
pub use engine::{
    EngineConfig, PatternEngine, DELAY_RANGE, EXT_CONTROL_ALL, EXT_CONTROL_COUNT,
    EXT_CONTROL_HUE, EXT_CONTROL_WHITE, MAX_BYTE, MAX_DEGREES_HUE, MAX_DELAY_MSECS, MAX_FORCE,
    MAX_PERCENTAGE, MAX_PLUGIN_ID, MAX_WORD,
};
pub use factory::{AdvancedPluginFactory, CorePluginFactory, PluginFactory};
pub use frame_scheduler::FrameScheduler;
pub use plugin::{
    EffectPlugin, Host, PLUGIN_TYPE_DIRECTION, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_SENDFORCE,
    PLUGIN_TYPE_TRIGGER, PLUGIN_TYPE_USEFORCE,
};
pub use queue::{EngineRequest, RequestQueue, RequestReceiver, RequestSender};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The pattern engine is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
