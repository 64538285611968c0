//! Layer and track stack records
//!
//! Layers belonging to one track occupy a contiguous span of the layer
//! stack starting at the track's redraw layer; both records hold plain
//! indices into the other stack, never references.

use alloc::boxed::Box;
use alloc::vec::Vec;
use embassy_time::Instant;

use crate::color::Rgb;
use crate::draw::DrawProps;
use crate::engine::MAX_PERCENTAGE;
use crate::plugin::{EffectPlugin, PLUGIN_TYPE_REDRAW};

/// `trig_source` value meaning "no layer triggers this one"
pub(crate) const TRIG_SOURCE_NONE: u8 = 255;

/// `trig_count` value meaning "auto-trigger forever"
pub(crate) const TRIG_COUNT_FOREVER: i32 = -1;

/// One stacked effect plugin plus its trigger configuration
pub(crate) struct PluginLayer {
    pub plugin: Box<dyn EffectPlugin>,
    /// Index of the track this layer belongs to
    pub track: u8,

    /// Remaining auto-trigger firings, [`TRIG_COUNT_FOREVER`] for infinite
    pub trig_count: i32,
    /// Minimum auto-trigger delay in seconds
    pub trig_delay_min: u16,
    /// Added random spread of the delay in seconds
    pub trig_delay_range: u16,
    /// Time of the next auto-fire, `None` while not armed
    pub trig_time: Option<Instant>,
    /// Force applied on fire; negative means a fresh random value each time
    pub trig_force: i16,
    /// Set after the first fire; gates drawing and auto-refire
    pub trig_active: bool,
    /// Layer accepts external-force triggers
    pub trig_extern: bool,
    /// Layer whose emitted forces trigger this one
    pub trig_source: u8,
}

impl PluginLayer {
    pub fn new(plugin: Box<dyn EffectPlugin>, track: u8, cur_force: i16) -> Self {
        Self {
            plugin,
            track,
            trig_count: TRIG_COUNT_FOREVER,
            trig_delay_min: 1,
            trig_delay_range: 0,
            trig_time: None,
            trig_force: cur_force,
            trig_active: false,
            trig_extern: false,
            trig_source: TRIG_SOURCE_NONE,
        }
    }

    pub fn is_redraw(&self) -> bool {
        self.plugin.plugin_type() & PLUGIN_TYPE_REDRAW != 0
    }
}

/// One drawing track: a redraw layer with its buffer and properties
pub(crate) struct PluginTrack {
    /// Index of the redraw layer that owns this track
    pub layer: u8,
    /// Private pixel buffer the redraw plugin draws into
    pub buffer: Vec<Rgb>,
    /// Current drawing properties
    pub draw: DrawProps,
    /// Which properties are externally controlled
    pub ctrl_bits: u8,

    /// Logical segment this track was created under
    pub seg_index: u8,
    /// Display-buffer offset of the segment
    pub seg_offset: u16,
    /// Segment length in pixels
    pub seg_count: u16,
    /// Excludes the track from external property updates
    pub disable: bool,

    /// Time the next redraw step is due
    pub ms_time_redraw: Instant,
}

impl PluginTrack {
    pub fn new(layer: u8, seg_index: u8, seg_offset: u16, seg_count: u16, go_upwards: bool) -> Self {
        let mut draw = DrawProps {
            pix_start: 0,
            pix_len: seg_count,
            pix_count: 1,
            degree_hue: 0,
            pcent_white: 0,
            pcent_bright: MAX_PERCENTAGE,
            rgb: Rgb::default(),
            msecs_delay: 0,
            go_upwards,
            or_pixel_values: true,
        };
        draw.recompute_color();

        Self {
            layer,
            buffer: Vec::new(),
            draw,
            ctrl_bits: 0,
            seg_index,
            seg_offset,
            seg_count,
            disable: false,
            ms_time_redraw: Instant::from_millis(0),
        }
    }
}
