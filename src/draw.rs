//! Per-track drawing properties
//!
//! Every track owns one mutable `DrawProps` record. Predraw plugins and
//! pattern commands mutate it; the track's redraw plugin reads it on each
//! step, and the compositor reads the window/direction/blend fields when
//! merging the track into the display.

use crate::color::{make_color, Rgb};

/// Mutable drawing state for one track
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DrawProps {
    /// First pixel of the drawing window, relative to the segment
    pub pix_start: u16,
    /// Length of the drawing window in pixels
    pub pix_len: u16,
    /// How many pixels the current pattern lights (1..=segment length)
    pub pix_count: u16,

    /// Color hue angle in degrees (0..=359)
    pub degree_hue: u16,
    /// Whiteness percentage (0..=100)
    pub pcent_white: u8,
    /// Brightness percentage (0..=100)
    pub pcent_bright: u8,
    /// RGB triple derived from the three color fields
    pub rgb: Rgb,

    /// Delay between redraw steps in milliseconds
    pub msecs_delay: u16,
    /// Draw from segment start toward the end
    pub go_upwards: bool,
    /// OR pixels into the display instead of overwriting
    pub or_pixel_values: bool,
}

/// Snapshot of the externally controllable properties
///
/// Taken around plugin calls while the external property mode is active,
/// so predraw effects cannot clobber externally driven values.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PropSnapshot {
    pub pix_count: u16,
    pub degree_hue: u16,
    pub pcent_white: u8,
}

impl DrawProps {
    /// Recompute the derived RGB triple from hue/white/bright
    pub fn recompute_color(&mut self) {
        self.rgb = make_color(self.degree_hue, self.pcent_white, self.pcent_bright);
    }

    pub(crate) fn snapshot(&self) -> PropSnapshot {
        PropSnapshot {
            pix_count: self.pix_count,
            degree_hue: self.degree_hue,
            pcent_white: self.pcent_white,
        }
    }
}
