//! Integer color math for track drawing properties
//!
//! Colors are specified as a hue angle in degrees plus whiteness and
//! brightness percentages, and resolved once into an RGB triple whenever
//! one of the three inputs changes.

use smart_leds::RGB8;

use crate::math8::{blend8, scale8};

pub type Rgb = RGB8;

const DEGREES_PER_SECTOR: u16 = 60;

/// Convert a percentage (0-100) into an 8-bit scale factor (0-255)
#[inline]
pub const fn pcent_to_scale(pcent: u8) -> u8 {
    ((pcent as u16 * 255) / 100) as u8
}

/// Pure hue on a six-sector integer color wheel
///
/// `degree` is taken modulo 360. Degree 0 is red, 120 green, 240 blue.
#[allow(clippy::cast_possible_truncation)]
pub const fn rgb_from_degrees(degree: u16) -> Rgb {
    let degree = degree % 360;
    let sector = degree / DEGREES_PER_SECTOR;
    let ramp = ((degree % DEGREES_PER_SECTOR) as u32 * 255 / DEGREES_PER_SECTOR as u32) as u8;

    match sector {
        0 => Rgb { r: 255, g: ramp, b: 0 },
        1 => Rgb { r: 255 - ramp, g: 255, b: 0 },
        2 => Rgb { r: 0, g: 255, b: ramp },
        3 => Rgb { r: 0, g: 255 - ramp, b: 255 },
        4 => Rgb { r: ramp, g: 0, b: 255 },
        _ => Rgb { r: 255, g: 0, b: 255 - ramp },
    }
}

/// Lift each channel toward white by a percentage
pub const fn whiten(color: Rgb, pcent_white: u8) -> Rgb {
    let amount = pcent_to_scale(pcent_white);
    Rgb {
        r: blend8(color.r, 255, amount),
        g: blend8(color.g, 255, amount),
        b: blend8(color.b, 255, amount),
    }
}

/// Scale each channel by a brightness percentage
pub const fn dim(color: Rgb, pcent_bright: u8) -> Rgb {
    let amount = pcent_to_scale(pcent_bright);
    scale_color(color, amount)
}

/// Scale each channel by an 8-bit factor
pub const fn scale_color(color: Rgb, scale: u8) -> Rgb {
    Rgb {
        r: scale8(color.r, scale),
        g: scale8(color.g, scale),
        b: scale8(color.b, scale),
    }
}

/// Resolve hue/white/bright into the RGB triple plugins draw with
pub const fn make_color(degree_hue: u16, pcent_white: u8, pcent_bright: u8) -> Rgb {
    dim(whiten(rgb_from_degrees(degree_hue), pcent_white), pcent_bright)
}
