//! Comet drawing effect
//!
//! Creates comets: a bright head moving through the segment with a tail
//! that fades evenly behind it. The very first trigger decides the mode:
//! a zero force selects one-shot comets, anything else selects repeating
//! ones that loop around the segment. A one-shot comet that falls off the
//! end emits a force toward any layer listening on this one.
//!
//! The comet body length comes from the track's pixel-count property; the
//! head brightness comes from the track color, fading down the tail.

use alloc::vec::Vec;

use crate::color::{scale_color, Rgb};
use crate::draw::DrawProps;
use crate::plugin::{
    EffectPlugin, Host, PLUGIN_TYPE_DIRECTION, PLUGIN_TYPE_REDRAW, PLUGIN_TYPE_SENDFORCE,
    PLUGIN_TYPE_TRIGGER, PLUGIN_TYPE_USEFORCE,
};

const MAX_HEADS: u16 = 12;
const PIXELS_PER_HEAD: u16 = 8;

#[derive(Debug, Clone, Copy)]
struct Comet {
    pos: u16,
    repeat: bool,
}

/// Moving comet heads with fading tails
#[derive(Debug, Clone, Default)]
pub struct CometHeads {
    id: u8,
    pix_len: u16,
    max_heads: usize,
    heads: Vec<Comet>,
    head_count: usize,
    force_val: i16,
    first_time: bool,
    rep_mode: bool,
}

impl EffectPlugin for CometHeads {
    fn plugin_type(&self) -> u8 {
        PLUGIN_TYPE_REDRAW
            | PLUGIN_TYPE_TRIGGER
            | PLUGIN_TYPE_USEFORCE
            | PLUGIN_TYPE_SENDFORCE
            | PLUGIN_TYPE_DIRECTION
    }

    fn begin(&mut self, id: u8, pix_len: u16) {
        self.id = id;
        self.pix_len = pix_len;
        self.max_heads = usize::from((pix_len / PIXELS_PER_HEAD).clamp(1, MAX_HEADS));
        self.heads = Vec::with_capacity(self.max_heads);
        self.head_count = 0;
        self.first_time = true;
    }

    fn trigger(&mut self, _host: &mut Host, _draw: &mut DrawProps, force: i16) {
        let mut doit = true;
        let mut dorepeat = true;

        if self.first_time {
            if force == 0 {
                doit = false;
                self.rep_mode = false;
                dorepeat = false;
            } else {
                self.rep_mode = true;
            }
            self.first_time = false;
        } else if self.rep_mode {
            dorepeat = force >= 0;
        } else if force >= 0 {
            dorepeat = false;
        } else {
            doit = false;
        }

        if doit && self.heads.len() < self.max_heads {
            self.heads.push(Comet {
                pos: 0,
                repeat: dorepeat,
            });
            self.head_count = self.heads.len();
        }
        self.force_val = force;
    }

    fn next_step(&mut self, host: &mut Host, draw: &mut DrawProps) {
        let len = self.pix_len;
        if len == 0 {
            return;
        }
        let body = draw.pix_count.clamp(1, len);

        for comet in self.heads.iter_mut() {
            comet.pos = if comet.repeat {
                (comet.pos + 1) % len
            } else {
                comet.pos.saturating_add(1)
            };
        }
        // a one-shot comet is gone once its whole tail has left the window
        self.heads
            .retain(|comet| comet.repeat || u32::from(comet.pos) < u32::from(len) + u32::from(body));

        for pos in 0..usize::from(len) {
            host.set_pixel(pos, Rgb::default());
        }

        for comet in &self.heads {
            for k in 0..body {
                let fade = (u32::from(body - k) * 255 / u32::from(body)) as u8;
                let color = scale_color(draw.rgb, fade);

                if comet.repeat {
                    let pos = (comet.pos + len - k) % len;
                    host.set_pixel(usize::from(pos), color);
                } else {
                    let Some(pos) = comet.pos.checked_sub(k) else {
                        break;
                    };
                    if pos < len {
                        host.set_pixel(usize::from(pos), color);
                    }
                }
            }
        }

        if self.heads.len() != self.head_count {
            host.send_force(self.id, self.force_val);
            self.head_count = self.heads.len();
        }
    }
}
