//! Pattern Engine - the main orchestrator
//!
//! Interprets pattern strings into a bounded stack of effect layers
//! grouped into drawing tracks, routes external, inter-layer and timed
//! triggers to them, and on each tick advances the due tracks and
//! composites their buffers into the output display.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use rand_core::RngCore;

#[cfg(feature = "esp32-log")]
use esp_println::println;

use crate::color::{pcent_to_scale, Rgb};
use crate::command::{bool_toggle, has_digit, num_clipped, num_strict, EngineError, Status};
use crate::draw::{DrawProps, PropSnapshot};
use crate::factory::PluginFactory;
use crate::math8::{map_value, rand_range};
use crate::plugin::{ForceQueue, Host, PLUGIN_TYPE_REDRAW};
use crate::queue::{EngineRequest, RequestReceiver};
use crate::stack::{PluginLayer, PluginTrack, TRIG_COUNT_FOREVER};

/// Full hue circle in degrees
pub const MAX_DEGREES_HUE: u16 = 359;
/// Upper bound of every percentage property
pub const MAX_PERCENTAGE: u8 = 100;
/// Largest trigger force magnitude
pub const MAX_FORCE: i16 = 1000;
/// Largest per-track redraw delay in milliseconds
pub const MAX_DELAY_MSECS: u16 = 2000;
/// The delay offset is clamped to this magnitude in milliseconds
pub const DELAY_RANGE: i16 = 100;
/// Largest plugin id the `E` command accepts
pub const MAX_PLUGIN_ID: u16 = 999;

/// External control of the hue property
pub const EXT_CONTROL_HUE: u8 = 1;
/// External control of the whiteness property
pub const EXT_CONTROL_WHITE: u8 = 2;
/// External control of the pixel-count property
pub const EXT_CONTROL_COUNT: u8 = 4;
/// All control bits combined
pub const EXT_CONTROL_ALL: u8 = 7;

/// Largest 16-bit command argument (trigger counts and delays)
pub const MAX_WORD: u32 = 65535;
/// Largest 8-bit command argument (trigger source ids)
pub const MAX_BYTE: u32 = 255;

/// Configuration for the pattern engine
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Default drawing direction for new tracks
    pub go_upwards: bool,
    /// Maximum brightness percentage applied to every drawn pixel
    pub max_brightness: u8,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            go_upwards: true,
            max_brightness: MAX_PERCENTAGE,
        }
    }
}

/// Pattern Engine - stacked layer/track effect compositor
///
/// `NUM_PIXELS` is the strip length; `MAX_LAYERS` and `MAX_TRACKS` bound
/// the effect stacks. The engine never samples a clock or entropy source
/// itself: callers pass `now` into every time-dependent operation, and
/// randomness comes from the injected generator.
pub struct PatternEngine<
    F,
    R,
    const NUM_PIXELS: usize,
    const MAX_LAYERS: usize,
    const MAX_TRACKS: usize,
> {
    // External dependencies
    factory: F,
    rng: R,

    // Effect stacks and composited output
    display: [Rgb; NUM_PIXELS],
    layers: Vec<PluginLayer, MAX_LAYERS>,
    tracks: Vec<PluginTrack, MAX_TRACKS>,
    /// Tracks below this count participate in updates; the rest wait for `G`
    enabled_tracks: usize,

    // Tick state
    prev_update: Option<Instant>,
    pending_forces: ForceQueue,

    // Defaults applied to newly stacked effects
    go_upwards: bool,
    cur_force: i16,
    max_brightness: u8,
    delay_offset: i16,

    // Segment staging for the next `E` command
    seg_offset: u16,
    seg_count: u16,

    // External property control
    extern_prop_mode: bool,
    extern_degree_hue: u16,
    extern_pcent_white: u8,
    extern_pcent_count: u8,
}

impl<F, R, const NUM_PIXELS: usize, const MAX_LAYERS: usize, const MAX_TRACKS: usize>
    PatternEngine<F, R, NUM_PIXELS, MAX_LAYERS, MAX_TRACKS>
where
    F: PluginFactory,
    R: RngCore,
{
    /// Create a new engine with an injected plugin factory and generator
    pub fn new(factory: F, rng: R, config: &EngineConfig) -> Self {
        Self {
            factory,
            rng,
            display: [Rgb::default(); NUM_PIXELS],
            layers: Vec::new(),
            tracks: Vec::new(),
            enabled_tracks: 0,
            prev_update: None,
            pending_forces: ForceQueue::new(),
            go_upwards: config.go_upwards,
            cur_force: MAX_FORCE / 2,
            max_brightness: config.max_brightness.min(MAX_PERCENTAGE),
            delay_offset: 0,
            seg_offset: 0,
            seg_count: NUM_PIXELS as u16,
            extern_prop_mode: false,
            extern_degree_hue: 0,
            extern_pcent_white: 0,
            extern_pcent_count: 0,
        }
    }

    /// Composited output pixels, valid between ticks
    pub fn display(&self) -> &[Rgb] {
        &self.display
    }

    /// Number of stacked effect layers
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Number of stacked drawing tracks
    pub fn track_count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of tracks activated by `G`
    pub fn enabled_track_count(&self) -> usize {
        self.enabled_tracks
    }

    /// Drawing properties of a track, if it exists
    pub fn track_draw(&self, track: usize) -> Option<&DrawProps> {
        self.tracks.get(track).map(|t| &t.draw)
    }

    /// Logical segment of a track: `(seg_index, seg_offset, seg_count)`
    pub fn track_segment(&self, track: usize) -> Option<(u8, u16, u16)> {
        self.tracks
            .get(track)
            .map(|t| (t.seg_index, t.seg_offset, t.seg_count))
    }

    pub fn set_max_brightness(&mut self, percent: u8) {
        self.max_brightness = percent.min(MAX_PERCENTAGE);
    }

    pub fn max_brightness(&self) -> u8 {
        self.max_brightness
    }

    pub fn set_delay_offset(&mut self, msecs: i16) {
        self.delay_offset = msecs.clamp(-DELAY_RANGE, DELAY_RANGE);
    }

    pub fn delay_offset(&self) -> i16 {
        self.delay_offset
    }

    /// Set the externally controlled hue/whiteness values
    ///
    /// Tracks that opted in via the `Q` command pick the values up
    /// immediately while the property mode is enabled.
    pub fn set_color_property(&mut self, hue_degree: u16, white_percent: u8) {
        self.extern_degree_hue = hue_degree.min(MAX_DEGREES_HUE);
        self.extern_pcent_white = white_percent.min(MAX_PERCENTAGE);
        if self.extern_prop_mode {
            self.set_prop_color();
        }
    }

    /// Set the externally controlled pixel-count percentage
    pub fn set_count_property(&mut self, pixcount_percent: u8) {
        self.extern_pcent_count = pixcount_percent.min(MAX_PERCENTAGE);
        if self.extern_prop_mode {
            self.set_prop_count();
        }
    }

    /// Enable or disable external control of opted-in track properties
    pub fn set_property_mode(&mut self, enable: bool) {
        self.extern_prop_mode = enable;
    }

    pub fn property_mode(&self) -> bool {
        self.extern_prop_mode
    }

    pub fn property_hue(&self) -> u16 {
        self.extern_degree_hue
    }

    pub fn property_white(&self) -> u8 {
        self.extern_pcent_white
    }

    pub fn property_count(&self) -> u8 {
        self.extern_pcent_count
    }

    /// Fire every layer that accepts external triggering
    ///
    /// The force also becomes the default for layers stacked afterwards.
    pub fn trigger_force(&mut self, force: i16, now: Instant) {
        self.cur_force = force;

        for i in 0..self.layers.len() {
            if self.layers[i].trig_extern {
                self.trigger_layer(i, force, now);
            }
        }
        self.drain_forces(now);
    }

    /// Fire every layer whose trigger source is `source_layer`
    ///
    /// This is the entry point plugins reach through the host handle.
    pub fn trigger_source_force(&mut self, source_layer: u8, force: i16, now: Instant) {
        let _ = self.pending_forces.push_back((source_layer, force));
        self.drain_forces(now);
    }

    /// Parse and execute a pattern string
    ///
    /// Tokens execute left to right; the first failure stops execution
    /// and is returned, with earlier mutations kept. Empty strings are
    /// accepted.
    pub fn exec_cmd_str(&mut self, cmdstr: &str, now: Instant) -> Status {
        let mut seg_index: i16 = -1;

        for token in cmdstr.split(' ') {
            if token.is_empty() {
                continue;
            }
            self.exec_token(token.as_bytes(), &mut seg_index, now)?;
        }
        Ok(())
    }

    /// Obtain a plugin from the factory and stack it
    ///
    /// A redraw plugin opens a new track from the staged segment; any
    /// other plugin attaches to the current track as a predraw effect.
    /// Failures roll back completely.
    pub fn add_layer(&mut self, plugin_id: u16, seg_index: u8) -> Status {
        if self.layers.is_full() {
            return Err(EngineError::Memory);
        }

        let plugin = self
            .factory
            .make_plugin(plugin_id)
            .ok_or(EngineError::BadVal)?;
        let is_redraw = plugin.plugin_type() & PLUGIN_TYPE_REDRAW != 0;

        if !is_redraw && self.tracks.is_empty() {
            return Err(EngineError::BadCmd);
        }
        if is_redraw && self.tracks.is_full() {
            return Err(EngineError::Memory);
        }

        if is_redraw {
            let track = PluginTrack::new(
                self.layers.len() as u8,
                seg_index,
                self.seg_offset,
                self.seg_count,
                self.go_upwards,
            );
            if self.tracks.push(track).is_err() {
                return Err(EngineError::Memory);
            }
        }

        let track_index = (self.tracks.len() - 1) as u8;
        let layer = PluginLayer::new(plugin, track_index, self.cur_force);
        if self.layers.push(layer).is_err() {
            if is_redraw {
                self.tracks.pop();
            }
            return Err(EngineError::Memory);
        }

        // begin the new plugin; it is not drawn until triggered
        let layer_id = (self.layers.len() - 1) as u8;
        let seg_count = self.seg_count;
        if let Some(layer) = self.layers.last_mut() {
            layer.plugin.begin(layer_id, seg_count);
        }

        // the redraw buffer is allocated last, after any allocation the
        // plugin itself performs in begin()
        if is_redraw {
            match Self::alloc_redraw_buffer(seg_count as usize) {
                Ok(buffer) => {
                    if let Some(track) = self.tracks.last_mut() {
                        track.buffer = buffer;
                    }
                }
                Err(()) => {
                    self.layers.pop();
                    self.tracks.pop();
                    return Err(EngineError::Memory);
                }
            }
        }

        #[cfg(feature = "esp32-log")]
        println!(
            "added plugin #{}: layer={} track={}",
            plugin_id,
            self.layers.len() - 1,
            self.tracks.len() - 1
        );

        Ok(())
    }

    /// Pop every layer and track and black out the display
    ///
    /// Plugins are dropped in reverse order of creation and the segment
    /// staging returns to the full strip.
    pub fn clear_stack(&mut self) {
        #[cfg(feature = "esp32-log")]
        println!(
            "clear stack: layers={} tracks={}",
            self.layers.len(),
            self.tracks.len()
        );

        while self.layers.pop().is_some() {}
        while self.tracks.pop().is_some() {}
        self.enabled_tracks = 0;
        self.pending_forces.clear();

        self.seg_offset = 0;
        self.seg_count = NUM_PIXELS as u16;

        self.display.fill(Rgb::default());
    }

    /// Advance the animation by one tick
    ///
    /// Fires due auto-triggers, steps every enabled track whose redraw
    /// deadline elapsed (predraw effects first), and recomposites the
    /// display. Returns true when the display changed and should be
    /// pushed to the output driver.
    pub fn update_effects(&mut self, now: Instant) -> bool {
        // redisplay unconditionally on the first tick after a clear
        let mut doshow = self.prev_update.is_none();
        let rollover = self.prev_update.is_some_and(|prev| now < prev);
        self.prev_update = Some(now);

        self.check_auto_trigger(now, rollover);

        for t in 0..self.tracks.len().min(self.enabled_tracks) {
            if rollover {
                self.tracks[t].ms_time_redraw = now;
            }

            let redraw_layer = usize::from(self.tracks[t].layer);
            if !self.layers[redraw_layer].trig_active {
                continue;
            }
            if self.tracks[t].ms_time_redraw > now {
                continue;
            }

            let snapshot = self.snapshot_props(t);
            let bright_scale = pcent_to_scale(self.max_brightness);

            // predraw effects mutate properties only; no sink is attached
            for l in 0..self.layers.len() {
                {
                    let layer = &self.layers[l];
                    if usize::from(layer.track) != t || !layer.trig_active || layer.is_redraw() {
                        continue;
                    }
                }
                let mut host = Host::new(
                    None,
                    now,
                    bright_scale,
                    &mut self.rng,
                    &mut self.pending_forces,
                );
                self.layers[l]
                    .plugin
                    .next_step(&mut host, &mut self.tracks[t].draw);
            }

            if let Some(snap) = snapshot {
                Self::restore_props(&mut self.tracks[t], snap);
            }

            // now the track's own drawing effect runs into its buffer
            {
                let PluginTrack { buffer, draw, .. } = &mut self.tracks[t];
                let mut host = Host::new(
                    Some(buffer.as_mut_slice()),
                    now,
                    bright_scale,
                    &mut self.rng,
                    &mut self.pending_forces,
                );
                self.layers[redraw_layer].plugin.next_step(&mut host, draw);
            }
            self.drain_forces(now);

            let add = i32::from(self.tracks[t].draw.msecs_delay) + i32::from(self.delay_offset);
            let add = if add <= 0 { 1 } else { add };
            self.tracks[t].ms_time_redraw = now + Duration::from_millis(add as u64);

            doshow = true;
        }

        if doshow {
            self.composite();
        }
        doshow
    }

    /// Drain queued host requests into the engine
    ///
    /// All pending requests are consumed; the first non-success status is
    /// remembered and returned.
    pub fn apply_requests<const N: usize>(
        &mut self,
        requests: &RequestReceiver<'_, N>,
        now: Instant,
    ) -> Status {
        let mut status: Status = Ok(());

        while let Ok(request) = requests.try_receive() {
            let result = match request {
                EngineRequest::Pattern(pattern) => self.exec_cmd_str(&pattern, now),
                EngineRequest::TriggerForce(force) => {
                    self.trigger_force(force, now);
                    Ok(())
                }
                EngineRequest::ColorProperty {
                    degree_hue,
                    pcent_white,
                } => {
                    self.set_color_property(degree_hue, pcent_white);
                    Ok(())
                }
                EngineRequest::CountProperty(pcent) => {
                    self.set_count_property(pcent);
                    Ok(())
                }
                EngineRequest::Brightness(pcent) => {
                    self.set_max_brightness(pcent);
                    Ok(())
                }
            };
            if status.is_ok() {
                status = result;
            }
        }
        status
    }

    /// Execute a single pattern token
    fn exec_token(&mut self, token: &[u8], seg_index: &mut i16, now: Instant) -> Status {
        let letter = token[0].to_ascii_uppercase();
        let arg = &token[1..];

        match letter {
            // segment staging: offset of the next track
            b'X' => {
                self.seg_offset = num_strict(arg, NUM_PIXELS as u32 - 1).unwrap_or(0) as u16;
                Ok(())
            }
            // segment staging: pixel count of the next track
            b'Y' => {
                match num_strict(arg, NUM_PIXELS as u32 - u32::from(self.seg_offset)) {
                    Some(count) if count > 0 => {
                        self.seg_count = count as u16;
                        *seg_index += 1;
                    }
                    _ => self.seg_count = NUM_PIXELS as u16,
                }
                Ok(())
            }
            // stack a plugin effect
            b'E' => match num_strict(arg, u32::from(MAX_PLUGIN_ID)) {
                Some(plugin) => {
                    let segment = if *seg_index < 0 { 0 } else { *seg_index as u8 };
                    self.add_layer(plugin as u16, segment)
                }
                None => Err(EngineError::BadVal),
            },
            // pop everything and force a redisplay
            b'P' => {
                self.clear_stack();
                self.prev_update = None;
                Ok(())
            }
            // everything below operates on the current track or layer
            _ if self.tracks.is_empty() => Err(EngineError::BadCmd),
            b'J' => {
                let pcent = num_clipped(arg, 0, u32::from(MAX_PERCENTAGE));
                self.top_draw().pix_start = (pcent * (NUM_PIXELS as u32 - 1) / 100) as u16;
                Ok(())
            }
            b'K' => {
                let pcent = num_clipped(arg, 0, u32::from(MAX_PERCENTAGE));
                self.top_draw().pix_len = (pcent * (NUM_PIXELS as u32 - 1) / 100 + 1) as u16;
                Ok(())
            }
            b'U' => {
                let draw = self.top_draw();
                draw.go_upwards = bool_toggle(arg, draw.go_upwards);
                Ok(())
            }
            b'V' => {
                let draw = self.top_draw();
                draw.or_pixel_values = !bool_toggle(arg, !draw.or_pixel_values);
                Ok(())
            }
            b'H' => {
                let draw = self.top_draw();
                draw.degree_hue = num_clipped(
                    arg,
                    u32::from(draw.degree_hue),
                    u32::from(MAX_DEGREES_HUE),
                ) as u16;
                draw.recompute_color();
                Ok(())
            }
            b'W' => {
                let draw = self.top_draw();
                draw.pcent_white = num_clipped(
                    arg,
                    u32::from(draw.pcent_white),
                    u32::from(MAX_PERCENTAGE),
                ) as u8;
                draw.recompute_color();
                Ok(())
            }
            b'B' => {
                let draw = self.top_draw();
                draw.pcent_bright = num_clipped(
                    arg,
                    u32::from(draw.pcent_bright),
                    u32::from(MAX_PERCENTAGE),
                ) as u8;
                draw.recompute_color();
                Ok(())
            }
            b'C' => {
                let seg_count = u32::from(self.seg_count);
                let draw = self.top_draw();
                let current = u32::from(draw.pix_count) * 100 / seg_count;
                let pcent = num_clipped(arg, current, u32::from(MAX_PERCENTAGE));
                draw.pix_count = map_value(pcent, 0, 100, 1, seg_count) as u16;
                Ok(())
            }
            b'D' => {
                let draw = self.top_draw();
                draw.msecs_delay = num_clipped(
                    arg,
                    u32::from(draw.msecs_delay),
                    u32::from(MAX_DELAY_MSECS),
                ) as u16;
                Ok(())
            }
            b'Q' => {
                if let Some(bits) = num_strict(arg, u32::from(EXT_CONTROL_ALL)) {
                    self.set_track_control_bits(bits as u8);
                }
                Ok(())
            }
            b'I' => {
                let enable = if has_digit(arg) {
                    bool_toggle(arg, false)
                } else {
                    true
                };
                self.top_layer().trig_extern = enable;
                Ok(())
            }
            b'A' => {
                self.top_layer().trig_source = num_clipped(arg, 0, MAX_BYTE) as u8;
                Ok(())
            }
            b'F' => {
                self.top_layer().trig_force = if has_digit(arg) {
                    num_clipped(arg, 0, MAX_FORCE as u32) as i16
                } else {
                    -1 // fresh random force on every fire
                };
                Ok(())
            }
            b'N' => {
                let count = num_clipped(arg, 0, MAX_WORD);
                self.top_layer().trig_count = if count == 0 {
                    TRIG_COUNT_FOREVER
                } else {
                    count as i32
                };
                Ok(())
            }
            b'O' => {
                let min = num_clipped(arg, 1, MAX_WORD);
                self.top_layer().trig_delay_min = min.max(1) as u16;
                Ok(())
            }
            b'T' => {
                let last = self.layers.len() - 1;
                let force = self.resolve_force(self.layers[last].trig_force);

                if has_digit(arg) {
                    let range = num_clipped(arg, 0, MAX_WORD) as u16;
                    self.layers[last].trig_delay_range = range;

                    let min = u32::from(self.layers[last].trig_delay_min);
                    let secs = rand_range(&mut self.rng, min, min + u32::from(range) + 1);
                    self.layers[last].trig_time = Some(now + Duration::from_secs(u64::from(secs)));
                }

                // always fire once immediately
                self.trigger_layer(last, force, now);
                self.drain_forces(now);
                Ok(())
            }
            b'G' => {
                if self.enabled_tracks != self.tracks.len() {
                    self.enabled_tracks = self.tracks.len();
                }
                Ok(())
            }
            _ => Err(EngineError::BadCmd),
        }
    }

    /// Fire one layer with the given force
    fn trigger_layer(&mut self, layer: usize, force: i16, now: Instant) {
        let track_index = usize::from(self.layers[layer].track);
        let is_redraw = self.layers[layer].is_redraw();

        let snapshot = self.snapshot_props(track_index);
        let bright_scale = pcent_to_scale(self.max_brightness);

        {
            // a predraw layer gets no sink, so its trigger cannot draw
            let PluginTrack { buffer, draw, .. } = &mut self.tracks[track_index];
            let sink = if is_redraw {
                Some(buffer.as_mut_slice())
            } else {
                None
            };
            let mut host = Host::new(
                sink,
                now,
                bright_scale,
                &mut self.rng,
                &mut self.pending_forces,
            );
            self.layers[layer].plugin.trigger(&mut host, draw, force);
        }

        if let Some(snap) = snapshot {
            Self::restore_props(&mut self.tracks[track_index], snap);
        }

        // a triggered drawing effect redraws on the current tick
        if is_redraw {
            self.tracks[track_index].ms_time_redraw = now;
        }

        self.layers[layer].trig_active = true;
    }

    /// Fire due auto-triggers and re-arm them
    fn check_auto_trigger(&mut self, now: Instant, rollover: bool) {
        for i in 0..self.layers.len() {
            if usize::from(self.layers[i].track) >= self.enabled_tracks {
                break; // not activated yet
            }

            // a wrapped clock rebases every armed deadline
            if rollover && self.layers[i].trig_time.is_some() {
                self.layers[i].trig_time = Some(now);
            }

            let due = {
                let layer = &self.layers[i];
                layer.trig_active
                    && layer.trig_count != 0
                    && layer.trig_time.is_some_and(|t| t <= now)
            };
            if !due {
                continue;
            }

            let force = self.resolve_force(self.layers[i].trig_force);
            self.trigger_layer(i, force, now);

            let min = u32::from(self.layers[i].trig_delay_min);
            let range = u32::from(self.layers[i].trig_delay_range);
            let secs = rand_range(&mut self.rng, min, min + range + 1);
            self.layers[i].trig_time = Some(now + Duration::from_secs(u64::from(secs)));

            if self.layers[i].trig_count > 0 {
                self.layers[i].trig_count -= 1;
            }
        }
        self.drain_forces(now);
    }

    /// Route forces emitted by plugins to the layers they trigger
    fn drain_forces(&mut self, now: Instant) {
        while let Some((source, force)) = self.pending_forces.pop_front() {
            for i in 0..self.layers.len() {
                if self.layers[i].trig_source == source {
                    self.trigger_layer(i, force, now);
                }
            }
        }
    }

    /// Merge every enabled track's buffer into the display
    fn composite(&mut self) {
        let display = &mut self.display;
        display.fill(Rgb::default());

        let pix_last = NUM_PIXELS - 1;

        for track in self.tracks.iter().take(self.enabled_tracks) {
            let draw = &track.draw;
            let buffer = track.buffer.as_slice();
            if buffer.is_empty() || draw.pix_len == 0 {
                continue;
            }

            // window endpoints wrap once around the strip
            let mut start = usize::from(track.seg_offset) + usize::from(draw.pix_start);
            if start > pix_last {
                start -= pix_last + 1;
            }
            let mut end = start + usize::from(draw.pix_len) - 1;
            if end > pix_last {
                end -= pix_last + 1;
            }

            let mut pix = if draw.go_upwards { start } else { end };
            let mut src = usize::from(draw.pix_start) % buffer.len();

            loop {
                let value = buffer[src];
                let out = &mut display[pix];

                if draw.or_pixel_values {
                    out.r |= value.r;
                    out.g |= value.g;
                    out.b |= value.b;
                } else if value != Rgb::default() {
                    // non-black pixels overwrite, black stays transparent
                    *out = value;
                }

                if draw.go_upwards {
                    if pix == end {
                        break;
                    }
                    if pix >= pix_last {
                        pix = 0;
                    } else {
                        pix += 1;
                    }
                } else {
                    if pix == start {
                        break;
                    }
                    if pix == 0 {
                        pix = pix_last;
                    } else {
                        pix -= 1;
                    }
                }

                // the source always advances upward through the buffer
                src = if src + 1 >= buffer.len() { 0 } else { src + 1 };
            }
        }
    }

    /// Apply the external color values to opted-in tracks
    fn set_prop_color(&mut self) {
        for track in self.tracks.iter_mut() {
            if track.disable {
                continue;
            }
            let mut changed = false;
            if track.ctrl_bits & EXT_CONTROL_HUE != 0 {
                track.draw.degree_hue = self.extern_degree_hue;
                changed = true;
            }
            if track.ctrl_bits & EXT_CONTROL_WHITE != 0 {
                track.draw.pcent_white = self.extern_pcent_white;
                changed = true;
            }
            if changed {
                track.draw.recompute_color();
            }
        }
    }

    /// Apply the external pixel count to opted-in tracks
    fn set_prop_count(&mut self) {
        for track in self.tracks.iter_mut() {
            if track.disable {
                continue;
            }
            if track.ctrl_bits & EXT_CONTROL_COUNT != 0 {
                track.draw.pix_count = map_value(
                    u32::from(self.extern_pcent_count),
                    0,
                    100,
                    1,
                    u32::from(track.seg_count),
                ) as u16;
            }
        }
    }

    /// Set the control bits on the current track (the `Q` command)
    fn set_track_control_bits(&mut self, bits: u8) {
        let extern_mode = self.extern_prop_mode;
        let (hue, white, count_pct) = (
            self.extern_degree_hue,
            self.extern_pcent_white,
            self.extern_pcent_count,
        );

        let last = self.tracks.len() - 1;
        let track = &mut self.tracks[last];
        track.ctrl_bits = bits;

        if extern_mode {
            if bits & EXT_CONTROL_HUE != 0 {
                track.draw.degree_hue = hue;
            }
            if bits & EXT_CONTROL_WHITE != 0 {
                track.draw.pcent_white = white;
            }
            if bits & EXT_CONTROL_COUNT != 0 {
                track.draw.pix_count = map_value(
                    u32::from(count_pct),
                    0,
                    100,
                    1,
                    u32::from(track.seg_count),
                ) as u16;
            }
            track.draw.recompute_color();
        }
    }

    /// Snapshot a track's externally controllable properties
    fn snapshot_props(&self, track: usize) -> Option<PropSnapshot> {
        if self.extern_prop_mode {
            Some(self.tracks[track].draw.snapshot())
        } else {
            None
        }
    }

    /// Put back snapshotted values on the bits the track ceded to
    /// external control
    fn restore_props(track: &mut PluginTrack, snap: PropSnapshot) {
        if track.disable {
            return;
        }

        if track.ctrl_bits & EXT_CONTROL_COUNT != 0 {
            track.draw.pix_count = snap.pix_count;
        }

        let mut changed = false;
        if track.ctrl_bits & EXT_CONTROL_HUE != 0 && track.draw.degree_hue != snap.degree_hue {
            track.draw.degree_hue = snap.degree_hue;
            changed = true;
        }
        if track.ctrl_bits & EXT_CONTROL_WHITE != 0 && track.draw.pcent_white != snap.pcent_white {
            track.draw.pcent_white = snap.pcent_white;
            changed = true;
        }
        if changed {
            track.draw.recompute_color();
        }
    }

    /// Replace a random-force sentinel with a fresh value
    fn resolve_force(&mut self, force: i16) -> i16 {
        if force >= 0 {
            force
        } else {
            rand_range(&mut self.rng, 0, MAX_FORCE as u32 + 1) as i16
        }
    }

    fn top_draw(&mut self) -> &mut DrawProps {
        let last = self.tracks.len() - 1;
        &mut self.tracks[last].draw
    }

    fn top_layer(&mut self) -> &mut PluginLayer {
        let last = self.layers.len() - 1;
        &mut self.layers[last]
    }

    /// Allocate a zeroed track buffer, reporting failure instead of
    /// aborting
    fn alloc_redraw_buffer(len: usize) -> Result<alloc::vec::Vec<Rgb>, ()> {
        let mut buffer = alloc::vec::Vec::new();
        buffer.try_reserve_exact(len).map_err(|_| ())?;
        buffer.resize(len, Rgb::default());
        Ok(buffer)
    }
}
