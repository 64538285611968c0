//! Effect plugins shipped with the crate
//!
//! Drawing effects (ids 0-51) own a track and write pixels on each step;
//! predraw effects (ids 100-160) attach to the current track and steer
//! its drawing properties instead.

mod blinky;
mod comet_heads;
mod count_set;
mod draw_all;
mod draw_push;
mod draw_step;
mod flip_direction;
mod hue_rotate;
mod hue_set;

pub use blinky::Blinky;
pub use comet_heads::CometHeads;
pub use count_set::CountSet;
pub use draw_all::DrawAll;
pub use draw_push::DrawPush;
pub use draw_step::DrawStep;
pub use flip_direction::FlipDirection;
pub use hue_rotate::HueRotate;
pub use hue_set::HueSet;
