//! Layered fluid artwork.
//!
//! A stack of fluid simulations, each driven by a few moving strokes and a
//! randomly drawn parameter set. The pure parts (parameter generation,
//! features, strokes, cell timer, debug panel, composition) live here and are
//! independent from the window; `fluid` holds the glium backend.

#[macro_use]
extern crate glium;
extern crate rand;

pub mod cells;
pub mod composition;
pub mod config;
pub mod error;
pub mod features;
pub mod fluid;
pub mod gui;
pub mod palette;
pub mod params;
pub mod random;
pub mod stroke;

pub use error::{Result, StrataError};
