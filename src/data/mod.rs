//! Synthetic dataset generation.
//!
//! - combined actual + predicted forecast (`forecast`)
//! - per-day results view dataset (`results`)
//! - flat primary series + overlays for the adapter path (`overlay`)

pub mod forecast;
pub mod overlay;
pub mod results;

pub use forecast::*;
pub use overlay::*;
pub use results::*;

use rand::Rng;

/// Uniform jitter in `[0, span)`, tolerating a zero span.
pub(crate) fn jitter(rng: &mut impl Rng, span: f64) -> f64 {
    if span > 0.0 {
        rng.gen_range(0.0..span)
    } else {
        0.0
    }
}
