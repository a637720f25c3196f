//! Operator library: pure `(Image, params) -> Image` transforms.
//!
//! No I/O and no side effects here; the noise simulators take the
//! caller's RNG so runs stay reproducible under a fixed seed.

pub mod arith;
pub mod enhance;
pub mod filter;
pub mod noise;
pub mod point;
pub mod simulate;
