//! Native input layer
//!
//! Uses `rdev` for global keyboard and mouse hooks and `enigo` for input
//! synthesis. Only built with the `native` feature, since both link against
//! the platform's windowing libraries.

pub mod input;

pub use input::NativeInputSource;
