//! Repeatedly clicks one screen position at a fixed interval, for a fixed
//! number of clicks, until done or until the right mouse button is held.

pub mod app;
pub mod config;
pub mod display;
pub mod headless;
pub mod input;
pub mod screen;
pub mod session;
pub mod timer;

#[cfg(test)]
mod tests;
