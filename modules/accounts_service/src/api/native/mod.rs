//! Native (in-process) API layer

pub mod client;

pub use client::NativeClient;
