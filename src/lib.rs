//! Single-shot DNS client over UDP.
//!
//! The wire codec lives in [`name`] and [`dns`], the exchange in [`resolver`],
//! and the text rendering in [`ipv6`], [`reverse`] and [`output`].

pub mod cli;
pub mod dns;
pub mod error;
pub mod ipv6;
pub mod name;
pub mod output;
pub mod resolver;
pub mod reverse;
