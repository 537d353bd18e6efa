//! Domain types and pure logic for the MateLog client.
//!
//! Nothing in this crate performs I/O. The network lives in `api`, and the
//! orchestration of both lives in `services`.

pub mod flow;
pub mod markup;
pub mod model;
pub mod time;
pub mod unlock;

pub use markup::RichText;
pub use time::Clock;
