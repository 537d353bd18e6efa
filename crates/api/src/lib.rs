//! Access to the MateLog REST backend.
//!
//! Services depend on the gateway traits only. `HttpBackend` talks to the real
//! server; `InMemoryBackend` plays its part in tests and demo mode.

pub mod config;
pub mod gateway;
pub mod http;
pub mod memory;

pub use config::{ApiConfig, ConfigError};
pub use gateway::{ApiError, AuthGateway, Backend, LessonGateway, TrackingGateway};
pub use http::HttpBackend;
pub use memory::{InMemoryBackend, RecordedCall};
