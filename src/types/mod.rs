//! Core types for scanlogin.

pub mod credentials;
pub mod image;
pub mod poll;
pub mod session;
pub mod target;

pub use credentials::*;
pub use image::*;
pub use poll::*;
pub use session::*;
pub use target::*;
