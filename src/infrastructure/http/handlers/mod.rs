//! HTTP Handlers

mod chapter;
mod character;
mod generation;
mod novel;
mod ping;
mod setting;

pub use chapter::*;
pub use character::*;
pub use generation::*;
pub use novel::*;
pub use ping::*;
pub use setting::*;
