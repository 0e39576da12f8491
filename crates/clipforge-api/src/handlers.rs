//! Request handlers.

pub mod health;
pub mod process;
pub mod status;
pub mod upload;

pub use health::*;
pub use process::*;
pub use status::*;
pub use upload::*;
