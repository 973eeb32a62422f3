pub mod runtime;

mod error;
mod reporter;

pub use crate::error::RuntimeError;
pub use crate::runtime::LoadRuntime;
