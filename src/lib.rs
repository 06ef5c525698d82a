pub use quill_core::*;
pub use quill_macros::*;
