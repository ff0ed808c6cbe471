//! Writer for Ninja build files.
//!
//! Strings that may reference variables are parsed once into [`NinjaString`]
//! values and rendered against a [`Scope`] when written. [`NinjaWriter`]
//! emits one statement per call, wrapping long `build` and `default` lines
//! with Ninja's ` $` continuation.
pub mod ast;
pub mod error;
pub mod manifest;
pub mod ninja_string;
pub mod scope;
pub mod writer;

pub use ast::{BuildEdge, Statement, TokenGroup};
pub use error::{Error, Result};
pub use manifest::{Manifest, ManifestError};
pub use ninja_string::{Escaper, NinjaString, Segment};
pub use scope::{Scope, VariableScope};
pub use writer::{NinjaWriter, LINE_WIDTH};
