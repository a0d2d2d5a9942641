//! Stage splitter for combined shader source files.
//!
//! A combined file holds both stages of a program. Each stage block starts
//! with a directive line and runs until the next directive or end of file:
//!
//! ```text
//! #shader vertex
//! #version 330 core
//! ...
//! #shader fragment
//! #version 330 core
//! ...
//! ```
//!
//! Lines before the first directive are discarded. There is no include
//! mechanism and no escaping; this is a line scanner, not a preprocessor.
//!
//! This crate is intentionally dependency-free so tooling can split sources
//! without linking a GL loader.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`error`] | `ParseError` |
//! | [`stage`] | `Stage`, `DIRECTIVE` |
//! | [`split`] | `ShaderSource`, `parse_str` |
//!
//! # Quick start
//!
//! ```rust
//! use lantern_glsl::parse_str;
//!
//! let src = "#shader vertex\nvoid main() {}\n#shader fragment\nvoid main() {}\n";
//! let source = parse_str(src).unwrap();
//! assert_eq!(source.vertex, "void main() {}\n");
//! assert_eq!(source.fragment, "void main() {}\n");
//! ```

pub mod error;
pub mod split;
pub mod stage;

pub use error::ParseError;
pub use split::{parse_str, ShaderSource};
pub use stage::Stage;
