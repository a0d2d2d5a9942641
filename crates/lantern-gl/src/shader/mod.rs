//! Shader programs.
//!
//! A [`ShaderProgram`] is built in one pass: compile the vertex stage, compile
//! the fragment stage, link, validate, then delete the stage objects. Any
//! failure aborts the build with a [`ShaderError`](crate::error::ShaderError);
//! a program with an invalid stage is never linked.
//!
//! Uniform names resolve to locations through a per-program [`UniformCache`].

mod program;
mod uniform;

pub use program::ShaderProgram;
pub use uniform::UniformCache;
