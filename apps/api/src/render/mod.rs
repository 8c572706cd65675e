// Rendering: user content → LaTeX source.
// Nothing in here touches the filesystem or the compiler.

pub mod assembler;
pub mod sanitize;
pub mod sections;

pub use assembler::assemble;
