//! Leaf sinks. Each output declares which channel it consumes instead of
//! deriving it from children: the terminal wants styled text, a file wants
//! raw text, a memory output records whatever it was told to accept.

mod file;
mod memory;
mod terminal;

pub use file::FileOutput;
pub use memory::{Captured, MemoryOutput};
pub use terminal::TerminalOutput;
