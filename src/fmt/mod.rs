//! Styling vocabulary shared by the printer and the logger.

mod color;
mod style;

pub use color::{Color, Modifier};
pub use style::{Style, StyleMap, roles};
