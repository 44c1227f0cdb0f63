pub mod block;
pub mod style;

pub use block::{Block, BlockInput};
pub use style::Style;
