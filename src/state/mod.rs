//! Client-side state: forms, the voting-power gate and navigation targets

mod forms;
mod gate;
mod navigation;

pub use forms::*;
pub use gate::*;
pub use navigation::*;
