pub mod posting;
pub mod skill;

pub use posting::*;
pub use skill::*;
