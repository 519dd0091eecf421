pub mod detection;
pub mod gate;
pub mod picker;
