pub mod definitions;
pub mod devices;
pub mod machine;
pub mod opcode;
pub mod resources;
pub mod screen;
pub mod timer;
mod error;

// reexporting for convenience
mod runner;
pub use runner::*;
pub use error::*;
