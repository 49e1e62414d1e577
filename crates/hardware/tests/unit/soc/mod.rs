/// Memory controllers, sparse buffer, and the memory port.
pub mod memory;
