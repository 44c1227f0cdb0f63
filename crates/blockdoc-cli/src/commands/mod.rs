pub mod checksums;
pub mod outline;
pub mod render;
