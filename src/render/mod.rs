pub mod backend;
pub mod cpu;
pub mod surface;
pub mod svg;
