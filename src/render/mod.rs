pub mod backend;
pub mod colormap;
pub mod cpu;
pub mod layout;
pub mod title;
