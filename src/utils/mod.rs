pub mod debounce;
pub mod fs;
