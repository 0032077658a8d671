pub mod browser;
pub mod distro;
pub mod paths;
