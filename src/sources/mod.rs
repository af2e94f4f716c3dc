pub mod desktop;
pub mod pins;
