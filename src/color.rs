pub mod hsl;
pub mod palette;
pub mod rgb;
