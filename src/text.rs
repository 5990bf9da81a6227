pub mod font;
pub mod layout;
pub mod runs;
pub mod style;
