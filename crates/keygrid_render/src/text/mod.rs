pub mod glyphs;
pub mod layout;
