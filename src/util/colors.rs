use ratatui::style::Color;

pub const PRIMARY: Color = Color::from_u32(0x00e5a00d);
pub const SECONDARY: Color = Color::from_u32(0x008a6508);
pub const NEUTRAL: Color = Color::from_u32(0x00565656);
pub const BACKGROUND: Color = Color::from_u32(0x00101010);
pub const ERROR: Color = Color::from_u32(0x00d64545);
