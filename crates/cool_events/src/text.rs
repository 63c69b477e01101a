//! Chat formatting codes understood by game clients.
//!
//! Codes are the section sign followed by one character. They are inserted
//! inline and rendered by the client; [`TextFormat::clean`] strips them for
//! console output and logs.

/// Color and style codes for chat lines.
pub struct TextFormat;

impl TextFormat {
    pub const ESCAPE: char = '§';

    pub const BLACK: &'static str = "§0";
    pub const DARK_BLUE: &'static str = "§1";
    pub const DARK_GREEN: &'static str = "§2";
    pub const DARK_AQUA: &'static str = "§3";
    pub const DARK_RED: &'static str = "§4";
    pub const DARK_PURPLE: &'static str = "§5";
    pub const GOLD: &'static str = "§6";
    pub const GRAY: &'static str = "§7";
    pub const DARK_GRAY: &'static str = "§8";
    pub const BLUE: &'static str = "§9";
    pub const GREEN: &'static str = "§a";
    pub const AQUA: &'static str = "§b";
    pub const RED: &'static str = "§c";
    pub const LIGHT_PURPLE: &'static str = "§d";
    pub const YELLOW: &'static str = "§e";
    pub const WHITE: &'static str = "§f";

    pub const BOLD: &'static str = "§l";
    pub const ITALIC: &'static str = "§o";
    pub const RESET: &'static str = "§r";

    /// Removes every formatting code from `text`.
    pub fn clean(text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars();
        while let Some(c) = chars.next() {
            if c == Self::ESCAPE {
                // Drop the code character too; a trailing escape just vanishes.
                chars.next();
            } else {
                out.push(c);
            }
        }
        out
    }
}
