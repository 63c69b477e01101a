use cool_events::TextFormat;

/// The styled line for a chat message mentioning "cool", in any case.
/// Other messages keep the host's default format.
pub fn cool_chat_line(player_name: &str, message: &str) -> Option<String> {
    if !message.to_lowercase().contains("cool") {
        return None;
    }

    Some(format!(
        "{}{}❄ {}{}{}{}: {}{}",
        TextFormat::BOLD,
        TextFormat::BLUE,
        TextFormat::RESET,
        TextFormat::AQUA,
        player_name,
        TextFormat::WHITE,
        TextFormat::LIGHT_PURPLE,
        message
    ))
}
