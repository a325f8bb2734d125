/// Hidden marker identifying the bot's own comment so reruns edit it in
/// place.
pub const COMMENT_MARKER: &str = "<!-- eip-bot -->";

pub fn render_comment(messages: &[String], mentions: Option<&str>) -> String {
    let mut body = String::from(COMMENT_MARKER);
    body.push_str(
        "\nHi! I'm a bot, and I wanted to automerge your PR, but couldn't because of the following issue(s):\n\n",
    );
    for message in messages {
        body.push_str("\t- ");
        body.push_str(message);
        body.push('\n');
    }
    if let Some(mentions) = mentions.filter(|m| !m.trim().is_empty()) {
        body.push_str("\ncc ");
        body.push_str(mentions);
        body.push('\n');
    }
    body
}

pub fn is_bot_comment(body: &str) -> bool {
    body.starts_with(COMMENT_MARKER)
}
