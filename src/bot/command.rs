/// Slash commands understood by the bot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Show,
    Unknown(String),
}

impl Command {
    /// Parse the first word of a message.
    ///
    /// Group chats may address a bot as `/start@name`; the suffix is accepted
    /// when it matches `bot_name` (or when no name is configured) and the
    /// command counts as unknown otherwise. Returns `None` for plain text.
    pub fn parse(text: &str, bot_name: Option<&str>) -> Option<Command> {
        let word = text.split_whitespace().next()?.strip_prefix('/')?;
        let (name, target) = match word.split_once('@') {
            Some((name, target)) => (name, Some(target)),
            None => (word, None),
        };

        if let (Some(target), Some(bot_name)) = (target, bot_name) {
            if !target.eq_ignore_ascii_case(bot_name) {
                return Some(Command::Unknown(word.to_string()));
            }
        }

        Some(match name.to_ascii_lowercase().as_str() {
            "start" => Command::Start,
            "show" => Command::Show,
            _ => Command::Unknown(word.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_commands() {
        assert_eq!(Command::parse("/start", None), Some(Command::Start));
        assert_eq!(Command::parse("/show now", None), Some(Command::Show));
        assert_eq!(
            Command::parse("/help", None),
            Some(Command::Unknown("help".into()))
        );
        assert_eq!(Command::parse("hello", None), None);
        assert_eq!(Command::parse("", None), None);
    }

    #[test]
    fn test_parse_addressed_commands() {
        assert_eq!(
            Command::parse("/start@FourBot", Some("fourbot")),
            Some(Command::Start)
        );
        assert_eq!(
            Command::parse("/start@OtherBot", Some("fourbot")),
            Some(Command::Unknown("start@OtherBot".into()))
        );
        assert_eq!(Command::parse("/show@anything", None), Some(Command::Show));
    }
}
