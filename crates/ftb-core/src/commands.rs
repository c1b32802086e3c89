pub const SET_LANGUAGE: &str = "/setlanguage";
pub const START: &str = "/start";
pub const UPLOAD: &str = "/upload";
pub const CANCEL: &str = "/cancel";
pub const DELETE: &str = "/delete";
pub const LIST: &str = "/list";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    SetLanguage,
    Start,
    Upload,
    Cancel,
    Delete,
    List,
}

impl Command {
    /// Match order matters: the first name that prefixes the head token wins.
    const ALL: [Command; 6] = [
        Command::SetLanguage,
        Command::Start,
        Command::Upload,
        Command::Cancel,
        Command::Delete,
        Command::List,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Command::SetLanguage => SET_LANGUAGE,
            Command::Start => START,
            Command::Upload => UPLOAD,
            Command::Cancel => CANCEL,
            Command::Delete => DELETE,
            Command::List => LIST,
        }
    }

    /// `/start` and `/setlanguage` also work in group chats.
    pub fn allowed_in_groups(self) -> bool {
        matches!(self, Command::SetLanguage | Command::Start)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParsedCommand<'a> {
    pub command: Option<Command>,
    pub argument: Option<&'a str>,
}

/// Split a chat message into its command and argument.
///
/// Telegram may send `/cmd@botname arg ...`, which is why commands are matched
/// by prefix rather than equality.
pub fn parse_command(text: &str) -> ParsedCommand<'_> {
    let text = text.trim();
    let (head, rest) = match text.split_once(char::is_whitespace) {
        Some((head, rest)) => (head, rest.trim()),
        None => (text, ""),
    };

    let command = Command::ALL
        .into_iter()
        .find(|c| head.starts_with(c.name()));
    let argument = if rest.is_empty() { None } else { Some(rest) };

    ParsedCommand { command, argument }
}
