//! Draw commands produced from the final pixel grid.

use std::fmt;

/// A single `!pixel x,y,key` draw command.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Command {
    pub x: u32,
    pub y: u32,
    pub key: String,
}

impl Command {
    pub fn new(x: u32, y: u32, key: impl Into<String>) -> Self {
        Self {
            x,
            y,
            key: key.into(),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!pixel {},{},{}", self.x, self.y, self.key)
    }
}

/// Join commands into newline-separated text, in emission order.
pub fn format_commands(commands: &[Command]) -> String {
    commands
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join("\n")
}
