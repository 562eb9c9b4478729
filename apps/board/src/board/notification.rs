use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Success,
    Info,
    Error,
}

/// Transient, user-facing message (the board's toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: Level,
    pub title: String,
    pub description: String,
}

impl Notification {
    pub fn stage_updated() -> Self {
        Self {
            level: Level::Success,
            title: "Stage Updated".to_string(),
            description: "Application moved successfully.".to_string(),
        }
    }

    pub fn stage_update_failed() -> Self {
        Self {
            level: Level::Error,
            title: "Error".to_string(),
            description: "Failed to update stage.".to_string(),
        }
    }

    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Info,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            title: title.into(),
            description: description.into(),
        }
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match self.level {
            Level::Success => "✓",
            Level::Info => "·",
            Level::Error => "✗",
        };
        write!(f, "{marker} {}: {}", self.title, self.description)
    }
}
