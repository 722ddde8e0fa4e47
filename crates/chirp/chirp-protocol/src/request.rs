use serde::Deserialize;

use crate::ProtocolError;

/// Command-field-only view of a request line.
#[derive(Debug, Deserialize)]
pub struct CommandProbe {
    pub command: String,
}

impl CommandProbe {
    /// Decodes just the `command` field, ignoring everything else.
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    pub fn is_done(&self) -> bool {
        self.command == "DONE"
    }
}

/// A fully-decoded request line. Field presence is validated per command by
/// [`Request::into_task`], not by the decode itself.
#[derive(Debug, Deserialize)]
pub struct Request {
    pub command: String,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub timestamp: Option<f64>,
}

/// A validated unit of work, ready to run against the feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Task {
    Add { id: i64, body: String, timestamp: f64 },
    Remove { id: i64, timestamp: f64 },
    Contains { id: i64, timestamp: f64 },
    Feed { id: i64 },
    Done,
}

impl Request {
    pub fn decode(line: &str) -> Result<Self, ProtocolError> {
        Ok(serde_json::from_str(line)?)
    }

    /// Validates the request into a [`Task`].
    ///
    /// Returns `Ok(None)` for an unknown command (ignored without a
    /// response) and an error when a known command is missing a field it
    /// requires.
    pub fn into_task(self) -> Result<Option<Task>, ProtocolError> {
        let Request {
            command,
            id,
            body,
            timestamp,
        } = self;

        let require = |field: &'static str| ProtocolError::MissingField(field);

        let task = match command.as_str() {
            "ADD" => Task::Add {
                id: id.ok_or_else(|| require("id"))?,
                body: body.ok_or_else(|| require("body"))?,
                timestamp: timestamp.ok_or_else(|| require("timestamp"))?,
            },
            "REMOVE" => Task::Remove {
                id: id.ok_or_else(|| require("id"))?,
                timestamp: timestamp.ok_or_else(|| require("timestamp"))?,
            },
            "CONTAINS" => Task::Contains {
                id: id.ok_or_else(|| require("id"))?,
                timestamp: timestamp.ok_or_else(|| require("timestamp"))?,
            },
            "FEED" => Task::Feed {
                id: id.ok_or_else(|| require("id"))?,
            },
            "DONE" => Task::Done,
            _ => return Ok(None),
        };
        Ok(Some(task))
    }
}
