//! Chat messages as the reply engine sees them.

use serde::{Deserialize, Serialize};

/// Author of a chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// A chat message as handed over by the platform client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub body: String,
    pub author: Author,
    #[serde(default)]
    pub parent_id: Option<String>,
}

impl Message {
    pub fn new(author: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            author: Author {
                name: author.into(),
            },
            parent_id: None,
        }
    }

    /// Set the id of the message this one replies to.
    pub fn with_parent_id(mut self, id: impl Into<String>) -> Self {
        self.parent_id = Some(id.into());
        self
    }
}
