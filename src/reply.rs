//! Reply policy: decides whether and how to answer one message.

use std::sync::{Arc, LazyLock};

use regex::{Regex, RegexBuilder};
use tracing::{debug, trace};

use crate::catalog::{Catalog, Category};
use crate::error::RenderError;
use crate::footer::Links;
use crate::message::Message;
use crate::picker::IndexPicker;

/// Parent body (lowercased) that arms the Plagueis reply.
pub const PLAGUEIS_TRIGGER: &str = "did you ever hear the tragedy of darth plagueis the wise?";

pub const PLAGUEIS_RESPONSE: &str = "I thought not. It's not a story the Jedi would tell you. \
It's a Sith legend. Darth Plagueis was a Dark Lord of the Sith so powerful and so wise, he could \
use the Force to influence the midi-chlorians to create... life. He had such a knowledge of the \
Dark Side, he could even keep the ones he cared about... from dying.";

static PLAGUEIS_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    RegexBuilder::new(r"^no[.!?]*$")
        .case_insensitive(true)
        .multi_line(true)
        .crlf(true)
        .build()
        .expect("plagueis answer regex is valid")
});

/// Identity and links the responder runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The bot's own account name. Messages from it are never answered.
    pub username: String,
    pub links: Links,
}

/// Answers messages using a shared, read-only catalog.
#[derive(Debug, Clone)]
pub struct Responder {
    catalog: Arc<Catalog>,
    settings: Settings,
}

impl Responder {
    pub const fn new(catalog: Arc<Catalog>, settings: Settings) -> Self {
        Self { catalog, settings }
    }

    /// Compute the reply to `message`, if any.
    ///
    /// `prior_ids` are ids of the bot's own earlier messages; the `replies`
    /// category is only consulted when `message.parent_id` is one of them.
    /// `parent` is the message being answered, when there is one.
    pub fn reply(
        &self,
        message: &Message,
        prior_ids: &[String],
        parent: Option<&Message>,
        picker: &mut dyn IndexPicker,
    ) -> Result<Option<String>, RenderError> {
        if message.author.name == self.settings.username {
            trace!("skipping own message");
            return Ok(None);
        }

        if let Some(parent) = parent {
            debug!(parent_author = %parent.author.name, parent_body = %parent.body, "message has parent");
            if is_plagueis_answer(parent, message) {
                debug!("answering plagueis prompt");
                return self.with_footer(PLAGUEIS_RESPONSE, picker).map(Some);
            }
        }

        let answers_us = message
            .parent_id
            .as_ref()
            .is_some_and(|id| prior_ids.contains(id));

        for category in Category::ALL {
            if category == Category::Replies && !answers_us {
                continue;
            }
            if let Some(found) = self.catalog.rules(category).scan(message, picker) {
                debug!(category = %found.category, rule = found.index, "rule produced a reply");
                return self.with_footer(&found.text, picker).map(Some);
            }
        }

        Ok(None)
    }

    /// [`Responder::reply`] with the thread-local random generator.
    pub fn reply_random(
        &self,
        message: &Message,
        prior_ids: &[String],
        parent: Option<&Message>,
    ) -> Result<Option<String>, RenderError> {
        let mut picker = crate::picker::RngPicker::thread();
        self.reply(message, prior_ids, parent, &mut picker)
    }

    fn with_footer(&self, text: &str, picker: &mut dyn IndexPicker) -> Result<String, RenderError> {
        self.catalog
            .footer()
            .append(text, &self.settings.links, picker)
    }
}

/// True when `parent` asks the Plagueis question and `message` says no.
fn is_plagueis_answer(parent: &Message, message: &Message) -> bool {
    parent.body.to_lowercase() == PLAGUEIS_TRIGGER && PLAGUEIS_ANSWER.is_match(&message.body)
}
