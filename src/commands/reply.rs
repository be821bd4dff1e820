use clap::Args;

use super::GlobalArgs;
use crate::message::Message;

#[derive(Debug, Args)]
pub struct ReplyArgs {
    /// Message text
    #[arg(long)]
    pub body: String,
    /// Author of the message
    #[arg(long)]
    pub author: String,
    /// Id of the message this one answers
    #[arg(long)]
    pub parent_id: Option<String>,
    /// Id of one of the bot's own earlier messages (repeatable)
    #[arg(long = "prior-id")]
    pub prior_ids: Vec<String>,
    /// Body of the parent message
    #[arg(long, requires = "parent_author")]
    pub parent_body: Option<String>,
    /// Author of the parent message
    #[arg(long, requires = "parent_body")]
    pub parent_author: Option<String>,
}

impl ReplyArgs {
    /// Print the reply to one message, or nothing when there is none.
    pub fn execute(&self, global: &GlobalArgs) -> anyhow::Result<()> {
        let responder = global.load()?.responder()?;

        let mut message = Message::new(&self.author, &self.body);
        message.parent_id.clone_from(&self.parent_id);

        let parent = match (&self.parent_author, &self.parent_body) {
            (Some(author), Some(body)) => Some(Message::new(author, body)),
            _ => None,
        };

        match responder.reply_random(&message, &self.prior_ids, parent.as_ref())? {
            Some(text) => println!("{text}"),
            None => tracing::info!("no reply"),
        }
        Ok(())
    }
}
