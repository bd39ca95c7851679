//! Canned assistant used until a real model backend is wired in, plus the
//! chat send flow that drives the store around it.

use std::time::Duration;

use crate::constants::MOCK_RESPONSE_DELAY_MS;
use crate::ids::new_id;
use crate::models::{derive_title, Conversation, Language, Message, Role};
use crate::store::AppStore;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyInput,
}

/// Ids of the records touched by one `send_message` round
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatExchange {
    pub conversation_id: String,
    pub user_message_id: String,
    pub assistant_message_id: String,
    /// True when the round had to start a new conversation
    pub created_conversation: bool,
}

#[derive(Debug, Clone)]
pub struct MockResponder {
    delay: Duration,
}

impl Default for MockResponder {
    fn default() -> Self {
        Self::new(Duration::from_millis(MOCK_RESPONSE_DELAY_MS))
    }
}

impl MockResponder {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    pub fn reply(&self, input: &str, language: Language) -> String {
        match language {
            Language::Mi => {
                // Case-sensitive match here, unlike the English branch
                let tail = if input.contains("code") {
                    "Mō te whakatakoto raina, ka taea e au te āwhina."
                } else {
                    "He aha atu āu hiahia?"
                };
                format!(
                    "Kia ora! I rongo au i tō pātai. He mea nui tēnei, ā ka āwhina au i a koe. {}",
                    tail
                )
            }
            Language::En if input.to_lowercase().contains("code") => CODE_REPLY.to_string(),
            Language::En => INTRO_REPLY.to_string(),
        }
    }
}

const CODE_REPLY: &str = "I can help you with coding! Here's a simple example:\n\n\
```javascript\n\
function greet(name) {\n  return `Hello, ${name}!`;\n}\n\n\
console.log(greet('World'));\n\
```\n\n\
Would you like me to explain this code or help with something specific?";

const INTRO_REPLY: &str = "Hello! I understand your request. This is GEORGIE, a comprehensive AI \
assistant that can help with various tasks including coding, creative work, academic research, \
and conversations in both English and Te Reo Māori. How can I assist you today?";

/// Send `input` in the current conversation and wait for the responder.
///
/// Starts a conversation titled after the input when none is selected. The
/// store's typing flag is raised for the duration of the wait.
pub async fn send_message(
    store: &mut AppStore,
    responder: &MockResponder,
    input: &str,
) -> Result<ChatExchange, ChatError> {
    if input.trim().is_empty() {
        return Err(ChatError::EmptyInput);
    }

    let language = store.state().language;
    let (conversation_id, created_conversation) = match store.current_conversation() {
        Some(conversation) => (conversation.id.clone(), false),
        None => {
            let conversation =
                Conversation::new(new_id("conv"), derive_title(input), language, store.now());
            let id = conversation.id.clone();
            tracing::debug!("chat: starting conversation {}", id);
            store.add_conversation(conversation);
            (id, true)
        }
    };

    let user_message = Message::new(new_id("msg"), Role::User, input, store.now());
    let user_message_id = user_message.id.clone();
    store.add_message(&conversation_id, user_message);

    store.set_typing(true);
    tokio::time::sleep(responder.delay()).await;

    let reply = responder.reply(input, language);
    let assistant_message = Message::new(new_id("msg"), Role::Assistant, reply, store.now());
    let assistant_message_id = assistant_message.id.clone();
    store.add_message(&conversation_id, assistant_message);
    store.set_typing(false);

    Ok(ChatExchange {
        conversation_id,
        user_message_id,
        assistant_message_id,
        created_conversation,
    })
}
