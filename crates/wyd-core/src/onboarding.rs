//! Onboarding conversation: the chat that collects a name and a goal
//! before a mission plan is synthesized.

use crate::error::{Result, WydError};
use crate::types::Sender;
use serde::{Deserialize, Serialize};

pub const GREETING: &str =
    "¡Bienvenido/a! Soy Wyz, tu Director de Juego personal. Para empezar, ¿cómo te llamas?";

/// Phrase the assistant uses once it has enough to build a plan.
pub const READY_MARKER: &str = "¿listo para empezar?";

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// A file attached to a user turn, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
}

impl Attachment {
    pub fn is_image(&self) -> bool {
        self.mime_type.starts_with("image/")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChoiceOption {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub sender: Sender,
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<Attachment>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<ChoiceOption>,
}

impl Message {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            file: None,
            options: Vec::new(),
        }
    }

    pub fn ai(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Ai,
            text: text.into(),
            file: None,
            options: Vec::new(),
        }
    }

    pub fn with_file(mut self, file: Attachment) -> Self {
        self.file = Some(file);
        self
    }
}

/// Drop every turn whose sender matches the turn before it, so speakers
/// strictly alternate. The first turn is always kept.
pub fn alternate_turns(messages: &[Message]) -> Vec<&Message> {
    let mut out: Vec<&Message> = Vec::with_capacity(messages.len());
    for (i, msg) in messages.iter().enumerate() {
        if i == 0 || msg.sender != messages[i - 1].sender {
            out.push(msg);
        }
    }
    out
}

/// The goal shortcuts offered after the user gives their name.
pub fn goal_options() -> Vec<ChoiceOption> {
    [
        ("🎓 Mejorar mis Estudios", "mejorar mis estudios"),
        ("💪 Mejorar mi Salud Física", "mejorar mi salud física"),
        ("🧘 Mejorar mi Salud Mental", "mejorar mi salud mental"),
        ("🧹 Ser más Organizado/a", "ser más organizado"),
        ("✨ Personalizado", "personalizado"),
    ]
    .iter()
    .map(|(label, value)| ChoiceOption {
        label: label.to_string(),
        value: value.to_string(),
    })
    .collect()
}

// ---------------------------------------------------------------------------
// Onboarding
// ---------------------------------------------------------------------------

/// State of the onboarding chat.
///
/// Only one reply may be outstanding at a time: [`Onboarding::send`] and
/// [`Onboarding::choose_goal`] mark a reply as pending and reject further
/// input until [`Onboarding::receive`] (or [`Onboarding::abandon_pending`])
/// clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Onboarding {
    messages: Vec<Message>,
    user_name: Option<String>,
    goal: Option<String>,
    ready: bool,
    pending: bool,
}

impl Default for Onboarding {
    fn default() -> Self {
        Self::new()
    }
}

impl Onboarding {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::ai(GREETING)],
            user_name: None,
            goal: None,
            ready: false,
            pending: false,
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn goal(&self) -> Option<&str> {
        self.goal.as_deref()
    }

    /// The assistant has signalled it can design the plan.
    pub fn is_ready(&self) -> bool {
        self.ready
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Goal choices from the latest assistant turn, while no goal is picked.
    pub fn open_options(&self) -> &[ChoiceOption] {
        if self.goal.is_some() {
            return &[];
        }
        match self.messages.last() {
            Some(m) if m.sender == Sender::Ai => m.options.as_slice(),
            _ => &[],
        }
    }

    /// Record a user turn and mark a reply as pending.
    pub fn send(&mut self, text: &str, file: Option<Attachment>) -> Result<&[Message]> {
        if self.pending {
            return Err(WydError::Busy);
        }
        let text = text.trim();
        if text.is_empty() && file.is_none() {
            return Err(WydError::EmptyMessage);
        }
        let mut msg = Message::user(text);
        msg.file = file;
        self.messages.push(msg);
        self.pending = true;
        Ok(&self.messages)
    }

    /// Pick one of the offered goals; its label becomes the user turn.
    pub fn choose_goal(&mut self, option: &ChoiceOption) -> Result<&[Message]> {
        if self.pending {
            return Err(WydError::Busy);
        }
        self.goal = Some(option.value.clone());
        self.messages.push(Message::user(option.label.clone()));
        self.pending = true;
        Ok(&self.messages)
    }

    /// Record the assistant reply to the pending turn.
    pub fn receive(&mut self, text: impl Into<String>) {
        let mut reply = Message::ai(text);

        // The first user answer is the name; the reply to it offers goals.
        if self.user_name.is_none() && self.messages.len() == 2 {
            self.user_name = Some(self.messages[1].text.clone());
            reply.options = goal_options();
        }
        if reply.text.to_lowercase().contains(READY_MARKER) {
            self.ready = true;
        }

        self.messages.push(reply);
        self.pending = false;
    }

    /// Clear the pending flag without a reply.
    pub fn abandon_pending(&mut self) {
        self.pending = false;
    }

    /// Hand over the collected name; onboarding is over.
    pub fn into_user_name(self) -> Option<String> {
        self.user_name
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alternate_turns_collapses_repeats() {
        let turns = vec![Message::user("a"), Message::user("b"), Message::ai("c")];
        let out = alternate_turns(&turns);
        let texts: Vec<&str> = out.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["a", "c"]);
    }

    #[test]
    fn alternate_turns_keeps_first_and_alternation() {
        let turns = vec![
            Message::ai("hi"),
            Message::user("Ana"),
            Message::ai("goal?"),
            Message::ai("again"),
            Message::user("study"),
        ];
        let out = alternate_turns(&turns);
        assert_eq!(out.len(), 4);
        assert_eq!(out[0].text, "hi");
        assert_eq!(out[3].text, "study");
        assert!(alternate_turns(&[]).is_empty());
    }

    #[test]
    fn first_answer_becomes_name_and_offers_goals() {
        let mut ob = Onboarding::new();
        assert_eq!(ob.messages().len(), 1);
        ob.send("Ana", None).unwrap();
        ob.receive("¡Hola Ana! ¿Cuál es tu objetivo principal?");
        assert_eq!(ob.user_name(), Some("Ana"));
        assert_eq!(ob.open_options().len(), 5);

        let opt = ob.open_options()[1].clone();
        ob.choose_goal(&opt).unwrap();
        assert_eq!(ob.goal(), Some("mejorar mi salud física"));
        assert_eq!(ob.messages().last().unwrap().text, opt.label);
        assert!(ob.open_options().is_empty());
    }

    #[test]
    fn pending_reply_blocks_input() {
        let mut ob = Onboarding::new();
        ob.send("Ana", None).unwrap();
        assert!(matches!(ob.send("otra", None), Err(WydError::Busy)));
        ob.abandon_pending();
        assert!(ob.send("otra", None).is_ok());
    }

    #[test]
    fn empty_message_rejected_unless_file() {
        let mut ob = Onboarding::new();
        assert!(matches!(ob.send("   ", None), Err(WydError::EmptyMessage)));
        let file = Attachment {
            mime_type: "image/png".into(),
            data: "AAAA".into(),
            file_name: None,
        };
        assert!(ob.send("", Some(file)).is_ok());
    }

    #[test]
    fn ready_marker_detected_case_insensitively() {
        let mut ob = Onboarding::new();
        ob.send("Ana", None).unwrap();
        ob.receive("Hola Ana");
        assert!(!ob.is_ready());
        ob.send("Quiero correr", None).unwrap();
        ob.receive("Perfecto. He diseñado un plan de misiones inicial para ti. ¿LISTO PARA EMPEZAR?");
        assert!(ob.is_ready());
        assert_eq!(ob.into_user_name().as_deref(), Some("Ana"));
    }
}
