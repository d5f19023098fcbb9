//! Bot copy for the lead-capture flow

use crate::validation::ContactError;

/// Opening message of every session
pub const SEED_GREETING: &str = "Hi there! I'm the virtual assistant for our IT support team. \
     Before we get started, what's your name?";

/// Reply to anything typed into the open chat once the lead is captured
pub const FREEFORM_REPLY: &str = "Thanks for your message! A member of our support team will \
     follow up shortly. In the meantime, pick one of the topics below for an instant answer.";

/// Greeting that follows a committed name and asks for contact details
#[must_use]
pub fn name_greeting(name: &str) -> String {
    format!(
        "Nice to meet you, {name}! What's the best email address or Australian phone number \
         to reach you on?"
    )
}

/// Shown when the contact field holds neither an email nor a phone number
#[must_use]
pub fn invalid_contact(error: &ContactError) -> String {
    format!("Sorry, that doesn't look right. Please {error}.")
}

/// Acknowledges a captured lead and unlocks the topic menu
#[must_use]
pub fn contact_acknowledgment(name: Option<&str>) -> String {
    let name = name.unwrap_or("there");
    format!(
        "Thanks, {name}! One of our team will be in touch soon. Meanwhile, choose a topic \
         below or ask me anything."
    )
}
