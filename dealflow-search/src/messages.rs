//! Outreach message composition.
//!
//! [`MessageComposer`] asks the text generator for a short, kind-specific
//! message to an investor. When generation fails a static template is
//! returned instead, so composing never fails.

use dealflow_core::{CompletionRequest, MessageKind, MessageRequest, TextGenerator};
use serde::{Deserialize, Serialize};

const MESSAGE_SYSTEM: &str = "You write short, warm and specific outreach emails from startup \
     founders to investors. Never invent facts about the investor.";
const MESSAGE_MAX_TOKENS: u32 = 400;
const MESSAGE_TEMPERATURE: f32 = 0.7_f32;

/// A composed outreach message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComposedMessage {
    /// Message body.
    pub message: String,
    /// `false` when the static fallback was used.
    pub generated: bool,
}

/// Compose outreach messages with a [`TextGenerator`].
///
/// # Examples
/// ```
/// use dealflow_core::test_support::ScriptedGenerator;
/// use dealflow_core::{Candidate, CandidateId, CandidateKind, MessageKind, MessageRequest};
/// use dealflow_search::MessageComposer;
///
/// let investor = Candidate::new(CandidateId::new("a1")?, CandidateKind::Angel, "Ada");
/// let request = MessageRequest {
///     investor,
///     company_context: "We build payment APIs.".into(),
///     kind: MessageKind::Introduction,
/// };
///
/// let composer = MessageComposer::new(ScriptedGenerator::failing());
/// let composed = composer.compose(&request);
/// assert!(!composed.generated);
/// assert!(composed.message.contains("Ada"));
/// # Ok::<(), dealflow_core::CandidateError>(())
/// ```
#[derive(Debug)]
pub struct MessageComposer<G> {
    generator: G,
}

impl<G> MessageComposer<G>
where
    G: TextGenerator,
{
    /// Create a composer backed by `generator`.
    #[must_use]
    pub const fn new(generator: G) -> Self {
        Self { generator }
    }

    /// Compose a message for `request`.
    #[must_use]
    pub fn compose(&self, request: &MessageRequest) -> ComposedMessage {
        match self.generator.complete(&message_request(request)) {
            Ok(message) if !message.trim().is_empty() => ComposedMessage {
                message: message.trim().to_owned(),
                generated: true,
            },
            Ok(_) => {
                log::warn!("message generation returned blank text, using template");
                fallback_message(request)
            }
            Err(err) => {
                log::warn!("message generation failed, using template: {err}");
                fallback_message(request)
            }
        }
    }
}

/// Build the completion request for an outreach message.
#[must_use]
pub fn message_request(request: &MessageRequest) -> CompletionRequest {
    let investor = &request.investor;
    let goal = match request.kind {
        MessageKind::Introduction => {
            "Write a first-contact introduction asking whether they would be open to learning more."
        }
        MessageKind::FollowUp => {
            "Write a brief follow-up to an earlier message, adding one new piece of progress."
        }
        MessageKind::MeetingRequest => {
            "Write a request for a 30-minute call, proposing two time windows next week."
        }
    };
    let mut profile = format!("Name: {}\nType: {}\n", investor.name, investor.kind);
    let details = [
        ("Focus", investor.categories.as_str()),
        ("Stages", investor.stages.as_str()),
        ("Location", investor.location.as_str()),
        ("About", investor.bio.as_str()),
        ("Portfolio", investor.portfolio.as_deref().unwrap_or_default()),
    ];
    for (label, value) in details {
        if !value.trim().is_empty() {
            profile.push_str(&format!("{label}: {value}\n"));
        }
    }
    let prompt = format!(
        "Investor profile:\n{profile}\nFounder's company:\n{}\n\n{goal} \
         Keep it under 150 words and refer to the investor's focus where relevant.",
        request.company_context.trim()
    );
    CompletionRequest::new(prompt)
        .with_system(MESSAGE_SYSTEM)
        .with_max_tokens(MESSAGE_MAX_TOKENS)
        .with_temperature(MESSAGE_TEMPERATURE)
}

/// Static message used when generation is unavailable.
#[must_use]
pub fn fallback_message(request: &MessageRequest) -> ComposedMessage {
    let name = request.investor.name.trim();
    let greeting = if name.is_empty() {
        "Hello,".to_owned()
    } else {
        format!("Hi {name},")
    };
    let body = match request.kind {
        MessageKind::Introduction => {
            "I'm reaching out because our company looks like a fit for your investment focus. \
             Would you be open to a short conversation?"
        }
        MessageKind::FollowUp => {
            "I wanted to follow up on my earlier note and share that we've kept making progress. \
             Happy to send an update if useful."
        }
        MessageKind::MeetingRequest => {
            "Would you have 30 minutes in the coming week for a call about our company?"
        }
    };
    ComposedMessage {
        message: format!("{greeting}\n\n{body}\n\nBest regards"),
        generated: false,
    }
}
