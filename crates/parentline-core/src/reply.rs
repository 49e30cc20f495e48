//! Response formatting.
//!
//! Maps the outcome of a turn onto the wire shape the request arrived in.
//! A failed outcome never surfaces as an error to the caller: each
//! [`RelayError`] variant has a fixed canned string.

use parentline_types::error::RelayError;
use parentline_types::protocol::{WireReply, WireShape};

/// Fixed greeting for the platform's `init` request. No upstream call is made.
pub const INIT_GREETING: &str =
    "Hi, I'm a parent of a child with autism. Thanks for taking the time to talk with me today.";

/// Reply for a request whose shape could not be recognized.
pub const UNRECOGNIZED_APOLOGY: &str =
    "I'm sorry, I didn't quite catch that. Could you say that again?";

/// Reply when the completion API call fails.
pub const UPSTREAM_APOLOGY: &str = "I'm sorry, I'm having trouble organizing my thoughts right now. Could you give me a moment?";

/// Reply substituted when the content filter rejects the model's text.
pub const FILTER_REDIRECT: &str =
    "Let's get back to talking about my family. What else would you like to know?";

/// Canned string for a failed outcome.
pub fn canned_text(err: &RelayError) -> &'static str {
    match err {
        RelayError::Upstream(_) => UPSTREAM_APOLOGY,
        RelayError::FilterRejected => FILTER_REDIRECT,
        RelayError::UnrecognizedRequest(_) => UNRECOGNIZED_APOLOGY,
    }
}

/// Whether `text` is one of the fixed fallback strings.
pub fn is_canned(text: &str) -> bool {
    [UNRECOGNIZED_APOLOGY, UPSTREAM_APOLOGY, FILTER_REDIRECT].contains(&text)
}

/// A reply ready to serialize, plus whether it is a canned fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReply {
    pub reply: WireReply,
    pub fallback: bool,
}

impl FormattedReply {
    pub fn text(&self) -> &str {
        self.reply.text()
    }
}

pub struct ReplyFormatter;

impl ReplyFormatter {
    pub fn format(shape: WireShape, outcome: &Result<String, RelayError>) -> FormattedReply {
        match outcome {
            Ok(text) => FormattedReply {
                reply: WireReply::new(shape, text.as_str()),
                fallback: false,
            },
            Err(err) => FormattedReply {
                reply: WireReply::new(shape, canned_text(err)),
                fallback: true,
            },
        }
    }

    /// The init greeting in the vendor shape.
    pub fn greeting() -> FormattedReply {
        FormattedReply {
            reply: WireReply::new(WireShape::Vendor, INIT_GREETING),
            fallback: false,
        }
    }
}
