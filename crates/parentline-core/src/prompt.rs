//! Prompt assembly for a conversation turn.
//!
//! Pure function of the persona names, the transcript so far, and the new
//! utterance. The system part carries the fixed character biography and
//! behavioral guidelines with the names interpolated; the user part renders
//! the transcript as alternating labeled lines and ends with a dangling
//! reply cue for the new utterance.
//!
//! The transcript is never truncated. Sessions are bounded only by the
//! interaction limit in the session store.

use parentline_types::session::{PersonaNames, Turn};

/// Label for the human side of the transcript.
pub const VISITOR_LABEL: &str = "Visitor";

const BIOGRAPHY: &str = "You are {parent}, the parent of {child}, an eight-year-old child \
who was diagnosed with autism spectrum disorder at age three. You live with {child} and \
work part-time so you can attend therapy appointments and school meetings. {child} is \
verbal but often speaks in short phrases, loves trains and maps, and finds loud places, \
haircuts, and changes to the daily routine very hard. Mornings are the most stressful \
part of your day. You have learned a lot from occupational therapy and a supportive \
teacher, and you have also had frustrating experiences with people who did not listen. \
You love {child} deeply, you are proud of every small win, and you are sometimes tired \
and worried about the future.";

const GUIDELINES: &str = "Guidelines for every reply:
- Speak only as {parent}, in the first person, as a real parent talking to someone who wants to understand your family.
- Keep replies short and conversational: one to three sentences, suitable for being spoken aloud.
- Share concrete, everyday details about life with {child} when asked; it is fine to admit uncertainty or mixed feelings.
- Never mention being an assistant, a program, or a model, and never apologize for being unable to answer.
- Never give medical or clinical advice; describe your own experience instead.
- If a question is unrelated to your family, gently steer the conversation back to {child} and your daily life.";

/// Assembled prompt for one completion call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

/// Builds the role-play prompt for a session.
pub struct PromptBuilder;

impl PromptBuilder {
    pub fn build(names: &PersonaNames, transcript: &[Turn], utterance: &str) -> Prompt {
        let system = format!(
            "{}\n\n{}",
            interpolate(BIOGRAPHY, names),
            interpolate(GUIDELINES, names)
        );

        let mut user = String::new();
        if !transcript.is_empty() {
            user.push_str("Conversation so far:\n");
            user.push_str(&render_transcript(names, transcript));
            user.push('\n');
        }
        user.push_str(&format!("{VISITOR_LABEL}: {}\n", utterance.trim()));
        user.push_str(&format!("{} reply:", names.parent));

        Prompt { system, user }
    }
}

/// Render the transcript as alternating `Visitor:` / `<parent>:` lines.
pub fn render_transcript(names: &PersonaNames, transcript: &[Turn]) -> String {
    transcript
        .iter()
        .map(|turn| {
            format!(
                "{VISITOR_LABEL}: {}\n{}: {}\n",
                turn.utterance, names.parent, turn.reply
            )
        })
        .collect()
}

fn interpolate(template: &str, names: &PersonaNames) -> String {
    template
        .replace("{parent}", &names.parent)
        .replace("{child}", &names.child)
}
