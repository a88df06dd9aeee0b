//! Speech rendering for conversational turns.
//!
//! Produces the SSML body spoken back to the user (without the enclosing
//! `<speak>` element, which the skill envelope adds) and the reprompt.

/// Pause inserted around the suggestion block.
const PAUSE: &str = "<break time=\"0.5s\"/>";

const SUGGESTION_LEAD_IN: &str = "Podrías preguntar: ";

const CLOSING_PROMPT: &str = "¿Qué te gustaría saber?";

const REPROMPT_WITH_SUGGESTIONS: &str = "Puedes hacerme otra pregunta, decir 'siguiente' para escuchar más sugerencias o decir 'para' para terminar la conversación.";

const REPROMPT_PLAIN: &str =
    "Puedes hacerme otra pregunta o decir 'para' para terminar la conversación.";

/// Speech plus optional reprompt. No reprompt means the session ends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpokenResponse {
    pub speech: String,
    pub reprompt: Option<String>,
}

impl SpokenResponse {
    /// Speak `speech` and end the session.
    pub fn say(speech: impl Into<String>) -> Self {
        Self {
            speech: speech.into(),
            reprompt: None,
        }
    }

    /// Speak `speech` and ask it again as the reprompt.
    pub fn ask(speech: impl Into<String>) -> Self {
        let speech = speech.into();
        Self {
            reprompt: Some(speech.clone()),
            speech,
        }
    }

    pub fn with_reprompt(mut self, reprompt: impl Into<String>) -> Self {
        self.reprompt = Some(reprompt.into());
        self
    }
}

/// Render an answer and its suggestions.
pub fn render_turn(answer: &str, suggestions: &[String]) -> SpokenResponse {
    let mut speech = escape_ssml(answer);

    let reprompt = match suggestions {
        [] => REPROMPT_PLAIN,
        _ => {
            speech.push(' ');
            speech.push_str(PAUSE);
            speech.push(' ');
            speech.push_str(SUGGESTION_LEAD_IN);
            speech.push_str(&join_suggestions(suggestions));
            speech.push_str(". ");
            speech.push_str(PAUSE);
            speech.push(' ');
            speech.push_str(CLOSING_PROMPT);
            REPROMPT_WITH_SUGGESTIONS
        }
    };

    SpokenResponse::say(speech).with_reprompt(reprompt)
}

/// `'a', 'b', o 'c'` for several suggestions, `'a'` for one.
fn join_suggestions(suggestions: &[String]) -> String {
    let quoted: Vec<String> = suggestions
        .iter()
        .map(|s| format!("'{}'", escape_ssml(s)))
        .collect();

    match quoted.split_last() {
        None => String::new(),
        Some((last, [])) => last.clone(),
        Some((last, rest)) => format!("{}, o {}", rest.join(", "), last),
    }
}

/// Escape characters that would break SSML. Quotes are left alone since
/// they only matter inside attributes.
pub fn escape_ssml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_two_suggestions() {
        let spoken = render_turn("Respuesta.", &strings(&["Dime más", "Pon un ejemplo"]));
        assert_eq!(
            spoken.speech,
            "Respuesta. <break time=\"0.5s\"/> Podrías preguntar: 'Dime más', o 'Pon un ejemplo'. <break time=\"0.5s\"/> ¿Qué te gustaría saber?"
        );
        assert_eq!(spoken.reprompt.as_deref(), Some(REPROMPT_WITH_SUGGESTIONS));
    }

    #[test]
    fn test_render_single_suggestion() {
        let spoken = render_turn("Hola.", &strings(&["Dime más"]));
        assert!(spoken
            .speech
            .ends_with("Podrías preguntar: 'Dime más'. <break time=\"0.5s\"/> ¿Qué te gustaría saber?"));
        assert!(!spoken.speech.contains(", o "));
    }

    #[test]
    fn test_render_three_suggestions() {
        let spoken = render_turn("R", &strings(&["a", "b", "c"]));
        assert!(spoken.speech.contains("Podrías preguntar: 'a', 'b', o 'c'."));
    }

    #[test]
    fn test_render_without_suggestions() {
        let spoken = render_turn("Error 500: boom", &[]);
        assert_eq!(spoken.speech, "Error 500: boom");
        assert_eq!(spoken.reprompt.as_deref(), Some(REPROMPT_PLAIN));
    }

    #[test]
    fn test_render_escapes_markup() {
        let spoken = render_turn("1 < 2 & 3 > 2", &strings(&["A & B", "<x>"]));
        assert!(spoken.speech.starts_with("1 &lt; 2 &amp; 3 &gt; 2 "));
        assert!(spoken.speech.contains("'A &amp; B', o '&lt;x&gt;'"));
        // the pause markup itself is untouched
        assert!(spoken.speech.contains(PAUSE));
    }

    #[test]
    fn test_escape_keeps_quotes_and_accents() {
        assert_eq!(escape_ssml("'¿Qué?' \"sí\""), "'¿Qué?' \"sí\"");
    }

    #[test]
    fn test_spoken_response_constructors() {
        let said = SpokenResponse::say("Adiós");
        assert!(said.reprompt.is_none());

        let asked = SpokenResponse::ask("¿Algo más?");
        assert_eq!(asked.reprompt.as_deref(), Some("¿Algo más?"));
    }
}
