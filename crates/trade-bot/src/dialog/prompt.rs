//! Matching replies against the pending prompt

use crate::interface::{Prompt, PromptKind};

const YES: &[&str] = &[
    "yes", "y", "yeah", "yep", "sure", "ok", "okay", "confirm", "si", "sí", "oui", "ja",
];
const NO: &[&str] = &["no", "n", "nope", "nah", "cancel", "non", "nein"];

/// A reply that satisfies its prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reply {
    /// Index into the prompt's choices
    Choice(usize),
    Text(String),
    Confirm(bool),
}

/// Match a reply against a prompt; `None` means re-prompt
pub fn recognize(prompt: &Prompt, reply: Option<&str>) -> Option<Reply> {
    let reply = reply.map(str::trim).filter(|r| !r.is_empty())?;
    match &prompt.kind {
        PromptKind::Choice(choices) => match_choice(choices, reply).map(Reply::Choice),
        PromptKind::Text => Some(Reply::Text(reply.to_string())),
        PromptKind::Confirm => parse_confirmation(reply).map(Reply::Confirm),
    }
}

/// Find the choice a reply names
///
/// Accepts the choice itself in any case, its 1-based position, or a prefix
/// that only one choice starts with.
pub fn match_choice(choices: &[String], reply: &str) -> Option<usize> {
    let reply = reply.trim().trim_end_matches(['.', '!']).to_lowercase();
    if reply.is_empty() {
        return None;
    }

    if let Some(index) = choices.iter().position(|c| c.to_lowercase() == reply) {
        return Some(index);
    }

    if let Ok(position) = reply.parse::<usize>() {
        return (1..=choices.len()).contains(&position).then(|| position - 1);
    }

    let mut candidates = choices
        .iter()
        .enumerate()
        .filter(|(_, c)| c.to_lowercase().starts_with(&reply));
    match (candidates.next(), candidates.next()) {
        (Some((index, _)), None) => Some(index),
        _ => None,
    }
}

/// Read a yes/no answer
pub fn parse_confirmation(reply: &str) -> Option<bool> {
    let word = reply
        .trim()
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    if YES.contains(&word.as_str()) {
        Some(true)
    } else if NO.contains(&word.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// The prompt re-issued after an unmatched reply
pub fn retry(prompt: &Prompt) -> Prompt {
    let hint = match &prompt.kind {
        PromptKind::Choice(choices) => {
            format!("Sorry, I didn't get that. Please choose one of: {}.", choices.join(", "))
        }
        PromptKind::Text => "Sorry, I didn't get that.".to_string(),
        PromptKind::Confirm => "Sorry, I didn't get that. Please answer yes or no.".to_string(),
    };
    Prompt {
        text: format!("{hint}\n{}", prompt.text),
        kind: prompt.kind.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<String> {
        vec!["Portfolio".to_string(), "Trade".to_string(), "Help".to_string()]
    }

    #[test]
    fn test_choice_by_name_index_prefix() {
        let choices = menu();
        assert_eq!(match_choice(&choices, "trade"), Some(1));
        assert_eq!(match_choice(&choices, "HELP"), Some(2));
        assert_eq!(match_choice(&choices, "1"), Some(0));
        assert_eq!(match_choice(&choices, "port"), Some(0));
        assert_eq!(match_choice(&choices, "Trade."), Some(1));
    }

    #[test]
    fn test_choice_rejections() {
        let choices = menu();
        assert_eq!(match_choice(&choices, "4"), None);
        assert_eq!(match_choice(&choices, "0"), None);
        assert_eq!(match_choice(&choices, "sell"), None);
        assert_eq!(match_choice(&choices, ""), None);

        let ambiguous = vec!["Trade".to_string(), "Transfer".to_string()];
        assert_eq!(match_choice(&ambiguous, "tra"), None);
        assert_eq!(match_choice(&ambiguous, "trad"), Some(0));
    }

    #[test]
    fn test_confirmation() {
        assert_eq!(parse_confirmation("Yes!"), Some(true));
        assert_eq!(parse_confirmation(" y "), Some(true));
        assert_eq!(parse_confirmation("nope"), Some(false));
        assert_eq!(parse_confirmation("maybe"), None);
    }

    #[test]
    fn test_recognize_by_kind() {
        let text = Prompt::text("What do you want to buy or sell?");
        assert_eq!(
            recognize(&text, Some(" Buy 2 FB ")),
            Some(Reply::Text("Buy 2 FB".to_string()))
        );
        assert_eq!(recognize(&text, Some("   ")), None);
        assert_eq!(recognize(&text, None), None);

        let confirm = Prompt::confirm("Do you wish to buy?");
        assert_eq!(recognize(&confirm, Some("no")), Some(Reply::Confirm(false)));
        assert_eq!(recognize(&confirm, Some("what")), None);
    }

    #[test]
    fn test_retry_keeps_kind() {
        let prompt = Prompt::confirm("Do you wish to buy?");
        let again = retry(&prompt);
        assert_eq!(again.kind, PromptKind::Confirm);
        assert!(again.text.ends_with("Do you wish to buy?"));
        assert!(again.text.contains("yes or no"));
    }
}
