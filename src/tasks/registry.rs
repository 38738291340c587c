use std::collections::HashMap;
use tracing::info;

pub const MESSAGE_PLACEHOLDER: &str = "{message}";
pub const LANGUAGE_PLACEHOLDER: &str = "{language}";

/// Built-in tasks as (identifier, template) pairs
const BUILTIN_TEMPLATES: &[(&str, &str)] = &[
    (
        "summary",
        "Summarize the following text in {language}. Keep the key ideas and drop the filler.\n\nText:\n{message}",
    ),
    (
        "quick-quiz",
        "Create a short quiz of five multiple-choice questions in {language} based on the following material. Mark the correct answer of each question.\n\nMaterial:\n{message}",
    ),
    (
        "flash-card",
        "Turn the following material into study flash cards written in {language}. Format every card as `Q: ...` followed by `A: ...`.\n\nMaterial:\n{message}",
    ),
    (
        "translate",
        "Translate the following text into {language}. Reply with the translation only.\n\nText:\n{message}",
    ),
];

/// A parameterized prompt with `{message}` and `{language}` placeholders
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplate {
    text: String,
}

impl PromptTemplate {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn requires_language(&self) -> bool {
        self.text.contains(LANGUAGE_PLACEHOLDER)
    }

    /// Substitute the user's message and language into the template.
    ///
    /// Templates without a `{message}` placeholder get the message appended
    /// after a blank line.
    pub fn render(&self, message: &str, language: &str) -> String {
        // Language goes first so a message containing a literal `{language}` stays untouched
        let rendered = self.text.replace(LANGUAGE_PLACEHOLDER, language);
        if self.text.contains(MESSAGE_PLACEHOLDER) {
            rendered.replace(MESSAGE_PLACEHOLDER, message)
        } else {
            format!("{}\n\n{}", rendered.trim_end(), message)
        }
    }
}

/// Read-only mapping from task identifier to prompt template.
///
/// Built once at startup; handlers only ever call [`TaskRegistry::lookup`].
#[derive(Debug, Clone)]
pub struct TaskRegistry {
    templates: HashMap<String, PromptTemplate>,
}

impl TaskRegistry {
    pub fn builtin() -> Self {
        let templates = BUILTIN_TEMPLATES
            .iter()
            .map(|(id, text)| (id.to_string(), PromptTemplate::new(*text)))
            .collect();
        Self { templates }
    }

    /// Built-in tasks plus any configured ones; configured entries win on conflict
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut registry = Self::builtin();
        for (id, text) in overrides {
            let id = id.trim();
            if id.is_empty() {
                continue;
            }
            info!("Registering task template: {}", id);
            registry
                .templates
                .insert(id.to_string(), PromptTemplate::new(text.clone()));
        }
        registry
    }

    pub fn lookup(&self, task_id: &str) -> Option<&PromptTemplate> {
        self.templates.get(task_id)
    }

    /// Task identifiers in stable (sorted) order
    pub fn task_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.templates.keys().cloned().collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_tasks_are_registered() {
        let registry = TaskRegistry::builtin();
        for id in ["summary", "quick-quiz", "flash-card", "translate"] {
            assert!(registry.lookup(id).is_some(), "missing task {}", id);
        }
        assert_eq!(registry.task_ids().len(), 4);
        assert!(registry.lookup("poem").is_none());
    }

    #[test]
    fn test_lookup_is_stable() {
        let registry = TaskRegistry::builtin();
        let first = registry.lookup("summary").cloned();
        let second = registry.lookup("summary").cloned();
        assert!(first.is_some());
        assert_eq!(first, second);
    }

    #[test]
    fn test_render_substitutes_both_placeholders() {
        let template = PromptTemplate::new("Lang={language}; Msg={message}; again {message}");
        let rendered = template.render("hello", "fr");
        assert_eq!(rendered, "Lang=fr; Msg=hello; again hello");
    }

    #[test]
    fn test_render_leaves_placeholders_inside_message_alone() {
        let template = PromptTemplate::new("{language}: {message}");
        assert_eq!(template.render("say {language}", "de"), "de: say {language}");
    }

    #[test]
    fn test_render_appends_message_when_template_has_no_placeholder() {
        let template = PromptTemplate::new("Make a quiz.\n");
        assert_eq!(template.render("Photosynthesis", "en"), "Make a quiz.\n\nPhotosynthesis");

        let template = PromptTemplate::new("Answer in {language}.");
        assert_eq!(template.render("Why is the sky blue?", "it"), "Answer in it.\n\nWhy is the sky blue?");
    }

    #[test]
    fn test_requires_language() {
        assert!(PromptTemplate::new("in {language}: {message}").requires_language());
        assert!(!PromptTemplate::new("Explain: {message}").requires_language());
    }

    #[test]
    fn test_overrides_add_and_replace() {
        let mut overrides = HashMap::new();
        overrides.insert("explain".to_string(), "Explain simply: {message}".to_string());
        overrides.insert("summary".to_string(), "TL;DR ({language}): {message}".to_string());
        overrides.insert("  ".to_string(), "ignored".to_string());

        let registry = TaskRegistry::with_overrides(&overrides);
        assert_eq!(registry.task_ids().len(), 5);
        assert_eq!(
            registry.lookup("summary").map(|t| t.as_str()),
            Some("TL;DR ({language}): {message}")
        );
        assert_eq!(
            registry.task_ids(),
            vec!["explain", "flash-card", "quick-quiz", "summary", "translate"]
        );
    }
}
