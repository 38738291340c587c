use crate::gateway::PayloadPart;
use crate::tasks::PromptTemplate;
use super::request::Attachment;

/// Render the prompt as the first part, followed by each attachment in upload order.
///
/// Attachments are passed through untouched: no size limit, no content sniffing.
pub fn compose(
    template: &PromptTemplate,
    message: &str,
    language: &str,
    attachments: Vec<Attachment>,
) -> Vec<PayloadPart> {
    let mut parts = Vec::with_capacity(attachments.len() + 1);
    parts.push(PayloadPart::Text(template.render(message, language)));
    parts.extend(attachments.into_iter().map(|attachment| PayloadPart::Binary {
        mime_type: attachment.mime_type,
        data: attachment.data,
    }));
    parts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskRegistry;
    use std::collections::HashMap;

    #[test]
    fn test_text_part_contains_message_and_language() {
        let registry = TaskRegistry::builtin();
        for task in registry.task_ids() {
            let template = registry.lookup(&task).unwrap();
            let parts = compose(template, "Photosynthesis converts light", "Japanese", Vec::new());
            assert_eq!(parts.len(), 1);
            let text = parts[0].as_text().unwrap();
            assert!(text.contains("Photosynthesis converts light"), "{}", task);
            assert!(text.contains("Japanese"), "{}", task);
            assert!(!text.contains("{message}") && !text.contains("{language}"));
        }
    }

    #[test]
    fn test_configured_template_without_message_placeholder_keeps_message() {
        let mut overrides = HashMap::new();
        overrides.insert("quiz-me".to_string(), "Make a quiz.".to_string());
        let registry = TaskRegistry::with_overrides(&overrides);

        let parts = compose(registry.lookup("quiz-me").unwrap(), "Photosynthesis", "en", Vec::new());
        assert_eq!(parts[0].as_text(), Some("Make a quiz.\n\nPhotosynthesis"));
    }

    #[test]
    fn test_attachments_follow_text_in_order() {
        let template = PromptTemplate::new("{message} ({language})");
        let attachments = vec![
            Attachment {
                file_name: Some("notes.pdf".to_string()),
                mime_type: "application/pdf".to_string(),
                data: vec![1, 2],
            },
            Attachment {
                file_name: None,
                mime_type: "image/jpeg".to_string(),
                data: vec![3],
            },
        ];

        let parts = compose(&template, "hi", "en", attachments);
        assert_eq!(
            parts,
            vec![
                PayloadPart::Text("hi (en)".to_string()),
                PayloadPart::Binary { mime_type: "application/pdf".to_string(), data: vec![1, 2] },
                PayloadPart::Binary { mime_type: "image/jpeg".to_string(), data: vec![3] },
            ]
        );
    }
}
