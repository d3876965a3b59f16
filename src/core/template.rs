use crate::domain::model::{NoticeContext, Replacement};
use regex::Regex;
use std::sync::LazyLock;

pub const FLAT_PLACEHOLDER: &str = "{{flat}}";
pub const DATE_PLACEHOLDER: &str = "{{date}}";
pub const TIME_PLACEHOLDER: &str = "{{time}}";

const KNOWN_PLACEHOLDERS: [&str; 3] = [FLAT_PLACEHOLDER, DATE_PLACEHOLDER, TIME_PLACEHOLDER];

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{[^{}]*\}\}").expect("placeholder pattern is valid"));

/// Notice template. Substitution is purely textual: every occurrence of a
/// placeholder is replaced, nothing else is interpreted.
#[derive(Debug, Clone, Default)]
pub struct Template {
    text: String,
    replacements: Vec<Replacement>,
}

impl Template {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.trim().to_string(),
            replacements: Vec::new(),
        }
    }

    pub fn with_replacements(mut self, replacements: Vec<Replacement>) -> Self {
        self.replacements = replacements;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// `{{...}}` tokens that will survive rendering untouched, in order of first appearance.
    pub fn unknown_placeholders(&self) -> Vec<String> {
        let mut unknown: Vec<String> = Vec::new();
        for m in PLACEHOLDER_RE.find_iter(&self.text) {
            let token = m.as_str();
            if !KNOWN_PLACEHOLDERS.contains(&token) && !unknown.iter().any(|u| u == token) {
                unknown.push(token.to_string());
            }
        }
        unknown
    }

    pub fn render(&self, context: &NoticeContext) -> String {
        let mut text = self.text.clone();

        // replacements run first so they can introduce placeholders
        for replacement in &self.replacements {
            if replacement.from.is_empty() {
                continue;
            }
            text = text.replace(&replacement.from, &replacement.to);
        }

        text.replace(FLAT_PLACEHOLDER, &context.flat)
            .replace(DATE_PLACEHOLDER, &context.date)
            .replace(TIME_PLACEHOLDER, &context.time)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> NoticeContext {
        NoticeContext {
            flat: "42".to_string(),
            date: "05.06.2024".to_string(),
            time: "09:30".to_string(),
        }
    }

    #[test]
    fn test_replaces_every_occurrence() {
        let template = Template::new("Кв. {{flat}} / {{flat}}: {{date}} в {{time}}");
        assert_eq!(
            template.render(&context()),
            "Кв. 42 / 42: 05.06.2024 в 09:30"
        );
    }

    #[test]
    fn test_trims_template() {
        let template = Template::new("\n\n  Hello {{flat}}  \n");
        assert_eq!(template.text(), "Hello {{flat}}");
        assert!(Template::new(" \n\t ").is_empty());
    }

    #[test]
    fn test_replacements_apply_before_placeholders() {
        let template = Template::new("ЖК Салют, Квартира № 19").with_replacements(vec![
            Replacement {
                from: "ЖК Салют".to_string(),
                to: "ЖК Красный Металлист".to_string(),
            },
            Replacement {
                from: "Квартира № 19".to_string(),
                to: "Квартира № {{flat}}".to_string(),
            },
        ]);
        assert_eq!(
            template.render(&context()),
            "ЖК Красный Металлист, Квартира № 42"
        );
    }

    #[test]
    fn test_empty_replacement_source_is_ignored() {
        let template = Template::new("abc").with_replacements(vec![Replacement {
            from: String::new(),
            to: "x".to_string(),
        }]);
        assert_eq!(template.render(&context()), "abc");
    }

    #[test]
    fn test_unknown_placeholders_are_reported_and_kept() {
        let template = Template::new("{{flat}} {{ flat }} {{name}} {{name}} {{date}}");
        assert_eq!(
            template.unknown_placeholders(),
            vec!["{{ flat }}".to_string(), "{{name}}".to_string()]
        );
        assert_eq!(
            template.render(&context()),
            "42 {{ flat }} {{name}} {{name}} 05.06.2024"
        );
    }

    #[test]
    fn test_template_without_placeholders() {
        let template = Template::new("Plain notice");
        assert!(template.unknown_placeholders().is_empty());
        assert_eq!(template.render(&context()), "Plain notice");
    }
}
