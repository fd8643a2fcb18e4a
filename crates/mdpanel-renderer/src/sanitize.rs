use std::fmt;

/// Allow-list HTML sanitizer guarding every container write.
///
/// The policy is ammonia's baseline with `class` allowed everywhere and
/// `style` on `span`/`pre`, so language classes and inline token colours
/// survive. Task list checkboxes are kept disabled-only. Script and style
/// elements are dropped together with their content.
pub struct Sanitizer {
    builder: ammonia::Builder<'static>,
}

impl Sanitizer {
    pub fn new() -> Self {
        let mut builder = ammonia::Builder::default();
        builder
            .add_generic_attributes(&["class"])
            .add_tag_attributes("span", &["style"])
            .add_tag_attributes("pre", &["style"])
            .add_tags(&["input"])
            .add_tag_attributes("input", &["type", "checked"])
            .set_tag_attribute_value("input", "disabled", "");
        Self { builder }
    }

    pub fn clean(&self, html: &str) -> String {
        self.builder.clean(html).to_string()
    }
}

impl Default for Sanitizer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Sanitizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sanitizer").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_are_removed_with_content() {
        let clean = Sanitizer::new().clean("<p>hi</p><script>alert(1)</script>");
        assert_eq!(clean, "<p>hi</p>");
    }

    #[test]
    fn event_handlers_are_stripped() {
        let clean = Sanitizer::new().clean("<img src=\"a.png\" onerror=\"alert(1)\">");
        assert!(!clean.contains("onerror"));
    }

    #[test]
    fn javascript_urls_are_dropped() {
        let clean = Sanitizer::new().clean("<a href=\"javascript:alert(1)\">x</a>");
        assert!(!clean.contains("javascript:"));
    }

    #[test]
    fn code_classes_and_token_styles_survive() {
        let html = "<pre><code class=\"language-rust\"><span style=\"color:#a71d5d;\">fn</span></code></pre>";
        let clean = Sanitizer::new().clean(html);
        assert!(clean.contains("class=\"language-rust\""));
        assert!(clean.contains("style=\"color:#a71d5d;\""));
    }

    #[test]
    fn task_list_boxes_are_forced_disabled() {
        let clean = Sanitizer::new().clean("<input type=\"checkbox\" checked=\"\">");
        assert!(clean.contains("disabled=\"\""));
    }
}
