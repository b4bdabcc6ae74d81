use crate::blog::{PostUpdate, UPDATE_FAILED_MESSAGE};
use serde::Serialize;

/// Fields submitted by the post editor. Every field is optional on the wire so
/// that a missing field becomes a validation error instead of a rejection.
#[derive(Debug, Default, Clone)]
pub struct EditForm {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

/// Errors shown next to the editor form; all `None` means nothing went wrong.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize)]
pub struct ActionErrors {
    pub summary: Option<String>,
    pub title: Option<String>,
    pub slug: Option<String>,
    pub markdown: Option<String>,
}

impl ActionErrors {
    pub fn update_failed() -> ActionErrors {
        ActionErrors {
            summary: Some(String::from(UPDATE_FAILED_MESSAGE)),
            ..ActionErrors::default()
        }
    }

    pub fn has_errors(&self) -> bool {
        [&self.summary, &self.title, &self.slug, &self.markdown]
            .iter()
            .any(|error| error.is_some())
    }
}

impl EditForm {
    /// Reads an `application/x-www-form-urlencoded` body. When a field is
    /// repeated the first value wins; unknown fields are ignored.
    pub fn from_urlencoded(body: &[u8]) -> EditForm {
        let mut form = EditForm::default();
        for (name, value) in url::form_urlencoded::parse(body) {
            let field = match name.as_ref() {
                "title" => &mut form.title,
                "slug" => &mut form.slug,
                "markdown" => &mut form.markdown,
                _ => continue,
            };
            if field.is_none() {
                *field = Some(value.into_owned());
            }
        }
        form
    }

    /// Checks every field, then hands back the update if none were missing.
    pub fn validate(self) -> Result<PostUpdate, ActionErrors> {
        let errors = ActionErrors {
            summary: None,
            title: required(&self.title, "Title is required"),
            slug: required(&self.slug, "Slug is required"),
            markdown: required(&self.markdown, "Markdown is required"),
        };

        match (self.title, self.slug, self.markdown) {
            (Some(title), Some(slug), Some(markdown)) if !errors.has_errors() => Ok(PostUpdate {
                title,
                slug,
                markdown,
            }),
            _ => Err(errors),
        }
    }
}

// whitespace counts as present
fn required(field: &Option<String>, message: &str) -> Option<String> {
    match field {
        Some(value) if !value.is_empty() => None,
        _ => Some(String::from(message)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(title: Option<&str>, slug: Option<&str>, markdown: Option<&str>) -> EditForm {
        EditForm {
            title: title.map(String::from),
            slug: slug.map(String::from),
            markdown: markdown.map(String::from),
        }
    }

    #[test]
    fn urlencoded_body_keeps_first_value() {
        let form = EditForm::from_urlencoded(b"title=A&title=B&slug=s&markdown=two+words%21&x=1");
        assert_eq!(form.title.as_deref(), Some("A"));
        assert_eq!(form.slug.as_deref(), Some("s"));
        assert_eq!(form.markdown.as_deref(), Some("two words!"));

        let form = EditForm::from_urlencoded(b"title=&slug=x");
        assert_eq!(form.title.as_deref(), Some(""));
        assert_eq!(form.markdown, None);
    }

    #[test]
    fn complete_form_becomes_update() {
        let update = form(Some("T"), Some("s"), Some("m")).validate().unwrap();
        assert_eq!(
            update,
            PostUpdate {
                title: "T".to_owned(),
                slug: "s".to_owned(),
                markdown: "m".to_owned(),
            }
        );
    }

    #[test]
    fn empty_title_is_the_only_error() {
        let errors = form(Some(""), Some("x"), Some("y")).validate().unwrap_err();
        assert_eq!(
            errors,
            ActionErrors {
                summary: None,
                title: Some("Title is required".to_owned()),
                slug: None,
                markdown: None,
            }
        );
    }

    #[test]
    fn every_missing_field_is_reported() {
        let errors = EditForm::default().validate().unwrap_err();
        assert_eq!(errors.summary, None);
        assert_eq!(errors.title.as_deref(), Some("Title is required"));
        assert_eq!(errors.slug.as_deref(), Some("Slug is required"));
        assert_eq!(errors.markdown.as_deref(), Some("Markdown is required"));

        let errors = form(Some("T"), None, Some("")).validate().unwrap_err();
        assert_eq!(errors.title, None);
        assert!(errors.slug.is_some());
        assert!(errors.markdown.is_some());
    }

    #[test]
    fn whitespace_counts_as_present() {
        assert!(form(Some(" "), Some("s"), Some("\n")).validate().is_ok());
    }

    #[test]
    fn update_failure_only_sets_summary() {
        let errors = ActionErrors::update_failed();
        assert!(errors.has_errors());
        assert_eq!(errors.summary.as_deref(), Some("Failed to update post"));
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            serde_json::json!({
                "summary": "Failed to update post",
                "title": null,
                "slug": null,
                "markdown": null,
            })
        );
        assert!(!ActionErrors::default().has_errors());
    }
}
