use crate::blog::{editor_path, Post};
use crate::error::Error;
use crate::form::ActionErrors;
use askama::Template;
use axum::response::Html;

pub struct NavLink {
    pub href: String,
    pub title: String,
}

impl NavLink {
    pub fn for_posts(posts: &[Post]) -> Vec<NavLink> {
        posts
            .iter()
            .map(|post| NavLink {
                href: editor_path(&post.slug),
                title: post.title.clone(),
            })
            .collect()
    }
}

/// Values shown in the editor inputs.
pub struct EditorFields {
    pub action: String,
    pub title: String,
    pub slug: String,
    pub markdown: String,
}

#[derive(Template)]
#[template(path = "admin/list.html")]
pub struct AdminListTemplate {
    pub nav: Vec<NavLink>,
    pub message: Option<String>,
}

#[derive(Template)]
#[template(path = "admin/edit.html")]
pub struct AdminEditTemplate {
    pub nav: Vec<NavLink>,
    pub message: Option<String>,
    pub fields: EditorFields,
    pub errors: ActionErrors,
    pub preview: String,
}

#[derive(Template)]
#[template(path = "admin/not_found.html")]
pub struct NotFoundTemplate {
    pub slug: String,
}

pub fn render<T: Template>(template: T) -> Result<Html<String>, Error> {
    Ok(Html(template.render()?))
}

/// Renders markdown to HTML off the async runtime. Raw HTML in the source is
/// escaped.
pub async fn render_markdown(markdown: String) -> Result<String, Error> {
    let html = tokio::task::spawn_blocking(move || {
        comrak::markdown_to_html(&markdown, &comrak::Options::default())
    })
    .await?;

    Ok(html)
}
