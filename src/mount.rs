//! Mount points that receive rendered cards

use crate::errors::{DashboardError, Result};
use scraper::node::Comment;
use scraper::{Html, Node, Selector};
use std::path::Path;
use tracing::debug;

/// Page shell used when no shell file is configured
pub const DEFAULT_SHELL: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Service Status</title>
  <link rel="stylesheet" href="style.css">
</head>
<body>
  <div id="container"></div>
</body>
</html>
"#;

/// A container element that cards are appended to
pub trait MountPoint {
    fn append_child(&mut self, markup: String);

    /// Children appended during this process, in append order
    fn children(&self) -> &[String];

    fn child_count(&self) -> usize {
        self.children().len()
    }
}

/// Something a container can be looked up in by id
pub trait Document {
    fn locate(&mut self, id: &str) -> Result<&mut dyn MountPoint>;
}

/// An HTML page whose elements can receive cards
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    page: Html,
    containers: Vec<HtmlContainer>,
}

#[derive(Debug, Clone)]
struct HtmlContainer {
    id: String,
    children: Vec<String>,
}

impl MountPoint for HtmlContainer {
    fn append_child(&mut self, markup: String) {
        self.children.push(markup);
    }

    fn children(&self) -> &[String] {
        &self.children
    }
}

/// Comment left as the container's last child, replaced by its cards on output
fn slot_marker(id: &str) -> String {
    format!("status-dashboard-slot:{}", id)
}

impl HtmlDocument {
    pub fn new(html: impl AsRef<str>) -> Self {
        Self {
            page: Html::parse_document(html.as_ref()),
            containers: Vec::new(),
        }
    }

    pub fn with_default_shell() -> Self {
        Self::new(DEFAULT_SHELL)
    }

    /// Load a page shell from disk
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let html = tokio::fs::read_to_string(path.as_ref()).await?;
        debug!("Loaded page shell from {}", path.as_ref().display());
        Ok(Self::new(html))
    }

    /// Serialize the page with every appended card in place
    pub fn to_html(&self) -> String {
        let mut html = self.page.html();

        for container in &self.containers {
            let mut markup = String::new();
            if !container.children.is_empty() {
                markup.push('\n');
                for child in &container.children {
                    markup.push_str(child);
                    markup.push('\n');
                }
            }
            html = html.replacen(&format!("<!--{}-->", slot_marker(&container.id)), &markup, 1);
        }

        html
    }

    pub async fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        tokio::fs::write(path.as_ref(), self.to_html()).await?;
        Ok(())
    }
}

impl Document for HtmlDocument {
    fn locate(&mut self, id: &str) -> Result<&mut dyn MountPoint> {
        if let Some(index) = self.containers.iter().position(|c| c.id == id) {
            return Ok(&mut self.containers[index]);
        }

        let with_id = Selector::parse("[id]")
            .map_err(|e| DashboardError::Mount(format!("invalid selector: {:?}", e)))?;

        let node_id = self
            .page
            .select(&with_id)
            .find(|element| element.value().id() == Some(id))
            .map(|element| element.id())
            .ok_or_else(|| DashboardError::Mount(format!("no element with id \"{}\"", id)))?;

        let mut element = self
            .page
            .tree
            .get_mut(node_id)
            .ok_or_else(|| DashboardError::Mount(format!("element #{} vanished", id)))?;
        element.append(Node::Comment(Comment {
            comment: slot_marker(id).as_str().into(),
        }));

        debug!("Located container #{}", id);

        let index = self.containers.len();
        self.containers.push(HtmlContainer {
            id: id.to_string(),
            children: Vec::new(),
        });
        Ok(&mut self.containers[index])
    }
}

/// In-memory document, used where no real page is involved
#[derive(Debug, Default, Clone)]
pub struct MemoryDocument {
    containers: Vec<MemoryContainer>,
}

#[derive(Debug, Default, Clone)]
pub struct MemoryContainer {
    id: String,
    children: Vec<String>,
}

impl MountPoint for MemoryContainer {
    fn append_child(&mut self, markup: String) {
        self.children.push(markup);
    }

    fn children(&self) -> &[String] {
        &self.children
    }
}

impl MemoryDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_container(mut self, id: &str) -> Self {
        self.containers.push(MemoryContainer {
            id: id.to_string(),
            children: Vec::new(),
        });
        self
    }

    pub fn container(&self, id: &str) -> Option<&MemoryContainer> {
        self.containers.iter().find(|c| c.id == id)
    }
}

impl Document for MemoryDocument {
    fn locate(&mut self, id: &str) -> Result<&mut dyn MountPoint> {
        self.containers
            .iter_mut()
            .find(|c| c.id == id)
            .map(|c| c as &mut dyn MountPoint)
            .ok_or_else(|| DashboardError::Mount(format!("no element with id \"{}\"", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_shell_has_container() {
        let mut document = HtmlDocument::with_default_shell();
        let container = document.locate("container").unwrap();
        container.append_child("<div class=\"card\">one</div>".to_string());
        container.append_child("<div class=\"card\">two</div>".to_string());

        let html = document.to_html();
        let inner = "<div id=\"container\">\n<div class=\"card\">one</div>\n<div class=\"card\">two</div>\n</div>";
        assert!(html.contains(inner), "unexpected document:\n{}", html);
    }

    #[test]
    fn test_missing_container_is_mount_error() {
        let mut document = HtmlDocument::new("<html><body><div id=\"other\"></div></body></html>");
        let err = document.locate("container").err().unwrap();
        assert_eq!(err.kind(), "MountError");
    }

    #[test]
    fn test_nested_elements_inside_container() {
        let shell = r#"<body><div id='container' class="grid"><div class="header"><div>Status</div></div></div><div>footer</div></body>"#;
        let mut document = HtmlDocument::new(shell);
        document.locate("container").unwrap().append_child("<p>card</p>".to_string());

        let html = document.to_html();
        assert!(html.contains("<div>Status</div></div>\n<p>card</p>\n</div><div>footer</div>"));
    }

    #[test]
    fn test_ignores_ids_in_comments_and_scripts() {
        let shell = r#"<!-- <div id="container"></div> -->
<script>const tpl = '<div id="container">';</script>
<section ID=container></section>"#;
        let mut document = HtmlDocument::new(shell);
        document.locate("container").unwrap().append_child("<p>x</p>".to_string());

        assert!(document.to_html().contains("<section id=\"container\">\n<p>x</p>\n</section>"));
    }

    #[test]
    fn test_finds_containers_a_browser_would() {
        let mut unclosed = HtmlDocument::new(r#"<html><body><div id="container"></body></html>"#);
        unclosed.locate("container").unwrap().append_child("<p>a</p>".to_string());
        assert!(unclosed.to_html().contains("<div id=\"container\">\n<p>a</p>\n</div>"));

        let mut self_closed = HtmlDocument::new(r#"<body><div id="container"/></div></body>"#);
        self_closed.locate("container").unwrap().append_child("<p>b</p>".to_string());
        assert!(self_closed.to_html().contains("<div id=\"container\">\n<p>b</p>\n</div>"));
    }

    #[test]
    fn test_locate_twice_returns_same_container() {
        let mut document = HtmlDocument::with_default_shell();
        document.locate("container").unwrap().append_child("a".to_string());
        let container = document.locate("container").unwrap();

        assert_eq!(container.child_count(), 1);
        assert_eq!(document.to_html().matches("\na\n").count(), 1);
    }

    #[test]
    fn test_located_but_empty_container_leaves_no_marker() {
        let mut document = HtmlDocument::with_default_shell();
        document.locate("container").unwrap();

        let html = document.to_html();
        assert!(html.contains("<div id=\"container\"></div>"));
        assert!(!html.contains("status-dashboard-slot"));
    }

    #[test]
    fn test_load_and_write_shell() {
        let dir = tempfile::tempdir().unwrap();
        let shell = dir.path().join("shell.html");
        let output = dir.path().join("index.html");
        std::fs::write(&shell, "<body><div id=\"container\"></div></body>").unwrap();

        tokio_test::block_on(async {
            let mut document = HtmlDocument::load(&shell).await.unwrap();
            document.locate("container").unwrap().append_child("<p>card</p>".to_string());
            document.write_to(&output).await.unwrap();
        });

        let written = std::fs::read_to_string(&output).unwrap();
        assert!(written.contains("<body><div id=\"container\">\n<p>card</p>\n</div></body>"));
    }

    #[test]
    fn test_memory_document() {
        let mut document = MemoryDocument::new().with_container("container");
        document.locate("container").unwrap().append_child("card".to_string());

        assert_eq!(document.container("container").unwrap().children(), ["card".to_string()]);
        assert!(document.locate("missing").is_err());
    }
}
