//! Markdown files as content nodes.
//!
//! Each file becomes one node of the configured type whose fields carry the
//! YAML frontmatter, the first heading and the path relative to the
//! content root. Resolvers read their terms from those fields.

use log::warn;
use pulldown_cmark::{Event, HeadingLevel, MetadataBlockKind, Options, Parser, Tag, TagEnd};
use serde_json::{json, Value};
use std::path::Path;

use crate::config::ContentConfig;
use crate::identity::create_node_id;
use crate::model::{ContentNode, NodeId};
use crate::utils::normalize_path_to_key;
use crate::vfs::FileSystem;

pub(crate) struct ParsedDocument {
    pub frontmatter: Option<Value>,
    pub heading: Option<String>,
}

pub(crate) fn parse_document(text: &str) -> ParsedDocument {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_YAML_STYLE_METADATA_BLOCKS);

    let mut frontmatter = None;
    let mut heading = None;

    let mut in_frontmatter = false;
    let mut frontmatter_content = String::new();
    let mut heading_text: Option<String> = None;

    for event in Parser::new_ext(text, options) {
        match event {
            Event::Start(Tag::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = true;
            }
            Event::End(TagEnd::MetadataBlock(MetadataBlockKind::YamlStyle)) => {
                in_frontmatter = false;
                match serde_yaml::from_str::<Value>(&frontmatter_content) {
                    Ok(value) => frontmatter = Some(value),
                    Err(e) => warn!("ignoring unparsable frontmatter: {}", e),
                }
            }
            Event::Start(Tag::Heading {
                level: HeadingLevel::H1,
                ..
            }) if heading.is_none() => {
                heading_text = Some(String::new());
            }
            Event::End(TagEnd::Heading(HeadingLevel::H1)) => {
                if let Some(text) = heading_text.take() {
                    heading = Some(text.trim().to_string());
                }
            }
            Event::Text(text) | Event::Code(text) => {
                if in_frontmatter {
                    frontmatter_content.push_str(&text);
                } else if let Some(collector) = heading_text.as_mut() {
                    collector.push_str(&text);
                }
            }
            _ => {}
        }
    }

    ParsedDocument {
        frontmatter,
        heading,
    }
}

/// Id of the node a content file maps to.
pub fn content_node_id(relative_path: &Path, node_type: &str) -> NodeId {
    create_node_id(&format!(
        "{} >>> {}",
        node_type,
        normalize_path_to_key(relative_path)
    ))
}

/// Build a content node from one markdown document.
pub fn content_node(relative_path: &Path, text: &str, node_type: &str) -> ContentNode {
    let key = normalize_path_to_key(relative_path);
    let parsed = parse_document(text);

    let frontmatter = parsed.frontmatter.unwrap_or_else(|| json!({}));
    let title = frontmatter
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
        .or(parsed.heading);

    ContentNode {
        id: content_node_id(relative_path, node_type),
        node_type: node_type.to_string(),
        path: Some(relative_path.to_path_buf()),
        fields: json!({
            "key": key,
            "title": title,
            "frontmatter": frontmatter,
        }),
    }
}

/// Read every content file under `root`, in path order.
pub fn scan_content(fs: &dyn FileSystem, root: &Path, config: &ContentConfig) -> Vec<ContentNode> {
    let mut nodes = Vec::new();
    for path in fs.list_files(root, &config.extensions) {
        let Ok(text) = fs.read_to_string(&path) else {
            warn!("could not read {}", path.display());
            continue;
        };
        let relative = path.strip_prefix(root).unwrap_or(&path);
        nodes.push(content_node(relative, &text, &config.node_type));
    }
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::PhysicalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_parse_frontmatter_and_heading() {
        let doc = parse_document("---\ntitle: Hello\ntags: [Rust, Web]\n---\n# First\n\n# Second");
        let frontmatter = doc.frontmatter.unwrap();
        assert_eq!(frontmatter["title"], "Hello");
        assert_eq!(frontmatter["tags"], json!(["Rust", "Web"]));
        assert_eq!(doc.heading.as_deref(), Some("First"));
    }

    #[test]
    fn test_content_node_title_falls_back_to_heading() {
        let node = content_node(Path::new("posts/intro.md"), "# Intro `code`", "MarkdownRemark");
        assert_eq!(node.fields["title"], "Intro code");
        assert_eq!(node.fields["key"], "posts/intro");
        assert_eq!(node.fields["frontmatter"], json!({}));
        assert_eq!(
            node.id,
            content_node(Path::new("posts/intro.md"), "", "MarkdownRemark").id
        );
    }

    #[test]
    fn test_scan_content_reads_configured_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("posts")).unwrap();
        fs::write(temp_dir.path().join("posts/b.md"), "---\ntags: Blue\n---\n").unwrap();
        fs::write(temp_dir.path().join("a.md"), "# A").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "ignored").unwrap();

        let nodes = scan_content(&PhysicalFileSystem, temp_dir.path(), &ContentConfig::default());
        let keys: Vec<_> = nodes.iter().map(|n| n.fields["key"].clone()).collect();
        assert_eq!(keys, vec![json!("a"), json!("posts/b")]);
        assert_eq!(nodes[1].fields["frontmatter"]["tags"], "Blue");
    }
}
