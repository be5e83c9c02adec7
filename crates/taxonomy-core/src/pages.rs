use log::debug;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::config::PluginConfig;
use crate::counter::count_terms;
use crate::error::{ConfigurationError, Result};
use crate::model::{PageContext, PageRequest, TAXONOMY_TYPE};
use crate::store::{GraphStore, NodeFilter};
use crate::vfs::FileSystem;

/// Resolves a configured template reference to an existing file.
pub trait TemplateLocator {
    fn locate(&self, template: &Path) -> Option<PathBuf>;
}

/// Looks templates up under a site root, trying the bare path, the path
/// with each known extension, then an `index` file inside it.
pub struct FsTemplateLocator {
    root: PathBuf,
    extensions: Vec<String>,
    fs: Arc<dyn FileSystem>,
}

impl FsTemplateLocator {
    pub fn new(root: PathBuf, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            root,
            extensions: ["html", "hbs", "tera", "jinja", "liquid"]
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            fs,
        }
    }

    pub fn with_extensions(mut self, extensions: Vec<String>) -> Self {
        self.extensions = extensions;
        self
    }

    fn candidates(&self, template: &Path) -> Vec<PathBuf> {
        let base = self.root.join(template);
        let mut candidates = vec![base.clone()];
        for ext in &self.extensions {
            candidates.push(PathBuf::from(format!("{}.{}", base.display(), ext)));
        }
        for ext in &self.extensions {
            candidates.push(base.join(format!("index.{}", ext)));
        }
        candidates
    }
}

impl TemplateLocator for FsTemplateLocator {
    fn locate(&self, template: &Path) -> Option<PathBuf> {
        self.candidates(template)
            .into_iter()
            .find(|candidate| self.fs.is_file(candidate))
    }
}

/// Join URL path segments into a rooted path.
///
/// ```
/// use taxonomy_core::pages::page_path;
///
/// assert_eq!(page_path(&["tags", "old-tag"]), "/tags/old-tag");
/// assert_eq!(page_path(&["/blog/tags/", "rust"]), "/blog/tags/rust");
/// assert_eq!(page_path(&[""]), "/");
/// ```
pub fn page_path(segments: &[&str]) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for segment in segments {
        for part in segment.split('/') {
            match part {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                part => parts.push(part),
            }
        }
    }
    format!("/{}", parts.join("/"))
}

fn require_template(
    templates: &dyn TemplateLocator,
    template: &Path,
) -> std::result::Result<PathBuf, ConfigurationError> {
    templates
        .locate(template)
        .ok_or_else(|| ConfigurationError::MissingTemplate {
            path: template.to_path_buf(),
        })
}

/// Plan one index page per sourced taxonomy and one page per used term.
///
/// Both templates are resolved before anything is planned, so a missing
/// template fails the whole plan.
pub fn plan_pages<S: GraphStore + ?Sized>(
    store: &S,
    config: &PluginConfig,
    templates: &dyn TemplateLocator,
) -> Result<Vec<PageRequest>> {
    if !config.create_pages {
        debug!("page creation disabled");
        return Ok(Vec::new());
    }

    let taxonomy_component = require_template(templates, &config.taxonomy_template)?;
    let term_component = require_template(templates, &config.term_template)?;

    let mut pages = Vec::new();
    for node in store.run_query(&NodeFilter::of_type(TAXONOMY_TYPE))? {
        let Some(taxonomy) = node.as_taxonomy() else {
            continue;
        };

        pages.push(PageRequest {
            path: page_path(&[&taxonomy.taxonomy_page_path]),
            component: taxonomy_component.clone(),
            context: PageContext::Taxonomy {
                id: node.id,
                taxonomy: taxonomy.key.clone(),
            },
        });

        for counted in count_terms(store, &taxonomy.key)? {
            let term = counted.term;
            pages.push(PageRequest {
                path: page_path(&[&taxonomy.term_page_path, &term.slug]),
                component: term_component.clone(),
                context: PageContext::Term {
                    id: term.id,
                    taxonomy: taxonomy.key.clone(),
                    slug: term.slug,
                    label: term.label,
                },
            });
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::PhysicalFileSystem;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_template_lookup_tries_extensions_and_index() {
        let temp_dir = TempDir::new().unwrap();
        let templates = temp_dir.path().join("src/templates");
        fs::create_dir_all(templates.join("term")).unwrap();
        fs::write(templates.join("taxonomy.html"), "<ul></ul>").unwrap();
        fs::write(templates.join("term/index.tera"), "{{ term }}").unwrap();

        let locator =
            FsTemplateLocator::new(temp_dir.path().to_path_buf(), Arc::new(PhysicalFileSystem));
        assert_eq!(
            locator.locate(Path::new("src/templates/taxonomy")),
            Some(templates.join("taxonomy.html"))
        );
        assert_eq!(
            locator.locate(Path::new("src/templates/term")),
            Some(templates.join("term/index.tera"))
        );
        assert_eq!(locator.locate(Path::new("src/templates/missing")), None);
    }

    #[test]
    fn test_page_path_normalizes_segments() {
        assert_eq!(page_path(&["tags"]), "/tags");
        assert_eq!(page_path(&["./tags/", "/blue"]), "/tags/blue");
        assert_eq!(page_path(&["a/b/../c", "d"]), "/a/c/d");
    }
}
