use super::*;
use crate::config::{TaxonomyConfig, TermSettings};
use crate::error::{ConfigurationError, TaxonomyError};
use crate::identity::create_node_id;
use crate::model::{PageContext, TERM_TYPE};
use crate::pages::FsTemplateLocator;
use crate::vfs::PhysicalFileSystem;
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn tags_config(terms: &[(&str, TermSettings)]) -> PluginConfig {
    let mut config = PluginConfig::default();
    config.taxonomies.insert(
        "tags".to_string(),
        TaxonomyConfig {
            label: Some("Tags".to_string()),
            terms: terms
                .iter()
                .map(|(slug, settings)| (slug.to_string(), settings.clone()))
                .collect(),
            ..TaxonomyConfig::default()
        },
    );
    config
}

fn redirect(target: &str) -> TermSettings {
    TermSettings {
        redirect: Some(target.to_string()),
        ..TermSettings::default()
    }
}

/// Resolver reading `tags` straight off the node fields.
fn tag_field_resolvers() -> ResolverTable {
    let mut resolvers = ResolverTable::new();
    resolvers.register_fn("BlogPost", |ctx| ctx.node.fields.get(ctx.key).cloned());
    resolvers
}

fn post(seed: &str, tags: Value) -> ContentNode {
    ContentNode {
        id: create_node_id(seed),
        node_type: "BlogPost".to_string(),
        path: None,
        fields: json!({ "tags": tags }),
    }
}

fn create_test_engine(config: PluginConfig) -> TaxonomyEngine {
    let mut engine = TaxonomyEngine::in_memory(config, tag_field_resolvers());
    engine.source_taxonomies().unwrap();
    engine
}

fn counts(engine: &TaxonomyEngine, taxonomy: &str) -> Vec<(String, usize)> {
    engine
        .count_terms(taxonomy)
        .unwrap()
        .into_iter()
        .map(|c| (c.term.slug, c.count))
        .collect()
}

fn term_records(engine: &TaxonomyEngine) -> usize {
    engine
        .store()
        .run_query(&NodeFilter::of_type(TERM_TYPE))
        .unwrap()
        .len()
}

#[test]
fn test_redirected_label_counts_under_target() {
    let mut engine = create_test_engine(tags_config(&[("old-tag", redirect("new-tag"))]));

    let associations = engine
        .add_content_node(&post("post", json!(["Old Tag"])))
        .unwrap();
    assert_eq!(associations.len(), 1);
    assert_eq!(associations[0].label, "Old Tag");

    assert_eq!(counts(&engine, "tags"), vec![("new-tag".to_string(), 1)]);
    let term = &engine.count_terms("tags").unwrap()[0].term;
    assert!(term.labelled_from_redirect);
}

#[test]
fn test_transitive_redirect() {
    let mut engine = create_test_engine(tags_config(&[("a", redirect("b")), ("b", redirect("c"))]));
    engine.add_content_node(&post("post", json!("A"))).unwrap();
    assert_eq!(counts(&engine, "tags"), vec![("c".to_string(), 1)]);
}

#[test]
fn test_case_variants_share_one_term() {
    let mut engine = create_test_engine(tags_config(&[]));
    engine.add_content_node(&post("one", json!(["Blue"]))).unwrap();
    engine.add_content_node(&post("two", json!(["blue"]))).unwrap();

    assert_eq!(counts(&engine, "tags"), vec![("blue".to_string(), 2)]);
    assert_eq!(term_records(&engine), 1);
    assert_eq!(engine.count_terms("tags").unwrap()[0].term.label, "Blue");
}

#[test]
fn test_duplicate_terms_on_one_node_collapse() {
    let mut engine = create_test_engine(tags_config(&[]));
    let associations = engine.add_content_node(&post("post", json!(["A", "A"]))).unwrap();
    assert_eq!(associations.len(), 1);
    assert_eq!(counts(&engine, "tags"), vec![("a".to_string(), 1)]);
}

#[test]
fn test_configured_label_wins_over_redirect_label() {
    let new_tag = TermSettings {
        label: Some("New Tag".to_string()),
        ..TermSettings::default()
    };
    let mut config = tags_config(&[("old-tag", redirect("new-tag")), ("new-tag", new_tag)]);
    config
        .taxonomies
        .get_mut("tags")
        .unwrap()
        .terms
        .insert("ancient-tag".to_string(), redirect("old-tag"));
    let mut engine = create_test_engine(config);

    engine.add_content_node(&post("one", json!(["Ancient Tag"]))).unwrap();
    engine.add_content_node(&post("two", json!(["new tag"]))).unwrap();

    let counted = engine.count_terms("tags").unwrap();
    assert_eq!(counted.len(), 1);
    assert_eq!(counted[0].term.label, "New Tag");
    assert_eq!(counted[0].count, 2);

    // Without override_label the node keeps its own spelling.
    let listing = engine
        .value_terms_by_taxonomy(&create_node_id("one"))
        .unwrap();
    assert_eq!(
        listing["tags"],
        vec![TermListing {
            slug: "new-tag".to_string(),
            label: "Ancient Tag".to_string(),
        }]
    );
}

#[test]
fn test_redirect_label_replaced_once_configured_label_arrives() {
    let mut engine = create_test_engine(tags_config(&[("old-tag", redirect("new-tag"))]));
    engine.add_content_node(&post("one", json!(["Old Tag"]))).unwrap();
    assert_eq!(engine.count_terms("tags").unwrap()[0].term.label, "Old Tag");

    engine.add_content_node(&post("two", json!(["New Tag"]))).unwrap();
    engine.add_content_node(&post("three", json!(["Old Tag"]))).unwrap();

    let counted = engine.count_terms("tags").unwrap();
    assert_eq!(counted[0].term.label, "New Tag");
    assert!(!counted[0].term.labelled_from_redirect);
    assert_eq!(counted[0].count, 3);
}

#[test]
fn test_configured_label_later_on_same_node_relabels_term() {
    let mut engine = create_test_engine(tags_config(&[("old-tag", redirect("new-tag"))]));
    let associations = engine
        .add_content_node(&post("post", json!(["Old Tag", "New Tag"])))
        .unwrap();

    assert_eq!(associations.len(), 1);
    assert_eq!(associations[0].label, "New Tag");
    assert_eq!(term_records(&engine), 1);

    let counted = engine.count_terms("tags").unwrap();
    assert_eq!(counted[0].term.label, "New Tag");
    assert!(!counted[0].term.labelled_from_redirect);
    assert_eq!(counted[0].count, 1);
}

#[test]
fn test_collapsed_association_keeps_last_label() {
    let mut engine = create_test_engine(tags_config(&[]));
    engine
        .add_content_node(&post("post", json!(["Blue", "BLUE", "blue"])))
        .unwrap();

    let listing = engine
        .value_terms_by_taxonomy(&create_node_id("post"))
        .unwrap();
    assert_eq!(
        listing["tags"],
        vec![TermListing {
            slug: "blue".to_string(),
            label: "blue".to_string(),
        }]
    );
    assert_eq!(engine.count_terms("tags").unwrap()[0].term.label, "Blue");
}

#[test]
fn test_counts_sorted_by_label() {
    let mut engine = create_test_engine(tags_config(&[]));
    engine
        .add_content_node(&post("one", json!(["zebra", "Apple", "mango"])))
        .unwrap();
    engine
        .add_content_node(&post("two", json!(["Mango", "banana", "Éclair"])))
        .unwrap();

    let labels: Vec<String> = engine
        .count_terms("tags")
        .unwrap()
        .into_iter()
        .map(|c| c.term.label)
        .collect();
    assert_eq!(labels, vec!["Apple", "banana", "Éclair", "mango", "zebra"]);
}

#[test]
fn test_unknown_taxonomy_count_is_an_error() {
    let engine = create_test_engine(tags_config(&[]));
    assert!(matches!(
        engine.count_terms("colours").unwrap_err(),
        TaxonomyError::Configuration(ConfigurationError::UnknownTaxonomy(_))
    ));
}

#[test]
fn test_node_without_resolver_is_ignored() {
    let mut engine = create_test_engine(tags_config(&[]));
    let author = ContentNode {
        id: create_node_id("author"),
        node_type: "Author".to_string(),
        path: None,
        fields: json!({ "tags": ["Blue"] }),
    };
    assert!(engine.add_content_node(&author).unwrap().is_empty());
    assert!(engine.count_terms("tags").unwrap().is_empty());
}

#[test]
fn test_to_term_slug_follows_redirects() {
    let engine = create_test_engine(tags_config(&[("old-tag", redirect("new-tag"))])).with_slugifier(
        "tags",
        |label: &str| crate::slug::kebab_case(label),
    );
    assert_eq!(engine.to_term_slug("tags", "Old Tag").unwrap(), "new-tag");
    assert_eq!(engine.to_term_slug("tags", "Fresh Tag").unwrap(), "fresh-tag");
    assert!(engine.to_term_slug("colours", "Red").is_err());
}

#[test]
fn test_value_terms_grouped_by_taxonomy() {
    let mut config = tags_config(&[]);
    config
        .taxonomies
        .insert("categories".to_string(), TaxonomyConfig::default());
    let mut resolvers = ResolverTable::new();
    resolvers.register_fn("BlogPost", |ctx| match ctx.key {
        "categories" => Some(json!("Guides")),
        _ => Some(json!(["Rust", "Web"])),
    });
    let mut engine = TaxonomyEngine::in_memory(config, resolvers);
    engine.source_taxonomies().unwrap();

    let node = post("post", Value::Null);
    engine.add_content_node(&node).unwrap();

    let grouped = engine.value_terms_by_taxonomy(&node.id).unwrap();
    assert_eq!(grouped.len(), 2);
    assert_eq!(grouped["categories"][0].slug, "guides");
    let tag_slugs: Vec<_> = grouped["tags"].iter().map(|t| t.slug.as_str()).collect();
    assert_eq!(tag_slugs, vec!["rust", "web"]);
}

fn site_with_templates() -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    let templates = temp_dir.path().join("src/templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(templates.join("taxonomy.html"), "").unwrap();
    fs::write(templates.join("term.html"), "").unwrap();
    temp_dir
}

#[test]
fn test_plan_pages() {
    let mut config = tags_config(&[("old-tag", redirect("new-tag"))]);
    config.taxonomies.get_mut("tags").unwrap().term_page_path = Some("/tag/".to_string());
    let mut engine = create_test_engine(config);
    engine
        .add_content_node(&post("post", json!(["Old Tag", "Blue"])))
        .unwrap();

    let site = site_with_templates();
    let locator = FsTemplateLocator::new(site.path().to_path_buf(), Arc::new(PhysicalFileSystem));
    let pages = engine.plan_pages(&locator).unwrap();

    let paths: Vec<&str> = pages.iter().map(|p| p.path.as_str()).collect();
    assert_eq!(paths, vec!["/tags", "/tag/blue", "/tag/new-tag"]);
    assert_eq!(
        pages[0].component,
        site.path().join("src/templates/taxonomy.html")
    );
    assert!(matches!(
        &pages[2].context,
        PageContext::Term { slug, label, .. } if slug == "new-tag" && label == "Old Tag"
    ));
}

#[test]
fn test_plan_pages_missing_template() {
    let engine = create_test_engine(tags_config(&[]));
    let site = TempDir::new().unwrap();
    let locator = FsTemplateLocator::new(site.path().to_path_buf(), Arc::new(PhysicalFileSystem));

    let err = engine.plan_pages(&locator).unwrap_err();
    assert!(matches!(
        err,
        TaxonomyError::Configuration(ConfigurationError::MissingTemplate { ref path })
            if *path == PathBuf::from("src/templates/taxonomy")
    ));
}

#[test]
fn test_plan_pages_disabled() {
    let mut config = tags_config(&[]);
    config.create_pages = false;
    let engine = create_test_engine(config);
    let site = TempDir::new().unwrap();
    let locator = FsTemplateLocator::new(site.path().to_path_buf(), Arc::new(PhysicalFileSystem));
    assert!(engine.plan_pages(&locator).unwrap().is_empty());
}
