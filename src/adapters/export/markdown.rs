//! Implements PostExportPort. Writes generated posts as Markdown files.

use crate::domain::{DomainError, Platform, RecapResult, SocialPostSet};
use crate::ports::PostExportPort;
use chrono::{DateTime, Local};
use std::path::PathBuf;
use tokio::fs;
use tracing::info;

const MAX_SLUG_CHARS: usize = 40;

pub struct MarkdownExporter {
    output_dir: PathBuf,
}

impl MarkdownExporter {
    /// `output_dir` is created on first export.
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    async fn write(&self, filename: String, md: String) -> Result<PathBuf, DomainError> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to create output dir: {}", e)))?;

        let path = self.output_dir.join(filename);
        fs::write(&path, md)
            .await
            .map_err(|e| DomainError::Export(format!("Failed to write {}: {}", path.display(), e)))?;

        info!(path = %path.display(), "export written");
        Ok(path)
    }
}

#[async_trait::async_trait]
impl PostExportPort for MarkdownExporter {
    async fn export_posts(
        &self,
        event_title: &str,
        posts: &SocialPostSet,
    ) -> Result<PathBuf, DomainError> {
        let now = Local::now();
        let filename = format!("posts_{}_{}.md", slugify(event_title), file_stamp(&now));
        self.write(filename, render_posts(event_title, posts, &now)).await
    }

    async fn export_recap(&self, recap: &RecapResult) -> Result<PathBuf, DomainError> {
        let now = Local::now();
        let filename = format!("recap_{}.md", file_stamp(&now));
        self.write(filename, render_recap(recap, &now)).await
    }
}

fn render_posts(event_title: &str, posts: &SocialPostSet, at: &DateTime<Local>) -> String {
    let mut md = String::new();

    md.push_str(&format!("# Social Posts: {}\n\n", event_title));
    md.push_str(&format!(
        "**Platforms:** {} | **Generated:** {}\n\n",
        posts.len(),
        at.format("%Y-%m-%d %H:%M")
    ));
    md.push_str("---\n\n");

    for (key, post) in posts.iter() {
        let heading = Platform::from_id(key)
            .map(|p| p.display_name().to_string())
            .unwrap_or_else(|| key.to_string());
        md.push_str(&format!(
            "## {} ({} chars)\n\n",
            heading,
            post.chars().count()
        ));
        md.push_str(post);
        md.push_str("\n\n");
    }

    md.push_str("---\n");
    md.push_str("*Generated by social-spark*\n");
    md
}

fn render_recap(recap: &RecapResult, at: &DateTime<Local>) -> String {
    let mut md = String::new();
    md.push_str("# Event Recap\n\n");
    md.push_str(&format!("**Generated:** {}\n\n", at.format("%Y-%m-%d %H:%M")));
    md.push_str("---\n\n");
    md.push_str(&recap.recap_post);
    md.push_str("\n\n---\n");
    md.push_str("*Generated by social-spark*\n");
    md
}

fn file_stamp(at: &DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S%3f").to_string()
}

/// Lowercase ASCII slug for file names. Falls back to `event`.
fn slugify(title: &str) -> String {
    let mut slug = String::new();
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    let slug: String = slug.trim_matches('-').chars().take(MAX_SLUG_CHARS).collect();
    let slug = slug.trim_end_matches('-');
    if slug.is_empty() {
        "event".to_string()
    } else {
        slug.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn posts() -> SocialPostSet {
        let mut map = BTreeMap::new();
        map.insert("linkedin".to_string(), "Join us at Tech Meetup!".to_string());
        map.insert("tiktok".to_string(), "extra".to_string());
        SocialPostSet(map)
    }

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("Tech Meetup: Rust & AI!"), "tech-meetup-rust-ai");
        assert_eq!(slugify("  ***  "), "event");
        assert_eq!(slugify("Café Night"), "caf-night");
        assert!(slugify(&"a b ".repeat(50)).len() <= MAX_SLUG_CHARS);
    }

    #[test]
    fn test_render_posts_uses_display_names_and_counts() {
        let md = render_posts("Tech Meetup", &posts(), &Local::now());
        assert!(md.starts_with("# Social Posts: Tech Meetup\n"));
        assert!(md.contains("**Platforms:** 2"));
        assert!(md.contains("## LinkedIn (23 chars)\n\nJoin us at Tech Meetup!"));
        assert!(md.contains("## tiktok (5 chars)\n\nextra"));
    }

    #[tokio::test]
    async fn test_export_posts_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path());

        let path = exporter.export_posts("Tech Meetup", &posts()).await.unwrap();
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with("posts_tech-meetup_"));
        assert!(name.ends_with(".md"));

        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.contains("Join us at Tech Meetup!"));
    }

    #[tokio::test]
    async fn test_export_recap_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path().join("recaps"));

        let path = exporter
            .export_recap(&RecapResult {
                recap_post: "What a night!".into(),
            })
            .await
            .unwrap();
        let written = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(written.starts_with("# Event Recap\n"));
        assert!(written.contains("What a night!"));
    }

    #[tokio::test]
    async fn test_export_into_file_path_fails() {
        let blocker = tempfile::NamedTempFile::new().unwrap();
        let exporter = MarkdownExporter::new(blocker.path().join("nested"));

        let err = exporter.export_posts("Tech Meetup", &posts()).await.unwrap_err();
        assert!(matches!(err, DomainError::Export(_)));
    }
}
