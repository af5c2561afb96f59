//! Image argument parsing.
//!
//! Three command-line shapes name the same retag:
//!
//! - `retag acme/widget:1.0.0 1.0.1`
//! - `retag acme/widget@sha256:... 1.0.1`
//! - `retag acme/widget 1.0.0 1.0.1`

#[cfg(test)]
#[path = "args_tests.rs"]
mod args_tests;

const DIGEST_PREFIX: &str = "sha256:";

/// A fully resolved retag request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetagArgs {
    /// Repository name, e.g. `acme/widget`
    pub repository: String,
    /// Source tag or `sha256:` digest
    pub source: String,
    /// Tag to create or move
    pub new_tag: String,
}

impl RetagArgs {
    /// Resolves the positional arguments into a retag request.
    pub fn parse(image: &str, tag: &str, new_tag: Option<&str>) -> Result<Self, String> {
        let (repository, source, new_tag) = match new_tag {
            Some(new_tag) => {
                if split_reference(image).is_some() {
                    return Err(format!(
                        "image {:?} already names a tag or digest; pass the repository alone",
                        image
                    ));
                }
                (image, tag, new_tag)
            }
            None => {
                let (repository, source) = split_reference(image).ok_or_else(|| {
                    format!("image {:?} is missing a source tag or digest", image)
                })?;
                if image.contains('@') && !source.starts_with(DIGEST_PREFIX) {
                    return Err(format!(
                        "digest {:?} must start with {:?}",
                        source, DIGEST_PREFIX
                    ));
                }
                (repository, source, tag)
            }
        };

        if repository.is_empty() {
            return Err("repository name cannot be empty".to_string());
        }
        if source.is_empty() {
            return Err("source tag cannot be empty".to_string());
        }
        validate_tag(new_tag)?;

        Ok(Self {
            repository: repository.to_string(),
            source: source.to_string(),
            new_tag: new_tag.to_string(),
        })
    }

    /// Returns true when the source is a content digest rather than a tag.
    pub fn source_is_digest(&self) -> bool {
        self.source.starts_with(DIGEST_PREFIX)
    }

    /// Formats the source as `repo:tag` or `repo@digest`.
    pub fn source_display(&self) -> String {
        let separator = if self.source_is_digest() { '@' } else { ':' };
        format!("{}{}{}", self.repository, separator, self.source)
    }

    /// Formats the destination as `repo:new_tag`.
    pub fn destination_display(&self) -> String {
        format!("{}:{}", self.repository, self.new_tag)
    }
}

/// Splits `repo@digest` or `repo:tag`; returns None for a bare repository.
///
/// A colon before the last `/` belongs to a registry port, not a tag.
fn split_reference(image: &str) -> Option<(&str, &str)> {
    if let Some((repository, digest)) = image.split_once('@') {
        return Some((repository, digest));
    }

    let name_start = image.rfind('/').map_or(0, |i| i + 1);
    image[name_start..]
        .rfind(':')
        .map(|i| (&image[..name_start + i], &image[name_start + i + 1..]))
}

fn validate_tag(tag: &str) -> Result<(), String> {
    if tag.is_empty() {
        return Err("new tag cannot be empty".to_string());
    }
    if let Some(c) = tag.chars().find(|c| matches!(c, ':' | '@' | '/')) {
        return Err(format!("new tag {:?} cannot contain {:?}", tag, c));
    }
    Ok(())
}
