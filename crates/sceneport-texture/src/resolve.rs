use std::fmt;
use std::path::PathBuf;

use sceneport_resource::{ResourceCache, ResourceError, ResourceKey};

/// How a raw texture reference is rewritten before it is substituted into a
/// strategy template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditPolicy {
    /// Use the reference as written (backslashes unified to `/`).
    Verbatim,
    /// Keep only the final path component. Covers exporters that bake the
    /// authoring machine's full path into the file.
    LastPathComponent,
    /// Drop drive letters, leading slashes and `./` runs but keep the
    /// relative directory structure.
    StripKnownPrefix,
}

impl EditPolicy {
    fn apply(&self, raw: &str) -> String {
        let unified = raw.replace('\\', "/");
        match self {
            Self::Verbatim => unified,
            Self::LastPathComponent => unified
                .rsplit('/')
                .next()
                .unwrap_or(unified.as_str())
                .to_owned(),
            Self::StripKnownPrefix => strip_known_prefix(&unified),
        }
    }
}

fn strip_known_prefix(reference: &str) -> String {
    let mut rest = reference;
    loop {
        let before = rest;
        if rest.len() >= 2
            && rest.as_bytes()[0].is_ascii_alphabetic()
            && rest.as_bytes()[1] == b':'
        {
            rest = &rest[2..];
        }
        rest = rest.trim_start_matches('/');
        rest = rest.strip_prefix("./").unwrap_or(rest);
        if rest == before {
            break;
        }
    }
    rest.to_owned()
}

/// One entry of the ordered texture search chain: an edit policy plus a
/// template over `{base}`, `{ref}` and `{stem}` (the edited reference with
/// its extension removed).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathEditStrategy {
    pub template: String,
    pub policy: EditPolicy,
}

impl PathEditStrategy {
    pub fn new(template: impl Into<String>, policy: EditPolicy) -> Self {
        Self {
            template: template.into(),
            policy,
        }
    }

    fn format(&self, base: &str, edited: &str) -> String {
        self.template
            .replace("{base}", base)
            .replace("{ref}", edited)
            .replace("{stem}", stem_of(edited))
    }
}

fn stem_of(edited: &str) -> &str {
    match edited.rfind('.') {
        Some(at) if !edited[at..].contains('/') => &edited[..at],
        _ => edited,
    }
}

/// Where candidate locations are formed: next to the scene file on disk, or
/// inside the archive the scene was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchBase {
    Dir(PathBuf),
    Archive { archive: PathBuf, prefix: String },
}

impl SearchBase {
    fn candidate(&self, strategy: &PathEditStrategy, edited: &str) -> ResourceKey {
        match self {
            Self::Dir(dir) => {
                let formatted = strategy.format(&dir.display().to_string(), edited);
                ResourceKey::file(formatted)
            }
            Self::Archive { archive, prefix } => {
                let formatted = strategy.format(prefix, edited);
                ResourceKey::archive_entry(archive, formatted)
            }
        }
    }
}

impl fmt::Display for SearchBase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dir(dir) => write!(f, "{}", dir.display()),
            Self::Archive { archive, prefix } if prefix.is_empty() => {
                write!(f, "{}!", archive.display())
            }
            Self::Archive { archive, prefix } => {
                write!(f, "{}!{}", archive.display(), prefix)
            }
        }
    }
}

/// Resolves raw texture references against an ordered strategy chain.
///
/// Real-world exports reference textures through inconsistent conventions
/// (absolute authoring paths, sibling `textures/` directories, wrong
/// extension case), so a single fixed lookup misses a large share of assets.
/// Strategies are tried in order and the first key the cache can open wins.
pub struct TextureResolver {
    strategies: Vec<PathEditStrategy>,
}

impl Default for TextureResolver {
    fn default() -> Self {
        Self::new(Self::default_strategies())
    }
}

impl TextureResolver {
    pub fn new(strategies: Vec<PathEditStrategy>) -> Self {
        Self { strategies }
    }

    pub fn default_strategies() -> Vec<PathEditStrategy> {
        vec![
            PathEditStrategy::new("{base}/{ref}", EditPolicy::Verbatim),
            PathEditStrategy::new("{base}/{ref}", EditPolicy::LastPathComponent),
            PathEditStrategy::new("{base}/textures/{ref}", EditPolicy::LastPathComponent),
            PathEditStrategy::new("{base}/Textures/{ref}", EditPolicy::LastPathComponent),
            PathEditStrategy::new("{base}/{ref}", EditPolicy::StripKnownPrefix),
            PathEditStrategy::new("{base}/{stem}.png", EditPolicy::LastPathComponent),
        ]
    }

    /// Returns the first candidate key the cache resolves, or `None` when
    /// the whole chain misses. A miss is not an error at this level; the
    /// caller decides what an unset texture slot means.
    pub fn resolve(
        &self,
        raw: &str,
        base: &SearchBase,
        cache: &ResourceCache,
    ) -> Option<ResourceKey> {
        for strategy in &self.strategies {
            let edited = strategy.policy.apply(raw);
            let candidate = base.candidate(strategy, &edited);

            match cache.resolve(&candidate) {
                Ok(_) => {
                    log::debug!("Texture '{raw}' resolved to {candidate}");
                    return Some(candidate);
                }
                Err(ResourceError::NotFound { .. }) => {
                    log::debug!("Texture candidate miss: {candidate}");
                }
                Err(err) => {
                    log::debug!("Texture candidate unreadable: {err}");
                }
            }
        }

        log::warn!("Failed to resolve texture reference '{raw}' under {base}");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::io::Write;

    #[test]
    fn last_path_component_drops_authoring_path() {
        let edited = EditPolicy::LastPathComponent.apply("C:\\Users\\art\\export\\wood.png");
        assert_eq!(edited, "wood.png");
    }

    #[test]
    fn strip_known_prefix_keeps_relative_structure() {
        let edited = EditPolicy::StripKnownPrefix.apply("C:\\export\\tex\\wood.png");
        assert_eq!(edited, "export/tex/wood.png");
        assert_eq!(EditPolicy::StripKnownPrefix.apply("./tex/wood.png"), "tex/wood.png");
    }

    #[test]
    fn second_strategy_wins_when_first_misses() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::create_dir(dir.path().join("textures")).expect("mkdir");
        fs::write(dir.path().join("textures/wood.png"), b"pixels").expect("write");

        let resolver = TextureResolver::new(vec![
            PathEditStrategy::new("{base}/{ref}", EditPolicy::Verbatim),
            PathEditStrategy::new("{base}/textures/{ref}", EditPolicy::LastPathComponent),
        ]);

        let cache = ResourceCache::new();
        let base = SearchBase::Dir(dir.path().to_path_buf());
        let key = resolver
            .resolve("wood.png", &base, &cache)
            .expect("resolved");
        assert_eq!(
            key,
            ResourceKey::file(dir.path().join("textures/wood.png"))
        );
    }

    #[test]
    fn extension_substitution_finds_converted_texture() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("wood.png"), b"pixels").expect("write");

        let resolver = TextureResolver::default();
        let cache = ResourceCache::new();
        let base = SearchBase::Dir(dir.path().to_path_buf());

        let key = resolver
            .resolve("wood.tga", &base, &cache)
            .expect("resolved via extension substitution");
        assert_eq!(key, ResourceKey::file(dir.path().join("wood.png")));
    }

    #[test]
    fn unresolvable_reference_returns_none() {
        let dir = tempfile::tempdir().expect("tempdir");
        let resolver = TextureResolver::default();
        let cache = ResourceCache::new();
        let base = SearchBase::Dir(dir.path().to_path_buf());

        assert!(resolver.resolve("missing.png", &base, &cache).is_none());
    }

    #[test]
    fn archive_base_forms_entry_keys() {
        let dir = tempfile::tempdir().expect("tempdir");
        let archive_path = dir.path().join("scene.zip");
        let file = fs::File::create(&archive_path).expect("create archive");
        let mut writer = zip::ZipWriter::new(file);
        let options = zip::write::SimpleFileOptions::default();
        writer
            .start_file("textures/wood.png", options)
            .expect("start entry");
        writer.write_all(b"pixels").expect("write entry");
        writer.finish().expect("finish");

        let resolver = TextureResolver::default();
        let cache = ResourceCache::new();
        let base = SearchBase::Archive {
            archive: archive_path.clone(),
            prefix: String::new(),
        };

        let key = resolver
            .resolve("textures/wood.png", &base, &cache)
            .expect("resolved in archive");
        assert_eq!(
            key,
            ResourceKey::archive_entry(&archive_path, "textures/wood.png")
        );
    }
}
