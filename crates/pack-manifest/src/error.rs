/// Errors that can occur while loading a component manifest.
///
/// Graph problems (unknown components, cycles) are not errors here; the
/// resolver reports them in its result.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Failed to parse a TOML manifest.
    #[error("failed to parse component manifest: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to parse a YAML manifest.
    #[error("failed to parse component manifest: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    /// Failed to read a manifest file.
    #[error(transparent)]
    Fs(#[from] pack_fs::Error),

    /// Ordering requested over a set that contains a cycle.
    #[error("dependency cycle among components: {}", participants.join(", "))]
    DependencyCycle { participants: Vec<String> },

    /// A component declaration with an unusable name.
    #[error("invalid component name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, Error>;
