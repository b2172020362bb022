use std::path::Path;

#[derive(Debug, thiserror::Error)]
pub enum PhraseError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("phrase list is not a JSON array of strings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fallback lines when no phrase file is available.
const BUILTIN: &[&str] = &[
    "Quack!",
    "Have you tried turning it off and on again?",
    "Drink some water.",
    "It's not a bug, it's a feature.",
    "I am a doctor duck, trust me.",
    "Take a break, stretch your wings.",
];

/// Pool of things the duck can say.
#[derive(Debug, Clone, Default)]
pub struct PhraseBook {
    phrases: Vec<String>,
}

impl PhraseBook {
    pub fn builtin() -> Self {
        Self::from_lines(BUILTIN.iter().map(|s| s.to_string()))
    }

    /// Parse a JSON array of strings. Blank entries are dropped.
    pub fn from_json(text: &str) -> Result<Self, PhraseError> {
        let lines: Vec<String> = serde_json::from_str(text)?;
        Ok(Self::from_lines(lines))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PhraseError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| PhraseError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// Load `path`, falling back to the built-in list on error or if it's empty.
    pub fn load_or_builtin(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(book) if !book.is_empty() => {
                log::info!("Loaded {} phrases", book.len());
                book
            }
            Ok(_) => {
                log::warn!("Phrase file is empty; using built-in phrases");
                Self::builtin()
            }
            Err(e) => {
                log::warn!("{e}; using built-in phrases");
                Self::builtin()
            }
        }
    }

    fn from_lines(lines: impl IntoIterator<Item = String>) -> Self {
        let phrases = lines
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();
        Self { phrases }
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }

    /// Uniformly random phrase.
    pub fn pick(&self, rng: &mut fastrand::Rng) -> Option<&str> {
        if self.phrases.is_empty() {
            return None;
        }
        Some(self.phrases[rng.usize(..self.phrases.len())].as_str())
    }
}
