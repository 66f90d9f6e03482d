//! Translation of user-facing literals

use std::borrow::Cow;

use ahash::AHashMap;

/// Translates English source strings into the user's language.
pub trait Translator {
    fn translate<'a>(&'a self, source: &'a str) -> Cow<'a, str>;

    /// Translate `source` and substitute each `%s` with the next argument.
    fn translate_with(&self, source: &str, args: &[&dyn std::fmt::Display]) -> String {
        let template = self.translate(source);
        let mut out = String::with_capacity(template.len());
        let mut args = args.iter();
        let mut pieces = template.split("%s");
        if let Some(first) = pieces.next() {
            out.push_str(first);
        }
        for piece in pieces {
            match args.next() {
                Some(arg) => out.push_str(&arg.to_string()),
                None => out.push_str("%s"),
            }
            out.push_str(piece);
        }
        out
    }
}

/// Returns every string untranslated
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate<'a>(&'a self, source: &'a str) -> Cow<'a, str> {
        Cow::Borrowed(source)
    }
}

/// A fixed catalog of translations; unknown strings pass through
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    entries: AHashMap<String, String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, source: impl Into<String>, translated: impl Into<String>) -> Self {
        self.entries.insert(source.into(), translated.into());
        self
    }
}

impl Translator for Catalog {
    fn translate<'a>(&'a self, source: &'a str) -> Cow<'a, str> {
        match self.entries.get(source) {
            Some(t) => Cow::Borrowed(t.as_str()),
            None => Cow::Borrowed(source),
        }
    }
}
