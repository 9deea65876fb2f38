use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use miette::Diagnostic;
use serde::Deserialize;
use thiserror::Error;

const BUILTIN: &str = include_str!("../locales/strings.json");

#[derive(Error, Debug, Diagnostic)]
pub enum LocaleError {
    #[error("locale bundle is malformed: {0}")]
    #[diagnostic(code(jsonfold::locale::malformed))]
    Malformed(String),
    #[error("locale bundle has no strings for `{0}`")]
    #[diagnostic(code(jsonfold::locale::missing))]
    Missing(Lang),
    #[error("unsupported language code `{0}`")]
    #[diagnostic(code(jsonfold::locale::unsupported), help("supported codes: en, es"))]
    Unsupported(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Lang {
    #[default]
    En,
    Es,
}

impl Lang {
    pub const ALL: [Lang; 2] = [Lang::En, Lang::Es];

    pub fn code(self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Es => "es",
        }
    }
}

impl fmt::Display for Lang {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Lang {
    type Err = LocaleError;

    fn from_str(code: &str) -> Result<Self, Self::Err> {
        Lang::ALL
            .into_iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| LocaleError::Unsupported(code.to_owned()))
    }
}

/// Labels shown around the formatter. Every field is required.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Locale {
    pub title: String,
    /// Heading of the error panel.
    pub error: String,
    pub labels: Labels,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Labels {
    /// Placeholder for an empty input pane.
    pub data: String,
    pub input: String,
    pub output: String,
}

/// Strings for every supported language, checked once at load time.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    en: Locale,
    es: Locale,
}

impl LocaleBundle {
    /// The bundle compiled into the binary.
    pub fn builtin() -> Result<Self, LocaleError> {
        Self::from_json(BUILTIN)
    }

    pub fn from_json(text: &str) -> Result<Self, LocaleError> {
        let mut raw: BTreeMap<String, Locale> =
            serde_json::from_str(text).map_err(|err| LocaleError::Malformed(err.to_string()))?;
        if let Some(code) = raw.keys().find(|code| code.parse::<Lang>().is_err()) {
            return Err(LocaleError::Unsupported(code.clone()));
        }
        let mut take = |lang: Lang| raw.remove(lang.code()).ok_or(LocaleError::Missing(lang));
        Ok(Self {
            en: take(Lang::En)?,
            es: take(Lang::Es)?,
        })
    }

    pub fn get(&self, lang: Lang) -> &Locale {
        match lang {
            Lang::En => &self.en,
            Lang::Es => &self.es,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_bundle_loads_both_languages() {
        let bundle = LocaleBundle::builtin().expect("builtin bundle");
        assert_eq!(bundle.get(Lang::En).labels.output, "Output");
        assert_eq!(bundle.get(Lang::Es).labels.output, "Salida");
        assert_ne!(bundle.get(Lang::En).title, bundle.get(Lang::Es).title);
    }

    #[test]
    fn unknown_field_is_an_error() {
        let extra = BUILTIN.replacen("\"error\"", "\"buttons\": {}, \"error\"", 1);
        let err = LocaleBundle::from_json(&extra).unwrap_err();
        assert!(matches!(err, LocaleError::Malformed(_)), "{err}");
    }

    #[test]
    fn lang_codes_round_trip() {
        for lang in Lang::ALL {
            assert_eq!(lang.code().parse::<Lang>().expect("known code"), lang);
        }
        let err = "fr".parse::<Lang>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported language code `fr`");
    }

    #[test]
    fn missing_language_is_an_error() {
        let only_en = r#"{"en": {
            "title": "t", "error": "e",
            "labels": {"data": "d", "input": "i", "output": "o"}
        }}"#;
        let err = LocaleBundle::from_json(only_en).unwrap_err();
        assert!(matches!(err, LocaleError::Missing(Lang::Es)), "{err}");
    }

    #[test]
    fn missing_field_is_an_error() {
        let partial = r#"{"en": {"title": "t"}, "es": {"title": "t"}}"#;
        let err = LocaleBundle::from_json(partial).unwrap_err();
        assert!(matches!(err, LocaleError::Malformed(_)), "{err}");
    }

    #[test]
    fn unknown_language_is_an_error() {
        let err = LocaleBundle::from_json(&BUILTIN.replacen("\"es\"", "\"de\"", 1)).unwrap_err();
        assert!(matches!(err, LocaleError::Unsupported(ref code) if code == "de"), "{err}");
    }
}
