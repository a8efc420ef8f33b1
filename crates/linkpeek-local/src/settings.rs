//! Environment-driven settings and the assembled [`Toolkit`].
//!
//! - `LINKPEEK_CLAMP` = `legacy` | `length`
//! - `LINKPEEK_RENDER` = `inline` | `thread`
//! - `LINKPEEK_TYPES_FILE` = JSON array of extra type declarations

use std::path::PathBuf;
use std::sync::Arc;

use linkpeek_core::{Error, RenderExecutor, Result};

use crate::decode::EntityDecoder;
use crate::executor::{InlineExecutor, RenderThread};
use crate::mime::TypeClassifier;
use crate::registry::StaticTypeRegistry;
use crate::substring::{self, ClampPolicy, TextRange};

fn env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderMode {
    #[default]
    Inline,
    Thread,
}

impl RenderMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" => Some(Self::Inline),
            "thread" => Some(Self::Thread),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub clamp: ClampPolicy,
    pub render: RenderMode,
    pub types_file: Option<PathBuf>,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(env)
    }

    /// Build settings from an arbitrary key lookup (tests pass a map instead of the process env).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut s = Self::default();
        if let Some(v) = lookup("LINKPEEK_CLAMP") {
            s.clamp = ClampPolicy::parse(&v).ok_or_else(|| {
                Error::NotConfigured(format!("LINKPEEK_CLAMP={v:?} (expected legacy|length)"))
            })?;
        }
        if let Some(v) = lookup("LINKPEEK_RENDER") {
            s.render = RenderMode::parse(&v).ok_or_else(|| {
                Error::NotConfigured(format!("LINKPEEK_RENDER={v:?} (expected inline|thread)"))
            })?;
        }
        s.types_file = lookup("LINKPEEK_TYPES_FILE").map(PathBuf::from);
        Ok(s)
    }
}

/// Decoder, type classifier and clamp policy assembled from [`Settings`].
#[derive(Debug, Clone, Default)]
pub struct Toolkit {
    pub clamp: ClampPolicy,
    pub decoder: EntityDecoder,
    pub types: TypeClassifier,
}

impl Toolkit {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let executor: Arc<dyn RenderExecutor> = match settings.render {
            RenderMode::Inline => Arc::new(InlineExecutor),
            RenderMode::Thread => Arc::new(RenderThread::spawn()?),
        };

        let mut registry = StaticTypeRegistry::builtin();
        if let Some(path) = &settings.types_file {
            registry.extend_from_file(path)?;
        }

        tracing::debug!(
            clamp = ?settings.clamp,
            render = ?settings.render,
            types = registry.len(),
            "toolkit ready"
        );
        Ok(Self {
            clamp: settings.clamp,
            decoder: EntityDecoder::new(executor),
            types: TypeClassifier::new(Arc::new(registry)),
        })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_settings(&Settings::from_env()?)
    }

    pub fn substring(&self, text: &str, start: usize, end: usize) -> String {
        substring::substring_with(text, start, end, self.clamp)
    }

    pub fn substring_range(&self, text: &str, range: TextRange) -> String {
        substring::substring_range_with(text, range, self.clamp)
    }

    pub fn decode_entities(&self, text: &str) -> String {
        self.decoder.decode(text)
    }
}
