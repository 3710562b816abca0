//! Template resolution and macro expansion.
//!
//! A template reference is tried, in order, as a filesystem path, as a
//! vendor-namespaced built-in and finally as inline template source. Lines
//! starting with `Value` have their `#NAME#` placeholders replaced with
//! fragments from a [`FragmentRegistry`].

pub mod builtin;
mod fragments;

use std::path::Path;

use log::debug;
use serde::Serialize;

pub use fragments::FragmentRegistry;

use crate::error::TemplateError;

/// A template ready for the pattern matcher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionTemplate {
    pub vendor: String,
    /// Logical name, path, or `<inline>`.
    pub name: String,
    /// Source as found.
    pub raw: String,
    /// Source after macro expansion.
    pub resolved: String,
}

/// Resolves template references against paths, built-ins and inline source.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    fragments: FragmentRegistry,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new(FragmentRegistry::builtin())
    }
}

impl TemplateResolver {
    pub fn new(fragments: FragmentRegistry) -> Self {
        Self { fragments }
    }

    pub fn fragments(&self) -> &FragmentRegistry {
        &self.fragments
    }

    pub fn fragments_mut(&mut self) -> &mut FragmentRegistry {
        &mut self.fragments
    }

    /// Resolve `reference` for `vendor` and expand its macros.
    pub fn resolve(
        &self,
        vendor: &str,
        reference: &str,
    ) -> Result<ExtractionTemplate, TemplateError> {
        let (name, raw) = self.load(vendor, reference)?;
        let resolved = self.expand(&name, &raw)?;
        Ok(ExtractionTemplate {
            vendor: vendor.to_string(),
            name,
            raw,
            resolved,
        })
    }

    fn load(&self, vendor: &str, reference: &str) -> Result<(String, String), TemplateError> {
        let path = Path::new(reference);
        if !reference.contains('\n') && path.is_file() {
            debug!("loading template from {}", path.display());
            let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
                path: reference.to_string(),
                source,
            })?;
            return Ok((reference.to_string(), raw));
        }

        if let Some(raw) = builtin::lookup(vendor, reference) {
            return Ok((reference.to_string(), raw.to_string()));
        }

        if reference.contains("Value") && reference.contains("Start") {
            return Ok(("<inline>".to_string(), reference.to_string()));
        }

        Err(TemplateError::NotFound {
            vendor: vendor.to_string(),
            name: reference.to_string(),
        })
    }

    /// Replace `#NAME#` placeholders on `Value` lines.
    fn expand(&self, template: &str, raw: &str) -> Result<String, TemplateError> {
        let mut lines = Vec::new();
        for line in raw.lines() {
            if line.starts_with("Value") {
                lines.push(self.expand_line(template, line)?);
            } else {
                lines.push(line.to_string());
            }
        }
        Ok(lines.join("\n"))
    }

    fn expand_line(&self, template: &str, line: &str) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(line.len());
        let mut rest = line;

        while let Some(start) = rest.find('#') {
            let after = &rest[start + 1..];
            match after.find('#') {
                Some(end) if end > 0 && after[..end].chars().all(is_word) => {
                    let name = &after[..end];
                    let fragment =
                        self.fragments
                            .get(name)
                            .ok_or_else(|| TemplateError::UnresolvedMacro {
                                template: template.to_string(),
                                fragment: name.to_string(),
                            })?;
                    out.push_str(&rest[..start]);
                    out.push_str(fragment);
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push_str(&rest[..=start]);
                    rest = after;
                }
            }
        }

        out.push_str(rest);
        Ok(out)
    }
}

fn is_word(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}
