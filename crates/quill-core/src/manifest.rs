//! Site manifest (`quill.toml`).
//!
//! ```toml
//! [output]
//! dir = "dist"
//!
//! [vars]
//! primary = "#667eea"
//!
//! [[template]]
//! name = "index"
//! source = "templates/index.sexp"
//!
//! [[style]]
//! name = "main"
//! source = "styles/main.sexp"
//! ```
//!
//! Template sources ending in `.ejs` are registered verbatim; every other
//! source is read as an S-expression document and transpiled.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use rhizome_quill_ir::{Node, ReadError, read_document};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::registry::{RegistryError, Site};

/// Errors that can occur while loading a manifest.
#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to parse {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ReadError,
    },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Where built files are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output directory, relative to the manifest
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("dist")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

/// A named source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub name: String,
    pub source: PathBuf,
}

/// Root manifest.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub output: OutputConfig,
    /// Style variables, defined before any style is registered
    #[serde(default)]
    pub vars: BTreeMap<String, String>,
    #[serde(default, rename = "template")]
    pub templates: Vec<SourceEntry>,
    #[serde(default, rename = "style")]
    pub styles: Vec<SourceEntry>,
}

impl FromStr for Manifest {
    type Err = ManifestError;

    fn from_str(contents: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(contents)?)
    }
}

impl Manifest {
    /// Load a manifest from a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        contents.parse()
    }

    /// Define the variables, then register every template and style into
    /// `site`. Source paths are resolved against `base_dir`.
    pub fn load_into(&self, base_dir: &Path, site: &mut Site) -> Result<(), ManifestError> {
        for (name, value) in &self.vars {
            site.define_var(&Node::string(name.as_str()), &Node::string(value.as_str()))?;
        }

        for entry in &self.templates {
            let path = base_dir.join(&entry.source);
            debug!(name = %entry.name, path = %path.display(), "loading template");
            let name = Node::string(entry.name.as_str());
            if path.extension().is_some_and(|ext| ext == "ejs") {
                let source = read_file(&path)?;
                site.register_template_source(&name, &Node::string(source))?;
            } else {
                site.register_template(&name, &read_source(&path)?)?;
            }
        }

        for entry in &self.styles {
            let path = base_dir.join(&entry.source);
            debug!(name = %entry.name, path = %path.display(), "loading style");
            site.register_style(&Node::string(entry.name.as_str()), &read_source(&path)?)?;
        }

        Ok(())
    }
}

fn read_file(path: &Path) -> Result<String, ManifestError> {
    fs::read_to_string(path).map_err(|source| ManifestError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn read_source(path: &Path) -> Result<Node, ManifestError> {
    let contents = read_file(path)?;
    read_document(&contents).map_err(|source| ManifestError::Read {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full() {
        let manifest: Manifest = r##"
            [output]
            dir = "public"

            [vars]
            primary = "#667eea"

            [[template]]
            name = "index"
            source = "index.sexp"

            [[style]]
            name = "main"
            source = "main.sexp"
        "##
        .parse()
        .unwrap();

        assert_eq!(manifest.output.dir, PathBuf::from("public"));
        assert_eq!(manifest.vars.get("primary").map(String::as_str), Some("#667eea"));
        assert_eq!(manifest.templates.len(), 1);
        assert_eq!(manifest.templates[0].name, "index");
        assert_eq!(manifest.styles[0].source, PathBuf::from("main.sexp"));
    }

    #[test]
    fn test_parse_defaults() {
        let manifest: Manifest = "".parse().unwrap();
        assert_eq!(manifest, Manifest::default());
        assert_eq!(manifest.output.dir, PathBuf::from("dist"));
    }

    #[test]
    fn test_parse_invalid() {
        assert!(matches!(
            "[[template]]\nname = 1".parse::<Manifest>(),
            Err(ManifestError::Toml(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let err = Manifest::from_file("/nonexistent/quill.toml").unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/quill.toml"));
    }

    #[test]
    fn test_load_into() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.sexp"),
            "'(html (body (h1 ($ title))))",
        )
        .unwrap();
        fs::write(dir.path().join("plain.ejs"), "<p><%= x %></p>").unwrap();
        fs::write(
            dir.path().join("main.sexp"),
            "'((\"h1\" (\"color\" \"var(primary)\")))",
        )
        .unwrap();

        let manifest: Manifest = r##"
            [vars]
            primary = "#667eea"

            [[template]]
            name = "index"
            source = "index.sexp"

            [[template]]
            name = "plain"
            source = "plain.ejs"

            [[style]]
            name = "main"
            source = "main.sexp"
        "##
        .parse()
        .unwrap();

        let mut site = Site::new();
        manifest.load_into(dir.path(), &mut site).unwrap();

        assert_eq!(
            site.template("index").unwrap(),
            "<html><body><h1><%= title %></h1></body></html>"
        );
        assert_eq!(site.template("plain").unwrap(), "<p><%= x %></p>");
        assert_eq!(site.style("main").unwrap(), "h1 {\n  color: #667eea;\n}\n");
    }

    #[test]
    fn test_load_into_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.sexp"), "(html (body").unwrap();

        let manifest: Manifest = "[[template]]\nname = \"broken\"\nsource = \"broken.sexp\""
            .parse()
            .unwrap();
        let err = manifest.load_into(dir.path(), &mut Site::new()).unwrap_err();
        assert!(matches!(
            err,
            ManifestError::Read {
                source: ReadError::Incomplete,
                ..
            }
        ));
    }
}
