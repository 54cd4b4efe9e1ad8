//! Build manifests: the declarative package and target listing the driver
//! feeds into the graph.
//!
//! ```toml
//! [[package]]
//! name = "proto"
//!
//! [[package.target]]
//! name = "api"
//! provides = { go = [":api_go"] }
//!
//! [[package.target]]
//! name = "api_go"
//! outputs = ["api.pb.go"]
//! ```
//!
//! Labels inside a package may be written relative to it (`:api_go`). Sources,
//! tools and data starting with `//` or `:` are labels, anything else is a file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use plinth_graph::{BuildInput, BuildLabel, BuildTarget, LabelError};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in manifest {}: {source}", path.display())]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in manifest {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("bad label in package '{package}': {source}")]
    Label {
        package: String,
        #[source]
        source: LabelError,
    },
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Manifest {
    #[serde(default, rename = "package")]
    pub packages: Vec<PackageSpec>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PackageSpec {
    pub name: String,

    #[serde(default, rename = "target")]
    pub targets: Vec<TargetSpec>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TargetSpec {
    pub name: String,
    pub outputs: Vec<String>,
    pub srcs: Vec<String>,
    pub deps: Vec<String>,
    pub tools: Vec<String>,
    pub data: Vec<String>,
    pub requires: Vec<String>,
    pub provides: IndexMap<String, Vec<String>>,
    pub test: bool,
}

impl Manifest {
    /// Read a manifest, choosing the format from the file extension. Anything
    /// other than `.json` is parsed as TOML.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let text = fs::read_to_string(path).map_err(|source| ManifestError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            serde_json::from_str(&text).map_err(|source| ManifestError::Json {
                path: path.to_path_buf(),
                source,
            })
        } else {
            toml::from_str(&text).map_err(|source| ManifestError::Toml {
                path: path.to_path_buf(),
                source,
            })
        }
    }

    pub fn target_count(&self) -> usize {
        self.packages.iter().map(|p| p.targets.len()).sum()
    }
}

impl PackageSpec {
    fn label(&self, text: &str) -> Result<BuildLabel, ManifestError> {
        BuildLabel::parse_relative(text, &self.name).map_err(|source| ManifestError::Label {
            package: self.name.clone(),
            source,
        })
    }

    fn input(&self, text: &str) -> Result<BuildInput, ManifestError> {
        if text.starts_with("//") || text.starts_with(':') {
            Ok(BuildInput::Label(self.label(text)?))
        } else {
            Ok(BuildInput::File(text.to_string()))
        }
    }

    /// Turn a target entry into a [`BuildTarget`]. Its `deps` are declared,
    /// and so are any tools or data given as labels, since those must be
    /// built before the target as well.
    pub fn build_target(&self, spec: &TargetSpec) -> Result<BuildTarget, ManifestError> {
        let label = BuildLabel::new(self.name.as_str(), spec.name.as_str()).map_err(|source| {
            ManifestError::Label {
                package: self.name.clone(),
                source,
            }
        })?;

        let mut builder = BuildTarget::builder(label)
            .outputs(spec.outputs.iter().cloned())
            .test(spec.test);
        for src in &spec.srcs {
            builder = builder.source(self.input(src)?);
        }
        for tag in &spec.requires {
            builder = builder.requires(tag.as_str());
        }
        for (tag, labels) in &spec.provides {
            for text in labels {
                builder = builder.provide(tag.as_str(), self.label(text)?);
            }
        }
        for dep in &spec.deps {
            builder = builder.dependency(self.label(dep)?);
        }
        for tool in &spec.tools {
            let input = self.input(tool)?;
            if let Some(label) = input.label() {
                builder = builder.dependency(label.clone());
            }
            builder = builder.tool(input);
        }
        for data in &spec.data {
            let input = self.input(data)?;
            if let Some(label) = input.label() {
                builder = builder.dependency(label.clone());
            }
            builder = builder.data(input);
        }
        Ok(builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOML: &str = r#"
[[package]]
name = "app"

[[package.target]]
name = "server"
srcs = ["main.go", ":embed"]
deps = ["//proto:api", ":util"]
tools = ["//tools:gen"]
data = ["config.yaml"]
requires = ["go"]

[[package.target]]
name = "util"
test = true

[[package]]
name = "proto"

[[package.target]]
name = "api"
provides = { go = [":api_go"], py = ["//proto/py:api"] }
"#;

    fn label(text: &str) -> BuildLabel {
        BuildLabel::parse(text).unwrap()
    }

    #[test]
    fn test_parse_toml_manifest() {
        let manifest: Manifest = toml::from_str(TOML).unwrap();
        assert_eq!(manifest.packages.len(), 2);
        assert_eq!(manifest.target_count(), 3);
        assert_eq!(manifest.packages[0].targets[0].deps, vec!["//proto:api", ":util"]);
    }

    #[test]
    fn test_build_target_resolves_relative_labels() {
        let manifest: Manifest = toml::from_str(TOML).unwrap();
        let app = &manifest.packages[0];
        let server = app.build_target(&app.targets[0]).unwrap();

        assert_eq!(server.label, label("//app:server"));
        assert_eq!(
            server.declared_dependencies(),
            vec![label("//proto:api"), label("//app:util"), label("//tools:gen")]
        );
        assert_eq!(server.requires, vec!["go".to_string()]);
        assert_eq!(
            server.sources,
            vec![
                BuildInput::File("main.go".to_string()),
                BuildInput::Label(label("//app:embed")),
            ]
        );
        assert!(server.uses_as_tool_or_data(&label("//tools:gen")));
        assert!(app.build_target(&app.targets[1]).unwrap().is_test);
    }

    #[test]
    fn test_build_target_reads_provides() {
        let manifest: Manifest = toml::from_str(TOML).unwrap();
        let proto = &manifest.packages[1];
        let api = proto.build_target(&proto.targets[0]).unwrap();

        assert_eq!(api.provides()["go"], vec![label("//proto:api_go")]);
        assert_eq!(api.provides()["py"], vec![label("//proto/py:api")]);
    }

    #[test]
    fn test_bad_label_names_package() {
        let package = PackageSpec {
            name: "app".to_string(),
            targets: vec![TargetSpec {
                name: "server".to_string(),
                deps: vec!["proto:api".to_string()],
                ..Default::default()
            }],
        };
        let err = package.build_target(&package.targets[0]).unwrap_err();
        assert!(matches!(err, ManifestError::Label { ref package, .. } if package == "app"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result: Result<Manifest, _> = toml::from_str("[[package]]\nname = \"a\"\nsrcs = []\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_load_json_by_extension() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("BUILD.json");
        fs::write(
            &path,
            r#"{"package": [{"name": "a", "target": [{"name": "a", "deps": ["//b:b"]}]}]}"#,
        )
        .unwrap();

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.packages[0].targets[0].deps, vec!["//b:b"]);
    }

    #[test]
    fn test_load_missing_file() {
        let err = Manifest::load(Path::new("/nonexistent/BUILD.toml")).unwrap_err();
        assert!(matches!(err, ManifestError::Io { .. }));
    }
}
