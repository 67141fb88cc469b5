// src/config/model.rs

use serde::Deserialize;

/// File name looked up at the repository root.
pub const CONFIG_FILE_NAME: &str = "Bake.toml";

/// Intermediate files produced by the TeX-to-HTML toolchain for a document.
///
/// These are removed before every compile and again after a failed one.
pub const DEFAULT_INTERMEDIATE_EXTENSIONS: &[&str] = &[
    "aux", "4ct", "4tc", "oc", "md5", "dpth", "out", "jax", "idv", "lg", "tmp", "xref", "mw",
    "ids", "auxlock", "dvi", "pdf", "scmd", "sout",
];

/// Raw configuration as read from `Bake.toml`.
///
/// Every section is optional:
///
/// ```toml
/// [build]
/// jobs = 4
/// source_extension = "tex"
/// output_extension = "html"
/// exclude = ["**/_minted*/**"]
///
/// [compile]
/// cmd = "xmlatex texHtml {file}"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawConfigFile {
    #[serde(default)]
    pub build: BuildSection,

    #[serde(default)]
    pub compile: CompileSection,
}

/// Validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see `validate.rs`) or
/// [`ConfigFile::default`], so the rest of the crate can rely on its
/// invariants.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    build: BuildSection,
    compile: CompileSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(build: BuildSection, compile: CompileSection) -> Self {
        Self { build, compile }
    }

    pub fn build(&self) -> &BuildSection {
        &self.build
    }

    pub fn compile(&self) -> &CompileSection {
        &self.compile
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self::new_unchecked(BuildSection::default(), CompileSection::default())
    }
}

/// `[build]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct BuildSection {
    /// Worker count used when `-j` is not given. Zero or negative means
    /// "use the built-in default".
    #[serde(default)]
    pub jobs: i64,

    /// Extension (without dot) of buildable source documents.
    #[serde(default = "default_source_extension")]
    pub source_extension: String,

    /// Extension (without dot) of the artifact produced for each document.
    #[serde(default = "default_output_extension")]
    pub output_extension: String,

    /// Glob patterns (relative to the repository root) that are never
    /// considered build candidates.
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn default_source_extension() -> String {
    "tex".to_string()
}

fn default_output_extension() -> String {
    "html".to_string()
}

impl Default for BuildSection {
    fn default() -> Self {
        Self {
            jobs: 0,
            source_extension: default_source_extension(),
            output_extension: default_output_extension(),
            exclude: Vec::new(),
        }
    }
}

/// `[compile]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct CompileSection {
    /// Shell command run in the document's directory.
    ///
    /// `{file}` expands to the document's file name, `{stem}` to the file
    /// name without extension.
    #[serde(default = "default_cmd")]
    pub cmd: String,

    /// Extensions (without dot) of intermediate files to clean around a
    /// compile.
    #[serde(default = "default_intermediate_extensions")]
    pub intermediate_extensions: Vec<String>,
}

fn default_cmd() -> String {
    "xmlatex texHtml {file}".to_string()
}

fn default_intermediate_extensions() -> Vec<String> {
    DEFAULT_INTERMEDIATE_EXTENSIONS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for CompileSection {
    fn default() -> Self {
        Self {
            cmd: default_cmd(),
            intermediate_extensions: default_intermediate_extensions(),
        }
    }
}
