pub mod codec;
pub mod decl;
pub mod decor;
pub mod emitter;
pub mod error;
pub mod export;
pub mod id;
pub mod lint;
pub mod markup;
pub mod model;
pub mod parser;
pub mod project;
pub mod style;
pub mod stylesheet;

pub use codec::{Decoder, IdPolicy, deserialize, serialize, serialize_children};
pub use decl::DeclMap;
pub use emitter::{EmitMode, HtmlOptions, emit_html};
pub use error::{CodecError, ImportError, ImportResult, StyleParseError, ValidationError};
pub use export::{Bundle, export_bundle, export_static_html, strip_markup};
pub use id::{IdGen, NodeId};
pub use lint::{LintDiagnostic, LintSeverity, fix_heading_levels, lint_document, lint_unused_styles};
pub use markup::{MarkupNode, MarkupParser, mount_markup};
pub use model::*;
pub use parser::HtmlParser;
pub use project::{LegacyProject, ProjectDocument, ProjectFile, ProjectMetadata};
pub use stylesheet::{CssRule, StyleSheet};

// Re-export petgraph types so downstream crates don't need a direct dependency
pub use petgraph::graph::NodeIndex;
