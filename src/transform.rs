//! Text transformations.
//!
//! Transformations are registered by name in a
//! [`TransformationRegistry`](registry::TransformationRegistry), staged with
//! their arguments on a [`Pipeline`](pipeline::Pipeline) and applied to each
//! document in order.

pub mod annotate;
pub mod context;
pub mod pipeline;
pub mod registry;
pub mod stopwords;
pub mod text;

pub use annotate::{AnnotatedToken, Annotator, RuleBasedAnnotator};
pub use context::TransformContext;
pub use pipeline::{Pipeline, StagedTransformation};
pub use registry::{TRANSFORMATION_PREFIX, TransformFn, Transformation, TransformationRegistry};
