//! Staged, ordered chain of transformations.
//!
//! # Examples
//!
//! ```
//! use textdirectory::transform::pipeline::Pipeline;
//!
//! let mut pipeline = Pipeline::default();
//! pipeline.stage("transformation_lowercase", Vec::new()).unwrap();
//! pipeline.stage("to_leetspeak", Vec::new()).unwrap();
//!
//! assert_eq!(pipeline.apply("Leetspeak").unwrap(), "133tsp34k");
//! ```

use std::fmt;
use std::sync::Arc;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TextDirectoryError};
use crate::transform::context::TransformContext;
use crate::transform::registry::TransformationRegistry;

/// A transformation queued with its arguments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagedTransformation {
    /// Registered name, including the prefix.
    pub name: String,
    /// Positional arguments.
    pub args: Vec<String>,
}

impl fmt::Display for StagedTransformation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{} {:?}", self.name, self.args)
        }
    }
}

/// Applies staged transformations left to right.
#[derive(Clone)]
pub struct Pipeline {
    registry: Arc<TransformationRegistry>,
    context: Arc<TransformContext>,
    staged: Vec<StagedTransformation>,
}

impl Pipeline {
    /// Create an empty pipeline over a registry and context.
    pub fn new(registry: Arc<TransformationRegistry>, context: Arc<TransformContext>) -> Self {
        Pipeline {
            registry,
            context,
            staged: Vec::new(),
        }
    }

    pub fn registry(&self) -> &TransformationRegistry {
        &self.registry
    }

    pub fn context(&self) -> &TransformContext {
        &self.context
    }

    /// Swap the shared context, keeping the staged transformations.
    pub fn set_context(&mut self, context: Arc<TransformContext>) {
        self.context = context;
    }

    /// Queue a transformation. The name must be registered.
    pub fn stage(&mut self, name: &str, args: Vec<String>) -> Result<()> {
        let transformation = self.registry.resolve(name)?;
        debug!("Staging {} {:?}", transformation.name, args);
        self.staged.push(StagedTransformation {
            name: transformation.name.to_string(),
            args,
        });
        Ok(())
    }

    /// Remove the first staged entry matching both name and arguments.
    pub fn unstage(&mut self, name: &str, args: &[String]) -> Result<()> {
        let full_name = self
            .registry
            .resolve(name)
            .map(|t| t.name)
            .unwrap_or(name);
        let position = self
            .staged
            .iter()
            .position(|staged| staged.name == full_name && staged.args == args)
            .ok_or_else(|| TextDirectoryError::unknown_transformation(name))?;
        self.staged.remove(position);
        Ok(())
    }

    /// Remove every staged transformation.
    pub fn clear(&mut self) {
        self.staged.clear();
    }

    pub fn staged(&self) -> &[StagedTransformation] {
        &self.staged
    }

    pub fn is_empty(&self) -> bool {
        self.staged.is_empty()
    }

    /// Run `text` through every staged transformation in order.
    pub fn apply(&self, text: &str) -> Result<String> {
        let mut current = text.to_string();
        for staged in &self.staged {
            let transformation = self.registry.resolve(&staged.name)?;
            current = (transformation.apply)(&self.context, &current, &staged.args)?;
        }
        Ok(current)
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Pipeline::new(
            Arc::new(TransformationRegistry::builtin()),
            Arc::new(TransformContext::default()),
        )
    }
}

impl fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pipeline")
            .field("staged", &self.staged)
            .field("context", &self.context)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_pipeline_is_identity() {
        let pipeline = Pipeline::default();
        assert_eq!(pipeline.apply("Some text\n").unwrap(), "Some text\n");
    }

    #[test]
    fn test_composition_order() {
        // replace then uppercase differs from uppercase then replace.
        let mut pipeline = Pipeline::default();
        pipeline
            .stage("replace_string", vec!["a".to_string(), "x".to_string()])
            .unwrap();
        pipeline.stage("uppercase", Vec::new()).unwrap();
        assert_eq!(pipeline.apply("aA").unwrap(), "XA");

        let mut reversed = Pipeline::default();
        reversed.stage("uppercase", Vec::new()).unwrap();
        reversed
            .stage("replace_string", vec!["a".to_string(), "x".to_string()])
            .unwrap();
        assert_eq!(reversed.apply("aA").unwrap(), "AA");
    }

    #[test]
    fn test_stage_unknown() {
        let mut pipeline = Pipeline::default();
        assert!(matches!(
            pipeline.stage("transformation_shout", Vec::new()),
            Err(TextDirectoryError::UnknownTransformation(_))
        ));
        assert!(pipeline.is_empty());
    }

    #[test]
    fn test_unstage_exact_match() {
        let mut pipeline = Pipeline::default();
        pipeline.stage("replace_digits", vec!["#".to_string()]).unwrap();
        pipeline.stage("replace_digits", Vec::new()).unwrap();

        assert!(pipeline.unstage("replace_digits", &["x".to_string()]).is_err());
        pipeline
            .unstage("transformation_replace_digits", &["#".to_string()])
            .unwrap();
        assert_eq!(pipeline.staged().len(), 1);
        assert!(pipeline.staged()[0].args.is_empty());

        pipeline.clear();
        assert!(pipeline.is_empty());
    }
}
