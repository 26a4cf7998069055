//! Run-scoped interpolation variables
//!
//! Templates reference variables as `${name}`. The context starts with
//! `imageAdditionalContext` and gains one `step{N}Output` entry per
//! successful step, where `N` is the step's order index.

/// Seed variable carrying the caller's free-text image context
pub const IMAGE_CONTEXT_KEY: &str = "imageAdditionalContext";

/// Variable name under which a step's output is published
pub fn step_output_key(order_index: i32) -> String {
    format!("step{}Output", order_index)
}

/// Variable mapping for one pipeline run, kept in insertion order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpolationContext {
    variables: Vec<(String, String)>,
}

impl InterpolationContext {
    /// Create a context seeded with the image context (empty when absent)
    pub fn new(image_additional_context: Option<&str>) -> Self {
        Self {
            variables: vec![(
                IMAGE_CONTEXT_KEY.to_string(),
                image_additional_context.unwrap_or_default().to_string(),
            )],
        }
    }

    /// Publish a step's output. Existing entries are never overwritten;
    /// returns false when the key was already present.
    pub fn record_step_output(&mut self, order_index: i32, output: impl Into<String>) -> bool {
        let key = step_output_key(order_index);

        if self.contains(&key) {
            return false;
        }

        self.variables.push((key, output.into()));
        true
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.iter().any(|(key, _)| key == name)
    }

    pub fn len(&self) -> usize {
        self.variables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.variables.iter().map(|(key, _)| key.as_str())
    }

    /// Substitute every known `${name}` in `template`
    pub fn interpolate(&self, template: &str) -> String {
        interpolate(
            template,
            self.variables
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str())),
        )
    }
}

/// Replace every `${name}` occurrence, one variable at a time in the given order.
///
/// A placeholder introduced by an earlier value is resolved by a later
/// variable; unknown placeholders stay verbatim.
pub fn interpolate<'a, I>(template: &str, variables: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    variables
        .into_iter()
        .fold(template.to_string(), |text, (key, value)| {
            text.replace(&format!("${{{}}}", key), value)
        })
}
