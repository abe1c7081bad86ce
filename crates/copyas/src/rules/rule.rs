//! Rule and Filter types for HTML conversion.

use crate::node::NodeRef;
use crate::service::ConversionOptions;

/// Type alias for replacement functions
pub type ReplacementFn = Box<dyn Fn(&NodeRef, &str, &ConversionOptions) -> String + Send + Sync>;

/// Type alias for filter predicates
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &ConversionOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &ConversionOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node. `tag` is the lowercase tag name.
    pub fn matches(&self, tag: &str, node: &NodeRef, options: &ConversionOptions) -> bool {
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
            Filter::Predicate(f) => f(tag, node, options),
        }
    }
}

/// A rule defines how to convert a matched HTML element to dialect text
pub struct Rule {
    /// Name used in diagnostics only
    pub name: String,
    /// Filter to determine which elements this rule applies to
    pub filter: Filter,
    /// Replacement function receiving the node, its reduced children and options
    pub replacement: ReplacementFn,
}

impl Rule {
    /// Create a new rule
    pub fn new<F>(name: &str, filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConversionOptions) -> String + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(name: &str, tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConversionOptions) -> String + Send + Sync + 'static,
    {
        Self::new(name, Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(name: &str, tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &ConversionOptions) -> String + Send + Sync + 'static,
    {
        Self::new(name, Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(&self, node: &NodeRef, content: &str, options: &ConversionOptions) -> String {
        (self.replacement)(node, content, options)
    }
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish_non_exhaustive()
    }
}
