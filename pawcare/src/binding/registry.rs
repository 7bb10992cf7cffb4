use std::any::type_name;
use std::collections::{HashMap, HashSet};
use std::fmt;

use super::Bindable;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingSource {
    Body,
    Query,
}

impl fmt::Display for BindingSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Body => write!(f, "body"),
            Self::Query => write!(f, "query"),
        }
    }
}

/// Where one handler parameter is read from, and what it is read into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDescriptor {
    parameter: &'static str,
    target_type: &'static str,
    source: BindingSource,
}

impl BindingDescriptor {
    #[must_use]
    pub const fn parameter(&self) -> &'static str {
        self.parameter
    }

    #[must_use]
    pub const fn target_type(&self) -> &'static str {
        self.target_type
    }

    #[must_use]
    pub const fn source(&self) -> BindingSource {
        self.source
    }
}

/// Declaration of a handler parameter and the source markers attached to it.
#[derive(Debug, Clone)]
pub struct ParameterDecl {
    parameter: &'static str,
    target_type: &'static str,
    markers: Vec<BindingSource>,
}

impl ParameterDecl {
    /// Declares the parameter of a pipeline-bound type, without any marker yet.
    #[must_use]
    pub fn of<T: Bindable>() -> Self {
        Self::named(T::PARAMETER, type_name::<T::Input>())
    }

    #[must_use]
    pub const fn named(parameter: &'static str, target_type: &'static str) -> Self {
        Self {
            parameter,
            target_type,
            markers: Vec::new(),
        }
    }

    #[must_use]
    pub fn from_body(mut self) -> Self {
        self.markers.push(BindingSource::Body);
        self
    }

    #[must_use]
    pub fn from_query(mut self) -> Self {
        self.markers.push(BindingSource::Query);
        self
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("parameter '{0}' carries both a body and a query marker")]
    AmbiguousSource(&'static str),
    #[error("parameter '{0}' is declared more than once")]
    DuplicateParameter(&'static str),
    #[error("no binding descriptor for parameter '{0}'")]
    MissingDescriptor(&'static str),
}

/// Read-only table of descriptors, built once before the first request.
#[derive(Debug, Default)]
pub struct BindingRegistry {
    descriptors: HashMap<&'static str, BindingDescriptor>,
    passthrough: HashSet<&'static str>,
}

impl BindingRegistry {
    pub fn build<I>(decls: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = ParameterDecl>,
    {
        let mut registry = Self::default();

        for decl in decls {
            if registry.descriptors.contains_key(decl.parameter)
                || registry.passthrough.contains(decl.parameter)
            {
                return Err(ConfigurationError::DuplicateParameter(decl.parameter));
            }

            let body = decl.markers.contains(&BindingSource::Body);
            let query = decl.markers.contains(&BindingSource::Query);
            let source = match (body, query) {
                (true, true) => return Err(ConfigurationError::AmbiguousSource(decl.parameter)),
                (true, false) => BindingSource::Body,
                (false, true) => BindingSource::Query,
                (false, false) => {
                    registry.passthrough.insert(decl.parameter);
                    continue;
                }
            };

            registry.descriptors.insert(
                decl.parameter,
                BindingDescriptor {
                    parameter: decl.parameter,
                    target_type: decl.target_type,
                    source,
                },
            );
        }

        Ok(registry)
    }

    /// `None` means the parameter is resolved by some other mechanism.
    #[must_use]
    pub fn describe(&self, parameter: &str) -> Option<&BindingDescriptor> {
        self.descriptors.get(parameter)
    }

    /// Startup check for a parameter that must go through the pipeline.
    pub fn require(&self, parameter: &'static str) -> Result<&BindingDescriptor, ConfigurationError> {
        self.describe(parameter)
            .ok_or(ConfigurationError::MissingDescriptor(parameter))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}
