//! Binding declarations for every handler parameter the router mounts.

use common::{AdviceCardFilter, CategoryFilter, CreateAdviceCardCommand, CreateDogCommand};

use crate::binding::{Bindable, ParameterDecl};

impl Bindable for CreateDogCommand {
    const PARAMETER: &'static str = "create_dog.request";
}

impl Bindable for CreateAdviceCardCommand {
    const PARAMETER: &'static str = "create_advice_card.request";
}

impl Bindable for AdviceCardFilter {
    const PARAMETER: &'static str = "list_advice_cards.filter";
}

impl Bindable for CategoryFilter {
    const PARAMETER: &'static str = "list_categories.filter";
}

/// Parameters a handler extracts with `Bound<T>`. Each must have a descriptor
/// before the router is served.
pub(super) const REQUIRED: &[&str] = &[
    CreateDogCommand::PARAMETER,
    CreateAdviceCardCommand::PARAMETER,
    AdviceCardFilter::PARAMETER,
    CategoryFilter::PARAMETER,
];

pub(super) fn declarations() -> Vec<ParameterDecl> {
    vec![
        ParameterDecl::of::<CreateDogCommand>().from_body(),
        ParameterDecl::of::<CreateAdviceCardCommand>().from_body(),
        ParameterDecl::of::<AdviceCardFilter>().from_query(),
        ParameterDecl::of::<CategoryFilter>().from_query(),
        // Path segments go through `PathParam`, not the registry.
        ParameterDecl::named("get_dog.id", "uuid::Uuid"),
        ParameterDecl::named("list_advice_cards.dog_id", "uuid::Uuid"),
        ParameterDecl::named("create_advice_card.dog_id", "uuid::Uuid"),
    ]
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::binding::{BindingRegistry, BindingSource};

    #[test]
    fn test_declarations_cover_required_parameters() {
        let registry = BindingRegistry::build(declarations()).unwrap();
        for parameter in REQUIRED {
            assert!(registry.require(parameter).is_ok(), "{parameter} unbound");
        }
        assert_eq!(registry.len(), REQUIRED.len());
    }

    #[test]
    fn test_declared_sources() {
        let registry = BindingRegistry::build(declarations()).unwrap();
        assert_eq!(
            registry.describe(CreateDogCommand::PARAMETER).unwrap().source(),
            BindingSource::Body
        );
        assert_eq!(
            registry
                .describe(CreateAdviceCardCommand::PARAMETER)
                .unwrap()
                .source(),
            BindingSource::Body
        );
        assert_eq!(
            registry.describe(AdviceCardFilter::PARAMETER).unwrap().source(),
            BindingSource::Query
        );
        assert_eq!(
            registry.describe(CategoryFilter::PARAMETER).unwrap().source(),
            BindingSource::Query
        );
        assert!(registry.describe("get_dog.id").is_none());
    }
}
