//! Tag helper binding data attached to tag-helper elements by the parser.

use serde::{Deserialize, Serialize};

/// What kind of descriptor matched a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptorKind {
    /// A component (`.razor` file or component class).
    Component,
    /// The child-content parameter of a component.
    ComponentChildContent,
    /// A classic tag helper, typically matched by attribute only.
    TagHelper,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHelperDescriptor {
    pub name: String,
    pub kind: DescriptorKind,
}

impl TagHelperDescriptor {
    pub fn new(name: impl Into<String>, kind: DescriptorKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    pub fn is_component(&self) -> bool {
        matches!(
            self.kind,
            DescriptorKind::Component | DescriptorKind::ComponentChildContent
        )
    }
}

/// The descriptors bound to one tag-helper element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagHelperBinding {
    pub descriptors: Vec<TagHelperDescriptor>,
}

impl TagHelperBinding {
    pub fn new(descriptors: Vec<TagHelperDescriptor>) -> Self {
        Self { descriptors }
    }

    /// True when at least one descriptor is bound and every bound descriptor is a component.
    pub fn is_all_components(&self) -> bool {
        !self.descriptors.is_empty() && self.descriptors.iter().all(|d| d.is_component())
    }
}
