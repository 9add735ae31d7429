#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Fixed literal such as `subscriptions` or `resourceGroups`.
    Static(&'static str),
    /// Resource provider namespace such as `Microsoft.Network`.
    ResourceProvider(&'static str),
    UserSpecified,
    /// One of a closed set of values, e.g. a DNS record type.
    Constant(&'static [&'static str]),
    /// Any parent resource ID, possibly spanning many components.
    Scope,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SegmentKind,
    pub name: &'static str,
    pub example: &'static str,
}

impl Segment {
    pub fn static_segment(name: &'static str, value: &'static str) -> Self {
        Self {
            kind: SegmentKind::Static(value),
            name,
            example: value,
        }
    }

    pub fn resource_provider(name: &'static str, value: &'static str) -> Self {
        Self {
            kind: SegmentKind::ResourceProvider(value),
            name,
            example: value,
        }
    }

    pub fn user_specified(name: &'static str, example: &'static str) -> Self {
        Self {
            kind: SegmentKind::UserSpecified,
            name,
            example,
        }
    }

    pub fn subscription_id() -> Self {
        Self::user_specified("subscriptionId", "12345678-1234-9876-4563-123456789012")
    }

    pub fn resource_group() -> Self {
        Self::user_specified("resourceGroupName", "example-resource-group")
    }

    pub fn constant(name: &'static str, possible_values: &'static [&'static str]) -> Self {
        Self {
            kind: SegmentKind::Constant(possible_values),
            name,
            example: possible_values.first().copied().unwrap_or("value"),
        }
    }

    pub fn scope(name: &'static str) -> Self {
        Self {
            kind: SegmentKind::Scope,
            name,
            example: "/subscriptions/12345678-1234-9876-4563-123456789012/resourceGroups/some-resource-group",
        }
    }

    /// Whether the value for this segment is carried by the ID rather than fixed.
    pub fn holds_value(&self) -> bool {
        matches!(
            self.kind,
            SegmentKind::UserSpecified | SegmentKind::Constant(_) | SegmentKind::Scope
        )
    }

    /// Human label derived from the camelCase name, `subscriptionId` -> `Subscription`.
    pub fn label(&self) -> String {
        if self.name == "subscriptionId" {
            return "Subscription".to_string();
        }

        let mut label = String::with_capacity(self.name.len() + 4);
        for (i, c) in self.name.chars().enumerate() {
            if i == 0 {
                label.extend(c.to_uppercase());
            } else if c.is_ascii_uppercase() {
                label.push(' ');
                label.push(c);
            } else {
                label.push(c);
            }
        }
        label
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_camel_case() {
        assert_eq!(Segment::resource_group().label(), "Resource Group Name");
        assert_eq!(
            Segment::user_specified("managedClusterName", "cluster1").label(),
            "Managed Cluster Name"
        );
    }

    #[test]
    fn test_label_subscription_special_case() {
        assert_eq!(Segment::subscription_id().label(), "Subscription");
    }

    #[test]
    fn test_holds_value() {
        assert!(Segment::resource_group().holds_value());
        assert!(Segment::scope("scope").holds_value());
        assert!(Segment::constant("recordType", &["A", "AAAA"]).holds_value());
        assert!(!Segment::static_segment("staticSubscriptions", "subscriptions").holds_value());
        assert!(!Segment::resource_provider("staticMicrosoftNetwork", "Microsoft.Network").holds_value());
    }

    #[test]
    fn test_constant_example_is_first_value() {
        let segment = Segment::constant("recordType", &["A", "AAAA"]);
        assert_eq!(segment.example, "A");
    }
}
