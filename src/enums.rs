//! String constants as returned by ARM.
//!
//! ARM is inconsistent about casing (`Succeeded`, `succeeded`,
//! `SUCCEEDED`), and services add values faster than clients learn about
//! them. `arm_enum!` generates an enum whose parsing is case-insensitive,
//! re-cases known values to their canonical spelling and keeps anything
//! else verbatim in `Other`.

/// Declares a string-backed enum with a case-insensitive parser and an
/// `Other(String)` fallback.
///
/// ```
/// azrm::arm_enum! {
///     pub enum SkuTier {
///         Free => "Free",
///         Standard => "Standard",
///     }
/// }
///
/// let tier: SkuTier = "standard".parse().unwrap();
/// assert_eq!(tier, SkuTier::Standard);
/// assert_eq!(tier.as_str(), "Standard");
/// assert_eq!(SkuTier::from("Premium"), SkuTier::Other("Premium".to_string()));
/// ```
#[macro_export]
macro_rules! arm_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant, )+
            /// A value this build does not know about, kept as received.
            Other(String),
        }

        impl $name {
            pub const POSSIBLE_VALUES: &'static [&'static str] = &[$($value),+];

            pub fn as_str(&self) -> &str {
                match self {
                    $( Self::$variant => $value, )+
                    Self::Other(value) => value.as_str(),
                }
            }

            pub fn possible_values() -> &'static [&'static str] {
                Self::POSSIBLE_VALUES
            }

            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl ::std::str::FromStr for $name {
            type Err = ::std::convert::Infallible;

            fn from_str(input: &str) -> Result<Self, Self::Err> {
                $(
                    if input.eq_ignore_ascii_case($value) {
                        return Ok(Self::$variant);
                    }
                )+
                Ok(Self::Other(input.to_string()))
            }
        }

        impl From<&str> for $name {
            fn from(input: &str) -> Self {
                match input.parse::<$name>() {
                    Ok(value) => value,
                    Err(never) => match never {},
                }
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <String as ::serde::Deserialize>::deserialize(deserializer)?;
                Ok(Self::from(value.as_str()))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    crate::arm_enum! {
        enum DeleteOptions {
            Delete => "Delete",
            Detach => "Detach",
        }
    }

    crate::arm_enum! {
        enum GitImplementation {
            GoGit => "go-git",
            Libgit2 => "libgit2",
        }
    }

    #[test]
    fn test_parse_known_value_recased() {
        assert_eq!("delete".parse::<DeleteOptions>().unwrap(), DeleteOptions::Delete);
        assert_eq!(DeleteOptions::from("DETACH").as_str(), "Detach");
    }

    #[test]
    fn test_parse_unknown_value_kept_verbatim() {
        let value = DeleteOptions::from("Archive");
        assert_eq!(value, DeleteOptions::Other("Archive".to_string()));
        assert_eq!(value.as_str(), "Archive");
        assert!(!value.is_known());
    }

    #[test]
    fn test_possible_values_in_declaration_order() {
        assert_eq!(DeleteOptions::possible_values(), &["Delete", "Detach"]);
        assert_eq!(GitImplementation::POSSIBLE_VALUES, &["go-git", "libgit2"]);
    }

    #[test]
    fn test_value_with_punctuation() {
        assert_eq!(GitImplementation::from("GO-GIT"), GitImplementation::GoGit);
        assert_eq!(GitImplementation::GoGit.to_string(), "go-git");
    }

    #[test]
    fn test_serde_as_plain_string() {
        let decoded: DeleteOptions = serde_json::from_str("\"detach\"").unwrap();
        assert_eq!(decoded, DeleteOptions::Detach);
        assert_eq!(serde_json::to_string(&decoded).unwrap(), "\"Detach\"");

        let unknown: DeleteOptions = serde_json::from_str("\"Keep\"").unwrap();
        assert_eq!(serde_json::to_string(&unknown).unwrap(), "\"Keep\"");
    }

    #[test]
    fn test_non_string_rejected() {
        let result: Result<DeleteOptions, _> = serde_json::from_str("42");
        assert!(result.is_err());
    }
}
