//! Polymorphic ARM payloads.
//!
//! Many ARM models are unions: a string field (`@odata.type`, `type`,
//! `kind`, `authType`, ...) names the concrete shape of the object.
//! `discriminated_union!` decodes such an object into the matching variant
//! and falls back to [`RawUnion`] when the tag is absent or unknown, so a
//! service adding a new shape never breaks decoding.

use serde::Serialize;
use serde_json::Value;

/// An object whose discriminator was missing or not recognised.
#[derive(Debug, Clone, PartialEq)]
pub struct RawUnion {
    pub tag: Option<String>,
    pub values: Value,
}

/// Reads the string discriminator `field` from a JSON object.
pub fn discriminator<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str)
}

/// Serialises `inner` and stamps the canonical tag onto the resulting object.
pub fn encode_tagged<T: Serialize>(
    inner: &T,
    field: &str,
    tag: &str,
) -> Result<Value, serde_json::Error> {
    let mut value = serde_json::to_value(inner)?;
    if let Value::Object(map) = &mut value {
        map.insert(field.to_string(), Value::String(tag.to_string()));
    }
    Ok(value)
}

/// Declares a discriminated union decoded by the tag field given after the
/// enum name. Tag comparison ignores case; encoding always writes the
/// canonical tag.
#[macro_export]
macro_rules! discriminated_union {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident($ty:ty) => $tag:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis enum $name {
            $( $(#[$vmeta])* $variant($ty), )+
            Raw($crate::unions::RawUnion),
        }

        impl $name {
            pub const TAG_FIELD: &'static str = $field;

            pub fn tag(&self) -> Option<&str> {
                match self {
                    $( Self::$variant(_) => Some($tag), )+
                    Self::Raw(raw) => raw.tag.as_deref(),
                }
            }

            pub fn is_raw(&self) -> bool {
                matches!(self, Self::Raw(_))
            }
        }

        impl ::serde::Serialize for $name {
            fn serialize<S: ::serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                let value = match self {
                    $(
                        Self::$variant(inner) => $crate::unions::encode_tagged(inner, $field, $tag)
                            .map_err(<S::Error as ::serde::ser::Error>::custom)?,
                    )+
                    Self::Raw(raw) => raw.values.clone(),
                };
                ::serde::Serialize::serialize(&value, serializer)
            }
        }

        impl<'de> ::serde::Deserialize<'de> for $name {
            fn deserialize<D: ::serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = <::serde_json::Value as ::serde::Deserialize>::deserialize(deserializer)?;
                let tag = $crate::unions::discriminator(&value, $field).map(str::to_string);

                $(
                    if tag.as_deref().is_some_and(|t| t.eq_ignore_ascii_case($tag)) {
                        return ::serde_json::from_value::<$ty>(value)
                            .map(Self::$variant)
                            .map_err(<D::Error as ::serde::de::Error>::custom);
                    }
                )+

                Ok(Self::Raw($crate::unions::RawUnion { tag, values: value }))
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use serde::{Deserialize, Serialize};
    use serde_json::json;

    use super::*;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct HttpRoute {
        path: String,
    }

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct RedirectRoute {
        target: String,
        permanent: bool,
    }

    crate::discriminated_union! {
        enum Route: "type" {
            Http(HttpRoute) => "Http",
            Redirect(RedirectRoute) => "Redirect",
        }
    }

    #[test]
    fn test_discriminator_reads_string_field() {
        let value = json!({"type": "Http", "n": 1});
        assert_eq!(discriminator(&value, "type"), Some("Http"));
        assert_eq!(discriminator(&value, "n"), None);
        assert_eq!(discriminator(&value, "missing"), None);
    }

    #[test]
    fn test_decode_selects_variant() {
        let route: Route =
            serde_json::from_value(json!({"type": "Redirect", "target": "/new", "permanent": true}))
                .unwrap();
        assert_eq!(
            route,
            Route::Redirect(RedirectRoute {
                target: "/new".to_string(),
                permanent: true
            })
        );
        assert_eq!(route.tag(), Some("Redirect"));
    }

    #[test]
    fn test_decode_tag_is_case_insensitive() {
        let route: Route = serde_json::from_value(json!({"type": "http", "path": "/a"})).unwrap();
        assert!(matches!(route, Route::Http(_)));
    }

    #[test]
    fn test_unknown_tag_falls_back_to_raw() {
        let input = json!({"type": "Rewrite", "pattern": "^/old"});
        let route: Route = serde_json::from_value(input.clone()).unwrap();
        assert!(route.is_raw());
        assert_eq!(route.tag(), Some("Rewrite"));
        assert_eq!(serde_json::to_value(&route).unwrap(), input);
    }

    #[test]
    fn test_missing_tag_falls_back_to_raw() {
        let route: Route = serde_json::from_value(json!({"path": "/a"})).unwrap();
        assert_eq!(
            route,
            Route::Raw(RawUnion {
                tag: None,
                values: json!({"path": "/a"})
            })
        );
    }

    #[test]
    fn test_known_tag_with_bad_body_is_an_error() {
        let result: Result<Route, _> = serde_json::from_value(json!({"type": "Redirect"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_encode_writes_canonical_tag() {
        let route: Route = serde_json::from_value(json!({"type": "HTTP", "path": "/a"})).unwrap();
        assert_eq!(
            serde_json::to_value(&route).unwrap(),
            json!({"type": "Http", "path": "/a"})
        );
    }

    #[test]
    fn test_encode_tagged_non_object_untouched() {
        let value = encode_tagged(&42, "type", "Number").unwrap();
        assert_eq!(value, json!(42));
    }
}
