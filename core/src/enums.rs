//! Closed string sets shared by fragment and collection schemas.
//!
//! [`Enumeration`] is the dynamic form used inside schema trees. Each
//! built-in set is also available as a typed Rust enum whose serde names are
//! the literal members, so validated documents can be deserialized into
//! typed views such as [`ServicePage`](crate::ServicePage).

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::SchemaError;

/// A fixed, ordered, non-empty set of allowed string values.
///
/// # Examples
///
/// ```
/// use content_schema_core::Enumeration;
///
/// let target = Enumeration::new("target", ["_blank", "_self"]).unwrap();
/// assert!(target.is_member("_self"));
/// assert!(!target.is_member("_parent"));
///
/// assert!(Enumeration::new("empty", Vec::<String>::new()).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enumeration {
    #[serde(rename = "enum")]
    name: String,
    members: Vec<String>,
}

impl Enumeration {
    /// Creates an enumeration, rejecting empty sets and repeated members.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::EmptyEnumeration`] or
    /// [`SchemaError::DuplicateEnumMember`].
    pub fn new<I, S>(name: impl Into<String>, members: I) -> Result<Self, SchemaError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let name = name.into();
        let members: Vec<String> = members.into_iter().map(Into::into).collect();
        if members.is_empty() {
            return Err(SchemaError::EmptyEnumeration(name));
        }
        let mut seen = HashSet::new();
        for member in &members {
            if !seen.insert(member.as_str()) {
                return Err(SchemaError::DuplicateEnumMember {
                    name,
                    member: member.clone(),
                });
            }
        }
        Ok(Self { name, members })
    }

    // Built-in sets are literal and known to be valid.
    fn from_static(name: &str, members: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            members: members.iter().map(|m| (*m).to_string()).collect(),
        }
    }

    /// Enumeration name used in exports and diagnostics.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Members in declaration order.
    pub fn members(&self) -> &[String] {
        &self.members
    }

    /// Returns `true` if `value` is one of the members.
    pub fn is_member(&self, value: &str) -> bool {
        self.members.iter().any(|m| m == value)
    }
}

/// Error returned when parsing a typed enumeration from an unknown string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{value}' is not a member of {enumeration}")]
pub struct NotAMember {
    /// Enumeration name.
    pub enumeration: &'static str,
    /// Rejected input.
    pub value: String,
}

macro_rules! content_enum {
    (
        $(#[$meta:meta])*
        pub enum $ty:ident as $label:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $ty {
            $( $(#[$vmeta])* #[serde(rename = $value)] $variant, )+
        }

        impl $ty {
            /// Every member in declaration order.
            pub const ALL: &'static [$ty] = &[$($ty::$variant),+];

            /// Literal member strings in declaration order.
            pub const VALUES: &'static [&'static str] = &[$($value),+];

            /// Name of the set in exports and diagnostics.
            pub const NAME: &'static str = $label;

            /// Returns the literal string for this member.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($ty::$variant => $value,)+
                }
            }

            /// Returns the dynamic [`Enumeration`] for schema trees.
            pub fn enumeration() -> Enumeration {
                Enumeration::from_static($label, Self::VALUES)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $ty {
            type Err = NotAMember;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($value => Ok($ty::$variant),)+
                    _ => Err(NotAMember {
                        enumeration: $label,
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

content_enum! {
    /// Button size scale.
    pub enum ButtonSize as "size" {
        XSmall => "x-small",
        Small => "small",
        Default => "default",
        Large => "large",
        XLarge => "x-large",
    }
}

content_enum! {
    /// Button surface style.
    pub enum ButtonVariant as "variant" {
        Elevated => "elevated",
        Flat => "flat",
        Tonal => "tonal",
        Outlined => "outlined",
        Text => "text",
        Plain => "plain",
    }
}

content_enum! {
    /// Link target window.
    pub enum LinkTarget as "target" {
        Blank => "_blank",
        SelfFrame => "_self",
    }
}

content_enum! {
    /// Theme color names.
    pub enum ColorPalette as "color" {
        Primary => "primary",
        Secondary => "secondary",
        Success => "success",
        Warning => "warning",
        Error => "error",
        Info => "info",
        Surface => "surface",
        OnSurface => "on-surface",
        Background => "background",
        OnBackground => "on-background",
    }
}

content_enum! {
    /// Service line a service page belongs to.
    pub enum ServiceCategory as "category" {
        Web => "Web",
        Ai => "AI",
        Game => "Game",
        Mobile => "Mobile",
        Seo => "SEO",
        Marketing => "Marketing",
    }
}

content_enum! {
    /// Landing-page section discriminator.
    pub enum SectionComponent as "component" {
        Features => "features",
        Testimonials => "testimonials",
        Pricing => "pricing",
        Faq => "faq",
        Cta => "cta",
    }
}

/// Returns every built-in enumeration, for schema exports.
pub fn catalog() -> Vec<Enumeration> {
    vec![
        ButtonSize::enumeration(),
        ButtonVariant::enumeration(),
        LinkTarget::enumeration(),
        ColorPalette::enumeration(),
        ServiceCategory::enumeration(),
        SectionComponent::enumeration(),
    ]
}
