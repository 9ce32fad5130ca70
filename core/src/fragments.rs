//! Reusable fragment schemas.
//!
//! Each function returns a fresh [`ObjectSchema`]; embedding a fragment is
//! always a structural copy.
//!
//! | Fragment | Required | Optional |
//! |---|---|---|
//! | [`link`] | `text`, `url` | `label`, `to`, `target`, `variant`, `color`, `size`, `icon`, `external` (default `false`) |
//! | [`feature`] | `title`, `description` | `icon`, `image` |
//! | [`testimonial`] | `quote`, `author.name` | `author.role`, `author.company`, `author.avatar` |
//! | [`pricing_plan`] | `title`, `price`, `features`, `cta` | `description`, `billing` (default `"monthly"`), `highlight` (default `false`), `badge` |
//! | [`faq_item`] | `question`, `answer` | |
//! | [`hero`] | `heading` | `subheading`, `image`, `cta` |

use serde_json::json;

use crate::{ButtonSize, ButtonVariant, ObjectSchema, SchemaNode};

/// Fragment names accepted by [`fragment`].
pub const FRAGMENT_NAMES: &[&str] = &[
    "link",
    "feature",
    "testimonial",
    "pricingPlan",
    "faqItem",
    "hero",
];

/// Returns a fragment by its export name.
///
/// # Examples
///
/// ```
/// use content_schema_core::fragments;
///
/// let faq = fragments::fragment("faqItem").unwrap();
/// assert_eq!(faq.field_names(), vec!["question", "answer"]);
/// assert!(fragments::fragment("carousel").is_none());
/// ```
pub fn fragment(name: &str) -> Option<ObjectSchema> {
    match name {
        "link" => Some(link()),
        "feature" => Some(feature()),
        "testimonial" => Some(testimonial()),
        "pricingPlan" => Some(pricing_plan()),
        "faqItem" => Some(faq_item()),
        "hero" => Some(hero()),
        _ => None,
    }
}

/// Call-to-action link or button.
pub fn link() -> ObjectSchema {
    ObjectSchema::new()
        .field("text", SchemaNode::string())
        .field("label", SchemaNode::string().optional())
        .field("url", SchemaNode::string())
        .field("to", SchemaNode::string().optional())
        .field("target", SchemaNode::string().optional())
        .field(
            "variant",
            SchemaNode::enumeration(ButtonVariant::enumeration()).optional(),
        )
        .field("color", SchemaNode::string().optional())
        .field(
            "size",
            SchemaNode::enumeration(ButtonSize::enumeration()).optional(),
        )
        .field("icon", SchemaNode::string().optional().editor_input("icon"))
        .field("external", SchemaNode::boolean().with_default(json!(false)))
}

/// Feature card.
pub fn feature() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", SchemaNode::non_empty_string())
        .field("description", SchemaNode::non_empty_string())
        .field("icon", SchemaNode::string().optional().editor_input("icon"))
        .field("image", SchemaNode::string().optional().editor_input("media"))
}

/// Customer quote with its author.
pub fn testimonial() -> ObjectSchema {
    let author = ObjectSchema::new()
        .field("name", SchemaNode::non_empty_string())
        .field("role", SchemaNode::string().optional())
        .field("company", SchemaNode::string().optional())
        .field(
            "avatar",
            SchemaNode::string().optional().editor_input("media"),
        );

    ObjectSchema::new()
        .field("quote", SchemaNode::non_empty_string())
        .field("author", author.into_node())
}

/// Pricing tier.
pub fn pricing_plan() -> ObjectSchema {
    ObjectSchema::new()
        .field("title", SchemaNode::non_empty_string())
        .field("description", SchemaNode::string().optional())
        .field("price", SchemaNode::non_empty_string())
        .field("billing", SchemaNode::string().with_default(json!("monthly")))
        .field(
            "features",
            SchemaNode::array(SchemaNode::non_empty_string()).non_empty(),
        )
        .field("cta", link().into_node())
        .field("highlight", SchemaNode::boolean().with_default(json!(false)))
        .field("badge", SchemaNode::string().optional())
}

/// Question and answer pair.
pub fn faq_item() -> ObjectSchema {
    ObjectSchema::new()
        .field("question", SchemaNode::non_empty_string())
        .field("answer", SchemaNode::non_empty_string())
}

/// Page header block.
pub fn hero() -> ObjectSchema {
    ObjectSchema::new()
        .field("heading", SchemaNode::non_empty_string())
        .field("subheading", SchemaNode::string().optional())
        .field("image", SchemaNode::string().optional().editor_input("media"))
        .field("cta", SchemaNode::array(link().into_node()).optional())
}
