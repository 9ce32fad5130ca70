//! Typed views over validated documents.
//!
//! These structs mirror the fragment and collection schemas. They are meant
//! to be filled from a [`ValidatedDocument`](crate::ValidatedDocument) via
//! [`into_typed`](crate::ValidatedDocument::into_typed), after defaults have
//! been applied, so optional fields with defaults are plain values here.
//!
//! ```
//! use content_schema_core::*;
//! use serde_json::json;
//!
//! let registry = CollectionRegistry::builtin().unwrap();
//! let raw = json!({
//!     "title": "Home",
//!     "description": "Welcome",
//!     "hero": {"heading": "Build faster"},
//!     "sections": [{
//!         "title": "FAQ",
//!         "description": "Answers",
//!         "component": "faq",
//!         "faq": [{"question": "Why?", "answer": "Because."}],
//!     }],
//! });
//!
//! let page: LandingPage = registry.validate("landing", &raw).unwrap().into_typed().unwrap();
//! assert_eq!(page.sections[0].body.component(), SectionComponent::Faq);
//! ```

use serde::{Deserialize, Serialize};

use crate::{ButtonSize, ButtonVariant, ColorPalette, SectionComponent, ServiceCategory};

/// Call-to-action link or button.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<ButtonVariant>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ButtonSize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default)]
    pub external: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Testimonial {
    pub quote: String,
    pub author: TestimonialAuthor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestimonialAuthor {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Pricing tier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingPlan {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub price: String,
    #[serde(default = "default_billing")]
    pub billing: String,
    pub features: Vec<String>,
    pub cta: Link,
    #[serde(default)]
    pub highlight: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

fn default_billing() -> String {
    "monthly".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

/// Page header block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hero {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cta: Vec<Link>,
}

/// Landing-page section: shared fields plus exactly one component payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub body: SectionBody,
}

/// Section payload, discriminated by the `component` field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "component", rename_all = "lowercase")]
pub enum SectionBody {
    Features { features: Vec<Feature> },
    Testimonials { testimonials: Vec<Testimonial> },
    Pricing { pricing: Vec<PricingPlan> },
    Faq { faq: Vec<FaqItem> },
    Cta { cta: Vec<Link> },
}

impl SectionBody {
    /// Discriminator value of this payload.
    pub fn component(&self) -> SectionComponent {
        match self {
            Self::Features { .. } => SectionComponent::Features,
            Self::Testimonials { .. } => SectionComponent::Testimonials,
            Self::Pricing { .. } => SectionComponent::Pricing,
            Self::Faq { .. } => SectionComponent::Faq,
            Self::Cta { .. } => SectionComponent::Cta,
        }
    }
}

/// Document of the `landing` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LandingPage {
    pub title: String,
    pub description: String,
    pub hero: Hero,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

/// Blog post author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostCategory {
    pub name: String,
    pub slug: String,
    #[serde(default = "default_category_color")]
    pub color: ColorPalette,
}

fn default_category_color() -> ColorPalette {
    ColorPalette::Primary
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostImage {
    pub src: String,
    pub alt: String,
}

/// Document of the `posts` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub excerpt: String,
    pub date: String,
    pub author: Author,
    pub category: PostCategory,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PostImage>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub draft: bool,
}

/// Relaxed hero used by service pages; every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceHero {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
}

/// Document of the `services` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePage {
    pub title: String,
    pub description: String,
    pub slug: String,
    pub category: ServiceCategory,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hero: Option<ServiceHero>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<Feature>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub pricing: Vec<PricingPlan>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub testimonials: Vec<Testimonial>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub faq: Vec<FaqItem>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cta: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesIndexHero {
    pub heading: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subheading: Option<String>,
}

/// Entry in the services overview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceSummary {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    pub category: ServiceCategory,
    pub url: String,
}

/// Document of the `servicesIndex` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicesIndex {
    pub title: String,
    pub description: String,
    pub hero: ServicesIndexHero,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro: Option<String>,
    pub services: Vec<ServiceSummary>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cta: Vec<Link>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::CollectionRegistry;

    #[test]
    fn test_post_defaults_flow_into_typed_view() {
        let registry = CollectionRegistry::builtin().unwrap();
        let raw = json!({
            "title": "Hello",
            "excerpt": "First post",
            "date": "2024-05-01",
            "author": {"name": "Sam"},
            "category": {"name": "News", "slug": "news"},
        });
        let post: Post = registry.validate("posts", &raw).unwrap().into_typed().unwrap();
        assert_eq!(post.category.color, ColorPalette::Primary);
        assert!(!post.featured);
        assert!(!post.draft);
        assert!(post.tags.is_empty());
        assert!(post.image.is_none());
    }

    #[test]
    fn test_pricing_section_into_typed() {
        let registry = CollectionRegistry::builtin().unwrap();
        let raw = json!({
            "title": "Home",
            "description": "Welcome",
            "hero": {"heading": "Hi"},
            "sections": [{
                "title": "Plans",
                "description": "Pick one",
                "component": "pricing",
                "pricing": [{
                    "title": "Pro",
                    "price": "$9",
                    "features": ["Everything"],
                    "cta": {"text": "Buy", "url": "/buy", "size": "large"},
                }],
            }],
        });
        let page: LandingPage = registry.validate("landing", &raw).unwrap().into_typed().unwrap();
        match &page.sections[0].body {
            SectionBody::Pricing { pricing } => {
                assert_eq!(pricing[0].billing, "monthly");
                assert_eq!(pricing[0].cta.size, Some(ButtonSize::Large));
                assert!(!pricing[0].cta.external);
            }
            other => panic!("unexpected section body {other:?}"),
        }
    }

    #[test]
    fn test_service_page_into_typed() {
        let registry = CollectionRegistry::builtin().unwrap();
        let raw = json!({
            "title": "AI Consulting",
            "description": "Models that ship",
            "slug": "ai",
            "category": "AI",
            "hero": {"heading": "Smarter products"},
            "faq": [{"question": "Cost?", "answer": "Depends."}],
        });
        let page: ServicePage = registry.validate("services", &raw).unwrap().into_typed().unwrap();
        assert_eq!(page.category, ServiceCategory::Ai);
        assert_eq!(page.hero.unwrap().heading.as_deref(), Some("Smarter products"));
        assert_eq!(page.faq.len(), 1);
    }

    #[test]
    fn test_section_serializes_with_component_tag() {
        let section = Section {
            title: "Talk to us".into(),
            description: "Get in touch".into(),
            id: None,
            body: SectionBody::Cta {
                cta: vec![Link {
                    text: "Contact".into(),
                    label: None,
                    url: "/contact".into(),
                    to: None,
                    target: None,
                    variant: Some(ButtonVariant::Tonal),
                    color: None,
                    size: None,
                    icon: None,
                    external: false,
                }],
            },
        };
        let value = serde_json::to_value(&section).unwrap();
        assert_eq!(value["component"], json!("cta"));
        assert_eq!(value["cta"][0]["variant"], json!("tonal"));
        assert!(value.get("id").is_none());
    }
}
