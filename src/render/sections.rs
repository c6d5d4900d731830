//! HTML for each known section kind.
//!
//! Renderers receive only their typed payload plus [`SectionProps`]; every
//! interpolated value is escaped.

use crate::content::types::{
    AssetTable, CallToAction, CtaContent, FaqContent, FeaturesContent, HeroContent,
    ServicesContent, TeamContent, TestimonialsContent, TextContent,
};
use crate::render::escape::{escape_html, safe_href};
use serde_json::Value;

/// Presentation props shared by every section renderer.
#[derive(Debug, Clone, Copy)]
pub struct SectionProps<'a> {
    pub id: &'a str,
    pub background: Option<&'a str>,
    pub spacing: Option<&'a str>,
    pub assets: &'a AssetTable,
}

/// Opening tag of a section wrapper.
pub fn open_section(tag: &str, props: &SectionProps<'_>) -> String {
    let mut html = format!(
        "<section id=\"{}\" class=\"section section-{}\"",
        escape_html(props.id),
        escape_html(tag)
    );
    if let Some(background) = props.background {
        html.push_str(&format!(" data-background=\"{}\"", escape_html(background)));
    }
    if let Some(spacing) = props.spacing {
        html.push_str(&format!(" data-spacing=\"{}\"", escape_html(spacing)));
    }
    html.push('>');
    html
}

const CLOSE_SECTION: &str = "</section>";

fn heading(level: u8, text: &str) -> String {
    format!("<h{level}>{}</h{level}>", escape_html(text))
}

fn optional_heading(level: u8, text: Option<&str>) -> String {
    text.filter(|t| !t.is_empty())
        .map(|t| heading(level, t))
        .unwrap_or_default()
}

fn paragraph(class: &str, text: Option<&str>) -> String {
    text.filter(|t| !t.is_empty())
        .map(|t| format!("<p class=\"{}\">{}</p>", class, escape_html(t)))
        .unwrap_or_default()
}

fn button(cta: &CallToAction, variant: &str) -> String {
    let rel = if cta.external {
        " target=\"_blank\" rel=\"noopener noreferrer\""
    } else {
        ""
    };
    format!(
        "<a class=\"button button-{}\" href=\"{}\"{}>{}</a>",
        variant,
        safe_href(&cta.href),
        rel,
        escape_html(&cta.label)
    )
}

/// Resolve an image reference: an asset id first, otherwise a literal URL.
pub fn image(reference: &str, assets: &AssetTable) -> String {
    match assets.get(reference) {
        Some(asset) => {
            let media = asset.media();
            let mut html = format!(
                "<img src=\"{}\" alt=\"{}\"",
                safe_href(&media.src),
                escape_html(&media.alt)
            );
            if let (Some(width), Some(height)) = (media.width, media.height) {
                html.push_str(&format!(" width=\"{}\" height=\"{}\"", width, height));
            }
            html.push_str(" loading=\"lazy\">");
            html
        }
        None => format!(
            "<img src=\"{}\" alt=\"\" loading=\"lazy\">",
            safe_href(reference)
        ),
    }
}

pub fn hero(content: &HeroContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("hero", props);
    html.push_str(&heading(1, &content.title));
    html.push_str(&paragraph("subtitle", content.subtitle.as_deref()));
    html.push_str(&paragraph("description", content.description.as_deref()));

    let buttons: Vec<String> = [
        content.primary_cta.as_ref().map(|cta| button(cta, "primary")),
        content.secondary_cta.as_ref().map(|cta| button(cta, "secondary")),
    ]
    .into_iter()
    .flatten()
    .collect();
    if !buttons.is_empty() {
        html.push_str(&format!("<div class=\"actions\">{}</div>", buttons.concat()));
    }

    if let Some(reference) = &content.image {
        html.push_str(&image(reference, props.assets));
    }
    html.push_str(CLOSE_SECTION);
    html
}

pub fn features(content: &FeaturesContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("features", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    html.push_str(&paragraph("subtitle", content.subtitle.as_deref()));
    html.push_str("<ul class=\"features\">");
    for item in &content.items {
        html.push_str("<li>");
        if let Some(icon) = &item.icon {
            html.push_str(&format!(
                "<span class=\"icon\" data-icon=\"{}\"></span>",
                escape_html(icon)
            ));
        }
        html.push_str(&heading(3, &item.title));
        html.push_str(&format!("<p>{}</p></li>", escape_html(&item.description)));
    }
    html.push_str("</ul>");
    html.push_str(CLOSE_SECTION);
    html
}

pub fn services(content: &ServicesContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("services", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    html.push_str(&paragraph("subtitle", content.subtitle.as_deref()));
    html.push_str("<div class=\"services\">");
    for item in &content.items {
        html.push_str("<article class=\"service\">");
        if let Some(reference) = &item.image {
            html.push_str(&image(reference, props.assets));
        }
        html.push_str(&heading(3, &item.title));
        html.push_str(&format!("<p>{}</p>", escape_html(&item.description)));
        if let Some(href) = &item.href {
            html.push_str(&format!("<a href=\"{}\">{}</a>", safe_href(href), escape_html(&item.title)));
        }
        html.push_str("</article>");
    }
    html.push_str("</div>");
    html.push_str(CLOSE_SECTION);
    html
}

pub fn team(content: &TeamContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("team", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    html.push_str("<ul class=\"team\">");
    for member in &content.members {
        html.push_str("<li class=\"member\">");
        if let Some(reference) = &member.image {
            html.push_str(&image(reference, props.assets));
        }
        html.push_str(&heading(3, &member.name));
        html.push_str(&paragraph("role", Some(&member.role)));
        html.push_str(&paragraph("bio", member.bio.as_deref()));
        html.push_str("</li>");
    }
    html.push_str("</ul>");
    html.push_str(CLOSE_SECTION);
    html
}

pub fn testimonials(content: &TestimonialsContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("testimonials", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    for item in &content.items {
        let attribution = [Some(item.author.as_str()), item.role.as_deref(), item.company.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(escape_html)
            .collect::<Vec<_>>()
            .join(", ");
        html.push_str(&format!(
            "<blockquote><p>{}</p><footer>{}</footer></blockquote>",
            escape_html(&item.quote),
            attribution
        ));
    }
    html.push_str(CLOSE_SECTION);
    html
}

pub fn faq(content: &FaqContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("faq", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    for item in &content.items {
        html.push_str(&format!(
            "<details><summary>{}</summary><p>{}</p></details>",
            escape_html(&item.question),
            escape_html(&item.answer)
        ));
    }
    html.push_str(CLOSE_SECTION);
    html
}

pub fn cta(content: &CtaContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("cta", props);
    html.push_str(&heading(2, &content.title));
    html.push_str(&paragraph("description", content.description.as_deref()));
    if let Some(primary) = &content.primary {
        html.push_str(&button(primary, "primary"));
    }
    if let Some(secondary) = &content.secondary {
        html.push_str(&button(secondary, "secondary"));
    }
    html.push_str(CLOSE_SECTION);
    html
}

pub fn text(content: &TextContent, props: &SectionProps<'_>) -> String {
    let mut html = open_section("text", props);
    html.push_str(&optional_heading(2, content.title.as_deref()));
    for block in content.body.split("\n\n").map(str::trim).filter(|b| !b.is_empty()) {
        html.push_str(&format!("<p>{}</p>", escape_html(block)));
    }
    html.push_str(CLOSE_SECTION);
    html
}

/// Visible placeholder for content this renderer cannot display.
pub fn diagnostic(tag: &str, reason: &str, content: Option<&Value>, props: &SectionProps<'_>) -> String {
    let mut html = format!(
        "<section id=\"{}\" class=\"section section-unrecognized\" data-unrecognized=\"true\" data-type=\"{}\">",
        escape_html(props.id),
        escape_html(tag)
    );
    html.push_str(&format!("<p class=\"diagnostic\">{}</p>", escape_html(reason)));
    if let Some(content) = content {
        html.push_str(&format!("<pre>{}</pre>", escape_html(&content.to_string())));
    }
    html.push_str(CLOSE_SECTION);
    html
}
