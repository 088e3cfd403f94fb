//! Renderer: replaces resolved spans with link or disambiguation markup.
//!
//! Spans are applied right to left against the original text, so every
//! replacement leaves the offsets of the spans still to come untouched.
//! Text outside spans is copied byte for byte.

use serde::Serialize;

use crate::catalog::{Entity, EntityCategory};
use crate::linker::escape::escape_html;
use crate::linker::{Conflict, Decision, LinkerConfig, Span};

/// One choice in a disambiguation marker, as the client UI reads it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisambiguationOption<'c> {
    pub name: &'c str,
    pub url: &'c str,
    pub category: EntityCategory,
    pub subtype: &'c str,
    pub thumbnail: Option<&'c str>,
}

impl<'c> From<&'c Entity> for DisambiguationOption<'c> {
    fn from(entity: &'c Entity) -> Self {
        Self {
            name: entity.display_name.trim(),
            url: entity.target_url.trim(),
            category: entity.category,
            subtype: &entity.subtype_label,
            thumbnail: entity.thumbnail.as_deref(),
        }
    }
}

/// Rendered text plus what happened to each span
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    pub html: String,
    pub links: usize,
    pub disambiguations: usize,
    pub self_links_suppressed: usize,
    pub plain: usize,
}

/// URLs compare exactly, except that one trailing slash is ignored
pub fn same_url(a: &str, b: &str) -> bool {
    fn strip(url: &str) -> &str {
        let url = url.trim();
        match url.strip_suffix('/') {
            Some(stripped) if !stripped.is_empty() => stripped,
            _ => url,
        }
    }
    strip(a) == strip(b)
}

pub fn render(
    text: &str,
    resolved: &[(Span, Conflict<'_>)],
    current_page_url: Option<&str>,
    config: &LinkerConfig,
) -> Rendered {
    let mut rendered = Rendered {
        html: text.to_string(),
        ..Rendered::default()
    };

    let mut order: Vec<&(Span, Conflict<'_>)> = resolved.iter().collect();
    order.sort_by_key(|(span, _)| std::cmp::Reverse(span.start));

    for (span, conflict) in order {
        // Spans from another text (or a stale scan) are left alone
        if text.get(span.start..span.end).is_none() {
            continue;
        }

        let markup = match conflict.decision {
            Decision::DirectLink(entity) => {
                let is_self = config.suppress_self_links
                    && current_page_url.is_some_and(|current| same_url(current, &entity.target_url));
                if is_self {
                    rendered.self_links_suppressed += 1;
                    continue;
                }
                rendered.links += 1;
                link_markup(&span.original_text, entity)
            }
            Decision::Disambiguation => match disambiguation_markup(&span.original_text, &conflict.candidates) {
                Some(markup) => {
                    rendered.disambiguations += 1;
                    markup
                }
                None => {
                    rendered.plain += 1;
                    continue;
                }
            },
            Decision::Plain => {
                rendered.plain += 1;
                continue;
            }
        };

        rendered.html.replace_range(span.start..span.end, &markup);
    }

    rendered
}

/// `<a>` element for a direct link
pub fn link_markup(matched: &str, entity: &Entity) -> String {
    let name = entity.display_name.trim();
    format!(
        r#"<a href="{url}" class="entity-link {category}-link" data-entity-id="{id}" title="{title}">{text}</a>"#,
        url = escape_html(entity.target_url.trim()),
        category = entity.category.as_str(),
        id = escape_html(&entity.id),
        title = escape_html(&entity.category.link_title(name)),
        text = escape_html(matched),
    )
}

/// Marker element carrying the candidate list for the client chooser.
/// `None` if the payload cannot be serialized.
pub fn disambiguation_markup(matched: &str, candidates: &[&Entity]) -> Option<String> {
    let options: Vec<DisambiguationOption<'_>> = candidates.iter().map(|e| DisambiguationOption::from(*e)).collect();
    let payload = match serde_json::to_string(&options) {
        Ok(json) => json,
        Err(_e) => {
            #[cfg(target_arch = "wasm32")]
            web_sys::console::error_1(&format!("[Renderer] Disambiguation payload failed: {}", _e).into());
            return None;
        }
    };

    let phrase = escape_html(matched);
    Some(format!(
        r#"<span class="entity-disambiguation" data-phrase="{phrase}" data-options="{options}" role="button" tabindex="0">{phrase}</span>"#,
        phrase = phrase,
        options = escape_html(&payload),
    ))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalogs, EntityRef};

    fn span(text: &str, needle: &str) -> Span {
        let start = text.find(needle).unwrap();
        Span {
            start,
            end: start + needle.len(),
            original_text: needle.to_string(),
            term: needle.to_lowercase(),
            entities: Vec::<EntityRef>::new(),
        }
    }

    fn lucky() -> Entity {
        Entity::new("lucky", EntityCategory::Character, "Lucky", "/character/lucky")
    }

    #[test]
    fn test_direct_link_markup() {
        let entity = lucky();
        let text = "LUCKY is here";
        let resolved = vec![(
            span(text, "LUCKY"),
            Conflict { candidates: vec![&entity], decision: Decision::DirectLink(&entity) },
        )];

        let out = render(text, &resolved, None, &LinkerConfig::default());
        assert_eq!(
            out.html,
            r#"<a href="/character/lucky" class="entity-link character-link" data-entity-id="lucky" title="View Lucky&#39;s page">LUCKY</a> is here"#
        );
        assert_eq!(out.links, 1);
    }

    #[test]
    fn test_self_link_suppressed() {
        let entity = lucky();
        let text = "Lucky is here";
        let resolved = vec![(
            span(text, "Lucky"),
            Conflict { candidates: vec![&entity], decision: Decision::DirectLink(&entity) },
        )];

        let out = render(text, &resolved, Some("/character/lucky/"), &LinkerConfig::default());
        assert_eq!(out.html, text);
        assert_eq!(out.self_links_suppressed, 1);

        let allow = LinkerConfig { suppress_self_links: false, ..LinkerConfig::default() };
        let out = render(text, &resolved, Some("/character/lucky"), &allow);
        assert!(out.html.starts_with("<a href=\"/character/lucky\""));
    }

    #[test]
    fn test_disambiguation_payload() {
        let catalogs = Catalogs::new(
            vec![],
            vec![Entity::new("fort-lore", EntityCategory::Lore, "Ice Fortress", "/lore/ice-fortress")
                .with_subtype("place")
                .with_thumbnail("/img/fort.png")],
            vec![Entity::new("fort-ep", EntityCategory::Episode, "Ice Fortress", "/episode/ice-fortress")
                .with_subtype("Season 3, Episode 4")],
        );
        let candidates = vec![&catalogs.lore[0], &catalogs.episodes[0]];
        let markup = disambiguation_markup("ice fortress", &candidates).unwrap();

        assert!(markup.starts_with(r#"<span class="entity-disambiguation" data-phrase="ice fortress" data-options=""#));
        assert!(markup.ends_with(r#"role="button" tabindex="0">ice fortress</span>"#));
        assert_eq!(markup.matches('<').count(), 2);

        // The attribute holds escaped JSON the client can parse back
        let start = markup.find("data-options=\"").unwrap() + "data-options=\"".len();
        let end = start + markup[start..].find('"').unwrap();
        let json = markup[start..end].replace("&quot;", "\"").replace("&#39;", "'").replace("&amp;", "&");
        let options: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(options.as_array().unwrap().len(), 2);
        assert_eq!(options[0]["name"], "Ice Fortress");
        assert_eq!(options[0]["url"], "/lore/ice-fortress");
        assert_eq!(options[0]["category"], "lore");
        assert_eq!(options[0]["subtype"], "place");
        assert_eq!(options[0]["thumbnail"], "/img/fort.png");
        assert_eq!(options[1]["category"], "episode");
        assert_eq!(options[1]["subtype"], "Season 3, Episode 4");
        assert!(options[1]["thumbnail"].is_null());
    }

    #[test]
    fn test_hostile_catalog_values_escaped() {
        let entity = Entity::new("x\"><script>", EntityCategory::Lore, "<b>Bad</b>", "/lore/\" onclick=\"alert(1)");
        let text = "a <b>Bad</b> entry";
        let resolved = vec![(
            span(text, "<b>Bad</b>"),
            Conflict { candidates: vec![&entity], decision: Decision::DirectLink(&entity) },
        )];

        let out = render(text, &resolved, None, &LinkerConfig::default());
        assert!(!out.html.contains("<script>"));
        assert!(!out.html.contains("\" onclick"));
        assert_eq!(out.html.matches("<a ").count(), 1);
        assert_eq!(out.html.matches("</a>").count(), 1);
        assert!(out.html.contains("&lt;b&gt;Bad&lt;/b&gt;</a>"));
    }

    #[test]
    fn test_right_to_left_keeps_offsets() {
        let a = lucky();
        let b = Entity::new("charms", EntityCategory::Lore, "Charms", "/lore/charms");
        let text = "Lucky & Charms";
        let resolved = vec![
            (span(text, "Lucky"), Conflict { candidates: vec![&a], decision: Decision::DirectLink(&a) }),
            (span(text, "Charms"), Conflict { candidates: vec![&b], decision: Decision::DirectLink(&b) }),
        ];

        let out = render(text, &resolved, None, &LinkerConfig::default());
        assert!(out.html.contains(">Lucky</a> & <a href=\"/lore/charms\""));
        assert!(out.html.ends_with(">Charms</a>"));
        assert_eq!(out.links, 2);
    }

    #[test]
    fn test_plain_and_out_of_range_spans() {
        let text = "short";
        let mut bogus = span("a much longer text", "longer");
        bogus.entities.clear();
        let resolved = vec![
            (bogus, Conflict { candidates: vec![], decision: Decision::Plain }),
            (span(text, "short"), Conflict { candidates: vec![], decision: Decision::Plain }),
        ];

        let out = render(text, &resolved, None, &LinkerConfig::default());
        assert_eq!(out.html, "short");
        assert_eq!(out.plain, 1);
    }

    #[test]
    fn test_same_url() {
        assert!(same_url("/character/lucky", "/character/lucky/"));
        assert!(same_url(" /lore/charms ", "/lore/charms"));
        assert!(!same_url("/lore/charms", "/lore/charm"));
        assert!(same_url("/", "/"));
    }
}
