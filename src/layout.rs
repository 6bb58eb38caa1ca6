//! The dashboard page: filter controls, chart placeholders and the map.

use crate::types::PriceCeiling;

const PAGE_HTML: &str = include_str!("../templates/page.html");

/// Renders the page once at startup. Charts and the map are fetched by the
/// page itself; with `hot_reload` it also polls for a server restart.
pub fn render_page(hot_reload: bool) -> String {
    PAGE_HTML
        .replace("{{CEILING_OPTIONS}}", &ceiling_options())
        .replace("{{HOT_RELOAD}}", if hot_reload { "true" } else { "false" })
}

fn ceiling_options() -> String {
    PriceCeiling::OPTIONS
        .iter()
        .map(|option| {
            let selected = if *option == PriceCeiling::All { " selected" } else { "" };
            format!(
                "                <option value=\"{0}\"{1}>{0}</option>",
                option, selected
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callbacks::{Registry, BAR_TOGGLE, PRICE_CEILING, TOP_TOGGLE};

    #[test]
    fn test_page_offers_every_ceiling() {
        let page = render_page(false);
        assert!(page.contains(r#"<option value="All" selected>All</option>"#));
        for limit in ["40", "30", "20"] {
            assert!(page.contains(&format!(r#"<option value="{0}">{0}</option>"#, limit)));
        }
        assert!(!page.contains("{{"));
    }

    #[test]
    fn test_page_has_a_control_for_every_bound_input() {
        let page = render_page(false);
        for dep in Registry::dashboard().dependencies() {
            assert!(page.contains(&format!(r#"id="{}""#, dep.output)));
            for input in dep.inputs {
                assert!(page.contains(&format!(r#"id="{}""#, input)));
            }
        }
        for id in [PRICE_CEILING, BAR_TOGGLE, TOP_TOGGLE] {
            assert!(page.contains(id));
        }
    }

    #[test]
    fn test_hot_reload_flag_is_inlined() {
        assert!(render_page(true).contains("const HOT_RELOAD = true;"));
        assert!(render_page(false).contains("const HOT_RELOAD = false;"));
    }

    #[test]
    fn test_page_fetches_map_and_drops_superseded_updates() {
        let page = render_page(false);
        assert!(page.contains(r#"fetch("/api/map")"#));
        assert!(page.contains("if (seq !== latest[dep.output]) return;"));
    }
}
