//! Robustness properties: malformed input degrades, never panics.

use mailsmith_render::config::FixupConfig;
use mailsmith_render::markup::inline;
use mailsmith_render::style::{apply_fixups, compose, optimize, parse_css, OptimizerStage};
use mailsmith_render::{DocumentType, ThemeRegistry};
use proptest::prelude::*;

fn document_type() -> impl Strategy<Value = DocumentType> {
    prop::sample::select(DocumentType::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_parser_survives_arbitrary_text(css in any::<String>()) {
        let rules = parse_css(&css);
        let _ = rules.leftover_css();
    }

    #[test]
    fn prop_parser_survives_css_like_noise(css in r"[.a-z{}:;@()! \n/*-]{0,200}") {
        let rules = parse_css(&css);
        let leftover = rules.leftover_css();
        prop_assert!(leftover.is_empty() || leftover.ends_with('\n'));
    }

    #[test]
    fn prop_inliner_never_panics(markup in r#"[<>/a-z ="'&;#0-9]{0,120}"#) {
        let rules = parse_css(".a { color: red; } .b { padding: 4px; }");
        let theme = ThemeRegistry::builtin().default_theme().clone();
        let out = inline(&markup, &rules, &theme);
        if out.degraded.is_some() {
            prop_assert_eq!(out.html, markup);
        }
    }

    #[test]
    fn prop_prepared_sheet_fits_any_ceiling(document in document_type(), ceiling in 0usize..20_000) {
        let css = apply_fixups(&compose(document, "default"), &FixupConfig::default());
        let out = optimize(&css, ceiling);
        prop_assert!(out.css.len() <= ceiling);
        if out.stage == OptimizerStage::Truncated {
            prop_assert!(!out.css.contains("/*"));
        }
    }
}
