// src/render.rs
//! Projection of an [`AnalysisResponse`] onto the results section, plus the
//! HTML used by hosts that display the page as markup.
//!
//! Rendering keeps no state: every call re-derives the whole view from its
//! input, so equal inputs give equal views.

use crate::document::Document;
use crate::models::{AnalysisResponse, EffectiveColor, ParsedData};
use crate::state::{Section, UiState};
use crate::toast::{Toast, ToastPhase};
use serde::Serialize;
use std::fmt::Write;

/// Optional cards of the results section, in page order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Card {
    WallColors,
    DecorationTips,
    Furniture,
    Accessories,
    Harmony,
    Summary,
}

impl Card {
    pub const ALL: [Card; 6] = [
        Card::WallColors,
        Card::DecorationTips,
        Card::Furniture,
        Card::Accessories,
        Card::Harmony,
        Card::Summary,
    ];

    pub fn element_id(self) -> &'static str {
        match self {
            Card::WallColors => "wallColorsCard",
            Card::DecorationTips => "tipsCard",
            Card::Furniture => "furnitureCard",
            Card::Accessories => "accessoriesCard",
            Card::Harmony => "harmonyCard",
            Card::Summary => "summaryCard",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Card::WallColors => "Suggested Wall Colors",
            Card::DecorationTips => "Decoration Tips",
            Card::Furniture => "Furniture Colors",
            Card::Accessories => "Accessory Colors",
            Card::Harmony => "Color Harmony",
            Card::Summary => "Summary",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub card: Card,
    pub visible: bool,
    /// Card body; empty while hidden.
    pub html: String,
}

impl CardView {
    fn hidden(card: Card) -> Self {
        Self {
            card,
            visible: false,
            html: String::new(),
        }
    }
}

/// Raw-text block shown when the analysis has no structured form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FallbackView {
    pub visible: bool,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultsView {
    pub image_src: String,
    pub palette: Vec<EffectiveColor>,
    pub palette_html: String,
    /// One entry per [`Card::ALL`], same order.
    pub cards: Vec<CardView>,
    pub fallback: FallbackView,
}

impl ResultsView {
    pub fn card(&self, card: Card) -> Option<&CardView> {
        self.cards.iter().find(|view| view.card == card)
    }

    pub fn is_card_visible(&self, card: Card) -> bool {
        self.card(card).is_some_and(|view| view.visible)
    }

    pub fn visible_cards(&self) -> Vec<Card> {
        self.cards
            .iter()
            .filter(|view| view.visible)
            .map(|view| view.card)
            .collect()
    }
}

pub fn render_results(response: &AnalysisResponse) -> ResultsView {
    let palette = response.effective_colors();
    let palette_html: String = palette.iter().map(color_item_html).collect();

    let (cards, fallback): (Vec<CardView>, FallbackView) = match &response.parsed_data {
        Some(parsed) => (
            Card::ALL
                .iter()
                .map(|card| render_card(*card, parsed))
                .collect(),
            FallbackView::default(),
        ),
        None => (
            Card::ALL.iter().map(|card| CardView::hidden(*card)).collect(),
            FallbackView {
                visible: true,
                text: response.analysis.clone().unwrap_or_default(),
            },
        ),
    };

    ResultsView {
        image_src: response.image_base64.clone(),
        palette,
        palette_html,
        cards,
        fallback,
    }
}

fn render_card(card: Card, parsed: &ParsedData) -> CardView {
    let html = match card {
        Card::WallColors => parsed
            .wall_colors
            .as_deref()
            .filter(|colors| !colors.is_empty())
            .map(|colors| {
                colors
                    .iter()
                    .map(|color| {
                        wall_color_item_html(
                            color.hex_or_default(),
                            color.name_or_default(),
                            color.reason.as_deref().unwrap_or(""),
                        )
                    })
                    .collect::<String>()
            }),
        Card::DecorationTips => text_items_html(parsed.decoration_tips.as_deref(), "tip-item"),
        Card::Furniture => text_items_html(parsed.furniture_colors.as_deref(), "list-item"),
        Card::Accessories => text_items_html(parsed.accessories_colors.as_deref(), "list-item"),
        Card::Harmony => non_empty_text(parsed.color_harmony.as_deref()),
        Card::Summary => non_empty_text(parsed.summary.as_deref()),
    };

    match html {
        Some(html) => CardView {
            card,
            visible: true,
            html,
        },
        None => CardView::hidden(card),
    }
}

fn text_items_html(items: Option<&[String]>, class: &str) -> Option<String> {
    let items = items.filter(|items| !items.is_empty())?;
    Some(
        items
            .iter()
            .map(|item| format!(r#"<div class="{}">{}</div>"#, class, escape(item)))
            .collect(),
    )
}

fn non_empty_text(text: Option<&str>) -> Option<String> {
    text.filter(|text| !text.is_empty()).map(escape)
}

/// Hex code as shown to the user.
pub fn display_code(hex: &str) -> String {
    hex.to_uppercase()
}

fn color_item_html(color: &EffectiveColor) -> String {
    let hex = escape(&color.hex);
    let mut html = format!(
        r#"<div class="color-item" data-copy="{hex}"><div class="color-swatch" style="background-color: {hex}"></div><div class="color-info"><div class="color-name">{}</div><div class="color-code">{}</div>"#,
        escape(&color.name),
        escape(&display_code(&color.hex)),
    );
    if let Some(percentage) = color.percentage {
        let _ = write!(html, r#"<div class="color-percent">{}%</div>"#, percentage);
    }
    html.push_str("</div></div>");
    html
}

fn wall_color_item_html(hex: &str, name: &str, reason: &str) -> String {
    let code = escape(&display_code(hex));
    let hex = escape(hex);
    format!(
        r#"<div class="wall-color-item"><div class="wall-swatch" style="background-color: {hex}" data-copy="{hex}"></div><div class="wall-info"><div class="wall-name">{}</div><div class="wall-code">{code}</div><div class="wall-reason">{}</div></div></div>"#,
        escape(name),
        escape(reason),
    )
}

/// Escapes text for element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

fn display(visible: bool) -> &'static str {
    if visible { "block" } else { "none" }
}

const PAGE_STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: #faf8f5; color: #222; }
main { max-width: 960px; margin: 0 auto; padding: 2rem 1rem; }
.upload-box { border: 2px dashed #bbb; border-radius: 12px; padding: 2rem; text-align: center; }
.upload-box.dragover { border-color: #6b8f71; background: #eef4ef; }
.preview-container img { max-width: 100%; border-radius: 8px; }
.color-palette { display: flex; flex-wrap: wrap; gap: 1rem; }
.color-swatch, .wall-swatch { width: 64px; height: 64px; border-radius: 8px; cursor: pointer; }
.card { background: #fff; border-radius: 12px; padding: 1rem 1.5rem; margin: 1rem 0; }
.error-banner { background: #fdecea; color: #8a1c1c; border-radius: 8px; padding: 1rem; }
.toast-container { position: fixed; right: 1rem; bottom: 1rem; display: flex; flex-direction: column; gap: .5rem; }
.toast { background: #2e7d32; color: #fff; padding: .75rem 1rem; border-radius: 8px; }
.toast.leaving { opacity: 0; transition: opacity .3s; }
"#;

/// Full page for the current document.
pub fn render_page(document: &Document) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n<title>Color Studio</title>\n<style>{}</style>\n</head>\n<body>\n<main>\n<h1>Color Studio</h1>\n",
        PAGE_STYLE
    );

    let state = document.state;

    let _ = writeln!(
        page,
        r#"<section id="{}" style="display: {}">{}</section>"#,
        Section::Upload.element_id(),
        display(state.is_visible(Section::Upload)),
        upload_panel_html(document),
    );

    let _ = writeln!(
        page,
        r#"<section id="{}" style="display: {}"><div class="spinner"></div><p>Analyzing your room...</p></section>"#,
        Section::Loading.element_id(),
        display(state.is_visible(Section::Loading)),
    );

    let _ = writeln!(
        page,
        r#"<section id="{}" style="display: {}">{}</section>"#,
        Section::Results.element_id(),
        display(state.is_visible(Section::Results)),
        document
            .results
            .as_ref()
            .map(results_html)
            .unwrap_or_default(),
    );

    // The upload panel is repeated under the banner so the user can retry.
    let error_body = if state == UiState::Error {
        format!(
            r#"<div class="error-banner"><p id="errorMessage">{}</p></div>{}"#,
            escape(document.error_message.as_deref().unwrap_or("")),
            upload_panel_html(document),
        )
    } else {
        String::new()
    };
    let _ = writeln!(
        page,
        r#"<section id="{}" style="display: {}">{}</section>"#,
        Section::Error.element_id(),
        display(state.is_visible(Section::Error)),
        error_body,
    );

    let _ = writeln!(
        page,
        r#"<div id="toastContainer" class="toast-container">{}</div>"#,
        document.toasts.iter().map(toast_html).collect::<String>(),
    );

    page.push_str("</main>\n</body>\n</html>\n");
    page
}

fn upload_panel_html(document: &Document) -> String {
    let upload = &document.upload;
    let class = if upload.drag_over {
        "upload-box dragover"
    } else {
        "upload-box"
    };

    format!(
        r#"<div id="uploadBox" class="{class}"><div class="upload-content" style="display: {}"><p>Drop a room photo here or click to choose one</p><input type="file" id="imageInput" name="image" accept="image/*"></div><div id="previewContainer" class="preview-container" style="display: {}"><img id="previewImage" src="{}" alt="Preview"></div></div><button id="analyzeBtn" style="display: {}">Analyze</button>"#,
        display(upload.prompt_visible()),
        display(upload.preview_visible()),
        escape(upload.preview_src.as_deref().unwrap_or("")),
        if upload.analyze_visible() { "flex" } else { "none" },
    )
}

fn results_html(results: &ResultsView) -> String {
    let mut html = format!(
        r#"<img id="resultImage" src="{}" alt="Analyzed room"><div class="card"><h2>Dominant Colors</h2><div id="colorPalette" class="color-palette">{}</div></div>"#,
        escape(&results.image_src),
        results.palette_html,
    );

    for view in &results.cards {
        let _ = write!(
            html,
            r#"<div id="{}" class="card" style="display: {}"><h2>{}</h2><div class="card-body">{}</div></div>"#,
            view.card.element_id(),
            display(view.visible),
            view.card.title(),
            view.html,
        );
    }

    let _ = write!(
        html,
        r#"<div id="fallbackAnalysis" class="card" style="display: {}"><pre id="analysisContent">{}</pre></div><button id="resetBtn">Start Over</button>"#,
        display(results.fallback.visible),
        escape(&results.fallback.text),
    );
    html
}

fn toast_html(toast: &Toast) -> String {
    let leaving = match toast.phase {
        ToastPhase::Visible => "",
        ToastPhase::Leaving => " leaving",
    };
    format!(
        r#"<div class="toast {}{}" data-id="{}">{}</div>"#,
        toast.kind.css_class(),
        leaving,
        toast.id,
        escape(&toast.message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DominantColor, WallColor};
    use serde_json::json;

    fn parsed_with(mask: u8) -> ParsedData {
        let on = |bit: u8| mask & (1 << bit) != 0;
        ParsedData {
            dominant_colors: Some(vec![DominantColor {
                hex: Some("#aabbcc".into()),
                name: Some("Mist".into()),
                percentage: Some(30.0),
                description: None,
            }]),
            wall_colors: on(0).then(|| {
                vec![WallColor {
                    hex: Some("#f5f5dc".into()),
                    name: Some("Beige".into()),
                    reason: Some("Warm".into()),
                }]
            }),
            decoration_tips: on(1).then(|| vec!["Add plants".into()]),
            furniture_colors: on(2).then(|| vec!["Walnut".into()]),
            accessories_colors: on(3).then(|| vec!["Brass".into()]),
            color_harmony: on(4).then(|| "Analogous".into()),
            summary: on(5).then(|| "Cozy".into()),
        }
    }

    #[test]
    fn card_visibility_follows_data_for_every_combination() {
        for mask in 0u8..64 {
            let response = AnalysisResponse {
                image_base64: "data:image/png;base64,AAAA".into(),
                parsed_data: Some(parsed_with(mask)),
                analysis: Some("ignored".into()),
                ..Default::default()
            };

            let view = render_results(&response);
            for (bit, card) in Card::ALL.iter().enumerate() {
                let expected = mask & (1 << bit) != 0;
                assert_eq!(view.is_card_visible(*card), expected, "mask {mask:06b} {card:?}");
            }
            assert!(!view.fallback.visible);
        }
    }

    #[test]
    fn empty_values_hide_their_cards() {
        let parsed = ParsedData {
            wall_colors: Some(vec![]),
            decoration_tips: Some(vec![]),
            furniture_colors: Some(vec![]),
            accessories_colors: Some(vec![]),
            color_harmony: Some(String::new()),
            summary: Some(String::new()),
            ..Default::default()
        };
        let view = render_results(&AnalysisResponse {
            parsed_data: Some(parsed),
            ..Default::default()
        });
        assert!(view.visible_cards().is_empty());
    }

    #[test]
    fn raw_analysis_fallback_hides_cards() {
        let response: AnalysisResponse = serde_json::from_value(json!({
            "image_base64": "data:image/png;base64,AAAA",
            "dominant_colors": ["ff0000", "00ff00"],
            "analysis": "Walls are <b>red</b>\n  and green"
        }))
        .unwrap();

        let view = render_results(&response);
        assert!(view.visible_cards().is_empty());
        assert!(view.fallback.visible);
        assert_eq!(view.fallback.text, "Walls are <b>red</b>\n  and green");
        assert_eq!(view.palette.len(), 2);
        assert_eq!(view.palette[0].hex, "#ff0000");
        assert_eq!(view.palette[1].name, "Color 2");
        assert_eq!(view.image_src, "data:image/png;base64,AAAA");
    }

    #[test]
    fn rendering_is_idempotent() {
        let response = AnalysisResponse {
            image_base64: "data:image/png;base64,AAAA".into(),
            parsed_data: Some(parsed_with(0b101010)),
            ..Default::default()
        };
        assert_eq!(render_results(&response), render_results(&response));
    }

    #[test]
    fn palette_shows_upper_case_code_and_optional_percentage() {
        let response = AnalysisResponse {
            parsed_data: Some(parsed_with(0)),
            dominant_colors: Some(vec!["123456".into()]),
            ..Default::default()
        };
        let view = render_results(&response);
        assert!(view.palette_html.contains(r#"<div class="color-code">#AABBCC</div>"#));
        assert!(view.palette_html.contains(r#"<div class="color-percent">30%</div>"#));
        assert!(view.palette_html.contains(r##"data-copy="#aabbcc""##));

        let raw = render_results(&AnalysisResponse {
            dominant_colors: Some(vec!["123456".into()]),
            ..Default::default()
        });
        assert!(!raw.palette_html.contains("color-percent"));
    }

    #[test]
    fn wall_colors_use_defaults() {
        let parsed = ParsedData {
            wall_colors: Some(vec![WallColor::default()]),
            ..Default::default()
        };
        let view = render_results(&AnalysisResponse {
            parsed_data: Some(parsed),
            ..Default::default()
        });
        let card = view.card(Card::WallColors).unwrap();
        assert!(card.visible);
        assert!(card.html.contains("Suggested Color"));
        assert!(card.html.contains("#000000"));
        assert!(card.html.contains(r#"<div class="wall-reason"></div>"#));
    }

    #[test]
    fn server_text_is_escaped() {
        let parsed = ParsedData {
            decoration_tips: Some(vec!["<script>alert(1)</script>".into()]),
            summary: Some("Tom & Jerry".into()),
            ..Default::default()
        };
        let view = render_results(&AnalysisResponse {
            parsed_data: Some(parsed),
            ..Default::default()
        });
        let tips = &view.card(Card::DecorationTips).unwrap().html;
        assert!(tips.contains("&lt;script&gt;"));
        assert!(!tips.contains("<script>"));
        assert_eq!(view.card(Card::Summary).unwrap().html, "Tom &amp; Jerry");
    }

    #[test]
    fn page_shows_only_the_current_section() {
        let document = Document {
            state: UiState::Loading,
            ..Default::default()
        };
        let page = render_page(&document);
        assert!(page.contains(r#"<section id="loadingSection" style="display: block">"#));
        assert!(page.contains(r#"<section id="uploadSection" style="display: none">"#));
        assert!(page.contains(r#"<section id="resultsSection" style="display: none">"#));
        assert!(page.contains(r#"<section id="errorSection" style="display: none">"#));
    }

    #[test]
    fn error_page_keeps_upload_controls() {
        let document = Document {
            state: UiState::Error,
            error_message: Some("file too large".into()),
            ..Default::default()
        };
        let page = render_page(&document);
        assert!(page.contains(r#"<p id="errorMessage">file too large</p>"#));
        assert!(page.contains(r#"id="imageInput""#));
    }
}
