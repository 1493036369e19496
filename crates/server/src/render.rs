//! Frame views and their HTML form.
//!
//! Handlers build a [`FrameView`] and hand it to [`render_html`]; the image is
//! an SVG shipped inline as a `data:` URI.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use shared::domain::{CarouselState, TOTAL_PAGES};
use url::{form_urlencoded, Url};

pub const MAX_BUTTONS: usize = 4;

const IMAGE_WIDTH: u32 = 1146;
const IMAGE_HEIGHT: u32 = 600;
const FONT_SIZE: u32 = 36;
const LINE_HEIGHT: u32 = 50;
const WRAP_COLUMNS: usize = 48;
const BACKGROUND: &str = "#334155";

const TELEGRAM_URL: &str = "https://t.me/+77kyZqV51Dg0ZDgx";
const FRUTERO_CLUB_URL: &str = "https://frutero.club";
/// Zora collectible offered when the claim cannot go through.
const FALLBACK_MINT_TARGET: &str = "eip155:7777777:0x060f3edd18c47f59bd23d063bbeb9aa4a8fec6df:123";

const PAGES: [&[&str]; TOTAL_PAGES as usize] = [
    &[
        "¿Quieres saber qué es Frutero Club?",
        "Completa este miniquest y gana $PULPA",
        "Haz click en \"Iniciar\" para conocer más",
    ],
    &["Frutero Club nació cuando un grupo de apasionados por la tecnología empezaron a juntarse para construir soluciones \"chidas\""],
    &["Lo que empezó como reuniones de nerds se convirtió en una comunidad internacional (de nerds)"],
    &["Ahora, ayudamos a otras personas a construir sus ideas para resolver problemas reales"],
    &[
        "Si quieres saber más, únete a nuestro canal de Telegram",
        "Te has ganado 10 $PULPA, nuestro token comunitario",
    ],
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    Post,
    Link(String),
    Mint(String),
}

impl ButtonAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Post => "post",
            Self::Link(_) => "link",
            Self::Mint(_) => "mint",
        }
    }

    fn target(&self) -> Option<&str> {
        match self {
            Self::Post => None,
            Self::Link(target) | Self::Mint(target) => Some(target),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameButton {
    pub label: String,
    pub action: ButtonAction,
}

impl FrameButton {
    fn post(label: &str) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Post,
        }
    }

    fn link(label: &str, url: &str) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Link(url.into()),
        }
    }

    fn mint(label: &str, target: &str) -> Self {
        Self {
            label: label.into(),
            action: ButtonAction::Mint(target.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameImage {
    pub lines: Vec<String>,
    pub footer: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameView {
    pub image: FrameImage,
    pub buttons: Vec<FrameButton>,
    /// Carried to the next request through the post URL.
    pub state: CarouselState,
}

pub fn carousel_view(state: CarouselState) -> FrameView {
    let page = state.page_index();
    let lines = PAGES[usize::from(page)]
        .iter()
        .map(|line| line.to_string())
        .collect();

    let mut buttons = Vec::with_capacity(MAX_BUTTONS);
    if !state.is_splash() {
        buttons.push(FrameButton::post(if state.is_claim_page() {
            "Reiniciar"
        } else {
            "←"
        }));
    }
    if state.is_claim_page() {
        buttons.push(FrameButton::post("Reclamar $PULPA"));
        buttons.push(FrameButton::link("Canal Telegram", TELEGRAM_URL));
        buttons.push(FrameButton::link("Frutero Club", FRUTERO_CLUB_URL));
    } else {
        buttons.push(FrameButton::post(if state.is_splash() { "Iniciar" } else { "→" }));
    }

    FrameView {
        image: FrameImage {
            lines,
            footer: Some(format!("{} / {TOTAL_PAGES}", page + 1)),
        },
        buttons,
        state,
    }
}

pub fn gas_exhausted_view(state: CarouselState) -> FrameView {
    notice_view("¡Se acabó el gas!", state)
}

pub fn failure_view(state: CarouselState) -> FrameView {
    notice_view("¡Ups, ocurrió un error!", state)
}

fn notice_view(message: &str, state: CarouselState) -> FrameView {
    FrameView {
        image: FrameImage {
            lines: vec![message.to_string()],
            footer: None,
        },
        buttons: vec![
            FrameButton::mint("Mint", FALLBACK_MINT_TARGET),
            FrameButton::link("Frutero Club", FRUTERO_CLUB_URL),
        ],
        state,
    }
}

pub fn post_url(host: &Url, state: CarouselState) -> String {
    let mut url = host.clone();
    // Keep any base path the host is mounted under.
    if let Ok(mut segments) = url.path_segments_mut() {
        segments.pop_if_empty().push("frames");
    }
    url.set_fragment(None);
    url.query_pairs_mut()
        .clear()
        .append_pair("state", &state.to_query());
    url.into()
}

fn debug_link(host: &Url) -> String {
    let host = host.as_str().trim_end_matches('/');
    let host: String = form_urlencoded::byte_serialize(host.as_bytes()).collect();
    format!("/debug?url={host}")
}

pub fn render_html(view: &FrameView, host: &Url) -> String {
    let image = image_data_uri(&view.image);
    let mut meta = vec![
        meta_tag("fc:frame", "vNext"),
        meta_tag("fc:frame:image", &image),
        meta_tag("og:image", &image),
        meta_tag("fc:frame:post_url", &post_url(host, view.state)),
    ];
    for (index, button) in view.buttons.iter().take(MAX_BUTTONS).enumerate() {
        let n = index + 1;
        meta.push(meta_tag(&format!("fc:frame:button:{n}"), &button.label));
        meta.push(meta_tag(
            &format!("fc:frame:button:{n}:action"),
            button.action.name(),
        ));
        if let Some(target) = button.action.target() {
            meta.push(meta_tag(&format!("fc:frame:button:{n}:target"), target));
        }
    }

    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"es\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<title>Frutero Club</title>\n",
            "{meta}\n",
            "</head>\n",
            "<body>\n",
            "<div class=\"p-4\">frames.js starter kit. ",
            "<a href=\"{debug}\" class=\"underline\">Debug</a></div>\n",
            "</body>\n",
            "</html>\n"
        ),
        meta = meta.join("\n"),
        debug = escape(&debug_link(host)),
    )
}

fn meta_tag(property: &str, content: &str) -> String {
    format!(
        "<meta property=\"{}\" content=\"{}\">",
        escape(property),
        escape(content)
    )
}

fn image_data_uri(image: &FrameImage) -> String {
    format!(
        "data:image/svg+xml;base64,{}",
        STANDARD.encode(render_svg(image))
    )
}

pub fn render_svg(image: &FrameImage) -> String {
    let lines: Vec<String> = image
        .lines
        .iter()
        .flat_map(|paragraph| wrap(paragraph, WRAP_COLUMNS))
        .collect();

    let block_height = LINE_HEIGHT * lines.len() as u32;
    let first_baseline = IMAGE_HEIGHT.saturating_sub(block_height) / 2 + FONT_SIZE;
    let center = IMAGE_WIDTH / 2;

    let mut svg = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{IMAGE_WIDTH}\" height=\"{IMAGE_HEIGHT}\" viewBox=\"0 0 {IMAGE_WIDTH} {IMAGE_HEIGHT}\">"
    );
    svg.push_str(&format!(
        "<rect width=\"100%\" height=\"100%\" fill=\"{BACKGROUND}\"/>"
    ));
    for (index, line) in lines.iter().enumerate() {
        let y = first_baseline + LINE_HEIGHT * index as u32;
        svg.push_str(&format!(
            "<text x=\"{center}\" y=\"{y}\" fill=\"white\" font-family=\"sans-serif\" font-size=\"{FONT_SIZE}\" text-anchor=\"middle\">{}</text>",
            escape(line)
        ));
    }
    if let Some(footer) = &image.footer {
        let y = IMAGE_HEIGHT - FONT_SIZE / 2;
        svg.push_str(&format!(
            "<text x=\"{center}\" y=\"{y}\" fill=\"white\" font-family=\"sans-serif\" font-size=\"{FONT_SIZE}\" text-anchor=\"middle\">{}</text>",
            escape(footer)
        ));
    }
    svg.push_str("</svg>");
    svg
}

/// Greedy word wrap by character count.
fn wrap(paragraph: &str, columns: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in paragraph.split_whitespace() {
        let needed = current.chars().count() + 1 + word.chars().count();
        if !current.is_empty() && needed > columns {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
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

#[cfg(test)]
#[path = "tests/render_tests.rs"]
mod tests;
