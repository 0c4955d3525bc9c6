use std::fmt::{self, Write as _};
use std::str::FromStr;

use qrcode::render::svg;
use qrcode::{Color, QrCode};
use serde::Deserialize;
use thiserror::Error;

/// Light border, in modules, that ISO 18004 asks for around the symbol.
const QUIET_ZONE: u32 = 4;

/// How the SVG for a code is put together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Standalone document, one rect per dark module
    Basic,
    /// Bare <svg> element with the same rects, for embedding
    Fragment,
    /// Standalone document, all dark modules in a single path
    Path,
}

impl Strategy {
    pub const NAMES: &'static [&'static str] = &["basic", "fragment", "path"];
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Strategy::Basic => "basic",
            Strategy::Fragment => "fragment",
            Strategy::Path => "path",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown strategy {0:?}, expected basic, fragment or path")]
pub struct UnknownStrategy(pub String);

impl FromStr for Strategy {
    type Err = UnknownStrategy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "basic" => Ok(Strategy::Basic),
            "fragment" => Ok(Strategy::Fragment),
            "path" => Ok(Strategy::Path),
            _ => Err(UnknownStrategy(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
#[error("cannot encode {url:?} as a QR code: {reason}")]
pub struct RenderError {
    pub url: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
pub struct SvgStyle {
    pub module_size: u32,
    pub dark_color: String,
    pub light_color: String,
    pub quiet_zone: bool,
}

impl Default for SvgStyle {
    fn default() -> Self {
        SvgStyle {
            module_size: 10,
            dark_color: "#000000".to_string(),
            light_color: "#ffffff".to_string(),
            quiet_zone: true,
        }
    }
}

pub fn render(url: &str, strategy: Strategy, style: &SvgStyle) -> Result<String, RenderError> {
    let code = QrCode::new(url.as_bytes()).map_err(|e| RenderError {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    Ok(match strategy {
        Strategy::Basic => {
            let side = side_len(&code, style);
            format!(
                "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n{}",
                svg_element(&code, style, Some(style.light_color.as_str()), side)
            )
        }
        Strategy::Fragment => svg_element(&code, style, None, side_len(&code, style)),
        Strategy::Path => code
            .render::<svg::Color>()
            .module_dimensions(style.module_size, style.module_size)
            .dark_color(svg::Color(&style.dark_color))
            .light_color(svg::Color(&style.light_color))
            .quiet_zone(style.quiet_zone)
            .build(),
    })
}

fn margin(style: &SvgStyle) -> u32 {
    if style.quiet_zone {
        QUIET_ZONE
    } else {
        0
    }
}

fn side_len(code: &QrCode, style: &SvgStyle) -> u32 {
    (code.width() as u32 + 2 * margin(style)) * style.module_size
}

fn svg_element(code: &QrCode, style: &SvgStyle, background: Option<&str>, side: u32) -> String {
    let mut out = format!(
        "<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" width=\"{side}\" height=\"{side}\" viewBox=\"0 0 {side} {side}\">"
    );
    if let Some(fill) = background {
        let _ = write!(out, "<rect width=\"{side}\" height=\"{side}\" fill=\"{fill}\"/>");
    }

    let width = code.width();
    let (m, q) = (style.module_size, margin(style));
    let _ = write!(out, "<g fill=\"{}\">", style.dark_color);
    for (i, color) in code.to_colors().iter().enumerate() {
        if matches!(color, Color::Dark) {
            let x = (i % width) as u32 + q;
            let y = (i / width) as u32 + q;
            let _ = write!(
                out,
                "<rect x=\"{}\" y=\"{}\" width=\"{m}\" height=\"{m}\"/>",
                x * m,
                y * m
            );
        }
    }
    out.push_str("</g></svg>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/a";

    fn dark_modules(url: &str) -> usize {
        QrCode::new(url.as_bytes())
            .unwrap()
            .to_colors()
            .iter()
            .filter(|c| matches!(c, Color::Dark))
            .count()
    }

    #[test]
    fn strategy_names() {
        assert_eq!("basic".parse::<Strategy>(), Ok(Strategy::Basic));
        assert_eq!(" Fragment ".parse::<Strategy>(), Ok(Strategy::Fragment));
        assert_eq!("PATH".parse::<Strategy>(), Ok(Strategy::Path));
        assert!("png".parse::<Strategy>().is_err());
        for name in Strategy::NAMES {
            assert_eq!(name.parse::<Strategy>().unwrap().to_string(), *name);
        }
    }

    #[test]
    fn basic_is_standalone_rects() {
        let svg = render(URL, Strategy::Basic, &SvgStyle::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.ends_with("</svg>"));
        assert!(!svg.contains("<path"));
        // one background rect plus one per dark module
        assert_eq!(svg.matches("<rect").count(), dark_modules(URL) + 1);
    }

    #[test]
    fn fragment_has_no_prolog_or_background() {
        let svg = render(URL, Strategy::Fragment, &SvgStyle::default()).unwrap();
        assert!(svg.starts_with("<svg"));
        assert_eq!(svg.matches("<rect").count(), dark_modules(URL));
    }

    #[test]
    fn path_is_single_path() {
        let svg = render(URL, Strategy::Path, &SvgStyle::default()).unwrap();
        assert!(svg.starts_with("<?xml"));
        assert!(svg.contains("<path"));
        assert!(svg.contains("#000000"));
        // at most a background rect, never one per module
        assert!(svg.matches("<rect").count() <= 1);
    }

    #[test]
    fn quiet_zone_and_size() {
        let code = QrCode::new(URL.as_bytes()).unwrap();
        let with = SvgStyle::default();
        let without = SvgStyle {
            quiet_zone: false,
            module_size: 1,
            ..SvgStyle::default()
        };
        assert_eq!(side_len(&code, &with), (code.width() as u32 + 8) * 10);
        assert_eq!(side_len(&code, &without), code.width() as u32);

        let svg = render(URL, Strategy::Fragment, &without).unwrap();
        assert!(svg.contains(&format!("width=\"{}\"", code.width())));
    }

    #[test]
    fn colours_applied() {
        let style = SvgStyle {
            dark_color: "#1c1917".into(),
            ..SvgStyle::default()
        };
        for strategy in [Strategy::Basic, Strategy::Fragment, Strategy::Path] {
            assert!(render(URL, strategy, &style).unwrap().contains("#1c1917"));
        }
    }

    #[test]
    fn oversized_input_is_an_error() {
        let huge = format!("https://example.com/{}", "x".repeat(8000));
        let err = render(&huge, Strategy::Basic, &SvgStyle::default()).unwrap_err();
        assert_eq!(err.url, huge);
    }
}
