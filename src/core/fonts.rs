//! Font resolution and text measuring.
//!
//! The renderer never loads fonts on its own: it is handed a [`FontResolver`]
//! that maps each logical [`FontStyle`] to font data and measures text in it.
//!
//! Built-in fonts are measured with the base-14 Helvetica AFM widths, in em
//! units, covering printable ASCII and the Latin-1 supplement (0xA0..=0xFF).
//! Other characters use `average_char_width`. Embedded TrueType fonts are
//! measured with the glyph advances of the font itself.

use crate::domain::model::FontStyle;
use crate::utils::error::{BingoError, Result};
use printpdf::BuiltinFont;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use ttf_parser::{Face, GlyphId};

pub struct FontMetricTable {
    /// 0x20..=0x7E
    ascii: [f32; 95],
    /// 0xA0..=0xFF
    latin1: [f32; 96],
    /// Fallback for characters outside both ranges.
    pub average_char_width: f32,
    /// Height of capital letters, used to place the baseline.
    pub cap_height: f32,
}

impl FontMetricTable {
    /// Rendered width of `s` in em units.
    pub fn measure_str(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| match c as usize {
                code @ 0x20..=0x7E => self.ascii[code - 0x20],
                code @ 0xA0..=0xFF => self.latin1[code - 0xA0],
                _ => self.average_char_width,
            })
            .sum()
    }

    /// Rendered width of `s` in points at `font_size`.
    pub fn text_width(&self, s: &str, font_size: f32) -> f32 {
        self.measure_str(s) * font_size
    }
}

/// Helvetica and Helvetica-Oblique.
pub static HELVETICA: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    ascii: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // 8      9
        0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722,
        // I      J      K      L      M
        0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722,
        // V      W      X      Y      Z
        0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556,
        // i      j      k      l      m
        0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556,
        // v      w      x      y      z
        0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp   ¡      ¢      £      ¤      ¥      ¦      §
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.260, 0.556,
        // ¨      ©      ª      «      ¬      shy    ®      ¯
        0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // °      ±      ²      ³      ´      µ      ¶      ·
        0.400, 0.584, 0.333, 0.333, 0.333, 0.556, 0.537, 0.278,
        // ¸      ¹      º      »      ¼      ½      ¾      ¿
        0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // À      Á      Â      Ã      Ä      Å      Æ      Ç
        0.667, 0.667, 0.667, 0.667, 0.667, 0.667, 1.000, 0.722,
        // È      É      Ê      Ë      Ì      Í      Î      Ï
        0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // Ð      Ñ      Ò      Ó      Ô      Õ      Ö      ×
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584,
        // Ø      Ù      Ú      Û      Ü      Ý      Þ      ß
        0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // à      á      â      ã      ä      å      æ      ç
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.500,
        // è      é      ê      ë      ì      í      î      ï
        0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // ð      ñ      ò      ó      ô      õ      ö      ÷
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.584,
        // ø      ù      ú      û      ü      ý      þ      ÿ
        0.611, 0.556, 0.556, 0.556, 0.556, 0.500, 0.556, 0.500,
    ],
    average_char_width: 0.54,
    cap_height: 0.718,
};

/// Helvetica-Bold and Helvetica-BoldOblique.
pub static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    #[rustfmt::skip]
    ascii: [
        // sp     !      "      #      $      %      &      '
        0.278, 0.333, 0.474, 0.556, 0.556, 0.889, 0.722, 0.238,
        // (      )      *      +      ,      -      .      /
        0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // 8      9
        0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.333, 0.333, 0.584, 0.584, 0.584, 0.611, 0.975,
        // A      B      C      D      E      F      G      H
        0.722, 0.722, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722,
        // I      J      K      L      M
        0.278, 0.556, 0.722, 0.611, 0.833,
        // N      O      P      Q      R      S      T      U
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722,
        // V      W      X      Y      Z
        0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.584, 0.556, 0.333,
        // a      b      c      d      e      f      g      h
        0.556, 0.611, 0.556, 0.611, 0.556, 0.333, 0.611, 0.611,
        // i      j      k      l      m
        0.278, 0.278, 0.556, 0.278, 0.889,
        // n      o      p      q      r      s      t      u
        0.611, 0.611, 0.611, 0.611, 0.389, 0.556, 0.333, 0.611,
        // v      w      x      y      z
        0.556, 0.778, 0.556, 0.556, 0.500,
        // {      |      }      ~
        0.389, 0.280, 0.389, 0.584,
    ],
    #[rustfmt::skip]
    latin1: [
        // nbsp   ¡      ¢      £      ¤      ¥      ¦      §
        0.278, 0.333, 0.556, 0.556, 0.556, 0.556, 0.280, 0.556,
        // ¨      ©      ª      «      ¬      shy    ®      ¯
        0.333, 0.737, 0.370, 0.556, 0.584, 0.333, 0.737, 0.333,
        // °      ±      ²      ³      ´      µ      ¶      ·
        0.400, 0.584, 0.333, 0.333, 0.333, 0.611, 0.556, 0.278,
        // ¸      ¹      º      »      ¼      ½      ¾      ¿
        0.333, 0.333, 0.365, 0.556, 0.834, 0.834, 0.834, 0.611,
        // À      Á      Â      Ã      Ä      Å      Æ      Ç
        0.722, 0.722, 0.722, 0.722, 0.722, 0.722, 1.000, 0.722,
        // È      É      Ê      Ë      Ì      Í      Î      Ï
        0.667, 0.667, 0.667, 0.667, 0.278, 0.278, 0.278, 0.278,
        // Ð      Ñ      Ò      Ó      Ô      Õ      Ö      ×
        0.722, 0.722, 0.778, 0.778, 0.778, 0.778, 0.778, 0.584,
        // Ø      Ù      Ú      Û      Ü      Ý      Þ      ß
        0.778, 0.722, 0.722, 0.722, 0.722, 0.667, 0.667, 0.611,
        // à      á      â      ã      ä      å      æ      ç
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.889, 0.556,
        // è      é      ê      ë      ì      í      î      ï
        0.556, 0.556, 0.556, 0.556, 0.278, 0.278, 0.278, 0.278,
        // ð      ñ      ò      ó      ô      õ      ö      ÷
        0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.611, 0.584,
        // ø      ù      ú      û      ü      ý      þ      ÿ
        0.611, 0.611, 0.611, 0.611, 0.611, 0.556, 0.611, 0.556,
    ],
    average_char_width: 0.58,
    cap_height: 0.718,
};

pub fn metrics_for(style: FontStyle) -> &'static FontMetricTable {
    match style {
        FontStyle::Regular | FontStyle::Italic => &HELVETICA,
        FontStyle::Bold | FontStyle::BoldItalic => &HELVETICA_BOLD,
    }
}

/// Where the bytes for a font come from.
#[derive(Debug, Clone)]
pub enum FontSource {
    /// One of the 14 standard PDF fonts; nothing is embedded.
    Builtin(BuiltinFont),
    /// TrueType data embedded into every document.
    Embedded { name: String, data: Arc<Vec<u8>> },
}

/// Resolves the four logical font variants for the renderer and measures
/// text set in them.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, style: FontStyle) -> Result<FontSource>;

    /// Width of `text` in points at `font_size`.
    fn text_width(&self, style: FontStyle, text: &str, font_size: f32) -> f32 {
        metrics_for(style).text_width(text, font_size)
    }

    /// Cap height in em units.
    fn cap_height(&self, style: FontStyle) -> f32 {
        metrics_for(style).cap_height
    }
}

impl<T: FontResolver + ?Sized> FontResolver for Box<T> {
    fn resolve(&self, style: FontStyle) -> Result<FontSource> {
        (**self).resolve(style)
    }

    fn text_width(&self, style: FontStyle, text: &str, font_size: f32) -> f32 {
        (**self).text_width(style, text, font_size)
    }

    fn cap_height(&self, style: FontStyle) -> f32 {
        (**self).cap_height(style)
    }
}

/// The Helvetica family from the PDF base-14 set.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinFontResolver;

impl FontResolver for BuiltinFontResolver {
    fn resolve(&self, style: FontStyle) -> Result<FontSource> {
        let font = match style {
            FontStyle::Regular => BuiltinFont::Helvetica,
            FontStyle::Bold => BuiltinFont::HelveticaBold,
            FontStyle::Italic => BuiltinFont::HelveticaOblique,
            FontStyle::BoldItalic => BuiltinFont::HelveticaBoldOblique,
        };
        Ok(FontSource::Builtin(font))
    }
}

/// A parsed TrueType face: raw bytes plus the numbers needed to measure text.
#[derive(Debug, Clone)]
pub struct TrueTypeFont {
    data: Arc<Vec<u8>>,
    units_per_em: f32,
    cap_height: f32,
}

impl TrueTypeFont {
    /// Fails with `FontError` when `data` is not a readable font.
    pub fn parse(name: &str, data: Vec<u8>) -> Result<Self> {
        let face = Face::parse(&data, 0).map_err(|e| BingoError::FontError {
            name: name.to_string(),
            message: e.to_string(),
        })?;

        let units_per_em = f32::from(face.units_per_em());
        let cap_height = face
            .capital_height()
            .map(|height| f32::from(height) / units_per_em)
            .unwrap_or(HELVETICA.cap_height);

        Ok(Self {
            data: Arc::new(data),
            units_per_em,
            cap_height,
        })
    }

    pub fn data(&self) -> &Arc<Vec<u8>> {
        &self.data
    }

    /// Sum of horizontal glyph advances in em units. Characters without a
    /// glyph are measured as `.notdef`, which is what ends up on the page.
    pub fn measure_str(&self, s: &str) -> f32 {
        let Ok(face) = Face::parse(&self.data, 0) else {
            return HELVETICA.measure_str(s);
        };

        let units: u32 = s
            .chars()
            .map(|c| {
                let glyph = face.glyph_index(c).unwrap_or(GlyphId(0));
                u32::from(face.glyph_hor_advance(glyph).unwrap_or(0))
            })
            .sum();

        units as f32 / self.units_per_em
    }

    pub fn text_width(&self, s: &str, font_size: f32) -> f32 {
        self.measure_str(s) * font_size
    }
}

/// Reads `<dir>/<Family>-<Variant>.ttf` once at construction and hands out
/// shared bytes afterwards.
#[derive(Debug, Clone)]
pub struct DirectoryFontResolver {
    family: String,
    fonts: HashMap<FontStyle, TrueTypeFont>,
}

impl DirectoryFontResolver {
    pub fn font_file(dir: &Path, family: &str, style: FontStyle) -> PathBuf {
        dir.join(format!("{}-{}.ttf", family, style.variant_name()))
    }

    pub fn load<P: AsRef<Path>>(dir: P, family: &str) -> Result<Self> {
        let dir = dir.as_ref();
        let mut fonts = HashMap::new();

        for style in FontStyle::ALL {
            let path = Self::font_file(dir, family, style);
            let name = path.display().to_string();
            let data = std::fs::read(&path).map_err(|e| BingoError::FontError {
                name: name.clone(),
                message: e.to_string(),
            })?;
            tracing::debug!("Loaded font {} ({} bytes)", name, data.len());
            fonts.insert(style, TrueTypeFont::parse(&name, data)?);
        }

        Ok(Self {
            family: family.to_string(),
            fonts,
        })
    }

    pub fn family(&self) -> &str {
        &self.family
    }
}

impl FontResolver for DirectoryFontResolver {
    fn resolve(&self, style: FontStyle) -> Result<FontSource> {
        let name = format!("{}-{}", self.family, style.variant_name());
        match self.fonts.get(&style) {
            Some(font) => Ok(FontSource::Embedded {
                name,
                data: Arc::clone(font.data()),
            }),
            None => Err(BingoError::FontError {
                name,
                message: "variant was not loaded".to_string(),
            }),
        }
    }

    fn text_width(&self, style: FontStyle, text: &str, font_size: f32) -> f32 {
        match self.fonts.get(&style) {
            Some(font) => font.text_width(text, font_size),
            None => metrics_for(style).text_width(text, font_size),
        }
    }

    fn cap_height(&self, style: FontStyle) -> f32 {
        match self.fonts.get(&style) {
            Some(font) => font.cap_height,
            None => metrics_for(style).cap_height,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use tempfile::TempDir;

    pub(crate) fn sample_ttf() -> Vec<u8> {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/RobotoMedium.ttf");
        std::fs::read(path).unwrap()
    }

    /// Font directory holding the sample face under all four variant names.
    pub(crate) fn sample_font_dir(family: &str) -> TempDir {
        let dir = TempDir::new().unwrap();
        let data = sample_ttf();
        for style in FontStyle::ALL {
            std::fs::write(DirectoryFontResolver::font_file(dir.path(), family, style), &data)
                .unwrap();
        }
        dir
    }

    #[test]
    fn test_measure_str() {
        // "Hi" = H (0.722) + i (0.222)
        assert!((HELVETICA.measure_str("Hi") - 0.944).abs() < 1e-4);
        assert!((HELVETICA.text_width("Hi", 10.0) - 9.44).abs() < 1e-3);
        assert_eq!(HELVETICA.measure_str(""), 0.0);
    }

    #[test]
    fn test_latin1_widths() {
        assert!((HELVETICA.measure_str("ø") - 0.611).abs() < 1e-6);
        assert!((HELVETICA.measure_str("æ") - 0.889).abs() < 1e-6);
        assert!((HELVETICA.measure_str("å") - 0.556).abs() < 1e-6);
        assert!((HELVETICA_BOLD.measure_str("Å") - 0.722).abs() < 1e-6);

        let accented = HELVETICA.measure_str("Blåbærsyltetøy");
        let plain = HELVETICA.measure_str("Blabarsyltetoy");
        assert!((accented - plain - (0.889 - 0.556) - (0.611 - 0.556)).abs() < 1e-4);
    }

    #[test]
    fn test_other_characters_use_average() {
        assert!((HELVETICA.measure_str("€") - HELVETICA.average_char_width).abs() < 1e-6);
        assert!((HELVETICA.measure_str("\u{7f}") - HELVETICA.average_char_width).abs() < 1e-6);
    }

    #[test]
    fn test_bold_is_wider() {
        let text = "Hemit Musikkbingo";
        assert!(HELVETICA_BOLD.measure_str(text) > HELVETICA.measure_str(text));
    }

    #[test]
    fn test_builtin_resolver_covers_all_styles() {
        let resolver = BuiltinFontResolver;
        for style in FontStyle::ALL {
            assert!(matches!(resolver.resolve(style), Ok(FontSource::Builtin(_))));
        }
        let width = resolver.text_width(FontStyle::Regular, "Hi", 10.0);
        assert!((width - 9.44).abs() < 1e-3);
    }

    #[test]
    fn test_truetype_width_matches_glyph_advances() {
        let data = sample_ttf();
        let font = TrueTypeFont::parse("sample", data.clone()).unwrap();

        let face = Face::parse(&data, 0).unwrap();
        let expected: f32 = "Hemit Musikkbingo"
            .chars()
            .map(|c| f32::from(face.glyph_hor_advance(face.glyph_index(c).unwrap()).unwrap()))
            .sum::<f32>()
            / f32::from(face.units_per_em());

        assert!((font.measure_str("Hemit Musikkbingo") - expected).abs() < 1e-4);
        assert!(font.cap_height > 0.5 && font.cap_height < 0.9);
    }

    #[test]
    fn test_directory_resolver_loads_variants() {
        let dir = sample_font_dir("Roboto");

        let resolver = DirectoryFontResolver::load(dir.path(), "Roboto").unwrap();
        assert_eq!(resolver.family(), "Roboto");
        match resolver.resolve(FontStyle::BoldItalic).unwrap() {
            FontSource::Embedded { name, data } => {
                assert_eq!(name, "Roboto-BoldItalic");
                assert_eq!(data.as_slice(), sample_ttf().as_slice());
            }
            other => panic!("unexpected source: {:?}", other),
        }
    }

    #[test]
    fn test_directory_resolver_measures_with_embedded_font() {
        let dir = sample_font_dir("Roboto");
        let resolver = DirectoryFontResolver::load(dir.path(), "Roboto").unwrap();

        let title = "Hemit Musikkbingo";
        let embedded = resolver.text_width(FontStyle::Bold, title, 20.0);
        let expected = TrueTypeFont::parse("sample", sample_ttf())
            .unwrap()
            .text_width(title, 20.0);

        assert!((embedded - expected).abs() < 1e-3);
        assert!((embedded - HELVETICA_BOLD.text_width(title, 20.0)).abs() > 1.0);
    }

    #[test]
    fn test_directory_resolver_rejects_non_font_data() {
        let dir = TempDir::new().unwrap();
        for style in FontStyle::ALL {
            let path = DirectoryFontResolver::font_file(dir.path(), "OpenSans", style);
            std::fs::write(path, b"not really a font").unwrap();
        }

        let err = DirectoryFontResolver::load(dir.path(), "OpenSans").unwrap_err();
        assert!(matches!(err, BingoError::FontError { .. }));
    }

    #[test]
    fn test_directory_resolver_missing_variant() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            DirectoryFontResolver::font_file(dir.path(), "OpenSans", FontStyle::Regular),
            sample_ttf(),
        )
        .unwrap();

        let err = DirectoryFontResolver::load(dir.path(), "OpenSans").unwrap_err();
        assert!(matches!(err, BingoError::FontError { .. }));
    }
}
