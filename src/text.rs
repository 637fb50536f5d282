//! Text configuration and measurement.
//!
//! Loam never touches fonts. Callers inject a measurement function into
//! [`end_layout`](crate::LayoutContext::end_layout); it receives the raw
//! text and its [`TextConfig`] and returns a [`TextMeasurement`] with
//! per-word metrics. The engine caches measurements keyed by the text
//! plus the config fields that affect metrics, so repeated frames with
//! the same strings measure nothing.

use std::hash::Hasher;

use rustc_hash::FxHasher;

use crate::color::Color;
use crate::config::AlignX;
use crate::math::Dimensions;

/// How text reacts to running out of horizontal space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum WrapMode {
    /// Break between words; explicit newlines also break.
    #[default]
    Words,
    /// Only explicit newlines break.
    Newlines,
    /// Never break; the single line may overflow.
    None,
}

/// Styling and measurement parameters for a text element.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextConfig {
    pub color: Color,
    /// Caller-managed font handle, resolved by the measurement function
    /// and the render backend.
    pub font_id: u16,
    pub font_size: u16,
    pub letter_spacing: u16,
    /// Vertical advance per line; `0.0` means use the measured natural
    /// line height.
    pub line_height: f32,
    pub wrap_mode: WrapMode,
    pub alignment: AlignX,
    /// Passed through on the emitted text commands.
    pub user_data: usize,
}

impl TextConfig {
    /// Cache key over the text and the fields that change its metrics.
    /// Color, alignment and user data deliberately do not participate.
    pub(crate) fn measurement_key(&self, text: &str) -> u64 {
        let mut hasher = FxHasher::default();
        hasher.write(text.as_bytes());
        hasher.write_u16(self.font_id);
        hasher.write_u16(self.font_size);
        hasher.write_u16(self.letter_spacing);
        hasher.finish()
    }
}

/// One measured token: a run of non-whitespace characters, a run of
/// whitespace, or a newline.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasuredWord {
    pub text: String,
    pub width: f32,
    pub is_whitespace: bool,
    pub is_newline: bool,
}

impl MeasuredWord {
    pub fn word(text: impl Into<String>, width: f32) -> Self {
        Self {
            text: text.into(),
            width,
            is_whitespace: false,
            is_newline: false,
        }
    }

    pub fn whitespace(text: impl Into<String>, width: f32) -> Self {
        Self {
            text: text.into(),
            width,
            is_whitespace: true,
            is_newline: false,
        }
    }

    pub fn newline() -> Self {
        Self {
            text: String::new(),
            width: 0.0,
            is_whitespace: false,
            is_newline: true,
        }
    }
}

/// Output of the caller's measurement function for one string.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TextMeasurement {
    /// Size of the whole string laid out on a single line, newlines
    /// aside. The height is the natural line height.
    pub dimensions: Dimensions,
    /// Width of the widest unbreakable token; the floor below which
    /// wrapping cannot compress the text.
    pub min_width: f32,
    pub words: Vec<MeasuredWord>,
}

/// Measurement callback signature. Implementations split `text` into
/// [`MeasuredWord`] tokens, preserving whitespace runs and newlines.
pub type MeasureTextFn = dyn Fn(&str, &TextConfig) -> TextMeasurement;

/// One laid-out line after wrapping.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct TextLine {
    pub content: String,
    pub dimensions: Dimensions,
}
