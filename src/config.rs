//! Element configuration.
//!
//! Every element carries at most one config per kind, out of a closed
//! set: sizing, padding, border, background, scroll, floating, aspect
//! ratio, text, image and custom. The set is modelled as a struct of
//! `Option`s so "at most one per kind" holds by construction.
//! Re-configuring a kind that is already present overwrites the earlier
//! value (last write wins) and logs a debug message.

use crate::color::Color;
use crate::id::ElementId;
use crate::math::Vector2;
use crate::text::TextConfig;

/// Horizontal alignment, for children and floating anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignX {
    #[default]
    Left,
    Center,
    Right,
}

/// Vertical alignment, for children and floating anchors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum AlignY {
    #[default]
    Top,
    Center,
    Bottom,
}

/// Defines the layout direction for arranging child elements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum LayoutDirection {
    /// Arranges elements from left to right.
    #[default]
    LeftToRight,
    /// Arranges elements from top to bottom.
    TopToBottom,
}

/// One of the four sizing strategies, per axis per element.
///
/// `Fit` and `Grow` carry min/max bounds. `Fixed` is a literal pixel
/// value (equivalent to min == max). `Percent` is a fraction of the
/// parent's inner size and must be non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizingAxis {
    Fit { min: f32, max: f32 },
    Grow { min: f32, max: f32 },
    Fixed(f32),
    Percent(f32),
}

impl Default for SizingAxis {
    fn default() -> Self {
        Self::Fit {
            min: 0.0,
            max: f32::MAX,
        }
    }
}

impl SizingAxis {
    /// Content-sized, unconstrained.
    pub fn fit() -> Self {
        Self::default()
    }

    /// Content-sized within `min..=max`.
    pub fn fit_between(min: f32, max: f32) -> Self {
        debug_assert!(min <= max);
        Self::Fit { min, max }
    }

    /// Fills available space, unconstrained.
    pub fn grow() -> Self {
        Self::Grow {
            min: 0.0,
            max: f32::MAX,
        }
    }

    /// Fills available space within `min..=max`.
    pub fn grow_between(min: f32, max: f32) -> Self {
        debug_assert!(min <= max);
        Self::Grow { min, max }
    }

    pub fn fixed(value: f32) -> Self {
        Self::Fixed(value)
    }

    /// Fraction of the parent's inner size; `fraction` must be >= 0.
    pub fn percent(fraction: f32) -> Self {
        debug_assert!(fraction >= 0.0);
        Self::Percent(fraction)
    }

    /// Min/max bounds for clamping. `Fixed` pins both to the value;
    /// `Percent` is unbounded.
    pub(crate) fn bounds(&self) -> (f32, f32) {
        match *self {
            Self::Fit { min, max } | Self::Grow { min, max } => (min, max),
            Self::Fixed(value) => (value, value),
            Self::Percent(_) => (0.0, f32::MAX),
        }
    }

    pub(crate) fn clamp(&self, value: f32) -> f32 {
        let (min, max) = self.bounds();
        value.clamp(min, max)
    }

    /// Caps the max bound at `value` so later passes cannot re-grow
    /// this axis past it. Used by the aspect-ratio post-processor.
    pub(crate) fn pin_max(&mut self, value: f32) {
        match self {
            Self::Fit { min, max } | Self::Grow { min, max } => {
                *max = max.min(value);
                *min = min.min(*max);
            }
            Self::Fixed(_) | Self::Percent(_) => {}
        }
    }
}

/// Sizing for both axes plus the flow parameters the solver consumes:
/// layout direction, the gap between children and child alignment.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SizingConfig {
    pub width: SizingAxis,
    pub height: SizingAxis,
    pub direction: LayoutDirection,
    pub child_gap: f32,
    pub align_x: AlignX,
    pub align_y: AlignY,
}

/// Four-sided padding, each side >= 0.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Padding {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl Padding {
    pub fn new(left: f32, right: f32, top: f32, bottom: f32) -> Self {
        Self {
            left,
            right,
            top,
            bottom,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(value: f32) -> Self {
        Self::new(value, value, 0.0, 0.0)
    }

    pub fn vertical(value: f32) -> Self {
        Self::new(0.0, 0.0, value, value)
    }
}

impl From<f32> for Padding {
    fn from(value: f32) -> Self {
        Self::all(value)
    }
}

/// Per-corner radii for rectangles, borders and images.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CornerRadius {
    pub top_left: f32,
    pub top_right: f32,
    pub bottom_left: f32,
    pub bottom_right: f32,
}

impl From<f32> for CornerRadius {
    fn from(value: f32) -> Self {
        Self {
            top_left: value,
            top_right: value,
            bottom_left: value,
            bottom_right: value,
        }
    }
}

/// Border widths per side plus the width of the filler rectangles drawn
/// between adjacent children.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderWidth {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
    pub between_children: f32,
}

impl BorderWidth {
    pub fn all(value: f32) -> Self {
        Self {
            left: value,
            right: value,
            top: value,
            bottom: value,
            between_children: 0.0,
        }
    }

    pub(crate) fn has_sides(&self) -> bool {
        self.left > 0.0 || self.right > 0.0 || self.top > 0.0 || self.bottom > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BorderConfig {
    pub color: Color,
    pub width: BorderWidth,
}

/// Background fill plus the per-element data shared by every command
/// the element emits.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BackgroundConfig {
    pub color: Color,
    pub corner_radius: CornerRadius,
    /// Passed through on every render command of this element.
    pub user_data: usize,
}

/// Marks an element as a scroll container on one or both axes.
/// Scroll positions themselves live in the context's scroll-position
/// table and survive across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScrollConfig {
    pub horizontal: bool,
    pub vertical: bool,
}

/// What a floating element is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FloatingTarget {
    /// The element's hierarchical parent.
    #[default]
    Parent,
    /// The layout root.
    Root,
    /// An arbitrary element addressed by id.
    Element(ElementId),
}

/// Floating elements leave normal flow and are placed at one of nine
/// anchor points of their target, plus a pixel offset.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FloatingConfig {
    pub offset: Vector2,
    pub z_index: i16,
    pub target: FloatingTarget,
    /// Anchor on the floating element itself.
    pub element_anchor: (AlignX, AlignY),
    /// Anchor on the target's bounding box.
    pub target_anchor: (AlignX, AlignY),
}

/// Image contents for an element. Loam does not manage image assets;
/// callers assign their own ids (the same contract as font ids on
/// [`TextConfig`]) and resolve them in the render backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageConfig {
    pub image_id: u32,
}

/// A single tagged configuration value, one variant per kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Config<CustomData = ()> {
    Sizing(SizingConfig),
    Padding(Padding),
    Border(BorderConfig),
    Background(BackgroundConfig),
    Scroll(ScrollConfig),
    Floating(FloatingConfig),
    /// Width/height ratio; a ratio of zero disables the constraint.
    AspectRatio(f32),
    Text(TextConfig),
    Image(ImageConfig),
    Custom(CustomData),
}

impl<CustomData> Config<CustomData> {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Sizing(_) => "sizing",
            Self::Padding(_) => "padding",
            Self::Border(_) => "border",
            Self::Background(_) => "background",
            Self::Scroll(_) => "scroll",
            Self::Floating(_) => "floating",
            Self::AspectRatio(_) => "aspect-ratio",
            Self::Text(_) => "text",
            Self::Image(_) => "image",
            Self::Custom(_) => "custom",
        }
    }
}

/// The per-element config storage: one optional slot per kind.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConfigSet<CustomData> {
    pub sizing: Option<SizingConfig>,
    pub padding: Option<Padding>,
    pub border: Option<BorderConfig>,
    pub background: Option<BackgroundConfig>,
    pub scroll: Option<ScrollConfig>,
    pub floating: Option<FloatingConfig>,
    pub aspect_ratio: Option<f32>,
    pub text: Option<TextConfig>,
    pub image: Option<ImageConfig>,
    pub custom: Option<CustomData>,
}

impl<CustomData> Default for ConfigSet<CustomData> {
    fn default() -> Self {
        Self {
            sizing: None,
            padding: None,
            border: None,
            background: None,
            scroll: None,
            floating: None,
            aspect_ratio: None,
            text: None,
            image: None,
            custom: None,
        }
    }
}

impl<CustomData> ConfigSet<CustomData> {
    /// Stores `config` in its slot. Returns `true` when an earlier
    /// config of the same kind was overwritten.
    pub fn insert(&mut self, config: Config<CustomData>) -> bool {
        match config {
            Config::Sizing(value) => self.sizing.replace(value).is_some(),
            Config::Padding(value) => self.padding.replace(value).is_some(),
            Config::Border(value) => self.border.replace(value).is_some(),
            Config::Background(value) => self.background.replace(value).is_some(),
            Config::Scroll(value) => self.scroll.replace(value).is_some(),
            Config::Floating(value) => self.floating.replace(value).is_some(),
            Config::AspectRatio(value) => self.aspect_ratio.replace(value).is_some(),
            Config::Text(value) => self.text.replace(value).is_some(),
            Config::Image(value) => self.image.replace(value).is_some(),
            Config::Custom(value) => self.custom.replace(value).is_some(),
        }
    }

    pub fn sizing_or_default(&self) -> SizingConfig {
        self.sizing.unwrap_or_default()
    }

    pub fn padding_or_default(&self) -> Padding {
        self.padding.unwrap_or_default()
    }
}
