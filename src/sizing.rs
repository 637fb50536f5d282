//! The sizing passes.
//!
//! Widths resolve before heights. Each axis gets a bottom-up fit
//! aggregation (done once, for both axes) followed by a top-down
//! resolution pass that expands percent and grow children into the
//! space their parent actually has. Text wraps between the two axis
//! passes, and aspect ratios derive one axis from the other after each
//! pass.

use std::collections::VecDeque;

use crate::config::SizingAxis;
use crate::context::LayoutContext;
use crate::math::Dimensions;
use crate::text::{TextLine, WrapMode};

const EPSILON: f32 = 0.01;

fn axis(dimensions: Dimensions, x_axis: bool) -> f32 {
    if x_axis {
        dimensions.width
    } else {
        dimensions.height
    }
}

fn set_axis(dimensions: &mut Dimensions, x_axis: bool, value: f32) {
    if x_axis {
        dimensions.width = value;
    } else {
        dimensions.height = value;
    }
}

fn sizing_axis(sizing: crate::config::SizingConfig, x_axis: bool) -> SizingAxis {
    if x_axis {
        sizing.width
    } else {
        sizing.height
    }
}

impl<CustomData: Clone + Default + std::fmt::Debug> LayoutContext<CustomData> {
    /// Bottom-up pass: gives every fit-sized element its content size
    /// and every element its compression floor. Fixed axes take their
    /// value, percent axes stay at zero until the parent is known.
    pub(crate) fn aggregate_fit_sizes(&mut self, index: usize) {
        let children = self.elements[index].children.clone();
        for &child in &children {
            self.aggregate_fit_sizes(child);
        }

        for x_axis in [true, false] {
            let element = &self.elements[index];
            let primary = element.is_primary_axis(x_axis);
            let padding = element.padding_along(x_axis);
            let gaps = element.gap_along(x_axis);

            let (mut content, mut min_content) = if element.is_text() {
                (axis(element.dimensions, x_axis), axis(element.min_dimensions, x_axis))
            } else {
                let mut content = 0.0f32;
                let mut min_content = 0.0f32;
                for &child in &children {
                    let child_size = axis(self.elements[child].dimensions, x_axis);
                    let child_min = axis(self.elements[child].min_dimensions, x_axis);
                    if primary {
                        content += child_size;
                        min_content += child_min;
                    } else {
                        content = content.max(child_size);
                        min_content = min_content.max(child_min);
                    }
                }
                (content + padding + gaps, min_content + padding + gaps)
            };

            let element = &mut self.elements[index];
            let sizing = sizing_axis(element.sizing(), x_axis);
            match sizing {
                SizingAxis::Percent(_) => {
                    content = 0.0;
                    min_content = 0.0;
                }
                _ => {
                    content = sizing.clamp(content);
                    min_content = sizing.clamp(min_content);
                }
            }
            set_axis(&mut element.dimensions, x_axis, content);
            set_axis(&mut element.min_dimensions, x_axis, min_content);
        }
    }

    /// Top-down pass for one axis: resolves percent children, grows
    /// grow children into leftover space, and compresses overflowing
    /// children toward their floors.
    pub(crate) fn size_along_axis(&mut self, x_axis: bool) {
        let roots = self.roots.clone();
        let mut queue = VecDeque::new();
        for root in &roots {
            self.size_detached_root(root.element, x_axis);
            queue.push_back(root.element);
        }
        while let Some(index) = queue.pop_front() {
            self.size_children_along_axis(index, x_axis);
            for &child in &self.elements[index].children {
                queue.push_back(child);
            }
        }
    }

    /// Floating roots resolve percent and grow against their
    /// hierarchical parent, which was sized in an earlier tree.
    fn size_detached_root(&mut self, index: usize, x_axis: bool) {
        let Some(parent) = self.elements[index].parent else {
            return;
        };
        let parent_inner =
            axis(self.elements[parent].dimensions, x_axis) - self.elements[parent].padding_along(x_axis);
        let element = &mut self.elements[index];
        match sizing_axis(element.sizing(), x_axis) {
            SizingAxis::Percent(fraction) => {
                set_axis(&mut element.dimensions, x_axis, parent_inner * fraction);
            }
            sizing @ SizingAxis::Grow { .. } => {
                set_axis(&mut element.dimensions, x_axis, sizing.clamp(parent_inner));
            }
            _ => {}
        }
    }

    fn size_children_along_axis(&mut self, index: usize, x_axis: bool) {
        let children = self.elements[index].children.clone();
        if children.is_empty() {
            return;
        }
        let parent = &self.elements[index];
        let parent_inner = axis(parent.dimensions, x_axis) - parent.padding_along(x_axis);
        let gaps = parent.gap_along(x_axis);
        let primary = parent.is_primary_axis(x_axis);
        let parent_scrolls = parent.scrolls(x_axis);

        if primary {
            self.size_primary(&children, parent_inner, gaps, parent_scrolls, x_axis);
        } else {
            self.size_cross(&children, parent_inner, parent_scrolls, x_axis);
        }
    }

    fn size_primary(
        &mut self,
        children: &[usize],
        parent_inner: f32,
        gaps: f32,
        parent_scrolls: bool,
        x_axis: bool,
    ) {
        let mut pool = parent_inner - gaps;
        let mut grow_children = Vec::new();
        for &child in children {
            let sizing = sizing_axis(self.elements[child].sizing(), x_axis);
            match sizing {
                SizingAxis::Percent(fraction) => {
                    let size = pool.max(0.0) * fraction;
                    set_axis(&mut self.elements[child].dimensions, x_axis, size);
                }
                SizingAxis::Grow { min, .. } => {
                    set_axis(&mut self.elements[child].dimensions, x_axis, min.max(0.0));
                    grow_children.push(child);
                }
                _ => {}
            }
        }
        for &child in children {
            pool -= axis(self.elements[child].dimensions, x_axis);
        }

        // Waterfill leftover space into grow children, an even share
        // each, re-splitting whenever a max bound clamps one out.
        let mut active = grow_children;
        while pool > EPSILON && !active.is_empty() {
            let share = pool / active.len() as f32;
            let mut clamped_any = false;
            let mut still_active = Vec::with_capacity(active.len());
            for child in active {
                let current = axis(self.elements[child].dimensions, x_axis);
                let (_, max) = sizing_axis(self.elements[child].sizing(), x_axis).bounds();
                if current + share >= max {
                    pool -= max - current;
                    set_axis(&mut self.elements[child].dimensions, x_axis, max);
                    clamped_any = true;
                } else {
                    still_active.push(child);
                }
            }
            if !clamped_any {
                for &child in &still_active {
                    let current = axis(self.elements[child].dimensions, x_axis);
                    set_axis(&mut self.elements[child].dimensions, x_axis, current + share);
                }
                pool = 0.0;
            }
            active = still_active;
        }

        if pool < -EPSILON && !parent_scrolls {
            self.compress_children(children, -pool, x_axis);
        }
    }

    /// Shrinks overflowing children largest-first toward their floors,
    /// keeping the largest children level with each other as they
    /// shrink.
    fn compress_children(&mut self, children: &[usize], mut overflow: f32, x_axis: bool) {
        while overflow > EPSILON {
            let mut largest = 0.0f32;
            let mut second = 0.0f32;
            let mut resizable = 0usize;
            for &child in children {
                let size = axis(self.elements[child].dimensions, x_axis);
                let floor = axis(self.elements[child].min_dimensions, x_axis);
                if size - floor <= EPSILON {
                    continue;
                }
                resizable += 1;
                if size > largest + EPSILON {
                    second = largest;
                    largest = size;
                } else if size > largest - EPSILON {
                    // ties at the top shrink together
                } else if size > second {
                    second = size;
                }
            }
            if resizable == 0 {
                break;
            }
            let at_largest: Vec<usize> = children
                .iter()
                .copied()
                .filter(|&child| {
                    let size = axis(self.elements[child].dimensions, x_axis);
                    let floor = axis(self.elements[child].min_dimensions, x_axis);
                    size - floor > EPSILON && size > largest - EPSILON
                })
                .collect();
            let step = (largest - second).max(EPSILON);
            let per_child = (overflow / at_largest.len() as f32).min(step);
            for &child in &at_largest {
                let size = axis(self.elements[child].dimensions, x_axis);
                let floor = axis(self.elements[child].min_dimensions, x_axis);
                let reduced = (size - per_child).max(floor);
                overflow -= size - reduced;
                set_axis(&mut self.elements[child].dimensions, x_axis, reduced);
            }
        }
    }

    fn size_cross(
        &mut self,
        children: &[usize],
        parent_inner: f32,
        parent_scrolls: bool,
        x_axis: bool,
    ) {
        for &child in children {
            let sizing = sizing_axis(self.elements[child].sizing(), x_axis);
            match sizing {
                SizingAxis::Percent(fraction) => {
                    set_axis(
                        &mut self.elements[child].dimensions,
                        x_axis,
                        parent_inner * fraction,
                    );
                }
                SizingAxis::Grow { .. } => {
                    set_axis(
                        &mut self.elements[child].dimensions,
                        x_axis,
                        sizing.clamp(parent_inner),
                    );
                }
                _ => {
                    if !parent_scrolls {
                        let current = axis(self.elements[child].dimensions, x_axis);
                        let floor = axis(self.elements[child].min_dimensions, x_axis);
                        if current > parent_inner {
                            set_axis(
                                &mut self.elements[child].dimensions,
                                x_axis,
                                parent_inner.max(floor),
                            );
                        }
                    }
                }
            }
        }
    }

    /// Breaks measured text into lines that fit the widths the width
    /// pass produced, then re-derives each text element's height.
    pub(crate) fn wrap_text(&mut self) {
        for element in &mut self.elements {
            let Some(text) = element.text.as_mut() else {
                continue;
            };
            let config = element.configs.text.unwrap_or_default();
            let line_height = if config.line_height > 0.0 {
                config.line_height
            } else {
                text.measurement.dimensions.height
            };
            let available = element.dimensions.width;

            text.lines.clear();
            match config.wrap_mode {
                WrapMode::None => {
                    text.lines.push(TextLine {
                        content: text.content.clone(),
                        dimensions: Dimensions::new(
                            text.measurement.dimensions.width,
                            line_height,
                        ),
                    });
                }
                WrapMode::Newlines | WrapMode::Words => {
                    let break_on_width = config.wrap_mode == WrapMode::Words;
                    let mut builder = LineBuilder::default();
                    for word in &text.measurement.words {
                        if word.is_newline {
                            builder.flush(&mut text.lines, line_height, true);
                            continue;
                        }
                        if break_on_width
                            && !word.is_whitespace
                            && !builder.is_empty()
                            && builder.width + word.width > available + EPSILON
                        {
                            builder.flush(&mut text.lines, line_height, true);
                        }
                        if word.is_whitespace && builder.is_empty() {
                            // leading whitespace after a break is dropped
                            continue;
                        }
                        builder.push(word);
                    }
                    builder.flush(&mut text.lines, line_height, false);
                    if text.lines.is_empty() {
                        text.lines.push(TextLine {
                            content: String::new(),
                            dimensions: Dimensions::new(0.0, line_height),
                        });
                    }
                }
            }

            element.dimensions.height = text.lines.len() as f32 * line_height;
            if let fit @ SizingAxis::Fit { .. } = element.configs.sizing_or_default().width {
                let widest = text
                    .lines
                    .iter()
                    .map(|line| line.dimensions.width)
                    .fold(0.0f32, f32::max);
                element.dimensions.width = fit.clamp(widest.min(element.dimensions.width));
            }
        }
    }

    /// Derives the unresolved axis of every aspect-constrained element
    /// and pins that axis's max bound so a later pass cannot grow past
    /// the ratio.
    pub(crate) fn apply_aspect_ratios(&mut self) {
        for element in &mut self.elements {
            let Some(ratio) = element.configs.aspect_ratio else {
                continue;
            };
            if ratio <= 0.0 {
                continue;
            }
            let Dimensions { width, height } = element.dimensions;
            if width == 0.0 && height > 0.0 {
                let derived = height * ratio;
                element.dimensions.width = derived;
                let sizing = element.configs.sizing.get_or_insert_with(Default::default);
                sizing.width.pin_max(derived);
            } else if height == 0.0 && width > 0.0 {
                let derived = width / ratio;
                element.dimensions.height = derived;
                let sizing = element.configs.sizing.get_or_insert_with(Default::default);
                sizing.height.pin_max(derived);
            }
        }
    }

    /// After wrapping and aspect derivation change leaf heights, fit
    /// heights are stale all the way up the tree; recompute them
    /// bottom-up before the height pass runs.
    pub(crate) fn propagate_heights(&mut self, index: usize) {
        let children = self.elements[index].children.clone();
        for &child in &children {
            self.propagate_heights(child);
        }
        if children.is_empty() {
            return;
        }
        let element = &self.elements[index];
        let sizing = element.sizing();
        if !matches!(sizing.height, SizingAxis::Fit { .. }) {
            return;
        }
        let primary = element.is_primary_axis(false);
        let padding = element.padding_along(false);
        let gaps = element.gap_along(false);
        let mut content = 0.0f32;
        for &child in &children {
            let child_height = self.elements[child].dimensions.height;
            if primary {
                content += child_height;
            } else {
                content = content.max(child_height);
            }
        }
        let height = sizing.height.clamp(content + padding + gaps);
        self.elements[index].dimensions.height = height;
    }
}

/// Accumulates tokens for one line, tracking trailing whitespace so it
/// can be trimmed off both the text and the width at a break.
#[derive(Default)]
struct LineBuilder {
    content: String,
    width: f32,
    trailing_ws_bytes: usize,
    trailing_ws_width: f32,
}

impl LineBuilder {
    fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    fn push(&mut self, word: &crate::text::MeasuredWord) {
        if word.is_whitespace {
            self.trailing_ws_bytes += word.text.len();
            self.trailing_ws_width += word.width;
        } else {
            self.trailing_ws_bytes = 0;
            self.trailing_ws_width = 0.0;
        }
        self.content.push_str(&word.text);
        self.width += word.width;
    }

    /// Emits the accumulated line. A forced flush (explicit newline or
    /// width break) emits even an empty line; the final flush does not.
    fn flush(&mut self, lines: &mut Vec<TextLine>, line_height: f32, forced: bool) {
        self.content.truncate(self.content.len() - self.trailing_ws_bytes);
        self.width -= self.trailing_ws_width;
        if !forced && self.content.is_empty() {
            self.content.clear();
            self.width = 0.0;
            self.trailing_ws_bytes = 0;
            self.trailing_ws_width = 0.0;
            return;
        }
        lines.push(TextLine {
            content: std::mem::take(&mut self.content),
            dimensions: Dimensions::new(self.width.max(0.0), line_height),
        });
        self.width = 0.0;
        self.trailing_ws_bytes = 0;
        self.trailing_ws_width = 0.0;
    }
}
