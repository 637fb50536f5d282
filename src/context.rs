//! The layout context: frame lifecycle, builder API and persistent
//! cross-frame state.
//!
//! A frame is `begin_layout`, a balanced sequence of
//! `open_element`/`configure_element`/`close_element` calls, then
//! `end_layout`, which runs the sizing passes and returns the render
//! commands. Element bounding boxes, scroll positions and the text
//! measurement cache persist across frames; everything else is rebuilt.

use rustc_hash::{FxHashMap, FxHashSet};

use crate::arena::{Element, TextElement, TreeRoot};
use crate::config::{Config, ScrollConfig, SizingAxis, SizingConfig};
use crate::errors::LayoutError;
use crate::id::{element_id, element_id_from_parent, ElementId};
use crate::math::{BoundingBox, Dimensions, Vector2};
use crate::render_commands::RenderCommand;
use crate::text::{MeasureTextFn, TextConfig};

const DEFAULT_MAX_ELEMENTS: usize = 8192;
const DEFAULT_MAX_MEASUREMENTS: usize = 16384;
const ROOT_LABEL: &str = "Loam__Root";

/// Result of one resolved frame: the ordered command stream plus the
/// non-fatal errors collected while resolving it.
#[derive(Debug, Clone)]
pub struct LayoutFrame<CustomData = ()> {
    pub commands: Vec<RenderCommand<CustomData>>,
    pub errors: Vec<LayoutError>,
}

/// Snapshot of one scroll container, queryable between frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollContainerData {
    /// False when the id was not a scroll container last frame; the
    /// remaining fields are zeroed in that case.
    pub found: bool,
    pub scroll_position: Vector2,
    pub container_dimensions: Dimensions,
    pub content_dimensions: Dimensions,
    pub config: ScrollConfig,
}

/// Cross-frame record of an element seen under a given id.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MapEntry {
    pub bounding_box: BoundingBox,
    pub generation: u32,
}

/// Per-frame record of one scroll container, kept for queries until
/// the next frame overwrites it.
#[derive(Debug, Clone, Copy)]
pub(crate) struct ScrollEntry {
    pub id: u32,
    pub config: ScrollConfig,
    pub container: Dimensions,
    pub content: Dimensions,
}

pub struct LayoutContext<CustomData: Clone + Default + std::fmt::Debug = ()> {
    pub(crate) elements: Vec<Element<CustomData>>,
    pub(crate) open_stack: Vec<usize>,
    pub(crate) roots: Vec<TreeRoot>,
    pub(crate) element_map: FxHashMap<u32, MapEntry>,
    pub(crate) scroll_positions: FxHashMap<u32, Vector2>,
    pub(crate) scroll_entries: Vec<ScrollEntry>,
    pub(crate) measure_cache: FxHashMap<u64, crate::text::TextMeasurement>,
    pub(crate) frame_errors: Vec<LayoutError>,
    pub(crate) generation: u32,
    pub(crate) viewport: Dimensions,
    pub(crate) pointer: Vector2,
    pub(crate) debug_mode: bool,
    /// Final bounding box per arena index; `None` for floating
    /// subtrees whose target could not be resolved.
    pub(crate) bounding_boxes: Vec<Option<BoundingBox>>,
    culling: bool,
    pub(crate) max_elements: usize,
    max_measurements: usize,
}

impl<CustomData: Clone + Default + std::fmt::Debug> Default for LayoutContext<CustomData> {
    fn default() -> Self {
        Self::new()
    }
}

impl<CustomData: Clone + Default + std::fmt::Debug> LayoutContext<CustomData> {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ELEMENTS)
    }

    /// A context that refuses to grow past `max_elements` elements per
    /// frame (and four render commands per element).
    pub fn with_capacity(max_elements: usize) -> Self {
        Self {
            elements: Vec::new(),
            open_stack: Vec::new(),
            roots: Vec::new(),
            element_map: FxHashMap::default(),
            scroll_positions: FxHashMap::default(),
            scroll_entries: Vec::new(),
            measure_cache: FxHashMap::default(),
            frame_errors: Vec::new(),
            generation: 0,
            viewport: Dimensions::default(),
            pointer: Vector2::default(),
            debug_mode: false,
            bounding_boxes: Vec::new(),
            culling: true,
            max_elements,
            max_measurements: DEFAULT_MAX_MEASUREMENTS,
        }
    }

    pub fn set_pointer_position(&mut self, position: Vector2) {
        self.pointer = position;
    }

    /// Enables the bounding-box overlay appended after the main
    /// command stream.
    pub fn set_debug_mode(&mut self, enabled: bool) {
        self.debug_mode = enabled;
    }

    /// Viewport culling of the final command stream, on by default.
    pub fn set_culling(&mut self, enabled: bool) {
        self.culling = enabled;
    }

    /// Drops every cached text measurement. Call after fonts change;
    /// there is no finer-grained invalidation.
    pub fn reset_text_measurement_cache(&mut self) {
        self.measure_cache.clear();
    }

    /// Starts a new frame. Any state from an unfinished previous frame
    /// is discarded.
    pub fn begin_layout(&mut self, viewport: Dimensions) {
        self.elements.clear();
        self.open_stack.clear();
        self.roots.clear();
        self.scroll_entries.clear();
        self.bounding_boxes.clear();
        self.frame_errors.clear();
        self.generation = self.generation.wrapping_add(1);
        self.viewport = viewport;

        let mut root = Element::new(element_id(ROOT_LABEL), None);
        root.configs.insert(Config::Sizing(SizingConfig {
            width: SizingAxis::fixed(viewport.width),
            height: SizingAxis::fixed(viewport.height),
            ..Default::default()
        }));
        self.elements.push(root);
        self.open_stack.push(0);
        self.roots.push(TreeRoot {
            element: 0,
            z_index: 0,
        });
        self.register_id(element_id(ROOT_LABEL));
    }

    /// Opens an anonymous child of the currently open element. Its id
    /// is derived from the parent id and the child's position, so it
    /// is stable across frames as long as the tree shape is.
    pub fn open_element(&mut self) -> Result<(), LayoutError> {
        let parent = self.current_open()?;
        let slot = self.elements[parent].child_slots;
        let id = element_id_from_parent(slot, self.elements[parent].id.id);
        self.open_child(id, parent)
    }

    /// Opens a child under an explicit id. A second element with the
    /// same id in one frame records [`LayoutError::DuplicateId`] and
    /// shadows the earlier one in the id tables.
    pub fn open_element_with_id(&mut self, id: ElementId) -> Result<(), LayoutError> {
        let parent = self.current_open()?;
        self.register_id(id);
        self.open_child(id, parent)
    }

    /// Attaches `config` to the currently open element. Configuring a
    /// kind twice overwrites the earlier value.
    pub fn configure_element(&mut self, config: Config<CustomData>) -> Result<(), LayoutError> {
        let current = self.current_open()?;
        let kind = config.kind();
        if self.elements[current].configs.insert(config) {
            log::debug!(
                "element {:#010x}: {kind} config replaced an earlier one",
                self.elements[current].id.id
            );
        }
        Ok(())
    }

    /// Closes the currently open element. Floating elements detach
    /// from the flow here and become their own tree roots.
    pub fn close_element(&mut self) -> Result<(), LayoutError> {
        if self.open_stack.len() <= 1 {
            return Err(LayoutError::InternalError(
                "close_element without a matching open_element",
            ));
        }
        let index = self
            .open_stack
            .pop()
            .ok_or(LayoutError::InternalError("open stack empty"))?;
        if let Some(floating) = self.elements[index].configs.floating {
            self.roots.push(TreeRoot {
                element: index,
                z_index: floating.z_index,
            });
        } else if let Some(parent) = self.elements[index].parent {
            self.elements[parent].children.push(index);
        }
        Ok(())
    }

    /// Adds a text leaf under the currently open element.
    pub fn text_element(
        &mut self,
        text: impl Into<String>,
        config: TextConfig,
    ) -> Result<(), LayoutError> {
        self.open_element()?;
        self.configure_element(Config::Text(config))?;
        let current = self.current_open()?;
        self.elements[current].text = Some(TextElement {
            content: text.into(),
            measurement: Default::default(),
            lines: Vec::new(),
        });
        self.close_element()
    }

    /// Finishes the frame: measures text, runs the sizing passes and
    /// post-processors, and lowers the tree to render commands.
    ///
    /// `measure` may be `None` only for frames with no text elements.
    pub fn end_layout(
        &mut self,
        measure: Option<&MeasureTextFn>,
    ) -> Result<LayoutFrame<CustomData>, LayoutError> {
        if self.open_stack.len() != 1 {
            return Err(LayoutError::InternalError(
                "end_layout with unclosed elements",
            ));
        }
        self.open_stack.clear();

        self.measure_text_elements(measure)?;

        let roots = self.roots.clone();
        for root in &roots {
            self.aggregate_fit_sizes(root.element);
        }
        self.size_along_axis(true);
        self.wrap_text();
        self.apply_aspect_ratios();
        for root in &roots {
            self.propagate_heights(root.element);
        }
        self.size_along_axis(false);
        self.apply_aspect_ratios();

        self.record_scroll_containers();

        let mut commands = self.emit_commands();
        let generation = self.generation;
        self.element_map.retain(|_, entry| entry.generation == generation);
        if self.culling {
            crate::debug::cull_render_commands(
                &mut commands,
                BoundingBox::from_dimensions(Vector2::default(), self.viewport),
            );
        }

        Ok(LayoutFrame {
            commands,
            errors: std::mem::take(&mut self.frame_errors),
        })
    }

    /// Scroll state of the container last seen under `id`.
    pub fn get_scroll_container_data(&self, id: ElementId) -> ScrollContainerData {
        let Some(entry) = self.scroll_entries.iter().find(|entry| entry.id == id.id) else {
            return ScrollContainerData::default();
        };
        ScrollContainerData {
            found: true,
            scroll_position: self
                .scroll_positions
                .get(&id.id)
                .copied()
                .unwrap_or_default(),
            container_dimensions: entry.container,
            content_dimensions: entry.content,
            config: entry.config,
        }
    }

    /// Stores a new scroll position for `id`, clamped into the valid
    /// range, and returns the position actually stored. Unknown ids
    /// clamp against empty content, so they store zero.
    pub fn update_scroll_position(&mut self, id: ElementId, position: Vector2) -> Vector2 {
        let entry = self.scroll_entries.iter().find(|entry| entry.id == id.id);
        let clamped = match entry {
            Some(entry) => clamp_scroll(position, entry.config, entry.container, entry.content),
            None => Vector2::default(),
        };
        self.scroll_positions.insert(id.id, clamped);
        clamped
    }

    /// Bounding box the element had in the most recent frame. `None`
    /// for ids the last frame did not place.
    pub fn element_bounding_box(&self, id: ElementId) -> Option<BoundingBox> {
        self.element_map
            .get(&id.id)
            .map(|entry| entry.bounding_box)
    }

    pub(crate) fn scroll_offset(&self, id: u32) -> Vector2 {
        self.scroll_positions.get(&id).copied().unwrap_or_default()
    }

    fn current_open(&self) -> Result<usize, LayoutError> {
        self.open_stack
            .last()
            .copied()
            .ok_or(LayoutError::InternalError("no open element"))
    }

    fn open_child(&mut self, id: ElementId, parent: usize) -> Result<(), LayoutError> {
        if self.elements.len() >= self.max_elements {
            return Err(LayoutError::ElementsCapacityExceeded {
                max: self.max_elements,
            });
        }
        self.elements[parent].child_slots += 1;
        let index = self.elements.len();
        self.elements.push(Element::new(id, Some(parent)));
        self.open_stack.push(index);
        Ok(())
    }

    /// Records `id` in the cross-frame map, flagging in-frame
    /// duplicates. The bounding box is refreshed during emission.
    fn register_id(&mut self, id: ElementId) {
        match self.element_map.get_mut(&id.id) {
            Some(entry) if entry.generation == self.generation => {
                log::warn!("duplicate element id {:#010x} in one frame", id.id);
                self.frame_errors
                    .push(LayoutError::DuplicateId { id: id.id });
            }
            Some(entry) => {
                entry.generation = self.generation;
            }
            None => {
                self.element_map.insert(
                    id.id,
                    MapEntry {
                        bounding_box: BoundingBox::default(),
                        generation: self.generation,
                    },
                );
            }
        }
    }

    fn measure_text_elements(&mut self, measure: Option<&MeasureTextFn>) -> Result<(), LayoutError> {
        let has_text = self.elements.iter().any(Element::is_text);
        if !has_text {
            return Ok(());
        }
        let Some(measure) = measure else {
            return Err(LayoutError::TextMeasurementFunctionNotProvided);
        };

        let mut cache_overflowed = false;
        for element in &mut self.elements {
            let Some(text) = element.text.as_mut() else {
                continue;
            };
            let config = element
                .configs
                .text
                .unwrap_or_default();
            let key = config.measurement_key(&text.content);
            let measurement = match self.measure_cache.get(&key) {
                Some(cached) => cached.clone(),
                None => {
                    let measured = measure(&text.content, &config);
                    if self.measure_cache.len() < self.max_measurements {
                        self.measure_cache.insert(key, measured.clone());
                    } else if !cache_overflowed {
                        cache_overflowed = true;
                        log::warn!(
                            "text measurement cache full ({} entries), measuring uncached",
                            self.max_measurements
                        );
                        self.frame_errors
                            .push(LayoutError::TextMeasurementCapacityExceeded {
                                max: self.max_measurements,
                            });
                    }
                    measured
                }
            };
            element.dimensions = measurement.dimensions;
            element.min_dimensions = Dimensions::new(
                measurement.min_width,
                measurement.dimensions.height,
            );
            text.measurement = measurement;
        }
        Ok(())
    }

    /// Rebuilds the per-frame scroll table, clamps every stored
    /// position into its container's new valid range and drops
    /// positions whose container no longer exists.
    fn record_scroll_containers(&mut self) {
        for index in 0..self.elements.len() {
            let Some(config) = self.elements[index].configs.scroll else {
                continue;
            };
            let element = &self.elements[index];
            let content = self.content_dimensions(index);
            let entry = ScrollEntry {
                id: element.id.id,
                config,
                container: element.dimensions,
                content,
            };
            self.scroll_entries.push(entry);
            let stored = self.scroll_offset(entry.id);
            let clamped = clamp_scroll(stored, config, entry.container, content);
            self.scroll_positions.insert(entry.id, clamped);
        }
        let seen: FxHashSet<u32> = self.scroll_entries.iter().map(|entry| entry.id).collect();
        self.scroll_positions.retain(|id, _| seen.contains(id));
    }

    /// Extent of an element's children plus its padding: the size the
    /// content would need to be fully visible.
    pub(crate) fn content_dimensions(&self, index: usize) -> Dimensions {
        let element = &self.elements[index];
        let mut along = 0.0f32;
        let mut cross = 0.0f32;
        for &child in &element.children {
            let child_dims = self.elements[child].dimensions;
            let (child_along, child_cross) = if element.is_primary_axis(true) {
                (child_dims.width, child_dims.height)
            } else {
                (child_dims.height, child_dims.width)
            };
            along += child_along;
            cross = cross.max(child_cross);
        }
        along += element.gap_along(element.is_primary_axis(true));
        if element.is_primary_axis(true) {
            Dimensions::new(
                along + element.padding_along(true),
                cross + element.padding_along(false),
            )
        } else {
            Dimensions::new(
                cross + element.padding_along(true),
                along + element.padding_along(false),
            )
        }
    }
}

/// Clamps a scroll position into `0..=max(0, content - container)` per
/// axis, pinning disabled axes to zero.
pub(crate) fn clamp_scroll(
    position: Vector2,
    config: ScrollConfig,
    container: Dimensions,
    content: Dimensions,
) -> Vector2 {
    let max_x = (content.width - container.width).max(0.0);
    let max_y = (content.height - container.height).max(0.0);
    Vector2 {
        x: if config.horizontal {
            position.x.clamp(0.0, max_x)
        } else {
            0.0
        },
        y: if config.vertical {
            position.y.clamp(0.0, max_y)
        } else {
            0.0
        },
    }
}
