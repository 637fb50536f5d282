use loam::{
    element_id, AlignX, AlignY, BackgroundConfig, BorderConfig, BorderWidth, BoundingBox, Color,
    Config, Dimensions, FloatingConfig, FloatingTarget, LayoutContext, LayoutError, LayoutFrame,
    MeasuredWord, RenderData, ScrollConfig, SizingAxis, SizingConfig, TextConfig, TextMeasurement,
    Vector2, WrapMode,
};

const CHAR_WIDTH: f32 = 10.0;
const LINE_HEIGHT: f32 = 16.0;

/// Fixed-width fake font: every character is 10 units wide, every line
/// 16 tall.
fn measure(text: &str, _config: &TextConfig) -> TextMeasurement {
    let mut words = Vec::new();
    let mut token = String::new();
    let mut token_is_ws = false;
    let flush = |words: &mut Vec<MeasuredWord>, token: &mut String, is_ws: bool| {
        if token.is_empty() {
            return;
        }
        let width = token.chars().count() as f32 * CHAR_WIDTH;
        words.push(if is_ws {
            MeasuredWord::whitespace(token.clone(), width)
        } else {
            MeasuredWord::word(token.clone(), width)
        });
        token.clear();
    };
    for ch in text.chars() {
        if ch == '\n' {
            flush(&mut words, &mut token, token_is_ws);
            words.push(MeasuredWord::newline());
        } else if ch.is_whitespace() != token_is_ws && !token.is_empty() {
            flush(&mut words, &mut token, token_is_ws);
            token_is_ws = ch.is_whitespace();
            token.push(ch);
        } else {
            token_is_ws = ch.is_whitespace();
            token.push(ch);
        }
    }
    flush(&mut words, &mut token, token_is_ws);

    let total: f32 = words.iter().map(|word| word.width).sum();
    let min_width = words
        .iter()
        .filter(|word| !word.is_whitespace)
        .map(|word| word.width)
        .fold(0.0f32, f32::max);
    TextMeasurement {
        dimensions: Dimensions::new(total, LINE_HEIGHT),
        min_width,
        words,
    }
}

fn sized(width: SizingAxis, height: SizingAxis) -> Config {
    Config::Sizing(SizingConfig {
        width,
        height,
        ..Default::default()
    })
}

fn tagged(red: f32) -> Config {
    Config::Background(BackgroundConfig {
        color: Color::rgb(red, 0.0, 0.0),
        ..Default::default()
    })
}

fn rect_box(frame: &LayoutFrame, red: f32) -> BoundingBox {
    frame
        .commands
        .iter()
        .find(|command| {
            matches!(command.data, RenderData::Rectangle { color, .. } if color.r == red)
        })
        .unwrap_or_else(|| panic!("no rectangle tagged {red}"))
        .bounding_box
}

fn rectangle_count(frame: &LayoutFrame) -> usize {
    frame
        .commands
        .iter()
        .filter(|command| matches!(command.data, RenderData::Rectangle { .. }))
        .count()
}

#[test]
fn fixed_sizing_clamps_to_its_value() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(120.0), SizingAxis::fixed(80.0)))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert!(frame.errors.is_empty());
    assert_eq!(rect_box(&frame, 1.0), BoundingBox::new(0.0, 0.0, 120.0, 80.0));
}

#[test]
fn grow_children_split_leftover_evenly() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(800.0), SizingAxis::fixed(100.0)))
        .unwrap();
    for red in [1.0, 2.0] {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::grow(), SizingAxis::grow()))
            .unwrap();
        ctx.configure_element(tagged(red)).unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert_eq!(rect_box(&frame, 1.0), BoundingBox::new(0.0, 0.0, 400.0, 100.0));
    assert_eq!(rect_box(&frame, 2.0), BoundingBox::new(400.0, 0.0, 400.0, 100.0));
}

#[test]
fn grow_redistributes_past_max_bounds() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(900.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(900.0), SizingAxis::fixed(50.0)))
        .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(
        SizingAxis::grow_between(0.0, 100.0),
        SizingAxis::grow(),
    ))
    .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    for red in [2.0, 3.0] {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::grow(), SizingAxis::grow()))
            .unwrap();
        ctx.configure_element(tagged(red)).unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert_eq!(rect_box(&frame, 1.0).width, 100.0);
    assert_eq!(rect_box(&frame, 2.0).width, 400.0);
    assert_eq!(rect_box(&frame, 3.0).width, 400.0);
}

#[test]
fn percent_resolves_against_parent_inner_size() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(400.0), SizingAxis::fixed(100.0)))
        .unwrap();
    ctx.configure_element(Config::Padding(loam::Padding::all(10.0)))
        .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::percent(0.5), SizingAxis::grow()))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    let child = rect_box(&frame, 1.0);
    assert_eq!(child.width, 190.0);
    assert_eq!(child.height, 80.0);
    assert_eq!((child.x, child.y), (10.0, 10.0));
}

#[test]
fn fit_container_hugs_children_plus_padding_and_gaps() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(Config::Sizing(SizingConfig {
        child_gap: 5.0,
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(Config::Padding(loam::Padding::all(10.0)))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    for red in [2.0, 3.0] {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::fixed(20.0)))
            .unwrap();
        ctx.configure_element(tagged(red)).unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    let container = rect_box(&frame, 1.0);
    assert_eq!((container.width, container.height), (125.0, 40.0));
    assert_eq!(rect_box(&frame, 2.0).x, 10.0);
    assert_eq!(rect_box(&frame, 3.0).x, 65.0);
}

#[test]
fn between_children_borders_fill_each_gap() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(Config::Sizing(SizingConfig {
        width: SizingAxis::fixed(400.0),
        height: SizingAxis::fixed(50.0),
        child_gap: 10.0,
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(Config::Border(BorderConfig {
        color: Color::rgb(9.0, 0.0, 0.0),
        width: BorderWidth {
            between_children: 2.0,
            ..Default::default()
        },
    }))
    .unwrap();
    for _ in 0..3 {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::grow()))
            .unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();

    let separators: Vec<_> = frame
        .commands
        .iter()
        .filter(|command| {
            matches!(command.data, RenderData::Rectangle { color, .. } if color.r == 9.0)
        })
        .collect();
    assert_eq!(separators.len(), 2);
    // gaps span 50..60 and 110..120, separators centered inside them
    assert_eq!(separators[0].bounding_box.x, 54.0);
    assert_eq!(separators[1].bounding_box.x, 114.0);
    assert_eq!(separators[0].bounding_box.width, 2.0);
}

#[test]
fn between_children_borders_span_the_padded_cross_axis() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(Config::Sizing(SizingConfig {
        width: SizingAxis::fixed(400.0),
        height: SizingAxis::fixed(50.0),
        child_gap: 10.0,
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(Config::Padding(loam::Padding::all(10.0)))
        .unwrap();
    ctx.configure_element(Config::Border(BorderConfig {
        color: Color::rgb(9.0, 0.0, 0.0),
        width: BorderWidth {
            between_children: 2.0,
            ..Default::default()
        },
    }))
    .unwrap();
    for _ in 0..2 {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::grow()))
            .unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();

    let separator = rect_box(&frame, 9.0);
    // children sit at 10..60 and 70..120, the gap spans 60..70
    assert_eq!(separator.x, 64.0);
    assert_eq!(separator.width, 2.0);
    // the filler covers the container's full height, padding included
    assert_eq!(separator.y, 0.0);
    assert_eq!(separator.height, 50.0);
}

#[test]
fn transparent_between_children_borders_emit_nothing() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(Config::Sizing(SizingConfig {
        width: SizingAxis::fixed(400.0),
        height: SizingAxis::fixed(50.0),
        child_gap: 10.0,
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(Config::Border(BorderConfig {
        color: Color::TRANSPARENT,
        width: BorderWidth {
            between_children: 2.0,
            ..Default::default()
        },
    }))
    .unwrap();
    for _ in 0..3 {
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::grow()))
            .unwrap();
        ctx.close_element().unwrap();
    }
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert_eq!(rectangle_count(&frame), 0);
}

#[test]
fn child_alignment_offsets_children() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(Config::Sizing(SizingConfig {
        width: SizingAxis::fixed(300.0),
        height: SizingAxis::fixed(100.0),
        align_x: AlignX::Right,
        align_y: AlignY::Center,
        ..Default::default()
    }))
    .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(100.0), SizingAxis::fixed(50.0)))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    let child = rect_box(&frame, 1.0);
    assert_eq!((child.x, child.y), (200.0, 25.0));
}

#[test]
fn aspect_ratio_derives_the_unresolved_axis() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    // width unresolved, derived from height
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(0.0), SizingAxis::fixed(100.0)))
        .unwrap();
    ctx.configure_element(Config::AspectRatio(2.0)).unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    // height unresolved, derived from width
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fit()))
        .unwrap();
    ctx.configure_element(Config::AspectRatio(1.5)).unwrap();
    ctx.configure_element(tagged(2.0)).unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    let first = rect_box(&frame, 1.0);
    assert_eq!((first.width, first.height), (200.0, 100.0));
    let second = rect_box(&frame, 2.0);
    assert_eq!((second.width, second.height), (300.0, 200.0));
}

#[test]
fn grow_width_fit_height_ratio_resolves_end_to_end() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(400.0), SizingAxis::fixed(300.0)))
        .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::grow(), SizingAxis::fit()))
        .unwrap();
    ctx.configure_element(Config::AspectRatio(2.0)).unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    let child = rect_box(&frame, 1.0);
    assert_eq!((child.width, child.height), (400.0, 200.0));
}

#[test]
fn scroll_positions_clamp_to_content_overflow() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let id = element_id("scroller");
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element_with_id(id).unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(200.0)))
        .unwrap();
    ctx.configure_element(Config::Scroll(ScrollConfig {
        horizontal: false,
        vertical: true,
    }))
    .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(500.0)))
        .unwrap();
    ctx.close_element().unwrap();
    ctx.close_element().unwrap();
    ctx.end_layout(None).unwrap();

    let data = ctx.get_scroll_container_data(id);
    assert!(data.found);
    assert_eq!(data.container_dimensions, Dimensions::new(300.0, 200.0));
    assert_eq!(data.content_dimensions, Dimensions::new(300.0, 500.0));

    assert_eq!(
        ctx.update_scroll_position(id, Vector2::new(0.0, -50.0)),
        Vector2::new(0.0, 0.0)
    );
    assert_eq!(
        ctx.update_scroll_position(id, Vector2::new(0.0, 500.0)),
        Vector2::new(0.0, 300.0)
    );
    // the horizontal axis is disabled and pins to zero
    assert_eq!(
        ctx.update_scroll_position(id, Vector2::new(40.0, 100.0)),
        Vector2::new(0.0, 100.0)
    );
}

#[test]
fn scroll_offsets_move_children_and_bracket_with_clips() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let id = element_id("scroller");
    let run_frame = |ctx: &mut LayoutContext| {
        ctx.begin_layout(Dimensions::new(800.0, 600.0));
        ctx.open_element_with_id(id).unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(200.0)))
            .unwrap();
        ctx.configure_element(Config::Scroll(ScrollConfig {
            horizontal: false,
            vertical: true,
        }))
        .unwrap();
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(500.0)))
            .unwrap();
        ctx.configure_element(tagged(1.0)).unwrap();
        ctx.close_element().unwrap();
        ctx.close_element().unwrap();
        ctx.end_layout(None).unwrap()
    };

    run_frame(&mut ctx);
    ctx.update_scroll_position(id, Vector2::new(0.0, 100.0));
    let frame = run_frame(&mut ctx);

    assert_eq!(rect_box(&frame, 1.0).y, -100.0);

    let clip = frame
        .commands
        .iter()
        .position(|command| matches!(command.data, RenderData::Clip { .. }))
        .unwrap();
    let clip_end = frame
        .commands
        .iter()
        .position(|command| matches!(command.data, RenderData::ClipEnd))
        .unwrap();
    let child = frame
        .commands
        .iter()
        .position(|command| {
            matches!(command.data, RenderData::Rectangle { color, .. } if color.r == 1.0)
        })
        .unwrap();
    assert!(clip < child && child < clip_end);
    assert_eq!(
        frame.commands[clip].bounding_box,
        frame.commands[clip_end].bounding_box
    );
    assert!(matches!(
        frame.commands[clip].data,
        RenderData::Clip {
            horizontal: false,
            vertical: true
        }
    ));
}

#[test]
fn nested_scroll_offsets_compose_and_clips_nest() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let outer = element_id("outer");
    let inner = element_id("inner");
    let run_frame = |ctx: &mut LayoutContext| {
        ctx.begin_layout(Dimensions::new(800.0, 600.0));
        ctx.open_element_with_id(outer).unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(200.0)))
            .unwrap();
        ctx.configure_element(Config::Scroll(ScrollConfig {
            horizontal: false,
            vertical: true,
        }))
        .unwrap();
        ctx.open_element_with_id(inner).unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(500.0)))
            .unwrap();
        ctx.configure_element(Config::Scroll(ScrollConfig {
            horizontal: false,
            vertical: true,
        }))
        .unwrap();
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(800.0)))
            .unwrap();
        ctx.configure_element(tagged(1.0)).unwrap();
        ctx.close_element().unwrap();
        ctx.close_element().unwrap();
        ctx.close_element().unwrap();
        ctx.end_layout(None).unwrap()
    };

    run_frame(&mut ctx);
    ctx.update_scroll_position(outer, Vector2::new(0.0, 50.0));
    ctx.update_scroll_position(inner, Vector2::new(0.0, 30.0));
    let frame = run_frame(&mut ctx);

    // both offsets apply to the innermost content
    assert_eq!(rect_box(&frame, 1.0).y, -80.0);

    let clips: Vec<usize> = frame
        .commands
        .iter()
        .enumerate()
        .filter_map(|(index, command)| {
            matches!(command.data, RenderData::Clip { .. }).then_some(index)
        })
        .collect();
    let ends: Vec<usize> = frame
        .commands
        .iter()
        .enumerate()
        .filter_map(|(index, command)| {
            matches!(command.data, RenderData::ClipEnd).then_some(index)
        })
        .collect();
    let content = frame
        .commands
        .iter()
        .position(|command| {
            matches!(command.data, RenderData::Rectangle { color, .. } if color.r == 1.0)
        })
        .unwrap();
    assert_eq!(clips.len(), 2);
    assert_eq!(ends.len(), 2);
    assert!(clips[0] < clips[1] && clips[1] < content);
    assert!(content < ends[0] && ends[0] < ends[1]);
    // the inner bracket closes first and carries the scrolled inner box
    assert_eq!(
        frame.commands[clips[1]].bounding_box,
        frame.commands[ends[0]].bounding_box
    );
    assert_eq!(frame.commands[clips[1]].bounding_box.y, -50.0);
    assert_eq!(
        frame.commands[clips[0]].bounding_box,
        frame.commands[ends[1]].bounding_box
    );
}

#[test]
fn floating_elements_anchor_to_their_parent() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(200.0), SizingAxis::fixed(200.0)))
        .unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::fixed(50.0)))
        .unwrap();
    ctx.configure_element(Config::Floating(FloatingConfig {
        z_index: 5,
        element_anchor: (AlignX::Center, AlignY::Center),
        target_anchor: (AlignX::Center, AlignY::Center),
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();

    let float = rect_box(&frame, 1.0);
    assert_eq!((float.x, float.y), (75.0, 75.0));
    // higher z-index emits after the main tree
    let last_rect = frame
        .commands
        .iter()
        .rev()
        .find(|command| matches!(command.data, RenderData::Rectangle { .. }))
        .unwrap();
    assert_eq!(last_rect.z_index, 5);
}

#[test]
fn floating_with_missing_target_is_skipped_not_fatal() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(50.0), SizingAxis::fixed(50.0)))
        .unwrap();
    ctx.configure_element(Config::Floating(FloatingConfig {
        target: FloatingTarget::Element(element_id("nonexistent")),
        ..Default::default()
    }))
    .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(60.0), SizingAxis::fixed(60.0)))
        .unwrap();
    ctx.configure_element(tagged(2.0)).unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();

    assert!(frame.errors.iter().any(|error| matches!(
        error,
        LayoutError::FloatingContainerParentNotFound { id } if *id == element_id("nonexistent").id
    )));
    assert!(!frame.commands.iter().any(|command| {
        matches!(command.data, RenderData::Rectangle { color, .. } if color.r == 1.0)
    }));
    assert_eq!(rect_box(&frame, 2.0).width, 60.0);
}

#[test]
fn duplicate_ids_are_reported_but_not_fatal() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let id = element_id("twice");
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    for _ in 0..2 {
        ctx.open_element_with_id(id).unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(10.0), SizingAxis::fixed(10.0)))
            .unwrap();
        ctx.close_element().unwrap();
    }
    let frame = ctx.end_layout(None).unwrap();
    assert!(frame
        .errors
        .iter()
        .any(|error| matches!(error, LayoutError::DuplicateId { id: dup } if *dup == id.id)));
}

#[test]
fn reconfiguring_a_kind_overwrites_the_earlier_value() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(150.0), SizingAxis::fixed(150.0)))
        .unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(100.0), SizingAxis::fixed(100.0)))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert_eq!(rect_box(&frame, 1.0).width, 100.0);

    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(100.0), SizingAxis::fixed(100.0)))
        .unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(150.0), SizingAxis::fixed(150.0)))
        .unwrap();
    ctx.configure_element(tagged(1.0)).unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(None).unwrap();
    assert_eq!(rect_box(&frame, 1.0).width, 150.0);
}

#[test]
fn text_wraps_between_words_and_stacks_lines() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(120.0), SizingAxis::fixed(100.0)))
        .unwrap();
    ctx.text_element("hello world hello", TextConfig::default())
        .unwrap();
    ctx.close_element().unwrap();
    let frame = ctx.end_layout(Some(&measure)).unwrap();

    let lines: Vec<_> = frame
        .commands
        .iter()
        .filter_map(|command| match &command.data {
            RenderData::Text { content, .. } => Some((content.clone(), command.bounding_box)),
            _ => None,
        })
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0].0, "hello world");
    assert_eq!(lines[1].0, "hello");
    assert_eq!(lines[0].1.width, 110.0);
    assert_eq!(lines[1].1.y - lines[0].1.y, LINE_HEIGHT);
}

#[test]
fn explicit_newlines_break_without_width_wrapping() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.text_element(
        "one two\nthree",
        TextConfig {
            wrap_mode: WrapMode::Newlines,
            ..Default::default()
        },
    )
    .unwrap();
    let frame = ctx.end_layout(Some(&measure)).unwrap();
    let contents: Vec<_> = frame
        .commands
        .iter()
        .filter_map(|command| match &command.data {
            RenderData::Text { content, .. } => Some(content.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(contents, vec!["one two", "three"]);
}

#[test]
fn text_without_a_measurer_fails_the_frame() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.text_element("hi", TextConfig::default()).unwrap();
    assert!(matches!(
        ctx.end_layout(None),
        Err(LayoutError::TextMeasurementFunctionNotProvided)
    ));
}

#[test]
fn unbalanced_frames_are_structural_errors() {
    let mut ctx: LayoutContext = LayoutContext::new();
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    assert!(matches!(
        ctx.close_element(),
        Err(LayoutError::InternalError(_))
    ));

    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element().unwrap();
    assert!(matches!(
        ctx.end_layout(None),
        Err(LayoutError::InternalError(_))
    ));
}

#[test]
fn offscreen_commands_are_culled_unless_disabled() {
    let build = |ctx: &mut LayoutContext| {
        ctx.begin_layout(Dimensions::new(800.0, 600.0));
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(100.0), SizingAxis::fixed(100.0)))
            .unwrap();
        ctx.configure_element(Config::Floating(FloatingConfig {
            target: FloatingTarget::Root,
            offset: Vector2::new(-500.0, 0.0),
            ..Default::default()
        }))
        .unwrap();
        ctx.configure_element(tagged(1.0)).unwrap();
        ctx.close_element().unwrap();
        ctx.end_layout(None).unwrap()
    };

    let mut ctx: LayoutContext = LayoutContext::new();
    let frame = build(&mut ctx);
    assert_eq!(rectangle_count(&frame), 0);

    ctx.set_culling(false);
    let frame = build(&mut ctx);
    assert_eq!(rect_box(&frame, 1.0).x, -500.0);
}

#[test]
fn element_bounding_boxes_are_queryable_after_layout() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let id = element_id("panel");
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.open_element_with_id(id).unwrap();
    ctx.configure_element(sized(SizingAxis::fixed(320.0), SizingAxis::fixed(240.0)))
        .unwrap();
    ctx.close_element().unwrap();
    ctx.end_layout(None).unwrap();

    assert_eq!(
        ctx.element_bounding_box(id),
        Some(BoundingBox::new(0.0, 0.0, 320.0, 240.0))
    );
    assert_eq!(ctx.element_bounding_box(element_id("absent")), None);
}

#[test]
fn scroll_state_and_boxes_drop_with_their_elements() {
    let mut ctx: LayoutContext = LayoutContext::new();
    let id = element_id("scroller");
    let with_scroller = |ctx: &mut LayoutContext| {
        ctx.begin_layout(Dimensions::new(800.0, 600.0));
        ctx.open_element_with_id(id).unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(200.0)))
            .unwrap();
        ctx.configure_element(Config::Scroll(ScrollConfig {
            horizontal: false,
            vertical: true,
        }))
        .unwrap();
        ctx.open_element().unwrap();
        ctx.configure_element(sized(SizingAxis::fixed(300.0), SizingAxis::fixed(500.0)))
            .unwrap();
        ctx.close_element().unwrap();
        ctx.close_element().unwrap();
        ctx.end_layout(None).unwrap();
    };

    with_scroller(&mut ctx);
    assert_eq!(
        ctx.update_scroll_position(id, Vector2::new(0.0, 100.0)),
        Vector2::new(0.0, 100.0)
    );

    // a frame without the container drops its stored state
    ctx.begin_layout(Dimensions::new(800.0, 600.0));
    ctx.end_layout(None).unwrap();
    assert!(!ctx.get_scroll_container_data(id).found);
    assert_eq!(ctx.element_bounding_box(id), None);

    // re-adding it starts from an unscrolled position
    with_scroller(&mut ctx);
    assert_eq!(
        ctx.get_scroll_container_data(id).scroll_position,
        Vector2::new(0.0, 0.0)
    );
}
