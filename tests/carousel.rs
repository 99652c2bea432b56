//! End-to-end carousel scenarios through the public API.

use page_blocks::block::{BlockContext, DecoratedBlock, decorate_blocks};
use page_blocks::carousel::{
    self, Carousel, Control, HeadlessViewport, NAV_CLASS, NEXT_CLASS, PREV_CLASS, ScrollHost,
    ScrollIntoView,
};
use page_blocks::config::{BlockConfig, CarouselConfig};
use page_blocks::dom::{Document, NodeId};
use page_blocks::picture::QueryStringOptimizer;

fn optimizer() -> QueryStringOptimizer {
    QueryStringOptimizer::from_config(&BlockConfig::default().images).unwrap()
}

fn image_cell(n: usize) -> String {
    format!(r#"<div><picture><img src="/media/slide-{n}.jpg" alt="Slide {n}"></picture></div>"#)
}

fn text_cell(n: usize) -> String {
    format!("<div><h2>Heading {n}</h2><p>Body {n}</p></div>")
}

fn carousel_html(rows: &[String]) -> String {
    let rows: String = rows.iter().map(|r| format!("<div>{r}</div>")).collect();
    format!(r#"<div class="carousel">{rows}</div>"#)
}

fn decorate_html(html: &str) -> (Document, Carousel) {
    let mut doc = Document::parse_fragment(html).unwrap();
    let block = doc.first_element_child(doc.root()).unwrap();
    let carousel =
        carousel::decorate(&mut doc, block, &CarouselConfig::default(), &optimizer()).unwrap();
    (doc, carousel)
}

fn four_slides() -> (Document, Carousel) {
    let rows: Vec<String> = (1..=4)
        .map(|n| format!("{}{}", image_cell(n), text_cell(n)))
        .collect();
    decorate_html(&carousel_html(&rows))
}

fn active(doc: &Document, carousel: &Carousel) -> Vec<usize> {
    carousel
        .navigation()
        .unwrap()
        .dots()
        .iter()
        .filter(|d| doc.has_class(d.node, "active"))
        .map(|d| d.index)
        .collect()
}

fn count_class(doc: &Document, scope: NodeId, class: &str) -> usize {
    doc.descendants_by_class(scope, class).count()
}

#[derive(Default)]
struct Scrolls(Vec<NodeId>);

impl ScrollHost for Scrolls {
    fn scroll_into_view(&mut self, target: NodeId, _options: &ScrollIntoView) {
        self.0.push(target);
    }
}

#[test]
fn four_image_rows_build_an_interactive_carousel() {
    let (doc, carousel) = four_slides();

    assert_eq!(carousel.total(), 4);
    for slide in carousel.slides() {
        let children: Vec<_> = doc.element_children(slide.node).collect();
        assert_eq!(children.len(), 2);
        assert_eq!(Some(children[0]), slide.image_part);
        assert!(doc.has_class(children[0], "carousel-slide-image"));
        assert!(doc.has_class(children[1], "carousel-slide-body"));
    }

    let block = carousel.block();
    assert_eq!(count_class(&doc, block, PREV_CLASS), 1);
    assert_eq!(count_class(&doc, block, NEXT_CLASS), 1);
    let nav = doc.descendants_by_class(block, NAV_CLASS).next().unwrap();
    assert_eq!(doc.attr(nav, "role"), Some("tablist"));
    assert_eq!(doc.element_children(nav).count(), 4);
    assert_eq!(active(&doc, &carousel), vec![0]);
}

#[test]
fn slide_images_go_through_the_optimizer() {
    let (doc, carousel) = four_slides();

    let image = carousel.slides()[0].image_part.unwrap();
    let html = doc.inner_html(image);
    assert!(html.contains(r#"type="image/webp""#), "{html}");
    assert!(
        html.contains(r#"src="/media/slide-1.jpg?width=750&amp;format=jpg&amp;optimize=medium""#),
        "{html}"
    );
    assert!(html.contains(r#"loading="lazy""#), "{html}");
    assert!(html.contains(r#"alt="Slide 1""#), "{html}");
}

#[test]
fn rendered_markup_has_stable_markers() {
    let (doc, carousel) = decorate_html(&carousel_html(&[text_cell(1), text_cell(2)]));

    let html = doc.outer_html(carousel.block());

    assert!(html.contains(r#"<button class="carousel-prev" aria-label="Previous slide">‹</button>"#));
    assert!(html.contains(r#"<button class="carousel-next" aria-label="Next slide">›</button>"#));
    assert!(html.contains(r#"<button aria-label="Slide 1" role="tab" class="active">"#));
    assert!(html.contains(r#"<button aria-label="Slide 2" role="tab">"#));
}

#[test]
fn single_text_row_is_static() {
    let (doc, carousel) = decorate_html(&carousel_html(&[text_cell(1)]));

    assert_eq!(carousel.total(), 1);
    assert!(carousel.is_static());
    assert_eq!(carousel.slides()[0].image_part, None);
    let block = carousel.block();
    assert_eq!(count_class(&doc, block, PREV_CLASS), 0);
    assert_eq!(count_class(&doc, block, NAV_CLASS), 0);
    assert!(carousel.observer().is_none());
}

#[test]
fn no_rows_renders_nothing_interactive() {
    let (doc, carousel) = decorate_html(r#"<div class="carousel"></div>"#);

    assert_eq!(carousel.total(), 0);
    assert!(carousel.is_static());
    assert_eq!(
        doc.outer_html(carousel.block()),
        r#"<div class="carousel"><div class="carousel-slides"></div></div>"#
    );
}

#[test]
fn captioned_picture_is_body() {
    let (doc, carousel) = decorate_html(&carousel_html(&[
        r#"<div><p><picture><img src="/a.jpg" alt=""></picture></p><p>A caption</p></div>"#
            .to_string(),
    ]));

    let slide = &carousel.slides()[0];
    assert_eq!(slide.image_part, None);
    assert!(doc.has_class(slide.body_part[0], "carousel-slide-body"));
}

#[test]
fn inline_spacing_survives_decoration() {
    let body = "<p>Buy <em>now</em> <strong>today</strong></p>";
    let (doc, carousel) = decorate_html(&carousel_html(&[
        format!("{}<div>{body}</div>", image_cell(1)),
        text_cell(2),
    ]));

    let cell = carousel.slides()[0].body_part[0];
    assert_eq!(
        doc.outer_html(cell),
        format!(r#"<div class="carousel-slide-body">{body}</div>"#)
    );
    assert_eq!(doc.text_content(cell), "Buy now today");
}

#[test]
fn indented_image_cell_is_still_an_image() {
    let (_, carousel) = decorate_html(&carousel_html(&[
        "<div>\n  <picture><img src=\"/a.jpg\" alt=\"\"></picture>\n</div>".to_string(),
        text_cell(2),
    ]));

    assert!(carousel.slides()[0].image_part.is_some());
}

#[test]
fn go_to_clamps_and_keeps_one_active_dot() {
    let (mut doc, mut carousel) = four_slides();
    let mut host = Scrolls::default();

    for (request, expected) in [(2, 2), (0, 0), (3, 3), (10, 3), (1, 1)] {
        assert_eq!(carousel.go_to(&mut doc, &mut host, request).unwrap(), expected);
        assert_eq!(active(&doc, &carousel), vec![expected]);
    }
}

#[test]
fn prev_and_next_stop_at_the_ends() {
    let (mut doc, mut carousel) = four_slides();
    let mut host = Scrolls::default();

    assert_eq!(carousel.prev(&mut doc, &mut host).unwrap(), 0);
    carousel.go_to(&mut doc, &mut host, 3).unwrap();
    assert_eq!(carousel.next(&mut doc, &mut host).unwrap(), 3);
}

#[test]
fn dot_click_matches_go_to() {
    let (mut doc_a, mut a) = four_slides();
    let (mut doc_b, mut b) = four_slides();
    let mut host_a = Scrolls::default();
    let mut host_b = Scrolls::default();

    let dot = a.navigation().unwrap().dots()[2].node;
    let control = a.handle_click(&mut doc_a, &mut host_a, dot).unwrap();
    b.go_to(&mut doc_b, &mut host_b, 2).unwrap();

    assert_eq!(control, Some(Control::Dot(2)));
    assert_eq!(a.current(), b.current());
    assert_eq!(active(&doc_a, &a), active(&doc_b, &b));
    assert_eq!(host_a.0.len(), host_b.0.len());
}

#[test]
fn swipe_updates_dots_without_scrolling_back() {
    let (mut doc, mut carousel) = four_slides();
    let mut viewport = HeadlessViewport::for_carousel(&carousel, 800.0);
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();
    assert_eq!(carousel.current(), 0);

    viewport.swipe_to(2);
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();

    assert_eq!(carousel.current(), 2);
    assert_eq!(active(&doc, &carousel), vec![2]);
    assert!(viewport.scroll_requests().is_empty());
    assert_eq!(viewport.scroll_x(), 1600.0);
}

#[test]
fn partial_swipe_below_threshold_keeps_slide() {
    let (mut doc, mut carousel) = four_slides();
    let mut viewport = HeadlessViewport::for_carousel(&carousel, 800.0);
    viewport.take_records();

    viewport.scroll_to(300.0);
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();
    assert_eq!(carousel.current(), 0);

    viewport.scroll_to(500.0);
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();
    assert_eq!(carousel.current(), 1);
}

#[test]
fn button_scroll_settles_and_observation_agrees() {
    let (mut doc, mut carousel) = four_slides();
    let mut viewport = HeadlessViewport::for_carousel(&carousel, 800.0);
    viewport.take_records();
    let next = doc
        .descendants_by_class(carousel.block(), NEXT_CLASS)
        .next()
        .unwrap();

    carousel.handle_click(&mut doc, &mut viewport, next).unwrap();
    assert_eq!(carousel.current(), 1);
    assert_eq!(viewport.scroll_x(), 800.0);

    // The settled scroll is observed; it confirms the slide and asks for nothing
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();
    assert_eq!(carousel.current(), 1);
    assert_eq!(viewport.scroll_requests().len(), 1);
    assert_eq!(active(&doc, &carousel), vec![1]);
}

#[test]
fn teardown_detaches_the_observer() {
    let (mut doc, mut carousel) = four_slides();
    let mut viewport = HeadlessViewport::for_carousel(&carousel, 800.0);
    viewport.take_records();
    carousel.teardown();

    viewport.swipe_to(3);
    carousel.observe(&mut doc, &viewport.take_records()).unwrap();

    assert_eq!(carousel.current(), 0);
}

#[test]
fn document_bootstrap_decorates_carousels() {
    let rows: Vec<String> = (1..=3).map(text_cell).collect();
    let html = format!("<main>{}</main>", carousel_html(&rows));
    let mut doc = Document::parse_fragment(&html).unwrap();
    let config = BlockConfig::default();
    let optimizer = optimizer();
    let ctx = BlockContext::new(&config, &optimizer);

    let mut blocks = decorate_blocks(&mut doc, &ctx).unwrap();

    assert_eq!(blocks.len(), 1);
    let (node, block) = &mut blocks[0];
    assert_eq!(doc.attr(*node, "data-block-status"), Some("loaded"));
    let DecoratedBlock::Carousel(carousel) = block else {
        panic!("expected a carousel");
    };
    let mut host = Scrolls::default();
    carousel.next(&mut doc, &mut host).unwrap();
    assert_eq!(carousel.current(), 1);
}

#[test]
fn wrap_setting_from_toml_reaches_the_carousel() {
    let config = BlockConfig::from_toml_str("[carousel]\nboundary = \"wrap\"\n").unwrap();
    let optimizer = optimizer();
    let ctx = BlockContext::new(&config, &optimizer);
    let rows: Vec<String> = (1..=3).map(text_cell).collect();
    let mut doc = Document::parse_fragment(&carousel_html(&rows)).unwrap();

    let mut blocks = decorate_blocks(&mut doc, &ctx).unwrap();

    let carousel = blocks[0].1.as_carousel_mut().unwrap();
    let mut host = Scrolls::default();
    assert_eq!(carousel.prev(&mut doc, &mut host).unwrap(), 2);
    assert_eq!(carousel.next(&mut doc, &mut host).unwrap(), 0);
    assert_eq!(host.0.len(), 2);
}
