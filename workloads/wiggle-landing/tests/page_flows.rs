//! End-to-end flows over the full component set and an in-memory document.

use std::rc::Rc;

use page_core::{
    Dom, ElementId, Key, KeyValueStore, MemoryStore, PageEvent, PageResult, Viewport,
    VirtualDocument,
};
use page_observability::{MemorySink, SessionId, StructuredLogger};
use wiggle_landing::{Page, PageConfig, LOAD_BANNER, PAGE_NAME};

/// Handles into the landing page fixture.
struct Landing {
    questions: Vec<ElementId>,
    answers: Vec<ElementId>,
    options: Vec<ElementId>,
    ctas: Vec<ElementId>,
    usp_cards: Vec<ElementId>,
}

/// A trimmed landing page: size options, two CTAs, USP cards and an FAQ.
fn landing_document() -> (VirtualDocument, Landing) {
    let mut doc = VirtualDocument::new();
    doc.set_viewport(Viewport {
        scroll_y: 0.0,
        width: 1280.0,
        height: 800.0,
        document_height: 6000.0,
    });
    let body = doc.body();

    let group = doc.element(body, "div", "size-options");
    let mut options = Vec::new();
    for (index, (label, price)) in [("S사이즈", "13,900원"), ("L사이즈", "18,500원")]
        .into_iter()
        .enumerate()
    {
        let classes = if index == 0 { "size-option active" } else { "size-option" };
        let option = doc.element(group, "div", classes);
        let strong = doc.element(option, "strong", "");
        doc.set_text(strong, label);
        let price_el = doc.element(option, "span", "size-price");
        doc.set_text(price_el, price);
        options.push(option);
    }

    let ctas = (0..2)
        .map(|_| {
            let cta = doc.element(body, "a", "cta-button");
            doc.set_attr(cta, "href", "#order-s");
            doc.set_text(cta, "💛 S사이즈 주문하기 (13,900원)");
            cta
        })
        .collect();

    let usp_grid = doc.element(body, "div", "usp-grid");
    let usp_cards = (0..3)
        .map(|_| {
            let card = doc.element(usp_grid, "div", "usp-card");
            doc.set_layout(card, 2000.0, 300.0);
            card
        })
        .collect();

    let faq = doc.element(body, "div", "faq-list");
    let mut questions = Vec::new();
    let mut answers = Vec::new();
    for _ in 0..3 {
        let item = doc.element(faq, "div", "faq-item");
        questions.push(doc.element(item, "div", "faq-question"));
        answers.push(doc.element(item, "div", "faq-answer"));
    }

    (
        doc,
        Landing {
            questions,
            answers,
            options,
            ctas,
            usp_cards,
        },
    )
}

/// Lets a test inspect the store the page owns.
struct SharedStore(Rc<MemoryStore>);

impl KeyValueStore for SharedStore {
    fn get(&self, key: &str) -> PageResult<Option<String>> {
        self.0.get(key)
    }
    fn set(&self, key: &str, value: &str) -> PageResult<()> {
        self.0.set(key, value)
    }
    fn remove(&self, key: &str) -> PageResult<()> {
        self.0.remove(key)
    }
}

fn mount_with_store(
    doc: VirtualDocument,
    store: Box<dyn KeyValueStore>,
) -> (Page<VirtualDocument>, MemorySink) {
    let sink = MemorySink::new();
    let logger = StructuredLogger::new(SessionId::from_string("pv-flow"))
        .with_page(PAGE_NAME)
        .with_sink(Rc::new(sink.clone()));
    let mut page = Page::new(doc, PageConfig::default(), store, logger);
    page.mount();
    (page, sink)
}

fn mount(doc: VirtualDocument) -> (Page<VirtualDocument>, MemorySink) {
    mount_with_store(doc, Box::new(MemoryStore::new()))
}

fn open_answers(page: &Page<VirtualDocument>, answers: &[ElementId]) -> usize {
    answers
        .iter()
        .filter(|a| page.dom().style(**a, "display").as_deref() == Some("block"))
        .count()
}

#[test]
fn test_mount_logs_banner() {
    let (doc, _) = landing_document();
    let (page, sink) = mount(doc);
    assert!(page.is_mounted());
    assert!(sink.messages().iter().any(|m| m == LOAD_BANNER));
}

#[test]
fn test_accordion_keeps_at_most_one_answer_open() {
    let (doc, landing) = landing_document();
    let (mut page, _) = mount(doc);

    for question in [0, 1, 1, 2, 0] {
        page.dispatch(PageEvent::Click {
            target: landing.questions[question],
        });
        page.advance_by(100);
        assert!(open_answers(&page, &landing.answers) <= 1);
    }
    assert_eq!(open_answers(&page, &landing.answers), 1);
    assert!(page.dom().has_class(landing.questions[0], "active"));

    let outcome = page.dispatch(PageEvent::KeyDown {
        target: Some(landing.questions[2]),
        key: Key::Enter,
    });
    assert!(outcome.default_prevented);
    assert_eq!(
        page.dom().style(landing.answers[2], "display").as_deref(),
        Some("block")
    );
    assert_eq!(open_answers(&page, &landing.answers), 1);

    page.dispatch(PageEvent::KeyDown {
        target: None,
        key: Key::Escape,
    });
    assert_eq!(open_answers(&page, &landing.answers), 0);
    assert!(landing
        .questions
        .iter()
        .all(|q| !page.dom().has_class(*q, "active")));
}

#[test]
fn test_size_selection_updates_every_cta() {
    let (doc, landing) = landing_document();
    let (mut page, sink) = mount(doc);

    let strong = page.dom().query_in(landing.options[1], "strong").unwrap();
    page.dispatch(PageEvent::Click { target: strong });

    assert!(page.dom().has_class(landing.options[1], "active"));
    assert!(!page.dom().has_class(landing.options[0], "active"));
    for cta in &landing.ctas {
        assert_eq!(page.dom().text(*cta), "💛 L사이즈 주문하기 (18,500원)");
        assert_eq!(page.dom().attr(*cta, "href").as_deref(), Some("#order-l"));
    }
    assert_eq!(
        sink.tracked("size_selection")[0].field_str("size"),
        Some("L사이즈")
    );
}

#[test]
fn test_cards_reveal_once() {
    let (doc, landing) = landing_document();
    let (mut page, _) = mount(doc);
    let card = landing.usp_cards[2];
    assert!(page.dom().has_class(card, "fade-in"));
    assert!(!page.dom().has_class(card, "visible"));

    page.dom_mut().set_scroll_y(1500.0);
    page.dispatch(PageEvent::Scroll);
    page.advance_by(200);
    assert!(page.dom().has_class(card, "visible"));
    assert_eq!(page.dom().style(card, "opacity").as_deref(), Some("1"));

    page.dom_mut().set_style(card, "opacity", "0.5");
    for y in [0.0, 1500.0, 0.0, 1600.0] {
        page.dom_mut().set_scroll_y(y);
        page.dispatch(PageEvent::Scroll);
        page.advance_by(300);
    }
    assert!(page.dom().has_class(card, "visible"));
    assert_eq!(page.dom().style(card, "opacity").as_deref(), Some("0.5"));
}

#[test]
fn test_hidden_review_card_reveals_after_rotation() {
    let (mut doc, _) = landing_document();
    let body = doc.body();
    let reviews = doc.element(body, "div", "reviews-grid");
    let cards: Vec<_> = (0..4)
        .map(|_| {
            let card = doc.element(reviews, "div", "review-card");
            doc.set_layout(card, 100.0, 200.0);
            card
        })
        .collect();
    let (mut page, _) = mount(doc);

    // Three cards fit; the fourth starts hidden and stays unrevealed.
    assert!(page.dom().has_class(cards[0], "visible"));
    assert_eq!(page.dom().style(cards[3], "display").as_deref(), Some("none"));
    assert!(!page.dom().has_class(cards[3], "visible"));
    page.dispatch(PageEvent::Scroll);
    assert!(!page.dom().has_class(cards[3], "visible"));

    page.advance_by(5000);
    assert_eq!(page.dom().style(cards[3], "display").as_deref(), Some("block"));
    assert!(page.dom().has_class(cards[3], "visible"));
    page.advance_by(400);
    assert_eq!(page.dom().style(cards[3], "opacity").as_deref(), Some("1"));
}

#[test]
fn test_wishlist_toggle_pair_is_idempotent() {
    let (doc, _) = landing_document();
    let store = Rc::new(MemoryStore::new().with("wishlist", r#"["smile-cooler-l"]"#));
    let (mut page, sink) = mount_with_store(doc, Box::new(SharedStore(store.clone())));

    let before = store.get("wishlist").unwrap();
    assert!(page.toggle_wishlist("smile-cooler-s"));
    assert!(!page.toggle_wishlist("smile-cooler-s"));
    assert_eq!(store.get("wishlist").unwrap(), before);

    assert!(!page.toggle_wishlist("smile-cooler-l"));
    assert_eq!(store.get("wishlist").unwrap().as_deref(), Some("[]"));
    assert_eq!(sink.tracked("wishlist_toggle").len(), 3);
}

#[test]
fn test_scroll_milestones_fire_once_each() {
    let (doc, _) = landing_document();
    let (mut page, sink) = mount(doc);
    // Scrollable height is 6000 - 800 = 5200px.
    let scroll_to = |page: &mut Page<VirtualDocument>, depth: f64| {
        page.dom_mut().set_scroll_y(5200.0 * depth);
        page.dispatch(PageEvent::Scroll);
        page.advance_by(500);
    };

    scroll_to(&mut page, 0.30);
    scroll_to(&mut page, 0.10);
    scroll_to(&mut page, 0.28);
    scroll_to(&mut page, 0.55);
    scroll_to(&mut page, 0.30);
    scroll_to(&mut page, 0.60);
    scroll_to(&mut page, 1.0);
    scroll_to(&mut page, 1.0);

    let depths: Vec<_> = sink
        .tracked("scroll_depth")
        .iter()
        .map(|e| e.field_str("depth").unwrap_or_default().to_string())
        .collect();
    assert_eq!(depths, ["25%", "50%", "90%"]);
}

#[test]
fn test_large_bag_order_end_to_end() {
    let (doc, landing) = landing_document();
    let (mut page, sink) = mount(doc);

    page.dispatch(PageEvent::Click {
        target: landing.options[1],
    });
    let cta = landing.ctas[0];
    let outcome = page.dispatch(PageEvent::Click { target: cta });
    assert!(outcome.default_prevented);
    assert!(page.dom().query_in(cta, ".loading-spinner").is_some());
    assert_eq!(
        sink.tracked("cta_click")[0].field_str("button_text"),
        Some("💛 L사이즈 주문하기 (18,500원)")
    );

    page.advance_by(1000);
    assert!(page.dom().query_in(cta, ".loading-spinner").is_none());

    let toast = page
        .dom()
        .query(".notification-success")
        .expect("toast shown");
    assert!(page.dom().text(toast).contains("장바구니"));

    let added = sink.tracked("add_to_cart");
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].field_str("size"), Some("L사이즈"));
    assert_eq!(added[0].fields["price"], 18_500);

    page.advance_by(3300);
    assert!(!page.dom().is_connected(toast));
    assert_eq!(page.active_notifications(), 0);
}

#[test]
fn test_unmount_removes_created_elements() {
    let (doc, _) = landing_document();
    let (mut page, _) = mount(doc);
    assert!(page.dom().query(".scroll-progress").is_some());
    assert!(page.dom().query(".floating-action-button").is_some());

    page.unmount();
    assert!(page.dom().query(".scroll-progress").is_none());
    assert_eq!(page.pending_timers(), 0);
}
