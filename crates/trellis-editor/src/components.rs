//! Palette component registry.
//!
//! Maps a component kind to a factory that returns a default
//! [`ElementNode`] template with unassigned ids. Hosts can register new
//! kinds or override built-in ones.

use std::collections::HashMap;
use trellis_core::ElementNode;

/// Kind used when a requested kind is not registered.
pub const FALLBACK_KIND: &str = "container";

type Factory = Box<dyn Fn() -> ElementNode>;

pub struct ComponentRegistry {
    factories: HashMap<String, Factory>,
    /// Registration order, for palette listings.
    order: Vec<String>,
}

impl Default for ComponentRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

impl ComponentRegistry {
    /// A registry with no kinds. `create` still falls back to a plain
    /// container.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The built-in catalog.
    pub fn with_defaults() -> Self {
        let mut r = Self::empty();
        r.register("container", || block("div", "container"));
        r.register("section", || {
            ElementNode::new("section")
                .with_style("padding", "40px 20px")
                .with_child(ElementNode::new("h2").with_text("Section title"))
                .with_child(ElementNode::new("p").with_text("Section content goes here."))
        });
        r.register("flex-row", || {
            block("div", "flex-row")
                .with_child(placeholder("Item 1"))
                .with_child(placeholder("Item 2"))
        });
        r.register("flex-column", || {
            block("div", "flex-column")
                .with_child(placeholder("Item 1"))
                .with_child(placeholder("Item 2"))
        });
        r.register("grid-2", || grid("grid-2", 2));
        r.register("grid-3", || grid("grid-3", 3));
        for level in 1..=6 {
            r.register(format!("heading{level}"), move || {
                ElementNode::new(format!("h{level}")).with_text(format!("Heading {level}"))
            });
        }
        r.register("paragraph", || {
            ElementNode::new("p").with_text("Write your paragraph text here.")
        });
        r.register("text", || ElementNode::new("span").with_text("Text"));
        r.register("link", || {
            ElementNode::new("a").with_attr("href", "#").with_text("Link")
        });
        r.register("list", || list("ul"));
        r.register("ordered-list", || list("ol"));
        r.register("image", || {
            ElementNode::new("img")
                .with_attr("src", "https://via.placeholder.com/400x300")
                .with_attr("alt", "Placeholder image")
                .with_style("max-width", "100%")
        });
        r.register("video", || {
            ElementNode::new("video")
                .with_attr("controls", "")
                .with_attr("src", "")
                .with_style("width", "100%")
        });
        r.register("iframe", || {
            ElementNode::new("iframe")
                .with_attr("src", "about:blank")
                .with_attr("title", "Embedded content")
                .with_style("width", "100%")
                .with_style("height", "300px")
                .with_style("border", "none")
        });
        r.register("input", || {
            ElementNode::new("input")
                .with_attr("type", "text")
                .with_attr("placeholder", "Enter text")
        });
        r.register("textarea", || {
            ElementNode::new("textarea")
                .with_attr("rows", "4")
                .with_attr("placeholder", "Enter text")
        });
        r.register("select", || {
            ElementNode::new("select")
                .with_child(ElementNode::new("option").with_text("Option 1"))
                .with_child(ElementNode::new("option").with_text("Option 2"))
        });
        r.register("checkbox", || {
            ElementNode::new("label")
                .with_text("Remember me")
                .with_child(ElementNode::new("input").with_attr("type", "checkbox"))
        });
        r.register("form", || {
            ElementNode::new("form")
                .with_child(ElementNode::new("label").with_text("Email"))
                .with_child(
                    ElementNode::new("input")
                        .with_attr("type", "email")
                        .with_attr("placeholder", "you@example.com"),
                )
                .with_child(button("btn-primary", "Submit").with_attr("type", "submit"))
        });
        r.register("button", || button("btn-primary", "Click me"));
        r.register("button-secondary", || button("btn-secondary", "Click me"));
        r.register("button-outline", || button("btn-outline", "Click me"));
        r.register("card", || {
            block("div", "card")
                .with_child(ElementNode::new("h3").with_text("Card title"))
                .with_child(ElementNode::new("p").with_text("Some quick example text for the card."))
                .with_child(button("btn-primary", "Learn more"))
        });
        r.register("navbar", || {
            ElementNode::new("nav")
                .with_class("navbar")
                .with_child(ElementNode::new("span").with_class("brand").with_text("Brand"))
                .with_child(
                    block("div", "nav-links")
                        .with_child(ElementNode::new("a").with_attr("href", "#").with_text("Home"))
                        .with_child(ElementNode::new("a").with_attr("href", "#").with_text("About"))
                        .with_child(ElementNode::new("a").with_attr("href", "#").with_text("Contact")),
                )
        });
        r.register("footer", || {
            ElementNode::new("footer")
                .with_class("footer")
                .with_child(ElementNode::new("p").with_text("© 2026 Your Company. All rights reserved."))
        });
        r.register("hero", || {
            ElementNode::new("section")
                .with_class("hero")
                .with_child(ElementNode::new("h1").with_text("Welcome to our site"))
                .with_child(ElementNode::new("p").with_text("A short tagline that explains what you do."))
                .with_child(button("btn-primary", "Get started"))
        });
        r.register("tabs", tabs);
        r.register("accordion", accordion);
        r.register("modal", modal);
        r.register("carousel", carousel);
        r.register("alert", || {
            block("div", "alert")
                .with_attr("role", "alert")
                .with_text("This is an alert message.")
        });
        r.register("badge", || {
            ElementNode::new("span").with_class("badge").with_text("New")
        });
        r
    }

    /// Add or replace the factory for `kind`.
    pub fn register(&mut self, kind: impl Into<String>, factory: impl Fn() -> ElementNode + 'static) {
        let kind = kind.into();
        if !self.factories.contains_key(&kind) {
            self.order.push(kind.clone());
        }
        self.factories.insert(kind, Box::new(factory));
    }

    pub fn contains(&self, kind: &str) -> bool {
        self.factories.contains_key(kind)
    }

    /// Registered kinds in registration order.
    pub fn kinds(&self) -> &[String] {
        &self.order
    }

    /// Instantiate `kind`. Unknown kinds yield a generic block container.
    /// The root of the result records its kind in `componentKind`.
    pub fn create(&self, kind: &str) -> ElementNode {
        match self.factories.get(kind) {
            Some(factory) => factory().with_kind(kind),
            None => {
                log::warn!("unknown component kind `{kind}`, using {FALLBACK_KIND}");
                match self.factories.get(FALLBACK_KIND) {
                    Some(factory) => factory().with_kind(FALLBACK_KIND),
                    None => block("div", "container").with_kind(FALLBACK_KIND),
                }
            }
        }
    }
}

// ─── Template helpers ────────────────────────────────────────────────────

fn block(tag: &str, class: &str) -> ElementNode {
    ElementNode::new(tag).with_class(class)
}

fn placeholder(text: &str) -> ElementNode {
    ElementNode::new("div")
        .with_style("padding", "20px")
        .with_style("background-color", "#f3f4f6")
        .with_text(text)
}

fn grid(class: &str, columns: usize) -> ElementNode {
    block("div", class).with_children((1..=columns).map(|i| placeholder(&format!("Column {i}"))))
}

fn list(tag: &str) -> ElementNode {
    ElementNode::new(tag).with_children((1..=3).map(|i| ElementNode::new("li").with_text(format!("List item {i}"))))
}

fn button(variant: &str, label: &str) -> ElementNode {
    ElementNode::new("button")
        .with_class("btn")
        .with_class(variant)
        .with_attr("type", "button")
        .with_text(label)
}

fn composite(kind: &str) -> ElementNode {
    block("div", kind).with_attr("data-component", kind)
}

fn tabs() -> ElementNode {
    let buttons = (1..=3).map(|i| {
        let b = ElementNode::new("button").with_class("tab-button");
        let b = if i == 1 { b.with_class("active") } else { b };
        b.with_attr("type", "button").with_text(format!("Tab {i}"))
    });
    let panels = (1..=3).map(|i| {
        let p = ElementNode::new("div").with_class("tab-panel");
        let p = if i == 1 { p.with_class("active") } else { p };
        p.with_child(ElementNode::new("p").with_text(format!("Content for tab {i}.")))
    });
    composite("tabs")
        .with_child(block("div", "tab-buttons").with_children(buttons))
        .with_children(panels)
}

fn accordion() -> ElementNode {
    composite("accordion").with_children((1..=3).map(|i| {
        block("div", "accordion-item")
            .with_child(
                ElementNode::new("button")
                    .with_class("accordion-header")
                    .with_attr("type", "button")
                    .with_text(format!("Section {i}")),
            )
            .with_child(
                block("div", "accordion-content")
                    .with_child(ElementNode::new("p").with_text(format!("Content for section {i}."))),
            )
    }))
}

fn modal() -> ElementNode {
    composite("modal-wrapper")
        .with_attr("data-component", "modal")
        .with_child(button("btn-primary", "Open modal").with_class("modal-trigger"))
        .with_child(
            block("div", "modal").with_child(
                block("div", "modal-content")
                    .with_child(ElementNode::new("h3").with_text("Modal title"))
                    .with_child(ElementNode::new("p").with_text("Modal body text."))
                    .with_child(button("btn-secondary", "Close").with_class("modal-close")),
            ),
        )
}

fn carousel() -> ElementNode {
    let slides = (1..=3).map(|i| {
        let s = ElementNode::new("div").with_class("carousel-slide");
        let s = if i == 1 { s.with_class("active") } else { s };
        s.with_child(ElementNode::new("h3").with_text(format!("Slide {i}")))
    });
    composite("carousel")
        .with_children(slides)
        .with_child(ElementNode::new("button").with_class("carousel-prev").with_attr("type", "button").with_text("‹"))
        .with_child(ElementNode::new("button").with_class("carousel-next").with_attr("type", "button").with_text("›"))
}
