//! Page Handles
//!
//! The [`Page`] trait is the rendering target for notifications, loading
//! states and the update action. [`Document`] is an in-memory page used by
//! the command-line front end and by tests.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::Mutex;

use crate::notify::{render_toast, Toast, ToastId, ToastStack, ToastTiming};

/// A page shared between the update action and its delayed follow-up
pub type SharedPage<P> = Arc<Mutex<P>>;

/// Kind of UI affordance declared with `data-bs-toggle`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Affordance {
    Tooltip,
    Popover,
}

impl Affordance {
    pub const ALL: [Affordance; 2] = [Affordance::Tooltip, Affordance::Popover];

    /// Value of the `data-bs-toggle` attribute
    pub fn toggle(&self) -> &'static str {
        match self {
            Affordance::Tooltip => "tooltip",
            Affordance::Popover => "popover",
        }
    }
}

impl fmt::Display for Affordance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.toggle())
    }
}

/// Opaque handle to an element of a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ElementRef(usize);

/// Rendering target
pub trait Page {
    /// Replace the content of the element with `id`.
    /// Returns false when no element has that id.
    fn set_content(&mut self, id: &str, html: String) -> bool;

    /// Insert and show a toast
    fn push_toast(&mut self, toast: Toast) -> ToastId;

    /// Returns false when no modal has that id
    fn show_modal(&mut self, id: &str) -> bool;

    fn hide_modal(&mut self, id: &str) -> bool;

    /// Elements declaring the given affordance
    fn toggles(&self, kind: Affordance) -> Vec<ElementRef>;

    fn activate(&mut self, element: ElementRef, kind: Affordance);
}

/// Activate every tooltip and popover trigger on the page.
///
/// Returns the number of elements activated.
pub fn init_affordances<P: Page + ?Sized>(page: &mut P) -> usize {
    let mut activated = 0;
    for kind in Affordance::ALL {
        for element in page.toggles(kind) {
            page.activate(element, kind);
            activated += 1;
        }
    }
    tracing::debug!(activated, "Page affordances initialized");
    activated
}

/// An element of a [`Document`]
#[derive(Debug, Clone, Default)]
pub struct Element {
    pub id: Option<String>,
    pub toggle: Option<Affordance>,
    pub content: String,
    pub active: bool,
}

/// In-memory page
#[derive(Debug, Default)]
pub struct Document {
    elements: Vec<Element>,
    modals: HashSet<String>,
    open_modals: HashSet<String>,
    toasts: ToastStack,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_toast_timing(timing: ToastTiming) -> Self {
        Self {
            toasts: ToastStack::new(timing),
            ..Self::default()
        }
    }

    /// Add an empty container addressable by `id`
    pub fn add_element(&mut self, id: impl Into<String>) -> ElementRef {
        self.elements.push(Element {
            id: Some(id.into()),
            ..Element::default()
        });
        ElementRef(self.elements.len() - 1)
    }

    /// Add an anonymous element carrying `data-bs-toggle`
    pub fn add_toggle(&mut self, kind: Affordance) -> ElementRef {
        self.elements.push(Element {
            toggle: Some(kind),
            ..Element::default()
        });
        ElementRef(self.elements.len() - 1)
    }

    /// Declare a modal dialog
    pub fn add_modal(&mut self, id: impl Into<String>) {
        self.modals.insert(id.into());
    }

    pub fn element(&self, element: ElementRef) -> Option<&Element> {
        self.elements.get(element.0)
    }

    pub fn content(&self, id: &str) -> Option<&str> {
        self.find(id).map(|e| e.content.as_str())
    }

    pub fn is_modal_open(&self, id: &str) -> bool {
        self.open_modals.contains(id)
    }

    /// Toasts still on the page. Toasts whose hide animation has finished
    /// are removed first.
    pub fn toasts(&mut self) -> &ToastStack {
        self.toasts.tick(Instant::now());
        &self.toasts
    }

    /// Close a toast as the user would
    pub fn dismiss_toast(&mut self, id: &ToastId) -> bool {
        self.toasts.dismiss(id, Instant::now())
    }

    /// Advance toast lifecycles
    pub fn tick(&mut self, now: Instant) {
        self.toasts.tick(now);
    }

    /// Markup of all toasts currently on the page, oldest first
    pub fn render_toasts(&mut self) -> String {
        self.toasts.tick(Instant::now());
        self.toasts.iter().map(render_toast).collect()
    }

    fn find(&self, id: &str) -> Option<&Element> {
        self.elements.iter().find(|e| e.id.as_deref() == Some(id))
    }
}

impl Page for Document {
    fn set_content(&mut self, id: &str, html: String) -> bool {
        match self.elements.iter_mut().find(|e| e.id.as_deref() == Some(id)) {
            Some(element) => {
                element.content = html;
                true
            }
            None => false,
        }
    }

    fn push_toast(&mut self, toast: Toast) -> ToastId {
        self.toasts.tick(Instant::now());
        self.toasts.push(toast)
    }

    fn show_modal(&mut self, id: &str) -> bool {
        if !self.modals.contains(id) {
            return false;
        }
        self.open_modals.insert(id.to_string());
        true
    }

    fn hide_modal(&mut self, id: &str) -> bool {
        if !self.modals.contains(id) {
            return false;
        }
        self.open_modals.remove(id);
        true
    }

    fn toggles(&self, kind: Affordance) -> Vec<ElementRef> {
        self.elements
            .iter()
            .enumerate()
            .filter(|(_, e)| e.toggle == Some(kind))
            .map(|(i, _)| ElementRef(i))
            .collect()
    }

    fn activate(&mut self, element: ElementRef, _kind: Affordance) {
        if let Some(e) = self.elements.get_mut(element.0) {
            e.active = true;
        }
    }
}
