//! Per-pass element dispatch.
//!
//! Each pass supplies a [`DispatchTable`] mapping every [`ElementIndex`] to
//! an optional [`ElementHandler`]. The [`Dispatcher`] owns the pass
//! [`Context`], maintains the open-element stack from tokenizer callbacks,
//! and routes each callback to the handler of the element it concerns.

use crate::context::{Attributes, Context};
use crate::element::{self, ElementIndex};
use crate::sax::SaxHandler;

/// Callbacks for one element kind. Every callback defaults to a no-op.
///
/// The element is already on the stack when `on_start` runs and is still
/// on it when `on_end` runs.
pub trait ElementHandler<S> {
    fn on_start(&self, _ctx: &mut Context<S>, _element: ElementIndex, _attrs: &Attributes) {}

    fn on_end(&self, _ctx: &mut Context<S>, _element: ElementIndex) {}

    fn on_characters(&self, _ctx: &mut Context<S>, _text: &str) {}
}

/// Handler lookup for one pass.
pub trait DispatchTable<S> {
    /// Handler for `index`; `None` ignores the element entirely.
    /// [`ElementIndex::Undefined`] is asked for like any other index.
    fn handler(&self, index: ElementIndex) -> Option<&dyn ElementHandler<S>>;
}

/// Drives a [`Context`] from tokenizer callbacks.
pub struct Dispatcher<'t, S> {
    table: &'t dyn DispatchTable<S>,
    pub context: Context<S>,
}

impl<'t, S> Dispatcher<'t, S> {
    pub fn new(table: &'t dyn DispatchTable<S>, context: Context<S>) -> Self {
        Self { table, context }
    }

    pub fn into_context(self) -> Context<S> {
        self.context
    }

    fn dispatch_characters(&mut self, index: ElementIndex, text: &str) {
        if let Some(handler) = self.table.handler(index) {
            handler.on_characters(&mut self.context, text);
        }
    }
}

impl<S> SaxHandler for Dispatcher<'_, S> {
    fn start_element(&mut self, name: &str, attrs: Attributes) {
        let index = element::lookup(name);
        log::trace!(target: "db2html.sax", "start {name} ({index:?})");
        if index == ElementIndex::Undefined {
            log::debug!(target: "db2html.sax", "unknown element <{name}>");
            self.context.diagnostics.unknown_elements += 1;
        }

        self.context.push(index, name, attrs);
        if let Some(handler) = self.table.handler(index) {
            // The frame owns the attributes; hand the handler a copy so the
            // context can be borrowed mutably alongside them.
            let attrs = self
                .context
                .current()
                .map(|el| el.attrs.clone())
                .unwrap_or_default();
            handler.on_start(&mut self.context, index, &attrs);
        }
        if index.is_contentless() {
            self.context.pop();
        }
    }

    fn end_element(&mut self, name: &str) {
        let index = element::lookup(name);
        log::trace!(target: "db2html.sax", "end {name}");
        if index.is_contentless() {
            return;
        }

        let matches = self
            .context
            .current()
            .is_some_and(|top| top.name.eq_ignore_ascii_case(name));
        if !matches {
            log::debug!(
                target: "db2html.sax",
                "dropping end tag </{name}> (innermost open element is {:?})",
                self.context.current().map(|top| top.name.as_str())
            );
            self.context.diagnostics.stack_mismatches += 1;
            return;
        }

        if let Some(handler) = self.table.handler(index) {
            handler.on_end(&mut self.context, index);
        }
        self.context.pop();
    }

    fn characters(&mut self, text: &str) {
        let Some(index) = self.context.current().map(|top| top.index) else {
            return;
        };
        self.context.empty_element = false;
        self.dispatch_characters(index, text);
    }

    /// CDATA sections are delivered to the `cdata` handler on a frame of
    /// their own, so output routing still sees the enclosing elements.
    fn cdata_block(&mut self, text: &str) {
        if self.context.current().is_none() {
            return;
        }
        self.context
            .push(ElementIndex::Cdata, "cdata", Attributes::new());
        self.dispatch_characters(ElementIndex::Cdata, text);
        self.context.pop();
        self.context.empty_element = false;
    }

    fn unresolved_entity(&mut self, _name: &str) {
        self.context.diagnostics.unresolved_entities += 1;
    }
}
