//! Markup stripping for html fields
//!
//! The fragment is parsed with html5ever into a minimal node tree and the
//! text nodes are concatenated, which gives the same result as a browser's
//! `textContent` minus script and style bodies.

use std::borrow::Cow;
use std::cell::RefCell;
use std::rc::{Rc, Weak};

use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{Attribute, QualName};

/// Elements whose content is not text
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "template"];

/// Return the text content of an HTML fragment.
///
/// Tags and comments are dropped, `script`/`style` bodies are skipped and
/// character references are decoded. Non-breaking spaces become plain
/// spaces.
pub fn strip_html(html: &str) -> String {
    if !html.contains(|c: char| c == '<' || c == '&') {
        return html.replace('\u{a0}', " ");
    }

    let document = parse_document(TextSink::default(), ParseOpts::default())
        .from_utf8()
        .one(html.as_bytes());

    let mut text = String::with_capacity(html.len());
    collect_text(&document, &mut text);
    text.replace('\u{a0}', " ")
}

fn collect_text(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(contents) => out.push_str(&contents.borrow()),
        NodeKind::Element(name) if RAW_TEXT_ELEMENTS.contains(&&*name.local) => {}
        NodeKind::Document | NodeKind::Element(_) => {
            for child in node.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        NodeKind::Other => {}
    }
}

enum NodeKind {
    Document,
    Element(QualName),
    Text(RefCell<String>),
    /// Comments and processing instructions
    Other,
}

struct Node {
    kind: NodeKind,
    parent: RefCell<Option<Weak<Node>>>,
    children: RefCell<Vec<Rc<Node>>>,
}

type Handle = Rc<Node>;

impl Node {
    fn new(kind: NodeKind) -> Handle {
        Rc::new(Node {
            kind,
            parent: RefCell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    fn parent(&self) -> Option<Handle> {
        self.parent.borrow().as_ref().and_then(Weak::upgrade)
    }
}

/// Tree builder sink keeping only structure and text
struct TextSink {
    document: Handle,
}

impl Default for TextSink {
    fn default() -> Self {
        Self {
            document: Node::new(NodeKind::Document),
        }
    }
}

impl TextSink {
    fn text_node(text: &str) -> Handle {
        Node::new(NodeKind::Text(RefCell::new(text.to_string())))
    }

    fn adopt(parent: &Handle, child: &Handle) {
        *child.parent.borrow_mut() = Some(Rc::downgrade(parent));
    }

    fn detach(target: &Handle) {
        if let Some(parent) = target.parent() {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, target));
        }
        *target.parent.borrow_mut() = None;
    }
}

impl TreeSink for TextSink {
    type Handle = Handle;
    type Output = Handle;
    type ElemName<'a>
        = &'a QualName
    where
        Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Self::Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static EMPTY: QualName = QualName {
            prefix: None,
            ns: html5ever::ns!(),
            local: html5ever::local_name!(""),
        };
        match &target.kind {
            NodeKind::Element(name) => name,
            _ => &EMPTY,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        _attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        Node::new(NodeKind::Element(name))
    }

    fn create_comment(&self, _text: StrTendril) -> Self::Handle {
        Node::new(NodeKind::Other)
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        Node::new(NodeKind::Other)
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        let node = match child {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => {
                if let Some(last) = parent.children.borrow().last() {
                    if let NodeKind::Text(contents) = &last.kind {
                        contents.borrow_mut().push_str(&text);
                        return;
                    }
                }
                Self::text_node(&text)
            }
        };
        Self::adopt(parent, &node);
        parent.children.borrow_mut().push(node);
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let Some(parent) = sibling.parent() else {
            return;
        };
        let node = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => Self::text_node(&text),
        };
        Self::adopt(&parent, &node);

        let mut children = parent.children.borrow_mut();
        let index = children
            .iter()
            .position(|child| Rc::ptr_eq(child, sibling))
            .unwrap_or(children.len());
        children.insert(index, node);
    }

    fn add_attrs_if_missing(&self, _target: &Self::Handle, _attrs: Vec<Attribute>) {}

    fn remove_from_parent(&self, target: &Self::Handle) {
        Self::detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut *node.children.borrow_mut());
        for child in &children {
            Self::adopt(new_parent, child);
        }
        new_parent.children.borrow_mut().extend(children);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags_and_entities() {
        assert_eq!(
            strip_html("<p>Hello <b>world</b> &amp; co</p>"),
            "Hello world & co"
        );
        assert_eq!(strip_html("plain text"), "plain text");
        assert_eq!(strip_html(""), "");
    }

    #[test]
    fn test_comments_and_raw_text_are_dropped() {
        assert_eq!(
            strip_html("a<!-- note -->b<script type=\"x\">var x = '<p>';</script>c<style>p{}</STYLE>d"),
            "abcd"
        );
        assert_eq!(strip_html("open <!-- never closed"), "open ");
        assert_eq!(strip_html("x <b"), "x ");
    }

    #[test]
    fn test_bare_less_than_is_text() {
        assert_eq!(strip_html("<p>a < b</p>"), "a < b");
        assert_eq!(strip_html("1 < 2"), "1 < 2");
        assert_eq!(strip_html("<p>x <= y & y > z</p>"), "x <= y & y > z");
    }

    #[test]
    fn test_character_references() {
        assert_eq!(strip_html("caf&eacute; &mdash; ok"), "caf\u{e9} \u{2014} ok");
        assert_eq!(strip_html("&#8217;&#x41;&lt;"), "\u{2019}A<");
        assert_eq!(strip_html("a&nbsp;b"), "a b");
        assert_eq!(strip_html("fish & chips"), "fish & chips");
    }

    #[test]
    fn test_misnested_markup_keeps_text() {
        assert_eq!(strip_html("<b>bold <i>both</b> italic</i>"), "bold both italic");
        assert_eq!(
            strip_html("<table><tr><td>cell</td></tr>stray</table>"),
            "straycell"
        );
    }
}
