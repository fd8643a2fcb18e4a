//! Code-label annotation over a live container element.

use mdpanel_renderer::annotate::{
    AnnotateStats, CODE_LABEL_CLASS, CODE_WRAPPER_CLASS, CodeBlockHost, annotate_code_blocks,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, Node};

/// A `<pre>` found during one pass, with its position in document order.
#[derive(Debug, Clone)]
pub struct DomBlock {
    index: usize,
    pre: Element,
}

/// [`CodeBlockHost`] for the `<pre>` elements below a container.
pub struct DomCodeBlocks<'a> {
    container: &'a Element,
}

impl<'a> DomCodeBlocks<'a> {
    pub fn new(container: &'a Element) -> Self {
        Self { container }
    }
}

fn code_child(pre: &Element) -> Option<Element> {
    pre.query_selector("code").ok().flatten()
}

fn wrapper_of(pre: &Element) -> Option<Element> {
    pre.parent_element()
        .filter(|parent| parent.class_list().contains(CODE_WRAPPER_CLASS))
}

fn label_element(pre: &Element, language: &str) -> Result<Element, JsValue> {
    let document = pre
        .owner_document()
        .ok_or_else(|| JsValue::from_str("code block is not attached to a document"))?;
    let label = document.create_element("span")?;
    label.set_class_name(CODE_LABEL_CLASS);
    label.set_text_content(Some(language));
    Ok(label)
}

fn wrap_block(pre: &Element, language: &str) -> Result<(), JsValue> {
    let document = pre
        .owner_document()
        .ok_or_else(|| JsValue::from_str("code block is not attached to a document"))?;
    let wrapper = document.create_element("div")?;
    wrapper.set_class_name(CODE_WRAPPER_CLASS);
    wrapper.append_child(&label_element(pre, language)?)?;
    let copy: Node = pre.clone_node_with_deep(true)?;
    wrapper.append_child(&copy)?;
    pre.replace_with_with_node_1(&wrapper)
}

impl CodeBlockHost for DomCodeBlocks<'_> {
    type Block = DomBlock;
    type Key = usize;

    fn code_blocks(&self) -> Vec<DomBlock> {
        let Ok(nodes) = self.container.query_selector_all("pre") else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|i| nodes.item(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .filter(|pre| code_child(pre).is_some())
            .enumerate()
            .map(|(index, pre)| DomBlock { index, pre })
            .collect()
    }

    fn block_key(&self, block: &DomBlock) -> usize {
        block.index
    }

    fn code_class(&self, block: &DomBlock) -> Option<String> {
        code_child(&block.pre).and_then(|code| code.get_attribute("class"))
    }

    fn is_wrapped(&self, block: &DomBlock) -> bool {
        wrapper_of(&block.pre).is_some()
    }

    fn set_label(&mut self, block: &DomBlock, language: &str) {
        let Some(wrapper) = wrapper_of(&block.pre) else {
            return;
        };
        let selector = format!(".{CODE_LABEL_CLASS}");
        match wrapper.query_selector(&selector).ok().flatten() {
            Some(label) => label.set_text_content(Some(language)),
            None => {
                let prepended = label_element(&block.pre, language)
                    .and_then(|label| wrapper.prepend_with_node_1(&label));
                if let Err(e) = prepended {
                    tracing::warn!(error = ?e, language, "failed to restore code label");
                }
            }
        }
    }

    fn wrap(&mut self, block: &DomBlock, language: &str) {
        if let Err(e) = wrap_block(&block.pre, language) {
            tracing::warn!(error = ?e, language, "failed to wrap code block");
        }
    }
}

/// Label every code block below `container`.
pub fn annotate_container(container: &Element) -> AnnotateStats {
    annotate_code_blocks(&mut DomCodeBlocks::new(container))
}
