use std::cell::RefCell;
use std::rc::Rc;

use infer_watch::config::ElementIds;
use infer_watch::markup::Node;
use infer_watch::surface::{image_failed, image_loaded, Surface};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

use super::console_error;

const HIDDEN_CLASS: &str = "hidden";

/// [`Surface`] over the page's own elements.
///
/// Cloning only clones element handles, so image callbacks and poll tasks can
/// each hold their own copy.
#[derive(Clone)]
pub(super) struct DomSurface {
    document: web_sys::Document,
    image: web_sys::HtmlImageElement,
    predictions: web_sys::Element,
    overlay: web_sys::Element,
    status: web_sys::Element,
    history: web_sys::Element,
    /// `src` most recently assigned, for the load-failure message.
    pending_src: Rc<RefCell<String>>,
}

impl DomSurface {
    pub(super) fn attach(document: &web_sys::Document, ids: &ElementIds) -> Result<Self, String> {
        let by_id = |id: &str| {
            document
                .get_element_by_id(id)
                .ok_or_else(|| format!("missing element #{id}"))
        };

        let image = by_id(&ids.image)?
            .dyn_into::<web_sys::HtmlImageElement>()
            .map_err(|_| format!("#{} is not an <img>", ids.image))?;

        Ok(Self {
            document: document.clone(),
            image,
            predictions: by_id(&ids.predictions)?,
            overlay: by_id(&ids.overlay)?,
            status: by_id(&ids.status)?,
            history: by_id(&ids.history)?,
            pending_src: Rc::new(RefCell::new(String::new())),
        })
    }

    /// Attach the image's load/error handlers. Called once at mount; every
    /// later `src` change reuses them.
    pub(super) fn install_image_handlers(&self) {
        let surface = self.clone();
        let onload = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            image_loaded(&mut surface.clone());
        }) as Box<dyn FnMut(_)>);
        self.image.set_onload(Some(onload.as_ref().unchecked_ref()));
        onload.forget();

        let surface = self.clone();
        let onerror = Closure::wrap(Box::new(move |_ev: web_sys::Event| {
            let url = surface.pending_src.borrow().clone();
            console_error(&format!("Failed to load image: {url}"));
            image_failed(&mut surface.clone(), &url);
        }) as Box<dyn FnMut(_)>);
        self.image.set_onerror(Some(onerror.as_ref().unchecked_ref()));
        onerror.forget();
    }

    fn replace_children(&self, container: &web_sys::Element, nodes: &[Node]) {
        // Dropping the old children also drops anything attached to them.
        container.set_text_content(None);
        for node in nodes {
            match build_node(&self.document, node) {
                Ok(built) => {
                    if container.append_child(&built).is_err() {
                        console_error("dom: append_child failed");
                    }
                }
                Err(e) => console_error(&e),
            }
        }
    }
}

fn build_node(document: &web_sys::Document, node: &Node) -> Result<web_sys::Node, String> {
    match node {
        Node::Text(text) => Ok(document.create_text_node(text).into()),
        Node::Element(e) => {
            let el = document
                .create_element(e.tag)
                .map_err(|_| format!("document: create_element({}) failed", e.tag))?;
            if !e.classes.is_empty() {
                el.set_class_name(&e.classes.join(" "));
            }
            for (name, value) in &e.attrs {
                el.set_attribute(name, value)
                    .map_err(|_| format!("element: set_attribute({name}) failed"))?;
            }
            for child in &e.children {
                let c = build_node(document, child)?;
                el.append_child(&c)
                    .map_err(|_| "element: append_child failed".to_string())?;
            }
            Ok(el.into())
        }
    }
}

impl Surface for DomSurface {
    fn set_predictions(&mut self, nodes: Vec<Node>) {
        self.replace_children(&self.predictions, &nodes);
    }

    fn set_history(&mut self, nodes: Vec<Node>) {
        self.replace_children(&self.history, &nodes);
    }

    fn set_status(&mut self, text: &str) {
        self.status.set_text_content(Some(text));
    }

    fn show_overlay(&mut self) {
        let _ = self.overlay.class_list().remove_1(HIDDEN_CLASS);
    }

    fn hide_overlay(&mut self) {
        let _ = self.overlay.class_list().add_1(HIDDEN_CLASS);
    }

    fn set_image_visible(&mut self, visible: bool) {
        let opacity = if visible { "1" } else { "0" };
        let _ = self.image.style().set_property("opacity", opacity);
    }

    fn load_image(&mut self, url: &str) {
        *self.pending_src.borrow_mut() = url.to_string();
        self.image.set_src(url);
    }
}
