//! The host page around the rendering surface.
//!
//! On the web the scene lives in a `<canvas id="wgpu-canvas">` between a static header
//! and footer; natively the header and footer are logged and the window carries the
//! page title.

/// Document head metadata.
pub struct PageMetadata;

impl PageMetadata {
    pub const TITLE: &'static str = "Voxel Boy | Agentic Scene";
    pub const DESCRIPTION: &'static str =
        "Pixelated 3D boy rendered with React Three Fiber and Next.js";
    pub const CANONICAL_BASE: &'static str = "https://agentic-df572e89.vercel.app";
}

/// Static text shown around the canvas.
pub struct PageContent;

impl PageContent {
    pub const HEADER_TITLE: &'static str = "Pixel Voxel Boy";
    pub const HEADER_DESCRIPTION: &'static str = "An interactive voxel-inspired 3D character handcrafted with React Three Fiber. \
         Drag to orbit, scroll to zoom, and enjoy the retro-future glow.";
    pub const FOOTER: &'static str =
        "Crafted autonomously · Powered by Next.js, Three.js, and a touch of neon nostalgia.";
}

/// Id of the canvas the web build renders into.
pub const CANVAS_ID: &str = "wgpu-canvas";

/// Message shown in place of the canvas when no graphics context could be created.
pub fn fallback_message(error: &dyn std::fmt::Display) -> String {
    format!("This scene needs WebGPU or WebGL2, which could not be started: {error}")
}

#[cfg(not(target_family = "wasm"))]
pub fn log_page_content() {
    log::info!("{} | {}", PageContent::HEADER_TITLE, PageContent::HEADER_DESCRIPTION);
    log::info!("{}", PageContent::FOOTER);
}

#[cfg(target_family = "wasm")]
pub use web::{canvas_element, set_document_title, show_fallback};

#[cfg(target_family = "wasm")]
mod web {
    use log::warn;
    use wasm_bindgen::JsCast;
    use web_sys::HtmlCanvasElement;

    use super::{fallback_message, PageMetadata, CANVAS_ID};

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    pub fn set_document_title() {
        match document() {
            Some(document) => document.set_title(PageMetadata::TITLE),
            None => warn!("No document available, title not set"),
        }
    }

    pub fn canvas_element() -> Option<HtmlCanvasElement> {
        document()?
            .get_element_by_id(CANVAS_ID)?
            .dyn_into::<HtmlCanvasElement>()
            .ok()
    }

    /// Replaces the canvas with a paragraph explaining why nothing is drawn.
    pub fn show_fallback(error: &dyn std::fmt::Display) {
        let Some(document) = document() else {
            return;
        };
        let Some(canvas) = document.get_element_by_id(CANVAS_ID) else {
            return;
        };
        let Ok(paragraph) = document.create_element("p") else {
            return;
        };

        paragraph.set_class_name("scene-fallback");
        paragraph.set_text_content(Some(&fallback_message(error)));
        if canvas.replace_with_with_node_1(&paragraph).is_err() {
            warn!("Could not replace the canvas with the fallback message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_names_the_cause() {
        let message = fallback_message(&"no adapter");
        assert!(message.contains("no adapter"));
        assert!(message.contains("WebGL2"));
    }

    #[test]
    fn canonical_base_is_https() {
        assert!(PageMetadata::CANONICAL_BASE.starts_with("https://"));
        assert!(PageMetadata::TITLE.starts_with("Voxel Boy"));
    }
}
