//! DOM binding for the processing page.
//!
//! Looks up the page's controls by ID, renders [`FormController`] state into
//! them and forwards user events back to the controller. Each upload owns one
//! `FileReader`; the request runs on the page's event loop.

use std::cell::RefCell;
use std::rc::Rc;

use imgproc_core::{FormController, FormError, ImageFile, media};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    Document, Event, EventTarget, FileReader, HtmlAnchorElement, HtmlButtonElement, HtmlElement,
    HtmlImageElement, HtmlInputElement, HtmlOptionElement, HtmlSelectElement, KeyboardEvent,
};

use crate::config::AppConfig;
use crate::constants::dom as ids;
use crate::transport::HttpClient;

/// Which upload control an event came from.
#[derive(Debug, Clone, Copy)]
enum Slot {
    First,
    Second,
}

/// A file input and the reader that loads its selections.
struct Upload {
    input: HtmlInputElement,
    reader: FileReader,
    /// Name and MIME type of the file being read
    pending: RefCell<Option<(String, String)>>,
}

impl Upload {
    fn find(document: &Document, id: &str) -> Result<Self, JsValue> {
        Ok(Self {
            input: element(document, id)?,
            reader: FileReader::new()?,
            pending: RefCell::new(None),
        })
    }
}

/// Controls of the processing page.
struct Page {
    document: Document,
    select: HtmlSelectElement,
    first_upload: Upload,
    second_upload: Upload,
    first_preview: HtmlImageElement,
    second_preview: HtmlImageElement,
    result_image: HtmlImageElement,
    process_button: HtmlButtonElement,
    save_button: HtmlButtonElement,
    second_area: HtmlElement,
    params_area: HtmlElement,
}

impl Page {
    fn find(document: Document) -> Result<Self, JsValue> {
        let select: HtmlSelectElement = element(&document, ids::ALGORITHM_SELECT)?;
        let params_area = params_area(&document, &select)?;

        Ok(Self {
            first_upload: Upload::find(&document, ids::FIRST_FILE_INPUT)?,
            second_upload: Upload::find(&document, ids::SECOND_FILE_INPUT)?,
            first_preview: element(&document, ids::FIRST_PREVIEW)?,
            second_preview: element(&document, ids::SECOND_PREVIEW)?,
            result_image: element(&document, ids::RESULT_IMAGE)?,
            process_button: element(&document, ids::PROCESS_BUTTON)?,
            save_button: element(&document, ids::SAVE_BUTTON)?,
            second_area: element(&document, ids::SECOND_IMAGE_AREA)?,
            select,
            params_area,
            document,
        })
    }
}

fn element<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| JsValue::from_str(&format!("missing element #{}", id)))?
        .dyn_into::<T>()
        .map_err(|_| JsValue::from_str(&format!("#{} has an unexpected element type", id)))
}

/// The parameter container, created next to the select if the page lacks one.
fn params_area(document: &Document, select: &HtmlSelectElement) -> Result<HtmlElement, JsValue> {
    if let Some(existing) = document.get_element_by_id(ids::PARAMS_AREA) {
        return existing.dyn_into::<HtmlElement>().map_err(JsValue::from);
    }

    let area: HtmlElement = document.create_element("div")?.dyn_into()?;
    area.set_id(ids::PARAMS_AREA);
    select.after_with_node_1(&area)?;
    Ok(area)
}

fn listen(
    target: &EventTarget,
    event: &str,
    handler: impl FnMut(Event) + 'static,
) -> Result<(), JsValue> {
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget(); // Leak the closure to keep it alive
    Ok(())
}

fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

fn set_display(element: &HtmlElement, value: &str) {
    if let Err(e) = element.style().set_property("display", value) {
        log::warn!("Failed to set display on #{}: {:?}", element.id(), e);
    }
}

/// The bound page.
pub struct App {
    page: Page,
    controller: RefCell<FormController>,
    client: HttpClient,
}

impl App {
    /// Bind the controller to the current document.
    pub fn mount(config: AppConfig) -> Result<(), JsValue> {
        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;
        let client = HttpClient::new(&config).map_err(|e| JsValue::from_str(&e.to_string()))?;

        let app = Rc::new(App {
            page: Page::find(document)?,
            controller: RefCell::new(FormController::new(config.locale)),
            client,
        });

        app.render_options()?;

        // Start from the option the select shows before any change event
        let initial = app.page.select.value();
        if !initial.is_empty() {
            let _ = app.controller.borrow_mut().on_algorithm_changed(&initial);
        }
        app.render_params()?;
        app.render();

        app.bind_events()?;
        log::info!("✅ Processing page bound");
        Ok(())
    }

    fn bind_events(self: &Rc<Self>) -> Result<(), JsValue> {
        let app = Rc::clone(self);
        listen(&self.page.select, "change", move |_| app.on_algorithm_changed())?;

        self.bind_upload(Slot::First)?;
        self.bind_upload(Slot::Second)?;

        let app = Rc::clone(self);
        listen(&self.page.params_area, "input", move |event| {
            app.on_param_input(&event)
        })?;

        let app = Rc::clone(self);
        listen(&self.page.process_button, "click", move |_| app.on_process())?;

        let app = Rc::clone(self);
        listen(&self.page.save_button, "click", move |_| app.on_save())?;

        let app = Rc::clone(self);
        listen(&self.page.document, "keydown", move |event| {
            let escape = event
                .dyn_ref::<KeyboardEvent>()
                .is_some_and(|key| key.key() == "Escape");
            if escape && app.controller.borrow_mut().cancel() {
                app.render();
            }
        })?;

        Ok(())
    }

    fn render_options(&self) -> Result<(), JsValue> {
        let select = &self.page.select;
        select.set_inner_html("");

        for option in self.controller.borrow().options() {
            let element: HtmlOptionElement = self
                .page
                .document
                .create_element("option")?
                .dyn_into()?;
            element.set_value(option.value);
            element.set_text(option.text);
            select.append_child(&element)?;
        }
        Ok(())
    }

    /// Inline inputs for the selected algorithm's parameters.
    fn render_params(&self) -> Result<(), JsValue> {
        let area = &self.page.params_area;
        area.set_inner_html("");

        let controller = self.controller.borrow();
        let fields = controller.param_fields();
        for spec in fields {
            let label: HtmlElement = self.page.document.create_element("label")?.dyn_into()?;
            label.set_text_content(Some(spec.label));

            let input: HtmlInputElement = self.page.document.create_element("input")?.dyn_into()?;
            input.set_type("text");
            input.set_name(spec.field);
            input.set_attribute("inputmode", "decimal")?;
            input.set_value(controller.param_input(spec.field).unwrap_or(""));

            label.append_child(&input)?;
            area.append_child(&label)?;
        }

        set_display(area, if fields.is_empty() { "none" } else { "block" });
        Ok(())
    }

    fn render(&self) {
        let controller = self.controller.borrow();
        let buttons = controller.buttons();

        self.page.process_button.set_disabled(!buttons.process_enabled);
        self.page.save_button.set_disabled(!buttons.save_enabled);
        set_display(
            &self.page.save_button,
            if buttons.save_visible { "inline-block" } else { "none" },
        );
        set_display(
            &self.page.second_area,
            if controller.second_image_visible() {
                "contents"
            } else {
                "none"
            },
        );

        if let Some(src) = controller.first_preview() {
            self.page.first_preview.set_src(src);
        }
        if let Some(src) = controller.second_preview() {
            self.page.second_preview.set_src(src);
        }
        if let Some(result) = controller.result() {
            self.page.result_image.set_src(&result.data_url);
        }

        let busy = if controller.is_sending() { "true" } else { "false" };
        let _ = self.page.process_button.set_attribute("aria-busy", busy);
    }

    fn on_algorithm_changed(&self) {
        let name = self.page.select.value();
        let outcome = self.controller.borrow_mut().on_algorithm_changed(&name);

        if let Err(e) = self.render_params() {
            log::warn!("Failed to render parameter inputs: {:?}", e);
        }
        self.render();

        match outcome {
            Ok(Some(notice)) => alert(notice.message()),
            Ok(None) => {}
            Err(e) => alert(&e.to_string()),
        }
    }

    fn on_param_input(&self, event: &Event) {
        let Some(input) = event
            .target()
            .and_then(|target| target.dyn_into::<HtmlInputElement>().ok())
        else {
            return;
        };
        self.controller
            .borrow_mut()
            .set_param_input(&input.name(), input.value());
    }

    /// Listeners of one upload, bound once for the page's lifetime.
    fn bind_upload(self: &Rc<Self>, slot: Slot) -> Result<(), JsValue> {
        let upload = self.upload(slot);

        let app = Rc::clone(self);
        listen(&upload.input, "change", move |_| app.on_file_changed(slot))?;

        let app = Rc::clone(self);
        listen(&upload.reader, "load", move |_| app.on_file_loaded(slot))?;

        let app = Rc::clone(self);
        listen(&upload.reader, "error", move |_| app.on_file_failed(slot))?;

        listen(&upload.reader, "abort", move |_| {
            log::debug!("📂 {:?} read aborted", slot)
        })?;
        Ok(())
    }

    fn upload(&self, slot: Slot) -> &Upload {
        match slot {
            Slot::First => &self.page.first_upload,
            Slot::Second => &self.page.second_upload,
        }
    }

    fn on_file_changed(&self, slot: Slot) {
        let upload = self.upload(slot);
        let Some(file) = upload.input.files().and_then(|files| files.get(0)) else {
            return;
        };

        let name = file.name();
        let mime = file.type_();
        if !media::is_image_mime(&mime) {
            log::warn!("🚫 Rejected {} ({})", name, mime);
            alert(&FormError::InvalidFileType { mime }.to_string());
            return;
        }

        // A newer selection replaces a read still in progress
        if upload.reader.ready_state() == FileReader::LOADING {
            upload.reader.abort();
        }

        upload.pending.replace(Some((name.clone(), mime)));
        if let Err(e) = upload.reader.read_as_array_buffer(&file) {
            log::error!("Failed to read {}: {:?}", name, e);
            upload.pending.replace(None);
            alert(&FormError::FileUnreadable { name }.to_string());
        }
    }

    fn on_file_loaded(&self, slot: Slot) {
        let upload = self.upload(slot);
        let Some((name, mime)) = upload.pending.take() else {
            return;
        };
        let result = match upload.reader.result() {
            Ok(result) if !result.is_null() => result,
            _ => {
                log::error!("📂 Reading {} produced no data", name);
                alert(&FormError::FileUnreadable { name }.to_string());
                return;
            }
        };

        let bytes = js_sys::Uint8Array::new(&result).to_vec();
        log::info!("📂 File {} read: {} bytes", name, bytes.len());
        let file = ImageFile::new(name, mime, bytes);

        let outcome = {
            let mut controller = self.controller.borrow_mut();
            match slot {
                Slot::First => controller.on_first_image_selected(Some(file)),
                Slot::Second => controller.on_second_image_selected(Some(file)),
            }
        };
        self.render();
        if let Err(e) = outcome {
            alert(&e.to_string());
        }
    }

    fn on_file_failed(&self, slot: Slot) {
        let name = self
            .upload(slot)
            .pending
            .take()
            .map(|(name, _)| name)
            .unwrap_or_default();
        log::error!("📂 Reading {} failed", name);
        alert(&FormError::FileUnreadable { name }.to_string());
    }

    fn on_process(self: &Rc<Self>) {
        let submitted = self.controller.borrow_mut().submit();
        let submission = match submitted {
            Ok(submission) => submission,
            Err(e) => {
                self.render();
                alert(&e.to_string());
                return;
            }
        };
        self.render();

        let app = Rc::clone(self);
        wasm_bindgen_futures::spawn_local(async move {
            let outcome = app.client.send(&submission.request).await;
            let settled = app
                .controller
                .borrow_mut()
                .complete(submission.ticket, outcome);
            app.render();
            if let Err(e) = settled {
                alert(&e.to_string());
            }
        });
    }

    fn on_save(&self) {
        let saved = self.controller.borrow().save_result();
        match saved {
            Ok(saved) => {
                if let Err(e) = self.download(&saved.data_url, saved.filename) {
                    log::error!("Failed to download result: {:?}", e);
                }
            }
            Err(e) => alert(&e.to_string()),
        }
    }

    fn download(&self, href: &str, filename: &str) -> Result<(), JsValue> {
        let body = self.page.document.body().ok_or("no body")?;
        let anchor: HtmlAnchorElement = self.page.document.create_element("a")?.dyn_into()?;
        anchor.set_href(href);
        anchor.set_download(filename);

        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;

        log::info!("💾 Downloaded {}", filename);
        Ok(())
    }
}
