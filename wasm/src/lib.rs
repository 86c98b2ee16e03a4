#![forbid(unsafe_code)]

mod files;
mod logger;
mod surface;

use files::WebFile;
use gwas_explorer::{BatchStart, Explorer, ExplorerConfig, LoadOutcome, Role};
use js_sys::Promise;
use log::LevelFilter;
use std::cell::RefCell;
use std::rc::Rc;
use surface::CanvasSurface;
use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use wasm_bindgen_futures::future_to_promise;
use web_sys::{FileList, HtmlCanvasElement};

fn to_js(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

#[wasm_bindgen]
pub struct State {
    explorer: Rc<RefCell<Explorer<CanvasSurface>>>,
}

impl State {
    fn build(canvas: HtmlCanvasElement, config: ExplorerConfig) -> Self {
        logger::init(LevelFilter::Info);
        let surface = CanvasSurface::new(canvas, config.clone());
        Self {
            explorer: Rc::new(RefCell::new(Explorer::new(surface, config))),
        }
    }

    fn select(&self, role: Role, attribute: &str) -> Result<(), JsValue> {
        self.explorer
            .borrow_mut()
            .select(role, attribute)
            .map_err(to_js)?;
        Ok(())
    }

    fn selected(&self, role: Role) -> Option<String> {
        self.explorer.borrow().selection().get(role).map(str::to_owned)
    }
}

#[wasm_bindgen]
impl State {
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Self {
        Self::build(canvas, ExplorerConfig::default())
    }

    /// Same as the constructor, with settings given as a JSON object.
    pub fn with_config(canvas: HtmlCanvasElement, config: &str) -> Result<State, JsValue> {
        let config = ExplorerConfig::from_json(config)
            .map_err(|e| format!("Invalid configuration: {e:#}"))?;
        Ok(Self::build(canvas, config))
    }

    /// Loads a new file selection. The promise resolves to `false` if a
    /// newer selection superseded this one while its files were read.
    pub fn load_files(&self, files: FileList) -> Promise {
        let start = self
            .explorer
            .borrow_mut()
            .begin_load(WebFile::from_list(&files));
        let explorer = Rc::clone(&self.explorer);
        future_to_promise(async move {
            let outcome = match start {
                BatchStart::Done(report) => LoadOutcome::Loaded(report),
                BatchStart::Reading(batch) => {
                    let result = batch.read().await;
                    explorer.borrow_mut().finish_load(result).map_err(to_js)?
                }
            };
            Ok(JsValue::from_bool(outcome != LoadOutcome::Stale))
        })
    }

    pub fn select_x(&self, attribute: &str) -> Result<(), JsValue> {
        self.select(Role::X, attribute)
    }

    pub fn select_y(&self, attribute: &str) -> Result<(), JsValue> {
        self.select(Role::Y, attribute)
    }

    pub fn select_id(&self, attribute: &str) -> Result<(), JsValue> {
        self.select(Role::Id, attribute)
    }

    pub fn refresh(&self) -> Result<(), JsValue> {
        self.explorer.borrow_mut().refresh().map_err(to_js)?;
        Ok(())
    }

    /// Attributes offered for every role, in first-seen order.
    pub fn attributes(&self) -> Vec<String> {
        self.explorer.borrow().selection().options().to_vec()
    }

    pub fn selected_x(&self) -> Option<String> {
        self.selected(Role::X)
    }

    pub fn selected_y(&self) -> Option<String> {
        self.selected(Role::Y)
    }

    pub fn selected_id(&self) -> Option<String> {
        self.selected(Role::Id)
    }

    /// Messages of the last action, as a JSON array of `{level, text}`.
    pub fn status_json(&self) -> Result<String, JsValue> {
        serde_json::to_string(self.explorer.borrow().status()).map_err(to_js)
    }

    /// The chart currently shown, as JSON, if any.
    pub fn series_json(&self) -> Result<Option<String>, JsValue> {
        let explorer = self.explorer.borrow();
        explorer
            .plot()
            .map(serde_json::to_string)
            .transpose()
            .map_err(to_js)
    }

    /// Tooltip for the point under a canvas pixel, title and body separated
    /// by a newline. The point is highlighted on the canvas.
    pub fn hover(&self, x: i32, y: i32) -> Result<Option<String>, JsValue> {
        let tooltip = self.explorer.borrow_mut().hover(x, y).map_err(to_js)?;
        Ok(tooltip.map(|tooltip| format!("{}\n{}", tooltip.title, tooltip.body)))
    }

    /// Identifier of the point under a canvas pixel.
    pub fn click(&self, x: i32, y: i32) -> Option<String> {
        self.explorer
            .borrow()
            .click(x, y)
            .map(|point| point.label.clone())
    }
}
