use js_sys::JSON;
use serde::Serialize;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use calchart_drill_core::{
    compile_show, parse_show_json, Config, ContinuityRef, DotId, DotType, SheetId, SheetScoped,
    Show, ShowTimeline,
};

/// A loaded show and its compiled timeline.
#[wasm_bindgen]
pub struct DrillPlayer {
    cfg: Config,
    show: Option<Show>,
    timeline: Option<ShowTimeline>,
    active_sheet: Option<SheetId>,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// Maps become plain objects so hosts can index them by dot id.
fn to_js<T: Serialize + ?Sized>(value: &T, what: &str) -> Result<JsValue, JsError> {
    value
        .serialize(&swb::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("{what} error: {e}")))
}

fn stringify(value: &JsValue, what: &str) -> Result<String, JsError> {
    if let Some(s) = value.as_string() {
        return Ok(s);
    }
    JSON::stringify(value)
        .map_err(|e| JsError::new(&format!("{what} stringify error: {:?}", e)))?
        .as_string()
        .ok_or_else(|| JsError::new(&format!("{what}: stringify produced non-string")))
}

impl DrillPlayer {
    fn loaded(&self) -> Result<(&Show, &ShowTimeline), JsError> {
        match (&self.show, &self.timeline) {
            (Some(show), Some(timeline)) => Ok((show, timeline)),
            _ => Err(JsError::new("no show loaded")),
        }
    }

    fn recompile(&mut self) {
        self.timeline = self.show.as_ref().map(|show| compile_show(show, &self.cfg));
    }
}

#[wasm_bindgen]
impl DrillPlayer {
    /// Create a player. Pass a config object or undefined/null for defaults.
    /// Example:
    ///   new DrillPlayer({ detectCollisions: true, collisionRadius: 1 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<DrillPlayer, JsError> {
        console_error_panic_hook::set_once();

        let cfg: Config = if jsvalue_is_undefined_or_null(&config) {
            Config::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };

        Ok(DrillPlayer {
            cfg,
            show: None,
            timeline: None,
            active_sheet: None,
        })
    }

    /// Load a stored show (object or JSON string) and compile it, replacing
    /// any show loaded before. Returns the show length in beats.
    #[wasm_bindgen(js_name = load_show)]
    pub fn load_show(&mut self, show_json: JsValue) -> Result<u32, JsError> {
        if jsvalue_is_undefined_or_null(&show_json) {
            return Err(JsError::new("load_show: show_json is null/undefined"));
        }
        let s = stringify(&show_json, "load_show")?;
        let show = parse_show_json(&s)
            .map_err(|e| JsError::new(&format!("load_show parse error: {e}")))?;
        self.active_sheet = show.sheets.first().map(|s| s.id);
        self.show = Some(show);
        self.recompile();
        self.total_beats()
    }

    #[wasm_bindgen(js_name = total_beats)]
    pub fn total_beats(&self) -> Result<u32, JsError> {
        Ok(self.loaded()?.1.total_beats())
    }

    /// Sheet ids in show order.
    #[wasm_bindgen]
    pub fn sheets(&self) -> Result<Vec<u32>, JsError> {
        let (show, _) = self.loaded()?;
        Ok(show.sheets.iter().map(|s| s.id.0).collect())
    }

    /// `{ x, y, angle }` for `dot` at `beat`, or null when the dot has no
    /// state there.
    #[wasm_bindgen(js_name = state_at)]
    pub fn state_at(&self, dot: String, beat: f64) -> Result<JsValue, JsError> {
        let (_, timeline) = self.loaded()?;
        match timeline.state_at(&DotId::new(dot), beat) {
            Some(state) => to_js(&state, "state"),
            None => Ok(JsValue::NULL),
        }
    }

    /// States of every dot at `beat`, keyed by dot id.
    #[wasm_bindgen(js_name = states_at)]
    pub fn states_at(&self, beat: f64) -> Result<JsValue, JsError> {
        let (_, timeline) = self.loaded()?;
        to_js(&timeline.states_at(beat), "states")
    }

    /// Continuity text of each command `dot` runs on `sheet`.
    #[wasm_bindgen(js_name = continuity_texts)]
    pub fn continuity_texts(&self, dot: String, sheet: u32) -> Result<Vec<String>, JsError> {
        let (_, timeline) = self.loaded()?;
        Ok(timeline.continuity_texts(&DotId::new(dot), SheetId(sheet)))
    }

    /// Compiled commands for `dot` on `sheet`, or null.
    #[wasm_bindgen]
    pub fn commands(&self, dot: String, sheet: u32) -> Result<JsValue, JsError> {
        let (_, timeline) = self.loaded()?;
        match timeline.commands(&DotId::new(dot), SheetId(sheet)) {
            Some(cmds) => to_js(cmds, "commands"),
            None => Ok(JsValue::NULL),
        }
    }

    /// Issues found while compiling.
    #[wasm_bindgen]
    pub fn diagnostics(&self) -> Result<JsValue, JsError> {
        let (_, timeline) = self.loaded()?;
        to_js(timeline.diagnostics(), "diagnostics")
    }

    /// Beats at which dots on `sheet` come within `radius` steps of another.
    #[wasm_bindgen]
    pub fn collisions(&self, sheet: u32, radius: f64) -> Result<JsValue, JsError> {
        let (_, timeline) = self.loaded()?;
        to_js(&timeline.collisions(SheetId(sheet), radius), "collisions")
    }

    #[wasm_bindgen(js_name = set_active_sheet)]
    pub fn set_active_sheet(&mut self, sheet: u32) -> Result<(), JsError> {
        let (show, _) = self.loaded()?;
        if show.sheet(SheetId(sheet)).is_none() {
            return Err(JsError::new(&format!("unknown sheet {sheet}")));
        }
        self.active_sheet = Some(SheetId(sheet));
        Ok(())
    }

    /// Reverse the dot order of continuity `index` for `dot_type` on `sheet`
    /// and recompile. Fails unless `sheet` is the active sheet.
    #[wasm_bindgen(js_name = reverse_order)]
    pub fn reverse_order(
        &mut self,
        sheet: u32,
        dot_type: String,
        index: usize,
    ) -> Result<(), JsError> {
        let dot_type = dot_type
            .parse::<DotType>()
            .map_err(|e| JsError::new(&format!("reverse_order error: {e}")))?;
        let active = self
            .active_sheet
            .ok_or_else(|| JsError::new("no show loaded"))?;
        let show = self
            .show
            .as_mut()
            .ok_or_else(|| JsError::new("no show loaded"))?;
        let edit = SheetScoped::new(SheetId(sheet), ContinuityRef { dot_type, index });
        show.edit_order(&edit, active, |o| o.reverse_order())
            .map_err(|e| JsError::new(&format!("reverse_order error: {e}")))?;
        self.recompile();
        Ok(())
    }

    /// The loaded show in stored form.
    #[wasm_bindgen(js_name = show_json)]
    pub fn show_json(&self) -> Result<String, JsError> {
        let (show, _) = self.loaded()?;
        show.to_json()
            .map_err(|e| JsError::new(&format!("show_json error: {e}")))
    }
}

/// Numeric ABI version for compatibility checks at init.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
