use std::cell::RefCell;
use std::rc::Rc;

use bevy_log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlButtonElement};

use super::controls::{ControlPanel, ControlState, UiAction};
use crate::engine::xr::browser::call_method;
use constants::ui::{
    CANVAS_ID, INSTRUCTIONS_ID, PLACE_BUTTON_ID, START_BUTTON_ID, SUPPORT_WARNING_CLASS,
    UI_CONTAINER_ID,
};

type ActionQueue = Rc<RefCell<Vec<UiAction>>>;

/// DOM rendition of the [`ControlPanel`].
///
/// Builds the canvas, instruction line and both buttons inside the mount
/// node, queues clicks as [`UiAction`]s and mirrors panel changes back into
/// the page.
pub struct PageControls {
    start: HtmlButtonElement,
    place: HtmlButtonElement,
    instructions: Element,
    actions: ActionQueue,
    shown: Option<ControlPanel>,
}

fn create(document: &Document, tag: &str, id: &str) -> Result<Element, JsValue> {
    let element = document.create_element(tag)?;
    element.set_id(id);
    Ok(element)
}

fn create_button(document: &Document, id: &str) -> Result<HtmlButtonElement, JsValue> {
    let button: HtmlButtonElement = create(document, "button", id)?.dyn_into()?;
    button.set_type("button");
    button.class_list().add_1("ui-button")?;
    Ok(button)
}

fn on_click(target: &Element, actions: &ActionQueue, action: UiAction) -> Result<(), JsValue> {
    let actions = actions.clone();
    let listener = Closure::<dyn FnMut()>::new(move || {
        actions.borrow_mut().push(action);
    });
    target.add_event_listener_with_callback("click", listener.as_ref().unchecked_ref())?;
    listener.forget();
    Ok(())
}

fn show(button: &HtmlButtonElement, state: &ControlState) {
    button.set_disabled(!state.enabled);
    button.set_text_content(Some(&state.label));
}

impl PageControls {
    pub fn mount(document: &Document, root: &Element) -> Result<Self, JsValue> {
        let actions = ActionQueue::default();

        let canvas = create(document, "canvas", CANVAS_ID)?;
        root.append_child(&canvas)?;
        on_click(&canvas, &actions, UiAction::CanvasTapped)?;

        let container = create(document, "div", UI_CONTAINER_ID)?;
        let instructions = create(document, "p", INSTRUCTIONS_ID)?;
        let start = create_button(document, START_BUTTON_ID)?;
        let place = create_button(document, PLACE_BUTTON_ID)?;
        place.class_list().add_1("primary-action")?;

        container.append_child(&instructions)?;
        container.append_child(&start)?;
        container.append_child(&place)?;
        root.append_child(&container)?;

        on_click(&start, &actions, UiAction::StartToggleClicked)?;
        on_click(&place, &actions, UiAction::PlaceClicked)?;

        // Touches on the overlay controls must not also fire an XR select.
        let block_select = Closure::<dyn FnMut(JsValue)>::new(|event: JsValue| {
            if let Err(e) = call_method(&event, "preventDefault", &[]) {
                debug!("beforexrselect preventDefault failed: {:?}", e);
            }
        });
        container.add_event_listener_with_callback(
            "beforexrselect",
            block_select.as_ref().unchecked_ref(),
        )?;
        block_select.forget();

        let mut controls = Self {
            start,
            place,
            instructions,
            actions,
            shown: None,
        };
        controls.sync(&ControlPanel::default());
        Ok(controls)
    }

    /// Clicks queued since the last call, in order.
    pub fn take_actions(&self) -> Vec<UiAction> {
        std::mem::take(&mut *self.actions.borrow_mut())
    }

    /// Write `panel` into the page when it differs from what is shown.
    pub fn sync(&mut self, panel: &ControlPanel) {
        if self.shown.as_ref() == Some(panel) {
            return;
        }

        show(&self.start, &panel.start);
        show(&self.place, &panel.place);
        self.instructions
            .set_text_content(Some(panel.instructions()));

        let classes = self.start.class_list();
        let outcome = match panel.support_warning() {
            Some(label) => {
                let _ = self.start.set_attribute("title", label);
                classes.add_1(SUPPORT_WARNING_CLASS)
            }
            None => {
                let _ = self.start.remove_attribute("title");
                classes.remove_1(SUPPORT_WARNING_CLASS)
            }
        };
        if let Err(e) = outcome {
            debug!("Failed to update support warning class: {:?}", e);
        }

        self.shown = Some(panel.clone());
    }
}
