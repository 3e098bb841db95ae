use bevy_ecs::prelude::*;
use bevy_log::debug;

use crate::engine::xr::lifecycle::SessionToggleRequested;
use crate::support::SupportGuidance;
use crate::tools::placement::{PlaceRequest, PlaceTrigger};
use constants::ui::{
    CHECKING_SUPPORT_TEXT, ENTER_AR_TEXT, PLACE_IDLE_LABEL, PLACE_LABEL, SEARCHING_TEXT,
    START_LABEL, STOP_LABEL,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlState {
    pub enabled: bool,
    pub label: String,
}

impl ControlState {
    fn disabled(label: &str) -> Self {
        Self {
            enabled: false,
            label: label.to_string(),
        }
    }

    fn enable(&mut self, label: &str) {
        self.enabled = true;
        self.label = label.to_string();
    }

    fn disable(&mut self, label: &str) {
        self.enabled = false;
        self.label = label.to_string();
    }
}

/// Start/stop toggle, place button and instruction line.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct ControlPanel {
    pub start: ControlState,
    pub place: ControlState,
    instructions: String,
    /// Reason shown on the session entry point while AR is unavailable.
    support_warning: Option<String>,
}

impl Default for ControlPanel {
    fn default() -> Self {
        Self {
            start: ControlState::disabled(START_LABEL),
            place: ControlState::disabled(PLACE_IDLE_LABEL),
            instructions: CHECKING_SUPPORT_TEXT.to_string(),
            support_warning: None,
        }
    }
}

impl ControlPanel {
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn support_warning(&self) -> Option<&str> {
        self.support_warning.as_deref()
    }

    /// Returns true only when the text actually changed.
    pub fn set_instruction(&mut self, text: &str) -> bool {
        if self.instructions == text {
            return false;
        }
        self.instructions = text.to_string();
        true
    }

    pub fn show_session_started(&mut self) {
        self.place.enable(PLACE_LABEL);
        self.start.enable(STOP_LABEL);
        self.set_instruction(SEARCHING_TEXT);
    }

    pub fn show_session_ended(&mut self, support_ready: bool) {
        self.place.disable(PLACE_IDLE_LABEL);
        self.start.label = START_LABEL.to_string();
        self.start.enabled = support_ready;
        self.set_instruction(ENTER_AR_TEXT);
    }

    pub fn show_supported(&mut self, session_active: bool) {
        self.support_warning = None;
        self.start
            .enable(if session_active { STOP_LABEL } else { START_LABEL });
        self.set_instruction(ENTER_AR_TEXT);
    }

    pub fn show_unsupported(&mut self, guidance: &SupportGuidance) {
        self.support_warning = guidance.button_label.clone();
        self.place.enabled = false;
        self.start.disable(START_LABEL);
        self.set_instruction(&guidance.message);
    }
}

/// Raw input from the page.
#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAction {
    StartToggleClicked,
    PlaceClicked,
    /// Tap on the canvas or an XR `select`.
    CanvasTapped,
}

/// Turn page input into pipeline requests. Disabled buttons swallow clicks.
pub fn route_ui_actions(
    mut actions: EventReader<UiAction>,
    controls: Res<ControlPanel>,
    mut toggles: EventWriter<SessionToggleRequested>,
    mut placements: EventWriter<PlaceRequest>,
) {
    for action in actions.read() {
        match action {
            UiAction::StartToggleClicked if controls.start.enabled => {
                toggles.write(SessionToggleRequested);
            }
            UiAction::PlaceClicked if controls.place.enabled => {
                placements.write(PlaceRequest {
                    trigger: PlaceTrigger::Button,
                });
            }
            UiAction::CanvasTapped => {
                placements.write(PlaceRequest {
                    trigger: PlaceTrigger::Tap,
                });
            }
            ignored => debug!("Ignoring {:?} on a disabled control", ignored),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::support::{SupportStatus, guidance};
    use bevy_ecs::system::RunSystemOnce;
    use constants::guidance::INSECURE_CONTEXT_LABEL;
    use constants::ui::READY_TO_PLACE_TEXT;

    /// Route `actions` through `panel`; returns toggle count and placement triggers.
    fn route(panel: ControlPanel, actions: &[UiAction]) -> (usize, Vec<PlaceTrigger>) {
        let mut world = World::new();
        world.insert_resource(panel);
        world.init_resource::<Events<UiAction>>();
        world.init_resource::<Events<SessionToggleRequested>>();
        world.init_resource::<Events<PlaceRequest>>();
        for action in actions {
            world.send_event(*action);
        }

        world.run_system_once(route_ui_actions).unwrap();

        let toggles = world.resource::<Events<SessionToggleRequested>>().len();
        let triggers = world
            .resource::<Events<PlaceRequest>>()
            .iter_current_update_events()
            .map(|request| request.trigger)
            .collect();
        (toggles, triggers)
    }

    const ALL_ACTIONS: [UiAction; 3] = [
        UiAction::StartToggleClicked,
        UiAction::PlaceClicked,
        UiAction::CanvasTapped,
    ];

    #[test]
    fn starts_in_checking_state() {
        let panel = ControlPanel::default();
        assert_eq!(panel.instructions(), CHECKING_SUPPORT_TEXT);
        assert!(!panel.start.enabled);
        assert!(!panel.place.enabled);
        assert_eq!(panel.place.label, PLACE_IDLE_LABEL);
    }

    #[test]
    fn instruction_only_reports_real_changes() {
        let mut panel = ControlPanel::default();
        assert!(panel.set_instruction(READY_TO_PLACE_TEXT));
        assert!(!panel.set_instruction(READY_TO_PLACE_TEXT));
    }

    #[test]
    fn session_cycle_updates_controls() {
        let mut panel = ControlPanel::default();
        panel.show_supported(false);
        assert!(panel.start.enabled);
        assert_eq!(panel.start.label, START_LABEL);
        assert_eq!(panel.instructions(), ENTER_AR_TEXT);

        panel.show_session_started();
        assert!(panel.place.enabled);
        assert_eq!(panel.place.label, PLACE_LABEL);
        assert_eq!(panel.start.label, STOP_LABEL);
        assert_eq!(panel.instructions(), SEARCHING_TEXT);

        panel.show_session_ended(true);
        assert!(!panel.place.enabled);
        assert_eq!(panel.place.label, PLACE_IDLE_LABEL);
        assert!(panel.start.enabled);
        assert_eq!(panel.start.label, START_LABEL);
    }

    #[test]
    fn unsupported_disables_everything() {
        let mut panel = ControlPanel::default();
        let result = guidance(SupportStatus::default());
        panel.show_unsupported(&result);

        assert!(!panel.start.enabled);
        assert!(!panel.place.enabled);
        assert_eq!(panel.instructions(), result.message);
        assert_eq!(panel.support_warning(), Some(INSECURE_CONTEXT_LABEL));

        panel.show_supported(true);
        assert_eq!(panel.support_warning(), None);
        assert_eq!(panel.start.label, STOP_LABEL);
    }

    #[test]
    fn disabled_controls_swallow_clicks() {
        let (toggles, triggers) = route(ControlPanel::default(), &ALL_ACTIONS);

        assert_eq!(toggles, 0);
        assert_eq!(triggers, vec![PlaceTrigger::Tap]);
    }

    #[test]
    fn enabled_controls_forward_clicks() {
        let mut panel = ControlPanel::default();
        panel.show_supported(false);
        panel.show_session_started();

        let (toggles, triggers) = route(panel, &ALL_ACTIONS);

        assert_eq!(toggles, 1);
        assert_eq!(triggers, vec![PlaceTrigger::Button, PlaceTrigger::Tap]);
    }

    #[test]
    fn place_click_dropped_before_session_starts() {
        let mut panel = ControlPanel::default();
        panel.show_supported(false);

        let (toggles, triggers) = route(panel, &[UiAction::PlaceClicked]);

        assert_eq!(toggles, 0);
        assert!(triggers.is_empty());
    }
}
