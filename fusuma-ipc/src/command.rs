use serde::{Deserialize, Serialize};

use crate::Action;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    // Run an action exactly as a binding would
    Run { action: Action },

    // Queries
    ListWindows,
    ListMonitors,
    GetState,
    ListBindings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Response {
    Ok,
    Error { message: String },
    Windows { windows: Vec<WindowInfo> },
    Monitors { monitors: Vec<MonitorInfo> },
    State { state: StateInfo },
    Bindings { bindings: Vec<BindingInfo> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BindingInfo {
    pub trigger: String,
    pub action: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowInfo {
    pub id: u32,
    pub class: String,
    pub instance: String,
    pub title: String,
    pub tags: u32,
    pub monitor: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub is_floating: bool,
    pub is_focused: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorInfo {
    pub index: usize,
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
    pub visible_tags: u32,
    pub layout: String,
    pub nmaster: u32,
    pub mfact: f32,
    pub gap: u32,
    pub is_selected: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateInfo {
    pub visible_tags: u32,
    pub focused_window_id: Option<u32>,
    pub selected_monitor: usize,
    pub layout: String,
    pub window_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_run_serialization() {
        let cmd = Command::Run {
            action: Action::ToggleView { tags: 0b10 },
        };
        let json = serde_json::to_string(&cmd).unwrap();
        assert!(json.contains("\"type\":\"run\""));
        assert!(json.contains("\"type\":\"toggle_view\""));

        let deserialized: Command = serde_json::from_str(&json).unwrap();
        match deserialized {
            Command::Run { action } => assert_eq!(action, Action::ToggleView { tags: 0b10 }),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_command_queries_serialization() {
        assert_eq!(
            serde_json::to_string(&Command::GetState).unwrap(),
            "{\"type\":\"get_state\"}"
        );
        assert_eq!(
            serde_json::to_string(&Command::ListMonitors).unwrap(),
            "{\"type\":\"list_monitors\"}"
        );
    }

    #[test]
    fn test_response_ok_serialization() {
        let json = serde_json::to_string(&Response::Ok).unwrap();
        assert_eq!(json, "{\"type\":\"ok\"}");

        let deserialized: Response = serde_json::from_str(&json).unwrap();
        assert!(matches!(deserialized, Response::Ok));
    }

    #[test]
    fn test_response_error_serialization() {
        let resp = Response::Error {
            message: "no such monitor".to_string(),
        };
        let json = serde_json::to_string(&resp).unwrap();

        let deserialized: Response = serde_json::from_str(&json).unwrap();
        match deserialized {
            Response::Error { message } => assert_eq!(message, "no such monitor"),
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_response_windows_serialization() {
        let resp = Response::Windows {
            windows: vec![WindowInfo {
                id: 0x1a00003,
                class: "St".to_string(),
                instance: "st".to_string(),
                title: "ranger".to_string(),
                tags: 1 << 4,
                monitor: 0,
                x: 10,
                y: 34,
                width: 1046,
                height: 1036,
                is_floating: false,
                is_focused: true,
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();

        let deserialized: Response = serde_json::from_str(&json).unwrap();
        match deserialized {
            Response::Windows { windows } => {
                assert_eq!(windows.len(), 1);
                assert_eq!(windows[0].class, "St");
                assert_eq!(windows[0].tags, 16);
                assert!(windows[0].is_focused);
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_response_state_serialization() {
        let resp = Response::State {
            state: StateInfo {
                visible_tags: 0b0011,
                focused_window_id: Some(42),
                selected_monitor: 1,
                layout: "[]=".to_string(),
                window_count: 5,
            },
        };
        let json = serde_json::to_string(&resp).unwrap();

        let deserialized: Response = serde_json::from_str(&json).unwrap();
        match deserialized {
            Response::State { state } => {
                assert_eq!(state.visible_tags, 0b0011);
                assert_eq!(state.focused_window_id, Some(42));
                assert_eq!(state.selected_monitor, 1);
                assert_eq!(state.layout, "[]=");
            }
            _ => panic!("Wrong variant"),
        }
    }

    #[test]
    fn test_response_bindings_serialization() {
        let resp = Response::Bindings {
            bindings: vec![BindingInfo {
                trigger: "alt-1".to_string(),
                action: "view 0x1".to_string(),
            }],
        };
        let json = serde_json::to_string(&resp).unwrap();

        let deserialized: Response = serde_json::from_str(&json).unwrap();
        match deserialized {
            Response::Bindings { bindings } => {
                assert_eq!(bindings.len(), 1);
                assert_eq!(bindings[0].trigger, "alt-1");
            }
            _ => panic!("Wrong variant"),
        }
    }
}
