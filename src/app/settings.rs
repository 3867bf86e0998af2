//! Settings menu model (data only).
//!
//! Keeping these definitions outside the input handler lets both the handler
//! and UI renderers consume the same source of truth without cross-importing.

use super::state::AppState;

/// A single item in the settings menu.
pub enum SettingsItem {
    /// Boolean toggle, read and written via accessors on `AppState`.
    Toggle {
        label: &'static str,
        get: fn(&AppState) -> bool,
        set: fn(&mut AppState, bool),
    },
    /// One-shot command.
    Action {
        label: &'static str,
        run: fn(&mut AppState),
    },
}

impl SettingsItem {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Toggle { label, .. } | Self::Action { label, .. } => label,
        }
    }

    /// Flip a toggle or run an action.
    pub fn activate(&self, state: &mut AppState) {
        match self {
            Self::Toggle { get, set, label } => {
                let value = !get(state);
                set(state, value);
                state.status_message = Some(format!(
                    "{label}: {}",
                    if value { "on" } else { "off" }
                ));
            }
            Self::Action { run, .. } => run(state),
        }
    }
}

/// Push the config's engine policy into the engine and persist the config.
fn apply_policy(state: &mut AppState) {
    state.engine.set_policy(state.config.policy());
    if let Err(err) = state.config.save() {
        tracing::warn!(%err, "saving config");
    }
}

/// All items shown in the settings popup, in display order.
pub static SETTINGS_ITEMS: &[SettingsItem] = &[
    SettingsItem::Toggle {
        label: "Extra Final Frame",
        get: |s| s.config.extra_final_frame,
        set: |s, v| {
            s.config.extra_final_frame = v;
            apply_policy(s);
        },
    },
    SettingsItem::Toggle {
        label: "Warm-up Pass",
        get: |s| s.config.warm_up_pass,
        set: |s, v| {
            s.config.warm_up_pass = v;
            apply_policy(s);
        },
    },
    SettingsItem::Toggle {
        label: "Suppress Duplicate Readback",
        get: |s| s.config.suppress_duplicate_readback,
        set: |s, v| {
            s.config.suppress_duplicate_readback = v;
            apply_policy(s);
        },
    },
    SettingsItem::Toggle {
        label: "Animate Zoom",
        get: |s| s.config.animate_zoom,
        set: |s, v| {
            s.config.animate_zoom = v;
            if let Err(err) = s.config.save() {
                tracing::warn!(%err, "saving config");
            }
        },
    },
    SettingsItem::Action {
        label: "Replay Warm-up",
        run: |s| {
            s.engine.reset_warm_up();
            s.status_message = Some("Warm-up pass armed".to_string());
        },
    },
];
