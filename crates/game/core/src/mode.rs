//! Umbrella mode state machine and hotkey routing.
//!
//! The mode decides which components receive input. Routing is a pure
//! function of the current mode and the input context; the engine applies
//! the returned [`Route`].

/// Top-level interaction mode.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum GameMode {
    #[default]
    Exploration,
    Dialogue,
    Combat,
    Inventory,
    Equipment,
    Character,
    Quests,
    Map,
    DevMode,
}

impl GameMode {
    /// Full-screen menus that Escape closes.
    pub const fn is_menu(self) -> bool {
        matches!(
            self,
            Self::Inventory
                | Self::Equipment
                | Self::Character
                | Self::Quests
                | Self::Map
                | Self::DevMode
        )
    }

    /// Movement and map transitions only run while exploring.
    pub const fn allows_movement(self) -> bool {
        matches!(self, Self::Exploration)
    }
}

/// Non-movement keys the mode controller understands.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Hotkey {
    Interact,
    Inventory,
    Equipment,
    Character,
    Quests,
    Map,
    Escape,
    DevToggle,
}

impl Hotkey {
    /// Keys that bypass text focus and mode gating.
    pub const fn always_allowed(self) -> bool {
        matches!(self, Self::Escape | Self::DevToggle)
    }

    const fn menu(self) -> Option<GameMode> {
        match self {
            Self::Inventory => Some(GameMode::Inventory),
            Self::Equipment => Some(GameMode::Equipment),
            Self::Character => Some(GameMode::Character),
            Self::Quests => Some(GameMode::Quests),
            Self::Map => Some(GameMode::Map),
            _ => None,
        }
    }
}

/// What the input surroundings look like when a hotkey arrives.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputContext {
    /// A text field owns the keyboard.
    pub text_focus: bool,
    /// The player stands in an interior map.
    pub indoors: bool,
}

/// Decision produced by [`route`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route {
    Ignored,
    SetMode(GameMode),
    Interact,
    ExitInterior,
    EndDialogue,
}

pub fn route(mode: GameMode, hotkey: Hotkey, ctx: InputContext) -> Route {
    if !hotkey.always_allowed() && (ctx.text_focus || mode != GameMode::Exploration) {
        return Route::Ignored;
    }

    match hotkey {
        Hotkey::Escape => escape(mode, ctx),
        Hotkey::DevToggle => match mode {
            GameMode::DevMode => Route::SetMode(GameMode::Exploration),
            GameMode::Combat | GameMode::Dialogue => Route::Ignored,
            _ => Route::SetMode(GameMode::DevMode),
        },
        Hotkey::Interact => Route::Interact,
        menu => menu.menu().map_or(Route::Ignored, Route::SetMode),
    }
}

fn escape(mode: GameMode, ctx: InputContext) -> Route {
    match mode {
        m if m.is_menu() => Route::SetMode(GameMode::Exploration),
        GameMode::Exploration if ctx.indoors => Route::ExitInterior,
        GameMode::Dialogue => Route::EndDialogue,
        _ => Route::Ignored,
    }
}
