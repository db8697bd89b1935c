//! Developer editors available in dev mode.
//!
//! Each editor keeps a draft in [`DevTool`]; committing validates the draft
//! and turns it into a real quest, NPC or item that the engine merges into the
//! session.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{
    DialogueNode, Item, ItemKind, Npc, ObjectiveKind, Position, Quest, QuestObjective,
    QuestStatus, TilePos,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DevError {
    #[error("dev mode is not active")]
    NotInDevMode,

    #[error("no editor is open")]
    NoEditor,

    #[error("draft is incomplete: {0}")]
    IncompleteDraft(&'static str),

    #[error("id '{0}' is already in use")]
    DuplicateId(String),

    #[error("tile {0:?} is not a walkable tile on this map")]
    InvalidPlacement(TilePos),
}

impl GameError for DevError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotInDevMode => "DEV_NOT_ACTIVE",
            Self::NoEditor => "DEV_NO_EDITOR",
            Self::IncompleteDraft(_) => "DEV_INCOMPLETE_DRAFT",
            Self::DuplicateId(_) => "DEV_DUPLICATE_ID",
            Self::InvalidPlacement(_) => "DEV_INVALID_PLACEMENT",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DevToolKind {
    QuestEditor,
    NpcEditor,
    ItemEditor,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestDraft {
    pub id: String,
    pub title: String,
    pub objectives: Vec<QuestObjective>,
    pub experience_reward: u32,
}

impl QuestDraft {
    pub fn add_objective(&mut self, kind: ObjectiveKind, target: impl Into<String>, required: u32) {
        let id = format!("{}_{}", kind, self.objectives.len() + 1);
        self.objectives
            .push(QuestObjective::new(id, kind, target, required.max(1)));
    }

    fn build(&self) -> Result<Quest, DevError> {
        if self.id.is_empty() || self.title.is_empty() {
            return Err(DevError::IncompleteDraft("quest needs an id and a title"));
        }
        if self.objectives.is_empty() {
            return Err(DevError::IncompleteDraft("quest needs an objective"));
        }
        let quest = self
            .objectives
            .iter()
            .cloned()
            .fold(Quest::new(&self.id, &self.title), Quest::with_objective)
            .with_reward(self.experience_reward)
            .with_status(QuestStatus::Available);
        Ok(quest)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NpcDraft {
    pub id: String,
    pub name: String,
    pub tile: Option<TilePos>,
    pub hostile: bool,
    pub greeting: String,
}

impl NpcDraft {
    fn build(&self, tile_size: f32) -> Result<Npc, DevError> {
        if self.id.is_empty() || self.name.is_empty() {
            return Err(DevError::IncompleteDraft("npc needs an id and a name"));
        }
        let tile = self
            .tile
            .ok_or(DevError::IncompleteDraft("npc needs a tile"))?;

        let mut npc = Npc::new(&self.id, &self.name, tile.center(tile_size)).with_hostile(self.hostile);
        if !self.greeting.is_empty() {
            npc = npc.with_dialogue(vec![DialogueNode::new("greeting", &self.greeting)]);
        }
        Ok(npc)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemDraft {
    pub id: String,
    pub name: String,
    pub kind: ItemKind,
    pub quantity: u32,
    pub value: u32,
}

impl Default for ItemDraft {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            kind: ItemKind::Material,
            quantity: 1,
            value: 0,
        }
    }
}

impl ItemDraft {
    fn build(&self) -> Result<Item, DevError> {
        if self.id.is_empty() || self.name.is_empty() {
            return Err(DevError::IncompleteDraft("item needs an id and a name"));
        }
        Ok(Item::new(&self.id, &self.name, self.kind)
            .with_quantity(self.quantity.max(1))
            .with_value(self.value))
    }
}

/// The open editor and its draft.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "tool", content = "draft", rename_all = "snake_case"))]
pub enum DevTool {
    QuestEditor(QuestDraft),
    NpcEditor(NpcDraft),
    ItemEditor(ItemDraft),
}

/// A committed draft, ready to merge into the session.
#[derive(Clone, Debug, PartialEq)]
pub enum DevCommit {
    Quest(Quest),
    Npc(Npc),
    Item(Item),
}

impl DevTool {
    /// Opens `kind` with an empty draft.
    pub fn open(kind: DevToolKind) -> Self {
        match kind {
            DevToolKind::QuestEditor => Self::QuestEditor(QuestDraft::default()),
            DevToolKind::NpcEditor => Self::NpcEditor(NpcDraft::default()),
            DevToolKind::ItemEditor => Self::ItemEditor(ItemDraft::default()),
        }
    }

    pub fn kind(&self) -> DevToolKind {
        match self {
            Self::QuestEditor(_) => DevToolKind::QuestEditor,
            Self::NpcEditor(_) => DevToolKind::NpcEditor,
            Self::ItemEditor(_) => DevToolKind::ItemEditor,
        }
    }

    /// Validates the draft. The draft itself is left in place.
    pub fn commit(&self, tile_size: f32) -> Result<DevCommit, DevError> {
        match self {
            Self::QuestEditor(draft) => draft.build().map(DevCommit::Quest),
            Self::NpcEditor(draft) => draft.build(tile_size).map(DevCommit::Npc),
            Self::ItemEditor(draft) => draft.build().map(DevCommit::Item),
        }
    }
}

impl DevCommit {
    pub fn id(&self) -> &str {
        match self {
            Self::Quest(quest) => &quest.id,
            Self::Npc(npc) => &npc.id,
            Self::Item(item) => &item.id,
        }
    }

    /// Position the committed entity lands on, for placements.
    pub fn position(&self) -> Option<Position> {
        match self {
            Self::Npc(npc) => Some(npc.position),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ConsumableEffect;

    #[test]
    fn quest_draft_needs_objectives() {
        let mut tool = DevTool::open(DevToolKind::QuestEditor);
        let DevTool::QuestEditor(draft) = &mut tool else {
            unreachable!()
        };
        draft.id = "scrap_run".into();
        draft.title = "Scrap Run".into();
        assert!(matches!(tool.commit(32.0), Err(DevError::IncompleteDraft(_))));

        let DevTool::QuestEditor(draft) = &mut tool else {
            unreachable!()
        };
        draft.add_objective(ObjectiveKind::Collect, "scrap_metal", 5);
        draft.experience_reward = 40;

        let DevCommit::Quest(quest) = tool.commit(32.0).unwrap() else {
            panic!("expected a quest");
        };
        assert_eq!(quest.status, QuestStatus::Available);
        assert_eq!(quest.objectives[0].id, "collect_1");
        assert_eq!(quest.experience_reward, 40);
    }

    #[test]
    fn npc_draft_places_on_tile_centre() {
        let tool = DevTool::NpcEditor(NpcDraft {
            id: "scavenger".into(),
            name: "Scavenger".into(),
            tile: Some(TilePos::new(3, 4)),
            hostile: false,
            greeting: "Got caps?".into(),
        });
        let commit = tool.commit(32.0).unwrap();
        assert_eq!(commit.position(), Some(Position::new(112.0, 144.0)));
        let DevCommit::Npc(npc) = commit else {
            panic!("expected an npc");
        };
        assert_eq!(npc.dialogue.len(), 1);
    }

    #[test]
    fn item_draft_clamps_quantity() {
        let tool = DevTool::ItemEditor(ItemDraft {
            id: "stimpak".into(),
            name: "Stimpak".into(),
            kind: ItemKind::Consumable(ConsumableEffect::Heal(30)),
            quantity: 0,
            value: 25,
        });
        let DevCommit::Item(item) = tool.commit(32.0).unwrap() else {
            panic!("expected an item");
        };
        assert_eq!(item.quantity, 1);
        assert_eq!("item_editor".parse::<DevToolKind>().unwrap(), tool.kind());
    }
}
