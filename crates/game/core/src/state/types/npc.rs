use super::Position;

/// A selectable answer within a dialogue node.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueChoice {
    pub id: String,
    pub text: String,
    /// Node to continue with; `None` ends the conversation.
    pub next_node: Option<String>,
    /// Opaque action id handed to collaborators (`open_shop`, `start_quest:x`, ...).
    pub action: Option<String>,
}

impl DialogueChoice {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            next_node: None,
            action: None,
        }
    }

    pub fn leads_to(mut self, node: impl Into<String>) -> Self {
        self.next_node = Some(node.into());
        self
    }

    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueNode {
    pub id: String,
    pub text: String,
    pub choices: Vec<DialogueChoice>,
}

impl DialogueNode {
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            choices: Vec::new(),
        }
    }

    pub fn with_choice(mut self, choice: DialogueChoice) -> Self {
        self.choices.push(choice);
        self
    }

    pub fn choice(&self, id: &str) -> Option<&DialogueChoice> {
        self.choices.iter().find(|c| c.id == id)
    }
}

/// Non-combat character placed on a map.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Npc {
    pub id: String,
    pub name: String,
    pub position: Position,
    /// Hostile NPCs refuse to talk.
    pub hostile: bool,
    /// Ordered dialogue nodes; the first one opens every conversation.
    pub dialogue: Vec<DialogueNode>,
}

impl Npc {
    pub fn new(id: impl Into<String>, name: impl Into<String>, position: Position) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            position,
            hostile: false,
            dialogue: Vec::new(),
        }
    }

    pub fn with_hostile(mut self, hostile: bool) -> Self {
        self.hostile = hostile;
        self
    }

    pub fn with_dialogue(mut self, nodes: Vec<DialogueNode>) -> Self {
        self.dialogue = nodes;
        self
    }

    pub fn node(&self, id: &str) -> Option<&DialogueNode> {
        self.dialogue.iter().find(|n| n.id == id)
    }
}
