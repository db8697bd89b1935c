//! Conversation state for NPC dialogue.
//!
//! A conversation copies the NPC's node list on start so the map can keep
//! changing underneath it. Choices either follow `next_node` or end the
//! conversation; the optional action string is surfaced to the caller
//! unchanged.

use crate::error::{ErrorSeverity, GameError};
use crate::state::{DialogueChoice, DialogueNode, Npc};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DialogueError {
    #[error("{0} is hostile and will not talk")]
    Hostile(String),

    #[error("{0} has nothing to say")]
    NoDialogue(String),

    #[error("no conversation in progress")]
    NotInDialogue,

    #[error("choice '{0}' is not offered here")]
    UnknownChoice(String),

    #[error("dialogue node '{0}' does not exist")]
    MissingNode(String),
}

impl GameError for DialogueError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::MissingNode(_) => ErrorSeverity::Internal,
            Self::Hostile(_) => ErrorSeverity::Recoverable,
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Hostile(_) => "DIALOGUE_HOSTILE",
            Self::NoDialogue(_) => "DIALOGUE_EMPTY",
            Self::NotInDialogue => "DIALOGUE_NOT_ACTIVE",
            Self::UnknownChoice(_) => "DIALOGUE_UNKNOWN_CHOICE",
            Self::MissingNode(_) => "DIALOGUE_MISSING_NODE",
        }
    }
}

/// An ongoing conversation.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueState {
    pub npc_id: String,
    pub npc_name: String,
    pub nodes: Vec<DialogueNode>,
    /// Id of the node currently shown.
    pub current: String,
}

/// Result of picking a choice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DialogueStep {
    pub choice_id: String,
    pub action: Option<String>,
    /// True when the choice closed the conversation.
    pub ended: bool,
}

impl DialogueState {
    /// Opens a conversation with `npc` on its first node.
    pub fn start(npc: &Npc) -> Result<Self, DialogueError> {
        if npc.hostile {
            return Err(DialogueError::Hostile(npc.name.clone()));
        }
        let first = npc
            .dialogue
            .first()
            .ok_or_else(|| DialogueError::NoDialogue(npc.name.clone()))?;

        Ok(Self {
            npc_id: npc.id.clone(),
            npc_name: npc.name.clone(),
            current: first.id.clone(),
            nodes: npc.dialogue.clone(),
        })
    }

    pub fn node(&self) -> Option<&DialogueNode> {
        self.nodes.iter().find(|n| n.id == self.current)
    }

    pub fn choices(&self) -> &[DialogueChoice] {
        self.node().map(|n| n.choices.as_slice()).unwrap_or_default()
    }

    /// Follows `choice_id` from the current node.
    ///
    /// A choice leading to an unknown node is rejected without moving, so a
    /// broken tree never strands the conversation on a missing node.
    pub fn choose(&mut self, choice_id: &str) -> Result<DialogueStep, DialogueError> {
        let node = self
            .node()
            .ok_or_else(|| DialogueError::MissingNode(self.current.clone()))?;
        let choice = node
            .choice(choice_id)
            .ok_or_else(|| DialogueError::UnknownChoice(choice_id.to_owned()))?;

        let step = DialogueStep {
            choice_id: choice.id.clone(),
            action: choice.action.clone(),
            ended: choice.next_node.is_none(),
        };

        if let Some(next) = choice.next_node.clone() {
            if !self.nodes.iter().any(|n| n.id == next) {
                return Err(DialogueError::MissingNode(next));
            }
            self.current = next;
        }

        Ok(step)
    }
}
