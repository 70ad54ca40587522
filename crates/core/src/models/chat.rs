//! Optimistic chat delivery.
//!
//! A message is shown to the sender as soon as it is written and tracked in
//! an [`Outbox`] until the backend confirms or rejects it. Failed messages
//! can be retried or rolled back out of the conversation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{CoachError, CoachResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MessageStatus {
    Pending,
    Confirmed { id: Uuid, at: DateTime<Utc> },
    Failed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub local_id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub body: String,
    pub created_at: DateTime<Utc>,
    pub status: MessageStatus,
}

#[derive(Debug, Clone, Default)]
pub struct Outbox {
    messages: Vec<ChatMessage>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a message in the `Pending` state and returns its local id.
    pub fn enqueue(
        &mut self,
        sender_id: Uuid,
        recipient_id: Uuid,
        body: impl Into<String>,
    ) -> CoachResult<Uuid> {
        let body = body.into();
        if body.trim().is_empty() {
            return Err(CoachError::Validation("Message body must not be empty".to_string()));
        }
        let local_id = Uuid::new_v4();
        self.messages.push(ChatMessage {
            local_id,
            sender_id,
            recipient_id,
            body,
            created_at: Utc::now(),
            status: MessageStatus::Pending,
        });
        Ok(local_id)
    }

    pub fn confirm(&mut self, local_id: Uuid, id: Uuid) -> CoachResult<&ChatMessage> {
        let message = self.find_mut(local_id)?;
        if message.status != MessageStatus::Pending {
            return Err(CoachError::Validation(format!(
                "Message {} is not awaiting confirmation",
                local_id
            )));
        }
        message.status = MessageStatus::Confirmed { id, at: Utc::now() };
        Ok(message)
    }

    pub fn fail(&mut self, local_id: Uuid, reason: impl Into<String>) -> CoachResult<&ChatMessage> {
        let message = self.find_mut(local_id)?;
        if message.status != MessageStatus::Pending {
            return Err(CoachError::Validation(format!(
                "Message {} is not awaiting confirmation",
                local_id
            )));
        }
        message.status = MessageStatus::Failed { reason: reason.into() };
        Ok(message)
    }

    /// Moves a failed message back to `Pending` for another send attempt.
    pub fn retry(&mut self, local_id: Uuid) -> CoachResult<&ChatMessage> {
        let message = self.find_mut(local_id)?;
        if !matches!(message.status, MessageStatus::Failed { .. }) {
            return Err(CoachError::Validation(format!(
                "Only failed messages can be retried ({})",
                local_id
            )));
        }
        message.status = MessageStatus::Pending;
        Ok(message)
    }

    /// Removes a failed message from the conversation.
    pub fn rollback(&mut self, local_id: Uuid) -> CoachResult<ChatMessage> {
        let index = self
            .messages
            .iter()
            .position(|m| m.local_id == local_id)
            .ok_or_else(|| CoachError::NotFound(format!("Message {} not found", local_id)))?;
        if !matches!(self.messages[index].status, MessageStatus::Failed { .. }) {
            return Err(CoachError::Validation(format!(
                "Only failed messages can be rolled back ({})",
                local_id
            )));
        }
        Ok(self.messages.remove(index))
    }

    pub fn pending(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages
            .iter()
            .filter(|m| m.status == MessageStatus::Pending)
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    fn find_mut(&mut self, local_id: Uuid) -> CoachResult<&mut ChatMessage> {
        self.messages
            .iter_mut()
            .find(|m| m.local_id == local_id)
            .ok_or_else(|| CoachError::NotFound(format!("Message {} not found", local_id)))
    }
}
