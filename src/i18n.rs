//! Localized default messages
//!
//! Used when the server does not provide its own error text and for
//! notification wording emitted by the admin helpers.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    En,
    Ru,
}

/// Message keys with a localized default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKey {
    RequestFailed,
    LoadFailed,
    Created,
    CreateFailed,
    Deleted,
    DeleteFailed,
    TicketNotFound,
    Unauthorized,
}

impl Locale {
    #[must_use]
    pub const fn text(self, key: MessageKey) -> &'static str {
        match (self, key) {
            (Self::En, MessageKey::RequestFailed) => "Request failed",
            (Self::En, MessageKey::LoadFailed) => "Failed to load data",
            (Self::En, MessageKey::Created) => "Created successfully",
            (Self::En, MessageKey::CreateFailed) => "Failed to create",
            (Self::En, MessageKey::Deleted) => "Deleted successfully",
            (Self::En, MessageKey::DeleteFailed) => "Failed to delete",
            (Self::En, MessageKey::TicketNotFound) => "Ticket not found",
            (Self::En, MessageKey::Unauthorized) => "Authorization required",
            (Self::Ru, MessageKey::RequestFailed) => "Ошибка запроса",
            (Self::Ru, MessageKey::LoadFailed) => "Не удалось загрузить данные",
            (Self::Ru, MessageKey::Created) => "Успешно создано",
            (Self::Ru, MessageKey::CreateFailed) => "Не удалось создать",
            (Self::Ru, MessageKey::Deleted) => "Успешно удалено",
            (Self::Ru, MessageKey::DeleteFailed) => "Не удалось удалить",
            (Self::Ru, MessageKey::TicketNotFound) => "Заявка не найдена",
            (Self::Ru, MessageKey::Unauthorized) => "Требуется авторизация",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locales_differ() {
        assert_ne!(
            Locale::En.text(MessageKey::LoadFailed),
            Locale::Ru.text(MessageKey::LoadFailed)
        );
    }
}
