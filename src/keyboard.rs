//! Inline keyboards for category selection
//!
//! Both keyboards share the 2x2 layout; the callback payload prefix keeps
//! the two flows apart so a press cannot be attributed to the wrong one.

use crate::db::Category;
use crate::state_machine::event::ButtonTarget;
use crate::telegram::{InlineKeyboardButton, InlineKeyboardMarkup};

/// Build the category keyboard for the given flow
pub fn category_keyboard(target: ButtonTarget) -> InlineKeyboardMarkup {
    let prefix = match target {
        ButtonTarget::NewTask => "category_",
        ButtonTarget::Filter => "filter_category_",
    };

    let buttons: Vec<InlineKeyboardButton> = Category::ALL
        .iter()
        .map(|cat| InlineKeyboardButton {
            text: format!("{} {}", cat.icon(), cat),
            callback_data: format!("{prefix}{cat}"),
        })
        .collect();

    // Two buttons per row
    InlineKeyboardMarkup {
        inline_keyboard: buttons.chunks(2).map(<[_]>::to_vec).collect(),
    }
}
