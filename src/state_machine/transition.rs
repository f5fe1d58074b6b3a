//! Pure state transition function
//!
//! Given the current per-user state and an incoming event, produces the next
//! state plus the effects to execute. No I/O happens here; the router runs
//! the effects against the store and the transport.

use super::{ChatState, Effect, Event};
use crate::state_machine::event::{ButtonTarget, Command};

/// Result of a state transition
#[derive(Debug, PartialEq, Eq)]
pub struct TransitionResult {
    pub new_state: ChatState,
    pub effects: Vec<Effect>,
}

impl TransitionResult {
    pub fn new(state: ChatState) -> Self {
        Self {
            new_state: state,
            effects: vec![],
        }
    }

    pub fn with_effect(mut self, effect: Effect) -> Self {
        self.effects.push(effect);
        self
    }
}

const WELCOME: &str = "👋 Привет! Я бот для управления задачами команды.\n\n\
    Доступные команды:\n\
    /add - Добавить новую задачу\n\
    /delete - Удалить задачу по ID\n\
    /list - Показать все задачи\n\
    /list_category - Показать задачи по категории\n\
    /list_csv - Экспортировать задачи в CSV файл\n\n\
    Начните с команды /add для добавления первой задачи!";

const ADD_PROMPT: &str = "📝 Введите текст задачи:\n\
    (Для отмены отправьте /start или любую другую команду)";

const DELETE_PROMPT: &str = "🗑️ Введите ID задачи для удаления:\n\
    (Для отмены отправьте /start или любую другую команду)";

const FILTER_PROMPT: &str = "📋 Выберите категорию для просмотра задач:";

const TEXT_SAVED: &str = "📝 Текст задачи сохранен!\nТеперь выберите категорию задачи:";

const EMPTY_TEXT: &str = "❌ Текст задачи не может быть пустым. Попробуйте еще раз:";

const BAD_DELETE_ID: &str = "❌ ID задачи должен быть числом. Попробуйте еще раз:";

const LOST_TASK_TEXT: &str =
    "❌ Ошибка: текст задачи не найден. Попробуйте снова с команды /add";

const FALLBACK: &str = "🤔 Я не понимаю эту команду.\n\n\
    Доступные команды:\n\
    /start - Начать работу\n\
    /add - Добавить задачу\n\
    /delete - Удалить задачу\n\
    /list - Показать все задачи\n\
    /list_csv - Экспортировать задачи в CSV";

/// Pure transition function
///
/// Commands work from any state and discard whatever flow was in progress;
/// plain text and button presses are interpreted by the current state.
pub fn transition(state: &ChatState, event: Event) -> TransitionResult {
    match (state, event) {
        // ============================================================
        // Commands: always reset the current flow first
        // ============================================================
        (_, Event::Command(Command::Start)) => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::Reply(WELCOME.to_string()))
        }

        (_, Event::Command(Command::Add)) => TransitionResult::new(ChatState::AwaitingTaskText)
            .with_effect(Effect::Reply(ADD_PROMPT.to_string())),

        (_, Event::Command(Command::Delete)) => TransitionResult::new(ChatState::AwaitingDeleteId)
            .with_effect(Effect::Reply(DELETE_PROMPT.to_string())),

        (_, Event::Command(Command::List)) => TransitionResult::new(ChatState::Idle)
            .with_effect(Effect::ListTasks { category: None }),

        (_, Event::Command(Command::ListCategory)) => {
            TransitionResult::new(ChatState::AwaitingCategoryFilter).with_effect(
                Effect::PromptCategory {
                    text: FILTER_PROMPT.to_string(),
                    target: ButtonTarget::Filter,
                },
            )
        }

        (_, Event::Command(Command::ListCsv)) => {
            TransitionResult::new(ChatState::Idle).with_effect(Effect::ExportCsv)
        }

        // ============================================================
        // Add flow: collect text, then category
        // ============================================================
        (ChatState::AwaitingTaskText, Event::Text(text)) => {
            let text = text.trim();
            if text.is_empty() {
                // Invalid input leaves the state unchanged; the user retries
                TransitionResult::new(ChatState::AwaitingTaskText)
                    .with_effect(Effect::Reply(EMPTY_TEXT.to_string()))
            } else {
                TransitionResult::new(ChatState::AwaitingCategory {
                    task_text: text.to_string(),
                })
                .with_effect(Effect::PromptCategory {
                    text: TEXT_SAVED.to_string(),
                    target: ButtonTarget::NewTask,
                })
            }
        }

        (
            ChatState::AwaitingCategory { task_text },
            Event::CategoryButton {
                target: ButtonTarget::NewTask,
                category,
            },
        ) => TransitionResult::new(ChatState::Idle).with_effect(Effect::CreateTask {
            text: task_text.clone(),
            category,
        }),

        // Stale "new task" keyboard: the pending text is gone (state was
        // reset while the buttons stayed visible in the chat).
        (
            _,
            Event::CategoryButton {
                target: ButtonTarget::NewTask,
                ..
            },
        ) => TransitionResult::new(ChatState::Idle)
            .with_effect(Effect::Reply(LOST_TASK_TEXT.to_string())),

        // ============================================================
        // Filter flow
        // ============================================================
        (
            ChatState::AwaitingCategoryFilter,
            Event::CategoryButton {
                target: ButtonTarget::Filter,
                category,
            },
        ) => TransitionResult::new(ChatState::Idle).with_effect(Effect::ListTasks {
            category: Some(category),
        }),

        // Stale filter keyboard: nothing to do beyond acking the press
        (
            _,
            Event::CategoryButton {
                target: ButtonTarget::Filter,
                ..
            },
        ) => TransitionResult::new(ChatState::Idle),

        // ============================================================
        // Delete flow: collect the task id
        // ============================================================
        (ChatState::AwaitingDeleteId, Event::Text(text)) => {
            match text.trim().parse::<i64>() {
                Ok(id) => TransitionResult::new(ChatState::Idle)
                    .with_effect(Effect::DeleteTask { id }),
                Err(_) => TransitionResult::new(ChatState::AwaitingDeleteId)
                    .with_effect(Effect::Reply(BAD_DELETE_ID.to_string())),
            }
        }

        // ============================================================
        // Anything else: help reply, reset to Idle
        // ============================================================
        (
            ChatState::Idle | ChatState::AwaitingCategory { .. } | ChatState::AwaitingCategoryFilter,
            Event::Text(_),
        ) => TransitionResult::new(ChatState::Idle)
            .with_effect(Effect::Reply(FALLBACK.to_string())),
    }
}
