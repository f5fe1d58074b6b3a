//! Command router
//!
//! Maps incoming transport updates to conversation events, runs the state
//! machine, and executes the resulting effects against the task store and
//! the transport. All recoverable errors are translated into user-facing
//! replies here; nothing propagates further up.

mod export;
#[cfg(test)]
mod testing;
mod traits;

pub use traits::{ChatTransport, NameResolver};

use crate::db::{Category, Database, Task};
use crate::keyboard::category_keyboard;
use crate::state_machine::{transition, Effect, Event, StateStore};
use crate::telegram::Update;
use std::collections::HashMap;
use std::sync::Arc;

const STORE_FAILURE: &str =
    "❌ Произошла ошибка при обращении к базе данных. Попробуйте позже.";

const NO_TASKS: &str = "📋 В команде пока нет задач. Добавьте первую задачу командой /add";

const NO_TASKS_FOR_EXPORT: &str =
    "📋 У вас пока нет задач для экспорта. Добавьте первую задачу командой /add";

const EXPORT_CAPTION: &str = "📊 Ваши задачи в формате CSV";

const EXPORT_FILENAME: &str = "tasks.csv";

/// Command router holding the injected collaborators
pub struct Router {
    db: Database,
    states: StateStore,
    transport: Arc<dyn ChatTransport>,
    resolver: Arc<dyn NameResolver>,
}

/// Where a response should go: edit the keyboard message in place when the
/// event came from a button press, otherwise send a fresh message.
#[derive(Debug, Clone, Copy)]
enum ReplyTarget {
    Send { chat_id: i64 },
    Edit { chat_id: i64, message_id: i64 },
}

impl ReplyTarget {
    fn chat_id(self) -> i64 {
        match self {
            ReplyTarget::Send { chat_id } | ReplyTarget::Edit { chat_id, .. } => chat_id,
        }
    }
}

impl Router {
    pub fn new(
        db: Database,
        states: StateStore,
        transport: Arc<dyn ChatTransport>,
        resolver: Arc<dyn NameResolver>,
    ) -> Self {
        Self {
            db,
            states,
            transport,
            resolver,
        }
    }

    /// Handle one incoming update; never fails, only logs
    pub async fn handle_update(&self, update: Update) {
        if let Some(message) = update.message {
            let (Some(from), Some(text)) = (message.from, message.text) else {
                // Joins, stickers, etc. carry no routable text
                return;
            };
            let event = Event::from_message_text(&text);
            let target = ReplyTarget::Send {
                chat_id: message.chat.id,
            };
            self.dispatch(from.id, target, event).await;
        } else if let Some(callback) = update.callback_query {
            let event = callback.data.as_deref().and_then(Event::from_callback_data);
            match (event, &callback.message) {
                (Some(event), Some(message)) => {
                    let target = ReplyTarget::Edit {
                        chat_id: message.chat.id,
                        message_id: message.message_id,
                    };
                    self.dispatch(callback.from.id, target, event).await;
                }
                // Payloads outside the two tagged families, or callbacks
                // whose message is no longer available: ack only
                _ => {
                    tracing::debug!(data = ?callback.data, "Ignoring callback");
                }
            }
            if let Err(e) = self.transport.answer_callback(&callback.id).await {
                tracing::debug!(error = %e, "Failed to answer callback query");
            }
        }
    }

    async fn dispatch(&self, user_id: i64, target: ReplyTarget, event: Event) {
        let state = self.states.get(user_id);
        let result = transition(&state, event);
        self.states.set(user_id, result.new_state);

        for effect in result.effects {
            self.run_effect(user_id, target, effect).await;
        }
    }

    async fn run_effect(&self, user_id: i64, target: ReplyTarget, effect: Effect) {
        match effect {
            Effect::Reply(text) => {
                // Errors and prompts always go out as fresh messages
                self.send(target.chat_id(), &text).await;
            }

            Effect::PromptCategory {
                text,
                target: button_target,
            } => {
                let keyboard = category_keyboard(button_target);
                if let Err(e) = self
                    .transport
                    .send_message(target.chat_id(), &text, Some(keyboard))
                    .await
                {
                    tracing::warn!(error = %e, "Failed to send category prompt");
                }
            }

            Effect::CreateTask { text, category } => {
                match self.db.create_task(&text, user_id, category) {
                    Ok(id) => {
                        let confirmation = format!(
                            "✅ Задача добавлена!\n\nID: {id}\nТекст: {text}\nКатегория: {} {category}",
                            category.icon(),
                        );
                        tracing::info!(task_id = id, owner = user_id, "Task created");
                        self.deliver(target, &confirmation).await;
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "Failed to create task");
                        self.deliver(target, STORE_FAILURE).await;
                    }
                }
            }

            Effect::DeleteTask { id } => match self.db.delete_task(id, user_id) {
                Ok(true) => {
                    tracing::info!(task_id = id, owner = user_id, "Task deleted");
                    self.send(target.chat_id(), &format!("✅ Задача с ID {id} успешно удалена!"))
                        .await;
                }
                Ok(false) => {
                    self.send(
                        target.chat_id(),
                        &format!("❌ Задача с ID {id} не найдена или не принадлежит вам."),
                    )
                    .await;
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to delete task");
                    self.send(target.chat_id(), STORE_FAILURE).await;
                }
            },

            Effect::ListTasks { category } => {
                self.list_tasks(user_id, target, category).await;
            }

            Effect::ExportCsv => {
                self.export_csv(user_id, target).await;
            }
        }
    }

    async fn list_tasks(&self, requester: i64, target: ReplyTarget, category: Option<Category>) {
        let tasks = match category {
            Some(cat) => self.db.list_tasks_by_category(cat),
            None => self.db.list_tasks(None),
        };

        let tasks = match tasks {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, "Failed to list tasks");
                self.deliver(target, STORE_FAILURE).await;
                return;
            }
        };

        if tasks.is_empty() {
            let text = match category {
                Some(cat) => format!("📋 В категории '{cat}' пока нет задач."),
                None => NO_TASKS.to_string(),
            };
            self.deliver(target, &text).await;
            return;
        }

        let header = match category {
            Some(cat) => format!("📋 Задачи категории {cat}:"),
            None => "📋 Задачи команды:".to_string(),
        };
        let text = self.render_task_list(requester, &header, &tasks).await;
        self.deliver(target, &text).await;
    }

    /// Build the per-task display block for a listing
    ///
    /// Display names are resolved once per owner per response; a failed
    /// resolution degrades to the numeric id and never aborts the listing.
    async fn render_task_list(&self, requester: i64, header: &str, tasks: &[Task]) -> String {
        let mut out = format!("{header}\n\n");
        let mut names: HashMap<i64, String> = HashMap::new();

        for task in tasks {
            let name = match names.get(&task.owner) {
                Some(name) => name.clone(),
                None => {
                    let resolved = self
                        .resolver
                        .resolve_display_name(task.owner)
                        .await
                        .unwrap_or_else(|_| format!("Пользователь {}", task.owner));
                    names.insert(task.owner, resolved.clone());
                    resolved
                }
            };

            let ownership = if task.owner == requester { "✅" } else { "📝" };
            out.push_str(&format!("{ownership} Задача #{}\n", task.id));
            out.push_str(&format!("   Текст: {}\n", task.text));
            out.push_str(&format!(
                "   Категория: {} {}\n",
                task.category.icon(),
                task.category
            ));
            out.push_str(&format!("   Автор: 👤 {name}\n"));
            out.push_str(&format!("   Создано: 📅 {}\n", task.created_at));
            out.push_str(&"─".repeat(30));
            out.push('\n');
        }
        out
    }

    async fn export_csv(&self, requester: i64, target: ReplyTarget) {
        let tasks = match self.db.list_tasks(Some(requester)) {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load tasks for export");
                self.send(target.chat_id(), STORE_FAILURE).await;
                return;
            }
        };

        if tasks.is_empty() {
            self.send(target.chat_id(), NO_TASKS_FOR_EXPORT).await;
            return;
        }

        let bytes = export::tasks_to_csv(&tasks);
        if let Err(e) = self
            .transport
            .send_document(target.chat_id(), EXPORT_FILENAME, bytes, EXPORT_CAPTION)
            .await
        {
            tracing::warn!(error = %e, "Failed to send CSV export");
        }
    }

    /// Send a fresh message, logging delivery failures
    async fn send(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.transport.send_message(chat_id, text, None).await {
            tracing::warn!(error = %e, "Failed to send message");
        }
    }

    /// Edit the originating keyboard message when possible, else send
    async fn deliver(&self, target: ReplyTarget, text: &str) {
        let result = match target {
            ReplyTarget::Send { chat_id } => self.transport.send_message(chat_id, text, None).await,
            ReplyTarget::Edit {
                chat_id,
                message_id,
            } => {
                self.transport
                    .edit_message_text(chat_id, message_id, text)
                    .await
            }
        };
        if let Err(e) = result {
            tracing::warn!(error = %e, "Failed to deliver response");
        }
    }
}
