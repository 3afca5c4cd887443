//! Autosave Controller
//!
//! 编辑器一侧的草稿自动保存。所有事件（编辑、手动保存、防抖计时器、
//! 保存结果）都在同一个 actor 任务中按顺序处理，不需要锁。
//!
//! 规则:
//! - 每次编辑重新开始防抖计时；计时结束且与已保存快照不同才保存
//! - 手动保存立即触发，不比较差异
//! - 同一时刻最多一个保存在途；在途期间最多排队一个保存，手动优先
//! - 切换章节会开启新的会话代号，旧会话的保存结果被忽略

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};

use crate::application::ports::{ChapterDraft, ChapterSaverPort, SaveError};

/// 控制器配置
#[derive(Debug, Clone)]
pub struct AutosaveConfig {
    /// 最后一次编辑之后等待多久再保存
    pub debounce: Duration,
    /// 单次保存的超时时间
    pub save_timeout: Duration,
}

impl Default for AutosaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(3),
            save_timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AutosaveError {
    #[error("Autosave controller has stopped")]
    Stopped,
}

/// 当前阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AutosavePhase {
    /// 没有待保存的计时，也没有在途保存
    #[default]
    Idle,
    /// 防抖计时中
    Pending,
    /// 有保存请求在途
    Saving,
}

/// 可观察的控制器状态
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AutosaveStatus {
    pub phase: AutosavePhase,
    pub chapter_id: Option<i64>,
    pub title: String,
    pub content: String,
    /// 本地内容与最近一次成功保存的快照不同
    pub dirty: bool,
    pub last_saved_at: Option<DateTime<Utc>>,
    /// 最近一次保存失败的原因，下次成功后清除
    pub last_error: Option<String>,
}

#[derive(Debug)]
enum Command {
    Load(ChapterDraft),
    EditTitle(String),
    EditContent(String),
    SaveNow,
    ExternalUpdate(ChapterDraft),
    Close,
}

/// 排队的保存来源，手动保存优先
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SaveTrigger {
    Debounce,
    Manual,
}

#[derive(Debug)]
struct SaveOutcome {
    generation: u64,
    sent: ChapterDraft,
    result: Result<(), SaveError>,
}

/// 单个章节的编辑会话
struct Session {
    generation: u64,
    local: ChapterDraft,
    persisted: ChapterDraft,
    in_flight: bool,
    queued: Option<SaveTrigger>,
    last_saved_at: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl Session {
    fn new(generation: u64, draft: ChapterDraft) -> Self {
        Self {
            generation,
            local: draft.clone(),
            persisted: draft,
            in_flight: false,
            queued: None,
            last_saved_at: None,
            last_error: None,
        }
    }

    fn is_dirty(&self) -> bool {
        self.local != self.persisted
    }
}

/// 控制器句柄
///
/// 句柄被丢弃或调用 `shutdown` 后，actor 清空会话并退出
pub struct AutosaveController {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<AutosaveStatus>,
    task: JoinHandle<()>,
}

impl AutosaveController {
    /// 启动 actor 任务
    pub fn spawn(config: AutosaveConfig, saver: Arc<dyn ChapterSaverPort>) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(64);
        let (completions_tx, completions_rx) = mpsc::unbounded_channel();
        let (status_tx, status_rx) = watch::channel(AutosaveStatus::default());

        let actor = AutosaveActor {
            config,
            saver,
            commands: commands_rx,
            completions: completions_rx,
            completions_tx,
            status: status_tx,
            session: None,
            deadline: None,
            next_generation: 0,
        };
        let task = tokio::spawn(actor.run());

        Self {
            commands: commands_tx,
            status: status_rx,
            task,
        }
    }

    async fn send(&self, command: Command) -> Result<(), AutosaveError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AutosaveError::Stopped)
    }

    /// 打开章节；放弃上一章节尚未触发的保存
    pub async fn load(&self, draft: ChapterDraft) -> Result<(), AutosaveError> {
        self.send(Command::Load(draft)).await
    }

    pub async fn edit_title(&self, title: impl Into<String>) -> Result<(), AutosaveError> {
        self.send(Command::EditTitle(title.into())).await
    }

    pub async fn edit_content(&self, content: impl Into<String>) -> Result<(), AutosaveError> {
        self.send(Command::EditContent(content.into())).await
    }

    /// 手动保存
    pub async fn save_now(&self) -> Result<(), AutosaveError> {
        self.send(Command::SaveNow).await
    }

    /// 服务端数据刷新；本地有未保存的编辑时保留本地内容
    pub async fn external_update(&self, draft: ChapterDraft) -> Result<(), AutosaveError> {
        self.send(Command::ExternalUpdate(draft)).await
    }

    /// 关闭编辑器，取消计时与排队的保存
    pub async fn close(&self) -> Result<(), AutosaveError> {
        self.send(Command::Close).await
    }

    pub fn status(&self) -> AutosaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AutosaveStatus> {
        self.status.clone()
    }

    /// 停止 actor 并等待其退出
    pub async fn shutdown(self) {
        let Self { commands, task, .. } = self;
        drop(commands);
        if let Err(e) = task.await {
            tracing::error!(error = %e, "Autosave task failed");
        }
    }
}

struct AutosaveActor {
    config: AutosaveConfig,
    saver: Arc<dyn ChapterSaverPort>,
    commands: mpsc::Receiver<Command>,
    completions: mpsc::UnboundedReceiver<SaveOutcome>,
    completions_tx: mpsc::UnboundedSender<SaveOutcome>,
    status: watch::Sender<AutosaveStatus>,
    session: Option<Session>,
    deadline: Option<Instant>,
    next_generation: u64,
}

impl AutosaveActor {
    async fn run(mut self) {
        tracing::debug!(debounce_ms = self.config.debounce.as_millis() as u64, "Autosave started");

        loop {
            let armed = self.deadline.is_some();
            let deadline = self.deadline.unwrap_or_else(Instant::now);

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command),
                    None => {
                        self.close();
                        self.publish();
                        break;
                    }
                },
                Some(outcome) = self.completions.recv() => self.complete(outcome),
                _ = sleep_until(deadline), if armed => self.debounce_elapsed(),
            }

            self.publish();
        }

        tracing::debug!("Autosave stopped");
    }

    fn handle(&mut self, command: Command) {
        match command {
            Command::Load(draft) => self.load(draft),
            Command::EditTitle(title) => self.edit(|draft| draft.title = title),
            Command::EditContent(content) => self.edit(|draft| draft.content = content),
            Command::SaveNow => {
                self.deadline = None;
                self.request_save(SaveTrigger::Manual);
            }
            Command::ExternalUpdate(draft) => self.external_update(draft),
            Command::Close => self.close(),
        }
    }

    fn load(&mut self, draft: ChapterDraft) {
        self.next_generation += 1;
        tracing::debug!(
            chapter_id = draft.chapter_id,
            generation = self.next_generation,
            "Chapter loaded"
        );
        self.session = Some(Session::new(self.next_generation, draft));
        self.deadline = None;
    }

    fn edit(&mut self, apply: impl FnOnce(&mut ChapterDraft)) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("Edit ignored, no chapter loaded");
            return;
        };
        apply(&mut session.local);
        self.deadline = Some(Instant::now() + self.config.debounce);
    }

    fn debounce_elapsed(&mut self) {
        self.deadline = None;
        let dirty = self.session.as_ref().is_some_and(Session::is_dirty);
        if dirty {
            self.request_save(SaveTrigger::Debounce);
        }
    }

    fn request_save(&mut self, trigger: SaveTrigger) {
        let Some(session) = self.session.as_mut() else {
            tracing::debug!("Save ignored, no chapter loaded");
            return;
        };

        if session.in_flight {
            session.queued = session.queued.max(Some(trigger));
            tracing::debug!(chapter_id = session.local.chapter_id, ?trigger, "Save queued");
            return;
        }

        self.start_save();
    }

    fn start_save(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.in_flight = true;

        let outcome_tx = self.completions_tx.clone();
        let saver = self.saver.clone();
        let save_timeout = self.config.save_timeout;
        let generation = session.generation;
        let draft = session.local.clone();

        tracing::debug!(chapter_id = draft.chapter_id, generation, "Saving draft");

        tokio::spawn(async move {
            // 保存在独立任务中执行，panic 也会以失败结果回到 actor
            let sent = draft.clone();
            let mut save = tokio::spawn(async move { saver.save_draft(&draft).await });
            let result = match tokio::time::timeout(save_timeout, &mut save).await {
                Ok(Ok(result)) => result,
                Ok(Err(e)) => {
                    tracing::error!(chapter_id = sent.chapter_id, error = %e, "Save task failed");
                    Err(SaveError::Aborted(e.to_string()))
                }
                Err(_) => {
                    save.abort();
                    Err(SaveError::Timeout)
                }
            };
            let _ = outcome_tx.send(SaveOutcome {
                generation,
                sent,
                result,
            });
        });
    }

    fn complete(&mut self, outcome: SaveOutcome) {
        let Some(session) = self
            .session
            .as_mut()
            .filter(|s| s.generation == outcome.generation)
        else {
            tracing::debug!(
                chapter_id = outcome.sent.chapter_id,
                generation = outcome.generation,
                "Ignoring save response for a closed chapter"
            );
            return;
        };
        session.in_flight = false;

        match outcome.result {
            Ok(()) => {
                tracing::info!(chapter_id = outcome.sent.chapter_id, "Draft saved");
                session.persisted = outcome.sent;
                session.last_saved_at = Some(Utc::now());
                session.last_error = None;
            }
            Err(e) => {
                tracing::warn!(chapter_id = outcome.sent.chapter_id, error = %e, "Autosave failed");
                session.last_error = Some(e.to_string());
            }
        }

        match session.queued.take() {
            Some(SaveTrigger::Manual) => self.start_save(),
            Some(SaveTrigger::Debounce) if session.is_dirty() => self.start_save(),
            _ => {}
        }
    }

    fn external_update(&mut self, draft: ChapterDraft) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if session.local.chapter_id != draft.chapter_id {
            tracing::debug!(chapter_id = draft.chapter_id, "External update for another chapter ignored");
            return;
        }

        if session.is_dirty() || session.in_flight {
            tracing::debug!(chapter_id = draft.chapter_id, "Keeping unsaved local edits");
            return;
        }

        session.local = draft.clone();
        session.persisted = draft;
    }

    fn close(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(chapter_id = session.local.chapter_id, "Chapter closed");
        }
        self.deadline = None;
    }

    fn publish(&self) {
        let status = match &self.session {
            None => AutosaveStatus::default(),
            Some(session) => AutosaveStatus {
                phase: if session.in_flight {
                    AutosavePhase::Saving
                } else if self.deadline.is_some() {
                    AutosavePhase::Pending
                } else {
                    AutosavePhase::Idle
                },
                chapter_id: Some(session.local.chapter_id),
                title: session.local.title.clone(),
                content: session.local.content.clone(),
                dirty: session.is_dirty(),
                last_saved_at: session.last_saved_at,
                last_error: session.last_error.clone(),
            },
        };
        self.status.send_replace(status);
    }
}
