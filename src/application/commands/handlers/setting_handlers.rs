//! Setting Command Handlers

use std::sync::Arc;

use crate::application::commands::{CreateSetting, DeleteSetting, UpdateSetting};
use crate::application::error::ApplicationError;
use crate::application::ports::{
    NewSetting, NovelRepositoryPort, SettingChanges, SettingRecord, SettingRepositoryPort,
};
use crate::domain::novel::require_text;

/// CreateSetting Handler
pub struct CreateSettingHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    setting_repo: Arc<dyn SettingRepositoryPort>,
}

impl CreateSettingHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        setting_repo: Arc<dyn SettingRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            setting_repo,
        }
    }

    pub async fn handle(&self, command: CreateSetting) -> Result<SettingRecord, ApplicationError> {
        let novel_id = command
            .novel_id
            .ok_or_else(|| ApplicationError::missing_field("novelId"))?;
        let name = command
            .name
            .ok_or_else(|| ApplicationError::missing_field("name"))?;

        let new_setting = NewSetting {
            novel_id,
            name: require_text("name", name)?,
            description: command.description,
        };

        self.novel_repo
            .find_by_id(novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", novel_id))?;

        let setting = self.setting_repo.insert(&new_setting).await?;

        tracing::info!(
            setting_id = setting.id,
            novel_id = novel_id,
            name = %setting.name,
            "Setting created"
        );

        Ok(setting)
    }
}

/// UpdateSetting Handler
pub struct UpdateSettingHandler {
    setting_repo: Arc<dyn SettingRepositoryPort>,
}

impl UpdateSettingHandler {
    pub fn new(setting_repo: Arc<dyn SettingRepositoryPort>) -> Self {
        Self { setting_repo }
    }

    pub async fn handle(&self, command: UpdateSetting) -> Result<SettingRecord, ApplicationError> {
        let setting_id = command.setting_id;

        let changes = SettingChanges {
            name: command.name.map(|n| require_text("name", n)).transpose()?,
            description: command.description,
        };

        let setting = self
            .setting_repo
            .update(setting_id, &changes)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Setting", setting_id))?;

        tracing::info!(setting_id = setting_id, "Setting updated");

        Ok(setting)
    }
}

/// DeleteSetting Handler
pub struct DeleteSettingHandler {
    setting_repo: Arc<dyn SettingRepositoryPort>,
}

impl DeleteSettingHandler {
    pub fn new(setting_repo: Arc<dyn SettingRepositoryPort>) -> Self {
        Self { setting_repo }
    }

    pub async fn handle(&self, command: DeleteSetting) -> Result<(), ApplicationError> {
        let setting_id = command.setting_id;

        if !self.setting_repo.delete(setting_id).await? {
            return Err(ApplicationError::not_found("Setting", setting_id));
        }

        tracing::info!(setting_id = setting_id, "Setting deleted");
        Ok(())
    }
}
