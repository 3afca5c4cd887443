//! Setting Query Handlers

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRepositoryPort, SettingRecord, SettingRepositoryPort};
use crate::application::queries::{GetSetting, ListSettings};

pub struct GetSettingHandler {
    setting_repo: Arc<dyn SettingRepositoryPort>,
}

impl GetSettingHandler {
    pub fn new(setting_repo: Arc<dyn SettingRepositoryPort>) -> Self {
        Self { setting_repo }
    }

    pub async fn handle(&self, query: GetSetting) -> Result<SettingRecord, ApplicationError> {
        self.setting_repo
            .find_by_id(query.setting_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Setting", query.setting_id))
    }
}

pub struct ListSettingsHandler {
    novel_repo: Arc<dyn NovelRepositoryPort>,
    setting_repo: Arc<dyn SettingRepositoryPort>,
}

impl ListSettingsHandler {
    pub fn new(
        novel_repo: Arc<dyn NovelRepositoryPort>,
        setting_repo: Arc<dyn SettingRepositoryPort>,
    ) -> Self {
        Self {
            novel_repo,
            setting_repo,
        }
    }

    pub async fn handle(&self, query: ListSettings) -> Result<Vec<SettingRecord>, ApplicationError> {
        self.novel_repo
            .find_by_id(query.novel_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("Novel", query.novel_id))?;

        Ok(self.setting_repo.find_by_novel(query.novel_id).await?)
    }
}
