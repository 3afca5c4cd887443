//! Setting Commands

#[derive(Debug, Clone, Default)]
pub struct CreateSetting {
    pub novel_id: Option<i64>,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateSetting {
    pub setting_id: i64,
    pub name: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct DeleteSetting {
    pub setting_id: i64,
}
