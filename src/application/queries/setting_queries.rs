//! Setting Queries

#[derive(Debug, Clone)]
pub struct GetSetting {
    pub setting_id: i64,
}

#[derive(Debug, Clone)]
pub struct ListSettings {
    pub novel_id: i64,
}
