//! Character Commands

#[derive(Debug, Clone, Default)]
pub struct CreateCharacter {
    pub novel_id: Option<i64>,
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub traits: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateCharacter {
    pub character_id: i64,
    pub name: Option<String>,
    pub role: Option<String>,
    pub description: Option<String>,
    pub traits: Option<Vec<String>>,
}

#[derive(Debug, Clone)]
pub struct DeleteCharacter {
    pub character_id: i64,
}
