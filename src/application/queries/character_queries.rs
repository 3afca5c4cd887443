//! Character Queries

#[derive(Debug, Clone)]
pub struct GetCharacter {
    pub character_id: i64,
}

#[derive(Debug, Clone)]
pub struct ListCharacters {
    pub novel_id: i64,
}
